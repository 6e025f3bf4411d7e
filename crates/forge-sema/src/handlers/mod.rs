//! The semantic handler pipeline (§4.H), in the order a `Pass` runs them:
//! well-formed → symbol resolution → type resolution → type validation →
//! control-flow validation.

pub mod control_flow;
pub mod type_resolution;
pub mod type_validation;
pub mod well_formed;

pub use control_flow::ControlFlowHandler;
pub use type_resolution::TypeResolutionHandler;
pub use type_validation::TypeValidationHandler;
pub use well_formed::WellFormedHandler;
