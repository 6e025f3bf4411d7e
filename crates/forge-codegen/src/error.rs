//! Errors a backend can report back through the codegen contract (§4.I).
//!
//! These are not diagnostics: nothing here is source-attributed, and a
//! `Reporter` never renders one. They cross a crate boundary the way
//! `plotnik-vm`'s `RuntimeError` does, so they follow the same shape.

#[derive(Debug, Clone, thiserror::Error)]
pub enum CodegenError {
    /// A declaration was asked for without having been lowered yet, i.e.
    /// `lower_function`/`lower_global` was never called for it before a
    /// call site or read tried to use its backend handle.
    #[error("no backend handle recorded for declaration '{0}'")]
    NoBackendHandle(String),

    /// A type reached codegen that the contract has no lowering for
    /// (structured types: member layout is a backend concern the contract
    /// does not specify).
    #[error("backend has no lowering for this type shape")]
    UnsupportedType,

    /// A symbol's resolved type was `None` going into codegen — semantic
    /// validation should have rejected the program before this point.
    #[error("value has no resolved type; codegen requires a fully validated tree")]
    UnresolvedType,

    #[error("backend reported a failure: {0}")]
    Backend(String),
}
