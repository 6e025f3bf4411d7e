//! Functional test harness and random syntax-tree generator (§4.J):
//! everything a downstream crate needs to drive `forge_syntax`/`forge_sema`/
//! `forge_codegen` end to end against fixtures, without re-deriving the
//! pipeline wiring itself.

pub mod error;
pub mod fuzz;
pub mod harness;

pub use error::HarnessError;
pub use fuzz::TreeGenerator;
pub use harness::{assert_matches, run, BackendRun, ExpectedState, Expectation, FunctionalOutcome};

/// Installs a `tracing` subscriber for test output, gated by `FORGE_TEST_LOG`
/// so a normal `cargo test` run stays quiet. Safe to call from every test
/// binary: `try_init` is a no-op past the first call, and its `Result` is
/// deliberately discarded rather than unwrapped.
pub fn init_test_logging() {
    if std::env::var_os("FORGE_TEST_LOG").is_none() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
