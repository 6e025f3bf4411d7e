//! Errors the harness itself can raise — never diagnostics, and never
//! rendered by a `Reporter`. Crosses the `forge-testsupport` boundary the
//! same way `forge_codegen::CodegenError` crosses its own.

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A fixture file couldn't be read.
    #[error("fixture I/O failure: {0}")]
    FixtureIo(#[from] std::io::Error),

    /// Backend reported a failure while lowering.
    #[error("codegen failed: {0}")]
    Codegen(#[from] forge_codegen::CodegenError),

    /// A test asked to JIT-invoke a function but no JIT hook was supplied,
    /// or the hook itself failed.
    #[error("JIT driver unavailable: {0}")]
    JitUnavailable(String),

    /// An expectation didn't hold. `expected`/`actual` are already rendered
    /// text, ready to print as a diff without the caller reaching back into
    /// harness internals.
    #[error("expectation failed:\n--- expected ---\n{expected}\n--- actual ---\n{actual}")]
    Mismatch { expected: String, actual: String },
}
