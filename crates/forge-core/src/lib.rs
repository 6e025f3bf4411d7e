//! Source model and diagnostic infrastructure shared across the Forge compiler.
//!
//! This crate has no dependency on the syntax tree: it is the substrate that
//! `forge-syntax` and `forge-sema` are built on.

pub mod diagnostics;
pub mod source;

pub use diagnostics::{Message, MessageContext, Reporter, Severity};
pub use source::{LineIndexedString, Source, SourceLocation, SourceRange};
