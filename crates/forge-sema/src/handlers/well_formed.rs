//! Well-formedness handler (§4.H). Runs first in the validation `Pass`;
//! a violation halts the walk so later handlers never see a malformed tree.
//! Most of §3's syntactic constraints are enforced structurally by the Rust
//! types themselves (an `IfStatement` cannot be built without a condition),
//! so what's left to check here is the handful of invariants the type
//! system can't express.

use forge_core::Severity;
use forge_syntax::{Declaration, IHandler, Input, Node, Output, Statement, Type};

pub const MALFORMED_TREE: &str = "EIN002";

fn violation(input: &mut Input, text: impl Into<String>) -> Output {
    let range = input.node().range().clone();
    input.messages.emit_coded(range, Severity::FATAL_ERROR, MALFORMED_TREE, text);
    Output::halt_traversal()
}

#[derive(Default)]
pub struct WellFormedHandler;

impl IHandler for WellFormedHandler {
    fn on_leave(&mut self, input: &mut Input) -> Output {
        match input.node() {
            Node::Type(Type::WithBitWidth(t)) => {
                if !matches!(t.bit_width, 8 | 16 | 32 | 64) {
                    return violation(input, format!("invalid bit width {}", t.bit_width));
                }
            }
            Node::Type(Type::Structured(t)) => {
                let mut names: Vec<&str> = t.members.iter().map(|m| m.name.as_str()).collect();
                names.sort_unstable();
                if names.windows(2).any(|w| w[0] == w[1]) {
                    return violation(input, "duplicate member name in structured type");
                }
            }
            Node::Declaration(Declaration::Function(d)) => {
                if !matches!(d.body.as_statement(), Some(Statement::Block(_))) {
                    return violation(input, "function body must be a block statement");
                }
            }
            Node::Declaration(d) if d.name().is_empty() => {
                return violation(input, "declaration has an empty name");
            }
            _ => {}
        }
        Output::continue_()
    }
}
