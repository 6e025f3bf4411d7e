//! Control-flow validation handler (§4.H, on-leave). A small abstract
//! interpretation over the statement tree, no scope stack needed: a block
//! terminates iff any of its statements terminates; an `if` terminates iff
//! both branches terminate; `while`/`do-while` never terminates, since the
//! source gives no special case for `is_do_while` in this rule and nothing
//! here second-guesses that.

use forge_core::Severity;
use forge_syntax::{Declaration, IHandler, Input, Node, Output, Statement};

pub const UNREACHABLE: &str = "ECF001";
pub const DOES_NOT_ALWAYS_RETURN: &str = "ECF002";

fn terminates(stmt: &Statement) -> bool {
    match stmt {
        Statement::Continue(_) | Statement::Break(_) | Statement::ReturnVoid(_) | Statement::Return(_) => true,
        Statement::Execute(_) | Statement::Declaration(_) => false,
        Statement::Block(b) => b
            .statements
            .iter()
            .filter_map(Node::as_statement)
            .any(terminates),
        Statement::If(s) => match s.if_parts() {
            Some((_, then_block, Some(else_stmt))) => terminates(then_block) && terminates(else_stmt),
            _ => false,
        },
        Statement::While(_) => false,
    }
}

#[derive(Default)]
pub struct ControlFlowHandler;

impl IHandler for ControlFlowHandler {
    fn on_leave(&mut self, input: &mut Input) -> Output {
        match input.node() {
            Node::Statement(Statement::Block(b)) => {
                let first_unreachable = b
                    .statements
                    .iter()
                    .filter_map(Node::as_statement)
                    .position(terminates)
                    .and_then(|i| b.statements.get(i + 1))
                    .map(|n| n.range().clone());
                if let Some(range) = first_unreachable {
                    input.messages.emit_coded(range, Severity::WARNING, UNREACHABLE, "statement is unreachable");
                }
            }
            Node::Declaration(Declaration::Function(d)) => {
                let range = input.node().range().clone();
                if let Some(return_type) = d.return_type.as_type() {
                    if !forge_syntax::is_void(return_type) {
                        if let Some(body) = d.body.as_statement() {
                            if !terminates(body) {
                                input.messages.emit_coded(
                                    range,
                                    Severity::ERROR,
                                    DOES_NOT_ALWAYS_RETURN,
                                    "function does not return in all cases",
                                );
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        Output::continue_()
    }
}
