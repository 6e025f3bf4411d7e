//! Type validation handler (§4.H, on-leave). Runs after type resolution and
//! emits the user-visible `ETY0xx` diagnostics. Recovers locally: one node
//! failing a check never stops validation of its siblings.
//!
//! `ETY011` (no-member-with-name) is defined but never emitted — member
//! access resolves to `None` in `TypeResolutionHandler` and nothing here
//! depends on that path running to completion, matching the deferred
//! member-access design.
//!
//! All tree reads happen in `find_violations`, which returns owned
//! `(range, code, text)` triples before any diagnostic is emitted — `Input`
//! only exposes `node()` through a method, so holding a borrow from it
//! across a later `input.messages` call does not typecheck; collecting
//! first and emitting after keeps the two apart.

use std::collections::HashSet;

use forge_core::{MessageContext, Severity, SourceRange};
use forge_syntax::{DeclId, Declaration, IHandler, Input, Node, Output, Statement, Type, UnaryOp, Value};

use crate::types::{casting_mode, CastingMode};
use crate::TargetInfo;

pub const VOID_POINTER: &str = "ETY001";
pub const FUNCTION_POINTER: &str = "ETY002";
pub const VOID_ARGUMENT: &str = "ETY003";
pub const UNEXPECTED_TYPE: &str = "ETY004";
pub const IMPLICIT_CAST_NEEDED: &str = "ETY005";
pub const ILLEGAL_CAST: &str = "ETY006";
pub const ARG_COUNT_MISMATCH: &str = "ETY007";
pub const NON_CALLABLE: &str = "ETY008";
pub const RETURN_VALUE_REQUIRED: &str = "ETY009";
pub const RETURN_VALUE_FORBIDDEN: &str = "ETY010";
#[allow(dead_code)]
pub const NO_MEMBER_WITH_NAME: &str = "ETY011";
pub const UNRESOLVABLE_TYPE: &str = "ETY012";
pub const NAMESPACE_AS_VALUE: &str = "ETY013";
pub const NAMESPACE_IN_STRUCTURED_TYPE: &str = "ETY014";

type Finding = (SourceRange, &'static str, String);

/// `None` when `actual` is unresolved (`ETY012`), else the code to raise for
/// an explicit/illegal cast, or `Ok` (no finding) for an implicit one.
fn assignability(actual: Option<&Type>, expected: &Type, pointer_bit_width: u32, range: &SourceRange) -> Option<Finding> {
    let actual = actual?;
    match casting_mode(actual, expected, pointer_bit_width) {
        CastingMode::Implicit => None,
        CastingMode::Explicit => Some((
            range.clone(),
            IMPLICIT_CAST_NEEDED,
            "value requires an explicit cast here; use `as`".to_string(),
        )),
        CastingMode::Illegal => Some((
            range.clone(),
            ILLEGAL_CAST,
            "no conversion exists between these types".to_string(),
        )),
    }
}

fn unresolvable(range: &SourceRange) -> Finding {
    (range.clone(), UNRESOLVABLE_TYPE, "type could not be resolved".to_string())
}

fn find_violations(
    input: &Input,
    target: &TargetInfo,
    namespaces: &HashSet<DeclId>,
) -> Vec<Finding> {
    let range = input.node().range().clone();
    let mut out = Vec::new();

    match input.node() {
        Node::Type(Type::Unary(t)) => {
            if let Some(inner) = t.operand_type.as_type() {
                if forge_syntax::is_void(inner) {
                    out.push((range, VOID_POINTER, "pointer to void is not allowed; use `usize`".to_string()));
                } else if forge_syntax::is_function(inner) {
                    out.push((range, FUNCTION_POINTER, "pointer to function is redundant; remove the `*`".to_string()));
                }
            }
        }
        Node::Declaration(Declaration::Function(d)) => {
            for arg in &d.args {
                if let Some(decl) = arg.as_declaration() {
                    if let Some(ty) = decl.declared_type() {
                        if forge_syntax::is_void(ty) {
                            out.push((
                                arg.range().clone(),
                                VOID_ARGUMENT,
                                format!("argument '{}' may not have type void", decl.name()),
                            ));
                        }
                    }
                }
            }
        }
        Node::Declaration(Declaration::Variable(d)) => {
            if let (Some(declared), Some(init)) = (d.declared_type.as_type(), d.initial_value.as_deref()) {
                if let Some(init_value) = init.as_value() {
                    let finding = assignability(init_value.resolved_type(), declared, target.pointer_bit_width, init.range())
                        .or_else(|| init_value.resolved_type().is_none().then(|| unresolvable(init.range())));
                    out.extend(finding);
                }
            }
        }
        Node::Declaration(Declaration::Namespace(_)) => {
            let in_structured_type = input
                .try_get_directly_surrounding::<&Declaration>()
                .is_some_and(Declaration::is_structured_type);
            if in_structured_type {
                out.push((
                    range,
                    NAMESPACE_IN_STRUCTURED_TYPE,
                    "a namespace may not be declared inside a structured type".to_string(),
                ));
            }
        }
        Node::Value(Value::Symbol(v)) => {
            if v.referenced.is_some_and(|id| namespaces.contains(&id)) {
                out.push((
                    range,
                    NAMESPACE_AS_VALUE,
                    format!("'{}' names a namespace and cannot be used as a value", v.name),
                ));
            }
        }
        Node::Value(Value::Unary(v)) => {
            let operand_ty = v.operand.as_value().and_then(Value::resolved_type);
            let ok = match v.op {
                UnaryOp::Neg => operand_ty.is_some_and(|t| forge_syntax::is_number(t) && forge_syntax::signedness(t) != Some(false)),
                UnaryOp::Pos | UnaryOp::BitNot => operand_ty.is_some_and(forge_syntax::is_number),
                UnaryOp::BoolNot => operand_ty.is_some_and(forge_syntax::is_bool),
                UnaryOp::Deref => operand_ty.is_some_and(forge_syntax::is_pointer),
                UnaryOp::GetAddr => true,
            };
            if !ok {
                let text = match v.op {
                    UnaryOp::Neg => "operand of unary `-` must be signed numeric",
                    UnaryOp::Pos | UnaryOp::BitNot => "operand must be numeric",
                    UnaryOp::BoolNot => "operand of `!` must be bool",
                    UnaryOp::Deref => "operand of `*` must be a pointer",
                    UnaryOp::GetAddr => unreachable!(),
                };
                out.push((range, UNEXPECTED_TYPE, text.to_string()));
            }
        }
        Node::Value(Value::Cast(v)) => {
            let actual = v.value.as_value().and_then(Value::resolved_type);
            if let Some(target_ty) = v.target_type.as_type() {
                let finding = assignability_illegal_only(actual, target_ty, target.pointer_bit_width, &range)
                    .or_else(|| actual.is_none().then(|| unresolvable(&range)));
                out.extend(finding);
            }
        }
        Node::Value(Value::Call(v)) => {
            let callee_ty = v.callee.as_value().and_then(Value::resolved_type);
            match callee_ty {
                Some(t) if forge_syntax::is_function(t) => {
                    let expected_args = forge_syntax::function_arg_types(t).unwrap_or_default();
                    if expected_args.len() != v.args.len() {
                        out.push((
                            range,
                            ARG_COUNT_MISMATCH,
                            format!("expected {} argument(s), found {}", expected_args.len(), v.args.len()),
                        ));
                    } else {
                        for (arg, expected) in v.args.iter().zip(expected_args) {
                            if let Some(arg_value) = arg.as_value() {
                                let finding = assignability(arg_value.resolved_type(), expected, target.pointer_bit_width, arg.range())
                                    .or_else(|| arg_value.resolved_type().is_none().then(|| unresolvable(arg.range())));
                                out.extend(finding);
                            }
                        }
                    }
                }
                Some(_) => out.push((range, NON_CALLABLE, "callee is not a function".to_string())),
                None => out.push(unresolvable(&range)),
            }
        }
        Node::Statement(Statement::If(s)) => {
            if let Some((cond, _, _)) = s.if_parts() {
                if !cond.resolved_type().is_some_and(forge_syntax::is_bool) {
                    out.push((range, UNEXPECTED_TYPE, "condition must be bool".to_string()));
                }
            }
        }
        Node::Statement(Statement::While(s)) => {
            if let Some((cond, _, _)) = s.while_parts() {
                if !cond.resolved_type().is_some_and(forge_syntax::is_bool) {
                    out.push((range, UNEXPECTED_TYPE, "condition must be bool".to_string()));
                }
            }
        }
        Node::Statement(Statement::Return(_)) | Node::Statement(Statement::ReturnVoid(_)) => {
            let function_return = input
                .try_get_directly_surrounding::<&Declaration>()
                .and_then(Declaration::function_return_type);
            if let Some(expected) = function_return {
                let value = input.node().as_statement().and_then(Statement::value);
                match (value, forge_syntax::is_void(expected)) {
                    (Some(_), true) => out.push((
                        range,
                        RETURN_VALUE_FORBIDDEN,
                        "void function may not return a value".to_string(),
                    )),
                    (Some(v), false) => {
                        let finding = assignability(v.resolved_type(), expected, target.pointer_bit_width, &range)
                            .or_else(|| v.resolved_type().is_none().then(|| unresolvable(&range)));
                        out.extend(finding);
                    }
                    (None, false) => out.push((
                        range,
                        RETURN_VALUE_REQUIRED,
                        "non-void function must return a value".to_string(),
                    )),
                    (None, true) => {}
                }
            }
        }
        _ => {}
    }

    out
}

/// Like `assignability` but only flags `Illegal` — used at an explicit cast
/// site, where `Explicit` is exactly what the cast exists to perform.
fn assignability_illegal_only(actual: Option<&Type>, target_ty: &Type, pointer_bit_width: u32, range: &SourceRange) -> Option<Finding> {
    let actual = actual?;
    match casting_mode(actual, target_ty, pointer_bit_width) {
        CastingMode::Illegal => Some((range.clone(), ILLEGAL_CAST, "no conversion exists between these types".to_string())),
        CastingMode::Implicit | CastingMode::Explicit => None,
    }
}

pub struct TypeValidationHandler {
    target: TargetInfo,
    namespaces: HashSet<DeclId>,
}

impl TypeValidationHandler {
    pub fn new(target: TargetInfo) -> TypeValidationHandler {
        TypeValidationHandler {
            target,
            namespaces: HashSet::new(),
        }
    }

    fn emit_all(messages: &mut MessageContext, findings: Vec<Finding>) {
        for (range, code, text) in findings {
            messages.emit_coded(range, Severity::ERROR, code, text);
        }
    }
}

impl IHandler for TypeValidationHandler {
    fn on_leave(&mut self, input: &mut Input) -> Output {
        if let Node::Declaration(Declaration::Namespace(d)) = input.node() {
            self.namespaces.insert(d.id());
        }
        let findings = find_violations(input, &self.target, &self.namespaces);
        Self::emit_all(input.messages, findings);
        Output::continue_()
    }
}
