//! Type resolution handler (§4.H, on-leave). Fills `resolved_type` bottom
//! up. Runs after symbol resolution, so `referenced` fields on symbol nodes
//! are already populated where a binding exists.
//!
//! Declarations are indexed by `DeclId` as they are resolved (on their own
//! `on_leave`) so a later sibling's `Value::Symbol`/`Call` can look up an
//! already-resolved declaration's type. A forward reference to a sibling
//! declared *later* in the same unordered scope (e.g. a translation-unit
//! function calling one defined further down) sees no entry yet and is left
//! `None` — §7's documented graceful-degradation contract ("missing binding
//! ⇒ type unknown, skip operations requiring it"), not patched with a
//! second fixed-point pass.

use std::collections::HashMap;

use forge_syntax::{DeclId, Declaration, IHandler, Input, Node, Output, Type, Value};

use crate::types::arithmetic_containing_type;
use crate::TargetInfo;

pub struct TypeResolutionHandler {
    target: TargetInfo,
    resolved: HashMap<DeclId, Type>,
}

impl TypeResolutionHandler {
    pub fn new(target: TargetInfo) -> TypeResolutionHandler {
        TypeResolutionHandler {
            target,
            resolved: HashMap::new(),
        }
    }

    fn lookup(&self, id: DeclId) -> Option<Type> {
        self.resolved.get(&id).map(Type::deep_clone)
    }

    fn resolve_value(&self, value: &Value, range: forge_core::SourceRange) -> Option<Type> {
        match value {
            Value::LiteralBool(_) => Some(Type::basic(forge_syntax::BasicKind::Bool, range)),
            Value::LiteralNumber(v) => Some(v.value.declared_type(range)),
            Value::Symbol(v) => v.referenced.and_then(|id| self.lookup(id)),
            Value::Unary(v) => {
                let operand_ty = v.operand.as_value().and_then(Value::resolved_type).cloned();
                match v.op {
                    forge_syntax::UnaryOp::BoolNot => {
                        Some(Type::basic(forge_syntax::BasicKind::Bool, range))
                    }
                    forge_syntax::UnaryOp::BitNot | forge_syntax::UnaryOp::Pos | forge_syntax::UnaryOp::Neg => {
                        operand_ty
                    }
                    forge_syntax::UnaryOp::Deref => operand_ty.and_then(|t| t.operand_type().cloned()),
                    forge_syntax::UnaryOp::GetAddr => operand_ty.map(|t| Type::pointer(t, range)),
                }
            }
            Value::Binary(v) => {
                let lhs_ty = v.lhs.as_value().and_then(Value::resolved_type).cloned();
                let rhs_ty = v.rhs.as_value().and_then(Value::resolved_type).cloned();
                if v.op.is_boolean() || v.op.is_comparison() {
                    Some(Type::basic(forge_syntax::BasicKind::Bool, range))
                } else if v.op.is_compound_assign() || v.op.is_assign() {
                    lhs_ty
                } else if v.op.is_member_access() {
                    // Deferred (§9 Open Questions): ETY011 is never reached.
                    None
                } else {
                    match (lhs_ty, rhs_ty) {
                        (Some(l), Some(r)) => {
                            arithmetic_containing_type(&l, &r, self.target.pointer_bit_width, range)
                        }
                        _ => None,
                    }
                }
            }
            Value::Call(v) => v
                .callee
                .as_value()
                .and_then(Value::resolved_type)
                .and_then(forge_syntax::function_return_type)
                .cloned(),
            Value::Cast(v) => v.target_type.as_type().cloned(),
        }
    }
}

impl IHandler for TypeResolutionHandler {
    fn on_leave(&mut self, input: &mut Input) -> Output {
        let range = input.node().range().clone();
        match input.node_mut() {
            Node::Value(value) => {
                let resolved = self.resolve_value(value, range);
                value.set_resolved_type(resolved);
            }
            Node::Declaration(decl) => {
                let resolved = match decl {
                    Declaration::Variable(d) => d.declared_type.as_type().cloned(),
                    Declaration::Function(d) => {
                        let return_type = d.return_type.as_type().cloned();
                        let arg_types: Vec<Type> = d
                            .args
                            .iter()
                            .filter_map(|a| a.as_declaration())
                            .filter_map(Declaration::resolved_type)
                            .cloned()
                            .collect();
                        return_type.map(|rt| Type::function(rt, arg_types, range.clone()))
                    }
                    Declaration::TypeAlias(d) => d.aliased_type.as_type().cloned(),
                    Declaration::StructuredType(_) | Declaration::Namespace(_) => None,
                };
                if let Some(ty) = &resolved {
                    self.resolved.insert(decl.id(), ty.deep_clone());
                }
                decl.set_resolved_type(resolved);
            }
            _ => {}
        }
        Output::continue_()
    }
}
