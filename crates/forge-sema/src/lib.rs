//! Scope and symbol resolution, Forge type logic, and the semantic handler
//! pipeline (§4.E-H) that runs over a `forge_syntax::Node` tree after it has
//! been built.

pub mod handlers;
pub mod resolve;
pub mod scope;
pub mod types;

pub use handlers::{ControlFlowHandler, TypeResolutionHandler, TypeValidationHandler, WellFormedHandler};
pub use resolve::SymbolResolutionHandler;
pub use scope::{Scope, ScopeFlags, ScopeStack};
pub use types::{arithmetic_containing_type, casting_mode, CastingMode};

use forge_syntax::{IHandler, Pass};

/// The one codegen-context fact semantic analysis needs ahead of a live
/// backend: how wide a pointer (and `isize`/`usize`) is on the target.
/// Nothing else about `forge_codegen::Context` is visible here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    pub pointer_bit_width: u32,
}

impl TargetInfo {
    pub const LP64: TargetInfo = TargetInfo { pointer_bit_width: 64 };
    pub const ILP32: TargetInfo = TargetInfo { pointer_bit_width: 32 };
}

/// Assembles the full semantic validation pipeline in the order §4.H
/// specifies: well-formed, then symbol resolution, then type resolution,
/// then type validation, then control-flow validation.
pub fn validation_pass(target: TargetInfo) -> Pass {
    let handlers: Vec<Box<dyn IHandler>> = vec![
        Box::new(WellFormedHandler),
        Box::new(SymbolResolutionHandler::new()),
        Box::new(TypeResolutionHandler::new(target)),
        Box::new(TypeValidationHandler::new(target)),
        Box::new(ControlFlowHandler),
    ];
    Pass::new(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{MessageContext, SourceRange};
    use forge_syntax::{BasicKind, BitWidthKind, Declaration, Node, NumberLiteral, Statement, Type, TranslationUnit, Value};

    fn r() -> SourceRange {
        SourceRange::synthetic()
    }

    fn run(unit: TranslationUnit) -> MessageContext {
        let mut messages = MessageContext::new();
        let mut node = Node::TranslationUnit(unit);
        validation_pass(TargetInfo::LP64).run(&mut messages, &mut node);
        messages
    }

    fn i32_ty() -> Type {
        Type::with_bit_width(BitWidthKind::SignedInt, 32, r())
    }

    #[test]
    fn well_formed_program_resolves_symbols_and_types_cleanly() {
        let body = Statement::block(
            vec![Statement::return_value(Value::symbol("x", r()), r())],
            r(),
        );
        let func = Declaration::function(
            "f",
            vec![Declaration::variable("x", i32_ty(), None, false, r())],
            i32_ty(),
            body,
            r(),
        );
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert_eq!(messages.error_count(), 0, "{:?}", messages.messages());
    }

    #[test]
    fn undeclared_symbol_is_reported() {
        let body = Statement::block(
            vec![Statement::return_value(Value::symbol("missing", r()), r())],
            r(),
        );
        let func = Declaration::function("f", vec![], i32_ty(), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(resolve::UNDECLARED)));
    }

    #[test]
    fn redeclared_symbol_in_same_block_is_reported() {
        let body = Statement::block(
            vec![
                Statement::declaration(Declaration::variable("x", i32_ty(), None, false, r()), r()),
                Statement::declaration(Declaration::variable("x", i32_ty(), None, false, r()), r()),
                Statement::return_value(Value::literal_number(NumberLiteral::I32(0), r()), r()),
            ],
            r(),
        );
        let func = Declaration::function("f", vec![], i32_ty(), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(resolve::REDECLARED)));
    }

    #[test]
    fn non_bool_condition_is_rejected() {
        let body = Statement::block(
            vec![
                Statement::if_(
                    Value::literal_number(NumberLiteral::I32(1), r()),
                    Statement::return_void(r()),
                    None,
                    r(),
                ),
                Statement::return_void(r()),
            ],
            r(),
        );
        let func = Declaration::function("f", vec![], Type::basic(BasicKind::Void, r()), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(handlers::type_validation::UNEXPECTED_TYPE)));
    }

    #[test]
    fn non_void_function_that_falls_off_the_end_is_reported() {
        let body = Statement::block(vec![], r());
        let func = Declaration::function("f", vec![], i32_ty(), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(handlers::control_flow::DOES_NOT_ALWAYS_RETURN)));
    }

    #[test]
    fn statement_after_return_is_unreachable() {
        let body = Statement::block(
            vec![
                Statement::return_value(Value::literal_number(NumberLiteral::I32(0), r()), r()),
                Statement::return_value(Value::literal_number(NumberLiteral::I32(1), r()), r()),
            ],
            r(),
        );
        let func = Declaration::function("f", vec![], i32_ty(), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(handlers::control_flow::UNREACHABLE)));
    }

    #[test]
    fn implicit_widening_initializer_is_accepted() {
        let wide = Type::with_bit_width(BitWidthKind::SignedInt, 64, r());
        let body = Statement::declaration(
            Declaration::variable(
                "x",
                wide,
                Some(Value::literal_number(NumberLiteral::I32(1), r())),
                false,
                r(),
            ),
            r(),
        );
        let func = Declaration::function(
            "f",
            vec![],
            Type::basic(BasicKind::Void, r()),
            Statement::block(vec![body, Statement::return_void(r())], r()),
            r(),
        );
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert_eq!(messages.error_count(), 0, "{:?}", messages.messages());
    }

    #[test]
    fn narrowing_initializer_needs_an_explicit_cast() {
        let narrow = i32_ty();
        let wide_literal = Value::literal_number(NumberLiteral::I64(1), r());
        let body = Statement::declaration(
            Declaration::variable("x", narrow, Some(wide_literal), false, r()),
            r(),
        );
        let func = Declaration::function(
            "f",
            vec![],
            Type::basic(BasicKind::Void, r()),
            Statement::block(vec![body, Statement::return_void(r())], r()),
            r(),
        );
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(handlers::type_validation::IMPLICIT_CAST_NEEDED)));
    }

    #[test]
    fn pointer_to_void_is_rejected() {
        let ptr = Type::pointer(Type::basic(BasicKind::Void, r()), r());
        let func = Declaration::function(
            "f",
            vec![Declaration::variable("p", ptr, None, false, r())],
            Type::basic(BasicKind::Void, r()),
            Statement::block(vec![Statement::return_void(r())], r()),
            r(),
        );
        let unit = TranslationUnit::new(vec![func], r());
        let messages = run(unit);
        assert!(messages
            .messages()
            .iter()
            .any(|m| m.code == Some(handlers::type_validation::VOID_POINTER)));
    }
}
