//! Syntax-tree substrate and traversal engine.
//!
//! Nodes are a tagged-variant tree (§9 design notes) rather than a
//! virtual-dispatch hierarchy: `Node` is the universal child/replacement
//! slot, narrowed to a family (`Type`, `Value`, `Statement`, `Declaration`,
//! `TranslationUnit`) at the point of use via `as_type`/`as_value`/etc.

pub mod declarations;
pub mod external;
pub mod ids;
pub mod node;
pub mod pass;
pub mod statements;
pub mod types;
pub mod unit;
pub mod values;
pub mod visit;

pub use declarations::{BackendHandle, Declaration};
pub use ids::DeclId;
pub use node::{compare_node_sequences, try_cast, clone_node_sequence, Node, NodeKind, TryCast};
pub use pass::{IHandler, Input, KindDispatchHandler, Output, OutputStatus, Pass};
pub use statements::Statement;
pub use types::{
    function_arg_types, function_return_type, is_bool, is_float, is_function, is_integer,
    is_number, is_pointer, is_void, number_bit_width, pointer_element, signedness, BasicKind,
    BitWidthKind, StructuredKind, Type,
};
pub use unit::TranslationUnit;
pub use values::{BinaryOp, NumberLiteral, UnaryOp, Value};
pub use visit::{IVisitor, Status};

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::SourceRange;
    use statements::Statement;
    use types::BasicKind;
    use values::{BinaryOp, NumberLiteral, Value};

    fn r() -> SourceRange {
        SourceRange::synthetic()
    }

    fn sample_function() -> Declaration {
        let arg = Declaration::variable("a", Type::basic(BasicKind::Bool, r()), None, false, r());
        let body = Statement::return_value(Value::symbol("a", r()), r());
        Declaration::function(
            "f",
            vec![arg],
            Type::basic(BasicKind::Bool, r()),
            Statement::block(vec![body], r()),
            r(),
        )
    }

    #[test]
    fn clone_compares_equal_to_original() {
        let decl = sample_function();
        let node = Node::Declaration(decl);
        let cloned = node.deep_clone();
        assert!(node.compare(&cloned));
    }

    #[test]
    fn compare_ignores_source_range_but_not_shape() {
        let a = Value::literal_number(NumberLiteral::I32(1), SourceRange::synthetic());
        let src = forge_core::Source::new("x.fg", "1");
        let b = Value::literal_number(
            NumberLiteral::I32(1),
            SourceRange::point(forge_core::SourceLocation::at_offset(src, 0)),
        );
        assert!(a.compare(&b));

        let c = Value::literal_number(NumberLiteral::I32(2), r());
        assert!(!a.compare(&c));
    }

    #[test]
    fn binary_value_walks_lhs_then_rhs_in_declaration_order() {
        let expr = Value::binary(
            BinaryOp::Add,
            Value::literal_number(NumberLiteral::I32(1), r()),
            Value::literal_number(NumberLiteral::I32(2), r()),
            r(),
        );
        let mut seen = Vec::new();
        expr.for_each_direct_child(&mut |child| {
            if let Node::Value(Value::LiteralNumber(n)) = child {
                seen.push(match n.value {
                    NumberLiteral::I32(v) => v,
                    _ => unreachable!(),
                });
            }
        });
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn format_debug_is_indented_and_reproducible() {
        let node = Node::Declaration(sample_function());
        let mut first = String::new();
        node.format_debug(&mut first, 0).unwrap();
        let mut second = String::new();
        node.format_debug(&mut second, 0).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("Declaration.Function"));
        assert!(first.starts_with("Declaration.Function"));
    }

    #[test]
    fn try_cast_narrows_to_the_right_family() {
        let node = Node::Value(Value::literal_bool(true, r()));
        assert!(node::try_cast::<&Value>(&node).is_some());
        assert!(node::try_cast::<&Statement>(&node).is_none());
    }
}
