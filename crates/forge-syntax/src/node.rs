//! Node identity and the `BaseNode` contract shared by every concrete node.

use std::fmt;

use forge_core::SourceRange;

use crate::declarations::{Declaration, DeclarationNode};
use crate::statements::{Statement, StatementNode};
use crate::types::{Type, TypeNode};
use crate::unit::TranslationUnit;
use crate::values::{Value, ValueNode};

/// Static, address-identified node-kind tag. Two kinds are equal iff they are
/// the same static, never by name comparison.
pub struct NodeKindData {
    pub name: &'static str,
}

#[derive(Clone, Copy)]
pub struct NodeKind(pub &'static NodeKindData);

impl NodeKind {
    pub fn name(self) -> &'static str {
        self.0.name
    }
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl Eq for NodeKind {}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

macro_rules! node_kinds {
    ($($name:ident => $str:expr),* $(,)?) => {
        $(
            pub static $name: NodeKindData = NodeKindData { name: $str };
        )*
    };
}

node_kinds! {
    TYPE_BASIC => "Type.Basic",
    TYPE_WITH_BIT_WIDTH => "Type.WithBitWidth",
    TYPE_SYMBOL => "Type.Symbol",
    TYPE_UNARY => "Type.Unary",
    TYPE_FUNCTION => "Type.Function",
    TYPE_STRUCTURED => "Type.Structured",

    VALUE_LITERAL_BOOL => "Value.LiteralBool",
    VALUE_LITERAL_NUMBER => "Value.LiteralNumber",
    VALUE_SYMBOL => "Value.Symbol",
    VALUE_UNARY => "Value.Unary",
    VALUE_BINARY => "Value.Binary",
    VALUE_CALL => "Value.Call",
    VALUE_CAST => "Value.Cast",

    STMT_EXPRESSION => "Statement.Expression",
    STMT_DECLARATION => "Statement.Declaration",
    STMT_BLOCK => "Statement.Block",
    STMT_IF => "Statement.If",
    STMT_WHILE => "Statement.While",
    STMT_RETURN => "Statement.Return",
    STMT_BREAK => "Statement.Break",
    STMT_CONTINUE => "Statement.Continue",

    DECL_VARIABLE => "Declaration.Variable",
    DECL_FUNCTION => "Declaration.Function",
    DECL_TYPE_ALIAS => "Declaration.TypeAlias",
    DECL_STRUCTURED_TYPE => "Declaration.StructuredType",
    DECL_NAMESPACE => "Declaration.Namespace",

    TRANSLATION_UNIT => "TranslationUnit",
}

/// Fields every concrete node carries: its kind tag and the source text it
/// spans. Embedded by value in each concrete struct, never inherited through
/// virtual dispatch.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub kind: NodeKind,
    pub range: SourceRange,
}

impl Envelope {
    pub fn new(kind: &'static NodeKindData, range: SourceRange) -> Self {
        Self {
            kind: NodeKind(kind),
            range,
        }
    }
}

/// The universal node handle. Every edge in the tree — child, replacement
/// slot, visitor argument — is a `Node`; the family enums underneath exist so
/// match arms stay exhaustive within a family (only a `Value` can replace a
/// `Value`, etc.) without resorting to `dyn Any` downcasts.
#[derive(Debug, Clone)]
pub enum Node {
    Type(Type),
    Value(Value),
    Statement(Statement),
    Declaration(Declaration),
    TranslationUnit(TranslationUnit),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Type(n) => n.envelope().kind,
            Node::Value(n) => n.envelope().kind,
            Node::Statement(n) => n.envelope().kind,
            Node::Declaration(n) => n.envelope().kind,
            Node::TranslationUnit(n) => n.envelope.kind,
        }
    }

    pub fn range(&self) -> &SourceRange {
        match self {
            Node::Type(n) => &n.envelope().range,
            Node::Value(n) => &n.envelope().range,
            Node::Statement(n) => &n.envelope().range,
            Node::Declaration(n) => &n.envelope().range,
            Node::TranslationUnit(n) => &n.envelope.range,
        }
    }

    /// Structural equality: same kind, same children, same literal payload.
    /// Source ranges are deliberately excluded — two trees parsed from
    /// different whitespace can still compare equal.
    pub fn compare(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Type(a), Node::Type(b)) => a.compare(b),
            (Node::Value(a), Node::Value(b)) => a.compare(b),
            (Node::Statement(a), Node::Statement(b)) => a.compare(b),
            (Node::Declaration(a), Node::Declaration(b)) => a.compare(b),
            (Node::TranslationUnit(a), Node::TranslationUnit(b)) => a.compare(b),
            _ => false,
        }
    }

    /// Deep clone. Non-owning back-references (`referenced_declaration`) are
    /// copied as-is: they are `DeclId`s, not owned subtrees.
    pub fn deep_clone(&self) -> Node {
        match self {
            Node::Type(n) => Node::Type(n.deep_clone()),
            Node::Value(n) => Node::Value(n.deep_clone()),
            Node::Statement(n) => Node::Statement(n.deep_clone()),
            Node::Declaration(n) => Node::Declaration(n.deep_clone()),
            Node::TranslationUnit(n) => Node::TranslationUnit(n.deep_clone()),
        }
    }

    pub fn for_each_direct_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        match self {
            Node::Type(n) => n.for_each_direct_child(f),
            Node::Value(n) => n.for_each_direct_child(f),
            Node::Statement(n) => n.for_each_direct_child(f),
            Node::Declaration(n) => n.for_each_direct_child(f),
            Node::TranslationUnit(n) => n.for_each_direct_child(f),
        }
    }

    pub fn for_each_direct_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        match self {
            Node::Type(n) => n.for_each_direct_child_mut(f),
            Node::Value(n) => n.for_each_direct_child_mut(f),
            Node::Statement(n) => n.for_each_direct_child_mut(f),
            Node::Declaration(n) => n.for_each_direct_child_mut(f),
            Node::TranslationUnit(n) => n.for_each_direct_child_mut(f),
        }
    }

    pub fn format_debug(&self, out: &mut impl fmt::Write, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        writeln!(out, "{pad}{}", self.kind().name())?;
        let mut result = Ok(());
        self.for_each_direct_child(&mut |child| {
            if result.is_ok() {
                result = child.format_debug(out, indent + 1);
            }
        });
        result
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Node::Type(t) => Some(t),
            _ => None,
        }
    }
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Node::Statement(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_type_mut(&mut self) -> Option<&mut Type> {
        match self {
            Node::Type(t) => Some(t),
            _ => None,
        }
    }
    pub fn as_value_mut(&mut self) -> Option<&mut Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_statement_mut(&mut self) -> Option<&mut Statement> {
        match self {
            Node::Statement(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_declaration_mut(&mut self) -> Option<&mut Declaration> {
        match self {
            Node::Declaration(d) => Some(d),
            _ => None,
        }
    }
}

/// Structural equality over a sequence, with length compared first.
pub fn compare_node_sequences(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.compare(y))
}

pub fn clone_node_sequence(nodes: &[Node]) -> Vec<Node> {
    nodes.iter().map(Node::deep_clone).collect()
}

/// Downcasts a generic `Node` to one of its family types. Returns `None` when
/// the node belongs to a different family; this is the only sanctioned way to
/// narrow a `Node`, mirroring `BaseNode::try_cast` in the source model this
/// tree is built from.
pub trait TryCast<'a>: Sized {
    fn try_cast(node: &'a Node) -> Option<Self>;
}

impl<'a> TryCast<'a> for &'a Type {
    fn try_cast(node: &'a Node) -> Option<Self> {
        node.as_type()
    }
}
impl<'a> TryCast<'a> for &'a Value {
    fn try_cast(node: &'a Node) -> Option<Self> {
        node.as_value()
    }
}
impl<'a> TryCast<'a> for &'a Statement {
    fn try_cast(node: &'a Node) -> Option<Self> {
        node.as_statement()
    }
}
impl<'a> TryCast<'a> for &'a Declaration {
    fn try_cast(node: &'a Node) -> Option<Self> {
        node.as_declaration()
    }
}

pub fn try_cast<'a, T: TryCast<'a>>(node: &'a Node) -> Option<T> {
    T::try_cast(node)
}
