//! Type-node variants: the substrate component (§4.F). Predicates used by
//! type logic and the semantic handlers live here alongside the data they
//! inspect.
//!
//! Nested types are stored as boxed `Node`s, the same uniform child slot
//! every other family uses, so the traversal engine can enter/leave/replace
//! them like any other node. Call sites narrow back to `&Type` with
//! `as_type()`; a mismatch there is an internal-tree-shape bug, not a user
//! error, since only `Type::*` constructors ever populate these fields.

use forge_core::SourceRange;

use crate::ids::DeclId;
use crate::node::{
    Envelope, Node, TYPE_BASIC, TYPE_FUNCTION, TYPE_STRUCTURED, TYPE_SYMBOL, TYPE_UNARY,
    TYPE_WITH_BIT_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicKind {
    Bool,
    Void,
    Isize,
    Usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitWidthKind {
    SignedInt,
    UnsignedInt,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredKind {
    Struct,
    Interface,
}

#[derive(Debug, Clone)]
pub struct TypeBasic {
    pub envelope: Envelope,
    pub is_const: bool,
    pub kind: BasicKind,
}

#[derive(Debug, Clone)]
pub struct TypeWithBitWidth {
    pub envelope: Envelope,
    pub is_const: bool,
    pub kind: BitWidthKind,
    pub bit_width: u32,
}

#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub envelope: Envelope,
    pub is_const: bool,
    pub name: String,
    pub referenced: Option<DeclId>,
}

#[derive(Debug, Clone)]
pub struct TypeUnary {
    pub envelope: Envelope,
    pub is_const: bool,
    pub operand_type: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct TypeFunction {
    pub envelope: Envelope,
    pub is_const: bool,
    pub return_type: Box<Node>,
    pub arg_types: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct StructMember {
    pub name: String,
    pub member_type: Node,
}

#[derive(Debug, Clone)]
pub struct TypeStructured {
    pub envelope: Envelope,
    pub is_const: bool,
    pub kind: StructuredKind,
    pub members: Vec<StructMember>,
    pub inherits: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Type {
    Basic(TypeBasic),
    WithBitWidth(TypeWithBitWidth),
    Symbol(TypeSymbol),
    Unary(TypeUnary),
    Function(TypeFunction),
    Structured(TypeStructured),
}

pub type TypeNode = Type;

fn as_type(n: &Node) -> &Type {
    n.as_type()
        .expect("type child slot must hold a Type node")
}
fn as_type_mut(n: &mut Node) -> &mut Type {
    match n {
        Node::Type(t) => t,
        _ => panic!("type child slot must hold a Type node"),
    }
}

impl Type {
    pub fn basic(kind: BasicKind, range: SourceRange) -> Type {
        Type::Basic(TypeBasic {
            envelope: Envelope::new(&TYPE_BASIC, range),
            is_const: false,
            kind,
        })
    }

    pub fn with_bit_width(kind: BitWidthKind, bit_width: u32, range: SourceRange) -> Type {
        Type::WithBitWidth(TypeWithBitWidth {
            envelope: Envelope::new(&TYPE_WITH_BIT_WIDTH, range),
            is_const: false,
            kind,
            bit_width,
        })
    }

    pub fn symbol(name: impl Into<String>, range: SourceRange) -> Type {
        Type::Symbol(TypeSymbol {
            envelope: Envelope::new(&TYPE_SYMBOL, range),
            is_const: false,
            name: name.into(),
            referenced: None,
        })
    }

    pub fn pointer(operand_type: Type, range: SourceRange) -> Type {
        Type::Unary(TypeUnary {
            envelope: Envelope::new(&TYPE_UNARY, range),
            is_const: false,
            operand_type: Box::new(Node::Type(operand_type)),
        })
    }

    pub fn function(return_type: Type, arg_types: Vec<Type>, range: SourceRange) -> Type {
        Type::Function(TypeFunction {
            envelope: Envelope::new(&TYPE_FUNCTION, range),
            is_const: false,
            return_type: Box::new(Node::Type(return_type)),
            arg_types: arg_types.into_iter().map(Node::Type).collect(),
        })
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Type::Basic(t) => &t.envelope,
            Type::WithBitWidth(t) => &t.envelope,
            Type::Symbol(t) => &t.envelope,
            Type::Unary(t) => &t.envelope,
            Type::Function(t) => &t.envelope,
            Type::Structured(t) => &t.envelope,
        }
    }

    pub fn is_const(&self) -> bool {
        match self {
            Type::Basic(t) => t.is_const,
            Type::WithBitWidth(t) => t.is_const,
            Type::Symbol(t) => t.is_const,
            Type::Unary(t) => t.is_const,
            Type::Function(t) => t.is_const,
            Type::Structured(t) => t.is_const,
        }
    }

    pub fn operand_type(&self) -> Option<&Type> {
        match self {
            Type::Unary(t) => Some(as_type(&t.operand_type)),
            _ => None,
        }
    }

    pub fn compare(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Basic(a), Type::Basic(b)) => a.kind == b.kind,
            (Type::WithBitWidth(a), Type::WithBitWidth(b)) => {
                a.kind == b.kind && a.bit_width == b.bit_width
            }
            (Type::Symbol(a), Type::Symbol(b)) => a.name == b.name,
            (Type::Unary(a), Type::Unary(b)) => {
                as_type(&a.operand_type).compare(as_type(&b.operand_type))
            }
            (Type::Function(a), Type::Function(b)) => {
                as_type(&a.return_type).compare(as_type(&b.return_type))
                    && a.arg_types.len() == b.arg_types.len()
                    && a.arg_types
                        .iter()
                        .zip(&b.arg_types)
                        .all(|(x, y)| as_type(x).compare(as_type(y)))
            }
            (Type::Structured(a), Type::Structured(b)) => {
                a.kind == b.kind
                    && a.members.len() == b.members.len()
                    && a.members.iter().zip(&b.members).all(|(x, y)| {
                        x.name == y.name
                            && as_type(&x.member_type).compare(as_type(&y.member_type))
                    })
                    && a.inherits == b.inherits
            }
            _ => false,
        }
    }

    pub fn deep_clone(&self) -> Type {
        match self {
            Type::Basic(t) => Type::Basic(t.clone()),
            Type::WithBitWidth(t) => Type::WithBitWidth(t.clone()),
            Type::Symbol(t) => Type::Symbol(t.clone()),
            Type::Unary(t) => Type::Unary(TypeUnary {
                envelope: t.envelope.clone(),
                is_const: t.is_const,
                operand_type: Box::new(t.operand_type.deep_clone()),
            }),
            Type::Function(t) => Type::Function(TypeFunction {
                envelope: t.envelope.clone(),
                is_const: t.is_const,
                return_type: Box::new(t.return_type.deep_clone()),
                arg_types: t.arg_types.iter().map(Node::deep_clone).collect(),
            }),
            Type::Structured(t) => Type::Structured(TypeStructured {
                envelope: t.envelope.clone(),
                is_const: t.is_const,
                kind: t.kind,
                members: t
                    .members
                    .iter()
                    .map(|m| StructMember {
                        name: m.name.clone(),
                        member_type: m.member_type.deep_clone(),
                    })
                    .collect(),
                inherits: t.inherits.clone(),
            }),
        }
    }

    pub fn for_each_direct_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        match self {
            Type::Unary(t) => f(&t.operand_type),
            Type::Function(t) => {
                f(&t.return_type);
                for a in &t.arg_types {
                    f(a);
                }
            }
            Type::Structured(t) => {
                for m in &t.members {
                    f(&m.member_type);
                }
            }
            _ => {}
        }
    }

    pub fn for_each_direct_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        match self {
            Type::Unary(t) => f(&mut t.operand_type),
            Type::Function(t) => {
                f(&mut t.return_type);
                for a in &mut t.arg_types {
                    f(a);
                }
            }
            Type::Structured(t) => {
                for m in &mut t.members {
                    f(&mut m.member_type);
                }
            }
            _ => {}
        }
    }
}

// ---- predicates (§4.F) ----

pub fn is_void(t: &Type) -> bool {
    matches!(t, Type::Basic(b) if b.kind == BasicKind::Void)
}

pub fn is_bool(t: &Type) -> bool {
    matches!(t, Type::Basic(b) if b.kind == BasicKind::Bool)
}

pub fn is_integer(t: &Type) -> bool {
    matches!(
        t,
        Type::WithBitWidth(w) if matches!(w.kind, BitWidthKind::SignedInt | BitWidthKind::UnsignedInt)
    ) || matches!(t, Type::Basic(b) if matches!(b.kind, BasicKind::Isize | BasicKind::Usize))
}

pub fn is_float(t: &Type) -> bool {
    matches!(t, Type::WithBitWidth(w) if w.kind == BitWidthKind::Float)
}

pub fn is_number(t: &Type) -> bool {
    is_integer(t) || is_float(t)
}

pub fn is_pointer(t: &Type) -> bool {
    matches!(t, Type::Unary(_))
}

pub fn is_function(t: &Type) -> bool {
    matches!(t, Type::Function(_))
}

/// `Some(true)` signed, `Some(false)` unsigned, `None` if not an integer.
pub fn signedness(t: &Type) -> Option<bool> {
    match t {
        Type::WithBitWidth(w) => match w.kind {
            BitWidthKind::SignedInt => Some(true),
            BitWidthKind::UnsignedInt => Some(false),
            BitWidthKind::Float => None,
        },
        Type::Basic(b) => match b.kind {
            BasicKind::Isize => Some(true),
            BasicKind::Usize => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// `isize`/`usize` take their width from the codegen context's pointer size.
pub fn number_bit_width(t: &Type, pointer_bit_width: u32) -> Option<u32> {
    match t {
        Type::WithBitWidth(w) => Some(w.bit_width),
        Type::Basic(b) if matches!(b.kind, BasicKind::Isize | BasicKind::Usize) => {
            Some(pointer_bit_width)
        }
        _ => None,
    }
}

pub fn pointer_element(t: &Type) -> Option<&Type> {
    match t {
        Type::Unary(u) => Some(as_type(&u.operand_type)),
        _ => None,
    }
}

pub fn function_return_type(t: &Type) -> Option<&Type> {
    match t {
        Type::Function(f) => Some(as_type(&f.return_type)),
        _ => None,
    }
}

pub fn function_arg_types(t: &Type) -> Option<Vec<&Type>> {
    match t {
        Type::Function(f) => Some(f.arg_types.iter().map(as_type).collect()),
        _ => None,
    }
}

pub fn compare_nodes_option(a: Option<&Type>, b: Option<&Type>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.compare(b),
        _ => false,
    }
}

pub fn compare_type_sequences(a: &[Type], b: &[Type]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.compare(y))
}

#[allow(dead_code)]
fn _use_mut_helper(n: &mut Node) -> &mut Type {
    as_type_mut(n)
}
