//! Value-node variants (§3 *Values*).

use forge_core::SourceRange;

use crate::ids::DeclId;
use crate::node::{
    Envelope, Node, VALUE_BINARY, VALUE_CALL, VALUE_CAST, VALUE_LITERAL_BOOL,
    VALUE_LITERAL_NUMBER, VALUE_SYMBOL, VALUE_UNARY,
};
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl NumberLiteral {
    /// The type a numeric literal carries by construction — its tag fixes
    /// kind and bit-width, so no inference is needed.
    pub fn declared_type(&self, range: SourceRange) -> Type {
        use crate::types::BitWidthKind;
        match self {
            NumberLiteral::I8(_) => Type::with_bit_width(BitWidthKind::SignedInt, 8, range),
            NumberLiteral::I16(_) => Type::with_bit_width(BitWidthKind::SignedInt, 16, range),
            NumberLiteral::I32(_) => Type::with_bit_width(BitWidthKind::SignedInt, 32, range),
            NumberLiteral::I64(_) => Type::with_bit_width(BitWidthKind::SignedInt, 64, range),
            NumberLiteral::U8(_) => Type::with_bit_width(BitWidthKind::UnsignedInt, 8, range),
            NumberLiteral::U16(_) => Type::with_bit_width(BitWidthKind::UnsignedInt, 16, range),
            NumberLiteral::U32(_) => Type::with_bit_width(BitWidthKind::UnsignedInt, 32, range),
            NumberLiteral::U64(_) => Type::with_bit_width(BitWidthKind::UnsignedInt, 64, range),
            NumberLiteral::F32(_) => Type::with_bit_width(BitWidthKind::Float, 32, range),
            NumberLiteral::F64(_) => Type::with_bit_width(BitWidthKind::Float, 64, range),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    BoolNot,
    BitNot,
    Pos,
    Neg,
    Deref,
    GetAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    Assign,
    MemberAccess,
}

impl BinaryOp {
    pub fn is_boolean(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::RemAssign
                | BinaryOp::BitAndAssign
                | BinaryOp::BitOrAssign
                | BinaryOp::BitXorAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
        )
    }
    pub fn is_assign(self) -> bool {
        self == BinaryOp::Assign
    }
    pub fn is_member_access(self) -> bool {
        self == BinaryOp::MemberAccess
    }
    /// Arithmetic or bitwise, excluding the assignment-family operators.
    pub fn is_arithmetic_or_bitwise(self) -> bool {
        !self.is_boolean()
            && !self.is_comparison()
            && !self.is_compound_assign()
            && !self.is_assign()
            && !self.is_member_access()
    }
}

#[derive(Debug, Clone)]
pub struct LiteralBool {
    pub envelope: Envelope,
    pub value: bool,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct LiteralNumber {
    pub envelope: Envelope,
    pub value: NumberLiteral,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct SymbolValue {
    pub envelope: Envelope,
    pub name: String,
    pub referenced: Option<DeclId>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct UnaryValue {
    pub envelope: Envelope,
    pub op: UnaryOp,
    pub operand: Box<Node>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct BinaryValue {
    pub envelope: Envelope,
    pub op: BinaryOp,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct CallValue {
    pub envelope: Envelope,
    pub callee: Box<Node>,
    pub args: Vec<Node>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct CastValue {
    pub envelope: Envelope,
    pub value: Box<Node>,
    pub target_type: Box<Node>,
    pub is_implicit: bool,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub enum Value {
    LiteralBool(LiteralBool),
    LiteralNumber(LiteralNumber),
    Symbol(SymbolValue),
    Unary(UnaryValue),
    Binary(BinaryValue),
    Call(CallValue),
    Cast(CastValue),
}

pub type ValueNode = Value;

fn as_value(n: &Node) -> &Value {
    n.as_value().expect("value child slot must hold a Value node")
}
fn as_type(n: &Node) -> &Type {
    n.as_type().expect("type child slot must hold a Type node")
}

impl Value {
    pub fn literal_bool(value: bool, range: SourceRange) -> Value {
        Value::LiteralBool(LiteralBool {
            envelope: Envelope::new(&VALUE_LITERAL_BOOL, range),
            value,
            resolved_type: None,
        })
    }

    pub fn literal_number(value: NumberLiteral, range: SourceRange) -> Value {
        Value::LiteralNumber(LiteralNumber {
            envelope: Envelope::new(&VALUE_LITERAL_NUMBER, range),
            value,
            resolved_type: None,
        })
    }

    pub fn symbol(name: impl Into<String>, range: SourceRange) -> Value {
        Value::Symbol(SymbolValue {
            envelope: Envelope::new(&VALUE_SYMBOL, range),
            name: name.into(),
            referenced: None,
            resolved_type: None,
        })
    }

    pub fn unary(op: UnaryOp, operand: Value, range: SourceRange) -> Value {
        Value::Unary(UnaryValue {
            envelope: Envelope::new(&VALUE_UNARY, range),
            op,
            operand: Box::new(Node::Value(operand)),
            resolved_type: None,
        })
    }

    pub fn binary(op: BinaryOp, lhs: Value, rhs: Value, range: SourceRange) -> Value {
        Value::Binary(BinaryValue {
            envelope: Envelope::new(&VALUE_BINARY, range),
            op,
            lhs: Box::new(Node::Value(lhs)),
            rhs: Box::new(Node::Value(rhs)),
            resolved_type: None,
        })
    }

    pub fn call(callee: Value, args: Vec<Value>, range: SourceRange) -> Value {
        Value::Call(CallValue {
            envelope: Envelope::new(&VALUE_CALL, range),
            callee: Box::new(Node::Value(callee)),
            args: args.into_iter().map(Node::Value).collect(),
            resolved_type: None,
        })
    }

    pub fn cast(value: Value, target_type: Type, is_implicit: bool, range: SourceRange) -> Value {
        Value::Cast(CastValue {
            envelope: Envelope::new(&VALUE_CAST, range),
            value: Box::new(Node::Value(value)),
            target_type: Box::new(Node::Type(target_type)),
            is_implicit,
            resolved_type: None,
        })
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Value::LiteralBool(v) => &v.envelope,
            Value::LiteralNumber(v) => &v.envelope,
            Value::Symbol(v) => &v.envelope,
            Value::Unary(v) => &v.envelope,
            Value::Binary(v) => &v.envelope,
            Value::Call(v) => &v.envelope,
            Value::Cast(v) => &v.envelope,
        }
    }

    pub fn resolved_type(&self) -> Option<&Type> {
        match self {
            Value::LiteralBool(v) => v.resolved_type.as_ref(),
            Value::LiteralNumber(v) => v.resolved_type.as_ref(),
            Value::Symbol(v) => v.resolved_type.as_ref(),
            Value::Unary(v) => v.resolved_type.as_ref(),
            Value::Binary(v) => v.resolved_type.as_ref(),
            Value::Call(v) => v.resolved_type.as_ref(),
            Value::Cast(v) => v.resolved_type.as_ref(),
        }
    }

    pub fn set_resolved_type(&mut self, ty: Option<Type>) {
        match self {
            Value::LiteralBool(v) => v.resolved_type = ty,
            Value::LiteralNumber(v) => v.resolved_type = ty,
            Value::Symbol(v) => v.resolved_type = ty,
            Value::Unary(v) => v.resolved_type = ty,
            Value::Binary(v) => v.resolved_type = ty,
            Value::Call(v) => v.resolved_type = ty,
            Value::Cast(v) => v.resolved_type = ty,
        }
    }

    pub fn cast_target_type(&self) -> Option<&Type> {
        match self {
            Value::Cast(v) => Some(as_type(&v.target_type)),
            _ => None,
        }
    }

    pub fn operand(&self) -> Option<&Value> {
        match self {
            Value::Unary(v) => Some(as_value(&v.operand)),
            Value::Cast(v) => Some(as_value(&v.value)),
            _ => None,
        }
    }

    pub fn binary_operands(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Binary(v) => Some((as_value(&v.lhs), as_value(&v.rhs))),
            _ => None,
        }
    }

    pub fn callee(&self) -> Option<&Value> {
        match self {
            Value::Call(v) => Some(as_value(&v.callee)),
            _ => None,
        }
    }

    pub fn call_args(&self) -> Option<Vec<&Value>> {
        match self {
            Value::Call(v) => Some(v.args.iter().map(as_value).collect()),
            _ => None,
        }
    }

    pub fn compare(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::LiteralBool(a), Value::LiteralBool(b)) => a.value == b.value,
            (Value::LiteralNumber(a), Value::LiteralNumber(b)) => a.value == b.value,
            (Value::Symbol(a), Value::Symbol(b)) => a.name == b.name,
            (Value::Unary(a), Value::Unary(b)) => {
                a.op == b.op && as_value(&a.operand).compare(as_value(&b.operand))
            }
            (Value::Binary(a), Value::Binary(b)) => {
                a.op == b.op
                    && as_value(&a.lhs).compare(as_value(&b.lhs))
                    && as_value(&a.rhs).compare(as_value(&b.rhs))
            }
            (Value::Call(a), Value::Call(b)) => {
                as_value(&a.callee).compare(as_value(&b.callee))
                    && a.args.len() == b.args.len()
                    && a.args
                        .iter()
                        .zip(&b.args)
                        .all(|(x, y)| as_value(x).compare(as_value(y)))
            }
            (Value::Cast(a), Value::Cast(b)) => {
                as_value(&a.value).compare(as_value(&b.value))
                    && as_type(&a.target_type).compare(as_type(&b.target_type))
            }
            _ => false,
        }
    }

    pub fn deep_clone(&self) -> Value {
        match self {
            Value::LiteralBool(v) => Value::LiteralBool(v.clone()),
            Value::LiteralNumber(v) => Value::LiteralNumber(v.clone()),
            Value::Symbol(v) => Value::Symbol(v.clone()),
            Value::Unary(v) => Value::Unary(UnaryValue {
                envelope: v.envelope.clone(),
                op: v.op,
                operand: Box::new(v.operand.deep_clone()),
                resolved_type: v.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Value::Binary(v) => Value::Binary(BinaryValue {
                envelope: v.envelope.clone(),
                op: v.op,
                lhs: Box::new(v.lhs.deep_clone()),
                rhs: Box::new(v.rhs.deep_clone()),
                resolved_type: v.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Value::Call(v) => Value::Call(CallValue {
                envelope: v.envelope.clone(),
                callee: Box::new(v.callee.deep_clone()),
                args: v.args.iter().map(Node::deep_clone).collect(),
                resolved_type: v.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Value::Cast(v) => Value::Cast(CastValue {
                envelope: v.envelope.clone(),
                value: Box::new(v.value.deep_clone()),
                target_type: Box::new(v.target_type.deep_clone()),
                is_implicit: v.is_implicit,
                resolved_type: v.resolved_type.as_ref().map(Type::deep_clone),
            }),
        }
    }

    pub fn for_each_direct_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        match self {
            Value::Unary(v) => f(&v.operand),
            Value::Binary(v) => {
                f(&v.lhs);
                f(&v.rhs);
            }
            Value::Call(v) => {
                f(&v.callee);
                for a in &v.args {
                    f(a);
                }
            }
            Value::Cast(v) => {
                f(&v.value);
                f(&v.target_type);
            }
            _ => {}
        }
    }

    pub fn for_each_direct_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        match self {
            Value::Unary(v) => f(&mut v.operand),
            Value::Binary(v) => {
                f(&mut v.lhs);
                f(&mut v.rhs);
            }
            Value::Call(v) => {
                f(&mut v.callee);
                for a in &mut v.args {
                    f(a);
                }
            }
            Value::Cast(v) => {
                f(&mut v.value);
                f(&mut v.target_type);
            }
            _ => {}
        }
    }
}
