//! Declaration-node variants (§3 *Declarations*).

use std::cell::Cell;

use forge_core::SourceRange;

use crate::ids::DeclId;
use crate::node::{
    Envelope, Node, DECL_FUNCTION, DECL_NAMESPACE, DECL_STRUCTURED_TYPE, DECL_TYPE_ALIAS,
    DECL_VARIABLE,
};
use crate::types::{StructuredKind, Type};
use crate::values::Value;

/// Opaque handle codegen assigns to a declaration once it has lowered it.
/// Never dereferenced by the core; only ever handed back to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendHandle(pub u64);

fn as_type(n: &Node) -> &Type {
    n.as_type().expect("type child slot must hold a Type node")
}
fn as_value(n: &Node) -> &Value {
    n.as_value().expect("value child slot must hold a Value node")
}
fn as_declaration(n: &Node) -> &Declaration {
    n.as_declaration()
        .expect("declaration child slot must hold a Declaration node")
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub envelope: Envelope,
    pub id: DeclId,
    pub name: String,
    pub declared_type: Box<Node>,
    pub initial_value: Option<Box<Node>>,
    pub is_const: bool,
    pub backend_handle: Cell<Option<BackendHandle>>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub envelope: Envelope,
    pub id: DeclId,
    pub name: String,
    pub args: Vec<Node>,
    pub return_type: Box<Node>,
    pub body: Box<Node>,
    pub backend_handle: Cell<Option<BackendHandle>>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub envelope: Envelope,
    pub id: DeclId,
    pub name: String,
    pub aliased_type: Box<Node>,
    pub is_explicit: bool,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct StructuredTypeDecl {
    pub envelope: Envelope,
    pub id: DeclId,
    pub name: String,
    pub kind: StructuredKind,
    pub members: Vec<Node>,
    pub inherits: Vec<String>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub envelope: Envelope,
    pub id: DeclId,
    pub name: String,
    pub members: Vec<Node>,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(VariableDecl),
    Function(FunctionDecl),
    TypeAlias(TypeAliasDecl),
    StructuredType(StructuredTypeDecl),
    Namespace(NamespaceDecl),
}

pub type DeclarationNode = Declaration;

impl Declaration {
    pub fn variable(
        name: impl Into<String>,
        declared_type: Type,
        initial_value: Option<Value>,
        is_const: bool,
        range: SourceRange,
    ) -> Declaration {
        Declaration::Variable(VariableDecl {
            envelope: Envelope::new(&DECL_VARIABLE, range),
            id: DeclId::fresh(),
            name: name.into(),
            declared_type: Box::new(Node::Type(declared_type)),
            initial_value: initial_value.map(|v| Box::new(Node::Value(v))),
            is_const,
            backend_handle: Cell::new(None),
            resolved_type: None,
        })
    }

    pub fn function(
        name: impl Into<String>,
        args: Vec<Declaration>,
        return_type: Type,
        body: crate::statements::Statement,
        range: SourceRange,
    ) -> Declaration {
        Declaration::Function(FunctionDecl {
            envelope: Envelope::new(&DECL_FUNCTION, range),
            id: DeclId::fresh(),
            name: name.into(),
            args: args.into_iter().map(Node::Declaration).collect(),
            return_type: Box::new(Node::Type(return_type)),
            body: Box::new(Node::Statement(body)),
            backend_handle: Cell::new(None),
            resolved_type: None,
        })
    }

    pub fn type_alias(
        name: impl Into<String>,
        aliased_type: Type,
        is_explicit: bool,
        range: SourceRange,
    ) -> Declaration {
        Declaration::TypeAlias(TypeAliasDecl {
            envelope: Envelope::new(&DECL_TYPE_ALIAS, range),
            id: DeclId::fresh(),
            name: name.into(),
            aliased_type: Box::new(Node::Type(aliased_type)),
            is_explicit,
            resolved_type: None,
        })
    }

    pub fn structured_type(
        name: impl Into<String>,
        kind: StructuredKind,
        members: Vec<Declaration>,
        inherits: Vec<String>,
        range: SourceRange,
    ) -> Declaration {
        Declaration::StructuredType(StructuredTypeDecl {
            envelope: Envelope::new(&DECL_STRUCTURED_TYPE, range),
            id: DeclId::fresh(),
            name: name.into(),
            kind,
            members: members.into_iter().map(Node::Declaration).collect(),
            inherits,
            resolved_type: None,
        })
    }

    pub fn namespace(
        name: impl Into<String>,
        members: Vec<Declaration>,
        range: SourceRange,
    ) -> Declaration {
        Declaration::Namespace(NamespaceDecl {
            envelope: Envelope::new(&DECL_NAMESPACE, range),
            id: DeclId::fresh(),
            name: name.into(),
            members: members.into_iter().map(Node::Declaration).collect(),
            resolved_type: None,
        })
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Declaration::Variable(d) => &d.envelope,
            Declaration::Function(d) => &d.envelope,
            Declaration::TypeAlias(d) => &d.envelope,
            Declaration::StructuredType(d) => &d.envelope,
            Declaration::Namespace(d) => &d.envelope,
        }
    }

    pub fn id(&self) -> DeclId {
        match self {
            Declaration::Variable(d) => d.id,
            Declaration::Function(d) => d.id,
            Declaration::TypeAlias(d) => d.id,
            Declaration::StructuredType(d) => d.id,
            Declaration::Namespace(d) => d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable(d) => &d.name,
            Declaration::Function(d) => &d.name,
            Declaration::TypeAlias(d) => &d.name,
            Declaration::StructuredType(d) => &d.name,
            Declaration::Namespace(d) => &d.name,
        }
    }

    pub fn resolved_type(&self) -> Option<&Type> {
        match self {
            Declaration::Variable(d) => d.resolved_type.as_ref(),
            Declaration::Function(d) => d.resolved_type.as_ref(),
            Declaration::TypeAlias(d) => d.resolved_type.as_ref(),
            Declaration::StructuredType(d) => d.resolved_type.as_ref(),
            Declaration::Namespace(d) => d.resolved_type.as_ref(),
        }
    }

    pub fn set_resolved_type(&mut self, ty: Option<Type>) {
        match self {
            Declaration::Variable(d) => d.resolved_type = ty,
            Declaration::Function(d) => d.resolved_type = ty,
            Declaration::TypeAlias(d) => d.resolved_type = ty,
            Declaration::StructuredType(d) => d.resolved_type = ty,
            Declaration::Namespace(d) => d.resolved_type = ty,
        }
    }

    pub fn declared_type(&self) -> Option<&Type> {
        match self {
            Declaration::Variable(d) => Some(as_type(&d.declared_type)),
            _ => None,
        }
    }

    pub fn initial_value(&self) -> Option<&Value> {
        match self {
            Declaration::Variable(d) => d.initial_value.as_deref().map(as_value),
            _ => None,
        }
    }

    pub fn function_args(&self) -> Option<Vec<&Declaration>> {
        match self {
            Declaration::Function(d) => Some(d.args.iter().map(as_declaration).collect()),
            _ => None,
        }
    }

    pub fn function_return_type(&self) -> Option<&Type> {
        match self {
            Declaration::Function(d) => Some(as_type(&d.return_type)),
            _ => None,
        }
    }

    pub fn function_body(&self) -> Option<&crate::statements::Statement> {
        match self {
            Declaration::Function(d) => d.body.as_statement(),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Declaration::Function(_))
    }
    pub fn is_namespace(&self) -> bool {
        matches!(self, Declaration::Namespace(_))
    }
    pub fn is_structured_type(&self) -> bool {
        matches!(self, Declaration::StructuredType(_))
    }

    pub fn structured_members(&self) -> Option<Vec<&Declaration>> {
        match self {
            Declaration::StructuredType(d) => Some(d.members.iter().map(as_declaration).collect()),
            _ => None,
        }
    }

    pub fn compare(&self, other: &Declaration) -> bool {
        match (self, other) {
            (Declaration::Variable(a), Declaration::Variable(b)) => {
                a.name == b.name
                    && a.is_const == b.is_const
                    && as_type(&a.declared_type).compare(as_type(&b.declared_type))
                    && match (&a.initial_value, &b.initial_value) {
                        (None, None) => true,
                        (Some(x), Some(y)) => as_value(x).compare(as_value(y)),
                        _ => false,
                    }
            }
            (Declaration::Function(a), Declaration::Function(b)) => {
                a.name == b.name
                    && as_type(&a.return_type).compare(as_type(&b.return_type))
                    && a.args.len() == b.args.len()
                    && a.args
                        .iter()
                        .zip(&b.args)
                        .all(|(x, y)| as_declaration(x).compare(as_declaration(y)))
                    && a.body
                        .as_statement()
                        .unwrap()
                        .compare(b.body.as_statement().unwrap())
            }
            (Declaration::TypeAlias(a), Declaration::TypeAlias(b)) => {
                a.name == b.name
                    && a.is_explicit == b.is_explicit
                    && as_type(&a.aliased_type).compare(as_type(&b.aliased_type))
            }
            (Declaration::StructuredType(a), Declaration::StructuredType(b)) => {
                a.name == b.name
                    && a.kind == b.kind
                    && a.inherits == b.inherits
                    && a.members.len() == b.members.len()
                    && a.members
                        .iter()
                        .zip(&b.members)
                        .all(|(x, y)| as_declaration(x).compare(as_declaration(y)))
            }
            (Declaration::Namespace(a), Declaration::Namespace(b)) => {
                a.name == b.name
                    && a.members.len() == b.members.len()
                    && a.members
                        .iter()
                        .zip(&b.members)
                        .all(|(x, y)| as_declaration(x).compare(as_declaration(y)))
            }
            _ => false,
        }
    }

    pub fn deep_clone(&self) -> Declaration {
        match self {
            Declaration::Variable(d) => Declaration::Variable(VariableDecl {
                envelope: d.envelope.clone(),
                id: d.id,
                name: d.name.clone(),
                declared_type: Box::new(d.declared_type.deep_clone()),
                initial_value: d.initial_value.as_ref().map(|v| Box::new(v.deep_clone())),
                is_const: d.is_const,
                backend_handle: Cell::new(d.backend_handle.get()),
                resolved_type: d.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Declaration::Function(d) => Declaration::Function(FunctionDecl {
                envelope: d.envelope.clone(),
                id: d.id,
                name: d.name.clone(),
                args: d.args.iter().map(Node::deep_clone).collect(),
                return_type: Box::new(d.return_type.deep_clone()),
                body: Box::new(d.body.deep_clone()),
                backend_handle: Cell::new(d.backend_handle.get()),
                resolved_type: d.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Declaration::TypeAlias(d) => Declaration::TypeAlias(TypeAliasDecl {
                envelope: d.envelope.clone(),
                id: d.id,
                name: d.name.clone(),
                aliased_type: Box::new(d.aliased_type.deep_clone()),
                is_explicit: d.is_explicit,
                resolved_type: d.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Declaration::StructuredType(d) => Declaration::StructuredType(StructuredTypeDecl {
                envelope: d.envelope.clone(),
                id: d.id,
                name: d.name.clone(),
                kind: d.kind,
                members: d.members.iter().map(Node::deep_clone).collect(),
                inherits: d.inherits.clone(),
                resolved_type: d.resolved_type.as_ref().map(Type::deep_clone),
            }),
            Declaration::Namespace(d) => Declaration::Namespace(NamespaceDecl {
                envelope: d.envelope.clone(),
                id: d.id,
                name: d.name.clone(),
                members: d.members.iter().map(Node::deep_clone).collect(),
                resolved_type: d.resolved_type.as_ref().map(Type::deep_clone),
            }),
        }
    }

    pub fn for_each_direct_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        match self {
            Declaration::Variable(d) => {
                f(&d.declared_type);
                if let Some(v) = &d.initial_value {
                    f(v);
                }
            }
            Declaration::Function(d) => {
                for a in &d.args {
                    f(a);
                }
                f(&d.return_type);
                f(&d.body);
            }
            Declaration::TypeAlias(d) => f(&d.aliased_type),
            Declaration::StructuredType(d) => {
                for m in &d.members {
                    f(m);
                }
            }
            Declaration::Namespace(d) => {
                for m in &d.members {
                    f(m);
                }
            }
        }
    }

    pub fn for_each_direct_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        match self {
            Declaration::Variable(d) => {
                f(&mut d.declared_type);
                if let Some(v) = &mut d.initial_value {
                    f(v);
                }
            }
            Declaration::Function(d) => {
                for a in &mut d.args {
                    f(a);
                }
                f(&mut d.return_type);
                f(&mut d.body);
            }
            Declaration::TypeAlias(d) => f(&mut d.aliased_type),
            Declaration::StructuredType(d) => {
                for m in &mut d.members {
                    f(m);
                }
            }
            Declaration::Namespace(d) => {
                for m in &mut d.members {
                    f(m);
                }
            }
        }
    }
}
