//! Statement-node variants (§3 *Statements*).

use forge_core::SourceRange;

use crate::node::{
    Envelope, Node, STMT_BLOCK, STMT_BREAK, STMT_CONTINUE, STMT_DECLARATION, STMT_EXPRESSION,
    STMT_IF, STMT_RETURN, STMT_WHILE,
};

#[derive(Debug, Clone)]
pub struct Basic {
    pub envelope: Envelope,
}

#[derive(Debug, Clone)]
pub struct ValueStatement {
    pub envelope: Envelope,
    pub value: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct DeclarationStatement {
    pub envelope: Envelope,
    pub declaration: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub envelope: Envelope,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub envelope: Envelope,
    pub condition: Box<Node>,
    pub then_block: Box<Node>,
    /// An `else if` chain is an `else` whose body is another `If` statement.
    pub else_stmt: Option<Box<Node>>,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub envelope: Envelope,
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub is_do_while: bool,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Continue(Basic),
    Break(Basic),
    ReturnVoid(Basic),
    Execute(ValueStatement),
    Return(ValueStatement),
    Declaration(DeclarationStatement),
    Block(BlockStatement),
    If(IfStatement),
    While(WhileStatement),
}

pub type StatementNode = Statement;

fn as_statement(n: &Node) -> &Statement {
    n.as_statement()
        .expect("statement child slot must hold a Statement node")
}
fn as_value(n: &Node) -> &crate::values::Value {
    n.as_value().expect("value child slot must hold a Value node")
}

impl Statement {
    pub fn continue_(range: SourceRange) -> Statement {
        Statement::Continue(Basic {
            envelope: Envelope::new(&STMT_CONTINUE, range),
        })
    }
    pub fn break_(range: SourceRange) -> Statement {
        Statement::Break(Basic {
            envelope: Envelope::new(&STMT_BREAK, range),
        })
    }
    pub fn return_void(range: SourceRange) -> Statement {
        Statement::ReturnVoid(Basic {
            envelope: Envelope::new(&STMT_RETURN, range),
        })
    }
    pub fn execute(value: crate::values::Value, range: SourceRange) -> Statement {
        Statement::Execute(ValueStatement {
            envelope: Envelope::new(&STMT_EXPRESSION, range),
            value: Box::new(Node::Value(value)),
        })
    }
    pub fn return_value(value: crate::values::Value, range: SourceRange) -> Statement {
        Statement::Return(ValueStatement {
            envelope: Envelope::new(&STMT_RETURN, range),
            value: Box::new(Node::Value(value)),
        })
    }
    pub fn declaration(declaration: crate::declarations::Declaration, range: SourceRange) -> Statement {
        Statement::Declaration(DeclarationStatement {
            envelope: Envelope::new(&STMT_DECLARATION, range),
            declaration: Box::new(Node::Declaration(declaration)),
        })
    }
    pub fn block(statements: Vec<Statement>, range: SourceRange) -> Statement {
        Statement::Block(BlockStatement {
            envelope: Envelope::new(&STMT_BLOCK, range),
            statements: statements.into_iter().map(Node::Statement).collect(),
        })
    }
    pub fn if_(
        condition: crate::values::Value,
        then_block: Statement,
        else_stmt: Option<Statement>,
        range: SourceRange,
    ) -> Statement {
        Statement::If(IfStatement {
            envelope: Envelope::new(&STMT_IF, range),
            condition: Box::new(Node::Value(condition)),
            then_block: Box::new(Node::Statement(then_block)),
            else_stmt: else_stmt.map(|s| Box::new(Node::Statement(s))),
        })
    }
    pub fn while_(
        condition: crate::values::Value,
        body: Statement,
        is_do_while: bool,
        range: SourceRange,
    ) -> Statement {
        Statement::While(WhileStatement {
            envelope: Envelope::new(&STMT_WHILE, range),
            condition: Box::new(Node::Value(condition)),
            body: Box::new(Node::Statement(body)),
            is_do_while,
        })
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Statement::Continue(s) | Statement::Break(s) | Statement::ReturnVoid(s) => &s.envelope,
            Statement::Execute(s) | Statement::Return(s) => &s.envelope,
            Statement::Declaration(s) => &s.envelope,
            Statement::Block(s) => &s.envelope,
            Statement::If(s) => &s.envelope,
            Statement::While(s) => &s.envelope,
        }
    }

    pub fn value(&self) -> Option<&crate::values::Value> {
        match self {
            Statement::Execute(s) | Statement::Return(s) => Some(as_value(&s.value)),
            _ => None,
        }
    }

    pub fn block_statements(&self) -> Option<Vec<&Statement>> {
        match self {
            Statement::Block(s) => Some(s.statements.iter().map(as_statement).collect()),
            _ => None,
        }
    }

    pub fn if_parts(&self) -> Option<(&crate::values::Value, &Statement, Option<&Statement>)> {
        match self {
            Statement::If(s) => Some((
                as_value(&s.condition),
                as_statement(&s.then_block),
                s.else_stmt.as_deref().map(as_statement),
            )),
            _ => None,
        }
    }

    pub fn while_parts(&self) -> Option<(&crate::values::Value, &Statement, bool)> {
        match self {
            Statement::While(s) => {
                Some((as_value(&s.condition), as_statement(&s.body), s.is_do_while))
            }
            _ => None,
        }
    }

    pub fn compare(&self, other: &Statement) -> bool {
        match (self, other) {
            (Statement::Continue(_), Statement::Continue(_)) => true,
            (Statement::Break(_), Statement::Break(_)) => true,
            (Statement::ReturnVoid(_), Statement::ReturnVoid(_)) => true,
            (Statement::Execute(a), Statement::Execute(b)) => {
                as_value(&a.value).compare(as_value(&b.value))
            }
            (Statement::Return(a), Statement::Return(b)) => {
                as_value(&a.value).compare(as_value(&b.value))
            }
            (Statement::Declaration(a), Statement::Declaration(b)) => a
                .declaration
                .as_declaration()
                .unwrap()
                .compare(b.declaration.as_declaration().unwrap()),
            (Statement::Block(a), Statement::Block(b)) => {
                a.statements.len() == b.statements.len()
                    && a.statements
                        .iter()
                        .zip(&b.statements)
                        .all(|(x, y)| as_statement(x).compare(as_statement(y)))
            }
            (Statement::If(a), Statement::If(b)) => {
                as_value(&a.condition).compare(as_value(&b.condition))
                    && as_statement(&a.then_block).compare(as_statement(&b.then_block))
                    && match (&a.else_stmt, &b.else_stmt) {
                        (None, None) => true,
                        (Some(x), Some(y)) => {
                            as_statement(x).compare(as_statement(y))
                        }
                        _ => false,
                    }
            }
            (Statement::While(a), Statement::While(b)) => {
                a.is_do_while == b.is_do_while
                    && as_value(&a.condition).compare(as_value(&b.condition))
                    && as_statement(&a.body).compare(as_statement(&b.body))
            }
            _ => false,
        }
    }

    pub fn deep_clone(&self) -> Statement {
        match self {
            Statement::Continue(s) => Statement::Continue(s.clone()),
            Statement::Break(s) => Statement::Break(s.clone()),
            Statement::ReturnVoid(s) => Statement::ReturnVoid(s.clone()),
            Statement::Execute(s) => Statement::Execute(ValueStatement {
                envelope: s.envelope.clone(),
                value: Box::new(s.value.deep_clone()),
            }),
            Statement::Return(s) => Statement::Return(ValueStatement {
                envelope: s.envelope.clone(),
                value: Box::new(s.value.deep_clone()),
            }),
            Statement::Declaration(s) => Statement::Declaration(DeclarationStatement {
                envelope: s.envelope.clone(),
                declaration: Box::new(s.declaration.deep_clone()),
            }),
            Statement::Block(s) => Statement::Block(BlockStatement {
                envelope: s.envelope.clone(),
                statements: s.statements.iter().map(Node::deep_clone).collect(),
            }),
            Statement::If(s) => Statement::If(IfStatement {
                envelope: s.envelope.clone(),
                condition: Box::new(s.condition.deep_clone()),
                then_block: Box::new(s.then_block.deep_clone()),
                else_stmt: s.else_stmt.as_ref().map(|e| Box::new(e.deep_clone())),
            }),
            Statement::While(s) => Statement::While(WhileStatement {
                envelope: s.envelope.clone(),
                condition: Box::new(s.condition.deep_clone()),
                body: Box::new(s.body.deep_clone()),
                is_do_while: s.is_do_while,
            }),
        }
    }

    pub fn for_each_direct_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        match self {
            Statement::Continue(_) | Statement::Break(_) | Statement::ReturnVoid(_) => {}
            Statement::Execute(s) | Statement::Return(s) => f(&s.value),
            Statement::Declaration(s) => f(&s.declaration),
            Statement::Block(s) => {
                for stmt in &s.statements {
                    f(stmt);
                }
            }
            Statement::If(s) => {
                f(&s.condition);
                f(&s.then_block);
                if let Some(e) = &s.else_stmt {
                    f(e);
                }
            }
            Statement::While(s) => {
                f(&s.condition);
                f(&s.body);
            }
        }
    }

    pub fn for_each_direct_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        match self {
            Statement::Continue(_) | Statement::Break(_) | Statement::ReturnVoid(_) => {}
            Statement::Execute(s) | Statement::Return(s) => f(&mut s.value),
            Statement::Declaration(s) => f(&mut s.declaration),
            Statement::Block(s) => {
                for stmt in &mut s.statements {
                    f(stmt);
                }
            }
            Statement::If(s) => {
                f(&mut s.condition);
                f(&mut s.then_block);
                if let Some(e) = &mut s.else_stmt {
                    f(e);
                }
            }
            Statement::While(s) => {
                f(&mut s.condition);
                f(&mut s.body);
            }
        }
    }
}
