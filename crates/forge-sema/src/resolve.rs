//! `SymbolResolutionHandler` (§4.E). Lazily threads lexical scopes through
//! the traversal stack, handling ordered vs. unordered scopes, shadowing
//! policy, and bi-directional declaration/reference binding.
//!
//! The base `IHandler` trait in `forge-syntax` is node-agnostic and the
//! crate it lives in must not depend on this one, so the scope stack this
//! handler needs lives entirely here, pushed/popped in lockstep with the
//! `on_enter`/`on_leave` calls the `Pass` already delivers — rather than the
//! lazy per-node `try_get_scope()` the interface sketch in §4.E describes,
//! which would require storing a `Scope` on each node itself.

use forge_core::{MessageContext, Severity, SourceRange};
use forge_syntax::{Declaration, IHandler, Input, Node, Output, Type, Value};

use crate::scope::{ScopeFlags, ScopeStack};

pub const UNDECLARED: &str = "ESC001";
pub const REDECLARED: &str = "ESC002";

fn declared_symbol_name(node: &Node) -> Option<&str> {
    node.as_declaration().map(Declaration::name)
}

fn declared_symbol_id(node: &Node) -> Option<forge_syntax::DeclId> {
    node.as_declaration().map(Declaration::id)
}

fn referenced_symbol_name(node: &Node) -> Option<&str> {
    match node {
        Node::Value(Value::Symbol(v)) => Some(&v.name),
        Node::Type(Type::Symbol(t)) => Some(&t.name),
        _ => None,
    }
}

fn resolve_symbol(node: &mut Node, id: forge_syntax::DeclId) {
    match node {
        Node::Value(Value::Symbol(v)) => v.referenced = Some(id),
        Node::Type(Type::Symbol(t)) => t.referenced = Some(id),
        _ => unreachable!("resolve_symbol called on a node with no referenced_symbol_name"),
    }
}

/// Which scope, if any, a node opens for its own children. `None` means the
/// node is not itself a scope boundary (lookups simply continue outward).
fn scope_flags_for(node: &Node) -> Option<ScopeFlags> {
    match node {
        Node::TranslationUnit(_) => Some(ScopeFlags::unordered()),
        Node::Declaration(Declaration::Function(_)) => Some(ScopeFlags::NONE),
        Node::Declaration(Declaration::Namespace(_)) => {
            Some(ScopeFlags::unordered_shadowing_parent())
        }
        // Structured-type members are accessed by name only through member
        // access (deferred, §9 Open Questions) — they are never looked up
        // as bare identifiers, so a struct/interface body is not a scope.
        Node::Declaration(Declaration::StructuredType(_)) => None,
        Node::Statement(forge_syntax::Statement::Block(_)) => Some(ScopeFlags {
            allow_shadowing_parent_scope: true,
            ..ScopeFlags::NONE
        }),
        _ => None,
    }
}

/// The direct-child declarations of a scope-bearing node, for the
/// unordered-scope pre-pass. Mirrors `for_each_direct_child` filtered by
/// declarer-ness, per §4.E step 2. Returned as owned tuples so the borrow
/// of `node` ends here, before the caller needs to touch the message sink.
fn direct_child_declarations(node: &Node) -> Vec<(String, forge_syntax::DeclId, SourceRange)> {
    let mut out = Vec::new();
    node.for_each_direct_child(&mut |child| {
        if let Some(name) = declared_symbol_name(child) {
            let id = declared_symbol_id(child).expect("filtered to declarers");
            out.push((name.to_string(), id, child.range().clone()));
        }
    });
    out
}

pub struct SymbolResolutionHandler {
    stack: ScopeStack,
}

impl SymbolResolutionHandler {
    pub fn new() -> SymbolResolutionHandler {
        SymbolResolutionHandler {
            stack: ScopeStack::new(),
        }
    }

    fn declare(&mut self, messages: &mut MessageContext, range: SourceRange, name: &str, id: forge_syntax::DeclId) {
        if !self.stack.add_innermost(name, id) {
            messages.emit_coded(
                range,
                Severity::ERROR,
                REDECLARED,
                format!("'{name}' is already declared in this scope"),
            );
        }
    }

    fn reference(&mut self, messages: &mut MessageContext, range: SourceRange, name: &str) -> Option<forge_syntax::DeclId> {
        match self.stack.lookup(name) {
            Some(id) => Some(id),
            None => {
                messages.emit_coded(
                    range,
                    Severity::ERROR,
                    UNDECLARED,
                    format!("'{name}' is not declared"),
                );
                None
            }
        }
    }
}

impl Default for SymbolResolutionHandler {
    fn default() -> SymbolResolutionHandler {
        SymbolResolutionHandler::new()
    }
}

impl IHandler for SymbolResolutionHandler {
    fn on_enter(&mut self, input: &mut Input) -> Output {
        assert!(
            !self.stack.is_empty() || matches!(input.node(), Node::TranslationUnit(_)),
            "symbol resolution reached a node with no enclosing scope"
        );

        let range = input.node().range().clone();

        // A member of a structured type is never looked up as a bare
        // identifier (member access is deferred, §9 Open Questions), so it
        // is never added to a lexical scope at all.
        let is_structured_member = input
            .try_get_directly_surrounding::<&Declaration>()
            .is_some_and(|d| d.is_structured_type());

        let own_declaration = declared_symbol_name(input.node())
            .map(|name| (name.to_string(), declared_symbol_id(input.node()).expect("declarer always has an id")));

        if !is_structured_member {
            if let Some((name, id)) = own_declaration {
                let enclosing_unordered =
                    self.stack.innermost().is_some_and(|s| s.flags().unordered);
                // An unordered enclosing scope already declared this node
                // during its pre-pass; declaring it again here would
                // collide with itself.
                if !enclosing_unordered {
                    self.declare(input.messages, range.clone(), &name, id);
                }
            }
        }

        if let Some(name) = referenced_symbol_name(input.node()) {
            let name = name.to_string();
            if let Some(id) = self.reference(input.messages, range.clone(), &name) {
                resolve_symbol(input.node_mut(), id);
            }
        }

        if let Some(flags) = scope_flags_for(input.node()) {
            self.stack.push(flags);
            if flags.unordered {
                let pre_pass = direct_child_declarations(input.node());
                for (name, id, decl_range) in pre_pass {
                    self.declare(input.messages, decl_range, &name, id);
                }
            }
        }

        Output::continue_()
    }

    fn on_leave(&mut self, input: &mut Input) -> Output {
        if scope_flags_for(input.node()).is_some() {
            self.stack.pop();
        }
        Output::continue_()
    }
}
