//! `Scope`: a flat key→declaration map, nestable only through an externally
//! held parent chain (§4.E). `Scope` itself never holds a parent pointer —
//! the resolver forms the chain by keeping one `Scope` per scope-bearing
//! ancestor on its own stack, synchronized to the traversal's enter/leave.

use indexmap::IndexMap;

use forge_syntax::DeclId;

/// Shadowing and ordering policy for one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeFlags {
    /// A key already bound in a parent scope may be redeclared here.
    pub allow_shadowing_parent_scope: bool,
    /// A key already bound in this same scope may be redeclared.
    pub allow_shadowing_within_scope: bool,
    /// Declarations are visible to references that precede them in source
    /// order, within this scope (handled via a declare-first pre-pass).
    pub unordered: bool,
}

impl ScopeFlags {
    pub const NONE: ScopeFlags = ScopeFlags {
        allow_shadowing_parent_scope: false,
        allow_shadowing_within_scope: false,
        unordered: false,
    };

    pub const fn unordered() -> ScopeFlags {
        ScopeFlags {
            unordered: true,
            ..ScopeFlags::NONE
        }
    }

    pub const fn unordered_shadowing_parent() -> ScopeFlags {
        ScopeFlags {
            unordered: true,
            allow_shadowing_parent_scope: true,
            ..ScopeFlags::NONE
        }
    }
}

/// A lexical scope: an insertion-ordered key→declaration map (insertion
/// order matters for the unordered-scope pre-pass, which wants
/// declaration order preserved for deterministic diagnostics) plus the
/// flags that govern how `add` treats collisions.
#[derive(Debug, Default)]
pub struct Scope {
    flags: ScopeFlags,
    bindings: IndexMap<String, DeclId>,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Scope {
        Scope {
            flags,
            bindings: IndexMap::new(),
        }
    }

    pub fn flags(&self) -> ScopeFlags {
        self.flags
    }

    /// Binds `key` to `id` in this scope. Fails (returns `false`, binding
    /// not applied) when `ALLOW_SHADOWING_WITHIN_SCOPE` is unset and `key`
    /// is already bound here. Shadowing a parent binding is always allowed
    /// at this level — the parent-shadowing flag is enforced by the caller,
    /// which is the only side that can see the parent chain.
    pub fn add(&mut self, key: impl Into<String>, id: DeclId) -> bool {
        let key = key.into();
        if self.bindings.contains_key(&key) && !self.flags.allow_shadowing_within_scope {
            return false;
        }
        self.bindings.insert(key, id);
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.bindings.shift_remove(key).is_some()
    }

    /// Lookup in this scope only; chaining to parents is the resolver's job
    /// since `Scope` never holds a parent pointer.
    pub fn get_local(&self, key: &str) -> Option<DeclId> {
        self.bindings.get(key).copied()
    }

    pub fn contains_local(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }
}

/// The stack of live scopes, innermost last — the "external parent chain"
/// §4.E assigns to the handler rather than to `Scope`.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> ScopeStack {
        ScopeStack { scopes: Vec::new() }
    }

    pub fn push(&mut self, flags: ScopeFlags) {
        self.scopes.push(Scope::new(flags));
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn innermost_mut(&mut self) -> Option<&mut Scope> {
        self.scopes.last_mut()
    }

    pub fn innermost(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    /// Adds to the innermost scope, respecting `ALLOW_SHADOWING_PARENT_SCOPE`:
    /// when unset, a binding already visible in any outer scope blocks the
    /// add even if the innermost scope itself has no local collision.
    pub fn add_innermost(&mut self, key: impl Into<String>, id: DeclId) -> bool {
        let key = key.into();
        let Some(innermost) = self.scopes.last() else {
            return false;
        };
        if !innermost.flags().allow_shadowing_parent_scope
            && self.lookup_outer(self.scopes.len().saturating_sub(1), &key).is_some()
        {
            return false;
        }
        self.scopes.last_mut().unwrap().add(key, id)
    }

    /// Searches from the innermost scope outward.
    pub fn lookup(&self, key: &str) -> Option<DeclId> {
        self.scopes.iter().rev().find_map(|s| s.get_local(key))
    }

    /// Searches scopes strictly outside index `from` (exclusive), used to
    /// test "is this name already visible in an enclosing scope".
    fn lookup_outer(&self, from: usize, key: &str) -> Option<DeclId> {
        self.scopes[..from].iter().rev().find_map(|s| s.get_local(key))
    }
}
