//! Stable identity for declaration nodes.
//!
//! Back-references (`Value::Symbol::referenced`, `Type::Symbol::referenced`)
//! cannot own the declaration they point to without making the tree a graph,
//! so they hold a `DeclId` instead: a non-owning, copyable index assigned
//! once at construction time.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

static NEXT: AtomicU32 = AtomicU32::new(1);

impl DeclId {
    pub fn fresh() -> Self {
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// For snapshot-style debug output only; callers must not rely on the
    /// numeric value across runs.
    pub fn raw(self) -> u32 {
        self.0
    }
}
