//! The minimal walker interface (§4.D).

use crate::node::Node;

/// What a handler (or the walk as a whole) wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    DoNotTraverseChildren,
    HaltTraversal,
}

impl Status {
    pub fn is_halt(self) -> bool {
        self == Status::HaltTraversal
    }
}

/// `visit` receives the node as a mutable slot: replacing `*node` is how a
/// visitor rewrites the tree it's walking.
pub trait IVisitor {
    fn visit(&mut self, node: &mut Node) -> Status;
}

/// Runs the three-step protocol from §4.D.1-3 for a single visitor that is
/// not itself handler-composed (the `Pass` in `pass.rs` reimplements this
/// with multi-handler semantics instead of calling this directly).
pub fn walk(visitor: &mut impl IVisitor, node: &mut Node) -> Status {
    let status = visitor.visit(node);
    if status.is_halt() {
        return status;
    }
    if status == Status::DoNotTraverseChildren {
        return Status::Continue;
    }
    let mut child_status = Status::Continue;
    node.for_each_direct_child_mut(&mut |child| {
        if !child_status.is_halt() {
            child_status = walk(visitor, child);
        }
    });
    child_status
}
