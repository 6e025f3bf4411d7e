//! `IHandler` and `Pass`: multi-handler composition over one tree walk (§4.D).

use forge_core::MessageContext;

use crate::node::{Node, TryCast};
use crate::visit::Status;

/// What a single handler wants to happen to the node it just saw.
#[derive(Debug, Default)]
pub struct Output {
    pub status: OutputStatus,
    pub replacement: Option<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStatus {
    #[default]
    Continue,
    DoNotTraverseChildren,
    HaltTraversal,
}

impl Output {
    pub fn continue_() -> Self {
        Self::default()
    }
    pub fn do_not_traverse_children() -> Self {
        Self {
            status: OutputStatus::DoNotTraverseChildren,
            replacement: None,
        }
    }
    pub fn halt_traversal() -> Self {
        Self {
            status: OutputStatus::HaltTraversal,
            replacement: None,
        }
    }
    pub fn replace(node: Node) -> Self {
        Self {
            status: OutputStatus::Continue,
            replacement: Some(node),
        }
    }
}

/// What a handler sees at enter/leave time: the message sink, the current
/// node (mutable — direct field writes like `resolved_type` go through
/// here), and the ancestor chain.
pub struct Input<'p> {
    node: &'p mut Node,
    ancestors: &'p [*const Node],
    pub messages: &'p mut MessageContext,
}

impl<'p> Input<'p> {
    pub fn node(&self) -> &Node {
        self.node
    }
    pub fn node_mut(&mut self) -> &mut Node {
        self.node
    }

    /// Nearest ancestor whose runtime kind narrows to `T`, searching from
    /// the direct parent outward.
    pub fn try_get_directly_surrounding<T: TryCast<'p>>(&self) -> Option<T> {
        for &ptr in self.ancestors.iter().rev() {
            // SAFETY: `ptr` points at a node on the Pass's active stack — an
            // ancestor that is exclusively owned by this walk for at least
            // 'p and is never mutated while a descendant frame is live.
            let ancestor: &'p Node = unsafe { &*ptr };
            if let Some(t) = T::try_cast(ancestor) {
                return Some(t);
            }
        }
        None
    }
}

/// Node-agnostic hooks; handlers that only care about specific variants use
/// `KindDispatchHandler` instead and get these two wired up automatically.
pub trait IHandler {
    fn on_enter(&mut self, _input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_leave(&mut self, _input: &mut Input) -> Output {
        Output::continue_()
    }
}

/// A `Pass` composed of an ordered sequence of handlers, walking a tree
/// exactly once with full enter/leave/replace/halt semantics.
pub struct Pass {
    handlers: Vec<Box<dyn IHandler>>,
    stack: Vec<*const Node>,
}

impl Pass {
    pub fn new(handlers: Vec<Box<dyn IHandler>>) -> Self {
        Self {
            handlers,
            stack: Vec::new(),
        }
    }

    pub fn run(&mut self, messages: &mut MessageContext, root: &mut Node) -> Status {
        debug_assert!(self.stack.is_empty());
        let status = self.visit(messages, root);
        self.stack.clear();
        status
    }

    fn visit(&mut self, messages: &mut MessageContext, node: &mut Node) -> Status {
        let mut skip_children = false;
        for h in &mut self.handlers {
            let mut input = Input {
                node: &mut *node,
                ancestors: &self.stack,
                messages: &mut *messages,
            };
            let out = h.on_enter(&mut input);
            if let Some(rep) = out.replacement {
                *node = rep;
            }
            match out.status {
                OutputStatus::HaltTraversal => return Status::HaltTraversal,
                OutputStatus::DoNotTraverseChildren => skip_children = true,
                OutputStatus::Continue => {}
            }
        }

        let ptr: *const Node = node;
        assert!(
            !self.stack.contains(&ptr),
            "cycle detected during tree traversal (EIN001)"
        );
        self.stack.push(ptr);

        let mut child_status = Status::Continue;
        if !skip_children {
            node.for_each_direct_child_mut(&mut |child| {
                if !child_status.is_halt() {
                    child_status = self.visit(messages, child);
                }
            });
        }

        self.stack.pop();

        if child_status.is_halt() {
            return child_status;
        }

        for h in &mut self.handlers {
            let mut input = Input {
                node: &mut *node,
                ancestors: &self.stack,
                messages: &mut *messages,
            };
            let out = h.on_leave(&mut input);
            if let Some(rep) = out.replacement {
                *node = rep;
            }
            if out.status == OutputStatus::HaltTraversal {
                return Status::HaltTraversal;
            }
        }
        Status::Continue
    }
}

/// Variant-dispatching handler base: the "language-specific handler base
/// class" §4.D describes. Override the `on_enter_*`/`on_leave_*` hook for
/// the families you care about; everything else defaults to `continue_`.
#[allow(unused_variables)]
pub trait KindDispatchHandler {
    fn on_enter_type(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_leave_type(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_enter_value(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_leave_value(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_enter_statement(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_leave_statement(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_enter_declaration(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_leave_declaration(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_enter_translation_unit(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
    fn on_leave_translation_unit(&mut self, input: &mut Input) -> Output {
        Output::continue_()
    }
}

impl<H: KindDispatchHandler> IHandler for H {
    fn on_enter(&mut self, input: &mut Input) -> Output {
        match input.node() {
            Node::Type(_) => self.on_enter_type(input),
            Node::Value(_) => self.on_enter_value(input),
            Node::Statement(_) => self.on_enter_statement(input),
            Node::Declaration(_) => self.on_enter_declaration(input),
            Node::TranslationUnit(_) => self.on_enter_translation_unit(input),
        }
    }

    fn on_leave(&mut self, input: &mut Input) -> Output {
        match input.node() {
            Node::Type(_) => self.on_leave_type(input),
            Node::Value(_) => self.on_leave_value(input),
            Node::Statement(_) => self.on_leave_statement(input),
            Node::Declaration(_) => self.on_leave_declaration(input),
            Node::TranslationUnit(_) => self.on_leave_translation_unit(input),
        }
    }
}
