//! The control-flow context statement lowering carries (§4.I): which
//! function it's lowering into, where that function's locals were
//! allocated, its return type (for `Return` value coercion), and — inside
//! a loop — where `continue`/`break` should jump.

use forge_syntax::Type;

use crate::context::Context;

pub struct FlowContext<C: Context> {
    pub function: C::Function,
    /// Every local's `alloca` lives here, not in the block currently being
    /// lowered, so a loop body re-entered many times never grows the stack.
    pub entry_block: C::Block,
    pub return_type: Type,
    /// `continue`'s target. `None` outside any loop.
    pub loop_body_block: Option<C::Block>,
    /// `break`'s target. `None` outside any loop.
    pub after_loop_block: Option<C::Block>,
}

impl<C: Context> FlowContext<C> {
    pub fn new(function: C::Function, entry_block: C::Block, return_type: Type) -> FlowContext<C> {
        FlowContext {
            function,
            entry_block,
            return_type,
            loop_body_block: None,
            after_loop_block: None,
        }
    }

    /// The context `while`/`do-while` lowering hands its body: same
    /// function, entry block, and return type, `continue`/`break` now
    /// resolved.
    pub fn enter_loop(&self, loop_body_block: C::Block, after_loop_block: C::Block) -> FlowContext<C> {
        FlowContext {
            function: self.function,
            entry_block: self.entry_block,
            return_type: self.return_type.deep_clone(),
            loop_body_block: Some(loop_body_block),
            after_loop_block: Some(after_loop_block),
        }
    }
}
