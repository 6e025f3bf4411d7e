//! The opaque backend contract (§4.I). Nothing in `forge-codegen` names an
//! LLVM type anywhere below this line; a backend implementing `Context`
//! over its own handle types is free to be LLVM, Cranelift, or an
//! in-memory interpreter such as the one `forge-testsupport` uses to drive
//! the functional test harness without linking a real backend.

use forge_syntax::{BasicKind, BinaryOp, BitWidthKind, NumberLiteral};

/// A module/builder/target container. The core only ever asks a `Context`
/// for the handful of operations below; everything else about how the
/// backend represents a function, block, or value is its own business.
pub trait Context {
    /// Backend's representation of a lowered Forge type.
    type Type: Copy;
    /// Backend's representation of a lowered function.
    type Function: Copy;
    /// Backend's representation of a basic block.
    type Block: Copy;
    /// Backend's representation of an SSA value or pointer.
    type Value: Copy;

    /// Width of `isize`/`usize` and of a pointer, in bits, on the target
    /// this context is generating code for.
    fn pointer_bit_width(&self) -> u32;

    // ---- type construction ----

    fn lower_basic_type(&mut self, kind: BasicKind) -> Self::Type;
    fn lower_bit_width_type(&mut self, kind: BitWidthKind, bit_width: u32) -> Self::Type;
    fn lower_pointer_type(&mut self, pointee: Self::Type) -> Self::Type;
    fn create_function_type(&mut self, return_type: Self::Type, arg_types: &[Self::Type]) -> Self::Type;

    // ---- function / block structure ----

    fn create_function(&mut self, name: &str, function_type: Self::Type) -> Self::Function;
    fn function_arg_value(&mut self, function: Self::Function, index: usize) -> Self::Value;
    fn create_basic_block(&mut self, function: Self::Function, label: &str) -> Self::Block;
    fn set_insertion_point(&mut self, block: Self::Block);

    // ---- control flow ----

    fn create_branch(&mut self, target: Self::Block);
    fn create_conditional_branch(&mut self, condition: Self::Value, then_block: Self::Block, else_block: Self::Block);

    // ---- constants ----

    fn const_bool(&mut self, value: bool) -> Self::Value;
    fn const_number(&mut self, value: NumberLiteral, ty: Self::Type) -> Self::Value;

    // ---- instructions ----

    fn emit_arithmetic(&mut self, op: BinaryOp, ty: Self::Type, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn emit_comparison(&mut self, op: BinaryOp, operand_ty: Self::Type, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    /// `widen` comes from the casting-mode table (§4.G) — `Implicit` casts
    /// between numeric kinds and `Explicit` casts (`as`) share this one
    /// emission point, since the contract draws no IR-level distinction
    /// between them, only the semantic handlers gate which one is legal to
    /// reach here.
    fn emit_cast(&mut self, value: Self::Value, from: Self::Type, to: Self::Type) -> Self::Value;
    fn emit_alloca(&mut self, ty: Self::Type, name: &str) -> Self::Value;
    fn emit_load(&mut self, ptr: Self::Value, ty: Self::Type) -> Self::Value;
    fn emit_store(&mut self, ptr: Self::Value, value: Self::Value);
    fn emit_call(&mut self, callee: Self::Function, args: &[Self::Value]) -> Self::Value;
    fn emit_return(&mut self, value: Option<Self::Value>);
}
