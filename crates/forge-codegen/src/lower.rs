//! Lowering entry points (§4.I): one `Lowerer` per translation unit, built
//! incrementally the same way `forge_sema`'s handlers build up their
//! `DeclId`-keyed maps, except here the map holds backend handles instead
//! of resolved types.

use std::collections::HashMap;

use forge_syntax::declarations::FunctionDecl;
use forge_syntax::{BasicKind, BinaryOp, Declaration, DeclId, NumberLiteral, Statement, TranslationUnit, Type, UnaryOp, Value};

use crate::context::Context;
use crate::error::CodegenError;
use crate::flow::FlowContext;

pub struct Lowerer<C: Context> {
    functions: HashMap<DeclId, C::Function>,
    locals: HashMap<DeclId, (C::Value, C::Type)>,
}

impl<C: Context> Default for Lowerer<C> {
    fn default() -> Lowerer<C> {
        Lowerer {
            functions: HashMap::new(),
            locals: HashMap::new(),
        }
    }
}

impl<C: Context> Lowerer<C> {
    pub fn new() -> Lowerer<C> {
        Lowerer::default()
    }

    /// Declares every function first (so forward calls resolve) and only
    /// then lowers bodies.
    pub fn lower_translation_unit(&mut self, ctx: &mut C, unit: &TranslationUnit) -> Result<(), CodegenError> {
        for decl in unit.declarations() {
            if let Declaration::Function(f) = decl {
                self.declare_function(ctx, f)?;
            }
        }
        for decl in unit.declarations() {
            if let Declaration::Function(f) = decl {
                self.lower_function_body(ctx, f)?;
            }
        }
        Ok(())
    }

    fn declare_function(&mut self, ctx: &mut C, decl: &FunctionDecl) -> Result<C::Function, CodegenError> {
        let return_type = decl.return_type.as_type().expect("function return slot holds a Type node");
        let backend_return = self.lower_type(ctx, return_type)?;
        let mut backend_args = Vec::with_capacity(decl.args.len());
        for arg in &decl.args {
            let arg_decl = arg.as_declaration().expect("function arg slot holds a Declaration node");
            let arg_type = arg_decl.declared_type().ok_or(CodegenError::UnresolvedType)?;
            backend_args.push(self.lower_type(ctx, arg_type)?);
        }
        let function_type = ctx.create_function_type(backend_return, &backend_args);
        let function = ctx.create_function(&decl.name, function_type);
        self.functions.insert(decl.id, function);
        Ok(function)
    }

    fn lower_function_body(&mut self, ctx: &mut C, decl: &FunctionDecl) -> Result<(), CodegenError> {
        let function = *self
            .functions
            .get(&decl.id)
            .expect("declare_function must run before lower_function_body");
        let entry_block = ctx.create_basic_block(function, "entry");
        ctx.set_insertion_point(entry_block);

        for (index, arg) in decl.args.iter().enumerate() {
            let arg_decl = arg.as_declaration().expect("function arg slot holds a Declaration node");
            let arg_type = arg_decl.declared_type().ok_or(CodegenError::UnresolvedType)?;
            let backend_type = self.lower_type(ctx, arg_type)?;
            let incoming = ctx.function_arg_value(function, index);
            let slot = ctx.emit_alloca(backend_type, arg_decl.name());
            ctx.emit_store(slot, incoming);
            self.locals.insert(arg_decl.id(), (slot, backend_type));
        }

        let return_type = decl.return_type.as_type().expect("function return slot holds a Type node").deep_clone();
        let flow = FlowContext::new(function, entry_block, return_type);
        let body = decl.body.as_statement().expect("function body slot holds a Statement node");
        let tail = self.lower_statement(ctx, &flow, entry_block, body)?;
        if let Some(block) = tail {
            // Only a void function can fall off the end; `ControlFlowHandler`
            // rejects this for any other return type before codegen runs.
            ctx.set_insertion_point(block);
            ctx.emit_return(None);
        }
        Ok(())
    }

    fn lower_local_declaration(
        &mut self,
        ctx: &mut C,
        flow: &FlowContext<C>,
        current: C::Block,
        decl: &Declaration,
    ) -> Result<(), CodegenError> {
        let declared_type = decl.declared_type().ok_or(CodegenError::UnresolvedType)?;
        let backend_type = self.lower_type(ctx, declared_type)?;

        ctx.set_insertion_point(flow.entry_block);
        let slot = ctx.emit_alloca(backend_type, decl.name());
        self.locals.insert(decl.id(), (slot, backend_type));

        ctx.set_insertion_point(current);
        if let Some(init) = decl.initial_value() {
            let init_type = declared_type.deep_clone();
            let value = self.codegen_value_implicit_cast(ctx, flow, init, &init_type)?;
            ctx.emit_store(slot, value);
        }
        Ok(())
    }

    // ---- statements ----

    /// Lowers `stmt` assuming `ctx`'s insertion point should be (and is set
    /// to) `current`. Returns the block the next sibling statement should
    /// be emitted into, or `None` if `stmt` terminated control flow.
    fn lower_statement(
        &mut self,
        ctx: &mut C,
        flow: &FlowContext<C>,
        current: C::Block,
        stmt: &Statement,
    ) -> Result<Option<C::Block>, CodegenError> {
        ctx.set_insertion_point(current);
        match stmt {
            Statement::Continue(_) => {
                let target = flow
                    .loop_body_block
                    .expect("`continue` outside a loop; well-formedness should have rejected this tree");
                ctx.create_branch(target);
                Ok(None)
            }
            Statement::Break(_) => {
                let target = flow
                    .after_loop_block
                    .expect("`break` outside a loop; well-formedness should have rejected this tree");
                ctx.create_branch(target);
                Ok(None)
            }
            Statement::ReturnVoid(_) => {
                ctx.emit_return(None);
                Ok(None)
            }
            Statement::Return(s) => {
                let value_node = s.value.as_value().expect("Return always carries a value slot");
                let return_type = flow.return_type.deep_clone();
                let value = self.codegen_value_implicit_cast(ctx, flow, value_node, &return_type)?;
                ctx.emit_return(Some(value));
                Ok(None)
            }
            Statement::Execute(s) => {
                let value_node = s.value.as_value().expect("Execute always carries a value slot");
                self.codegen_value(ctx, flow, value_node)?;
                Ok(Some(current))
            }
            Statement::Declaration(s) => {
                let decl = s
                    .declaration
                    .as_declaration()
                    .expect("Declaration statement holds a Declaration node");
                self.lower_local_declaration(ctx, flow, current, decl)?;
                Ok(Some(current))
            }
            Statement::Block(s) => {
                let mut cursor = Some(current);
                for child in &s.statements {
                    let child_stmt = child.as_statement().expect("block child must be a Statement node");
                    match cursor {
                        Some(block) => cursor = self.lower_statement(ctx, flow, block, child_stmt)?,
                        None => break,
                    }
                }
                Ok(cursor)
            }
            Statement::If(s) => {
                let condition = s.condition.as_value().expect("if condition slot holds a Value node");
                let then_stmt = s.then_block.as_statement().expect("if then slot holds a Statement node");
                let else_stmt = s.else_stmt.as_deref().map(|n| n.as_statement().expect("if else slot holds a Statement node"));

                ctx.set_insertion_point(current);
                let cond_value = self.codegen_value(ctx, flow, condition)?;

                let then_block = ctx.create_basic_block(flow.function, "if.then");
                let else_block = else_stmt.map(|_| ctx.create_basic_block(flow.function, "if.else"));
                let merge_block = ctx.create_basic_block(flow.function, "if.end");

                ctx.set_insertion_point(current);
                ctx.create_conditional_branch(cond_value, then_block, else_block.unwrap_or(merge_block));

                let then_tail = self.lower_statement(ctx, flow, then_block, then_stmt)?;
                if let Some(block) = then_tail {
                    ctx.set_insertion_point(block);
                    ctx.create_branch(merge_block);
                }

                let else_tail = match (else_block, else_stmt) {
                    (Some(block), Some(stmt)) => self.lower_statement(ctx, flow, block, stmt)?,
                    _ => Some(current), // no else: falling off the condition already reaches merge_block directly
                };
                if let (Some(block), Some(_)) = (else_tail, else_stmt) {
                    ctx.set_insertion_point(block);
                    ctx.create_branch(merge_block);
                }

                // Mirrors `ControlFlowHandler::terminates`: an `if` with no
                // `else` never terminates, since its false edge always
                // reaches `merge_block` regardless of what the `then`
                // branch does.
                let terminates = else_stmt.is_some() && then_tail.is_none() && else_tail.is_none();
                if terminates {
                    Ok(None)
                } else {
                    Ok(Some(merge_block))
                }
            }
            Statement::While(s) => {
                let condition = s.condition.as_value().expect("while condition slot holds a Value node");
                let body_stmt = s.body.as_statement().expect("while body slot holds a Statement node");

                let cond_block = ctx.create_basic_block(flow.function, "while.cond");
                let body_block = ctx.create_basic_block(flow.function, "while.body");
                let after_block = ctx.create_basic_block(flow.function, "while.end");

                ctx.set_insertion_point(current);
                if s.is_do_while {
                    ctx.create_branch(body_block);
                } else {
                    ctx.create_branch(cond_block);
                }

                ctx.set_insertion_point(cond_block);
                let cond_value = self.codegen_value(ctx, flow, condition)?;
                ctx.set_insertion_point(cond_block);
                ctx.create_conditional_branch(cond_value, body_block, after_block);

                let loop_flow = flow.enter_loop(cond_block, after_block);
                let body_tail = self.lower_statement(ctx, &loop_flow, body_block, body_stmt)?;
                if let Some(block) = body_tail {
                    ctx.set_insertion_point(block);
                    ctx.create_branch(cond_block);
                }

                Ok(Some(after_block))
            }
        }
    }

    // ---- values ----

    fn codegen_value_lvalue(&mut self, ctx: &mut C, flow: &FlowContext<C>, value: &Value) -> Result<(C::Value, C::Type), CodegenError> {
        match value {
            Value::Symbol(v) => {
                let id = v.referenced.ok_or_else(|| CodegenError::NoBackendHandle(v.name.clone()))?;
                self.locals.get(&id).copied().ok_or_else(|| CodegenError::NoBackendHandle(v.name.clone()))
            }
            Value::Unary(v) if v.op == UnaryOp::Deref => {
                let operand = v.operand.as_value().expect("deref operand slot holds a Value node");
                let operand_value = self.codegen_value(ctx, flow, operand)?;
                let operand_type = operand.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                let elem_type = forge_syntax::pointer_element(operand_type).ok_or(CodegenError::UnsupportedType)?;
                let backend_elem = self.lower_type(ctx, elem_type)?;
                Ok((operand_value, backend_elem))
            }
            _ => Err(CodegenError::UnsupportedType),
        }
    }

    fn codegen_value(&mut self, ctx: &mut C, flow: &FlowContext<C>, value: &Value) -> Result<C::Value, CodegenError> {
        match value {
            Value::LiteralBool(v) => Ok(ctx.const_bool(v.value)),
            Value::LiteralNumber(v) => {
                let ty = value.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                let backend_ty = self.lower_type(ctx, ty)?;
                Ok(ctx.const_number(v.value, backend_ty))
            }
            Value::Symbol(_) => {
                let (ptr, ty) = self.codegen_value_lvalue(ctx, flow, value)?;
                Ok(ctx.emit_load(ptr, ty))
            }
            Value::Unary(v) => {
                let operand = v.operand.as_value().expect("unary operand slot holds a Value node");
                match v.op {
                    UnaryOp::GetAddr => {
                        let (ptr, _) = self.codegen_value_lvalue(ctx, flow, operand)?;
                        Ok(ptr)
                    }
                    UnaryOp::Deref => {
                        let (ptr, ty) = self.codegen_value_lvalue(ctx, flow, value)?;
                        Ok(ctx.emit_load(ptr, ty))
                    }
                    UnaryOp::Pos => self.codegen_value(ctx, flow, operand),
                    UnaryOp::Neg => {
                        let ty = value.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                        let backend_ty = self.lower_type(ctx, ty)?;
                        let operand_value = self.codegen_value(ctx, flow, operand)?;
                        let zero = ctx.const_number(numeric_zero(ty, ctx.pointer_bit_width()), backend_ty);
                        Ok(ctx.emit_arithmetic(BinaryOp::Sub, backend_ty, zero, operand_value))
                    }
                    UnaryOp::BitNot => {
                        let ty = value.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                        let backend_ty = self.lower_type(ctx, ty)?;
                        let operand_value = self.codegen_value(ctx, flow, operand)?;
                        let all_ones = ctx.const_number(numeric_all_ones(ty, ctx.pointer_bit_width()), backend_ty);
                        Ok(ctx.emit_arithmetic(BinaryOp::BitXor, backend_ty, operand_value, all_ones))
                    }
                    UnaryOp::BoolNot => {
                        let bool_ty = ctx.lower_basic_type(BasicKind::Bool);
                        let operand_value = self.codegen_value(ctx, flow, operand)?;
                        let false_value = ctx.const_bool(false);
                        Ok(ctx.emit_comparison(BinaryOp::Eq, bool_ty, operand_value, false_value))
                    }
                }
            }
            Value::Binary(v) if v.op.is_assign() || v.op.is_compound_assign() => {
                let lhs = v.lhs.as_value().expect("assignment lhs slot holds a Value node");
                let rhs = v.rhs.as_value().expect("assignment rhs slot holds a Value node");
                let (ptr, ty) = self.codegen_value_lvalue(ctx, flow, lhs)?;
                let lhs_type = lhs.resolved_type().ok_or(CodegenError::UnresolvedType)?.deep_clone();
                let rhs_value = self.codegen_value_implicit_cast(ctx, flow, rhs, &lhs_type)?;
                let final_value = if v.op.is_assign() {
                    rhs_value
                } else {
                    let current_value = ctx.emit_load(ptr, ty);
                    ctx.emit_arithmetic(compound_to_arithmetic(v.op), ty, current_value, rhs_value)
                };
                ctx.emit_store(ptr, final_value);
                Ok(final_value)
            }
            Value::Binary(v) if v.op.is_boolean() => {
                let lhs = v.lhs.as_value().expect("logical lhs slot holds a Value node");
                let rhs = v.rhs.as_value().expect("logical rhs slot holds a Value node");
                self.lower_short_circuit(ctx, flow, v.op, lhs, rhs)
            }
            Value::Binary(v) if v.op.is_member_access() => Err(CodegenError::UnsupportedType),
            Value::Binary(v) if v.op.is_comparison() => {
                let lhs = v.lhs.as_value().expect("comparison lhs slot holds a Value node");
                let rhs = v.rhs.as_value().expect("comparison rhs slot holds a Value node");
                let operand_type = lhs.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                let backend_operand_ty = self.lower_type(ctx, operand_type)?;
                let lhs_value = self.codegen_value(ctx, flow, lhs)?;
                let rhs_value = self.codegen_value(ctx, flow, rhs)?;
                Ok(ctx.emit_comparison(v.op, backend_operand_ty, lhs_value, rhs_value))
            }
            Value::Binary(v) => {
                let lhs = v.lhs.as_value().expect("arithmetic lhs slot holds a Value node");
                let rhs = v.rhs.as_value().expect("arithmetic rhs slot holds a Value node");
                let ty = value.resolved_type().ok_or(CodegenError::UnresolvedType)?.deep_clone();
                let backend_ty = self.lower_type(ctx, &ty)?;
                let lhs_value = self.codegen_value_implicit_cast(ctx, flow, lhs, &ty)?;
                let rhs_value = self.codegen_value_implicit_cast(ctx, flow, rhs, &ty)?;
                Ok(ctx.emit_arithmetic(v.op, backend_ty, lhs_value, rhs_value))
            }
            Value::Call(v) => {
                let callee = v.callee.as_value().expect("call callee slot holds a Value node");
                let name = match callee {
                    Value::Symbol(s) => &s.name,
                    _ => return Err(CodegenError::UnsupportedType),
                };
                let id = match callee {
                    Value::Symbol(s) => s.referenced.ok_or_else(|| CodegenError::NoBackendHandle(name.clone()))?,
                    _ => unreachable!(),
                };
                let function = *self
                    .functions
                    .get(&id)
                    .ok_or_else(|| CodegenError::NoBackendHandle(name.clone()))?;
                let callee_type = callee.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                let arg_types = forge_syntax::function_arg_types(callee_type).ok_or(CodegenError::UnsupportedType)?;
                let mut args = Vec::with_capacity(v.args.len());
                for (arg_node, expected) in v.args.iter().zip(arg_types) {
                    let arg_value = arg_node.as_value().expect("call argument slot holds a Value node");
                    args.push(self.codegen_value_implicit_cast(ctx, flow, arg_value, expected)?);
                }
                Ok(ctx.emit_call(function, &args))
            }
            Value::Cast(v) => {
                let operand = v.value.as_value().expect("cast operand slot holds a Value node");
                let operand_value = self.codegen_value(ctx, flow, operand)?;
                let from_type = operand.resolved_type().ok_or(CodegenError::UnresolvedType)?;
                let to_type = v.target_type.as_type().expect("cast target slot holds a Type node");
                self.emit_cast_checked(ctx, operand_value, from_type, to_type)
            }
        }
    }

    fn codegen_value_implicit_cast(&mut self, ctx: &mut C, flow: &FlowContext<C>, value: &Value, to: &Type) -> Result<C::Value, CodegenError> {
        let rvalue = self.codegen_value(ctx, flow, value)?;
        let from = value.resolved_type().ok_or(CodegenError::UnresolvedType)?;
        self.emit_cast_checked(ctx, rvalue, from, to)
    }

    fn emit_cast_checked(&mut self, ctx: &mut C, value: C::Value, from: &Type, to: &Type) -> Result<C::Value, CodegenError> {
        if from.compare(to) {
            return Ok(value);
        }
        let mode = forge_sema::casting_mode(from, to, ctx.pointer_bit_width());
        debug_assert!(
            mode != forge_sema::CastingMode::Illegal,
            "illegal cast reached codegen; semantic validation should have rejected this tree"
        );
        let backend_from = self.lower_type(ctx, from)?;
        let backend_to = self.lower_type(ctx, to)?;
        Ok(ctx.emit_cast(value, backend_from, backend_to))
    }

    /// `&&`/`||` short-circuit via a stack slot rather than a phi: the
    /// contract has no phi instruction, and alloca/load/store already cover
    /// this shape without one.
    fn lower_short_circuit(&mut self, ctx: &mut C, flow: &FlowContext<C>, op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<C::Value, CodegenError> {
        let bool_ty = ctx.lower_basic_type(BasicKind::Bool);
        let slot = ctx.emit_alloca(bool_ty, "logical.tmp");

        let lhs_value = self.codegen_value(ctx, flow, lhs)?;
        ctx.emit_store(slot, lhs_value);

        let rhs_block = ctx.create_basic_block(flow.function, "logical.rhs");
        let merge_block = ctx.create_basic_block(flow.function, "logical.end");
        match op {
            BinaryOp::And => ctx.create_conditional_branch(lhs_value, rhs_block, merge_block),
            BinaryOp::Or => ctx.create_conditional_branch(lhs_value, merge_block, rhs_block),
            _ => unreachable!("lower_short_circuit is only called for And/Or"),
        }

        ctx.set_insertion_point(rhs_block);
        let rhs_value = self.codegen_value(ctx, flow, rhs)?;
        ctx.emit_store(slot, rhs_value);
        ctx.create_branch(merge_block);

        ctx.set_insertion_point(merge_block);
        Ok(ctx.emit_load(slot, bool_ty))
    }

    // ---- types ----

    fn lower_type(&mut self, ctx: &mut C, ty: &Type) -> Result<C::Type, CodegenError> {
        match ty {
            Type::Basic(b) => Ok(ctx.lower_basic_type(b.kind)),
            Type::WithBitWidth(w) => Ok(ctx.lower_bit_width_type(w.kind, w.bit_width)),
            Type::Unary(u) => {
                let inner = u.operand_type.as_type().expect("pointer type operand slot holds a Type node");
                let backend_inner = self.lower_type(ctx, inner)?;
                Ok(ctx.lower_pointer_type(backend_inner))
            }
            Type::Function(f) => {
                let ret = f.return_type.as_type().expect("function type return slot holds a Type node");
                let backend_ret = self.lower_type(ctx, ret)?;
                let mut backend_args = Vec::with_capacity(f.arg_types.len());
                for a in &f.arg_types {
                    let a_ty = a.as_type().expect("function type arg slot holds a Type node");
                    backend_args.push(self.lower_type(ctx, a_ty)?);
                }
                Ok(ctx.create_function_type(backend_ret, &backend_args))
            }
            Type::Symbol(_) => Err(CodegenError::UnresolvedType),
            Type::Structured(_) => Err(CodegenError::UnsupportedType),
        }
    }
}

fn compound_to_arithmetic(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::AddAssign => BinaryOp::Add,
        BinaryOp::SubAssign => BinaryOp::Sub,
        BinaryOp::MulAssign => BinaryOp::Mul,
        BinaryOp::DivAssign => BinaryOp::Div,
        BinaryOp::RemAssign => BinaryOp::Rem,
        BinaryOp::BitAndAssign => BinaryOp::BitAnd,
        BinaryOp::BitOrAssign => BinaryOp::BitOr,
        BinaryOp::BitXorAssign => BinaryOp::BitXor,
        BinaryOp::ShlAssign => BinaryOp::Shl,
        BinaryOp::ShrAssign => BinaryOp::Shr,
        other => other,
    }
}

fn numeric_zero(ty: &Type, pointer_bit_width: u32) -> NumberLiteral {
    let width = forge_syntax::number_bit_width(ty, pointer_bit_width).unwrap_or(32);
    if forge_syntax::is_float(ty) {
        if width <= 32 {
            NumberLiteral::F32(0.0)
        } else {
            NumberLiteral::F64(0.0)
        }
    } else {
        match (forge_syntax::signedness(ty), width) {
            (Some(true), 8) => NumberLiteral::I8(0),
            (Some(true), 16) => NumberLiteral::I16(0),
            (Some(true), 32) => NumberLiteral::I32(0),
            (Some(true), _) => NumberLiteral::I64(0),
            (_, 8) => NumberLiteral::U8(0),
            (_, 16) => NumberLiteral::U16(0),
            (_, 32) => NumberLiteral::U32(0),
            (_, _) => NumberLiteral::U64(0),
        }
    }
}

fn numeric_all_ones(ty: &Type, pointer_bit_width: u32) -> NumberLiteral {
    let width = forge_syntax::number_bit_width(ty, pointer_bit_width).unwrap_or(32);
    match (forge_syntax::signedness(ty), width) {
        (Some(true), 8) => NumberLiteral::I8(-1),
        (Some(true), 16) => NumberLiteral::I16(-1),
        (Some(true), 32) => NumberLiteral::I32(-1),
        (Some(true), _) => NumberLiteral::I64(-1),
        (_, 8) => NumberLiteral::U8(u8::MAX),
        (_, 16) => NumberLiteral::U16(u16::MAX),
        (_, 32) => NumberLiteral::U32(u32::MAX),
        (_, _) => NumberLiteral::U64(u64::MAX),
    }
}
