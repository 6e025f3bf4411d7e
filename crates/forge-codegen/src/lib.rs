//! Backend-agnostic codegen contract (§4.I). Nothing here depends on LLVM;
//! a backend implements `Context` over its own handle types and this crate
//! drives it from a validated `forge_syntax` tree.

pub mod context;
pub mod error;
pub mod flow;
pub mod lower;

pub use context::Context;
pub use error::CodegenError;
pub use flow::FlowContext;
pub use lower::Lowerer;

#[cfg(test)]
mod tests {
    use super::*;
    use forge_syntax::{BasicKind, BinaryOp, BitWidthKind, Declaration, Statement, TranslationUnit, Type, Value};

    fn r() -> forge_core::SourceRange {
        forge_core::SourceRange::synthetic()
    }

    fn i32_ty() -> Type {
        Type::with_bit_width(BitWidthKind::SignedInt, 32, r())
    }

    /// A backend that records every operation as a text line instead of
    /// emitting real IR — enough to drive `Lowerer` and inspect the shape
    /// it produced, without linking an actual code generator.
    #[derive(Default)]
    struct MockContext {
        next_id: usize,
        pub log: Vec<String>,
    }

    impl MockContext {
        fn fresh(&mut self) -> usize {
            let id = self.next_id;
            self.next_id += 1;
            id
        }
    }

    impl Context for MockContext {
        type Type = usize;
        type Function = usize;
        type Block = usize;
        type Value = usize;

        fn pointer_bit_width(&self) -> u32 {
            64
        }

        fn lower_basic_type(&mut self, kind: BasicKind) -> usize {
            let id = self.fresh();
            self.log.push(format!("type{id} = {kind:?}"));
            id
        }
        fn lower_bit_width_type(&mut self, kind: BitWidthKind, bit_width: u32) -> usize {
            let id = self.fresh();
            self.log.push(format!("type{id} = {kind:?}{bit_width}"));
            id
        }
        fn lower_pointer_type(&mut self, pointee: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("type{id} = *type{pointee}"));
            id
        }
        fn create_function_type(&mut self, return_type: usize, arg_types: &[usize]) -> usize {
            let id = self.fresh();
            self.log.push(format!("type{id} = fn{arg_types:?} -> type{return_type}"));
            id
        }

        fn create_function(&mut self, name: &str, function_type: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("fn{id} = '{name}': type{function_type}"));
            id
        }
        fn function_arg_value(&mut self, function: usize, index: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = fn{function}.arg{index}"));
            id
        }
        fn create_basic_block(&mut self, function: usize, label: &str) -> usize {
            let id = self.fresh();
            self.log.push(format!("block{id} = fn{function}.{label}"));
            id
        }
        fn set_insertion_point(&mut self, block: usize) {
            self.log.push(format!("-- block{block} --"));
        }

        fn create_branch(&mut self, target: usize) {
            self.log.push(format!("br block{target}"));
        }
        fn create_conditional_branch(&mut self, condition: usize, then_block: usize, else_block: usize) {
            self.log.push(format!("br value{condition} ? block{then_block} : block{else_block}"));
        }

        fn const_bool(&mut self, value: bool) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = const {value}"));
            id
        }
        fn const_number(&mut self, value: NumberLiteral, ty: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = const {value:?}: type{ty}"));
            id
        }

        fn emit_arithmetic(&mut self, op: BinaryOp, ty: usize, lhs: usize, rhs: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = {op:?} value{lhs}, value{rhs}: type{ty}"));
            id
        }
        fn emit_comparison(&mut self, op: BinaryOp, operand_ty: usize, lhs: usize, rhs: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = {op:?} value{lhs}, value{rhs}: type{operand_ty}"));
            id
        }
        fn emit_cast(&mut self, value: usize, from: usize, to: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = cast value{value}: type{from} -> type{to}"));
            id
        }
        fn emit_alloca(&mut self, ty: usize, name: &str) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = alloca type{ty} ({name})"));
            id
        }
        fn emit_load(&mut self, ptr: usize, ty: usize) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = load value{ptr}: type{ty}"));
            id
        }
        fn emit_store(&mut self, ptr: usize, value: usize) {
            self.log.push(format!("store value{value} -> value{ptr}"));
        }
        fn emit_call(&mut self, callee: usize, args: &[usize]) -> usize {
            let id = self.fresh();
            self.log.push(format!("value{id} = call fn{callee}{args:?}"));
            id
        }
        fn emit_return(&mut self, value: Option<usize>) {
            match value {
                Some(v) => self.log.push(format!("ret value{v}")),
                None => self.log.push("ret void".to_string()),
            }
        }
    }

    #[test]
    fn lowers_a_function_that_adds_its_arguments() {
        let body = Statement::block(
            vec![Statement::return_value(
                Value::binary(BinaryOp::Add, Value::symbol("a", r()), Value::symbol("b", r()), r()),
                r(),
            )],
            r(),
        );
        let mut func = Declaration::function(
            "add",
            vec![
                Declaration::variable("a", i32_ty(), None, false, r()),
                Declaration::variable("b", i32_ty(), None, false, r()),
            ],
            i32_ty(),
            body,
            r(),
        );
        func.set_resolved_type(Some(Type::function(i32_ty(), vec![i32_ty(), i32_ty()], r())));
        // Resolve both arg symbols and set the Add expression's type, as
        // `forge_sema::validation_pass` would have before codegen runs.
        if let forge_syntax::Declaration::Function(f) = &mut func {
            let arg_ids: Vec<_> = f.args.iter().map(|a| a.as_declaration().unwrap().id()).collect();
            if let forge_syntax::Statement::Block(b) = f.body.as_statement_mut().unwrap() {
                if let forge_syntax::Statement::Return(ret) = b.statements[0].as_statement_mut().unwrap() {
                    if let forge_syntax::Value::Binary(bin) = ret.value.as_value_mut().unwrap() {
                        if let forge_syntax::Value::Symbol(s) = bin.lhs.as_value_mut().unwrap() {
                            s.referenced = Some(arg_ids[0]);
                            s.resolved_type = Some(i32_ty());
                        }
                        if let forge_syntax::Value::Symbol(s) = bin.rhs.as_value_mut().unwrap() {
                            s.referenced = Some(arg_ids[1]);
                            s.resolved_type = Some(i32_ty());
                        }
                        bin.resolved_type = Some(i32_ty());
                    }
                }
            }
        }

        let unit = TranslationUnit::new(vec![func], r());
        let mut ctx = MockContext::default();
        let mut lowerer = Lowerer::new();
        lowerer.lower_translation_unit(&mut ctx, &unit).unwrap();

        assert!(ctx.log.iter().any(|l| l.contains("Add")));
        assert!(ctx.log.iter().any(|l| l.starts_with("ret value")));
        assert!(!ctx.log.iter().any(|l| l == "ret void"));
    }

    #[test]
    fn void_function_falling_off_the_end_gets_an_implicit_return() {
        let func = Declaration::function("f", vec![], Type::basic(BasicKind::Void, r()), Statement::block(vec![], r()), r());
        let unit = TranslationUnit::new(vec![func], r());
        let mut ctx = MockContext::default();
        Lowerer::new().lower_translation_unit(&mut ctx, &unit).unwrap();
        assert!(ctx.log.iter().any(|l| l == "ret void"));
    }

    #[test]
    fn while_loop_creates_condition_body_and_after_blocks() {
        let body = Statement::block(
            vec![Statement::while_(Value::literal_bool(true, r()), Statement::block(vec![], r()), false, r())],
            r(),
        );
        let func = Declaration::function("f", vec![], Type::basic(BasicKind::Void, r()), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let mut ctx = MockContext::default();
        Lowerer::new().lower_translation_unit(&mut ctx, &unit).unwrap();

        let block_labels: Vec<_> = ctx.log.iter().filter(|l| l.contains("while.")).collect();
        assert!(block_labels.iter().any(|l| l.contains("while.cond")));
        assert!(block_labels.iter().any(|l| l.contains("while.body")));
        assert!(block_labels.iter().any(|l| l.contains("while.end")));
    }

    #[test]
    fn if_with_both_branches_returning_never_reaches_merge() {
        let body = Statement::block(
            vec![Statement::if_(
                Value::literal_bool(true, r()),
                Statement::return_void(r()),
                Some(Statement::return_void(r())),
                r(),
            )],
            r(),
        );
        let func = Declaration::function("f", vec![], Type::basic(BasicKind::Void, r()), body, r());
        let unit = TranslationUnit::new(vec![func], r());
        let mut ctx = MockContext::default();
        Lowerer::new().lower_translation_unit(&mut ctx, &unit).unwrap();

        // Both arms return, so nothing ever branches into `if.end`.
        assert!(!ctx.log.iter().any(|l| l.starts_with("br") && l.contains("if.end")));
    }
}
