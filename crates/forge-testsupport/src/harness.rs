//! Functional test harness (§4.J): source string in, each expectation
//! assertable independently.
//!
//! The core specifies the lexer and parser as external collaborators (§1
//! Non-goals) — this workspace carries neither. `run` therefore takes the
//! parse step as a closure instead of a concrete `fn parse(&str) -> ...`, so
//! a caller with an actual Forge grammar can drive this harness without
//! `forge-testsupport` depending on it.

use forge_core::{MessageContext, Reporter};
use forge_sema::{validation_pass, TargetInfo};
use forge_syntax::{Node, TranslationUnit};

use crate::error::HarnessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedState {
    UnrecoverableParsingFailure,
    ErrorsAfterPasses,
    Success,
}

/// What a real backend hands back through the harness's codegen stage:
/// its own opaque IR print, and an optional JIT hook invoked once codegen
/// succeeds. Neither a concrete backend nor a JIT driver lives in this
/// workspace, so both are supplied by the caller.
pub struct BackendRun<'a, C: forge_codegen::Context> {
    pub context: &'a mut C,
    pub render_ir: Option<&'a dyn Fn(&C) -> String>,
    pub jit: Option<&'a mut dyn FnMut(&mut C, &forge_codegen::Lowerer<C>) -> Result<(), HarnessError>>,
}

#[derive(Debug, Clone)]
pub struct FunctionalOutcome {
    pub state: ExpectedState,
    pub debug_tree: Option<String>,
    pub diagnostic_report: String,
    pub backend_ir: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Expectation<'a> {
    pub state: Option<ExpectedState>,
    pub debug_tree: Option<&'a str>,
    pub diagnostic_report: Option<&'a str>,
    pub backend_ir: Option<&'a str>,
}

impl<'a> Expectation<'a> {
    pub fn state(state: ExpectedState) -> Self {
        Expectation { state: Some(state), ..Default::default() }
    }

    pub fn debug_tree(mut self, tree: &'a str) -> Self {
        self.debug_tree = Some(tree);
        self
    }

    pub fn diagnostic_report(mut self, report: &'a str) -> Self {
        self.diagnostic_report = Some(report);
        self
    }

    pub fn backend_ir(mut self, ir: &'a str) -> Self {
        self.backend_ir = Some(ir);
        self
    }
}

/// Runs lexer (external) → parser (external) → validation Pass → codegen,
/// then optionally the caller's JIT hook, asserting nothing itself — call
/// [`assert_matches`] against the result.
pub fn run<C: forge_codegen::Context>(
    source: &str,
    parse: impl FnOnce(&str, &mut MessageContext) -> Option<TranslationUnit>,
    target: TargetInfo,
    backend: Option<BackendRun<'_, C>>,
) -> Result<FunctionalOutcome, HarnessError> {
    let mut messages = MessageContext::new();

    let Some(unit) = parse(source, &mut messages) else {
        return Ok(FunctionalOutcome {
            state: ExpectedState::UnrecoverableParsingFailure,
            debug_tree: None,
            diagnostic_report: Reporter::new(&messages).render(),
            backend_ir: None,
        });
    };

    let mut node = Node::TranslationUnit(unit);
    validation_pass(target).run(&mut messages, &mut node);

    let mut debug_tree = String::new();
    node.format_debug(&mut debug_tree, 0).expect("String writer never fails");

    if !messages.is_success() {
        return Ok(FunctionalOutcome {
            state: ExpectedState::ErrorsAfterPasses,
            debug_tree: Some(debug_tree),
            diagnostic_report: Reporter::new(&messages).render(),
            backend_ir: None,
        });
    }

    let unit = match node {
        Node::TranslationUnit(unit) => unit,
        _ => unreachable!("root node never changes family across a Pass"),
    };

    let mut backend_ir = None;
    if let Some(run) = backend {
        let mut lowerer = forge_codegen::Lowerer::new();
        lowerer.lower_translation_unit(run.context, &unit)?;
        if let Some(render_ir) = run.render_ir {
            backend_ir = Some(render_ir(run.context));
        }
        if let Some(jit) = run.jit {
            jit(run.context, &lowerer)?;
        }
    }

    Ok(FunctionalOutcome {
        state: ExpectedState::Success,
        debug_tree: Some(debug_tree),
        diagnostic_report: Reporter::new(&messages).render(),
        backend_ir,
    })
}

/// Checks `outcome` against every field `expectation` set, independently —
/// a missing field in `expectation` is simply not asserted.
pub fn assert_matches(outcome: &FunctionalOutcome, expectation: &Expectation) -> Result<(), HarnessError> {
    if let Some(state) = expectation.state {
        if outcome.state != state {
            return Err(HarnessError::Mismatch {
                expected: format!("{state:?}"),
                actual: format!("{:?}", outcome.state),
            });
        }
    }
    if let Some(expected) = expectation.debug_tree {
        let actual = outcome.debug_tree.as_deref().unwrap_or("");
        if actual != expected {
            return Err(HarnessError::Mismatch { expected: expected.to_string(), actual: actual.to_string() });
        }
    }
    if let Some(expected) = expectation.diagnostic_report {
        if outcome.diagnostic_report != expected {
            return Err(HarnessError::Mismatch {
                expected: expected.to_string(),
                actual: outcome.diagnostic_report.clone(),
            });
        }
    }
    if let Some(expected) = expectation.backend_ir {
        let actual = outcome.backend_ir.as_deref().unwrap_or("");
        if actual != expected {
            return Err(HarnessError::Mismatch { expected: expected.to_string(), actual: actual.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_syntax::{BasicKind, Declaration, Statement, Type};

    fn r() -> forge_core::SourceRange {
        forge_core::SourceRange::synthetic()
    }

    fn parse_empty_unit(_source: &str, _messages: &mut MessageContext) -> Option<TranslationUnit> {
        let func = Declaration::function("f", vec![], Type::basic(BasicKind::Void, r()), Statement::block(vec![Statement::return_void(r())], r()), r());
        Some(TranslationUnit::new(vec![func], r()))
    }

    fn never_parses(_source: &str, _messages: &mut MessageContext) -> Option<TranslationUnit> {
        None
    }

    struct NullContext;
    impl forge_codegen::Context for NullContext {
        type Type = ();
        type Function = ();
        type Block = ();
        type Value = ();
        fn pointer_bit_width(&self) -> u32 { 64 }
        fn lower_basic_type(&mut self, _kind: forge_syntax::BasicKind) {}
        fn lower_bit_width_type(&mut self, _kind: forge_syntax::BitWidthKind, _bit_width: u32) {}
        fn lower_pointer_type(&mut self, _pointee: ()) {}
        fn create_function_type(&mut self, _return_type: (), _arg_types: &[()]) {}
        fn create_function(&mut self, _name: &str, _function_type: ()) {}
        fn function_arg_value(&mut self, _function: (), _index: usize) {}
        fn create_basic_block(&mut self, _function: (), _label: &str) {}
        fn set_insertion_point(&mut self, _block: ()) {}
        fn create_branch(&mut self, _target: ()) {}
        fn create_conditional_branch(&mut self, _condition: (), _then_block: (), _else_block: ()) {}
        fn const_bool(&mut self, _value: bool) {}
        fn const_number(&mut self, _value: forge_syntax::NumberLiteral, _ty: ()) {}
        fn emit_arithmetic(&mut self, _op: forge_syntax::BinaryOp, _ty: (), _lhs: (), _rhs: ()) {}
        fn emit_comparison(&mut self, _op: forge_syntax::BinaryOp, _operand_ty: (), _lhs: (), _rhs: ()) {}
        fn emit_cast(&mut self, _value: (), _from: (), _to: ()) {}
        fn emit_alloca(&mut self, _ty: (), _name: &str) {}
        fn emit_load(&mut self, _ptr: (), _ty: ()) {}
        fn emit_store(&mut self, _ptr: (), _value: ()) {}
        fn emit_call(&mut self, _callee: (), _args: &[()]) {}
        fn emit_return(&mut self, _value: Option<()>) {}
    }

    #[test]
    fn unrecoverable_parse_skips_passes_and_codegen() {
        let outcome = run::<NullContext>(
            "garbage",
            never_parses,
            TargetInfo::LP64,
            None,
        )
        .unwrap();
        assert_matches(&outcome, &Expectation::state(ExpectedState::UnrecoverableParsingFailure)).unwrap();
        assert!(outcome.debug_tree.is_none());
    }

    #[test]
    fn clean_tree_reaches_success_without_a_backend() {
        let outcome = run::<NullContext>("fn f() {}", parse_empty_unit, TargetInfo::LP64, None).unwrap();
        assert_matches(&outcome, &Expectation::state(ExpectedState::Success)).unwrap();
        assert!(outcome.debug_tree.unwrap().contains("Declaration.Function"));
    }

    #[test]
    fn clean_tree_runs_codegen_when_a_backend_is_supplied() {
        let mut ctx = NullContext;
        let outcome = run(
            "fn f() {}",
            parse_empty_unit,
            TargetInfo::LP64,
            Some(BackendRun { context: &mut ctx, render_ir: None, jit: None }),
        )
        .unwrap();
        assert_matches(&outcome, &Expectation::state(ExpectedState::Success)).unwrap();
    }

    #[test]
    fn mismatch_renders_both_sides() {
        let outcome = run::<NullContext>("fn f() {}", parse_empty_unit, TargetInfo::LP64, None).unwrap();
        let err = assert_matches(&outcome, &Expectation::state(ExpectedState::ErrorsAfterPasses)).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("expected"));
        assert!(text.contains("ErrorsAfterPasses"));
    }
}
