//! Append-only store of emitted diagnostic messages.

use super::message::Message;
use super::severity::Severity;
use crate::source::SourceRange;

/// Accumulates diagnostics emitted over the course of one or more passes.
///
/// `MessageContext` never removes or mutates a message after it is emitted;
/// callers that want to discard diagnostics construct a fresh context.
#[derive(Debug, Default)]
pub struct MessageContext {
    messages: Vec<Message>,
    error_count: usize,
    warning_count: usize,
    max_line_number: u32,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs and stores a message, updating error/warning counters and
    /// `max_line_number`. Returns a reference so callers can attach children.
    pub fn emit(
        &mut self,
        range: SourceRange,
        severity: Severity,
        text: impl Into<String>,
    ) -> &mut Message {
        self.note_severity(severity);
        self.note_line(&range);
        self.messages.push(Message::new(range, severity, text));
        self.messages.last_mut().expect("just pushed")
    }

    pub fn emit_coded(
        &mut self,
        range: SourceRange,
        severity: Severity,
        code: &'static str,
        text: impl Into<String>,
    ) -> &mut Message {
        self.note_severity(severity);
        self.note_line(&range);
        self.messages
            .push(Message::new(range, severity, text).with_code(code));
        self.messages.last_mut().expect("just pushed")
    }

    fn note_severity(&mut self, severity: Severity) {
        if severity >= Severity::ERROR {
            self.error_count += 1;
        } else if severity == Severity::WARNING {
            self.warning_count += 1;
        }
    }

    fn note_line(&mut self, range: &SourceRange) {
        let (_, end_line) = range.line_span();
        self.max_line_number = self.max_line_number.max(end_line);
    }

    /// Messages in insertion (emission) order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages sorted by (descending severity, ascending range start).
    pub fn messages_sorted(&self) -> Vec<&Message> {
        let mut sorted: Vec<&Message> = self.messages.iter().collect();
        sorted.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.range.start.cmp(&b.range.start))
        });
        sorted
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn max_line_number(&self) -> u32 {
        self.max_line_number
    }

    pub fn is_success(&self) -> bool {
        self.error_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Source, SourceLocation};

    fn range_at(src: &std::rc::Rc<crate::source::Source>, offset: u32) -> SourceRange {
        SourceRange::point(SourceLocation::at_offset(src.clone(), offset))
    }

    #[test]
    fn sorted_by_severity_desc_then_range_start_asc() {
        let src = Source::new("x.fg", "0123456789");
        let mut ctx = MessageContext::new();
        ctx.emit(range_at(&src, 5), Severity::WARNING, "w");
        ctx.emit(range_at(&src, 1), Severity::ERROR, "e1");
        ctx.emit(range_at(&src, 3), Severity::ERROR, "e2");

        let sorted = ctx.messages_sorted();
        let texts: Vec<&str> = sorted.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["e1", "e2", "w"]);
    }

    #[test]
    fn counts_errors_and_warnings_separately() {
        let src = Source::new("x.fg", "0123456789");
        let mut ctx = MessageContext::new();
        ctx.emit(range_at(&src, 0), Severity::ERROR, "e");
        ctx.emit(range_at(&src, 0), Severity::WARNING, "w");
        ctx.emit(range_at(&src, 0), Severity::FATAL_ERROR, "f");
        assert_eq!(ctx.error_count(), 2);
        assert_eq!(ctx.warning_count(), 1);
        assert!(!ctx.is_success());
    }
}
