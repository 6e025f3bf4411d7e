//! Structured diagnostic messages with nested children.

use super::severity::Severity;
use crate::source::SourceRange;

/// A single diagnostic: a source range, severity, optional short code, text,
/// and any nested child messages (notes, suggestions).
#[derive(Debug, Clone)]
pub struct Message {
    pub range: SourceRange,
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub text: String,
    pub children: Vec<Message>,
}

impl Message {
    pub fn new(range: SourceRange, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            code: None,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Appends a nested message and returns a reference to it for chaining.
    pub fn child(
        &mut self,
        range: SourceRange,
        severity: Severity,
        text: impl Into<String>,
    ) -> &mut Message {
        self.children.push(Message::new(range, severity, text));
        self.children.last_mut().expect("just pushed")
    }

    pub fn note(&mut self, range: SourceRange, text: impl Into<String>) -> &mut Message {
        self.child(range, Severity::NOTE, text)
    }

    pub fn suggest(&mut self, range: SourceRange, text: impl Into<String>) -> &mut Message {
        self.child(range, Severity::SUGGESTION, text)
    }
}
