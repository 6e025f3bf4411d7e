//! Source-quoting, optionally colorized diagnostic reporter.

use std::fmt::Write as _;

use super::context::MessageContext;
use super::message::Message;
use super::severity::Severity;
use crate::source::{Source, SourceRange};

/// Prints a `MessageContext` against the `Source` its ranges point into.
///
/// Builder-configured: colorization can be toggled for non-TTY output so the
/// rendered text stays deterministic (used by snapshot tests).
pub struct Reporter<'a> {
    context: &'a MessageContext,
    colored: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(context: &'a MessageContext) -> Self {
        Self {
            context,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let width = line_number_width(self.context.max_line_number());
        for message in self.context.messages_sorted() {
            self.render_message(&mut out, message, 0, width);
        }
        write!(out, "{}", summary_line(self.context)).ok();
        out
    }

    fn render_message(&self, out: &mut String, message: &Message, depth: usize, width: usize) {
        let indent = "  ".repeat(depth);
        let loc = &message.range.start;
        let path = loc
            .source
            .as_ref()
            .map(|s| s.path())
            .unwrap_or("<synthetic>");
        let line = loc.line.unwrap_or(0);
        let col = loc.column.unwrap_or(0);

        let severity_text = if self.colored {
            format!(
                "{}{}\x1b[0m",
                message.severity.color_code(),
                message.severity.display_name()
            )
        } else {
            message.severity.display_name().to_string()
        };

        write!(out, "{indent}{path}:{line}:{col} - {severity_text}").ok();
        if let Some(code) = message.code {
            write!(out, " {code}").ok();
        }
        writeln!(out, ": {}", message.text).ok();

        if depth == 0 {
            writeln!(out).ok();
            if let Some(source) = &loc.source {
                render_quoted_source(out, source, &message.range, width);
            }
            writeln!(out).ok();
        }

        for child in &message.children {
            self.render_message(out, child, depth + 1, width);
        }
    }
}

fn line_number_width(max_line: u32) -> usize {
    max_line.max(1).to_string().len()
}

/// Renders each source line spanned by `range`, followed by a caret/underline
/// line. Shared leading whitespace across the quoted lines is trimmed; tabs
/// expand to two visual columns.
fn render_quoted_source(out: &mut String, source: &Source, range: &SourceRange, width: usize) {
    let (start_line, end_line) = range.line_span();
    let lines: Vec<&str> = (start_line..=end_line)
        .filter_map(|n| source.lines().try_get_line(n))
        .collect();
    if lines.is_empty() {
        return;
    }

    let shared_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    for (i, line) in lines.iter().enumerate() {
        let n = start_line + i as u32;
        let trimmed = if line.len() >= shared_indent {
            &line[shared_indent..]
        } else {
            *line
        };
        let expanded = expand_tabs(trimmed);
        writeln!(out, "{:>width$}  {}", n, expanded, width = width).ok();
    }

    let start_col = range.start.column.unwrap_or(1) as usize;
    let end_col = range
        .end
        .as_ref()
        .and_then(|e| e.column)
        .unwrap_or(start_col as u32 + 1) as usize;
    let underline_start = start_col.saturating_sub(1).saturating_sub(shared_indent);
    let underline_len = end_col.saturating_sub(start_col).max(1);
    writeln!(
        out,
        "{:width$}  {}{}",
        "",
        " ".repeat(underline_start),
        "^".repeat(underline_len),
        width = width
    )
    .ok();
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', "  ")
}

fn summary_line(context: &MessageContext) -> String {
    let errors = context.error_count();
    let warnings = context.warning_count();
    match (errors, warnings) {
        (0, 0) => String::new(),
        (e, 0) => format!("{e} error{}", plural(e)),
        (0, w) => format!("{w} warning{}", plural(w)),
        (e, w) => format!("{e} error{}, {w} warning{}", plural(e), plural(w)),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceLocation;

    #[test]
    fn summary_omits_zero_halves() {
        let ctx = MessageContext::new();
        assert_eq!(summary_line(&ctx), "");

        let src = Source::new("x.fg", "abc");
        let mut ctx = MessageContext::new();
        ctx.emit(
            SourceRange::point(SourceLocation::at_offset(src, 0)),
            Severity::ERROR,
            "boom",
        );
        assert_eq!(summary_line(&ctx), "1 error");
    }

    #[test]
    fn render_includes_path_line_col_and_text() {
        let src = Source::new("main.fg", "let x = 1;\n");
        let mut ctx = MessageContext::new();
        ctx.emit(
            SourceRange::point(SourceLocation::at_offset(src, 4)),
            Severity::ERROR,
            "undeclared variable `x`",
        );
        let rendered = Reporter::new(&ctx).render();
        assert!(rendered.contains("main.fg:1:5 - error: undeclared variable `x`"));
        assert!(rendered.contains("let x = 1;"));
    }
}
