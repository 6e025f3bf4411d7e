//! Diagnostic severities, ordered and globally unique.

/// Severity of a diagnostic message.
///
/// Ordered by numeric value: `SUGGESTION < NOTE < WARNING < ERROR < FATAL_ERROR`.
/// Compare by this ordering, never by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Suggestion,
    Note,
    Warning,
    Error,
    FatalError,
}

impl Severity {
    pub const SUGGESTION: Severity = Severity::Suggestion;
    pub const NOTE: Severity = Severity::Note;
    pub const WARNING: Severity = Severity::Warning;
    pub const ERROR: Severity = Severity::Error;
    pub const FATAL_ERROR: Severity = Severity::FatalError;

    pub fn display_name(self) -> &'static str {
        match self {
            Severity::Suggestion => "suggestion",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::FatalError => "fatal error",
        }
    }

    /// ANSI color code used by the reporter when writing to a TTY.
    pub fn color_code(self) -> &'static str {
        match self {
            Severity::Suggestion => "\x1b[36m",  // cyan
            Severity::Note => "\x1b[34m",        // blue
            Severity::Warning => "\x1b[33m",     // yellow
            Severity::Error => "\x1b[31m",       // red
            Severity::FatalError => "\x1b[1;31m", // bold red
        }
    }

    pub fn is_at_least(self, other: Severity) -> bool {
        self >= other
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_spec() {
        assert!(Severity::SUGGESTION < Severity::NOTE);
        assert!(Severity::NOTE < Severity::WARNING);
        assert!(Severity::WARNING < Severity::ERROR);
        assert!(Severity::ERROR < Severity::FATAL_ERROR);
    }
}
