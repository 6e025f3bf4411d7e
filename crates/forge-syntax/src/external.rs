//! The lexer/parser handoff contract (§6). The core specifies these
//! interfaces; it does not implement a lexer or parser.

use forge_core::{MessageContext, SourceRange};

/// A lexical token: a kind tag, the range it spans, and the grapheme-cluster
/// text it carries (already normalized to UTF-8 on this side of the
/// contract; see §9 on UTF-16 grapheme-cluster views).
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub range: SourceRange,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenKindData {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenKind(pub &'static TokenKindData);

impl PartialEq for TokenKind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl Eq for TokenKind {}

/// What a parser consumes: a cursor over a token stream with save/restore
/// for backtracking, plus a message sink for recoverable parse errors.
pub trait ParsingContext {
    fn save_cursor(&self) -> usize;
    fn restore_cursor(&mut self, mark: usize);
    fn peek_next_token(&self) -> Option<&Token>;
    fn read_next_token(&mut self) -> Option<Token>;
    fn are_more_tokens(&self) -> bool;
    fn messages(&mut self) -> &mut MessageContext;
}

/// Recommended combinator shapes (§6) — not mandated, but named here so a
/// concrete parser crate built against this contract can implement them
/// against a uniform vocabulary.
pub trait ParserCombinators: ParsingContext {
    fn parse_optional<T>(&mut self, inner: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mark = self.save_cursor();
        let result = inner(self);
        if result.is_none() {
            self.restore_cursor(mark);
        }
        result
    }

    fn parse_any_of<T>(&mut self, alts: &[fn(&mut Self) -> Option<T>]) -> Option<T> {
        for alt in alts {
            let mark = self.save_cursor();
            if let Some(t) = alt(self) {
                return Some(t);
            }
            self.restore_cursor(mark);
        }
        None
    }
}

impl<T: ParsingContext> ParserCombinators for T {}
