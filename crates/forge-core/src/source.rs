//! Source buffers, line indexing, and source locations/ranges.

use std::cmp::Ordering;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// A string with precomputed line-start offsets.
///
/// Grapheme clusters, not code points, are the unit of column counting; an
/// external Unicode segmentation crate drives that here. Tabs are stored
/// verbatim and only expanded by the reporter when quoting source.
#[derive(Debug, Clone)]
pub struct LineIndexedString {
    text: String,
    line_starts: Vec<u32>,
}

impl LineIndexedString {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0u32];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((offset + 1) as u32);
            }
        }
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines; a trailing newline yields one additional empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns line `n` (1-based), excluding its terminating newline.
    pub fn try_get_line(&self, n: u32) -> Option<&str> {
        if n == 0 {
            return None;
        }
        let index = (n - 1) as usize;
        let start = *self.line_starts.get(index)? as usize;
        let end = match self.line_starts.get(index + 1) {
            Some(&next) => {
                let next = next as usize;
                if next > start && self.text.as_bytes()[next - 1] == b'\n' {
                    next - 1
                } else {
                    next
                }
            }
            None => self.text.len(),
        };
        Some(&self.text[start..end])
    }

    /// 1-based line number containing the given byte offset.
    pub fn line_of_offset(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => (idx + 1) as u32,
            Err(idx) => idx as u32,
        }
    }

    /// 1-based grapheme-cluster column of `offset` within its line.
    pub fn column_of_offset(&self, offset: u32) -> u32 {
        let line = self.line_of_offset(offset);
        let Some(line_text) = self.try_get_line(line) else {
            return 1;
        };
        let line_start = self.line_starts[(line - 1) as usize];
        let within = (offset - line_start) as usize;
        let mut column = 1u32;
        for (byte_off, _) in line_text.grapheme_indices(true) {
            if byte_off >= within {
                break;
            }
            column += 1;
        }
        column
    }
}

/// A named, immutable source buffer.
#[derive(Debug)]
pub struct Source {
    path: String,
    indexed: LineIndexedString,
}

impl Source {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            path: path.into(),
            indexed: LineIndexedString::new(content),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        self.indexed.text()
    }

    pub fn lines(&self) -> &LineIndexedString {
        &self.indexed
    }
}

impl PartialEq for Source {
    /// Source identity is pointer identity, never path/content equality.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Source {}

/// A point within a source: optional file, optional 1-based line/column, optional byte offset.
#[derive(Debug, Clone, Default)]
pub struct SourceLocation {
    pub source: Option<Rc<Source>>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub offset: Option<u32>,
}

impl SourceLocation {
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn at_offset(source: Rc<Source>, offset: u32) -> Self {
        let line = source.lines().line_of_offset(offset);
        let column = source.lines().column_of_offset(offset);
        Self {
            source: Some(source),
            line: Some(line),
            column: Some(column),
            offset: Some(offset),
        }
    }

    fn same_source(&self, other: &Self) -> bool {
        match (&self.source, &other.source) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for SourceLocation {
    fn eq(&self, other: &Self) -> bool {
        self.same_source(other) && self.offset == other.offset
    }
}
impl Eq for SourceLocation {}

/// Locations without a source precede those with one; among same-source-ness,
/// locations without an offset precede those with one; otherwise offsets compare.
impl PartialOrd for SourceLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.source.is_some(), other.source.is_some()) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            _ => {}
        }
        match (self.offset, other.offset) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(&b),
        }
    }
}

/// A start location and an optional end location.
///
/// Invariant: if `end` is present, `start.source` and `end.source` refer to
/// the same `Source` (by pointer identity).
#[derive(Debug, Clone, Default)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: Option<SourceLocation>,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        debug_assert!(start.same_source(&end), "range endpoints must share a source");
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn point(start: SourceLocation) -> Self {
        Self { start, end: None }
    }

    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn end_or_start(&self) -> &SourceLocation {
        self.end.as_ref().unwrap_or(&self.start)
    }

    /// Combine two ranges: start = min(starts), end = max(ends).
    pub fn combine(&self, other: &SourceRange) -> SourceRange {
        let start = if self.start <= other.start {
            self.start.clone()
        } else {
            other.start.clone()
        };
        let self_end = self.end_or_start();
        let other_end = other.end_or_start();
        let end = if self_end >= other_end {
            self_end.clone()
        } else {
            other_end.clone()
        };
        SourceRange {
            start,
            end: Some(end),
        }
    }

    pub fn line_span(&self) -> (u32, u32) {
        let start_line = self.start.line.unwrap_or(1);
        let end_line = self.end.as_ref().and_then(|e| e.line).unwrap_or(start_line);
        (start_line.min(end_line), start_line.max(end_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_indexing_counts_trailing_newline_as_extra_line() {
        let s = LineIndexedString::new("a\nb\n");
        assert_eq!(s.line_count(), 3);
        assert_eq!(s.try_get_line(1), Some("a"));
        assert_eq!(s.try_get_line(2), Some("b"));
        assert_eq!(s.try_get_line(3), Some(""));
        assert_eq!(s.try_get_line(4), None);
        assert_eq!(s.try_get_line(0), None);
    }

    #[test]
    fn location_ordering_no_source_precedes_source() {
        let a = SourceLocation::synthetic();
        let src = Source::new("x.fg", "abc");
        let b = SourceLocation::at_offset(src, 0);
        assert!(a < b);
    }

    #[test]
    fn two_different_sources_are_unordered_by_equality() {
        let a = Source::new("a.fg", "x");
        let b = Source::new("b.fg", "x");
        let loc_a = SourceLocation::at_offset(a, 0);
        let loc_b = SourceLocation::at_offset(b, 0);
        assert_ne!(loc_a, loc_b);
    }

    #[test]
    fn combine_takes_min_start_max_end() {
        let src = Source::new("x.fg", "0123456789");
        let r1 = SourceRange::new(
            SourceLocation::at_offset(src.clone(), 2),
            SourceLocation::at_offset(src.clone(), 4),
        );
        let r2 = SourceRange::new(
            SourceLocation::at_offset(src.clone(), 1),
            SourceLocation::at_offset(src.clone(), 6),
        );
        let combined = r1.combine(&r2);
        assert_eq!(combined.start.offset, Some(1));
        assert_eq!(combined.end.unwrap().offset, Some(6));
    }
}
