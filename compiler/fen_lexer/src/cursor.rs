//! Char cursor over source text.
//!
//! The cursor advances character by character, tracking byte offset, line,
//! and column as it goes. Every token's start and end points come straight
//! off the cursor, so downstream faults always have exact coordinates.

use fen_ir::Point;

/// Read cursor with position tracking.
#[derive(Clone, Debug)]
pub struct Cursor<'src> {
    source: &'src str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character under the cursor, or `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    /// The character after the current one.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().nth(1)
    }

    /// Unconsumed remainder of the source.
    #[inline]
    pub fn rest(&self) -> &'src str {
        &self.source[self.offset..]
    }

    /// Current position as a point.
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.offset as u32, self.line, self.column)
    }

    /// Source text between a previous point's offset and the cursor.
    #[inline]
    pub fn slice_from(&self, start: Point) -> &'src str {
        &self.source[start.offset as usize..self.offset]
    }

    /// Consume and return the current character, updating line/column.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.current()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `n` characters.
    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Consume characters while `predicate` holds.
    pub fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if !predicate(c) {
                break;
            }
            self.bump();
        }
    }
}
