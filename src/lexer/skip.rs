//! Whitespace and comment handling for the lexer.
//!
//! Newlines are significant in Vela (they act as optional statement
//! separators), so only spaces, tabs, and carriage returns are skipped
//! here. Line comments start with `#` and run to the end of the line;
//! the terminating newline is left in place so it still produces a
//! `Newline` token.

use super::Lexer;

impl<'a> Lexer<'a> {
    /// Skips horizontal whitespace and line comments in a loop.
    pub(super) fn skip_trivia(&mut self) {
        loop {
            self.skip_whitespace();
            if !self.skip_comment() {
                break;
            }
        }
    }

    /// Skips consecutive spaces, tabs, and carriage returns.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skips a line comment if one is present at the current position.
    ///
    /// # Returns
    ///
    /// `true` if a comment was skipped, `false` otherwise.
    fn skip_comment(&mut self) -> bool {
        if self.current_char() == Some('#') {
            while let Some(c) = self.current_char() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            true
        } else {
            false
        }
    }
}
