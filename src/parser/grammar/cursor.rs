//! Token cursor shared by the grammar productions.

use text_size::TextSize;

use crate::parser::errors::ParseError;
use crate::parser::lexer::{Lexeme, Token};

/// Read-only cursor over a tokenized text.
///
/// Productions advance it token by token; on mismatch they build a
/// [`ParseError`] from the current position without consuming further.
pub(crate) struct Cursor<'t> {
    src: &'t str,
    lexemes: &'t [Lexeme],
    pos: usize,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(src: &'t str, lexemes: &'t [Lexeme]) -> Self {
        Self {
            src,
            lexemes,
            pos: 0,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek(&self) -> Option<&'t Token> {
        self.lexemes.get(self.pos).map(|lx| &lx.token)
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Lexeme> {
        let lexeme = self.lexemes.get(self.pos)?;
        self.pos += 1;
        Some(lexeme)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    /// Production failure at the current position.
    pub(crate) fn error(&self, production: &'static str) -> ParseError {
        self.error_at(self.pos, production)
    }

    /// Production failure anchored at an earlier token index.
    pub(crate) fn error_at(&self, at: usize, production: &'static str) -> ParseError {
        match self.lexemes.get(at) {
            Some(lexeme) => {
                let start = usize::from(lexeme.offset);
                ParseError::new(production, lexeme.offset, lexeme.line, &self.src[start..])
            }
            None => {
                let line = self.lexemes.last().map_or(1, |lx| lx.line);
                ParseError::new(production, TextSize::of(self.src), line, "")
            }
        }
    }

    /// All-or-nothing check: the production must have consumed every token.
    pub(crate) fn expect_end(&self, production: &'static str) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error(production))
        }
    }
}
