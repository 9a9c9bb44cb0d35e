//! Leaf productions: bracketed number lists, special values, plain values
//! and EC numbers.

use smol_str::SmolStr;

use super::cursor::Cursor;
use crate::parser::ast::{EcNumber, SpecialValue};
use crate::parser::errors::ParseError;
use crate::parser::lexer::Token;

/// `#n#` with exactly one protein number.
pub(crate) fn protein(cur: &mut Cursor<'_>) -> Result<u32, ParseError> {
    const P: &str = "protein";
    let start = cur.pos();
    let numbers = pound_list(cur, P)?;
    if numbers.len() == 1 {
        Ok(numbers[0])
    } else {
        Err(cur.error_at(start, P))
    }
}

/// `#n, m, ...#` with at least one protein number.
pub(crate) fn protein_information(cur: &mut Cursor<'_>) -> Result<Vec<u32>, ParseError> {
    pound_list(cur, "protein_information")
}

pub(crate) fn pound_list(
    cur: &mut Cursor<'_>,
    production: &'static str,
) -> Result<Vec<u32>, ParseError> {
    match cur.peek() {
        Some(Token::Pound) => {
            cur.advance();
        }
        _ => return Err(cur.error(production)),
    }
    let mut numbers = Vec::new();
    while let Some(Token::ProteinNumber(n)) = cur.peek() {
        numbers.push(*n);
        cur.advance();
    }
    if numbers.is_empty() {
        return Err(cur.error(production));
    }
    match cur.peek() {
        Some(Token::Pound) => {
            cur.advance();
            Ok(numbers)
        }
        _ => Err(cur.error(production)),
    }
}

/// `<n, m, ...>` with at least one citation number.
pub(crate) fn literature_citation(cur: &mut Cursor<'_>) -> Result<Vec<u32>, ParseError> {
    angle_list(cur, "literature_citation")
}

pub(crate) fn angle_list(
    cur: &mut Cursor<'_>,
    production: &'static str,
) -> Result<Vec<u32>, ParseError> {
    match cur.peek() {
        Some(Token::LeftAngle) => {
            cur.advance();
        }
        _ => return Err(cur.error(production)),
    }
    let mut numbers = Vec::new();
    while let Some(Token::CitationNumber(n)) = cur.peek() {
        numbers.push(*n);
        cur.advance();
    }
    if numbers.is_empty() {
        return Err(cur.error(production));
    }
    match cur.peek() {
        Some(Token::RightAngle) => {
            cur.advance();
            Ok(numbers)
        }
        _ => Err(cur.error(production)),
    }
}

/// `{...}` with at least one text token.
pub(crate) fn special(cur: &mut Cursor<'_>) -> Result<SpecialValue, ParseError> {
    const P: &str = "special";
    let start = cur.pos();
    let value = curly_value(cur, P)?;
    if value.tokens.is_empty() {
        return Err(cur.error_at(start, P));
    }
    Ok(value)
}

/// `{...}`, empty interior allowed. Slots that need text check themselves.
pub(crate) fn curly_value(
    cur: &mut Cursor<'_>,
    production: &'static str,
) -> Result<SpecialValue, ParseError> {
    match cur.peek() {
        Some(Token::LeftCurly) => {
            cur.advance();
        }
        _ => return Err(cur.error(production)),
    }
    let mut tokens = Vec::new();
    while let Some(Token::SpecialText(text)) = cur.peek() {
        tokens.push(text.clone());
        cur.advance();
    }
    match cur.peek() {
        Some(Token::RightCurly) => {
            cur.advance();
            Ok(SpecialValue { tokens })
        }
        _ => Err(cur.error(production)),
    }
}

/// Free-text value: content tokens, with parenthesized runs flattened into
/// the token list as literal `(` and `)` tokens.
pub(crate) fn value(cur: &mut Cursor<'_>) -> Result<Vec<SmolStr>, ParseError> {
    const P: &str = "value";
    let mut tokens = Vec::new();
    loop {
        match cur.peek() {
            Some(Token::Content(text)) => {
                tokens.push(text.clone());
                cur.advance();
            }
            Some(Token::LeftParen) => {
                let (blobs, _) = paren_group(cur, P)?;
                flatten_paren(&mut tokens, blobs);
            }
            _ => return Ok(tokens),
        }
    }
}

/// Collects one balanced `(...)` group. The tokenizer has already matched
/// the closing parenthesis over nested depth, so the interior is a flat run
/// of text blobs. Returns the blobs and the token index of the opener.
pub(crate) fn paren_group(
    cur: &mut Cursor<'_>,
    production: &'static str,
) -> Result<(Vec<SmolStr>, usize), ParseError> {
    let start = cur.pos();
    match cur.peek() {
        Some(Token::LeftParen) => {
            cur.advance();
        }
        _ => return Err(cur.error(production)),
    }
    let mut blobs = Vec::new();
    loop {
        match cur.peek() {
            Some(Token::CommentText(text)) => {
                blobs.push(text.clone());
                cur.advance();
            }
            Some(Token::RightParen) => {
                cur.advance();
                return Ok((blobs, start));
            }
            _ => return Err(cur.error(production)),
        }
    }
}

pub(crate) fn flatten_paren(tokens: &mut Vec<SmolStr>, blobs: Vec<SmolStr>) {
    tokens.push(SmolStr::new_static("("));
    tokens.extend(blobs);
    tokens.push(SmolStr::new_static(")"));
}

/// An EC number standing alone, e.g. `1.1.1.1` or `4.2.1.n5`.
pub(crate) fn ec_number(cur: &mut Cursor<'_>) -> Result<EcNumber, ParseError> {
    const P: &str = "ec_number";
    let text = match cur.peek() {
        Some(Token::Content(text)) | Some(Token::EcNumber(text)) => text.clone(),
        _ => return Err(cur.error(P)),
    };
    match EcNumber::parse(&text) {
        Some(ec) => {
            cur.advance();
            Ok(ec)
        }
        None => Err(cur.error(P)),
    }
}
