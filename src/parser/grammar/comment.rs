//! Interior grammar of `(...)` comment groups.
//!
//! The tokenizer delivers a comment group as opaque text blobs between the
//! balanced parentheses. The structure inside is textual: sub-comments
//! separated by `;` at nesting depth zero, each one carrying an optional
//! leading `#...#` protein list, free-text value tokens and an optional
//! trailing `<...>` citation list.

use smol_str::SmolStr;

use super::cursor::Cursor;
use crate::parser::ast::{Comment, CommentGroup};
use crate::parser::errors::ParseError;

/// Parses the blobs of one collected paren group. `at` is the token index
/// of the opening parenthesis, used to anchor errors at the group.
pub(crate) fn comment_group(
    cur: &Cursor<'_>,
    blobs: &[SmolStr],
    at: usize,
) -> Result<CommentGroup, ParseError> {
    let text = crate::parser::ast::join_tokens(blobs);
    from_text(&text).ok_or_else(|| cur.error_at(at, "comment_group"))
}

/// Text-level entry point. `()` is a valid zero-element group.
pub(crate) fn from_text(text: &str) -> Option<CommentGroup> {
    if text.trim().is_empty() {
        return Some(CommentGroup::default());
    }
    let mut comments = Vec::new();
    for part in split_comments(text) {
        comments.push(single_comment(part)?);
    }
    Some(CommentGroup { comments })
}

/// Splits on `;` outside nested parentheses. The group text is balanced,
/// the tokenizer only closes a group at depth zero.
fn split_comments(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn single_comment(text: &str) -> Option<Comment> {
    let mut rest = text.trim();
    let mut proteins = Vec::new();
    if let Some(inner) = rest.strip_prefix('#') {
        let end = inner.find('#')?;
        proteins = number_list(&inner[..end])?;
        rest = inner[end + 1..].trim_start();
    }

    let mut value = Vec::new();
    let mut citations = Vec::new();
    let mut depth = 0u32;
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => {
                depth += 1;
                value.push(SmolStr::new_static("("));
            }
            ')' => {
                depth = depth.saturating_sub(1);
                value.push(SmolStr::new_static(")"));
            }
            ';' if depth > 0 => value.push(SmolStr::new_static(";")),
            '<' => {
                let inner = &rest[i + 1..];
                let close = inner.find('>')?;
                citations = number_list(&inner[..close])?;
                // A citation list ends the sub-comment.
                if !inner[close + 1..].trim().is_empty() {
                    return None;
                }
                break;
            }
            '#' | '{' | '}' | '>' | ';' => return None,
            _ => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, d)) = chars.peek() {
                    if d.is_whitespace() || matches!(d, '(' | ')' | ';' | '<' | '>' | '#' | '{' | '}') {
                        break;
                    }
                    end = j + d.len_utf8();
                    chars.next();
                }
                value.push(SmolStr::new(&rest[i..end]));
            }
        }
    }

    Some(Comment {
        proteins,
        value,
        citations,
    })
}

/// `1, 2, 3` style lists inside `#...#` and `<...>`. At least one number,
/// separators are commas and whitespace.
fn number_list(text: &str) -> Option<Vec<u32>> {
    let mut numbers = Vec::new();
    for piece in text.split(|c: char| c == ',' || c.is_whitespace()) {
        if piece.is_empty() {
            continue;
        }
        numbers.push(piece.parse::<u32>().ok()?);
    }
    if numbers.is_empty() { None } else { Some(numbers) }
}
