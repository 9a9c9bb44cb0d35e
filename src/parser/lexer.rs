//! Logos-based mode-stack tokenizer for the flat-file dialect.
//!
//! Bracketed constructs need different tokenization rules than top-level
//! content (inside `#...#` only integers matter, inside `(...)` a nested
//! paren is plain text), so the tokenizer keeps an explicit stack of lexical
//! modes, one logos token enum per mode, and switches between them with
//! `morph()`. Each [`Tokenizer`] owns its own stack and position; concurrent
//! instances are independent.

use logos::Logos;
use smol_str::SmolStr;
use text_size::TextSize;
use tracing::{debug, warn};

/// One lexical token of the dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `ID` + tab, opening an enzyme record header.
    EnzymeStart,
    /// The dotted classification code captured after `ID`.
    EcNumber(SmolStr),
    /// `///`, terminating a record.
    End,
    /// A field heading: 2-4 uppercase alphanumerics + tab.
    Entry(SmolStr),
    /// The `PR` + tab heading.
    ProteinEntryStart,
    /// The `RF` + tab heading.
    ReferenceEntryStart,
    /// `#` opening or closing a protein reference list.
    Pound,
    /// Integer inside `#...#`.
    ProteinNumber(u32),
    /// `<` opening a citation reference list.
    LeftAngle,
    /// `>` closing a citation reference list.
    RightAngle,
    /// Integer inside `<...>`.
    CitationNumber(u32),
    /// `{` opening a special value.
    LeftCurly,
    /// `}` closing a special value.
    RightCurly,
    /// Text blob inside `{...}`.
    SpecialText(SmolStr),
    /// `(` opening a comment group.
    LeftParen,
    /// `)` closing a comment group.
    RightParen,
    /// Text blob inside `(...)`; nested parens arrive here as `(` / `)`.
    CommentText(SmolStr),
    /// Free text at entry level.
    Content(SmolStr),
    /// Protein database accession number, recognized inside `PR` entries.
    Accession(SmolStr),
    /// The `AND` joining accession numbers inside `PR` entries.
    And,
    /// Unrecognized character; tokenization skips it and continues.
    Error(char),
}

/// A token plus where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    /// 1-based line within the tokenized text.
    pub line: usize,
    /// Byte offset of the token's first character.
    pub offset: TextSize,
}

/// Tokenize an entire record text into a vector.
pub fn tokenize(input: &str) -> Vec<Lexeme> {
    Tokenizer::new(input).collect()
}

// ============================================================================
// MODE TOKEN ENUMS
// ============================================================================

/// Top-level tokens: headings, record markers, bracket openers, free content.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x0c\x0b]+")]
enum DefaultToken {
    #[token("ID\t", priority = 10)]
    EnzymeStart,
    #[token("PR\t", priority = 10)]
    ProteinEntryStart,
    #[token("RF\t", priority = 10)]
    ReferenceEntryStart,
    #[regex(r"[A-Z0-9]{2,4}\t", priority = 8)]
    Entry,
    #[token("///", priority = 10)]
    End,
    #[regex(r"\*[^\n]*\n")]
    SkipLine,
    #[regex(r"[A-Z0-9_]{4,}\n")]
    HeaderLine,
    #[token("#")]
    Pound,
    #[token("<")]
    LeftAngle,
    #[token("{")]
    LeftCurly,
    #[token("(")]
    LeftParen,
    #[regex(r"[^{}()<>#\s]+")]
    Content,
    #[regex(r"\n+")]
    Newline,
    #[regex(r".", priority = 0)]
    Invalid,
}

/// Default rules plus accession recognition, active inside `PR` entries.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x0c\x0b]+")]
enum ProtEntryToken {
    #[token("ID\t", priority = 10)]
    EnzymeStart,
    #[token("PR\t", priority = 10)]
    ProteinEntryStart,
    #[token("RF\t", priority = 10)]
    ReferenceEntryStart,
    #[regex(r"[A-Z0-9]{2,4}\t", priority = 8)]
    Entry,
    #[token("///", priority = 10)]
    End,
    #[regex(r"\*[^\n]*\n")]
    SkipLine,
    #[regex(r"[A-Z0-9_]{4,}\n")]
    HeaderLine,
    #[regex(
        r"([A-NR-Z][0-9]([A-Z][A-Z0-9][A-Z0-9][0-9]){1,2}|[OPQ][0-9][A-Z0-9][A-Z0-9][A-Z0-9][0-9])(\.[0-9]+)?",
        priority = 9
    )]
    Accession,
    #[token("AND")]
    And,
    #[token("#")]
    Pound,
    #[token("<")]
    LeftAngle,
    #[token("{")]
    LeftCurly,
    #[token("(")]
    LeftParen,
    #[regex(r"[^{}()<>#\s]+")]
    Content,
    #[regex(r"\n+")]
    Newline,
    #[regex(r".", priority = 0)]
    Invalid,
}

/// Inside `#...#`: integers separated by commas/whitespace.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ ,\t\r\x0c\x0b]+")]
enum ProteinToken {
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),
    #[token("#")]
    Pound,
    #[regex(r"\n+")]
    Newline,
    #[regex(r".", priority = 0)]
    Invalid,
}

/// Inside `<...>`: integers separated by commas/whitespace.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ ,\t\r\x0c\x0b]+")]
enum CitationToken {
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),
    #[token(">")]
    RightAngle,
    #[regex(r"\n+")]
    Newline,
    #[regex(r".", priority = 0)]
    Invalid,
}

/// Inside `{...}`: opaque text blobs.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x0c\x0b]+")]
enum SpecialToken {
    #[regex(r"[^{}\s]+")]
    Text,
    #[token("}")]
    RightCurly,
    #[regex(r"\n+")]
    Newline,
    #[regex(r".", priority = 0)]
    Invalid,
}

/// Inside `(...)`: text blobs with balance-tracked nested parens.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x0c\x0b]+")]
enum CommentToken {
    #[regex(r"[^()\s]+")]
    Text,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[regex(r"\n+")]
    Newline,
}

/// Between `ID` + tab and the classification code.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x0c\x0b]+")]
enum EnzymeToken {
    #[regex(r"n?[0-9]+(\.n?[0-9]+)*")]
    EcNumber,
    #[regex(r"\n+")]
    Newline,
    #[regex(r".", priority = 0)]
    Invalid,
}

// ============================================================================
// MODE STACK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Default,
    ProtEntry,
    Protein,
    Citation,
    Special,
    Comment,
    Enzyme,
}

/// The live logos lexer, tagged with its current mode.
enum ModeLexer<'a> {
    Default(logos::Lexer<'a, DefaultToken>),
    ProtEntry(logos::Lexer<'a, ProtEntryToken>),
    Protein(logos::Lexer<'a, ProteinToken>),
    Citation(logos::Lexer<'a, CitationToken>),
    Special(logos::Lexer<'a, SpecialToken>),
    Comment(logos::Lexer<'a, CommentToken>),
    Enzyme(logos::Lexer<'a, EnzymeToken>),
}

impl<'a> ModeLexer<'a> {
    /// Funnel any variant through the default lexer so a single `morph`
    /// chain covers every mode-to-mode transition.
    fn into_default(self) -> logos::Lexer<'a, DefaultToken> {
        match self {
            ModeLexer::Default(lx) => lx,
            ModeLexer::ProtEntry(lx) => lx.morph(),
            ModeLexer::Protein(lx) => lx.morph(),
            ModeLexer::Citation(lx) => lx.morph(),
            ModeLexer::Special(lx) => lx.morph(),
            ModeLexer::Comment(lx) => lx.morph(),
            ModeLexer::Enzyme(lx) => lx.morph(),
        }
    }

    fn into_mode(self, mode: Mode) -> Self {
        let lx = self.into_default();
        match mode {
            Mode::Default => ModeLexer::Default(lx),
            Mode::ProtEntry => ModeLexer::ProtEntry(lx.morph()),
            Mode::Protein => ModeLexer::Protein(lx.morph()),
            Mode::Citation => ModeLexer::Citation(lx.morph()),
            Mode::Special => ModeLexer::Special(lx.morph()),
            Mode::Comment => ModeLexer::Comment(lx.morph()),
            Mode::Enzyme => ModeLexer::Enzyme(lx.morph()),
        }
    }

    fn mode(&self) -> Mode {
        match self {
            ModeLexer::Default(_) => Mode::Default,
            ModeLexer::ProtEntry(_) => Mode::ProtEntry,
            ModeLexer::Protein(_) => Mode::Protein,
            ModeLexer::Citation(_) => Mode::Citation,
            ModeLexer::Special(_) => Mode::Special,
            ModeLexer::Comment(_) => Mode::Comment,
            ModeLexer::Enzyme(_) => Mode::Enzyme,
        }
    }
}

/// Raw per-mode token, captured before the borrow on the lexer ends.
enum Raw {
    Default(Result<DefaultToken, ()>),
    ProtEntry(Result<ProtEntryToken, ()>),
    Protein(Result<ProteinToken, ()>),
    Citation(Result<CitationToken, ()>),
    Special(Result<SpecialToken, ()>),
    Comment(Result<CommentToken, ()>),
    Enzyme(Result<EnzymeToken, ()>),
}

/// What to do with one raw token from the active mode.
enum Step {
    /// Trivia consumed; keep lexing.
    Skip,
    /// Emit in the current mode.
    Emit(Token),
    /// Suspend the current mode, enter the given one, emit.
    Open(Mode, Token),
    /// Return to the suspended mode, emit.
    Close(Token),
    /// Return to the suspended mode, then enter the given one, emit.
    CloseThenOpen(Mode, Token),
    /// Unwind the whole stack back to default, emit.
    Reset(Token),
}

// ============================================================================
// TOKENIZER
// ============================================================================

/// Iterator over [`Lexeme`]s of one record text.
pub struct Tokenizer<'a> {
    lexer: Option<ModeLexer<'a>>,
    /// Suspended modes; the current one is carried by `lexer`.
    stack: Vec<Mode>,
    line: usize,
    /// Paren depth inside the active comment group.
    depth: u32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Some(ModeLexer::Default(DefaultToken::lexer(input))),
            stack: Vec::new(),
            line: 1,
            depth: 0,
        }
    }

    /// 1-based line of the position the tokenizer has advanced to.
    pub fn line(&self) -> usize {
        self.line
    }

    fn count_newlines(&mut self, slice: &str) {
        self.line += slice.bytes().filter(|&b| b == b'\n').count();
    }

    /// Apply the mode transition a [`Step`] asks for.
    fn transition(&mut self, step: &Step) {
        match *step {
            Step::Skip | Step::Emit(_) => {}
            Step::Open(mode, _) => {
                let Some(lexer) = self.lexer.take() else {
                    return;
                };
                self.stack.push(lexer.mode());
                if mode == Mode::Comment {
                    self.depth = 1;
                }
                self.lexer = Some(lexer.into_mode(mode));
            }
            Step::Close(_) => {
                let Some(lexer) = self.lexer.take() else {
                    return;
                };
                let back = self.stack.pop().unwrap_or(Mode::Default);
                self.lexer = Some(lexer.into_mode(back));
            }
            Step::CloseThenOpen(mode, _) => {
                let Some(lexer) = self.lexer.take() else {
                    return;
                };
                let back = self.stack.pop().unwrap_or(Mode::Default);
                self.stack.push(back);
                if mode == Mode::Comment {
                    self.depth = 1;
                }
                self.lexer = Some(lexer.into_mode(mode));
            }
            Step::Reset(_) => {
                let Some(lexer) = self.lexer.take() else {
                    return;
                };
                self.stack.clear();
                self.depth = 0;
                self.lexer = Some(lexer.into_mode(Mode::Default));
            }
        }
    }

    fn default_step(&self, raw: Result<DefaultToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            DefaultToken::EnzymeStart => Step::Open(Mode::Enzyme, Token::EnzymeStart),
            DefaultToken::ProteinEntryStart => {
                Step::Open(Mode::ProtEntry, Token::ProteinEntryStart)
            }
            DefaultToken::ReferenceEntryStart => Step::Emit(Token::ReferenceEntryStart),
            DefaultToken::Entry => Step::Emit(Token::Entry(acronym(slice))),
            DefaultToken::End => Step::Reset(Token::End),
            DefaultToken::SkipLine => {
                debug!("skipping comment line {}", self.line);
                Step::Skip
            }
            DefaultToken::HeaderLine => {
                debug!("skipping section header line {}", self.line);
                Step::Skip
            }
            DefaultToken::Pound => Step::Open(Mode::Protein, Token::Pound),
            DefaultToken::LeftAngle => Step::Open(Mode::Citation, Token::LeftAngle),
            DefaultToken::LeftCurly => Step::Open(Mode::Special, Token::LeftCurly),
            DefaultToken::LeftParen => Step::Open(Mode::Comment, Token::LeftParen),
            DefaultToken::Content => Step::Emit(Token::Content(SmolStr::new(slice))),
            DefaultToken::Newline => Step::Skip,
            DefaultToken::Invalid => invalid(slice, self.line),
        }
    }

    fn protentry_step(&self, raw: Result<ProtEntryToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            // A heading other than PR ends the protein entry context.
            ProtEntryToken::EnzymeStart => Step::CloseThenOpen(Mode::Enzyme, Token::EnzymeStart),
            ProtEntryToken::ProteinEntryStart => Step::Emit(Token::ProteinEntryStart),
            ProtEntryToken::ReferenceEntryStart => Step::Close(Token::ReferenceEntryStart),
            ProtEntryToken::Entry => Step::Close(Token::Entry(acronym(slice))),
            ProtEntryToken::End => Step::Reset(Token::End),
            ProtEntryToken::SkipLine => {
                debug!("skipping comment line {}", self.line);
                Step::Skip
            }
            ProtEntryToken::HeaderLine => {
                debug!("skipping section header line {}", self.line);
                Step::Skip
            }
            ProtEntryToken::Accession => Step::Emit(Token::Accession(SmolStr::new(slice))),
            ProtEntryToken::And => Step::Emit(Token::And),
            ProtEntryToken::Pound => Step::Open(Mode::Protein, Token::Pound),
            ProtEntryToken::LeftAngle => Step::Open(Mode::Citation, Token::LeftAngle),
            ProtEntryToken::LeftCurly => Step::Open(Mode::Special, Token::LeftCurly),
            ProtEntryToken::LeftParen => Step::Open(Mode::Comment, Token::LeftParen),
            ProtEntryToken::Content => Step::Emit(Token::Content(SmolStr::new(slice))),
            ProtEntryToken::Newline => Step::Skip,
            ProtEntryToken::Invalid => invalid(slice, self.line),
        }
    }

    fn protein_step(&self, raw: Result<ProteinToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            ProteinToken::Number(n) => Step::Emit(Token::ProteinNumber(n)),
            ProteinToken::Pound => Step::Close(Token::Pound),
            ProteinToken::Newline => Step::Skip,
            ProteinToken::Invalid => invalid(slice, self.line),
        }
    }

    fn citation_step(&self, raw: Result<CitationToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            CitationToken::Number(n) => Step::Emit(Token::CitationNumber(n)),
            CitationToken::RightAngle => Step::Close(Token::RightAngle),
            CitationToken::Newline => Step::Skip,
            CitationToken::Invalid => invalid(slice, self.line),
        }
    }

    fn special_step(&self, raw: Result<SpecialToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            SpecialToken::Text => Step::Emit(Token::SpecialText(SmolStr::new(slice))),
            SpecialToken::RightCurly => Step::Close(Token::RightCurly),
            SpecialToken::Newline => Step::Skip,
            SpecialToken::Invalid => invalid(slice, self.line),
        }
    }

    fn comment_step(&mut self, raw: Result<CommentToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            CommentToken::Text => Step::Emit(Token::CommentText(SmolStr::new(slice))),
            CommentToken::LeftParen => {
                self.depth += 1;
                Step::Emit(Token::CommentText(SmolStr::new_static("(")))
            }
            CommentToken::RightParen => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    Step::Close(Token::RightParen)
                } else {
                    Step::Emit(Token::CommentText(SmolStr::new_static(")")))
                }
            }
            CommentToken::Newline => Step::Skip,
        }
    }

    fn enzyme_step(&self, raw: Result<EnzymeToken, ()>, slice: &str) -> Step {
        let Ok(tok) = raw else {
            return invalid(slice, self.line);
        };
        match tok {
            EnzymeToken::EcNumber => Step::Close(Token::EcNumber(SmolStr::new(slice))),
            EnzymeToken::Newline => Step::Skip,
            EnzymeToken::Invalid => invalid(slice, self.line),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        loop {
            let lexer = self.lexer.as_mut()?;
            // Pull one raw token from whichever mode is live.
            let (raw, slice, start) = match lexer {
                ModeLexer::Default(lx) => {
                    let raw = lx.next()?;
                    (Raw::Default(raw), lx.slice(), lx.span().start)
                }
                ModeLexer::ProtEntry(lx) => {
                    let raw = lx.next()?;
                    (Raw::ProtEntry(raw), lx.slice(), lx.span().start)
                }
                ModeLexer::Protein(lx) => {
                    let raw = lx.next()?;
                    (Raw::Protein(raw), lx.slice(), lx.span().start)
                }
                ModeLexer::Citation(lx) => {
                    let raw = lx.next()?;
                    (Raw::Citation(raw), lx.slice(), lx.span().start)
                }
                ModeLexer::Special(lx) => {
                    let raw = lx.next()?;
                    (Raw::Special(raw), lx.slice(), lx.span().start)
                }
                ModeLexer::Comment(lx) => {
                    let raw = lx.next()?;
                    (Raw::Comment(raw), lx.slice(), lx.span().start)
                }
                ModeLexer::Enzyme(lx) => {
                    let raw = lx.next()?;
                    (Raw::Enzyme(raw), lx.slice(), lx.span().start)
                }
            };
            let line = self.line;
            let step = match raw {
                Raw::Default(raw) => self.default_step(raw, slice),
                Raw::ProtEntry(raw) => self.protentry_step(raw, slice),
                Raw::Protein(raw) => self.protein_step(raw, slice),
                Raw::Citation(raw) => self.citation_step(raw, slice),
                Raw::Special(raw) => self.special_step(raw, slice),
                Raw::Comment(raw) => self.comment_step(raw, slice),
                Raw::Enzyme(raw) => self.enzyme_step(raw, slice),
            };
            self.count_newlines(slice);
            self.transition(&step);
            let token = match step {
                Step::Skip => continue,
                Step::Emit(t)
                | Step::Open(_, t)
                | Step::Close(t)
                | Step::CloseThenOpen(_, t)
                | Step::Reset(t) => t,
            };
            return Some(Lexeme {
                token,
                line,
                offset: TextSize::new(start as u32),
            });
        }
    }
}

/// Single-character recovery for unmatched input.
fn invalid(slice: &str, line: usize) -> Step {
    let ch = slice.chars().next().unwrap_or('\u{fffd}');
    warn!("unrecognized character '{}' on line {}, skipping it", ch, line);
    Step::Emit(Token::Error(ch))
}

/// Strip the tab terminator off a heading slice.
fn acronym(slice: &str) -> SmolStr {
    SmolStr::new(slice.trim_end_matches('\t'))
}
