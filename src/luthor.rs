//! The Luthor lexer is very simple-minded. There are five categories
//! of "tokens":
//!
//! 1. whitespace: a string made up solely of whitespace characters (skipped;
//! never handed to the parser)
//!
//! 2. identifier word (`ident`): a string made up solely of alphanumeric
//! characters, where the first character is alphabetic
//!
//! 3. numeric word (`number`): a string made up solely of alphanumeric
//! characters, where the first character is numeric
//!
//! 4. operative word (`op`): a string made up solely of non-whitespace,
//! non-alphanumeric characters. Brackets are the exception: every bracket
//! is its own `bracket` token.
//!
//! 5. quotation (`quote`): a string holding arbitrary content, delimited in a
//! content-dependent fashion. For the content-dependent delimiting, we extend
//! Rust's raw-string syntax: In addition to supporting quotes as the base
//! delimiters, we also support other "naturally" matching characters, yielding
//! e.g. "r#()#", "r[]", and "r##{}##". Plain `"..."` and `'...'` need no
//! leading 'r'. The token's value is the quoted content; its text is the
//! whole quotation as written.
//!
//! An `r` directly followed by `#` or by any opening quote or bracket always
//! starts a raw quotation, never the identifier `r`. So `r(x)` is one quote
//! token with value `x`, while `r (x)` is an identifier and three more tokens.
//!
//! Tokens never span chunk boundaries: each chunk handed to `reset` is
//! lexed on its own, with line and column numbering carried over.

use crate::lexer::{format_source_error, Lexer, LexerError, Token};

use std::iter::Peekable;
use std::str::CharIndices;

use derive_more::{AsRef, Display};
use unicode_brackets::UnicodeBrackets;

trait IsOperative { fn is_operative(self) -> bool; }
impl IsOperative for char {
    fn is_operative(self) -> bool {
        !self.is_alphanumeric() && !self.is_whitespace()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum Word {
    #[display(fmt = "op")]
    Op,
    #[display(fmt = "number")]
    Num,
    #[display(fmt = "ident")]
    Id,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Delims(pub char, pub char);

#[derive(PartialEq, Eq, Debug, AsRef)]
pub struct Quoted<S> {
    // If None, then this is not a raw-string
    // If Some, then holds the number of sharps between the 'r' and the open delimiter.
    pub sharp_count: Option<usize>,
    pub delim: Delims,
    #[as_ref]
    pub content: S,
}

impl AsRef<str> for Quoted<String> { fn as_ref(&self) -> &str { &self.content } }

/// Token types, as matched by `Symbol::TokenType`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum TokKind {
    #[display(fmt = "bracket")]
    Bracket,
    #[display(fmt = "{}", _0)]
    Word(Word),
    #[display(fmt = "quote")]
    Quote,
    #[display(fmt = "space")]
    Space,
}

fn simple_delimiter(c: char) -> Option<Vec<char>> {
    match c {
        '[' => Some(vec!['[', ']']),
        '(' => Some(vec!['(', ')']),
        '{' => Some(vec!['{', '}']),
        '\"' => Some(vec!['"']),
        '\'' => Some(vec!['\'']),
        _ => None,
    }
}

fn raw_quoted_opener(c: char) -> Option<Vec<char>> {
    let s = simple_delimiter(c);
    if s.is_some() { return s; }
    match c {
        // no matter what other extensions we add, we obviously cannot use # as
        // a quotation delimiter on its own, because it won't compose with r#.
        '#' => None,
        '<' => Some(vec!['<', '>']),
        '|' => Some(vec!['|']),
        '`' => Some(vec!['`']),
        _ => None,
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum QuoteError {
    Unterminated,
    InvalidBaseDelimiter,
}

impl QuoteError {
    fn message(self) -> &'static str {
        match self {
            QuoteError::Unterminated => "unterminated quote",
            QuoteError::InvalidBaseDelimiter => "invalid quotation base delimiter",
        }
    }
}

/// Very regular token matching (no extra context needed)
enum R {
    WordOp,
    WordNum,
    WordId,
    Bracket,
    Space,
}

enum RegAction { Complete, Continue, }

impl R {
    fn from_start_char(c: char) -> Self {
        if c.is_numeric() { R::WordNum }
        else if c.is_alphabetic() { R::WordId }
        else if c.is_whitespace() { R::Space }
        else if c.is_open_bracket() || c.is_close_bracket() { R::Bracket }
        else { R::WordOp }
    }

    fn action(&self, p: char) -> RegAction {
        match self {
            // every bracket is its own token; we don't merge sequences of brackets into one token.
            R::Bracket => RegAction::Complete,
            R::WordNum | R::WordId => if p.is_alphanumeric() { RegAction::Continue } else { RegAction::Complete },
            // a bracket ends an operative run, so `+(` is two tokens
            R::WordOp => if p.is_operative() && !p.is_open_bracket() && !p.is_close_bracket() {
                RegAction::Continue
            } else {
                RegAction::Complete
            },
            R::Space => if p.is_whitespace() { RegAction::Continue } else { RegAction::Complete },
        }
    }

    fn kind(&self) -> TokKind {
        match self {
            R::Bracket => TokKind::Bracket,
            R::WordOp => TokKind::Word(Word::Op),
            R::WordNum => TokKind::Word(Word::Num),
            R::WordId => TokKind::Word(Word::Id),
            R::Space => TokKind::Space,
        }
    }
}

/// after lexing 'r' '#'^k OPEN, then we are seeking CLOSE '#'^k to end the
/// raw-quoted content.
#[derive(Debug)]
struct QuoteClose {
    sharp_seek: usize,
    sharp_count: usize,
    end_delim_set: Vec<char>,
}

/// Byte span `start..end` of one lexeme within the scanned text.
type Lexeme = (usize, TokKind, usize, Option<Quoted<String>>);

struct Scan<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scan<'a> {
    fn new(input: &'a str) -> Self {
        Scan { input, chars: input.char_indices().peekable() }
    }

    /// Byte offset just past everything consumed so far.
    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn next(&mut self) -> Option<Result<Lexeme, QuoteError>> {
        let (i, c) = self.chars.next()?;
        let p: Option<char> = self.chars.peek().map(|(_, c)| *c);
        match (c, p) {
            ('r', Some(p)) if p == '#' || raw_quoted_opener(p).is_some() => {
                Some(self.read_raw_quotation(i, p))
            }
            ('"', _) | ('\'', _) => Some(self.read_plain_quotation(i, c)),
            _ => Some(Ok(self.read_regular(i, c))),
        }
    }

    fn read_regular(&mut self, start: usize, c: char) -> Lexeme {
        let r = R::from_start_char(c);
        loop {
            let p = match self.chars.peek() {
                // we're done reading input; finalize and return this token.
                None => break,
                Some(&(_, p)) => p,
            };
            match r.action(p) {
                RegAction::Continue => { self.chars.next(); }
                RegAction::Complete => break,
            }
        }
        (start, r.kind(), self.position(), None)
    }

    fn read_plain_quotation(&mut self, start: usize, open: char) -> Result<Lexeme, QuoteError> {
        let content_start = start + open.len_utf8();
        for (i, c) in self.chars.by_ref() {
            if c == open {
                let quoted = Quoted {
                    sharp_count: None,
                    delim: Delims(open, c),
                    content: self.input[content_start..i].to_string(),
                };
                return Ok((start, TokKind::Quote, i + c.len_utf8(), Some(quoted)));
            }
        }
        Err(QuoteError::Unterminated)
    }

    fn read_raw_quotation(&mut self, start: usize, mut p: char) -> Result<Lexeme, QuoteError> {
        let mut sharp_count = 0;

        // First: count how many sharps we are matching.
        while p == '#' {
            self.chars.next();
            sharp_count += 1;
            match self.chars.peek() {
                None => return Err(QuoteError::InvalidBaseDelimiter),
                Some(&(_, p_)) => { p = p_; }
            }
        }

        // now: p is the base quotation delimiter.
        let end_delim_set = raw_quoted_opener(p).ok_or(QuoteError::InvalidBaseDelimiter)?;
        let base_open_delim = p;
        let content_start = match self.chars.next() {
            Some((i, c)) => i + c.len_utf8(),
            None => return Err(QuoteError::InvalidBaseDelimiter),
        };
        let mut q = QuoteClose { sharp_seek: sharp_count, sharp_count: 0, end_delim_set };

        loop {
            let (i, c) = self.chars.next().ok_or(QuoteError::Unterminated)?;
            if !q.end_delim_set.contains(&c) {
                // if `c` is not in the end delimiter set, then we can just
                // keep scanning.
                continue;
            }
            // this *might* be the end of the quotation. If we can read the
            // required number of sharp characters, then return the quotation
            // token. If we cannot, the sharps we did read are content and we
            // continue on accumulating into the quotation.
            q.sharp_count = 0;
            while q.sharp_count < q.sharp_seek && self.chars.peek().map(|&(_, p)| p) == Some('#') {
                self.chars.next();
                q.sharp_count += 1;
            }
            if q.sharp_count == q.sharp_seek {
                let quoted = Quoted {
                    sharp_count: Some(q.sharp_seek),
                    delim: Delims(base_open_delim, c),
                    content: self.input[content_start..i].to_string(),
                };
                return Ok((start, TokKind::Quote, self.position(), Some(quoted)));
            }
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct WordState {
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

/// A `Lexer` producing typed word, bracket and quote tokens.
#[derive(Debug, Default)]
pub struct WordLexer {
    chunk: String,
    pos: usize,
    line: usize,
    /// Characters since the start of the current line.
    col: usize,
    first_line: usize,
    first_col: usize,
    base_offset: usize,
}

impl WordLexer {
    pub fn new() -> Self {
        let mut lexer = WordLexer::default();
        lexer.reset("", None);
        lexer
    }

    fn advance_over(&mut self, end: usize) {
        for c in self.chunk[self.pos..end].chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.pos = end;
    }

    fn token_at(&self, start: usize, value: &str) -> Token {
        Token::new(value).at(self.base_offset + start, self.line, self.col + 1)
    }
}

impl Lexer for WordLexer {
    type State = WordState;

    fn reset(&mut self, chunk: &str, state: Option<&WordState>) {
        self.chunk = chunk.to_string();
        self.pos = 0;
        self.line = state.map_or(1, |s| s.line);
        self.col = state.map_or(0, |s| s.col);
        self.first_line = self.line;
        self.first_col = self.col;
        self.base_offset = state.map_or(0, |s| s.offset);
    }

    fn next(&mut self) -> Result<Option<Token>, LexerError> {
        loop {
            let mut scan = Scan::new(&self.chunk[self.pos..]);
            let base = self.pos;
            let lexeme = match scan.next() {
                None => return Ok(None),
                Some(lexeme) => lexeme,
            };
            let (start, kind, end, quoted) = match lexeme {
                Ok(lexeme) => lexeme,
                Err(e) => {
                    let rest = &self.chunk[self.pos..];
                    let token = self.token_at(self.pos, rest).with_kind(TokKind::Quote.to_string());
                    return Err(LexerError { message: e.message().to_string(), token: Some(token) });
                }
            };
            let (start, end) = (base + start, base + end);
            if kind == TokKind::Space {
                // skip the space and grab next token.
                self.advance_over(end);
                continue;
            }
            let text = &self.chunk[start..end];
            let token = match &quoted {
                Some(q) => {
                    let content: &str = q.as_ref();
                    self.token_at(start, content).with_text(text)
                }
                None => self.token_at(start, text),
            };
            let token = token.with_kind(kind.to_string());
            self.advance_over(end);
            return Ok(Some(token));
        }
    }

    fn save(&self) -> WordState {
        WordState { line: self.line, col: self.col, offset: self.base_offset + self.pos }
    }

    fn format_error(&self, token: &Token, headline: &str) -> String {
        format_source_error(&self.chunk, self.first_line, self.first_col, token, headline)
    }
}

#[cfg(test)]
#[path = "tests/luthor.rs"]
mod tests_for_luthor;
