//! The interface the chart parser uses to pull tokens, plus the default
//! character-at-a-time lexer.

use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// What grammar symbols match against (and what patterns search).
    pub value: String,
    /// The raw source text, when it differs from `value` (e.g. a quoted string).
    pub text: Option<String>,
    /// The token type matched by `Symbol::TokenType`.
    pub kind: Option<String>,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Token { value: value.into(), text: None, kind: None, offset: 0, line: 1, col: 1 }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn at(mut self, offset: usize, line: usize, col: usize) -> Self {
        self.offset = offset;
        self.line = line;
        self.col = col;
        self
    }

    /// The text literals are compared against.
    pub fn literal(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.value)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LexerError {
    pub message: String,
    /// The offending input, when the lexer can point at it.
    pub token: Option<Token>,
}

pub trait Lexer {
    /// Opaque resumption state, carried between chunks and stored with
    /// chart columns when history is kept.
    type State: Clone + std::fmt::Debug;

    /// Start lexing `chunk`, continuing from `state` when given.
    fn reset(&mut self, chunk: &str, state: Option<&Self::State>);

    /// `Ok(None)` once the chunk is exhausted.
    fn next(&mut self) -> Result<Option<Token>, LexerError>;

    fn save(&self) -> Self::State;

    /// Describes where `token` sits in the source, prefixed by `headline`.
    fn format_error(&self, token: &Token, headline: &str) -> String;
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct StreamState {
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

/// Yields one token per character of input; the token's value is the
/// character itself.
#[derive(Debug)]
pub struct StreamLexer {
    chunk: String,
    chars: Vec<char>,
    index: usize,
    line: usize,
    /// Char index just past the most recent newline; negative when the
    /// current line started in an earlier chunk.
    last_line_break: isize,
    first_line: usize,
    first_col: usize,
    base_offset: usize,
}

impl StreamLexer {
    pub fn new() -> Self {
        let mut lexer = StreamLexer {
            chunk: String::new(),
            chars: Vec::new(),
            index: 0,
            line: 1,
            last_line_break: 0,
            first_line: 1,
            first_col: 0,
            base_offset: 0,
        };
        lexer.reset("", None);
        lexer
    }

    fn col(&self) -> usize {
        (self.index as isize - self.last_line_break) as usize
    }
}

impl Default for StreamLexer {
    fn default() -> Self { StreamLexer::new() }
}

impl Lexer for StreamLexer {
    type State = StreamState;

    fn reset(&mut self, chunk: &str, state: Option<&StreamState>) {
        self.chunk = chunk.to_string();
        self.chars = chunk.chars().collect();
        self.index = 0;
        self.line = state.map_or(1, |s| s.line);
        self.first_line = self.line;
        self.first_col = state.map_or(0, |s| s.col);
        self.last_line_break = -(self.first_col as isize);
        self.base_offset = state.map_or(0, |s| s.offset);
    }

    fn next(&mut self) -> Result<Option<Token>, LexerError> {
        let c = match self.chars.get(self.index) {
            Some(&c) => c,
            None => return Ok(None),
        };
        let offset = self.base_offset + self.index;
        self.index += 1;
        let token = Token::new(c).at(offset, self.line, self.col());
        if c == '\n' {
            self.line += 1;
            self.last_line_break = self.index as isize;
        }
        Ok(Some(token))
    }

    fn save(&self) -> StreamState {
        StreamState { line: self.line, col: self.col(), offset: self.base_offset + self.index }
    }

    fn format_error(&self, token: &Token, headline: &str) -> String {
        format_source_error(&self.chunk, self.first_line, self.first_col, token, headline)
    }
}

/// Shows up to five source lines ending at the token's line, with a caret
/// under the token's column.
pub(crate) fn format_source_error(
    chunk: &str,
    first_line: usize,
    first_col: usize,
    token: &Token,
    headline: &str,
) -> String {
    let all: Vec<&str> = chunk.split('\n').collect();
    let rel = token.line.saturating_sub(first_line).min(all.len().saturating_sub(1));
    let lines = &all[rel.saturating_sub(4)..=rel];
    let digits = token.line.to_string().len();
    // the chunk's first line may continue a line begun in an earlier chunk
    let caret_col = if rel == 0 { token.col.saturating_sub(first_col) } else { token.col };

    let mut message = format!("{} at line {} col {}:\n\n", headline, token.line, token.col);
    let numbered: Vec<String> = lines.iter().enumerate()
        .map(|(i, line)| {
            let n = token.line + 1 + i - lines.len();
            format!("{:>width$} {}", n, line, width = digits)
        })
        .collect();
    message.push_str(&numbered.join("\n"));
    message.push('\n');
    message.push_str(&" ".repeat(digits + caret_col));
    message.push_str("^\n");
    message
}

#[cfg(test)]
#[path = "tests/lexer.rs"]
mod tests_for_lexer;
