//! The incremental feed loop: pulls tokens from a lexer and grows the chart
//! one column per token.
//!
//! The chart (`table`) holds column 0 through column `current`. Without
//! history, every column older than `current - 1` is replaced by a hole as
//! soon as the parser moves past it; the column itself lives on only while
//! newer states still derive from it.

use crate::column::Column;
use crate::diagnostics;
use crate::error::{ConfigError, ParseError};
use crate::grammar::Grammar;
use crate::lexer::{Lexer, LexerError, StreamLexer, Token};
use crate::value::Value;

use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, trace};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ParserOptions {
    /// Keep every column (and the lexer state reached at it) so the parser
    /// can be rewound to any earlier position.
    pub keep_history: bool,
}

impl ParserOptions {
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }
}

/// A column together with the lexer state that resumes lexing right after
/// it. Returned by `Parser::save`, consumed by `Parser::restore`.
#[derive(Clone, Debug)]
pub struct Bookmark<S> {
    column: Rc<Column>,
    lexer_state: Option<S>,
}

impl<S> Bookmark<S> {
    pub fn index(&self) -> usize { self.column.index }
    pub fn column(&self) -> &Column { &self.column }
}

pub struct Parser<L: Lexer = StreamLexer> {
    grammar: Arc<Grammar>,
    lexer: L,
    lexer_state: Option<L::State>,
    options: ParserOptions,
    current: usize,
    table: Vec<Option<Bookmark<L::State>>>,
    results: Vec<Value>,
}

impl Parser<StreamLexer> {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Parser::with_lexer(grammar, StreamLexer::new(), ParserOptions::default())
    }

    pub fn with_options(grammar: Arc<Grammar>, options: ParserOptions) -> Self {
        Parser::with_lexer(grammar, StreamLexer::new(), options)
    }
}

impl<L: Lexer> Parser<L> {
    pub fn with_lexer(grammar: Arc<Grammar>, lexer: L, options: ParserOptions) -> Self {
        let column = Column::initial(&grammar);
        let mut parser = Parser {
            grammar,
            lexer,
            lexer_state: None,
            options,
            current: 0,
            table: vec![Some(Bookmark { column: Rc::new(column), lexer_state: None })],
            results: Vec::new(),
        };
        parser.results = parser.finish();
        parser
    }

    pub fn grammar(&self) -> &Grammar { &self.grammar }

    pub fn options(&self) -> ParserOptions { self.options }

    pub fn lexer(&self) -> &L { &self.lexer }

    /// Index of the column reached so far, i.e. the number of tokens consumed.
    pub fn current(&self) -> usize { self.current }

    /// The accepted parses of all input consumed so far.
    pub fn results(&self) -> &[Value] { &self.results }

    /// The column at `index`, unless it was discarded (or never built).
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.table.get(index)?.as_ref().map(|b| &*b.column)
    }

    /// Lexes `chunk` and advances the chart by one column per token.
    ///
    /// On failure the parser keeps the columns built before the offending
    /// token, and the next feed resumes right after the last accepted one;
    /// `results` still describe the previous successful feed.
    pub fn feed(&mut self, chunk: &str) -> Result<(), ParseError> {
        self.lexer.reset(chunk, self.lexer_state.as_ref());
        // a failed feed leaves a placeholder column past `current`
        self.table.truncate(self.current + 1);

        while let Some(token) = self.next_token()? {
            let column = self.head();
            if !self.options.keep_history && self.current > 0 {
                self.table[self.current - 1] = None;
            }

            let n = self.current + 1;
            let mut next = Column::new(n);
            for &i in column.scannable.iter().rev() {
                let state = &column.states[i];
                let matched = state.expecting().map_or(false, |expect| expect.matches(&token));
                if matched {
                    let predictors = state.predictors.clone().or_else(|| Some(column.clone()));
                    next.states.push(state.next_state(Value::Token(token.clone()), predictors));
                }
            }

            next.process(&self.grammar);
            trace!(column = n, states = next.len(), "scanned {:?}", token.value);

            if next.is_empty() {
                self.table.push(Some(Bookmark { column: Rc::new(next), lexer_state: None }));
                return Err(self.syntax_error(token));
            }

            // resume point for the next feed, even if a later token fails
            let lexer_state = self.lexer.save();
            self.lexer_state = Some(lexer_state.clone());
            let lexer_state = if self.options.keep_history { Some(lexer_state) } else { None };
            self.current = n;
            self.table.push(Some(Bookmark { column: Rc::new(next), lexer_state }));
        }

        self.results = self.finish();
        Ok(())
    }

    /// Values of every start-symbol derivation spanning all input so far.
    pub fn finish(&self) -> Vec<Value> {
        let column = match self.table.last() {
            Some(Some(bookmark)) => &bookmark.column,
            _ => return Vec::new(),
        };
        column.states.iter()
            .filter(|s| s.rule.name == self.grammar.start && s.is_complete() && s.origin == 0)
            .filter_map(|s| s.finished_value().cloned())
            .collect()
    }

    pub fn save(&self) -> Bookmark<L::State> {
        Bookmark { column: self.head(), lexer_state: self.lexer_state.clone() }
    }

    /// Makes `bookmark`'s column the current one, dropping every later column.
    pub fn restore(&mut self, bookmark: Bookmark<L::State>) {
        let index = bookmark.index();
        debug!(from = self.current, to = index, "restoring chart");
        if self.table.len() <= index {
            self.table.resize_with(index + 1, || None);
        }
        self.current = index;
        self.lexer_state = bookmark.lexer_state.clone();
        self.table[index] = Some(bookmark);
        self.table.truncate(index + 1);
        self.results = self.finish();
    }

    /// Restores the column at `index`; only possible with `keep_history`.
    ///
    /// Column `index` is the one created by token `index - 1`, so the next
    /// `feed` lexes its chunk as if it directly followed that token. Rewinding
    /// to column 0 starts lexing from scratch.
    pub fn rewind(&mut self, index: usize) -> Result<(), ParseError> {
        if !self.options.keep_history {
            return Err(ConfigError::HistoryDisabled.into());
        }
        // nb. column indices fall between token indices:
        //        col 0 -- token 0 -- col 1
        let bookmark = self.table.get(index)
            .and_then(|b| b.clone())
            .ok_or(ConfigError::NoSuchColumn(index))?;
        self.restore(bookmark);
        Ok(())
    }

    fn head(&self) -> Rc<Column> {
        match self.table.get(self.current) {
            Some(Some(bookmark)) => bookmark.column.clone(),
            _ => Rc::new(Column::new(self.current)),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        match self.lexer.next() {
            Ok(token) => Ok(token),
            Err(e) => {
                let placeholder = Column::new(self.current + 1);
                self.table.push(Some(Bookmark { column: Rc::new(placeholder), lexer_state: None }));
                Err(self.lexer_error(e))
            }
        }
    }

    fn lexer_error(&self, e: LexerError) -> ParseError {
        debug!(offset = self.current, "lexer error: {}", e.message);
        let (text, display, headline) = match &e.token {
            Some(token) => {
                let first: String = token.literal().chars().take(1).collect();
                let display = format!("input {:?} (lexer error)", first);
                (token.literal().to_string(), display, self.lexer.format_error(token, "Syntax error"))
            }
            None => (String::new(), "input (lexer error)".to_string(), e.message.clone()),
        };
        let message = diagnostics::report(&self.head(), &headline, &display);
        ParseError::Lex { text, offset: self.current, message }
    }

    fn syntax_error(&self, token: Token) -> ParseError {
        debug!(offset = self.current, "no state accepts {:?}", token.value);
        let display = match &token.kind {
            Some(kind) => format!("{} token: {:?}", kind, token.value),
            None => format!("{:?}", token.value),
        };
        let headline = self.lexer.format_error(&token, "Syntax error");
        let message = diagnostics::report(&self.head(), &headline, &display);
        ParseError::Syntax { token, offset: self.current, message }
    }
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests_for_parser;
