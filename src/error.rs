use crate::lexer::Token;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("set option `keep_history` to enable rewinding")]
    HistoryDisabled,
    #[error("no column {0} in the chart to rewind to")]
    NoSuchColumn(usize),
    #[error("grammar has no start symbol and no rules to take one from")]
    MissingStart,
}

/// Lex and syntax errors carry the full rendered diagnostic as `message`;
/// `offset` is the chart column the parser stopped at.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("{message}")]
    Lex { text: String, offset: usize, message: String },
    #[error("{message}")]
    Syntax { token: Token, offset: usize, message: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ParseError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Lex { offset, .. } | ParseError::Syntax { offset, .. } => Some(*offset),
            ParseError::Config(_) => None,
        }
    }
}
