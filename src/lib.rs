//! An incremental Earley chart parser.
//!
//! A `Grammar` is a set of `Rule`s over nonterminals and terminal
//! `Symbol`s. A `Parser` is fed text in chunks; its `Lexer` turns each chunk
//! into tokens and every token grows the chart by one `Column`. After each
//! feed, `Parser::results` holds the value of every complete parse of the
//! input so far, so ambiguous grammars yield several results.

mod column;
mod diagnostics;
pub mod display;
mod error;
pub mod grammar;
pub mod lexer;
pub mod luthor;
pub mod parser;
pub mod reduce;
pub mod rendering;
mod state;
pub mod value;

pub use column::Column;
pub use error::{ConfigError, ParseError};
pub use grammar::{Grammar, GrammarBuilder, NonTerm, Predicate, Reducer, Rejected, Rule, Symbol};
pub use lexer::{Lexer, LexerError, StreamLexer, StreamState, Token};
pub use luthor::{TokKind, WordLexer, WordState};
pub use parser::{Bookmark, Parser, ParserOptions};
pub use rendering::Rendered;
pub use value::Value;
