//! Values carried through derivations and handed to reduction functions.

use crate::lexer::Token;

use std::sync::Arc;

/// A token child is `Token`; a rule without a reducer produces a `List` of
/// its children. Everything else is whatever reducers choose to build.
///
/// List items are shared: cloning a list is a refcount bump, so a value
/// handed up through many completions is never copied.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Token(Token),
    List(Arc<[Value]>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(items.into())
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(v) = self { Some(&v[..]) } else { None }
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        if let Value::List(v) = self { Some(v.to_vec()) } else { None }
    }

    pub fn as_token(&self) -> Option<&Token> {
        if let Value::Token(t) = self { Some(t) } else { None }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(i) = *self { Some(i) } else { None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Token(t) => Some(&t.value),
            _ => None,
        }
    }
}

impl From<bool> for Value { fn from(b: bool) -> Value { Value::Bool(b) } }
impl From<()> for Value { fn from((): ()) -> Value { Value::Null } }
impl From<String> for Value { fn from(s: String) -> Value { Value::String(s) } }
impl From<&str> for Value { fn from(s: &str) -> Value { Value::String(s.to_string()) } }
impl From<i64> for Value { fn from(n: i64) -> Value { Value::Int(n) } }
impl From<Token> for Value { fn from(t: Token) -> Value { Value::Token(t) } }
impl From<Vec<Value>> for Value { fn from(v: Vec<Value>) -> Value { Value::list(v) } }
