use crate::lexer::Token;
use crate::value::Value;

/// Flattens derivation values back into the source text they came from.
pub trait Rendered {
    fn rendered(&self) -> String;
}

impl Rendered for Value {
    fn rendered(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::String(s) => s.clone(),
            Value::Token(t) => t.literal().to_string(),
            Value::List(items) => items.rendered(),
        }
    }
}

impl Rendered for [Value] {
    fn rendered(&self) -> String {
        self.iter().map(|v| v.rendered()).collect()
    }
}

impl Rendered for [Token] {
    fn rendered(&self) -> String {
        self.iter().map(|t| t.literal()).collect()
    }
}
