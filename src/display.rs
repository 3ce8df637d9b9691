use crate::grammar::{NonTerm, Rule, Symbol};
use crate::value::Value;

impl std::fmt::Display for NonTerm {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{}", self.0)
    }
}

/// Short form, as symbols appear inside a rendered rule.
impl std::fmt::Display for Symbol {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::NonTerm(nt) => write!(w, "{}", nt),
            Symbol::Literal { text, case_insensitive: false } => write!(w, "{:?}", text),
            Symbol::Literal { text, case_insensitive: true } => write!(w, "{:?}i", text),
            Symbol::TokenType(kind) => write!(w, "%{}", kind),
            Symbol::Pattern(re) => write!(w, "/{}/", re.as_str()),
            Symbol::Predicate(p) => write!(w, "<{}>", p.name),
        }
    }
}

/// Long form, naming what kind of input a symbol wants.
pub struct Described<'a>(pub &'a Symbol);

impl std::fmt::Display for Described<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.0 {
            Symbol::NonTerm(nt) => write!(w, "{}", nt),
            Symbol::Literal { .. } => write!(w, "{}", self.0),
            Symbol::TokenType(kind) => write!(w, "{} token", kind),
            Symbol::Pattern(re) => write!(w, "character matching /{}/", re.as_str()),
            Symbol::Predicate(p) => write!(w, "token matching {}", p.name),
        }
    }
}

fn join(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ")
}

impl std::fmt::Display for Rule {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{} → {}", self.name, join(&self.symbols))
    }
}

/// A rule with a cursor (`●`) before symbol `.1`.
pub struct Dotted<'a>(pub &'a Rule, pub usize);

impl std::fmt::Display for Dotted<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Dotted(rule, dot) = *self;
        let (before, after) = rule.symbols.split_at(dot.min(rule.symbols.len()));
        let mut parts = Vec::with_capacity(rule.symbols.len() + 1);
        parts.extend(before.iter().map(|s| s.to_string()));
        parts.push("●".to_string());
        parts.extend(after.iter().map(|s| s.to_string()));
        write!(w, "{} → {}", rule.name, parts.join(" "))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Null => write!(w, "null"),
            Value::Bool(b) => write!(w, "{:?}", b),
            Value::Int(i) => write!(w, "{:?}", i),
            Value::String(s) => write!(w, "{:?}", s),
            Value::Token(t) => write!(w, "{:?}", t.value),
            Value::List(items) => {
                let content: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(w, "[{}]", content.join(", "))
            }
        }
    }
}
