use crate::error::ConfigError;
use crate::lexer::Token;
use crate::value::Value;

use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

// A grammar G is a pair (A_0, R), where
//   A_0 is the start non-terminal, and
//   R maps non-terminals to an ordered list of alternative rules.
//
// A rule is a sequence of symbols; an empty sequence is nullable.

#[derive(PartialEq, Eq, Clone, Hash, Debug, PartialOrd, Ord)]
pub struct NonTerm(pub(crate) String);

impl NonTerm {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Borrow<str> for NonTerm {
    fn borrow(&self) -> &str { &self.0 }
}

impl From<&str> for NonTerm { fn from(a: &str) -> Self { Self(a.into()) } }
impl From<String> for NonTerm { fn from(a: String) -> Self { Self(a) } }

/// Marker a reduction function returns to drop the derivation it was handed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Rejected;

/// Turns the values of a completed rule's children into the rule's value.
///
/// The second argument is the index of the column the derivation started in.
pub type Reducer = Arc<dyn Fn(Vec<Value>, usize) -> Result<Value, Rejected> + Send + Sync>;

/// A named test over whole tokens; the name is only used for diagnostics.
#[derive(Clone)]
pub struct Predicate {
    pub(crate) name: String,
    test: Arc<dyn Fn(&Token) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, test: impl Fn(&Token) -> bool + Send + Sync + 'static) -> Self {
        Predicate { name: name.into(), test: Arc::new(test) }
    }

    pub fn test(&self, token: &Token) -> bool { (self.test)(token) }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "predicate[{}]", self.name)
    }
}

#[derive(Clone, Debug)]
pub enum Symbol {
    NonTerm(NonTerm),
    Literal { text: String, case_insensitive: bool },
    TokenType(String),
    Predicate(Predicate),
    Pattern(Regex),
}

impl Symbol {
    pub fn nt(name: &str) -> Self { Symbol::NonTerm(name.into()) }

    pub fn lit(text: &str) -> Self {
        Symbol::Literal { text: text.into(), case_insensitive: false }
    }

    pub fn lit_i(text: &str) -> Self {
        Symbol::Literal { text: text.into(), case_insensitive: true }
    }

    pub fn token(kind: &str) -> Self { Symbol::TokenType(kind.into()) }

    pub fn pattern(re: Regex) -> Self { Symbol::Pattern(re) }

    pub fn test(name: &str, test: impl Fn(&Token) -> bool + Send + Sync + 'static) -> Self {
        Symbol::Predicate(Predicate::new(name, test))
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Symbol::NonTerm(_))
    }

    /// Whether `token` can be consumed by this (terminal) symbol.
    ///
    /// Literals compare against the token's source text; patterns are
    /// searched for anywhere in the token's value.
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Symbol::NonTerm(_) => false,
            Symbol::Predicate(p) => p.test(token),
            Symbol::TokenType(kind) => token.kind.as_deref() == Some(kind.as_str()),
            Symbol::Pattern(re) => re.is_match(&token.value),
            Symbol::Literal { text, case_insensitive: false } => token.literal() == text,
            Symbol::Literal { text, case_insensitive: true } => {
                token.literal().to_lowercase() == text.to_lowercase()
            }
        }
    }
}

impl From<NonTerm> for Symbol { fn from(a: NonTerm) -> Self { Symbol::NonTerm(a) } }
impl From<Regex> for Symbol { fn from(re: Regex) -> Self { Symbol::Pattern(re) } }

pub struct Rule {
    pub(crate) name: NonTerm,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) reduce: Option<Reducer>,
}

impl Rule {
    pub fn new(name: impl Into<NonTerm>, symbols: Vec<Symbol>) -> Rule {
        Rule { name: name.into(), symbols, reduce: None }
    }

    pub fn with_reducer(
        name: impl Into<NonTerm>,
        symbols: Vec<Symbol>,
        reduce: impl Fn(Vec<Value>, usize) -> Result<Value, Rejected> + Send + Sync + 'static,
    ) -> Rule {
        Rule { name: name.into(), symbols, reduce: Some(Arc::new(reduce)) }
    }

    pub fn name(&self) -> &NonTerm { &self.name }
    pub fn symbols(&self) -> &[Symbol] { &self.symbols }
    pub fn len(&self) -> usize { self.symbols.len() }
    pub fn is_nullable(&self) -> bool { self.symbols.is_empty() }

    /// Applies the reduction function, or packs the children into a list
    /// when the rule has none.
    pub(crate) fn reduce(&self, children: Vec<Value>, origin: usize) -> Result<Value, Rejected> {
        match &self.reduce {
            Some(f) => f(children, origin),
            None => Ok(Value::list(children)),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "Rule({})", self)
    }
}

#[derive(Debug)]
pub struct Grammar {
    pub(crate) start: NonTerm,
    pub(crate) rules: HashMap<NonTerm, Vec<Arc<Rule>>>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder { GrammarBuilder::default() }

    pub fn start(&self) -> &NonTerm { &self.start }

    /// The alternatives for `nonterm`, in the order they were added. Unknown
    /// names have no alternatives.
    pub fn rules_for(&self, nonterm: &str) -> &[Arc<Rule>] {
        self.rules.get(nonterm).map(|v| &v[..]).unwrap_or(&[])
    }

    pub fn nonterms(&self) -> impl Iterator<Item=&NonTerm> {
        self.rules.keys()
    }
}

#[derive(Default)]
pub struct GrammarBuilder {
    start: Option<NonTerm>,
    first: Option<NonTerm>,
    rules: HashMap<NonTerm, Vec<Arc<Rule>>>,
}

impl GrammarBuilder {
    pub fn start(mut self, name: &str) -> Self {
        self.start = Some(name.into());
        self
    }

    pub fn add(mut self, rule: Rule) -> Self {
        if self.first.is_none() {
            self.first = Some(rule.name.clone());
        }
        self.rules.entry(rule.name.clone()).or_default().push(Arc::new(rule));
        self
    }

    pub fn rule(self, name: &str, symbols: Vec<Symbol>) -> Self {
        self.add(Rule::new(name, symbols))
    }

    pub fn rule_with(
        self,
        name: &str,
        symbols: Vec<Symbol>,
        reduce: impl Fn(Vec<Value>, usize) -> Result<Value, Rejected> + Send + Sync + 'static,
    ) -> Self {
        self.add(Rule::with_reducer(name, symbols, reduce))
    }

    /// Without an explicit start symbol, the first rule's name is used.
    pub fn build(self) -> Result<Grammar, ConfigError> {
        let start = self.start.or(self.first).ok_or(ConfigError::MissingStart)?;
        Ok(Grammar { start, rules: self.rules })
    }
}

#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
