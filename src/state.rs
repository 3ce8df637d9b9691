//! One instantiation of a rule in the chart: rule R, with the dot at
//! position d, started at column `origin`.
//!
//! States are never edited after creation, except that a completed state's
//! value is computed once, the first time its column processes it.
//! Advancing a state produces a fresh copy, so distinct derivations of the
//! same (rule, dot, origin) triple coexist as separate states.

use crate::column::Column;
use crate::grammar::{NonTerm, Rule, Symbol};
use crate::value::Value;

use std::rc::Rc;
use std::sync::Arc;
use linear_map::set::LinearSet;

/// Derivation of the symbols before the dot, newest child first.
///
/// `right` is the value of the child that advanced the dot (a token, or a
/// completed nonterminal); `left` is the derivation of the state before it
/// advanced. Prefixes are shared between every state advanced from them.
#[derive(Debug)]
pub(crate) struct Link {
    pub(crate) right: Value,
    pub(crate) left: Option<Rc<Link>>,
}

#[derive(Clone, PartialEq, Debug)]
pub(crate) enum Memo {
    Unset,
    Rejected,
    /// A zero-width completion whose derivation already contains a
    /// zero-width completion of the same nonterminal.
    Subsumed,
    Value(Value),
}

#[derive(Clone, Debug)]
pub(crate) struct State {
    pub(crate) rule: Arc<Rule>,
    pub(crate) dot: usize,
    pub(crate) origin: usize,
    /// The column at `origin`, which holds the states that asked for this
    /// rule. `None` while the state lives in its own origin column, since a
    /// column cannot hold itself.
    pub(crate) predictors: Option<Rc<Column>>,
    pub(crate) left: Option<Rc<Link>>,
    pub(crate) value: Memo,
    /// Nonterminals completed with zero width somewhere inside this state's
    /// derivation. Only tracked while the state itself spans no tokens.
    pub(crate) nulled: LinearSet<NonTerm>,
}

impl State {
    pub(crate) fn predicted(rule: Arc<Rule>, origin: usize) -> State {
        State {
            rule,
            dot: 0,
            origin,
            predictors: None,
            left: None,
            value: Memo::Unset,
            nulled: LinearSet::new(),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.dot == self.rule.len()
    }

    /// The symbol after the dot, if any.
    pub(crate) fn expecting(&self) -> Option<&Symbol> {
        self.rule.symbols.get(self.dot)
    }

    /// A copy with the dot moved over a child whose value is `right`.
    ///
    /// `predictors` must already name the origin column as seen from the
    /// column the copy will live in.
    pub(crate) fn next_state(&self, right: Value, predictors: Option<Rc<Column>>) -> State {
        debug_assert!(!self.is_complete());
        State {
            rule: self.rule.clone(),
            dot: self.dot + 1,
            origin: self.origin,
            predictors,
            left: Some(Rc::new(Link { right, left: self.left.clone() })),
            value: Memo::Unset,
            nulled: LinearSet::new(),
        }
    }

    /// Whether this complete zero-width state derives its own nonterminal
    /// with zero width, as `E -> E E` does when both children are empty.
    pub(crate) fn is_self_embedding(&self) -> bool {
        self.nulled.contains(&self.rule.name)
    }

    /// Child values in rule order.
    pub(crate) fn children(&self) -> Vec<Value> {
        let mut children = Vec::with_capacity(self.dot);
        let mut node = self.left.as_deref();
        while let Some(link) = node {
            children.push(link.right.clone());
            node = link.left.as_deref();
        }
        children.reverse();
        children
    }

    /// Runs the reduction once; later calls are no-ops.
    pub(crate) fn finish(&mut self) {
        if !matches!(self.value, Memo::Unset) {
            return;
        }
        self.value = match self.rule.reduce(self.children(), self.origin) {
            Ok(v) => Memo::Value(v),
            Err(_) => Memo::Rejected,
        };
    }

    pub(crate) fn is_rejected(&self) -> bool {
        matches!(self.value, Memo::Rejected | Memo::Subsumed)
    }

    pub(crate) fn finished_value(&self) -> Option<&Value> {
        if let Memo::Value(v) = &self.value { Some(v) } else { None }
    }
}
