//! A column holds every state whose right edge is at one input position.
//!
//! States live in a per-column arena and refer to each other by index.
//! Cross-column references always point at an older column (through
//! `State::predictors`), so the chart forms no reference cycles and a column
//! stays alive exactly as long as some newer state still derives from it.

use crate::grammar::{Grammar, NonTerm, Symbol};
use crate::state::{Memo, State};

use std::collections::HashMap;
use std::rc::Rc;
use linear_map::LinearMap;

pub struct Column {
    pub(crate) index: usize,
    /// Append-only; `process` visits states pushed while it runs.
    pub(crate) states: Vec<State>,
    /// States (by index) that asked for each nonterminal here.
    pub(crate) wants: HashMap<NonTerm, Vec<usize>>,
    /// States whose next symbol is terminal; drained by the scan step.
    pub(crate) scannable: Vec<usize>,
    /// Zero-width completions, so a nonterminal predicted again in this
    /// column can be completed without predicting it twice.
    pub(crate) completed: LinearMap<NonTerm, Vec<usize>>,
}

impl Column {
    pub(crate) fn new(index: usize) -> Self {
        Column {
            index,
            states: Vec::new(),
            wants: HashMap::new(),
            scannable: Vec::new(),
            completed: LinearMap::new(),
        }
    }

    /// Column 0: the start symbol predicted and processed to a fixpoint.
    pub(crate) fn initial(grammar: &Grammar) -> Self {
        let mut column = Column::new(0);
        column.wants.insert(grammar.start.clone(), Vec::new());
        column.predict(grammar, &grammar.start);
        column.process(grammar);
        column
    }

    pub fn index(&self) -> usize { self.index }

    /// Number of states in the column.
    pub fn len(&self) -> usize { self.states.len() }

    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    pub(crate) fn wanted(&self, nonterm: &str) -> &[usize] {
        self.wants.get(nonterm).map(|v| &v[..]).unwrap_or(&[])
    }

    /// Runs predict and complete until nothing new appears.
    pub(crate) fn process(&mut self, grammar: &Grammar) {
        let mut w = 0;
        while w < self.states.len() {
            let i = w;
            w += 1;

            if self.states[i].is_complete() {
                if self.is_zero_width(i) && self.states[i].is_self_embedding() {
                    self.states[i].value = Memo::Subsumed;
                    continue;
                }
                self.states[i].finish();
                if self.states[i].is_rejected() {
                    continue;
                }
                let name = self.states[i].rule.name.clone();
                match self.states[i].predictors.clone() {
                    Some(origin) => {
                        for &j in origin.wanted(&name.0).iter().rev() {
                            self.complete_from(&origin, j, i);
                        }
                    }
                    None => {
                        let waiting = self.wanted(&name.0).to_vec();
                        for &j in waiting.iter().rev() {
                            self.complete(j, i);
                        }
                        // zero-width: later predictors in this column need it too
                        self.completed.entry(name).or_insert(Vec::new()).push(i);
                    }
                }
                continue;
            }

            let exp = match self.states[i].expecting() {
                Some(Symbol::NonTerm(exp)) => exp.clone(),
                _ => {
                    self.scannable.push(i);
                    continue;
                }
            };

            if let Some(waiting) = self.wants.get_mut(&exp) {
                waiting.push(i);
                let done = self.completed.get(&exp).cloned().unwrap_or_default();
                for r in done {
                    self.complete(i, r);
                }
            } else {
                self.wants.insert(exp.clone(), vec![i]);
                self.predict(grammar, &exp);
            }
        }
    }

    /// Whether state `i` spans no tokens. Only such states can complete
    /// each other within one column without bound, as `E -> | E E` would;
    /// a zero-width derivation that embeds a zero-width derivation of its
    /// own nonterminal is marked `Subsumed` and never propagated.
    fn is_zero_width(&self, i: usize) -> bool {
        let state = &self.states[i];
        state.predictors.is_none() && state.origin == self.index
    }

    /// Adds a zero-dot state for every alternative of `exp`. Names without
    /// rules predict nothing.
    pub(crate) fn predict(&mut self, grammar: &Grammar, exp: &NonTerm) {
        for rule in grammar.rules_for(&exp.0) {
            self.states.push(State::predicted(rule.clone(), self.index));
        }
    }

    /// Advances local state `left` over the completed zero-width state
    /// `right`.
    pub(crate) fn complete(&mut self, left: usize, right: usize) {
        let right = &self.states[right];
        let value = match right.finished_value() {
            Some(v) => v.clone(),
            None => return,
        };
        let left = &self.states[left];
        let mut copy = left.next_state(value, left.predictors.clone());
        if copy.origin == self.index {
            copy.nulled = left.nulled.clone();
            for name in right.nulled.iter().chain(Some(&right.rule.name)) {
                copy.nulled.insert(name.clone());
            }
        }
        self.states.push(copy);
    }

    /// Advances `left`, waiting in the older column `origin`, over the
    /// completed local state `right`.
    fn complete_from(&mut self, origin: &Rc<Column>, left: usize, right: usize) {
        let value = match self.states[right].finished_value() {
            Some(v) => v.clone(),
            None => return,
        };
        let left = &origin.states[left];
        let predictors = left.predictors.clone().or_else(|| Some(origin.clone()));
        self.states.push(left.next_state(value, predictors));
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "Column({}, {} states, {} scannable)", self.index, self.states.len(), self.scannable.len())
    }
}

#[cfg(test)]
#[path = "tests/column.rs"]
mod tests_for_column;
