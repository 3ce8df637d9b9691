//! Explains why the parser stopped: which terminals the last good column
//! could still have accepted, and for each one a chain of rules showing how
//! the parser came to expect it.

use crate::column::Column;
use crate::display::{Described, Dotted};
use crate::state::State;

use std::collections::HashSet;

/// Renders the failure message for `column`, the last column that accepted
/// input. `headline` locates the failure in the source; `token_display`
/// names what was found there.
pub(crate) fn report(column: &Column, headline: &str, token_display: &str) -> String {
    let mut lines = vec![headline.to_string()];
    let expectant: Vec<usize> = column.states.iter()
        .enumerate()
        .filter(|(_, s)| s.expecting().map_or(false, |sym| sym.is_terminal()))
        .map(|(i, _)| i)
        .collect();

    if expectant.is_empty() {
        lines.push(format!(
            "Unexpected {}. I did not expect any more input. Here is the state of my parse table:\n",
            token_display));
        let all: Vec<&State> = column.states.iter().collect();
        display_state_stack(&all, &mut lines);
    } else {
        lines.push(format!(
            "Unexpected {}. Instead, I was expecting to see one of the following:\n",
            token_display));
        for i in expectant {
            let stack = first_state_stack(column, i);
            if let Some(symbol) = stack[0].expecting() {
                lines.push(format!("A {} based on:", Described(symbol)));
            }
            display_state_stack(&stack, &mut lines);
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Think of a state stack as the call stack of the recursive-descent parser
/// that the chart simulates: the expectant state first, then the state that
/// predicted it, and so on back to a state nobody predicted.
///
/// Only the first predictor is followed at each step. A state seen twice
/// ends the stack there.
pub(crate) fn first_state_stack(column: &Column, index: usize) -> Vec<&State> {
    let mut stack = Vec::new();
    let mut visited = HashSet::new();
    let mut here = column;
    let mut index = index;
    while visited.insert((here.index, index)) {
        let state = &here.states[index];
        stack.push(state);
        let origin: &Column = match &state.predictors {
            Some(origin) => &**origin,
            None => here,
        };
        match origin.wanted(state.rule.name.as_str()).first() {
            Some(&predictor) => {
                here = origin;
                index = predictor;
            }
            None => break,
        }
    }
    stack
}

fn display_state_stack(stack: &[&State], lines: &mut Vec<String>) {
    let mut last_display: Option<String> = None;
    let mut same_display_count = 0;
    for state in stack {
        let display = Dotted(&state.rule, state.dot).to_string();
        if last_display.as_ref() == Some(&display) {
            same_display_count += 1;
            continue;
        }
        flush_identical(same_display_count, lines);
        same_display_count = 0;
        lines.push(format!("    {}", display));
        last_display = Some(display);
    }
    flush_identical(same_display_count, lines);
}

fn flush_identical(count: usize, lines: &mut Vec<String>) {
    if count > 0 {
        lines.push(format!("    ^ {} more lines identical to this", count));
    }
}

#[cfg(test)]
#[path = "tests/diagnostics.rs"]
mod tests_for_diagnostics;
