use sift_gram::Symbol;

use super::table::{Action, ParseTable};

// one driver stack entry: an automaton state and the symbol that entered it
// (the bottom entry has none)
#[derive(Clone, Copy, Debug)]
struct StackEntry {
    state: usize,
    #[allow(dead_code)]
    symbol: Option<Symbol>,
}

/// Run the shift/reduce machine over `word` and decide acceptance.
///
/// Every character is offered to the table as a terminal; characters
/// outside the grammar's alphabet simply find no action and reject.
pub fn recognize(table: &ParseTable, word: &str) -> bool {
    let input: Vec<Symbol> = word.chars().map(Symbol::Terminal).collect();
    let mut stack = vec![StackEntry {
        state: table.initial_state(),
        symbol: None,
    }];
    let mut cursor = 0;

    loop {
        let lookahead = input.get(cursor).copied().unwrap_or(Symbol::End);
        let Some(top) = stack.last() else {
            return false;
        };

        let Some(action) = table.action(top.state, lookahead) else {
            return false;
        };

        match action {
            Action::Shift(next) => {
                stack.push(StackEntry {
                    state: next,
                    symbol: Some(lookahead),
                });
                cursor += 1;
            }

            Action::Reduce(production) => {
                let sig = table.production_sig(production);
                // pop the handle, then re-consult the table for the goto on
                // the exposed nonterminal
                if stack.len() <= sig.len {
                    return false;
                }
                stack.truncate(stack.len() - sig.len);
                let Some(top) = stack.last() else {
                    return false;
                };
                let Some(next) = table.goto(top.state, sig.lhs) else {
                    return false;
                };
                stack.push(StackEntry {
                    state: next,
                    symbol: Some(Symbol::Nonterminal(sig.lhs)),
                });
            }

            Action::Accept => return true,

            // goto is only ever consulted after a reduce; a raw lookahead
            // never maps to one
            Action::Goto(_) => return false,
        }
    }
}
