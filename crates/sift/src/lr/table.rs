use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_binary::binary_stream::Endian;
use thiserror::Error;

use sift_gram::{Grammar, Symbol};

use super::automaton::Dfa;
use super::item::ItemAutomaton;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Consume the lookahead terminal and enter the state.
    Shift(usize),
    /// Reduce by the indexed production.
    Reduce(usize),
    /// Entered after a reduction exposes the nonterminal.
    Goto(usize),
    /// The word is in the language.
    Accept,
}

// what the driver needs to know about a production: how much to pop and
// which nonterminal to consult the goto for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProductionSig {
    pub(crate) lhs: char,
    pub(crate) len: usize,
}

/// The LR(1) action/goto table. Independent of any input word: build once
/// per grammar, recognize many words, [`compile`](ParseTable::compile) to
/// bytes to reuse it across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseTable {
    pub(crate) actions: HashMap<(usize, Symbol), Action>,
    pub(crate) productions: Vec<ProductionSig>,
    pub(crate) initial: usize,
    pub(crate) states: usize,
}

/// Two distinct actions landed on one (state, symbol) key. Shift-reduce and
/// reduce-reduce collisions are reported uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Error)]
#[error("grammar is not LR(1) ({} conflicting table entries)", .conflicts.len())]
pub struct NotLr1 {
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Error)]
pub enum TableCodecError {
    #[error("failed to encode parse table: {0}")]
    Encode(serde_binary::Error),
    #[error("failed to decode parse table: {0}")]
    Decode(serde_binary::Error),
}

impl ParseTable {
    /// Build the table for a grammar, refusing non-LR(1) grammars before
    /// any word can be tried.
    pub fn build(grammar: &Grammar) -> Result<ParseTable, NotLr1> {
        let nfa = ItemAutomaton::from_grammar(grammar);
        let dfa = Dfa::determinize(&nfa);
        ParseTable::from_automaton(grammar, &nfa, &dfa)
    }

    pub(crate) fn from_automaton(
        grammar: &Grammar,
        nfa: &ItemAutomaton,
        dfa: &Dfa,
    ) -> Result<ParseTable, NotLr1> {
        // every action lands here first so duplicates are observable
        let mut pending: BTreeMap<(usize, Symbol), Vec<Action>> = BTreeMap::new();

        for (state, data) in dfa.states.iter().enumerate() {
            let accept = dfa.finals.contains(state);
            if accept {
                record(&mut pending, state, Symbol::End, Action::Accept);
            } else {
                for id in data.items.iter() {
                    let item = nfa.item(id);
                    if !item.is_complete(grammar) {
                        continue;
                    }
                    for &lookahead in &item.lookahead {
                        record(
                            &mut pending,
                            state,
                            lookahead,
                            Action::Reduce(item.production),
                        );
                    }
                }
            }

            for &(symbol, next) in &data.transitions {
                let action = match symbol {
                    Symbol::Terminal(_) => Action::Shift(next),
                    Symbol::Nonterminal(_) => Action::Goto(next),
                    // determinization never runs over $
                    Symbol::End => continue,
                };
                record(&mut pending, state, symbol, action);
            }
        }

        let conflicts: Vec<Conflict> = pending
            .iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(&(state, symbol), actions)| Conflict {
                state,
                symbol,
                actions: actions.clone(),
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(NotLr1 { conflicts });
        }

        let actions: HashMap<(usize, Symbol), Action> = pending
            .into_iter()
            .map(|(key, mut actions)| (key, actions.pop().expect("recorded at least once")))
            .collect();
        let productions = grammar
            .productions()
            .iter()
            .map(|p| ProductionSig {
                lhs: p.lhs(),
                len: p.len(),
            })
            .collect();

        Ok(ParseTable {
            actions,
            productions,
            initial: dfa.initial,
            states: dfa.len(),
        })
    }

    pub fn initial_state(&self) -> usize {
        self.initial
    }

    pub fn state_count(&self) -> usize {
        self.states
    }

    pub fn action(&self, state: usize, lookahead: Symbol) -> Option<Action> {
        self.actions.get(&(state, lookahead)).copied()
    }

    /// The goto target after reducing to `nonterminal` in `state`.
    pub fn goto(&self, state: usize, nonterminal: char) -> Option<usize> {
        match self.action(state, Symbol::Nonterminal(nonterminal)) {
            Some(Action::Goto(next)) => Some(next),
            _ => None,
        }
    }

    pub(crate) fn production_sig(&self, production: usize) -> ProductionSig {
        self.productions[production]
    }

    /// Serialize to the compiled on-disk form.
    pub fn compile(&self) -> Result<Vec<u8>, TableCodecError> {
        serde_binary::to_vec(self, Endian::Little).map_err(TableCodecError::Encode)
    }

    /// Read back a table produced by [`compile`](ParseTable::compile).
    pub fn restore(bytes: &[u8]) -> Result<ParseTable, TableCodecError> {
        serde_binary::from_slice(bytes, Endian::Little).map_err(TableCodecError::Decode)
    }
}

fn record(
    pending: &mut BTreeMap<(usize, Symbol), Vec<Action>>,
    state: usize,
    symbol: Symbol,
    action: Action,
) {
    let actions = pending.entry((state, symbol)).or_default();
    // inserting the action already present is fine, two distinct ones is a
    // conflict the caller reports
    if !actions.contains(&action) {
        actions.push(action);
    }
}
