//! The LR(1) pipeline: canonical item collection with epsilon-moves,
//! subset-construction determinization, action-table derivation, and the
//! stack-machine driver.

mod automaton;
mod driver;
mod graph;
mod item;
mod table;


pub use automaton::Dfa;
pub use driver::recognize;
pub use graph::automaton_graph;
pub use item::{Item, ItemAutomaton};
pub use table::{Action, Conflict, NotLr1, ParseTable, TableCodecError};

use sift_gram::Grammar;

/// Build both halves of the pipeline for inspection: the item-level NFA and
/// its determinization. [`ParseTable::build`] is the one-call variant.
pub fn analyze(grammar: &Grammar) -> (ItemAutomaton, Dfa) {
    let nfa = ItemAutomaton::from_grammar(grammar);
    let dfa = Dfa::determinize(&nfa);
    (nfa, dfa)
}
