use petgraph::graph::DiGraph;

use sift_gram::{Grammar, Production, Symbol};

use super::automaton::Dfa;
use super::item::{Item, ItemAutomaton};

/// Render the deterministic automaton as a graph with readable item-set
/// labels, for Dot output while debugging a grammar.
pub fn automaton_graph(
    nfa: &ItemAutomaton,
    dfa: &Dfa,
    grammar: &Grammar,
) -> DiGraph<String, String> {
    let mut graph: DiGraph<String, String> = DiGraph::new();

    let indices: Vec<_> = (0..dfa.len())
        .map(|state| {
            let mut label = format!("s{}", state);
            if dfa.is_final(state) {
                label.push_str(" (accept)");
            }
            for id in dfa.items(state).iter() {
                label.push('\n');
                label.push_str(&item_label(grammar, nfa.item(id)));
            }
            graph.add_node(label)
        })
        .collect();

    for (state, data) in dfa.states.iter().enumerate() {
        for &(symbol, next) in &data.transitions {
            graph.add_edge(indices[state], indices[next], symbol.to_string());
        }
    }

    graph
}

// "S -> C · C, {c d $}"
fn item_label(grammar: &Grammar, item: &Item) -> String {
    let production = grammar.production(item.production);
    let mut label = format!("{} ->", production.lhs());
    match production {
        Production::Empty(_) => label.push_str(" ε ·"),
        Production::Nonempty(_, rhs) => {
            for (i, sym) in rhs.iter().enumerate() {
                if i == item.dot {
                    label.push_str(" ·");
                }
                label.push(' ');
                label.push(match sym {
                    Symbol::Terminal(c) | Symbol::Nonterminal(c) => *c,
                    Symbol::End => '$',
                });
            }
            if item.dot == rhs.len() {
                label.push_str(" ·");
            }
        }
    }
    label.push_str(", {");
    for (i, sym) in item.lookahead.iter().enumerate() {
        if i > 0 {
            label.push(' ');
        }
        label.push_str(&sym.to_string());
    }
    label.push('}');
    label
}
