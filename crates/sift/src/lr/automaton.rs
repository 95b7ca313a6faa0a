use std::collections::{HashMap, VecDeque};

use bit_set::BitSet;

use sift_gram::Symbol;

use super::item::{ItemAutomaton, ItemNode};

/// Deterministic item automaton: each state is an epsilon-closed set of
/// item-automaton nodes, produced by subset construction.
#[derive(Debug)]
pub struct Dfa {
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial: usize,
    pub(crate) finals: BitSet,
}

#[derive(Debug, Clone)]
pub(crate) struct DfaState {
    pub(crate) items: BitSet,
    pub(crate) transitions: Vec<(Symbol, usize)>,
}

impl Dfa {
    pub fn determinize(nfa: &ItemAutomaton) -> Dfa {
        let mut start = nfa.initial.clone();
        epsilon_closure(&nfa.nodes, &mut start);

        // configuration -> id; equal item sets (lookaheads included, since
        // node identity carries the lookahead) merge into one state
        let mut subsets: HashMap<BitSet, usize> = HashMap::new();
        subsets.insert(start.clone(), 0);

        let mut states = vec![DfaState {
            items: start,
            transitions: Vec::new(),
        }];

        let mut work_queue: VecDeque<usize> = VecDeque::new();
        work_queue.push_back(0);

        while let Some(id) = work_queue.pop_front() {
            let q = states[id].items.clone();
            for &symbol in &nfa.symbols {
                let mut t = delta(&nfa.nodes, &q, symbol);
                if t.is_empty() {
                    continue;
                }
                epsilon_closure(&nfa.nodes, &mut t);

                let next = match subsets.get(&t) {
                    Some(&next) => next,
                    None => {
                        let next = states.len();
                        subsets.insert(t.clone(), next);
                        states.push(DfaState {
                            items: t,
                            transitions: Vec::new(),
                        });
                        work_queue.push_back(next);
                        next
                    }
                };
                states[id].transitions.push((symbol, next));
            }
        }

        let finals: BitSet = states
            .iter()
            .enumerate()
            .filter(|(_, state)| !state.items.is_disjoint(&nfa.finals))
            .map(|(id, _)| id)
            .collect();

        Dfa {
            states,
            initial: 0,
            finals,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn is_final(&self, state: usize) -> bool {
        self.finals.contains(state)
    }

    /// Item-automaton node ids aggregated in `state`.
    pub fn items(&self, state: usize) -> &BitSet {
        &self.states[state].items
    }

    pub fn transition(&self, state: usize, symbol: Symbol) -> Option<usize> {
        self.states[state]
            .transitions
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|&(_, next)| next)
    }
}

// basic BFS to compute epsilon closure; explicit worklist, no recursion
pub(crate) fn epsilon_closure(nodes: &[ItemNode], set: &mut BitSet) {
    let mut queue: VecDeque<usize> = set.iter().collect();
    let mut visited = BitSet::with_capacity(nodes.len());

    while let Some(i) = queue.pop_front() {
        if visited.contains(i) {
            continue;
        }

        for &(label, next) in &nodes[i].transitions {
            if label.is_none() && !visited.contains(next) {
                queue.push_back(next);
            }
        }

        set.insert(i);
        visited.insert(i);
    }
}

pub(crate) fn delta(nodes: &[ItemNode], set: &BitSet, symbol: Symbol) -> BitSet {
    let mut result = BitSet::with_capacity(nodes.len());

    for i in set.iter() {
        for &(label, next) in &nodes[i].transitions {
            if label.is_some_and(|l| l == symbol) {
                result.insert(next);
            }
        }
    }

    result
}
