use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use bit_set::BitSet;

use sift_gram::{FirstSet, Grammar, Symbol};

/// One LR(1) item: a production, how much of its right-hand side has been
/// matched, and the terminals (or `$`) that may follow a reduction by it.
///
/// The item of an epsilon-production has dot = 0 = |rhs| and is complete
/// from the start, since there is nothing to read before reducing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: BTreeSet<Symbol>,
}

impl Item {
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot == grammar.production(self.production).len()
    }
}

// pointer-free adjacency as in a scanner NFA: None labels the epsilon-moves
// produced by closure expansion, Some(sym) the dot advances
#[derive(Debug, Clone)]
pub(crate) struct ItemNode {
    pub(crate) item: Item,
    pub(crate) transitions: Vec<(Option<Symbol>, usize)>,
}

/// The canonical LR(1) item collection in automaton form: one node per
/// (production, dot) pair, lookaheads union-merged, epsilon-moves for
/// closure expansion and symbol-moves for dot advances.
#[derive(Debug)]
pub struct ItemAutomaton {
    pub(crate) nodes: Vec<ItemNode>,
    pub(crate) initial: BitSet,
    pub(crate) finals: BitSet,
    // terminals then nonterminals, sorted, so that determinization visits
    // symbols in a reproducible order
    pub(crate) symbols: Vec<Symbol>,
}

impl ItemAutomaton {
    pub fn from_grammar(grammar: &Grammar) -> ItemAutomaton {
        let mut builder = Builder {
            grammar,
            nullable: grammar.nullable(),
            first: grammar.first_sets(),
            nodes: Vec::new(),
            index: HashMap::new(),
            queue: VecDeque::new(),
        };

        // start items of every axiom production carry {$}
        let eof: BTreeSet<Symbol> = BTreeSet::from([Symbol::End]);
        let mut initial = BitSet::new();
        for &p in grammar.productions_for(grammar.axiom()) {
            let start = builder.spawn(p, &eof);
            initial.insert(start);
        }

        // closure fixpoint; nodes re-enter the queue when their lookahead grows
        while let Some(id) = builder.queue.pop_front() {
            builder.close(id);
        }

        let Builder { nodes, .. } = builder;

        let mut finals = BitSet::new();
        for (id, node) in nodes.iter().enumerate() {
            let production = grammar.production(node.item.production);
            if production.lhs() == grammar.axiom()
                && node.item.dot == production.len()
                && node.item.lookahead.contains(&Symbol::End)
            {
                finals.insert(id);
            }
        }

        let mut symbols: Vec<Symbol> = grammar
            .terminals()
            .iter()
            .map(Symbol::Terminal)
            .chain(grammar.nonterminals().iter().map(Symbol::Nonterminal))
            .collect();
        symbols.sort();

        ItemAutomaton {
            nodes,
            initial,
            finals,
            symbols,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.nodes.iter().map(|node| &node.item)
    }

    pub fn initial(&self) -> &BitSet {
        &self.initial
    }

    pub fn finals(&self) -> &BitSet {
        &self.finals
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn item(&self, id: usize) -> &Item {
        &self.nodes[id].item
    }
}

struct Builder<'g> {
    grammar: &'g Grammar,
    nullable: HashSet<char>,
    first: HashMap<char, FirstSet>,
    nodes: Vec<ItemNode>,
    // (production, dot) -> node id; the union-merge point
    index: HashMap<(usize, usize), usize>,
    queue: VecDeque<usize>,
}

impl<'g> Builder<'g> {
    // Ensure the full dot-chain of `production` exists with at least
    // `lookahead`, returning the start node. A fresh chain gets its
    // symbol-moves between consecutive dots; an existing chain has the
    // lookahead unioned in, and any node whose lookahead grew is re-queued
    // so its own spawns see the larger set.
    fn spawn(&mut self, production: usize, lookahead: &BTreeSet<Symbol>) -> usize {
        let len = self.grammar.production(production).len();

        if let Some(&start) = self.index.get(&(production, 0)) {
            for dot in 0..=len {
                let id = self.index[&(production, dot)];
                let node = &mut self.nodes[id];
                let before = node.item.lookahead.len();
                node.item.lookahead.extend(lookahead.iter().copied());
                if node.item.lookahead.len() != before {
                    self.queue.push_back(id);
                }
            }
            return start;
        }

        let mut prev: Option<usize> = None;
        for dot in 0..=len {
            let id = self.nodes.len();
            self.nodes.push(ItemNode {
                item: Item {
                    production,
                    dot,
                    lookahead: lookahead.clone(),
                },
                transitions: Vec::new(),
            });
            self.index.insert((production, dot), id);
            if let Some(p) = prev {
                let sym = self.grammar.production(production).rhs()[dot - 1];
                self.nodes[p].transitions.push((Some(sym), id));
            }
            self.queue.push_back(id);
            prev = Some(id);
        }
        self.index[&(production, 0)]
    }

    // One closure step for one item: if the dot sits before a nonterminal,
    // spawn every production of that nonterminal and record epsilon-moves.
    fn close(&mut self, id: usize) {
        let grammar = self.grammar;
        let (production, dot) = {
            let item = &self.nodes[id].item;
            (item.production, item.dot)
        };
        let rhs = grammar.production(production).rhs();

        let Some(&Symbol::Nonterminal(expanded)) = rhs.get(dot) else {
            return;
        };

        let lookahead = self.spawned_lookahead(rhs, dot, id);
        for &q in grammar.productions_for(expanded) {
            let start = self.spawn(q, &lookahead);
            if !self.nodes[id].transitions.contains(&(None, start)) {
                self.nodes[id].transitions.push((None, start));
            }
        }
    }

    // Lookahead for the items spawned from (A -> α · B β, L): inherit L when
    // β is empty; L ∪ FIRST(β₀) when β₀ is nullable; FIRST(β₀) alone
    // otherwise. Only β's first symbol is consulted.
    fn spawned_lookahead(&self, rhs: &[Symbol], dot: usize, trigger: usize) -> BTreeSet<Symbol> {
        let inherited = &self.nodes[trigger].item.lookahead;
        match rhs.get(dot + 1) {
            None => inherited.clone(),
            Some(&Symbol::Terminal(c)) => BTreeSet::from([Symbol::Terminal(c)]),
            Some(&Symbol::Nonterminal(n)) => {
                let mut lookahead: BTreeSet<Symbol> = self.first[&n]
                    .iter()
                    .map(Symbol::Terminal)
                    .collect();
                if self.nullable.contains(&n) {
                    lookahead.extend(inherited.iter().copied());
                }
                lookahead
            }
            // the builder keeps $ out of productions; a dead arm by
            // construction, and FIRST($) = {$}
            Some(&Symbol::End) => BTreeSet::from([Symbol::End]),
        }
    }
}
