use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::symbol::Symbol;

// a single nonterminal on the left (the context-free restriction the engine
// requires); epsilon-productions are the Empty variant rather than a
// reserved epsilon character inside the right-hand side
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Production {
    Empty(char),
    Nonempty(char, Vec<Symbol>),
}

impl Production {
    pub fn lhs(&self) -> char {
        match self {
            Production::Empty(nt) => *nt,
            Production::Nonempty(nt, _) => *nt,
        }
    }

    pub fn rhs(&self) -> &[Symbol] {
        match self {
            Production::Empty(_) => &[],
            Production::Nonempty(_, rhs) => rhs,
        }
    }

    pub fn len(&self) -> usize {
        self.rhs().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Production::Empty(_))
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs())?;
        match self {
            Production::Empty(_) => write!(f, " ε"),
            Production::Nonempty(_, rhs) => {
                for sym in rhs {
                    write!(f, " {}", sym)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("no axiom symbol was set")]
    MissingAxiom,
    #[error("axiom `{0}` is not a declared nonterminal")]
    AxiomNotNonterminal(char),
    #[error("`{0}` is declared both terminal and nonterminal")]
    OverlappingAlphabets(char),
    #[error("production left-hand side `{0}` is not a declared nonterminal")]
    UnknownLhs(char),
    #[error("production references undeclared symbol `{0}`")]
    UnknownSymbol(char),
    #[error("the end marker `$` cannot appear inside a production")]
    EndInProduction,
}

/// An immutable context-free grammar. Built through [`GrammarBuilder`]; the
/// engine only ever reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct Grammar {
    axiom: char,
    terminals: Alphabet,
    nonterminals: Alphabet,
    productions: Vec<Production>,
    by_lhs: HashMap<char, Vec<usize>>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn axiom(&self) -> char {
        self.axiom
    }

    pub fn terminals(&self) -> &Alphabet {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &Alphabet {
        &self.nonterminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    /// Indices of the productions whose left-hand side is `nt`.
    pub fn productions_for(&self, nt: char) -> &[usize] {
        self.by_lhs.get(&nt).map(Vec::as_slice).unwrap_or(&[])
    }

    // n^2 in grammar size, good enough for the grammars this engine sees
    pub fn nullable(&self) -> HashSet<char> {
        let mut nullables: HashSet<char> = HashSet::new();
        loop {
            let mut changed = false;
            for rule in &self.productions {
                match rule {
                    Production::Empty(nt) => {
                        changed |= nullables.insert(*nt);
                    }
                    Production::Nonempty(nt, rhs) => {
                        let all_nullable = rhs.iter().all(|x| match x {
                            Symbol::Terminal(_) | Symbol::End => false,
                            Symbol::Nonterminal(nt) => nullables.contains(nt),
                        });

                        if all_nullable {
                            changed |= nullables.insert(*nt);
                        }
                    }
                }
            }

            if !changed {
                break;
            }
        }

        nullables
    }

    /// FIRST set of every nonterminal, computed in one fixpoint.
    pub fn first_sets(&self) -> HashMap<char, FirstSet> {
        let mut sets: HashMap<char, FirstSet> = self
            .nonterminals
            .iter()
            .map(|nt| (nt, FirstSet::default()))
            .collect();

        loop {
            let mut changed = false;
            for production in &self.productions {
                let lhs = production.lhs();

                // contribution of this production, read before mutating
                // (the lhs may occur in its own rhs)
                let mut terminals: BTreeSet<char> = BTreeSet::new();
                let mut all_nullable = true;
                for sym in production.rhs() {
                    match sym {
                        Symbol::Terminal(c) => {
                            terminals.insert(*c);
                            all_nullable = false;
                        }
                        Symbol::Nonterminal(b) => {
                            let inner = &sets[b];
                            terminals.extend(inner.terminals.iter().copied());
                            if !inner.empty {
                                all_nullable = false;
                            }
                        }
                        Symbol::End => {
                            all_nullable = false;
                        }
                    }
                    if !all_nullable {
                        break;
                    }
                }

                let entry = sets.get_mut(&lhs).expect("lhs validated at build");
                let before = entry.terminals.len();
                entry.terminals.extend(terminals);
                changed |= entry.terminals.len() != before;
                if all_nullable && !entry.empty {
                    entry.empty = true;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        sets
    }

    /// FIRST of a single symbol: a terminal begins only with itself.
    pub fn first(&self, symbol: Symbol) -> FirstSet {
        match symbol {
            Symbol::Terminal(c) => FirstSet {
                terminals: BTreeSet::from([c]),
                empty: false,
            },
            Symbol::Nonterminal(nt) => self.first_sets().remove(&nt).unwrap_or_default(),
            Symbol::End => FirstSet::default(),
        }
    }
}

/// Terminals that may begin a derivation of a symbol, plus whether the
/// symbol derives the empty word.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstSet {
    terminals: BTreeSet<char>,
    empty: bool,
}

impl FirstSet {
    pub fn contains(&self, c: char) -> bool {
        self.terminals.contains(&c)
    }

    pub fn derives_empty(&self) -> bool {
        self.empty
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.terminals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }
}

/// Owned, single-use grammar builder; `build` validates and produces the
/// immutable [`Grammar`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    axiom: Option<char>,
    terminals: Alphabet,
    nonterminals: Alphabet,
    productions: Vec<Production>,
}

impl GrammarBuilder {
    pub fn axiom(mut self, c: char) -> Self {
        self.axiom = Some(c);
        self
    }

    pub fn terminal(mut self, c: char) -> Self {
        self.terminals.insert(c);
        self
    }

    pub fn terminals(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        for c in chars {
            self.terminals.insert(c);
        }
        self
    }

    pub fn nonterminal(mut self, c: char) -> Self {
        self.nonterminals.insert(c);
        self
    }

    pub fn nonterminals(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        for c in chars {
            self.nonterminals.insert(c);
        }
        self
    }

    /// An empty `rhs` is the epsilon-production of `lhs`.
    pub fn production(mut self, lhs: char, rhs: &[Symbol]) -> Self {
        if rhs.is_empty() {
            self.productions.push(Production::Empty(lhs));
        } else {
            self.productions.push(Production::Nonempty(lhs, rhs.to_vec()));
        }
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let axiom = self.axiom.ok_or(GrammarError::MissingAxiom)?;
        if !self.nonterminals.contains(axiom) {
            return Err(GrammarError::AxiomNotNonterminal(axiom));
        }
        if let Some(c) = self.terminals.intersection(&self.nonterminals).iter().next() {
            return Err(GrammarError::OverlappingAlphabets(c));
        }

        for production in &self.productions {
            if !self.nonterminals.contains(production.lhs()) {
                return Err(GrammarError::UnknownLhs(production.lhs()));
            }
            for sym in production.rhs() {
                match sym {
                    Symbol::Terminal(c) => {
                        if !self.terminals.contains(*c) {
                            return Err(GrammarError::UnknownSymbol(*c));
                        }
                    }
                    Symbol::Nonterminal(c) => {
                        if !self.nonterminals.contains(*c) {
                            return Err(GrammarError::UnknownSymbol(*c));
                        }
                    }
                    Symbol::End => return Err(GrammarError::EndInProduction),
                }
            }
        }

        let mut by_lhs: HashMap<char, Vec<usize>> = HashMap::new();
        for (i, production) in self.productions.iter().enumerate() {
            by_lhs.entry(production.lhs()).or_default().push(i);
        }

        Ok(Grammar {
            axiom,
            terminals: self.terminals,
            nonterminals: self.nonterminals,
            productions: self.productions,
            by_lhs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // S -> A; A -> BA | ε; B -> aB | b
    fn repeats_grammar() -> Grammar {
        Grammar::builder()
            .axiom('S')
            .nonterminals("SAB".chars())
            .terminals("ab".chars())
            .production('S', &[Symbol::Nonterminal('A')])
            .production(
                'A',
                &[Symbol::Nonterminal('B'), Symbol::Nonterminal('A')],
            )
            .production('A', &[])
            .production(
                'B',
                &[Symbol::Terminal('a'), Symbol::Nonterminal('B')],
            )
            .production('B', &[Symbol::Terminal('b')])
            .build()
            .expect("grammar is well formed")
    }

    #[test]
    fn production_index() {
        let grammar = repeats_grammar();
        assert_eq!(grammar.productions_for('A'), &[1, 2]);
        assert_eq!(grammar.productions_for('S'), &[0]);
        assert_eq!(grammar.productions_for('x'), &[] as &[usize]);
    }

    #[test]
    fn nullable_fixpoint() {
        let grammar = repeats_grammar();
        let nullable = grammar.nullable();
        // A directly, S through A; B never
        assert!(nullable.contains(&'A'));
        assert!(nullable.contains(&'S'));
        assert!(!nullable.contains(&'B'));
    }

    #[test]
    fn first_sets_walk_nullable_prefixes() {
        let grammar = repeats_grammar();
        let first = grammar.first_sets();

        let b = &first[&'B'];
        assert!(b.contains('a') && b.contains('b') && !b.derives_empty());

        // A -> BA, and A -> ε: FIRST(A) = FIRST(B) plus the empty flag
        let a = &first[&'A'];
        assert!(a.contains('a') && a.contains('b') && a.derives_empty());

        let s = &first[&'S'];
        assert!(s.contains('a') && s.contains('b') && s.derives_empty());
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let grammar = repeats_grammar();
        let first = grammar.first(Symbol::Terminal('a'));
        assert!(first.contains('a'));
        assert_eq!(first.len(), 1);
        assert!(!first.derives_empty());
    }

    #[test]
    fn build_rejects_missing_axiom() {
        let err = Grammar::builder().nonterminal('S').build().unwrap_err();
        assert_eq!(err, GrammarError::MissingAxiom);
    }

    #[test]
    fn build_rejects_overlapping_alphabets() {
        let err = Grammar::builder()
            .axiom('S')
            .nonterminal('S')
            .terminal('S')
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::OverlappingAlphabets('S'));
    }

    #[test]
    fn build_rejects_undeclared_symbols() {
        let err = Grammar::builder()
            .axiom('S')
            .nonterminal('S')
            .production('S', &[Symbol::Terminal('a')])
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::UnknownSymbol('a'));

        let err = Grammar::builder()
            .axiom('S')
            .nonterminal('S')
            .production('S', &[Symbol::End])
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::EndInProduction);
    }
}
