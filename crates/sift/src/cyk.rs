//! CYK recognition over grammars in Chomsky normal form.

use std::collections::HashMap;

use bit_set::BitSet;
use thiserror::Error;

use sift_gram::{Grammar, Production, Symbol};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CykError {
    #[error("grammar is not in Chomsky normal form: `{0}` is neither `A -> B C` nor `A -> a`")]
    NotCnf(String),
    #[error("grammar is not in Chomsky normal form: only the axiom may derive ε (found `{0} -> ε`)")]
    NonAxiomEmpty(char),
}

// the CNF productions over a dense nonterminal index, checked once up front
struct CnfRules {
    axiom: usize,
    axiom_empty: bool,
    // A -> a
    units: Vec<(usize, char)>,
    // A -> B C
    pairs: Vec<(usize, usize, usize)>,
}

fn cnf_rules(grammar: &Grammar) -> Result<CnfRules, CykError> {
    let index: HashMap<char, usize> = grammar
        .nonterminals()
        .iter()
        .enumerate()
        .map(|(i, nt)| (nt, i))
        .collect();

    let mut rules = CnfRules {
        axiom: index[&grammar.axiom()],
        axiom_empty: false,
        units: Vec::new(),
        pairs: Vec::new(),
    };

    for production in grammar.productions() {
        match production {
            Production::Empty(nt) => {
                if *nt != grammar.axiom() {
                    return Err(CykError::NonAxiomEmpty(*nt));
                }
                rules.axiom_empty = true;
            }
            Production::Nonempty(nt, rhs) => match rhs.as_slice() {
                [Symbol::Terminal(c)] => rules.units.push((index[nt], *c)),
                [Symbol::Nonterminal(b), Symbol::Nonterminal(c)] => {
                    rules.pairs.push((index[nt], index[b], index[c]));
                }
                _ => return Err(CykError::NotCnf(production.to_string())),
            },
        }
    }

    Ok(rules)
}

// upper-triangular recognition table, row-major over (length, start); cell
// (start, len) holds the nonterminals deriving word[start .. start + len]
struct CykMatrix {
    n: usize,
    cells: Vec<BitSet>,
}

impl CykMatrix {
    fn new(n: usize, nonterminals: usize) -> CykMatrix {
        let mut cells = Vec::with_capacity(n * n);
        cells.resize_with(n * n, || BitSet::with_capacity(nonterminals));
        CykMatrix { n, cells }
    }

    fn cell(&self, start: usize, len: usize) -> &BitSet {
        &self.cells[(len - 1) * self.n + start]
    }

    fn cell_mut(&mut self, start: usize, len: usize) -> &mut BitSet {
        &mut self.cells[(len - 1) * self.n + start]
    }
}

/// Decide membership of `word` in the language of a CNF grammar.
///
/// The CNF precondition is validated first; a grammar that fails it gets a
/// [`CykError`] rather than a silent mis-parse. O(n³ · |grammar|).
pub fn recognize(grammar: &Grammar, word: &str) -> Result<bool, CykError> {
    let rules = cnf_rules(grammar)?;
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return Ok(rules.axiom_empty);
    }

    let n = chars.len();
    let mut matrix = CykMatrix::new(n, grammar.nonterminals().len());

    for (start, &c) in chars.iter().enumerate() {
        let cell = matrix.cell_mut(start, 1);
        for &(a, t) in &rules.units {
            if t == c {
                cell.insert(a);
            }
        }
    }

    for len in 2..=n {
        for start in 0..=(n - len) {
            for split in 1..len {
                for &(a, b, c) in &rules.pairs {
                    if matrix.cell(start, split).contains(b)
                        && matrix.cell(start + split, len - split).contains(c)
                    {
                        matrix.cell_mut(start, len).insert(a);
                    }
                }
            }
        }
    }

    Ok(matrix.cell(0, n).contains(rules.axiom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_gram::parse_grammar;

    #[test]
    fn rejects_non_cnf_grammar() {
        let grammar = parse_grammar("S->CC;C->cC|d.").expect("well formed");
        assert_eq!(
            recognize(&grammar, "dd"),
            Err(CykError::NotCnf("C -> c C".to_string()))
        );
    }

    #[test]
    fn rejects_non_axiom_empty_production() {
        let grammar = parse_grammar("S->AB;A->a|ε;B->b.").expect("well formed");
        assert_eq!(recognize(&grammar, "ab"), Err(CykError::NonAxiomEmpty('A')));
    }

    #[test]
    fn axiom_epsilon_accepts_only_the_empty_word() {
        let grammar = parse_grammar("S->ε.").expect("well formed");
        assert_eq!(recognize(&grammar, ""), Ok(true));
        assert_eq!(recognize(&grammar, "x"), Ok(false));
    }
}
