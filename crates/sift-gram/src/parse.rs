use std::collections::{BTreeSet, VecDeque};

use thiserror::Error;

use crate::grammar::{Grammar, GrammarError};
use crate::symbol::Symbol;

/// Marker for the empty alternative in grammar descriptions.
pub const EPSILON: char = 'ε';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("grammar description is missing its `.` end marker")]
    MissingEndMarker,
    #[error("grammar description contains no productions")]
    EmptyGrammar,
    #[error("expected `->` after left-hand side `{0}`")]
    MissingArrow(char),
    #[error("`ε` cannot appear on a left-hand side")]
    EpsilonLhs,
    #[error("empty alternative for `{0}` (spell the empty word as `ε`)")]
    EmptyAlternative(char),
    #[error("`ε` must stand alone in an alternative of `{0}`")]
    StrayEpsilon(char),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Parse a grammar description such as `S->CC;C->cC|d.`.
///
/// One character per symbol; `;` separates productions, `|` alternatives,
/// `.` ends the grammar, `ε` is the empty alternative. Every left-hand-side
/// character is a nonterminal, the first one is the axiom, and every other
/// right-hand-side character is a terminal. Whitespace is ignored.
pub fn parse_grammar(text: &str) -> Result<Grammar, ParseError> {
    let mut toks: VecDeque<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if toks.pop_back() != Some('.') {
        return Err(ParseError::MissingEndMarker);
    }

    let mut rules: Vec<(char, Vec<Vec<char>>)> = Vec::new();
    while let Some(lhs) = toks.pop_front() {
        if lhs == EPSILON {
            return Err(ParseError::EpsilonLhs);
        }
        if !(toks.pop_front() == Some('-') && toks.pop_front() == Some('>')) {
            return Err(ParseError::MissingArrow(lhs));
        }

        let mut alternatives: Vec<Vec<char>> = vec![Vec::new()];
        loop {
            match toks.pop_front() {
                None | Some(';') => break,
                Some('|') => alternatives.push(Vec::new()),
                Some(c) => alternatives
                    .last_mut()
                    .expect("starts with one alternative")
                    .push(c),
            }
        }
        rules.push((lhs, alternatives));
    }

    if rules.is_empty() {
        return Err(ParseError::EmptyGrammar);
    }

    // pass 1: left-hand sides are the nonterminals
    let nonterminals: BTreeSet<char> = rules.iter().map(|(lhs, _)| *lhs).collect();

    // pass 2: classify right-hand characters and emit productions
    let mut builder = Grammar::builder()
        .axiom(rules[0].0)
        .nonterminals(nonterminals.iter().copied());
    for (lhs, alternatives) in &rules {
        for alternative in alternatives {
            match alternative.as_slice() {
                [] => return Err(ParseError::EmptyAlternative(*lhs)),
                [c] if *c == EPSILON => {
                    builder = builder.production(*lhs, &[]);
                }
                chars => {
                    if chars.contains(&EPSILON) {
                        return Err(ParseError::StrayEpsilon(*lhs));
                    }
                    let rhs: Vec<Symbol> = chars
                        .iter()
                        .map(|&c| {
                            if nonterminals.contains(&c) {
                                Symbol::Nonterminal(c)
                            } else {
                                Symbol::Terminal(c)
                            }
                        })
                        .collect();
                    for sym in &rhs {
                        if let Symbol::Terminal(c) = sym {
                            builder = builder.terminal(*c);
                        }
                    }
                    builder = builder.production(*lhs, &rhs);
                }
            }
        }
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::grammar::Production;

    #[test]
    fn parses_scenario_grammar() {
        let grammar = parse_grammar("S->CC;C->cC|d.").expect("well formed");
        assert_eq!(grammar.axiom(), 'S');
        assert_eq!(grammar.nonterminals(), &"SC".chars().collect::<Alphabet>());
        assert_eq!(grammar.terminals(), &"cd".chars().collect::<Alphabet>());
        assert_eq!(grammar.productions().len(), 3);
        assert_eq!(
            grammar.production(0),
            &Production::Nonempty(
                'S',
                vec![Symbol::Nonterminal('C'), Symbol::Nonterminal('C')]
            )
        );
    }

    #[test]
    fn parses_epsilon_alternative() {
        let grammar = parse_grammar("S->A;A->BA|ε;B->aB|b.").expect("well formed");
        assert_eq!(grammar.productions_for('A').len(), 2);
        assert!(grammar.production(2).is_empty());
    }

    #[test]
    fn parses_epsilon_only_grammar() {
        let grammar = parse_grammar("S->ε.").expect("well formed");
        assert!(grammar.terminals().is_empty());
        assert_eq!(grammar.productions(), &[Production::Empty('S')]);
    }

    #[test]
    fn whitespace_is_ignored() {
        let grammar = parse_grammar("S -> C C ;\nC -> c C | d .").expect("well formed");
        assert_eq!(grammar.productions().len(), 3);
    }

    #[test]
    fn rejects_missing_end_marker() {
        assert_eq!(
            parse_grammar("S->a"),
            Err(ParseError::MissingEndMarker)
        );
    }

    #[test]
    fn rejects_missing_arrow() {
        assert_eq!(parse_grammar("Sa."), Err(ParseError::MissingArrow('S')));
    }

    #[test]
    fn rejects_stray_epsilon() {
        assert_eq!(
            parse_grammar("S->aε."),
            Err(ParseError::StrayEpsilon('S'))
        );
        assert_eq!(
            parse_grammar("S->a|."),
            Err(ParseError::EmptyAlternative('S'))
        );
    }
}
