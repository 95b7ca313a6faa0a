use std::fmt;

use serde::{Deserialize, Serialize};

// everything is plain chars since this engine classifies raw characters,
// not lexed tokens
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
    /// End-of-input marker (`$`). Only appears in lookahead sets and as the
    /// driver's end-of-word lookahead, never inside a production.
    End,
}

impl Symbol {
    pub fn is_terminal(self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => write!(f, "{}", c),
            Symbol::End => write!(f, "$"),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
