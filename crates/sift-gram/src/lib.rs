//! Symbol, alphabet, and grammar model shared by the recognition engine,
//! plus the textual grammar-description parser.

mod alphabet;
mod grammar;
mod parse;
mod symbol;

pub use alphabet::Alphabet;
pub use grammar::{FirstSet, Grammar, GrammarBuilder, GrammarError, Production};
pub use parse::{parse_grammar, ParseError, EPSILON};
pub use symbol::Symbol;
