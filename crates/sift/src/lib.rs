//! Context-free recognition engine.
//!
//! Two independent algorithms decide whether a word belongs to a grammar's
//! language: [`cyk`] (dynamic programming, CNF grammars) and [`lr`] (a full
//! LR(1) pipeline that reports non-LR(1) grammars instead of guessing).

pub mod cyk;
pub mod lr;

pub use sift_gram::{Grammar, Symbol};
