use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use petgraph::dot::Dot;

use sift::{cyk, lr};
use sift_gram::{parse_grammar, Grammar};

#[derive(Parser)]
#[command(about = "Decide membership of words in a context-free language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize words against a grammar description
    Recognize {
        /// Grammar description file, e.g. `S->CC;C->cC|d.`
        #[arg(long)]
        grammar: PathBuf,
        #[arg(long, value_enum, default_value = "lr1")]
        algorithm: Algorithm,
        /// Reuse a table previously written by `table` (lr1 only)
        #[arg(long)]
        table: Option<PathBuf>,
        words: Vec<String>,
    },
    /// Build the LR(1) table once and write its compiled form
    Table {
        #[arg(long)]
        grammar: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the deterministic item automaton in Dot format
    Dot {
        #[arg(long)]
        grammar: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Cyk,
    Lr1,
}

fn load_grammar(path: &Path) -> Result<Grammar, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    parse_grammar(&text).map_err(|e| e.to_string())
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Recognize {
            grammar,
            algorithm,
            table,
            words,
        } => {
            let grammar = load_grammar(&grammar)?;
            match algorithm {
                Algorithm::Cyk => {
                    for word in &words {
                        let accepted = cyk::recognize(&grammar, word).map_err(|e| e.to_string())?;
                        report(word, accepted);
                    }
                }
                Algorithm::Lr1 => {
                    let table = match table {
                        Some(path) => {
                            let bytes = fs::read(&path)
                                .map_err(|e| format!("{}: {}", path.display(), e))?;
                            lr::ParseTable::restore(&bytes).map_err(|e| e.to_string())?
                        }
                        None => lr::ParseTable::build(&grammar).map_err(|e| e.to_string())?,
                    };
                    for word in &words {
                        report(word, lr::recognize(&table, word));
                    }
                }
            }
        }

        Command::Table { grammar, out } => {
            let grammar = load_grammar(&grammar)?;
            let table = lr::ParseTable::build(&grammar).map_err(|e| e.to_string())?;
            let compiled = table.compile().map_err(|e| e.to_string())?;
            fs::write(&out, &compiled).map_err(|e| format!("{}: {}", out.display(), e))?;
            println!(
                "Wrote {}, {} states, {} bytes",
                out.display(),
                table.state_count(),
                compiled.len()
            );
        }

        Command::Dot { grammar } => {
            let grammar = load_grammar(&grammar)?;
            let (nfa, dfa) = lr::analyze(&grammar);
            let graph = lr::automaton_graph(&nfa, &dfa, &grammar);
            println!("{:?}", Dot::new(&graph));
        }
    }
    Ok(())
}

fn report(word: &str, accepted: bool) {
    println!(
        "'{}': {}",
        word,
        if accepted { "accepted" } else { "rejected" }
    );
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
