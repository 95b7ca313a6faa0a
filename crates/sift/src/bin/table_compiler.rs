use std::{env, fs};

use sift::lr::ParseTable;
use sift_gram::parse_grammar;

fn main() {
    let args: Vec<String> = env::args().collect();

    let input_file = &args[1];
    let output_file = &args[2];

    let input_file = fs::read_to_string(input_file).expect("Input file not found");
    let grammar = parse_grammar(&input_file).expect("Failed to parse grammar description");
    let table = ParseTable::build(&grammar).expect("Grammar is not LR(1)");
    let compiled_table = table.compile().expect("Failed to compile table");
    fs::write(output_file, &compiled_table).expect("Failed to write output");

    println!("Wrote {}, {} bytes", output_file, compiled_table.len());
}
