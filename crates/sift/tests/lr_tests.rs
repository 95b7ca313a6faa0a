use sift::lr::{self, ParseTable};
use sift_gram::parse_grammar;

fn build_table(grammar_text: &str) -> ParseTable {
    let grammar = parse_grammar(grammar_text).expect("failed to parse grammar");
    ParseTable::build(&grammar).expect("grammar should be LR(1)")
}

fn run_vectors(tests: &[(&str, bool)], table: &ParseTable, grammar_text: &str) {
    for (word, expected) in tests {
        let result = lr::recognize(table, word);
        assert_eq!(
            result, *expected,
            "'{}' failed on input '{}', expect accept: {}, actual accept: {}",
            grammar_text, word, expected, result
        );
    }
}

#[test]
fn pair_grammar() {
    let grammar_text = "S->CC;C->cC|d.";
    let table = build_table(grammar_text);

    let test_vectors = [
        ("dd", true),
        ("cdd", true),
        ("cccdcccd", true),
        ("", false),
        ("d", false),
        ("cc", false),
        ("dcd", true),
        ("ddd", false),
        ("dc", false),
    ];

    run_vectors(&test_vectors, &table, grammar_text)
}

#[test]
fn nullable_repeats_grammar() {
    // (a*b)*
    let grammar_text = "S->A;A->BA|ε;B->aB|b.";
    let table = build_table(grammar_text);

    let test_vectors = [
        ("", true),
        ("b", true),
        ("aab", true),
        ("aaabaaab", true),
        ("bbbb", true),
        ("ddd", false),
        ("a", false),
        ("ba", false),
    ];

    run_vectors(&test_vectors, &table, grammar_text)
}

#[test]
fn empty_word_grammar() {
    let grammar_text = "S->ε.";
    let table = build_table(grammar_text);

    let test_vectors = [("", true), ("a", false), ("aa", false), ("ε", false)];

    run_vectors(&test_vectors, &table, grammar_text)
}

#[test]
fn non_lr1_grammar_is_refused_before_parsing() {
    let grammar =
        parse_grammar("S->AL|BL|BR;A->a;B->b;L->AS|a|b;R->BS|a|b.").expect("failed to parse");

    // table construction itself must flag the conflict, so no word — not
    // even a plausible one like "aa" — is ever parsed
    let err = ParseTable::build(&grammar).expect_err("grammar should not be LR(1)");
    assert!(!err.conflicts.is_empty());
    let message = err.to_string();
    assert!(message.contains("not LR(1)"), "got: {}", message);
}

#[test]
fn table_survives_compile_and_restore() {
    let grammar_text = "S->CC;C->cC|d.";
    let table = build_table(grammar_text);

    let bytes = table.compile().expect("table should serialize");
    let restored = ParseTable::restore(&bytes).expect("table should deserialize");
    assert_eq!(table, restored);

    let test_vectors = [("dd", true), ("cdd", true), ("cc", false)];
    run_vectors(&test_vectors, &restored, grammar_text)
}

#[test]
fn left_recursive_grammar() {
    // sums over a single digit class, the classic shift/reduce exercise
    let grammar_text = "S->E;E->E+T|T;T->n.";
    let table = build_table(grammar_text);

    let test_vectors = [
        ("n", true),
        ("n+n", true),
        ("n+n+n", true),
        ("+n", false),
        ("n+", false),
        ("nn", false),
    ];

    run_vectors(&test_vectors, &table, grammar_text)
}
