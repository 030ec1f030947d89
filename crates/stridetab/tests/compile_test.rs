// End-to-end compilation scenarios: the dog/cat pattern set at strides 1 and
// 2, idempotence, file loading, and degenerate inputs.

use std::io::Write;

use stridetab::{
    validate_tables, Compilation, EdgeKind, KeyValueEntry, Sym, TableCompiler,
};
use tempfile::NamedTempFile;

fn compile(patterns: &[&[u8]], stride: usize) -> Compilation {
    TableCompiler::new(stride, 0)
        .unwrap()
        .compile(patterns)
        .unwrap()
}

/// Key-value entries out of a given state
fn entries_from(compilation: &Compilation, state: u32) -> Vec<&KeyValueEntry> {
    compilation
        .tables()
        .key_value_entries()
        .iter()
        .filter(|e| e.state == state)
        .collect()
}

#[test]
fn test_dog_cat_stride_one() {
    let compilation = compile(&[b"dog", b"cat"], 1);
    let dfa = compilation.dfa();

    // Root has direct edges on 'd' and 'c' only.
    let root_bytes: Vec<u8> = dfa.next(0).iter().map(|&(b, _)| b).collect();
    assert_eq!(root_bytes.len(), 2);
    assert!(root_bytes.contains(&b'd'));
    assert!(root_bytes.contains(&b'c'));

    // Two distinct accepting states with accept indexes 1 and 2 in
    // discovery order: "dog" first, "cat" second.
    let accepting: Vec<(u32, u32)> = (0..dfa.state_count() as u32)
        .filter(|&s| dfa.accept(s) != 0)
        .map(|s| (s, dfa.accept(s)))
        .collect();
    assert_eq!(accepting.len(), 2);
    assert_eq!(accepting[0].1, 1);
    assert_eq!(accepting[1].1, 2);
    assert_ne!(accepting[0].0, accepting[1].0);

    // d -> o -> g reaches the first accepting state.
    let step = |state: u32, byte: u8| -> u32 {
        dfa.next(state)
            .iter()
            .find(|&&(b, _)| b == byte)
            .map(|&(_, to)| to)
            .unwrap()
    };
    let dog_end = step(step(step(0, b'd'), b'o'), b'g');
    assert_eq!(dfa.accept(dog_end), 1);
    let cat_end = step(step(step(0, b'c'), b'a'), b't');
    assert_eq!(dfa.accept(cat_end), 2);

    // Modifiers are the single-bit masks 1 and 2.
    let modifiers: Vec<u64> = compilation
        .tables()
        .mat_entries()
        .iter()
        .map(|e| e.modifier)
        .filter(|&m| m != 0)
        .collect();
    assert!(modifiers.contains(&1));
    assert!(modifiers.contains(&2));
    assert!(modifiers.iter().all(|&m| m == 1 || m == 2));

    // Intermediate states route other first bytes back toward the root's
    // direct edges: from the "do" state, a 'c' restarts toward "cat".
    let do_state = step(step(0, b'd'), b'o');
    let from_do = entries_from(&compilation, do_state);
    assert!(from_do
        .iter()
        .any(|e| e.seq == vec![Sym::Byte(b'c')] && e.next_state == step(0, b'c')));
}

#[test]
fn test_dog_cat_stride_two() {
    let stride_one = compile(&[b"dog", b"cat"], 1);
    let stride_two = compile(&[b"dog", b"cat"], 2);

    // Every emitted sequence has length exactly 2.
    for entry in stride_two.tables().key_value_entries() {
        assert_eq!(entry.seq.len(), 2);
    }

    // The root gains one-byte-shift variants absent at stride 1.
    let wildcard_d = vec![Sym::Any, Sym::Byte(b'd')];
    let wildcard_c = vec![Sym::Any, Sym::Byte(b'c')];
    let root_two = entries_from(&stride_two, 0);
    assert!(root_two.iter().any(|e| e.seq == wildcard_d));
    assert!(root_two.iter().any(|e| e.seq == wildcard_c));
    let root_one = entries_from(&stride_one, 0);
    assert!(root_one.iter().all(|e| e.seq.len() == 1));
}

#[test]
fn test_stride_one_degenerates_to_single_stride_dfa() {
    let compilation = compile(&[b"he", b"hers", b"his"], 1);
    let dfa = compilation.dfa();
    let msdfa = compilation.multi_stride_dfa();

    // Same edge set, byte for byte, kind for kind.
    assert_eq!(dfa.edges().len(), msdfa.edges().len());
    for (single, multi) in dfa.edges().iter().zip(msdfa.edges()) {
        assert_eq!(multi.seq, vec![Sym::Byte(single.byte)]);
        assert_eq!(multi.from, single.from);
        assert_eq!(multi.to, single.to);
        assert_eq!(multi.kind, single.kind);
    }
}

#[test]
fn test_recompilation_is_idempotent() {
    for stride in [1, 2, 3] {
        let compiler = TableCompiler::new(stride, 3).unwrap();
        let first = compiler.compile(&[b"dog".as_slice(), b"cat", b"do"]).unwrap();
        let second = compiler.compile(&[b"dog".as_slice(), b"cat", b"do"]).unwrap();
        assert_eq!(first.tables(), second.tables(), "stride {}", stride);
    }
}

#[test]
fn test_compile_file_matches_in_memory() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "dog\ncat\n").unwrap();

    let compiler = TableCompiler::new(2, 0).unwrap();
    let from_file = compiler.compile_file(file.path()).unwrap();
    let in_memory = compiler.compile(&[b"dog".as_slice(), b"cat"]).unwrap();
    assert_eq!(from_file.tables(), in_memory.tables());
}

#[test]
fn test_compile_file_missing_path_errors() {
    let compiler = TableCompiler::new(1, 0).unwrap();
    assert!(compiler.compile_file("/nonexistent/patterns.txt").is_err());
}

#[test]
fn test_validation_passes_end_to_end() {
    for stride in [1, 2] {
        for patterns in [
            vec![b"dog".as_slice(), b"cat"],
            vec![b"he".as_slice(), b"hers", b"his"],
            vec![b"aa".as_slice(), b"aab"],
        ] {
            let compilation = compile(&patterns, stride);
            let report = validate_tables(&compilation);
            assert!(
                report.is_valid(),
                "stride {} patterns {:?}: {:?}",
                stride,
                patterns,
                report.errors
            );
        }
    }
}

#[test]
fn test_patterns_with_high_bytes() {
    // 0xFF is an ordinary pattern byte; the wildcard is a tagged variant,
    // not a reserved value.
    let compilation = compile(&[b"\xff\xfe", b"a\xff"], 2);
    let report = validate_tables(&compilation);
    assert!(report.is_valid(), "{:?}", report.errors);

    let has_ff_edge = compilation
        .tables()
        .key_value_entries()
        .iter()
        .any(|e| e.seq.contains(&Sym::Byte(0xff)));
    assert!(has_ff_edge);
}

#[test]
fn test_derived_edges_present_for_overlapping_patterns() {
    // "his" and "is": after "hi", an 's' completes both patterns' suffix
    // path; failure-derived edges must route the shared suffix.
    let compilation = compile(&[b"his", b"is"], 1);
    let derived = compilation
        .multi_stride_dfa()
        .edges()
        .iter()
        .filter(|e| e.kind == EdgeKind::Derived)
        .count();
    assert!(derived > 0);

    // Scanning "his" must hit the accept state for "is" semantics via the
    // DFA: the state after h-i-s accepts pattern 1 ("his").
    let dfa = compilation.dfa();
    let step = |state: u32, byte: u8| -> u32 {
        dfa.next(state)
            .iter()
            .find(|&&(b, _)| b == byte)
            .map(|&(_, to)| to)
            .unwrap()
    };
    let his_end = step(step(step(0, b'h'), b'i'), b's');
    assert_eq!(dfa.accept(his_end), 1);
}
