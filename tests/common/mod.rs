#![allow(dead_code)]

use envedit::{parse, Assignment, Line};
use pretty_assertions::assert_eq;

pub fn single_assignment(input: &str) -> Option<(String, String)> {
    let doc = parse(input);
    let pair = doc
        .assignments()
        .next()
        .map(|kv| (kv.key.to_string(), kv.value.to_string()));
    pair
}

pub fn assert_pair(input: &str, expected_key: &str, expected_value: &str) {
    let pair = single_assignment(input)
        .unwrap_or_else(|| panic!("Failed to parse assignment from input: {:?}", input));
    assert_eq!(pair.0, expected_key, "Key mismatch");
    assert_eq!(pair.1, expected_value, "Value mismatch");
}

pub fn assert_unknown(input: &str) {
    let doc = parse(input);
    assert!(
        doc.lines().first().map_or(false, Line::is_unknown),
        "Expected unknown line for input: {:?}, got {:?}",
        input,
        doc.lines()
    );
    assert!(doc.is_empty(), "Unknown input must not define keys: {:?}", input);
}

pub fn assert_exported(input: &str, expected_key: &str, expected_value: &str) {
    assert_pair(input, expected_key, expected_value);
    with_assignment(input, |kv| assert!(kv.is_exported, "Expected exported flag to be true"));
}

pub fn with_assignment<F: FnOnce(&Assignment<'_>)>(input: &str, check: F) {
    let doc = parse(input);
    let kv = doc
        .assignments()
        .next()
        .unwrap_or_else(|| panic!("No assignment in {:?}", input));
    check(kv);
}

/// Lines must cover the input exactly.
pub fn assert_lossless(input: &str) {
    let doc = parse(input);
    assert_eq!(doc.to_string(), input);

    let mut expected_offset = 0;
    let mut expected_line = 0;
    for line in doc.lines() {
        let span = line.span();
        assert_eq!(span.start.offset, expected_offset, "gap before {:?}", line);
        assert_eq!(span.start.line, expected_line, "line index drift at {:?}", line);
        assert_eq!(&input[span.range()], line.raw());
        expected_offset = span.end.offset;
        expected_line = span.end.line;
    }
    assert_eq!(expected_offset, input.len());
}

pub fn assert_set(input: &str, key: &str, value: &str, expected: &str) {
    let output = envedit::set(input, key, value).expect("set should succeed");
    assert_eq!(output, expected);
}
