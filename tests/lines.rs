mod common;
use common::{assert_exported, assert_lossless, assert_pair, with_assignment};
use envedit::{parse, EnvEdit, Error, Lexer, Line};

// =========================================================================
// COMMENTS & BLANKS
// =========================================================================

#[test]
fn test_comment_line() {
    let doc = parse("# Comment\n");
    assert!(doc.lines()[0].is_comment());
    assert!(doc.is_empty());
}

#[test]
fn test_indented_comment() {
    let doc = parse("   # indented\n");
    assert!(doc.lines()[0].is_comment());
}

#[test]
fn test_commented_out_assignment_is_comment() {
    let doc = parse("# KEY=value\n");
    assert!(doc.lines()[0].is_comment());
    assert_eq!(doc.get("KEY"), None);
}

#[test]
fn test_whitespace_only_is_blank() {
    let doc = parse("   \n\t\n\n");
    assert_eq!(doc.lines().len(), 3);
    assert!(doc.lines().iter().all(Line::is_blank));
}

#[test]
fn test_empty_input() {
    let doc = parse("");
    assert!(doc.lines().is_empty());
    assert!(doc.is_empty());
}

// =========================================================================
// EXPORT
// =========================================================================

#[test]
fn test_export_prefix() { assert_exported("export DB_URL=postgres", "DB_URL", "postgres"); }
#[test]
fn test_export_tab() { assert_exported("export\tKEY=v", "KEY", "v"); }
#[test]
fn test_export_many_spaces() { assert_exported("export    KEY=v", "KEY", "v"); }
#[test]
fn test_export_indented() { assert_exported("  export KEY=v", "KEY", "v"); }

#[test]
fn test_export_no_space_is_key() {
    assert_pair("exportKey=val", "exportKey", "val");
    with_assignment("exportKey=val", |kv| assert!(!kv.is_exported));
}

#[test]
fn test_export_as_key() {
    assert_pair("export=1", "export", "1");
    assert_pair("export = 1", "export", "1");
}

#[test]
fn test_export_without_assignment_is_unknown() {
    let doc = parse("export KEY\n");
    assert!(doc.lines()[0].is_unknown());
}

#[test]
fn test_export_prefix_text() {
    with_assignment("  export  KEY=v", |kv| {
        assert_eq!(kv.prefix, "  export  ");
        assert_eq!(kv.leading_whitespace, "  ");
    });
}

// =========================================================================
// UNKNOWN CONTENT
// =========================================================================

#[test]
fn test_shell_constructs_are_unknown() {
    let input = "for i in 1 2 3; do\n  echo $i\ndone\nsource other.env\nKEY=v\n";
    let doc = parse(input);
    assert_eq!(doc.unknown_lines().count(), 4);
    assert!(doc.has_unknown());
    assert_eq!(doc.get("KEY"), Some("v"));
}

#[test]
fn test_unknown_lines_keep_text() {
    let doc = parse("not valid\n");
    let raw = doc.unknown_lines().next().unwrap();
    assert_eq!(raw.text(), "not valid");
    assert_eq!(raw.raw, "not valid\n");
}

// =========================================================================
// LOSSLESS COVERAGE
// =========================================================================

#[test]
fn test_lossless_mixed() {
    assert_lossless("# header\n\nexport A=1 # c\n  B = 'two'\nC=\"multi\nline\"\nbroken line\n\n");
}

#[test]
fn test_lossless_no_trailing_newline() {
    assert_lossless("A=1\nB=2");
}

#[test]
fn test_lossless_crlf() {
    assert_lossless("A=1\r\n# c\r\n\r\nB=\"x\r\ny\"\r\n");
}

#[test]
fn test_lossless_unterminated() {
    assert_lossless("A=1\nB='x\n\n# c\n");
}

#[test]
fn test_lossless_bom() {
    assert_lossless("\u{FEFF}# c\nA=1\n");
}

#[test]
fn test_stray_carriage_return_is_content() {
    let doc = parse("X=1\nfoo\r");
    assert_eq!(doc.unknown_lines().map(|l| l.text()).collect::<Vec<_>>(), vec!["foo\r"]);
    assert_eq!(doc.get("X"), Some("1"));
    assert_eq!(parse("A=1\r").get("A"), Some("1\r"));
    assert_eq!(parse("A='x'\r").get("A"), Some("x"));
    assert_lossless("X=1\nfoo\r");
}

#[test]
fn test_lexer_iterator_matches_tokenize() {
    let input = "A=1\n# c\n\nB=\"x\ny\"\n";
    let from_iter: Vec<_> = Lexer::new(input).iter().collect();
    let tokenized = Lexer::new(input).tokenize();
    assert_eq!(from_iter, tokenized);
}

// =========================================================================
// BYTE INPUT
// =========================================================================

#[test]
fn test_from_bytes() {
    let doc = EnvEdit::from_bytes(b"KEY=value\n").parse().unwrap();
    assert_eq!(doc.get("KEY"), Some("value"));
}

#[test]
fn test_invalid_utf8_is_malformed_input() {
    let err = EnvEdit::from_bytes(b"KEY=\xff\n").parse().unwrap_err();
    match err {
        Error::MalformedInput { offset, .. } => assert_eq!(offset, 4),
        other => panic!("unexpected error: {:?}", other),
    }
}
