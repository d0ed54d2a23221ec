use envedit::format;
use pretty_assertions::assert_eq;

fn assert_format(input: &str, expected: &str) {
    let formatted = format(input);
    assert_eq!(formatted, expected);
    assert_eq!(format(&formatted), formatted, "formatting must be idempotent");
}

// =========================================================================
// DEDUPLICATION
// =========================================================================

#[test]
fn test_dedup_carries_comments_forward() {
    assert_format(
        "BAR=keep\n# comment before first\nFOO=old\n# comment before final\nFOO=new\n",
        "BAR=keep\n\n# comment before first\n# comment before final\nFOO=new\n",
    );
}

#[test]
fn test_dedup_keeps_last() {
    assert_format("A=1\nA=2\nA=3\n", "A=3\n");
}

#[test]
fn test_dedup_keeps_position_of_last() {
    assert_format("A=1\nB=2\nA=3\n", "B=2\nA=3\n");
}

#[test]
fn test_dedup_comment_moves_to_survivor() {
    assert_format("# first\nA=1\nB=2\nA=3\n", "B=2\n\n# first\nA=3\n");
}

#[test]
fn test_dedup_allows_repeated_comment_text() {
    assert_format("# same\nA=1\n# same\nA=2\n", "# same\n# same\nA=2\n");
}

#[test]
fn test_dedup_removes_blank_gap_of_dropped() {
    assert_format("A=1\nFOO=old\nB=2\nFOO=new\n", "A=1\nB=2\nFOO=new\n");
}

// =========================================================================
// BLANK LINES
// =========================================================================

#[test]
fn test_collapses_and_strips_blanks() {
    assert_format("\n\n# header\n\n\n\nA=1\n\n\n", "# header\n\nA=1\n");
}

#[test]
fn test_plain_assignments_stay_adjacent() {
    assert_format("A=1\nB=2\nC=3\n", "A=1\nB=2\nC=3\n");
}

#[test]
fn test_commented_assignment_gets_blank_before() {
    assert_format("A=1\n# about B\nB=2\nC=3\n", "A=1\n\n# about B\nB=2\nC=3\n");
}

#[test]
fn test_section_gets_blank_after() {
    assert_format("# section\nnot valid\nA=1\n", "# section\n\nnot valid\nA=1\n");
}

#[test]
fn test_trailing_section() {
    assert_format("A=1\n# trailing\n", "A=1\n\n# trailing\n");
}

#[test]
fn test_existing_single_blank_kept() {
    assert_format("A=1\n\nB=2\n", "A=1\n\nB=2\n");
}

#[test]
fn test_empty_and_blank_only() {
    assert_format("", "");
    assert_format("\n\n  \n", "");
}

// =========================================================================
// RE-QUOTING & NORMALIZATION
// =========================================================================

#[test]
fn test_requotes_values() {
    assert_format(
        "A='single'\nB=\"needs space\"\nC='it s'\nD=\"plain\"\n",
        "A=single\nB=\"needs space\"\nC=\"it s\"\nD=plain\n",
    );
}

#[test]
fn test_normalizes_assignment_layout() {
    assert_format(
        "  export   KEY  =  value   #  comment  \n",
        "export KEY=value #  comment\n",
    );
}

#[test]
fn test_multiline_value_becomes_escaped() {
    assert_format("M=\"a\nb\"\n", "M=\"a\\nb\"\n");
}

#[test]
fn test_trims_comment_lines() {
    assert_format("   # indented   \nA=1\n", "# indented\nA=1\n");
}

#[test]
fn test_unknown_is_verbatim() {
    assert_format("  weird   stuff  \nA=1\n", "  weird   stuff  \nA=1\n");
}

#[test]
fn test_crlf_input() {
    assert_format("A=1\r\n\r\n# c\r\nB=2\r\n", "A=1\n\n# c\nB=2\n");
}

#[test]
fn test_stray_carriage_returns() {
    assert_format("\r\r", "");
    assert_format("\r\n", "");
    assert_format("X=1\nfoo\r", "X=1\nfoo\n");
    assert_format("X=1\n  \r", "X=1\n");
    assert_format("A='x\r\r\ny", "A='x\ny\n");
    assert_format("A=1\r", "A=\"1\\r\"\n");
}

#[test]
fn test_adds_trailing_newline() {
    assert_format("A=1", "A=1\n");
}

#[test]
fn test_idempotent_on_messy_input() {
    let inputs = [
        "\n# a\n\n\n# b\nX=1\n  # c\n\nX=2 # inline\nfor x in y\n\n# tail\n",
        "A='x\nB=2\n",
        "export A=\"a\\\"b\"\n# s1\n# s2\n\n\nB=   spaced out   \n",
        "K=\"a b\"junk\n#c\nL=1\n",
    ];
    for input in inputs {
        let once = format(input);
        assert_eq!(format(&once), once, "input: {:?}", input);
    }
}
