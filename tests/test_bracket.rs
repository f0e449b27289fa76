use chunktree::bracket::flat::to_bracketed_text;
use chunktree::bracket::{BracketParser, MAX_DEPTH, parse_flat, parse_str, to_bracketed};
use chunktree::{ChunkTreeParser, Token};
use chunktree::error::ErrorKind;
use chunktree::parser::ByteParser;

// --- TESTS FLAT OUTPUT PARSING ---
#[test]
fn test_flat_output_to_preliminary_tree() {
    let raw = "[NP Pierre_NNP Vinken_NNP ] ,_, [ADJP 61_CD years_NNS old_JJ ] ,_, [VP will_MD join_VB ] \
               [NP the_DT board_NN ] ._.";
    let tree = parse_flat(raw, "S").unwrap();

    assert!(tree.is_valid());
    assert_eq!(
        tree.surfaces(),
        vec!["Pierre", "Vinken", ",", "61", "years", "old", ",", "will", "join", "the", "board", "."]
    );
    assert_eq!(
        tree.to_string(),
        "(S (NP (NNP Pierre) (NNP Vinken)) (, ,) (ADJP (CD 61) (NNS years) (JJ old)) (, ,) \
         (VP (MD will) (VB join)) (NP (DT the) (NN board)) (. .))"
    );
}

#[test]
fn test_flat_output_with_trailing_diagnostics() {
    let raw = "[NP It_PRP ] [VP works_VBZ ] ._.\nExecution time: 0.012 seconds\n";
    let tree = parse_flat(raw, "S").unwrap();
    assert_eq!(tree.to_string(), "(S (NP (PRP It)) (VP (VBZ works)) (. .))");
}

#[test]
fn test_flat_output_with_literal_parentheses() {
    let raw = "[NP the_DT smiley_NN ] (_-LRB- :-)_SYM )_-RRB-";
    let tree = parse_flat(raw, "S").unwrap();

    assert_eq!(tree.surfaces(), vec!["the", "smiley", "(", ":-)", ")"]);
    let tags: Vec<&str> = tree.leaves().map(|t| t.tag()).collect();
    assert_eq!(tags, vec!["DT", "NN", "-LRB-", "SYM", "-RRB-"]);

    // Serialization keeps them encoded, so reading it back yields the same tree
    let text = tree.to_string();
    assert_eq!(text, "(S (NP (DT the) (NN smiley)) (-LRB- %LRB%) (SYM :-%RRB%) (-RRB- %RRB%))");
    assert_eq!(parse_str(&text).unwrap(), tree);
}

#[test]
fn test_flat_output_root_label() {
    let text = to_bracketed_text("[NP it_PRP ]", "ROOT", false).unwrap();
    assert!(text.starts_with("(ROOT "));
}

#[test]
fn test_flat_output_unmatched_opening_rejected() {
    let err = parse_flat("[NP John_NNP Smith_NNP [VP works_VBZ ]", "S").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
}

#[test]
fn test_flat_output_unmatched_closing_rejected() {
    let err = parse_flat("[NP John_NNP ] ] works_VBZ", "S").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
}

#[test]
fn test_flat_output_missing_label_rejected() {
    let err = parse_flat("[ John_NNP ]", "S").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
    assert!(err.to_string().contains("group without label"));
}

#[test]
fn test_flat_output_untagged_word_rejected() {
    let err = parse_flat("[NP John_NNP ] works", "S").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
}

/// Chunker output with `depth` chunks nested around a single word.
fn nested_chunks(depth: usize) -> String {
    format!("{}a_DT {}", "[NP ".repeat(depth), "] ".repeat(depth))
}

#[test]
fn test_flat_output_nested_within_limit() {
    // Root and leaf groups take two of the levels
    let tree = parse_flat(&nested_chunks(MAX_DEPTH - 2), "S").unwrap();
    assert_eq!(tree.surfaces(), vec!["a"]);
    assert_eq!(tree.num_branches(), MAX_DEPTH - 1);
}

#[test]
fn test_flat_output_nested_too_deep_rejected() {
    let tokens = [Token::new("a", "DT")];
    let parser = ChunkTreeParser::default();

    for depth in [MAX_DEPTH - 1, 2000, 30_000] {
        let err = parser.build_tree(&tokens, &nested_chunks(depth)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)), "depth {depth}");
        assert!(err.to_string().contains("nesting too deep"), "depth {depth}");
    }
}

// --- TESTS BRACKET PARSING AND WRITING ---
#[test]
fn test_bracket_parser_structure() {
    let mut input = ByteParser::for_str("(S\n  (NP (DT the) (NN dog))\n  (VP (VBZ barks)))");
    let tree = BracketParser::new().with_num_leaves(3).parse(&mut input).unwrap();

    assert!(tree.is_valid());
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_branches(), 3);

    let root = tree.root();
    assert_eq!(root.label(), Some("S"));
    let (np, vp) = (root.children()[0], root.children()[1]);
    assert_eq!(tree.label(np), Some("NP"));
    assert_eq!(tree.label(vp), Some("VP"));
    assert_eq!(tree.parent(np), Some(tree.root_index()));

    let dog = tree.children(np)[1];
    assert!(tree.node(dog).is_leaf());
    assert_eq!(tree.node(dog).token().unwrap().surface(), "dog");
    assert_eq!(tree.node(dog).token().unwrap().tag(), "NN");
    assert_eq!(tree.parent(dog), Some(np));
}

#[test]
fn test_error_reports_position() {
    let err = parse_str("(S (NP (NN dog)) stray)").unwrap_err();
    assert_eq!(err.position(), Some(17));
    assert!(err.to_string().contains("Context"));
}

#[test]
fn test_writer_is_canonical() {
    let tree = parse_str("  (S   (NP (NN dog) )\t(VP (VBZ barks)) )  ").unwrap();
    assert_eq!(to_bracketed(&tree), "(S (NP (NN dog)) (VP (VBZ barks)))");
}
