use chunktree::config::ChunkTreeConfig;
use chunktree::entity::{EntitySpan, MergeOutcome, align_spans, extract_spans, merge_detector_output, merge_spans};
use chunktree::error::ErrorKind;
use chunktree::model::{ParseTree, Token};
use chunktree::ChunkTreeParser;

const TOKENS: &[&str] = &["John", "Smith", "works", "in", "Boston", "."];
const CHUNKS: &str = "[NP John_NNP Smith_NNP ] [VP works_VBZ ] [PP in_IN ] [NP Boston_NNP ] ._.";

fn tokens() -> Vec<Token> {
    ["NNP", "NNP", "VBZ", "IN", "NNP", "."]
        .iter()
        .zip(TOKENS)
        .map(|(tag, surface)| Token::new(*surface, *tag))
        .collect()
}

fn sentence_tree(parser: &ChunkTreeParser) -> ParseTree {
    parser.build_tree(&tokens(), CHUNKS).unwrap()
}

/// Surfaces below the single node labeled `label`.
fn words_labeled(tree: &ParseTree, label: &str) -> Vec<String> {
    let nodes = tree.branches_labeled(label);
    assert_eq!(nodes.len(), 1, "expected one {label} node in {tree}");
    tree.leaves_under(nodes[0]).iter().map(|t| t.surface().to_string()).collect()
}

// --- TESTS EXTRACTION AND ALIGNMENT ---
#[test]
fn test_extract_skips_unusable_spans() {
    let spans = extract_spans(
        "<START:person> <END> <START:> x <END> <START:per son> y <END> <START:place> z <END>\nExecution time: 0.1 seconds",
    );
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].entity_type, "place");
    assert_eq!(spans[0].words, vec!["z"]);
}

#[test]
fn test_extract_keeps_sentence_starting_like_diagnostics() {
    let spans = extract_spans("Execution time: <START:person> Bob <END> left");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].words, vec!["Bob"]);

    let spans = extract_spans("<START:person> Bob <END> left\nExecution time: <START:person> Eve <END>");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].words, vec!["Bob"]);
}

#[test]
fn test_align_follows_detector_order() {
    let tokens = ["a", "b", "a", "b"];
    let detected = extract_spans("<START:x> a b <END> <START:y> a b <END> <START:z> c <END>");
    let spans = align_spans(&detected, &tokens);

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].tokens, 0..2);
    assert_eq!(spans[1].tokens, 2..4);
}

// --- TESTS MERGING ---
#[test]
fn test_entity_wrapping() {
    let parser = ChunkTreeParser::default();
    let detectors = ["<START:person> John Smith <END> works in <START:location> Boston <END> ."];
    let tree = parser.merge_entities(sentence_tree(&parser), TOKENS, &detectors).unwrap();

    assert_eq!(words_labeled(&tree, "PERSON"), vec!["John", "Smith"]);
    assert_eq!(words_labeled(&tree, "LOCATION"), vec!["Boston"]);
    assert_eq!(tree.surfaces(), TOKENS);
    assert_eq!(
        tree.to_string(),
        "(S (PERSON (NNP John) (NNP Smith)) (VP (VBZ works)) (PP (IN in)) (LOCATION (NNP Boston)) (. .))"
    );
}

#[test]
fn test_wrapper_promotion() {
    let parser = ChunkTreeParser::default();
    let mut tree = sentence_tree(&parser);
    let spans = [EntitySpan { entity_type: "location".to_string(), tokens: 4..5 }];

    let outcomes = merge_spans(&mut tree, &spans, parser.config());
    let MergeOutcome::Wrapped(location) = outcomes[0] else {
        panic!("span was not wrapped: {:?}", outcomes[0]);
    };

    // The NP wrapper is gone, the entity node sits directly below the root
    assert_eq!(tree.label(location), Some("LOCATION"));
    assert_eq!(tree.parent(location), Some(tree.root_index()));
    assert_eq!(tree.branches_labeled("NP").len(), 1);
}

#[test]
fn test_no_promotion_of_partial_wrapper() {
    let parser = ChunkTreeParser::default();
    let tree = parser
        .merge_entities(sentence_tree(&parser), TOKENS, &["John <START:person> Smith <END> works in Boston ."])
        .unwrap();

    assert_eq!(
        tree.to_string(),
        "(S (NP (NNP John) (PERSON (NNP Smith))) (VP (VBZ works)) (PP (IN in)) (NP (NNP Boston)) (. .))"
    );
}

#[test]
fn test_no_promotion_without_promotable_labels() {
    let parser = ChunkTreeParser::new(ChunkTreeConfig::new().with_promotable_labels(Vec::<String>::new()));
    let tree = parser
        .merge_entities(sentence_tree(&parser), TOKENS, &["John Smith works in <START:location> Boston <END> ."])
        .unwrap();

    assert_eq!(
        tree.to_string(),
        "(S (NP (NNP John) (NNP Smith)) (VP (VBZ works)) (PP (IN in)) (NP (LOCATION (NNP Boston))) (. .))"
    );
}

#[test]
fn test_unaligned_span_skipped() {
    let parser = ChunkTreeParser::default();
    let before = sentence_tree(&parser);
    let after = parser
        .merge_entities(before.clone(), TOKENS, &["<START:person> Jon Smith <END> works in Boston ."])
        .unwrap();

    assert_eq!(after, before);
}

#[test]
fn test_tokens_must_match_tree() {
    let parser = ChunkTreeParser::default();
    let mut tree = sentence_tree(&parser);
    let err = merge_detector_output(&mut tree, &["John", "Smith"], "", parser.config()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
}

// --- TESTS MULTIPLE DETECTORS ---
#[test]
fn test_later_detector_wraps_around_earlier_entity() {
    let parser = ChunkTreeParser::default();
    let tokens = [Token::new("Bank", "NNP"), Token::new("of", "IN"), Token::new("America", "NNP")];
    let surfaces = ["Bank", "of", "America"];
    let tree = parser.build_tree(&tokens, "[NP Bank_NNP ] [PP of_IN ] [NP America_NNP ]").unwrap();

    let tree = parser
        .merge_entities(
            tree,
            &surfaces,
            &["Bank of <START:location> America <END>", "<START:organization> Bank of America <END>"],
        )
        .unwrap();

    assert_eq!(
        tree.to_string(),
        "(S (ORGANIZATION (NP (NNP Bank)) (PP (IN of)) (LOCATION (NNP America))))"
    );
}

#[test]
fn test_sequencing_is_associative() {
    let parser = ChunkTreeParser::default();
    let first = "<START:person> John Smith <END> works in Boston .";
    let second = "<START:name> John <END> Smith works in <START:location> Boston <END> .";

    let together = parser.merge_entities(sentence_tree(&parser), TOKENS, &[first, second]).unwrap();

    let step = parser.merge_entities(sentence_tree(&parser), TOKENS, &[first]).unwrap();
    let step = parser.reparse(&step.to_string()).unwrap();
    let separately = parser.merge_entities(step, TOKENS, &[second]).unwrap();

    assert_eq!(together, separately);
    assert_eq!(together.to_string(), separately.to_string());
    assert_eq!(together.surfaces(), TOKENS);
}

#[test]
fn test_same_entity_from_two_detectors_added_once() {
    let parser = ChunkTreeParser::default();
    let output = "<START:person> John Smith <END> works in Boston .";
    let tree = parser.merge_entities(sentence_tree(&parser), TOKENS, &[output, output]).unwrap();

    assert_eq!(tree.branches_labeled("PERSON").len(), 1);
}
