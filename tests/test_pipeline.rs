use chunktree::engine::{parse_tagged_output, plain_input, tagged_input};
use chunktree::error::{ChunkTreeError, ErrorKind};
use chunktree::{ChunkTreeConfig, ChunkTreeParser, EnginePipeline, Token, parse_chunked};
use std::cell::RefCell;
use std::rc::Rc;

const NO_DETECTORS: &[&str] = &[];

fn tokens(tagged: &str) -> Vec<Token> {
    parse_tagged_output(tagged).unwrap()
}

// --- TESTS TREE CONSTRUCTION ---
#[test]
fn test_build_tree_from_tagger_and_chunker_output() {
    let tokens = tokens("Pierre_NNP Vinken_NNP will_MD join_VB the_DT board_NN ._.\nExecution time: 0.3 seconds");
    let parser = ChunkTreeParser::default();
    let tree = parser
        .build_tree(&tokens, "[NP Pierre_NNP Vinken_NNP ] [VP will_MD join_VB ] [NP the_DT board_NN ] ._.")
        .unwrap();

    assert_eq!(tree.surfaces(), vec!["Pierre", "Vinken", "will", "join", "the", "board", "."]);
    assert_eq!(tree.branches_labeled("NP").len(), 2);
    assert!(tree.is_valid());
}

#[test]
fn test_build_tree_rejects_other_words() {
    let parser = ChunkTreeParser::default();
    let tokens = tokens("John_NNP works_VBZ");

    let err = parser.build_tree(&tokens, "[NP John_NNP ] [VP walks_VBZ ]").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));

    let err = parser.build_tree(&tokens, "[NP John_NNP ]").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
}

#[test]
fn test_unmatched_opening_yields_no_tree() {
    let parser = ChunkTreeParser::default();
    let tokens = tokens("John_NNP works_VBZ");
    let err = parser.parse(&tokens, "[NP John_NNP [VP works_VBZ ]", NO_DETECTORS).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEngineOutput(_)));
}

#[test]
fn test_marker_collision_rejected_when_enabled() {
    let tokens = vec![Token::new("%LRB%", "SYM")];
    let chunks = "%LRB%_SYM";

    let lenient = ChunkTreeParser::default();
    assert!(lenient.build_tree(&tokens, chunks).is_err());

    let strict = ChunkTreeParser::new(ChunkTreeConfig::new().with_marker_collision_check(true));
    let err = strict.build_tree(&tokens, chunks).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::EncodingCollision(_)));
}

// --- TESTS PUNCTUATION ---
#[test]
fn test_punctuation_tags() {
    let tokens = tokens("Hello_UH ,_, world_NN !_.");
    let chunks = "[INTJ Hello_UH ] ,_, [NP world_NN ] !_.";

    let plain = parse_chunked(&tokens, chunks, NO_DETECTORS).unwrap();
    assert_eq!(plain.to_string(), "(S (INTJ (UH Hello)) (, ,) (NP (NN world)) (. !))");

    let parser = ChunkTreeParser::new(ChunkTreeConfig::new().with_punctuation_tags(true));
    let tagged = parser.parse(&tokens, chunks, NO_DETECTORS).unwrap();
    assert_eq!(tagged.to_string(), "(S (INTJ (UH Hello)) (PUNC ,) (NP (NN world)) (PUNC !))");
}

#[test]
fn test_punctuation_tagged_after_entities() {
    let tokens = tokens("Yahoo_NNP !_. rocks_VBZ");
    let parser = ChunkTreeParser::new(ChunkTreeConfig::new().with_punctuation_tags(true));
    let tree = parser
        .parse(&tokens, "[NP Yahoo_NNP !_. ] [VP rocks_VBZ ]", &["<START:organization> Yahoo ! <END> rocks"])
        .unwrap();

    assert_eq!(tree.to_string(), "(S (ORGANIZATION (NNP Yahoo) (PUNC !)) (VP (VBZ rocks)))");
}

#[test]
fn test_root_label_configuration() {
    let parser = ChunkTreeParser::new(ChunkTreeConfig::new().with_root_label("ROOT"));
    let tokens = tokens("It_PRP works_VBZ");
    let tree = parser.parse(&tokens, "[NP It_PRP ] [VP works_VBZ ]", NO_DETECTORS).unwrap();
    assert_eq!(tree.to_string(), "(ROOT (NP (PRP It)) (VP (VBZ works)))");
}

// --- TESTS ENGINE PIPELINE ---
#[test]
fn test_engine_inputs() {
    let tokens = tokens("John_NNP works_VBZ");
    assert_eq!(tagged_input(&tokens), "John_NNP works_VBZ");
    assert_eq!(plain_input(&tokens), "John works");
}

#[test]
fn test_pipeline_passes_inputs_and_merges() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let chunker_seen = Rc::clone(&seen);
    let chunker = move |input: &str| -> Result<String, ChunkTreeError> {
        chunker_seen.borrow_mut().push(input.to_string());
        Ok("[NP John_NNP Smith_NNP ] [VP works_VBZ ]".to_string())
    };
    let people_seen = Rc::clone(&seen);
    let people = move |input: &str| -> Result<String, ChunkTreeError> {
        people_seen.borrow_mut().push(input.to_string());
        Ok("<START:person> John Smith <END> works".to_string())
    };

    let pipeline = EnginePipeline::new(ChunkTreeParser::default(), chunker).with_detector(people);
    assert_eq!(pipeline.num_detectors(), 1);

    let tree = pipeline.parse_sentence(&tokens("John_NNP Smith_NNP works_VBZ")).unwrap();
    assert_eq!(tree.to_string(), "(S (PERSON (NNP John) (NNP Smith)) (VP (VBZ works)))");
    assert_eq!(*seen.borrow(), vec!["John_NNP Smith_NNP works_VBZ", "John Smith works"]);
}

#[test]
fn test_pipeline_chunker_failure() {
    let chunker = |_: &str| -> Result<String, ChunkTreeError> { Err(ChunkTreeError::engine_failed("exit status 1")) };
    let pipeline = EnginePipeline::new(ChunkTreeParser::default(), chunker);

    let err = pipeline.parse_sentence(&tokens("John_NNP")).unwrap_err();
    match err.kind() {
        ErrorKind::EngineInvocationFailed(msg) => assert_eq!(msg, "chunker: exit status 1"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_pipeline_any_detector_failure_fails_sentence() {
    let chunker = |_: &str| -> Result<String, ChunkTreeError> { Ok("[NP John_NNP ]".to_string()) };
    let people = |_: &str| -> Result<String, ChunkTreeError> { Ok("<START:person> John <END>".to_string()) };
    let broken = |_: &str| -> Result<String, ChunkTreeError> { Err(ChunkTreeError::malformed("no model")) };

    let pipeline = EnginePipeline::new(ChunkTreeParser::default(), chunker)
        .with_detector(people)
        .with_detector(broken);

    let err = pipeline.parse_sentence(&tokens("John_NNP")).unwrap_err();
    match err.kind() {
        ErrorKind::EngineInvocationFailed(msg) => assert!(msg.starts_with("entity detector 1: "), "{msg}"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_parser_reusable_across_sentences() {
    let parser = ChunkTreeParser::default();
    let first = parser.parse(&tokens("a_DT dog_NN"), "[NP a_DT dog_NN ]", NO_DETECTORS).unwrap();
    let second = parser.parse(&tokens("it_PRP runs_VBZ"), "[NP it_PRP ] [VP runs_VBZ ]", NO_DETECTORS).unwrap();
    let again = parser.parse(&tokens("a_DT dog_NN"), "[NP a_DT dog_NN ]", NO_DETECTORS).unwrap();

    assert_eq!(first, again);
    assert_ne!(first, second);
}
