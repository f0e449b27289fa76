//! Sentence-level driver: build, normalize, merge entities, post-process.
//!
//! [ChunkTreeParser] is the core API working on engine output that has
//! already been obtained. [EnginePipeline] additionally calls the engines
//! through [TextEngine] for each sentence.

use crate::bracket::BracketParser;
use crate::bracket::flat;
use crate::config::ChunkTreeConfig;
use crate::engine::{TextEngine, plain_input, tagged_input};
use crate::entity;
use crate::error::{ChunkTreeError, ErrorKind};
use crate::model::{ParseTree, Token};
use crate::normalize::normalize;
use crate::parser::byte_parser::ByteParser;
use crate::punctuation::collapse_punctuation_tags;
use tracing::debug;

// =#========================================================================#=
// CHUNK TREE PARSER
// =#========================================================================#=
/// Builds trees from chunker output and merges entity detector output into them.
///
/// Holds only its configuration; every call builds a fresh tree, so one
/// parser can serve any number of sentences, also from several threads.
///
/// # Example
/// ```
/// use chunktree::{ChunkTreeConfig, ChunkTreeParser, Token};
///
/// let tokens = vec![
///     Token::new("John", "NNP"),
///     Token::new("Smith", "NNP"),
///     Token::new("works", "VBZ"),
///     Token::new(",", ","),
/// ];
/// let parser = ChunkTreeParser::new(ChunkTreeConfig::default().with_punctuation_tags(true));
/// let tree = parser.parse(
///     &tokens,
///     "[NP John_NNP Smith_NNP ] [VP works_VBZ ] ,_,",
///     &["<START:person> John Smith <END> works ,"],
/// )?;
/// assert_eq!(tree.to_string(), "(S (PERSON (NNP John) (NNP Smith)) (VP (VBZ works)) (PUNC ,))");
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChunkTreeParser {
    config: ChunkTreeConfig,
}

impl ChunkTreeParser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ChunkTreeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChunkTreeConfig {
        &self.config
    }

    /// Builds the normalized tree of one sentence from raw chunker output.
    ///
    /// # Arguments
    /// * `tokens` - The tagged tokens the chunker was run on
    /// * `chunk_output` - The chunker's raw output for these tokens
    ///
    /// # Errors
    /// * `MalformedEngineOutput` - if the output cannot be bracket-parsed or
    ///   its words differ from `tokens`
    /// * `EncodingCollision` - if collision checks are enabled and triggered
    /// * `NormalizationDivergence` - see [normalize]
    pub fn build_tree(&self, tokens: &[Token], chunk_output: &str) -> Result<ParseTree, ChunkTreeError> {
        let text = flat::to_bracketed_text(
            chunk_output,
            &self.config.root_label,
            self.config.reject_marker_collisions,
        )?;

        let mut byte_parser = ByteParser::for_str(&text);
        let tree = BracketParser::new().with_num_leaves(tokens.len()).parse(&mut byte_parser)?;
        check_surfaces(&tree, tokens.iter().map(Token::surface))?;
        debug!(leaves = tokens.len(), nodes = tree.num_nodes(), "parsed chunker output");

        normalize(&tree, &self.config)
    }

    /// Reads a tree in bracket notation and normalizes it.
    pub fn reparse(&self, bracketed: &str) -> Result<ParseTree, ChunkTreeError> {
        let tree = crate::bracket::parse_str(bracketed)?;
        normalize(&tree, &self.config)
    }

    /// Merges the output of each entity detector into the tree, in order.
    ///
    /// After each detector, the tree is serialized, read back and normalized,
    /// so the next detector works on exactly what a fresh call would see.
    ///
    /// # Arguments
    /// * `tree` - A normalized tree whose leaves spell `tokens`
    /// * `tokens` - Surfaces of the original tokens
    /// * `detector_outputs` - Raw output of each detector
    ///
    /// # Errors
    /// Returns `MalformedEngineOutput` if the leaves of `tree` do not spell `tokens`.
    pub fn merge_entities<S, D>(
        &self,
        mut tree: ParseTree,
        tokens: &[S],
        detector_outputs: &[D],
    ) -> Result<ParseTree, ChunkTreeError>
    where
        S: AsRef<str>,
        D: AsRef<str>,
    {
        for (detector, output) in detector_outputs.iter().enumerate() {
            let wrapped = entity::merge_detector_output(&mut tree, tokens, output.as_ref(), &self.config)?;
            debug!(detector, wrapped, "merged entity detector output");
            tree = self.reparse(&tree.to_string())?;
        }

        Ok(tree)
    }

    /// Applies final post-processing (punctuation tags, if enabled).
    pub fn finish(&self, mut tree: ParseTree) -> ParseTree {
        if self.config.punctuation_tag_enabled {
            let retagged = collapse_punctuation_tags(&mut tree);
            debug!(retagged, "collapsed punctuation tags");
        }

        tree
    }

    /// Runs the whole sentence pipeline on already obtained engine output:
    /// [build_tree](Self::build_tree), [merge_entities](Self::merge_entities),
    /// [finish](Self::finish).
    pub fn parse<D: AsRef<str>>(
        &self,
        tokens: &[Token],
        chunk_output: &str,
        detector_outputs: &[D],
    ) -> Result<ParseTree, ChunkTreeError> {
        let tree = self.build_tree(tokens, chunk_output)?;
        let surfaces: Vec<&str> = tokens.iter().map(Token::surface).collect();
        let tree = self.merge_entities(tree, &surfaces, detector_outputs)?;
        Ok(self.finish(tree))
    }
}

/// Fails unless the leaves of `tree` spell exactly `expected`.
fn check_surfaces<'a>(tree: &ParseTree, expected: impl ExactSizeIterator<Item = &'a str>) -> Result<(), ChunkTreeError> {
    let surfaces = tree.surfaces();
    if surfaces.len() != expected.len() {
        return Err(ChunkTreeError::malformed(format!(
            "chunker output has {} words, expected {}",
            surfaces.len(),
            expected.len()
        )));
    }

    for (position, (found, wanted)) in surfaces.iter().zip(expected).enumerate() {
        if *found != wanted {
            return Err(ChunkTreeError::malformed(format!(
                "word {position} is {found:?} in chunker output, expected {wanted:?}"
            )));
        }
    }

    Ok(())
}

// =#========================================================================#=
// ENGINE PIPELINE
// =#========================================================================#=
/// Drives a chunker and any number of entity detectors for each sentence.
///
/// # Example
/// ```
/// use chunktree::{ChunkTreeParser, EnginePipeline, Token};
/// use chunktree::error::ChunkTreeError;
///
/// let chunker = |_: &str| Ok::<_, ChunkTreeError>("[NP Boston_NNP ] [VP grows_VBZ ]".to_string());
/// let places = |_: &str| Ok::<_, ChunkTreeError>("<START:location> Boston <END> grows".to_string());
///
/// let pipeline = EnginePipeline::new(ChunkTreeParser::default(), chunker).with_detector(places);
/// let tree = pipeline.parse_sentence(&[Token::new("Boston", "NNP"), Token::new("grows", "VBZ")])?;
/// assert_eq!(tree.to_string(), "(S (LOCATION (NNP Boston)) (VP (VBZ grows)))");
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
pub struct EnginePipeline<C> {
    parser: ChunkTreeParser,
    chunker: C,
    detectors: Vec<Box<dyn TextEngine>>,
}

impl<C: TextEngine> EnginePipeline<C> {
    /// Creates a pipeline without entity detectors.
    pub fn new(parser: ChunkTreeParser, chunker: C) -> Self {
        Self { parser, chunker, detectors: Vec::new() }
    }

    /// Appends an entity detector; detectors run in the order added.
    pub fn with_detector<D: TextEngine + 'static>(mut self, detector: D) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Returns the number of entity detectors.
    pub fn num_detectors(&self) -> usize {
        self.detectors.len()
    }

    /// Invokes all engines for one sentence and builds its final tree.
    ///
    /// All detector outputs are collected before merging; any failing engine
    /// call fails the whole sentence.
    ///
    /// # Errors
    /// `EngineInvocationFailed` naming the failing stage, or any error of
    /// [ChunkTreeParser::parse].
    pub fn parse_sentence(&self, tokens: &[Token]) -> Result<ParseTree, ChunkTreeError> {
        let chunk_output = self
            .chunker
            .invoke(&tagged_input(tokens))
            .map_err(|e| engine_failure("chunker", e))?;

        let plain = plain_input(tokens);
        let detector_outputs = self
            .detectors
            .iter()
            .enumerate()
            .map(|(i, detector)| {
                detector
                    .invoke(&plain)
                    .map_err(|e| engine_failure(&format!("entity detector {i}"), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.parser.parse(tokens, &chunk_output, &detector_outputs)
    }
}

/// Turns any engine error into `EngineInvocationFailed`, prefixed with the stage.
fn engine_failure(stage: &str, err: ChunkTreeError) -> ChunkTreeError {
    match err.kind() {
        ErrorKind::EngineInvocationFailed(msg) => ChunkTreeError::engine_failed(format!("{stage}: {msg}")),
        _ => ChunkTreeError::engine_failed(format!("{stage}: {err}")),
    }
}
