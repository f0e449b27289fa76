//! Reader for bracket notation, e.g. `(S (NP (NNP John)) (. .))`.
//!
//! Grammar:
//! * `group ::= '(' label ( word ')' | group* ')' )`
//! * `label`, `word` are atoms: no whitespace, no parentheses
//!
//! A group with a label and a single word is a leaf, its label being the tag.
//! Any other group is a branch; branches without children are accepted (and
//! later pruned by normalization). Groups nested deeper than
//! [MAX_DEPTH](crate::bracket::MAX_DEPTH) are rejected, so every tree read here
//! can be walked recursively. Words and labels are decoded with the
//! [codec](crate::parser::codec) exactly once, here.

use crate::bracket::defs::{CLOSE, DEFAULT_NUM_LEAVES_GUESS, DELIMITERS, MAX_DEPTH, OPEN};
use crate::error::ChunkTreeError;
use crate::model::{NodeIndex, ParseTree, Token};
use crate::parser::byte_parser::ByteParser;
use crate::parser::codec::decode;

// =#========================================================================#=
// BRACKET PARSER
// =#========================================================================#=
/// Parser turning bracket notation into a [ParseTree].
///
/// # Example
/// ```
/// use chunktree::bracket::BracketParser;
/// use chunktree::parser::byte_parser::ByteParser;
///
/// let mut input = ByteParser::for_str("(S (NP (NNP John)) (VP (VBZ works)))");
/// let tree = BracketParser::new().with_num_leaves(2).parse(&mut input)?;
/// assert_eq!(tree.surfaces(), vec!["John", "works"]);
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BracketParser {
    num_leaves_guess: usize,
}

impl BracketParser {
    /// Creates a parser with default settings.
    pub fn new() -> Self {
        Self { num_leaves_guess: DEFAULT_NUM_LEAVES_GUESS }
    }

    /// Sets the expected number of leaves, used to size the arena.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves_guess = num_leaves;
        self
    }

    /// Parses exactly one bracket group spanning the whole remaining input.
    ///
    /// # Errors
    /// Returns [MalformedEngineOutput](crate::error::ErrorKind::MalformedEngineOutput)
    /// if the input is empty, brackets are unbalanced, a group has no label,
    /// a bare word appears among groups, groups nest deeper than
    /// [MAX_DEPTH](crate::bracket::MAX_DEPTH), or text follows the root group.
    /// No partial tree is returned.
    pub fn parse(&self, parser: &mut ByteParser) -> Result<ParseTree, ChunkTreeError> {
        parser.skip_whitespace();
        if parser.is_eof() {
            return Err(ChunkTreeError::malformed_at(parser, "no bracket group found"));
        }

        let mut tree = ParseTree::with_capacity(2 * self.num_leaves_guess + 1);
        let root = self.parse_group(parser, &mut tree, 1)?;
        tree.set_root(root);

        parser.skip_whitespace();
        if !parser.is_eof() {
            return Err(ChunkTreeError::malformed_at(parser, "text after closing root group"));
        }

        Ok(tree)
    }

    /// Parses one group at nesting level `depth` (the root group is at level 1).
    fn parse_group(&self, parser: &mut ByteParser, tree: &mut ParseTree, depth: usize) -> Result<NodeIndex, ChunkTreeError> {
        if !parser.peek_is(OPEN) {
            return Err(ChunkTreeError::malformed_at(parser, "expected '('"));
        }
        if depth > MAX_DEPTH {
            return Err(ChunkTreeError::malformed_at(parser, "nesting too deep"));
        }
        parser.next();

        parser.skip_whitespace();
        let label = parser.parse_atom(DELIMITERS);
        if label.is_empty() {
            return Err(ChunkTreeError::malformed_at(parser, "group without label"));
        }
        let label = decode(label).into_owned();

        parser.skip_whitespace();
        match parser.peek() {
            None => Err(unbalanced(parser)),
            Some(OPEN) | Some(CLOSE) => {
                let children = self.parse_children(parser, tree, depth)?;
                Ok(tree.add_branch(Some(label), children))
            }
            Some(_) => self.parse_leaf(parser, tree, label),
        }
    }

    /// Parses groups up to and including the closing bracket of the parent.
    fn parse_children(
        &self,
        parser: &mut ByteParser,
        tree: &mut ParseTree,
        depth: usize,
    ) -> Result<Vec<NodeIndex>, ChunkTreeError> {
        let mut children = Vec::new();

        loop {
            parser.skip_whitespace();
            match parser.peek() {
                Some(OPEN) => children.push(self.parse_group(parser, tree, depth + 1)?),
                Some(CLOSE) => {
                    parser.next();
                    return Ok(children);
                }
                None => return Err(unbalanced(parser)),
                Some(_) => {
                    return Err(ChunkTreeError::malformed_at(parser, "bare word between groups"));
                }
            }
        }
    }

    fn parse_leaf(&self, parser: &mut ByteParser, tree: &mut ParseTree, tag: String) -> Result<NodeIndex, ChunkTreeError> {
        let word = decode(parser.parse_atom(DELIMITERS)).into_owned();

        parser.skip_whitespace();
        if parser.consume_if(CLOSE) {
            Ok(tree.add_leaf(Token::new(word, tag)))
        } else if parser.is_eof() {
            Err(unbalanced(parser))
        } else {
            Err(ChunkTreeError::malformed_at(parser, "expected ')' after word"))
        }
    }
}

impl Default for BracketParser {
    fn default() -> Self {
        Self::new()
    }
}

fn unbalanced(parser: &ByteParser) -> ChunkTreeError {
    ChunkTreeError::malformed_at(parser, "unbalanced brackets, missing ')'")
}
