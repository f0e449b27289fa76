//! Constants for the flat engine format and the bracket notation.

/// Opening delimiter of a bracket group.
pub(crate) const OPEN: u8 = b'(';

/// Closing delimiter of a bracket group.
pub(crate) const CLOSE: u8 = b')';

/// Bytes ending an atom (label or word) besides whitespace.
pub(crate) const DELIMITERS: &[u8] = b"()";

/// Separator between surface and tag in engine output (`John_NNP`).
pub const PAIR_SEPARATOR: char = '_';

/// Chunk opener in engine output (`[NP`).
pub(crate) const NATIVE_OPEN: char = '[';

/// Chunk closer in engine output (`]`).
pub(crate) const NATIVE_CLOSE: &str = "]";

/// Number of unconditional passes of the pair rewrite.
///
/// Each pass consumes the whitespace after a rewritten pair, so a pass skips
/// every pair directly following a rewritten one; the second pass picks those up.
pub const PAIR_PASSES: usize = 2;

/// Deepest group nesting accepted by the reader, root group included.
///
/// Chunkers nest one level below the root; entity merging adds a few more.
pub const MAX_DEPTH: usize = 256;

/// Default guess for number of leaves, when unknown
pub(crate) const DEFAULT_NUM_LEAVES_GUESS: usize = 16;

/// Extra buffer in serialization length estimate
pub(crate) const BUFFER_CHARS: usize = 8;
