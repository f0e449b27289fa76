//! Entity spans: extraction from detector output and alignment to tokens.
//!
//! Detectors mark entities inline, e.g.
//! `<START:person> John Smith <END> works in <START:location> Boston <END> .`
//! [extract_spans] collects the marked word runs in order, [align_spans] maps
//! each run onto the original tokens by leftmost exact match, continuing after
//! the previous span.

use crate::bracket::flat::strip_diagnostics;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::{debug, warn};

static ENTITY_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<START:([^>]*)>(.*?)<END>").expect("Valid entity markup regex")
});

/// An entity as marked by a detector, not yet aligned to tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSpan {
    /// Entity type as emitted, e.g. `person`
    pub entity_type: String,
    /// Words inside the markup, split at whitespace
    pub words: Vec<String>,
}

/// An entity aligned to a contiguous run of the original tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    /// Entity type as emitted, e.g. `person`
    pub entity_type: String,
    /// Indices into the original token sequence
    pub tokens: Range<usize>,
}

impl EntitySpan {
    /// Returns the label of the node wrapping this entity: the upper-cased type.
    pub fn label(&self) -> String {
        self.entity_type.to_uppercase()
    }

    /// Returns the number of tokens covered.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns whether no token is covered.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Extracts all marked entities from raw detector output, in order.
///
/// Spans without words or with a type that cannot serve as a label are skipped.
///
/// # Example
/// ```
/// use chunktree::entity::extract_spans;
///
/// let spans = extract_spans("<START:person> John Smith <END> works in <START:location> Boston <END> .");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].entity_type, "person");
/// assert_eq!(spans[0].words, vec!["John", "Smith"]);
/// assert_eq!(spans[1].words, vec!["Boston"]);
/// ```
pub fn extract_spans(raw: &str) -> Vec<DetectedSpan> {
    let text = strip_diagnostics(raw);

    ENTITY_MARKUP
        .captures_iter(&text)
        .filter_map(|caps| {
            let entity_type = caps[1].trim();
            let words: Vec<String> = caps[2].split_whitespace().map(str::to_string).collect();

            if words.is_empty() {
                debug!(entity_type, "skipping entity without words");
                return None;
            }
            if entity_type.is_empty() || entity_type.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
                warn!(entity_type, "skipping entity with unusable type");
                return None;
            }

            Some(DetectedSpan { entity_type: entity_type.to_string(), words })
        })
        .collect()
}

/// Aligns detected spans to the original token sequence.
///
/// Each span is matched at its leftmost exact occurrence at or after the end
/// of the previously aligned span; failing that, at its leftmost occurrence
/// anywhere. Spans whose words do not occur as a contiguous run of tokens
/// (e.g. because the detector tokenized differently) are skipped with a warning.
///
/// # Example
/// ```
/// use chunktree::entity::{align_spans, extract_spans};
///
/// let tokens = ["Paris", "is", "not", "Paris", "Hilton"];
/// let detected = extract_spans("<START:location> Paris <END> is not <START:person> Paris Hilton <END>");
/// let spans = align_spans(&detected, &tokens);
/// assert_eq!(spans[0].tokens, 0..1);
/// assert_eq!(spans[1].tokens, 3..5);
/// ```
pub fn align_spans<S: AsRef<str>>(detected: &[DetectedSpan], tokens: &[S]) -> Vec<EntitySpan> {
    let mut aligned = Vec::with_capacity(detected.len());
    let mut cursor = 0;

    for span in detected {
        let start = find_run(tokens, &span.words, cursor).or_else(|| find_run(tokens, &span.words, 0));

        match start {
            Some(start) => {
                let end = start + span.words.len();
                aligned.push(EntitySpan { entity_type: span.entity_type.clone(), tokens: start..end });
                cursor = end;
            }
            None => warn!(
                entity_type = %span.entity_type,
                words = ?span.words,
                "entity words do not occur in token sequence, skipping"
            ),
        }
    }

    aligned
}

/// Returns the first index `i >= from` such that `tokens[i..]` starts with `words`.
pub(crate) fn find_run<S: AsRef<str>, W: AsRef<str>>(tokens: &[S], words: &[W], from: usize) -> Option<usize> {
    if words.is_empty() || words.len() > tokens.len() {
        return None;
    }

    (from..=tokens.len() - words.len()).find(|&i| {
        tokens[i..i + words.len()]
            .iter()
            .zip(words)
            .all(|(token, word)| token.as_ref() == word.as_ref())
    })
}
