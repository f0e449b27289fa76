//! Configuration of tree reconstruction.
//!
//! [ChunkTreeConfig] is built with `with_*` methods or loaded from TOML and is
//! immutable once handed to a [ChunkTreeParser](crate::ChunkTreeParser).
//!
//! ```toml
//! punctuation_tag_enabled = true
//! root_label = "ROOT"
//! root_label_set = ["ROOT", "S", "TOP"]
//! promotable_labels = ["NP"]
//! reject_marker_collisions = false
//! ```

use crate::error::ChunkTreeError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Label given to the root of every rebuilt tree by default.
pub const DEFAULT_ROOT_LABEL: &str = "S";

/// Labels denoting the whole sentence rather than a constituent.
pub const DEFAULT_ROOT_LABELS: &[&str] = &["ROOT", "S", "TOP"];

/// Labels of wrappers that become redundant once their sole content is an entity.
pub const DEFAULT_PROMOTABLE_LABELS: &[&str] = &["NP"];

// =#========================================================================#=
// CONFIG
// =#========================================================================#=
/// Options controlling normalization, entity merging and tag post-processing.
///
/// Sets are ordered, so nothing depends on hash iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkTreeConfig {
    /// Whether punctuation leaves get the tag `PUNC` after all merges.
    pub punctuation_tag_enabled: bool,

    /// Labels the normalizer never reassigns leaves to.
    pub root_label_set: BTreeSet<String>,

    /// Label of the root of every rebuilt tree; always treated as root-like.
    pub root_label: String,

    /// Wrapper labels an entity node replaces when it is their only child.
    pub promotable_labels: BTreeSet<String>,

    /// Whether raw output containing a codec marker is rejected.
    pub reject_marker_collisions: bool,
}

impl Default for ChunkTreeConfig {
    fn default() -> Self {
        Self {
            punctuation_tag_enabled: false,
            root_label_set: DEFAULT_ROOT_LABELS.iter().map(|s| s.to_string()).collect(),
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            promotable_labels: DEFAULT_PROMOTABLE_LABELS.iter().map(|s| s.to_string()).collect(),
            reject_marker_collisions: false,
        }
    }
}

impl ChunkTreeConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the `PUNC` rewrite.
    pub fn with_punctuation_tags(mut self, enabled: bool) -> Self {
        self.punctuation_tag_enabled = enabled;
        self
    }

    /// Replaces the set of root-like labels.
    pub fn with_root_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_label_set = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the label of the sentence root, e.g. `ROOT` instead of `S`.
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Replaces the set of promotable wrapper labels.
    pub fn with_promotable_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.promotable_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables rejection of raw output containing codec markers.
    pub fn with_marker_collision_check(mut self, enabled: bool) -> Self {
        self.reject_marker_collisions = enabled;
        self
    }

    /// Returns whether `label` denotes the sentence root.
    pub fn is_root_label(&self, label: &str) -> bool {
        label == self.root_label || self.root_label_set.contains(label)
    }

    /// Returns whether a wrapper with this label may be replaced by an entity node.
    pub fn is_promotable(&self, label: &str) -> bool {
        self.promotable_labels.contains(label)
    }

    /// Parses and validates a configuration from TOML; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ChunkTreeError> {
        let config: ChunkTreeConfig =
            toml::from_str(text).map_err(|e| ChunkTreeError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ChunkTreeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChunkTreeError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that every configured label can appear in bracketed text.
    pub fn validate(&self) -> Result<(), ChunkTreeError> {
        let labels = std::iter::once(&self.root_label)
            .chain(&self.root_label_set)
            .chain(&self.promotable_labels);

        for label in labels {
            if !is_valid_label(label) {
                return Err(ChunkTreeError::invalid_config(format!("invalid label {label:?}")));
            }
        }

        Ok(())
    }
}

/// A label is non-empty and has no whitespace or bracket characters.
fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']'))
}
