//! Lexicon loading and lookup.
//!
//! A lexicon is assembled from `morpheme|gloss` list files, one per
//! [`MorphemeCategory`]. Lines starting with `#`, lines containing `===`
//! and blank lines are ignored. Once built the lexicon is immutable and
//! shared by reference with every analysis.
//!
//! ## Ordering
//!
//! Ordering is part of the segmentation contract:
//!
//! - roots (connectors included) are kept longest-first; among roots of
//!   equal length the one listed first wins
//! - prefixes keep list order
//! - subject and object suffixes are merged longest-first, subject suffixes
//!   ahead of object suffixes of the same length

use std::cmp::Reverse;
use std::path::Path;

use glossa_types::{LexiconEntry, MorphemeCategory};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{read_to_string, Result};

/// Default literal-sequence marker.
pub const DEFAULT_SEQUENCE_MARKER: &str = "<->";

/// Parses one lexicon list.
///
/// Everything before the first `|` is the morpheme, everything after it is
/// the gloss. A line without `|` yields an entry with an empty gloss.
pub fn parse_entries(text: &str, category: MorphemeCategory) -> Vec<LexiconEntry> {
    text.lines()
        .filter_map(|line| {
            if line.trim_start().starts_with('#') || line.contains("===") {
                return None;
            }
            let (morpheme, gloss) = match line.split_once('|') {
                Some((m, g)) => (m.trim(), g.trim()),
                None => (line.trim(), ""),
            };
            if morpheme.is_empty() {
                return None;
            }
            Some(LexiconEntry {
                morpheme: morpheme.to_string(),
                category,
                gloss: gloss.to_string(),
            })
        })
        .collect()
}

/// Incrementally collects entries before freezing them into a [`Lexicon`].
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    entries: Vec<LexiconEntry>,
    sequence_marker: Option<String>,
}

impl LexiconBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry.
    pub fn entry(mut self, morpheme: &str, category: MorphemeCategory, gloss: &str) -> Self {
        self.entries.push(LexiconEntry {
            morpheme: morpheme.to_string(),
            category,
            gloss: gloss.to_string(),
        });
        self
    }

    /// Adds a content root.
    pub fn root(self, morpheme: &str, gloss: &str) -> Self {
        self.entry(morpheme, MorphemeCategory::Root, gloss)
    }

    /// Adds a connector root.
    pub fn connector(self, morpheme: &str, gloss: &str) -> Self {
        self.entry(morpheme, MorphemeCategory::Connector, gloss)
    }

    /// Adds a significant prefix.
    pub fn prefix(self, morpheme: &str) -> Self {
        self.entry(morpheme, MorphemeCategory::Prefix, "")
    }

    /// Adds a subject suffix.
    pub fn subject_suffix(self, morpheme: &str) -> Self {
        self.entry(morpheme, MorphemeCategory::SubjectSuffix, "")
    }

    /// Adds an object suffix.
    pub fn object_suffix(self, morpheme: &str) -> Self {
        self.entry(morpheme, MorphemeCategory::ObjectSuffix, "")
    }

    /// Adds pre-parsed entries.
    pub fn extend<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = LexiconEntry>,
    {
        self.entries.extend(entries);
        self
    }

    /// Reads a list file and adds its entries under `category`.
    pub fn load_file(self, path: &Path, category: MorphemeCategory) -> Result<Self> {
        let text = read_to_string(path)?;
        let entries = parse_entries(&text, category);
        debug!(path = %path.display(), ?category, count = entries.len(), "loaded lexicon list");
        Ok(self.extend(entries))
    }

    /// Overrides the literal-sequence marker.
    pub fn sequence_marker(mut self, marker: &str) -> Self {
        self.sequence_marker = Some(marker.to_string());
        self
    }

    /// Freezes the collected entries.
    pub fn build(self) -> Lexicon {
        let mut lex = Lexicon {
            roots: Vec::new(),
            root_set: FxHashSet::default(),
            connectors: Vec::new(),
            connector_set: FxHashSet::default(),
            prefixes: Vec::new(),
            subject_suffixes: FxHashSet::default(),
            object_suffixes: FxHashSet::default(),
            suffixes: Vec::new(),
            glosses: FxHashMap::default(),
            sequence_marker: self
                .sequence_marker
                .unwrap_or_else(|| DEFAULT_SEQUENCE_MARKER.to_string()),
        };

        let mut subject = Vec::new();
        let mut object = Vec::new();

        for e in self.entries {
            let m = e.morpheme;
            match e.category {
                MorphemeCategory::Root | MorphemeCategory::Connector => {
                    if e.category == MorphemeCategory::Connector && lex.connector_set.insert(m.clone())
                    {
                        lex.connectors.push(m.clone());
                    }
                    if lex.root_set.insert(m.clone()) {
                        lex.roots.push(m.clone());
                    }
                    if !e.gloss.is_empty() {
                        lex.glosses.entry(m).or_insert(e.gloss);
                    }
                }
                MorphemeCategory::Prefix => {
                    if !lex.prefixes.contains(&m) {
                        lex.prefixes.push(m);
                    }
                }
                MorphemeCategory::SubjectSuffix => {
                    if lex.subject_suffixes.insert(m.clone()) {
                        subject.push(m);
                    }
                }
                MorphemeCategory::ObjectSuffix => {
                    if lex.object_suffixes.insert(m.clone()) {
                        object.push(m);
                    }
                }
            }
        }

        // Stable sorts keep list order among equal lengths.
        lex.roots.sort_by_key(|r| Reverse(r.len()));
        lex.suffixes = subject.into_iter().chain(object).collect();
        lex.suffixes.sort_by_key(|s| Reverse(s.len()));

        lex
    }
}

/// Immutable morpheme inventory.
#[derive(Debug, Clone)]
pub struct Lexicon {
    roots: Vec<String>,
    root_set: FxHashSet<String>,
    connectors: Vec<String>,
    connector_set: FxHashSet<String>,
    prefixes: Vec<String>,
    subject_suffixes: FxHashSet<String>,
    object_suffixes: FxHashSet<String>,
    suffixes: Vec<String>,
    glosses: FxHashMap<String, String>,
    sequence_marker: String,
}

impl Lexicon {
    /// Starts a new builder.
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::new()
    }

    /// Roots, longest first.
    #[inline]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Connectors in list order.
    #[inline]
    pub fn connectors(&self) -> &[String] {
        &self.connectors
    }

    /// Significant prefixes in list order.
    #[inline]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Subject and object suffixes, longest first.
    #[inline]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    #[inline]
    pub fn sequence_marker(&self) -> &str {
        &self.sequence_marker
    }

    #[inline]
    pub fn is_root(&self, s: &str) -> bool {
        self.root_set.contains(s)
    }

    #[inline]
    pub fn is_connector(&self, s: &str) -> bool {
        self.connector_set.contains(s)
    }

    #[inline]
    pub fn is_subject_suffix(&self, s: &str) -> bool {
        self.subject_suffixes.contains(s)
    }

    #[inline]
    pub fn is_object_suffix(&self, s: &str) -> bool {
        self.object_suffixes.contains(s)
    }

    /// Gloss of a root, if one was given.
    #[inline]
    pub fn gloss(&self, root: &str) -> Option<&str> {
        self.glosses.get(root).map(String::as_str)
    }

    /// First root, in longest-first order, that occurs anywhere in `word`.
    ///
    /// This is a plain substring scan: a short root can match inside an
    /// unrelated word.
    pub fn longest_root_in(&self, word: &str) -> Option<&str> {
        self.roots
            .iter()
            .find(|r| word.contains(r.as_str()))
            .map(String::as_str)
    }

    /// Number of distinct roots, connectors included.
    #[inline]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_banners_and_blanks() {
        let text = "# roots\n=== SECTION ===\n\nro | Essence\n  tai|Balance/Order\nek\n";
        let entries = parse_entries(text, MorphemeCategory::Root);
        let morphemes: Vec<_> = entries.iter().map(|e| e.morpheme.as_str()).collect();
        assert_eq!(morphemes, ["ro", "tai", "ek"]);
        assert_eq!(entries[0].gloss, "Essence");
        assert_eq!(entries[2].gloss, "");
    }

    #[test]
    fn parse_skips_empty_morpheme() {
        let entries = parse_entries(" | orphan gloss\n", MorphemeCategory::Root);
        assert!(entries.is_empty());
    }

    #[test]
    fn roots_are_longest_first_and_stable() {
        let lex = Lexicon::builder()
            .root("ro", "")
            .root("che", "")
            .root("et", "")
            .connector("s", "is")
            .root("cho", "")
            .build();
        assert_eq!(lex.roots(), ["che", "cho", "ro", "et", "s"]);
    }

    #[test]
    fn connectors_are_roots() {
        let lex = Lexicon::builder().connector("k", "is fixed in").build();
        assert!(lex.is_root("k"));
        assert!(lex.is_connector("k"));
        assert_eq!(lex.gloss("k"), Some("is fixed in"));
    }

    #[test]
    fn suffixes_merge_subject_first_on_ties() {
        let lex = Lexicon::builder()
            .subject_suffix("y")
            .subject_suffix("dy")
            .object_suffix("in")
            .object_suffix("n")
            .subject_suffix("ey")
            .build();
        assert_eq!(lex.suffixes(), ["dy", "ey", "in", "y", "n"]);
    }

    #[test]
    fn duplicates_keep_first_gloss() {
        let lex = Lexicon::builder()
            .root("ro", "first")
            .root("ro", "second")
            .build();
        assert_eq!(lex.root_count(), 1);
        assert_eq!(lex.gloss("ro"), Some("first"));
    }

    #[test]
    fn longest_root_in_prefers_length() {
        let lex = Lexicon::builder().root("ch", "").root("che", "").build();
        assert_eq!(lex.longest_root_in("qocheey"), Some("che"));
        assert_eq!(lex.longest_root_in("xyz"), None);
    }

    #[test]
    fn default_sequence_marker() {
        let lex = Lexicon::builder().build();
        assert_eq!(lex.sequence_marker(), "<->");
        let lex = Lexicon::builder().sequence_marker("~").build();
        assert_eq!(lex.sequence_marker(), "~");
    }
}
