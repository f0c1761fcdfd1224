//! Syntax Patterns
//!
//! Summaries of role and root sequences, built on [`crate::analyzer::ngram`].
//!
//! ## What It Does
//!
//! - [`RolePatterns`]: role bigrams and trigrams over one continuous stream
//!   of roles, so windows cross paragraph boundaries.
//! - [`GrammarCoverage`]: per paragraph, whether the roles hold
//!   `SUBJECT .. CONNECTOR .. OBJECT` and `CONNECTOR .. OBJECT` in order,
//!   other roles allowed in between.
//! - [`relation_edges`]: `source -connector-> target` counts from root
//!   trigrams whose middle root is a connector.
//!
//! ## Usage
//!
//! ```
//! use glossa_core::stats::GrammarCoverage;
//! use glossa_types::Role::*;
//!
//! let mut coverage = GrammarCoverage::default();
//! coverage.add(&[Subject, Concept, Connector, Object]);
//! coverage.add(&[Object, Connector]);
//! assert_eq!(coverage.full_sentences, 1);
//! assert_eq!(coverage.percent(coverage.full_sentences), 50.0);
//! ```

use glossa_types::Role;

use crate::analyzer::ngram::{contains_ordered, count_centered_trigrams_by, count_ngrams, NgramTable};
use crate::lexicon::Lexicon;

const FULL_SENTENCE: [Role; 3] = [Role::Subject, Role::Connector, Role::Object];
const CONNECTOR_OBJECT: [Role; 2] = [Role::Connector, Role::Object];

/// Role bigram and trigram tables over one continuous role stream.
#[derive(Debug, Clone)]
pub struct RolePatterns {
    pub words: usize,
    pub bigrams: NgramTable<Role>,
    pub trigrams: NgramTable<Role>,
}

impl RolePatterns {
    pub fn from_roles(roles: &[Role]) -> Self {
        Self {
            words: roles.len(),
            bigrams: count_ngrams(roles, 2),
            trigrams: count_ngrams(roles, 3),
        }
    }
}

/// How many paragraphs contain the basic clause shapes, in order with gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrammarCoverage {
    pub paragraphs: usize,
    /// SUBJECT … CONNECTOR … OBJECT
    pub full_sentences: usize,
    /// CONNECTOR … OBJECT
    pub connector_object: usize,
}

impl GrammarCoverage {
    pub fn add(&mut self, roles: &[Role]) {
        self.paragraphs += 1;
        if contains_ordered(roles, &FULL_SENTENCE) {
            self.full_sentences += 1;
        }
        if contains_ordered(roles, &CONNECTOR_OBJECT) {
            self.connector_object += 1;
        }
    }

    /// `n` as a percentage of paragraphs; `0.0` when none were seen.
    pub fn percent(&self, n: usize) -> f64 {
        if self.paragraphs == 0 {
            0.0
        } else {
            n as f64 / self.paragraphs as f64 * 100.0
        }
    }
}

/// `source -connector-> target`, read off root trigrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    pub source: String,
    pub connector: String,
    pub target: String,
    pub count: u64,
}

/// Edges from every root trigram whose middle root is a connector.
///
/// Ranked by descending count, then lexically.
pub fn relation_edges(roots: &[&str], lexicon: &Lexicon) -> Vec<RelationEdge> {
    let table = count_centered_trigrams_by(roots, |r| lexicon.is_connector(r));
    table
        .ranked()
        .into_iter()
        .map(|(gram, count)| RelationEdge {
            source: gram[0].to_string(),
            connector: gram[1].to_string(),
            target: gram[2].to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Role::*;

    #[test]
    fn coverage_counts_ordered_shapes() {
        let mut cov = GrammarCoverage::default();
        cov.add(&[Subject, Concept, Connector, Object]);
        cov.add(&[Connector, Concept, Object]);
        cov.add(&[Object, Connector]);
        cov.add(&[]);
        assert_eq!(cov.paragraphs, 4);
        assert_eq!(cov.full_sentences, 1);
        assert_eq!(cov.connector_object, 2);
        assert_eq!(cov.percent(cov.connector_object), 50.0);
        assert_eq!(GrammarCoverage::default().percent(0), 0.0);
    }

    #[test]
    fn role_patterns_shapes() {
        let p = RolePatterns::from_roles(&[Subject, Connector, Object]);
        assert_eq!(p.words, 3);
        assert_eq!(p.bigrams.total(), 2);
        assert_eq!(p.trigrams.total(), 1);

        let short = RolePatterns::from_roles(&[Subject]);
        assert!(short.bigrams.is_empty() && short.trigrams.is_empty());
    }

    #[test]
    fn edges_from_connector_trigrams() {
        let lex = Lexicon::builder()
            .root("ro", "")
            .root("che", "")
            .connector("s", "is")
            .connector("l", "is a type of")
            .build();
        let roots = ["ro", "s", "che", "l", "ro", "s", "che"];
        let edges = relation_edges(&roots, &lex);
        assert_eq!(edges.len(), 2);
        assert_eq!(
            edges[0],
            RelationEdge {
                source: "ro".into(),
                connector: "s".into(),
                target: "che".into(),
                count: 2,
            }
        );
        assert_eq!(edges[1].connector, "l");
    }
}
