//! Signature Search
//!
//! Looks for named combinations of concepts in paragraph interpretations.
//!
//! ## What It Does
//!
//! A [`Signature`] is a name plus a list of terms. Each term lists one or
//! more alternative phrases; a term is present in a text when any of its
//! alternatives occurs in it, ignoring case. A paragraph whose text holds
//! every term is a complete match. One holding some but not all terms is a
//! partial match.
//!
//! ```text
//! HEATED ESSENCE = [Heat/Energy | Igneous/Luminous Quality] + [Essence]
//!
//! "The Heat/Energy Essence is the Substance."  complete
//! "[Subject focus: The Essence]"                partial (Essence)
//! "It is the Substance."                        no match
//! ```
//!
//! Only paragraphs of the target partitions are scanned. Paragraphs in no
//! target partition are skipped and not counted.
//!
//! ## Usage
//!
//! ```
//! use glossa_core::config::SignatureSpec;
//! use glossa_core::signature::{search_signatures, ScannedText, Signature};
//!
//! let spec = SignatureSpec {
//!     name: "HEATED ESSENCE".into(),
//!     terms: vec![vec!["Heat/Energy".into()], vec!["Essence".into()]],
//! };
//! let signatures = [Signature::compile(&spec).unwrap()];
//! let texts = [ScannedText {
//!     ordinal: 0,
//!     partition: "Herbal",
//!     text: "The Heat/Energy Essence is the Substance.",
//! }];
//! let found = search_signatures(&signatures, &["Herbal".to_string()], texts);
//! assert_eq!(found.complete.len(), 1);
//! ```

use regex::{Regex, RegexBuilder};

use crate::config::SignatureSpec;
use crate::error::{GlossaError, Result};
use crate::stats::FrequencyTable;

/// One term: any of its alternatives, case-insensitive, as literal text.
#[derive(Debug, Clone)]
struct Term {
    pattern: Regex,
}

/// A compiled signature.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    terms: Vec<Term>,
}

impl Signature {
    /// Validates and compiles a declaration.
    pub fn compile(spec: &SignatureSpec) -> Result<Self> {
        let invalid = |reason| GlossaError::InvalidSignature {
            name: spec.name.clone(),
            reason,
        };
        if spec.name.trim().is_empty() {
            return Err(invalid("empty signature name"));
        }
        if spec.terms.is_empty() {
            return Err(invalid("no terms"));
        }

        let mut terms = Vec::with_capacity(spec.terms.len());
        for alternatives in &spec.terms {
            if alternatives.is_empty() || alternatives.iter().any(|a| a.trim().is_empty()) {
                return Err(invalid("empty term"));
            }
            let source = alternatives
                .iter()
                .map(|a| regex::escape(a.trim()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|source| GlossaError::SignaturePattern {
                    name: spec.name.clone(),
                    source,
                })?;
            terms.push(Term { pattern });
        }

        Ok(Self {
            name: spec.name.clone(),
            terms,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// For each term, the text it first matched in `text`, if any.
    pub fn scan<'t>(&self, text: &'t str) -> Vec<Option<&'t str>> {
        self.terms
            .iter()
            .map(|t| t.pattern.find(text).map(|m| m.as_str()))
            .collect()
    }
}

/// One interpretation to scan.
#[derive(Debug, Clone, Copy)]
pub struct ScannedText<'t> {
    pub ordinal: u32,
    pub partition: &'t str,
    pub text: &'t str,
}

/// A paragraph holding some or all terms of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatch {
    pub signature: String,
    pub ordinal: u32,
    pub partition: String,
    pub text: String,
    /// Matched text of each present term, in term order.
    pub matched: Vec<String>,
}

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSearch {
    /// Target partitions, in report order.
    pub partitions: Vec<String>,
    /// Paragraphs scanned inside the targets.
    pub scanned: usize,
    /// Complete matches, in paragraph then signature order.
    pub complete: Vec<SignatureMatch>,
    /// Partial matches, same order.
    pub partial: Vec<SignatureMatch>,
}

impl SignatureSearch {
    /// Complete matches per signature in `partition`.
    pub fn counts(&self, partition: &str) -> FrequencyTable {
        self.complete
            .iter()
            .filter(|m| m.partition == partition)
            .map(|m| m.signature.as_str())
            .collect()
    }

    pub fn partial_in<'s>(&'s self, partition: &'s str) -> impl Iterator<Item = &'s SignatureMatch> {
        self.partial.iter().filter(move |m| m.partition == partition)
    }
}

/// Scans `texts` inside `partitions` for every signature.
pub fn search_signatures<'t, I>(
    signatures: &[Signature],
    partitions: &[String],
    texts: I,
) -> SignatureSearch
where
    I: IntoIterator<Item = ScannedText<'t>>,
{
    let mut out = SignatureSearch {
        partitions: partitions.to_vec(),
        ..Default::default()
    };

    for item in texts {
        if !partitions.iter().any(|p| p == item.partition) {
            continue;
        }
        out.scanned += 1;

        for signature in signatures {
            let found = signature.scan(item.text);
            let matched: Vec<String> = found.iter().flatten().map(|s| s.to_string()).collect();
            if matched.is_empty() {
                continue;
            }
            let complete = matched.len() == signature.term_count();
            let hit = SignatureMatch {
                signature: signature.name.clone(),
                ordinal: item.ordinal,
                partition: item.partition.to_string(),
                text: item.text.to_string(),
                matched,
            };
            if complete {
                out.complete.push(hit);
            } else {
                out.partial.push(hit);
            }
        }
    }
    out
}
