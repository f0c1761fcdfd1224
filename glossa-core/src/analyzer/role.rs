//! Role Classification
//!
//! Assigns a grammatical role to each segmented word.
//!
//! ## What It Does
//!
//! Every [`Segmentation`] gets exactly one [`Role`], decided from its root,
//! its prefix and its suffix against the [`Lexicon`]:
//!
//! ```text
//! s      connector root, no prefix        CONNECTOR
//! qoky   prefix qo on connector root k    VIOLATION
//! rody   root ro, subject suffix dy       SUBJECT
//! roin   root ro, object suffix in        OBJECT
//! ro     nothing else applies             CONCEPT
//! ```
//!
//! Where a prefixed connector is checked relative to the suffix rules is
//! set by [`ViolationPrecedence`]. Literal sequences (`o<->l`) are concepts
//! unless [`ClassifierOptions::tag_sequences`] is set.
//!
//! ## Usage
//!
//! ```
//! use glossa_core::analyzer::{MorphemeTokenizer, RoleClassifier};
//! use glossa_core::Lexicon;
//! use glossa_types::Role;
//!
//! let lexicon = Lexicon::builder()
//!     .root("ro", "Essence")
//!     .connector("s", "is")
//!     .subject_suffix("dy")
//!     .build();
//! let seg = MorphemeTokenizer::new(&lexicon).tokenize("rody");
//! assert_eq!(RoleClassifier::new(&lexicon).classify(&seg), Role::Subject);
//! ```

use glossa_types::{Role, Segmentation};
use serde::Deserialize;

use crate::lexicon::Lexicon;

/// Where the VIOLATION check sits in the decision order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationPrecedence {
    /// Checked right after the connector rule, before suffixes.
    #[default]
    AfterConnector,
    /// Checked only after the subject and object suffix rules.
    AfterAffixes,
}

/// Classifier switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    pub violation_precedence: ViolationPrecedence,
    /// Report literal sequences as [`Role::Sequence`] instead of
    /// [`Role::Concept`].
    pub tag_sequences: bool,
}

/// Assigns exactly one [`Role`] to each segmentation.
///
/// Default decision order:
///
/// 1. sequence units are concepts (or sequences, when tagged)
/// 2. a connector root without a significant prefix is a connector
/// 3. a significant prefix on a connector root is a violation
/// 4. a subject suffix marks a subject, an object suffix an object
/// 5. everything else is a concept
#[derive(Debug, Clone, Copy)]
pub struct RoleClassifier<'a> {
    lexicon: &'a Lexicon,
    options: ClassifierOptions,
}

impl<'a> RoleClassifier<'a> {
    /// Creates a classifier with default options.
    pub const fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            options: ClassifierOptions {
                violation_precedence: ViolationPrecedence::AfterConnector,
                tag_sequences: false,
            },
        }
    }

    /// Creates a classifier with explicit options.
    pub const fn with_options(lexicon: &'a Lexicon, options: ClassifierOptions) -> Self {
        Self { lexicon, options }
    }

    #[inline]
    pub fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// Classifies one segmentation. Total and pure.
    pub fn classify(&self, seg: &Segmentation) -> Role {
        if seg.is_sequence {
            return if self.options.tag_sequences {
                Role::Sequence
            } else {
                Role::Concept
            };
        }

        let connector_root = seg.root_known && self.lexicon.is_connector(&seg.root);
        let prefixed = seg.significant_prefix().is_some();

        if connector_root && !prefixed {
            return Role::Connector;
        }

        let violation = connector_root && prefixed;
        if violation && self.options.violation_precedence == ViolationPrecedence::AfterConnector {
            return Role::Violation;
        }

        if let Some(suffix) = seg.suffix.as_deref() {
            if self.lexicon.is_subject_suffix(suffix) {
                return Role::Subject;
            }
            if self.lexicon.is_object_suffix(suffix) {
                return Role::Object;
            }
        }

        if violation {
            return Role::Violation;
        }

        Role::Concept
    }
}
