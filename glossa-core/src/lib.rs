//! Morphological segmentation, role tagging and lift statistics over tagged
//! transcription corpora.
//!
//! The pipeline:
//!
//! 1. [`corpus`] reads the transcription (or a clean corpus plus partition
//!    map) into [`Paragraph`](glossa_types::Paragraph)s, labelling each with
//!    a [`partition::PartitionScheme`].
//! 2. [`analyzer`] splits words into prefix, root and suffix against an
//!    immutable [`lexicon::Lexicon`] and assigns each a
//!    [`Role`](glossa_types::Role).
//! 3. [`stats`] counts roots, role n-grams and contexts and computes lift.
//! 4. [`synth`] turns a paragraph's parsed words into one sentence.
//! 5. [`signature`] searches those sentences for named concept
//!    combinations.
//! 6. [`report`] renders results as CSV or text.
//!
//! [`session::Session`] ties a loaded [`config::GlossaConfig`], lexicon and
//! corpus together and exposes each analysis as one call.

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod partition;
pub mod report;
pub mod session;
pub mod signature;
pub mod stats;
pub mod synth;

pub use config::GlossaConfig;
pub use error::{GlossaError, Result};
pub use lexicon::Lexicon;
pub use partition::PartitionScheme;
pub use session::{CorpusSource, Session};
pub use synth::{Interpretation, Synthesizer};
