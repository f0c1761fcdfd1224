//! TOML configuration.
//!
//! ```toml
//! [lexicon]
//! roots = "lexicon/roots.txt"
//! connectors = "lexicon/connectors.txt"
//! prefixes = "lexicon/prefixes.txt"
//! subject_suffixes = "lexicon/subject_suffixes.txt"
//! object_suffixes = "lexicon/object_suffixes.txt"
//!
//! [[schemes]]
//! name = "section"
//! partitions = [
//!     { name = "Herbal", range = [1, 66] },
//!     { name = "Astrological", range = [67, 73] },
//! ]
//!
//! [[signatures]]
//! name = "HEATED ESSENCE"
//! terms = [["Heat/Energy", "Igneous/Luminous Quality"], ["Essence"]]
//! ```
//!
//! Lexicon paths are resolved against the directory holding the config
//! file. Every section except `[lexicon]` may be omitted.

use std::path::{Path, PathBuf};

use glossa_types::{MorphemeCategory, Partition, PartitionRule};
use serde::Deserialize;

use crate::analyzer::ClassifierOptions;
use crate::corpus::clean::{CleanerConfig, DEFAULT_FILLER};
use crate::corpus::loader::DEFAULT_TRANSCRIBER;
use crate::error::{read_to_string, GlossaError, Result};
use crate::lexicon::Lexicon;
use crate::partition::PartitionScheme;
use crate::signature::Signature;
use crate::synth::SynthesisOptions;

/// Lexicon list files.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconPaths {
    pub roots: PathBuf,
    pub connectors: PathBuf,
    pub prefixes: PathBuf,
    pub subject_suffixes: PathBuf,
    pub object_suffixes: PathBuf,
    #[serde(default)]
    pub sequence_marker: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscriptionSection {
    /// Transcriber code accepted on paragraph lines.
    pub transcriber: String,
    /// Characters dropped while cleaning.
    pub filler: String,
}

impl Default for TranscriptionSection {
    fn default() -> Self {
        Self {
            transcriber: DEFAULT_TRANSCRIBER.to_string(),
            filler: DEFAULT_FILLER.to_string(),
        }
    }
}

impl TranscriptionSection {
    pub fn cleaner_config(&self) -> CleanerConfig {
        CleanerConfig {
            filler: self.filler.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiftSection {
    /// Minimum global count for thematic lift rows.
    pub min_global_count: u64,
    /// Minimum global count for violation lift rows.
    pub min_violation_count: u64,
    /// Prefix associations at or below this lift are dropped.
    pub min_prefix_lift: f64,
}

impl Default for LiftSection {
    fn default() -> Self {
        Self {
            min_global_count: 10,
            min_violation_count: 2,
            min_prefix_lift: 1.5,
        }
    }
}

/// One `[[schemes.partitions]]` entry. Exactly one of `range` and
/// `folios` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionSpec {
    pub name: String,
    #[serde(default)]
    pub range: Option<[u32; 2]>,
    #[serde(default)]
    pub folios: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeSpec {
    pub name: String,
    pub partitions: Vec<PartitionSpec>,
}

impl SchemeSpec {
    /// Validates the declarations and compiles them.
    pub fn build(&self) -> Result<PartitionScheme> {
        let invalid = |name: &str, reason| GlossaError::InvalidPartition {
            scheme: self.name.clone(),
            name: name.to_string(),
            reason,
        };

        let mut partitions = Vec::with_capacity(self.partitions.len());
        for spec in &self.partitions {
            if spec.name.trim().is_empty() {
                return Err(invalid(&spec.name, "empty partition name"));
            }
            let rule = match (&spec.range, &spec.folios) {
                (Some(_), Some(_)) => {
                    return Err(invalid(&spec.name, "both range and folios given"))
                }
                (None, None) => return Err(invalid(&spec.name, "needs a range or folios")),
                (Some([start, end]), None) => {
                    if start > end {
                        return Err(invalid(&spec.name, "range start exceeds end"));
                    }
                    PartitionRule::Range {
                        start: *start,
                        end: *end,
                    }
                }
                (None, Some(folios)) => PartitionRule::Folios(folios.clone()),
            };
            partitions.push(Partition {
                name: spec.name.clone(),
                rule,
            });
        }
        Ok(PartitionScheme::new(self.name.clone(), partitions))
    }
}

/// One `[[signatures]]` entry.
///
/// Each element of `terms` lists alternative phrases for one term.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureSpec {
    pub name: String,
    pub terms: Vec<Vec<String>>,
}

/// Whole configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlossaConfig {
    pub lexicon: LexiconPaths,
    #[serde(default)]
    pub transcription: TranscriptionSection,
    #[serde(default)]
    pub classifier: ClassifierOptions,
    #[serde(default)]
    pub lift: LiftSection,
    #[serde(default)]
    pub synthesis: SynthesisOptions,
    #[serde(default)]
    pub schemes: Vec<SchemeSpec>,
    #[serde(default)]
    pub signatures: Vec<SignatureSpec>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl GlossaConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, base).map_err(|e| match e {
            GlossaError::Config { source, .. } => GlossaError::Config {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses config text; relative paths resolve against `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let mut config: GlossaConfig =
            toml::from_str(text).map_err(|source| GlossaError::Config {
                path: PathBuf::new(),
                source,
            })?;
        config.base_dir = base_dir.to_path_buf();
        for scheme in &config.schemes {
            scheme.build()?;
        }
        config.compile_signatures()?;
        Ok(config)
    }

    /// Directory relative paths are resolved against.
    #[inline]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Names of the declared schemes, in file order.
    pub fn scheme_names(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(|s| s.name.as_str())
    }

    /// Compiles the scheme called `name`.
    pub fn scheme(&self, name: &str) -> Result<PartitionScheme> {
        self.schemes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| GlossaError::UnknownScheme(name.to_string()))?
            .build()
    }

    /// Compiles every declared signature, in file order.
    pub fn compile_signatures(&self) -> Result<Vec<Signature>> {
        self.signatures.iter().map(Signature::compile).collect()
    }

    /// Loads every lexicon list.
    pub fn build_lexicon(&self) -> Result<Lexicon> {
        let paths = &self.lexicon;
        let mut builder = Lexicon::builder()
            .load_file(&self.resolve(&paths.roots), MorphemeCategory::Root)?
            .load_file(&self.resolve(&paths.connectors), MorphemeCategory::Connector)?
            .load_file(&self.resolve(&paths.prefixes), MorphemeCategory::Prefix)?
            .load_file(
                &self.resolve(&paths.subject_suffixes),
                MorphemeCategory::SubjectSuffix,
            )?
            .load_file(
                &self.resolve(&paths.object_suffixes),
                MorphemeCategory::ObjectSuffix,
            )?;
        if let Some(marker) = &paths.sequence_marker {
            builder = builder.sequence_marker(marker);
        }
        Ok(builder.build())
    }
}
