//! Corpus loaders.
//!
//! Three input shapes are supported:
//!
//! - the tagged transcription, with folio header lines (`<f1r>`) followed by
//!   locus-tagged paragraph lines (`<f1r.P.1;H> fachys.ykal…`)
//! - the clean corpus, one cleaned paragraph per line, with a JSON map from
//!   paragraph ordinal to partition label
//! - the folio-tagged corpus, a bare `<f1r>` line followed by that folio's
//!   cleaned paragraphs
//!
//! Loaders never fail on content. Lines they cannot use are skipped and
//! counted in [`LoadStats`]; only an unreadable file is an error.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use glossa_types::{Paragraph, ParagraphId, UNKNOWN_PARTITION};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::analyzer::words::collect_words;
use crate::corpus::clean::{collapse_whitespace, CleanerConfig, TranscriptionCleaner};
use crate::error::{read_to_string, GlossaError, Result};
use crate::partition::PartitionScheme;

/// Default transcriber code accepted on paragraph lines.
pub const DEFAULT_TRANSCRIBER: &str = "H";

/// Folio header tag anywhere on a line; ids with a `.` are loci, not folios.
static FOLIO_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(f\d+[rv]\d*)>").expect("folio tag pattern is valid"));

/// Locus tag at the start of a paragraph line.
static LOCUS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(f\d+[rv]\d*)\.([^>]*)>").expect("locus tag pattern is valid")
});

/// Bare folio line of the folio-tagged corpus.
static BARE_FOLIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(f[0-9A-Za-z]+)>$").expect("bare folio pattern is valid"));

/// Ordinal to label map for the clean corpus.
pub type PartitionMap = BTreeMap<String, String>;

/// Counters collected while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read.
    pub lines: usize,
    /// Paragraphs kept.
    pub paragraphs: usize,
    /// Folio header lines seen.
    pub folios: usize,
    /// Blank lines.
    pub blank: usize,
    /// `#` comment lines.
    pub comments: usize,
    /// Paragraph lines of other transcribers.
    pub other_transcriber: usize,
    /// Lines matching no known shape.
    pub malformed: usize,
    /// Paragraph lines seen before any folio header.
    pub orphaned: usize,
    /// Paragraph lines empty after cleaning.
    pub empty: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} paragraphs in {} folios",
            self.lines, self.paragraphs, self.folios
        )?;
        let skipped = self.malformed + self.orphaned + self.empty;
        if skipped > 0 {
            write!(
                f,
                ", skipped {} ({} malformed, {} before any folio, {} empty)",
                skipped, self.malformed, self.orphaned, self.empty
            )?;
        }
        Ok(())
    }
}

/// Paragraphs plus the counters collected while reading them.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub paragraphs: Vec<Paragraph>,
    pub stats: LoadStats,
}

impl LoadedCorpus {
    /// Total number of words.
    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.words.len()).sum()
    }

    /// Paragraphs read under `folio`.
    pub fn folio<'a>(&'a self, folio: &'a str) -> impl Iterator<Item = &'a Paragraph> + 'a {
        self.paragraphs
            .iter()
            .filter(move |p| p.folio.as_deref() == Some(folio))
    }
}

/// Reader for the tagged transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionLoader<'a> {
    scheme: &'a PartitionScheme,
    cleaner: TranscriptionCleaner,
    transcriber: String,
}

impl<'a> TranscriptionLoader<'a> {
    /// Creates a loader labelling paragraphs with `scheme`.
    pub fn new(scheme: &'a PartitionScheme) -> Self {
        Self {
            scheme,
            cleaner: TranscriptionCleaner::default(),
            transcriber: DEFAULT_TRANSCRIBER.to_string(),
        }
    }

    /// Accepts paragraph lines from `code` instead of the default.
    pub fn transcriber(mut self, code: &str) -> Self {
        self.transcriber = code.to_string();
        self
    }

    pub fn cleaner(mut self, config: CleanerConfig) -> Self {
        self.cleaner = TranscriptionCleaner::new(config);
        self
    }

    /// Reads and parses a transcription file.
    pub fn load_path(&self, path: &Path) -> Result<LoadedCorpus> {
        let text = read_to_string(path)?;
        let corpus = self.load_str(&text);
        info!(path = %path.display(), stats = %corpus.stats, "loaded transcription");
        Ok(corpus)
    }

    /// Parses transcription text.
    pub fn load_str(&self, text: &str) -> LoadedCorpus {
        let mut out = LoadedCorpus::default();
        let mut current: Option<(String, String)> = None;
        let mut buf = String::new();

        for (lineno, raw) in text.lines().enumerate() {
            out.stats.lines += 1;
            let line = raw.trim();

            if line.is_empty() {
                out.stats.blank += 1;
                continue;
            }
            if line.starts_with('#') {
                out.stats.comments += 1;
                continue;
            }

            if let Some(caps) = FOLIO_TAG.captures(line) {
                let folio = caps[1].to_string();
                let label = self.scheme.classify(&folio).to_string();
                debug!(%folio, partition = %label, "folio");
                current = Some((folio, label));
                out.stats.folios += 1;
                continue;
            }

            let Some(caps) = LOCUS_TAG.captures(line) else {
                warn!(line = lineno + 1, "skipping malformed line");
                out.stats.malformed += 1;
                continue;
            };

            if !self.is_accepted_locus(&caps[2]) {
                out.stats.other_transcriber += 1;
                continue;
            }

            let Some((folio, label)) = &current else {
                warn!(line = lineno + 1, "paragraph before any folio tag, skipping");
                out.stats.orphaned += 1;
                continue;
            };

            self.cleaner.clean_into(line, &mut buf);
            if buf.is_empty() {
                out.stats.empty += 1;
                continue;
            }

            out.paragraphs.push(Paragraph {
                ordinal: out.paragraphs.len() as ParagraphId,
                folio: Some(folio.clone()),
                partition: label.clone(),
                words: collect_words(&buf),
            });
        }

        out.stats.paragraphs = out.paragraphs.len();
        if out.paragraphs.is_empty() {
            warn!("no paragraphs extracted");
        }
        out
    }

    /// `P.1;H` is accepted for transcriber `H`, as is `P.1;H;x`.
    fn is_accepted_locus(&self, locus: &str) -> bool {
        locus.split(';').skip(1).any(|code| code == self.transcriber)
    }
}

/// Parses the clean corpus.
///
/// Blank lines are skipped without consuming an ordinal. Ordinals missing
/// from `map` are labelled [`UNKNOWN_PARTITION`].
pub fn load_clean_corpus(text: &str, map: &PartitionMap) -> LoadedCorpus {
    let mut out = LoadedCorpus::default();
    for raw in text.lines() {
        out.stats.lines += 1;
        let line = collapse_whitespace(raw);
        if line.is_empty() {
            out.stats.blank += 1;
            continue;
        }
        let ordinal = out.paragraphs.len() as ParagraphId;
        let partition = map
            .get(&ordinal.to_string())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PARTITION.to_string());
        out.paragraphs.push(Paragraph {
            ordinal,
            folio: None,
            partition,
            words: collect_words(&line),
        });
    }
    out.stats.paragraphs = out.paragraphs.len();
    out
}

/// Reads the clean corpus and its partition map from disk.
pub fn load_clean_corpus_files(corpus: &Path, map: &Path) -> Result<LoadedCorpus> {
    let map_text = read_to_string(map)?;
    let map: PartitionMap =
        serde_json::from_str(&map_text).map_err(|source| GlossaError::PartitionMap {
            path: map.to_path_buf(),
            source,
        })?;
    let text = read_to_string(corpus)?;
    let loaded = load_clean_corpus(&text, &map);
    if loaded.paragraphs.len() != map.len() {
        warn!(
            paragraphs = loaded.paragraphs.len(),
            mapped = map.len(),
            "partition map size differs from paragraph count"
        );
    }
    info!(path = %corpus.display(), stats = %loaded.stats, "loaded clean corpus");
    Ok(loaded)
}

/// Parses the folio-tagged corpus.
pub fn load_tagged_corpus(text: &str, scheme: &PartitionScheme) -> LoadedCorpus {
    let mut out = LoadedCorpus::default();
    let mut current: Option<(String, String)> = None;

    for raw in text.lines() {
        out.stats.lines += 1;
        let line = raw.trim();
        if line.is_empty() {
            out.stats.blank += 1;
            continue;
        }
        if let Some(caps) = BARE_FOLIO.captures(line) {
            let folio = caps[1].to_string();
            let label = scheme.classify(&folio).to_string();
            current = Some((folio, label));
            out.stats.folios += 1;
            continue;
        }
        let Some((folio, label)) = &current else {
            out.stats.orphaned += 1;
            continue;
        };
        let words = collect_words(&collapse_whitespace(line));
        out.paragraphs.push(Paragraph {
            ordinal: out.paragraphs.len() as ParagraphId,
            folio: Some(folio.clone()),
            partition: label.clone(),
            words,
        });
    }

    out.stats.paragraphs = out.paragraphs.len();
    if out.stats.orphaned > 0 {
        warn!(count = out.stats.orphaned, "text before any folio tag skipped");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_types::{Partition, PartitionRule};

    fn scheme() -> PartitionScheme {
        PartitionScheme::new(
            "section",
            vec![
                Partition {
                    name: "Herbal".into(),
                    rule: PartitionRule::Range { start: 1, end: 66 },
                },
                Partition {
                    name: "Astrological".into(),
                    rule: PartitionRule::Range { start: 67, end: 73 },
                },
            ],
        )
    }

    const SAMPLE: &str = "\
# header comment
<f1r>      <! $Q=A $P=A>
<f1r.P.1;H>      fachys.ykal.ar.ataiin.shol.shory-=
<f1r.P.1;C>      fachys.ykal.ar.ataiin.shol.shory-=
<f1r.P.2;H>      sory.ckhar.o<->r.y.kair.chtaiin=

<f67r1>
<f67r1.C.1;H>    otaiin.{x}.okeey.qokal=
<f67r1.C.2;H>    =!
garbage line
";

    #[test]
    fn parses_paragraphs_with_folios() {
        let s = scheme();
        let corpus = TranscriptionLoader::new(&s).load_str(SAMPLE);
        assert_eq!(corpus.paragraphs.len(), 3);

        let p0 = &corpus.paragraphs[0];
        assert_eq!(p0.ordinal, 0);
        assert_eq!(p0.folio.as_deref(), Some("f1r"));
        assert_eq!(p0.partition, "Herbal");
        assert_eq!(p0.words, ["fachys", "ykal", "ar", "ataiin", "shol", "shory-"]);

        assert_eq!(corpus.paragraphs[1].words[2], "o<->r");

        let p2 = &corpus.paragraphs[2];
        assert_eq!(p2.folio.as_deref(), Some("f67r1"));
        assert_eq!(p2.partition, "Astrological");
        assert_eq!(p2.words, ["otaiin", "okeey", "qokal"]);
    }

    #[test]
    fn counts_skipped_lines() {
        let s = scheme();
        let stats = TranscriptionLoader::new(&s).load_str(SAMPLE).stats;
        assert_eq!(stats.folios, 2);
        assert_eq!(stats.comments, 1);
        assert_eq!(stats.blank, 1);
        assert_eq!(stats.other_transcriber, 1);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.paragraphs, 3);
    }

    #[test]
    fn paragraph_before_folio_is_dropped() {
        let s = scheme();
        let corpus =
            TranscriptionLoader::new(&s).load_str("<f1r.P.1;H> daiin\n<f1r>\n<f1r.P.2;H> chol");
        assert_eq!(corpus.stats.orphaned, 1);
        assert_eq!(corpus.paragraphs.len(), 1);
        assert_eq!(corpus.paragraphs[0].ordinal, 0);
    }

    #[test]
    fn other_transcriber_code() {
        let s = scheme();
        let corpus = TranscriptionLoader::new(&s)
            .transcriber("C")
            .load_str(SAMPLE);
        assert_eq!(corpus.paragraphs.len(), 1);
    }

    #[test]
    fn semicolon_terminated_marker() {
        let s = scheme();
        let corpus = TranscriptionLoader::new(&s).load_str("<f2r>\n<f2r.P.1;H;x> chol.daiin");
        assert_eq!(corpus.paragraphs.len(), 1);
    }

    #[test]
    fn unmapped_folio_is_unknown() {
        let s = scheme();
        let corpus = TranscriptionLoader::new(&s).load_str("<f74r>\n<f74r.P.1;H> chol");
        assert_eq!(corpus.paragraphs[0].partition, UNKNOWN_PARTITION);
    }

    #[test]
    fn clean_corpus_skips_blank_lines_without_ordinal() {
        let mut map = PartitionMap::new();
        map.insert("0".into(), "Herbal".into());
        map.insert("1".into(), "Recipes".into());
        let corpus = load_clean_corpus("daiin chol\n\n  shol   qokal \nextra", &map);
        assert_eq!(corpus.paragraphs.len(), 3);
        assert_eq!(corpus.paragraphs[1].partition, "Recipes");
        assert_eq!(corpus.paragraphs[1].words, ["shol", "qokal"]);
        assert_eq!(corpus.paragraphs[2].partition, UNKNOWN_PARTITION);
        assert_eq!(corpus.stats.blank, 1);
    }

    #[test]
    fn tagged_corpus() {
        let s = scheme();
        let corpus = load_tagged_corpus("stray\n<f1r>\ndaiin chol\n<f70v>\nshol", &s);
        assert_eq!(corpus.stats.orphaned, 1);
        assert_eq!(corpus.paragraphs.len(), 2);
        assert_eq!(corpus.paragraphs[1].partition, "Astrological");
        assert_eq!(corpus.paragraphs[1].folio.as_deref(), Some("f70v"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let s = scheme();
        let err = TranscriptionLoader::new(&s)
            .load_path(Path::new("/no/such/transcription.txt"))
            .unwrap_err();
        assert!(matches!(err, GlossaError::MissingInput { .. }));
    }

    #[test]
    fn stats_display() {
        let stats = LoadStats {
            lines: 10,
            paragraphs: 4,
            folios: 2,
            malformed: 1,
            ..Default::default()
        };
        assert_eq!(
            stats.to_string(),
            "10 lines, 4 paragraphs in 2 folios, skipped 1 (1 malformed, 0 before any folio, 0 empty)"
        );
    }
}
