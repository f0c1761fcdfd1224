//! One loaded configuration, lexicon and corpus, and the analyses run
//! over them.

use std::path::Path;

use glossa_types::{Paragraph, Role, UNKNOWN_PARTITION};
use tracing::{info, warn};

use crate::analyzer::ngram::{count_centered_trigrams, NgramTable};
use crate::analyzer::WordAnalyzer;
use crate::config::GlossaConfig;
use crate::corpus::clean::{collapse_whitespace, strip_inline_tags};
use crate::corpus::loader::{load_clean_corpus_files, LoadedCorpus, TranscriptionLoader};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::partition::PartitionScheme;
use crate::signature::{search_signatures, ScannedText, SignatureSearch};
use crate::stats::context::{
    compound_contexts, concept_rates, prefix_associations, root_sequence, suffix_contexts,
    unknown_words, CompoundContext, ConceptRate, PrefixAssociation, SuffixContext,
};
use crate::stats::patterns::relation_edges;
use crate::stats::{
    FrequencyTable, GrammarCoverage, LiftEngine, LiftTable, Observations, RelationEdge,
    RolePatterns,
};
use crate::synth::{Interpretation, Synthesizer};

/// Roots compared across dialects by default.
pub const DEFAULT_DIALECT_CONCEPTS: &[&str] = &[
    "aii", "che", "cho", "ol", "kch", "teo", "f", "et", "yk", "ro", "tai", "ek",
];

/// Compound words whose neighbourhoods are reported by default.
pub const DEFAULT_COMPOUND_TARGETS: &[&str] = &[
    "qoky", "chdy", "qoty", "chody", "shody", "qoteey", "choky", "chos", "okody", "qotam",
    "okees", "qotody", "qokl", "qokody", "shos", "otody", "shoky", "okchd", "shok", "qoly",
];

/// Connectors kept in the relation graph by default.
pub const DEFAULT_GRAPH_CONNECTORS: &[&str] = &["s", "r", "l", "d", "f"];

/// Where the corpus comes from.
#[derive(Debug, Clone, Copy)]
pub enum CorpusSource<'p> {
    /// Tagged transcription, labelled with the named scheme.
    Transcription { path: &'p Path, scheme: &'p str },
    /// Clean corpus plus its JSON partition map.
    Clean { corpus: &'p Path, map: &'p Path },
}

/// Synthesized reading of one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub ordinal: u32,
    pub folio: Option<String>,
    /// Paragraph text with inline annotations removed.
    pub cleaned: String,
    /// `None` when nothing is left after cleaning.
    pub interpretation: Option<Interpretation>,
}

/// Per-partition connector usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorUsage {
    pub partition: String,
    pub connectors: FrequencyTable,
}

#[derive(Debug)]
pub struct Session {
    pub config: GlossaConfig,
    pub lexicon: Lexicon,
    pub corpus: LoadedCorpus,
}

impl Session {
    /// Loads the lexicon and corpus named by `config` and `source`.
    pub fn open(config: GlossaConfig, source: CorpusSource<'_>) -> Result<Self> {
        let lexicon = config.build_lexicon()?;
        info!(roots = lexicon.root_count(), "lexicon ready");

        let corpus = match source {
            CorpusSource::Transcription { path, scheme } => {
                let scheme = config.scheme(scheme)?;
                TranscriptionLoader::new(&scheme)
                    .transcriber(&config.transcription.transcriber)
                    .cleaner(config.transcription.cleaner_config())
                    .load_path(path)?
            }
            CorpusSource::Clean { corpus, map } => load_clean_corpus_files(corpus, map)?,
        };

        Ok(Self::new(config, lexicon, corpus))
    }

    /// Wraps already loaded parts.
    pub fn new(config: GlossaConfig, lexicon: Lexicon, corpus: LoadedCorpus) -> Self {
        Self {
            config,
            lexicon,
            corpus,
        }
    }

    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.corpus.paragraphs
    }

    /// Every word of the corpus, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.corpus
            .paragraphs
            .iter()
            .flat_map(|p| p.words.iter().map(String::as_str))
    }

    pub fn analyzer(&self) -> WordAnalyzer<'_> {
        WordAnalyzer::new(&self.lexicon, self.config.classifier)
    }

    /// Label of `para` under `scheme`.
    ///
    /// Paragraphs with a folio are classified again; paragraphs without one
    /// keep the label they were loaded with.
    fn label_in<'s>(scheme: &'s PartitionScheme, para: &'s Paragraph) -> &'s str {
        match para.folio.as_deref() {
            Some(folio) => scheme.classify(folio),
            None => &para.partition,
        }
    }

    fn observations(scheme: &PartitionScheme) -> Observations {
        Observations::new(scheme.labels())
    }

    /// Lift of each root across the partitions of `scheme`.
    ///
    /// A word counts as the longest root it contains. Denominators are all
    /// words inside declared partitions.
    pub fn thematic_lift(&self, scheme: &str, min_count: Option<u64>) -> Result<LiftTable> {
        let scheme = self.config.scheme(scheme)?;
        let mut obs = Self::observations(&scheme);
        for para in self.paragraphs() {
            let label = Self::label_in(&scheme, para);
            if !obs.add_tokens(label, para.words.len() as u64) {
                continue;
            }
            for word in &para.words {
                if let Some(root) = self.lexicon.longest_root_in(word) {
                    obs.record(label, root);
                }
            }
        }
        let min = min_count.unwrap_or(self.config.lift.min_global_count);
        let table = LiftEngine::new(min).compute(&obs);
        if table.is_empty() {
            warn!(scheme = scheme.name(), min_count = min, "no roots reached the minimum count");
        }
        Ok(table)
    }

    /// Lift of whole violation words.
    ///
    /// The global denominator is every corpus word; counts come from
    /// declared partitions only.
    pub fn violation_lift(&self, scheme: &str, min_count: Option<u64>) -> Result<LiftTable> {
        let scheme = self.config.scheme(scheme)?;
        let analyzer = self.analyzer();
        let mut obs = Self::observations(&scheme);
        for para in self.paragraphs() {
            let label = Self::label_in(&scheme, para);
            obs.add_global_tokens(para.words.len() as u64);
            if !obs.add_partition_tokens(label, para.words.len() as u64) {
                continue;
            }
            for word in &para.words {
                if analyzer.parse(word).role == Role::Violation {
                    obs.record(label, word);
                }
            }
        }
        let min = min_count.unwrap_or(self.config.lift.min_violation_count);
        let table = LiftEngine::new(min).compute(&obs);
        if table.is_empty() {
            warn!(
                scheme = scheme.name(),
                min_count = min,
                "no violation words reached the minimum count"
            );
        }
        Ok(table)
    }

    /// Role n-grams over the whole corpus as one stream.
    pub fn role_patterns(&self) -> RolePatterns {
        let roles = self.analyzer().roles(&self.words().collect::<Vec<_>>());
        RolePatterns::from_roles(&roles)
    }

    /// Paragraph-level clause coverage.
    pub fn grammar_coverage(&self) -> GrammarCoverage {
        let analyzer = self.analyzer();
        let mut coverage = GrammarCoverage::default();
        for para in self.paragraphs() {
            coverage.add(&analyzer.roles(&para.words));
        }
        coverage
    }

    /// Connector roots counted per known partition, in first-seen order.
    pub fn connector_usage(&self) -> Vec<ConnectorUsage> {
        let analyzer = self.analyzer();
        let mut out: Vec<ConnectorUsage> = Vec::new();
        for para in self.paragraphs() {
            if para.partition == UNKNOWN_PARTITION {
                continue;
            }
            let idx = match out.iter().position(|u| u.partition == para.partition) {
                Some(i) => i,
                None => {
                    out.push(ConnectorUsage {
                        partition: para.partition.clone(),
                        connectors: FrequencyTable::new(),
                    });
                    out.len() - 1
                }
            };
            for word in analyzer.parse_all(&para.words) {
                if word.role == Role::Connector {
                    out[idx].connectors.add(word.root());
                }
            }
        }
        out
    }

    /// True when at least one paragraph knows its folio. Paragraphs read
    /// from the clean corpus do not.
    pub fn has_folios(&self) -> bool {
        self.paragraphs().iter().any(|p| p.folio.is_some())
    }

    /// Interprets every paragraph, or only those of `folio`.
    pub fn translate(&self, folio: Option<&str>) -> Vec<Translation> {
        if let Some(folio) = folio {
            if !self.has_folios() {
                warn!(%folio, "corpus carries no folio ids, folio filter matches nothing");
            }
        }
        let analyzer = self.analyzer();
        let synth = Synthesizer::new(&self.lexicon, &self.config.synthesis);
        self.paragraphs()
            .iter()
            .filter(|p| folio.is_none() || p.folio.as_deref() == folio)
            .map(|para| {
                let cleaned = collapse_whitespace(&strip_inline_tags(&para.text()));
                let interpretation = if cleaned.is_empty() {
                    None
                } else {
                    let words: Vec<&str> = cleaned.split(' ').collect();
                    Some(synth.synthesize(&analyzer.parse_all(&words)))
                };
                Translation {
                    ordinal: para.ordinal,
                    folio: para.folio.clone(),
                    cleaned,
                    interpretation,
                }
            })
            .collect()
    }

    /// Searches paragraph interpretations for the configured signatures.
    ///
    /// `targets` names partitions of `scheme`; empty means all of them.
    pub fn signature_search(&self, scheme: &str, targets: &[String]) -> Result<SignatureSearch> {
        let scheme = self.config.scheme(scheme)?;
        let signatures = self.config.compile_signatures()?;
        if signatures.is_empty() {
            warn!("no signatures configured");
        }

        let labels = scheme.labels();
        let targets: Vec<String> = if targets.is_empty() {
            labels.iter().map(|l| l.to_string()).collect()
        } else {
            for t in targets {
                if !labels.contains(&t.as_str()) {
                    warn!(scheme = scheme.name(), partition = %t, "target partition not in scheme");
                }
            }
            targets.to_vec()
        };

        // translate(None) yields one entry per paragraph, in order.
        let translations = self.translate(None);
        let rendered: Vec<(&str, u32, String)> = self
            .paragraphs()
            .iter()
            .zip(&translations)
            .filter_map(|(para, t)| {
                let text = t.interpretation.as_ref()?.to_string();
                Some((Self::label_in(&scheme, para), t.ordinal, text))
            })
            .collect();

        let found = search_signatures(
            &signatures,
            &targets,
            rendered.iter().map(|(partition, ordinal, text)| ScannedText {
                ordinal: *ordinal,
                partition,
                text,
            }),
        );
        info!(
            scanned = found.scanned,
            complete = found.complete.len(),
            partial = found.partial.len(),
            "signature search done"
        );
        Ok(found)
    }

    pub fn prefix_associations(&self) -> Vec<(String, Vec<PrefixAssociation>)> {
        prefix_associations(
            self.words(),
            &self.lexicon,
            self.lexicon.prefixes(),
            self.config.lift.min_prefix_lift,
        )
    }

    pub fn suffix_contexts(&self) -> Vec<SuffixContext> {
        suffix_contexts(self.words(), &self.lexicon, self.lexicon.suffixes())
    }

    /// Per-thousand rate of each concept in each partition of `scheme`.
    ///
    /// Returns the partition labels alongside the rates.
    pub fn dialect_rates(
        &self,
        scheme: &str,
        concepts: &[String],
    ) -> Result<(Vec<String>, Vec<ConceptRate>)> {
        let scheme = self.config.scheme(scheme)?;
        let mut groups: Vec<(String, FrequencyTable)> = scheme
            .labels()
            .into_iter()
            .map(|l| (l.to_string(), FrequencyTable::new()))
            .collect();
        for para in self.paragraphs() {
            let label = Self::label_in(&scheme, para);
            let Some((_, table)) = groups.iter_mut().find(|(l, _)| l == label) else {
                continue;
            };
            for word in &para.words {
                if let Some(root) = self.lexicon.longest_root_in(word) {
                    table.add(root);
                }
            }
        }
        for (label, table) in &groups {
            if table.is_empty() {
                warn!(scheme = scheme.name(), partition = %label, "no words in partition");
            }
        }
        let rates = concept_rates(&groups, concepts);
        Ok((groups.into_iter().map(|(l, _)| l).collect(), rates))
    }

    pub fn unknown_words(&self) -> FrequencyTable {
        unknown_words(self.words(), &self.lexicon)
    }

    pub fn compound_contexts(&self, targets: &[String], window: usize) -> Vec<CompoundContext> {
        compound_contexts(self.paragraphs(), targets, window)
    }

    /// Root trigrams centred on `center`, for checking whether a root
    /// behaves like a connector.
    pub fn centered_trigrams<'a>(&'a self, center: &'a str) -> NgramTable<&'a str> {
        let roots = root_sequence(self.words(), &self.lexicon);
        count_centered_trigrams(&roots, &center)
    }

    /// Relation edges over the root stream, optionally keeping only the
    /// given connectors.
    pub fn relation_edges(&self, connectors: &[String]) -> Vec<RelationEdge> {
        let roots = root_sequence(self.words(), &self.lexicon);
        let mut edges = relation_edges(&roots, &self.lexicon);
        if !connectors.is_empty() {
            edges.retain(|e| connectors.contains(&e.connector));
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::loader::load_tagged_corpus;

    const CONFIG: &str = r#"
[lexicon]
roots = "roots.txt"
connectors = "connectors.txt"
prefixes = "prefixes.txt"
subject_suffixes = "subject.txt"
object_suffixes = "object.txt"

[lift]
min_global_count = 1
min_violation_count = 1

[[schemes]]
name = "section"
partitions = [
    { name = "Herbal", range = [1, 66] },
    { name = "Astrological", range = [67, 73] },
]

[[signatures]]
name = "HEATED ESSENCE"
terms = [["Heat/Energy"], ["Essence"]]
"#;

    fn session(corpus: &str) -> Session {
        let config = GlossaConfig::parse(CONFIG, Path::new(".")).unwrap();
        let lexicon = Lexicon::builder()
            .root("ro", "Essence")
            .root("che", "Substance")
            .root("ot", "Heat/Energy")
            .connector("s", "is")
            .connector("k", "is fixed in")
            .prefix("qo")
            .subject_suffix("y")
            .subject_suffix("dy")
            .object_suffix("in")
            .build();
        let scheme = config.scheme("section").unwrap();
        let corpus = load_tagged_corpus(corpus, &scheme);
        Session::new(config, lexicon, corpus)
    }

    const CORPUS: &str = "\
<f1r>
ot rody s chein
qoky rody
<f67r1>
chein chein s
<f74r>
rody qoky
";

    #[test]
    fn thematic_lift_ignores_unknown_partition_words() {
        let s = session(CORPUS);
        let table = s.thematic_lift("section", None).unwrap();
        assert_eq!(table.partitions, ["Herbal", "Astrological"]);
        // 9 words in known partitions, 6 of them Herbal; the f74r "rody"
        // is not counted
        let ro = table.row("ro").unwrap();
        assert_eq!(ro.global_count, 2);
        assert!((ro.lifts[0] - (2.0 / 6.0) / (2.0 / 9.0)).abs() < 1e-9);
        assert_eq!(ro.lifts[1], 0.0);
    }

    #[test]
    fn violation_lift_uses_all_words_globally() {
        let s = session(CORPUS);
        let table = s.violation_lift("section", None).unwrap();
        let row = table.row("qoky").unwrap();
        // one counted occurrence in Herbal; the f74r one is outside the scheme
        assert_eq!(row.global_count, 1);
        assert!((row.lifts[0] - (1.0 / 6.0) / (1.0 / 11.0)).abs() < 1e-9);
    }

    #[test]
    fn unknown_scheme_is_an_error() {
        let s = session(CORPUS);
        assert!(s.thematic_lift("dialect", None).is_err());
    }

    #[test]
    fn coverage_and_connectors() {
        let s = session(CORPUS);
        let cov = s.grammar_coverage();
        assert_eq!(cov.paragraphs, 4);
        assert_eq!(cov.full_sentences, 1);

        let usage = s.connector_usage();
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].partition, "Herbal");
        assert_eq!(usage[0].connectors.get("s"), 1);
        assert_eq!(usage[1].connectors.get("s"), 1);
    }

    #[test]
    fn translate_single_folio() {
        let s = session(CORPUS);
        let out = s.translate(Some("f1r"));
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0].interpretation.as_ref().unwrap().to_string(),
            "The Heat/Energy Essence is the Substance."
        );
        assert_eq!(s.translate(None).len(), 4);
    }

    #[test]
    fn translate_skips_paragraphs_empty_after_cleaning() {
        let s = session("<f1r>\n<@Ha> <@L>\n");
        let out = s.translate(None);
        assert_eq!(out.len(), 1);
        assert!(out[0].interpretation.is_none());
        assert!(out[0].cleaned.is_empty());
    }

    #[test]
    fn folio_filter_on_clean_corpus_matches_nothing() {
        let s = session(CORPUS);
        assert!(s.has_folios());

        let mut clean = session(CORPUS);
        for p in &mut clean.corpus.paragraphs {
            p.folio = None;
        }
        assert!(!clean.has_folios());
        assert!(clean.translate(Some("f1r")).is_empty());
        assert_eq!(clean.translate(None).len(), 4);
    }

    #[test]
    fn signature_search_over_translations() {
        let s = session(CORPUS);
        let found = s.signature_search("section", &[]).unwrap();
        assert_eq!(found.partitions, ["Herbal", "Astrological"]);
        // f74r is outside the scheme
        assert_eq!(found.scanned, 3);

        assert_eq!(found.complete.len(), 1);
        let hit = &found.complete[0];
        assert_eq!(hit.ordinal, 0);
        assert_eq!(hit.partition, "Herbal");
        assert_eq!(hit.text, "The Heat/Energy Essence is the Substance.");
        assert_eq!(hit.matched, ["Heat/Energy", "Essence"]);

        assert_eq!(found.partial.len(), 1);
        assert_eq!(found.partial[0].ordinal, 1);
        assert_eq!(found.partial[0].matched, ["Essence"]);

        let astro = s
            .signature_search("section", &["Astrological".to_string()])
            .unwrap();
        assert_eq!(astro.scanned, 1);
        assert!(astro.complete.is_empty() && astro.partial.is_empty());
    }

    #[test]
    fn dialect_rates_per_partition() {
        let s = session(CORPUS);
        let (labels, rates) = s.dialect_rates("section", &["che".to_string()]).unwrap();
        assert_eq!(labels, ["Herbal", "Astrological"]);
        // Herbal roots: ot ro s che k ro
        assert!((rates[0].per_thousand[0] - 1000.0 / 6.0).abs() < 1e-9);
        // Astrological roots: che che s
        assert!((rates[0].per_thousand[1] - 2000.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn relation_edges_filtered_by_connector() {
        let s = session(CORPUS);
        assert!(!s.relation_edges(&[]).is_empty());
        let only_s = s.relation_edges(&["s".to_string()]);
        assert!(only_s.iter().all(|e| e.connector == "s"));
        assert!(s.relation_edges(&["r".to_string()]).is_empty());
    }

    #[test]
    fn trigrams_around_a_root() {
        let s = session(CORPUS);
        // roots: ot ro s che k ro che che s ro k
        let t = s.centered_trigrams("k");
        assert_eq!(t.total(), 1);
        assert_eq!(t.get(&["che", "k", "ro"]), 1);
        assert!(s.centered_trigrams("zz").is_empty());
    }
}
