//! Glossa command line
//!
//! Runs one analysis over a transcription corpus and writes its report.
//!
//! ## Usage
//!
//! ```bash
//! # Clean the transcription and write the derived corpus files
//! glossa --input data/sample_transcription.txt segment --dir out/
//!
//! # Root lift by section, as CSV
//! glossa --input data/sample_transcription.txt lift --scheme section -o lift.csv
//!
//! # Same, from the clean corpus written by `segment`
//! glossa --clean out/clean_corpus.txt --partition-map out/partition_map.json lift
//!
//! # Interpret one folio
//! glossa --input data/sample_transcription.txt translate --folio f1r
//!
//! # Configured signatures in the Herbal and Recipes sections
//! glossa --input data/sample_transcription.txt signatures --partition Herbal --partition Recipes
//! ```
//!
//! Every command loads the corpus, runs the full analysis, renders the
//! report and only then writes it, to `--output` or stdout. Logs go to
//! stderr; `RUST_LOG` overrides the level, `-v` raises the default to
//! `debug`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use glossa_core::config::GlossaConfig;
use glossa_core::corpus::export;
use glossa_core::report::{
    lift_csv, CenteredReport, ContextReport, DialectReport, GraphReport, PatternReport,
    PrefixReport, SignatureReport, SuffixReport, TranslationReport, UnknownReport,
};
use glossa_core::session::{
    CorpusSource, Session, DEFAULT_COMPOUND_TARGETS, DEFAULT_DIALECT_CONCEPTS,
    DEFAULT_GRAPH_CONNECTORS,
};

#[derive(Parser)]
#[command(name = "glossa")]
#[command(version)]
#[command(about = "Segmentation, role tagging and lift statistics for transcription corpora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, short, global = true, default_value = "data/glossa.toml")]
    config: PathBuf,

    /// Tagged transcription to analyze
    #[arg(long, short, global = true, default_value = "data/sample_transcription.txt")]
    input: PathBuf,

    /// Read a clean corpus instead of the transcription
    #[arg(long, global = true, requires = "partition_map")]
    clean: Option<PathBuf>,

    /// Partition map for --clean
    #[arg(long, global = true, requires = "clean")]
    partition_map: Option<PathBuf>,

    /// Scheme used to label transcription paragraphs
    #[arg(long, global = true, default_value = "section")]
    label_scheme: String,

    /// Report file (stdout if not provided)
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LiftUnit {
    /// Longest root contained in each word
    Roots,
    /// Whole words with a prefix on a connector
    Violations,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the clean corpus, partition map and folio-tagged corpus
    Segment {
        /// Directory for the three files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Lift of roots or violation words per partition, as CSV
    Lift {
        #[arg(long, default_value = "section")]
        scheme: String,

        #[arg(long, value_enum, default_value = "roots")]
        unit: LiftUnit,

        /// Drop units seen fewer times globally (config value if omitted)
        #[arg(long)]
        min_count: Option<u64>,
    },

    /// Role n-grams and clause coverage, or trigrams around one root
    Patterns {
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Report root trigrams centred on this root instead
        #[arg(long)]
        connector: Option<String>,
    },

    /// Interpret paragraphs as sentences
    Translate {
        /// Only paragraphs of this folio
        #[arg(long)]
        folio: Option<String>,
    },

    /// Roots associated with each prefix
    Prefixes {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Roots around words carrying each suffix
    Suffixes {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Per-thousand concept rates across a scheme's partitions
    Dialect {
        #[arg(long, default_value = "dialect")]
        scheme: String,

        /// Roots to compare (repeatable)
        #[arg(long)]
        concept: Vec<String>,
    },

    /// Words containing no known root
    Unknown {
        #[arg(long, default_value_t = 50)]
        top: usize,
    },

    /// Neighbourhoods of compound words
    Context {
        /// Target words (repeatable)
        #[arg(long)]
        target: Vec<String>,

        #[arg(long, default_value_t = 3)]
        window: usize,

        /// Hide neighbours seen fewer times
        #[arg(long, default_value_t = 2)]
        min_freq: u64,
    },

    /// Source, connector and target relations between roots
    Graph {
        /// Connectors to keep (repeatable)
        #[arg(long)]
        connector: Vec<String>,

        #[arg(long, default_value_t = 50)]
        top: usize,
    },

    /// Configured concept signatures in paragraph interpretations
    Signatures {
        #[arg(long, default_value = "section")]
        scheme: String,

        /// Partitions to scan (repeatable, all labels if omitted)
        #[arg(long)]
        partition: Vec<String>,

        /// Partial matches listed per partition
        #[arg(long, default_value_t = 10)]
        partial: usize,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

fn or_defaults(given: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if given.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        given
    }
}

fn emit(output: Option<&Path>, body: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => io::stdout()
            .lock()
            .write_all(body.as_bytes())
            .context("writing report to stdout")?,
    }
    Ok(())
}

fn open_session(cli: &Cli) -> anyhow::Result<Session> {
    let config = GlossaConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let source = match (&cli.clean, &cli.partition_map) {
        (Some(corpus), Some(map)) => CorpusSource::Clean { corpus, map },
        (None, None) => CorpusSource::Transcription {
            path: &cli.input,
            scheme: &cli.label_scheme,
        },
        _ => bail!("--clean and --partition-map must be given together"),
    };
    Session::open(config, source).context("loading corpus")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let session = open_session(&cli)?;
    let output = cli.output.as_deref();
    let lexicon = &session.lexicon;

    let body = match cli.command {
        Commands::Segment { dir } => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            let paragraphs = session.paragraphs();
            export::write_all(
                paragraphs,
                &dir.join("clean_corpus.txt"),
                &dir.join("partition_map.json"),
                &dir.join("tagged_corpus.txt"),
            )
            .context("writing corpus files")?;
            format!("{}\n", session.corpus.stats)
        }
        Commands::Lift {
            scheme,
            unit,
            min_count,
        } => match unit {
            LiftUnit::Roots => {
                let table = session.thematic_lift(&scheme, min_count)?;
                lift_csv(&table, Some(lexicon), "Root")?
            }
            LiftUnit::Violations => {
                let table = session.violation_lift(&scheme, min_count)?;
                lift_csv(&table, None, "Word")?
            }
        },
        Commands::Patterns { top, connector } => match connector {
            Some(center) => {
                let table = session.centered_trigrams(&center);
                let report = CenteredReport {
                    center: &center,
                    table: &table,
                    top,
                };
                report.to_string()
            }
            None => PatternReport {
                patterns: &session.role_patterns(),
                coverage: session.grammar_coverage(),
                usage: &session.connector_usage(),
                lexicon,
                top,
            }
            .to_string(),
        },
        Commands::Translate { folio } => {
            let translations = session.translate(folio.as_deref());
            let report = TranslationReport {
                folio: folio.as_deref(),
                translations: &translations,
            };
            report.to_string()
        }
        Commands::Prefixes { top } => PrefixReport {
            results: &session.prefix_associations(),
            top,
        }
        .to_string(),
        Commands::Suffixes { top } => SuffixReport {
            contexts: &session.suffix_contexts(),
            top,
        }
        .to_string(),
        Commands::Dialect { scheme, concept } => {
            let concepts = or_defaults(concept, DEFAULT_DIALECT_CONCEPTS);
            let (labels, rates) = session.dialect_rates(&scheme, &concepts)?;
            let report = DialectReport {
                scheme: &scheme,
                labels: &labels,
                rates: &rates,
                lexicon,
            };
            report.to_string()
        }
        Commands::Unknown { top } => UnknownReport {
            table: &session.unknown_words(),
            known_roots: lexicon.root_count(),
            top,
        }
        .to_string(),
        Commands::Context {
            target,
            window,
            min_freq,
        } => {
            let targets = or_defaults(target, DEFAULT_COMPOUND_TARGETS);
            ContextReport {
                contexts: &session.compound_contexts(&targets, window),
                lexicon,
                window,
                min_freq,
                top: 5,
            }
            .to_string()
        }
        Commands::Graph { connector, top } => {
            let connectors = or_defaults(connector, DEFAULT_GRAPH_CONNECTORS);
            GraphReport {
                edges: &session.relation_edges(&connectors),
                lexicon,
                top,
            }
            .to_string()
        }
        Commands::Signatures {
            scheme,
            partition,
            partial,
        } => {
            let search = session.signature_search(&scheme, &partition)?;
            SignatureReport {
                search: &search,
                partial_limit: partial,
            }
            .to_string()
        }
    };

    emit(output, &body)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}
