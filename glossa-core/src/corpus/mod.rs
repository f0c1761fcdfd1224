//! Corpus ingestion and export.

pub mod clean;
pub mod export;
pub mod loader;

pub use clean::{CleanerConfig, TranscriptionCleaner};
pub use loader::{
    load_clean_corpus, load_clean_corpus_files, load_tagged_corpus, LoadStats, LoadedCorpus,
    PartitionMap, TranscriptionLoader,
};
