//! Writers for the derived corpus files.
//!
//! Each writer produces the exact text its loader in
//! [`loader`](super::loader) reads back.

use std::path::Path;

use glossa_types::Paragraph;

use crate::corpus::loader::PartitionMap;
use crate::error::{write_file, Result};

/// One paragraph per line.
pub fn clean_corpus_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(Paragraph::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ordinal to partition label.
pub fn partition_map(paragraphs: &[Paragraph]) -> PartitionMap {
    paragraphs
        .iter()
        .map(|p| (p.ordinal.to_string(), p.partition.clone()))
        .collect()
}

/// `<folio>` header lines followed by that folio's paragraphs.
///
/// Paragraphs without a folio are written under no header.
pub fn tagged_corpus_text(paragraphs: &[Paragraph]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(paragraphs.len() * 2);
    let mut current: Option<&str> = None;
    for p in paragraphs {
        if let Some(folio) = p.folio.as_deref() {
            if current != Some(folio) {
                lines.push(format!("<{folio}>"));
                current = Some(folio);
            }
        }
        lines.push(p.text());
    }
    lines.join("\n")
}

/// Writes the clean corpus, its partition map and the folio-tagged corpus.
pub fn write_all(
    paragraphs: &[Paragraph],
    clean: &Path,
    map: &Path,
    tagged: &Path,
) -> Result<()> {
    write_file(clean, &clean_corpus_text(paragraphs))?;
    let json = serde_json::to_string_pretty(&partition_map(paragraphs))?;
    write_file(map, &json)?;
    write_file(tagged, &tagged_corpus_text(paragraphs))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::loader::{load_clean_corpus, load_tagged_corpus};
    use crate::partition::PartitionScheme;
    use glossa_types::{Partition, PartitionRule};
    use pretty_assertions::assert_eq;

    fn paragraphs() -> Vec<Paragraph> {
        let p = |ordinal, folio: &str, partition: &str, words: &[&str]| Paragraph {
            ordinal,
            folio: Some(folio.into()),
            partition: partition.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
        };
        vec![
            p(0, "f1r", "Herbal", &["fachys", "ykal"]),
            p(1, "f1r", "Herbal", &["sory", "o<->r"]),
            p(2, "f70v", "Astrological", &["otaiin"]),
        ]
    }

    #[test]
    fn clean_corpus_reloads_identically() {
        let paras = paragraphs();
        let text = clean_corpus_text(&paras);
        let map = partition_map(&paras);
        let reloaded = load_clean_corpus(&text, &map);
        for (a, b) in paras.iter().zip(&reloaded.paragraphs) {
            assert_eq!(a.words, b.words);
            assert_eq!(a.partition, b.partition);
            assert_eq!(a.ordinal, b.ordinal);
        }
        assert_eq!(reloaded.paragraphs.len(), paras.len());
    }

    #[test]
    fn tagged_corpus_reloads_identically() {
        let scheme = PartitionScheme::new(
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
        );
        let paras = paragraphs();
        let text = tagged_corpus_text(&paras);
        assert_eq!(text, "<f1r>\nfachys ykal\nsory o<->r\n<f70v>\notaiin");
        let reloaded = load_tagged_corpus(&text, &scheme);
        assert_eq!(reloaded.paragraphs, paras);
    }

    #[test]
    fn writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let clean = dir.path().join("clean.txt");
        let map = dir.path().join("map.json");
        let tagged = dir.path().join("tagged.txt");
        write_all(&paragraphs(), &clean, &map, &tagged).unwrap();

        let json: PartitionMap =
            serde_json::from_str(&std::fs::read_to_string(&map).unwrap()).unwrap();
        assert_eq!(json.get("2").map(String::as_str), Some("Astrological"));
        assert!(std::fs::read_to_string(&tagged).unwrap().starts_with("<f1r>"));
    }
}
