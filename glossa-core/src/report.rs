//! Report Rendering
//!
//! Turns analysis results into the text that the command line writes out.
//!
//! ## What It Does
//!
//! Lift tables are written as CSV, one row per unit:
//!
//! ```text
//! Root,Concept,Total_Freq,Lift_Herbal,Lift_Astrological
//! ro,Essence,12,1.00,0.46
//! ```
//!
//! Every other analysis renders as a plain text report through `Display`:
//! an 80-column banner, ranked listings with counts and percentages, and a
//! closing `END OF REPORT` banner. Empty results are reported in place,
//! never as errors.
//!
//! ## Usage
//!
//! Reports borrow their data, so building one is free and rendering is a
//! single `to_string()`:
//!
//! ```ignore
//! let edges = session.relation_edges(&[]);
//! let text = GraphReport { edges: &edges, lexicon: &session.lexicon, top: 50 }.to_string();
//! ```

use std::fmt;
use std::io;

use glossa_types::Role;

use crate::analyzer::ngram::NgramTable;
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::session::{ConnectorUsage, Translation};
use crate::signature::SignatureSearch;
use crate::stats::context::{CompoundContext, ConceptRate, PrefixAssociation, SuffixContext};
use crate::stats::{FrequencyTable, GrammarCoverage, LiftTable, RelationEdge, RolePatterns};

const WIDTH: usize = 80;

fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(WIDTH))
}

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    rule(f)?;
    writeln!(f, "{title:^WIDTH$}")?;
    rule(f)
}

fn footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f)?;
    rule(f)?;
    writeln!(f, "{:^WIDTH$}", "END OF REPORT")?;
    rule(f)
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n--- {title} ---")
}

fn ranked_list(f: &mut fmt::Formatter<'_>, items: &[(&str, u64)], unit: &str) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "  None");
    }
    for (item, count) in items {
        writeln!(f, "  {item:<15} ({count} {unit})")?;
    }
    Ok(())
}

fn join_gram<T: fmt::Display>(gram: &[T]) -> String {
    gram.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Writes a lift table as CSV.
///
/// Columns: `unit_header`, `Concept` (only with a lexicon), `Total_Freq`,
/// then one `Lift_<partition>` column per partition, two decimals.
pub fn write_lift_csv<W: io::Write>(
    table: &LiftTable,
    glosses: Option<&Lexicon>,
    unit_header: &str,
    out: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header: Vec<String> = vec![unit_header.to_string()];
    if glosses.is_some() {
        header.push("Concept".into());
    }
    header.push("Total_Freq".into());
    header.extend(table.partitions.iter().map(|p| format!("Lift_{p}")));
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.unit.clone());
        if let Some(lex) = glosses {
            record.push(lex.gloss(&row.unit).unwrap_or_default().to_string());
        }
        record.push(row.global_count.to_string());
        record.extend(row.lifts.iter().map(|l| format!("{l:.2}")));
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// [`write_lift_csv`] into a string.
pub fn lift_csv(table: &LiftTable, glosses: Option<&Lexicon>, unit_header: &str) -> Result<String> {
    let mut buf = Vec::new();
    write_lift_csv(table, glosses, unit_header, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Role patterns, clause coverage and connector usage.
pub struct PatternReport<'a> {
    pub patterns: &'a RolePatterns,
    pub coverage: GrammarCoverage,
    pub usage: &'a [ConnectorUsage],
    pub lexicon: &'a Lexicon,
    pub top: usize,
}

impl PatternReport<'_> {
    fn grams(&self, f: &mut fmt::Formatter<'_>, table: &NgramTable<Role>) -> fmt::Result {
        if table.is_empty() {
            return writeln!(f, "  No patterns found.");
        }
        for (gram, count) in table.top(self.top) {
            writeln!(
                f,
                "  {:<40} {:>6} ({:.2}%)",
                join_gram(gram),
                count,
                table.percent(count)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for PatternReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "SYNTAX PATTERN REPORT")?;
        writeln!(f, "Words analyzed: {}", self.patterns.words)?;

        section(f, "Clause Coverage")?;
        let cov = &self.coverage;
        writeln!(f, "Total paragraphs analyzed: {}", cov.paragraphs)?;
        writeln!(
            f,
            "SUBJECT -> CONNECTOR -> OBJECT in {} paragraphs ({:.2}%)",
            cov.full_sentences,
            cov.percent(cov.full_sentences)
        )?;
        writeln!(
            f,
            "CONNECTOR -> OBJECT in {} paragraphs ({:.2}%)",
            cov.connector_object,
            cov.percent(cov.connector_object)
        )?;

        section(f, &format!("Top {} Role Bigrams", self.top))?;
        self.grams(f, &self.patterns.bigrams)?;
        section(f, &format!("Top {} Role Trigrams", self.top))?;
        self.grams(f, &self.patterns.trigrams)?;

        section(f, "Connectors by Partition")?;
        if self.usage.is_empty() {
            writeln!(f, "  No partitioned paragraphs.")?;
        }
        for usage in self.usage {
            writeln!(f, "{}:", usage.partition)?;
            if usage.connectors.is_empty() {
                writeln!(f, "  No connectors found.")?;
                continue;
            }
            for (connector, count) in usage.connectors.top(5) {
                let gloss = self.lexicon.gloss(connector).unwrap_or(connector);
                writeln!(f, "  - '{connector}' ({gloss}): {count} occurrences")?;
            }
        }
        footer(f)
    }
}

/// Root trigrams centred on one root.
pub struct CenteredReport<'a, 'r> {
    pub center: &'a str,
    pub table: &'a NgramTable<&'r str>,
    pub top: usize,
}

impl fmt::Display for CenteredReport<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, &format!("TRIGRAMS CENTRED ON '{}'", self.center))?;
        writeln!(
            f,
            "Found {} unique '[Concept] -> {} -> [Concept]' patterns.",
            self.table.len(),
            self.center
        )?;
        if self.table.is_empty() {
            writeln!(f, "'{}' does not behave like a connector.", self.center)?;
            return footer(f);
        }
        writeln!(f, "\nFrequency | Pattern")?;
        writeln!(f, "{}", "-".repeat(50))?;
        for (gram, count) in self.table.top(self.top) {
            writeln!(f, "{count:<9} | {}", join_gram(gram))?;
        }
        if self.table.len() > self.top {
            writeln!(f, "...")?;
        }
        footer(f)
    }
}

/// Paragraph interpretations.
pub struct TranslationReport<'a> {
    /// Folio the paragraphs were taken from, `None` for the whole corpus.
    pub folio: Option<&'a str>,
    pub translations: &'a [Translation],
}

impl fmt::Display for TranslationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.folio {
            Some(folio) => banner(f, &format!("INTERPRETATION OF FOLIO {folio}"))?,
            None => banner(f, "INTERPRETATION OF ALL PARAGRAPHS")?,
        }
        if self.translations.is_empty() {
            writeln!(f, "\nNo paragraphs found.")?;
        }
        for (i, t) in self.translations.iter().enumerate() {
            writeln!(f, "\n--- Paragraph {} ---", i + 1)?;
            if self.folio.is_none() {
                if let Some(folio) = &t.folio {
                    writeln!(f, "Folio: {folio}")?;
                }
            }
            writeln!(f, "Original Cleaned: {}", t.cleaned)?;
            match &t.interpretation {
                Some(interp) => writeln!(f, "Translation: {interp}")?,
                None => writeln!(f, "Translation: [Skipped: Line empty after cleaning EVA tags]")?,
            }
        }
        footer(f)
    }
}

/// Roots over-represented after each prefix.
pub struct PrefixReport<'a> {
    pub results: &'a [(String, Vec<PrefixAssociation>)],
    pub top: usize,
}

impl fmt::Display for PrefixReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "PREFIX FUNCTION ANALYSIS")?;
        if self.results.is_empty() {
            writeln!(f, "\nNo prefixed words found.")?;
        }
        for (prefix, found) in self.results {
            section(f, &format!("Prefix '{prefix}-'"))?;
            if found.is_empty() {
                writeln!(f, "No significant root associations found.")?;
                continue;
            }
            writeln!(
                f,
                "Lift Score | Associated Root   | Occurrences in Context | Frequency in Context"
            )?;
            writeln!(f, "{}", "-".repeat(74))?;
            for a in found.iter().take(self.top) {
                writeln!(
                    f,
                    "{:<11.2}| {:<17} | {:<22} | {:.2}%",
                    a.lift, a.root, a.context_count, a.context_percent
                )?;
            }
        }
        footer(f)
    }
}

/// Roots around suffixed words.
pub struct SuffixReport<'a> {
    pub contexts: &'a [SuffixContext],
    pub top: usize,
}

impl fmt::Display for SuffixReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "SUFFIX CONTEXT ANALYSIS")?;
        for ctx in self.contexts {
            writeln!(f, "\n\nSuffix '...{}'", ctx.suffix)?;
            section(f, &format!("Top {} Associated Roots", self.top))?;
            ranked_list(f, &ctx.associated.top(self.top), "occurrences")?;
            section(f, &format!("Top {} Preceding Roots", self.top))?;
            ranked_list(f, &ctx.preceded_by.top(self.top), "occurrences")?;
            section(f, &format!("Top {} Following Roots", self.top))?;
            ranked_list(f, &ctx.followed_by.top(self.top), "occurrences")?;
        }
        footer(f)
    }
}

/// Concept rates per partition.
pub struct DialectReport<'a> {
    pub scheme: &'a str,
    pub labels: &'a [String],
    pub rates: &'a [ConceptRate],
    pub lexicon: &'a Lexicon,
}

impl fmt::Display for DialectReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, &format!("CONCEPT RATES BY {}", self.scheme.to_uppercase()))?;
        writeln!(f, "Occurrences per 1000 root-bearing words.\n")?;
        write!(f, "{:<8} {:<32}", "Root", "Concept")?;
        for label in self.labels {
            write!(f, " {label:>14}")?;
        }
        writeln!(f)?;
        for rate in self.rates {
            let gloss = self.lexicon.gloss(&rate.concept).unwrap_or("-");
            write!(f, "{:<8} {:<32}", rate.concept, gloss)?;
            for value in &rate.per_thousand {
                write!(f, " {value:>14.2}")?;
            }
            writeln!(f)?;
        }
        footer(f)
    }
}

/// Words carrying no known root.
pub struct UnknownReport<'a> {
    pub table: &'a FrequencyTable,
    pub known_roots: usize,
    pub top: usize,
}

impl fmt::Display for UnknownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "ANALYSIS OF UNKNOWN WORDS")?;
        writeln!(f, "Compared against {} known roots", self.known_roots)?;
        writeln!(f, "Unknown tokens: {}", self.table.total())?;
        writeln!(f, "Unique unknown words: {}", self.table.len())?;
        section(f, &format!("Top {} Most Frequent Unknown Words", self.top))?;
        if self.table.is_empty() {
            writeln!(f, "  No unknown words found.")?;
        }
        for (word, count) in self.table.top(self.top) {
            writeln!(f, "  - {word} : {count} occurrences")?;
        }
        footer(f)
    }
}

/// Neighbourhoods of compound words.
pub struct ContextReport<'a> {
    pub contexts: &'a [CompoundContext],
    pub lexicon: &'a Lexicon,
    pub window: usize,
    /// Neighbours seen fewer times are not listed.
    pub min_freq: u64,
    pub top: usize,
}

impl ContextReport<'_> {
    fn neighbours(&self, table: &FrequencyTable) -> String {
        let listed: Vec<String> = table
            .top(self.top)
            .into_iter()
            .filter(|&(_, c)| c >= self.min_freq)
            .map(|(w, c)| format!("'{w}' ({c})"))
            .collect();
        if listed.is_empty() {
            "None frequent enough".to_string()
        } else {
            listed.join(", ")
        }
    }
}

impl fmt::Display for ContextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "CONTEXT ANALYSIS - COMPOUND ROOTS")?;
        if self.contexts.is_empty() {
            writeln!(f, "\nNone of the target words occur in the corpus.")?;
        }
        for ctx in self.contexts {
            section(f, &format!("Compound Root: '{}'", ctx.target))?;
            let meaning = self.lexicon.gloss(&ctx.target).unwrap_or("No gloss");
            writeln!(f, "  Gloss: {meaning}")?;
            writeln!(f, "  Total Occurrences: {}", ctx.count)?;
            match ctx.dominant_partition() {
                Some((p, n)) => writeln!(f, "  Dominant Partition: {p} ({n} times)")?,
                None => writeln!(f, "  Dominant Partition: N/A")?,
            }
            writeln!(
                f,
                "  Most Common Preceding ({} words, min freq {}): {}",
                self.window,
                self.min_freq,
                self.neighbours(&ctx.before)
            )?;
            writeln!(
                f,
                "  Most Common Succeeding ({} words, min freq {}): {}",
                self.window,
                self.min_freq,
                self.neighbours(&ctx.after)
            )?;
        }
        footer(f)
    }
}

/// Relation edges as a ranked list.
pub struct GraphReport<'a> {
    pub edges: &'a [RelationEdge],
    pub lexicon: &'a Lexicon,
    pub top: usize,
}

impl fmt::Display for GraphReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "CONCEPT RELATION GRAPH")?;
        writeln!(f, "Distinct relations: {}", self.edges.len())?;
        if self.edges.is_empty() {
            writeln!(f, "\nNo relations found.")?;
            return footer(f);
        }
        writeln!(f)?;
        for edge in self.edges.iter().take(self.top) {
            let verb = self.lexicon.gloss(&edge.connector).unwrap_or(&edge.connector);
            writeln!(
                f,
                "  {:>5}  {} --[{}]--> {}",
                edge.count, edge.source, verb, edge.target
            )?;
        }
        footer(f)
    }
}

/// Complete and partial signature matches, summarised per partition.
pub struct SignatureReport<'a> {
    pub search: &'a SignatureSearch,
    /// Partial matches listed per partition.
    pub partial_limit: usize,
}

impl fmt::Display for SignatureReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let search = self.search;
        banner(f, "SIGNATURE SEARCH")?;
        writeln!(
            f,
            "Scanned {} paragraphs in: {}",
            search.scanned,
            search.partitions.join(", ")
        )?;
        writeln!(f)?;

        for hit in &search.complete {
            rule(f)?;
            writeln!(f, "  MATCH FOUND: {} (Partition: {})", hit.signature, hit.partition)?;
            writeln!(f, "  Paragraph Index: {}", hit.ordinal)?;
            rule(f)?;
            writeln!(f, "Translation: {}\n", hit.text)?;
        }
        writeln!(f, "Found {} complete matches.", search.complete.len())?;

        section(f, "Matches by Signature per Partition")?;
        for partition in &search.partitions {
            let counts = search.counts(partition);
            if counts.is_empty() {
                writeln!(f, "\n{partition}: no complete matches.")?;
                continue;
            }
            writeln!(f, "\n{partition}:")?;
            for (name, count) in counts.ranked() {
                writeln!(f, "  - {name}: {count} matches")?;
            }
        }

        if !search.partial.is_empty() {
            section(
                f,
                &format!("Partial Matches (at most {} per partition)", self.partial_limit),
            )?;
            for partition in &search.partitions {
                let mut partial = search.partial_in(partition).take(self.partial_limit).peekable();
                if partial.peek().is_none() {
                    continue;
                }
                writeln!(f, "\n{partition}:")?;
                for hit in partial {
                    writeln!(
                        f,
                        "Paragraph {}: {} - Matched: {}",
                        hit.ordinal,
                        hit.signature,
                        hit.matched.join(", ")
                    )?;
                    writeln!(f, "Translation: {}\n", hit.text)?;
                }
            }
        }
        footer(f)
    }
}
