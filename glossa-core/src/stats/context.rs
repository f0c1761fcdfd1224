//! Context Statistics
//!
//! Analyses of what surrounds words in root-tagged word streams.
//!
//! ## What It Does
//!
//! Each word is tagged with the longest root it contains (see
//! [`Lexicon::longest_root_in`]). Words with no root drop out of the tagged
//! stream.
//!
//! ```text
//! qochey daiin shol xs   ->   che ol s
//! ```
//!
//! On top of that stream:
//!
//! - [`prefix_associations`]: roots over-represented among words starting
//!   with a prefix, by lift against all words.
//! - [`suffix_contexts`]: roots of words ending with a suffix, and of their
//!   tagged neighbours.
//! - [`compound_contexts`]: words within a window of target words in the
//!   same paragraph, and the partition the targets mostly occur in.
//! - [`unknown_words`]: words that are neither a root nor contain one.
//! - [`concept_rates`]: per-thousand rates of chosen roots per group.
//!
//! ## Usage
//!
//! ```
//! use glossa_core::stats::context::root_sequence;
//! use glossa_core::Lexicon;
//!
//! let lexicon = Lexicon::builder()
//!     .root("che", "Substance")
//!     .root("ol", "Potency")
//!     .connector("s", "is")
//!     .build();
//! let roots = root_sequence(["qochey", "daiin", "shol", "xs"], &lexicon);
//! assert_eq!(roots, ["che", "ol", "s"]);
//! ```

use glossa_types::{Paragraph, UNKNOWN_PARTITION};

use crate::lexicon::Lexicon;
use crate::stats::frequency::FrequencyTable;
use crate::stats::lift::lift_ratio;

/// `(word, root)` for every word that contains a root.
pub fn tag_roots<'w, 'l, I>(words: I, lexicon: &'l Lexicon) -> Vec<(&'w str, &'l str)>
where
    I: IntoIterator<Item = &'w str>,
{
    words
        .into_iter()
        .filter_map(|w| lexicon.longest_root_in(w).map(|r| (w, r)))
        .collect()
}

/// Roots only, in word order.
pub fn root_sequence<'w, 'l, I>(words: I, lexicon: &'l Lexicon) -> Vec<&'l str>
where
    I: IntoIterator<Item = &'w str>,
{
    tag_roots(words, lexicon).into_iter().map(|(_, r)| r).collect()
}

/// A root over-represented among words starting with a prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixAssociation {
    pub prefix: String,
    pub root: String,
    pub lift: f64,
    /// Occurrences of the root in prefixed words.
    pub context_count: u64,
    /// Share of the root among roots of prefixed words, in percent.
    pub context_percent: f64,
}

/// For each prefix, the roots whose lift among prefixed words exceeds
/// `min_lift`, strongest first. The baseline is the root distribution of
/// the whole stream.
pub fn prefix_associations<'w, I>(
    words: I,
    lexicon: &Lexicon,
    prefixes: &[String],
    min_lift: f64,
) -> Vec<(String, Vec<PrefixAssociation>)>
where
    I: IntoIterator<Item = &'w str>,
{
    let tagged = tag_roots(words, lexicon);
    let baseline: FrequencyTable = tagged.iter().map(|(_, r)| *r).collect();

    prefixes
        .iter()
        .filter_map(|prefix| {
            let context: FrequencyTable = tagged
                .iter()
                .filter(|(w, _)| w.starts_with(prefix.as_str()))
                .map(|(_, r)| *r)
                .collect();
            if context.is_empty() {
                return None;
            }
            let mut found: Vec<PrefixAssociation> = context
                .iter()
                .filter_map(|(root, count)| {
                    let lift = lift_ratio(
                        count,
                        context.total(),
                        baseline.get(root),
                        baseline.total(),
                    );
                    (lift > min_lift).then(|| PrefixAssociation {
                        prefix: prefix.clone(),
                        root: root.to_string(),
                        lift,
                        context_count: count,
                        context_percent: context.relative(root) * 100.0,
                    })
                })
                .collect();
            found.sort_by(|a, b| b.lift.total_cmp(&a.lift).then_with(|| a.root.cmp(&b.root)));
            Some((prefix.clone(), found))
        })
        .collect()
}

/// Roots seen with, before and after words ending in a suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixContext {
    pub suffix: String,
    /// Roots of the suffixed words themselves.
    pub associated: FrequencyTable,
    /// Roots of the previous tagged word.
    pub preceded_by: FrequencyTable,
    /// Roots of the next tagged word.
    pub followed_by: FrequencyTable,
}

/// Suffix context over the tagged stream. Neighbours are adjacent
/// root-bearing words; words without a root are skipped.
pub fn suffix_contexts<'w, I>(words: I, lexicon: &Lexicon, suffixes: &[String]) -> Vec<SuffixContext>
where
    I: IntoIterator<Item = &'w str>,
{
    let tagged = tag_roots(words, lexicon);
    suffixes
        .iter()
        .map(|suffix| {
            let mut ctx = SuffixContext {
                suffix: suffix.clone(),
                ..Default::default()
            };
            for (i, (word, root)) in tagged.iter().enumerate() {
                if !word.ends_with(suffix.as_str()) {
                    continue;
                }
                ctx.associated.add(root);
                if let Some((_, prev)) = i.checked_sub(1).and_then(|j| tagged.get(j)) {
                    ctx.preceded_by.add(prev);
                }
                if let Some((_, next)) = tagged.get(i + 1) {
                    ctx.followed_by.add(next);
                }
            }
            ctx
        })
        .collect()
}

/// Neighbourhood of a target word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundContext {
    pub target: String,
    pub count: u64,
    pub before: FrequencyTable,
    pub after: FrequencyTable,
    /// Known partitions the target occurred in.
    pub partitions: FrequencyTable,
}

impl CompoundContext {
    /// Partition the target occurs in most, if any known one.
    pub fn dominant_partition(&self) -> Option<(&str, u64)> {
        self.partitions.most_common()
    }
}

/// Words within `window` positions of each target, inside one paragraph.
///
/// Targets that never occur are left out. Results are ordered by
/// descending occurrence count, then target.
pub fn compound_contexts(
    paragraphs: &[Paragraph],
    targets: &[String],
    window: usize,
) -> Vec<CompoundContext> {
    let mut out: Vec<CompoundContext> = targets
        .iter()
        .map(|t| CompoundContext {
            target: t.clone(),
            ..Default::default()
        })
        .collect();

    for para in paragraphs {
        let words = &para.words;
        for (j, word) in words.iter().enumerate() {
            let Some(ctx) = out.iter_mut().find(|c| &c.target == word) else {
                continue;
            };
            ctx.count += 1;
            if para.partition != UNKNOWN_PARTITION {
                ctx.partitions.add(&para.partition);
            }
            for w in &words[j.saturating_sub(window)..j] {
                ctx.before.add(w);
            }
            let end = (j + 1 + window).min(words.len());
            for w in &words[j + 1..end] {
                ctx.after.add(w);
            }
        }
    }

    out.retain(|c| c.count > 0);
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.target.cmp(&b.target)));
    out
}

/// Words that are not roots and contain no root.
pub fn unknown_words<'w, I>(words: I, lexicon: &Lexicon) -> FrequencyTable
where
    I: IntoIterator<Item = &'w str>,
{
    words
        .into_iter()
        .filter(|w| !lexicon.is_root(w) && lexicon.longest_root_in(w).is_none())
        .collect()
}

/// Per-thousand rate of one concept in each group.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptRate {
    pub concept: String,
    /// One value per group, in input order.
    pub per_thousand: Vec<f64>,
}

/// Rate of each concept per thousand roots in each group.
pub fn concept_rates(groups: &[(String, FrequencyTable)], concepts: &[String]) -> Vec<ConceptRate> {
    concepts
        .iter()
        .map(|concept| ConceptRate {
            concept: concept.clone(),
            per_thousand: groups.iter().map(|(_, t)| t.per_thousand(concept)).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::builder()
            .root("ro", "")
            .root("che", "")
            .root("ol", "")
            .connector("s", "is")
            .build()
    }

    #[test]
    fn tagging_skips_rootless_words() {
        let lex = lexicon();
        let seq = root_sequence(["qochey", "daiin", "shol", "xs"], &lex);
        assert_eq!(seq, ["che", "ol", "s"]);
    }

    #[test]
    fn prefix_lift_over_threshold() {
        let lex = lexicon();
        let words = ["qoro", "qoro", "che", "che", "ol", "qoche", "ro", "ol"];
        let assoc = prefix_associations(words, &lex, &["qo".to_string(), "zz".to_string()], 1.5);
        assert_eq!(assoc.len(), 1);
        let (prefix, found) = &assoc[0];
        assert_eq!(prefix, "qo");
        // ro: 2/3 among qo-words vs 3/8 overall
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].root, "ro");
        assert!((found[0].lift - (2.0 / 3.0) / (3.0 / 8.0)).abs() < 1e-9);
        assert_eq!(found[0].context_count, 2);
    }

    #[test]
    fn suffix_neighbours() {
        let lex = lexicon();
        let words = ["ro", "daiin", "chey", "ol", "roy"];
        let ctx = suffix_contexts(words, &lex, &["y".to_string()]);
        let y = &ctx[0];
        assert_eq!(y.associated.get("che"), 1);
        assert_eq!(y.associated.get("ro"), 1);
        // daiin carries no root, so "ro" precedes "chey"
        assert_eq!(y.preceded_by.get("ro"), 1);
        assert_eq!(y.preceded_by.get("ol"), 1);
        assert_eq!(y.followed_by.get("ol"), 1);
        assert_eq!(y.followed_by.total(), 1);
    }

    fn para(partition: &str, words: &[&str]) -> Paragraph {
        Paragraph {
            ordinal: 0,
            folio: None,
            partition: partition.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn compound_window_stays_in_paragraph() {
        let paras = [
            para("Herbal", &["a", "b", "c", "qoky", "d", "e"]),
            para("Herbal", &["qoky", "x"]),
            para(UNKNOWN_PARTITION, &["z", "qoky"]),
            para("Recipes", &["shos"]),
        ];
        let ctx = compound_contexts(&paras, &["qoky".into(), "shos".into(), "none".into()], 2);
        assert_eq!(ctx.len(), 2);
        let q = &ctx[0];
        assert_eq!(q.target, "qoky");
        assert_eq!(q.count, 3);
        assert_eq!(q.before.get("a"), 0);
        assert_eq!(q.before.get("b"), 1);
        assert_eq!(q.before.get("z"), 1);
        assert_eq!(q.after.get("x"), 1);
        assert_eq!(q.dominant_partition(), Some(("Herbal", 2)));
    }

    #[test]
    fn unknowns_contain_no_root() {
        let lex = lexicon();
        let t = unknown_words(["daiin", "daiin", "chey", "ro", "qaiin"], &lex);
        assert_eq!(t.ranked(), [("daiin", 2), ("qaiin", 1)]);
    }

    #[test]
    fn rates_per_thousand() {
        let a: FrequencyTable = ["ro", "ro", "che", "ol"].into_iter().collect();
        let b = FrequencyTable::new();
        let rates = concept_rates(&[("A".into(), a), ("B".into(), b)], &["ro".into()]);
        assert_eq!(rates[0].per_thousand, [500.0, 0.0]);
    }
}
