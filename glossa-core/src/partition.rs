//! Folio to partition assignment.
//!
//! A [`PartitionScheme`] is an ordered list of [`Partition`]s. Rules are
//! tried in declaration order and the first match wins; a folio matching
//! nothing is labelled [`UNKNOWN_PARTITION`]. Classification is total and
//! never fails.

use glossa_types::{Partition, PartitionRule, UNKNOWN_PARTITION};
use rustc_hash::FxHashSet;

/// Leading numeric ordinal of a folio id, e.g. `73` for `f73r`.
///
/// The first run of ASCII digits is used; ids without digits have none.
pub fn folio_ordinal(folio: &str) -> Option<u32> {
    let start = folio.find(|c: char| c.is_ascii_digit())?;
    let digits = &folio[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Canonical form used for set membership.
///
/// Angle brackets and surrounding whitespace are dropped, a leading `f` is
/// removed and the rest is lower-cased, so `<f26r>`, `F26R` and `26r` all
/// become `26r`.
pub fn normalize_folio(folio: &str) -> String {
    let id = folio.trim().trim_start_matches('<').trim_end_matches('>');
    let id = id
        .strip_prefix('f')
        .or_else(|| id.strip_prefix('F'))
        .unwrap_or(id);
    id.to_ascii_lowercase()
}

#[derive(Debug, Clone)]
enum CompiledRule {
    Range { start: u32, end: u32 },
    Folios(FxHashSet<String>),
}

impl CompiledRule {
    fn compile(rule: &PartitionRule) -> Self {
        match rule {
            PartitionRule::Range { start, end } => CompiledRule::Range {
                start: *start,
                end: *end,
            },
            PartitionRule::Folios(ids) => {
                CompiledRule::Folios(ids.iter().map(|id| normalize_folio(id)).collect())
            }
        }
    }

    #[inline]
    fn matches(&self, ordinal: Option<u32>, normalized: &str) -> bool {
        match self {
            CompiledRule::Range { start, end } => {
                ordinal.is_some_and(|n| *start <= n && n <= *end)
            }
            CompiledRule::Folios(set) => set.contains(normalized),
        }
    }
}

/// Named, ordered set of partition rules.
#[derive(Debug, Clone)]
pub struct PartitionScheme {
    name: String,
    partitions: Vec<Partition>,
    compiled: Vec<CompiledRule>,
}

impl PartitionScheme {
    /// Builds a scheme; rule priority is the order of `partitions`.
    pub fn new(name: impl Into<String>, partitions: Vec<Partition>) -> Self {
        let compiled = partitions
            .iter()
            .map(|p| CompiledRule::compile(&p.rule))
            .collect();
        Self {
            name: name.into(),
            partitions,
            compiled,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Distinct partition labels in declaration order.
    ///
    /// A label may be declared by several rules; it is listed once.
    pub fn labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.partitions.len());
        for p in &self.partitions {
            if !out.contains(&p.name.as_str()) {
                out.push(&p.name);
            }
        }
        out
    }

    /// Label of `folio`, or [`UNKNOWN_PARTITION`].
    pub fn classify(&self, folio: &str) -> &str {
        let ordinal = folio_ordinal(folio);
        let normalized = normalize_folio(folio);
        self.compiled
            .iter()
            .zip(&self.partitions)
            .find(|(rule, _)| rule.matches(ordinal, &normalized))
            .map_or(UNKNOWN_PARTITION, |(_, p)| p.name.as_str())
    }
}
