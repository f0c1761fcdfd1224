//! Lift statistics.
//!
//! For a unit `u` and partition `p`:
//!
//! ```text
//! baseline    = count(u, corpus)    / tokens(corpus)
//! conditional = count(u, p)         / tokens(p)
//! lift        = conditional / baseline
//! ```
//!
//! Counts (numerators) and token totals (denominators) are recorded
//! separately in [`Observations`], so each analysis decides what a token
//! is: every word, every word inside a known partition, or every word that
//! carries a root. Undefined ratios are `0.0`, never an error.

use glossa_types::LiftRecord;
use rustc_hash::FxHashMap;

use crate::stats::frequency::FrequencyTable;

/// Lift with zero guards.
///
/// Returns `0.0` when either total is zero or the unit never occurs
/// globally.
#[inline]
pub fn lift_ratio(
    partition_count: u64,
    partition_tokens: u64,
    global_count: u64,
    global_tokens: u64,
) -> f64 {
    if partition_tokens == 0 || global_tokens == 0 || global_count == 0 {
        return 0.0;
    }
    let conditional = partition_count as f64 / partition_tokens as f64;
    let baseline = global_count as f64 / global_tokens as f64;
    conditional / baseline
}

/// Unit counts and token totals over a fixed list of partitions.
#[derive(Debug, Clone, Default)]
pub struct Observations {
    partitions: Vec<String>,
    global: FrequencyTable,
    per_partition: FxHashMap<String, FrequencyTable>,
    global_tokens: u64,
    partition_tokens: FxHashMap<String, u64>,
}

impl Observations {
    /// Declares the partitions, in report order.
    pub fn new<I, S>(partitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut obs = Self::default();
        for p in partitions {
            let p = p.into();
            if !obs.per_partition.contains_key(&p) {
                obs.per_partition.insert(p.clone(), FrequencyTable::new());
                obs.partition_tokens.insert(p.clone(), 0);
                obs.partitions.push(p);
            }
        }
        obs
    }

    #[inline]
    pub fn partitions(&self) -> &[String] {
        &self.partitions
    }

    /// Counts `unit` in the corpus scope only.
    #[inline]
    pub fn record_global(&mut self, unit: &str) {
        self.global.add(unit);
    }

    /// Counts `unit` in `partition` only. Returns false for an undeclared
    /// partition, which is ignored.
    pub fn record_in(&mut self, partition: &str, unit: &str) -> bool {
        match self.per_partition.get_mut(partition) {
            Some(t) => {
                t.add(unit);
                true
            }
            None => false,
        }
    }

    /// Counts `unit` in both scopes when `partition` is declared.
    pub fn record(&mut self, partition: &str, unit: &str) -> bool {
        if self.record_in(partition, unit) {
            self.global.add(unit);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn add_global_tokens(&mut self, n: u64) {
        self.global_tokens += n;
    }

    /// Adds to the denominator of `partition`; false when undeclared.
    pub fn add_partition_tokens(&mut self, partition: &str, n: u64) -> bool {
        match self.partition_tokens.get_mut(partition) {
            Some(t) => {
                *t += n;
                true
            }
            None => false,
        }
    }

    /// Adds to both denominators when `partition` is declared.
    pub fn add_tokens(&mut self, partition: &str, n: u64) -> bool {
        if self.add_partition_tokens(partition, n) {
            self.global_tokens += n;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn global(&self) -> &FrequencyTable {
        &self.global
    }

    #[inline]
    pub fn global_tokens(&self) -> u64 {
        self.global_tokens
    }

    pub fn partition(&self, name: &str) -> Option<&FrequencyTable> {
        self.per_partition.get(name)
    }

    pub fn partition_tokens(&self, name: &str) -> u64 {
        self.partition_tokens.get(name).copied().unwrap_or(0)
    }
}

/// Lift of one unit across all partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftRow {
    pub unit: String,
    pub global_count: u64,
    /// One value per partition, in [`LiftTable::partitions`] order.
    pub lifts: Vec<f64>,
}

/// Result of a lift computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiftTable {
    pub partitions: Vec<String>,
    /// Rows by descending global count, ties by unit.
    pub rows: Vec<LiftRow>,
}

impl LiftTable {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, unit: &str) -> Option<&LiftRow> {
        self.rows.iter().find(|r| r.unit == unit)
    }

    /// Lift of `unit` in `partition`, if both are present.
    pub fn lift(&self, unit: &str, partition: &str) -> Option<f64> {
        let col = self.partitions.iter().position(|p| p == partition)?;
        self.row(unit).map(|r| r.lifts[col])
    }

    /// Flattened records, row by row.
    pub fn records(&self) -> impl Iterator<Item = LiftRecord> + '_ {
        self.rows.iter().flat_map(move |row| {
            self.partitions
                .iter()
                .zip(&row.lifts)
                .map(move |(p, &ratio)| LiftRecord {
                    unit: row.unit.clone(),
                    partition: p.clone(),
                    ratio,
                })
        })
    }

    /// Records with `ratio > threshold`, strongest first.
    pub fn significant(&self, threshold: f64) -> Vec<LiftRecord> {
        let mut out: Vec<LiftRecord> = self.records().filter(|r| r.ratio > threshold).collect();
        out.sort_by(|a, b| {
            b.ratio
                .total_cmp(&a.ratio)
                .then_with(|| a.unit.cmp(&b.unit))
                .then_with(|| a.partition.cmp(&b.partition))
        });
        out
    }
}

/// Computes lift tables from observations.
#[derive(Debug, Clone, Copy)]
pub struct LiftEngine {
    /// Units counted fewer times than this globally are dropped.
    pub min_global_count: u64,
}

impl Default for LiftEngine {
    fn default() -> Self {
        Self {
            min_global_count: 1,
        }
    }
}

impl LiftEngine {
    pub const fn new(min_global_count: u64) -> Self {
        Self { min_global_count }
    }

    pub fn compute(&self, obs: &Observations) -> LiftTable {
        let global_tokens = obs.global_tokens();
        // ranked() orders by descending count, then unit.
        let rows: Vec<LiftRow> = obs
            .global()
            .ranked()
            .into_iter()
            .filter(|&(_, count)| count > 0 && count >= self.min_global_count)
            .map(|(unit, global_count)| {
                let lifts = obs
                    .partitions()
                    .iter()
                    .map(|p| {
                        let in_p = obs.partition(p).map_or(0, |t| t.get(unit));
                        lift_ratio(in_p, obs.partition_tokens(p), global_count, global_tokens)
                    })
                    .collect();
                LiftRow {
                    unit: unit.to_string(),
                    global_count,
                    lifts,
                }
            })
            .collect();

        LiftTable {
            partitions: obs.partitions().to_vec(),
            rows,
        }
    }
}
