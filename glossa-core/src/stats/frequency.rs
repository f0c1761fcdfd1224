//! Unit frequency tables.

use rustc_hash::FxHashMap;

/// Counts of string units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: FxHashMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `unit`.
    #[inline]
    pub fn add(&mut self, unit: &str) {
        self.add_n(unit, 1);
    }

    /// Adds `n` occurrences of `unit`.
    pub fn add_n(&mut self, unit: &str, n: u64) {
        if n == 0 {
            return;
        }
        match self.counts.get_mut(unit) {
            Some(c) => *c += n,
            None => {
                self.counts.insert(unit.to_string(), n);
            }
        }
        self.total += n;
    }

    #[inline]
    pub fn get(&self, unit: &str) -> u64 {
        self.counts.get(unit).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct units.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// `count / total`, or `0.0` for an empty table.
    pub fn relative(&self, unit: &str) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.get(unit) as f64 / self.total as f64
        }
    }

    /// Occurrences per thousand units.
    #[inline]
    pub fn per_thousand(&self, unit: &str) -> f64 {
        self.relative(unit) * 1000.0
    }

    /// All units by descending count, ties in lexical order.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut out: Vec<(&str, u64)> = self.iter().collect();
        out.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    /// The `n` most frequent units.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Most frequent unit, if any.
    pub fn most_common(&self) -> Option<(&str, u64)> {
        self.iter()
            .min_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut t = FrequencyTable::new();
        for unit in iter {
            t.add(unit.as_ref());
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_totals() {
        let t: FrequencyTable = ["ro", "che", "ro", "s"].into_iter().collect();
        assert_eq!(t.get("ro"), 2);
        assert_eq!(t.get("missing"), 0);
        assert_eq!(t.total(), 4);
        assert_eq!(t.len(), 3);
        assert_eq!(t.relative("ro"), 0.5);
        assert_eq!(t.per_thousand("s"), 250.0);
    }

    #[test]
    fn empty_table_is_zero_guarded() {
        let t = FrequencyTable::new();
        assert_eq!(t.relative("ro"), 0.0);
        assert!(t.most_common().is_none());
    }

    #[test]
    fn ranking_is_deterministic() {
        let t: FrequencyTable = ["b", "a", "c", "a", "b", "d"].into_iter().collect();
        assert_eq!(t.ranked(), [("a", 2), ("b", 2), ("c", 1), ("d", 1)]);
        assert_eq!(t.top(1), [("a", 2)]);
        assert_eq!(t.most_common(), Some(("a", 2)));
    }

    #[test]
    fn add_zero_is_noop() {
        let mut t = FrequencyTable::new();
        t.add_n("ro", 0);
        assert!(t.is_empty());
        assert_eq!(t.total(), 0);
    }
}
