//! Sliding-window pattern counting.
//!
//! Works over any sequence of comparable items: role sequences for syntax
//! patterns, root sequences for relation edges. A sequence shorter than the
//! window yields an empty table.

use core::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One window of items. Bigrams and trigrams stay inline.
pub type Gram<T> = SmallVec<[T; 3]>;

/// Calls `callback` with every contiguous window of width `n`.
///
/// For a sequence of length `L >= n`, exactly `L - n + 1` windows are
/// emitted. Nothing is emitted when `n == 0` or `L < n`.
///
/// ```
/// use glossa_core::analyzer::ngram::extract_ngrams;
///
/// let mut seen = Vec::new();
/// extract_ngrams(&["a", "b", "c", "d"], 3, |w| seen.push(w.to_vec()));
/// assert_eq!(seen, [vec!["a", "b", "c"], vec!["b", "c", "d"]]);
/// ```
#[inline]
pub fn extract_ngrams<T, F>(seq: &[T], n: usize, mut callback: F)
where
    F: FnMut(&[T]),
{
    if n == 0 || seq.len() < n {
        return;
    }
    for window in seq.windows(n) {
        callback(window);
    }
}

/// Number of windows `extract_ngrams` would emit.
#[inline]
pub fn count_windows(len: usize, n: usize) -> usize {
    if n == 0 || len < n {
        0
    } else {
        len - n + 1
    }
}

/// Frequency table of fixed-width patterns.
#[derive(Debug, Clone)]
pub struct NgramTable<T> {
    width: usize,
    counts: FxHashMap<Gram<T>, u64>,
    total: u64,
}

impl<T> NgramTable<T>
where
    T: Clone + Eq + Hash + Ord,
{
    /// Creates an empty table for windows of `width`.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            counts: FxHashMap::default(),
            total: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sum of all counts.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct patterns.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Records one occurrence of `gram`.
    pub fn add(&mut self, gram: &[T]) {
        debug_assert_eq!(gram.len(), self.width, "gram width mismatch");
        *self
            .counts
            .entry(gram.iter().cloned().collect::<Gram<T>>())
            .or_insert(0) += 1;
        self.total += 1;
    }

    /// Count of `gram`, zero when unseen.
    pub fn get(&self, gram: &[T]) -> u64 {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// Share of `count` in the table total, as a percentage.
    ///
    /// An empty table gives `0.0`.
    pub fn percent(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    /// All patterns by descending count, ties in lexical order.
    pub fn ranked(&self) -> Vec<(&[T], u64)> {
        let mut out: Vec<(&[T], u64)> = self
            .counts
            .iter()
            .map(|(g, &c)| (g.as_slice(), c))
            .collect();
        out.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    /// The `n` most frequent patterns.
    pub fn top(&self, n: usize) -> Vec<(&[T], u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Ranked patterns that contain `item` anywhere.
    pub fn ranked_containing(&self, item: &T) -> Vec<(&[T], u64)> {
        self.ranked()
            .into_iter()
            .filter(|(g, _)| g.contains(item))
            .collect()
    }
}

/// Counts every contiguous window of width `n`.
pub fn count_ngrams<T>(seq: &[T], n: usize) -> NgramTable<T>
where
    T: Clone + Eq + Hash + Ord,
{
    let mut table = NgramTable::new(n);
    extract_ngrams(seq, n, |w| table.add(w));
    table
}

/// Counts trigrams whose middle item satisfies `is_center`.
pub fn count_centered_trigrams_by<T, P>(seq: &[T], is_center: P) -> NgramTable<T>
where
    T: Clone + Eq + Hash + Ord,
    P: Fn(&T) -> bool,
{
    let mut table = NgramTable::new(3);
    extract_ngrams(seq, 3, |w| {
        if is_center(&w[1]) {
            table.add(w);
        }
    });
    table
}

/// Counts trigrams whose middle item equals `center`.
pub fn count_centered_trigrams<T>(seq: &[T], center: &T) -> NgramTable<T>
where
    T: Clone + Eq + Hash + Ord,
{
    count_centered_trigrams_by(seq, |t| t == center)
}

/// True when `pattern` occurs in `seq` in order, gaps allowed.
///
/// An empty pattern is always contained.
pub fn contains_ordered<T: PartialEq>(seq: &[T], pattern: &[T]) -> bool {
    let mut want = pattern.iter();
    let mut next = want.next();
    for item in seq {
        match next {
            Some(p) if p == item => next = want.next(),
            Some(_) => {}
            None => break,
        }
    }
    next.is_none()
}
