//! Word splitting for cleaned paragraph text.
//!
//! Cleaned text is single-space separated with no leading or trailing
//! whitespace (see [`crate::corpus::clean`]). Under that contract a word
//! boundary is exactly one ASCII space, so splitting is a single `memchr`
//! scan that hands out slices of the input:
//!
//! ```
//! use glossa_core::analyzer::words::split_words;
//!
//! let mut out = Vec::new();
//! split_words("qokeedy chol daiin", |w, pos| out.push((w, pos)));
//! assert_eq!(out, [("qokeedy", 0), ("chol", 1), ("daiin", 2)]);
//! ```
//!
//! Violating the contract panics in debug builds.

use memchr::memchr_iter;

/// Emits each word of `normalized` with its zero-based position.
///
/// Words are slices of the input; nothing is allocated. After emitting a
/// word at position `u32::MAX` further emissions stop.
#[inline]
pub fn split_words<'n, F>(normalized: &'n str, mut emit: F)
where
    F: FnMut(&'n str, u32),
{
    let bytes = normalized.as_bytes();

    debug_assert!(
        bytes.first().is_none_or(|&b| b != b' '),
        "split_words: leading whitespace, cleaner contract violated"
    );
    debug_assert!(
        bytes.last().is_none_or(|&b| b != b' '),
        "split_words: trailing whitespace, cleaner contract violated"
    );
    debug_assert!(
        !normalized.contains("  "),
        "split_words: consecutive spaces, cleaner contract violated"
    );

    if bytes.is_empty() {
        return;
    }

    let mut start = 0usize;
    let mut pos = 0u32;

    for i in memchr_iter(b' ', bytes) {
        if start < i {
            // ASCII space is never inside a multi-byte character, so both
            // ends of the slice are char boundaries.
            emit(&normalized[start..i], pos);
            if pos == u32::MAX {
                return;
            }
            pos += 1;
        }
        start = i + 1;
    }

    if start < bytes.len() {
        emit(&normalized[start..], pos);
    }
}

/// Collects the words of `normalized` into owned strings.
pub fn collect_words(normalized: &str) -> Vec<String> {
    let mut out = Vec::new();
    split_words(normalized, |w, _| out.push(w.to_string()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(&str, u32)> {
        let mut out = Vec::new();
        split_words(input, |w, pos| out.push((w, pos)));
        out
    }

    #[test]
    fn single_word() {
        assert_eq!(collect("daiin"), [("daiin", 0)]);
    }

    #[test]
    fn empty_emits_nothing() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn positions_are_sequential() {
        let out = collect("fachys ykal ar ataiin");
        assert_eq!(out.len(), 4);
        for (i, (_, pos)) in out.iter().enumerate() {
            assert_eq!(*pos, i as u32);
        }
    }

    #[test]
    fn sequence_markers_stay_inside_words() {
        assert_eq!(collect("o<->l chey"), [("o<->l", 0), ("chey", 1)]);
    }

    #[test]
    fn words_are_slices_of_input() {
        let input = String::from("qokain shedy");
        let base = input.as_ptr() as usize;
        let end = base + input.len();
        split_words(&input, |w, _| {
            let ptr = w.as_ptr() as usize;
            assert!(ptr >= base && ptr < end);
        });
    }

    #[test]
    fn collect_words_owns_output() {
        assert_eq!(collect_words("ol ol shey"), ["ol", "ol", "shey"]);
    }
}
