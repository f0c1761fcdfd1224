//! Greedy morpheme segmentation.
//!
//! [`MorphemeTokenizer::tokenize`] splits one word into an optional prefix,
//! a root and an optional suffix. It is a pure function of the word and the
//! lexicon ordering, and it never fails: material it cannot resolve becomes
//! an unknown root.
//!
//! Steps, in priority order:
//!
//! 1. A word containing the sequence marker is a literal sequence unit.
//! 2. The first significant prefix (list order) is stripped when the
//!    remainder is non-empty and is not itself a root.
//! 3. The first suffix (longest first) is stripped from the remainder when
//!    a non-empty leftover remains.
//! 4. A leftover that is a root is accepted.
//! 5. When nothing was stripped, the first root found anywhere inside the
//!    word (longest first) is taken; the text around it becomes residual,
//!    non-significant affixes.
//! 6. Otherwise the leftover is kept as an unknown root.
//!
//! Step 5 is a substring match and can pick a root that only occurs inside
//! the word by accident.

use glossa_types::Segmentation;

use crate::lexicon::Lexicon;

/// Stateless segmenter borrowing a lexicon.
#[derive(Debug, Clone, Copy)]
pub struct MorphemeTokenizer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> MorphemeTokenizer<'a> {
    /// Creates a tokenizer over `lexicon`.
    #[inline]
    pub const fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Segments `word`.
    pub fn tokenize(&self, word: &str) -> Segmentation {
        let lex = self.lexicon;

        let marker = lex.sequence_marker();
        if !marker.is_empty() && word.contains(marker) {
            return Segmentation::sequence(word);
        }

        let mut rest = word;

        let mut prefix = None;
        for p in lex.prefixes() {
            if let Some(rem) = rest.strip_prefix(p.as_str()) {
                if !rem.is_empty() && !lex.is_root(rem) {
                    prefix = Some(p.as_str());
                    rest = rem;
                    break;
                }
            }
        }

        let mut suffix = None;
        for s in lex.suffixes() {
            if let Some(rem) = rest.strip_suffix(s.as_str()) {
                if !rem.is_empty() {
                    suffix = Some(s.as_str());
                    rest = rem;
                    break;
                }
            }
        }

        if lex.is_root(rest) {
            return Segmentation {
                original: word.to_string(),
                prefix: prefix.map(str::to_string),
                prefix_is_significant: prefix.is_some(),
                root: rest.to_string(),
                root_known: true,
                suffix: suffix.map(str::to_string),
                is_sequence: false,
            };
        }

        if prefix.is_none() && suffix.is_none() {
            if let Some(found) = Self::substring_root(lex, word) {
                return found;
            }
        }

        Segmentation {
            original: word.to_string(),
            prefix: prefix.map(str::to_string),
            prefix_is_significant: prefix.is_some(),
            root: rest.to_string(),
            root_known: false,
            suffix: suffix.map(str::to_string),
            is_sequence: false,
        }
    }

    fn substring_root(lex: &Lexicon, word: &str) -> Option<Segmentation> {
        let root = lex.longest_root_in(word)?;
        let start = word.find(root)?;
        let end = start + root.len();

        let before = &word[..start];
        let after = &word[end..];

        Some(Segmentation {
            original: word.to_string(),
            prefix: (!before.is_empty()).then(|| before.to_string()),
            prefix_is_significant: false,
            root: root.to_string(),
            root_known: true,
            suffix: (!after.is_empty()).then(|| after.to_string()),
            is_sequence: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::builder()
            .root("ro", "Essence/Distillate")
            .root("ot", "Heat/Energy")
            .root("che", "Substance (Generic)")
            .root("cho", "Substance (Specific)")
            .root("ol", "Potency/Danger")
            .root("ke", "Component/Part of")
            .root("ed", "[particle]")
            .connector("s", "is")
            .connector("k", "is fixed in")
            .connector("t", "relates to")
            .prefix("qo")
            .prefix("ok")
            .prefix("ch")
            .prefix("sh")
            .prefix("ot")
            .subject_suffix("y")
            .subject_suffix("dy")
            .subject_suffix("ey")
            .object_suffix("n")
            .object_suffix("in")
            .object_suffix("m")
            .build()
    }

    #[test]
    fn bare_root_is_known() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("ro");
        assert_eq!(seg.root, "ro");
        assert!(seg.root_known);
        assert!(seg.prefix.is_none() && seg.suffix.is_none());
    }

    #[test]
    fn prefix_and_suffix_are_stripped() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("qokedy");
        assert_eq!(seg.prefix.as_deref(), Some("qo"));
        assert!(seg.prefix_is_significant);
        assert_eq!(seg.root, "ke");
        assert_eq!(seg.suffix.as_deref(), Some("dy"));
        assert!(seg.root_known);
    }

    #[test]
    fn prefix_kept_when_remainder_is_root() {
        // "shol": stripping "sh" would leave the root "ol"
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("shol");
        assert!(!seg.prefix_is_significant);
        assert_eq!(seg.root, "ol");
        assert_eq!(seg.prefix.as_deref(), Some("sh"));
    }

    #[test]
    fn longest_suffix_wins() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("rody");
        assert_eq!(seg.root, "ro");
        assert_eq!(seg.suffix.as_deref(), Some("dy"));
    }

    #[test]
    fn suffix_needs_nonempty_leftover() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("y");
        assert!(seg.suffix.is_none());
        assert_eq!(seg.root, "y");
        assert!(!seg.root_known);
    }

    #[test]
    fn prefixed_connector() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("qoky");
        assert_eq!(seg.prefix.as_deref(), Some("qo"));
        assert_eq!(seg.root, "k");
        assert_eq!(seg.suffix.as_deref(), Some("y"));
    }

    #[test]
    fn sequence_marker_short_circuits() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("o<->l");
        assert!(seg.is_sequence);
        assert_eq!(seg.root, "o<->l");
    }

    #[test]
    fn substring_fallback_splits_residue() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("xrox");
        assert_eq!(seg.prefix.as_deref(), Some("x"));
        assert!(!seg.prefix_is_significant);
        assert_eq!(seg.root, "ro");
        assert_eq!(seg.suffix.as_deref(), Some("x"));
    }

    #[test]
    fn substring_fallback_can_missegment() {
        // "karo" is not built from "ro"; the substring scan still finds it.
        // Known ambiguity of greedy matching, kept as is.
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("karo");
        assert_eq!(seg.prefix.as_deref(), Some("ka"));
        assert_eq!(seg.root, "ro");
    }

    #[test]
    fn unresolvable_word_is_unknown_full_string() {
        let lex = Lexicon::builder().root("ro", "").root("che", "").build();
        let seg = MorphemeTokenizer::new(&lex).tokenize("qotam");
        assert_eq!(seg.root, "qotam");
        assert!(!seg.root_known);
        assert!(seg.prefix.is_none() && seg.suffix.is_none());
    }

    #[test]
    fn unknown_leftover_after_stripping() {
        let lex = Lexicon::builder()
            .root("ro", "")
            .prefix("qo")
            .object_suffix("m")
            .build();
        let seg = MorphemeTokenizer::new(&lex).tokenize("qotam");
        assert_eq!(seg.prefix.as_deref(), Some("qo"));
        assert_eq!(seg.root, "ta");
        assert_eq!(seg.suffix.as_deref(), Some("m"));
        assert!(!seg.root_known);
        assert_eq!(seg.reassemble(), "qotam");
    }

    #[test]
    fn empty_word_does_not_panic() {
        let lex = lexicon();
        let seg = MorphemeTokenizer::new(&lex).tokenize("");
        assert_eq!(seg.root, "");
        assert!(!seg.root_known);
    }

    #[test]
    fn tokenization_is_deterministic() {
        let lex = lexicon();
        let tok = MorphemeTokenizer::new(&lex);
        for w in ["qokeedy", "chedy", "shol", "daiin", "otedy", "s", "o<->l"] {
            assert_eq!(tok.tokenize(w), tok.tokenize(w));
        }
    }

    #[test]
    fn segments_reassemble_to_original() {
        let lex = lexicon();
        let tok = MorphemeTokenizer::new(&lex);
        for w in ["qokeedy", "chedy", "shol", "daiin", "otedy", "okain", "xrox", "qotam"] {
            assert_eq!(tok.tokenize(w).reassemble(), w, "word {w}");
        }
    }
}
