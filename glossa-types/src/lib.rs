//! Core types for the Glossa analysis engine.
//!
//! This crate holds the plain data shared between the segmenter, the role
//! classifier and the statistics layer. It has no dependencies so that
//! report writers and tools can consume analysis results without pulling in
//! the engine itself.

#![warn(missing_docs)]

use core::fmt;
use core::str::FromStr;

/// Zero-based paragraph ordinal in load order.
pub type ParagraphId = u32;

/// Partition label returned when no rule matches.
pub const UNKNOWN_PARTITION: &str = "Unknown";

/// Grammatical role assigned to a segmented word.
///
/// Every parsed word carries exactly one role. `#[repr(u8)]` keeps role
/// sequences compact when scanning a full corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Role {
    /// Relational, verb-like root.
    Connector = 0,
    /// Word carrying a subject suffix.
    Subject = 1,
    /// Word carrying an object suffix.
    Object = 2,
    /// Anything else; acts as a modifier during synthesis.
    Concept = 3,
    /// Significant prefix attached directly to a connector root.
    Violation = 4,
    /// Literal sequence unit, only produced when sequence tagging is enabled.
    Sequence = 5,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Connector,
        Role::Subject,
        Role::Object,
        Role::Concept,
        Role::Violation,
        Role::Sequence,
    ];

    /// Upper-case label used in reports.
    #[must_use]
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Connector => "CONNECTOR",
            Role::Subject => "SUBJECT",
            Role::Object => "OBJECT",
            Role::Concept => "CONCEPT",
            Role::Violation => "VIOLATION",
            Role::Sequence => "SEQUENCE",
        }
    }
}

impl PartialOrd for Role {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    // Lexical by label, so ranked pattern ties read alphabetically.
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleError {
    /// The rejected label.
    pub label: String,
}

impl fmt::Display for UnknownRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role label: {}", self.label)
    }
}

impl core::error::Error for UnknownRoleError {}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRoleError {
                label: s.to_string(),
            })
    }
}

/// Category of a lexicon entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphemeCategory {
    /// Content root.
    Root,
    /// Relational root. Connectors are roots too.
    Connector,
    /// Prefix stripped before root resolution.
    Prefix,
    /// Suffix marking the subject role.
    SubjectSuffix,
    /// Suffix marking the object role.
    ObjectSuffix,
}

/// One line of a lexicon file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Surface form.
    pub morpheme: String,
    /// Which list the entry came from.
    pub category: MorphemeCategory,
    /// Gloss text; may be empty.
    pub gloss: String,
}

/// Result of segmenting one word.
///
/// `prefix + root + suffix` reproduces the original word for every
/// non-sequence segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Word as it appeared in the corpus.
    pub original: String,
    /// Leading material split off the root, if any.
    pub prefix: Option<String>,
    /// True when the prefix came from the significant-prefix list, false
    /// when it is residue from the substring fallback.
    pub prefix_is_significant: bool,
    /// Root text. Always present, possibly unknown.
    pub root: String,
    /// True when `root` is a lexicon root.
    pub root_known: bool,
    /// Trailing material split off the root, if any.
    pub suffix: Option<String>,
    /// True for literal sequence units.
    pub is_sequence: bool,
}

impl Segmentation {
    /// Builds a segmentation for a literal sequence unit.
    pub fn sequence(word: &str) -> Self {
        Self {
            original: word.to_string(),
            prefix: None,
            prefix_is_significant: false,
            root: word.to_string(),
            root_known: false,
            suffix: None,
            is_sequence: true,
        }
    }

    /// Returns the significant prefix, ignoring fallback residue.
    #[inline]
    pub fn significant_prefix(&self) -> Option<&str> {
        if self.prefix_is_significant {
            self.prefix.as_deref()
        } else {
            None
        }
    }

    /// Concatenates the segments back into a word.
    pub fn reassemble(&self) -> String {
        let mut out = String::with_capacity(self.original.len());
        if let Some(p) = &self.prefix {
            out.push_str(p);
        }
        out.push_str(&self.root);
        if let Some(s) = &self.suffix {
            out.push_str(s);
        }
        out
    }
}

/// A segmented word together with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWord {
    /// Segmentation produced by the tokenizer.
    pub segments: Segmentation,
    /// Role produced by the classifier.
    pub role: Role,
}

impl ParsedWord {
    /// Original surface form.
    #[inline]
    pub fn original(&self) -> &str {
        &self.segments.original
    }

    /// Root text.
    #[inline]
    pub fn root(&self) -> &str {
        &self.segments.root
    }

    /// Prefix, significant or residual.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.segments.prefix.as_deref()
    }

    /// Suffix, if any.
    #[inline]
    pub fn suffix(&self) -> Option<&str> {
        self.segments.suffix.as_deref()
    }

    /// True for literal sequence units.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        self.segments.is_sequence
    }
}

impl fmt::Display for ParsedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.segments;
        write!(
            f,
            "{} = [{}] {} [{}] : {}",
            s.original,
            s.prefix.as_deref().unwrap_or("-"),
            s.root,
            s.suffix.as_deref().unwrap_or("-"),
            self.role
        )
    }
}

/// Membership rule of a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionRule {
    /// Closed range over the leading numeric folio ordinal.
    Range {
        /// First ordinal, inclusive.
        start: u32,
        /// Last ordinal, inclusive.
        end: u32,
    },
    /// Explicit folio identifiers.
    Folios(Vec<String>),
}

/// A named grouping of folios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Label reported for matching folios.
    pub name: String,
    /// How membership is decided.
    pub rule: PartitionRule,
}

/// One paragraph of the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Position in load order.
    pub ordinal: ParagraphId,
    /// Folio the paragraph was read under, when known.
    pub folio: Option<String>,
    /// Resolved partition label.
    pub partition: String,
    /// Whitespace-separated tokens.
    pub words: Vec<String>,
}

impl Paragraph {
    /// Space-joined text of the paragraph.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Lift of one unit in one partition.
///
/// `ratio = P(unit | partition) / P(unit | corpus)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftRecord {
    /// Counted unit (root, word or pattern).
    pub unit: String,
    /// Partition label.
    pub partition: String,
    /// Lift ratio; `0.0` when either probability is undefined.
    pub ratio: f64,
}

impl fmt::Display for LiftRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {:.2}", self.unit, self.partition, self.ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_size_is_1_byte() {
        assert_eq!(size_of::<Role>(), 1);
    }

    #[test]
    fn role_labels_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("violation".parse::<Role>(), Ok(Role::Violation));
    }

    #[test]
    fn role_order_is_lexical() {
        assert!(Role::Concept < Role::Connector);
        assert!(Role::Object < Role::Sequence);
    }

    #[test]
    fn role_parse_rejects_unknown() {
        let err = "VERB".parse::<Role>().unwrap_err();
        assert_eq!(err.label, "VERB");
        assert_eq!(err.to_string(), "unknown role label: VERB");
    }

    #[test]
    fn reassemble_joins_segments() {
        let seg = Segmentation {
            original: "qokedy".into(),
            prefix: Some("qo".into()),
            prefix_is_significant: true,
            root: "ke".into(),
            root_known: true,
            suffix: Some("dy".into()),
            is_sequence: false,
        };
        assert_eq!(seg.reassemble(), "qokedy");
        assert_eq!(seg.significant_prefix(), Some("qo"));
    }

    #[test]
    fn residual_prefix_is_not_significant() {
        let seg = Segmentation {
            original: "xxro".into(),
            prefix: Some("xx".into()),
            prefix_is_significant: false,
            root: "ro".into(),
            root_known: true,
            suffix: None,
            is_sequence: false,
        };
        assert_eq!(seg.significant_prefix(), None);
    }

    #[test]
    fn sequence_keeps_word_as_root() {
        let seg = Segmentation::sequence("o<->l");
        assert!(seg.is_sequence);
        assert_eq!(seg.root, "o<->l");
        assert!(seg.prefix.is_none() && seg.suffix.is_none());
    }

    #[test]
    fn parsed_word_display() {
        let word = ParsedWord {
            segments: Segmentation {
                original: "chedy".into(),
                prefix: Some("ch".into()),
                prefix_is_significant: true,
                root: "e".into(),
                root_known: false,
                suffix: Some("dy".into()),
                is_sequence: false,
            },
            role: Role::Subject,
        };
        assert_eq!(word.to_string(), "chedy = [ch] e [dy] : SUBJECT");
    }

    #[test]
    fn lift_record_display_uses_two_decimals() {
        let r = LiftRecord {
            unit: "ro".into(),
            partition: "Herbal".into(),
            ratio: 1.0 / 3.0,
        };
        assert_eq!(r.to_string(), "ro in Herbal: 0.33");
    }
}
