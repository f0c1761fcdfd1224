//! Transcription line cleaning.
//!
//! Turns one raw paragraph line into the normalized form that
//! [`split_words`](crate::analyzer::words::split_words) expects:
//!
//! - the leading locus tag (`<f1r.P.1;H>`) is removed
//! - `{…}` and `[…]` annotations are removed, nesting included
//! - `.` word separators become spaces
//! - filler characters (`= ! % *` by default) are dropped
//! - whitespace is collapsed to single spaces and trimmed
//!
//! The sequence marker `<->` survives cleaning untouched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

/// Default filler characters.
pub const DEFAULT_FILLER: &str = "=!%*";

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@[^>]+>").expect("inline tag pattern is valid"));

/// Cleaning options.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Characters removed without leaving a gap.
    pub filler: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            filler: DEFAULT_FILLER.to_string(),
        }
    }
}

/// Reusable line cleaner.
#[derive(Debug, Clone)]
pub struct TranscriptionCleaner {
    filler: SmallVec<[char; 8]>,
}

impl Default for TranscriptionCleaner {
    fn default() -> Self {
        Self::new(CleanerConfig::default())
    }
}

impl TranscriptionCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self {
            filler: config.filler.chars().collect(),
        }
    }

    /// Cleans `line` into `out`, replacing its previous contents.
    pub fn clean_into(&self, line: &str, out: &mut String) {
        out.clear();
        out.reserve(line.len());

        let body = strip_locus_tag(line.trim());

        let mut braces = 0u32;
        let mut brackets = 0u32;
        let mut pending_space = false;

        for c in body.chars() {
            match c {
                '{' => braces += 1,
                '}' if braces > 0 => braces -= 1,
                '[' => brackets += 1,
                ']' if brackets > 0 => brackets -= 1,
                _ if braces > 0 || brackets > 0 => {}
                '.' => pending_space = true,
                c if c.is_whitespace() => pending_space = true,
                c if self.filler.contains(&c) => {}
                c => {
                    if pending_space && !out.is_empty() {
                        out.push(' ');
                    }
                    pending_space = false;
                    out.push(c);
                }
            }
        }
    }

    /// Allocating variant of [`clean_into`](Self::clean_into).
    pub fn clean(&self, line: &str) -> String {
        let mut out = String::new();
        self.clean_into(line, &mut out);
        out
    }
}

/// Drops a leading locus tag such as `<f1r.P.1;H>`.
///
/// Only tags containing `.` or `;` are locus tags; anything else, including
/// a leading sequence marker, is kept.
fn strip_locus_tag(line: &str) -> &str {
    if !line.starts_with('<') {
        return line;
    }
    match line.find('>') {
        Some(end) if line[..end].contains(['.', ';']) => line[end + 1..].trim_start(),
        _ => line,
    }
}

/// Collapses runs of whitespace to single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Removes inline `<@…>` annotations.
pub fn strip_inline_tags(text: &str) -> Cow<'_, str> {
    INLINE_TAG.replace_all(text, "")
}
