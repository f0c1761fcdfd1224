//! Paragraph interpretation.
//!
//! Walks a classified word sequence left to right and assembles one
//! descriptive sentence. CONCEPT words become modifiers of the next SUBJECT
//! or OBJECT, a CONNECTOR sets the verb, and whatever modifiers remain at
//! the end attach to the last component.
//!
//! Output shapes, by priority:
//!
//! ```text
//! <Subjects> <verb> <objects>.
//! <Subjects> <verb> it.
//! It <verb> <objects>.
//! [Subject focus: <Subjects>]
//! [Object focus: <objects>]
//! [Sequence Listing: …] / [Concepts: …]
//! [Translation failed: No meaningful components found]
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glossa_types::{ParsedWord, Role};
use serde::Deserialize;

use crate::lexicon::Lexicon;

/// Verb used when no connector occurs.
pub const DEFAULT_VERB: &str = "relates to";

/// Tunables for the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Roots skipped entirely.
    pub ignored_particles: Vec<String>,
    /// Roots whose immediate repetition reads as "(High)".
    pub emphasis_roots: Vec<String>,
    pub default_verb: String,
    /// Prefix to qualifier word. Unmapped prefixes render as `[XX]-`.
    pub prefix_qualifiers: BTreeMap<String, String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        let qualifiers = [
            ("qo", "specific"),
            ("ok", "current-state"),
            ("sh", "prepared"),
            ("ot", "active/heated"),
        ];
        Self {
            ignored_particles: vec!["ed".into(), "i".into()],
            emphasis_roots: vec!["ol".into(), "al".into()],
            default_verb: DEFAULT_VERB.into(),
            prefix_qualifiers: qualifiers
                .into_iter()
                .map(|(p, q)| (p.to_string(), q.to_string()))
                .collect(),
        }
    }
}

/// Result of synthesizing one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// A complete sentence, already punctuated.
    Sentence(String),
    SubjectFocus(String),
    ObjectFocus(String),
    SequenceListing(Vec<String>),
    Concepts(Vec<String>),
    Failed,
}

impl Interpretation {
    #[inline]
    pub fn is_sentence(&self) -> bool {
        matches!(self, Interpretation::Sentence(_))
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpretation::Sentence(s) => f.write_str(s),
            Interpretation::SubjectFocus(s) => write!(f, "[Subject focus: {s}]"),
            Interpretation::ObjectFocus(s) => write!(f, "[Object focus: {s}]"),
            Interpretation::SequenceListing(items) => {
                write!(f, "[Sequence Listing: {}]", items.join(", "))
            }
            Interpretation::Concepts(items) => write!(f, "[Concepts: {}]", items.join(", ")),
            Interpretation::Failed => {
                f.write_str("[Translation failed: No meaningful components found]")
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Modifier {
    text: String,
    is_sequence: bool,
}

#[derive(Debug)]
struct Component {
    role: Role,
    term: String,
    modifiers: Vec<Modifier>,
}

/// Upper-cases the first character, leaving the rest alone.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `mod (xN)` for repeated modifiers, first-appearance order.
fn modifier_list(mods: &[Modifier]) -> String {
    let mut counted: Vec<(&str, usize)> = Vec::new();
    for m in mods {
        match counted.iter_mut().find(|(t, _)| *t == m.text) {
            Some((_, n)) => *n += 1,
            None => counted.push((&m.text, 1)),
        }
    }
    counted
        .into_iter()
        .map(|(t, n)| if n > 1 { format!("{t} (x{n})") } else { t.to_string() })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds [`Interpretation`]s from parsed words.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    lexicon: &'a Lexicon,
    options: &'a SynthesisOptions,
}

impl<'a> Synthesizer<'a> {
    pub fn new(lexicon: &'a Lexicon, options: &'a SynthesisOptions) -> Self {
        Self { lexicon, options }
    }

    /// Gloss text for a word; unknown roots render as themselves.
    fn base_text(&self, word: &ParsedWord) -> String {
        if word.is_sequence() {
            return format!("[Sequence: {}]", word.original());
        }
        self.lexicon
            .gloss(word.root())
            .unwrap_or(word.root())
            .replace('\'', "")
    }

    fn qualifier(&self, prefix: &str) -> String {
        match self.options.prefix_qualifiers.get(prefix) {
            Some(q) => format!("{q} "),
            None => format!("[{}]-", prefix.to_uppercase()),
        }
    }

    pub fn synthesize(&self, words: &[ParsedWord]) -> Interpretation {
        let opts = self.options;
        let mut components: Vec<Component> = Vec::new();
        let mut modifiers: Vec<Modifier> = Vec::new();
        let mut verb = opts.default_verb.clone();
        let mut verb_found = false;

        let mut i = 0;
        while i < words.len() {
            let word = &words[i];
            i += 1;

            if !word.is_sequence() && opts.ignored_particles.iter().any(|p| p == word.root()) {
                continue;
            }

            let mut intensity = "";
            if words.get(i).is_some_and(|next| next.original() == word.original()) {
                intensity = if opts.emphasis_roots.iter().any(|r| r == word.root()) {
                    "(High) "
                } else {
                    "(Many/Sequential) "
                };
                i += 1;
            }

            let qualifier = word.prefix().map(|p| self.qualifier(p)).unwrap_or_default();
            let base = self.base_text(word);
            let full = format!("{intensity}{qualifier}{base}").trim().to_string();

            match word.role {
                Role::Subject | Role::Object => {
                    if !full.is_empty() {
                        components.push(Component {
                            role: word.role,
                            term: full,
                            modifiers: std::mem::take(&mut modifiers),
                        });
                    }
                }
                Role::Connector => {
                    verb = base;
                    verb_found = true;
                }
                Role::Concept | Role::Violation | Role::Sequence => {
                    if !full.is_empty() {
                        // A repeated sequence carries an intensity marker and
                        // no longer counts as a bare sequence.
                        modifiers.push(Modifier {
                            text: full,
                            is_sequence: word.is_sequence() && intensity.is_empty(),
                        });
                    }
                }
            }
        }

        if let Some(last) = components.last_mut() {
            last.modifiers.append(&mut modifiers);
        }

        let mut subjects = Vec::new();
        let mut objects = Vec::new();
        for c in &components {
            let phrase = if c.modifiers.is_empty() {
                format!("the {}", c.term)
            } else {
                format!("the {} {}", modifier_list(&c.modifiers), c.term)
            };
            if c.role == Role::Subject {
                subjects.push(phrase);
            } else {
                objects.push(phrase);
            }
        }

        let subject_phrase = capitalize_first(&subjects.join(" and "));
        let object_phrase = objects.join(", ");

        match (subjects.is_empty(), objects.is_empty()) {
            (false, false) => {
                Interpretation::Sentence(format!("{subject_phrase} {verb} {object_phrase}."))
            }
            (false, true) if verb_found => {
                Interpretation::Sentence(format!("{subject_phrase} {verb} it."))
            }
            (true, false) if verb_found => {
                Interpretation::Sentence(format!("It {verb} {object_phrase}."))
            }
            (false, true) => Interpretation::SubjectFocus(subject_phrase),
            (true, false) => Interpretation::ObjectFocus(object_phrase),
            (true, true) if !modifiers.is_empty() => {
                let all_sequences = modifiers.iter().all(|m| m.is_sequence);
                let items = modifiers.into_iter().map(|m| m.text).collect();
                if all_sequences {
                    Interpretation::SequenceListing(items)
                } else {
                    Interpretation::Concepts(items)
                }
            }
            (true, true) => Interpretation::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{ClassifierOptions, WordAnalyzer};
    use pretty_assertions::assert_eq;

    fn lexicon() -> Lexicon {
        Lexicon::builder()
            .root("ot", "Heat/Energy")
            .root("ro", "Essence")
            .root("da", "Substance")
            .root("ol", "Potency/Danger")
            .root("ar", "Quality")
            .root("ed", "[particle]")
            .root("teo", "Venus' Principle")
            .connector("s", "is")
            .connector("r", "possesses")
            .prefix("qo")
            .prefix("ch")
            .subject_suffix("y")
            .subject_suffix("dy")
            .object_suffix("m")
            .build()
    }

    fn run(text: &str) -> String {
        let lex = lexicon();
        let opts = SynthesisOptions::default();
        let analyzer = WordAnalyzer::new(&lex, ClassifierOptions::default());
        let words: Vec<_> = text.split_whitespace().collect();
        Synthesizer::new(&lex, &opts)
            .synthesize(&analyzer.parse_all(&words))
            .to_string()
    }

    #[test]
    fn subject_verb_object() {
        assert_eq!(run("ot rody s dam"), "The Heat/Energy Essence is the Substance.");
    }

    #[test]
    fn several_subjects_and_objects() {
        assert_eq!(
            run("rody ardy r dam rom"),
            "The Essence and the Quality possesses the Substance, the Essence."
        );
    }

    #[test]
    fn default_verb_without_connector() {
        assert_eq!(run("rody dam"), "The Essence relates to the Substance.");
    }

    #[test]
    fn subject_with_verb_only() {
        assert_eq!(run("rody s"), "The Essence is it.");
    }

    #[test]
    fn object_with_verb_only() {
        assert_eq!(run("s dam"), "It is the Substance.");
    }

    #[test]
    fn focus_fragments() {
        assert_eq!(run("rody"), "[Subject focus: The Essence]");
        assert_eq!(run("dam"), "[Object focus: the Substance]");
    }

    #[test]
    fn concept_listing() {
        assert_eq!(run("ot ar"), "[Concepts: Heat/Energy, Quality]");
        assert_eq!(run("o<->l y<->k"), "[Sequence Listing: [Sequence: o<->l], [Sequence: y<->k]]");
        assert_eq!(
            run("o<->l ar"),
            "[Concepts: [Sequence: o<->l], Quality]"
        );
    }

    #[test]
    fn repeated_sequence_lists_as_concept() {
        assert_eq!(run("o<->l o<->l"), "[Concepts: (Many/Sequential) [Sequence: o<->l]]");
        assert_eq!(
            run("o<->l o<->l y<->k"),
            "[Concepts: (Many/Sequential) [Sequence: o<->l], [Sequence: y<->k]]"
        );
    }

    #[test]
    fn failure_when_nothing_meaningful() {
        assert_eq!(run("ed"), "[Translation failed: No meaningful components found]");
        assert_eq!(run("s"), "[Translation failed: No meaningful components found]");
        assert_eq!(run(""), "[Translation failed: No meaningful components found]");
    }

    #[test]
    fn repetition_and_emphasis() {
        assert_eq!(run("ol ol rody"), "[Subject focus: The (High) Potency/Danger Essence]");
        assert_eq!(run("ar ar rody"), "[Subject focus: The (Many/Sequential) Quality Essence]");
    }

    #[test]
    fn repeated_modifiers_are_counted() {
        assert_eq!(run("ar ot ar rody"), "[Subject focus: The Quality (x2), Heat/Energy Essence]");
    }

    #[test]
    fn trailing_modifiers_attach_to_last_component() {
        assert_eq!(run("rody s dam ot"), "The Essence is the Heat/Energy Substance.");
    }

    #[test]
    fn prefix_qualifiers() {
        assert_eq!(run("qorody"), "[Subject focus: The specific Essence]");
        assert_eq!(run("chrody"), "[Subject focus: The [CH]-Essence]");
    }

    #[test]
    fn glosses_lose_apostrophes() {
        assert_eq!(run("teo"), "[Concepts: Venus Principle]");
    }

    #[test]
    fn unknown_roots_render_as_root() {
        assert_eq!(run("zzzy"), "[Subject focus: The zzz]");
    }
}
