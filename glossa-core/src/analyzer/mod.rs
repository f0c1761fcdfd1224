//! Word-level analysis: splitting, segmentation, role tagging and pattern
//! counting.

pub mod morpheme;
pub mod ngram;
pub mod role;
pub mod words;

pub use morpheme::MorphemeTokenizer;
pub use ngram::{count_centered_trigrams, count_ngrams, NgramTable};
pub use role::{ClassifierOptions, RoleClassifier, ViolationPrecedence};
pub use words::split_words;

use glossa_types::{ParsedWord, Role};

use crate::lexicon::Lexicon;

/// Tokenizer and classifier over one lexicon.
#[derive(Debug, Clone, Copy)]
pub struct WordAnalyzer<'a> {
    tokenizer: MorphemeTokenizer<'a>,
    classifier: RoleClassifier<'a>,
}

impl<'a> WordAnalyzer<'a> {
    pub fn new(lexicon: &'a Lexicon, options: ClassifierOptions) -> Self {
        Self {
            tokenizer: MorphemeTokenizer::new(lexicon),
            classifier: RoleClassifier::with_options(lexicon, options),
        }
    }

    /// Segments and classifies one word.
    pub fn parse(&self, word: &str) -> ParsedWord {
        let segments = self.tokenizer.tokenize(word);
        let role = self.classifier.classify(&segments);
        ParsedWord { segments, role }
    }

    /// Parses every word in order.
    pub fn parse_all<S: AsRef<str>>(&self, words: &[S]) -> Vec<ParsedWord> {
        words.iter().map(|w| self.parse(w.as_ref())).collect()
    }

    /// Role of each word, in order.
    pub fn roles<S: AsRef<str>>(&self, words: &[S]) -> Vec<Role> {
        words.iter().map(|w| self.parse(w.as_ref()).role).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_combines_segmentation_and_role() {
        let lex = Lexicon::builder()
            .root("ro", "Essence")
            .connector("s", "is")
            .subject_suffix("dy")
            .object_suffix("in")
            .build();
        let analyzer = WordAnalyzer::new(&lex, ClassifierOptions::default());

        let words = analyzer.parse_all(&["rody", "s", "roin"]);
        assert_eq!(words[0].root(), "ro");
        assert_eq!(words[0].role, Role::Subject);
        assert_eq!(words[1].role, Role::Connector);
        assert_eq!(words[2].suffix(), Some("in"));
        assert_eq!(
            analyzer.roles(&["rody", "s", "roin"]),
            [Role::Subject, Role::Connector, Role::Object]
        );
    }
}
