//! Text normalization
//!
//! A raw user message goes through an ordered list of pure transforms:
//! lowercase, accent folding, apostrophe splitting and stop-word removal.
//! Accents are folded before stop words are matched, and apostrophes are
//! split before the text is tokenized on whitespace.

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters treated as apostrophes
const APOSTROPHES: [char; 3] = ['\'', '\u{2019}', '\u{02BC}'];

/// One transform of the normalization chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStep {
    Lowercase,
    FoldAccents,
    SplitApostrophes,
    RemoveStopWords,
}

impl NormalizeStep {
    /// Order in which the steps must run
    pub const DEFAULT_ORDER: [NormalizeStep; 4] = [
        NormalizeStep::Lowercase,
        NormalizeStep::FoldAccents,
        NormalizeStep::SplitApostrophes,
        NormalizeStep::RemoveStopWords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::FoldAccents => "fold_accents",
            Self::SplitApostrophes => "split_apostrophes",
            Self::RemoveStopWords => "remove_stop_words",
        }
    }
}

impl std::fmt::Display for NormalizeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercase every character
pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Replace accented letters by their unaccented base letter
pub fn fold_accents(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        match ch {
            'œ' => folded.push_str("oe"),
            'Œ' => folded.push_str("OE"),
            'æ' => folded.push_str("ae"),
            'Æ' => folded.push_str("AE"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(ch),
        }
    }
    folded
}

/// Replace each apostrophe with a single space
pub fn split_apostrophes(text: &str) -> String {
    text.replace(APOSTROPHES, " ")
}

/// Drop every whitespace-separated token found in `stop_words`
pub fn remove_stop_words(text: &str, stop_words: &HashSet<String>) -> String {
    text.split_whitespace()
        .filter(|word| !stop_words.contains(*word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalization chain with its stop-word set
#[derive(Debug, Clone)]
pub struct Normalizer {
    steps: Vec<NormalizeStep>,
    /// Stop words already passed through the preceding steps
    stop_words: Option<HashSet<String>>,
}

impl Normalizer {
    /// Create a normalizer running every step in the default order.
    ///
    /// `None` disables stop-word removal (the resource could not be loaded).
    pub fn new(stop_words: Option<Vec<String>>) -> Self {
        let stop_words = stop_words.map(|words| {
            words
                .iter()
                .flat_map(|word| {
                    split_apostrophes(&fold_accents(&lowercase(word)))
                        .split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect()
        });

        Self {
            steps: NormalizeStep::DEFAULT_ORDER.to_vec(),
            stop_words,
        }
    }

    /// Replace the step list
    pub fn with_steps(mut self, steps: impl Into<Vec<NormalizeStep>>) -> Self {
        self.steps = steps.into();
        self
    }

    pub fn steps(&self) -> &[NormalizeStep] {
        &self.steps
    }

    pub fn has_stop_words(&self) -> bool {
        self.stop_words.is_some()
    }

    /// Run every configured step in order
    pub fn normalize(&self, text: &str) -> String {
        self.steps
            .iter()
            .fold(text.to_string(), |acc, step| self.apply(*step, &acc))
    }

    /// Run a single step
    pub fn apply(&self, step: NormalizeStep, text: &str) -> String {
        match step {
            NormalizeStep::Lowercase => lowercase(text),
            NormalizeStep::FoldAccents => fold_accents(text),
            NormalizeStep::SplitApostrophes => split_apostrophes(text),
            NormalizeStep::RemoveStopWords => match &self.stop_words {
                Some(stop_words) => remove_stop_words(text, stop_words),
                None => {
                    tracing::warn!("No stop-word list loaded, keeping text as is");
                    text.to_string()
                }
            },
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn french_normalizer() -> Normalizer {
        Normalizer::new(Some(
            ["salut", "est-ce", "que", "tu", "connais", "l'", "d'", "le", "la", "où", "se"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        ))
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(lowercase("Salut GrandPy"), "salut grandpy");
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("éèàâäùñ"), "eeaaaun");
        assert_eq!(fold_accents("Cœur de Noël"), "Coeur de Noel");
    }

    #[test]
    fn test_split_apostrophes_keeps_trailing_space() {
        assert_eq!(split_apostrophes("l'm'n'o'p'"), "l m n o p ");
        assert_eq!(split_apostrophes("l\u{2019}adresse"), "l adresse");
    }

    #[test]
    fn test_remove_stop_words() {
        let stop_words: HashSet<String> = ["le", "de", "la"].iter().map(|w| w.to_string()).collect();

        assert_eq!(
            remove_stop_words("le  musee de la   ville", &stop_words),
            "musee ville"
        );
        assert_eq!(remove_stop_words("le de la", &stop_words), "");
    }

    #[test]
    fn test_full_chain() {
        let normalizer = french_normalizer();
        let text = "Salut GrandPy ! Est-ce que tu connais l'adresse d'OpenClassrooms ?";

        assert_eq!(
            normalizer.normalize(text),
            "grandpy ! adresse openclassrooms ?"
        );
    }

    #[test]
    fn test_accented_stop_words_are_folded() {
        let normalizer = french_normalizer();
        assert_eq!(normalizer.normalize("Où se trouve le musée ?"), "trouve musee ?");
    }

    #[test]
    fn test_missing_stop_words_preserve_text() {
        let normalizer = Normalizer::new(None);
        assert!(!normalizer.has_stop_words());
        assert_eq!(
            normalizer.apply(NormalizeStep::RemoveStopWords, "le musee de la ville"),
            "le musee de la ville"
        );
    }

    #[test]
    fn test_custom_steps() {
        let normalizer = french_normalizer().with_steps([NormalizeStep::Lowercase]);
        assert_eq!(normalizer.steps(), &[NormalizeStep::Lowercase]);
        assert_eq!(normalizer.normalize("L'Été"), "l'été");
    }

    #[test]
    fn test_step_display() {
        assert_eq!(NormalizeStep::FoldAccents.to_string(), "fold_accents");
    }

    proptest! {
        #[test]
        fn prop_lowercase_idempotent(text in "[a-z0-9àéèêç ,.?!'-]{0,40}") {
            let once = lowercase(&text);
            prop_assert_eq!(&once, &text);
            prop_assert_eq!(lowercase(&once), once);
        }

        #[test]
        fn prop_stop_words_only_yields_empty(words in proptest::collection::vec(
            prop_oneof![Just("le"), Just("la"), Just("tu"), Just("que")],
            0..12,
        )) {
            let normalizer = french_normalizer();
            let text = words.join(" ");
            prop_assert_eq!(normalizer.apply(NormalizeStep::RemoveStopWords, &text), "");
        }

        #[test]
        fn prop_folded_text_has_no_combining_marks(text in "\\PC{0,30}") {
            prop_assert!(!fold_accents(&text).chars().any(is_combining_mark));
        }
    }
}
