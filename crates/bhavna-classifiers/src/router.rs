//! Script and language based routing
//!
//! Decides per statement whether the Hinglish model or the standard
//! multilingual model should see it. The decision is heuristic: script
//! inspection, an optional language identifier and a closed vocabulary of
//! romanized Hindi function words. No ground truth is involved.

use crate::language::LanguageIdentifier;
use bhavna_core::Route;
use std::collections::HashSet;
use std::sync::Arc;

/// Romanized Hindi words that mark a statement as Hinglish.
///
/// A few of them ("the", "main", "sun") are also common English words, so
/// some English text takes the Hinglish route. Use
/// [`ScriptRouter::with_keywords`] for a narrower vocabulary.
pub const HINGLISH_KEYWORDS: &[&str] = &[
    "kya", "kyu", "kaise", "kese", "tha", "thi", "the", "hai", "h", "ho", "bhai", "matlab", "nhi",
    "nahi", "acha", "bura", "sahi", "galat", "pyaar", "pasand", "mujhe", "tu", "tum", "hum",
    "main", "mera", "meri", "karna", "kar", "raha", "rahi", "dekh", "sun", "bol", "heh",
    "pasandh",
];

/// Devanagari Unicode block
const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Check if text contains any Devanagari character
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(|c| DEVANAGARI.contains(&c))
}

/// Routes statements between the Hinglish and standard classifiers
#[derive(Clone)]
pub struct ScriptRouter {
    keywords: HashSet<String>,
    identifier: Option<Arc<dyn LanguageIdentifier>>,
}

impl ScriptRouter {
    /// Router with the built-in vocabulary and no language identifier
    pub fn new() -> Self {
        Self {
            keywords: HINGLISH_KEYWORDS.iter().map(|w| w.to_string()).collect(),
            identifier: None,
        }
    }

    /// Attach a language identifier
    pub fn with_identifier(mut self, identifier: Arc<dyn LanguageIdentifier>) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Replace the Hinglish vocabulary
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    /// Choose a route for `text`. First match wins:
    /// Devanagari script, identified Hindi, Hinglish vocabulary, default.
    pub fn classify_route(&self, text: &str) -> Route {
        if contains_devanagari(text) {
            return Route::Standard;
        }

        let identified = self.identifier.as_ref().and_then(|id| id.identify(text));
        if identified.as_deref() == Some("hi") {
            return Route::Hinglish;
        }

        if self.has_hinglish_keyword(text) {
            return Route::Hinglish;
        }

        Route::Standard
    }

    fn has_hinglish_keyword(&self, text: &str) -> bool {
        text.split_whitespace()
            .map(|token| token.trim_matches(|c: char| c.is_ascii_punctuation()))
            .any(|token| self.keywords.contains(&token.to_lowercase()))
    }
}

impl Default for ScriptRouter {
    fn default() -> Self {
        Self::new()
    }
}
