//! Rule-based polarity scorer (terminal fallback)
//!
//! A VADER-style lexicon scorer: per-word valences adjusted by boosters,
//! negations, capitalization, contrastive "but", idioms and punctuation,
//! then squashed into a compound score in [-1, 1]. Word valences come from
//! the VADER lexicon shipped with the `vader_sentiment` crate, extended with
//! romanized Hindi. The scorer cannot fail once constructed.

use aho_corasick::{AhoCorasick, MatchKind};
use bhavna_core::Result;
use std::collections::HashMap;

/// Normalization constant approximating the max expected valence sum
const ALPHA: f64 = 15.0;

/// Booster/dampener increment
const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;

/// Emphasis added to ALL-CAPS words in mixed-case text
const C_INCR: f64 = 0.733;

/// Scale applied to a negated valence
const N_SCALAR: f64 = -0.74;

const EXCLAMATION_INCR: f64 = 0.292;
const QUESTION_INCR: f64 = 0.18;

/// Romanized Hindi valences layered over the VADER word list
const ROMANIZED_HINDI: &[(&str, f64)] = &[
    ("acha", 1.9),
    ("accha", 1.9),
    ("achha", 1.9),
    ("badhiya", 2.5),
    ("badiya", 2.5),
    ("mast", 2.0),
    ("khush", 2.7),
    ("pyaar", 3.2),
    ("pyar", 3.2),
    ("pasand", 2.0),
    ("pasandh", 2.0),
    ("sahi", 1.5),
    ("shukriya", 1.9),
    ("dhanyavaad", 1.9),
    ("bura", -2.5),
    ("bekaar", -2.0),
    ("bekar", -2.0),
    ("ganda", -2.0),
    ("galat", -1.8),
    ("dukhi", -2.1),
    ("gussa", -2.3),
    ("pareshan", -1.9),
    ("bakwas", -2.4),
];

/// Multi-word expressions whose valence replaces that of their words
const IDIOMS: &[(&str, f64)] = &[
    ("the shit", 3.0),
    ("the bomb", 3.0),
    ("bad ass", 1.5),
    ("badass", 1.5),
    ("yeah right", -2.0),
    ("kiss of death", -1.5),
    ("to die for", 3.0),
    ("beating heart", 3.1),
    ("broken heart", -2.9),
    ("cut the mustard", 2.0),
    ("hand to mouth", -2.0),
    ("back handed", -2.0),
    ("blow smoke", -2.0),
    ("blowing smoke", -2.0),
    ("upper hand", 1.0),
    ("break a leg", 2.0),
    ("cooking with gas", 2.0),
    ("in the black", 2.0),
    ("in the red", -2.0),
    ("on the ball", 2.0),
    ("under the weather", -2.0),
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", B_INCR),
    ("amazingly", B_INCR),
    ("awfully", B_INCR),
    ("completely", B_INCR),
    ("considerably", B_INCR),
    ("deeply", B_INCR),
    ("enormously", B_INCR),
    ("entirely", B_INCR),
    ("especially", B_INCR),
    ("exceptionally", B_INCR),
    ("extremely", B_INCR),
    ("greatly", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredibly", B_INCR),
    ("intensely", B_INCR),
    ("more", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("purely", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("substantially", B_INCR),
    ("thoroughly", B_INCR),
    ("totally", B_INCR),
    ("tremendously", B_INCR),
    ("unbelievably", B_INCR),
    ("utterly", B_INCR),
    ("very", B_INCR),
    ("bahut", B_INCR),
    ("bohot", B_INCR),
    ("ekdum", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("less", B_DECR),
    ("little", B_DECR),
    ("marginally", B_DECR),
    ("occasionally", B_DECR),
    ("partly", B_DECR),
    ("scarcely", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
    ("thoda", B_DECR),
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "wasnt", "werent",
    "without", "wont", "wouldnt", "rarely", "seldom", "despite", "nahi", "nahin", "nhi", "mat",
];

/// Polarity of a text as produced by the lexicon scorer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// A whitespace-delimited word with its byte span in the source text
struct Word<'a> {
    raw: &'a str,
    lower: String,
    start: usize,
    end: usize,
}

impl Word<'_> {
    fn is_all_caps(&self) -> bool {
        self.raw.chars().any(|c| c.is_alphabetic())
            && self
                .raw
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(|c| c.is_uppercase())
    }
}

/// VADER-style lexicon scorer
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
    boosters: HashMap<&'static str, f64>,
    idioms: AhoCorasick,
    idiom_valences: Vec<f64>,
}

impl LexiconScorer {
    /// Create a scorer with the VADER lexicon and romanized Hindi entries
    pub fn new() -> Result<Self> {
        Self::with_extra_entries(HashMap::new())
    }

    /// Create a scorer with additional (or overriding) lexicon entries
    pub fn with_extra_entries(extra: HashMap<String, f64>) -> Result<Self> {
        let mut lexicon: HashMap<String, f64> = vader_sentiment::LEXICON
            .iter()
            .map(|(word, valence)| (word.to_lowercase(), *valence))
            .collect();
        for (word, valence) in ROMANIZED_HINDI {
            lexicon.entry(word.to_string()).or_insert(*valence);
        }
        for (word, valence) in extra {
            lexicon.insert(word.to_lowercase(), valence.clamp(-4.0, 4.0));
        }

        let idioms = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(IDIOMS.iter().map(|(phrase, _)| *phrase))
            .map_err(|e| {
                bhavna_core::Error::classifier(format!("Failed to build idiom matcher: {e}"))
            })?;

        Ok(Self {
            lexicon,
            boosters: BOOSTERS.iter().copied().collect(),
            idioms,
            idiom_valences: IDIOMS.iter().map(|(_, valence)| *valence).collect(),
        })
    }

    /// Number of lexicon entries
    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    /// Score a text
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let words = tokenize(text);
        if words.is_empty() {
            return PolarityScores::default();
        }

        let caps_differ = {
            let caps = words.iter().filter(|w| w.is_all_caps()).count();
            caps > 0 && caps < words.len()
        };

        let mut sentiments: Vec<f64> = words
            .iter()
            .enumerate()
            .map(|(i, word)| self.word_valence(&words, i, word, caps_differ))
            .collect();

        self.apply_idioms(text, &words, &mut sentiments);
        apply_but_check(&words, &mut sentiments);

        score_valence(&sentiments, text)
    }

    fn word_valence(&self, words: &[Word<'_>], i: usize, word: &Word<'_>, caps_differ: bool) -> f64 {
        if self.boosters.contains_key(word.lower.as_str()) {
            return 0.0;
        }

        let Some(&base) = self.lexicon.get(&word.lower) else {
            return 0.0;
        };

        let mut valence = base;
        if caps_differ && word.is_all_caps() {
            valence += C_INCR * valence.signum();
        }

        for distance in 0..3 {
            if i <= distance {
                break;
            }
            let prev = &words[i - distance - 1];
            if self.lexicon.contains_key(&prev.lower) {
                continue;
            }

            let mut scalar = self.booster_scalar(prev, valence, caps_differ);
            match distance {
                1 => scalar *= 0.95,
                2 => scalar *= 0.9,
                _ => {}
            }
            valence += scalar;

            if is_negation(&prev.lower) {
                valence *= N_SCALAR;
            }
        }

        valence
    }

    fn booster_scalar(&self, word: &Word<'_>, valence: f64, caps_differ: bool) -> f64 {
        let Some(&boost) = self.boosters.get(word.lower.as_str()) else {
            return 0.0;
        };

        let mut scalar = if valence < 0.0 { -boost } else { boost };
        if caps_differ && word.is_all_caps() {
            scalar += C_INCR * valence.signum();
        }
        scalar
    }

    /// Replace the valence of words covered by an idiom with the idiom's own
    fn apply_idioms(&self, text: &str, words: &[Word<'_>], sentiments: &mut [f64]) {
        for m in self.idioms.find_iter(text) {
            if !is_word_boundary(text, m.start(), m.end()) {
                continue;
            }

            let covered: Vec<usize> = words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.start < m.end() && w.end > m.start())
                .map(|(i, _)| i)
                .collect();

            if let Some((&first, rest)) = covered.split_first() {
                sentiments[first] = self.idiom_valences[m.pattern().as_usize()];
                for &i in rest {
                    sentiments[i] = 0.0;
                }
            }
        }
    }
}

fn tokenize(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (start, ch.is_whitespace()) {
            (None, false) => start = Some(idx),
            (Some(s), true) => {
                push_word(&mut words, text, s, idx);
                start = None;
            }
            _ => {}
        }
    }

    words
}

fn push_word<'a>(words: &mut Vec<Word<'a>>, text: &'a str, start: usize, end: usize) {
    let token = &text[start..end];
    let trimmed = token.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\'');
    if trimmed.is_empty() {
        return;
    }

    let offset = token.find(trimmed).unwrap_or(0);
    words.push(Word {
        raw: trimmed,
        lower: trimmed.to_lowercase(),
        start: start + offset,
        end: start + offset + trimmed.len(),
    });
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

fn is_negation(word: &str) -> bool {
    let stripped: String = word.chars().filter(|c| *c != '\'').collect();
    NEGATIONS.contains(&stripped.as_str()) || word.ends_with("n't")
}

/// Contrastive conjunction: dampen what precedes "but", amplify what follows
fn apply_but_check(words: &[Word<'_>], sentiments: &mut [f64]) {
    let Some(but_idx) = words.iter().position(|w| w.lower == "but") else {
        return;
    };

    for (i, sentiment) in sentiments.iter_mut().enumerate() {
        if i < but_idx {
            *sentiment *= 0.5;
        } else if i > but_idx {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * EXCLAMATION_INCR;

    let questions = text.matches('?').count();
    let questions = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => 0.96,
    };

    exclamations + questions
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    let punct = punctuation_emphasis(text);

    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    let mut pos_sum: f64 = sentiments.iter().filter(|s| **s > 0.0).map(|s| s + 1.0).sum();
    let mut neg_sum: f64 = sentiments.iter().filter(|s| **s < 0.0).map(|s| s - 1.0).sum();
    let neu_count = sentiments.iter().filter(|s| **s == 0.0).count() as f64;

    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    if total == 0.0 {
        return PolarityScores::default();
    }

    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
