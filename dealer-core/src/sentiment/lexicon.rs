use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::Regex;

use super::default_lexicon::{BOOSTERS, NEGATIONS, VALENCES};
use super::{PolarityModel, PolarityScore};
use crate::error::DealerError;

const BOOST_DECAY: [f64; 3] = [1.0, 0.95, 0.9];
const NEGATION_SCALAR: f64 = -0.74;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;
const BEFORE_BUT: f64 = 0.5;
const AFTER_BUT: f64 = 1.5;

/// Rule-based valence lexicon model.
pub struct LexiconModel {
    valences: HashMap<String, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    token_pattern: Regex,
}

impl LexiconModel {
    /// Model with the built-in lexicon only.
    pub fn new() -> Result<Self, DealerError> {
        let token_pattern =
            Regex::new(r"[\p{L}\p{N}']+").map_err(|e| DealerError::Lexicon(e.to_string()))?;

        Ok(Self {
            valences: VALENCES
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            token_pattern,
        })
    }

    /// Built-in lexicon extended (and overridden) by the entries in `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DealerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut model = Self::new()?;
        let added = model.extend_from_str(&text)?;
        tracing::info!(path = %path.display(), entries = added, "Loaded lexicon file");
        Ok(model)
    }

    /// Built-in lexicon, or the built-in one extended from `path` when given.
    pub fn with_optional_file(path: Option<&str>) -> Result<Self, DealerError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::new(),
        }
    }

    /// Parse `token<TAB>valence[<TAB>...]` lines. Blank lines and `#`
    /// comments are skipped. Returns the number of entries read.
    pub fn extend_from_str(&mut self, text: &str) -> Result<usize, DealerError> {
        let mut added = 0;
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default().trim();
            let valence = fields
                .next()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or_else(|| {
                    DealerError::Lexicon(format!(
                        "line {}: expected `token<TAB>valence`, got {:?}",
                        lineno + 1,
                        line
                    ))
                })?;

            self.valences.insert(token.to_lowercase(), valence);
            added += 1;
        }
        Ok(added)
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(&word.to_lowercase()).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.contains("n't")
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.token_pattern
            .find_iter(text)
            .map(|m| m.as_str().trim_matches('\''))
            .filter(|token| token.chars().count() > 1)
            .collect()
    }

    fn token_valence(&self, tokens: &[&str], lowered: &[String], i: usize, caps_diff: bool) -> f64 {
        let word = lowered[i].as_str();
        if self.boosters.contains_key(word) {
            return 0.0;
        }
        let Some(mut valence) = self.valences.get(word).copied() else {
            return 0.0;
        };
        if valence == 0.0 {
            return 0.0;
        }

        if caps_diff && is_all_caps(tokens[i]) {
            valence += CAPS_INCREMENT.copysign(valence);
        }

        for (distance, decay) in BOOST_DECAY.iter().enumerate() {
            let Some(j) = i.checked_sub(distance + 1) else {
                break;
            };
            let previous = lowered[j].as_str();

            if let Some(scalar) = self.boosters.get(previous) {
                let boost = scalar * decay;
                valence += if valence < 0.0 { -boost } else { boost };
            }
            if self.is_negation(previous) {
                valence *= NEGATION_SCALAR;
            }
        }

        valence
    }
}

impl PolarityModel for LexiconModel {
    fn polarity_scores(&self, text: &str) -> PolarityScore {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return PolarityScore::default();
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
        let caps_diff = caps > 0 && caps < tokens.len();

        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, &lowered, i, caps_diff))
            .collect();

        if let Some(but) = lowered.iter().position(|w| w == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < but {
                    *valence *= BEFORE_BUT;
                } else if i > but {
                    *valence *= AFTER_BUT;
                }
            }
        }

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0usize;
        for valence in valences {
            if valence > 0.0 {
                pos_sum += valence + 1.0;
            } else if valence < 0.0 {
                neg_sum += valence - 1.0;
            } else {
                neu_count += 1;
            }
        }

        let emphasis = punctuation_emphasis(text);
        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let total = pos_sum + neg_sum.abs() + neu_count as f64;
        if total == 0.0 {
            return PolarityScore::default();
        }

        PolarityScore::new(
            round3(pos_sum / total),
            round3(neg_sum.abs() / total),
            round3(neu_count as f64 / total),
        )
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && token.to_uppercase() == token
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCREMENT,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamations as f64 * EXCLAMATION_INCREMENT + question_emphasis
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
