//! Sentiment classification for review text.
//!
//! A [`PolarityModel`] scores text into positive / negative / neutral
//! magnitudes; [`label_for`] turns those magnitudes into a single label with a
//! fixed three-branch decision tree.

mod default_lexicon;
mod lexicon;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use lexicon::LexiconModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent magnitudes in `[0, 1]`. They usually sum to 1 but nothing
/// here relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScore {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl PolarityScore {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }
}

/// Anything that can score a piece of text.
pub trait PolarityModel: Send + Sync {
    fn polarity_scores(&self, text: &str) -> PolarityScore;

    /// Model name for logging.
    fn name(&self) -> &str;
}

/// Negative only when it strictly beats both others, then neutral under the
/// same rule, otherwise positive. Ties (and NaN) land on positive; this is
/// not an argmax and must stay that way.
pub fn label_for(scores: &PolarityScore) -> Sentiment {
    let PolarityScore {
        positive: pos,
        negative: neg,
        neutral: neu,
    } = *scores;

    if neg > pos && neg > neu {
        Sentiment::Negative
    } else if neu > neg && neu > pos {
        Sentiment::Neutral
    } else {
        Sentiment::Positive
    }
}

/// Total text classifier: every input, including the empty string, gets one
/// of the three labels.
#[derive(Clone)]
pub struct SentimentClassifier {
    model: Arc<dyn PolarityModel>,
}

impl SentimentClassifier {
    pub fn new(model: Arc<dyn PolarityModel>) -> Self {
        Self { model }
    }

    pub fn scores(&self, text: &str) -> PolarityScore {
        self.model.polarity_scores(text)
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        let scores = self.scores(text);
        let label = label_for(&scores);
        tracing::debug!(
            model = self.model.name(),
            pos = scores.positive,
            neg = scores.negative,
            neu = scores.neutral,
            sentiment = %label,
            "Classified text"
        );
        label
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

impl fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("model", &self.model.name())
            .finish()
    }
}
