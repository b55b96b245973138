use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::SentimentScores;

/// Sentiment classes produced by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Pick the highest-scoring class. Ties resolve by the fixed priority
    /// neutral > positive > negative.
    pub fn from_scores(scores: &SentimentScores) -> Self {
        let mut best = (SentimentLabel::Neutral, scores.neutral);

        for candidate in [
            (SentimentLabel::Positive, scores.positive),
            (SentimentLabel::Negative, scores.negative),
        ] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }

        best.0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
