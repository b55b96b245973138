use serde::Serialize;

use super::label::SentimentLabel;

/// Per-class scores returned by the model, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentScores {
    pub fn score(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    /// Polarity in [-1, 1]; the neutral mass acts as a damping factor.
    pub fn polarity(&self) -> f64 {
        (self.positive - self.negative) / (self.positive + self.neutral + self.negative)
    }
}

/// Outcome of classifying a single piece of text.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub polarity: f64,
}
