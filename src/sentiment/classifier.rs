use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ClassifierConfig;

use super::label::SentimentLabel;
use super::types::{ClassificationResult, SentimentScores};

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The inference API could not be reached or answered with a failure
    /// status.
    #[error("inference API unavailable: {0}")]
    Unavailable(String),
    /// The inference API answered 200 but the output is not a usable score
    /// set.
    #[error("inference API returned a bad response: {0}")]
    BadResponse(String),
}

impl ClassifierError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierError::Unavailable(_) => "ClassifierUnavailable",
            ClassifierError::BadResponse(_) => "ClassifierBadResponse",
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Wrapper around the hosted sentiment model. One inference call per
/// statement; the multi-class output is reduced to a single label with a
/// confidence and a polarity value.
pub struct SentimentClassifier {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl SentimentClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs: text })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Unavailable(format!("{}: {}", status, body)));
        }

        let outputs: Vec<Vec<LabelScore>> = response
            .json()
            .await
            .map_err(|e| ClassifierError::BadResponse(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ClassifierError::BadResponse("empty model output".to_string()))?;

        let scores = parse_scores(output)?;
        let label = SentimentLabel::from_scores(&scores);
        let confidence = scores.score(label);

        debug!("Classified statement as {} ({:.2})", label, confidence);

        Ok(ClassificationResult {
            label,
            confidence,
            polarity: scores.polarity(),
        })
    }
}

/// Validate that the output carries exactly the three expected classes with
/// scores in [0, 1], and fold it into a `SentimentScores`.
fn parse_scores(output: &[LabelScore]) -> Result<SentimentScores, ClassifierError> {
    let mut positive = None;
    let mut neutral = None;
    let mut negative = None;

    for entry in output {
        if !(0.0..=1.0).contains(&entry.score) {
            return Err(ClassifierError::BadResponse(format!(
                "score {} for label '{}' out of range",
                entry.score, entry.label
            )));
        }

        let slot = match entry.label.as_str() {
            "positive" => &mut positive,
            "neutral" => &mut neutral,
            "negative" => &mut negative,
            other => {
                return Err(ClassifierError::BadResponse(format!(
                    "unexpected label '{}'",
                    other
                )))
            }
        };

        if slot.replace(entry.score).is_some() {
            return Err(ClassifierError::BadResponse(format!(
                "duplicate label '{}'",
                entry.label
            )));
        }
    }

    match (positive, neutral, negative) {
        (Some(positive), Some(neutral), Some(negative)) => {
            if positive + neutral + negative == 0.0 {
                return Err(ClassifierError::BadResponse(
                    "all scores are zero".to_string(),
                ));
            }
            Ok(SentimentScores {
                positive,
                neutral,
                negative,
            })
        }
        _ => Err(ClassifierError::BadResponse(
            "output must contain the labels positive, neutral and negative".to_string(),
        )),
    }
}
