use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::feddit::{Comment, FedditClient, FedditError, TimeWindow};
use crate::sentiment::{SentimentClassifier, SentimentLabel};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Feddit(#[from] FedditError),
    #[error("classification task failed: {0}")]
    Task(String),
}

/// Parameters of one aggregation request.
#[derive(Debug, Clone)]
pub struct SentimentQuery {
    pub subfeddit: String,
    pub window: TimeWindow,
    pub include_comments: bool,
    pub sort_by_polarity: bool,
}

/// Per-label tallies. Increment-only, so folding is insensitive to the
/// order in which classifications complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl LabelCounts {
    pub fn increment(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

/// One classified comment in the optional detail listing.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedComment {
    pub comment_id: i64,
    pub username: String,
    pub text: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub label: SentimentLabel,
    pub confidence: f64,
    pub polarity: f64,
}

/// Terminal artifact of one aggregation request.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationSummary {
    pub subfeddit: String,
    pub subfeddit_id: i64,
    pub min_datetime: Option<i64>,
    pub max_datetime: Option<i64>,
    pub total: u64,
    pub counts: LabelCounts,
    pub error_count: u64,
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<ClassifiedComment>>,
}

/// Fetches every comment in the requested window, classifies each one and
/// folds the outcomes into an `AggregationSummary`.
pub struct SentimentPipeline {
    feddit: FedditClient,
    classifier: Arc<SentimentClassifier>,
    max_concurrent: usize,
}

impl SentimentPipeline {
    pub fn new(
        feddit: FedditClient,
        classifier: SentimentClassifier,
        max_concurrent: usize,
    ) -> Self {
        Self {
            feddit,
            classifier: Arc::new(classifier),
            max_concurrent,
        }
    }

    pub async fn run(&self, query: &SentimentQuery) -> Result<AggregationSummary, PipelineError> {
        let subfeddit = self.feddit.resolve_subfeddit(&query.subfeddit).await?;
        let comments = self.fetch_all(subfeddit.id, query.window).await?;

        info!(
            "Fetched {} comments from subfeddit '{}'",
            comments.len(),
            query.subfeddit
        );

        let total = comments.len() as u64;
        let mut counts = LabelCounts::default();
        let mut error_count: u64 = 0;
        let mut classified = Vec::with_capacity(comments.len());

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(comments.len());

        for comment in comments {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::Task(e.to_string()))?;
            let classifier = self.classifier.clone();

            handles.push(tokio::spawn(async move {
                let outcome = classifier.classify(&comment.text).await;
                drop(permit);
                (comment, outcome)
            }));
        }

        // Every comment resolves to exactly one branch here; failed
        // classifications are counted, never dropped.
        for handle in handles {
            let (comment, outcome) = handle
                .await
                .map_err(|e| PipelineError::Task(e.to_string()))?;

            match outcome {
                Ok(result) => {
                    counts.increment(result.label);
                    classified.push(to_classified(comment, result));
                }
                Err(e) => {
                    error!(
                        "Failed to classify comment {}: {} ({})",
                        comment.id,
                        e,
                        e.kind()
                    );
                    error_count += 1;
                }
            }
        }

        let comments = if query.include_comments {
            if query.sort_by_polarity {
                classified.sort_by(|a, b| {
                    b.polarity
                        .partial_cmp(&a.polarity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            } else {
                classified.sort_by_key(|c| Reverse(c.created_at));
            }
            Some(classified)
        } else {
            None
        };

        Ok(AggregationSummary {
            subfeddit: query.subfeddit.clone(),
            subfeddit_id: subfeddit.id,
            min_datetime: query.window.min_datetime,
            max_datetime: query.window.max_datetime,
            total,
            counts,
            error_count,
            partial: error_count > 0,
            comments,
        })
    }

    /// Drive the pagination to completion. Comment-source failures abort the
    /// whole request; there is no well-defined partial comment list.
    async fn fetch_all(
        &self,
        subfeddit_id: i64,
        window: TimeWindow,
    ) -> Result<Vec<Comment>, FedditError> {
        let mut pages = self.feddit.comments(subfeddit_id, window);
        let mut comments = Vec::new();

        while let Some(page) = pages.next_page().await? {
            comments.extend(page);
        }

        Ok(comments)
    }
}

fn to_classified(
    comment: Comment,
    result: crate::sentiment::ClassificationResult,
) -> ClassifiedComment {
    ClassifiedComment {
        comment_id: comment.id,
        username: comment.username,
        text: comment.text,
        created_at: comment.created_at,
        label: result.label,
        confidence: result.confidence,
        polarity: result.polarity,
    }
}
