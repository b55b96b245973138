use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::feddit::TimeWindow;
use crate::pipeline::{AggregationSummary, SentimentQuery};

use super::error::ApiError;
use super::state::AppState;

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct SentimentParams {
    #[serde(default)]
    pub subfeddit: String,
    pub min_datetime: Option<i64>,
    pub max_datetime: Option<i64>,
    #[serde(default)]
    pub include_comments: bool,
    #[serde(default)]
    pub sort_by_polarity: bool,
}

impl SentimentParams {
    /// Validate the request before any upstream call is made.
    fn into_query(self) -> Result<SentimentQuery, ApiError> {
        let subfeddit = self.subfeddit.trim().to_string();
        if subfeddit.is_empty() {
            return Err(ApiError::invalid_request("subfeddit must not be empty"));
        }

        if let (Some(min), Some(max)) = (self.min_datetime, self.max_datetime) {
            if min > max {
                return Err(ApiError::invalid_request(
                    "min_datetime cannot be greater than max_datetime",
                ));
            }
        }

        Ok(SentimentQuery {
            subfeddit,
            window: TimeWindow {
                min_datetime: self.min_datetime,
                max_datetime: self.max_datetime,
            },
            include_comments: self.include_comments,
            sort_by_polarity: self.sort_by_polarity,
        })
    }
}

pub async fn sentiment(
    State(state): State<AppState>,
    Query(params): Query<SentimentParams>,
) -> Result<Json<AggregationSummary>, ApiError> {
    let query = params.into_query()?;

    info!(
        "Processing sentiment request for subfeddit '{}'",
        query.subfeddit
    );

    let summary = state
        .pipeline
        .run(&query)
        .await
        .map_err(|e| ApiError::from_pipeline(&query.subfeddit, e))?;

    Ok(Json(summary))
}
