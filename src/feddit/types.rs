use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single comment as returned by the Feddit API.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub username: String,
    pub text: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsPage {
    pub comments: Vec<Comment>,
}

/// Brief subfeddit record from the upstream listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SubfedditInfo {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SubfedditsPage {
    pub subfeddits: Vec<SubfedditInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

/// Inclusive window on comment creation time, in unix epoch seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindow {
    pub min_datetime: Option<i64>,
    pub max_datetime: Option<i64>,
}

impl TimeWindow {
    pub fn contains(&self, created_at: DateTime<Utc>) -> bool {
        let ts = created_at.timestamp();
        self.min_datetime.map_or(true, |min| ts >= min)
            && self.max_datetime.map_or(true, |max| ts <= max)
    }
}
