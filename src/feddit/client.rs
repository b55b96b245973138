use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::FedditConfig;

use super::types::{Comment, CommentsPage, SubfedditInfo, SubfedditsPage, TimeWindow, VersionInfo};

const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Error)]
pub enum FedditError {
    /// The Feddit API could not be reached or answered with a failure status.
    #[error("feddit API unavailable: {0}")]
    Unavailable(String),
    /// The Feddit API answered 200 but the payload did not match the schema.
    #[error("feddit API returned a malformed response: {0}")]
    Malformed(String),
    #[error("subfeddit '{0}' not found")]
    SubfedditNotFound(String),
}

impl FedditError {
    /// Stable kind tag surfaced in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            FedditError::Unavailable(_) => "UpstreamUnavailable",
            FedditError::Malformed(_) => "UpstreamMalformed",
            FedditError::SubfedditNotFound(_) => "SubfedditNotFound",
        }
    }
}

/// Client for the Feddit comment API.
pub struct FedditClient {
    client: Client,
    base_url: String,
    page_size: u32,
    timeout: Duration,
}

impl FedditClient {
    pub fn new(config: &FedditConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Version string reported by the upstream API.
    pub async fn get_version(&self) -> Result<String, FedditError> {
        let info: VersionInfo = self
            .get(&format!("{}{}/version", self.base_url, API_PREFIX), &[])
            .await?;
        Ok(info.version)
    }

    /// Walk the subfeddit listing until one with the given title turns up.
    ///
    /// The upstream API has no title search, so the listing is traversed in
    /// `page_size` batches.
    pub async fn resolve_subfeddit(&self, title: &str) -> Result<SubfedditInfo, FedditError> {
        info!("Resolving subfeddit '{}'", title);

        let mut skip: u32 = 0;

        loop {
            let page: SubfedditsPage = self
                .get(
                    &format!("{}{}/subfeddits/", self.base_url, API_PREFIX),
                    &[
                        ("skip", skip.to_string()),
                        ("limit", self.page_size.to_string()),
                    ],
                )
                .await?;

            let batch_len = page.subfeddits.len() as u32;

            if let Some(subfeddit) = page.subfeddits.into_iter().find(|s| s.title == title) {
                debug!("Subfeddit '{}' resolved to id {}", title, subfeddit.id);
                return Ok(subfeddit);
            }

            if batch_len < self.page_size {
                return Err(FedditError::SubfedditNotFound(title.to_string()));
            }

            skip += self.page_size;
        }
    }

    /// Start a fresh paginated traversal over the comments of a subfeddit.
    pub fn comments(&self, subfeddit_id: i64, window: TimeWindow) -> CommentPages<'_> {
        CommentPages {
            client: self,
            subfeddit_id,
            window,
            skip: 0,
            done: false,
        }
    }

    async fn fetch_comment_page(
        &self,
        subfeddit_id: i64,
        skip: u32,
    ) -> Result<CommentsPage, FedditError> {
        self.get(
            &format!("{}{}/comments/", self.base_url, API_PREFIX),
            &[
                ("subfeddit_id", subfeddit_id.to_string()),
                ("skip", skip.to_string()),
                ("limit", self.page_size.to_string()),
            ],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FedditError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FedditError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FedditError::Unavailable(format!("{}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| FedditError::Malformed(e.to_string()))
    }
}

/// Paginated traversal over the comments of one subfeddit, filtered by a
/// time window. Finite; every logical request starts a fresh traversal.
pub struct CommentPages<'a> {
    client: &'a FedditClient,
    subfeddit_id: i64,
    window: TimeWindow,
    skip: u32,
    done: bool,
}

impl CommentPages<'_> {
    /// Fetch the next page of comments within the window. Returns `None`
    /// once the upstream batch comes back short of `page_size`.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Comment>>, FedditError> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .client
            .fetch_comment_page(self.subfeddit_id, self.skip)
            .await?;

        if (page.comments.len() as u32) < self.client.page_size {
            self.done = true;
        }
        self.skip += self.client.page_size;

        let comments = page
            .comments
            .into_iter()
            .filter(|c| self.window.contains(c.created_at))
            .collect();

        Ok(Some(comments))
    }
}
