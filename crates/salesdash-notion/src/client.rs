//! HTTP client for the Notion database query API.
//!
//! Wraps `reqwest` with Notion-specific authentication headers, error
//! envelope decoding, and cursor pagination. Requests are issued strictly one
//! at a time and are never retried: the first failure ends the fetch.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use salesdash_core::{AppConfig, Prospect};

use crate::error::NotionError;
use crate::normalize::{normalize_page, status_representation};
use crate::types::{ErrorEnvelope, Page, QueryRequest, QueryResponse};

const DEFAULT_USER_AGENT: &str = "salesdash/0.1 (sales-dashboard)";

/// API version pinned in the `Notion-Version` header.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Rows requested per query call. 100 is the maximum Notion accepts.
pub const PAGE_SIZE: u32 = 100;

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
pub const MAX_PAGES: usize = 1000;

/// Client for the Notion REST API.
///
/// Use [`NotionClient::from_config`] in the binary, or
/// [`NotionClient::with_base_url`] to point at a mock server in tests.
pub struct NotionClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_pages: usize,
}

impl NotionClient {
    /// Creates a client from the run configuration (key, base URL, timeout
    /// and user agent).
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`NotionError::InvalidBaseUrl`] if the configured base URL does not
    /// parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotionError> {
        Self::build(
            &config.notion_api_key,
            config.request_timeout_secs,
            &config.user_agent,
            &config.notion_base_url,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`NotionError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NotionError> {
        Self::build(api_key, timeout_secs, DEFAULT_USER_AGENT, base_url)
    }

    /// Lowers the page cap (default [`MAX_PAGES`]).
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn build(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, NotionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so path segments are
        // appended after the version prefix instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NotionError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(NotionError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_pages: MAX_PAGES,
        })
    }

    /// Fetches one page of rows from a database.
    ///
    /// # Errors
    ///
    /// - [`NotionError::Api`] if Notion answers with a non-2xx status.
    /// - [`NotionError::Http`] on network failure.
    /// - [`NotionError::Deserialize`] if the body is not a query result.
    pub async fn query_page(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse, NotionError> {
        let url = self.query_url(database_id)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&QueryRequest {
                page_size: PAGE_SIZE,
                start_cursor,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| NotionError::Deserialize {
            context: format!("query(database={database_id})"),
            source: e,
        })
    }

    /// Fetches every row of a database by following `next_cursor` until
    /// Notion reports no further pages.
    ///
    /// Rows are returned in source order, pages concatenated in request order.
    ///
    /// **All-or-nothing semantics**: on any page failure the rows gathered so
    /// far are discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::query_page`]. Returns
    /// [`NotionError::PaginationLimit`] if more than the configured page cap
    /// would be requested.
    pub async fn fetch_all(&self, database_id: &str) -> Result<Vec<Page>, NotionError> {
        let mut all_pages: Vec<Page> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > self.max_pages {
                return Err(NotionError::PaginationLimit {
                    database_id: database_id.to_owned(),
                    max_pages: self.max_pages,
                });
            }

            let response = self.query_page(database_id, cursor.as_deref()).await?;
            let received = response.results.len();
            all_pages.extend(response.results);

            tracing::info!(
                page = page_count,
                received,
                total = all_pages.len(),
                "fetched Notion page"
            );

            if !response.has_more {
                break;
            }
            match response.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => {
                    tracing::warn!(
                        page = page_count,
                        "Notion reported more results but sent no cursor; stopping"
                    );
                    break;
                }
            }
        }

        tracing::info!(
            total = all_pages.len(),
            pages = page_count,
            "Notion fetch complete"
        );
        Ok(all_pages)
    }

    /// Fetches every row of a database and normalizes it into [`Prospect`]s.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_all`]. Normalization itself never fails.
    pub async fn fetch_prospects(&self, database_id: &str) -> Result<Vec<Prospect>, NotionError> {
        let pages = self.fetch_all(database_id).await?;

        if let Some(first) = pages.first() {
            tracing::debug!(
                page_id = %first.id,
                status_type = status_representation(first).unwrap_or("absent"),
                "status property representation of first row"
            );
        }

        Ok(pages.iter().map(normalize_page).collect())
    }

    /// Builds `{base}/databases/{id}/query`, percent-encoding the id.
    fn query_url(&self, database_id: &str) -> Result<Url, NotionError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| NotionError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["databases", database_id, "query"]);
        Ok(url)
    }

    /// Turns a non-2xx response into [`NotionError::Api`], reading `code` and
    /// `message` from the error envelope when the body carries one.
    fn api_error(status: StatusCode, body: &str) -> NotionError {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let code = envelope
            .as_ref()
            .and_then(|e| e.code.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let message = envelope
            .and_then(|e| e.message)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        NotionError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
