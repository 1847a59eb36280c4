use thiserror::Error;

/// Errors returned by the Notion API client.
///
/// Any of these aborts a fetch; records accumulated from earlier pages are
/// discarded.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Notion answered with a non-2xx status. `code` and `message` come from
    /// the error envelope when the body carried one.
    #[error("Notion API error (HTTP {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached for database {database_id}: exceeded {max_pages} pages")]
    PaginationLimit {
        database_id: String,
        max_pages: usize,
    },

    #[error("invalid Notion base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
