//! Notion API request and response types.
//!
//! Only the slice of the Notion object model that the dashboard reads is
//! modelled here. Page properties are kept as raw JSON on [`Page`] and decoded
//! one at a time through [`PropertyValue`], so a single malformed property
//! never fails the whole page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// databases/{id}/query
// ---------------------------------------------------------------------------

/// Body of a `POST databases/{id}/query` request.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// One page of query results.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A database row. Notion calls rows "pages".
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Page {
    /// Decodes the named property, returning `None` when it is absent or does
    /// not match any known property shape.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        let raw = self.properties.get(name)?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// Error envelope returned with non-2xx statuses:
/// `{"object": "error", "status": 400, "code": "validation_error", "message": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Property values
// ---------------------------------------------------------------------------

/// A typed page property, discriminated by its `"type"` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Select {
        select: Option<SelectOption>,
    },
    /// Workflow-state property; same payload shape as `select`.
    Status {
        status: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Number {
        number: Option<f64>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    Date {
        date: Option<DateValue>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// Date property payload. `start` is either `"YYYY-MM-DD"` or a full
/// RFC 3339 date-time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
}
