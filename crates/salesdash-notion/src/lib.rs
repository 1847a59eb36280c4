//! Record fetcher for the prospects database hosted in Notion.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{NotionClient, MAX_PAGES, PAGE_SIZE};
pub use error::NotionError;
pub use normalize::normalize_page;
pub use types::{Page, PropertyValue, QueryResponse};
