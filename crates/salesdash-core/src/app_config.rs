use std::path::PathBuf;

/// Settings for one dashboard run, built once at startup and passed down
/// explicitly to the fetcher and the writer.
#[derive(Clone)]
pub struct AppConfig {
    pub notion_api_key: String,
    pub notion_database_id: String,
    pub notion_base_url: String,
    pub output_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Returns the API key shortened for log output: the first ten characters
    /// followed by `...`.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let prefix: String = self.notion_api_key.chars().take(10).collect();
        format!("{prefix}...")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("notion_api_key", &"[redacted]")
            .field("notion_database_id", &self.notion_database_id)
            .field("notion_base_url", &self.notion_base_url)
            .field("output_path", &self.output_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
