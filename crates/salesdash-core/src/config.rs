use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    // A variable set to an empty or whitespace-only string counts as missing.
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let notion_api_key = require("NOTION_API_KEY")?;
    let notion_database_id = require("NOTION_DATABASE_ID")?;

    let notion_base_url = or_default("SALESDASH_NOTION_BASE_URL", "https://api.notion.com/v1");
    if notion_base_url.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SALESDASH_NOTION_BASE_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let output_path = PathBuf::from(or_default("SALESDASH_OUTPUT_PATH", "index.html"));
    let log_level = or_default("SALESDASH_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SALESDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SALESDASH_USER_AGENT", "salesdash/0.1 (sales-dashboard)");

    Ok(AppConfig {
        notion_api_key,
        notion_database_id,
        notion_base_url,
        output_path,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
