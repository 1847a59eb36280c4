pub mod app_config;
pub mod config;
pub mod prospect;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use prospect::{PipelineStage, Prospect};

use thiserror::Error;

/// Errors raised while reading process configuration.
///
/// Both variants are fatal and are reported before any network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
