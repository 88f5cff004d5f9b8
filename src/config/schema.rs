use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeConfig {
    #[validate(length(min = 1))]
    pub urls: Vec<String>,

    /// Upper bound on requests in flight. Unbounded when absent.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub concurrency: Option<usize>,

    /// Whole-request timeout. The HTTP client's default applies when absent.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Csv,
}
