pub mod analyzer;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod output;

pub use analyzer::{normalize_url, Analyzer, HttpAnalyzer, PageResult};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use metrics::collector::MetricsCollector;
pub use metrics::snapshot::MetricsSnapshot;
