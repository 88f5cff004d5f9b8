use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub urls_queued: u64,
    pub urls_processed: u64,
    pub requests_success: u64,
    pub requests_failed: u64,
    pub active_tasks: u64,
    pub success_rate: f64,
    pub avg_response_time_ms: u64,
    pub elapsed_seconds: f64,
}
