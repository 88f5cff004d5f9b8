use crate::metrics::snapshot::MetricsSnapshot;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct MetricsCollector {
    urls_queued: Arc<AtomicU64>,
    urls_processed: Arc<AtomicU64>,
    requests_success: Arc<AtomicU64>,
    requests_failed: Arc<AtomicU64>,
    active_tasks: Arc<AtomicU64>,
    // Only responses that arrived contribute.
    timed_responses: Arc<AtomicU64>,
    total_response_time_ms: Arc<AtomicU64>,
    start_time: Arc<Instant>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            urls_queued: Arc::new(AtomicU64::new(0)),
            urls_processed: Arc::new(AtomicU64::new(0)),
            requests_success: Arc::new(AtomicU64::new(0)),
            requests_failed: Arc::new(AtomicU64::new(0)),
            active_tasks: Arc::new(AtomicU64::new(0)),
            timed_responses: Arc::new(AtomicU64::new(0)),
            total_response_time_ms: Arc::new(AtomicU64::new(0)),
            start_time: Arc::new(Instant::now()),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_urls_queued(&self) {
        self.urls_queued.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_active_tasks(&self) {
        self.active_tasks.fetch_add(1, Ordering::SeqCst);
    }

    pub fn decrement_active_tasks(&self) {
        self.active_tasks.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn record_success(&self, response_time: Option<Duration>) {
        self.urls_processed.fetch_add(1, Ordering::SeqCst);
        self.requests_success.fetch_add(1, Ordering::SeqCst);
        self.record_response_time(response_time);
    }

    pub fn record_failure(&self, response_time: Option<Duration>) {
        self.urls_processed.fetch_add(1, Ordering::SeqCst);
        self.requests_failed.fetch_add(1, Ordering::SeqCst);
        self.record_response_time(response_time);
    }

    fn record_response_time(&self, response_time: Option<Duration>) {
        if let Some(duration) = response_time {
            self.timed_responses.fetch_add(1, Ordering::SeqCst);
            self.total_response_time_ms
                .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let processed = self.urls_processed.load(Ordering::SeqCst);
        let success = self.requests_success.load(Ordering::SeqCst);
        let timed = self.timed_responses.load(Ordering::SeqCst);
        let total_time = self.total_response_time_ms.load(Ordering::SeqCst);

        let success_rate = if processed > 0 {
            (success as f64 / processed as f64) * 100.0
        } else {
            0.0
        };

        let avg_response_time_ms = if timed > 0 { total_time / timed } else { 0 };

        MetricsSnapshot {
            urls_queued: self.urls_queued.load(Ordering::SeqCst),
            urls_processed: processed,
            requests_success: success,
            requests_failed: self.requests_failed.load(Ordering::SeqCst),
            active_tasks: self.active_tasks.load(Ordering::SeqCst),
            success_rate,
            avg_response_time_ms,
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}
