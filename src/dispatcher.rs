use crate::analyzer::{normalize_url, Analyzer, PageResult};
use crate::error::Error;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::snapshot::MetricsSnapshot;
use futures::future::join_all;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};

/// Runs one task per URL and gathers the results in input order.
pub struct Dispatcher {
    /// Maximum number of requests in flight; `None` means unbounded.
    concurrency: Option<NonZeroUsize>,
    metrics: Arc<MetricsCollector>,
}

impl Dispatcher {
    pub fn new(
        concurrency: Option<NonZeroUsize>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            concurrency,
            metrics: metrics.unwrap_or_else(|| Arc::new(MetricsCollector::new())),
        }
    }

    /// Analyzes every URL concurrently and returns once all of them are done.
    ///
    /// The returned vector has one entry per input URL, at the same index,
    /// whatever order the tasks finished in. A failing or panicking task only
    /// affects its own entry.
    pub async fn analyze(
        &self,
        analyzer: Arc<dyn Analyzer>,
        urls: Vec<String>,
    ) -> Vec<PageResult> {
        if urls.is_empty() {
            return Vec::new();
        }

        let limiter = self.concurrency.map(|n| Arc::new(Semaphore::new(n.get())));

        let handles: Vec<_> = urls
            .iter()
            .cloned()
            .map(|url| {
                self.metrics.increment_urls_queued();
                let analyzer = analyzer.clone();
                let limiter = limiter.clone();
                let metrics = self.metrics.clone();

                tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring only waits.
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    metrics.increment_active_tasks();

                    let result = analyzer.analyze(url).await;

                    if result.is_success() {
                        metrics.record_success(result.response_time);
                    } else {
                        metrics.record_failure(result.response_time);
                    }
                    metrics.decrement_active_tasks();
                    result
                })
            })
            .collect();

        // Join in spawn order: slot i always belongs to urls[i].
        let joined = join_all(handles).await;

        let results = joined
            .into_iter()
            .zip(urls)
            .map(|(outcome, url)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Analysis task for {} failed: {}", url, e);
                    // A panic inside `analyze` skips the task's own bookkeeping.
                    self.metrics.decrement_active_tasks();
                    self.metrics.record_failure(None);
                    PageResult::failed(normalize_url(&url), Error::Task(e.to_string()))
                }
            })
            .collect();

        log::debug!("Batch finished.");
        results
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Publishes a fresh snapshot every 500ms until the receiver is dropped.
    pub fn watch_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        let (tx, rx) = watch::channel(self.metrics.snapshot());
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(500));
            loop {
                interval.tick().await;
                if tx.send(metrics.snapshot()).is_err() {
                    break;
                }
            }
        });
        rx
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(None, None)
    }
}
