use crate::analyzer::PageResult;
use crate::error::Result;
use crate::metrics::snapshot::MetricsSnapshot;
use serde::Serialize;

pub mod console;
pub mod csv;
pub mod json;

pub trait ReportWriter: Send {
    fn write(&mut self, result: &PageResult) -> Result<()>;
    fn close(&mut self, _summary: &MetricsSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Flat, serializable view of a `PageResult` shared by the structured formats.
#[derive(Debug, Serialize)]
pub struct PageRecord<'a> {
    pub url: &'a str,
    pub word_count: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<f64>,
    pub error: Option<String>,
}

impl<'a> From<&'a PageResult> for PageRecord<'a> {
    fn from(result: &'a PageResult) -> Self {
        Self {
            url: &result.url,
            word_count: result.word_count,
            image_count: result.image_count,
            link_count: result.link_count,
            status_code: result.status_code,
            response_time_ms: result.response_time.map(|d| d.as_micros() as f64 / 1000.0),
            error: result.error.as_ref().map(|e| e.to_string()),
        }
    }
}
