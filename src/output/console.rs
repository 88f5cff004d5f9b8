use super::ReportWriter;
use crate::analyzer::PageResult;
use crate::error::Result;
use crate::metrics::snapshot::MetricsSnapshot;
use std::io::Write;

const SEPARATOR: &str = "--------------------";

/// Human-readable report, one block per URL.
pub struct ConsoleOutput<W: Write> {
    writer: W,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "Results:")?;
        writeln!(writer, "{}", SEPARATOR)?;
        Ok(Self { writer })
    }
}

impl<W: Write + Send> ReportWriter for ConsoleOutput<W> {
    fn write(&mut self, result: &PageResult) -> Result<()> {
        writeln!(self.writer, "URL: {}", result.url)?;
        if let Some(error) = &result.error {
            writeln!(self.writer, "Error: {}", error)?;
        } else {
            writeln!(self.writer, "Word count: {}", result.word_count)?;
            writeln!(self.writer, "Image count: {}", result.image_count)?;
            writeln!(self.writer, "Link count: {}", result.link_count)?;
            if let Some(status) = result.status_code {
                writeln!(self.writer, "Status code: {}", status)?;
            }
            if let Some(response_time) = result.response_time {
                writeln!(self.writer, "Response time: {:?}", response_time)?;
            }
        }
        writeln!(self.writer, "{}", SEPARATOR)?;
        Ok(())
    }

    fn close(&mut self, summary: &MetricsSnapshot) -> Result<()> {
        writeln!(
            self.writer,
            "Analyzed {} URLs: {} ok, {} failed, average response {}ms, total {:.1}s",
            summary.urls_processed,
            summary.requests_success,
            summary.requests_failed,
            summary.avg_response_time_ms,
            summary.elapsed_seconds
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
