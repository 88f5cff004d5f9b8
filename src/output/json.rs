use super::{PageRecord, ReportWriter};
use crate::analyzer::PageResult;
use crate::error::Result;
use crate::metrics::snapshot::MetricsSnapshot;
use std::io::Write;

/// Streams results as a single JSON array.
pub struct JsonOutput<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonOutput<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        write!(writer, "[")?;

        Ok(Self {
            writer,
            first: true,
        })
    }
}

impl<W: Write + Send> ReportWriter for JsonOutput<W> {
    fn write(&mut self, result: &PageResult) -> Result<()> {
        if !self.first {
            write!(self.writer, ",")?;
        } else {
            self.first = false;
        }

        serde_json::to_writer(&mut self.writer, &PageRecord::from(result))?;
        Ok(())
    }

    fn close(&mut self, _summary: &MetricsSnapshot) -> Result<()> {
        writeln!(self.writer, "]")?;
        self.writer.flush()?;
        Ok(())
    }
}
