use super::{PageRecord, ReportWriter};
use crate::analyzer::PageResult;
use crate::error::Result;
use crate::metrics::snapshot::MetricsSnapshot;
use std::io::Write;

pub struct CsvOutput<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: Write + Send> ReportWriter for CsvOutput<W> {
    fn write(&mut self, result: &PageResult) -> Result<()> {
        self.writer.serialize(PageRecord::from(result))?;
        Ok(())
    }

    fn close(&mut self, _summary: &MetricsSnapshot) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
