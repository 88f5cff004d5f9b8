use crate::analyzer::HttpAnalyzer;
use crate::config::schema::{AnalyzeConfig, OutputFormat};
use crate::error::Result;
use crate::output::{csv::CsvOutput, console::ConsoleOutput, json::JsonOutput, ReportWriter};
use std::io::Write;
use std::time::Duration;
use validator::Validate;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Validates a configuration assembled from the command line.
    pub fn load(config: AnalyzeConfig) -> Result<AnalyzeConfig> {
        config.validate()?;
        Ok(config)
    }

    pub fn create_analyzer(config: &AnalyzeConfig) -> Result<HttpAnalyzer> {
        HttpAnalyzer::with_options(
            config.timeout_secs.map(Duration::from_secs),
            config.user_agent.as_deref(),
        )
    }

    pub fn create_report_writer<W>(format: OutputFormat, writer: W) -> Result<Box<dyn ReportWriter>>
    where
        W: Write + Send + 'static,
    {
        let handler: Box<dyn ReportWriter> = match format {
            OutputFormat::Console => Box::new(ConsoleOutput::new(writer)?),
            OutputFormat::Json => Box::new(JsonOutput::new(writer)?),
            OutputFormat::Csv => Box::new(CsvOutput::new(writer)),
        };
        Ok(handler)
    }
}
