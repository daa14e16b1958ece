//! JSON output formatter for machine-readable results.

use super::formatter::BuildOutcome;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct BuildOutput<'a> {
    output_path: String,
    symbolic_name: Option<&'a str>,
    version: Option<&'a str>,
    entries: &'a [String],
    directories_added: usize,
    files_added: usize,
    contents_added: usize,
    bytes_written: u64,
    archive_size: u64,
    warnings: &'a [String],
}

impl<'a> BuildOutput<'a> {
    fn from_outcome(outcome: &BuildOutcome<'a>) -> Self {
        let report = outcome.report;
        Self {
            output_path: outcome.path.display().to_string(),
            symbolic_name: outcome.symbolic_name,
            version: outcome.version,
            entries: &report.entries,
            directories_added: report.directories_added,
            files_added: report.files_added,
            contents_added: report.contents_added,
            bytes_written: report.bytes_written,
            archive_size: report.archive_size,
            warnings: &report.warnings,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_build_result(&self, outcome: &BuildOutcome<'_>) -> Result<()> {
        let output = JsonOutput::success("build", BuildOutput::from_outcome(outcome));
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
