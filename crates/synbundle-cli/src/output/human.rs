//! Human-readable output formatter with colors and styling.

use super::formatter::BuildOutcome;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;

        if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn write_warning(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_build_result(&self, outcome: &BuildOutcome<'_>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let report = outcome.report;

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Bundle created: {}",
                style("✓").green().bold(),
                outcome.path.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Bundle created: {}", outcome.path.display()));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Symbolic name:  {}",
            outcome.symbolic_name.unwrap_or("(none)")
        ));
        let _ = self.term.write_line(&format!(
            "  Version:        {}",
            outcome.version.unwrap_or("(none)")
        ));
        let _ = self
            .term
            .write_line(&format!("  Entries:        {}", report.total_entries()));
        let _ = self
            .term
            .write_line(&format!("  Archive size:   {}", Self::format_size(report.archive_size)));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Directories:    {}", report.directories_added));
            let _ = self
                .term
                .write_line(&format!("  Files:          {}", report.files_added));
            let _ = self
                .term
                .write_line(&format!("  Contents:       {}", report.contents_added));
            let _ = self.term.write_line(&format!(
                "  Uncompressed:   {}",
                Self::format_size(report.bytes_written)
            ));
            let _ = self.term.write_line("");
            for entry in &report.entries {
                let _ = self.term.write_line(&format!("    {entry}"));
            }
        }

        for warning in &report.warnings {
            self.write_warning(warning);
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
