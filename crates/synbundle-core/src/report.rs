//! Bundle materialization reporting.

/// Report of a single materialization.
///
/// # Examples
///
/// ```
/// use synbundle_core::BundleReport;
///
/// let mut report = BundleReport::new();
/// report.directories_added = 2;
/// report.files_added = 1;
/// report.contents_added = 3;
///
/// assert_eq!(report.total_entries(), 7); // includes the manifest
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Directory entries written, `META-INF/` included.
    pub directories_added: usize,

    /// Entries copied from external files.
    pub files_added: usize,

    /// Entries written from inline text.
    pub contents_added: usize,

    /// Uncompressed bytes written across all entries, manifest included.
    pub bytes_written: u64,

    /// Size of the finished archive in bytes.
    pub archive_size: u64,

    /// Archive entry names in the order they were written.
    pub entries: Vec<String>,

    /// Non-fatal findings, such as a manifest missing `Bundle-SymbolicName`.
    pub warnings: Vec<String>,
}

impl BundleReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archive entries, counting the manifest.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.directories_added + self.files_added + self.contents_added + 1
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_default() {
        let report = BundleReport::default();
        assert_eq!(report.directories_added, 0);
        assert_eq!(report.total_entries(), 1);
        assert!(report.entries.is_empty());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_add_warning() {
        let mut report = BundleReport::new();
        report.add_warning("manifest has no Bundle-SymbolicName header");
        report.add_warning(String::from("second"));
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 2);
    }
}
