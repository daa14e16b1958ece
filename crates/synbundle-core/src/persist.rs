//! Writing materialized bundles to disk.
//!
//! The archive is fully built in memory before the destination is touched,
//! then staged in a sibling temporary file and renamed into place. A failed
//! build or write never leaves a truncated archive at the destination.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tempfile::TempPath;
use tracing::info;

use crate::builder::BundleBuilder;
use crate::error::BundleError;
use crate::error::Result;
use crate::report::BundleReport;

/// A bundle written to a caller-chosen location.
#[derive(Debug, Clone)]
pub struct WrittenBundle {
    /// Destination the archive was written to.
    pub path: PathBuf,
    /// Report of the materialization.
    pub report: BundleReport,
}

impl BundleBuilder {
    /// Materializes the bundle and writes it to `dest`, creating missing
    /// parent directories. An existing file at `dest` is replaced.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use synbundle_core::BundleBuilder;
    ///
    /// let written = BundleBuilder::new()
    ///     .symbolic_name("com.example.a")
    ///     .add_content("data/hello.txt", "hello")
    ///     .write_to_path("target/bundles/a.jar")?;
    /// println!("wrote {} entries", written.report.total_entries());
    /// # Ok::<(), synbundle_core::BundleError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A source file cannot be read
    /// - Two entries share an archive name
    /// - The parent directory cannot be created
    /// - The destination cannot be written or replaced
    pub fn write_to_path(&self, dest: impl AsRef<Path>) -> Result<WrittenBundle> {
        let dest = dest.as_ref();
        let (bytes, report) = self.to_bytes_with_report()?;
        persist_bytes(&bytes, dest)?;

        info!(path = %dest.display(), archive_size = report.archive_size, "bundle written");
        Ok(WrittenBundle {
            path: dest.to_path_buf(),
            report,
        })
    }

    /// Writes the bundle into `dir` under [`default_file_name`].
    ///
    /// The returned [`TempPath`] deletes the file when dropped; call
    /// [`TempPath::keep`] to retain it.
    ///
    /// [`default_file_name`]: BundleBuilder::default_file_name
    pub fn write_default_in(&self, dir: impl AsRef<Path>) -> Result<TempPath> {
        let dest = dir.as_ref().join(self.default_file_name());
        let written = self.write_to_path(dest)?;
        Ok(TempPath::from_path(written.path))
    }

    /// Writes the bundle into the system temporary directory under
    /// [`default_file_name`], deleted when the returned handle is dropped.
    ///
    /// [`default_file_name`]: BundleBuilder::default_file_name
    pub fn write_default(&self) -> Result<TempPath> {
        self.write_default_in(std::env::temp_dir())
    }
}

fn persist_bytes(bytes: &[u8], dest: &Path) -> Result<()> {
    let persist_err = |source: io::Error| BundleError::Persist {
        path: dest.to_path_buf(),
        source,
    };

    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(persist_err)?;

    let mut staged = NamedTempFile::new_in(parent).map_err(persist_err)?;
    staged.write_all(bytes).map_err(persist_err)?;
    staged.flush().map_err(persist_err)?;
    staged.persist(dest).map_err(|e| persist_err(e.error))?;
    Ok(())
}
