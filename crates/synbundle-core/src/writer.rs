//! Bundle materialization.
//!
//! Entries are written in a fixed order: `META-INF/`, the manifest, every
//! file binding, then every content binding. Each binding is preceded by
//! any of its ancestor directories not written yet, shallowest first.
//! Timestamps are pinned to the DOS epoch so repeated runs are byte-identical.

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use tracing::info;
use tracing::warn;
use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::builder::BundleBuilder;
use crate::copy::CopyBuffer;
use crate::copy::CopyFailure;
use crate::copy::copy_with_buffer;
use crate::error::BundleError;
use crate::error::Result;
use crate::manifest::BUNDLE_SYMBOLIC_NAME;
use crate::manifest::MANIFEST_PATH;
use crate::manifest::MANIFEST_VERSION;
use crate::manifest::META_INF_DIR;
use crate::manifest::Manifest;
use crate::report::BundleReport;

/// Tracks directory entries already written to an archive.
///
/// # Examples
///
/// ```
/// use synbundle_core::writer::DirectoryTracker;
///
/// let mut tracker = DirectoryTracker::new();
/// assert_eq!(tracker.claim_ancestors("a/b/c.txt"), vec!["a/", "a/b/"]);
/// assert_eq!(tracker.claim_ancestors("a/b/d.txt"), Vec::<String>::new());
/// assert_eq!(tracker.claim_ancestors("a/e/f.txt"), vec!["a/e/"]);
/// ```
#[derive(Debug, Default)]
pub struct DirectoryTracker {
    written: HashSet<String>,
}

impl DirectoryTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `dir` and all of its ancestors, returning the directory entry
    /// names (with trailing `/`) not claimed before, root first.
    pub fn claim_directory(&mut self, dir: &str) -> Vec<String> {
        let mut claimed = Vec::new();
        self.claim_into(dir, &mut claimed);
        claimed
    }

    /// Claims the parent directories of an entry path, root first.
    ///
    /// Returns nothing for paths at the archive root.
    pub fn claim_ancestors(&mut self, entry_path: &str) -> Vec<String> {
        entry_path
            .rsplit_once('/')
            .map(|(parent, _)| self.claim_directory(parent))
            .unwrap_or_default()
    }

    /// Returns whether a directory entry name (with trailing `/`) was claimed.
    #[must_use]
    pub fn contains(&self, dir_entry: &str) -> bool {
        self.written.contains(dir_entry)
    }

    fn claim_into(&mut self, dir: &str, claimed: &mut Vec<String>) {
        if let Some((parent, _)) = dir.rsplit_once('/') {
            self.claim_into(parent, claimed);
        }
        let entry = format!("{dir}/");
        if self.written.insert(entry.clone()) {
            claimed.push(entry);
        }
    }
}

/// Options shared by every entry.
fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

/// Archive writer state for one materialization.
struct BundleWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    directories: DirectoryTracker,
    names: HashSet<String>,
    buffer: CopyBuffer,
    report: BundleReport,
}

impl<W: Write + Seek> BundleWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: entry_options(),
            directories: DirectoryTracker::new(),
            names: HashSet::new(),
            buffer: CopyBuffer::new(),
            report: BundleReport::default(),
        }
    }

    fn claim_name(&mut self, name: &str) -> Result<()> {
        if !self.names.insert(name.to_string()) {
            return Err(BundleError::DuplicateEntry {
                path: name.to_string(),
            });
        }
        self.report.entries.push(name.to_string());
        Ok(())
    }

    fn write_directories(&mut self, dirs: Vec<String>) -> Result<()> {
        for dir in dirs {
            self.claim_name(&dir)?;
            self.zip
                .add_directory(dir.as_str(), self.options)
                .map_err(|e| BundleError::EntryWrite {
                    entry: dir.clone(),
                    source: io::Error::other(e),
                })?;
            self.report.directories_added += 1;
            debug!(entry = %dir, "wrote directory entry");
        }
        Ok(())
    }

    fn add_parent_directories(&mut self, entry_path: &str) -> Result<()> {
        let dirs = self.directories.claim_ancestors(entry_path);
        self.write_directories(dirs)
    }

    fn start_entry(&mut self, name: &str) -> Result<()> {
        self.claim_name(name)?;
        self.zip
            .start_file(name, self.options)
            .map_err(|e| BundleError::EntryWrite {
                entry: name.to_string(),
                source: io::Error::other(e),
            })
    }

    fn write_manifest(&mut self, manifest: &Manifest) -> Result<()> {
        let dirs = self.directories.claim_directory(META_INF_DIR);
        self.write_directories(dirs)?;

        let bytes = manifest.to_bytes();
        self.start_entry(MANIFEST_PATH)?;
        self.zip
            .write_all(&bytes)
            .map_err(|source| BundleError::EntryWrite {
                entry: MANIFEST_PATH.to_string(),
                source,
            })?;
        self.report.bytes_written += bytes.len() as u64;
        debug!(entry = MANIFEST_PATH, headers = manifest.len(), "wrote manifest");
        Ok(())
    }

    fn add_file(&mut self, name: &str, source_path: &Path) -> Result<()> {
        self.add_parent_directories(name)?;

        let mut source = File::open(source_path).map_err(|source| BundleError::SourceRead {
            path: source_path.to_path_buf(),
            source,
        })?;

        self.start_entry(name)?;
        let copied = copy_with_buffer(&mut source, &mut self.zip, &mut self.buffer).map_err(
            |failure| match failure {
                CopyFailure::Read(source) => BundleError::SourceRead {
                    path: source_path.to_path_buf(),
                    source,
                },
                CopyFailure::Write(source) => BundleError::EntryWrite {
                    entry: name.to_string(),
                    source,
                },
            },
        )?;

        self.report.files_added += 1;
        self.report.bytes_written += copied;
        debug!(entry = name, source = %source_path.display(), bytes = copied, "wrote file entry");
        Ok(())
    }

    fn add_content(&mut self, name: &str, text: &str) -> Result<()> {
        self.add_parent_directories(name)?;
        self.start_entry(name)?;
        self.zip
            .write_all(text.as_bytes())
            .map_err(|source| BundleError::EntryWrite {
                entry: name.to_string(),
                source,
            })?;

        self.report.contents_added += 1;
        self.report.bytes_written += text.len() as u64;
        debug!(entry = name, bytes = text.len(), "wrote content entry");
        Ok(())
    }

    fn finish(self) -> Result<(W, BundleReport)> {
        let Self {
            zip, mut report, ..
        } = self;

        let mut inner = zip.finish().map_err(|e| BundleError::Finalize {
            source: io::Error::other(e),
        })?;
        report.archive_size = inner
            .stream_position()
            .map_err(|source| BundleError::Finalize { source })?;

        Ok((inner, report))
    }
}

/// Notes manifest gaps that readers are likely to reject.
fn check_manifest(manifest: &Manifest, report: &mut BundleReport) {
    if !manifest.contains(MANIFEST_VERSION) {
        warn!("manifest has no {MANIFEST_VERSION} header");
        report.add_warning(format!("manifest has no {MANIFEST_VERSION} header"));
    }
    if !manifest.contains(BUNDLE_SYMBOLIC_NAME) {
        warn!("manifest has no {BUNDLE_SYMBOLIC_NAME} header");
        report.add_warning(format!("manifest has no {BUNDLE_SYMBOLIC_NAME} header"));
    }
}

/// Writes the complete bundle described by `builder` into `writer`.
///
/// Returns the writer positioned after the central directory, along with the
/// report. On error the writer is dropped and its contents are undefined.
pub(crate) fn write_bundle<W: Write + Seek>(
    builder: &BundleBuilder,
    writer: W,
) -> Result<(W, BundleReport)> {
    let mut bundle = BundleWriter::new(writer);
    check_manifest(builder.manifest(), &mut bundle.report);

    bundle.write_manifest(builder.manifest())?;

    for (name, source) in builder.files() {
        bundle.add_file(name, source)?;
    }

    for (name, text) in builder.contents() {
        bundle.add_content(name, text)?;
    }

    let (inner, report) = bundle.finish()?;
    info!(
        entries = report.total_entries(),
        bytes_written = report.bytes_written,
        archive_size = report.archive_size,
        "bundle materialized"
    );
    Ok((inner, report))
}
