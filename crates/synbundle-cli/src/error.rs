//! Error conversion utilities for CLI.
//!
//! Converts synbundle-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use synbundle_core::BundleError;

/// Converts `BundleError` to user-friendly anyhow error with context
pub fn convert_bundle_error(err: BundleError, output: &Path) -> anyhow::Error {
    match err {
        BundleError::SourceRead { path, source } => {
            anyhow!(
                "Cannot read source file '{}' for bundle '{}': {}\n\
                 HINT: Every --file SOURCE must be an existing, readable regular file.",
                path.display(),
                output.display(),
                source
            )
        }
        BundleError::DuplicateEntry { path } => {
            anyhow!(
                "Bundle entry '{}' was added more than once\n\
                 HINT: --file and --content paths must be distinct and must not \
                 replace META-INF/MANIFEST.MF.",
                path
            )
        }
        BundleError::Persist { path, source } => {
            anyhow!(
                "Cannot write bundle to '{}': {}\n\
                 HINT: Check that the destination directory is writable.",
                path.display(),
                source
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error writing bundle '{}'", output.display())),
    }
}

/// Adds context to a bundle operation result
pub fn add_bundle_context<T>(
    result: Result<T, BundleError>,
    output: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_bundle_error(e, output))
}
