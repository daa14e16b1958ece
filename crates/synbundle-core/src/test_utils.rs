//! Helpers for inspecting materialized bundles in tests.
//!
//! # Panics
//!
//! All functions in this module panic on malformed archives since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Read;

use zip::ZipArchive;

/// Returns the entry names of an archive in central directory order.
#[must_use]
pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Reads the body of a named entry.
#[must_use]
pub fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut body = Vec::new();
    entry.read_to_end(&mut body).unwrap();
    body
}
