//! Integration tests for synbundle-core.
//!
//! These tests materialize bundles end to end and read them back with the
//! `zip` crate.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::io::Read;
use synbundle_core::BundleBuilder;
use synbundle_core::BundleError;
use tempfile::TempDir;
use zip::ZipArchive;

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn read_text(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

/// Parses the main section of a manifest, joining continuation lines.
fn manifest_headers(bytes: &[u8]) -> Vec<(String, String)> {
    let text = read_text(bytes, "META-INF/MANIFEST.MF");
    let mut lines: Vec<String> = Vec::new();
    for line in text.split("\r\n") {
        if line.is_empty() {
            break;
        }
        if let Some(continuation) = line.strip_prefix(' ') {
            lines.last_mut().unwrap().push_str(continuation);
        } else {
            lines.push(line.to_string());
        }
    }
    lines
        .into_iter()
        .map(|line| {
            let (name, value) = line.split_once(": ").unwrap();
            (name.to_string(), value.to_string())
        })
        .collect()
}

#[test]
fn test_end_to_end_bundle() {
    let bytes = BundleBuilder::new()
        .symbolic_name("com.example.a")
        .version("1.2.3")
        .add_content("data/hello.txt", "hello")
        .to_bytes()
        .unwrap();

    assert_eq!(
        entry_names(&bytes),
        vec![
            "META-INF/",
            "META-INF/MANIFEST.MF",
            "data/",
            "data/hello.txt"
        ]
    );

    let headers: HashMap<String, String> = manifest_headers(&bytes).into_iter().collect();
    assert_eq!(headers["Bundle-SymbolicName"], "com.example.a");
    assert_eq!(headers["Bundle-Version"], "1.2.3");
    assert_eq!(headers["Manifest-Version"], "1.0");
    assert_eq!(headers["Bundle-ManifestVersion"], "2");

    assert_eq!(read_text(&bytes, "data/hello.txt").as_bytes(), "hello".as_bytes());
}

#[test]
fn test_directory_entries_are_directories() {
    let bytes = BundleBuilder::new()
        .add_content("a/b/c.txt", "c")
        .to_bytes()
        .unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    for name in ["META-INF/", "a/", "a/b/"] {
        let entry = archive.by_name(name).unwrap();
        assert!(entry.is_dir(), "{name} should be a directory entry");
        assert_eq!(entry.size(), 0);
    }
}

#[test]
fn test_manifest_default_headers_order() {
    let bytes = BundleBuilder::new().to_bytes().unwrap();
    assert_eq!(
        read_text(&bytes, "META-INF/MANIFEST.MF"),
        "Manifest-Version: 1.0\r\nBundle-ManifestVersion: 2\r\nBundle-Version: 0.0.0\r\n\r\n"
    );
}

#[test]
fn test_cleared_manifest_has_no_attributes() {
    let bytes = BundleBuilder::new().clear_headers().to_bytes().unwrap();

    assert!(manifest_headers(&bytes).is_empty());
    assert_eq!(read_text(&bytes, "META-INF/MANIFEST.MF"), "\r\n");
    assert_eq!(
        entry_names(&bytes),
        vec!["META-INF/", "META-INF/MANIFEST.MF"]
    );
}

#[test]
fn test_headers_after_clear() {
    let bytes = BundleBuilder::new()
        .clear_headers()
        .symbolic_name("com.example.bare")
        .to_bytes()
        .unwrap();

    assert_eq!(
        manifest_headers(&bytes),
        vec![(
            "Bundle-SymbolicName".to_string(),
            "com.example.bare".to_string()
        )]
    );
}

#[test]
fn test_singleton_in_manifest() {
    let bytes = BundleBuilder::new()
        .symbolic_name("com.example.single")
        .singleton()
        .to_bytes()
        .unwrap();

    let headers: HashMap<String, String> = manifest_headers(&bytes).into_iter().collect();
    assert_eq!(
        headers["Bundle-SymbolicName"],
        "com.example.single;singleton:=true"
    );
}

#[test]
fn test_long_header_roundtrip() {
    let packages: Vec<String> = (0..20)
        .map(|i| format!("com.example.pkg{i};version=\"[1.0,2.0)\""))
        .collect();
    let import = packages.join(",");

    let bytes = BundleBuilder::new()
        .symbolic_name("com.example.imports")
        .header("Import-Package", import.as_str())
        .to_bytes()
        .unwrap();

    let text = read_text(&bytes, "META-INF/MANIFEST.MF");
    assert!(text.split("\r\n").all(|line| line.len() <= 72));

    let headers: HashMap<String, String> = manifest_headers(&bytes).into_iter().collect();
    assert_eq!(headers["Import-Package"], import);
}

#[test]
fn test_external_file_bytes_copied() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("payload.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(300 * 1024).collect();
    fs::write(&source, &payload).unwrap();

    let bytes = BundleBuilder::new()
        .symbolic_name("com.example.files")
        .add_file("lib/payload.bin", &source)
        .to_bytes()
        .unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut entry = archive.by_name("lib/payload.bin").unwrap();
    let mut body = Vec::new();
    entry.read_to_end(&mut body).unwrap();
    assert_eq!(body, payload);
}

#[test]
fn test_files_before_contents() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a.bin");
    fs::write(&source, "a").unwrap();

    let bytes = BundleBuilder::new()
        .add_content("shared/text.txt", "text")
        .add_file("shared/a.bin", &source)
        .to_bytes()
        .unwrap();

    assert_eq!(
        entry_names(&bytes),
        vec![
            "META-INF/",
            "META-INF/MANIFEST.MF",
            "shared/",
            "shared/a.bin",
            "shared/text.txt"
        ]
    );
}

#[test]
fn test_file_read_lazily() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("late.txt");

    let builder = BundleBuilder::new().add_file("late.txt", &source);
    assert!(builder.to_bytes().is_err());

    fs::write(&source, "now present").unwrap();
    let bytes = builder.to_bytes().unwrap();
    assert_eq!(read_text(&bytes, "late.txt"), "now present");

    fs::write(&source, "changed").unwrap();
    let bytes = builder.to_bytes().unwrap();
    assert_eq!(read_text(&bytes, "late.txt"), "changed");
}

#[test]
fn test_missing_file_is_source_read_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist.bin");

    let err = BundleBuilder::new()
        .symbolic_name("com.example.broken")
        .add_content("ok.txt", "fine")
        .add_file("lib/missing.bin", &missing)
        .to_bytes()
        .unwrap_err();

    match err {
        BundleError::SourceRead { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected SourceRead, got {other:?}"),
    }
}

#[test]
fn test_repeated_materialization_identical() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("blob.bin");
    fs::write(&source, vec![42u8; 4096]).unwrap();

    let builder = BundleBuilder::new()
        .symbolic_name("com.example.stable")
        .version("9.9.9")
        .add_file("lib/blob.bin", &source)
        .add_content("a/b/c.txt", "c")
        .add_content("a/d.txt", "d");

    let first = builder.to_bytes().unwrap();
    let second = builder.to_bytes().unwrap();
    assert_eq!(first, second);

    let clone = builder.clone();
    assert_eq!(clone.to_bytes().unwrap(), first);
}

#[test]
fn test_bulk_headers_from_map() {
    let mut extra = HashMap::new();
    extra.insert("Bundle-Name", "Example");
    extra.insert("Bundle-Vendor", "Example Inc.");

    let bytes = BundleBuilder::new()
        .symbolic_name("com.example.bulk")
        .headers(extra)
        .to_bytes()
        .unwrap();

    let headers: HashMap<String, String> = manifest_headers(&bytes).into_iter().collect();
    assert_eq!(headers["Bundle-Name"], "Example");
    assert_eq!(headers["Bundle-Vendor"], "Example Inc.");
}

#[test]
fn test_persist_and_reopen() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out/com.example.disk.jar");

    let written = BundleBuilder::new()
        .symbolic_name("com.example.disk")
        .add_content("data/hello.txt", "hello")
        .write_to_path(&dest)
        .unwrap();

    let bytes = fs::read(&written.path).unwrap();
    assert_eq!(written.report.entries, entry_names(&bytes));
    assert_eq!(read_text(&bytes, "data/hello.txt"), "hello");
}

#[test]
fn test_default_location_prediction() {
    let temp = TempDir::new().unwrap();
    let builder = BundleBuilder::new()
        .symbolic_name("com.example.predict")
        .version("2.0.0");

    let expected = temp.path().join(builder.default_file_name());
    let path = builder.write_default_in(temp.path()).unwrap();
    assert_eq!(path.to_path_buf(), expected);
}
