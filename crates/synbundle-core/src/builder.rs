//! Fluent builder for synthetic bundles.

use std::io::Cursor;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::Result;
use crate::manifest::BUNDLE_SYMBOLIC_NAME;
use crate::manifest::BUNDLE_VERSION;
use crate::manifest::DEFAULT_BUNDLE_VERSION;
use crate::manifest::HeaderName;
use crate::manifest::Manifest;
use crate::report::BundleReport;
use crate::writer;

/// Directive appended to `Bundle-SymbolicName` by [`BundleBuilder::singleton`].
pub const SINGLETON_DIRECTIVE: &str = ";singleton:=true";

/// Prefix of the file name chosen by [`BundleBuilder::default_file_name`].
pub const DEFAULT_FILE_PREFIX: &str = "bundle-";

/// Assembles a bundle archive from manifest headers, external files and
/// inline text.
///
/// Setters consume and return the builder so calls can be chained in any
/// order; a later call for the same header or archive path wins. Nothing is
/// validated or read until the bundle is materialized, and materialization
/// may be repeated: an unchanged builder always yields identical bytes.
///
/// The builder is plain owned data. Sharing one across threads requires
/// external synchronization.
///
/// # Examples
///
/// ```
/// use synbundle_core::BundleBuilder;
///
/// let bytes = BundleBuilder::new()
///     .symbolic_name("com.example.a")
///     .version("1.2.3")
///     .add_content("data/hello.txt", "hello")
///     .to_bytes()?;
///
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), synbundle_core::BundleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    manifest: Manifest,
    files: IndexMap<String, PathBuf>,
    contents: IndexMap<String, String>,
}

impl Default for BundleBuilder {
    fn default() -> Self {
        Self {
            manifest: Manifest::bundle_defaults(),
            files: IndexMap::new(),
            contents: IndexMap::new(),
        }
    }
}

impl BundleBuilder {
    /// Creates a builder with the default manifest headers
    /// (`Manifest-Version: 1.0`, `Bundle-ManifestVersion: 2`,
    /// `Bundle-Version: 0.0.0`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `Bundle-SymbolicName`.
    #[must_use]
    pub fn symbolic_name(mut self, name: impl Into<String>) -> Self {
        self.manifest.insert(BUNDLE_SYMBOLIC_NAME, name);
        self
    }

    /// Appends `;singleton:=true` to the current `Bundle-SymbolicName`.
    ///
    /// The directive is appended on every call. Without a symbolic name the
    /// header becomes the bare directive.
    ///
    /// # Examples
    ///
    /// ```
    /// use synbundle_core::BundleBuilder;
    ///
    /// let builder = BundleBuilder::new().symbolic_name("com.example.a").singleton();
    /// assert_eq!(
    ///     builder.current_symbolic_name(),
    ///     Some("com.example.a;singleton:=true")
    /// );
    /// ```
    #[must_use]
    pub fn singleton(mut self) -> Self {
        let current = self
            .manifest
            .get(BUNDLE_SYMBOLIC_NAME)
            .unwrap_or_default();
        let marked = format!("{current}{SINGLETON_DIRECTIVE}");
        self.manifest.insert(BUNDLE_SYMBOLIC_NAME, marked);
        self
    }

    /// Sets `Bundle-Version`.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.manifest.insert(BUNDLE_VERSION, version);
        self
    }

    /// Sets an arbitrary manifest header.
    ///
    /// # Examples
    ///
    /// ```
    /// use synbundle_core::BundleBuilder;
    ///
    /// let builder = BundleBuilder::new()
    ///     .header("Import-Package", "org.osgi.framework")
    ///     .header("Bundle-Activator", "com.example.Activator");
    ///
    /// assert_eq!(builder.manifest().get("import-package"), Some("org.osgi.framework"));
    /// ```
    #[must_use]
    pub fn header(mut self, name: impl Into<HeaderName>, value: impl Into<String>) -> Self {
        self.manifest.insert(name, value);
        self
    }

    /// Sets every header yielded by `headers`, in iteration order.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<HeaderName>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.manifest.insert(name, value);
        }
        self
    }

    /// Removes every manifest header, defaults included.
    #[must_use]
    pub fn clear_headers(mut self) -> Self {
        self.manifest.clear();
        self
    }

    /// Binds an archive path to an external file, read at materialization.
    ///
    /// The file is not checked here; a missing or unreadable file fails the
    /// materialization with [`BundleError::SourceRead`].
    ///
    /// [`BundleError::SourceRead`]: crate::BundleError::SourceRead
    #[must_use]
    pub fn add_file(mut self, archive_path: impl Into<String>, source: impl AsRef<Path>) -> Self {
        self.files
            .insert(archive_path.into(), source.as_ref().to_path_buf());
        self
    }

    /// Binds an archive path to inline text, stored as UTF-8.
    #[must_use]
    pub fn add_content(mut self, archive_path: impl Into<String>, text: impl Into<String>) -> Self {
        self.contents.insert(archive_path.into(), text.into());
        self
    }

    /// Current `Bundle-SymbolicName`, if set.
    #[must_use]
    pub fn current_symbolic_name(&self) -> Option<&str> {
        self.manifest.get(BUNDLE_SYMBOLIC_NAME)
    }

    /// Current `Bundle-Version`, if set.
    #[must_use]
    pub fn current_version(&self) -> Option<&str> {
        self.manifest.get(BUNDLE_VERSION)
    }

    /// Manifest headers as they will be written.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// External file bindings in registration order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .map(|(path, source)| (path.as_str(), source.as_path()))
    }

    /// Inline text bindings in registration order.
    pub fn contents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.contents
            .iter()
            .map(|(path, text)| (path.as_str(), text.as_str()))
    }

    /// Number of external file bindings.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of inline text bindings.
    #[must_use]
    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    /// File name derived from the symbolic name and version:
    /// `bundle-<symbolic-name>-<version>.jar`.
    ///
    /// Directives after `;` are dropped from the symbolic name. A missing
    /// symbolic name renders as `unnamed`, a missing version as `0.0.0`.
    /// Path separators in either part are replaced with `_`, so the result is
    /// always a single path component.
    ///
    /// # Examples
    ///
    /// ```
    /// use synbundle_core::BundleBuilder;
    ///
    /// let builder = BundleBuilder::new()
    ///     .symbolic_name("com.example.a")
    ///     .singleton()
    ///     .version("1.2.3");
    /// assert_eq!(builder.default_file_name(), "bundle-com.example.a-1.2.3.jar");
    /// ```
    #[must_use]
    pub fn default_file_name(&self) -> String {
        let name = self
            .current_symbolic_name()
            .map(|name| name.split_once(';').map_or(name, |(head, _)| head).trim())
            .filter(|name| !name.is_empty())
            .unwrap_or("unnamed");
        let version = self.current_version().unwrap_or(DEFAULT_BUNDLE_VERSION);
        format!(
            "{DEFAULT_FILE_PREFIX}{}-{}.jar",
            file_name_part(name),
            file_name_part(version)
        )
    }

    /// Materializes the bundle into `writer`.
    ///
    /// Entries are streamed as they are produced. On error the sink may
    /// already hold a partial archive, closed with a central directory for
    /// the entries written so far; use [`to_bytes`] or [`write_to_path`] when
    /// the destination must stay untouched on failure.
    ///
    /// [`to_bytes`]: BundleBuilder::to_bytes
    /// [`write_to_path`]: BundleBuilder::write_to_path
    ///
    /// # Errors
    ///
    /// Returns an error if a source file cannot be read, an archive entry
    /// cannot be written, or two entries share an archive name.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<BundleReport> {
        writer::write_bundle(self, writer).map(|(_, report)| report)
    }

    /// Materializes the bundle into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let (cursor, _) = writer::write_bundle(self, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Materializes the bundle into memory, returning the bytes with the report.
    pub fn to_bytes_with_report(&self) -> Result<(Vec<u8>, BundleReport)> {
        let (cursor, report) = writer::write_bundle(self, Cursor::new(Vec::new()))?;
        Ok((cursor.into_inner(), report))
    }

    /// Materializes the bundle and returns a readable stream over it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Read;
    /// use synbundle_core::BundleBuilder;
    ///
    /// let mut reader = BundleBuilder::new().symbolic_name("com.example.a").to_reader()?;
    /// let mut magic = [0u8; 4];
    /// reader.read_exact(&mut magic)?;
    /// assert_eq!(&magic, b"PK\x03\x04");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_reader(&self) -> Result<Cursor<Vec<u8>>> {
        self.to_bytes().map(Cursor::new)
    }
}

/// Keeps a derived file name within one path component.
fn file_name_part(part: &str) -> String {
    part.replace(['/', '\\'], "_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::manifest::BUNDLE_MANIFEST_VERSION;
    use crate::manifest::MANIFEST_VERSION;
    use std::collections::HashMap;

    #[test]
    fn test_builder_defaults() {
        let builder = BundleBuilder::new();
        let manifest = builder.manifest();

        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.get(MANIFEST_VERSION), Some("1.0"));
        assert_eq!(manifest.get(BUNDLE_MANIFEST_VERSION), Some("2"));
        assert_eq!(builder.current_version(), Some("0.0.0"));
        assert_eq!(builder.current_symbolic_name(), None);
        assert_eq!(builder.file_count(), 0);
        assert_eq!(builder.content_count(), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let builder = BundleBuilder::new()
            .symbolic_name("com.example.a")
            .version("1.0.0")
            .symbolic_name("com.example.b")
            .version("2.0.0")
            .header("Bundle-Vendor", "Acme")
            .header("bundle-vendor", "Globex");

        assert_eq!(builder.current_symbolic_name(), Some("com.example.b"));
        assert_eq!(builder.current_version(), Some("2.0.0"));
        assert_eq!(builder.manifest().get("Bundle-Vendor"), Some("Globex"));
    }

    #[test]
    fn test_singleton_appends_once_per_call() {
        let builder = BundleBuilder::new().symbolic_name("com.example.a").singleton();
        assert_eq!(
            builder.current_symbolic_name(),
            Some("com.example.a;singleton:=true")
        );

        let twice = builder.singleton();
        assert_eq!(
            twice.current_symbolic_name(),
            Some("com.example.a;singleton:=true;singleton:=true")
        );
    }

    #[test]
    fn test_singleton_without_symbolic_name() {
        let builder = BundleBuilder::new().singleton();
        assert_eq!(builder.current_symbolic_name(), Some(";singleton:=true"));
    }

    #[test]
    fn test_singleton_then_rename_drops_directive() {
        let builder = BundleBuilder::new()
            .symbolic_name("com.example.a")
            .singleton()
            .symbolic_name("com.example.b");
        assert_eq!(builder.current_symbolic_name(), Some("com.example.b"));
    }

    #[test]
    fn test_bulk_headers() {
        let mut extra = HashMap::new();
        extra.insert("Bundle-Name".to_string(), "Demo".to_string());
        extra.insert("Bundle-Version".to_string(), "3.0.0".to_string());

        let builder = BundleBuilder::new()
            .headers(extra)
            .headers([("Export-Package", "com.example.api")]);

        assert_eq!(builder.manifest().get("Bundle-Name"), Some("Demo"));
        assert_eq!(builder.current_version(), Some("3.0.0"));
        assert_eq!(
            builder.manifest().get("Export-Package"),
            Some("com.example.api")
        );
    }

    #[test]
    fn test_clear_headers() {
        let builder = BundleBuilder::new()
            .symbolic_name("com.example.a")
            .clear_headers();

        assert!(builder.manifest().is_empty());
        assert_eq!(builder.current_version(), None);
        assert_eq!(builder.current_symbolic_name(), None);
    }

    #[test]
    fn test_bindings_keep_registration_order() {
        let builder = BundleBuilder::new()
            .add_content("z.txt", "z")
            .add_content("a.txt", "a")
            .add_content("m/n.txt", "n")
            .add_content("z.txt", "zz");

        let contents: Vec<(&str, &str)> = builder.contents().collect();
        assert_eq!(
            contents,
            vec![("z.txt", "zz"), ("a.txt", "a"), ("m/n.txt", "n")]
        );
    }

    #[test]
    fn test_add_file_not_checked() {
        let builder = BundleBuilder::new().add_file("lib/a.bin", "/nonexistent/a.bin");
        let files: Vec<(&str, &Path)> = builder.files().collect();
        assert_eq!(files, vec![("lib/a.bin", Path::new("/nonexistent/a.bin"))]);
    }

    #[test]
    fn test_file_and_content_maps_independent() {
        let builder = BundleBuilder::new()
            .add_file("same.txt", "/tmp/same.txt")
            .add_content("same.txt", "text");
        assert_eq!(builder.file_count(), 1);
        assert_eq!(builder.content_count(), 1);
    }

    #[test]
    fn test_default_file_name() {
        let builder = BundleBuilder::new()
            .symbolic_name("com.example.a")
            .version("1.2.3");
        assert_eq!(builder.default_file_name(), "bundle-com.example.a-1.2.3.jar");

        let unnamed = BundleBuilder::new();
        assert_eq!(unnamed.default_file_name(), "bundle-unnamed-0.0.0.jar");

        let singleton_only = BundleBuilder::new().singleton();
        assert_eq!(singleton_only.default_file_name(), "bundle-unnamed-0.0.0.jar");

        let cleared = BundleBuilder::new().clear_headers();
        assert_eq!(cleared.default_file_name(), "bundle-unnamed-0.0.0.jar");
    }

    #[test]
    fn test_default_file_name_strips_separators() {
        let nested = BundleBuilder::new().symbolic_name("com/example");
        assert_eq!(nested.default_file_name(), "bundle-com_example-0.0.0.jar");

        let escaping = BundleBuilder::new()
            .symbolic_name("a/../../x")
            .version("1.0\\2");
        let name = escaping.default_file_name();
        assert_eq!(name, "bundle-a_.._.._x-1.0_2.jar");
        assert_eq!(Path::new(&name).components().count(), 1);
    }

    #[test]
    fn test_to_bytes_is_zip() {
        let bytes = BundleBuilder::new().to_bytes().unwrap();
        assert_eq!(&bytes[0..4], b"PK\x03\x04");
    }
}
