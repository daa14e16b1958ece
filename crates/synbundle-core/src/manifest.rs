//! Bundle manifest headers and their `MANIFEST.MF` serialization.
//!
//! Header names compare case-insensitively, the way manifest readers treat
//! them, while keeping the spelling they were first inserted with. Headers are
//! stored in insertion order so the serialized manifest is stable across
//! repeated materializations.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::io;
use std::io::Write;

use indexmap::IndexMap;

/// Archive path of the manifest entry.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Folder holding the manifest, emitted as the first archive entry.
pub const META_INF_DIR: &str = "META-INF";

/// `Manifest-Version` header name.
pub const MANIFEST_VERSION: &str = "Manifest-Version";

/// `Signature-Version` header name.
pub const SIGNATURE_VERSION: &str = "Signature-Version";

/// `Bundle-ManifestVersion` header name.
pub const BUNDLE_MANIFEST_VERSION: &str = "Bundle-ManifestVersion";

/// `Bundle-SymbolicName` header name.
pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";

/// `Bundle-Version` header name.
pub const BUNDLE_VERSION: &str = "Bundle-Version";

/// Default `Manifest-Version` value.
pub const DEFAULT_MANIFEST_VERSION: &str = "1.0";

/// Fixed `Bundle-ManifestVersion` value.
pub const DEFAULT_BUNDLE_MANIFEST_VERSION: &str = "2";

/// Default `Bundle-Version` value.
pub const DEFAULT_BUNDLE_VERSION: &str = "0.0.0";

/// Maximum line length in bytes, including the continuation space.
const MAX_LINE_BYTES: usize = 72;

const LINE_END: &[u8] = b"\r\n";

/// A manifest header name with case-insensitive identity.
///
/// # Examples
///
/// ```
/// use synbundle_core::HeaderName;
///
/// let a = HeaderName::new("Bundle-Version");
/// let b = HeaderName::new("bundle-version");
/// assert_eq!(a, b);
/// assert_eq!(b.as_str(), "bundle-version");
/// ```
#[derive(Debug, Clone)]
pub struct HeaderName(String);

impl HeaderName {
    /// Creates a header name, preserving the given spelling.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as it was spelled on creation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for HeaderName {}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeaderName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for HeaderName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Primary attributes of a bundle manifest.
///
/// No validation of names or values is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    headers: IndexMap<HeaderName, String>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manifest seeded with the bundle defaults:
    /// `Manifest-Version: 1.0`, `Bundle-ManifestVersion: 2` and
    /// `Bundle-Version: 0.0.0`.
    #[must_use]
    pub fn bundle_defaults() -> Self {
        let mut manifest = Self::new();
        manifest.insert(MANIFEST_VERSION, DEFAULT_MANIFEST_VERSION);
        manifest.insert(BUNDLE_MANIFEST_VERSION, DEFAULT_BUNDLE_MANIFEST_VERSION);
        manifest.insert(BUNDLE_VERSION, DEFAULT_BUNDLE_VERSION);
        manifest
    }

    /// Sets a header, returning the previous value.
    ///
    /// Overwriting keeps the original spelling and position of the name.
    pub fn insert(
        &mut self,
        name: impl Into<HeaderName>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.headers.insert(name.into(), value.into())
    }

    /// Returns the value of a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&HeaderName::new(name))
            .map(String::as_str)
    }

    /// Returns whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(&HeaderName::new(name))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if no headers are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Removes every header.
    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Iterates over headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Writes the manifest in `MANIFEST.MF` format.
    ///
    /// The version header goes first, then the remaining headers in
    /// insertion order, then the blank line closing the main section.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let lead = self.lead_header();

        if let Some((name, value)) = lead {
            write_header_line(writer, name.as_str(), value)?;
        }

        for (name, value) in &self.headers {
            if lead.is_some_and(|(lead_name, _)| lead_name == name) {
                continue;
            }
            write_header_line(writer, name.as_str(), value)?;
        }

        writer.write_all(LINE_END)
    }

    /// Serializes the manifest into a byte vector.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn lead_header(&self) -> Option<(&HeaderName, &str)> {
        [MANIFEST_VERSION, SIGNATURE_VERSION]
            .into_iter()
            .find_map(|name| self.headers.get_key_value(&HeaderName::new(name)))
            .map(|(name, value)| (name, value.as_str()))
    }
}

/// Writes `name: value`, wrapping at 72 bytes with space-prefixed
/// continuation lines. Never splits a UTF-8 character.
fn write_header_line<W: Write>(writer: &mut W, name: &str, value: &str) -> io::Result<()> {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut limit = MAX_LINE_BYTES;

    loop {
        let end = floor_char_boundary(rest, limit);
        writer.write_all(rest[..end].as_bytes())?;
        writer.write_all(LINE_END)?;
        rest = &rest[end..];
        if rest.is_empty() {
            return Ok(());
        }
        writer.write_all(b" ")?;
        limit = MAX_LINE_BYTES - 1;
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
