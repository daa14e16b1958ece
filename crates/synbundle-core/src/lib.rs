//! Deterministic builder for synthetic module bundles.
//!
//! `synbundle-core` assembles a JAR-style bundle archive from three inputs:
//! manifest headers, external files and inline text. Entries are written in
//! a fixed order, every ancestor directory appears exactly once before the
//! entries nested under it, and an unchanged builder always produces
//! byte-identical archives.
//!
//! # Examples
//!
//! ```
//! use synbundle_core::BundleBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let builder = BundleBuilder::new()
//!     .symbolic_name("com.example.a")
//!     .singleton()
//!     .version("1.2.3")
//!     .header("Export-Package", "com.example.a.api")
//!     .add_content("data/hello.txt", "hello");
//!
//! let (bytes, report) = builder.to_bytes_with_report()?;
//! assert_eq!(report.entries[0], "META-INF/");
//! assert_eq!(report.entries[1], "META-INF/MANIFEST.MF");
//! assert_eq!(bytes, builder.to_bytes()?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod copy;
pub mod error;
pub mod manifest;
pub mod persist;
pub mod report;
pub mod writer;

#[cfg(test)]
mod test_utils;

// Re-export main API types
pub use builder::BundleBuilder;
pub use builder::DEFAULT_FILE_PREFIX;
pub use builder::SINGLETON_DIRECTIVE;
pub use error::BundleError;
pub use error::Result;
pub use manifest::HeaderName;
pub use manifest::Manifest;
pub use persist::WrittenBundle;
pub use report::BundleReport;
