//! Build command implementation.

use crate::cli::BuildArgs;
use crate::error::add_bundle_context;
use crate::output::BuildOutcome;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use std::path::PathBuf;
use synbundle_core::BundleBuilder;

/// Maps command-line flags onto a builder.
///
/// Headers are applied before bindings; the singleton directive is applied
/// after the symbolic name so it has something to attach to.
pub fn configure(args: &BuildArgs) -> BundleBuilder {
    let mut builder = BundleBuilder::new();

    if args.no_default_headers {
        builder = builder.clear_headers();
    }
    if let Some(name) = &args.symbolic_name {
        builder = builder.symbolic_name(name.as_str());
    }
    if args.singleton {
        builder = builder.singleton();
    }
    if let Some(version) = &args.bundle_version {
        builder = builder.version(version.as_str());
    }

    builder = builder.headers(
        args.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );

    for (path, source) in &args.files {
        builder = builder.add_file(path.as_str(), source);
    }
    for (path, text) in &args.contents {
        builder = builder.add_content(path.as_str(), text.as_str());
    }

    builder
}

pub fn execute(args: &BuildArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let builder = configure(args);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(builder.default_file_name()));

    if output.exists() && !args.force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite.",
            output.display()
        );
    }

    let written = add_bundle_context(builder.write_to_path(&output), &output)?;

    formatter.format_build_result(&BuildOutcome {
        path: &written.path,
        symbolic_name: builder.current_symbolic_name(),
        version: builder.current_version(),
        report: &written.report,
    })
}
