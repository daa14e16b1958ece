//! Example: Assembling a bundle with synbundle-core
//!
//! Run with: `cargo run --example build_bundle`

use synbundle_core::BundleBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: In-memory bundle
    println!("Example 1: In-memory bundle");
    let builder = BundleBuilder::new()
        .symbolic_name("com.example.greeter")
        .singleton()
        .version("1.0.0")
        .header("Bundle-Activator", "com.example.greeter.Activator")
        .add_content("data/hello.txt", "hello");

    let (bytes, report) = builder.to_bytes_with_report()?;
    println!("  {} bytes, {} entries", bytes.len(), report.total_entries());
    for entry in &report.entries {
        println!("    {entry}");
    }

    // Example 2: Bundle with an external file, written to disk
    println!("\nExample 2: Persisted bundle");
    std::fs::write("example_payload.bin", [0xCA, 0xFE, 0xBA, 0xBE])?;

    let path = builder
        .add_file("lib/payload.bin", "example_payload.bin")
        .write_default_in(".")?;
    println!("  Wrote {}", path.display());

    // Cleanup (the bundle itself is removed when `path` is dropped)
    std::fs::remove_file("example_payload.bin")?;

    println!("\nExamples completed successfully!");
    Ok(())
}
