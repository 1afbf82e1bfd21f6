//! Build script for spyt.
//!
//! Places the `.env.example` template next to the location where the binary
//! looks for its `.env` file, so a fresh install has a ready-made template for
//! the Spotify client credentials and endpoint overrides.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` into `<local data dir>/spyt/`.
///
/// # Destination
///
/// - Linux: `~/.local/share/spyt/.env.example`
/// - macOS: `~/Library/Application Support/spyt/.env.example`
/// - Windows: `%LOCALAPPDATA%/spyt/.env.example`
///
/// A missing template only emits a cargo warning. Failing to create the
/// destination directory or to write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spyt");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
