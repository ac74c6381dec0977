//! Build script for the liked-track checker.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory (`<data_local_dir>/spotify-liked/.env.example`), next to
//! where the application looks for its `.env` file.
//!
//! A read-only or missing data directory only produces a cargo warning; the
//! template is a convenience and never fails the build.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let Some(mut out_dir) = dirs::data_local_dir() else {
        return Ok(());
    };
    out_dir.push("spotify-liked");

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
