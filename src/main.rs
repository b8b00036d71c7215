//! dist_release - runs the release build of a project.
//!
//! Builds the bundles listed in release.toml, then finalizes the publishable
//! package. Any failure exits with status 1 after printing the error once.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match dist_release::cli::run().await {
        Ok(code) => code,
        // Already printed where it happened
        Err(e) if e.is_reported() => 1,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
