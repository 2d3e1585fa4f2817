//! MuSeg Packager - one-shot build tool for the MuSeg Audio Annotation Tool.
//!
//! This binary packages the application into a single self-contained
//! executable with proper error handling and artifact verification.

mod cli;
mod error;
mod packager;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
