//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Builds the MuSeg desktop application into a single self-contained executable
#[derive(Parser, Debug)]
#[command(
    name = "museg-packager",
    version,
    about = "Builds the MuSeg Audio Annotation Tool into a single executable",
    long_about = "Packages the MuSeg Audio Annotation Tool with PyInstaller into one \
self-contained executable.

Requires a provisioned virtual environment (venv/) at the project root.

Usage:
  museg-packager                  standard windowed release build
  museg-packager --clean          purge build/dist/spec artifacts first
  museg-packager --debug          keep a diagnostic console in the binary

Exit code 0 = artifact guaranteed to exist in dist/."
)]
pub struct Args {
    /// Purge prior build, distribution, and spec artifacts before building
    #[arg(long)]
    pub clean: bool,

    /// Build with a diagnostic console instead of a windowed-only binary
    #[arg(long)]
    pub debug: bool,

    /// Project root containing run_labeler.py, src/, and venv/
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.project_root.is_dir() {
            return Err(format!(
                "project root {} is not a directory",
                self.project_root.display()
            ));
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        let output = super::OutputManager::new(
            true,  // Always verbose
            false, // Never quiet
        );

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
