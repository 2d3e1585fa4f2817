//! Command line interface for the MuSeg packager.
//!
//! Parses the build-mode flags, drives the pipeline, and maps the outcome
//! to the process exit code: 0 on success, 1 on any fatal stage failure.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};
use crate::packager::{Packager, SettingsBuilder};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();

    if let Err(reason) = args.validate() {
        return Err(CliError::InvalidArguments { reason }.into());
    }

    let config = RuntimeConfig::from(&args);
    let settings = SettingsBuilder::new()
        .project_root(&args.project_root)
        .clean(args.clean)
        .debug(args.debug)
        .build()?;

    let packager = Packager::new(settings);
    match packager.run(config.output()).await {
        Ok(artifact) => {
            config.output().success(&format!(
                "Packaged {} ({:.2} MiB)",
                artifact.path().display(),
                artifact.size_mib()
            ))?;
            Ok(0)
        }
        Err(e) => {
            config.output().error(&e.to_string())?;
            Ok(1)
        }
    }
}
