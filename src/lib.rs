//! Packaging pipeline for the MuSeg Audio Annotation Tool.
//!
//! Turns the MuSeg project tree into a single self-contained executable
//! via PyInstaller, in four sequential stages:
//! - environment validation (venv must exist)
//! - workspace preparation (optional clean, build dir creation)
//! - icon resolution (premade copy, raster conversion, or iconless)
//! - engine invocation (one blocking PyInstaller run)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod packager;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
pub use packager::{BuildArtifact, BuildMode, Packager, SettingsBuilder};
