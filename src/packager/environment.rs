//! Isolated environment validation.
//!
//! The pipeline never installs application dependencies itself; it only
//! verifies the project-local virtual environment exists before any other
//! stage runs, and hands later stages the interpreter living inside it.

use super::error::{Error, Result};
use super::settings::ProjectLayout;
use std::path::PathBuf;

/// Handle to a validated virtual environment.
///
/// Wraps the environment directory and resolves the interpreter and
/// launcher paths for the current platform.
#[derive(Clone, Debug)]
pub struct Environment {
    venv_dir: PathBuf,
}

impl Environment {
    /// Creates a handle for a known environment directory.
    ///
    /// Does not validate; use [`validate`] for the checked path.
    pub fn new(venv_dir: PathBuf) -> Self {
        Self { venv_dir }
    }

    /// Environment directory.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn venv_dir(&self) -> &PathBuf {
        &self.venv_dir
    }

    /// Python interpreter inside the environment.
    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.venv_dir.join("Scripts").join("python.exe")
        } else {
            self.venv_dir.join("bin").join("python")
        }
    }
}

/// Verifies the project's virtual environment exists.
///
/// Checks for the environment directory and its `pyvenv.cfg` marker, the
/// file every virtual environment carries regardless of the tool that
/// created it. Performs no filesystem mutation.
///
/// # Errors
///
/// [`Error::EnvironmentMissing`] if either check fails; the pipeline must
/// abort before any other stage runs.
pub fn validate(layout: &ProjectLayout) -> Result<Environment> {
    let venv_dir = layout.venv_dir();

    if !venv_dir.is_dir() || !venv_dir.join("pyvenv.cfg").is_file() {
        return Err(Error::EnvironmentMissing {
            root: layout.root().to_path_buf(),
        });
    }

    log::debug!("virtual environment found at {}", venv_dir.display());
    Ok(Environment::new(venv_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_environment_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let err = validate(&layout).unwrap_err();
        assert!(matches!(err, Error::EnvironmentMissing { .. }));
    }

    #[test]
    fn directory_without_marker_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("venv")).unwrap();
        let layout = ProjectLayout::new(dir.path());
        assert!(validate(&layout).is_err());
    }

    #[test]
    fn marker_file_satisfies_the_check() {
        let dir = tempfile::tempdir().unwrap();
        let venv = dir.path().join("venv");
        std::fs::create_dir(&venv).unwrap();
        std::fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        let layout = ProjectLayout::new(dir.path());
        let env = validate(&layout).unwrap();
        assert!(env.python().starts_with(&venv));
    }
}
