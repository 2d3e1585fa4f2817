//! Fixed filesystem layout of a MuSeg project checkout.
//!
//! Every path the pipeline touches derives from a single explicit project
//! root, so components never consult the ambient working directory and can
//! be exercised against temporary trees in tests.

use std::path::{Path, PathBuf};

/// Name of the produced executable, before the platform suffix.
pub const PRODUCT_NAME: &str = "MuSeg";

/// Script PyInstaller analyzes as the application entry point.
pub const ENTRY_POINT: &str = "run_labeler.py";

/// All fixed paths of a project checkout, rooted at one directory.
///
/// # Layout
///
/// ```text
/// <root>/
///   run_labeler.py        entry point
///   src/                  application sources (search path)
///   src/assets/icon.ico   pre-authored multi-resolution icon
///   src/assets/icon.png   raster fallback icon
///   venv/                 isolated Python environment
///   build/                packaging working directory
///   dist/                 distribution output (MuSeg.exe)
/// ```
#[derive(Clone, Debug)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Creates a layout rooted at the given project directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Isolated environment directory (`venv/`).
    pub fn venv_dir(&self) -> PathBuf {
        self.root.join("venv")
    }

    /// Application source directory, passed to the engine as a search path.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Asset directory shipped with the application sources.
    pub fn assets_dir(&self) -> PathBuf {
        self.source_dir().join("assets")
    }

    /// Pre-authored multi-resolution icon, preferred when present.
    pub fn premade_icon(&self) -> PathBuf {
        self.assets_dir().join("icon.ico")
    }

    /// Single-resolution raster icon, converted when the premade one is absent.
    pub fn raster_icon(&self) -> PathBuf {
        self.assets_dir().join("icon.png")
    }

    /// Packaging working directory (`build/`).
    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Distribution output directory (`dist/`).
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    /// Target path of the resolved executable icon inside the build directory.
    pub fn build_icon(&self) -> PathBuf {
        self.build_dir().join("icon.ico")
    }

    /// Entry point script at the project root.
    pub fn entry_point(&self) -> PathBuf {
        self.root.join(ENTRY_POINT)
    }

    /// The single produced artifact, named from the fixed product identifier.
    pub fn artifact(&self) -> PathBuf {
        self.dist_dir()
            .join(format!("{PRODUCT_NAME}{}", std::env::consts::EXE_SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_root() {
        let layout = ProjectLayout::new("/work/museg");
        assert_eq!(layout.venv_dir(), Path::new("/work/museg/venv"));
        assert_eq!(layout.premade_icon(), Path::new("/work/museg/src/assets/icon.ico"));
        assert_eq!(layout.raster_icon(), Path::new("/work/museg/src/assets/icon.png"));
        assert_eq!(layout.build_icon(), Path::new("/work/museg/build/icon.ico"));
        assert_eq!(layout.entry_point(), Path::new("/work/museg/run_labeler.py"));
    }

    #[test]
    fn artifact_is_named_from_product_identifier() {
        let layout = ProjectLayout::new("/work/museg");
        let name = layout.artifact().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(PRODUCT_NAME));
    }
}
