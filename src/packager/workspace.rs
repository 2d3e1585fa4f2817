//! Workspace preparation.
//!
//! Optionally purges artifacts of prior runs, then makes sure the build
//! working directory exists. Removal is idempotent (absent paths are not
//! an error) but any real removal failure aborts the pipeline.

use super::error::{Error, ErrorExt, Result};
use super::settings::{BuildMode, ProjectLayout};
use std::io;
use std::path::Path;
use tokio::fs;

/// Prepares the workspace for a build.
///
/// With `mode.clean` set, removes the build directory, the distribution
/// directory, and any generated `.spec` files at the project root. Always
/// finishes by creating the build directory.
pub async fn prepare(layout: &ProjectLayout, mode: BuildMode) -> Result<()> {
    if mode.clean {
        remove_dir_if_present(&layout.build_dir()).await?;
        remove_dir_if_present(&layout.dist_dir()).await?;
        remove_spec_files(layout).await?;
    }

    let build_dir = layout.build_dir();
    fs::create_dir_all(&build_dir)
        .await
        .fs_context("creating build directory", &build_dir)?;

    Ok(())
}

/// Removes a directory tree if it exists.
async fn remove_dir_if_present(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {
            log::debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::WorkspaceCleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Removes generated PyInstaller spec files at the project root.
async fn remove_spec_files(layout: &ProjectLayout) -> Result<()> {
    let root = layout.root().to_path_buf();
    let mut entries = match fs::read_dir(&root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(Error::WorkspaceCleanup { path: root, source });
        }
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| Error::WorkspaceCleanup {
            path: root.clone(),
            source,
        })?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "spec") {
            fs::remove_file(&path)
                .await
                .map_err(|source| Error::WorkspaceCleanup {
                    path: path.clone(),
                    source,
                })?;
            log::debug!("removed {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_mode() -> BuildMode {
        BuildMode {
            clean: true,
            debug: false,
        }
    }

    #[tokio::test]
    async fn clean_removes_prior_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        std::fs::create_dir_all(layout.build_dir().join("work")).unwrap();
        std::fs::create_dir_all(layout.dist_dir()).unwrap();
        std::fs::write(dir.path().join("MuSeg.spec"), "# generated").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        prepare(&layout, clean_mode()).await.unwrap();

        assert!(!layout.build_dir().join("work").exists());
        assert!(!layout.dist_dir().exists());
        assert!(!dir.path().join("MuSeg.spec").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(layout.build_dir().is_dir());
    }

    #[tokio::test]
    async fn clean_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());

        prepare(&layout, clean_mode()).await.unwrap();
        prepare(&layout, clean_mode()).await.unwrap();

        assert!(layout.build_dir().is_dir());
        assert!(!layout.dist_dir().exists());
    }

    #[tokio::test]
    async fn scan_failure_during_clean_is_a_cleanup_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_directory");
        std::fs::write(&file, b"x").unwrap();

        // A root that is a regular file makes the spec-file scan fail.
        let err = remove_spec_files(&ProjectLayout::new(&file)).await.unwrap_err();
        assert!(matches!(err, Error::WorkspaceCleanup { .. }));
    }

    #[tokio::test]
    async fn default_mode_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        std::fs::create_dir_all(layout.dist_dir()).unwrap();
        std::fs::write(layout.dist_dir().join("old.bin"), b"x").unwrap();

        prepare(&layout, BuildMode::default()).await.unwrap();

        assert!(layout.dist_dir().join("old.bin").exists());
        assert!(layout.build_dir().is_dir());
    }
}
