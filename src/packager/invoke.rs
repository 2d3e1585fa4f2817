//! Packaging engine invocation.
//!
//! Assembles the complete PyInstaller argument set as a pure function of
//! the build mode, layout, and resolved icon, then runs the engine exactly
//! once through the environment's interpreter. No retries, no timeout: the
//! call blocks until the engine finishes.

use super::environment::Environment;
use super::error::{Error, ErrorExt, Result};
use super::settings::{BuildMode, ENTRY_POINT, PRODUCT_NAME, ProjectLayout};
use crate::bail;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Modules PyInstaller's static analysis cannot discover in this
/// application: audio decoding, numerical, plotting, and Qt submodules.
/// Fixed allowlist, never derived from the source tree.
pub const HIDDEN_IMPORTS: [&str; 7] = [
    "librosa",
    "audioread",
    "soundfile",
    "numpy",
    "matplotlib",
    "matplotlib.backends.backend_qtagg",
    "PySide6.QtMultimedia",
];

/// Separator PyInstaller expects inside `--add-data` mappings.
const DATA_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Fully assembled engine argument set.
///
/// Built once, before invocation; the engine is never called with a
/// partial set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackagerArgs(Vec<String>);

impl PackagerArgs {
    /// Assembles the argument set for one build.
    ///
    /// Exactly one of `--windowed` and `--console` is emitted: windowed is
    /// the default and the debug flag replaces it with the console flag.
    /// The icon argument appears only when an icon was resolved.
    pub fn assemble(layout: &ProjectLayout, mode: BuildMode, icon: Option<&Path>) -> Result<Self> {
        let mut args: Vec<String> = vec![
            ENTRY_POINT.into(),
            "--name".into(),
            PRODUCT_NAME.into(),
            "--onefile".into(),
            "--noconfirm".into(),
            "--distpath".into(),
            "dist".into(),
            "--workpath".into(),
            "build".into(),
            "--specpath".into(),
            "build".into(),
            "--paths".into(),
            "src".into(),
        ];

        args.push(if mode.debug { "--console" } else { "--windowed" }.into());

        if let Some(icon) = icon {
            let icon = icon
                .absolutize()
                .fs_context("resolving icon path", icon)?;
            args.push("--icon".into());
            args.push(icon.to_string_lossy().into_owned());
        }

        for module in HIDDEN_IMPORTS {
            args.push("--hidden-import".into());
            args.push(module.into());
        }

        // The raster icon rides inside the artifact for in-application use,
        // independent of the executable icon.
        args.push("--add-data".into());
        args.push(format!(
            "{}{}assets",
            layout.raster_icon().display(),
            DATA_SEPARATOR
        ));

        Ok(Self(args))
    }

    /// Assembled arguments in invocation order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// The produced binary, inspected only for existence and size.
#[derive(Clone, Debug)]
pub struct BuildArtifact {
    path: PathBuf,
    size_bytes: u64,
}

impl BuildArtifact {
    /// Absolute path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Artifact size in bytes.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Artifact size in mebibytes, rounded to two decimal places.
    pub fn size_mib(&self) -> f64 {
        (self.size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

/// Runs PyInstaller once with the assembled argument set.
///
/// # Errors
///
/// [`Error::PackagingFailed`] carrying the engine's termination code if it
/// reports failure; no retry is attempted. On success the artifact must
/// exist at its fixed path or the run is treated as a bundling bug.
pub async fn run_engine(
    env: &Environment,
    layout: &ProjectLayout,
    args: &PackagerArgs,
) -> Result<BuildArtifact> {
    log::info!("invoking PyInstaller for {PRODUCT_NAME}");
    log::debug!("engine arguments: {:?}", args.as_slice());

    let status = Command::new(env.python())
        .args(["-m", "PyInstaller"])
        .args(args.as_slice())
        .current_dir(layout.root())
        .status()
        .await
        .map_err(|source| Error::CommandFailed {
            command: "python -m PyInstaller".to_string(),
            source,
        })?;

    if !status.success() {
        return Err(Error::PackagingFailed {
            code: status.code().unwrap_or(-1),
        });
    }

    let artifact = layout.artifact();
    let artifact = artifact
        .absolutize()
        .fs_context("resolving artifact path", &artifact)?
        .into_owned();
    let metadata = match tokio::fs::metadata(&artifact).await {
        Ok(metadata) => metadata,
        Err(_) => bail!(
            "engine reported success but no artifact exists at {}",
            artifact.display()
        ),
    };

    Ok(BuildArtifact {
        path: artifact,
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ProjectLayout {
        ProjectLayout::new("/work/museg")
    }

    fn mode(clean: bool, debug: bool) -> BuildMode {
        BuildMode { clean, debug }
    }

    fn count(args: &PackagerArgs, flag: &str) -> usize {
        args.as_slice().iter().filter(|a| *a == flag).count()
    }

    #[test]
    fn exactly_one_visibility_flag_for_every_mode() {
        for clean in [false, true] {
            for debug in [false, true] {
                let args = PackagerArgs::assemble(&layout(), mode(clean, debug), None).unwrap();
                let windowed = count(&args, "--windowed");
                let console = count(&args, "--console");
                assert_eq!(windowed + console, 1, "clean={clean} debug={debug}");
                assert_eq!(console == 1, debug);
            }
        }
    }

    #[test]
    fn debug_differs_from_default_only_in_the_visibility_flag() {
        let release = PackagerArgs::assemble(&layout(), mode(false, false), None).unwrap();
        let debug = PackagerArgs::assemble(&layout(), mode(false, true), None).unwrap();

        let strip = |args: &PackagerArgs| -> Vec<String> {
            args.as_slice()
                .iter()
                .filter(|a| *a != "--windowed" && *a != "--console")
                .cloned()
                .collect()
        };
        assert_eq!(strip(&release), strip(&debug));
    }

    #[test]
    fn icon_argument_is_omitted_entirely_when_unresolved() {
        let args = PackagerArgs::assemble(&layout(), mode(false, false), None).unwrap();
        assert_eq!(count(&args, "--icon"), 0);
        assert!(args.as_slice().iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn resolved_icon_is_passed_as_an_absolute_path() {
        let icon = layout().build_icon();
        let args = PackagerArgs::assemble(&layout(), mode(false, false), Some(&icon)).unwrap();
        let slice = args.as_slice();
        let pos = slice.iter().position(|a| a == "--icon").unwrap();
        assert!(Path::new(&slice[pos + 1]).is_absolute());
    }

    #[test]
    fn hidden_import_allowlist_is_always_declared() {
        let args = PackagerArgs::assemble(&layout(), mode(false, false), None).unwrap();
        assert_eq!(count(&args, "--hidden-import"), HIDDEN_IMPORTS.len());
        for module in HIDDEN_IMPORTS {
            assert!(args.as_slice().iter().any(|a| a == module));
        }
    }

    #[test]
    fn raster_asset_is_embedded_under_the_assets_subdirectory() {
        let args = PackagerArgs::assemble(&layout(), mode(false, false), None).unwrap();
        let slice = args.as_slice();
        let pos = slice.iter().position(|a| a == "--add-data").unwrap();
        let mapping = &slice[pos + 1];
        assert!(mapping.contains("icon.png"));
        assert!(mapping.ends_with("assets"));
    }

    #[test]
    fn size_is_reported_in_mebibytes_to_two_decimals() {
        let artifact = BuildArtifact {
            path: PathBuf::from("/work/museg/dist/MuSeg.exe"),
            size_bytes: 44_040_192 + 5_000, // 42 MiB and change
        };
        assert_eq!(artifact.size_mib(), 42.0);

        let artifact = BuildArtifact {
            path: PathBuf::from("/work/museg/dist/MuSeg.exe"),
            size_bytes: 1_572_864, // exactly 1.5 MiB
        };
        assert_eq!(artifact.size_mib(), 1.5);
    }

    #[cfg(unix)]
    mod with_fake_engine {
        use super::*;
        use crate::packager::environment::Environment;
        use std::os::unix::fs::PermissionsExt;

        /// Writes a stand-in interpreter script at the environment's
        /// interpreter path.
        fn fake_env(root: &Path, script: &str) -> Environment {
            let venv = root.join("venv");
            std::fs::create_dir_all(venv.join("bin")).unwrap();
            let python = venv.join("bin").join("python");
            std::fs::write(&python, script).unwrap();
            std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();
            Environment::new(venv)
        }

        #[tokio::test]
        async fn engine_failure_surfaces_the_termination_code() {
            let tmp = tempfile::tempdir().unwrap();
            let layout = ProjectLayout::new(tmp.path());
            let env = fake_env(tmp.path(), "#!/bin/sh\nexit 3\n");

            let args = PackagerArgs::assemble(&layout, BuildMode::default(), None).unwrap();
            let err = run_engine(&env, &layout, &args).await.unwrap_err();
            assert!(matches!(err, Error::PackagingFailed { code: 3 }));
        }

        #[tokio::test]
        async fn success_reports_the_artifact_at_its_fixed_path() {
            let tmp = tempfile::tempdir().unwrap();
            let layout = ProjectLayout::new(tmp.path());
            let env = fake_env(tmp.path(), "#!/bin/sh\nexit 0\n");
            std::fs::create_dir_all(layout.dist_dir()).unwrap();
            std::fs::write(layout.artifact(), vec![0u8; 2048]).unwrap();

            let args = PackagerArgs::assemble(&layout, BuildMode::default(), None).unwrap();
            let artifact = run_engine(&env, &layout, &args).await.unwrap();
            assert!(artifact.path().is_absolute());
            assert_eq!(artifact.size_bytes(), 2048);
        }

        #[tokio::test]
        async fn success_without_an_artifact_is_a_bundling_bug() {
            let tmp = tempfile::tempdir().unwrap();
            let layout = ProjectLayout::new(tmp.path());
            let env = fake_env(tmp.path(), "#!/bin/sh\nexit 0\n");

            let args = PackagerArgs::assemble(&layout, BuildMode::default(), None).unwrap();
            assert!(run_engine(&env, &layout, &args).await.is_err());
        }
    }
}
