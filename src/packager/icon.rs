//! Icon asset resolution.
//!
//! Produces the executable icon at a fixed path inside the build directory,
//! preferring the pre-authored `.ico` asset and falling back to converting
//! the raster `.png` through the environment's interpreter with Pillow.
//! Resolution never aborts the pipeline: every failure path degrades to an
//! iconless build with a warning naming the failure subtype.

use super::environment::Environment;
use super::error::Result;
use super::settings::ProjectLayout;
use crate::cli::OutputManager;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::process::Command;

/// Target sizes embedded in a converted multi-resolution icon, in pixels.
pub const ICON_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Conversion snippet run by the environment's interpreter.
///
/// Arguments: source raster, destination icon, then one size per argument.
const CONVERT_SNIPPET: &str = "\
import sys
from PIL import Image
sizes = [(int(s), int(s)) for s in sys.argv[3:]]
Image.open(sys.argv[1]).save(sys.argv[2], format='ICO', sizes=sizes)
";

/// Outcome of icon resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IconAsset {
    /// The pre-authored icon, copied verbatim into the build directory.
    Premade(PathBuf),

    /// A multi-resolution icon converted from the raster asset.
    Converted(PathBuf),

    /// No usable icon; the build proceeds iconless.
    None,
}

impl IconAsset {
    /// Resolved icon path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            IconAsset::Premade(p) | IconAsset::Converted(p) => Some(p),
            IconAsset::None => None,
        }
    }
}

/// Why resolution degraded to an iconless build.
#[derive(Debug, Error)]
pub enum IconFailure {
    /// Neither the premade nor the raster asset exists.
    #[error("no icon asset found (looked for icon.ico and icon.png under src/assets)")]
    MissingAssets,

    /// The raster asset exists but cannot be decoded.
    #[error("raster icon is malformed: {0}")]
    MalformedRaster(String),

    /// Pillow is missing and installing it on demand also failed.
    #[error("conversion library unavailable and on-demand install failed")]
    DependencyMissing,

    /// Conversion itself failed after any install retry.
    #[error("icon conversion failed: {0}")]
    ConversionFailed(String),

    /// The converter produced a file that does not parse as an icon.
    #[error("converted icon is invalid: {0}")]
    InvalidProduct(String),

    /// Copying the premade icon into the build directory failed.
    #[error("could not copy premade icon: {0}")]
    CopyFailed(std::io::Error),
}

/// Resolves the executable icon for this build.
///
/// Precedence: premade `.ico` asset, then raster conversion, then iconless.
/// Failures are reported through `output` as warnings and never propagate;
/// only status-line write errors are fatal.
pub async fn resolve(
    layout: &ProjectLayout,
    env: &Environment,
    output: &OutputManager,
) -> Result<IconAsset> {
    match try_resolve(layout, env).await {
        Ok(asset) => Ok(asset),
        Err(failure) => {
            output.warn(&format!("{failure}; building without an icon"))?;
            Ok(IconAsset::None)
        }
    }
}

async fn try_resolve(
    layout: &ProjectLayout,
    env: &Environment,
) -> std::result::Result<IconAsset, IconFailure> {
    let target = layout.build_icon();

    let premade = layout.premade_icon();
    if premade.is_file() {
        fs::copy(&premade, &target)
            .await
            .map_err(IconFailure::CopyFailed)?;
        log::info!("using premade icon {}", premade.display());
        return Ok(IconAsset::Premade(target));
    }

    let raster = layout.raster_icon();
    if !raster.is_file() {
        return Err(IconFailure::MissingAssets);
    }

    // Decode locally first so a broken asset is reported as such instead of
    // surfacing as an opaque converter error.
    image::open(&raster).map_err(|e| IconFailure::MalformedRaster(e.to_string()))?;

    convert_with_retry(env, &raster, &target).await?;

    let sizes = validate_icon(&target).map_err(IconFailure::InvalidProduct)?;
    log::info!(
        "converted {} to a multi-resolution icon ({} sizes)",
        raster.display(),
        sizes.len()
    );
    Ok(IconAsset::Converted(target))
}

/// Runs the Pillow converter, installing Pillow and retrying exactly once
/// if the first attempt fails because the module is missing.
async fn convert_with_retry(
    env: &Environment,
    raster: &Path,
    target: &Path,
) -> std::result::Result<(), IconFailure> {
    match run_converter(env, raster, target).await {
        Ok(()) => Ok(()),
        Err(stderr) if is_missing_module(&stderr) => {
            log::warn!("Pillow not present in the environment, installing on demand");
            if !install_pillow(env).await {
                return Err(IconFailure::DependencyMissing);
            }
            run_converter(env, raster, target)
                .await
                .map_err(IconFailure::ConversionFailed)
        }
        Err(stderr) => Err(IconFailure::ConversionFailed(stderr)),
    }
}

/// One converter invocation; the error value is the captured stderr.
async fn run_converter(
    env: &Environment,
    raster: &Path,
    target: &Path,
) -> std::result::Result<(), String> {
    let mut cmd = Command::new(env.python());
    cmd.arg("-c").arg(CONVERT_SNIPPET).arg(raster).arg(target);
    for size in ICON_SIZES {
        cmd.arg(size.to_string());
    }

    let out = cmd
        .output()
        .await
        .map_err(|e| format!("failed to run interpreter: {e}"))?;

    if out.status.success() {
        Ok(())
    } else {
        Err(String::from_utf8_lossy(&out.stderr).trim().to_string())
    }
}

fn is_missing_module(stderr: &str) -> bool {
    stderr.contains("ModuleNotFoundError") || stderr.contains("No module named")
}

async fn install_pillow(env: &Environment) -> bool {
    let result = Command::new(env.python())
        .args(["-m", "pip", "install", "--quiet", "pillow"])
        .status()
        .await;

    match result {
        Ok(status) => status.success(),
        Err(e) => {
            log::warn!("could not run pip: {e}");
            false
        }
    }
}

/// Parses a produced icon and returns its entry sizes.
///
/// Accepts only icons carrying exactly the [`ICON_SIZES`] set.
pub fn validate_icon(path: &Path) -> std::result::Result<Vec<u32>, String> {
    let file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let dir = ico::IconDir::read(file).map_err(|e| e.to_string())?;

    let mut sizes: Vec<u32> = dir.entries().iter().map(|e| e.width()).collect();
    sizes.sort_unstable();

    if sizes != ICON_SIZES {
        return Err(format!("unexpected size set {sizes:?}"));
    }
    Ok(sizes)
}
