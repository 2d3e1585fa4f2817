//! The asset-preparation and executable-packaging pipeline.
//!
//! Four stages run strictly in sequence, each communicating with the next
//! through the filesystem: environment validation, workspace preparation,
//! icon resolution, engine invocation. The first fatal error aborts the
//! run; only icon resolution is allowed to degrade instead of failing.

pub mod environment;
pub mod error;
pub mod icon;
pub mod invoke;
pub mod settings;
pub mod workspace;

pub use error::{Context, Error, ErrorExt, Result};
pub use icon::{ICON_SIZES, IconAsset};
pub use invoke::{BuildArtifact, HIDDEN_IMPORTS, PackagerArgs};
pub use settings::{BuildMode, PRODUCT_NAME, ProjectLayout, Settings, SettingsBuilder};

use crate::cli::OutputManager;

/// Pipeline orchestrator.
///
/// Owns the run configuration and walks the four stages in order,
/// emitting one status line per stage so a failing stage is visible
/// without reading logs.
///
/// # Examples
///
/// ```no_run
/// use museg_packager::cli::OutputManager;
/// use museg_packager::packager::{Packager, SettingsBuilder};
///
/// # async fn example() -> museg_packager::packager::Result<()> {
/// let settings = SettingsBuilder::new().project_root(".").build()?;
/// let output = OutputManager::new(false, false);
/// let artifact = Packager::new(settings).run(&output).await?;
/// println!("built {}", artifact.path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Packager {
    settings: Settings,
}

impl Packager {
    /// Creates a packager for one run.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs the pipeline to completion.
    ///
    /// # Errors
    ///
    /// Any fatal stage error aborts immediately; see [`Error`] for the
    /// taxonomy. Icon-resolution failures are downgraded to warnings
    /// inside the icon stage and never surface here.
    pub async fn run(&self, output: &OutputManager) -> Result<BuildArtifact> {
        let layout = self.settings.layout();
        let mode = self.settings.mode();

        output.progress("Checking virtual environment")?;
        let env = environment::validate(layout)?;

        output.progress("Preparing workspace")?;
        workspace::prepare(layout, mode).await?;

        output.progress("Resolving application icon")?;
        let icon = icon::resolve(layout, &env, output).await?;

        output.progress("Running PyInstaller")?;
        let args = PackagerArgs::assemble(layout, mode, icon.path())?;
        invoke::run_engine(&env, layout, &args).await
    }

    /// Returns a reference to the run settings.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
