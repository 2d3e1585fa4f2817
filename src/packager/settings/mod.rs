//! Configuration for one pipeline run.
//!
//! A run is fully described by the project layout plus two independent
//! build-mode flags, fixed at invocation time and immutable afterwards.

mod layout;

pub use layout::{ENTRY_POINT, PRODUCT_NAME, ProjectLayout};

use super::error::{Context, Result};
use std::path::{Path, PathBuf};

/// The two independent switches of a build invocation.
///
/// `clean` purges prior artifacts before building; `debug` keeps the
/// diagnostic console in the produced binary instead of the default
/// windowed-only presentation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BuildMode {
    /// Purge build/dist/spec artifacts before building.
    pub clean: bool,

    /// Build with a diagnostic console instead of windowed-only.
    pub debug: bool,
}

/// Immutable configuration for a single pipeline run.
#[derive(Clone, Debug)]
pub struct Settings {
    layout: ProjectLayout,
    mode: BuildMode,
}

impl Settings {
    /// Project filesystem layout.
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Build mode flags supplied at invocation.
    pub fn mode(&self) -> BuildMode {
        self.mode
    }
}

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use museg_packager::packager::SettingsBuilder;
///
/// # fn example() -> museg_packager::packager::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .clean(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    clean: bool,
    debug: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.project_root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Enables purging prior artifacts before building.
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Enables the diagnostic console in the produced binary.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_root` was not set.
    pub fn build(self) -> Result<Settings> {
        Ok(Settings {
            layout: ProjectLayout::new(self.project_root.context("project_root is required")?),
            mode: BuildMode {
                clean: self.clean,
                debug: self.debug,
            },
        })
    }
}
