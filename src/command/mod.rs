pub mod flavor;
pub mod set;
pub mod show;

use crate::error::{AvakasError, Result};
use crate::flavor::{AvakasProject, registry};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum AvakasCommand {
    /// Print the project's current version.
    Show(show::ShowArgs),
    /// Write a new version into the project's manifest.
    Set(set::SetArgs),
    /// Print the detected project flavor.
    Flavor(flavor::FlavorArgs),
}

/// Arguments locating the project to operate on.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directory
    #[arg(value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Use this flavor instead of detecting one
    #[arg(long, value_name = "FLAVOR", env = "AVAKAS_FLAVOR")]
    pub flavor: Option<String>,
}

impl ProjectArgs {
    /// Opens the project, detecting its flavor unless `--flavor` was given.
    pub fn open(&self) -> Result<Box<dyn AvakasProject>> {
        if !self.directory.is_dir() {
            return Err(AvakasError::Other(anyhow::anyhow!(
                "{} is not a directory",
                self.directory.display()
            )));
        }

        let registry = registry::global()?;
        let project = match &self.flavor {
            Some(id) => registry.open(id, &self.directory)?,
            None => registry
                .resolve(&self.directory)
                .ok_or_else(|| AvakasError::NoFlavorMatched(self.directory.clone()))?,
        };

        log::debug!(
            "Using flavor {} ({})",
            project.flavor(),
            project.manifest_path().display()
        );
        Ok(project)
    }
}

/// `path` relative to the working directory, with forward slashes.
pub(crate) fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}
