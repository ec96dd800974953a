//! Python projects described by `pyproject.toml`.
//!
//! [PEP 621](https://peps.python.org/pep-0621/) keeps the version under
//! `[project]`. Build backends add their own conventions on top, so the
//! backend-specific flavors are registered as synonyms of the PEP 621 flavor
//! and win whenever they match.

use super::{AvakasProject, FlavorDetector};
use crate::error::Result;
use crate::manifest::{Document, KeyPath, StructuredManifest, TomlDocument, VersionedManifest};
use std::path::{Path, PathBuf};

pub const PROJECT_FILE_NAME: &str = "pyproject.toml";

const PEP621_VERSION_KEYS: &[KeyPath] = &[&["project", "version"], &["version"]];
const POETRY_VERSION_KEYS: &[KeyPath] = &[&["tool", "poetry", "version"]];

const BUILD_BACKEND_KEY: KeyPath = &["build-system", "build-backend"];
const SETUPTOOLS_BACKEND: &str = "setuptools.build_meta";

/// The `pyproject.toml` conventions avakas knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonFlavor {
    /// Plain PEP 621 metadata (`project.version`, or a root `version`).
    Pep621,
    /// PEP 621 metadata built by setuptools.
    Setuptools,
    /// Poetry keeps its own version under `[tool.poetry]`.
    Poetry,
}

impl PythonFlavor {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Pep621 => "python-pep621.toml",
            Self::Setuptools => "python-setuptools",
            Self::Poetry => "python-poetry",
        }
    }

    pub const fn project_type(self) -> &'static str {
        match self {
            Self::Pep621 => "Python (PEP 621 compliant pyproject.toml)",
            Self::Setuptools => "Python (PEP 621 compliant pyproject.toml and setuptools)",
            Self::Poetry => "Python project managed by Poetry",
        }
    }

    const fn version_keys(self) -> &'static [KeyPath] {
        match self {
            Self::Pep621 | Self::Setuptools => PEP621_VERSION_KEYS,
            Self::Poetry => POETRY_VERSION_KEYS,
        }
    }

    /// Convention-specific predicate over a parsed `pyproject.toml`.
    fn matches(self, manifest: &StructuredManifest<TomlDocument>, doc: &TomlDocument) -> bool {
        match self {
            Self::Pep621 | Self::Poetry => manifest.locate(doc).is_some(),
            Self::Setuptools => doc.string_at(BUILD_BACKEND_KEY) == Some(SETUPTOOLS_BACKEND),
        }
    }
}

/// A directory holding a `pyproject.toml` of a given [`PythonFlavor`].
///
/// The PEP 621 base flavor is only built by the registry, which wraps it so
/// that setuptools and Poetry projects are never reported as plain PEP 621:
///
/// ```compile_fail
/// let _ = avakas::flavor::PythonProject::pep621(std::path::Path::new("."));
/// ```
#[derive(Debug, Clone)]
pub struct PythonProject {
    directory: PathBuf,
    flavor: PythonFlavor,
    manifest: StructuredManifest<TomlDocument>,
}

impl PythonProject {
    pub(crate) fn new(directory: &Path, flavor: PythonFlavor) -> Self {
        Self {
            directory: directory.to_path_buf(),
            flavor,
            manifest: Self::manifest_in(directory, flavor),
        }
    }

    pub(crate) fn pep621(directory: &Path) -> Box<dyn AvakasProject> {
        Box::new(Self::new(directory, PythonFlavor::Pep621))
    }

    pub fn setuptools(directory: &Path) -> Box<dyn AvakasProject> {
        Box::new(Self::new(directory, PythonFlavor::Setuptools))
    }

    pub fn poetry(directory: &Path) -> Box<dyn AvakasProject> {
        Box::new(Self::new(directory, PythonFlavor::Poetry))
    }

    fn manifest_in(directory: &Path, flavor: PythonFlavor) -> StructuredManifest<TomlDocument> {
        StructuredManifest::new(directory.join(PROJECT_FILE_NAME), flavor.version_keys())
    }
}

impl FlavorDetector for PythonProject {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn guess_flavor_in(&self, directory: &Path) -> bool {
        let manifest = Self::manifest_in(directory, self.flavor);
        let Some(doc) = manifest.try_load() else {
            return false;
        };

        let matched = self.flavor.matches(&manifest, &doc);
        log::debug!(
            "{} {} {}",
            self.flavor.id(),
            if matched { "matches" } else { "does not match" },
            directory.display()
        );
        matched
    }
}

impl VersionedManifest for PythonProject {
    fn manifest_path(&self) -> &Path {
        self.manifest.manifest_path()
    }

    fn get_version(&self) -> Result<String> {
        self.manifest.get_version()
    }

    fn set_version(&self, version: &str, verify: bool) -> Result<bool> {
        self.manifest.set_version(version, verify)
    }
}

impl AvakasProject for PythonProject {
    fn flavor(&self) -> &'static str {
        self.flavor.id()
    }

    fn project_type(&self) -> &'static str {
        self.flavor.project_type()
    }
}
