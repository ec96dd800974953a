//! Project flavors.
//!
//! A flavor is a named convention for where a project keeps its version:
//! which manifest file, which key path, and how to recognise the convention.
//! Every flavor is a type implementing [`AvakasProject`], built through a
//! [`Constructor`] stored in the [`registry`].
//!
//! - **`python`**: PEP 621 `pyproject.toml` and its setuptools/Poetry synonyms
//! - **`node`**: npm `package.json`
//! - **`synonym`**: makes a base flavor defer to its more specific synonyms
//! - **`registry`**: ordered catalog used to probe a directory

pub mod node;
pub mod python;
pub mod registry;
pub mod synonym;

pub use node::NodeProject;
pub use python::{PythonFlavor, PythonProject};
pub use registry::{FlavorEntry, FlavorRegistry, Role};
pub use synonym::WithSynonyms;

use crate::manifest::VersionedManifest;
use std::path::Path;

/// Decides whether a directory follows a flavor's convention.
///
/// Detection is total: a missing or unparsable manifest is `false`, never an
/// error.
pub trait FlavorDetector {
    /// Directory the project is bound to.
    fn directory(&self) -> &Path;

    /// Checks `directory` without rebinding the project.
    fn guess_flavor_in(&self, directory: &Path) -> bool;

    fn guess_flavor(&self) -> bool {
        self.guess_flavor_in(self.directory())
    }
}

/// A project bound to one directory whose version can be read and written.
pub trait AvakasProject: FlavorDetector + VersionedManifest {
    /// Registry identifier, e.g. `python-poetry`.
    fn flavor(&self) -> &'static str;

    /// Human-readable description of the convention.
    fn project_type(&self) -> &'static str;
}

/// Builds a project of one flavor bound to a directory.
pub type Constructor = fn(&Path) -> Box<dyn AvakasProject>;
