//! Synonym precedence for base flavors.
//!
//! A synonym is a more specific flavor layered on a base flavor (setuptools
//! and Poetry on top of PEP 621). When both would match, the synonym wins:
//! the base answers `false` so that probing moves on to the synonym.

use super::{AvakasProject, Constructor, FlavorDetector};
use crate::error::Result;
use crate::manifest::VersionedManifest;
use std::path::Path;

/// A base flavor that defers detection to its synonyms.
///
/// Everything except detection is delegated to the base project unchanged.
pub struct WithSynonyms {
    base: Box<dyn AvakasProject>,
    synonyms: Vec<Constructor>,
}

impl WithSynonyms {
    pub fn new(base: Box<dyn AvakasProject>, synonyms: Vec<Constructor>) -> Self {
        Self { base, synonyms }
    }

    /// First synonym claiming `directory`, probed with a fresh project bound to it.
    fn claimed_by(&self, directory: &Path) -> Option<&'static str> {
        self.synonyms
            .iter()
            .map(|construct| construct(directory))
            .find(|synonym| synonym.guess_flavor())
            .map(|synonym| synonym.flavor())
    }
}

impl FlavorDetector for WithSynonyms {
    fn directory(&self) -> &Path {
        self.base.directory()
    }

    fn guess_flavor_in(&self, directory: &Path) -> bool {
        if let Some(synonym) = self.claimed_by(directory) {
            log::debug!(
                "{} defers to synonym {} in {}",
                self.base.flavor(),
                synonym,
                directory.display()
            );
            return false;
        }
        self.base.guess_flavor_in(directory)
    }
}

impl VersionedManifest for WithSynonyms {
    fn manifest_path(&self) -> &Path {
        self.base.manifest_path()
    }

    fn get_version(&self) -> Result<String> {
        self.base.get_version()
    }

    fn set_version(&self, version: &str, verify: bool) -> Result<bool> {
        self.base.set_version(version, verify)
    }
}

impl AvakasProject for WithSynonyms {
    fn flavor(&self) -> &'static str {
        self.base.flavor()
    }

    fn project_type(&self) -> &'static str {
        self.base.project_type()
    }
}
