//! Node.js projects described by `package.json`.

use super::{AvakasProject, FlavorDetector};
use crate::error::Result;
use crate::manifest::{JsonDocument, KeyPath, StructuredManifest, VersionedManifest};
use std::path::{Path, PathBuf};

pub const FLAVOR: &str = "node";
pub const PROJECT_FILE_NAME: &str = "package.json";

const VERSION_KEYS: &[KeyPath] = &[&["version"]];

#[derive(Debug, Clone)]
pub struct NodeProject {
    directory: PathBuf,
    manifest: StructuredManifest<JsonDocument>,
}

impl NodeProject {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            manifest: StructuredManifest::new(directory.join(PROJECT_FILE_NAME), VERSION_KEYS),
        }
    }

    pub fn boxed(directory: &Path) -> Box<dyn AvakasProject> {
        Box::new(Self::new(directory))
    }
}

impl FlavorDetector for NodeProject {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn guess_flavor_in(&self, directory: &Path) -> bool {
        let manifest: StructuredManifest<JsonDocument> =
            StructuredManifest::new(directory.join(PROJECT_FILE_NAME), VERSION_KEYS);

        manifest
            .try_load()
            .is_some_and(|doc| manifest.locate(&doc).is_some())
    }
}

impl VersionedManifest for NodeProject {
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

impl AvakasProject for NodeProject {
    fn flavor(&self) -> &'static str {
        FLAVOR
    }

    fn project_type(&self) -> &'static str {
        "Node.js (package.json)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PACKAGE_JSON: &str = r#"{
  "name": "demo",
  "version": "1.4.0",
  "scripts": {
    "test": "jest"
  },
  "engines": {
    "node": ">=18"
  }
}
"#;

    #[test]
    fn test_detect_and_bump() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_FILE_NAME), PACKAGE_JSON).unwrap();
        let project = NodeProject::new(temp.path());

        assert!(project.guess_flavor());
        assert_eq!(project.get_version().unwrap(), "1.4.0");
        assert!(project.set_version("1.5.0", true).unwrap());
        assert!(!project.set_version("1.5.0", true).unwrap());

        let result = fs::read_to_string(temp.path().join(PROJECT_FILE_NAME)).unwrap();
        assert_eq!(result, PACKAGE_JSON.replace("1.4.0", "1.5.0"));
    }

    #[test]
    fn test_no_match_without_version() {
        let temp = TempDir::new().unwrap();
        let project = NodeProject::new(temp.path());
        assert!(!project.guess_flavor());

        fs::write(temp.path().join(PROJECT_FILE_NAME), "{\"private\": true}").unwrap();
        assert!(!project.guess_flavor());

        fs::write(temp.path().join(PROJECT_FILE_NAME), "{ not json").unwrap();
        assert!(!project.guess_flavor());
    }
}
