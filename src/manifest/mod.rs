//! Versioned manifest files.
//!
//! A manifest is read through its parsed form and written through its line
//! form. The parsed form locates the version and, after a write, proves that
//! nothing but the version changed:
//!
//! 1. **Parse**: snapshot the document and find the version key path
//! 2. **Rewrite**: patch the version line(s) with [`crate::patch`]
//! 3. **Write**: replace the file's contents (skipped if nothing changed)
//! 4. **Verify**: re-parse and compare against the snapshot with only the
//!    version replaced
//!
//! Verification happens after the write. There is no rollback; a caller that
//! cannot tolerate a bad write must back the file up first.

pub mod json_doc;
pub mod toml_doc;

pub use json_doc::JsonDocument;
pub use toml_doc::TomlDocument;

use crate::error::{AvakasError, Result};
use crate::patch::SourceLines;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Sequence of keys resolved by successive indexing, e.g. `["tool", "poetry", "version"]`.
pub type KeyPath = &'static [&'static str];

/// Read and update the version stored in a manifest file.
pub trait VersionedManifest {
    fn manifest_path(&self) -> &Path;

    /// Returns the version string.
    ///
    /// # Errors
    ///
    /// - `Io`: manifest cannot be read
    /// - `MalformedDocument`: manifest does not parse
    /// - `MissingVersion`: no version at any of the expected key paths
    fn get_version(&self) -> Result<String>;

    /// Replaces the version, returning `false` if it was already `version`.
    ///
    /// With `verify`, the written file is re-parsed and compared against the
    /// original; any difference besides the version is `SanityCheckFailed`.
    fn set_version(&self, version: &str, verify: bool) -> Result<bool>;
}

/// A structured file format that can hold a version.
pub trait Document: Sized + Clone + PartialEq {
    /// Human-readable format name used in log messages.
    const FORMAT: &'static str;

    fn parse(content: &str) -> std::result::Result<Self, String>;

    /// String value at `key_path`. Non-string values count as absent.
    fn string_at(&self, key_path: &[&str]) -> Option<&str>;

    /// Replaces an existing value at `key_path`; returns `false` if absent.
    fn replace_string(&mut self, key_path: &[&str], value: &str) -> bool;

    /// Rewrites the raw line(s) holding the value at `key_path`.
    fn rewrite_version(
        lines: &[String],
        key_path: &[&str],
        version: &str,
    ) -> Result<(Vec<String>, bool)>;
}

/// A manifest of format `D` whose version lives at one of `key_paths`.
///
/// Candidate key paths are tried in order; the first one present is the
/// version key for that document.
#[derive(Debug, Clone)]
pub struct StructuredManifest<D> {
    path: PathBuf,
    key_paths: &'static [KeyPath],
    _format: PhantomData<D>,
}

impl<D: Document> StructuredManifest<D> {
    pub fn new(path: impl Into<PathBuf>, key_paths: &'static [KeyPath]) -> Self {
        Self {
            path: path.into(),
            key_paths,
            _format: PhantomData,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and parses the manifest.
    pub fn load(&self) -> Result<D> {
        let content = fs::read_to_string(&self.path)?;
        self.parse(&content)
    }

    /// Like [`load`](Self::load), but any failure is `None`.
    ///
    /// Used by detection, which must never fail on untrusted content.
    pub fn try_load(&self) -> Option<D> {
        if !self.exists() {
            return None;
        }
        match self.load() {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::debug!("Ignoring {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// First candidate key path present in `doc`, with its value.
    pub fn locate<'d>(&self, doc: &'d D) -> Option<(KeyPath, &'d str)> {
        self.key_paths
            .iter()
            .find_map(|key_path| doc.string_at(key_path).map(|v| (*key_path, v)))
    }

    fn parse(&self, content: &str) -> Result<D> {
        D::parse(content).map_err(|message| AvakasError::MalformedDocument {
            path: self.path.clone(),
            message,
        })
    }

    fn missing_version(&self) -> AvakasError {
        AvakasError::MissingVersion {
            path: self.path.clone(),
            key: self
                .key_paths
                .iter()
                .map(|k| k.join("."))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }

    fn sanity_failure(&self, message: impl Into<String>) -> AvakasError {
        AvakasError::SanityCheckFailed {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    fn verify(&self, orig: &D, key_path: KeyPath, version: &str) -> Result<()> {
        let mut expected = orig.clone();
        expected.replace_string(key_path, version);

        let written = fs::read_to_string(&self.path)?;
        let actual = D::parse(&written).map_err(|message| {
            self.sanity_failure(format!("rewritten {} no longer parses: {}", D::FORMAT, message))
        })?;

        if actual != expected {
            log::warn!(
                "{} changed beyond {}; the file was left as written",
                self.path.display(),
                key_path.join(".")
            );
            return Err(self.sanity_failure(format!(
                "content other than {} changed",
                key_path.join(".")
            )));
        }

        log::debug!("Verified {}", self.path.display());
        Ok(())
    }
}

impl<D: Document> VersionedManifest for StructuredManifest<D> {
    fn manifest_path(&self) -> &Path {
        &self.path
    }

    fn get_version(&self) -> Result<String> {
        let doc = self.load()?;
        self.locate(&doc)
            .map(|(_, version)| version.to_string())
            .ok_or_else(|| self.missing_version())
    }

    fn set_version(&self, version: &str, verify: bool) -> Result<bool> {
        let content = fs::read_to_string(&self.path)?;
        let orig = self.parse(&content)?;
        let (key_path, current) = self.locate(&orig).ok_or_else(|| self.missing_version())?;

        let source = SourceLines::parse(&content);
        let (lines, changed) = D::rewrite_version(source.lines(), key_path, version)?;

        if !changed {
            if current != version {
                // Parsed view has a version the line view could not reach
                return Err(self.sanity_failure(format!(
                    "no line holding {} = \"{}\" could be rewritten",
                    key_path.join("."),
                    current
                )));
            }
            log::debug!("{} is already at {}", self.path.display(), version);
            return Ok(false);
        }

        fs::write(&self.path, source.render(&lines))?;
        log::info!(
            "Updated {} in {}: {} → {}",
            key_path.join("."),
            self.path.display(),
            current,
            version
        );

        if verify {
            self.verify(&orig, key_path, version)?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOML_KEYS: &[KeyPath] = &[&["project", "version"], &["version"]];
    const JSON_KEYS: &[KeyPath] = &[&["version"]];

    fn toml_manifest(content: &str) -> (TempDir, StructuredManifest<TomlDocument>) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pyproject.toml");
        fs::write(&path, content).unwrap();
        (temp, StructuredManifest::new(path, TOML_KEYS))
    }

    #[test]
    fn test_set_version_rewrites_only_version() {
        let input = r#"# Project metadata
name = "demo"
version = "1.2.3"

[tool.black]
line-length = 88  # keep in sync with CI
"#;
        let (_temp, manifest) = toml_manifest(input);

        assert!(manifest.set_version("1.2.4", true).unwrap());

        let result = fs::read_to_string(manifest.manifest_path()).unwrap();
        assert_eq!(result, input.replace("1.2.3", "1.2.4"));
        assert_eq!(manifest.get_version().unwrap(), "1.2.4");
    }

    #[test]
    fn test_set_version_is_idempotent() {
        let (_temp, manifest) = toml_manifest("version = \"0.1.0\"\nname = \"demo\"\n");

        assert!(manifest.set_version("0.2.0", true).unwrap());
        let first = fs::read_to_string(manifest.manifest_path()).unwrap();

        assert!(!manifest.set_version("0.2.0", true).unwrap());
        let second = fs::read_to_string(manifest.manifest_path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_project_version_leaves_root_version() {
        let input = "version = \"0.0.0\"\n\n[project]\nname = \"demo\"\nversion = \"3.1.0\"\n";
        let (_temp, manifest) = toml_manifest(input);

        assert_eq!(manifest.get_version().unwrap(), "3.1.0");
        assert!(manifest.set_version("3.2.0", true).unwrap());

        let result = fs::read_to_string(manifest.manifest_path()).unwrap();
        assert!(result.starts_with("version = \"0.0.0\"\n"));
        assert!(result.ends_with("version = \"3.2.0\"\n"));
    }

    #[test]
    fn test_missing_version() {
        let (_temp, manifest) = toml_manifest("name = \"demo\"\n");

        assert!(matches!(
            manifest.get_version(),
            Err(AvakasError::MissingVersion { .. })
        ));
        assert!(matches!(
            manifest.set_version("1.0.0", true),
            Err(AvakasError::MissingVersion { .. })
        ));
    }

    #[test]
    fn test_malformed_document() {
        let (_temp, manifest) = toml_manifest("version = \"1.0.0\"\n[[broken\n");

        assert!(matches!(
            manifest.get_version(),
            Err(AvakasError::MalformedDocument { .. })
        ));
        assert!(manifest.try_load().is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let manifest: StructuredManifest<TomlDocument> =
            StructuredManifest::new(temp.path().join("pyproject.toml"), TOML_KEYS);

        assert!(!manifest.exists());
        assert!(manifest.try_load().is_none());
        assert!(matches!(manifest.get_version(), Err(AvakasError::Io(_))));
    }

    #[test]
    fn test_unreachable_version_line_fails_before_write() {
        // Parsed version exists, but the line carries a comment the
        // anchored pattern refuses to touch.
        let input = "version = \"1.0.0\" # release\n";
        let (_temp, manifest) = toml_manifest(input);

        assert!(matches!(
            manifest.set_version("1.1.0", true),
            Err(AvakasError::SanityCheckFailed { .. })
        ));
        assert_eq!(fs::read_to_string(manifest.manifest_path()).unwrap(), input);
    }

    #[test]
    fn test_commented_version_line_is_not_truncated() {
        let input = "[project]\nname = \"demo\"\nversion = \"1.0.0\" # was \"0.9.0\"\n";
        let (_temp, manifest) = toml_manifest(input);

        assert!(matches!(
            manifest.set_version("1.1.0", true),
            Err(AvakasError::SanityCheckFailed { .. })
        ));
        assert_eq!(fs::read_to_string(manifest.manifest_path()).unwrap(), input);
    }

    #[test]
    fn test_json_member_sharing_a_line_fails_before_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        let input = "{\n  \"version\": \"1.0.0\", \"name\": \"demo\"\n}\n";
        fs::write(&path, input).unwrap();
        let manifest: StructuredManifest<JsonDocument> = StructuredManifest::new(path, JSON_KEYS);

        assert!(matches!(
            manifest.set_version("1.1.0", true),
            Err(AvakasError::SanityCheckFailed { .. })
        ));
        assert_eq!(fs::read_to_string(manifest.manifest_path()).unwrap(), input);
    }

    #[test]
    fn test_version_after_nested_array() {
        let input = "[project]\nmatrix = [\n    [\"a\"]\n]\nversion = \"1.0.0\"\n";
        let (_temp, manifest) = toml_manifest(input);

        assert!(manifest.set_version("1.1.0", true).unwrap());
        assert_eq!(
            fs::read_to_string(manifest.manifest_path()).unwrap(),
            input.replace("1.0.0", "1.1.0")
        );
    }

    #[test]
    fn test_multiline_string_is_not_rewritten() {
        let input = "version = \"1.0.0\"\nnotes = \"\"\"\nversion = \"1.0.0\"\n\"\"\"\n";
        let (_temp, manifest) = toml_manifest(input);

        assert!(manifest.set_version("2.0.0", true).unwrap());
        assert_eq!(
            fs::read_to_string(manifest.manifest_path()).unwrap(),
            input.replacen("1.0.0", "2.0.0", 1)
        );
    }

    #[test]
    fn test_sanity_check_catches_collateral_change() {
        let (_temp, manifest) = toml_manifest("version = \"1.0.0\"\nname = \"demo\"\n");
        let orig = manifest.load().unwrap();

        fs::write(
            manifest.manifest_path(),
            "version = \"2.0.0\"\nname = \"other\"\n",
        )
        .unwrap();
        assert!(matches!(
            manifest.verify(&orig, &["version"], "2.0.0"),
            Err(AvakasError::SanityCheckFailed { .. })
        ));

        fs::write(manifest.manifest_path(), "version = \"2.0.0\"\nname = \"demo\"\n").unwrap();
        assert!(manifest.verify(&orig, &["version"], "2.0.0").is_ok());
    }

    #[test]
    fn test_unverified_write_skips_sanity_check() {
        let (_temp, manifest) = toml_manifest("version = \"1.0.0\"\n");

        assert!(manifest.set_version("1.0\"oops", false).unwrap());
        assert!(manifest.load().is_err());
    }

    #[test]
    fn test_replacement_that_breaks_document() {
        let (_temp, manifest) = toml_manifest("version = \"1.0.0\"\n");

        assert!(matches!(
            manifest.set_version("1.0\"oops", true),
            Err(AvakasError::SanityCheckFailed { .. })
        ));
    }
}
