//! Shared fixtures for avakas integration tests.
//!
//! Each fixture is a temporary directory holding one manifest, driven either
//! through the library or through the `avakas` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(unused)]
pub const PEP621: &str = r#"# Demo project
[project]
name = "demo"
version = "1.2.3"
description = "A demo"  # shown on PyPI
dependencies = [
    "requests>=2",
]

[tool.black]
line-length = 88
"#;

#[allow(unused)]
pub const POETRY: &str = r#"[tool.poetry]
name = "demo"
version = "0.4.2"

[tool.poetry.dependencies]
python = "^3.10"

[build-system]
requires = ["poetry-core"]
build-backend = "poetry.core.masonry.api"
"#;

#[allow(unused)]
pub const SETUPTOOLS: &str = r#"[build-system]
requires = ["setuptools>=61"]
build-backend = "setuptools.build_meta"

[project]
name = "demo"
version = "2.0.0"
"#;

#[allow(unused)]
pub const PACKAGE_JSON: &str = r#"{
  "name": "demo",
  "version": "3.1.4",
  "engines": {
    "node": ">=18"
  }
}
"#;

/// Creates a temporary project directory containing `file` with `content`.
#[allow(unused)]
pub fn create_project(file: &str, content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(file), content).unwrap();
    temp
}

#[allow(unused)]
pub fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap()
}

/// Runs `avakas` with `args` inside `dir`.
#[allow(unused)]
pub fn run_avakas(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("avakas");
    cmd.args(args)
        .current_dir(dir)
        .env_remove("AVAKAS_FLAVOR")
        .env_remove("RUST_LOG");

    cmd.assert()
}
