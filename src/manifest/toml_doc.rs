//! TOML manifests (`pyproject.toml`).

use super::Document;
use crate::error::Result;
use crate::patch::{TableScope, rewrite_where};
use regex::Regex;

/// Parsed view of a TOML file.
#[derive(Debug, Clone, PartialEq)]
pub struct TomlDocument(toml::Table);

impl TomlDocument {
    /// Value at `key_path`, descending through nested tables.
    pub fn get(&self, key_path: &[&str]) -> Option<&toml::Value> {
        let (first, rest) = key_path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.get(*key))
    }
}

impl Document for TomlDocument {
    const FORMAT: &'static str = "TOML";

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str::<toml::Table>(content)
            .map(Self)
            .map_err(|e| e.to_string().trim_end().to_string())
    }

    fn string_at(&self, key_path: &[&str]) -> Option<&str> {
        self.get(key_path)?.as_str()
    }

    fn replace_string(&mut self, key_path: &[&str], value: &str) -> bool {
        let Some((last, parents)) = key_path.split_last() else {
            return false;
        };

        let mut table = &mut self.0;
        for key in parents {
            table = match table.get_mut(*key).and_then(toml::Value::as_table_mut) {
                Some(inner) => inner,
                None => return false,
            };
        }

        match table.get_mut(*last) {
            Some(slot) => {
                *slot = toml::Value::String(value.to_string());
                true
            }
            None => false,
        }
    }

    /// Matches `key = "..."` lines inside the table that owns the key.
    ///
    /// `["project", "version"]` only rewrites `version` under `[project]`;
    /// `["version"]` only rewrites it before the first table header.
    fn rewrite_version(
        lines: &[String],
        key_path: &[&str],
        version: &str,
    ) -> Result<(Vec<String>, bool)> {
        let Some((key, table)) = key_path.split_last() else {
            return Ok((lines.to_vec(), false));
        };

        let pattern = Regex::new(&format!(
            r#"^\s*{}\s*=\s*"([^"]*)"\s*$"#,
            regex::escape(key)
        ))?;
        let mut scope = TableScope::new(table);
        rewrite_where(lines, &pattern, version, |line| scope.observe(line))
    }
}
