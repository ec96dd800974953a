//! JSON manifests (`package.json`).

use super::Document;
use crate::error::Result;
use crate::patch::rewrite_where;
use regex::Regex;
use serde_json::Value;

/// Parsed view of a JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument(Value);

impl JsonDocument {
    pub fn get(&self, key_path: &[&str]) -> Option<&Value> {
        key_path.iter().try_fold(&self.0, |value, key| value.get(*key))
    }
}

impl Document for JsonDocument {
    const FORMAT: &'static str = "JSON";

    fn parse(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str::<Value>(content)
            .map(Self)
            .map_err(|e| e.to_string())
    }

    fn string_at(&self, key_path: &[&str]) -> Option<&str> {
        if key_path.is_empty() {
            return None;
        }
        self.get(key_path)?.as_str()
    }

    fn replace_string(&mut self, key_path: &[&str], value: &str) -> bool {
        if key_path.is_empty() {
            return false;
        }
        let slot = key_path
            .iter()
            .try_fold(&mut self.0, |current, key| current.get_mut(*key));

        match slot {
            Some(slot) => {
                *slot = Value::String(value.to_string());
                true
            }
            None => false,
        }
    }

    /// Matches `"key": "...",` lines at the nesting depth of `key_path`.
    ///
    /// A top-level `"version"` is rewritten; one inside a nested object
    /// (`"engines"`, `"publishConfig"`, ...) is not.
    fn rewrite_version(
        lines: &[String],
        key_path: &[&str],
        version: &str,
    ) -> Result<(Vec<String>, bool)> {
        let Some(key) = key_path.last() else {
            return Ok((lines.to_vec(), false));
        };

        let pattern = Regex::new(&format!(
            r#"^\s*"{}"\s*:\s*"([^"]*)"\s*,?\s*$"#,
            regex::escape(key)
        ))?;
        let mut depth = NestingDepth::default();
        let target = key_path.len() as i32;

        rewrite_where(lines, &pattern, version, |line| {
            let in_scope = depth.level == target;
            depth.observe(line);
            in_scope
        })
    }
}

/// Bracket depth outside of string literals, carried across lines.
#[derive(Debug, Default)]
struct NestingDepth {
    level: i32,
}

impl NestingDepth {
    fn observe(&mut self, line: &str) {
        let mut in_string = false;
        let mut escaped = false;

        for ch in line.chars() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' | '[' => self.level += 1,
                '}' | ']' => self.level -= 1,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(content: &str) -> Vec<String> {
        content.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_lookup_and_replace() {
        let mut d = JsonDocument::parse(r#"{"name": "x", "version": "1.0.0"}"#).unwrap();

        assert_eq!(d.string_at(&["version"]), Some("1.0.0"));
        assert!(d.replace_string(&["version"], "1.1.0"));
        assert_eq!(d.string_at(&["version"]), Some("1.1.0"));
        assert!(!d.replace_string(&["missing"], "x"));
        assert_eq!(d.string_at(&[]), None);
    }

    #[test]
    fn test_rewrite_only_top_level_key() {
        let input = lines(
            r#"{
  "name": "demo",
  "version": "1.0.0",
  "dependencies": {
    "left-pad": "1.0.0"
  },
  "publishConfig": {
    "version": "1.0.0"
  }
}"#,
        );

        let (out, changed) = JsonDocument::rewrite_version(&input, &["version"], "2.0.0").unwrap();

        assert!(changed);
        assert_eq!(out[2], "  \"version\": \"2.0.0\",");
        assert_eq!(out[7], "    \"version\": \"1.0.0\"");
    }

    #[test]
    fn test_depth_ignores_brackets_in_strings() {
        let input = lines(
            r#"{
  "description": "uses { and [ and \" freely",
  "version": "0.1.0"
}"#,
        );

        let (out, changed) = JsonDocument::rewrite_version(&input, &["version"], "0.2.0").unwrap();

        assert!(changed);
        assert_eq!(out[2], "  \"version\": \"0.2.0\"");
    }

    #[test]
    fn test_member_sharing_a_line_is_left_alone() {
        let input = lines(
            r#"{
  "version": "1.0.0", "name": "demo"
}"#,
        );

        let (out, changed) = JsonDocument::rewrite_version(&input, &["version"], "1.1.0").unwrap();

        assert!(!changed);
        assert_eq!(out, input);
    }
}
