//! Line-level rewriting of manifest values.
//!
//! Manifests are never re-serialized. Instead the line holding a value is
//! located with a regex carrying exactly one capture group, and only the text
//! of that group is replaced. Everything else (comments, ordering, quoting,
//! blank lines) survives byte for byte.
//!
//! ```
//! # use avakas::patch::rewrite;
//! # use regex::Regex;
//! # fn example() -> avakas::Result<()> {
//! let pattern = Regex::new(r#"^\s*version\s*=\s*"([^"]*)"\s*$"#)?;
//! let lines = ["name = \"demo\"", "version = \"1.2.3\""];
//!
//! let (lines, changed) = rewrite(&lines, &pattern, "1.2.4")?;
//! assert!(changed);
//! assert_eq!(lines[1], "version = \"1.2.4\"");
//! # Ok(())
//! # }
//! ```

use crate::error::{AvakasError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// A file's content split into lines, remembering how to put it back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<String>,
    eol: &'static str,
    trailing_newline: bool,
}

impl SourceLines {
    pub fn parse(content: &str) -> Self {
        let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = content.ends_with(eol);
        let body = content.strip_suffix(eol).unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split(eol).map(str::to_string).collect()
        };

        Self {
            lines,
            eol,
            trailing_newline,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Joins `lines` using this file's line ending and trailing newline state.
    pub fn render(&self, lines: &[String]) -> String {
        let mut out = lines.join(self.eol);
        if self.trailing_newline && !lines.is_empty() {
            out.push_str(self.eol);
        }
        out
    }
}

/// Rewrites the capture group of every line `pattern` fully matches.
///
/// Returns the new lines and whether any line actually differs. Zero matches
/// is not an error; it simply reports `false`.
///
/// # Errors
///
/// `InvalidPattern` if `pattern` does not have exactly one capture group.
pub fn rewrite<S: AsRef<str>>(
    lines: &[S],
    pattern: &Regex,
    replacement: &str,
) -> Result<(Vec<String>, bool)> {
    rewrite_where(lines, pattern, replacement, |_| true)
}

/// Like [`rewrite`], but only lines for which `in_scope` returns `true` are
/// candidates.
///
/// `in_scope` sees every line in order, matched or not, so it may carry state
/// (see [`TableScope`]).
pub fn rewrite_where<S, F>(
    lines: &[S],
    pattern: &Regex,
    replacement: &str,
    mut in_scope: F,
) -> Result<(Vec<String>, bool)>
where
    S: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    // captures_len counts the implicit whole-match group
    if pattern.captures_len() != 2 {
        return Err(AvakasError::InvalidPattern(format!(
            "'{}' must have exactly one capture group",
            pattern.as_str()
        )));
    }

    let mut changed = false;
    let mut result = Vec::with_capacity(lines.len());

    for line in lines {
        let line = line.as_ref();
        if !in_scope(line) {
            result.push(line.to_string());
            continue;
        }

        match full_match_group(pattern, line) {
            Some((start, end)) => {
                let new_line = format!("{}{}{}", &line[..start], replacement, &line[end..]);
                if new_line != line {
                    log::debug!("Rewrote line: {} → {}", line.trim(), new_line.trim());
                    changed = true;
                }
                result.push(new_line);
            }
            None => result.push(line.to_string()),
        }
    }

    Ok((result, changed))
}

/// Byte range of the capture group, if the pattern matches the whole line.
fn full_match_group(pattern: &Regex, line: &str) -> Option<(usize, usize)> {
    let caps = pattern.captures(line)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != line.len() {
        return None;
    }
    let group = caps.get(1)?;
    Some((group.start(), group.end()))
}

static TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\[\s*([A-Za-z0-9_\-."' ]+?)\s*\]\s*(#.*)?$"#)
        .expect("table header pattern is valid")
});

static ARRAY_TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\[\[\s*([A-Za-z0-9_\-."' ]+?)\s*\]\]\s*(#.*)?$"#)
        .expect("array table header pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Section {
    Table(Vec<String>),
    ArrayOfTables,
}

/// Tracks which TOML table the lines being scanned belong to.
///
/// Lines before the first header belong to the root table (the empty path).
/// Sections opened by `[[array]]` headers never match a table path. Lines that
/// continue a multi-line array or string are never in scope, and a `[...]`
/// among them is not taken for a header.
#[derive(Debug, Clone)]
pub struct TableScope {
    target: Vec<String>,
    current: Section,
    values: ValueNesting,
}

impl TableScope {
    pub fn new<S: AsRef<str>>(target: &[S]) -> Self {
        Self {
            target: target.iter().map(|k| k.as_ref().to_string()).collect(),
            current: Section::Table(Vec::new()),
            values: ValueNesting::default(),
        }
    }

    /// Observes `line` and reports whether it lies inside the target table.
    ///
    /// Header lines themselves are never in scope.
    pub fn observe(&mut self, line: &str) -> bool {
        if self.values.is_open() {
            self.values.scan(line);
            return false;
        }
        if ARRAY_TABLE_HEADER.is_match(line) {
            self.current = Section::ArrayOfTables;
            return false;
        }
        if let Some(caps) = TABLE_HEADER.captures(line) {
            self.current = Section::Table(split_dotted_key(&caps[1]));
            return false;
        }
        self.values.scan(line);
        matches!(&self.current, Section::Table(path) if *path == self.target)
    }
}

const MULTILINE_BASIC: &str = "\"\"\"";
const MULTILINE_LITERAL: &str = "'''";

/// Open brackets and multi-line strings of TOML values, carried across lines.
#[derive(Debug, Clone, Default)]
struct ValueNesting {
    brackets: i32,
    multiline: Option<&'static str>,
}

impl ValueNesting {
    fn is_open(&self) -> bool {
        self.brackets > 0 || self.multiline.is_some()
    }

    fn scan(&mut self, line: &str) {
        let mut i = 0;
        while i < line.len() {
            let rest = &line[i..];

            if let Some(delim) = self.multiline {
                match string_end(rest, delim, delim == MULTILINE_BASIC) {
                    Some(end) => {
                        self.multiline = None;
                        i += end;
                        continue;
                    }
                    None => return,
                }
            }

            if let Some(delim) = [MULTILINE_BASIC, MULTILINE_LITERAL]
                .into_iter()
                .find(|d| rest.starts_with(*d))
            {
                self.multiline = Some(delim);
                i += delim.len();
                continue;
            }

            let Some(ch) = rest.chars().next() else {
                return;
            };
            let body = &rest[ch.len_utf8()..];
            i += ch.len_utf8();
            match ch {
                '#' => return,
                '"' => i += string_end(body, "\"", true).unwrap_or(body.len()),
                '\'' => i += string_end(body, "'", false).unwrap_or(body.len()),
                '[' | '{' => self.brackets += 1,
                ']' | '}' => self.brackets -= 1,
                _ => {}
            }
        }
    }
}

/// Byte offset just past the closing `delim` in `s`, if the string ends on this line.
fn string_end(s: &str, delim: &str, escapes: bool) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if escapes && ch == '\\' {
            escaped = true;
        } else if s[i..].starts_with(delim) {
            return Some(i + delim.len());
        }
    }
    None
}

/// Splits `a."b.c".d` into `["a", "b.c", "d"]`.
fn split_dotted_key(key: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in key.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '.') => parts.push(std::mem::take(&mut current).trim().to_string()),
            (None, c) => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}
