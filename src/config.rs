//! Configuration: built-in defaults, `[pycheck]` file sections, and the
//! precedence merge.
//!
//! Sources apply in ascending precedence: built-in defaults, the
//! user-level file, the nearest project-level file, command-line
//! overrides. Merging is per-key replacement; a key set by a later source
//! replaces the earlier value entirely.

use anyhow::{bail, Context};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checkers::CheckerKind;
use crate::issue::{Severity, SeverityMap};

/// Default per-issue line template.
pub const DEFAULT_FORMAT: &str = "{filename}:{line}:{offset}:{level} {code} {message}";

/// Project config file names, tried in order within each directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["pycheck.cfg", ".pycheckrc", "setup.cfg", "tox.ini"];

/// User config file name inside the platform config directory.
const USER_CONFIG_NAME: &str = "pycheck.cfg";

/// Merged run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub checkers: Vec<CheckerKind>,
    pub ignore: Vec<String>,
    pub format: String,
    pub skip: Vec<String>,
    pub severities: SeverityMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checkers: vec![CheckerKind::Pycodestyle, CheckerKind::Pyflakes],
            ignore: Vec::new(),
            format: DEFAULT_FORMAT.to_string(),
            skip: Vec::new(),
            severities: SeverityMap::new(),
        }
    }
}

impl Config {
    /// Apply the `[pycheck]` section of a config file on top of the current
    /// values.
    pub fn apply_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        self.apply_section(&content)
            .with_context(|| format!("in config file {}", path.display()))
    }

    /// Apply the `[pycheck]` section of already-loaded file content.
    pub fn apply_section(&mut self, content: &str) -> anyhow::Result<()> {
        for (key, value) in parse_pycheck_section(content) {
            self.apply_key(&key, &value)?;
        }
        Ok(())
    }

    /// Apply one key. Unknown keys are ignored.
    pub fn apply_key(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "checkers" => self.checkers = parse_checker_list(value)?,
            "ignore" => self.ignore = split_list(value),
            "format" => self.format = value.to_string(),
            "skip" => self.skip = split_list(value),
            "errors" => self.severities.insert_list(value, Severity::Error),
            "warnings" => self.severities.insert_list(value, Severity::Warning),
            "info" => self.severities.insert_list(value, Severity::Info),
            _ => {}
        }
        Ok(())
    }

    /// Whether a code is dropped by the ignore list (exact or prefix match).
    pub fn is_ignored(&self, code: &str) -> bool {
        self.ignore
            .iter()
            .any(|pattern| !pattern.is_empty() && code.starts_with(pattern.as_str()))
    }

    /// Compile the skip globs for path exclusion.
    pub fn skip_matcher(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.skip {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid skip pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

/// Parse a comma-separated checker list. Unknown names are an error.
pub fn parse_checker_list(value: &str) -> anyhow::Result<Vec<CheckerKind>> {
    let mut kinds = Vec::new();
    for name in value.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let kind = CheckerKind::parse(name).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown checker {:?} (expected one of: {})",
                name,
                CheckerKind::all()
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        bail!("no checkers selected");
    }
    Ok(kinds)
}

/// Split a comma-separated value, trimming entries and dropping empties.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract key/value pairs from the `[pycheck]` section. Lines outside the
/// section, comments, and malformed lines are skipped.
fn parse_pycheck_section(content: &str) -> Vec<(String, String)> {
    let mut in_section = false;
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            in_section = line == "[pycheck]";
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, value)) = split_key_value(line) {
            pairs.push((key, value));
        }
    }

    pairs
}

/// Split on the first `=` or `:`, whichever comes first.
fn split_key_value(line: &str) -> Option<(String, String)> {
    let idx = match (line.find('='), line.find(':')) {
        (Some(eq), Some(colon)) => eq.min(colon),
        (Some(eq), None) => eq,
        (None, Some(colon)) => colon,
        (None, None) => return None,
    };
    let (key, rest) = line.split_at(idx);
    Some((key.trim().to_string(), rest[1..].trim().to_string()))
}

/// Locate the user-level config file, if one exists.
pub fn user_config_file() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "pycheck")?;
    let path = dirs.config_dir().join(USER_CONFIG_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Walk from `start` up to the filesystem root and return the first
/// project config file found. The nearest directory wins; within a
/// directory, candidates are tried in the fixed name order.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        for name in PROJECT_CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        dir = current.parent();
    }
    None
}
