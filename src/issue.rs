//! Normalized issue events and severity classification.
//!
//! Every checker adapter reports through the same `Issue` shape, so the
//! rest of the crate never cares which external tool produced an event.
//! Severity is not stored on the event: it is derived from the issue code
//! through a `SeverityMap` at reporting time and used purely for output
//! annotation.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity levels for reported issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// A single normalized lint event.
#[derive(Debug, Clone)]
pub struct Issue {
    /// Name of the checker that produced the event.
    pub source: &'static str,
    pub filename: String,
    pub line: usize,
    pub offset: usize,
    pub code: String,
    pub message: String,
}

/// Built-in severity defaults, keyed by the leading letter of the code.
/// Consulted only when no configured entry matches.
static DEFAULT_SEVERITIES: phf::Map<&'static str, Severity> = phf_map! {
    "E" => Severity::Error,
    "F" => Severity::Error,
    "W" => Severity::Warning,
    "C" => Severity::Info,
    "N" => Severity::Info,
    "D" => Severity::Info,
};

/// Fallback for codes whose family has no default entry.
const UNMATCHED_DEFAULT: Severity = Severity::Warning;

/// Mapping from issue code (or code prefix) to severity.
///
/// Entries are inserted in ascending precedence order; a later insert for
/// the same key replaces the earlier one. Classification is deterministic:
/// an exact entry wins, then the longest matching prefix entry, then the
/// built-in default for the code's family.
#[derive(Debug, Clone, Default)]
pub struct SeverityMap {
    entries: BTreeMap<String, Severity>,
}

impl SeverityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single code or prefix entry.
    pub fn insert(&mut self, pattern: &str, severity: Severity) {
        let pattern = pattern.trim();
        if !pattern.is_empty() {
            self.entries.insert(pattern.to_string(), severity);
        }
    }

    /// Insert every entry from a comma-separated code list.
    pub fn insert_list(&mut self, codes: &str, severity: Severity) {
        for code in codes.split(',') {
            self.insert(code, severity);
        }
    }

    /// Classify a code.
    pub fn classify(&self, code: &str) -> Severity {
        if let Some(sev) = self.entries.get(code) {
            return *sev;
        }
        let longest = self
            .entries
            .iter()
            .filter(|(pattern, _)| code.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len());
        if let Some((_, sev)) = longest {
            return *sev;
        }
        code.get(0..1)
            .and_then(|family| DEFAULT_SEVERITIES.get(family))
            .copied()
            .unwrap_or(UNMATCHED_DEFAULT)
    }

    /// Number of configured entries (excluding built-in defaults).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_display_roundtrip() {
        for sev in [Severity::Error, Severity::Warning, Severity::Info] {
            assert_eq!(Severity::from_str(&sev.to_string()).unwrap(), sev);
        }
        assert!(Severity::from_str("fatal").is_err());
    }

    #[test]
    fn test_default_classification() {
        let map = SeverityMap::new();
        assert_eq!(map.classify("E501"), Severity::Error);
        assert_eq!(map.classify("F401"), Severity::Error);
        assert_eq!(map.classify("W605"), Severity::Warning);
        assert_eq!(map.classify("C901"), Severity::Info);
        assert_eq!(map.classify("D100"), Severity::Info);
        // Unknown family falls back to warning
        assert_eq!(map.classify("X123"), Severity::Warning);
    }

    #[test]
    fn test_exact_beats_prefix() {
        let mut map = SeverityMap::new();
        map.insert("E5", Severity::Info);
        map.insert("E501", Severity::Warning);
        assert_eq!(map.classify("E501"), Severity::Warning);
        assert_eq!(map.classify("E502"), Severity::Info);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut map = SeverityMap::new();
        map.insert("W", Severity::Info);
        map.insert("W6", Severity::Error);
        assert_eq!(map.classify("W605"), Severity::Error);
        assert_eq!(map.classify("W291"), Severity::Info);
    }

    #[test]
    fn test_later_insert_replaces() {
        let mut map = SeverityMap::new();
        map.insert("F401", Severity::Error);
        map.insert("F401", Severity::Info);
        assert_eq!(map.classify("F401"), Severity::Info);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_list_trims_and_skips_empty() {
        let mut map = SeverityMap::new();
        map.insert_list("E501, W605,,F4", Severity::Info);
        assert_eq!(map.len(), 3);
        assert_eq!(map.classify("F401"), Severity::Info);
    }
}
