//! flake8 adapter.
//!
//! The meta-linter already aggregates pycodestyle and pyflakes and emits
//! coded `path:row:col: code message` lines in its default format, so this
//! is the thinnest of the adapters: a direct line parse.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

use super::{abnormal_exit_event, capture, CheckerError, CheckerKind};
use crate::issue::Issue;

const KIND: CheckerKind = CheckerKind::Flake8;

lazy_static! {
    /// `path:row:col: code message`. Plugin codes may carry a multi-letter
    /// prefix (`C901`, `B008`).
    static ref REPORT_LINE: Regex =
        Regex::new(r"^(.+?):(\d+):(\d+):\s+([A-Z]+\d+)\s+(.*)$").unwrap();
}

/// Run flake8 against the targets.
pub fn check(targets: &[PathBuf]) -> Result<Vec<Issue>, CheckerError> {
    let args = vec!["--format=default".to_string()];
    let out = capture(KIND, &args, targets)?;
    let mut issues: Vec<Issue> = out.stdout.lines().filter_map(parse_line).collect();
    if let Some(event) = abnormal_exit_event(KIND, &out, issues.len(), targets) {
        issues.push(event);
    }
    Ok(issues)
}

fn parse_line(line: &str) -> Option<Issue> {
    let caps = REPORT_LINE.captures(line)?;
    Some(Issue {
        source: KIND.as_str(),
        filename: caps[1].to_string(),
        line: caps[2].parse().ok()?,
        offset: caps[3].parse().ok()?,
        code: caps[4].to_string(),
        message: caps[5].trim().to_string(),
    })
}
