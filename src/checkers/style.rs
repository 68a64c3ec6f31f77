//! pycodestyle adapter.
//!
//! Invokes the style checker with its machine format pinned and parses
//! `path:row:col: code message` report lines. The configured ignore list is
//! forwarded to the tool; the normalized stream is filtered against the
//! same list downstream.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

use super::{abnormal_exit_event, capture, CheckerError, CheckerKind};
use crate::issue::Issue;

const KIND: CheckerKind = CheckerKind::Pycodestyle;

lazy_static! {
    /// `path:row:col: code message`
    static ref REPORT_LINE: Regex =
        Regex::new(r"^(.+?):(\d+):(\d+):\s+([EW]\d+)\s+(.*)$").unwrap();
}

/// Run pycodestyle against the targets.
pub fn check(targets: &[PathBuf], ignore: &[String]) -> Result<Vec<Issue>, CheckerError> {
    let mut args = vec!["--format=default".to_string()];
    if !ignore.is_empty() {
        args.push(format!("--ignore={}", ignore.join(",")));
    }

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
