//! pyflakes adapter.
//!
//! pyflakes reports `path:row:col: message` lines with no issue codes (the
//! familiar `F` codes come from flake8's plugin layer, not the tool
//! itself). This adapter assigns codes from a table of the well-known
//! message shapes. Syntax errors land on standard error and are reported
//! as `E999` events.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

use super::{abnormal_exit_event, capture, CheckerError, CheckerKind};
use crate::issue::Issue;

const KIND: CheckerKind = CheckerKind::Pyflakes;

/// Code assigned when no table entry matches the message.
const FALLBACK_CODE: &str = "F000";

/// Code for syntax errors reported on standard error.
const SYNTAX_ERROR_CODE: &str = "E999";

lazy_static! {
    /// `path:row: message` (older releases) or `path:row:col: message`.
    static ref REPORT_LINE: Regex =
        Regex::new(r"^(.+?):(\d+):(?:(\d+):)?\s+(.+)$").unwrap();

    /// Message shapes for the well-known pyflakes diagnostics.
    static ref CODE_TABLE: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"imported but unused").unwrap(), "F401"),
        (Regex::new(r"import \*' used; unable to detect undefined names").unwrap(), "F403"),
        (Regex::new(r"may be undefined, or defined from star imports").unwrap(), "F405"),
        (Regex::new(r"f-string is missing placeholders").unwrap(), "F541"),
        (Regex::new(r"'return' outside function").unwrap(), "F706"),
        (Regex::new(r"redefinition of unused").unwrap(), "F811"),
        (Regex::new(r"undefined name").unwrap(), "F821"),
        (Regex::new(r"duplicate argument .+ in function definition").unwrap(), "F831"),
        (Regex::new(r"assigned to but never used").unwrap(), "F841"),
    ];
}

/// Run pyflakes against the targets.
pub fn check(targets: &[PathBuf]) -> Result<Vec<Issue>, CheckerError> {
    let out = capture(KIND, &[], targets)?;

    let mut issues: Vec<Issue> = out
        .stdout
        .lines()
        .filter_map(|line| parse_line(line, None))
        .collect();

    // Syntax and decoding problems go to stderr; the source echo and caret
    // lines that follow them do not match the location pattern and drop out.
    issues.extend(
        out.stderr
            .lines()
            .filter_map(|line| parse_line(line, Some(SYNTAX_ERROR_CODE))),
    );

    if let Some(event) = abnormal_exit_event(KIND, &out, issues.len(), targets) {
        issues.push(event);
    }
    Ok(issues)
}

/// Parse one report line. `forced_code` overrides table lookup (stderr
/// lines are all syntax-class errors).
fn parse_line(line: &str, forced_code: Option<&'static str>) -> Option<Issue> {
    let caps = REPORT_LINE.captures(line)?;
    let message = caps[4].trim().to_string();
    let code = match forced_code {
        Some(code) => code.to_string(),
        None => code_for_message(&message).to_string(),
    };
    Some(Issue {
        source: KIND.as_str(),
        filename: caps[1].to_string(),
        line: caps[2].parse().ok()?,
        offset: caps.get(3).map_or(Some(1), |m| m.as_str().parse().ok())?,
        code,
        message,
    })
}

fn code_for_message(message: &str) -> &'static str {
    for (pattern, code) in CODE_TABLE.iter() {
        if pattern.is_match(message) {
            return code;
        }
    }
    FALLBACK_CODE
}
