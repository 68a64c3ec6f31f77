//! Output formatting for normalized issues.
//!
//! Two modes:
//! - Text: one line per issue, rendered from a `{field}` template, with
//!   the severity colorized on terminals
//! - JSON: one structured report document for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::checkers::CheckerKind;
use crate::issue::{Issue, Severity, SeverityMap};

/// Render one issue through the line template, without color.
///
/// Placeholders: `{filename}`, `{line}`, `{offset}`, `{level}`, `{code}`,
/// `{message}`. Unknown placeholders are left verbatim so a template typo
/// stays visible in the output.
pub fn render_line(issue: &Issue, level: Severity, template: &str) -> String {
    substitute(template, issue, &level.to_string())
}

fn substitute(template: &str, issue: &Issue, level_text: &str) -> String {
    template
        .replace("{filename}", &issue.filename)
        .replace("{line}", &issue.line.to_string())
        .replace("{offset}", &issue.offset.to_string())
        .replace("{level}", level_text)
        .replace("{code}", &issue.code)
        .replace("{message}", &issue.message)
}

fn colored_level(level: Severity) -> String {
    match level {
        Severity::Error => "error".red().to_string(),
        Severity::Warning => "warning".yellow().to_string(),
        Severity::Info => "info".cyan().to_string(),
    }
}

/// Write the formatted line stream to standard output.
pub fn write_text(issues: &[Issue], severities: &SeverityMap, template: &str) {
    for issue in issues {
        let level = severities.classify(&issue.code);
        println!("{}", substitute(template, issue, &colored_level(level)));
    }
}

/// JSON report document.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub checkers: Vec<String>,
    pub issues: Vec<JsonIssue>,
    pub counts: Counts,
}

/// One issue in the JSON report, with the derived severity attached.
#[derive(Serialize, Deserialize)]
pub struct JsonIssue {
    pub source: String,
    pub filename: String,
    pub line: usize,
    pub offset: usize,
    pub code: String,
    pub level: Severity,
    pub message: String,
}

/// Issue counts by severity.
#[derive(Serialize, Deserialize, Default)]
pub struct Counts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

/// Assemble the JSON report document.
pub fn build_json(
    path: &str,
    checkers: &[CheckerKind],
    issues: &[Issue],
    severities: &SeverityMap,
) -> JsonReport {
    let mut counts = Counts::default();
    let json_issues: Vec<JsonIssue> = issues
        .iter()
        .map(|issue| {
            let level = severities.classify(&issue.code);
            match level {
                Severity::Error => counts.error += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
            JsonIssue {
                source: issue.source.to_string(),
                filename: issue.filename.clone(),
                line: issue.line,
                offset: issue.offset,
                code: issue.code.clone(),
                level,
                message: issue.message.clone(),
            }
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        checkers: checkers.iter().map(|k| k.as_str().to_string()).collect(),
        issues: json_issues,
        counts,
    }
}

/// Write the JSON report to standard output.
pub fn write_json(report: &JsonReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
