//! Adapters for the external lint tools.
//!
//! Each submodule wraps one tool, invoking it as a child process and
//! parsing its native report lines into normalized issue events:
//! - `style`: pycodestyle (PEP 8 style checker)
//! - `flakes`: pyflakes (AST-based linter)
//! - `meta`: flake8 (meta-linter wrapping the other two)

mod flakes;
mod meta;
mod style;

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

use crate::issue::Issue;

/// Errors that can occur while driving a checker tool.
#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} produced output that is not valid UTF-8")]
    Decode { tool: &'static str },
}

/// The configurable checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckerKind {
    Pycodestyle,
    Pyflakes,
    Flake8,
}

impl CheckerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckerKind::Pycodestyle => "pycodestyle",
            CheckerKind::Pyflakes => "pyflakes",
            CheckerKind::Flake8 => "flake8",
        }
    }

    /// Name of the executable to invoke. Matches the checker name.
    pub fn tool(&self) -> &'static str {
        self.as_str()
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pycodestyle" => Some(CheckerKind::Pycodestyle),
            "pyflakes" => Some(CheckerKind::Pyflakes),
            "flake8" => Some(CheckerKind::Flake8),
            _ => None,
        }
    }

    /// All known checkers, in canonical order.
    pub fn all() -> &'static [CheckerKind] {
        &[
            CheckerKind::Pycodestyle,
            CheckerKind::Pyflakes,
            CheckerKind::Flake8,
        ]
    }
}

impl std::fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Run one checker against the collected targets.
pub fn run(
    kind: CheckerKind,
    targets: &[PathBuf],
    ignore: &[String],
) -> Result<Vec<Issue>, CheckerError> {
    match kind {
        CheckerKind::Pycodestyle => style::check(targets, ignore),
        CheckerKind::Pyflakes => flakes::check(targets),
        CheckerKind::Flake8 => meta::check(targets),
    }
}

/// Convert a checker failure into a normalized error event, so a broken or
/// missing tool surfaces in the report instead of aborting the run.
pub fn failure_event(kind: CheckerKind, target: &Path, err: &CheckerError) -> Issue {
    Issue {
        source: kind.as_str(),
        filename: target.display().to_string(),
        line: 1,
        offset: 1,
        code: "E902".to_string(),
        message: err.to_string(),
    }
}

/// Captured output streams of a finished tool.
#[derive(Debug)]
pub(crate) struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn a checker tool with the given arguments plus the targets and wait
/// for it to finish.
pub(crate) fn capture(
    kind: CheckerKind,
    args: &[String],
    targets: &[PathBuf],
) -> Result<ToolOutput, CheckerError> {
    capture_tool(kind.tool(), args, targets)
}

fn capture_tool(
    tool: &'static str,
    args: &[String],
    targets: &[PathBuf],
) -> Result<ToolOutput, CheckerError> {
    let output = Command::new(tool)
        .args(args)
        .args(targets)
        .output()
        .map_err(|source| CheckerError::Spawn { tool, source })?;

    let stdout = String::from_utf8(output.stdout).map_err(|_| CheckerError::Decode { tool })?;
    let stderr = String::from_utf8(output.stderr).map_err(|_| CheckerError::Decode { tool })?;

    Ok(ToolOutput {
        status: output.status,
        stdout,
        stderr,
    })
}

/// Exit statuses 0 (clean) and 1 (issues found) are normal for lint tools.
/// Anything else, with no report parsed, becomes a single error event.
pub(crate) fn abnormal_exit_event(
    kind: CheckerKind,
    out: &ToolOutput,
    parsed: usize,
    targets: &[PathBuf],
) -> Option<Issue> {
    if parsed > 0 || matches!(out.status.code(), Some(0) | Some(1)) {
        return None;
    }
    let detail = out.stderr.lines().next().unwrap_or("").trim();
    let message = if detail.is_empty() {
        format!("{} exited abnormally ({})", kind, out.status)
    } else {
        detail.to_string()
    };
    Some(Issue {
        source: kind.as_str(),
        filename: targets
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        line: 1,
        offset: 1,
        code: "E902".to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in CheckerKind::all() {
            assert_eq!(CheckerKind::parse(kind.as_str()), Some(*kind));
        }
        assert_eq!(CheckerKind::parse("pylint"), None);
        assert_eq!(CheckerKind::parse(""), None);
    }

    #[test]
    fn test_spawn_failure() {
        let err = capture_tool("pycheck-no-such-tool", &[], &[]).unwrap_err();
        assert!(matches!(err, CheckerError::Spawn { .. }));
        assert!(err.to_string().contains("pycheck-no-such-tool"));
    }

    #[test]
    fn test_failure_event_shape() {
        let err = CheckerError::Spawn {
            tool: "pyflakes",
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let event = failure_event(CheckerKind::Pyflakes, Path::new("src/app.py"), &err);
        assert_eq!(event.code, "E902");
        assert_eq!(event.source, "pyflakes");
        assert_eq!(event.filename, "src/app.py");
        assert_eq!((event.line, event.offset), (1, 1));
        assert!(event.message.contains("pyflakes"));
    }
}
