//! Command-line interface for pycheck.

use clap::Parser;
use globset::GlobSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::checkers;
use crate::config::{self, Config};
use crate::issue::Severity;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1;

/// Run Python lint tools against a file or directory and normalize their
/// reports into one formatted stream.
///
/// All analysis is delegated to the external tools (pycodestyle, pyflakes,
/// flake8); pycheck merges configuration from the user file, the nearest
/// project file, and the command line, reclassifies issue severities, and
/// formats every tool's output through one template.
#[derive(Parser, Debug)]
#[command(name = "pycheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File or directory to check
    pub path: PathBuf,

    /// Comma-separated checkers to run, in order (pycodestyle, pyflakes, flake8)
    #[arg(long, value_name = "NAMES")]
    pub checkers: Option<String>,

    /// Comma-separated issue codes or code prefixes to drop (e.g. E501,W6)
    #[arg(long, value_name = "CODES")]
    pub ignore: Option<String>,

    /// Per-issue line template ({filename}, {line}, {offset}, {level}, {code}, {message})
    #[arg(long, value_name = "TEMPLATE")]
    pub format: Option<String>,

    /// Codes or prefixes to reclassify as errors
    #[arg(long, value_name = "CODES")]
    pub errors: Option<String>,

    /// Codes or prefixes to reclassify as warnings
    #[arg(long, value_name = "CODES")]
    pub warnings: Option<String>,

    /// Codes or prefixes to reclassify as info
    #[arg(long, value_name = "CODES")]
    pub info: Option<String>,

    /// Comma-separated glob patterns for paths to exclude
    #[arg(long, value_name = "GLOBS")]
    pub skip: Option<String>,

    /// Emit one JSON report document instead of formatted lines
    #[arg(long)]
    pub json: bool,

    /// Print progress notes on standard error
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the check command.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let metadata = std::fs::metadata(&cli.path)
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", cli.path, e))?;

    let config = build_config(cli, metadata.is_dir())?;
    let skip = config.skip_matcher()?;

    let targets = if metadata.is_dir() {
        collect_targets(&cli.path, &skip)?
    } else {
        vec![cli.path.clone()]
    };

    if targets.is_empty() {
        if cli.verbose {
            eprintln!("pycheck: no Python files under {}", cli.path.display());
        }
        return Ok(EXIT_SUCCESS);
    }

    let mut issues = Vec::new();
    for kind in &config.checkers {
        if cli.verbose {
            eprintln!("pycheck: running {} on {} file(s)", kind, targets.len());
        }
        match checkers::run(*kind, &targets, &config.ignore) {
            Ok(found) => issues.extend(found),
            Err(err) => issues.push(checkers::failure_event(*kind, &cli.path, &err)),
        }
    }

    issues.retain(|issue| !config.is_ignored(&issue.code));

    if cli.json {
        let report = report::build_json(
            &cli.path.to_string_lossy(),
            &config.checkers,
            &issues,
            &config.severities,
        );
        report::write_json(&report)?;
    } else {
        report::write_text(&issues, &config.severities, &config.format);
    }

    Ok(EXIT_SUCCESS)
}

/// Assemble the merged configuration: defaults, then the user file, then
/// the nearest project file, then command-line overrides.
fn build_config(cli: &Cli, is_dir: bool) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(path) = config::user_config_file() {
        apply_config_file(&mut config, &path, cli.verbose)?;
    }

    // Project discovery starts at the target directory (the parent for a
    // file target) and uses the absolute path so the walk reaches the root.
    let abs = cli.path.canonicalize().unwrap_or_else(|_| cli.path.clone());
    let start = if is_dir {
        abs
    } else {
        abs.parent().map(Path::to_path_buf).unwrap_or(abs)
    };
    if let Some(path) = config::find_project_config(&start) {
        apply_config_file(&mut config, &path, cli.verbose)?;
    }

    apply_cli_overrides(&mut config, cli)?;
    Ok(config)
}

/// Apply one config file. Unreadable files are skipped; bad values (an
/// unknown checker name) are usage errors.
fn apply_config_file(config: &mut Config, path: &Path, verbose: bool) -> anyhow::Result<()> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            if verbose {
                eprintln!("pycheck: reading {}", path.display());
            }
            config
                .apply_section(&content)
                .map_err(|e| anyhow::anyhow!("in config file {}: {}", path.display(), e))
        }
        Err(e) => {
            if verbose {
                eprintln!("pycheck: skipping {}: {}", path.display(), e);
            }
            Ok(())
        }
    }
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(value) = &cli.checkers {
        config.checkers = config::parse_checker_list(value)?;
    }
    if let Some(value) = &cli.ignore {
        config.ignore = config::split_list(value);
    }
    if let Some(value) = &cli.format {
        config.format = value.clone();
    }
    if let Some(value) = &cli.skip {
        config.skip = config::split_list(value);
    }
    if let Some(value) = &cli.errors {
        config.severities.insert_list(value, Severity::Error);
    }
    if let Some(value) = &cli.warnings {
        config.severities.insert_list(value, Severity::Warning);
    }
    if let Some(value) = &cli.info {
        config.severities.insert_list(value, Severity::Info);
    }
    Ok(())
}

/// Collect Python files under a directory, in deterministic order.
/// Hidden directories and skip-glob matches are excluded.
fn collect_targets(root: &Path, skip: &GlobSet) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        if skip.is_match(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}
