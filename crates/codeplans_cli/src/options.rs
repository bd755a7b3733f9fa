//! Command-line options for the `codeplans` binary.

use codeplans_core::{default_log_level, EXAMPLE_PLAN_URL};
use getopts::Options;
use std::path::PathBuf;

const DEFAULT_LOG_DIR_NAME: &str = "codeplans-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Plans directory; `None` means `<cwd>/CodePlans`.
    pub workdir: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    pub example_url: String,
    pub welcome: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Args),
    /// Help was requested; carries the rendered usage text.
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "d",
        "workdir",
        "Directory holding plan files [Default: ./CodePlans]",
        "DIR",
    );
    opts.optopt(
        "l",
        "log-level",
        "Log level: trace|debug|info|warn|error [Default: debug in debug builds, info otherwise]",
        "LEVEL",
    );
    opts.optopt(
        "",
        "log-dir",
        "Absolute directory for log files [Default: <tmp>/codeplans-logs]",
        "DIR",
    );
    opts.optopt(
        "u",
        "example-url",
        "URL of the downloadable example plan",
        "URL",
    );
    opts.optflag("", "no-welcome", "Skip the welcome banner");
    opts
}

/// Parses arguments without the program name.
///
/// # Errors
/// Returns a printable message for unknown options or missing values.
pub fn parse(args: Vec<String>) -> Result<Parsed, String> {
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Parsed::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let log_dir = matches
        .opt_str("log-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
    if !log_dir.is_absolute() {
        return Err(format!(
            "Provided value for option 'log-dir' must be an absolute path: {}",
            log_dir.display()
        ));
    }

    Ok(Parsed::Run(Args {
        workdir: matches.opt_str("workdir").map(PathBuf::from),
        log_level: matches
            .opt_str("log-level")
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir,
        example_url: matches
            .opt_str("example-url")
            .unwrap_or_else(|| EXAMPLE_PLAN_URL.to_string()),
        welcome: !matches.opt_present("no-welcome"),
    }))
}
