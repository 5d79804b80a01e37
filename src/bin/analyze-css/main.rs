//! `analyze-css` computes quality metrics for a CSS stylesheet and prints
//! them as JSON.
//!
//! Analyze a remote stylesheet:
//! ```sh
//! analyze-css --url https://example.com/style.css
//! ```
//!
//! Analyze a local file, with indented output and without offenders:
//! ```sh
//! analyze-css --file style.css --pretty --no-offenders
//! ```
//!
//! Read the stylesheet from standard input:
//! ```sh
//! cat style.css | analyze-css -
//! ```
#![warn(clippy::all, clippy::pedantic)]
#![warn(
    absolute_paths_not_starting_with_crate,
    missing_copy_implementations,
    missing_debug_implementations,
    semicolon_in_expressions_from_macros,
    unreachable_pub,
    unused_extern_crates,
    clippy::missing_const_for_fn
)]
#![deny(anonymous_parameters, macro_use_extern_crate)]
#![deny(missing_docs)]

use std::io::{self, ErrorKind as IoErrorKind, Write};
use std::path::PathBuf;

use analyze_css::{AnalysisRequest, ErrorKind, EXIT_NEED_OPTIONS};
use anyhow::{Context, Error, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};

mod logging;
mod options;

use logging::init_logging;
use options::{AnalyzeCssOptions, Config, ANALYZE_CSS_CONFIG_FILE};

/// A C-like enum that can be cast to `i32` and used as process exit code.
///
/// Failures of the analysis itself exit with [`ErrorKind::exit_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator.
    #[allow(unused)]
    UnexpectedFailure = 1,
    NeedOptions = EXIT_NEED_OPTIONS as isize,
    ConfigFile = 3,
}

fn main() -> Result<()> {
    // std::process::exit doesn't guarantee that all destructors will be run,
    // therefore we wrap the main code in another function to ensure that.
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

/// Merge a potential config file into the command-line options
fn load_config(opts: &mut AnalyzeCssOptions) -> Result<()> {
    let (path, explicit) = match &opts.config_file {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(ANALYZE_CSS_CONFIG_FILE), false),
    };

    // The default file is optional, an explicitly given one is not
    if !explicit && !path.is_file() {
        return Ok(());
    }

    let config = Config::load_from_file(&path)
        .with_context(|| format!("Cannot load configuration file `{}`", path.display()))?;
    opts.config.merge(config);
    Ok(())
}

/// Set up runtime and run the analysis
fn run_main() -> Result<i32> {
    let mut opts = AnalyzeCssOptions::parse();

    if let Err(e) = load_config(&mut opts) {
        init_logging(opts.config.verbose);
        debug!("{e:?}");
        eprintln!("Error: {}", one_line(&e));
        return Ok(ExitCode::ConfigFile as i32);
    }
    init_logging(opts.config.verbose);
    debug!("analyze-css v{}", env!("CARGO_PKG_VERSION"));

    let request = match opts.request() {
        Ok(request) => request,
        Err(ErrorKind::NeedOptions) => {
            AnalyzeCssOptions::command().print_help()?;
            return Ok(ExitCode::NeedOptions as i32);
        }
        Err(e) => return Ok(fail(&e)),
    };
    debug!("{request:?}");

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(run(&request)) {
        Err(e) if Some(IoErrorKind::BrokenPipe) == underlying_io_error_kind(&e) => {
            Ok(ExitCode::Success as i32)
        }
        res => res,
    }
}

/// Check if the given error can be traced back to an `io::ErrorKind`
fn underlying_io_error_kind(error: &Error) -> Option<IoErrorKind> {
    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
    }
    None
}

/// Render an error and its causes on a single line
fn one_line(error: &Error) -> String {
    format!("{error:#}").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Print the error and pick its exit code
fn fail(e: &ErrorKind) -> i32 {
    eprintln!("Error: {e}");
    let exit_code = e.exit_code();
    debug!("Exiting with code {exit_code}");
    exit_code
}

/// Analyze the requested stylesheet and print the report
async fn run(request: &AnalysisRequest) -> Result<i32> {
    let report = match analyze_css::analyze(request).await {
        Ok(report) => report,
        Err(e) => return Ok(fail(&e)),
    };

    let output = report
        .to_json(request.pretty_print)
        .context("Cannot format report as JSON")?;
    info!("Analysis of {} done", request.input);

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(ExitCode::Success as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyze_css::EXIT_GENERIC_FAILURE;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::NeedOptions as i32, EXIT_NEED_OPTIONS);
        assert_eq!(ExitCode::UnexpectedFailure as i32, EXIT_GENERIC_FAILURE);
    }

    #[test]
    fn test_one_line() {
        let error = anyhow::anyhow!("line 1\n  |\n1 | pretty = \"maybe\"").context("Cannot load");
        assert_eq!(one_line(&error), "Cannot load: line 1 | 1 | pretty = \"maybe\"");
    }

    #[test]
    fn test_options_are_valid() {
        AnalyzeCssOptions::command().debug_assert();
    }
}
