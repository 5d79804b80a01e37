use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when neither `--url`, `--file` nor `-` (stdin) was given.
pub const EXIT_NEED_OPTIONS: i32 = 2;
/// Exit code used when the stylesheet could not be parsed.
pub const EXIT_PARSING_FAILED: i32 = 251;
/// Exit code used when the stylesheet is empty.
pub const EXIT_EMPTY_CSS: i32 = 252;
/// Exit code used when a remote stylesheet could not be loaded.
pub const EXIT_URL_LOADING_FAILED: i32 = 254;
/// Catch-all exit code for everything without a dedicated code.
pub const EXIT_GENERIC_FAILURE: i32 = 1;

/// Possible errors when analyzing a stylesheet with `analyze_css`
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No input source was given.
    #[error("Either --url, --file or - (stdin) needs to be provided")]
    NeedOptions,
    /// The local stylesheet could not be read.
    #[error("Failed to read from path: `{}`, reason: {1}", .0.display())]
    ReadFileInput(PathBuf, #[source] std::io::Error),
    /// Standard input could not be read.
    #[error("Failed to read from stdin, reason: {0}")]
    ReadStdinInput(#[source] std::io::Error),
    /// The given string cannot be parsed into a URL.
    #[error("Cannot parse `{0}` as website url: {1}")]
    InvalidUrl(String, #[source] url::ParseError),
    /// Network error while loading a remote stylesheet.
    /// This covers connection, TLS and proxy failures.
    #[error("Network error while loading stylesheet: {0}")]
    NetworkRequest(#[source] reqwest::Error),
    /// The remote server answered with a non-successful status code.
    #[error("Loading {0} failed with HTTP status {1}")]
    RejectedStatusCode(String, http::StatusCode),
    /// The request client cannot be created.
    #[error("Error creating request client: {0}")]
    BuildClient(#[source] reqwest::Error),
    /// The given proxy cannot be used.
    #[error("Invalid proxy `{0}`: {1}")]
    InvalidProxy(String, #[source] reqwest::Error),
    /// The given header value could not be parsed.
    #[error("Header could not be parsed.")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
    /// Nothing but whitespace was provided.
    #[error("Empty CSS was provided")]
    EmptyCss,
    /// The stylesheet is malformed.
    #[error("CSS parsing failed: {message} @ {line}:{column}")]
    CssParsing {
        /// What went wrong
        message: String,
        /// 1-based line of the offending character
        line: usize,
        /// 1-based column of the offending character
        column: usize,
    },
}

impl ErrorKind {
    /// The process exit code this error maps to.
    ///
    /// Every variant has a fixed code, so callers never need a fallback.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NeedOptions => EXIT_NEED_OPTIONS,
            Self::InvalidUrl(..) | Self::NetworkRequest(_) | Self::RejectedStatusCode(..) => {
                EXIT_URL_LOADING_FAILED
            }
            Self::EmptyCss => EXIT_EMPTY_CSS,
            Self::CssParsing { .. } => EXIT_PARSING_FAILED,
            Self::ReadFileInput(..)
            | Self::ReadStdinInput(_)
            | Self::BuildClient(_)
            | Self::InvalidProxy(..)
            | Self::InvalidHeader(_) => EXIT_GENERIC_FAILURE,
        }
    }
}
