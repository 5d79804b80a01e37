//! Input source type definitions.
//!
//! A stylesheet can be read from exactly one of these sources:
//! - a remote URL (`--url`)
//! - a local file (`--file`)
//! - standard input (`-`)
//!
//! The source is picked once by [`Input::resolve`]. Everything downstream
//! matches on the variant instead of looking at the raw flags again.

use std::fmt::Display;
use std::path::PathBuf;

use crate::{ErrorKind, Result};

/// Positional argument which selects standard input
pub const STDIN_MARKER: &str = "-";

/// Where to read the stylesheet from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Input {
    /// Standard input
    Stdin,
    /// URL (of HTTP/HTTPS scheme), kept verbatim until it is fetched
    RemoteUrl(String),
    /// Local file path
    FsPath(PathBuf),
}

impl Input {
    /// Pick the input source from the command-line flags.
    ///
    /// The stdin marker wins over `--url`, which wins over `--file`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NeedOptions`] if no source was given at all.
    pub fn resolve<S: AsRef<str>>(
        positional: &[S],
        url: Option<&str>,
        file: Option<PathBuf>,
    ) -> Result<Self> {
        if positional.iter().any(|arg| arg.as_ref() == STDIN_MARKER) {
            return Ok(Self::Stdin);
        }
        if let Some(url) = url {
            return Ok(Self::RemoteUrl(url.to_string()));
        }
        if let Some(path) = file {
            return Ok(Self::FsPath(path));
        }
        Err(ErrorKind::NeedOptions)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::RemoteUrl(url) => f.write_str(url),
            Self::FsPath(path) => write!(f, "{}", path.display()),
        }
    }
}
