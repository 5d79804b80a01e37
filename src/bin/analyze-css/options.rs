use analyze_css::{AnalysisRequest, ErrorKind, Input, DEFAULT_USER_AGENT, STDIN_MARKER};
use anyhow::{anyhow, Result};
use clap::Parser;
use const_format::formatcp;
use log::warn;
use secrecy::SecretString;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

pub(crate) const ANALYZE_CSS_CONFIG_FILE: &str = "analyze-css.toml";

// Shown as the default even though the file is only loaded when it exists
const HELP_MSG_CONFIG_FILE: &str = formatcp!(
    "Configuration file to use\n\n[default: {}]",
    ANALYZE_CSS_CONFIG_FILE,
);

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            #[allow(clippy::missing_const_for_fn)]
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    user_agent: String = DEFAULT_USER_AGENT.to_string();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ($cli:ident , $toml:ident ; $ty:ident { $(..$ignore:ident,)* $( $key:ident : $default:expr, )* } ) => {
        if (false) {
            #[allow(dead_code, unused, clippy::diverging_sub_expression)]
            let _check_fold_in_exhaustivity = $ty {
                $($key: unreachable!(), )*
                $($ignore: unreachable!(), )*
            };
        };
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

/// Compute quality metrics for a CSS stylesheet and print them as JSON.
///
/// The stylesheet is read from standard input (`-`), a URL (`--url`) or a
/// local file (`--file`). If more than one is given, standard input wins
/// over the URL, which wins over the file.
#[derive(Parser, Debug)]
#[command(name = "analyze-css", version, about)]
pub(crate) struct AnalyzeCssOptions {
    /// Pass `-` to read the stylesheet from standard input
    #[arg(name = "inputs", value_name = "-")]
    pub(crate) raw_inputs: Vec<String>,

    /// Fetch the stylesheet from this URL
    #[arg(long)]
    pub(crate) url: Option<String>,

    /// Read the stylesheet from this local file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,

    /// Configuration file to use
    #[arg(short, long = "config")]
    #[arg(help = HELP_MSG_CONFIG_FILE)]
    pub(crate) config_file: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) config: Config,
}

impl AnalyzeCssOptions {
    /// Turn the parsed command line into a request.
    ///
    /// Fails with [`ErrorKind::NeedOptions`] if no input source was given.
    pub(crate) fn request(&self) -> Result<AnalysisRequest, ErrorKind> {
        let ignored: Vec<_> = self
            .raw_inputs
            .iter()
            .filter(|input| *input != STDIN_MARKER)
            .collect();
        if !ignored.is_empty() {
            warn!("Ignoring positional arguments {ignored:?}, use --url or --file instead");
        }

        let input = Input::resolve(&self.raw_inputs, self.url.as_deref(), self.file.clone())?;
        let config = &self.config;

        Ok(AnalysisRequest::builder()
            .input(input)
            .ignore_ssl_errors(config.ignore_ssl_errors)
            .auth_user(config.auth_user.clone())
            .auth_pass(config.auth_pass.clone())
            .proxy(config.proxy.clone())
            .suppress_offenders(config.no_offenders)
            .pretty_print(config.pretty)
            .user_agent(config.user_agent.clone())
            .build())
    }
}

/// Settings which may also come from the configuration file
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Pass many times for more log output
    #[arg(short, long, action = clap::ArgAction::Count)]
    #[serde(default)]
    pub(crate) verbose: u8,

    /// Ignore SSL certificate errors when fetching `--url`
    #[arg(long)]
    #[serde(default)]
    pub(crate) ignore_ssl_errors: bool,

    /// Indent the JSON output
    #[arg(short, long)]
    #[serde(default)]
    pub(crate) pretty: bool,

    /// Leave the offenders out of the output
    #[arg(short = 'N', long)]
    #[serde(default)]
    pub(crate) no_offenders: bool,

    /// User name for HTTP basic authentication
    #[arg(long)]
    #[serde(default)]
    pub(crate) auth_user: Option<String>,

    /// Password for HTTP basic authentication
    #[arg(long, env = "ANALYZE_CSS_AUTH_PASS", hide_env_values = true)]
    #[serde(default)]
    pub(crate) auth_pass: Option<SecretString>,

    /// HTTP proxy to use, e.g. `http://127.0.0.1:8080`
    #[arg(short = 'x', long)]
    #[serde(default)]
    pub(crate) proxy: Option<String>,

    /// User agent
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    #[serde(default = "user_agent")]
    pub(crate) user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: 0,
            ignore_ssl_errors: false,
            pretty: false,
            no_offenders: false,
            auth_user: None,
            auth_pass: None,
            proxy: None,
            user_agent: user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            let location = e
                .span()
                .and_then(|span| contents.get(..span.start))
                .map(|before| format!(" at line {}", before.matches('\n').count() + 1))
                .unwrap_or_default();
            anyhow!("Failed to parse configuration file{location}: {}", e.message().trim())
        })
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        // This is outside of fold_in! because SecretString doesn't implement Eq.
        if self.auth_pass.is_none() && toml.auth_pass.is_some() {
            self.auth_pass = toml.auth_pass;
        }

        fold_in! {
            // Destination and source configs
            self, toml;

            Config {
                // Keys which are handled outside of fold_in
                ..auth_pass,

                // Keys with defaults to assign
                verbose: 0,
                ignore_ssl_errors: false,
                pretty: false,
                no_offenders: false,
                auth_user: None,
                proxy: None,
                user_agent: DEFAULT_USER_AGENT,
            }
        }
    }
}
