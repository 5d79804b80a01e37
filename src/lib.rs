//! `analyze-css` computes quality metrics for CSS stylesheets.
//!
//! "Hello world" example:
//! ```no_run
//! use analyze_css::{AnalysisRequest, Input, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let request = AnalysisRequest::builder()
//!       .input(Input::FsPath("style.css".into()))
//!       .build();
//!   let report = analyze_css::analyze(&request).await?;
//!   println!("{}", report.metrics["selectors"].as_f64());
//!   Ok(())
//! }
//! ```
//!
//! Stylesheets which are already in memory can be handed to the engine
//! directly:
//!
//! ```
//! use analyze_css::{Analyzer, CssAnalyzer, Options, Report};
//!
//! let result = CssAnalyzer::default()
//!     .analyze("a { color: red !important }", &Options { collect_offenders: true })
//!     .unwrap();
//! let report = Report::from(result);
//! assert_eq!(report.offenders.unwrap()["importants"], ["a {color: red !important} @ 1:5"]);
//! ```
#![warn(missing_docs)]

mod client;
mod report;
mod runner;
mod types;

pub mod engine;
#[cfg(test)]
mod test_utils;

pub use client::{Client, ClientBuilder, Credentials, DEFAULT_USER_AGENT};
pub use engine::{Analyzer, CssAnalyzer, Options};
pub use report::Report;
pub use runner::{analyze, analyze_with};
pub use types::*;
