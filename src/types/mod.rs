#![allow(unreachable_pub)]

mod error;
mod input;
mod offender;
mod request;
mod result;

pub use error::*;
pub use input::{Input, STDIN_MARKER};
pub use offender::{Offender, Position, Span};
pub use request::AnalysisRequest;
pub use result::{AnalysisResult, MetricValue, Metrics, Offenders};

/// The analyze-css `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
