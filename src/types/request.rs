use secrecy::SecretString;
use typed_builder::TypedBuilder;

use crate::client::DEFAULT_USER_AGENT;
use crate::Input;

/// A single analysis run, built once from the command line.
///
/// ```
/// use analyze_css::{AnalysisRequest, Input};
///
/// let request = AnalysisRequest::builder()
///     .input(Input::RemoteUrl("https://example.com/style.css".to_string()))
///     .pretty_print(true)
///     .build();
/// assert!(!request.suppress_offenders);
/// ```
#[derive(TypedBuilder, Debug)]
#[builder(field_defaults(setter(into)))]
pub struct AnalysisRequest {
    /// Where to read the stylesheet from
    pub input: Input,

    /// Accept invalid TLS certificates for this request only.
    /// Only meaningful for [`Input::RemoteUrl`].
    #[builder(default)]
    pub ignore_ssl_errors: bool,

    /// User name for HTTP basic authentication
    #[builder(default)]
    pub auth_user: Option<String>,

    /// Password for HTTP basic authentication
    #[builder(default)]
    pub auth_pass: Option<SecretString>,

    /// HTTP proxy to route the request through
    #[builder(default)]
    pub proxy: Option<String>,

    /// Leave the offenders section out of the report
    #[builder(default)]
    pub suppress_offenders: bool,

    /// Indent the JSON report
    #[builder(default)]
    pub pretty_print: bool,

    /// User agent sent along with remote requests
    #[builder(default_code = "String::from(DEFAULT_USER_AGENT)")]
    pub user_agent: String,
}
