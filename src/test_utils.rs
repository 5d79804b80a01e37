#![cfg(test)]

use wiremock::matchers::{basic_auth, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{engine::Options, AnalysisResult, CssAnalyzer};

/// Start a server which answers every `GET` with the given status code and
/// an optional body
pub(crate) async fn mock_server(response_code: u16, content: Option<&str>) -> MockServer {
    let mock_server = MockServer::start().await;
    let template = ResponseTemplate::new(response_code);

    let template = if let Some(s) = content {
        template.set_body_string(s)
    } else {
        template
    };

    Mock::given(method("GET"))
        .respond_with(template)
        .mount(&mock_server)
        .await;

    mock_server
}

/// Start a server which only serves `content` to clients sending the given
/// basic auth credentials. Everyone else gets a 401.
pub(crate) async fn mock_server_with_auth(
    username: &str,
    password: &str,
    content: &str,
) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(basic_auth(username, password))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(10)
        .mount(&mock_server)
        .await;

    mock_server
}

/// Run the built-in analyzer with offenders enabled
pub(crate) fn analyze(css: &str) -> AnalysisResult {
    use crate::Analyzer;

    CssAnalyzer::default()
        .analyze(
            css,
            &Options {
                collect_offenders: true,
            },
        )
        .expect("Expected valid CSS")
}

/// Flattened offenders of a single metric
pub(crate) fn offenders(result: &AnalysisResult, metric: &str) -> Vec<String> {
    result
        .offenders
        .as_ref()
        .and_then(|offenders| offenders.get(metric))
        .map(|list| list.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Value of a single metric as a float
pub(crate) fn metric(result: &AnalysisResult, name: &str) -> f64 {
    result
        .metrics
        .get(name)
        .unwrap_or_else(|| panic!("Metric {name} is not registered"))
        .as_f64()
}
