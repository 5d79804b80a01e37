//! One complete analysis: load the stylesheet, run the analyzer, and
//! shape the result into a [`Report`].
use log::{debug, info};

use crate::engine::{Analyzer, CssAnalyzer, Options};
use crate::{AnalysisRequest, ClientBuilder, Report, Result};

/// Analyze the stylesheet a request points at with the built-in analyzer.
///
/// ```no_run
/// use analyze_css::{AnalysisRequest, Input, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///   let request = AnalysisRequest::builder()
///       .input(Input::RemoteUrl("https://example.com/style.css".to_string()))
///       .build();
///   let report = analyze_css::analyze(&request).await?;
///   println!("{}", report.to_json(true).unwrap());
///   Ok(())
/// }
/// ```
///
/// # Errors
///
/// See [`analyze_with`].
pub async fn analyze(request: &AnalysisRequest) -> Result<Report> {
    analyze_with(request, &CssAnalyzer::default()).await
}

/// Analyze the stylesheet a request points at with a custom analyzer.
///
/// # Errors
///
/// Fails if the HTTP client can't be built, the stylesheet can't be loaded
/// or the analyzer rejects it. See [`crate::ErrorKind`] for the details.
pub async fn analyze_with<A: Analyzer>(request: &AnalysisRequest, analyzer: &A) -> Result<Report> {
    let client = ClientBuilder::from(request).client()?;

    info!("Loading {}", request.input);
    let css = client.fetch(&request.input).await?;
    debug!("Loaded {} bytes from {}", css.len(), request.input);

    let options = Options {
        collect_offenders: !request.suppress_offenders,
    };
    let mut result = analyzer.analyze(&css, &options)?;
    if request.suppress_offenders && result.offenders.take().is_some() {
        debug!("Dropping offenders returned by the analyzer");
    }
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_server, mock_server_with_auth};
    use crate::{AnalysisResult, ErrorKind, Input, MetricValue, Offender};
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use std::io::Write;

    const CSS: &str = ".foo { color: red !important }";

    /// Hands back a fixed result so the loading side can be tested alone
    struct FixedAnalyzer;

    impl Analyzer for FixedAnalyzer {
        fn analyze(&self, css: &str, options: &Options) -> Result<AnalysisResult> {
            let mut result = AnalysisResult::default();
            result
                .metrics
                .insert("length".to_string(), MetricValue::Count(css.len() as u64));
            if options.collect_offenders {
                result.offenders = Some(Default::default());
            }
            Ok(result)
        }
    }

    #[tokio::test]
    async fn test_analyze_url() {
        let mock_server = mock_server(200, Some(CSS)).await;
        let request = AnalysisRequest::builder()
            .input(Input::RemoteUrl(mock_server.uri()))
            .build();

        let report = analyze(&request).await.unwrap();
        assert_eq!(report.metrics["importants"], MetricValue::Count(1));
        assert_eq!(
            report.offenders.unwrap()["importants"],
            vec![".foo {color: red !important} @ 1:8".to_string()]
        );
    }

    #[tokio::test]
    async fn test_suppressed_offenders() {
        let mock_server = mock_server(200, Some(CSS)).await;
        let request = AnalysisRequest::builder()
            .input(Input::RemoteUrl(mock_server.uri()))
            .suppress_offenders(true)
            .build();

        let report = analyze_with(&request, &FixedAnalyzer).await.unwrap();
        assert_eq!(report.offenders, None);
        assert_eq!(report.metrics["length"], MetricValue::Count(CSS.len() as u64));
    }

    /// Reports offenders no matter what it is asked for
    struct ChattyAnalyzer;

    impl Analyzer for ChattyAnalyzer {
        fn analyze(&self, _css: &str, _options: &Options) -> Result<AnalysisResult> {
            let mut result = AnalysisResult::default();
            result.metrics.insert("x".to_string(), MetricValue::Count(1));
            let mut offenders = crate::Offenders::default();
            offenders.insert("x".to_string(), vec![Offender::unpositioned("X")]);
            result.offenders = Some(offenders);
            Ok(result)
        }
    }

    #[tokio::test]
    async fn test_suppressed_offenders_are_dropped() {
        let mock_server = mock_server(200, Some(CSS)).await;
        let request = AnalysisRequest::builder()
            .input(Input::RemoteUrl(mock_server.uri()))
            .suppress_offenders(true)
            .build();

        let report = analyze_with(&request, &ChattyAnalyzer).await.unwrap();
        assert_eq!(report.offenders, None);
        assert_eq!(report.to_json(false).unwrap(), r#"{"metrics":{"x":1}}"#);
    }

    #[tokio::test]
    async fn test_analyze_with_credentials() {
        let mock_server = mock_server_with_auth("user", "secret", CSS).await;
        let request = AnalysisRequest::builder()
            .input(Input::RemoteUrl(mock_server.uri()))
            .auth_user(Some("user".to_string()))
            .auth_pass(Some(SecretString::new("secret".to_string())))
            .build();

        assert!(analyze_with(&request, &FixedAnalyzer).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_error() {
        let mock_server = mock_server(500, None).await;
        let request = AnalysisRequest::builder()
            .input(Input::RemoteUrl(mock_server.uri()))
            .build();

        let err = analyze(&request).await.unwrap_err();
        assert!(matches!(err, ErrorKind::RejectedStatusCode(..)));
        assert_eq!(err.exit_code(), 254);
    }

    #[tokio::test]
    async fn test_empty_body() {
        let mock_server = mock_server(200, Some("")).await;
        let request = AnalysisRequest::builder()
            .input(Input::RemoteUrl(mock_server.uri()))
            .build();

        let err = analyze(&request).await.unwrap_err();
        assert_eq!(err.exit_code(), 252);
    }

    #[tokio::test]
    async fn test_analyze_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a {{ }}\nb {{ }}").unwrap();
        let request = AnalysisRequest::builder()
            .input(Input::FsPath(file.path().to_path_buf()))
            .build();

        let report = analyze(&request).await.unwrap();
        assert_eq!(report.metrics["emptyRules"], MetricValue::Count(2));
    }

    #[tokio::test]
    async fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a {{ color: red").unwrap();
        let request = AnalysisRequest::builder()
            .input(Input::FsPath(file.path().to_path_buf()))
            .build();

        let err = analyze(&request).await.unwrap_err();
        assert_eq!(err.exit_code(), 251);
        assert_eq!(err.to_string(), "CSS parsing failed: Unclosed block @ 1:3");
    }
}
