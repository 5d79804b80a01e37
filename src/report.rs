use serde::Serialize;

use crate::{AnalysisResult, Metrics, Offenders};

/// The document printed for a successful run.
///
/// Offenders are flattened to `message @ line:col` strings. The key is left
/// out entirely when offenders were not collected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// All metrics in registration order
    pub metrics: Metrics,
    /// Flattened offenders per metric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offenders: Option<Offenders<String>>,
}

impl Report {
    /// Serialize the report, with two-space indentation if `pretty` is set.
    ///
    /// # Errors
    ///
    /// Fails if `serde_json` can't serialize a metric value.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl From<AnalysisResult> for Report {
    fn from(result: AnalysisResult) -> Self {
        let offenders = result.offenders.map(|offenders| {
            offenders
                .into_iter()
                .map(|(metric, list)| (metric, list.iter().map(ToString::to_string).collect()))
                .collect()
        });

        Self {
            metrics: result.metrics,
            offenders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MetricValue, Offender, Position};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn result(offenders: Option<Offenders<Offender>>) -> AnalysisResult {
        let mut metrics = Metrics::new();
        metrics.insert("a".to_string(), MetricValue::Count(1));
        AnalysisResult { metrics, offenders }
    }

    #[test]
    fn test_offenders_are_flattened() {
        let mut offenders = IndexMap::new();
        offenders.insert(
            "importants".to_string(),
            vec![
                Offender::new("X", Position::new(3, 5)),
                Offender::unpositioned("Y"),
            ],
        );

        let report = Report::from(result(Some(offenders)));
        assert_eq!(
            report.offenders.unwrap()["importants"],
            vec!["X @ 3:5".to_string(), "Y".to_string()]
        );
    }

    #[test]
    fn test_missing_offenders_key() {
        let report = Report::from(result(None));
        assert_eq!(report.to_json(false).unwrap(), r#"{"metrics":{"a":1}}"#);
    }

    #[test]
    fn test_empty_offenders_are_kept() {
        let report = Report::from(result(Some(IndexMap::new())));
        assert_eq!(
            report.to_json(false).unwrap(),
            r#"{"metrics":{"a":1},"offenders":{}}"#
        );
    }

    #[test]
    fn test_pretty() {
        let report = Report::from(result(None));
        assert_eq!(
            report.to_json(true).unwrap(),
            "{\n  \"metrics\": {\n    \"a\": 1\n  }\n}"
        );
    }

    #[test]
    fn test_averages() {
        let mut metrics = Metrics::new();
        metrics.insert("avg".to_string(), MetricValue::average(1, 3));
        metrics.insert("whole".to_string(), MetricValue::average(4, 2));
        let report = Report {
            metrics,
            offenders: None,
        };
        assert_eq!(
            report.to_json(false).unwrap(),
            r#"{"metrics":{"avg":0.33,"whole":2}}"#
        );
    }

    #[test]
    fn test_deterministic() {
        let report = Report::from(result(Some(IndexMap::new())));
        assert_eq!(report.to_json(true).unwrap(), report.clone().to_json(true).unwrap());
    }
}
