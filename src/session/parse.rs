use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::InputError;
use super::model::{AnalysisConfig, Interaction, Speaker};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBatch {
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AnalysisConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn parse_analysis_batch(raw: &str) -> Result<AnalysisBatch> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in analysis batch")?;
    let mut object = match parsed {
        Value::Object(object) => object,
        other => return Err(InputError::NotAnObject(json_kind(&other)).into()),
    };

    if !object.contains_key("speakers") {
        return Err(InputError::MissingMember("speakers").into());
    }

    if let Some(Value::Object(analysis)) = object.remove("analysis") {
        for (key, value) in analysis {
            object.entry(key).or_insert(value);
        }
    }

    AnalysisBatch::deserialize(Value::Object(object)).context("invalid analysis batch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Sentiment;

    #[test]
    fn parses_flat_batch() {
        let raw = r#"{
            "speakers": [{"id": "a", "displayName": "Ada"}, {"id": "b", "displayName": "Bo"}],
            "interactions": [{"fromSpeakerId": "a", "toSpeakerId": "b", "count": 2, "sentiment": "positive"}],
            "config": {"strengthMetrics": {"duration": false}}
        }"#;
        let batch = parse_analysis_batch(raw).unwrap();
        assert_eq!(batch.speakers.len(), 2);
        assert_eq!(batch.interactions[0].sentiment, Sentiment::Positive);
        assert!(!batch.config.unwrap().strength_metrics.duration);
    }

    #[test]
    fn lifts_nested_analyzer_output() {
        let raw = r#"{
            "speakers": [{"id": "a"}],
            "analysis": {
                "interactions": [{"fromSpeakerId": "a", "toSpeakerId": "a"}],
                "topics": [{"name": "audio"}],
                "timeline": [],
                "summary": "short space"
            }
        }"#;
        let batch = parse_analysis_batch(raw).unwrap();
        assert_eq!(batch.interactions.len(), 1);
        assert_eq!(batch.topics.len(), 1);
        assert_eq!(batch.summary.as_deref(), Some("short space"));
    }

    #[test]
    fn missing_interactions_is_an_empty_batch() {
        let batch = parse_analysis_batch(r#"{"speakers": []}"#).unwrap();
        assert!(batch.speakers.is_empty());
        assert!(batch.interactions.is_empty());
    }

    #[test]
    fn rejects_missing_speakers() {
        let error = parse_analysis_batch(r#"{"interactions": []}"#).unwrap_err();
        assert_eq!(
            error.downcast_ref::<InputError>(),
            Some(&InputError::MissingMember("speakers"))
        );
    }

    #[test]
    fn odd_counts_do_not_reject_the_batch() {
        let raw = r#"{
            "speakers": [{"id": "a"}, {"id": "b"}],
            "interactions": [
                {"fromSpeakerId": "a", "toSpeakerId": "b", "count": 2.0},
                {"fromSpeakerId": "b", "toSpeakerId": "a", "count": -3}
            ]
        }"#;
        let batch = parse_analysis_batch(raw).unwrap();
        assert_eq!(batch.interactions.len(), 2);
        assert_eq!(batch.interactions[0].count, Some(2));
        assert_eq!(batch.interactions[1].count, None);
    }

    #[test]
    fn rejects_non_object_root() {
        let error = parse_analysis_batch("[1, 2]").unwrap_err();
        assert_eq!(
            error.downcast_ref::<InputError>(),
            Some(&InputError::NotAnObject("an array"))
        );
    }

    #[test]
    fn unknown_sentiment_is_reported() {
        let raw = r#"{
            "speakers": [{"id": "a"}],
            "interactions": [{"fromSpeakerId": "a", "toSpeakerId": "a", "sentiment": "furious"}]
        }"#;
        let error = parse_analysis_batch(raw).unwrap_err();
        assert!(format!("{error:#}").contains("furious"));
    }
}
