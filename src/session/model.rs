use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use super::InputError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub twitter_handle: Option<String>,
}

impl Speaker {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: None,
            twitter_handle: None,
        }
    }

    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(InputError::UnknownSentiment(value.to_string())),
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// Analyzers emit counts as plain JSON numbers; `2.0` is as good as `2`.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let Some(raw) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !raw.is_finite() || raw < 0.0 {
        warn!(count = raw, "ignoring non-finite or negative interaction count");
        return Ok(None);
    }
    Ok(Some(raw.round().min(u32::MAX as f64) as u32))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub from_speaker_id: String,
    pub to_speaker_id: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u32>,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_overlap_score: Option<f64>,
}

impl Interaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_speaker_id: from.into(),
            to_speaker_id: to.into(),
            count: None,
            sentiment: Sentiment::Neutral,
            topics: BTreeSet::new(),
            duration: None,
            response_time: None,
            topic_overlap_score: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn weight(&self) -> f32 {
        self.count.map_or(1.0, |count| count as f32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionTypes {
    pub direct_mentions: bool,
    pub sequential_responses: bool,
    pub topic_based: bool,
    pub time_proximity: bool,
}

impl Default for InteractionTypes {
    fn default() -> Self {
        Self {
            direct_mentions: true,
            sequential_responses: true,
            topic_based: true,
            time_proximity: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrengthMetrics {
    pub frequency: bool,
    pub duration: bool,
    pub topic_overlap: bool,
    pub sentiment: bool,
    pub response_time: bool,
}

impl StrengthMetrics {
    pub const ALL: Self = Self {
        frequency: true,
        duration: true,
        topic_overlap: true,
        sentiment: true,
        response_time: true,
    };

    pub const NONE: Self = Self {
        frequency: false,
        duration: false,
        topic_overlap: false,
        sentiment: false,
        response_time: false,
    };
}

impl Default for StrengthMetrics {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub interaction_types: InteractionTypes,
    pub strength_metrics: StrengthMetrics,
    pub time_window_seconds: f64,
    pub topic_overlap_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interaction_types: InteractionTypes::default(),
            strength_metrics: StrengthMetrics::default(),
            time_window_seconds: 30.0,
            topic_overlap_threshold: 0.3,
        }
    }
}

impl AnalysisConfig {
    pub fn with_metrics(strength_metrics: StrengthMetrics) -> Self {
        Self {
            strength_metrics,
            ..Self::default()
        }
    }

    pub fn sanitize(mut self) -> Self {
        let defaults = Self::default();

        if !self.topic_overlap_threshold.is_finite() {
            warn!(
                value = self.topic_overlap_threshold,
                "topic overlap threshold is not finite, using default"
            );
            self.topic_overlap_threshold = defaults.topic_overlap_threshold;
        } else if !(0.0..=1.0).contains(&self.topic_overlap_threshold) {
            warn!(
                value = self.topic_overlap_threshold,
                "topic overlap threshold outside [0, 1], clamping"
            );
            self.topic_overlap_threshold = self.topic_overlap_threshold.clamp(0.0, 1.0);
        }

        if !self.time_window_seconds.is_finite() {
            warn!(
                value = self.time_window_seconds,
                "time window is not finite, using default"
            );
            self.time_window_seconds = defaults.time_window_seconds;
        } else if self.time_window_seconds < 0.0 {
            warn!(
                value = self.time_window_seconds,
                "time window is negative, clamping to zero"
            );
            self.time_window_seconds = 0.0;
        }

        self
    }
}
