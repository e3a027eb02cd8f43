use serde::Serialize;

use crate::session::{AnalysisConfig, Interaction, Sentiment};

pub const POSITIVE_COLOR: &str = "#4ade80";
pub const NEUTRAL_COLOR: &str = "#60a5fa";
pub const NEGATIVE_COLOR: &str = "#f87171";

pub const MIN_THICKNESS: f32 = 2.0;
pub const MAX_THICKNESS: f32 = 8.0;
pub const UNWEIGHTED_THICKNESS: f32 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub thickness: f32,
    pub color: &'static str,
    pub label: String,
}

fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => POSITIVE_COLOR,
        Sentiment::Neutral => NEUTRAL_COLOR,
        Sentiment::Negative => NEGATIVE_COLOR,
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

pub fn style_edge(interaction: &Interaction, config: &AnalysisConfig) -> EdgeStyle {
    let metrics = config.strength_metrics;

    let thickness = if metrics.frequency {
        interaction.weight().clamp(MIN_THICKNESS, MAX_THICKNESS)
    } else {
        UNWEIGHTED_THICKNESS
    };

    let color = if metrics.sentiment {
        sentiment_color(interaction.sentiment)
    } else {
        NEUTRAL_COLOR
    };

    let mut lines = Vec::with_capacity(4);
    if metrics.frequency
        && let Some(count) = interaction.count
    {
        lines.push(format!("{count} interactions"));
    }
    if metrics.duration
        && let Some(duration) = finite(interaction.duration)
    {
        lines.push(format!("{}s duration", duration.round() as i64));
    }
    if metrics.response_time
        && let Some(response_time) = finite(interaction.response_time)
    {
        lines.push(format!("{}s response", response_time.round() as i64));
    }
    if metrics.topic_overlap
        && let Some(score) = finite(interaction.topic_overlap_score)
    {
        lines.push(format!("{}% topic overlap", (score * 100.0).round() as i64));
    }

    EdgeStyle {
        thickness,
        color,
        label: lines.join("\n"),
    }
}
