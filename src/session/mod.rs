mod collect;
mod model;
mod parse;

use thiserror::Error;

pub use collect::{dedupe_speakers, load_batch};
pub use model::{
    AnalysisConfig, Interaction, InteractionTypes, Sentiment, Speaker, StrengthMetrics,
};
pub use parse::{AnalysisBatch, parse_analysis_batch};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown sentiment label: {0:?}")]
    UnknownSentiment(String),

    #[error("analysis batch is missing required member `{0}`")]
    MissingMember(&'static str),

    #[error("analysis batch must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}
