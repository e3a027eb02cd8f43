pub mod focus;
pub mod graph;
pub mod orchestrator;
pub mod physics;
pub mod session;
pub mod settings;

pub use focus::{Camera, Focus, select_focus};
pub use graph::{Edge, EdgeStyle, Node, SpeakerGraph, build_graph, style_edge, weighted_degrees};
pub use orchestrator::{
    LayoutEvent, LayoutFrame, LayoutJob, LayoutOrchestrator, LayoutOutcome, RecomputeReason,
};
pub use physics::{
    CancelGuard, GenerationToken, LayoutError, LayoutRun, force_layout, force_layout_cancellable,
};
pub use session::{AnalysisConfig, Interaction, Sentiment, Speaker, StrengthMetrics};
pub use settings::{EngineSettings, Viewport};
