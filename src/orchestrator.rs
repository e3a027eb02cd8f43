use emath::Pos2;
use serde::Serialize;
use tracing::{debug, info};

use crate::focus::{Focus, select_focus};
use crate::graph::{Edge, Node, SpeakerGraph, build_graph};
use crate::physics::{CancelGuard, GenerationToken, LayoutError, force_layout_cancellable};
use crate::session::{AnalysisConfig, Interaction, Speaker};
use crate::settings::{EngineSettings, PositionPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecomputeReason {
    NewData,
    ConfigChanged,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub avatar_url: Option<String>,
    pub twitter_handle: Option<String>,
    pub weighted_degree: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub position: Pos2,
    pub data: NodeData,
}

impl From<&Node> for RenderNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            position: node.position,
            data: NodeData {
                label: node.speaker.label().to_string(),
                avatar_url: node.speaker.avatar_url.clone(),
                twitter_handle: node.speaker.twitter_handle.clone(),
                weighted_degree: node.weighted_degree,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStroke {
    pub stroke_width: f32,
    pub stroke: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: EdgeStroke,
    pub label: String,
}

impl From<&Edge> for RenderEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            style: EdgeStroke {
                stroke_width: edge.style.thickness,
                stroke: edge.style.color,
            },
            label: edge.style.label.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraDirective {
    pub center: Pos2,
    pub zoom: f32,
    pub duration_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutEvent {
    LayoutReady { generation: u64 },
    RelayoutSkipped { generation: u64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutFrame {
    pub generation: u64,
    pub reason: RecomputeReason,
    pub relaid_out: bool,
    pub ticks_run: usize,
    pub converged_early: bool,
    pub dropped_interactions: usize,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub focus_node_id: Option<String>,
    pub camera: Option<CameraDirective>,
    pub events: Vec<LayoutEvent>,
}

#[derive(Clone, Debug)]
pub struct LayoutOutcome {
    pub graph: SpeakerGraph,
    pub frame: LayoutFrame,
}

#[derive(Clone, Debug)]
pub struct LayoutJob {
    reason: RecomputeReason,
    speakers: Vec<Speaker>,
    interactions: Vec<Interaction>,
    config: AnalysisConfig,
    settings: EngineSettings,
    prior_nodes: Option<Vec<Node>>,
    guard: CancelGuard,
}

impl LayoutJob {
    pub fn generation(&self) -> u64 {
        self.guard.generation()
    }

    pub fn run(self) -> Result<LayoutOutcome, LayoutError> {
        let generation = self.guard.generation();
        let mut graph = build_graph(&self.speakers, &self.interactions, &self.config);
        let dropped_interactions = self.interactions.len() - graph.edges.len();

        if let Some(prior) = &self.prior_nodes {
            let unplaced = graph.carry_positions_from(prior);
            debug!(generation, unplaced, "carried forward prior positions");
        }

        let mut events = Vec::with_capacity(2);
        let mut ticks_run = 0;
        let mut converged_early = false;
        let all_placed = !graph.nodes.is_empty() && !graph.needs_layout();
        let relaid_out = !all_placed;

        if relaid_out {
            let run = force_layout_cancellable(
                &graph.nodes,
                &graph.edges,
                self.settings.viewport,
                &self.settings.simulation,
                &self.guard,
            )?;
            graph.nodes = run.nodes;
            ticks_run = run.ticks_run;
            converged_early = run.converged_early;
        } else {
            debug!(generation, "all nodes already placed, skipping relayout");
            events.push(LayoutEvent::RelayoutSkipped { generation });
        }

        let Focus {
            focus_node_id,
            camera,
        } = select_focus(&graph.nodes, &graph.edges, &self.settings.focus);
        let camera = camera.map(|camera| CameraDirective {
            center: camera.center,
            zoom: camera.zoom,
            duration_ms: self.settings.focus.duration_ms,
        });
        events.push(LayoutEvent::LayoutReady { generation });

        let frame = LayoutFrame {
            generation,
            reason: self.reason,
            relaid_out,
            ticks_run,
            converged_early,
            dropped_interactions,
            nodes: graph.nodes.iter().map(RenderNode::from).collect(),
            edges: graph.edges.iter().map(RenderEdge::from).collect(),
            focus_node_id,
            camera,
            events,
        };

        Ok(LayoutOutcome { graph, frame })
    }
}

#[derive(Debug, Default)]
pub struct LayoutOrchestrator {
    speakers: Vec<Speaker>,
    interactions: Vec<Interaction>,
    config: AnalysisConfig,
    settings: EngineSettings,
    token: GenerationToken,
    graph: Option<SpeakerGraph>,
}

impl LayoutOrchestrator {
    pub fn new(config: AnalysisConfig, settings: EngineSettings) -> Self {
        Self {
            config: config.sanitize(),
            settings,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn graph(&self) -> Option<&SpeakerGraph> {
        self.graph.as_ref()
    }

    pub fn token(&self) -> GenerationToken {
        self.token.clone()
    }

    pub fn ingest_batch(
        &mut self,
        speakers: Vec<Speaker>,
        interactions: Vec<Interaction>,
    ) -> Result<LayoutFrame, LayoutError> {
        self.speakers = speakers;
        self.interactions = interactions;
        self.recompute_layout(RecomputeReason::NewData)
    }

    pub fn update_config(&mut self, config: AnalysisConfig) -> Result<LayoutFrame, LayoutError> {
        self.config = config.sanitize();
        self.recompute_layout(RecomputeReason::ConfigChanged)
    }

    pub fn prepare(&self, reason: RecomputeReason) -> LayoutJob {
        self.token.advance();
        let prior_nodes = match self.settings.positions {
            PositionPolicy::Reset => None,
            PositionPolicy::CarryForward => self.graph.as_ref().map(|graph| graph.nodes.clone()),
        };

        LayoutJob {
            reason,
            speakers: self.speakers.clone(),
            interactions: self.interactions.clone(),
            config: self.config,
            settings: self.settings,
            prior_nodes,
            guard: self.token.guard(),
        }
    }

    pub fn commit(&mut self, outcome: LayoutOutcome) -> Option<LayoutFrame> {
        let generation = outcome.frame.generation;
        if generation != self.token.current() {
            debug!(generation, current = self.token.current(), "discarding stale layout");
            return None;
        }

        self.graph = Some(outcome.graph);
        Some(outcome.frame)
    }

    pub fn recompute_layout(
        &mut self,
        reason: RecomputeReason,
    ) -> Result<LayoutFrame, LayoutError> {
        let job = self.prepare(reason);
        let generation = job.generation();
        let outcome = job.run()?;

        info!(
            generation,
            ?reason,
            nodes = outcome.frame.nodes.len(),
            edges = outcome.frame.edges.len(),
            dropped = outcome.frame.dropped_interactions,
            focus = outcome.frame.focus_node_id.as_deref().unwrap_or("-"),
            "layout ready"
        );

        let ticks = outcome.frame.ticks_run;
        self.commit(outcome)
            .ok_or(LayoutError::Cancelled { generation, ticks })
    }
}
