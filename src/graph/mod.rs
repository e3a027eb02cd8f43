mod build;
mod style;

use std::collections::HashMap;

use emath::Pos2;
use serde::Serialize;

use crate::session::{AnalysisConfig, Interaction, Speaker};

pub use build::build_graph;
pub use style::{
    EdgeStyle, MAX_THICKNESS, MIN_THICKNESS, NEGATIVE_COLOR, NEUTRAL_COLOR, POSITIVE_COLOR,
    UNWEIGHTED_THICKNESS, style_edge,
};

// Speaker node. `position` at the origin means "not laid out yet".
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub position: Pos2,
    pub weighted_degree: f32,
    pub speaker: Speaker,
}

impl Node {
    pub fn new(speaker: Speaker) -> Self {
        Self {
            id: speaker.id.clone(),
            position: Pos2::ZERO,
            weighted_degree: 0.0,
            speaker,
        }
    }

    pub fn is_unplaced(&self) -> bool {
        self.position == Pos2::ZERO
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: EdgeStyle,
    pub interaction: Interaction,
}

impl Edge {
    pub fn weight(&self) -> f32 {
        self.interaction.weight()
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SpeakerGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl SpeakerGraph {
    pub fn index_by_id(&self) -> HashMap<&str, usize> {
        index_by_id(&self.nodes)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn restyle(&mut self, config: &AnalysisConfig) {
        for edge in &mut self.edges {
            edge.style = style_edge(&edge.interaction, config);
        }
    }

    pub fn carry_positions_from(&mut self, prior: &[Node]) -> usize {
        let prior_positions = prior
            .iter()
            .map(|node| (node.id.as_str(), node.position))
            .collect::<HashMap<_, _>>();

        let mut unplaced = 0usize;
        for node in &mut self.nodes {
            if let Some(&position) = prior_positions.get(node.id.as_str()) {
                node.position = position;
            }
            if node.is_unplaced() {
                unplaced += 1;
            }
        }
        unplaced
    }

    pub fn needs_layout(&self) -> bool {
        self.nodes.iter().any(Node::is_unplaced)
    }
}

pub(crate) fn index_by_id(nodes: &[Node]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(position);
    }
    index
}

pub fn weighted_degrees(nodes: &[Node], edges: &[Edge]) -> Vec<f32> {
    let index = index_by_id(nodes);
    let mut degrees = vec![0.0_f32; nodes.len()];

    for edge in edges {
        let weight = edge.weight();
        let source = index.get(edge.source.as_str()).copied();
        let target = index.get(edge.target.as_str()).copied();

        match (source, target) {
            (Some(source), Some(target)) if source == target => degrees[source] += weight,
            (Some(source), Some(target)) => {
                degrees[source] += weight;
                degrees[target] += weight;
            }
            _ => {}
        }
    }

    degrees
}

pub(crate) fn assign_weighted_degrees(nodes: &mut [Node], edges: &[Edge]) {
    let degrees = weighted_degrees(nodes, edges);
    for (node, degree) in nodes.iter_mut().zip(degrees) {
        node.weighted_degree = degree;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StrengthMetrics;
    use emath::pos2;

    fn speakers(ids: &[&str]) -> Vec<Speaker> {
        ids.iter().map(|id| Speaker::new(*id, id.to_uppercase())).collect()
    }

    #[test]
    fn degrees_sum_incident_weights() {
        let graph = build_graph(
            &speakers(&["a", "b", "c"]),
            &[
                Interaction::new("a", "b").with_count(3),
                Interaction::new("b", "c"),
                Interaction::new("c", "c").with_count(2),
            ],
            &AnalysisConfig::default(),
        );
        assert_eq!(weighted_degrees(&graph.nodes, &graph.edges), vec![3.0, 4.0, 3.0]);
    }

    #[test]
    fn restyle_keeps_positions() {
        let mut graph = build_graph(
            &speakers(&["a", "b"]),
            &[Interaction::new("a", "b").with_count(5)],
            &AnalysisConfig::default(),
        );
        graph.nodes[0].position = pos2(10.0, 20.0);

        graph.restyle(&AnalysisConfig::with_metrics(StrengthMetrics::NONE));
        assert_eq!(graph.edges[0].style.thickness, UNWEIGHTED_THICKNESS);
        assert_eq!(graph.nodes[0].position, pos2(10.0, 20.0));
    }

    #[test]
    fn carry_positions_only_fills_known_ids() {
        let config = AnalysisConfig::default();
        let mut prior = build_graph(&speakers(&["a", "b"]), &[], &config);
        prior.nodes[0].position = pos2(1.0, 2.0);
        prior.nodes[1].position = pos2(3.0, 4.0);

        let mut next = build_graph(&speakers(&["b", "c"]), &[], &config);
        let unplaced = next.carry_positions_from(&prior.nodes);

        assert_eq!(unplaced, 1);
        assert_eq!(next.nodes[0].position, pos2(3.0, 4.0));
        assert!(next.nodes[1].is_unplaced());
        assert!(next.needs_layout());
    }
}
