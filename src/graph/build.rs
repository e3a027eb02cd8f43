use tracing::{debug, warn};

use super::style::style_edge;
use super::{Edge, Node, SpeakerGraph, assign_weighted_degrees, index_by_id};
use crate::session::{AnalysisConfig, Interaction, Speaker};

fn edge_id(index: usize, interaction: &Interaction) -> String {
    format!(
        "{}->{}#{index}",
        interaction.from_speaker_id, interaction.to_speaker_id
    )
}

pub fn build_graph(
    speakers: &[Speaker],
    interactions: &[Interaction],
    config: &AnalysisConfig,
) -> SpeakerGraph {
    let mut nodes = speakers.iter().cloned().map(Node::new).collect::<Vec<_>>();

    let known = index_by_id(&nodes);
    let mut edges = Vec::with_capacity(interactions.len());
    let mut dropped = 0usize;

    for (index, interaction) in interactions.iter().enumerate() {
        let from_known = known.contains_key(interaction.from_speaker_id.as_str());
        let to_known = known.contains_key(interaction.to_speaker_id.as_str());
        if !from_known || !to_known {
            warn!(
                interaction = index,
                from = %interaction.from_speaker_id,
                to = %interaction.to_speaker_id,
                from_known,
                to_known,
                "dropping interaction that references an unknown speaker"
            );
            dropped += 1;
            continue;
        }

        edges.push(Edge {
            id: edge_id(index, interaction),
            source: interaction.from_speaker_id.clone(),
            target: interaction.to_speaker_id.clone(),
            style: style_edge(interaction, config),
            interaction: interaction.clone(),
        });
    }

    assign_weighted_degrees(&mut nodes, &edges);

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped,
        "built speaker graph"
    );

    SpeakerGraph { nodes, edges }
}
