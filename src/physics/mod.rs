mod cancel;
mod forces;

use std::time::Instant;

use emath::{Pos2, Vec2};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::graph::{Edge, Node, index_by_id, weighted_degrees};
use crate::settings::{SimulationSettings, Viewport};
use forces::{
    Link, apply_center, apply_charge, apply_links, assign_link_bias, charge_strength, phyllotaxis,
};

pub use cancel::{CancelGuard, GenerationToken};

const ALPHA_MIN: f32 = 0.001;
const VELOCITY_DECAY: f32 = 0.4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout for generation {generation} was superseded after {ticks} ticks")]
    Cancelled { generation: u64, ticks: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRun {
    pub nodes: Vec<Node>,
    pub ticks_run: usize,
    pub converged_early: bool,
}

fn alpha_decay() -> f32 {
    1.0 - ALPHA_MIN.powf(1.0 / crate::settings::DEFAULT_ITERATIONS as f32)
}

pub fn force_layout(
    nodes: &[Node],
    edges: &[Edge],
    viewport: Viewport,
    settings: &SimulationSettings,
) -> LayoutRun {
    match simulate(nodes, edges, viewport, settings, None) {
        Ok(run) => run,
        Err(LayoutError::Cancelled { .. }) => unreachable!("run without a guard cannot be cancelled"),
    }
}

pub fn force_layout_cancellable(
    nodes: &[Node],
    edges: &[Edge],
    viewport: Viewport,
    settings: &SimulationSettings,
    guard: &CancelGuard,
) -> Result<LayoutRun, LayoutError> {
    let mut check = || guard.is_stale();
    let is_stale: &mut dyn FnMut() -> bool = &mut check;
    simulate(
        nodes,
        edges,
        viewport,
        settings,
        Some((guard.generation(), is_stale)),
    )
}

fn simulate(
    nodes: &[Node],
    edges: &[Edge],
    viewport: Viewport,
    settings: &SimulationSettings,
    mut stale_check: Option<(u64, &mut dyn FnMut() -> bool)>,
) -> Result<LayoutRun, LayoutError> {
    let started = Instant::now();
    let node_count = nodes.len();

    let degrees = weighted_degrees(nodes, edges);
    let mut out_nodes = nodes.to_vec();
    for (node, degree) in out_nodes.iter_mut().zip(&degrees) {
        node.weighted_degree = *degree;
    }
    if node_count == 0 {
        return Ok(LayoutRun {
            nodes: out_nodes,
            ticks_run: 0,
            converged_early: false,
        });
    }

    let mut positions = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            if node.is_unplaced() {
                Pos2::ZERO + phyllotaxis(index)
            } else {
                node.position
            }
        })
        .collect::<Vec<_>>();
    let mut velocities = vec![Vec2::ZERO; node_count];

    let index = index_by_id(nodes);
    let mut links = edges
        .iter()
        .filter(|edge| !edge.is_self_loop())
        .filter_map(|edge| {
            let source = *index.get(edge.source.as_str())?;
            let target = *index.get(edge.target.as_str())?;
            Some(Link::new(source, target, edge.weight()))
        })
        .collect::<Vec<_>>();
    assign_link_bias(&mut links, node_count);

    let strengths = degrees
        .iter()
        .map(|degree| charge_strength(*degree))
        .collect::<Vec<_>>();

    let center = viewport.center();
    let decay = alpha_decay();
    let check_interval = settings.cancel_check_interval.max(1);
    let mut alpha = 1.0_f32;
    let mut ticks_run = 0usize;
    let mut converged_early = false;

    for tick in 0..settings.iterations {
        if tick % check_interval == 0
            && let Some((generation, is_stale)) = stale_check.as_mut()
            && is_stale()
        {
            let generation = *generation;
            debug!(generation, tick, "layout cancelled");
            return Err(LayoutError::Cancelled {
                generation,
                ticks: tick,
            });
        }

        alpha -= alpha * decay;

        if !links.is_empty() {
            apply_links(&links, &positions, &mut velocities, alpha, tick);
        }
        apply_charge(&strengths, &positions, &mut velocities, alpha, tick);
        apply_center(&mut positions, center);

        let mut max_step_sq = 0.0_f32;
        for (position, velocity) in positions.iter_mut().zip(velocities.iter_mut()) {
            *velocity *= 1.0 - VELOCITY_DECAY;
            *position += *velocity;
            max_step_sq = max_step_sq.max(velocity.length_sq());
        }
        ticks_run = tick + 1;

        if let Some(threshold) = settings.stop_on_displacement
            && max_step_sq < threshold * threshold
        {
            converged_early = ticks_run < settings.iterations;
            break;
        }
    }

    if node_count == 1 {
        positions[0] = center;
    }

    for (node, position) in out_nodes.iter_mut().zip(positions) {
        node.position = position;
    }

    debug!(
        nodes = node_count,
        links = links.len(),
        ticks = ticks_run,
        converged_early,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "force layout finished"
    );

    Ok(LayoutRun {
        nodes: out_nodes,
        ticks_run,
        converged_early,
    })
}
