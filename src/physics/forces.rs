use emath::{Pos2, Vec2, vec2};

const DISTANCE_MIN_SQ: f32 = 1.0;
const JIGGLE_SCALE: f32 = 1e-6;

pub(super) const LINK_BASE_DISTANCE: f32 = 200.0;
pub(super) const LINK_MIN_DISTANCE: f32 = 100.0;
pub(super) const LINK_BASE_STRENGTH: f32 = 0.3;
pub(super) const LINK_MAX_STRENGTH: f32 = 0.8;
pub(super) const CHARGE_BASE_STRENGTH: f32 = -400.0;
pub(super) const CHARGE_PER_DEGREE: f32 = -50.0;

// Tiny deterministic offset for coincident points.
fn jiggle(seed: usize) -> f32 {
    let fraction = (seed as f32 * 0.618_034 + 0.37).fract();
    (fraction - 0.5) * JIGGLE_SCALE
}

pub(super) fn link_distance(weight: f32) -> f32 {
    (LINK_BASE_DISTANCE - weight * 10.0).max(LINK_MIN_DISTANCE)
}

pub(super) fn link_strength(weight: f32) -> f32 {
    (LINK_BASE_STRENGTH + weight * 0.05).min(LINK_MAX_STRENGTH)
}

pub(super) fn charge_strength(weighted_degree: f32) -> f32 {
    CHARGE_BASE_STRENGTH + weighted_degree * CHARGE_PER_DEGREE
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Link {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) distance: f32,
    pub(super) strength: f32,
    // Share of the correction taken by the target; the lighter endpoint moves more.
    pub(super) bias: f32,
}

impl Link {
    pub(super) fn new(source: usize, target: usize, weight: f32) -> Self {
        Self {
            source,
            target,
            distance: link_distance(weight),
            strength: link_strength(weight),
            bias: 0.5,
        }
    }
}

pub(super) fn assign_link_bias(links: &mut [Link], node_count: usize) {
    let mut link_counts = vec![0usize; node_count];
    for link in links.iter() {
        link_counts[link.source] += 1;
        link_counts[link.target] += 1;
    }
    for link in links.iter_mut() {
        let source = link_counts[link.source] as f32;
        let target = link_counts[link.target] as f32;
        link.bias = source / (source + target);
    }
}

pub(super) fn apply_links(
    links: &[Link],
    positions: &[Pos2],
    velocities: &mut [Vec2],
    alpha: f32,
    tick: usize,
) {
    for (index, link) in links.iter().enumerate() {
        let (source, target) = (link.source, link.target);
        let mut delta =
            (positions[target] + velocities[target]) - (positions[source] + velocities[source]);
        if delta.x == 0.0 {
            delta.x = jiggle(tick + index);
        }
        if delta.y == 0.0 {
            delta.y = jiggle(tick + index + 1);
        }

        let length = delta.length();
        let scale = (length - link.distance) / length * alpha * link.strength;
        let correction = delta * scale;

        velocities[target] -= correction * link.bias;
        velocities[source] += correction * (1.0 - link.bias);
    }
}

pub(super) fn apply_charge(
    strengths: &[f32],
    positions: &[Pos2],
    velocities: &mut [Vec2],
    alpha: f32,
    tick: usize,
) {
    let node_count = positions.len();
    for index in 0..node_count {
        let mut pull = Vec2::ZERO;
        for other in 0..node_count {
            if other == index {
                continue;
            }

            let mut delta = positions[other] - positions[index];
            let mut distance_sq = delta.length_sq();
            if delta.x == 0.0 {
                delta.x = jiggle(tick + index * node_count + other);
                distance_sq += delta.x * delta.x;
            }
            if delta.y == 0.0 {
                delta.y = jiggle(tick + other * node_count + index);
                distance_sq += delta.y * delta.y;
            }
            if distance_sq < DISTANCE_MIN_SQ {
                distance_sq = (DISTANCE_MIN_SQ * distance_sq).sqrt();
            }

            pull += delta * (strengths[other] * alpha / distance_sq);
        }
        velocities[index] += pull;
    }
}

pub(super) fn apply_center(positions: &mut [Pos2], center: Pos2) {
    if positions.is_empty() {
        return;
    }

    let mut sum = Vec2::ZERO;
    for position in positions.iter() {
        sum += position.to_vec2();
    }
    let centroid = sum / positions.len() as f32;
    let shift = centroid - center.to_vec2();
    for position in positions.iter_mut() {
        *position -= shift;
    }
}

pub(super) fn phyllotaxis(index: usize) -> Vec2 {
    const INITIAL_RADIUS: f32 = 10.0;
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(radius * angle.cos(), radius * angle.sin())
}
