//! Force-directed layout for the character relationship graph
//!
//! Nodes start evenly spaced on a circle (so the result depends only on node
//! order), then a fixed number of steps apply pairwise repulsion `k²/d`, a weak
//! spring `d²/k` along each edge and a pull toward the canvas center. Forces are
//! scaled by a temperature that falls linearly to zero; velocity is damped and
//! positions are clamped inside the padded canvas.

use std::collections::HashSet;
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Scale applied to the ideal edge length `sqrt(area / n)`
const K_SCALE: f32 = 0.75;

/// Guard against division by ~0 when nodes overlap
const MIN_DISTANCE: f32 = 0.01;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphLayoutConfig {
    pub width: f32,
    pub height: f32,
    pub iterations: usize,
    pub padding: f32,
    /// Velocity retained per step (0..=1)
    pub damping: f32,
    pub gravity: f32,
}

impl Default for GraphLayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            iterations: 300,
            padding: 40.0,
            damping: 0.85,
            gravity: 0.02,
        }
    }
}

impl GraphLayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.width, self.height, self.padding, self.damping, self.gravity]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid("graph values must be finite".into()));
        }
        if self.padding < 0.0
            || self.width <= 2.0 * self.padding
            || self.height <= 2.0 * self.padding
        {
            return Err(ConfigError::Invalid(format!(
                "graph canvas {}x{} too small for padding {}",
                self.width, self.height, self.padding
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::Invalid(format!(
                "graph damping {} outside 0..=1",
                self.damping
            )));
        }
        Ok(())
    }
}

/// Final position of one node
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Undirected edges with `(a, b)` and `(b, a)` counted once
///
/// Self-loops and out-of-range indices are dropped; first-seen order is kept.
pub fn dedupe_edges(edges: &[(usize, usize)], node_count: usize) -> Vec<(usize, usize)> {
    let mut seen = HashSet::new();
    edges
        .iter()
        .filter(|(a, b)| a != b && *a < node_count && *b < node_count)
        .map(|&(a, b)| (a.min(b), a.max(b)))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// Evenly spaced start positions, node 0 at the top
fn initial_positions(n: usize, config: &GraphLayoutConfig) -> Vec<(f32, f32)> {
    let cx = config.width / 2.0;
    let cy = config.height / 2.0;
    if n == 1 {
        return vec![(cx, cy)];
    }
    let radius = (config.width.min(config.height) / 2.0 - config.padding).max(0.0) * 0.8;
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / n as f32 - PI / 2.0;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Lay out `nodes` connected by `edges` (indices into `nodes`)
pub fn layout_graph(
    nodes: &[String],
    edges: &[(usize, usize)],
    config: &GraphLayoutConfig,
) -> Vec<NodePosition> {
    let n = nodes.len();
    if n == 0 {
        return Vec::new();
    }
    let fallback;
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("{}; using default graph layout config", e);
            fallback = GraphLayoutConfig::default();
            &fallback
        }
    };
    let edges = dedupe_edges(edges, n);
    let mut pos = initial_positions(n, config);
    let mut vel = vec![(0.0f32, 0.0f32); n];

    let (min_x, max_x) = (config.padding, config.width - config.padding);
    let (min_y, max_y) = (config.padding, config.height - config.padding);
    let (cx, cy) = (config.width / 2.0, config.height / 2.0);
    let area = (max_x - min_x) * (max_y - min_y);
    let k = K_SCALE * (area / n as f32).sqrt();
    let max_step = config.width.min(config.height) / 10.0;

    for iter in 0..config.iterations {
        let temperature = 1.0 - iter as f32 / config.iterations as f32;
        let mut force = vec![(0.0f32, 0.0f32); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (mut dx, mut dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
                if dx == 0.0 && dy == 0.0 {
                    // coincident nodes: push apart along a fixed axis
                    dx = MIN_DISTANCE;
                    dy = MIN_DISTANCE * (j - i) as f32;
                }
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let f = k * k / dist;
                let (fx, fy) = (dx / dist * f, dy / dist * f);
                force[i].0 += fx;
                force[i].1 += fy;
                force[j].0 -= fx;
                force[j].1 -= fy;
            }
        }

        for &(a, b) in &edges {
            let (dx, dy) = (pos[a].0 - pos[b].0, pos[a].1 - pos[b].1);
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let f = dist * dist / k;
            let (fx, fy) = (dx / dist * f, dy / dist * f);
            force[a].0 -= fx;
            force[a].1 -= fy;
            force[b].0 += fx;
            force[b].1 += fy;
        }

        let pull = config.gravity * k / 10.0;
        for i in 0..n {
            let fx = (force[i].0 + (cx - pos[i].0) * pull) * temperature;
            let fy = (force[i].1 + (cy - pos[i].1) * pull) * temperature;

            let mut vx = (vel[i].0 + fx) * config.damping;
            let mut vy = (vel[i].1 + fy) * config.damping;
            let speed = (vx * vx + vy * vy).sqrt();
            if speed > max_step {
                vx = vx / speed * max_step;
                vy = vy / speed * max_step;
            }
            vel[i] = (vx, vy);
            pos[i].0 = (pos[i].0 + vx).clamp(min_x, max_x);
            pos[i].1 = (pos[i].1 + vy).clamp(min_y, max_y);
        }
    }

    log::debug!(
        "laid out {} nodes / {} edges in {} iterations",
        n,
        edges.len(),
        config.iterations
    );

    nodes
        .iter()
        .zip(pos)
        .map(|(id, (x, y))| NodePosition {
            id: id.clone(),
            x,
            y,
        })
        .collect()
}
