//! Deterministic force-directed graph layout.
//!
//! Links act as springs toward a preferred length, nodes closer than a
//! minimum separation push each other apart, and a weak gravity keeps
//! disconnected components near the origin. Velocities are integrated with
//! damping over a fixed number of steps, so the same graph always produces
//! the same coordinates.

mod viewport;

pub use viewport::Viewport;

use crate::config::LayoutSettings;
use crate::models::{GraphData, MemoryId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Golden angle in radians, for the initial spiral.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Computed node positions keyed by node id.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Layout {
    positions: BTreeMap<MemoryId, Point>,
}

impl Layout {
    /// Position of a node.
    #[must_use]
    pub fn get(&self, id: &MemoryId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Iterates positions in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemoryId, Point)> {
        self.positions.iter().map(|(id, p)| (id, *p))
    }

    /// Number of positioned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if nothing is positioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounding box as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.positions.values();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// Spring-damper layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLayout {
    /// Simulation steps.
    pub iterations: usize,
    /// Preferred link length.
    pub target_distance: f64,
    /// Link spring stiffness.
    pub spring_k: f64,
    /// Velocity damping.
    pub damping: f64,
    /// Spacing below which nodes repel.
    pub min_separation: f64,
    /// Repulsion strength per unit of overlap.
    pub repulsion_k: f64,
    /// Pull toward the origin.
    pub gravity: f64,
    /// Velocity clamp.
    pub max_speed: f64,
    /// Displacement clamp per step.
    pub max_step: f64,
    /// Integration time step in seconds.
    pub dt: f64,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            iterations: 400,
            target_distance: 120.0,
            spring_k: 4.0,
            damping: 6.0,
            min_separation: 90.0,
            repulsion_k: 10.0,
            gravity: 0.5,
            max_speed: 600.0,
            max_step: 5.0,
            dt: 1.0 / 30.0,
        }
    }
}

impl ForceLayout {
    /// Applies `[layout]` settings over the defaults.
    #[must_use]
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self {
            iterations: settings.iterations,
            target_distance: settings.target_distance,
            min_separation: settings.min_separation,
            ..Self::default()
        }
    }

    /// Computes positions for every node in `graph`.
    ///
    /// Links whose endpoints are unknown, and self-links, are ignored.
    #[must_use]
    pub fn compute(&self, graph: &GraphData) -> Layout {
        let n = graph.nodes.len();
        let index: HashMap<&MemoryId, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (&node.id, i))
            .collect();
        let edges: Vec<(usize, usize)> = graph
            .links
            .iter()
            .filter_map(|l| Some((*index.get(&l.source)?, *index.get(&l.target)?)))
            .filter(|(a, b)| a != b)
            .collect();

        let mut pos = self.seed(n);
        let mut vel = vec![Point::default(); n];

        for _ in 0..self.iterations {
            let mut force = vec![Point::default(); n];

            for &(a, b) in &edges {
                let (dx, dy) = (pos[b].x - pos[a].x, pos[b].y - pos[a].y);
                let dist = dx.hypot(dy);
                if dist > 1e-6 {
                    let f = self.spring_k * (dist - self.target_distance) / dist;
                    force[a].x += dx * f;
                    force[a].y += dy * f;
                    force[b].x -= dx * f;
                    force[b].y -= dy * f;
                }
            }

            for a in 0..n {
                for b in (a + 1)..n {
                    let (dx, dy) = (pos[b].x - pos[a].x, pos[b].y - pos[a].y);
                    let dist = dx.hypot(dy);
                    if dist > 1e-6 && dist < self.min_separation {
                        let f = self.repulsion_k * (self.min_separation - dist) / dist;
                        force[a].x -= dx * f;
                        force[a].y -= dy * f;
                        force[b].x += dx * f;
                        force[b].y += dy * f;
                    }
                }
                force[a].x -= pos[a].x * self.gravity;
                force[a].y -= pos[a].y * self.gravity;
            }

            for i in 0..n {
                let v = &mut vel[i];
                v.x += (force[i].x - v.x * self.damping) * self.dt;
                v.y += (force[i].y - v.y * self.damping) * self.dt;
                let speed = v.x.hypot(v.y);
                if speed > self.max_speed {
                    v.x *= self.max_speed / speed;
                    v.y *= self.max_speed / speed;
                }

                let (mut sx, mut sy) = (v.x * self.dt, v.y * self.dt);
                let step = sx.hypot(sy);
                if step > self.max_step {
                    sx *= self.max_step / step;
                    sy *= self.max_step / step;
                }
                pos[i].x += sx;
                pos[i].y += sy;
            }
        }

        Layout {
            positions: graph
                .nodes
                .iter()
                .zip(pos)
                .map(|(node, p)| (node.id.clone(), p))
                .collect(),
        }
    }

    /// Initial positions on a golden-angle spiral.
    #[allow(clippy::cast_precision_loss)]
    fn seed(&self, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let radius = self.min_separation * 0.5 * ((i + 1) as f64).sqrt();
                let angle = i as f64 * GOLDEN_ANGLE;
                Point::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }
}
