//! Debug drawing primitives
//!
//! The octree emits wireframe boxes as batches of colored line segments.
//! [`DebugLineBatch`] collects them into a flat, GPU-uploadable buffer.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Vec3, Vec4};
use crate::geometry::Aabb;

/// Per-depth wireframe colors (RGBA), indexed by `depth % 8`
pub const DEPTH_PALETTE: [[f32; 4]; 8] = [
    [0.0, 1.0, 0.0, 1.0], // green
    [0.2, 0.8, 1.0, 1.0], // sky blue
    [1.0, 0.6, 0.1, 1.0], // orange
    [1.0, 0.0, 0.0, 1.0], // red
    [0.6, 0.0, 1.0, 1.0], // purple
    [1.0, 1.0, 0.0, 1.0], // yellow
    [0.0, 0.5, 1.0, 1.0], // blue
    [1.0, 0.0, 1.0, 1.0], // pink
];

/// Corner index pairs of the 12 box edges (see [`Aabb::corners`])
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Wireframe color for a node at `depth`
pub fn depth_color(depth: u32) -> Vec4 {
    Vec4::from(DEPTH_PALETTE[depth as usize % DEPTH_PALETTE.len()])
}

/// Line segment with a color, laid out for direct upload as vertex data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DebugLine {
    /// Start point
    pub start: [f32; 3],
    /// End point
    pub end: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
}

impl DebugLine {
    /// Create a line segment from math types
    pub fn new(start: Vec3, end: Vec3, color: Vec4) -> Self {
        Self {
            start: [start.x, start.y, start.z],
            end: [end.x, end.y, end.z],
            color: [color.x, color.y, color.z, color.w],
        }
    }
}

/// The 12 edges of `bounds` as line segments
pub fn wireframe_box(bounds: &Aabb, color: Vec4) -> [DebugLine; 12] {
    let corners = bounds.corners();
    BOX_EDGES.map(|(a, b)| DebugLine::new(corners[a], corners[b], color))
}

/// Anything that can accept batches of debug lines
pub trait LineRenderer {
    /// Queue a batch of line segments for drawing
    fn add_lines(&mut self, lines: &[DebugLine]);
}

/// Line collector that keeps everything in one contiguous buffer
#[derive(Debug, Clone)]
pub struct DebugLineBatch {
    lines: Vec<DebugLine>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugLineBatch {
    /// Create an empty, enabled batch
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            enabled: true,
        }
    }

    /// All collected lines
    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    /// Number of collected lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines have been collected
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw bytes of the line buffer, ready for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }

    /// Drop all collected lines (call once per frame)
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for DebugLineBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRenderer for DebugLineBatch {
    fn add_lines(&mut self, lines: &[DebugLine]) {
        if !self.enabled {
            return;
        }
        self.lines.extend_from_slice(lines);
    }
}
