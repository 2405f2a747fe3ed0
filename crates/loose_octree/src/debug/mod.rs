//! Debug module for visualization and debugging tools
//!
//! Line-based output that a renderer can consume to draw the octree.

pub mod draw;

pub use draw::{depth_color, wireframe_box, DebugLine, DebugLineBatch, LineRenderer, DEPTH_PALETTE};
