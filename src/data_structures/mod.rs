//! Game data structures: transforms, bounds, scene graphs, and blocks.
//!
//! - `instance` holds per-node position, rotation and scale
//! - `bounds` has axis-aligned boxes and box colliders
//! - `scene_graph` enables hierarchical, named node organization
//! - `block` is a spawned stack piece plus the scene that owns all of them

pub mod block;
pub mod bounds;
pub mod instance;
pub mod scene_graph;
