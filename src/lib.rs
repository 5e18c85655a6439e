//! pose-stack
//!
//! Frame-driven simulation core of a two-player stacking game. A crane moves a
//! kinematic block that carries a player-made pose, drops it into a rigid-body
//! simulation, passes the turn and spawns the next block once the stack has
//! settled. A block falling off the stack loses the game for the player on turn.
//!
//! High-level modules
//! - `config`: tunables with defaults and TOML loading
//! - `crane`: the crane state machine (move, rotate, drop, respawn)
//! - `data_structures`: transforms, bounds, scene graphs and blocks
//! - `error`: the crate's error type
//! - `factory`: building posed, physics-ready blocks from a template
//! - `flow`: frame-driven gameplay units and the loop that runs them
//! - `input`: logical actions and the keyboard source
//! - `lose`: the out-of-bounds lose condition
//! - `physics`: rigid bodies and the simulator seam
//! - `pose`: copying and editing skeleton poses
//! - `session`: shared game state, events and driver wiring
//! - `turn`: whose turn it is and whether the game is over
//!

pub mod config;
pub mod crane;
pub mod data_structures;
pub mod error;
pub mod factory;
pub mod flow;
pub mod input;
pub mod lose;
pub mod physics;
pub mod pose;
pub mod session;
pub mod turn;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::WindowEvent;
pub use winit::keyboard::KeyCode;
