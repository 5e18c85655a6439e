//! The shared state every flow works on, and the events they exchange.

use crate::{
    config::SessionConfig,
    crane::CraneController,
    data_structures::{
        block::{BlockId, Scene},
        scene_graph::SceneNode,
    },
    flow::{Flow, FrameDriver},
    lose::LoseWatchFlow,
    physics::{PhysicsFlow, SimpleGravity, Simulator},
    pose::PosePreview,
    turn::{PlayerId, TurnState},
};

/// State of one game, from the first spawn to game over.
#[derive(Debug, Default)]
pub struct Session {
    pub scene: Scene,
    pub turn: TurnState,
    /// The live skeleton whose pose is stamped onto every new block.
    pub pose: Option<SceneNode>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pose(mut self, mut pose: SceneNode) -> Self {
        pose.update_world_transform_all();
        self.pose = Some(pose);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A new controllable block is in the scene.
    Spawned(BlockId),
    /// The block was handed to the simulator.
    Dropped(BlockId),
    /// The dropped block came to rest.
    Settled(BlockId),
    TurnPassed(PlayerId),
    GameOver { loser: PlayerId },
}

/// Wires the standard flows in frame order: optional pose preview, crane,
/// physics, lose watch.
pub fn build_driver<Sim: Simulator + 'static>(
    config: &SessionConfig,
    session: Session,
    crane: CraneController,
    simulator: Sim,
    pose_preview: Option<PosePreview>,
) -> FrameDriver<Session, GameEvent> {
    let mut flows: Vec<Box<dyn Flow<Session, GameEvent>>> = Vec::new();
    if let Some(preview) = pose_preview {
        flows.push(Box::new(preview));
    }
    flows.push(Box::new(crane));
    flows.push(Box::new(PhysicsFlow::new(simulator)));
    flows.push(Box::new(LoseWatchFlow::new(config.lose.floor)));
    FrameDriver::new(session, flows)
}

/// [`build_driver`] with the bundled simulator configured from `config`.
pub fn build_default_driver(
    config: &SessionConfig,
    session: Session,
    crane: CraneController,
) -> FrameDriver<Session, GameEvent> {
    let simulator = SimpleGravity::new(config.physics.gravity, config.physics.ground);
    build_driver(config, session, crane, simulator, None)
}
