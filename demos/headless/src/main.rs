use std::time::Duration;

use pose_stack::{
    Vector3,
    config::SessionConfig,
    crane::CraneController,
    data_structures::{bounds::Aabb, instance::Instance, scene_graph::SceneNode},
    factory::BlockFactory,
    input::{Action, Input},
    pose::PosePreview,
    physics::SimpleGravity,
    session::{GameEvent, Session, build_driver},
};

/// Plays both sides: drifts the crane sideways, switching direction and arm
/// pose every turn, and drops once it has travelled for a while.
struct Autopilot {
    frame: u32,
    drop_every: u32,
    direction: Action,
    bend: bool,
}

impl Autopilot {
    fn advance(&mut self) {
        self.frame += 1;
        if self.frame % self.drop_every == 0 {
            self.direction = match self.direction {
                Action::MoveLeft => Action::MoveRight,
                _ => Action::MoveLeft,
            };
            self.bend = !self.bend;
        }
    }
}

impl Input for Autopilot {
    fn is_held(&self, action: Action) -> bool {
        action == self.direction || (self.bend && action == Action::BoneIncrease(2))
    }

    fn just_pressed(&self, action: Action) -> bool {
        action == Action::Drop && self.frame % self.drop_every == self.drop_every - 1
    }

    fn end_frame(&mut self) {
        self.advance();
    }
}

fn mesh() -> Aabb {
    Aabb::from_center_size(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.4, 0.4, 0.4))
}

fn figure(name: &str) -> SceneNode {
    let bone = |name: &str, x: f32, y: f32| {
        SceneNode::new(name)
            .with_local(Instance::from(Vector3::new(x, y, 0.0)))
            .with_mesh(mesh())
    };
    SceneNode::new(name).with_child(
        bone("Hips", 0.0, 0.0).with_child(
            bone("Spine", 0.0, 0.5)
                .with_child(bone("LeftUpperArm", -0.4, 0.3).with_child(bone("LeftLowerArm", -0.4, 0.0)))
                .with_child(
                    bone("RightUpperArm", 0.4, 0.3).with_child(bone("RightLowerArm", 0.4, 0.0)),
                ),
        ),
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let session = Session::new().with_pose(figure("PosePreview"));
    let mut crane = CraneController::new(config.crane.clone())
        .with_factory(BlockFactory::new(config.body.clone()).with_template(figure("Figure")));
    if config.crane.spawn_point.is_none() {
        crane = crane.with_spawn_anchor(Vector3::new(0.0, 6.0, 0.0));
    }
    let simulator = SimpleGravity::new(config.physics.gravity, config.physics.ground);
    let mut driver = build_driver(
        &config,
        session,
        crane,
        simulator,
        Some(PosePreview::humanoid()),
    );

    let mut input = Autopilot {
        frame: 0,
        drop_every: 120,
        direction: Action::MoveRight,
        bend: false,
    };
    let frames = driver.run_frames(
        &mut input,
        Duration::from_millis(16),
        20_000,
        |state| state.turn.is_game_over(),
    );

    for event in driver.drain_events() {
        if let GameEvent::GameOver { loser } = event {
            log::info!("game over after {} frames: {} lost", frames, loser);
        }
    }
    let state = driver.state();
    println!(
        "{} blocks placed in {} turns, loser: {}",
        state.scene.len(),
        state.turn.turns_taken(),
        state
            .turn
            .loser()
            .map_or_else(|| "nobody".to_string(), |p| p.to_string())
    );
    Ok(())
}
