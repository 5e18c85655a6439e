use std::collections::HashSet;

use std::time::Duration;
use pose_stack::{
    Deg, Quaternion, Rotation3, Vector3,
    config::SessionConfig,
    crane::CraneController,
    data_structures::{
        block::Block,
        bounds::{Aabb, BoxCollider},
        instance::Instance,
        scene_graph::SceneNode,
    },
    factory::BlockFactory,
    flow::FrameDriver,
    input::{Action, Input},
    physics::Simulator,
    session::{GameEvent, Session, build_driver},
};

/// Input whose state is set directly by the test.
#[derive(Default)]
pub(crate) struct ScriptedInput {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Pressed for exactly the next frame.
    pub fn tap(&mut self, action: Action) {
        self.pressed.insert(action);
    }
}

impl Input for ScriptedInput {
    fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action) || self.pressed.contains(&action)
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

/// Leaves every body where it is. Tests move bodies by hand.
pub(crate) struct Frozen;

impl Simulator for Frozen {
    fn step(&mut self, _: &mut [Block], _: Duration) {}
}

pub(crate) fn yaw(deg: f32) -> Quaternion<f32> {
    Quaternion::from_angle_y(Deg(deg))
}

pub(crate) fn pitch(deg: f32) -> Quaternion<f32> {
    Quaternion::from_angle_x(Deg(deg))
}

pub(crate) fn bone(name: &str, offset: Vector3<f32>) -> SceneNode {
    SceneNode::new(name).with_local(Instance::from(offset))
}

pub(crate) fn unit_mesh() -> Aabb {
    Aabb::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
}

/// Small humanoid rig: hips > spine > arms, each with a unit mesh.
pub(crate) fn skeleton(root_name: &str) -> SceneNode {
    let arm = |side: &str, x: f32| {
        bone(&format!("{side}UpperArm"), Vector3::new(x, 0.5, 0.0))
            .with_mesh(unit_mesh())
            .with_child(
                bone(&format!("{side}LowerArm"), Vector3::new(x, 0.0, 0.0)).with_mesh(unit_mesh()),
            )
    };
    SceneNode::new(root_name).with_child(
        bone("Hips", Vector3::new(0.0, 0.0, 0.0))
            .with_mesh(unit_mesh())
            .with_child(
                bone("Spine", Vector3::new(0.0, 1.0, 0.0))
                    .with_mesh(unit_mesh())
                    .with_child(arm("Left", -1.0))
                    .with_child(arm("Right", 1.0)),
            ),
    )
}

/// Template that also carries stray colliders the factory must strip.
pub(crate) fn block_template() -> SceneNode {
    let mut template = skeleton("PosePreview");
    template.colliders.push(BoxCollider {
        center: Vector3::new(9.0, 9.0, 9.0),
        size: Vector3::new(1.0, 1.0, 1.0),
    });
    if let Some(spine) = template.find_mut("Spine") {
        spine.colliders.push(BoxCollider {
            center: Vector3::new(0.0, 0.0, 0.0),
            size: Vector3::new(0.1, 0.1, 0.1),
        });
    }
    template
}

pub(crate) fn crane_at(config: &SessionConfig, anchor: Vector3<f32>) -> CraneController {
    CraneController::new(config.crane.clone())
        .with_factory(BlockFactory::new(config.body.clone()).with_template(block_template()))
        .with_spawn_anchor(anchor)
}

/// Driver with a crane spawning at `anchor` and bodies that never move on their own.
pub(crate) fn frozen_driver(
    config: &SessionConfig,
    anchor: Vector3<f32>,
) -> FrameDriver<Session, GameEvent> {
    let session = Session::new().with_pose(skeleton("PosePreview"));
    build_driver(config, session, crane_at(config, anchor), Frozen, None)
}

pub(crate) fn active_block(driver: &FrameDriver<Session, GameEvent>) -> &Block {
    let scene = &driver.state().scene;
    scene
        .blocks()
        .iter()
        .rev()
        .find(|block| block.is_kinematic())
        .expect("a controllable block")
}

pub(crate) fn last_block_mut(driver: &mut FrameDriver<Session, GameEvent>) -> &mut Block {
    driver
        .state_mut()
        .scene
        .blocks_mut()
        .last_mut()
        .expect("at least one block")
}

pub(crate) fn count<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

pub(crate) fn assert_vec_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    let eps = 1e-4;
    assert!(
        (actual.x - expected.x).abs() < eps
            && (actual.y - expected.y).abs() < eps
            && (actual.z - expected.z).abs() < eps,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub(crate) fn assert_quat_close(actual: Quaternion<f32>, expected: Quaternion<f32>) {
    // q and -q are the same rotation
    let dot = actual.s * expected.s
        + actual.v.x * expected.v.x
        + actual.v.y * expected.v.y
        + actual.v.z * expected.v.z;
    assert!(
        (dot.abs() - 1.0).abs() < 1e-4,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub(crate) const FRAME: Duration = Duration::from_millis(100);
