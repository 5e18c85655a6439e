//! Copying and editing skeleton poses.
//!
//! A pose is nothing but the local rotations of named bones. New blocks are
//! stamped with the pose of a live skeleton ([`copy_local_orientations`]); the
//! players edit that skeleton with [`PosePreview`] before a block is spawned.

use std::collections::{HashMap, HashSet};

use instant::Duration;

use cgmath::{Deg, One};
use log::debug;

use crate::{
    data_structures::scene_graph::SceneNode,
    flow::{Flow, Out},
    input::{Action, Input},
    session::{GameEvent, Session},
};

/// Name based correspondence between the nodes of two hierarchies.
///
/// Both hierarchies are flattened in pre-order (inactive nodes included). For
/// every destination index the map stores the source index with the same
/// name. When a name occurs more than once in a hierarchy, the first node in
/// traversal order wins on that side; later duplicates are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoseMap {
    source_for: Vec<Option<usize>>,
}

impl PoseMap {
    pub fn new(source: &SceneNode, destination: &SceneNode) -> Self {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (idx, node) in source.descendants().into_iter().enumerate() {
            by_name.entry(node.name.as_str()).or_insert(idx);
        }
        let mut claimed: HashSet<&str> = HashSet::new();
        let source_for = destination
            .descendants()
            .into_iter()
            .map(|node| {
                let name = node.name.as_str();
                if !claimed.insert(name) {
                    return None;
                }
                by_name.get(name).copied()
            })
            .collect();
        Self { source_for }
    }

    /// Number of destination nodes that receive a rotation.
    pub fn matched(&self) -> usize {
        self.source_for.iter().flatten().count()
    }

    /// Writes the matched source rotations onto `destination`.
    ///
    /// The hierarchies must have the shape the map was built from; extra
    /// destination nodes are skipped. Returns the number of rotations copied.
    pub fn apply(&self, source: &SceneNode, destination: &mut SceneNode) -> usize {
        let rotations: Vec<cgmath::Quaternion<f32>> = source
            .descendants()
            .into_iter()
            .map(|node| node.get_local_transform().rotation)
            .collect();
        let mut copied = 0;
        destination.for_each_mut(&mut |idx: usize, node: &mut SceneNode| {
            let Some(Some(src)) = self.source_for.get(idx) else {
                return;
            };
            if let Some(rotation) = rotations.get(*src) {
                node.local_transform_mut().rotation = *rotation;
                copied += 1;
            }
        });
        copied
    }
}

/// Copies each bone's local rotation from `source` onto the equally named bone
/// of `destination`. Unmatched names are skipped.
///
/// Returns the number of bones updated; 0 when either hierarchy is absent.
/// Cached world transforms of `destination` are left stale for the caller to
/// refresh from wherever the hierarchy is attached.
pub fn copy_local_orientations(
    source: Option<&SceneNode>,
    destination: Option<&mut SceneNode>,
) -> usize {
    let (Some(source), Some(destination)) = (source, destination) else {
        return 0;
    };
    PoseMap::new(source, destination).apply(source, destination)
}

/// One posable bone: while `decrease` / `increase` is held the bone turns
/// about its local `axis`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoneControl {
    pub bone: String,
    pub axis: cgmath::Vector3<f32>,
    pub decrease: Action,
    pub increase: Action,
}

impl BoneControl {
    pub fn new(bone: impl Into<String>, axis: cgmath::Vector3<f32>, slot: u8) -> Self {
        Self {
            bone: bone.into(),
            axis,
            decrease: Action::BoneDecrease(slot),
            increase: Action::BoneIncrease(slot),
        }
    }
}

/// Lets players bend the live pose skeleton held in [`Session::pose`].
pub struct PosePreview {
    controls: Vec<BoneControl>,
    /// Degrees per second.
    angle_speed: f32,
}

impl PosePreview {
    pub fn new(controls: Vec<BoneControl>, angle_speed: f32) -> Self {
        Self {
            controls,
            angle_speed,
        }
    }

    /// Arms, spine and hips of a humanoid rig, bound to the six slots of
    /// [`crate::input::KeyBindings::pose_preview`].
    pub fn humanoid() -> Self {
        let right = cgmath::Vector3::unit_x();
        let up = cgmath::Vector3::unit_y();
        Self::new(
            vec![
                BoneControl::new("RightUpperArm", right, 0),
                BoneControl::new("RightLowerArm", right, 1),
                BoneControl::new("LeftUpperArm", right, 2),
                BoneControl::new("LeftLowerArm", right, 3),
                BoneControl::new("Spine", right, 4),
                BoneControl::new("Hips", up, 5),
            ],
            90.0,
        )
    }

    pub fn controls(&self) -> &[BoneControl] {
        &self.controls
    }

    /// Applies one frame of input to `skeleton`.
    pub fn apply(&self, input: &dyn Input, skeleton: &mut SceneNode, dt: Duration) {
        let step = self.angle_speed * dt.as_secs_f32();
        for control in &self.controls {
            let Some(bone) = skeleton.find_mut(&control.bone) else {
                continue;
            };
            let local = bone.local_transform_mut();
            if input.is_held(control.decrease) {
                local.rotate_local(control.axis, Deg(-step));
            }
            if input.is_held(control.increase) {
                local.rotate_local(control.axis, Deg(step));
            }
        }
        if input.just_pressed(Action::PoseReset) {
            debug!("pose reset");
            for control in &self.controls {
                if let Some(bone) = skeleton.find_mut(&control.bone) {
                    bone.local_transform_mut().rotation = cgmath::Quaternion::one();
                }
            }
        }
        skeleton.update_world_transform_all();
    }
}

impl Flow<Session, GameEvent> for PosePreview {
    fn on_init(&mut self, _: &mut Session) -> Out<GameEvent> {
        Out::Empty
    }

    fn on_update(&mut self, input: &dyn Input, state: &mut Session, dt: Duration) -> Out<GameEvent> {
        if let Some(skeleton) = state.pose.as_mut() {
            self.apply(input, skeleton, dt);
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &mut Session, event: GameEvent) -> Option<GameEvent> {
        Some(event)
    }
}
