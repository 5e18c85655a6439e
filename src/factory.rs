//! Building posed, physics-ready blocks.

use cgmath::Zero;
use log::debug;

use crate::{
    config::BodyConfig,
    data_structures::{
        block::{BlockId, Scene},
        bounds::BoxCollider,
        scene_graph::SceneNode,
    },
    error::StackError,
    physics::RigidBody,
    pose::copy_local_orientations,
};

/// Name given to every block root created by the factory.
pub const BLOCK_NAME: &str = "PoseBlock";

/// Clones a skeleton template into a kinematic block carrying the current pose.
#[derive(Clone, Debug)]
pub struct BlockFactory {
    template: Option<SceneNode>,
    body: BodyConfig,
}

impl BlockFactory {
    pub fn new(body: BodyConfig) -> Self {
        Self {
            template: None,
            body,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: SceneNode) -> Self {
        self.template = Some(template);
        self
    }

    pub fn set_template(&mut self, template: Option<SceneNode>) {
        self.template = template;
    }

    pub fn template(&self) -> Option<&SceneNode> {
        self.template.as_ref()
    }

    pub fn body_config(&self) -> &BodyConfig {
        &self.body
    }

    /// Spawns a block at `position` / `rotation` into `scene`.
    ///
    /// The block gets the bone rotations of `pose`, a kinematic rigid body and
    /// one box collider wrapping everything it renders.
    pub fn create_block(
        &self,
        scene: &mut Scene,
        pose: Option<&SceneNode>,
        position: cgmath::Vector3<f32>,
        rotation: cgmath::Quaternion<f32>,
    ) -> Result<BlockId, StackError> {
        let template = self.template.as_ref().ok_or(StackError::MissingTemplate)?;
        let id = scene.instantiate(template, position, rotation);
        let block = scene.get_mut(id).ok_or(StackError::MissingBlock(id))?;
        block.root.name = BLOCK_NAME.to_string();

        let copied = copy_local_orientations(pose, Some(&mut block.root));
        block.root.update_world_transform_all();

        let body = block.body.get_or_insert_with(RigidBody::default);
        body.mass = self.body.mass;
        body.linear_damping = self.body.linear_damping;
        body.angular_damping = self.body.angular_damping;
        body.velocity = cgmath::Vector3::zero();
        body.angular_velocity = cgmath::Vector3::zero();
        body.kinematic = true;

        let collider = fit_single_box_collider(&mut block.root);
        debug!(
            "{} created at {:?}: {} bones posed, collider {:?}",
            id, position, copied, collider
        );
        Ok(id)
    }
}

/// Replaces all colliders in `root`'s hierarchy with one box on `root` that
/// encloses the world-space render bounds of the whole hierarchy.
///
/// The center is stored in `root`'s local space, the size is the world-space
/// extent. A hierarchy that renders nothing ends up with no collider at all.
/// World transforms must be up to date.
pub fn fit_single_box_collider(root: &mut SceneNode) -> Option<BoxCollider> {
    root.clear_colliders();
    let bounds = root.world_mesh_bounds()?;
    let collider = BoxCollider {
        center: root.world_transform().inverse_transform_point(bounds.center()),
        size: bounds.size(),
    };
    root.colliders.push(collider);
    Some(collider)
}
