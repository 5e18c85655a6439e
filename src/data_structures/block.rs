use log::warn;

use crate::{
    data_structures::{bounds::Aabb, instance::Instance, scene_graph::SceneNode},
    physics::RigidBody,
};

/// Handle to a block owned by a [`Scene`].
///
/// Holding an id never keeps a block alive; the scene owns every block for the
/// whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

/**
 * A `Block` is one piece of the stack: a posed skeleton hierarchy plus the
 * rigid body that hands it over to the simulator once dropped.
 */
#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    pub root: SceneNode,
    pub body: Option<RigidBody>,
}

impl Block {
    pub fn transform(&self) -> Instance {
        self.root.get_local_transform()
    }

    pub fn position(&self) -> cgmath::Vector3<f32> {
        self.root.get_local_transform().position
    }

    pub fn rotation(&self) -> cgmath::Quaternion<f32> {
        self.root.get_local_transform().rotation
    }

    pub fn set_position(&mut self, position: cgmath::Vector3<f32>) {
        self.root.local_transform_mut().position = position;
        self.root.update_world_transform_all();
    }

    pub fn set_rotation(&mut self, rotation: cgmath::Quaternion<f32>) {
        self.root.local_transform_mut().rotation = rotation;
        self.root.update_world_transform_all();
    }

    /// Whether the crane (not the simulator) currently drives this block.
    pub fn is_kinematic(&self) -> bool {
        self.body.as_ref().is_some_and(|body| body.kinematic)
    }

    /// World box of the root collider, if the block has one.
    pub fn world_collider_bounds(&self) -> Option<Aabb> {
        self.root
            .colliders
            .first()
            .map(|collider| collider.world_bounds(&self.transform()))
    }
}

/// Owns every block spawned during a session.
#[derive(Debug, Default)]
pub struct Scene {
    blocks: Vec<Block>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones `template` into a new block placed at `position` / `rotation`.
    ///
    /// The template's root scale is kept. The new block has no rigid body
    /// unless the template's owner adds one.
    pub fn instantiate(
        &mut self,
        template: &SceneNode,
        position: cgmath::Vector3<f32>,
        rotation: cgmath::Quaternion<f32>,
    ) -> BlockId {
        let id = BlockId(self.blocks.len());
        let mut root = template.clone();
        {
            let local = root.local_transform_mut();
            local.position = position;
            local.rotation = rotation;
        }
        root.update_world_transform_all();
        self.blocks.push(Block {
            id,
            root,
            body: None,
        });
        id
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        let block = self.blocks.get(id.0);
        if block.is_none() {
            warn!("{} is not part of the scene ({} blocks)", id, self.blocks.len());
        }
        block
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        let len = self.blocks.len();
        let block = self.blocks.get_mut(id.0);
        if block.is_none() {
            warn!("{} is not part of the scene ({} blocks)", id, len);
        }
        block
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
