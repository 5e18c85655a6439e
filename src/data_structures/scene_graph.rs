//! Scene graph and hierarchical scene organization.
//!
//! A [`SceneNode`] is a named node with a local transform, an optional render
//! volume and zero or more colliders. Nodes own their children, so a block, its
//! skeleton and its bones form one tree. World transforms are cached on every
//! node and refreshed with [`SceneNode::update_world_transforms`].

use crate::data_structures::{
    bounds::{Aabb, BoxCollider},
    instance::Instance,
};

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    /// Inactive nodes (and their subtrees) are not rendered, but traversals
    /// that ask for them still see them.
    pub active: bool,
    /// Local-space bounds of the mesh drawn by this node. `None` means the
    /// node renders nothing.
    pub mesh_bounds: Option<Aabb>,
    pub colliders: Vec<BoxCollider>,
    pub children: Vec<SceneNode>,
    local: Instance,
    world: Instance,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            mesh_bounds: None,
            colliders: Vec::new(),
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
        }
    }

    #[must_use]
    pub fn with_local(mut self, local: Instance) -> Self {
        self.local = local;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, bounds: Aabb) -> Self {
        self.mesh_bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_collider(mut self, collider: BoxCollider) -> Self {
        self.colliders.push(collider);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn get_local_transform(&self) -> Instance {
        self.local
    }

    pub fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    pub fn local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    /// World transform as of the last [`SceneNode::update_world_transforms`].
    pub fn world_transform(&self) -> Instance {
        self.world
    }

    /// Recomputes the cached world transform of this node and its whole subtree.
    pub fn update_world_transforms(&mut self, parents_world_transform: &Instance) {
        self.world = parents_world_transform * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    /// Treats this node as a root and refreshes its subtree.
    pub fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    /// Pre-order list of this node and all descendants, inactive ones included.
    pub fn descendants(&self) -> Vec<&SceneNode> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a SceneNode>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }

    /// Visits this node and all descendants in pre-order, passing the
    /// traversal index along.
    pub fn for_each_mut(&mut self, mutation: &mut dyn FnMut(usize, &mut SceneNode)) {
        let mut index = 0;
        self.visit_mut(&mut index, mutation);
    }

    fn visit_mut(&mut self, index: &mut usize, mutation: &mut dyn FnMut(usize, &mut SceneNode)) {
        mutation(*index, self);
        *index += 1;
        for child in self.children.iter_mut() {
            child.visit_mut(index, mutation);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// First node named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    /// Removes every collider in the subtree and returns how many were dropped.
    pub fn clear_colliders(&mut self) -> usize {
        let mut removed = 0;
        self.for_each_mut(&mut |_: usize, node: &mut SceneNode| {
            removed += node.colliders.len();
            node.colliders.clear();
        });
        removed
    }

    /// Union of the world-space render bounds of every active renderable node.
    ///
    /// Relies on cached world transforms, so refresh them first.
    pub fn world_mesh_bounds(&self) -> Option<Aabb> {
        if !self.active {
            return None;
        }
        let own = self
            .mesh_bounds
            .map(|bounds| bounds.transformed(&self.world));
        self.children
            .iter()
            .filter_map(SceneNode::world_mesh_bounds)
            .fold(own, |acc, bounds| match acc {
                Some(mut acc) => {
                    acc.encapsulate(&bounds);
                    Some(acc)
                }
                None => Some(bounds),
            })
    }
}
