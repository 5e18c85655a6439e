//! Axis-aligned bounds and box collision volumes.

use crate::data_structures::instance::Instance;

/// Axis-aligned bounding box given by its two extreme corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: cgmath::Vector3<f32>,
    pub max: cgmath::Vector3<f32>,
}

impl Aabb {
    pub fn new(min: cgmath::Vector3<f32>, max: cgmath::Vector3<f32>) -> Self {
        Self {
            min: cgmath::Vector3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: cgmath::Vector3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    pub fn from_center_size(center: cgmath::Vector3<f32>, size: cgmath::Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> cgmath::Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> cgmath::Vector3<f32> {
        self.max - self.min
    }

    /// Grows `self` so that it also contains `other`.
    pub fn encapsulate(&mut self, other: &Aabb) {
        self.min = cgmath::Vector3::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.min.z.min(other.min.z),
        );
        self.max = cgmath::Vector3::new(
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
            self.max.z.max(other.max.z),
        );
    }

    /// True when the two boxes overlap on the horizontal (x/z) plane.
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// Box enclosing all eight corners of `self` after applying `transform`.
    pub fn transformed(&self, transform: &Instance) -> Aabb {
        let corners = [
            cgmath::Vector3::new(self.min.x, self.min.y, self.min.z),
            cgmath::Vector3::new(self.max.x, self.min.y, self.min.z),
            cgmath::Vector3::new(self.min.x, self.max.y, self.min.z),
            cgmath::Vector3::new(self.max.x, self.max.y, self.min.z),
            cgmath::Vector3::new(self.min.x, self.min.y, self.max.z),
            cgmath::Vector3::new(self.max.x, self.min.y, self.max.z),
            cgmath::Vector3::new(self.min.x, self.max.y, self.max.z),
            cgmath::Vector3::new(self.max.x, self.max.y, self.max.z),
        ];
        let first = transform.transform_point(corners[0]);
        let mut bounds = Aabb::new(first, first);
        for corner in &corners[1..] {
            let p = transform.transform_point(*corner);
            bounds.encapsulate(&Aabb::new(p, p));
        }
        bounds
    }
}

/// Box collision volume, expressed in the owning node's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider {
    pub center: cgmath::Vector3<f32>,
    pub size: cgmath::Vector3<f32>,
}

impl BoxCollider {
    /// World-space box of this collider when its owner sits at `owner`.
    ///
    /// Only the center is transformed; the size stays axis aligned.
    pub fn world_bounds(&self, owner: &Instance) -> Aabb {
        Aabb::from_center_size(owner.transform_point(self.center), self.size)
    }
}
