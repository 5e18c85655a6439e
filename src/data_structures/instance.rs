//! Spatial transforms for blocks and bones.
//!
//! An [`Instance`] is a position, a rotation (as quaternion) and a scale. Scene
//! nodes store one as their local transform and cache the composed world
//! transform next to it.

use std::ops::Mul;

use cgmath::{Deg, InnerSpace, One, Rotation3};

/// Position, rotation (as quaternion), and scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Unscaled transform placed at `position` with orientation `rotation`.
    pub fn at(position: cgmath::Vector3<f32>, rotation: cgmath::Quaternion<f32>) -> Self {
        Self {
            position,
            rotation,
            ..Self::new()
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Maps a point from this transform's local space into its parent space.
    pub fn transform_point(&self, point: cgmath::Vector3<f32>) -> cgmath::Vector3<f32> {
        let scaled = cgmath::Vector3::new(
            self.scale.x * point.x,
            self.scale.y * point.y,
            self.scale.z * point.z,
        );
        self.position + self.rotation * scaled
    }

    /// Maps a point from parent space back into this transform's local space.
    ///
    /// Zero scale components leave the corresponding coordinate at zero.
    pub fn inverse_transform_point(&self, point: cgmath::Vector3<f32>) -> cgmath::Vector3<f32> {
        let unrotated = self.rotation.conjugate() * (point - self.position);
        let safe_div = |v: f32, s: f32| if s == 0.0 { 0.0 } else { v / s };
        cgmath::Vector3::new(
            safe_div(unrotated.x, self.scale.x),
            safe_div(unrotated.y, self.scale.y),
            safe_div(unrotated.z, self.scale.z),
        )
    }

    /// Rotates about an axis expressed in parent (world) space.
    pub fn rotate_world(&mut self, axis: cgmath::Vector3<f32>, angle: Deg<f32>) {
        if angle.0 == 0.0 || axis.magnitude2() == 0.0 {
            return;
        }
        self.rotation =
            (cgmath::Quaternion::from_axis_angle(axis.normalize(), angle) * self.rotation)
                .normalize();
    }

    /// Rotates about an axis expressed in this transform's own space.
    pub fn rotate_local(&mut self, axis: cgmath::Vector3<f32>, angle: Deg<f32>) {
        if angle.0 == 0.0 || axis.magnitude2() == 0.0 {
            return;
        }
        self.rotation =
            (self.rotation * cgmath::Quaternion::from_axis_angle(axis.normalize(), angle))
                .normalize();
    }
}

fn compose(parent: &Instance, child: &Instance) -> Instance {
    let new_rotation = parent.rotation * child.rotation;

    let new_scale = cgmath::Vector3::new(
        parent.scale.x * child.scale.x,
        parent.scale.y * child.scale.y,
        parent.scale.z * child.scale.z,
    );

    Instance {
        position: parent.transform_point(child.position),
        rotation: new_rotation,
        scale: new_scale,
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        compose(&self, &rhs)
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        compose(self, rhs)
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}
