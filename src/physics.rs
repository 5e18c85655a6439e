//! Rigid bodies and the simulator seam.
//!
//! The game never integrates dropped blocks itself: every non-kinematic body is
//! handed to a [`Simulator`]. [`SimpleGravity`] is a small stand-in that is good
//! enough for headless sessions and tests (gravity, damping, resting contacts on
//! a ground slab and on top of other blocks).

use instant::Duration;

use cgmath::{Deg, InnerSpace, Zero};
use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{block::Block, bounds::Aabb},
    flow::{Flow, Out},
    input::Input,
    session::{GameEvent, Session},
};

#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    /// Kinematic bodies are moved by game code and ignored by the simulator.
    pub kinematic: bool,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub velocity: cgmath::Vector3<f32>,
    /// Radians per second around each world axis.
    pub angular_velocity: cgmath::Vector3<f32>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            kinematic: false,
            mass: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.05,
            velocity: cgmath::Vector3::zero(),
            angular_velocity: cgmath::Vector3::zero(),
        }
    }
}

impl RigidBody {
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}

/// An external rigid-body simulation advancing every dynamic block in a scene.
pub trait Simulator {
    fn step(&mut self, blocks: &mut [Block], dt: Duration);
}

/// Horizontal slab blocks can rest on. Outside of it they keep falling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub height: f32,
    pub half_extent: f32,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            height: 0.0,
            half_extent: 4.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimpleGravity {
    pub gravity: cgmath::Vector3<f32>,
    pub ground: Option<Ground>,
}

impl SimpleGravity {
    pub fn new(gravity: f32, ground: Option<Ground>) -> Self {
        Self {
            gravity: cgmath::Vector3::new(0.0, -gravity, 0.0),
            ground,
        }
    }

    /// Highest surface under `bounds` that it is currently above or touching.
    fn support_height(&self, bounds: &Aabb, others: &[Option<Aabb>], own: usize) -> Option<f32> {
        const CONTACT_SLOP: f32 = 0.05;
        let ground = self.ground.and_then(|ground| {
            let inside = bounds.center().x.abs() <= ground.half_extent
                && bounds.center().z.abs() <= ground.half_extent;
            inside.then_some(ground.height)
        });
        others
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != own)
            .filter_map(|(_, other)| other.as_ref())
            .filter(|other| other.overlaps_xz(bounds) && other.max.y <= bounds.min.y + CONTACT_SLOP)
            .map(|other| other.max.y)
            .chain(ground)
            .fold(None, |best: Option<f32>, height| {
                Some(best.map_or(height, |best| best.max(height)))
            })
    }
}

impl Default for SimpleGravity {
    fn default() -> Self {
        Self::new(9.81, Some(Ground::default()))
    }
}

impl Simulator for SimpleGravity {
    fn step(&mut self, blocks: &mut [Block], dt: Duration) {
        let dt = dt.as_secs_f32();
        if dt <= 0.0 {
            return;
        }
        let snapshot: Vec<Option<Aabb>> = blocks
            .iter()
            .map(|block| {
                block
                    .world_collider_bounds()
                    .or_else(|| Some(Aabb::new(block.position(), block.position())))
            })
            .collect();

        for (idx, block) in blocks.iter_mut().enumerate() {
            let Some(body) = block.body.as_mut() else {
                continue;
            };
            if body.kinematic {
                continue;
            }
            body.velocity += self.gravity * dt;
            body.velocity *= 1.0 / (1.0 + body.linear_damping * dt);
            body.angular_velocity *= 1.0 / (1.0 + body.angular_damping * dt);

            let mut transform = block.root.get_local_transform();
            let before = snapshot[idx].unwrap_or_else(|| Aabb::new(transform.position, transform.position));
            transform.position += body.velocity * dt;
            let spin = body.angular_velocity * dt;
            if spin.magnitude2() > 0.0 {
                transform.rotate_world(spin, Deg::from(cgmath::Rad(spin.magnitude())));
            }

            let moved = body.velocity * dt;
            let after = Aabb::new(before.min + moved, before.max + moved);
            if body.velocity.y <= 0.0 {
                if let Some(support) = self.support_height(&before, &snapshot, idx) {
                    if after.min.y < support {
                        transform.position.y += support - after.min.y;
                        body.velocity = cgmath::Vector3::zero();
                        body.angular_velocity = cgmath::Vector3::zero();
                    }
                }
            }
            block.root.set_local_transform(transform);
            block.root.update_world_transform_all();
        }
    }
}

/// Steps a [`Simulator`] over the session scene every frame.
pub struct PhysicsFlow<Sim: Simulator> {
    simulator: Sim,
}

impl<Sim: Simulator> PhysicsFlow<Sim> {
    pub fn new(simulator: Sim) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &Sim {
        &self.simulator
    }
}

impl<Sim: Simulator> Flow<Session, GameEvent> for PhysicsFlow<Sim> {
    fn on_init(&mut self, _: &mut Session) -> Out<GameEvent> {
        Out::Empty
    }

    fn on_update(&mut self, _: &dyn Input, state: &mut Session, dt: Duration) -> Out<GameEvent> {
        self.simulator.step(state.scene.blocks_mut(), dt);
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &mut Session, event: GameEvent) -> Option<GameEvent> {
        Some(event)
    }
}
