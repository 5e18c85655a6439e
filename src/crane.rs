//! The crane: moves the current block, drops it and spawns the next one.
//!
//! ```text
//!   spawn ──> Controlled ──drop──> Dropped ──|v| < threshold──> Settled{remaining}
//!                ^                                                   │
//!                └──────────────────── delay elapsed, spawn ─────────┘
//! ```
//!
//! A failed spawn leaves the crane `Empty`. While the game is over nothing in
//! here runs, so a pending respawn countdown never completes.

use instant::Duration;

use cgmath::{Deg, InnerSpace, One};
use log::{debug, error, warn};

use crate::{
    config::CraneConfig,
    data_structures::{block::BlockId, scene_graph::SceneNode},
    error::StackError,
    factory::BlockFactory,
    flow::{Flow, Out},
    input::{Action, Input},
    physics::RigidBody,
    session::{GameEvent, Session},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CraneState {
    /// No controllable block, the last spawn failed.
    Empty,
    /// Block is kinematic and follows input.
    Controlled,
    /// Block belongs to the simulator; waiting for it to come to rest.
    Dropped,
    /// Block came to rest; the next spawn happens once `remaining` runs out.
    Settled { remaining: Duration },
}

pub struct CraneController {
    config: CraneConfig,
    factory: Option<BlockFactory>,
    fallback_template: Option<SceneNode>,
    spawn_anchor: Option<cgmath::Vector3<f32>>,
    origin: cgmath::Vector3<f32>,
    active: Option<BlockId>,
    state: CraneState,
}

impl CraneController {
    pub fn new(config: CraneConfig) -> Self {
        let spawn_anchor = config.spawn_point.map(cgmath::Vector3::from);
        Self {
            config,
            factory: None,
            fallback_template: None,
            spawn_anchor,
            origin: cgmath::Vector3::new(0.0, 0.0, 0.0),
            active: None,
            state: CraneState::Empty,
        }
    }

    #[must_use]
    pub fn with_factory(mut self, factory: BlockFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Plain template used when no factory is set.
    #[must_use]
    pub fn with_fallback_template(mut self, template: SceneNode) -> Self {
        self.fallback_template = Some(template);
        self
    }

    #[must_use]
    pub fn with_spawn_anchor(mut self, anchor: cgmath::Vector3<f32>) -> Self {
        self.spawn_anchor = Some(anchor);
        self
    }

    /// Position of the crane itself; blocks spawn here without an anchor.
    #[must_use]
    pub fn with_origin(mut self, origin: cgmath::Vector3<f32>) -> Self {
        self.origin = origin;
        self
    }

    pub fn config(&self) -> &CraneConfig {
        &self.config
    }

    pub fn state(&self) -> CraneState {
        self.state
    }

    /// The block currently driven by the crane, if any.
    pub fn active_block(&self) -> Option<BlockId> {
        self.active
    }

    fn spawn_position(&self) -> cgmath::Vector3<f32> {
        let mut position = self.spawn_anchor.unwrap_or(self.origin);
        position.y += self.config.spawn_height_offset;
        position
    }

    /// Puts a fresh kinematic block under the crane's control.
    ///
    /// On error the crane holds no block and stays `Empty`.
    pub fn spawn_block(&mut self, state: &mut Session) -> Result<BlockId, StackError> {
        self.active = None;
        self.state = CraneState::Empty;

        let position = self.spawn_position();
        let rotation = cgmath::Quaternion::one();
        let id = match (&self.factory, &self.fallback_template) {
            (Some(factory), _) => {
                factory.create_block(&mut state.scene, state.pose.as_ref(), position, rotation)?
            }
            (None, Some(template)) => state.scene.instantiate(template, position, rotation),
            (None, None) => return Err(StackError::MissingTemplate),
        };
        let block = state.scene.get_mut(id).ok_or(StackError::MissingBlock(id))?;
        block.body.get_or_insert_with(RigidBody::default).kinematic = true;

        self.active = Some(id);
        self.state = CraneState::Controlled;
        debug!("{} spawned at {:?}", id, position);
        Ok(id)
    }

    fn spawn_or_log(&mut self, state: &mut Session) -> Vec<GameEvent> {
        match self.spawn_block(state) {
            Ok(id) => vec![GameEvent::Spawned(id)],
            Err(e) => {
                error!("Unable to spawn a block: {}", e);
                Vec::new()
            }
        }
    }

    /// Hands the controlled block to the simulator and passes the turn.
    ///
    /// Only acts while `Controlled`; repeated calls are no-ops returning an
    /// empty list.
    pub fn drop_block(&mut self, state: &mut Session) -> Vec<GameEvent> {
        if self.state != CraneState::Controlled {
            return Vec::new();
        }
        let Some(id) = self.active else {
            return Vec::new();
        };
        let Some(body) = state
            .scene
            .get_mut(id)
            .and_then(|block| block.body.as_mut())
        else {
            warn!("drop ignored: {}", StackError::MissingRigidBody(id));
            return Vec::new();
        };
        body.kinematic = false;
        self.state = CraneState::Dropped;

        let mut events = vec![GameEvent::Dropped(id)];
        if let Some(next) = state.turn.advance_turn() {
            events.push(GameEvent::TurnPassed(next));
        }
        events
    }

    fn steer(&self, input: &dyn Input, state: &mut Session, id: BlockId, dt: f32) {
        let Some(block) = state.scene.get_mut(id) else {
            return;
        };
        let x = input.axis(Action::MoveLeft, Action::MoveRight);
        let z = if self.config.depth_movement {
            input.axis(Action::MoveBack, Action::MoveForward)
        } else {
            0.0
        };
        let mut direction = cgmath::Vector3::new(x, 0.0, z);
        // diagonal input must not be faster
        if direction.magnitude2() > 1.0 {
            direction = direction.normalize();
        }

        let mut transform = block.transform();
        let mut position = transform.position + direction * self.config.move_speed * dt;
        let (x_limit, z_limit) = (bound(self.config.x_limit), bound(self.config.z_limit));
        position.x = position.x.clamp(-x_limit, x_limit);
        position.z = position.z.clamp(-z_limit, z_limit);
        transform.position = position;

        let turn = input.axis(Action::RotateRight, Action::RotateLeft);
        transform.rotate_world(
            cgmath::Vector3::unit_y(),
            Deg(turn * self.config.rotate_speed * dt),
        );

        block.root.set_local_transform(transform);
        block.root.update_world_transform_all();
    }
}

/// Symmetric clamp bound from a configured limit. The sign is ignored and NaN
/// pins the axis to zero.
fn bound(limit: f32) -> f32 {
    limit.abs().max(0.0)
}

impl Flow<Session, GameEvent> for CraneController {
    fn on_init(&mut self, state: &mut Session) -> Out<GameEvent> {
        Out::Events(self.spawn_or_log(state))
    }

    fn on_update(&mut self, input: &dyn Input, state: &mut Session, dt: Duration) -> Out<GameEvent> {
        if state.turn.is_game_over() {
            return Out::Empty;
        }
        let Some(id) = self.active else {
            return Out::Empty;
        };

        let events = match self.state {
            CraneState::Empty => Vec::new(),
            CraneState::Controlled => {
                self.steer(input, state, id, dt.as_secs_f32());
                if input.just_pressed(Action::Drop) {
                    self.drop_block(state)
                } else {
                    Vec::new()
                }
            }
            CraneState::Dropped => {
                let Some(speed) = state
                    .scene
                    .get(id)
                    .and_then(|block| block.body.as_ref())
                    .map(RigidBody::speed)
                else {
                    return Out::Empty;
                };
                if speed >= self.config.stop_speed_threshold {
                    return Out::Empty;
                }
                let delay = self.config.next_spawn_delay();
                debug!("{} settled, next block in {:?}", id, delay);
                let mut events = vec![GameEvent::Settled(id)];
                if delay.is_zero() {
                    events.extend(self.spawn_or_log(state));
                } else {
                    self.state = CraneState::Settled { remaining: delay };
                }
                events
            }
            CraneState::Settled { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.spawn_or_log(state)
                } else {
                    self.state = CraneState::Settled { remaining };
                    Vec::new()
                }
            }
        };
        if events.is_empty() {
            Out::Empty
        } else {
            Out::Events(events)
        }
    }

    fn on_custom_events(&mut self, _: &mut Session, event: GameEvent) -> Option<GameEvent> {
        Some(event)
    }
}
