//! Lose condition: a block falling off the stack ends the game.

use instant::Duration;

use log::{debug, info};

use crate::{
    data_structures::block::{BlockId, Scene},
    flow::{Flow, Out},
    input::Input,
    session::{GameEvent, Session},
    turn::TurnState,
};

/// Watches one block and reports the player on turn as loser when it falls
/// below `floor`. Fires at most once.
#[derive(Clone, Debug, PartialEq)]
pub struct LoseWatcher {
    block: BlockId,
    floor: f32,
    enabled: bool,
}

impl LoseWatcher {
    pub fn new(block: BlockId, floor: f32) -> Self {
        Self {
            block,
            floor,
            enabled: true,
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` on the one frame the watcher fires.
    pub fn check(&mut self, scene: &Scene, turn: &mut TurnState) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(block) = scene.get(self.block) else {
            return false;
        };
        if block.position().y >= self.floor {
            return false;
        }
        let loser = turn.current_player();
        debug!("{} fell below {} on {}'s turn", self.block, self.floor, loser);
        turn.end_game(loser);
        self.enabled = false;
        true
    }
}

/// Keeps a [`LoseWatcher`] on every spawned block.
pub struct LoseWatchFlow {
    floor: f32,
    watchers: Vec<LoseWatcher>,
}

impl LoseWatchFlow {
    pub fn new(floor: f32) -> Self {
        Self {
            floor,
            watchers: Vec::new(),
        }
    }

    pub fn watchers(&self) -> &[LoseWatcher] {
        &self.watchers
    }

    pub fn watch(&mut self, block: BlockId) {
        if self.watchers.iter().any(|w| w.block() == block) {
            return;
        }
        self.watchers.push(LoseWatcher::new(block, self.floor));
    }
}

impl Flow<Session, GameEvent> for LoseWatchFlow {
    fn on_init(&mut self, _: &mut Session) -> Out<GameEvent> {
        Out::Empty
    }

    fn on_update(&mut self, _: &dyn Input, state: &mut Session, _: Duration) -> Out<GameEvent> {
        let mut events = Vec::new();
        for watcher in self.watchers.iter_mut() {
            let was_over = state.turn.is_game_over();
            if !watcher.check(&state.scene, &mut state.turn) || was_over {
                continue;
            }
            if let Some(loser) = state.turn.loser() {
                info!("{} dropped out of bounds", watcher.block());
                events.push(GameEvent::GameOver { loser });
            }
        }
        if events.is_empty() {
            Out::Empty
        } else {
            Out::Events(events)
        }
    }

    fn on_custom_events(&mut self, _: &mut Session, event: GameEvent) -> Option<GameEvent> {
        if let GameEvent::Spawned(block) = event {
            self.watch(block);
        }
        Some(event)
    }
}
