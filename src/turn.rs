//! Whose turn it is, and whether the game is over.
//!
//! One [`TurnState`] is created per session and handed to every flow through
//! the session state; nothing reaches it globally.

use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// The other player.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnState {
    current: PlayerId,
    game_over: bool,
    loser: Option<PlayerId>,
    turns: u32,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    /// Fresh session: player one to move.
    pub fn new() -> Self {
        Self::starting_with(PlayerId::One)
    }

    pub fn starting_with(first: PlayerId) -> Self {
        Self {
            current: first,
            game_over: false,
            loser: None,
            turns: 0,
        }
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn loser(&self) -> Option<PlayerId> {
        self.loser
    }

    /// Number of completed turns (one per drop).
    pub fn turns_taken(&self) -> u32 {
        self.turns
    }

    /// Hands the turn to the other player.
    ///
    /// Does nothing once the game is over and returns `None` in that case.
    pub fn advance_turn(&mut self) -> Option<PlayerId> {
        if self.game_over {
            debug!("turn advance ignored, the game is over");
            return None;
        }
        self.current = self.current.other();
        self.turns += 1;
        info!("{}'s turn", self.current);
        Some(self.current)
    }

    /// Ends the game with `loser` losing. The first call wins; later calls
    /// return `false` and leave the recorded loser untouched.
    pub fn end_game(&mut self, loser: PlayerId) -> bool {
        if self.game_over {
            debug!("{} would lose, but the game already ended", loser);
            return false;
        }
        self.game_over = true;
        self.loser = Some(loser);
        info!("{} loses!", loser);
        true
    }
}
