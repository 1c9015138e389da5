//! Level progression parameters and terminal outcomes.

use serde::{Deserialize, Serialize};

/// Moves granted per level on top of [`BASE_MOVES`].
const MOVES_PER_LEVEL: u32 = 3;
/// Moves granted on every level.
const BASE_MOVES: u32 = 5;
/// Profit goal per level number.
const GOAL_PER_LEVEL: f32 = 50.0;

/// Counters for the level currently being played.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    /// One-based level number.
    pub level: u32,
    /// Successful swaps still available.
    pub moves_left: u32,
    /// Profit accumulated so far. May be negative.
    pub score: f32,
    /// Profit required to clear the level.
    pub goal: f32,
    /// Multiplier applied to every resolved match.
    pub roi: f32,
}

impl LevelState {
    /// Fresh counters for the given level. Level zero is promoted to one.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        Self {
            level,
            moves_left: level.saturating_mul(MOVES_PER_LEVEL).saturating_add(BASE_MOVES),
            score: 0.0,
            goal: level as f32 * GOAL_PER_LEVEL,
            roi: level as f32,
        }
    }

    /// Terminal outcome implied by the counters, if any.
    ///
    /// With no moves left the goal decides between clearing and losing; with
    /// moves remaining the level clears as soon as the goal is reached.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.moves_left == 0 {
            if self.score < self.goal {
                Some(Outcome::GameOver)
            } else {
                Some(Outcome::LevelCleared)
            }
        } else if self.score >= self.goal {
            Some(Outcome::LevelCleared)
        } else {
            None
        }
    }
}

/// Terminal outcomes reported to the navigation collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves ran out below the goal.
    GameOver,
    /// The goal was reached.
    LevelCleared,
    /// A cell lost its payload outside a refill; play must restart.
    BoardCorrupted,
}

impl Outcome {
    /// Reports whether a session already ended with `self` may be moved to `next`.
    ///
    /// Corruption is final. A lost level may still be cleared by cascades that
    /// finish after the last move, or be found corrupted.
    #[must_use]
    pub const fn can_become(self, next: Outcome) -> bool {
        matches!(
            (self, next),
            (Outcome::GameOver, Outcome::LevelCleared)
                | (Outcome::GameOver, Outcome::BoardCorrupted)
                | (Outcome::LevelCleared, Outcome::BoardCorrupted)
        )
    }
}
