#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level progression decisions and the board integrity safeguard.

use market_match_core::{CellCoord, Command, Event, Grid, LevelState, Outcome};

/// Lists cells missing an overlay that are not waiting to be refilled.
///
/// Any entry means the board invariant broke; the session cannot repair it.
#[must_use]
pub fn corrupted_cells(grid: &Grid, respawning: &[CellCoord]) -> Vec<CellCoord> {
    grid.unpopulated_cells()
        .into_iter()
        .filter(|cell| !respawning.contains(cell))
        .collect()
}

/// Pure system that decides when a level ends.
#[derive(Debug, Default)]
pub struct Progression {
    reported: Option<Outcome>,
}

impl Progression {
    /// Creates a new progression system with no outcome reported.
    #[must_use]
    pub const fn new() -> Self {
        Self { reported: None }
    }

    /// Outcome most recently requested from the world, if any.
    #[must_use]
    pub const fn reported(&self) -> Option<Outcome> {
        self.reported
    }

    /// Consumes world events and read-only state to emit end-of-level commands.
    ///
    /// Evaluation happens once per tick. Corruption outranks the level counters.
    /// An outcome is reported once and only replaced by one it may become.
    pub fn handle(
        &mut self,
        events: &[Event],
        level: &LevelState,
        grid: &Grid,
        respawning: &[CellCoord],
        out: &mut Vec<Command>,
    ) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::LevelStarted { .. } => self.reported = None,
                Event::TimeAdvanced { .. } => ticked = true,
                _ => {}
            }
        }

        if !ticked {
            return;
        }

        let corrupted = corrupted_cells(grid, respawning);
        let next = if corrupted.is_empty() {
            level.outcome()
        } else {
            log::warn!("board integrity check failed at {corrupted:?}");
            Some(Outcome::BoardCorrupted)
        };

        let Some(next) = next else {
            return;
        };

        let accepted = self
            .reported
            .map_or(true, |reported| reported.can_become(next));
        if accepted {
            self.reported = Some(next);
            out.push(Command::EndLevel { outcome: next });
        }
    }
}
