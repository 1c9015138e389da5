//! Drives the world and its systems until a command's consequences settle.

use std::time::Duration;

use market_match_core::{CellCoord, Command, Event, Outcome, DEFAULT_COLUMNS, DEFAULT_ROWS};
use market_match_system_market_events::{Config as DirectorConfig, MarketEvents};
use market_match_system_matching::Cascade;
use market_match_system_progression::Progression;
use market_match_world::{self as world, query, Config, World};

use crate::save_file::{SaveFile, SaveFileError};

/// Upper bound on frames simulated for one pick, reached only by a stalled board.
const MAX_SETTLE_FRAMES: u32 = 10_000;

/// Level to play after `level` ended with `outcome`.
///
/// Only a cleared level advances; every other outcome replays the same level.
pub(crate) fn next_level(level: u32, outcome: Outcome) -> u32 {
    match outcome {
        Outcome::LevelCleared => level.saturating_add(1),
        Outcome::GameOver | Outcome::BoardCorrupted => level,
    }
}

/// Owns the authoritative world together with the systems reacting to it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    cascade: Cascade,
    director: MarketEvents,
    progression: Progression,
    frame: Duration,
}

impl Session {
    pub(crate) fn new(seed: u64, frame: Duration) -> Self {
        Self {
            world: World::new(Config::new(DEFAULT_ROWS, DEFAULT_COLUMNS, seed)),
            cascade: Cascade::new(),
            director: MarketEvents::new(DirectorConfig::new(seed.rotate_left(32))),
            progression: Progression::new(),
            frame,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn start_level(&mut self, level: u32) -> Vec<Event> {
        self.submit(Command::StartLevel { level })
    }

    pub(crate) fn pick(&mut self, cell: CellCoord) -> Vec<Event> {
        self.submit(Command::PickCell { cell })
    }

    /// Advances time until no resolution cycle is running.
    ///
    /// At least one frame is simulated so progression judges the final board.
    pub(crate) fn settle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..MAX_SETTLE_FRAMES {
            events.extend(self.submit(Command::Tick { dt: self.frame }));
            if query::detection_enabled(&self.world) {
                break;
            }
        }
        events
    }

    /// Terminal outcome once the board has settled.
    pub(crate) fn outcome(&self) -> Option<Outcome> {
        if query::detection_enabled(&self.world) {
            query::outcome(&self.world)
        } else {
            None
        }
    }

    /// Records progress for a finished level and loads the level that follows it.
    ///
    /// The save file is written only when the level advances.
    pub(crate) fn navigate(
        &mut self,
        level: u32,
        outcome: Outcome,
        save: &SaveFile,
    ) -> Result<(u32, Vec<Event>), SaveFileError> {
        let next = next_level(level, outcome);
        if next != level {
            save.store(next)?;
        }
        let mut events = self.start_level(next);
        events.extend(self.settle());
        Ok((next, events))
    }

    #[cfg(test)]
    fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Applies a command and pumps systems until they stop answering.
    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut broadcast = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            let mut commands = Vec::new();
            self.cascade.handle(
                &events,
                query::grid(&self.world),
                query::detection_enabled(&self.world),
                &mut commands,
            );
            self.director.handle(&events, &mut commands);
            self.progression.handle(
                &events,
                query::level_state(&self.world),
                query::grid(&self.world),
                &query::respawning_cells(&self.world),
                &mut commands,
            );

            broadcast.append(&mut events);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        broadcast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_match_core::{BlockKind, Cell, Grid, LevelState, SymbolKind};
    use market_match_world::scaffolding;

    fn scratch_save(name: &str) -> SaveFile {
        let path = std::env::temp_dir().join(format!(
            "market-match-session-{name}-{}.save",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        SaveFile::new(path)
    }

    /// Full-size board without any run of three.
    fn quiet_grid() -> Grid {
        let mut grid = Grid::new(DEFAULT_ROWS, DEFAULT_COLUMNS);
        for cell in grid.coords().collect::<Vec<_>>() {
            let symbol = SymbolKind::ALL[((cell.row() + 2 * cell.column()) % 5) as usize];
            let _ = grid.set(cell, Cell::new(BlockKind::Profit, symbol));
        }
        grid
    }

    /// Session at `level` on a quiet board with the given counters.
    fn staged_session(level: u32, moves_left: u32, score: f32) -> Session {
        let mut session = Session::new(3, Duration::from_millis(100));
        let _ = session.start_level(level);
        scaffolding::replace_grid(session.world_mut(), quiet_grid());
        let mut state = LevelState::for_level(level);
        state.moves_left = moves_left;
        state.score = score;
        scaffolding::set_level_state(session.world_mut(), state);
        session
    }

    fn started_level(events: &[Event]) -> Option<u32> {
        events.iter().find_map(|event| match event {
            Event::LevelStarted { level, .. } => Some(*level),
            _ => None,
        })
    }

    #[test]
    fn only_cleared_levels_advance() {
        assert_eq!(next_level(4, Outcome::LevelCleared), 5);
        assert_eq!(next_level(4, Outcome::GameOver), 4);
        assert_eq!(next_level(4, Outcome::BoardCorrupted), 4);
        assert_eq!(next_level(u32::MAX, Outcome::LevelCleared), u32::MAX);
    }

    #[test]
    fn cleared_level_saves_and_starts_the_next() {
        let save = scratch_save("cleared");
        let mut session = staged_session(2, 3, 100.0);

        let _ = session.settle();
        assert_eq!(session.outcome(), Some(Outcome::LevelCleared));

        let (level, events) = session
            .navigate(2, Outcome::LevelCleared, &save)
            .expect("navigate after a cleared level");

        assert_eq!(level, 3);
        assert_eq!(started_level(&events), Some(3));
        assert_eq!(save.load().expect("load saved level"), 3);
        assert_eq!(query::level_state(session.world()).level, 3);
        let _ = std::fs::remove_file(save.path());
    }

    #[test]
    fn game_over_restarts_without_saving() {
        let save = scratch_save("game-over");
        save.store(2).expect("seed save file");
        let mut session = staged_session(2, 0, 10.0);

        let _ = session.settle();
        assert_eq!(session.outcome(), Some(Outcome::GameOver));

        let (level, events) = session
            .navigate(2, Outcome::GameOver, &save)
            .expect("navigate after game over");

        assert_eq!(level, 2);
        assert_eq!(started_level(&events), Some(2));
        assert_eq!(save.load().expect("load saved level"), 2);
        assert_eq!(query::level_state(session.world()).moves_left, 11);
        assert_eq!(session.outcome(), None);
        let _ = std::fs::remove_file(save.path());
    }

    #[test]
    fn corrupted_board_restarts_the_same_level() {
        let save = scratch_save("corrupted");
        let mut session = staged_session(5, 4, 0.0);
        assert!(scaffolding::set_cell(
            session.world_mut(),
            CellCoord::new(3, 3),
            Cell::empty(),
        ));

        let _ = session.settle();
        assert_eq!(session.outcome(), Some(Outcome::BoardCorrupted));

        let (level, _) = session
            .navigate(5, Outcome::BoardCorrupted, &save)
            .expect("navigate after corruption");

        assert_eq!(level, 5);
        assert!(query::grid(session.world()).is_fully_populated());
        assert!(!save.path().exists(), "a restart writes no progress");
    }

    #[test]
    fn starting_a_level_announces_it() {
        let mut session = Session::new(5, Duration::from_millis(100));

        let events = session.start_level(4);

        assert!(events.contains(&Event::LevelStarted {
            level: 4,
            moves_left: 17,
            goal: 200.0,
            roi: 4.0,
        }));
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn settling_always_simulates_a_frame() {
        let mut session = Session::new(5, Duration::from_millis(100));
        let _ = session.start_level(1);

        let events = session.settle();

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. })));
    }

    #[test]
    fn settle_leaves_detection_enabled() {
        let mut session = Session::new(11, Duration::from_millis(100));
        let _ = session.start_level(1);
        let _ = session.pick(CellCoord::new(0, 0));
        let _ = session.pick(CellCoord::new(0, 1));

        let _ = session.settle();

        assert!(query::detection_enabled(session.world()));
    }
}
