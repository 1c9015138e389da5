#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Market Match.
//!
//! The world owns the board, the spawn odds, the level counters and the
//! resolution timers. It is mutated only through [`apply`]; systems and
//! adapters observe it through the [`query`] module.

use std::time::Duration;

use market_match_core::{
    BlockKind, BlockWeights, CellCoord, Command, Event, Grid, LevelState, MarketEvent, MatchSet,
    Outcome, SpawnTable, SymbolKind, DEFAULT_COLUMNS, DEFAULT_ROWS, OPENING_HEADLINE,
};
use market_match_system_matching::find_matches;
use market_match_system_scoring::score;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod resolution;

use resolution::{CycleStep, ResolutionCycle};

const DEFAULT_RNG_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_DESTROY_DELAY: Duration = Duration::from_millis(1_000);
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1_100);

/// Configuration parameters required to construct the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rows: u32,
    columns: u32,
    rng_seed: u64,
    destroy_delay: Duration,
    settle_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            rng_seed: DEFAULT_RNG_SEED,
            destroy_delay: DEFAULT_DESTROY_DELAY,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl Config {
    /// Creates a configuration for a board of the given size and spawn seed.
    #[must_use]
    pub fn new(rows: u32, columns: u32, rng_seed: u64) -> Self {
        Self {
            rows,
            columns,
            rng_seed,
            ..Self::default()
        }
    }

    /// Overrides the delay before matched cells are destroyed and refilled.
    #[must_use]
    pub const fn with_destroy_delay(mut self, destroy_delay: Duration) -> Self {
        self.destroy_delay = destroy_delay;
        self
    }

    /// Overrides the delay before detection resumes after a match.
    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// Represents the authoritative Market Match world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    grid: Grid,
    spawn: SpawnTable,
    level: LevelState,
    headline: String,
    rng: ChaCha8Rng,
    selection: Option<CellCoord>,
    cycles: Vec<ResolutionCycle>,
    outcome: Option<Outcome>,
}

impl World {
    /// Creates a world with level one loaded on a freshly populated board.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut world = Self {
            grid: Grid::new(config.rows, config.columns),
            spawn: SpawnTable::for_level(1),
            level: LevelState::for_level(1),
            headline: OPENING_HEADLINE.to_owned(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            selection: None,
            cycles: Vec::new(),
            outcome: None,
            config,
        };
        world.populate();
        world
    }

    fn populate(&mut self) {
        self.grid = Grid::new(self.config.rows, self.config.columns);
        for cell in self.grid.coords().collect::<Vec<_>>() {
            self.reset_cell(cell);
        }
    }

    fn reset_cell(&mut self, cell: CellCoord) {
        let block_draw = self.rng.gen::<f32>();
        let symbol_draw = self.rng.gen::<f32>();
        let payload = self.spawn.cell(block_draw, symbol_draw);
        let _ = self.grid.set(cell, payload);
    }

    fn input_locked(&self) -> bool {
        self.cycles.iter().any(ResolutionCycle::awaiting_respawn)
    }

    fn detection_enabled(&self) -> bool {
        self.cycles.is_empty()
    }

    fn start_level(&mut self, level: u32, out_events: &mut Vec<Event>) {
        self.level = LevelState::for_level(level);
        self.spawn = SpawnTable::for_level(self.level.level);
        self.cycles.clear();
        self.selection = None;
        self.outcome = None;
        self.populate();
        self.headline = OPENING_HEADLINE.to_owned();

        log::info!(
            "level {} started with {} moves, goal {}",
            self.level.level,
            self.level.moves_left,
            self.level.goal
        );
        out_events.push(Event::LevelStarted {
            level: self.level.level,
            moves_left: self.level.moves_left,
            goal: self.level.goal,
            roi: self.level.roi,
        });
        out_events.push(Event::HeadlineChanged {
            headline: self.headline.clone(),
        });
    }

    fn pick(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() || self.input_locked() || !self.grid.contains(cell) {
            return;
        }

        match self.selection.take() {
            None => {
                self.selection = Some(cell);
                out_events.push(Event::CellHighlighted {
                    cell,
                    highlighted: true,
                });
            }
            Some(first) => {
                out_events.push(Event::CellHighlighted {
                    cell: first,
                    highlighted: false,
                });
                self.try_swap(first, cell, out_events);
            }
        }
    }

    fn try_swap(&mut self, first: CellCoord, second: CellCoord, out_events: &mut Vec<Event>) {
        let populated = |cell| self.grid.get(cell).is_some_and(|payload| payload.is_populated());
        if !populated(first) || !populated(second) {
            log::debug!("swap {first:?} <-> {second:?} touches an empty cell, ignored");
            return;
        }

        let _ = self.grid.swap(first, second);
        let matches = find_matches(&self.grid);
        if matches.is_empty() {
            let _ = self.grid.swap(first, second);
            log::debug!("swap {first:?} <-> {second:?} formed no match, reverted");
            out_events.push(Event::SwapReverted { first, second });
            return;
        }

        self.commit_score(&matches, out_events);
        self.level.moves_left = self.level.moves_left.saturating_sub(1);
        log::debug!(
            "swap {first:?} <-> {second:?} committed, {} moves left",
            self.level.moves_left
        );
        out_events.push(Event::MoveCommitted {
            moves_left: self.level.moves_left,
        });
        self.begin_cycle(matches, out_events);
    }

    fn resolve_matches(&mut self, out_events: &mut Vec<Event>) {
        if !self.detection_enabled() || self.outcome == Some(Outcome::BoardCorrupted) {
            return;
        }

        let matches = find_matches(&self.grid);
        if matches.is_empty() {
            return;
        }

        log::debug!("cascade resolving {} cells", matches.len());
        self.commit_score(&matches, out_events);
        self.begin_cycle(matches, out_events);
    }

    fn commit_score(&mut self, matches: &MatchSet, out_events: &mut Vec<Event>) {
        let delta = score(matches, self.level.roi);
        self.level.score += delta;
        out_events.push(Event::ScoreChanged {
            score: self.level.score,
            delta,
        });
    }

    fn begin_cycle(&mut self, matches: MatchSet, out_events: &mut Vec<Event>) {
        let cells = matches.cells();
        for &cell in &cells {
            out_events.push(Event::CellHighlighted {
                cell,
                highlighted: true,
            });
        }
        out_events.push(Event::ResolutionStarted {
            cells: cells.clone(),
        });
        self.cycles.push(ResolutionCycle::new(cells));
    }

    fn advance_cycles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.cycles.is_empty() {
            return;
        }

        let destroy_delay = self.config.destroy_delay;
        let settle_delay = self.config.settle_delay;
        let mut cycles = std::mem::take(&mut self.cycles);
        cycles.retain_mut(|cycle| {
            let step = cycle.advance(dt, destroy_delay, settle_delay);
            if matches!(step, CycleStep::Respawn | CycleStep::RespawnAndSettle) {
                self.respawn(cycle.cells(), out_events);
            }
            !matches!(step, CycleStep::Settled | CycleStep::RespawnAndSettle)
        });
        self.cycles = cycles;

        if self.cycles.is_empty() {
            out_events.push(Event::DetectionResumed);
        }
    }

    fn respawn(&mut self, cells: &[CellCoord], out_events: &mut Vec<Event>) {
        for &cell in cells {
            out_events.push(Event::CellHighlighted {
                cell,
                highlighted: false,
            });
            if self.selection == Some(cell) {
                self.selection = None;
            }
            let _ = self.grid.clear(cell);
            self.reset_cell(cell);
        }
        out_events.push(Event::CellsRespawned {
            cells: cells.to_vec(),
        });
    }

    fn apply_market_event(&mut self, event: MarketEvent, out_events: &mut Vec<Event>) {
        match event {
            MarketEvent::Normal => self.spawn.blocks = BlockWeights::for_level(self.level.level),
            MarketEvent::BullRun => self.spawn.blocks = BlockWeights::new(1.0, 0.0, 0.0),
            MarketEvent::BearRun => self.spawn.blocks = BlockWeights::new(0.0, 1.0, 0.0),
            MarketEvent::GoldCrash => self.rewrite_symbols(|symbol| {
                (symbol == SymbolKind::Goldbar).then_some(SymbolKind::Coin)
            }),
            MarketEvent::GoldFever => self.rewrite_symbols(|symbol| {
                (symbol != SymbolKind::Goldbar).then_some(SymbolKind::Goldbar)
            }),
            MarketEvent::ShortLadder
            | MarketEvent::MarketCrash
            | MarketEvent::DeltaHedge
            | MarketEvent::ShortSqueeze
            | MarketEvent::Frenzy => self.rewrite_blocks(event),
        }

        log::info!("market event {event:?} applied");
        self.headline = event.headline().to_owned();
        out_events.push(Event::MarketEventApplied { event });
        out_events.push(Event::HeadlineChanged {
            headline: self.headline.clone(),
        });
    }

    fn rewrite_blocks(&mut self, event: MarketEvent) {
        let last_row = self.grid.rows().saturating_sub(1);
        for cell in self.grid.coords().collect::<Vec<_>>() {
            if self.grid.block(cell).is_none() {
                continue;
            }
            let block: Option<BlockKind> = event.block_pattern(cell, last_row);
            if block.is_some() {
                let _ = self.grid.set_block(cell, block);
            }
        }
    }

    fn rewrite_symbols<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(SymbolKind) -> Option<SymbolKind>,
    {
        for cell in self.grid.coords().collect::<Vec<_>>() {
            let Some(replacement) = self.grid.symbol(cell).and_then(&mut rewrite) else {
                continue;
            };
            let _ = self.grid.set_symbol(cell, Some(replacement));
        }
    }

    fn end_level(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        let accepted = self
            .outcome
            .map_or(true, |current| current.can_become(outcome));
        if !accepted {
            return;
        }

        if let Some(cell) = self.selection.take() {
            out_events.push(Event::CellHighlighted {
                cell,
                highlighted: false,
            });
        }
        if outcome == Outcome::BoardCorrupted {
            log::warn!("level {} suspended: board corrupted", self.level.level);
        } else {
            log::info!("level {} ended: {outcome:?}", self.level.level);
        }
        self.outcome = Some(outcome);
        out_events.push(Event::LevelEnded {
            level: self.level.level,
            outcome,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel { level } => world.start_level(level, out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_cycles(dt, out_events);
        }
        Command::PickCell { cell } => world.pick(cell, out_events),
        Command::ResolveMatches => world.resolve_matches(out_events),
        Command::ApplyMarketEvent { event } => world.apply_market_event(event, out_events),
        Command::EndLevel { outcome } => world.end_level(outcome, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use market_match_core::{CellCoord, Grid, InputPhase, LevelState, Outcome, SpawnTable};

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the level counters.
    #[must_use]
    pub fn level_state(world: &World) -> &LevelState {
        &world.level
    }

    /// Provides read-only access to the active spawn odds.
    #[must_use]
    pub fn spawn_table(world: &World) -> &SpawnTable {
        &world.spawn
    }

    /// Current news headline.
    #[must_use]
    pub fn headline(world: &World) -> &str {
        &world.headline
    }

    /// Reports the swap transaction's state.
    #[must_use]
    pub fn input_phase(world: &World) -> InputPhase {
        if world.input_locked() {
            InputPhase::Locked
        } else if let Some(first) = world.selection {
            InputPhase::AwaitingSecondPick { first }
        } else if !world.cycles.is_empty() {
            InputPhase::Resolving
        } else {
            InputPhase::Idle
        }
    }

    /// Whether picks are currently accepted.
    #[must_use]
    pub fn accepts_input(world: &World) -> bool {
        world.outcome.is_none() && !world.input_locked()
    }

    /// Whether the board may be scanned for cascades this tick.
    #[must_use]
    pub fn detection_enabled(world: &World) -> bool {
        world.detection_enabled()
    }

    /// Cells of running cycles that have not been refilled yet.
    #[must_use]
    pub fn respawning_cells(world: &World) -> Vec<CellCoord> {
        world
            .cycles
            .iter()
            .filter(|cycle| cycle.awaiting_respawn())
            .flat_map(|cycle| cycle.cells().iter().copied())
            .collect()
    }

    /// Terminal outcome recorded for the level, if any.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }
}

/// Board overrides used by tests to stage specific positions.
#[cfg(any(test, feature = "grid_scaffolding"))]
pub mod scaffolding {
    use super::World;
    use market_match_core::{Cell, CellCoord, Grid, LevelState};

    /// Replaces the whole board. The size of `grid` becomes the board size.
    pub fn replace_grid(world: &mut World, grid: Grid) {
        world.config.rows = grid.rows();
        world.config.columns = grid.columns();
        world.grid = grid;
    }

    /// Overwrites a single cell, including with a partially empty payload.
    pub fn set_cell(world: &mut World, cell: CellCoord, payload: Cell) -> bool {
        world.grid.set(cell, payload)
    }

    /// Overwrites the level counters.
    pub fn set_level_state(world: &mut World, state: LevelState) {
        world.level = state;
    }
}
