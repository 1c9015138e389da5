#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Market Match engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`Grid`] and [`LevelState`], and respond exclusively with new
//! command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod grid;
mod level;
mod market;
mod spawn;

pub use grid::{Cell, Grid, MatchSet, MatchedCell, DEFAULT_COLUMNS, DEFAULT_ROWS};
pub use level::{LevelState, Outcome};
pub use market::MarketEvent;
pub use spawn::{pick_weighted, BlockWeights, SpawnTable, SymbolWeights, LEVEL_BLOCK_WEIGHTS};

/// Headline shown when a level opens.
pub const OPENING_HEADLINE: &str = "Stock market opened. Happy trading!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Loads the requested level: spawn odds, a fresh board and reset counters.
    StartLevel {
        /// One-based level number. Zero is treated as level one.
        level: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Delivers a cell picked by the player.
    PickCell {
        /// Cell the player selected.
        cell: CellCoord,
    },
    /// Requests that any matches currently on the board be resolved.
    ResolveMatches,
    /// Requests that a market event rewrite spawn odds or the board.
    ApplyMarketEvent {
        /// Event to apply.
        event: MarketEvent,
    },
    /// Requests that the session stop with the provided terminal outcome.
    EndLevel {
        /// Outcome reached by the session.
        outcome: Outcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a level was loaded and its counters reset.
    LevelStarted {
        /// Level that became active.
        level: u32,
        /// Move budget available for the level.
        moves_left: u32,
        /// Profit required to clear the level.
        goal: f32,
        /// Score multiplier applied to every match on the level.
        roi: f32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Toggles the matched/selected visual state of a cell.
    CellHighlighted {
        /// Cell whose visual state changed.
        cell: CellCoord,
        /// Whether the cell is now highlighted.
        highlighted: bool,
    },
    /// Reports that a swap produced no match and was undone.
    SwapReverted {
        /// First picked cell.
        first: CellCoord,
        /// Second picked cell.
        second: CellCoord,
    },
    /// Confirms that a swap produced a match and consumed a move.
    MoveCommitted {
        /// Moves remaining after the decrement.
        moves_left: u32,
    },
    /// Reports a change of the running profit.
    ScoreChanged {
        /// Profit accumulated on the level so far.
        score: f32,
        /// Net profit contributed by the latest resolution cycle.
        delta: f32,
    },
    /// Confirms that a resolution cycle began for the listed cells.
    ResolutionStarted {
        /// Cells matched by the cycle, in row-major order.
        cells: Vec<CellCoord>,
    },
    /// Confirms that matched cells were destroyed and refilled.
    CellsRespawned {
        /// Cells that received a fresh payload.
        cells: Vec<CellCoord>,
    },
    /// Announces that every resolution cycle settled and detection resumed.
    DetectionResumed,
    /// Confirms that a market event was applied.
    MarketEventApplied {
        /// Event that was applied.
        event: MarketEvent,
    },
    /// Replaces the news headline shown to the player.
    HeadlineChanged {
        /// Text of the new headline.
        headline: String,
    },
    /// Announces that the session reached a terminal outcome.
    LevelEnded {
        /// Level that ended.
        level: u32,
        /// Outcome that ended it.
        outcome: Outcome,
    },
}

/// Selection progress of the swap transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputPhase {
    /// No cell is selected.
    Idle,
    /// One cell is selected and the next pick attempts a swap.
    AwaitingSecondPick {
        /// Cell selected by the first pick.
        first: CellCoord,
    },
    /// At least one resolution cycle is running but input is accepted.
    Resolving,
    /// Matched cells are mid-destroy; picks are ignored.
    Locked,
}

/// Location of a single board cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the cell `offset` rows below, if representable.
    #[must_use]
    pub fn down(self, offset: u32) -> Option<Self> {
        self.row
            .checked_add(offset)
            .map(|row| Self::new(row, self.column))
    }

    /// Returns the cell `offset` columns to the right, if representable.
    #[must_use]
    pub fn right(self, offset: u32) -> Option<Self> {
        self.column
            .checked_add(offset)
            .map(|column| Self::new(self.row, column))
    }
}

/// Profit/loss modifier carried by the block overlay of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    /// Adds one unit of multiplier per matched cell.
    Profit,
    /// Removes one unit of multiplier per matched cell.
    Loss,
    /// Removes five units of multiplier per matched cell.
    Bankrupt,
}

impl BlockKind {
    /// Every block kind in declaration order.
    pub const ALL: [BlockKind; 3] = [BlockKind::Profit, BlockKind::Loss, BlockKind::Bankrupt];

    /// Multiplier contribution of one matched cell carrying this block.
    #[must_use]
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::Profit => 1.0,
            Self::Loss => -1.0,
            Self::Bankrupt => -5.0,
        }
    }
}

/// Tradable-asset icon carried by the symbol overlay of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Lowest value asset.
    Coin,
    /// Paper money.
    Paperbill,
    /// Wallet.
    Wallet,
    /// Bag of money.
    Moneybag,
    /// Highest value asset.
    Goldbar,
}

impl SymbolKind {
    /// Every symbol kind in declaration order.
    pub const ALL: [SymbolKind; 5] = [
        SymbolKind::Coin,
        SymbolKind::Paperbill,
        SymbolKind::Wallet,
        SymbolKind::Moneybag,
        SymbolKind::Goldbar,
    ];

    /// Base value of the symbol used by the score formula.
    #[must_use]
    pub const fn value(self) -> f32 {
        match self {
            Self::Coin => 1.0,
            Self::Paperbill => 2.0,
            Self::Wallet => 3.0,
            Self::Moneybag => 4.0,
            Self::Goldbar => 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockKind, CellCoord, Grid, MarketEvent, Outcome, SymbolKind};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn block_multipliers_match_modifier_table() {
        let multipliers: Vec<f32> = BlockKind::ALL.iter().map(|kind| kind.multiplier()).collect();
        assert_eq!(multipliers, vec![1.0, -1.0, -5.0]);
    }

    #[test]
    fn symbol_values_increase_in_declaration_order() {
        let values: Vec<f32> = SymbolKind::ALL.iter().map(|kind| kind.value()).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn neighbour_offsets_saturate_at_numeric_bounds() {
        let origin = CellCoord::new(2, 3);
        assert_eq!(origin.down(2), Some(CellCoord::new(4, 3)));
        assert_eq!(origin.right(1), Some(CellCoord::new(2, 4)));
        assert_eq!(CellCoord::new(u32::MAX, 0).down(1), None);
    }

    #[test]
    fn board_snapshot_round_trips_through_bincode() {
        let mut grid = Grid::new(3, 3);
        let _ = grid.set_block(CellCoord::new(1, 1), Some(BlockKind::Bankrupt));
        let _ = grid.set_symbol(CellCoord::new(1, 1), Some(SymbolKind::Goldbar));
        assert_round_trip(&grid);
    }

    #[test]
    fn outcome_and_event_round_trip_through_bincode() {
        assert_round_trip(&Outcome::BoardCorrupted);
        assert_round_trip(&MarketEvent::GoldFever);
    }
}
