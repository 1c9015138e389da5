//! Board storage shared by the world and the pure systems.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BlockKind, CellCoord, SymbolKind};

/// Number of rows on a standard board.
pub const DEFAULT_ROWS: u32 = 6;
/// Number of columns on a standard board.
pub const DEFAULT_COLUMNS: u32 = 9;

/// Payload held by a single board cell.
///
/// Both overlays are populated during normal play. A cell is empty only while
/// it waits to be refilled after its match was destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Profit/loss modifier overlay.
    pub block: Option<BlockKind>,
    /// Asset icon overlay.
    pub symbol: Option<SymbolKind>,
}

impl Cell {
    /// Creates a fully populated cell.
    #[must_use]
    pub const fn new(block: BlockKind, symbol: SymbolKind) -> Self {
        Self {
            block: Some(block),
            symbol: Some(symbol),
        }
    }

    /// Creates a cell with neither overlay present.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            block: None,
            symbol: None,
        }
    }

    /// Reports whether both overlays are present.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.block.is_some() && self.symbol.is_some()
    }
}

/// Dense row-major board of cells with fixed coordinates.
///
/// Coordinates never move; swaps exchange payloads between two positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a board of the given size with every cell empty.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(rows) * u64::from(columns);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            rows,
            columns,
            cells: vec![Cell::empty(); capacity],
        }
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Returns the payload stored at the coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Returns the symbol at the coordinate when the cell is in bounds and has one.
    #[must_use]
    pub fn symbol(&self, cell: CellCoord) -> Option<SymbolKind> {
        self.get(cell).and_then(|payload| payload.symbol)
    }

    /// Returns the block at the coordinate when the cell is in bounds and has one.
    #[must_use]
    pub fn block(&self, cell: CellCoord) -> Option<BlockKind> {
        self.get(cell).and_then(|payload| payload.block)
    }

    /// Replaces the payload of a cell. Returns `false` when out of bounds.
    pub fn set(&mut self, cell: CellCoord, payload: Cell) -> bool {
        match self.slot_mut(cell) {
            Some(slot) => {
                *slot = payload;
                true
            }
            None => false,
        }
    }

    /// Replaces the block overlay of a cell. Returns `false` when out of bounds.
    pub fn set_block(&mut self, cell: CellCoord, block: Option<BlockKind>) -> bool {
        match self.slot_mut(cell) {
            Some(slot) => {
                slot.block = block;
                true
            }
            None => false,
        }
    }

    /// Replaces the symbol overlay of a cell. Returns `false` when out of bounds.
    pub fn set_symbol(&mut self, cell: CellCoord, symbol: Option<SymbolKind>) -> bool {
        match self.slot_mut(cell) {
            Some(slot) => {
                slot.symbol = symbol;
                true
            }
            None => false,
        }
    }

    /// Empties both overlays of a cell. Returns `false` when out of bounds.
    pub fn clear(&mut self, cell: CellCoord) -> bool {
        self.set(cell, Cell::empty())
    }

    /// Exchanges the payloads of two cells.
    ///
    /// Returns `false` and leaves the board untouched when either coordinate is
    /// out of bounds.
    pub fn swap(&mut self, first: CellCoord, second: CellCoord) -> bool {
        match (self.index(first), self.index(second)) {
            (Some(a), Some(b)) => {
                self.cells.swap(a, b);
                true
            }
            _ => false,
        }
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }

    /// Iterates over every coordinate paired with its payload in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        self.coords().zip(self.cells.iter().copied())
    }

    /// Lists every cell missing at least one overlay.
    #[must_use]
    pub fn unpopulated_cells(&self) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, payload)| !payload.is_populated())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Reports whether every cell carries both overlays.
    #[must_use]
    pub fn is_fully_populated(&self) -> bool {
        self.cells.iter().all(Cell::is_populated)
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        let index = self.index(cell)?;
        self.cells.get_mut(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Overlays captured at a matched cell when the match was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchedCell {
    /// Symbol that formed the match.
    pub symbol: SymbolKind,
    /// Block present under the symbol.
    pub block: BlockKind,
}

/// Cells marked by a single detector pass.
///
/// Marking is a set write: a cell covered by several overlapping windows is
/// recorded once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    cells: BTreeMap<CellCoord, MatchedCell>,
}

impl MatchSet {
    /// Creates an empty match set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a matched cell, overwriting any previous entry for it.
    pub fn mark(&mut self, cell: CellCoord, matched: MatchedCell) {
        let _ = self.cells.insert(cell, matched);
    }

    /// Reports whether the set contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of distinct matched cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the cell was matched.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Returns the overlays captured for a matched cell.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<MatchedCell> {
        self.cells.get(&cell).copied()
    }

    /// Iterates over matched cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, MatchedCell)> + '_ {
        self.cells.iter().map(|(cell, matched)| (*cell, *matched))
    }

    /// Matched coordinates in row-major order.
    #[must_use]
    pub fn cells(&self) -> Vec<CellCoord> {
        self.cells.keys().copied().collect()
    }
}
