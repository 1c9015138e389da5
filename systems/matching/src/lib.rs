#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match detection over the symbol overlay and the per-tick cascade trigger.

use market_match_core::{CellCoord, Command, Event, Grid, MatchSet, MatchedCell};

/// Length of the windows scanned for matches.
pub const MATCH_LENGTH: u32 = 3;

/// Scans every fixed-length window anchored at every cell and marks matches.
///
/// A window matches when all of its cells are populated and share a symbol.
/// Runs longer than [`MATCH_LENGTH`] are found as overlapping windows; cells
/// are marked once, with the symbol and block present at detection time.
/// Cells missing either overlay never match.
#[must_use]
pub fn find_matches(grid: &Grid) -> MatchSet {
    let mut matches = MatchSet::new();
    for origin in grid.coords() {
        if origin.row() + MATCH_LENGTH <= grid.rows() {
            mark_window(grid, origin, CellCoord::down, &mut matches);
        }
        if origin.column() + MATCH_LENGTH <= grid.columns() {
            mark_window(grid, origin, CellCoord::right, &mut matches);
        }
    }
    matches
}

fn mark_window(
    grid: &Grid,
    origin: CellCoord,
    step: fn(CellCoord, u32) -> Option<CellCoord>,
    matches: &mut MatchSet,
) {
    let mut window = [None; MATCH_LENGTH as usize];
    for (offset, slot) in (0..MATCH_LENGTH).zip(window.iter_mut()) {
        *slot = step(origin, offset).and_then(|cell| matched_cell(grid, cell).map(|m| (cell, m)));
    }

    let Some((_, first)) = window[0] else {
        return;
    };
    let uniform = window
        .iter()
        .all(|entry| matches!(entry, Some((_, cell)) if cell.symbol == first.symbol));
    if !uniform {
        return;
    }

    for (cell, matched) in window.into_iter().flatten() {
        matches.mark(cell, matched);
    }
}

fn matched_cell(grid: &Grid, cell: CellCoord) -> Option<MatchedCell> {
    let payload = grid.get(cell)?;
    Some(MatchedCell {
        symbol: payload.symbol?,
        block: payload.block?,
    })
}

/// Pure system that asks the world to resolve matches left on the board.
///
/// Matches formed by refills or market events are not tied to a swap; the
/// cascade notices them on the next tick while detection is enabled.
#[derive(Debug, Default)]
pub struct Cascade;

impl Cascade {
    /// Creates a new cascade system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and the current board to emit resolve commands.
    ///
    /// `detection_enabled` mirrors the world's suppression flag: no command is
    /// emitted while a previous batch is still settling.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: &Grid,
        detection_enabled: bool,
        out: &mut Vec<Command>,
    ) {
        if !detection_enabled {
            return;
        }

        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !ticked {
            return;
        }

        let matches = find_matches(grid);
        if matches.is_empty() {
            return;
        }

        log::debug!("cascade found {} matched cells", matches.len());
        out.push(Command::ResolveMatches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_match_core::{BlockKind, Cell, SymbolKind};

    #[test]
    fn window_skips_cells_missing_a_block() {
        let mut grid = Grid::new(1, 3);
        for column in 0..3 {
            let _ = grid.set(CellCoord::new(0, column), Cell::new(BlockKind::Profit, SymbolKind::Coin));
        }
        let _ = grid.set_block(CellCoord::new(0, 1), None);

        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn boards_smaller_than_a_window_never_match() {
        let mut grid = Grid::new(2, 2);
        for cell in grid.coords().collect::<Vec<_>>() {
            let _ = grid.set(cell, Cell::new(BlockKind::Loss, SymbolKind::Wallet));
        }
        assert!(find_matches(&grid).is_empty());
    }
}
