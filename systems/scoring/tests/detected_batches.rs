use market_match_core::{BlockKind, Cell, CellCoord, Grid, SymbolKind};
use market_match_system_matching::find_matches;
use market_match_system_scoring::score;

fn fill_row(grid: &mut Grid, row: u32, cells: &[(SymbolKind, BlockKind)]) {
    for (column, &(symbol, block)) in cells.iter().enumerate() {
        assert!(grid.set(CellCoord::new(row, column as u32), Cell::new(block, symbol)));
    }
}

#[test]
fn coin_and_goldbar_matches_score_coin_only() {
    use BlockKind::{Loss, Profit};
    use SymbolKind::{Coin, Goldbar, Moneybag, Paperbill, Wallet};

    let mut grid = Grid::new(3, 4);
    fill_row(&mut grid, 0, &[(Goldbar, Profit), (Goldbar, Profit), (Goldbar, Profit), (Wallet, Profit)]);
    fill_row(&mut grid, 1, &[(Paperbill, Loss), (Wallet, Loss), (Moneybag, Loss), (Paperbill, Loss)]);
    fill_row(&mut grid, 2, &[(Coin, Profit), (Coin, Profit), (Coin, Profit), (Moneybag, Profit)]);

    let matches = find_matches(&grid);
    assert_eq!(matches.len(), 6);

    assert_eq!(score(&matches, 2.0), 1.0 * 3.0 * 2.0);
}

#[test]
fn all_bankrupt_triple_loses_value_times_fifteen_times_roi() {
    use BlockKind::{Bankrupt, Profit};
    use SymbolKind::{Coin, Moneybag, Paperbill};

    let mut grid = Grid::new(2, 3);
    fill_row(&mut grid, 0, &[(Moneybag, Bankrupt), (Moneybag, Bankrupt), (Moneybag, Bankrupt)]);
    fill_row(&mut grid, 1, &[(Coin, Profit), (Paperbill, Profit), (Coin, Profit)]);

    let matches = find_matches(&grid);

    assert_eq!(score(&matches, 3.0), 4.0 * (-5.0 * 3.0) * 3.0);
}
