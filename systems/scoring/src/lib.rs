#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Net profit computation for a batch of matched cells.

use market_match_core::{MatchSet, SymbolKind};

/// Order in which symbol categories are considered when scoring a batch.
///
/// Only the first category present in a batch is scored; later categories in
/// the same batch contribute nothing.
pub const SCORE_PRIORITY: [SymbolKind; 5] = [
    SymbolKind::Coin,
    SymbolKind::Paperbill,
    SymbolKind::Wallet,
    SymbolKind::Goldbar,
    SymbolKind::Moneybag,
];

/// Per-category tally of a matched batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CategoryTally {
    /// Number of matched cells showing the category's symbol.
    pub cells: u32,
    /// Sum of the block multipliers under those cells.
    pub multiplier: f32,
}

/// Tallies matched cells by symbol category.
#[must_use]
pub fn tally(matches: &MatchSet, symbol: SymbolKind) -> CategoryTally {
    matches
        .iter()
        .filter(|(_, matched)| matched.symbol == symbol)
        .fold(CategoryTally::default(), |mut tally, (_, matched)| {
            tally.cells += 1;
            tally.multiplier += matched.block.multiplier();
            tally
        })
}

/// Net profit of a matched batch at the given return on investment.
///
/// The first category of [`SCORE_PRIORITY`] with at least one matched cell
/// yields `value * multiplier * roi`. The result may be negative or zero.
#[must_use]
pub fn score(matches: &MatchSet, roi: f32) -> f32 {
    SCORE_PRIORITY
        .iter()
        .map(|&symbol| (symbol, tally(matches, symbol)))
        .find(|(_, tally)| tally.cells > 0)
        .map_or(0.0, |(symbol, tally)| symbol.value() * tally.multiplier * roi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_match_core::{BlockKind, CellCoord, MatchedCell};

    fn batch(entries: &[(u32, SymbolKind, BlockKind)]) -> MatchSet {
        let mut matches = MatchSet::new();
        for &(column, symbol, block) in entries {
            matches.mark(CellCoord::new(0, column), MatchedCell { symbol, block });
        }
        matches
    }

    #[test]
    fn empty_batch_scores_nothing() {
        assert_eq!(score(&MatchSet::new(), 3.0), 0.0);
    }

    #[test]
    fn profit_triple_scales_with_value_and_roi() {
        let matches = batch(&[
            (0, SymbolKind::Wallet, BlockKind::Profit),
            (1, SymbolKind::Wallet, BlockKind::Profit),
            (2, SymbolKind::Wallet, BlockKind::Profit),
        ]);
        assert_eq!(score(&matches, 2.0), 3.0 * 3.0 * 2.0);
    }

    #[test]
    fn bankrupt_triple_is_a_loss() {
        let matches = batch(&[
            (0, SymbolKind::Paperbill, BlockKind::Bankrupt),
            (1, SymbolKind::Paperbill, BlockKind::Bankrupt),
            (2, SymbolKind::Paperbill, BlockKind::Bankrupt),
        ]);
        assert_eq!(score(&matches, 4.0), 2.0 * (-5.0 * 3.0) * 4.0);
    }

    #[test]
    fn mixed_blocks_can_cancel_out() {
        let matches = batch(&[
            (0, SymbolKind::Coin, BlockKind::Profit),
            (1, SymbolKind::Coin, BlockKind::Loss),
            (2, SymbolKind::Coin, BlockKind::Profit),
            (3, SymbolKind::Coin, BlockKind::Loss),
        ]);
        assert_eq!(score(&matches, 7.0), 0.0);
    }

    #[test]
    fn coin_outranks_goldbar_in_the_same_batch() {
        let matches = batch(&[
            (0, SymbolKind::Goldbar, BlockKind::Profit),
            (1, SymbolKind::Goldbar, BlockKind::Profit),
            (2, SymbolKind::Goldbar, BlockKind::Profit),
            (3, SymbolKind::Coin, BlockKind::Profit),
            (4, SymbolKind::Coin, BlockKind::Loss),
            (5, SymbolKind::Coin, BlockKind::Profit),
        ]);
        assert_eq!(score(&matches, 1.0), 1.0);
    }

    #[test]
    fn goldbar_outranks_moneybag() {
        let matches = batch(&[
            (0, SymbolKind::Moneybag, BlockKind::Profit),
            (1, SymbolKind::Moneybag, BlockKind::Profit),
            (2, SymbolKind::Moneybag, BlockKind::Profit),
            (3, SymbolKind::Goldbar, BlockKind::Loss),
            (4, SymbolKind::Goldbar, BlockKind::Loss),
            (5, SymbolKind::Goldbar, BlockKind::Loss),
        ]);
        assert_eq!(score(&matches, 1.0), 5.0 * -3.0);
    }

    #[test]
    fn tally_counts_only_the_requested_category() {
        let matches = batch(&[
            (0, SymbolKind::Coin, BlockKind::Bankrupt),
            (1, SymbolKind::Wallet, BlockKind::Profit),
        ]);
        let coins = tally(&matches, SymbolKind::Coin);
        assert_eq!(coins.cells, 1);
        assert_eq!(coins.multiplier, -5.0);
    }
}
