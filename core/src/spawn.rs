//! Discrete spawn distributions for the block and symbol overlays.

use serde::{Deserialize, Serialize};

use crate::{BlockKind, Cell, SymbolKind};

/// Block odds for levels one through ten as `(profit, loss, bankrupt)`.
///
/// Levels beyond the table reuse the last row.
pub const LEVEL_BLOCK_WEIGHTS: [(f32, f32, f32); 10] = [
    (0.95, 0.05, 0.00),
    (0.90, 0.10, 0.00),
    (0.85, 0.15, 0.00),
    (0.80, 0.20, 0.00),
    (0.75, 0.24, 0.01),
    (0.70, 0.27, 0.03),
    (0.65, 0.30, 0.05),
    (0.60, 0.33, 0.07),
    (0.55, 0.36, 0.09),
    (0.50, 0.40, 0.10),
];

/// Selects a kind from `weights` using the uniform draw `u` in `[0, 1)`.
///
/// Weights are walked in declaration order and the first kind whose cumulative
/// weight exceeds `u` wins. Draws beyond the cumulative total, which only occur
/// for tables summing below one, fall back to the first declared kind. Returns
/// `None` only for an empty table.
#[must_use]
pub fn pick_weighted<K: Copy>(weights: &[(K, f32)], u: f32) -> Option<K> {
    let mut cumulative = 0.0_f32;
    for &(kind, weight) in weights {
        cumulative += weight;
        if u < cumulative {
            return Some(kind);
        }
    }
    weights.first().map(|&(kind, _)| kind)
}

/// Spawn odds for the block overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockWeights {
    /// Chance of spawning a profit block.
    pub profit: f32,
    /// Chance of spawning a loss block.
    pub loss: f32,
    /// Chance of spawning a bankrupt block.
    pub bankrupt: f32,
}

impl BlockWeights {
    /// Creates a block distribution from explicit weights.
    #[must_use]
    pub const fn new(profit: f32, loss: f32, bankrupt: f32) -> Self {
        Self {
            profit,
            loss,
            bankrupt,
        }
    }

    /// Default odds for a level, clamped to the last table entry.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let last = LEVEL_BLOCK_WEIGHTS.len() - 1;
        let index = usize::try_from(level.saturating_sub(1))
            .unwrap_or(last)
            .min(last);
        let (profit, loss, bankrupt) = LEVEL_BLOCK_WEIGHTS[index];
        Self::new(profit, loss, bankrupt)
    }

    /// Samples a block kind from the uniform draw `u`.
    #[must_use]
    pub fn sample(&self, u: f32) -> BlockKind {
        let weights = [
            (BlockKind::Profit, self.profit),
            (BlockKind::Loss, self.loss),
            (BlockKind::Bankrupt, self.bankrupt),
        ];
        pick_weighted(&weights, u).unwrap_or(BlockKind::Profit)
    }
}

/// Spawn odds for the symbol overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolWeights {
    /// Chance of spawning a coin.
    pub coin: f32,
    /// Chance of spawning a paper bill.
    pub paperbill: f32,
    /// Chance of spawning a wallet.
    pub wallet: f32,
    /// Chance of spawning a money bag.
    pub moneybag: f32,
    /// Chance of spawning a gold bar.
    pub goldbar: f32,
}

impl Default for SymbolWeights {
    fn default() -> Self {
        Self {
            coin: 0.30,
            paperbill: 0.25,
            wallet: 0.20,
            moneybag: 0.15,
            goldbar: 0.10,
        }
    }
}

impl SymbolWeights {
    /// Samples a symbol kind from the uniform draw `u`.
    #[must_use]
    pub fn sample(&self, u: f32) -> SymbolKind {
        let weights = [
            (SymbolKind::Coin, self.coin),
            (SymbolKind::Paperbill, self.paperbill),
            (SymbolKind::Wallet, self.wallet),
            (SymbolKind::Moneybag, self.moneybag),
            (SymbolKind::Goldbar, self.goldbar),
        ];
        pick_weighted(&weights, u).unwrap_or(SymbolKind::Coin)
    }
}

/// Pair of independent distributions used to fill cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnTable {
    /// Block odds. Replaced per level and overridden by market events.
    pub blocks: BlockWeights,
    /// Symbol odds. Constant for the session.
    pub symbols: SymbolWeights,
}

impl SpawnTable {
    /// Spawn table used at the start of a level.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        Self {
            blocks: BlockWeights::for_level(level),
            symbols: SymbolWeights::default(),
        }
    }

    /// Builds a populated cell from two independent uniform draws.
    #[must_use]
    pub fn cell(&self, block_draw: f32, symbol_draw: f32) -> Cell {
        Cell::new(self.blocks.sample(block_draw), self.symbols.sample(symbol_draw))
    }
}
