//! Scripted market events that rewrite spawn odds or the board.

use serde::{Deserialize, Serialize};

use crate::{BlockKind, CellCoord};

/// One of the ten market events drawn by the event director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketEvent {
    /// Restores the level's default block odds.
    Normal,
    /// Only profit blocks spawn.
    BullRun,
    /// Only loss blocks spawn.
    BearRun,
    /// Rewrites blocks in loss/profit stripes by row parity.
    ShortLadder,
    /// Rewrites every block to loss.
    MarketCrash,
    /// Turns every gold bar into a coin.
    GoldCrash,
    /// Rewrites blocks in a loss/profit checkerboard.
    DeltaHedge,
    /// Rewrites the first and last rows to loss and everything else to profit.
    ShortSqueeze,
    /// Rewrites every block to profit.
    Frenzy,
    /// Turns every other symbol into a gold bar.
    GoldFever,
}

impl MarketEvent {
    /// Number of distinct event identifiers drawn by the director.
    pub const COUNT: u32 = 10;

    /// Maps a drawn identifier to its event. Unmapped identifiers are neutral.
    #[must_use]
    pub const fn from_id(id: u32) -> Self {
        match id {
            1 => Self::BullRun,
            2 => Self::BearRun,
            3 => Self::ShortLadder,
            4 => Self::MarketCrash,
            5 => Self::GoldCrash,
            6 => Self::DeltaHedge,
            7 => Self::ShortSqueeze,
            8 => Self::Frenzy,
            9 => Self::GoldFever,
            _ => Self::Normal,
        }
    }

    /// Identifier of the event.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::BullRun => 1,
            Self::BearRun => 2,
            Self::ShortLadder => 3,
            Self::MarketCrash => 4,
            Self::GoldCrash => 5,
            Self::DeltaHedge => 6,
            Self::ShortSqueeze => 7,
            Self::Frenzy => 8,
            Self::GoldFever => 9,
        }
    }

    /// News headline announced when the event is applied.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Normal => "The stock market is trading normally. Good luck!",
            Self::BullRun => "Stocks rally as the market heads towards a bull market.",
            Self::BearRun => "Stocks tank as the market heads towards a bear market.",
            Self::ShortLadder => {
                "Hedge funds have engaged in a short ladder attack against the market!"
            }
            Self::MarketCrash => "Hedge funds have artifically crashed the market!",
            Self::GoldCrash => "Market manipulators have started a gold crash!",
            Self::DeltaHedge => "Market makers are currently delta hedging the market!",
            Self::ShortSqueeze => {
                "The retail investors have banded together and started a short squeeze in the market!"
            }
            Self::Frenzy => {
                "The stock market frenzy has begun! All investors are piling in to buy buy buy!"
            }
            Self::GoldFever => "The market is now experiencing a gold fever!",
        }
    }

    /// Block pattern written over the whole board, for patterned events.
    ///
    /// `last_row` is the index of the bottom row of the board.
    #[must_use]
    pub fn block_pattern(self, cell: CellCoord, last_row: u32) -> Option<BlockKind> {
        let alternate = |even: bool| {
            if even {
                BlockKind::Loss
            } else {
                BlockKind::Profit
            }
        };
        match self {
            Self::ShortLadder => Some(alternate(cell.row() % 2 == 0)),
            Self::MarketCrash => Some(BlockKind::Loss),
            Self::DeltaHedge => Some(alternate(cell.row() % 2 == cell.column() % 2)),
            Self::ShortSqueeze => Some(if cell.row() == 0 || cell.row() == last_row {
                BlockKind::Loss
            } else {
                BlockKind::Profit
            }),
            Self::Frenzy => Some(BlockKind::Profit),
            Self::Normal
            | Self::BullRun
            | Self::BearRun
            | Self::GoldCrash
            | Self::GoldFever => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_and_unmapped_is_neutral() {
        for id in 0..MarketEvent::COUNT {
            assert_eq!(MarketEvent::from_id(id).id(), id);
        }
        assert_eq!(MarketEvent::from_id(17), MarketEvent::Normal);
    }

    #[test]
    fn stripes_follow_row_parity() {
        let event = MarketEvent::ShortLadder;
        assert_eq!(event.block_pattern(CellCoord::new(0, 4), 5), Some(BlockKind::Loss));
        assert_eq!(event.block_pattern(CellCoord::new(1, 4), 5), Some(BlockKind::Profit));
    }

    #[test]
    fn checkerboard_follows_coordinate_sum_parity() {
        let event = MarketEvent::DeltaHedge;
        assert_eq!(event.block_pattern(CellCoord::new(1, 1), 5), Some(BlockKind::Loss));
        assert_eq!(event.block_pattern(CellCoord::new(1, 2), 5), Some(BlockKind::Profit));
    }

    #[test]
    fn squeeze_marks_outer_rows_only() {
        let event = MarketEvent::ShortSqueeze;
        assert_eq!(event.block_pattern(CellCoord::new(0, 3), 5), Some(BlockKind::Loss));
        assert_eq!(event.block_pattern(CellCoord::new(5, 3), 5), Some(BlockKind::Loss));
        assert_eq!(event.block_pattern(CellCoord::new(3, 3), 5), Some(BlockKind::Profit));
    }

    #[test]
    fn spawn_and_symbol_events_have_no_block_pattern() {
        for event in [
            MarketEvent::Normal,
            MarketEvent::BullRun,
            MarketEvent::BearRun,
            MarketEvent::GoldCrash,
            MarketEvent::GoldFever,
        ] {
            assert_eq!(event.block_pattern(CellCoord::new(0, 0), 5), None);
        }
    }

    #[test]
    fn headlines_match_the_news_ticker() {
        assert_eq!(
            MarketEvent::Normal.headline(),
            "The stock market is trading normally. Good luck!"
        );
        assert_eq!(
            MarketEvent::BullRun.headline(),
            "Stocks rally as the market heads towards a bull market."
        );
        assert_eq!(
            MarketEvent::GoldFever.headline(),
            "The market is now experiencing a gold fever!"
        );
        assert_eq!(crate::OPENING_HEADLINE, "Stock market opened. Happy trading!");
    }

    #[test]
    fn every_event_has_its_own_headline() {
        let mut headlines: Vec<_> = (0..MarketEvent::COUNT)
            .map(|id| MarketEvent::from_id(id).headline())
            .collect();
        headlines.sort_unstable();
        headlines.dedup();
        assert_eq!(headlines.len(), MarketEvent::COUNT as usize);
    }
}
