//! Text presentation of the board and the session's counters.

use std::{collections::BTreeSet, fmt::Write as _};

use market_match_core::{BlockKind, CellCoord, Event, Grid, Outcome, SymbolKind};

/// Terminal view fed exclusively by world events.
#[derive(Debug, Default)]
pub(crate) struct Display {
    highlighted: BTreeSet<CellCoord>,
    level: u32,
    moves_left: u32,
    score: f32,
    goal: f32,
    roi: f32,
    headline: String,
}

impl Display {
    /// Updates the view from a batch of events and returns the lines worth announcing.
    pub(crate) fn absorb(&mut self, events: &[Event]) -> Vec<String> {
        let mut notes = Vec::new();
        for event in events {
            match event {
                Event::LevelStarted {
                    level,
                    moves_left,
                    goal,
                    roi,
                } => {
                    self.highlighted.clear();
                    self.level = *level;
                    self.moves_left = *moves_left;
                    self.score = 0.0;
                    self.goal = *goal;
                    self.roi = *roi;
                    notes.push(format!("Level {level}: reach {goal} in {moves_left} moves."));
                }
                Event::CellHighlighted { cell, highlighted } => {
                    let _ = if *highlighted {
                        self.highlighted.insert(*cell)
                    } else {
                        self.highlighted.remove(cell)
                    };
                }
                Event::SwapReverted { .. } => notes.push("No match, swap undone.".to_owned()),
                Event::MoveCommitted { moves_left } => self.moves_left = *moves_left,
                Event::ScoreChanged { score, delta } => {
                    self.score = *score;
                    notes.push(format!("{delta:+} -> {score}"));
                }
                Event::HeadlineChanged { headline } => {
                    if *headline != self.headline {
                        notes.push(format!("NEWS: {headline}"));
                    }
                    self.headline.clone_from(headline);
                }
                Event::LevelEnded { level, outcome } => notes.push(outcome_banner(*level, *outcome)),
                Event::TimeAdvanced { .. }
                | Event::ResolutionStarted { .. }
                | Event::CellsRespawned { .. }
                | Event::DetectionResumed
                | Event::MarketEventApplied { .. } => {}
            }
        }
        notes
    }

    /// Status line with the level counters.
    pub(crate) fn status(&self) -> String {
        format!(
            "level {} | moves {} | score {} / {} | roi x{}",
            self.level, self.moves_left, self.score, self.goal, self.roi
        )
    }

    /// Renders the board, bracketing highlighted cells.
    pub(crate) fn render(&self, grid: &Grid) -> String {
        let mut text = String::from("   ");
        for column in 0..grid.columns() {
            let _ = write!(text, " {column:^4}");
        }
        text.push('\n');

        for row in 0..grid.rows() {
            let _ = write!(text, "{row:>2} ");
            for column in 0..grid.columns() {
                let cell = CellCoord::new(row, column);
                let face = grid.get(cell).map_or_else(
                    || "  ".to_owned(),
                    |payload| {
                        format!(
                            "{}{}",
                            payload.symbol.map_or('.', symbol_glyph),
                            payload.block.map_or('.', block_glyph)
                        )
                    },
                );
                if self.highlighted.contains(&cell) {
                    let _ = write!(text, " [{face}]");
                } else {
                    let _ = write!(text, "  {face} ");
                }
            }
            text.push('\n');
        }
        text
    }
}

fn symbol_glyph(symbol: SymbolKind) -> char {
    match symbol {
        SymbolKind::Coin => 'c',
        SymbolKind::Paperbill => 'p',
        SymbolKind::Wallet => 'w',
        SymbolKind::Moneybag => 'm',
        SymbolKind::Goldbar => 'g',
    }
}

fn block_glyph(block: BlockKind) -> char {
    match block {
        BlockKind::Profit => '+',
        BlockKind::Loss => '-',
        BlockKind::Bankrupt => '!',
    }
}

fn outcome_banner(level: u32, outcome: Outcome) -> String {
    match outcome {
        Outcome::LevelCleared => format!("Level {level} cleared!"),
        Outcome::GameOver => format!("Out of moves on level {level}. Game over."),
        Outcome::BoardCorrupted => format!("The board broke on level {level}. Restarting."),
    }
}
