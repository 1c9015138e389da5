#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Market event director that turns committed moves into event commands.

use market_match_core::{Command, Event, MarketEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_REROLL_INTERVAL: u32 = 3;

/// Configuration parameters required to construct the director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    reroll_interval: u32,
}

impl Config {
    /// Creates a configuration with the default reroll cadence.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            reroll_interval: DEFAULT_REROLL_INTERVAL,
        }
    }

    /// Overrides the moves-left divisor that triggers a reroll. Zero disables rerolls.
    #[must_use]
    pub const fn with_reroll_interval(mut self, reroll_interval: u32) -> Self {
        self.reroll_interval = reroll_interval;
        self
    }
}

/// Pure system that chooses and re-applies market events.
///
/// A new event is drawn whenever the moves left after a committed swap are a
/// multiple of the reroll interval. The current event is applied again on
/// every committed swap until the next draw.
#[derive(Debug)]
pub struct MarketEvents {
    rng: ChaCha8Rng,
    reroll_interval: u32,
    current: MarketEvent,
}

impl MarketEvents {
    /// Creates a new director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            reroll_interval: config.reroll_interval,
            current: MarketEvent::Normal,
        }
    }

    /// Event applied on the most recent committed swap.
    #[must_use]
    pub const fn current(&self) -> MarketEvent {
        self.current
    }

    /// Consumes world events to emit market event commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelStarted { .. } => self.current = MarketEvent::Normal,
                Event::MoveCommitted { moves_left } => {
                    if self.should_reroll(*moves_left) {
                        self.current = MarketEvent::from_id(self.rng.gen_range(0..MarketEvent::COUNT));
                        log::info!(
                            "market event rerolled to {:?} with {moves_left} moves left",
                            self.current
                        );
                    }
                    out.push(Command::ApplyMarketEvent {
                        event: self.current,
                    });
                }
                _ => {}
            }
        }
    }

    fn should_reroll(&self, moves_left: u32) -> bool {
        self.reroll_interval != 0 && moves_left % self.reroll_interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_never_rerolls() {
        let director = MarketEvents::new(Config::new(1).with_reroll_interval(0));
        assert!(!director.should_reroll(0));
        assert!(!director.should_reroll(3));
    }

    #[test]
    fn reroll_follows_moves_left_residue() {
        let director = MarketEvents::new(Config::new(1));
        assert!(director.should_reroll(6));
        assert!(director.should_reroll(0));
        assert!(!director.should_reroll(7));
    }
}
