//! Timed resolution cycles driven by the world's tick.

use std::time::Duration;

use market_match_core::CellCoord;

/// Progress reported by a cycle after it absorbed a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CycleStep {
    /// Nothing to do this tick.
    Waiting,
    /// The destroy delay elapsed; matched cells must be refilled now.
    Respawn,
    /// The settle delay elapsed; the cycle can be retired.
    Settled,
    /// Both delays elapsed within the same tick.
    RespawnAndSettle,
}

/// One batch of matched cells travelling through destroy, refill and settle.
#[derive(Clone, Debug)]
pub(crate) struct ResolutionCycle {
    cells: Vec<CellCoord>,
    elapsed: Duration,
    respawned: bool,
}

impl ResolutionCycle {
    pub(crate) fn new(cells: Vec<CellCoord>) -> Self {
        Self {
            cells,
            elapsed: Duration::ZERO,
            respawned: false,
        }
    }

    pub(crate) fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Whether the cycle's cells still wait to be destroyed and refilled.
    pub(crate) fn awaiting_respawn(&self) -> bool {
        !self.respawned
    }

    /// Absorbs a tick and reports which deadlines were crossed.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        destroy_delay: Duration,
        settle_delay: Duration,
    ) -> CycleStep {
        self.elapsed = self.elapsed.saturating_add(dt);

        let respawn = !self.respawned && self.elapsed >= destroy_delay;
        if respawn {
            self.respawned = true;
        }
        let settled = self.respawned && self.elapsed >= settle_delay;

        match (respawn, settled) {
            (true, true) => CycleStep::RespawnAndSettle,
            (true, false) => CycleStep::Respawn,
            (false, true) => CycleStep::Settled,
            (false, false) => CycleStep::Waiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESTROY: Duration = Duration::from_millis(1_000);
    const SETTLE: Duration = Duration::from_millis(1_100);

    #[test]
    fn cycle_respawns_before_it_settles() {
        let mut cycle = ResolutionCycle::new(vec![CellCoord::new(0, 0)]);

        assert_eq!(cycle.advance(Duration::from_millis(600), DESTROY, SETTLE), CycleStep::Waiting);
        assert!(cycle.awaiting_respawn());
        assert_eq!(cycle.advance(Duration::from_millis(400), DESTROY, SETTLE), CycleStep::Respawn);
        assert!(!cycle.awaiting_respawn());
        assert_eq!(cycle.advance(Duration::from_millis(50), DESTROY, SETTLE), CycleStep::Waiting);
        assert_eq!(cycle.advance(Duration::from_millis(50), DESTROY, SETTLE), CycleStep::Settled);
    }

    #[test]
    fn long_tick_crosses_both_deadlines() {
        let mut cycle = ResolutionCycle::new(vec![CellCoord::new(0, 0)]);
        assert_eq!(
            cycle.advance(Duration::from_secs(5), DESTROY, SETTLE),
            CycleStep::RespawnAndSettle
        );
    }

    #[test]
    fn settle_delay_shorter_than_destroy_waits_for_respawn() {
        let mut cycle = ResolutionCycle::new(vec![CellCoord::new(0, 0)]);
        let settle = Duration::from_millis(200);
        assert_eq!(cycle.advance(Duration::from_millis(500), DESTROY, settle), CycleStep::Waiting);
        assert_eq!(
            cycle.advance(Duration::from_millis(500), DESTROY, settle),
            CycleStep::RespawnAndSettle
        );
    }
}
