use crate::state::Side;

/// Counts consecutive skipped turns per side so a side that can no longer act
/// is reported once instead of on every turn.
#[derive(Clone, Debug, Default)]
pub(crate) struct StallTracker {
    skips: [u32; 2],
    notified: [bool; 2],
}

impl StallTracker {
    const fn slot(side: Side) -> usize {
        match side {
            Side::Ally => 0,
            Side::Enemy => 1,
        }
    }

    /// Records a skipped turn. Returns true the first time the run of skips
    /// reaches `threshold` times the side's living count.
    pub(crate) fn record_skip(&mut self, side: Side, living: usize, threshold: u32) -> bool {
        let slot = Self::slot(side);
        self.skips[slot] = self.skips[slot].saturating_add(1);

        let limit = u64::from(threshold.max(1)) * living.max(1) as u64;
        if !self.notified[slot] && u64::from(self.skips[slot]) >= limit {
            self.notified[slot] = true;
            return true;
        }
        false
    }

    pub(crate) fn record_success(&mut self, side: Side) {
        let slot = Self::slot(side);
        self.skips[slot] = 0;
        self.notified[slot] = false;
    }
}
