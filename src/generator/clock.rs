use rand::Rng;

/// A logical clock that hands out overlapping intervals around an advancing reference time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalClock {
    now: i64,
}

impl IntervalClock {
    pub fn new() -> Self {
        IntervalClock { now: 0 }
    }

    pub fn starting_at(now: i64) -> Self {
        IntervalClock { now }
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Moves the reference time forward by a draw from `[1, max_delta]`.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, max_delta: i64) -> i64 {
        self.now += rng.gen_range(1..=max_delta.max(1));
        self.now
    }

    /// Draws `[start, end)` with both ends within `max_radius` of `t`; `end > start` always.
    pub fn interval_around<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        t: i64,
        max_radius: i64,
    ) -> (i64, i64) {
        let radius = max_radius.max(0);
        let start = t - rng.gen_range(0..=radius);
        let end = (start + 1).max(t + rng.gen_range(0..=radius));
        (start, end)
    }
}
