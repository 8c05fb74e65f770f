//! Fixed-timestep scheduler
//!
//! Keeps a single deadline for the next tick. Every wake-up runs ticks until
//! the deadline catches up with the clock, but never more than
//! `max_catchup_ticks` of them, so a stalled host cannot make one wake-up
//! arbitrarily long. Work that does not fit is not skipped: the simulation
//! just falls behind wall-clock time.

/// Deadline-based tick scheduler. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    next_tick_deadline: f64,
    dt: f64,
    max_catchup_ticks: u32,
}

impl Scheduler {
    pub fn new(now: f64, dt: f64, max_catchup_ticks: u32) -> Self {
        Self {
            next_tick_deadline: now,
            dt,
            max_catchup_ticks: max_catchup_ticks.max(1),
        }
    }

    #[inline]
    pub fn next_tick_deadline(&self) -> f64 {
        self.next_tick_deadline
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn max_catchup_ticks(&self) -> u32 {
        self.max_catchup_ticks
    }

    /// Run up to `max_catchup_ticks` calls of `step` for the deadlines that
    /// have passed at `now`. Returns how many ran.
    pub fn catch_up<F: FnMut()>(&mut self, now: f64, mut step: F) -> u32 {
        let mut ticks = 0;
        while now > self.next_tick_deadline && ticks < self.max_catchup_ticks {
            step();
            self.next_tick_deadline += self.dt;
            ticks += 1;
        }
        if ticks == self.max_catchup_ticks && now > self.next_tick_deadline {
            log::trace!(
                "Catch-up cap hit, {:.3}s behind",
                now - self.next_tick_deadline
            );
        }
        ticks
    }

    /// How long to suspend before the next tick is due
    #[inline]
    pub fn sleep_for(&self, now: f64) -> f64 {
        (self.next_tick_deadline - now).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 30.0;

    #[test]
    fn test_no_ticks_before_deadline() {
        let mut scheduler = Scheduler::new(10.0, DT, 5);
        let mut ticks = 0;
        // Deadline equals now: not yet strictly past
        assert_eq!(scheduler.catch_up(10.0, || ticks += 1), 0);
        assert_eq!(ticks, 0);
        assert_eq!(scheduler.sleep_for(10.0), 0.0);
    }

    #[test]
    fn test_one_tick_per_elapsed_dt() {
        let mut scheduler = Scheduler::new(0.0, DT, 5);
        assert_eq!(scheduler.catch_up(0.01, || {}), 1);
        assert!((scheduler.next_tick_deadline() - DT).abs() < 1e-12);
        assert!((scheduler.sleep_for(0.01) - (DT - 0.01)).abs() < 1e-12);

        // Clock has not passed the new deadline yet
        assert_eq!(scheduler.catch_up(0.02, || {}), 0);
    }

    #[test]
    fn test_burst_is_capped() {
        let mut scheduler = Scheduler::new(0.0, DT, 5);
        let mut ticks = 0;
        // Ten ticks' worth of elapsed time
        let now = 10.0 * DT + 1e-6;
        assert_eq!(scheduler.catch_up(now, || ticks += 1), 5);
        assert_eq!(ticks, 5);
        assert!((scheduler.next_tick_deadline() - 5.0 * DT).abs() < 1e-9);
        assert_eq!(scheduler.sleep_for(now), 0.0);

        // The backlog is worked off on later wake-ups, not dropped
        assert_eq!(scheduler.catch_up(now, || ticks += 1), 5);
        assert_eq!(scheduler.catch_up(now, || ticks += 1), 1);
        assert_eq!(ticks, 11);
    }

    #[test]
    fn test_cap_of_zero_is_raised_to_one() {
        let mut scheduler = Scheduler::new(0.0, DT, 0);
        assert_eq!(scheduler.max_catchup_ticks(), 1);
        assert_eq!(scheduler.catch_up(1.0, || {}), 1);
    }
}
