//! Active-time clock and the countdowns driven by it.
//!
//! Timers never read the wall clock themselves. The caller hands an
//! [`Instant`] to [`ActiveClock::advance`], which folds only unpaused time
//! into a running total; every countdown stores its start as a point on that
//! total.

use std::time::{Duration, Instant};

use crate::config::GameConfig;

/// Extra time a sequential hazard may outlive its duration before a forced replacement.
pub const HAZARD_OVERRUN_GRACE: Duration = Duration::from_secs(1);

/// Accumulates gameplay time from caller-supplied timestamps, excluding pauses.
#[derive(Debug, Clone, Copy)]
pub struct ActiveClock {
    elapsed: Duration,
    last_seen: Instant,
    paused: bool,
}

impl ActiveClock {
    #[must_use]
    pub fn start(now: Instant) -> Self {
        Self {
            elapsed: Duration::ZERO,
            last_seen: now,
            paused: false,
        }
    }

    /// Folds the time since the last observation into the total and returns it.
    /// Timestamps older than the last observation add nothing.
    pub fn advance(&mut self, now: Instant) -> Duration {
        if now > self.last_seen {
            if !self.paused {
                self.elapsed += now - self.last_seen;
            }
            self.last_seen = now;
        }
        self.elapsed
    }

    pub fn pause(&mut self, now: Instant) {
        self.advance(now);
        self.paused = true;
    }

    pub fn resume(&mut self, now: Instant) {
        self.advance(now);
        self.paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Active time as of the last observation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Reward window opened when food replaces a sequential hazard.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BonusWindow {
    pub opened_at: Duration,
    /// Food-timer time left when the window opened.
    pub remaining_at_open: Duration,
}

/// Remaining time on every running countdown, for display.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimersRemaining {
    pub food: Duration,
    pub food_total: Duration,
    pub hazard: Option<Duration>,
    pub pineapple: Option<Duration>,
    pub bonus: Option<BonusWindow>,
}

/// The four gameplay countdowns. All instants are active-time offsets.
#[derive(Debug, Clone)]
pub struct TimerSet {
    food_duration: Duration,
    hazard_duration: Duration,
    pineapple_duration: Duration,
    food_started: Duration,
    hazard_started: Option<Duration>,
    pineapple_started: Option<Duration>,
    bonus: Option<BonusWindow>,
}

impl TimerSet {
    #[must_use]
    pub fn new(config: &GameConfig, now: Duration) -> Self {
        Self {
            food_duration: config.food_timer(),
            hazard_duration: config.hazard_timer(),
            pineapple_duration: config.pineapple_timer(),
            food_started: now,
            hazard_started: None,
            pineapple_started: None,
            bonus: None,
        }
    }

    pub fn restart_food(&mut self, now: Duration) {
        self.food_started = now;
    }

    #[must_use]
    pub fn food_elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.food_started)
    }

    #[must_use]
    pub fn food_remaining(&self, now: Duration) -> Duration {
        self.food_duration.saturating_sub(self.food_elapsed(now))
    }

    /// Strictly past the food duration.
    #[must_use]
    pub fn food_expired(&self, now: Duration) -> bool {
        self.food_elapsed(now) > self.food_duration
    }

    pub fn start_hazard(&mut self, now: Duration) {
        self.hazard_started = Some(now);
    }

    pub fn clear_hazard(&mut self) {
        self.hazard_started = None;
    }

    #[must_use]
    pub fn hazard_elapsed(&self, now: Duration) -> Option<Duration> {
        self.hazard_started.map(|start| now.saturating_sub(start))
    }

    #[must_use]
    pub fn hazard_expired(&self, now: Duration) -> bool {
        self.hazard_elapsed(now)
            .is_some_and(|elapsed| elapsed >= self.hazard_duration)
    }

    /// The hazard outlived its duration plus [`HAZARD_OVERRUN_GRACE`].
    #[must_use]
    pub fn hazard_overrun(&self, now: Duration) -> bool {
        self.hazard_elapsed(now)
            .is_some_and(|elapsed| elapsed >= self.hazard_duration + HAZARD_OVERRUN_GRACE)
    }

    pub fn start_pineapple(&mut self, now: Duration) {
        self.pineapple_started = Some(now);
    }

    pub fn clear_pineapple(&mut self) {
        self.pineapple_started = None;
    }

    #[must_use]
    pub fn pineapple_expired(&self, now: Duration) -> bool {
        self.pineapple_started
            .is_some_and(|start| now.saturating_sub(start) >= self.pineapple_duration)
    }

    /// Opens the bonus window, capturing what is left on the food timer.
    pub fn open_bonus(&mut self, now: Duration) {
        self.bonus = Some(BonusWindow {
            opened_at: now,
            remaining_at_open: self.food_remaining(now),
        });
    }

    pub fn close_bonus(&mut self) {
        self.bonus = None;
    }

    #[must_use]
    pub fn bonus(&self) -> Option<BonusWindow> {
        self.bonus
    }

    /// Points for eating the replacement food now: whole seconds left on the
    /// food timer, at least one. Zero when no window is open.
    #[must_use]
    pub fn bonus_points(&self, now: Duration) -> u32 {
        if self.bonus.is_none() {
            return 0;
        }
        let whole_seconds = u32::try_from(self.food_remaining(now).as_secs()).unwrap_or(u32::MAX);
        whole_seconds.max(1)
    }

    #[must_use]
    pub fn remaining(&self, now: Duration) -> TimersRemaining {
        TimersRemaining {
            food: self.food_remaining(now),
            food_total: self.food_duration,
            hazard: self
                .hazard_started
                .map(|start| self.hazard_duration.saturating_sub(now.saturating_sub(start))),
            pineapple: self
                .pineapple_started
                .map(|start| self.pineapple_duration.saturating_sub(now.saturating_sub(start))),
            bonus: self.bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ActiveClock, TimerSet};
    use crate::config::GameConfig;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn clock_excludes_paused_time() {
        let t0 = Instant::now();
        let mut clock = ActiveClock::start(t0);

        assert_eq!(clock.advance(t0 + ms(2000)), ms(2000));
        clock.pause(t0 + ms(3000));
        assert_eq!(clock.advance(t0 + ms(60000)), ms(3000));
        clock.resume(t0 + ms(60000));
        assert_eq!(clock.advance(t0 + ms(61500)), ms(4500));
    }

    #[test]
    fn clock_ignores_stale_timestamps() {
        let t0 = Instant::now();
        let mut clock = ActiveClock::start(t0 + ms(5000));

        assert_eq!(clock.advance(t0), Duration::ZERO);
        assert_eq!(clock.advance(t0 + ms(6000)), ms(1000));
        assert_eq!(clock.advance(t0 + ms(5500)), ms(1000));
    }

    #[test]
    fn food_timer_expires_strictly_after_duration() {
        let timers = TimerSet::new(&GameConfig::default(), Duration::ZERO);

        assert!(!timers.food_expired(ms(10000)));
        assert!(timers.food_expired(ms(10001)));
        assert_eq!(timers.food_remaining(ms(12000)), Duration::ZERO);
    }

    #[test]
    fn hazard_expiry_and_overrun() {
        let mut timers = TimerSet::new(&GameConfig::default(), Duration::ZERO);
        assert!(!timers.hazard_expired(ms(100000)));

        timers.start_hazard(ms(1000));
        assert!(!timers.hazard_expired(ms(4900)));
        assert!(timers.hazard_expired(ms(5000)));
        assert!(!timers.hazard_overrun(ms(5900)));
        assert!(timers.hazard_overrun(ms(6000)));

        timers.clear_hazard();
        assert!(!timers.hazard_overrun(ms(10000)));
    }

    #[test]
    fn bonus_points_floor_remaining_seconds_with_minimum_one() {
        let mut timers = TimerSet::new(&GameConfig::default(), Duration::ZERO);
        assert_eq!(timers.bonus_points(ms(1000)), 0);

        timers.open_bonus(ms(5800));
        assert_eq!(timers.bonus().map(|b| b.remaining_at_open), Some(ms(4200)));
        assert_eq!(timers.bonus_points(ms(5800)), 4);
        assert_eq!(timers.bonus_points(ms(9500)), 1);
        assert_eq!(timers.bonus_points(ms(20000)), 1);

        timers.close_bonus();
        assert_eq!(timers.bonus_points(ms(5800)), 0);
    }

    #[test]
    fn pineapple_timer_runs_only_while_started() {
        let mut timers = TimerSet::new(&GameConfig::default(), Duration::ZERO);
        assert!(!timers.pineapple_expired(ms(50000)));

        timers.start_pineapple(ms(2000));
        assert!(!timers.pineapple_expired(ms(4900)));
        assert!(timers.pineapple_expired(ms(5000)));
        assert_eq!(timers.remaining(ms(3000)).pineapple, Some(ms(2000)));
    }
}
