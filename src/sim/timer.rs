/// Fixed-period tick scheduler.
///
/// The session arms it on start/resume and disarms it on pause, game over
/// and menu. Arming replaces any previous schedule, so at most one tick
/// stream exists at a time.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct TickTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        TickTimer { period: Duration::ZERO, next_due: None }
    }

    /// (Re)start ticking every `period`, first tick one period from `now`.
    pub fn arm(&mut self, period: Duration, now: Instant) {
        self.period = period;
        self.next_due = Some(now + period);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Consume one due tick, if any.
    ///
    /// Missed periods are not replayed: if the loop stalled for several
    /// periods, the next tick is scheduled from `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        let due = match self.next_due {
            Some(t) => t,
            None => return false,
        };
        if now < due {
            return false;
        }
        let next = due + self.period;
        self.next_due = Some(if next <= now { now + self.period } else { next });
        true
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = Duration::from_millis(100);

    #[test]
    fn disarmed_never_fires() {
        let mut t = TickTimer::new();
        assert!(!t.fire(Instant::now() + Duration::from_secs(5)));
    }

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut t = TickTimer::new();
        t.arm(P, t0);
        assert!(!t.fire(t0 + Duration::from_millis(99)));
        assert!(t.fire(t0 + P));
        assert!(!t.fire(t0 + P));
        assert!(t.fire(t0 + 2 * P));
    }

    #[test]
    fn stall_does_not_burst() {
        let t0 = Instant::now();
        let mut t = TickTimer::new();
        t.arm(P, t0);
        let late = t0 + Duration::from_millis(750);
        assert!(t.fire(late));
        assert!(!t.fire(late));
        assert!(t.fire(late + P));
    }

    #[test]
    fn rearm_replaces_schedule() {
        let t0 = Instant::now();
        let mut t = TickTimer::new();
        t.arm(P, t0);
        t.arm(Duration::from_millis(150), t0 + Duration::from_millis(50));
        assert_eq!(t.period(), Duration::from_millis(150));
        // Old schedule would have fired at 100ms.
        assert!(!t.fire(t0 + Duration::from_millis(100)));
        assert!(t.fire(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn disarm_stops_ticks() {
        let t0 = Instant::now();
        let mut t = TickTimer::new();
        t.arm(P, t0);
        t.disarm();
        assert!(!t.is_armed());
        assert!(!t.fire(t0 + 3 * P));
    }
}
