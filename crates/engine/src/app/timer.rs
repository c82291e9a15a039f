const MIN_INTERVAL_SECONDS: f64 = 1.0e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

#[derive(Debug, Clone, Copy)]
struct PeriodicTimer {
    id: TimerId,
    interval: f64,
    next_fire: f64,
}

/// Periodic timers owned by a single caller and advanced from its tick.
/// Dropping or clearing the schedule is the only cancellation needed.
#[derive(Debug, Default)]
pub struct Schedule {
    now: f64,
    next_id: u32,
    timers: Vec<PeriodicTimer>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// First fire happens one full interval from now.
    pub fn schedule_periodic(&mut self, interval_seconds: f32) -> TimerId {
        let interval = f64::from(interval_seconds).max(MIN_INTERVAL_SECONDS);
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.push(PeriodicTimer {
            id,
            interval,
            next_fire: self.now + interval,
        });
        id
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.timers.len();
        self.timers.clear();
        cancelled
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Advances the clock by `dt_seconds` and appends one entry per firing to
    /// `fired`, ordered by fire time. A long step can fire a timer repeatedly.
    pub fn advance(&mut self, dt_seconds: f32, fired: &mut Vec<TimerId>) {
        if dt_seconds > 0.0 {
            self.now += f64::from(dt_seconds);
        }

        let mut due: Vec<(f64, TimerId)> = Vec::new();
        for timer in &mut self.timers {
            while timer.next_fire <= self.now {
                due.push((timer.next_fire, timer.id));
                timer.next_fire += timer.interval;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        fired.extend(due.into_iter().map(|(_, id)| id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(schedule: &mut Schedule, dt: f32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        schedule.advance(dt, &mut fired);
        fired
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let mut schedule = Schedule::new();
        let id = schedule.schedule_periodic(1.0);

        assert!(advance(&mut schedule, 0.6).is_empty());
        assert_eq!(advance(&mut schedule, 0.6), vec![id]);
        assert!(advance(&mut schedule, 0.6).is_empty());
        assert_eq!(advance(&mut schedule, 0.6), vec![id]);
    }

    #[test]
    fn long_step_fires_repeatedly_in_time_order() {
        let mut schedule = Schedule::new();
        let slow = schedule.schedule_periodic(1.5);
        let fast = schedule.schedule_periodic(1.0);

        let fired = advance(&mut schedule, 3.0);

        assert_eq!(fired, vec![fast, slow, fast, slow, fast]);
    }

    #[test]
    fn cancelled_timers_never_fire_again() {
        let mut schedule = Schedule::new();
        let first = schedule.schedule_periodic(0.5);
        let second = schedule.schedule_periodic(0.5);
        assert_eq!(advance(&mut schedule, 0.5), vec![first, second]);

        assert_eq!(schedule.cancel_all(), 2);
        assert_eq!(schedule.cancel_all(), 0);
        assert_eq!(schedule.active_count(), 0);
        assert!(advance(&mut schedule, 10.0).is_empty());
    }

    #[test]
    fn non_positive_interval_is_bounded() {
        let mut schedule = Schedule::new();
        schedule.schedule_periodic(0.0);
        let fired = advance(&mut schedule, 0.01);
        assert!(!fired.is_empty());
        assert!(fired.len() <= 11);
    }
}
