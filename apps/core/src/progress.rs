use std::time::{Duration, Instant};

pub const DEFAULT_STEP: u8 = 2;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub running: bool,
    pub percent: u8,
}

impl ProgressState {
    pub fn is_done(&self) -> bool {
        !self.running && self.percent >= COMPLETE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced(u8),
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub ticks: u32,
    pub completed: bool,
}

/// Tick lease held for the duration of one run. Dropping it is what stops
/// the run; nothing else schedules ticks.
#[derive(Debug)]
struct TickSchedule {
    next_due: Instant,
}

/// Single-flight simulated install counter.
///
/// The driver never sleeps or spawns. A host either calls [`tick`] directly
/// or calls [`poll`] from its own loop with the current time, and the driver
/// applies every tick that has come due.
///
/// [`tick`]: ProgressDriver::tick
/// [`poll`]: ProgressDriver::poll
#[derive(Debug)]
pub struct ProgressDriver {
    step: u8,
    interval: Duration,
    state: ProgressState,
    schedule: Option<TickSchedule>,
    completed_runs: u64,
}

impl Default for ProgressDriver {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, DEFAULT_TICK_INTERVAL)
    }
}

impl ProgressDriver {
    /// A zero step would never finish, so it is raised to 1.
    pub fn new(step: u8, interval: Duration) -> Self {
        Self {
            step: step.max(1),
            interval,
            state: ProgressState::default(),
            schedule: None,
            completed_runs: 0,
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn percent(&self) -> u8 {
        self.state.percent
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn completed_runs(&self) -> u64 {
        self.completed_runs
    }

    pub fn start(&mut self) -> StartOutcome {
        self.start_at(Instant::now())
    }

    pub fn start_at(&mut self, now: Instant) -> StartOutcome {
        if self.state.running {
            return StartOutcome::AlreadyRunning;
        }

        self.state = ProgressState {
            running: true,
            percent: 0,
        };
        self.schedule = Some(TickSchedule {
            next_due: now + self.interval,
        });
        StartOutcome::Started
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        let next = self.state.percent.saturating_add(self.step);
        if next >= COMPLETE {
            self.state = ProgressState {
                running: false,
                percent: COMPLETE,
            };
            self.schedule = None;
            self.completed_runs += 1;
            return TickOutcome::Completed;
        }

        self.state.percent = next;
        TickOutcome::Advanced(next)
    }

    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        loop {
            let Some(schedule) = self.schedule.as_mut() else {
                return outcome;
            };
            if now < schedule.next_due {
                return outcome;
            }
            schedule.next_due += self.interval;

            outcome.ticks += 1;
            if self.tick() == TickOutcome::Completed {
                outcome.completed = true;
                return outcome;
            }
        }
    }

    /// Time until the next tick is due, or `None` when no run is active.
    pub fn next_due_in(&self, now: Instant) -> Option<Duration> {
        self.schedule
            .as_ref()
            .map(|schedule| schedule.next_due.saturating_duration_since(now))
    }

    /// Returns whether a run was actually stopped. Percent is left as is.
    pub fn cancel(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.running = false;
        self.schedule = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{PollOutcome, ProgressDriver, StartOutcome, TickOutcome};

    #[test]
    fn tick_is_idle_before_start() {
        let mut driver = ProgressDriver::default();
        assert_eq!(driver.tick(), TickOutcome::Idle);
        assert_eq!(driver.percent(), 0);
    }

    #[test]
    fn uneven_step_clamps_to_one_hundred() {
        let mut driver = ProgressDriver::new(3, Duration::from_millis(10));
        driver.start();
        let mut ticks = 0;
        while driver.tick() != TickOutcome::Completed {
            ticks += 1;
        }
        assert_eq!(ticks + 1, 34);
        assert_eq!(driver.percent(), 100);
    }

    #[test]
    fn zero_step_is_raised() {
        let driver = ProgressDriver::new(0, Duration::from_millis(10));
        assert_eq!(driver.step(), 1);
    }

    #[test]
    fn poll_applies_only_due_ticks() {
        let t0 = Instant::now();
        let mut driver = ProgressDriver::new(2, Duration::from_millis(50));
        assert_eq!(driver.start_at(t0), StartOutcome::Started);

        assert_eq!(driver.poll(t0 + Duration::from_millis(49)), PollOutcome::default());
        let outcome = driver.poll(t0 + Duration::from_millis(120));
        assert_eq!(outcome.ticks, 2);
        assert!(!outcome.completed);
        assert_eq!(driver.percent(), 4);
    }

    #[test]
    fn poll_stops_at_completion() {
        let t0 = Instant::now();
        let mut driver = ProgressDriver::new(2, Duration::from_millis(50));
        driver.start_at(t0);

        let outcome = driver.poll(t0 + Duration::from_secs(60));
        assert_eq!(
            outcome,
            PollOutcome {
                ticks: 50,
                completed: true
            }
        );
        assert_eq!(driver.next_due_in(t0), None);
        assert_eq!(driver.poll(t0 + Duration::from_secs(120)).ticks, 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut driver = ProgressDriver::default();
        assert!(!driver.cancel());
        driver.start();
        driver.tick();
        assert!(driver.cancel());
        assert!(!driver.cancel());
        assert_eq!(driver.percent(), 2);
        assert!(!driver.is_running());
    }

    #[test]
    fn restart_after_cancel_resets_percent() {
        let mut driver = ProgressDriver::default();
        driver.start();
        driver.tick();
        driver.tick();
        driver.cancel();
        assert_eq!(driver.start(), StartOutcome::Started);
        assert_eq!(driver.percent(), 0);
    }
}
