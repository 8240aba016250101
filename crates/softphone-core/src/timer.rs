use std::collections::BTreeMap;
use std::fmt;

/// Resolution of every call timer, in seconds.
pub const TICK_SECS: u64 = 1;

/// Cancellation handle for one scheduled interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// One or more consecutive firings of a timer. `at` is the last firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub token: TimerToken,
    pub at: u64,
    pub count: u64,
}

pub trait TimerService {
    /// Registers a repeating timer that first fires `period_secs` from now.
    fn schedule_interval(&mut self, period_secs: u64) -> TimerToken;

    /// Returns false when the token was unknown or already cancelled.
    fn cancel(&mut self, token: TimerToken) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct IntervalTimer {
    period: u64,
    next_due: u64,
}

/// Whole-second virtual clock. Nothing fires until the owner calls
/// [`ManualScheduler::advance`], which keeps every tick on the caller's thread.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    next_token: u64,
    timers: BTreeMap<TimerToken, IntervalTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn is_active(&self, token: TimerToken) -> bool {
        self.timers.contains_key(&token)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending firing across all timers.
    pub fn next_due(&self) -> Option<u64> {
        self.timers.values().map(|timer| timer.next_due).min()
    }

    /// Moves the clock forward and returns fired ticks ordered by time, then
    /// by registration order within the same second.
    pub fn advance(&mut self, secs: u64) -> Vec<Tick> {
        let mut fired = Vec::new();
        self.advance_each(secs, |tick| fired.push(tick));
        fired
    }

    /// Like [`ManualScheduler::advance`], but hands each tick to `on_tick` as
    /// it fires. The clock jumps between due instants, so idle stretches cost
    /// nothing.
    pub fn advance_each(&mut self, secs: u64, mut on_tick: impl FnMut(Tick)) {
        let target = self.now.saturating_add(secs);
        while let Some(due) = self.next_due().filter(|due| *due <= target) {
            self.now = due;
            for (token, timer) in self.timers.iter_mut() {
                if timer.next_due == due {
                    on_tick(Tick {
                        token: *token,
                        at: due,
                        count: 1,
                    });
                    timer.next_due = due.saturating_add(timer.period);
                }
            }
            if due == u64::MAX {
                break;
            }
        }
        self.now = target;
    }

    /// Moves the clock forward and reports every timer that fired exactly
    /// once, in registration order, with `count` set to its number of
    /// firings. Cost is independent of `secs`.
    pub fn advance_coalesced(&mut self, secs: u64, mut on_tick: impl FnMut(Tick)) {
        let target = self.now.saturating_add(secs);
        for (token, timer) in self.timers.iter_mut() {
            if timer.next_due > target {
                continue;
            }
            let count = (target - timer.next_due) / timer.period + 1;
            let at = timer.next_due + (count - 1) * timer.period;
            timer.next_due = at.saturating_add(timer.period);
            on_tick(Tick {
                token: *token,
                at,
                count,
            });
        }
        self.now = target;
    }
}

impl TimerService for ManualScheduler {
    fn schedule_interval(&mut self, period_secs: u64) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        let period = period_secs.max(1);
        self.timers.insert(
            token,
            IntervalTimer {
                period,
                next_due: self.now.saturating_add(period),
            },
        );
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        self.timers.remove(&token).is_some()
    }
}
