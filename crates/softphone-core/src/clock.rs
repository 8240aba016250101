use crate::error::CoreError;
use crate::timer::{Tick, TimerService, TimerToken, TICK_SECS};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    Idle,
    Running,
    Stopped,
}

/// A completed hold period, as offsets into the call's elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldInterval {
    pub start: u64,
    pub end: u64,
}

impl HoldInterval {
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenHold {
    start: u64,
    ticks: u64,
    timer: TimerToken,
}

/// Elapsed-time counter for one call plus its hold accounting.
///
/// Two interval timers drive it: the main timer bumps `elapsed_seconds` and,
/// while a hold is open, a second timer counts the live hold time. Each timer
/// is owned through its [`TimerToken`] and is cancelled explicitly.
#[derive(Debug, Clone)]
pub struct CallClock {
    status: ClockStatus,
    elapsed_seconds: u64,
    hold_intervals: Vec<HoldInterval>,
    total_hold_seconds: u64,
    current_hold_seconds: u64,
    main_timer: Option<TimerToken>,
    open_hold: Option<OpenHold>,
}

impl Default for CallClock {
    fn default() -> Self {
        Self {
            status: ClockStatus::Idle,
            elapsed_seconds: 0,
            hold_intervals: Vec::new(),
            total_hold_seconds: 0,
            current_hold_seconds: 0,
            main_timer: None,
            open_hold: None,
        }
    }
}

impl CallClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting a running clock is a no-op; a stopped clock never restarts.
    pub fn start(&mut self, timers: &mut dyn TimerService) -> Result<(), CoreError> {
        match self.status {
            ClockStatus::Running => Ok(()),
            ClockStatus::Stopped => Err(CoreError::ClockNotRunning),
            ClockStatus::Idle => {
                let token = timers.schedule_interval(TICK_SECS);
                debug!(timer = %token, "call clock started");
                self.main_timer = Some(token);
                self.status = ClockStatus::Running;
                Ok(())
            }
        }
    }

    pub fn open_hold(&mut self, timers: &mut dyn TimerService) -> Result<(), CoreError> {
        if self.status != ClockStatus::Running {
            return Err(CoreError::ClockNotRunning);
        }
        if self.open_hold.is_some() {
            return Err(CoreError::HoldAlreadyOpen);
        }
        let timer = timers.schedule_interval(TICK_SECS);
        self.open_hold = Some(OpenHold {
            start: self.elapsed_seconds,
            ticks: 0,
            timer,
        });
        self.current_hold_seconds = 0;
        debug!(at = self.elapsed_seconds, "hold interval opened");
        Ok(())
    }

    pub fn close_hold(&mut self, timers: &mut dyn TimerService) -> Result<HoldInterval, CoreError> {
        let open = self.open_hold.take().ok_or(CoreError::DoubleHoldClose)?;
        timers.cancel(open.timer);
        let interval = HoldInterval {
            start: open.start,
            end: self.elapsed_seconds,
        };
        self.hold_intervals.push(interval);
        self.total_hold_seconds += interval.duration();
        self.current_hold_seconds = 0;
        debug!(
            start = interval.start,
            end = interval.end,
            total = self.total_hold_seconds,
            "hold interval closed"
        );
        Ok(interval)
    }

    /// Cancels every timer and freezes the counters. An open hold interval is
    /// closed at the stop time first.
    pub fn stop(&mut self, timers: &mut dyn TimerService) -> Result<(), CoreError> {
        match self.status {
            ClockStatus::Stopped => return Err(CoreError::ClockNotRunning),
            ClockStatus::Idle => {
                self.status = ClockStatus::Stopped;
                return Ok(());
            }
            ClockStatus::Running => {}
        }
        if self.open_hold.is_some() {
            self.close_hold(timers)?;
        }
        if let Some(token) = self.main_timer.take() {
            timers.cancel(token);
        }
        self.status = ClockStatus::Stopped;
        debug!(elapsed = self.elapsed_seconds, "call clock stopped");
        Ok(())
    }

    /// Applies a fired tick. Returns false when the tick belongs to another
    /// clock or arrives after its timer was cancelled.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if self.status != ClockStatus::Running {
            return false;
        }
        if self.main_timer == Some(tick.token) {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(tick.count);
            return true;
        }
        match self.open_hold.as_mut() {
            Some(open) if open.timer == tick.token => {
                open.ticks = open.ticks.saturating_add(tick.count);
                self.current_hold_seconds = open.ticks;
                true
            }
            _ => false,
        }
    }

    pub fn owns(&self, token: TimerToken) -> bool {
        self.main_timer == Some(token) || self.open_hold.is_some_and(|open| open.timer == token)
    }

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn hold_intervals(&self) -> &[HoldInterval] {
        &self.hold_intervals
    }

    pub fn total_hold_seconds(&self) -> u64 {
        self.total_hold_seconds
    }

    /// Seconds in the active hold interval, 0 when not held.
    pub fn current_hold_seconds(&self) -> u64 {
        self.current_hold_seconds
    }

    /// Completed hold time plus the active interval.
    pub fn running_hold_seconds(&self) -> u64 {
        self.total_hold_seconds + self.current_hold_seconds
    }

    pub fn is_holding(&self) -> bool {
        self.open_hold.is_some()
    }
}

/// Renders whole seconds as `MMmSSs`.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}m{:02}s", seconds / 60, seconds % 60)
}
