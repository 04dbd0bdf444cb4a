//! Auto-play timer
//!
//! Cooperative, single-threaded replacement for a repeating UI timer:
//! - At most one pending tick (the "timer handle")
//! - A tick either fully advances the target or does nothing
//! - The next tick is scheduled only after the previous one ran
//! - Speed changes cancel the pending tick and reschedule from `now`
//!
//! Time is passed in explicitly as a [`Duration`] since an arbitrary origin,
//! so tests drive playback with a [`ManualClock`] and the CLI with a
//! [`SystemClock`].

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::ReplayError;
use std::time::Duration;

/// Anything a playback timer can step.
pub trait Advance {
    /// Move forward one step; `false` when nothing happened.
    fn advance(&mut self) -> bool;

    /// Whether no further step exists.
    fn is_at_end(&self) -> bool;
}

/// Identifies one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTick {
    handle: TimerHandle,
    due: Duration,
}

/// Play/pause/speed state for one engine
#[derive(Debug, Clone)]
pub struct Playback {
    base_interval: Duration,
    speed: f64,
    pending: Option<PendingTick>,
    next_handle: u64,
}

impl Playback {
    /// Create a paused timer ticking every `base_interval` at 1x
    pub fn new(base_interval: Duration) -> Self {
        Self {
            base_interval,
            speed: 1.0,
            pending: None,
            next_handle: 0,
        }
    }

    /// Interval at 1x
    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Current speed multiplier
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Effective interval: `base / speed`, saturating at `Duration::MAX`
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_interval.as_secs_f64() / self.speed)
            .unwrap_or(Duration::MAX)
    }

    /// Whether a tick is pending
    pub fn is_playing(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle of the pending tick
    pub fn handle(&self) -> Option<TimerHandle> {
        self.pending.map(|tick| tick.handle)
    }

    /// Due time of the pending tick
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.map(|tick| tick.due)
    }

    /// Start ticking. No-op (returns `false`) when already playing.
    pub fn play(&mut self, now: Duration) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.schedule(now.saturating_add(self.interval()));
        true
    }

    /// Cancel the pending tick. Returns whether one was pending.
    pub fn pause(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Change speed; a pending tick is cancelled and rescheduled from `now`
    pub fn set_speed(&mut self, multiplier: f64, now: Duration) -> Result<(), ReplayError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ReplayError::InvalidSpeed(multiplier));
        }
        self.speed = multiplier;
        if self.pause() {
            self.schedule(now.saturating_add(self.interval()));
        }
        Ok(())
    }

    /// Fire every tick due at or before `now`
    ///
    /// Returns how many steps the target advanced. Playback stops as soon as
    /// the target reaches its end; a stopped timer never calls `advance`.
    pub fn poll<A: Advance + ?Sized>(&mut self, now: Duration, target: &mut A) -> usize {
        let mut advanced = 0;
        while let Some(tick) = self.pending {
            if tick.due > now {
                break;
            }
            self.pending = None;
            if target.is_at_end() || !target.advance() {
                break;
            }
            advanced += 1;
            tracing::trace!(due = ?tick.due, advanced, "playback tick");
            if target.is_at_end() {
                break;
            }
            self.schedule(tick.due.saturating_add(self.interval()));
        }
        advanced
    }

    /// Sleep through ticks until playback stops
    pub fn drive<A, C>(&mut self, target: &mut A, clock: &C) -> usize
    where
        A: Advance + ?Sized,
        C: Clock + ?Sized,
    {
        let mut advanced = 0;
        while let Some(due) = self.next_due() {
            clock.sleep_until(due);
            advanced += self.poll(clock.now(), target);
        }
        advanced
    }

    fn schedule(&mut self, due: Duration) {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(PendingTick { handle, due });
    }
}
