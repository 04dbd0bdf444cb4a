use std::fmt;

use crate::{
    framework::{Frame, FrameOf, Observers, SubscriptionId, Trace},
    ledger::{CursorStart, StepLog},
    playback::Advance,
};

/// Step log plus publication for one engine.
///
/// Consumers never index into the log directly; every cursor move goes
/// through the navigation methods below, and each successful move publishes
/// exactly one [`Frame`].
pub struct Replay<T: Trace> {
    log: StepLog<T::Step>,
    observers: Observers<FrameOf<T>>,
}

impl<T: Trace> Default for Replay<T> {
    fn default() -> Self {
        Self {
            log: StepLog::new(),
            observers: Observers::new(),
        }
    }
}

impl<T: Trace> fmt::Debug for Replay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replay")
            .field("len", &self.log.len())
            .field("cursor", &self.log.cursor())
            .field("observers", &self.observers)
            .finish()
    }
}

impl<T: Trace> Replay<T> {
    /// Create an empty replay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly built log.
    ///
    /// Publishes the first frame when `start` is [`CursorStart::First`].
    pub fn load(&mut self, steps: Vec<T::Step>, start: CursorStart) {
        self.log.reset(steps, start);
        self.publish();
    }

    /// Back to the start without publishing.
    pub fn rewind(&mut self, start: CursorStart) {
        self.log.rewind(start);
    }

    /// Step forward. `false` when already at the last step.
    pub fn advance(&mut self) -> bool {
        let moved = self.log.advance();
        if moved {
            self.publish();
        }
        moved
    }

    /// Step backward. `false` at cursor `<= 0`.
    pub fn retreat(&mut self) -> bool {
        let moved = self.log.retreat();
        if moved {
            self.publish();
        }
        moved
    }

    /// Jump to `index`. `false` when out of range.
    pub fn seek(&mut self, index: usize) -> bool {
        let moved = self.log.seek(index);
        if moved {
            self.publish();
        }
        moved
    }

    /// Insert `step` directly after the cursor, move onto it and publish.
    pub fn splice(&mut self, step: T::Step) -> usize {
        let at = self.log.insert_after_cursor(step);
        self.publish();
        at
    }

    /// Underlying log.
    pub fn log(&self) -> &StepLog<T::Step> {
        &self.log
    }

    /// Step under the cursor.
    pub fn current(&self) -> Option<&T::Step> {
        self.log.current()
    }

    /// Cursor position.
    pub fn cursor(&self) -> Option<usize> {
        self.log.cursor()
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Whether the cursor sits on the last step.
    pub fn is_at_end(&self) -> bool {
        self.log.is_at_end()
    }

    /// Statistics for the current cursor.
    pub fn stats(&self) -> T::Stats {
        T::aggregate(self.log.steps(), self.log.cursor())
    }

    /// Frame for the current cursor, if started.
    pub fn frame(&self) -> Option<FrameOf<T>> {
        let index = self.log.cursor()?;
        let step = self.log.current()?;
        Some(Frame {
            index,
            total: self.log.len(),
            step: step.clone(),
            explanation: T::explain(step),
            stats: self.stats(),
        })
    }

    /// Register a frame callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FrameOf<T>) + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// Drop a frame callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        if let Some(frame) = self.frame() {
            self.observers.publish(&frame);
        }
    }
}

impl<T: Trace> Advance for Replay<T> {
    fn advance(&mut self) -> bool {
        Replay::advance(self)
    }

    fn is_at_end(&self) -> bool {
        Replay::is_at_end(self)
    }
}
