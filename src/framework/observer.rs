use std::fmt;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Callback registry for "current step changed" notifications.
///
/// Single-threaded: callbacks run synchronously, in subscription order, on
/// the thread that moved the cursor.
pub struct Observers<E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}

impl<E> Observers<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver an event to every subscriber.
    pub fn publish(&mut self, event: &E) {
        for (_, callback) in self.entries.iter_mut() {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
