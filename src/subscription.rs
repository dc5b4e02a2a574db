//! Token-based subscriber registry.
//!
//! Publishing components own a registry; subscribers hold a [`Subscription`]
//! token whose only use is to remove that entry. Tokens are stable across
//! other subscribers coming and going, and removing an already-removed
//! token is a no-op.

/// Capability returned by `subscribe`. Redeeming it twice is a no-op.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

/// Ordered registry of callbacks over an event payload `T`.
///
/// Fan-out visits subscribers in registration order. The registry is the
/// only owner of the callbacks; callers interact through tokens.
pub struct SubscriberRegistry<T> {
    entries: Vec<(u64, Box<dyn FnMut(&T) + Send>)>,
    next_id: u64,
}

impl<T> SubscriberRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback, returning the token that removes it.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        Subscription { id }
    }

    /// Remove the entry for `subscription`. Unknown or already-removed
    /// tokens are ignored.
    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        self.entries.retain(|(id, _)| *id != subscription.id);
    }

    /// Invoke every registered callback with `event`, in registration
    /// order.
    pub fn notify(&mut self, event: &T) {
        for (_, callback) in self.entries.iter_mut() {
            callback(event);
        }
    }

    /// Drop all registered callbacks.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SubscriberRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
