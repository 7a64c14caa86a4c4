//! Minimal observable value owned by whoever constructs it.

use std::collections::BTreeMap;
use std::fmt;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn Fn(&T)>;

/// An owned state cell with synchronous change listeners.
pub struct Store<T> {
    state: T,
    listeners: BTreeMap<SubscriptionId, Listener<T>>,
    next_id: u64,
}

impl<T> Store<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            state: initial,
            listeners: BTreeMap::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub const fn get_state(&self) -> &T {
        &self.state
    }

    /// ## Summary
    /// Applies `update` to the state and notifies every listener, in subscription order.
    pub fn set_state(&mut self, update: impl FnOnce(&mut T)) {
        update(&mut self.state);
        for listener in self.listeners.values() {
            listener(&self.state);
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
