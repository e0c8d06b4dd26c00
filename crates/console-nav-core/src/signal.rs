use std::cell::RefCell;
use std::rc::Rc;

use crate::status::AppStatus;

#[derive(Debug)]
struct Slot<T> {
    value: T,
    revision: u64,
}

/// Single-threaded shared value. Clones observe the same slot; every `set`
/// bumps the revision so consumers can tell whether they are stale.
#[derive(Debug)]
pub struct Signal<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot { value, revision: 0 })),
        }
    }

    pub fn set(&self, value: T) {
        let mut slot = self.slot.borrow_mut();
        slot.value = value;
        slot.revision = slot.revision.saturating_add(1);
    }

    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.slot.borrow().value)
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.slot.borrow().revision
    }
}

impl<T: Clone> Signal<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }
}

/// Signals the navigation controller publishes to the rest of the page.
#[derive(Debug, Clone)]
pub struct SharedSignals {
    /// Decoded server status, `None` until the first successful load.
    pub status: Signal<Option<AppStatus>>,
    /// Page chrome pads content when `true`; chat views turn it off.
    pub inner_padding: Signal<bool>,
}

impl Default for SharedSignals {
    fn default() -> Self {
        Self {
            status: Signal::new(None),
            inner_padding: Signal::new(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_value_and_revision() {
        let signal = Signal::new(true);
        let observer = signal.clone();
        assert_eq!(observer.revision(), 0);

        signal.set(false);
        assert!(!observer.get());
        assert_eq!(observer.revision(), 1);
        assert!(observer.with(|value| !*value));
    }
}
