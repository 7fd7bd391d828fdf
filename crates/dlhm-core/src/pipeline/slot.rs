use std::sync::{Mutex, MutexGuard};

/// Single-item mailbox shared between threads.
///
/// `publish` never overwrites: it fails when the previous message has not been
/// taken yet. `take` empties the slot. Holding at most one item is what gives
/// the pipeline its backpressure.
#[derive(Debug)]
pub struct Slot<T> {
    inner: Mutex<Option<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Store `value` if the slot is empty. Returns `false` and drops `value`
    /// when it is occupied.
    pub fn publish(&self, value: T) -> bool {
        let mut guard = self.lock();
        if guard.is_some() {
            return false;
        }
        *guard = Some(value);
        true
    }

    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // A panicking holder cannot leave the Option half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
