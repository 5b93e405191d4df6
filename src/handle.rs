use std::sync::{Arc, Condvar, Mutex};

/// A shared, lazily-computed boolean produced by a [`crate::WorkerPool`]
/// submission.
///
/// Cloning a `Handle` is cheap (an `Arc` bump) and every clone observes
/// the same result. [`Handle::get`] blocks the calling thread until the
/// submitted task completes, then returns the cached value on every
/// subsequent call from any thread — the "await returns the computed
/// value to every caller" contract the speculation scoreboard relies
/// on (a scoreboarded cell's handle may be awaited once by the
/// expansion that triggered it and again later by a different
/// expansion that discovers the same neighbor).
#[derive(Clone)]
pub struct Handle {
    inner: Arc<(Mutex<Option<bool>>, Condvar)>,
}

impl Handle {
    pub(crate) fn new() -> (Self, HandleSetter) {
        let inner = Arc::new((Mutex::new(None), Condvar::new()));
        (
            Self {
                inner: inner.clone(),
            },
            HandleSetter { inner },
        )
    }

    /// Block until the producing task completes and return its result.
    /// Safe to call from any thread, any number of times.
    #[must_use]
    pub fn get(&self) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut guard = lock.lock().unwrap();
        while guard.is_none() {
            guard = cvar.wait(guard).unwrap();
        }
        guard.unwrap()
    }
}

/// The write side of a [`Handle`], held by the worker thread that
/// computes its value. Not exposed outside the pool.
pub(crate) struct HandleSetter {
    inner: Arc<(Mutex<Option<bool>>, Condvar)>,
}

impl HandleSetter {
    pub(crate) fn set(self, value: bool) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap() = Some(value);
        cvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn get_blocks_until_set_then_returns_cached_value() {
        let (handle, setter) = Handle::new();
        let h2 = handle.clone();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            setter.set(true);
        });

        // Two independent awaiters, both observing the same result.
        let a = thread::spawn(move || handle.get());
        let b = thread::spawn(move || h2.get());

        producer.join().unwrap();
        assert!(a.join().unwrap());
        assert!(b.join().unwrap());
    }

    #[test]
    fn get_returns_immediately_once_already_set() {
        let (handle, setter) = Handle::new();
        setter.set(false);
        assert!(!handle.get());
        assert!(!handle.get());
    }
}
