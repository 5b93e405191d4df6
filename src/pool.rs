use crate::handle::Handle;
use threadpool::ThreadPool;

/// A bounded pool of worker threads that execute pure, side-effect-free
/// `bool`-returning closures — in this crate, exclusively
/// [`crate::MapStore::free`] collision checks.
///
/// `submit` never blocks the caller; the returned [`Handle`] is awaited
/// later, in the collect-and-relax phase of the expansion loop. A pool
/// built with `threads = 1` still returns a real [`Handle`] computed by
/// the single worker thread — there is no inline fast path, since the
/// correctness argument in the spec's speculation controller depends on
/// every submission being a genuine, independently-awaitable task.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Create a pool with `threads` worker threads. `threads` must be
    /// at least 1.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        assert!(threads >= 1, "worker pool requires at least one thread");
        Self {
            pool: ThreadPool::new(threads),
        }
    }

    /// Submit a pure computation to the pool and return a handle to its
    /// eventual result.
    pub fn submit<F>(&self, task: F) -> Handle
    where
        F: FnOnce() -> bool + Send + 'static,
    {
        let (handle, setter) = Handle::new();
        self.pool.execute(move || {
            setter.set(task());
        });
        handle
    }

    /// The number of worker threads in this pool.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.pool.max_count()
    }
}
