//! Work-stealing scheduler for the search task tree.
//!
//! The scheduler owns a rayon [`ThreadPool`]. A search submits one root task
//! with [`Scheduler::submit_root`] and blocks until the whole tree has
//! resolved. Inside the tree, [`Scheduler::fork_join`] is the spawn/join
//! primitive: the left half is pushed onto the current worker's deque where
//! any idle worker may steal it, the right half runs in place, and the call
//! returns once both are done. A worker waiting on a stolen half keeps
//! executing other queued work instead of sleeping.
//!
//! If the pool cannot be built the scheduler runs everything on the calling
//! thread, in the same left-then-right order.
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use crate::errors::{SearchError, SearchResult};

/// Opaque identifier of the worker thread that ran a piece of work.
///
/// Only meant for diagnostics such as load-distribution checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

#[derive(Debug)]
enum Mode {
    Pool(ThreadPool),
    Sequential,
}

/// Executes search task trees on a work-stealing pool
#[derive(Debug)]
pub struct Scheduler {
    mode: Mode,
}

impl Scheduler {
    /// Builds a pool with `threads` workers, falling back to sequential
    /// execution if the threads cannot be spawned
    pub fn new(threads: NonZeroUsize) -> Self {
        let built = ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|index| format!("phrasescout-worker-{}", index))
            .build();

        match built {
            Ok(pool) => {
                debug!("Built work-stealing pool with {} workers", threads);
                Self {
                    mode: Mode::Pool(pool),
                }
            }
            Err(e) => {
                warn!(
                    "Could not build a pool of {} workers ({}), searching sequentially",
                    threads, e
                );
                Self::sequential()
            }
        }
    }

    /// A scheduler that runs every task on the calling thread
    pub fn sequential() -> Self {
        Self {
            mode: Mode::Sequential,
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.mode, Mode::Pool(_))
    }

    /// Number of worker threads, 1 when sequential
    pub fn thread_count(&self) -> usize {
        match &self.mode {
            Mode::Pool(pool) => pool.current_num_threads(),
            Mode::Sequential => 1,
        }
    }

    /// Runs `root` on the pool and blocks until it resolves.
    ///
    /// A panic anywhere in the tree is turned into
    /// [`SearchError::Unrecoverable`].
    pub fn submit_root<F, R>(&self, root: F) -> SearchResult<R>
    where
        F: FnOnce() -> SearchResult<R> + Send,
        R: Send,
    {
        let run = AssertUnwindSafe(|| match &self.mode {
            Mode::Pool(pool) => pool.install(root),
            Mode::Sequential => root(),
        });

        match panic::catch_unwind(run) {
            Ok(result) => result,
            Err(payload) => Err(SearchError::unrecoverable(format!(
                "worker panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }

    /// Makes `left` available for stealing, runs `right` on the current
    /// worker, and returns both results once both have finished
    pub fn fork_join<L, R, A, B>(&self, left: L, right: R) -> (A, B)
    where
        L: FnOnce() -> A + Send,
        R: FnOnce() -> B + Send,
        A: Send,
        B: Send,
    {
        match &self.mode {
            Mode::Pool(_) => {
                // rayon::join runs its first closure in place and queues the second
                let (right_result, left_result) = rayon::join(right, left);
                (left_result, right_result)
            }
            Mode::Sequential => {
                let left_result = left();
                let right_result = right();
                (left_result, right_result)
            }
        }
    }

    /// Identifier of the worker running the caller
    pub fn worker_id(&self) -> WorkerId {
        match &self.mode {
            Mode::Pool(_) => rayon::current_thread_index().map_or(WorkerId(0), WorkerId),
            Mode::Sequential => WorkerId(0),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn pool(threads: usize) -> Scheduler {
        Scheduler::new(NonZeroUsize::new(threads).unwrap())
    }

    #[test]
    fn test_thread_count() {
        let scheduler = pool(3);
        assert!(scheduler.is_parallel());
        assert_eq!(scheduler.thread_count(), 3);

        let scheduler = Scheduler::sequential();
        assert!(!scheduler.is_parallel());
        assert_eq!(scheduler.thread_count(), 1);
    }

    #[test]
    fn test_fork_join_returns_left_then_right() {
        for scheduler in [pool(4), Scheduler::sequential()] {
            let (left, right) = scheduler
                .submit_root(|| Ok(scheduler.fork_join(|| "left", || "right")))
                .unwrap();
            assert_eq!(left, "left");
            assert_eq!(right, "right");
        }
    }

    #[test]
    fn test_sequential_runs_left_first() {
        let scheduler = Scheduler::sequential();
        let order = Mutex::new(Vec::new());
        scheduler.fork_join(
            || order.lock().unwrap().push("left"),
            || order.lock().unwrap().push("right"),
        );
        assert_eq!(*order.lock().unwrap(), vec!["left", "right"]);
    }

    #[test]
    fn test_worker_ids_stay_in_range() {
        let scheduler = pool(4);
        let seen = Mutex::new(HashSet::new());

        fn fan_out(scheduler: &Scheduler, depth: usize, seen: &Mutex<HashSet<WorkerId>>) {
            seen.lock().unwrap().insert(scheduler.worker_id());
            if depth > 0 {
                scheduler.fork_join(
                    || fan_out(scheduler, depth - 1, seen),
                    || fan_out(scheduler, depth - 1, seen),
                );
            }
        }

        scheduler
            .submit_root(|| {
                fan_out(&scheduler, 8, &seen);
                Ok(())
            })
            .unwrap();

        let seen = seen.into_inner().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|id| id.0 < 4));
        assert_eq!(Scheduler::sequential().worker_id(), WorkerId(0));
    }

    #[test]
    fn test_submit_root_propagates_error() {
        let scheduler = pool(2);
        let result: SearchResult<()> =
            scheduler.submit_root(|| Err(SearchError::invalid_input("empty phrase")));
        assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn test_panic_becomes_unrecoverable() {
        for scheduler in [pool(2), Scheduler::sequential()] {
            let result: SearchResult<()> = scheduler.submit_root(|| {
                let (_, _) = scheduler.fork_join(|| 1, || -> i32 { panic!("boom") });
                Ok(())
            });
            match result {
                Err(SearchError::Unrecoverable(msg)) => assert!(msg.contains("boom")),
                other => panic!("expected unrecoverable error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_worker_id_display() {
        assert_eq!(WorkerId(3).to_string(), "worker-3");
    }
}
