//! Single-threaded event loop with deferred tasks
//!
//! The picker follows the page's execution model: one callback runs at a time
//! and nothing runs in parallel. Deferred work (the settle delay before the map
//! widget is built, message delivery) is queued here with a deadline on a
//! virtual clock. Tests drive the clock with [`EventLoop::advance`]; the
//! `tokio-runtime` feature adds a driver that sleeps until each deadline.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Handle of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

type Task = Box<dyn FnOnce()>;

struct ScheduledTask {
    id: TaskId,
    due: Duration,
    label: &'static str,
    task: Task,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline first, then submission order (max-heap, so reversed)
        match other.due.cmp(&self.due) {
            Ordering::Equal => other.id.cmp(&self.id),
            ordering => ordering,
        }
    }
}

/// Cooperative task queue with a virtual clock
#[derive(Default)]
pub struct EventLoop {
    queue: RefCell<BinaryHeap<ScheduledTask>>,
    now: Cell<Duration>,
    next_id: Cell<u64>,
    executed: Cell<u64>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the loop's clock, measured from its creation
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Queues `task` to run once `delay` has elapsed
    pub fn schedule<F>(&self, delay: Duration, label: &'static str, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let due = self.now.get() + delay;
        log::trace!("scheduling task {:?} ({}) at {:?}", id, label, due);
        self.queue.borrow_mut().push(ScheduledTask {
            id,
            due,
            label,
            task: Box::new(task),
        });
        id
    }

    /// Queues `task` for the next turn of the loop
    pub fn post<F>(&self, label: &'static str, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        self.schedule(Duration::ZERO, label, task)
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Total number of tasks run so far
    pub fn executed_tasks(&self) -> u64 {
        self.executed.get()
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.borrow().peek().map(|t| t.due)
    }

    /// Pops the earliest task if it is due at or before `limit`.
    ///
    /// The queue borrow ends before the task runs so tasks can schedule more work.
    fn pop_due(&self, limit: Duration) -> Option<ScheduledTask> {
        let mut queue = self.queue.borrow_mut();
        match queue.peek() {
            Some(next) if next.due <= limit => queue.pop(),
            _ => None,
        }
    }

    fn run_task(&self, scheduled: ScheduledTask) {
        if scheduled.due > self.now.get() {
            self.now.set(scheduled.due);
        }
        log::trace!("running task {:?} ({})", scheduled.id, scheduled.label);
        (scheduled.task)();
        self.executed.set(self.executed.get() + 1);
    }

    /// Runs every task that is already due, including tasks those tasks post
    pub fn run_ready(&self) -> usize {
        self.run_until(self.now.get())
    }

    /// Moves the clock forward by `duration`, running tasks as they fall due
    pub fn advance(&self, duration: Duration) -> usize {
        let target = self.now.get() + duration;
        let ran = self.run_until(target);
        self.now.set(target);
        ran
    }

    fn run_until(&self, limit: Duration) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_due(limit) {
            self.run_task(task);
            ran += 1;
        }
        ran
    }

    /// Runs tasks until the queue is empty, jumping the clock between deadlines
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(deadline) = self.next_deadline() {
            ran += self.run_until(deadline);
        }
        ran
    }

    /// Runs tasks until the queue is empty, sleeping on the tokio timer until
    /// each deadline. `poll` runs before every wait so external sources (a
    /// message channel fed from another thread) can enqueue work.
    #[cfg(feature = "tokio-runtime")]
    pub async fn run_realtime<P>(&self, mut poll: P, idle_timeout: Duration) -> usize
    where
        P: FnMut() -> usize,
    {
        let mut ran = 0;
        let mut idle_since = tokio::time::Instant::now();
        let mut last = idle_since;

        loop {
            let elapsed = last.elapsed();
            last = tokio::time::Instant::now();
            ran += self.advance(elapsed);

            if poll() > 0 {
                idle_since = tokio::time::Instant::now();
                continue;
            }

            match self.next_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_sub(self.now());
                    tokio::time::sleep(wait).await;
                    idle_since = tokio::time::Instant::now();
                }
                None => {
                    if idle_since.elapsed() >= idle_timeout {
                        log::debug!("event loop idle for {:?}, stopping", idle_timeout);
                        return ran;
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("now", &self.now.get())
            .field("pending", &self.pending_tasks())
            .field("executed", &self.executed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_in_deadline_order() {
        let event_loop = EventLoop::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (delay, name) in [(300, "late"), (100, "early"), (100, "early-second"), (0, "now")] {
            let order = order.clone();
            event_loop.schedule(Duration::from_millis(delay), "test", move || {
                order.borrow_mut().push(name)
            });
        }

        assert_eq!(event_loop.run_until_idle(), 4);
        assert_eq!(*order.borrow(), vec!["now", "early", "early-second", "late"]);
        assert_eq!(event_loop.now(), Duration::from_millis(300));
    }

    #[test]
    fn test_advance_respects_deadlines() {
        let event_loop = EventLoop::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        event_loop.schedule(Duration::from_millis(100), "delayed", move || flag.set(true));

        assert_eq!(event_loop.advance(Duration::from_millis(99)), 0);
        assert!(!fired.get());
        assert_eq!(event_loop.advance(Duration::from_millis(1)), 1);
        assert!(fired.get());
        assert!(event_loop.is_idle());
    }

    #[test]
    fn test_tasks_can_schedule_tasks() {
        let event_loop = Rc::new(EventLoop::new());
        let count = Rc::new(Cell::new(0));

        let inner_loop = event_loop.clone();
        let inner_count = count.clone();
        event_loop.post("outer", move || {
            inner_count.set(inner_count.get() + 1);
            let c = inner_count.clone();
            inner_loop.post("inner", move || c.set(c.get() + 1));
        });

        assert_eq!(event_loop.run_ready(), 2);
        assert_eq!(count.get(), 2);
        assert_eq!(event_loop.executed_tasks(), 2);
    }

    #[test]
    fn test_run_ready_skips_future_tasks() {
        let event_loop = EventLoop::new();
        event_loop.schedule(Duration::from_millis(10), "future", || {});
        assert_eq!(event_loop.run_ready(), 0);
        assert_eq!(event_loop.pending_tasks(), 1);
        assert_eq!(event_loop.next_deadline(), Some(Duration::from_millis(10)));
    }

    #[cfg(feature = "tokio-runtime")]
    #[tokio::test(start_paused = true)]
    async fn test_realtime_driver_waits_for_deadline() {
        let event_loop = EventLoop::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        event_loop.schedule(Duration::from_millis(300), "build", move || flag.set(true));

        let started = tokio::time::Instant::now();
        let ran = event_loop
            .run_realtime(|| 0, Duration::from_millis(20))
            .await;

        assert_eq!(ran, 1);
        assert!(fired.get());
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
