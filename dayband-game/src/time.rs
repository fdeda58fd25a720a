//! Clock and timer seams.
//!
//! The session never touches wall-clock time or platform timers directly;
//! hosts inject a `Clock` for completion dating and a `Scheduler` for the
//! reveal/advance cadence. The deterministic implementations here drive the
//! core in tests and in host shells without real timers.
use chrono::{Local, NaiveDate};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Source of "today" for completion dating.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Device-local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date; settable so tests can cross midnight.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    today: Rc<Cell<NaiveDate>>,
}

impl FixedClock {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Rc::new(Cell::new(today)),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

/// Cancelable handle to one scheduled task.
pub trait TimerHandle {
    /// Prevent the task from running. Safe to call after it already ran.
    fn cancel(&mut self);
}

/// One-shot task scheduling seam.
///
/// Platform shells back this with real timers; the session driver owns the
/// returned handle and cancels it on teardown so a stale timer never fires
/// into a dead session.
pub trait Scheduler {
    type Handle: TimerHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

struct QueuedTask {
    delay: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

/// Deterministic scheduler: queued tasks run only when the owner pumps them.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<QueuedTask>>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of queued tasks that have not been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|task| !task.cancelled.get())
            .count()
    }

    /// Delay of the next live task, if any.
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.queue
            .borrow()
            .iter()
            .find(|task| !task.cancelled.get())
            .map(|task| task.delay)
    }

    /// Run the oldest non-cancelled task. Returns whether one ran.
    pub fn fire_next(&self) -> bool {
        // Pop before running: the task may schedule its successor.
        let next = loop {
            let Some(task) = self.queue.borrow_mut().pop_front() else {
                return false;
            };
            if !task.cancelled.get() {
                break task;
            }
        };
        (next.task)();
        true
    }

    /// Pump until the queue drains, including tasks scheduled while pumping.
    pub fn fire_all(&self) {
        while self.fire_next() {}
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Handle into a `ManualScheduler` queue entry.
#[derive(Debug, Clone)]
pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle for ManualHandle {
    fn cancel(&mut self) {
        self.cancelled.set(true);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        let cancelled = Rc::new(Cell::new(false));
        self.queue.borrow_mut().push_back(QueuedTask {
            delay,
            cancelled: Rc::clone(&cancelled),
            task,
        });
        ManualHandle { cancelled }
    }
}
