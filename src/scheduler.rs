//! Cooperative fixed-period task scheduler.
//!
//! The host loop calls [`Scheduler::poll`] as often as it can (far more often
//! than any task period).  Each [`PeriodicTask`] compares the current time
//! against its next due time and, when due, hands its id to a
//! [`TaskRunner`].  The scheduler knows nothing about what the tasks do.
//!
//! ```text
//!   host loop ──▶ Scheduler::poll(now) ──▶ task[0].run ──▶ TaskRunner::run_task(id)
//!                                     ──▶ task[1].run ──▶ ...
//!                                          (registration order)
//! ```
//!
//! ## Timing policy
//!
//! Due times advance by exactly one period per firing (`next_due += period`),
//! never to `now + period`, so there is no cumulative drift.  If a poll
//! arrives late by several periods the task body runs once per missed period
//! in the same call (catch-up).  Tasks whose state is counted in ticks, like
//! the weight debouncer, therefore stay tied to wall time.
//!
//! No task may block.  There are no priorities and no preemption.

use log::{info, warn};

/// Maximum number of tasks a [`Scheduler`] holds (stack-allocated).
pub const MAX_TASKS: usize = 4;

/// Callback trait the scheduler invokes for each due period.
///
/// `due_ms` is the scheduled time of this firing, which is earlier than the
/// poll time when catching up.
pub trait TaskRunner<T> {
    fn run_task(&mut self, id: T, due_ms: u64);
}

/// A task that fires every `period_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask<T> {
    id: T,
    period_ms: u32,
    next_due_ms: u64,
}

impl<T: Copy> PeriodicTask<T> {
    /// Create a task whose first firing is one period after `now_ms`.
    ///
    /// A zero period is bumped to 1 ms so the catch-up loop terminates.
    pub fn new(id: T, period_ms: u32, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            id,
            period_ms,
            next_due_ms: now_ms + u64::from(period_ms),
        }
    }

    pub fn id(&self) -> T {
        self.id
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Run the task body once per elapsed period.  No-op when not yet due.
    /// Returns the number of times the body ran.
    pub fn run(&mut self, now_ms: u64, runner: &mut impl TaskRunner<T>) -> u32 {
        let mut runs = 0;
        while now_ms >= self.next_due_ms {
            let due = self.next_due_ms;
            self.next_due_ms += u64::from(self.period_ms);
            runner.run_task(self.id, due);
            runs += 1;
        }
        runs
    }
}

/// Ordered set of periodic tasks driven from a single polling loop.
pub struct Scheduler<T> {
    tasks: heapless::Vec<PeriodicTask<T>, MAX_TASKS>,
}

impl<T: Copy + core::fmt::Debug> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: heapless::Vec::new(),
        }
    }

    /// Append a task.  Tasks run in registration order within one poll.
    /// Hands the task back if the table is full.
    pub fn register(&mut self, task: PeriodicTask<T>) -> Result<(), PeriodicTask<T>> {
        match self.tasks.push(task) {
            Ok(()) => {
                info!(
                    "Scheduler: registered {:?} every {} ms (slot {})",
                    task.id,
                    task.period_ms,
                    self.tasks.len() - 1
                );
                Ok(())
            }
            Err(task) => {
                warn!("Scheduler: table full, {:?} not registered", task.id);
                Err(task)
            }
        }
    }

    /// Advance every task to `now_ms`.  Call once per host loop pass.
    pub fn poll(&mut self, now_ms: u64, runner: &mut impl TaskRunner<T>) {
        for task in &mut self.tasks {
            task.run(now_ms, runner);
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[PeriodicTask<T>] {
        &self.tasks
    }
}

impl<T: Copy + core::fmt::Debug> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
