// ============================================================================
// propflow - Task Scheduling
// Cancellable deferred callbacks behind the debounce contract
// ============================================================================
//
// The debounce window is "the next tick": property changes arriving before
// the tick fires coalesce into a single re-resolution. There are no
// microtasks in plain Rust, so deferral is explicit — hosts fold `tick()`
// into their frame loop, tests call it directly.
//
// Key functions:
// - schedule: queue a callback, get a cancellable handle
// - tick: run everything queued (including tasks queued mid-tick)
// - pending_tasks: count of live (uncancelled) queued tasks
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =============================================================================
// SCHEDULER CONTEXT
// =============================================================================

/// Maximum drain iterations before a tick is considered an infinite loop
const MAX_TICK_ITERATIONS: u32 = 1000;

struct Task {
    cancelled: Rc<Cell<bool>>,
    run: Box<dyn FnOnce()>,
}

/// Thread-local scheduler state: the task queue and the tick guard.
struct SchedulerContext {
    queue: RefCell<Vec<Task>>,
    ticking: Cell<bool>,
}

impl SchedulerContext {
    fn new() -> Self {
        Self {
            queue: RefCell::new(Vec::new()),
            ticking: Cell::new(false),
        }
    }
}

thread_local! {
    static SCHEDULER: SchedulerContext = SchedulerContext::new();
}

fn with_scheduler<R>(f: impl FnOnce(&SchedulerContext) -> R) -> R {
    SCHEDULER.with(f)
}

// =============================================================================
// TASK HANDLE
// =============================================================================

/// Handle to a scheduled task. Cancelling is synchronous: a cancelled
/// task never runs, even if the tick that would have run it is already
/// draining the queue.
#[derive(Clone)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

// =============================================================================
// SCHEDULE
// =============================================================================

/// Queue a callback for the next tick.
pub fn schedule(run: impl FnOnce() + 'static) -> TaskHandle {
    let cancelled = Rc::new(Cell::new(false));
    let task = Task {
        cancelled: cancelled.clone(),
        run: Box::new(run),
    };

    with_scheduler(|ctx| ctx.queue.borrow_mut().push(task));

    TaskHandle { cancelled }
}

/// Number of queued tasks that are still live.
pub fn pending_tasks() -> usize {
    with_scheduler(|ctx| {
        ctx.queue
            .borrow()
            .iter()
            .filter(|task| !task.cancelled.get())
            .count()
    })
}

// =============================================================================
// TICK
// =============================================================================

/// Drain the task queue.
///
/// Tasks scheduled while draining run within the same tick. A nested
/// `tick()` call from inside a task is a no-op; the outer drain picks up
/// whatever the task queued.
pub fn tick() {
    let already_ticking = with_scheduler(|ctx| ctx.ticking.replace(true));
    if already_ticking {
        return;
    }

    let mut iterations = 0u32;
    loop {
        iterations += 1;
        if iterations > MAX_TICK_ITERATIONS {
            with_scheduler(|ctx| ctx.ticking.set(false));
            panic!(
                "Maximum tick depth exceeded. This can happen when a scheduled \
                 task keeps scheduling follow-up work every tick."
            );
        }

        let batch = with_scheduler(|ctx| std::mem::take(&mut *ctx.queue.borrow_mut()));
        if batch.is_empty() {
            break;
        }

        for task in batch {
            if !task.cancelled.get() {
                (task.run)();
            }
        }
    }

    with_scheduler(|ctx| ctx.ticking.set(false));
}

// =============================================================================
// TESTS
// =============================================================================
