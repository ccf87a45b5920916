// Per-frame tasks that can be cancelled.
// The host calls `Scheduler::run_frame` once per presented frame; every live
// task runs with the shared context and the frame timestamp. A cancelled
// handle never runs again.

use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

type Task<C> = Box<dyn FnMut(&mut C, Instant)>;

pub struct Scheduler<C> {
    next_id: u64,
    tasks: Vec<(TaskHandle, &'static str, Task<C>)>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Run `task` on every frame until cancelled.
    pub fn every_frame(&mut self, name: &'static str, task: impl FnMut(&mut C, Instant) + 'static) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push((handle, name, Box::new(task)));
        debug!(task = name, "frame task scheduled");
        handle
    }

    /// Returns false if the handle was already cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let Some(idx) = self.tasks.iter().position(|(h, _, _)| *h == handle) else {
            return false;
        };
        let (_, name, _) = self.tasks.remove(idx);
        debug!(task = name, "frame task cancelled");
        true
    }

    pub fn cancel_all(&mut self) {
        for (_, name, _) in self.tasks.drain(..) {
            debug!(task = name, "frame task cancelled");
        }
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|(h, _, _)| *h == handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every live task once, in registration order.
    pub fn run_frame(&mut self, ctx: &mut C, now: Instant) {
        for (_, _, task) in &mut self.tasks {
            task(ctx, now);
        }
    }
}
