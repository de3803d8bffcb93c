use std::collections::{BTreeSet, HashMap};

use crate::core::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Per-instance timer set over the simulated clock.
///
/// Every timer an engine registers lives here, so teardown is a single
/// `cancel_all` (or just dropping the owner) rather than scattered manual
/// bookkeeping. Nothing fires outside `advance_to`, and a dropped scheduler
/// can never invoke anything.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    next_id: u64,
    queue: BTreeSet<(Millis, TaskId)>,
    due_times: HashMap<TaskId, Millis>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn schedule_at(&mut self, at: Millis) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.insert((at, id));
        self.due_times.insert(id, at);
        id
    }

    pub fn schedule_after(&mut self, delay_ms: u64) -> TaskId {
        self.schedule_at(self.now.saturating_add(delay_ms))
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.due_times.remove(&id) {
            Some(at) => self.queue.remove(&(at, id)),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.due_times.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Advance the clock, returning every task due at or before `now` in
    /// (due time, registration) order. The clock never moves backwards; a
    /// stale `now` is a no-op.
    pub fn advance_to(&mut self, now: Millis) -> Vec<TaskId> {
        if now > self.now {
            self.now = now;
        }
        let mut fired = Vec::new();
        while let Some(&(at, id)) = self.queue.first() {
            if at > self.now {
                break;
            }
            self.queue.remove(&(at, id));
            self.due_times.remove(&id);
            fired.push(id);
        }
        fired
    }
}
