//! Pending callback queue
//!
//! Tasks live in a `Slab`; the slab key plus an insertion sequence number form
//! the public [`TaskHandle`], so a handle to a finished task never cancels a
//! newer task that reused its slot.

use contracts::{TaskHandle, Wakeup};
use slab::Slab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskKind {
    Frame,
    Timer,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    due: f64,
    seq: u64,
    kind: TaskKind,
    wakeup: Wakeup,
}

#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    tasks: Slab<Task>,
    next_seq: u64,
}

const KEY_MASK: u64 = 0xFFFF_FFFF;

fn encode(key: usize, seq: u64) -> TaskHandle {
    TaskHandle((seq << 32) | (key as u64 & KEY_MASK))
}

fn decode(handle: TaskHandle) -> (usize, u64) {
    ((handle.0 & KEY_MASK) as usize, handle.0 >> 32)
}

impl TaskQueue {
    pub fn schedule(&mut self, due: f64, kind: TaskKind, wakeup: Wakeup) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let key = self.tasks.insert(Task {
            due,
            seq,
            kind,
            wakeup,
        });
        encode(key, seq)
    }

    /// Remove the task behind `handle` if it is still pending and of `kind`.
    pub fn cancel(&mut self, handle: TaskHandle, kind: TaskKind) -> bool {
        let (key, seq) = decode(handle);
        match self.tasks.get(key) {
            Some(task) if (task.seq & KEY_MASK) == seq && task.kind == kind => {
                self.tasks.remove(key);
                true
            }
            _ => false,
        }
    }

    fn earliest(&self) -> Option<(usize, &Task)> {
        self.tasks.iter().min_by(|(_, a), (_, b)| {
            a.due.total_cmp(&b.due).then_with(|| a.seq.cmp(&b.seq))
        })
    }

    pub fn next_due(&self) -> Option<f64> {
        self.earliest().map(|(_, task)| task.due)
    }

    /// Pop the earliest task due at or before `until`, ties broken by insertion order.
    pub fn pop_due(&mut self, until: f64) -> Option<(f64, Wakeup)> {
        let key = match self.earliest() {
            Some((key, task)) if task.due <= until => key,
            _ => return None,
        };
        let task = self.tasks.remove(key);
        Some((task.due, task.wakeup))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn count(&self, kind: TaskKind) -> usize {
        self.tasks.iter().filter(|(_, task)| task.kind == kind).count()
    }
}
