//! Deferred one-shot effects
//!
//! Tasks are keyed by the entity they belong to and the tick they fire on.
//! The tick loop drains due tasks at the start of each tick, so a task never
//! fires on the tick that scheduled it.

use serde::{Deserialize, Serialize};

/// Entity a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityId {
    Player,
    Pickup(usize),
}

/// What to do when a task fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Apply the upward jump velocity
    JumpImpulse,
    /// Play one staggered bonus pop
    BonusCue { index: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub fire_tick: u64,
    pub entity: EntityId,
    pub task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Kept sorted by fire tick; ties keep insertion order
    queue: Vec<ScheduledTask>,
}

impl Scheduler {
    /// Queue `task` to fire `delay_ticks` after `now` (minimum one tick)
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, entity: EntityId, task: Task) {
        let fire_tick = now + delay_ticks.max(1);
        let at = self.queue.partition_point(|t| t.fire_tick <= fire_tick);
        self.queue.insert(
            at,
            ScheduledTask {
                fire_tick,
                entity,
                task,
            },
        );
    }

    /// Remove and return every task due at or before `now`, in firing order
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledTask> {
        let due = self.queue.partition_point(|t| t.fire_tick <= now);
        self.queue.drain(..due).collect()
    }

    /// Drop every task belonging to `entity`
    pub fn cancel(&mut self, entity: EntityId) {
        self.queue.retain(|t| t.entity != entity);
    }

    /// True if a task of this kind is queued for `entity`
    pub fn is_pending(&self, entity: EntityId, task: Task) -> bool {
        self.queue.iter().any(|t| t.entity == entity && t.task == task)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
