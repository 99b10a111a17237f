//! Reusable pickup slots
//!
//! Slots are never removed: killing a pickup clears its `active` flag and
//! the next spawn takes the first inactive slot. The pool only grows when
//! every slot is in use.

use glam::Vec2;

use super::state::{Pickup, PickupKind};

#[derive(Debug, Clone, Default)]
pub struct PickupPool {
    slots: Vec<Pickup>,
}

impl PickupPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Activate a pickup at `pos`, reusing the first free slot
    pub fn get(&mut self, kind: PickupKind, pos: Vec2, size: Vec2) -> usize {
        let slot = match self.slots.iter().position(|p| !p.active) {
            Some(slot) => slot,
            None => {
                let slot = self.slots.len();
                self.slots.push(Pickup {
                    slot,
                    kind,
                    pos,
                    vel: Vec2::ZERO,
                    size,
                    active: false,
                });
                slot
            }
        };

        let pickup = &mut self.slots[slot];
        pickup.kind = kind;
        pickup.pos = pos;
        pickup.vel = Vec2::ZERO;
        pickup.size = size;
        pickup.active = true;
        slot
    }

    /// Deactivate a pickup, keeping its slot
    ///
    /// Returns `false` if it was already inactive. Panics if `slot` was never
    /// handed out.
    pub fn kill(&mut self, slot: usize) -> bool {
        let len = self.slots.len();
        let Some(pickup) = self.slots.get_mut(slot) else {
            panic!("pickup slot {} out of range (pool holds {})", slot, len);
        };
        let was_active = pickup.active;
        pickup.active = false;
        pickup.vel = Vec2::ZERO;
        was_active
    }

    pub fn slot(&self, slot: usize) -> Option<&Pickup> {
        self.slots.get(slot)
    }

    pub fn active(&self) -> impl Iterator<Item = &Pickup> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Pickup> {
        self.slots.iter_mut().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Number of slots ever allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Deactivate every slot
    pub fn reset(&mut self) {
        for pickup in &mut self.slots {
            pickup.active = false;
            pickup.vel = Vec2::ZERO;
        }
    }
}
