//! Contact resolution
//!
//! The physics collaborator reports what touched what; this module turns
//! those reports into gameplay: an edge-triggered landing starts the jump
//! wind-up, and a pickup overlap scores or kills.

use glam::Vec2;

use super::schedule::{EntityId, Task};
use super::state::{DeathCause, GameEvent, GameState, PickupKind, PlayerAnim};
use crate::ms_to_ticks;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Horizontal extents overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }
}

/// Per-tick contact report from the physics collaborator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    /// Player is resting on a platform this tick (level, not edge)
    pub touching_down: bool,
    /// Pickup slots whose body started overlapping the player this tick
    pub pickup_overlaps: Vec<usize>,
}

/// Start the wind-up on the first tick of ground contact
///
/// Records the landing baseline and schedules the jump impulse; the impulse
/// itself is applied later by the tick loop when the task fires.
pub fn resolve_landing(state: &mut GameState, touching_down: bool) {
    let landed = touching_down && !state.player.touching_ground;
    state.player.touching_ground = touching_down;
    if !landed {
        return;
    }

    let player = &mut state.player;
    player.last_jump_baseline = player.pos.y;
    player.anim = PlayerAnim::WindUp;
    state.events.push(GameEvent::WindUp {
        x: player.pos.x,
        y: player.bottom(),
    });

    if !state.scheduler.is_pending(EntityId::Player, Task::JumpImpulse) {
        let delay = ms_to_ticks(state.tuning.wind_up_ms, state.tuning.sim_dt);
        state
            .scheduler
            .schedule(state.time_ticks, delay, EntityId::Player, Task::JumpImpulse);
    }
    log::trace!(
        "Landed at tick {} (baseline {:.1})",
        state.time_ticks,
        state.player.last_jump_baseline
    );
}

/// Apply the upward impulse (wind-up finished)
pub fn apply_jump_impulse(state: &mut GameState) {
    state.player.vel.y = -state.tuning.player_jump_speed;
    state.player.anim = PlayerAnim::Jump;
    state.events.push(GameEvent::JumpImpulse);
}

/// Collect every overlapped pickup
///
/// Overlaps against pickups that are already inactive are ignored. A lethal
/// pickup ends the run and stops processing the remaining overlaps.
pub fn resolve_pickups(state: &mut GameState, overlaps: &[usize]) {
    for &slot in overlaps {
        if state.is_dead() {
            return;
        }
        let kind = match state.pickups.slot(slot) {
            Some(pickup) => pickup.kind,
            None => panic!("overlap reported for unknown pickup slot {}", slot),
        };
        if !state.pickups.kill(slot) {
            log::warn!("Ignoring overlap with inactive pickup slot {}", slot);
            continue;
        }
        state.events.push(GameEvent::PickupCollected { slot, kind });

        match kind {
            PickupKind::Neutral => award(state, kind),
            PickupKind::Bonus => {
                award(state, kind);
                schedule_bonus_cues(state, slot);
            }
            PickupKind::Lethal => state.die(DeathCause::LethalPickup),
        }
    }
}

fn award(state: &mut GameState, kind: PickupKind) {
    let Some(points) = kind.points() else {
        return;
    };
    if state.score.add(points) {
        let score = state.score.best();
        state.events.push(GameEvent::BestScore { score });
    }
}

fn schedule_bonus_cues(state: &mut GameState, slot: usize) {
    let tuning = &state.tuning;
    for index in 0..tuning.bonus_cue_count {
        let delay = ms_to_ticks(index.saturating_mul(tuning.bonus_cue_spacing_ms), tuning.sim_dt);
        state.scheduler.schedule(
            state.time_ticks,
            delay,
            EntityId::Pickup(slot),
            Task::BonusCue { index },
        );
    }
}
