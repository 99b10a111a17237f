//! Pickup spawn policy
//!
//! One uniform draw per recycled platform. The bands are cumulative
//! thresholds checked in a fixed order, so a draw of exactly 0.01 is a bonus
//! and a draw of exactly 0.5 is still a neutral pickup.

use glam::Vec2;

use super::pool::PickupPool;
use super::state::{Platform, PickupKind};
use crate::tuning::{SpawnBands, Tuning};

/// Map a draw in [0, 1) to a pickup kind (or nothing)
pub fn choose_kind(r: f32, bands: &SpawnBands) -> Option<PickupKind> {
    if r <= bands.bonus {
        Some(PickupKind::Bonus)
    } else if r <= bands.lethal {
        Some(PickupKind::Lethal)
    } else if r <= bands.neutral {
        Some(PickupKind::Neutral)
    } else {
        None
    }
}

/// Where a pickup spawned on `platform` starts (center)
///
/// Sits a full platform height plus `offset` above the platform center so
/// the two bodies do not overlap on the first physics step.
#[inline]
pub fn spawn_position(platform: &Platform, offset: f32) -> Vec2 {
    Vec2::new(platform.pos.x, platform.pos.y - platform.size.y - offset)
}

/// Draw-driven spawn above `platform`; returns the pool slot and kind
pub fn spawn_above(
    platform: &Platform,
    r: f32,
    tuning: &Tuning,
    pool: &mut PickupPool,
) -> Option<(usize, PickupKind)> {
    let kind = choose_kind(r, &tuning.spawn_bands)?;
    let pos = spawn_position(platform, tuning.pickup_spawn_offset);
    let size = Vec2::splat(tuning.pickup_size);
    let slot = pool.get(kind, pos, size);
    log::trace!("Spawned {:?} in slot {} at ({:.0}, {:.0})", kind, slot, pos.x, pos.y);
    Some((slot, kind))
}
