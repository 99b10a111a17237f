//! Idle/demo steering
//!
//! Picks a platform to aim for and steers toward it mid-air, shying away
//! from lethal pickups. Good enough to keep a demo run alive for a while;
//! it makes no attempt to be optimal.

use super::state::{GameState, PickupKind, Platform};
use super::tick::TickInput;

/// Dead zone around the target x
const STEER_DEADBAND: f32 = 8.0;
/// Horizontal clearance kept from a lethal pickup on the target platform
const HAZARD_CLEARANCE: f32 = 70.0;

/// Choose this tick's input from the current state
pub fn autopilot_input(state: &GameState) -> TickInput {
    if state.is_dead() || state.player.touching_ground {
        return TickInput::default();
    }

    let Some(target) = target_platform(state) else {
        return TickInput::default();
    };
    let target_x = avoid_hazards(state, &target);

    let dx = target_x - state.player.pos.x;
    if dx.abs() <= STEER_DEADBAND {
        TickInput::default()
    } else {
        TickInput {
            left: dx < 0.0,
            right: dx > 0.0,
        }
    }
}

/// Rising: the lowest platform above the player's feet. Falling: the
/// highest platform still below them.
fn target_platform(state: &GameState) -> Option<Platform> {
    let player = &state.player;
    let feet = player.bottom();
    let by_top = |a: &&Platform, b: &&Platform| a.top().total_cmp(&b.top());

    if player.vel.y < 0.0 {
        state
            .platforms
            .iter()
            .filter(|p| p.top() < feet)
            .max_by(by_top)
            .copied()
    } else {
        state
            .platforms
            .iter()
            .filter(|p| p.top() >= feet)
            .min_by(by_top)
            .or_else(|| state.platforms.iter().max_by(by_top))
            .copied()
    }
}

/// Aim for the side of the platform away from any lethal pickup resting on it
fn avoid_hazards(state: &GameState, target: &Platform) -> f32 {
    let half = target.half_width();
    let hazard = state.pickups.active().find(|p| {
        p.kind == PickupKind::Lethal
            && (p.pos.x - target.pos.x).abs() <= half
            && (p.pos.y - target.pos.y).abs() <= target.size.y + p.size.y * 2.0
    });

    match hazard {
        Some(h) if h.pos.x >= target.pos.x => h.pos.x - HAZARD_CLEARANCE - half / 2.0,
        Some(h) => h.pos.x + HAZARD_CLEARANCE + half / 2.0,
        None => target.pos.x,
    }
}
