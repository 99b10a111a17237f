//! Arcade physics collaborator
//!
//! Integrates gravity, resolves one-way platform contacts and reports
//! player/pickup overlaps. Gameplay never reads positions from here directly;
//! it only consumes the [`Contacts`] report, so a different engine can stand
//! in by implementing [`PhysicsWorld`].

use super::collision::{Aabb, Contacts};
use super::state::{GameState, Platform};

/// Anything that can advance bodies and report contacts for one tick
pub trait PhysicsWorld {
    fn step(&mut self, state: &mut GameState, dt: f32) -> Contacts;
}

/// Snap tolerance for "was above the platform last step"
const LANDING_EPSILON: f32 = 0.01;

/// Built-in physics: gravity, platforms solid from above only, camera follow
#[derive(Debug, Clone, Default)]
pub struct ArcadePhysics;

impl PhysicsWorld for ArcadePhysics {
    fn step(&mut self, state: &mut GameState, dt: f32) -> Contacts {
        if state.is_dead() {
            return Contacts::default();
        }

        let gravity = state.tuning.gravity;
        let height = state.tuning.viewport_height;

        // --- PLAYER ---
        let player = &mut state.player;
        player.vel.y += gravity * dt;
        let prev_bottom = player.bottom();
        player.pos += player.vel * dt;

        let mut touching_down = false;
        if player.vel.y >= 0.0 {
            let body = Aabb::from_center(player.pos, player.size);
            if let Some(top) = landing_surface(state.platforms.iter(), &body, prev_bottom) {
                player.pos.y = top - player.size.y / 2.0;
                player.vel.y = 0.0;
                touching_down = true;
            }
        }

        // --- CAMERA ---
        state.scroll_y = player.pos.y - height / 2.0;
        let player_body = Aabb::from_center(player.pos, player.size);

        // --- PICKUPS ---
        let cull_below = state.scroll_y + height * 2.0;
        let mut culled = Vec::new();
        let mut pickup_overlaps = Vec::new();
        for pickup in state.pickups.active_mut() {
            pickup.vel.y += gravity * dt;
            let prev_bottom = pickup.pos.y + pickup.size.y / 2.0;
            pickup.pos += pickup.vel * dt;

            if pickup.vel.y >= 0.0 {
                let body = Aabb::from_center(pickup.pos, pickup.size);
                if let Some(top) = landing_surface(state.platforms.iter(), &body, prev_bottom) {
                    pickup.pos.y = top - pickup.size.y / 2.0;
                    pickup.vel.y = 0.0;
                }
            }

            if pickup.pos.y > cull_below {
                culled.push(pickup.slot);
                continue;
            }
            if Aabb::from_center(pickup.pos, pickup.size).overlaps(&player_body) {
                pickup_overlaps.push(pickup.slot);
            }
        }
        for slot in culled {
            state.pickups.kill(slot);
            log::trace!("Culled pickup slot {} below the view", slot);
        }

        Contacts {
            touching_down,
            pickup_overlaps,
        }
    }
}

/// Top of the first platform the body fell onto during this step
fn landing_surface<'a>(
    platforms: impl Iterator<Item = &'a Platform>,
    body: &Aabb,
    prev_bottom: f32,
) -> Option<f32> {
    platforms
        .filter(|p| {
            let platform = Aabb::from_center(p.pos, p.size);
            body.overlaps_x(&platform) && prev_bottom <= p.top() + LANDING_EPSILON && body.max.y >= p.top()
        })
        .map(|p| p.top())
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::PickupKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(11, Tuning::default(), 0)
    }

    #[test]
    fn test_player_falls_onto_platform_below() {
        let mut state = state();
        let mut physics = ArcadePhysics;

        let mut landed_at = None;
        for i in 0..120 {
            let contacts = physics.step(&mut state, SIM_DT);
            if contacts.touching_down {
                landed_at = Some(i);
                break;
            }
        }
        assert!(landed_at.is_some());
        // Lands on the platform at y = 450 (the one at 300 is passed through from inside)
        let platform_top = 450.0 - state.tuning.platform_height / 2.0;
        assert!((state.player.bottom() - platform_top).abs() < 0.001);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_resting_player_keeps_touching() {
        let mut state = state();
        let mut physics = ArcadePhysics;
        while !physics.step(&mut state, SIM_DT).touching_down {}
        for _ in 0..5 {
            assert!(physics.step(&mut state, SIM_DT).touching_down);
        }
    }

    #[test]
    fn test_platform_is_passable_from_below() {
        let mut state = state();
        let mut physics = ArcadePhysics;
        let top = state.platforms.get(1).unwrap().top();
        state.player.pos = Vec2::new(state.platforms.get(1).unwrap().pos.x, top + 40.0);
        state.player.vel = Vec2::new(0.0, -900.0);

        for _ in 0..10 {
            assert!(!physics.step(&mut state, SIM_DT).touching_down);
        }
        assert!(state.player.bottom() < top);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut state = state();
        ArcadePhysics.step(&mut state, SIM_DT);
        assert_eq!(state.scroll_y, state.player.pos.y - 300.0);
    }

    #[test]
    fn test_pickup_settles_on_platform() {
        let mut state = state();
        let platform = *state.platforms.get(0).unwrap();
        let pos = crate::sim::spawner::spawn_position(&platform, 10.0);
        let slot = state.pickups.get(PickupKind::Neutral, pos, Vec2::splat(40.0));
        // Keep the player well away
        state.player.pos.x = if platform.pos.x > 400.0 { 50.0 } else { 750.0 };

        for _ in 0..30 {
            ArcadePhysics.step(&mut state, SIM_DT);
        }
        let pickup = state.pickups.slot(slot).unwrap();
        assert!(pickup.active);
        assert!((pickup.pos.y + 20.0 - platform.top()).abs() < 0.001);
    }

    #[test]
    fn test_overlap_reported() {
        let mut state = state();
        let pos = state.player.pos + Vec2::new(10.0, 40.0);
        let slot = state.pickups.get(PickupKind::Bonus, pos, Vec2::splat(40.0));
        let contacts = ArcadePhysics.step(&mut state, SIM_DT);
        assert_eq!(contacts.pickup_overlaps, vec![slot]);
    }

    #[test]
    fn test_far_fallen_pickup_is_culled() {
        let mut state = state();
        let slot = state
            .pickups
            .get(PickupKind::Neutral, Vec2::new(10.0, 5000.0), Vec2::splat(40.0));
        ArcadePhysics.step(&mut state, SIM_DT);
        assert!(!state.pickups.slot(slot).unwrap().active);
    }

    #[test]
    fn test_dead_state_is_frozen() {
        let mut state = state();
        state.die(crate::sim::state::DeathCause::Fell);
        let before = state.player.pos;
        let contacts = ArcadePhysics.step(&mut state, SIM_DT);
        assert_eq!(contacts, Contacts::default());
        assert_eq!(state.player.pos, before);
    }
}
