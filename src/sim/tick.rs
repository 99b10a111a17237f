//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run deterministically. A driver calls
//! [`fire_due_tasks`], then steps physics (see [`super::physics`]), then
//! hands the contact report to [`tick`], which applies gameplay in a fixed
//! order:
//!
//! 1. fire due deferred tasks not already fired before physics
//! 2. horizontal input, then horizontal wraparound
//! 3. landing and pickup contacts
//! 4. platform recycling (may spawn pickups)
//! 5. fall-death check

use super::collision::{Contacts, apply_jump_impulse, resolve_landing, resolve_pickups};
use super::schedule::Task;
use super::state::{DeathCause, GameEvent, GamePhase, GameState};
use crate::wrap_horizontal;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Steer left (only while airborne)
    pub left: bool,
    /// Steer right (only while airborne)
    pub right: bool,
}

/// Fire the deferred tasks due on the upcoming tick
///
/// Called before physics so a jump impulse moves the player on the tick it
/// fires. Calling it again for the same tick is a no-op.
pub fn fire_due_tasks(state: &mut GameState) {
    if state.phase == GamePhase::Dead {
        return;
    }
    let now = state.time_ticks + 1;
    for due in state.scheduler.drain_due(now) {
        log::trace!("Tick {}: firing {:?} for {:?}", now, due.task, due.entity);
        match due.task {
            Task::JumpImpulse => apply_jump_impulse(state),
            Task::BonusCue { index } => state.events.push(GameEvent::BonusCue { index }),
        }
    }
}

/// Advance the run by one tick
pub fn tick(state: &mut GameState, input: &TickInput, contacts: &Contacts) {
    if state.phase == GamePhase::Dead {
        return;
    }

    fire_due_tasks(state);
    state.time_ticks += 1;

    // Horizontal movement only happens mid-air
    let speed = state.tuning.player_speed;
    let player = &mut state.player;
    player.vel.x = if contacts.touching_down {
        0.0
    } else if input.left {
        -speed
    } else if input.right {
        speed
    } else {
        0.0
    };
    player.pos.x = wrap_horizontal(player.pos.x, state.tuning.viewport_width);

    resolve_landing(state, contacts.touching_down);
    resolve_pickups(state, &contacts.pickup_overlaps);
    if state.is_dead() {
        return;
    }

    let recycled = state.platforms.recycle(
        state.scroll_y,
        &state.tuning,
        &mut state.rng,
        &mut state.pickups,
        &mut state.events,
    );
    if recycled > 0 {
        log::debug!("Tick {}: recycled {} platform(s)", state.time_ticks, recycled);
    }

    let fall_limit = state.player.last_jump_baseline + state.tuning.viewport_height / 2.0;
    if state.player.pos.y > fall_limit {
        state.die(DeathCause::Fell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::physics::{ArcadePhysics, PhysicsWorld};
    use crate::sim::state::PickupKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(12345, Tuning::default(), 0)
    }

    fn airborne() -> Contacts {
        Contacts::default()
    }

    fn grounded() -> Contacts {
        Contacts {
            touching_down: true,
            pickup_overlaps: Vec::new(),
        }
    }

    fn count(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_horizontal_input_only_mid_air() {
        let mut state = state();
        let left = TickInput {
            left: true,
            right: false,
        };

        tick(&mut state, &left, &airborne());
        assert_eq!(state.player.vel.x, -300.0);

        tick(&mut state, &TickInput::default(), &airborne());
        assert_eq!(state.player.vel.x, 0.0);

        let right = TickInput {
            left: false,
            right: true,
        };
        tick(&mut state, &right, &airborne());
        assert_eq!(state.player.vel.x, 300.0);

        tick(&mut state, &right, &grounded());
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_wraparound() {
        let mut state = state();
        state.player.pos.x = -1.0;
        tick(&mut state, &TickInput::default(), &airborne());
        assert_eq!(state.player.pos.x, 800.0);

        state.player.pos.x = 801.0;
        tick(&mut state, &TickInput::default(), &airborne());
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_five_grounded_ticks_one_impulse() {
        let mut state = state();
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), &grounded());
        }
        // Wind-up (12 ticks at 60 Hz) keeps running while grounded
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), &grounded());
        }
        assert_eq!(count(&state, |e| matches!(e, GameEvent::WindUp { .. })), 1);
        assert_eq!(count(&state, |e| *e == GameEvent::JumpImpulse), 1);
        assert_eq!(state.player.vel.y, -900.0);
    }

    #[test]
    fn test_impulse_waits_for_wind_up() {
        let mut state = state();
        tick(&mut state, &TickInput::default(), &grounded());
        let landed_tick = state.time_ticks;

        while state.player.vel.y == 0.0 {
            tick(&mut state, &TickInput::default(), &grounded());
            assert!(state.time_ticks - landed_tick <= 12);
        }
        assert_eq!(state.time_ticks - landed_tick, 12);
    }

    #[test]
    fn test_due_tasks_fire_before_physics() {
        let mut state = state();
        tick(&mut state, &TickInput::default(), &grounded());
        for _ in 0..11 {
            tick(&mut state, &TickInput::default(), &grounded());
        }
        assert_eq!(state.player.vel.y, 0.0);

        // Impulse lands before physics steps the upcoming tick
        fire_due_tasks(&mut state);
        assert_eq!(state.player.vel.y, -900.0);
        let mut physics = ArcadePhysics;
        let contacts = physics.step(&mut state, SIM_DT);
        assert!(!contacts.touching_down);
        tick(&mut state, &TickInput::default(), &contacts);

        assert_eq!(count(&state, |e| *e == GameEvent::JumpImpulse), 1);
        assert!(state.player.vel.y < 0.0);
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_fall_death_on_exact_tick() {
        let mut state = state();
        state.player.pos.y = 100.0;
        tick(&mut state, &TickInput::default(), &grounded());
        assert_eq!(state.player.last_jump_baseline, 100.0);
        state.scheduler.clear();

        // Limit is 100 + 600 / 2 = 400
        state.player.pos.y = 400.0;
        tick(&mut state, &TickInput::default(), &airborne());
        assert_eq!(state.phase, GamePhase::Running);

        state.player.pos.y = 400.5;
        tick(&mut state, &TickInput::default(), &airborne());
        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::Died { cause: DeathCause::Fell })), 1);
    }

    #[test]
    fn test_lethal_pickup_ends_run_once() {
        let mut state = state();
        let slot = state
            .pickups
            .get(PickupKind::Lethal, state.player.pos, Vec2::splat(40.0));
        let contacts = Contacts {
            touching_down: false,
            pickup_overlaps: vec![slot],
        };
        tick(&mut state, &TickInput::default(), &contacts);
        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(state.score.score(), 0);

        // Dead runs ignore further ticks
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), &contacts);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::Died { .. })), 1);
    }

    #[test]
    fn test_bonus_cues_fire_on_later_ticks() {
        let mut state = state();
        let slot = state
            .pickups
            .get(PickupKind::Bonus, state.player.pos, Vec2::splat(40.0));
        let contacts = Contacts {
            touching_down: false,
            pickup_overlaps: vec![slot],
        };
        tick(&mut state, &TickInput::default(), &contacts);
        assert_eq!(state.score.score(), 50);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::BonusCue { .. })), 0);

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &airborne());
        }
        assert_eq!(count(&state, |e| matches!(e, GameEvent::BonusCue { .. })), 10);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_recycle_runs_each_tick() {
        let mut state = state();
        state.scroll_y = -300.0;
        state.player.pos.y = 0.0;
        state.player.last_jump_baseline = 0.0;
        tick(&mut state, &TickInput::default(), &airborne());
        assert_eq!(count(&state, |e| matches!(e, GameEvent::PlatformRecycled { .. })), 2);
        for p in state.platforms.iter() {
            assert!(p.pos.y < state.tuning.viewport_height + state.scroll_y);
        }
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed and inputs produce identical results
        let mut physics = ArcadePhysics;
        let mut state1 = state();
        let mut state2 = state();

        let inputs = [
            TickInput { left: true, right: false },
            TickInput::default(),
            TickInput { left: false, right: true },
        ];

        for i in 0..600 {
            let input = inputs[i % inputs.len()];
            let c1 = physics.step(&mut state1, SIM_DT);
            tick(&mut state1, &input, &c1);
            let c2 = physics.step(&mut state2, SIM_DT);
            tick(&mut state2, &input, &c2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.events, state2.events);
    }
}
