//! Run driver
//!
//! Owns one [`GameState`] together with its collaborators: the physics world
//! and the best-score store. The frame scheduler (browser animation frame,
//! headless loop, test) calls [`Run::frame`] with wall-clock deltas; the run
//! turns them into fixed simulation ticks.

use crate::persistence::BestScoreStore;
use crate::sim::{
    ArcadePhysics, GameEvent, GamePhase, GameState, PhysicsWorld, TickInput, fire_due_tasks, tick,
};
use crate::tuning::Tuning;

/// Largest frame delta accepted (seconds); longer stalls are clipped
const MAX_FRAME_DT: f32 = 0.1;

pub struct Run<S: BestScoreStore, W: PhysicsWorld = ArcadePhysics> {
    state: GameState,
    physics: W,
    store: S,
    accumulator: f32,
    /// Best score last written to the store
    persisted_best: u64,
}

impl<S: BestScoreStore> Run<S, ArcadePhysics> {
    /// Start a run with the built-in physics
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        Self::with_physics(seed, tuning, store, ArcadePhysics)
    }
}

impl<S: BestScoreStore, W: PhysicsWorld> Run<S, W> {
    /// Start a run with a custom physics collaborator
    pub fn with_physics(seed: u64, tuning: Tuning, mut store: S, physics: W) -> Self {
        let best = load_best(&mut store);
        log::info!("Run starting with seed {} (best score {})", seed, best);
        Self {
            state: GameState::new(seed, tuning, best),
            physics,
            store,
            accumulator: 0.0,
            persisted_best: best,
        }
    }

    /// Advance by wall-clock `dt` seconds; returns the number of ticks run
    pub fn frame(&mut self, dt: f32, input: &TickInput) -> u32 {
        let sim_dt = self.state.tuning.sim_dt;
        let max_substeps = self.state.tuning.max_substeps;
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= sim_dt && substeps < max_substeps {
            self.step(input);
            self.accumulator -= sim_dt;
            substeps += 1;
        }
        if substeps == max_substeps {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(sim_dt);
        }
        substeps
    }

    /// Run exactly one fixed tick: due tasks, physics, then gameplay
    pub fn step(&mut self, input: &TickInput) {
        if self.state.phase == GamePhase::Dead {
            return;
        }
        fire_due_tasks(&mut self.state);
        let dt = self.state.tuning.sim_dt;
        let contacts = self.physics.step(&mut self.state, dt);
        tick(&mut self.state, input, &contacts);
        self.persist_best();
    }

    /// Begin a new run in place
    ///
    /// Entities reset to their initial values and every pending deferred
    /// effect from the previous run is dropped.
    pub fn restart(&mut self, seed: u64) {
        self.persist_best();
        self.state.reset(seed);
        self.accumulator = 0.0;
        log::info!("Run restarted with seed {} (best score {})", seed, self.state.score.best());
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for collaborators that write positions directly
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    pub fn score(&self) -> u64 {
        self.state.score.score()
    }

    pub fn best_score(&self) -> u64 {
        self.state.score.best()
    }

    /// Take the presentation events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn persist_best(&mut self) {
        let best = self.state.score.best();
        if best <= self.persisted_best {
            return;
        }
        // Mark as persisted even on failure so a broken store is not hammered every tick
        self.persisted_best = best;
        match self.store.save(best) {
            Ok(()) => log::info!("New best score {}", best),
            Err(e) => log::warn!("Could not save best score {}: {}", best, e),
        }
    }
}

fn load_best<S: BestScoreStore>(store: &mut S) -> u64 {
    match store.load() {
        Ok(best) => best,
        Err(e) => {
            log::warn!("Best score unavailable ({}), starting from 0", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PersistenceError};
    use crate::sim::{Contacts, PickupKind};
    use glam::Vec2;

    /// Store that always fails
    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn load(&mut self) -> Result<u64, PersistenceError> {
            Err(PersistenceError::Unavailable("unplugged".into()))
        }

        fn save(&mut self, _score: u64) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("unplugged".into()))
        }
    }

    /// Physics stub that reports a fixed contact set every step
    struct Scripted(Contacts);

    impl PhysicsWorld for Scripted {
        fn step(&mut self, _state: &mut GameState, _dt: f32) -> Contacts {
            self.0.clone()
        }
    }

    fn collect(run: &mut Run<MemoryStore, Scripted>, kind: PickupKind, times: usize) {
        for _ in 0..times {
            let slot = run
                .state_mut()
                .pickups
                .get(kind, Vec2::ZERO, Vec2::splat(40.0));
            run.physics.0.pickup_overlaps = vec![slot];
            run.step(&TickInput::default());
        }
        run.physics.0.pickup_overlaps.clear();
    }

    fn scripted(best: u64) -> Run<MemoryStore, Scripted> {
        Run::with_physics(
            1,
            Tuning::default(),
            MemoryStore::with_best(best),
            Scripted(Contacts::default()),
        )
    }

    #[test]
    fn test_best_score_raised_and_persisted() {
        let mut run = scripted(50);
        collect(&mut run, PickupKind::Bonus, 2);
        collect(&mut run, PickupKind::Neutral, 20);
        assert_eq!(run.score(), 120);
        assert_eq!(run.best_score(), 120);
        assert_eq!(run.store().best, 120);
    }

    #[test]
    fn test_best_score_kept_when_lower() {
        let mut run = scripted(500);
        collect(&mut run, PickupKind::Bonus, 2);
        collect(&mut run, PickupKind::Neutral, 20);
        assert_eq!(run.score(), 120);
        assert_eq!(run.best_score(), 500);
        assert_eq!(run.store().writes, 0);
    }

    #[test]
    fn test_broken_store_falls_back_to_zero() {
        let mut run = Run::new(3, Tuning::default(), BrokenStore);
        assert_eq!(run.best_score(), 0);
        let slot = run
            .state_mut()
            .pickups
            .get(PickupKind::Neutral, Vec2::ZERO, Vec2::splat(40.0));
        crate::sim::collision::resolve_pickups(run.state_mut(), &[slot]);
        // Save fails but the run goes on
        run.step(&TickInput::default());
        assert_eq!(run.best_score(), 1);
        assert!(!run.is_dead());
    }

    #[test]
    fn test_frame_accumulates_fixed_ticks() {
        let mut run = scripted(0);
        assert_eq!(run.frame(0.005, &TickInput::default()), 0);
        assert_eq!(run.frame(0.015, &TickInput::default()), 1);
        // A long stall is clipped to the substep cap
        let ran = run.frame(5.0, &TickInput::default());
        assert!(ran <= run.state().tuning.max_substeps);
    }

    #[test]
    fn test_restart_cancels_pending_effects() {
        let mut run = scripted(0);
        run.physics.0.touching_down = true;
        run.step(&TickInput::default());
        collect(&mut run, PickupKind::Bonus, 1);
        assert!(!run.state().scheduler.is_empty());

        run.restart(2);
        assert!(run.state().scheduler.is_empty());
        assert_eq!(run.score(), 0);
        assert_eq!(run.best_score(), 50);

        run.physics.0.touching_down = false;
        for _ in 0..30 {
            run.step(&TickInput::default());
        }
        let events = run.drain_events();
        assert!(!events.contains(&GameEvent::JumpImpulse));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::BonusCue { .. })));
    }

    #[test]
    fn test_jump_impulse_moves_player_on_its_tick() {
        let mut run = Run::new(4, Tuning::default(), MemoryStore::default());
        let mut landed = None;
        for _ in 0..240 {
            run.step(&TickInput::default());
            let events = run.drain_events();
            if landed.is_none() && events.iter().any(|e| matches!(e, GameEvent::WindUp { .. })) {
                landed = Some(run.state().time_ticks);
            }
            if events.contains(&GameEvent::JumpImpulse) {
                let landed = landed.unwrap();
                assert_eq!(run.state().time_ticks - landed, 12);
                // Physics already integrated the impulse this tick
                assert!(run.state().player.vel.y > -900.0);
                assert!(run.state().player.vel.y < 0.0);
                assert!(!run.state().player.touching_ground);
                return;
            }
        }
        panic!("no jump within 240 ticks");
    }

    #[test]
    fn test_lethal_ends_run_and_restart_resumes() {
        let mut run = scripted(0);
        collect(&mut run, PickupKind::Lethal, 1);
        assert!(run.is_dead());
        let deaths = run
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .count();
        assert_eq!(deaths, 1);

        run.restart(9);
        assert!(!run.is_dead());
        assert_eq!(run.state().seed, 9);
    }
}
