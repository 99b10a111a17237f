//! Game state and core simulation types
//!
//! A `GameState` owns every entity of one run. Restarting resets the
//! entities in place; nothing is reallocated.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::PlatformField;
use super::pool::PickupPool;
use super::schedule::Scheduler;
use super::score::ScoreTracker;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Run ended; only an external restart leaves this phase
    Dead,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Collected a lethal pickup
    LethalPickup,
    /// Fell more than half a screen below the last landing
    Fell,
}

/// Pickup behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// +1 score
    Neutral,
    /// +50 score and a burst of celebratory cues
    Bonus,
    /// Ends the run
    Lethal,
}

impl PickupKind {
    /// Score awarded on collection (`None` for lethal pickups)
    pub fn points(self) -> Option<u64> {
        match self {
            PickupKind::Neutral => Some(1),
            PickupKind::Bonus => Some(50),
            PickupKind::Lethal => None,
        }
    }
}

/// Player animation state (mirrored to the sprite by the presentation layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    /// Falling without having jumped yet
    Falling,
    /// Squashed on a platform, waiting for the jump impulse
    WindUp,
    /// Airborne after a jump
    Jump,
}

/// The slime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Body center; y grows downward
    pub pos: Vec2,
    pub vel: Vec2,
    /// Body size
    pub size: Vec2,
    /// Standing on a platform as of the last contact report
    pub touching_ground: bool,
    /// y recorded at the most recent landing
    pub last_jump_baseline: f32,
    pub anim: PlayerAnim,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.viewport_width / 2.0, tuning.viewport_height / 2.0),
            vel: Vec2::ZERO,
            size: Vec2::new(tuning.player_width, tuning.player_height),
            touching_ground: false,
            last_jump_baseline: tuning.viewport_height,
            anim: PlayerAnim::Falling,
        }
    }

    /// y of the bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }
}

/// A static platform (one slot of the fixed pool)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Center
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    /// y of the top surface
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }
}

/// A collectible or hazard resting on / falling toward a platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    /// Pool slot this pickup occupies
    pub slot: usize,
    pub kind: PickupKind,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Inactive pickups are invisible to collision and free for reuse
    pub active: bool,
}

/// Fire-and-forget notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A platform was moved above the view
    PlatformRecycled { index: usize },
    /// A pickup appeared above a recycled platform
    PickupSpawned { slot: usize, kind: PickupKind },
    /// The player touched a pickup
    PickupCollected { slot: usize, kind: PickupKind },
    /// Landing: pre-jump squash plus splash particles at the player's feet
    WindUp { x: f32, y: f32 },
    /// Wind-up finished and the upward impulse was applied
    JumpImpulse,
    /// One of the staggered pops after a bonus pickup
    BonusCue { index: u32 },
    /// Best score improved
    BestScore { score: u64 },
    /// The run ended (scene transition hook; emitted once per death)
    Died { cause: DeathCause },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub platforms: PlatformField,
    pub pickups: PickupPool,
    pub score: ScoreTracker,
    /// Camera top edge (world y of the top of the view)
    pub scroll_y: f32,
    /// Deferred effects (jump impulse, bonus cues)
    pub scheduler: Scheduler,
    /// Outgoing presentation events, drained by the caller
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run; `best_score` is the persisted best at startup
    pub fn new(seed: u64, tuning: Tuning, best_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let platforms = PlatformField::layout(&tuning, &mut rng);
        let player = Player::new(&tuning);
        let pickups = PickupPool::with_capacity(tuning.platform_count);
        Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Running,
            player,
            platforms,
            pickups,
            score: ScoreTracker::new(best_score),
            scroll_y: 0.0,
            scheduler: Scheduler::default(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Start a fresh run in place: entities return to their initial values,
    /// pending deferred effects are dropped, the best score is kept
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
        self.player = Player::new(&self.tuning);
        self.platforms.reset_layout(&self.tuning, &mut self.rng);
        self.pickups.reset();
        self.score.reset();
        self.scroll_y = 0.0;
        self.scheduler.clear();
        self.events.clear();
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    /// Enter `Dead` (no-op if already dead)
    pub fn die(&mut self, cause: DeathCause) {
        if self.phase == GamePhase::Dead {
            return;
        }
        self.phase = GamePhase::Dead;
        log::info!(
            "Run over at tick {}: {:?} (score {}, best {})",
            self.time_ticks,
            cause,
            self.score.score(),
            self.score.best()
        );
        self.events.push(GameEvent::Died { cause });
    }

    /// Take all buffered presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let tuning = Tuning::default();
        let state = GameState::new(7, tuning.clone(), 42);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.platforms.len(), tuning.platform_count);
        assert_eq!(state.score.score(), 0);
        assert_eq!(state.score.best(), 42);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.player.last_jump_baseline, 600.0);
        assert_eq!(state.pickups.active_count(), 0);
    }

    #[test]
    fn test_die_is_idempotent() {
        let mut state = GameState::new(1, Tuning::default(), 0);
        state.die(DeathCause::Fell);
        state.die(DeathCause::LethalPickup);
        assert!(state.is_dead());
        let deaths: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Died { .. }))
            .collect();
        assert_eq!(deaths, vec![GameEvent::Died { cause: DeathCause::Fell }]);
    }

    #[test]
    fn test_reset_is_reproducible() {
        let mut state = GameState::new(99, Tuning::default(), 10);
        let initial: Vec<Platform> = state.platforms.iter().copied().collect();

        state.player.pos.y = -5000.0;
        state.score.add(12);
        state.die(DeathCause::Fell);
        state.reset(99);

        let again: Vec<Platform> = state.platforms.iter().copied().collect();
        assert_eq!(initial, again);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score.score(), 0);
        assert_eq!(state.score.best(), 12);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pickup_points() {
        assert_eq!(PickupKind::Neutral.points(), Some(1));
        assert_eq!(PickupKind::Bonus.points(), Some(50));
        assert_eq!(PickupKind::Lethal.points(), None);
    }
}
