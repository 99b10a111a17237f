//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod field;
pub mod physics;
pub mod pool;
pub mod schedule;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Aabb, Contacts};
pub use field::PlatformField;
pub use physics::{ArcadePhysics, PhysicsWorld};
pub use pool::PickupPool;
pub use schedule::{EntityId, Scheduler, Task};
pub use score::ScoreTracker;
pub use spawner::{choose_kind, spawn_above};
pub use state::{
    DeathCause, GameEvent, GamePhase, GameState, Pickup, PickupKind, Platform, Player, PlayerAnim,
};
pub use tick::{TickInput, fire_due_tasks, tick};
