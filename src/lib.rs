//! Slime Jump - an endless vertical auto-jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (platforms, pickups, collisions, run state)
//! - `run`: Fixed-timestep driver owning one run and its collaborators
//! - `persistence`: Best score storage (JSON file natively, LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod run;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use persistence::{BestScoreStore, MemoryStore, PersistenceError};
pub use run::Run;
pub use tuning::{SpawnBands, Tuning, TuningError};

/// Game configuration constants (reference values, see [`Tuning::default`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Downward acceleration, pixels/s²
    pub const GRAVITY: f32 = 1800.0;

    /// Horizontal speed while a direction is held mid-air
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Upward impulse applied when the wind-up completes
    pub const PLAYER_JUMP_SPEED: f32 = 900.0;
    /// Player body (one slime sprite frame)
    pub const PLAYER_WIDTH: f32 = 120.0;
    pub const PLAYER_HEIGHT: f32 = 105.0;

    /// Platform pool
    pub const PLATFORM_COUNT: usize = 4;
    pub const PLATFORM_SPACING: f32 = 150.0;
    pub const PLATFORM_WIDTH: f32 = 200.0;
    pub const PLATFORM_HEIGHT: f32 = 28.0;
    /// Horizontal jitter of the initial layout around the viewport center
    pub const PLATFORM_START_JITTER: i32 = 100;
    /// Horizontal jitter applied on every recycle
    pub const PLATFORM_RECYCLE_JITTER: i32 = 200;

    /// Pickup body
    pub const PICKUP_SIZE: f32 = 40.0;
    /// Gap between a platform and a pickup spawned on it (keeps the bodies apart on the first tick)
    pub const PICKUP_SPAWN_OFFSET: f32 = 10.0;

    /// Pre-jump animation: 2 frames at 10 fps
    pub const WIND_UP_MS: u32 = 200;
    /// Celebratory pops after a bonus pickup
    pub const BONUS_CUE_COUNT: u32 = 10;
    pub const BONUS_CUE_SPACING_MS: u32 = 20;
}

/// Wrap a horizontal coordinate around the viewport edges
///
/// Leaving on the left puts the player on the right edge and vice versa;
/// positions inside `[0, width]` are returned unchanged.
#[inline]
pub fn wrap_horizontal(x: f32, width: f32) -> f32 {
    if x < 0.0 {
        width
    } else if x > width {
        0.0
    } else {
        x
    }
}

/// Number of fixed ticks covering `ms` milliseconds (rounded up, at least 1 for a non-zero delay)
#[inline]
pub fn ms_to_ticks(ms: u32, dt: f32) -> u64 {
    if ms == 0 {
        return 0;
    }
    let hz = (1.0 / dt).round().max(1.0) as u64;
    (ms as u64 * hz).div_ceil(1000).max(1)
}
