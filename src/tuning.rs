//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be reproduced from a
//! seed plus a tuning file. Defaults are the reference values in
//! [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Cumulative spawn thresholds, checked in order (bonus, lethal, neutral)
///
/// A draw `r` in [0, 1) spawns the first kind whose threshold is `>= r`;
/// anything above `neutral` spawns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnBands {
    pub bonus: f32,
    pub lethal: f32,
    pub neutral: f32,
}

impl Default for SpawnBands {
    fn default() -> Self {
        Self {
            bonus: 0.01,
            lethal: 0.10,
            neutral: 0.50,
        }
    }
}

/// Invalid tuning values
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Viewport width or height is not a positive finite number
    Viewport { width: f32, height: f32 },
    /// Platforms do not fit horizontally inside the viewport
    PlatformTooWide { platform_width: f32, viewport_width: f32 },
    /// Pool must hold at least one platform
    EmptyPool,
    /// Bands must satisfy 0 <= bonus <= lethal <= neutral <= 1
    UnorderedBands(SpawnBands),
    /// Timestep must be positive
    Timestep(f32),
    /// Platform jitter must be >= 0
    NegativeJitter { start: i32, recycle: i32 },
    /// A body dimension is not a positive finite number
    BodySize { body: &'static str, width: f32, height: f32 },
    /// At least one substep per frame
    NoSubsteps,
    /// Last bonus cue delay does not fit in u32 milliseconds
    CueSpacing { count: u32, spacing_ms: u32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Viewport { width, height } => {
                write!(f, "invalid viewport {}x{}", width, height)
            }
            TuningError::PlatformTooWide {
                platform_width,
                viewport_width,
            } => write!(
                f,
                "platform width {} does not fit in viewport width {}",
                platform_width, viewport_width
            ),
            TuningError::EmptyPool => write!(f, "platform pool is empty"),
            TuningError::UnorderedBands(b) => write!(
                f,
                "spawn bands out of order (bonus={}, lethal={}, neutral={})",
                b.bonus, b.lethal, b.neutral
            ),
            TuningError::Timestep(dt) => write!(f, "invalid timestep {}", dt),
            TuningError::NegativeJitter { start, recycle } => write!(
                f,
                "negative platform jitter (start={}, recycle={})",
                start, recycle
            ),
            TuningError::BodySize {
                body,
                width,
                height,
            } => write!(f, "invalid {} size {}x{}", body, width, height),
            TuningError::NoSubsteps => write!(f, "max_substeps must be > 0"),
            TuningError::CueSpacing { count, spacing_ms } => write!(
                f,
                "{} bonus cues {}ms apart overflow the delay range",
                count, spacing_ms
            ),
        }
    }
}

impl std::error::Error for TuningError {}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Player ===
    pub gravity: f32,
    pub player_speed: f32,
    pub player_jump_speed: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Platforms ===
    pub platform_count: usize,
    pub platform_spacing: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub platform_start_jitter: i32,
    pub platform_recycle_jitter: i32,

    // === Pickups ===
    pub pickup_size: f32,
    pub pickup_spawn_offset: f32,
    pub spawn_bands: SpawnBands,

    // === Timing ===
    /// Delay between landing and the jump impulse
    pub wind_up_ms: u32,
    pub bonus_cue_count: u32,
    pub bonus_cue_spacing_ms: u32,
    pub sim_dt: f32,
    pub max_substeps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            player_jump_speed: PLAYER_JUMP_SPEED,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            platform_count: PLATFORM_COUNT,
            platform_spacing: PLATFORM_SPACING,
            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            platform_start_jitter: PLATFORM_START_JITTER,
            platform_recycle_jitter: PLATFORM_RECYCLE_JITTER,

            pickup_size: PICKUP_SIZE,
            pickup_spawn_offset: PICKUP_SPAWN_OFFSET,
            spawn_bands: SpawnBands::default(),

            wind_up_ms: WIND_UP_MS,
            bonus_cue_count: BONUS_CUE_COUNT,
            bonus_cue_spacing_ms: BONUS_CUE_SPACING_MS,
            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Tuning {
    /// Check geometry, band ordering and timing
    pub fn validate(&self) -> Result<(), TuningError> {
        let (w, h) = (self.viewport_width, self.viewport_height);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(TuningError::Viewport {
                width: w,
                height: h,
            });
        }
        let bodies = [
            ("player", self.player_width, self.player_height),
            ("platform", self.platform_width, self.platform_height),
            ("pickup", self.pickup_size, self.pickup_size),
        ];
        for (body, width, height) in bodies {
            if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                return Err(TuningError::BodySize {
                    body,
                    width,
                    height,
                });
            }
        }
        if self.platform_width >= w {
            return Err(TuningError::PlatformTooWide {
                platform_width: self.platform_width,
                viewport_width: w,
            });
        }
        if self.platform_count == 0 {
            return Err(TuningError::EmptyPool);
        }
        let b = self.spawn_bands;
        if !(0.0 <= b.bonus && b.bonus <= b.lethal && b.lethal <= b.neutral && b.neutral <= 1.0) {
            return Err(TuningError::UnorderedBands(b));
        }
        if self.platform_start_jitter < 0 || self.platform_recycle_jitter < 0 {
            return Err(TuningError::NegativeJitter {
                start: self.platform_start_jitter,
                recycle: self.platform_recycle_jitter,
            });
        }
        if !(self.sim_dt.is_finite() && self.sim_dt > 0.0) {
            return Err(TuningError::Timestep(self.sim_dt));
        }
        if self.max_substeps == 0 {
            return Err(TuningError::NoSubsteps);
        }
        let last_cue = self.bonus_cue_count.saturating_sub(1);
        if last_cue.checked_mul(self.bonus_cue_spacing_ms).is_none() {
            return Err(TuningError::CueSpacing {
                count: self.bonus_cue_count,
                spacing_ms: self.bonus_cue_spacing_ms,
            });
        }
        Ok(())
    }

    /// Half the platform width (recycled platforms stay this far from the edges)
    #[inline]
    pub fn platform_half_width(&self) -> f32 {
        self.platform_width / 2.0
    }

    /// Parse a tuning document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults if unreadable or invalid
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read tuning {}: {} - using defaults", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(tuning) => match tuning.validate() {
                Ok(()) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Rejected tuning {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Malformed tuning {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
