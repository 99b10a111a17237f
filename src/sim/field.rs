//! Platform pool and recycling
//!
//! The field holds a fixed number of platforms for the whole run. When one
//! scrolls out below the view it is moved just above the top of the view
//! with a random horizontal shift, and gets one chance to carry a pickup.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::pool::PickupPool;
use super::spawner::spawn_above;
use super::state::{GameEvent, Platform};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct PlatformField {
    platforms: Vec<Platform>,
}

impl PlatformField {
    /// Initial layout: platform `i` at `y = spacing * i`, jittered around the center
    pub fn layout(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let mut field = Self {
            platforms: Vec::with_capacity(tuning.platform_count),
        };
        field.reset_layout(tuning, rng);
        field
    }

    /// Re-run the initial layout in place
    pub fn reset_layout(&mut self, tuning: &Tuning, rng: &mut Pcg32) {
        let size = Vec2::new(tuning.platform_width, tuning.platform_height);
        let jitter = tuning.platform_start_jitter;
        self.platforms.clear();
        for i in 0..tuning.platform_count {
            let x = tuning.viewport_width / 2.0 + rng.random_range(-jitter..=jitter) as f32;
            let y = tuning.platform_spacing * i as f32;
            self.platforms.push(Platform {
                pos: Vec2::new(x, y),
                size,
            });
        }
    }

    /// Move every platform that left the bottom of the view back above the top
    ///
    /// A platform counts as gone once its center is at or below
    /// `scroll_y + viewport_height`. Each recycled platform then rolls for a
    /// pickup exactly once. Returns the number of platforms recycled.
    pub fn recycle(
        &mut self,
        scroll_y: f32,
        tuning: &Tuning,
        rng: &mut Pcg32,
        pickups: &mut PickupPool,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let width = tuning.viewport_width;
        let height = tuning.viewport_height;
        assert!(
            width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "malformed viewport {}x{}",
            width,
            height
        );
        assert!(scroll_y.is_finite(), "camera scroll is not finite: {}", scroll_y);

        let bottom = height + scroll_y;
        let jitter = tuning.platform_recycle_jitter;
        let mut recycled = 0;

        for (index, platform) in self.platforms.iter_mut().enumerate() {
            if platform.pos.y < bottom {
                continue;
            }

            let half = platform.half_width();
            let shifted = platform.pos.x + rng.random_range(-jitter..=jitter) as f32;
            platform.pos.x = shifted.clamp(half, width - half);
            platform.pos.y = scroll_y - platform.size.y;
            recycled += 1;
            events.push(GameEvent::PlatformRecycled { index });
            log::trace!(
                "Recycled platform {} to ({:.0}, {:.0})",
                index,
                platform.pos.x,
                platform.pos.y
            );

            let r: f32 = rng.random();
            if let Some((slot, kind)) = spawn_above(platform, r, tuning, pickups) {
                events.push(GameEvent::PickupSpawned { slot, kind });
            }
        }

        recycled
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Platform> {
        self.platforms.get(index)
    }

    /// Direct access for collaborators and tests that need to place platforms
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Platform> {
        self.platforms.get_mut(index)
    }
}
