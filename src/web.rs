//! Browser bridge
//!
//! Exposes a [`Run`] to JavaScript. The page owns rendering, audio and the
//! animation-frame loop; it feeds key state and frame deltas in and reads
//! entity positions and presentation events back out as JSON.

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::run::Run;
use crate::sim::TickInput;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Slime Jump starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    run: Run<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebGame {
        WebGame {
            run: Run::new(seed, Tuning::default(), LocalStorageStore),
        }
    }

    /// Advance by `dt_ms` milliseconds with the current key state; returns ticks run
    pub fn frame(&mut self, dt_ms: f32, left: bool, right: bool) -> u32 {
        self.run.frame(dt_ms / 1000.0, &TickInput { left, right })
    }

    pub fn restart(&mut self, seed: u64) {
        self.run.restart(seed);
    }

    pub fn score(&self) -> u64 {
        self.run.score()
    }

    pub fn best_score(&self) -> u64 {
        self.run.best_score()
    }

    pub fn is_dead(&self) -> bool {
        self.run.is_dead()
    }

    /// Camera top edge for the renderer
    pub fn scroll_y(&self) -> f32 {
        self.run.state().scroll_y
    }

    /// Player, platforms and active pickups as JSON
    pub fn snapshot_json(&self) -> String {
        let state = self.run.state();
        let platforms: Vec<_> = state.platforms.iter().collect();
        let pickups: Vec<_> = state.pickups.active().collect();
        let snapshot = serde_json::json!({
            "player": &state.player,
            "platforms": platforms,
            "pickups": pickups,
        });
        snapshot.to_string()
    }

    /// Presentation events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = self.run.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Could not encode events: {}", e);
            "[]".to_string()
        })
    }
}
