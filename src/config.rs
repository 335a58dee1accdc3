//=========================================================================
// Engine Configuration
//=========================================================================
//
// Constants used by the main loop and startup sequence. Defaults match
// a 25 Hz engine reading Diablo-style archive paths.
//
// Usually set through `EngineBuilder::with_*`, which validates values.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::Point;

//=== EngineConfig ========================================================

/// Main loop and startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Target tick duration. 40 ms gives 25 ticks per second.
    pub frame_budget_ms: u32,

    /// Elapsed time above which a tick is dropped instead of integrated.
    pub stall_threshold_ms: u32,

    /// Queued scene requests held between ticks.
    pub transition_capacity: usize,

    /// Archive directory holding palette files.
    pub palette_prefix: String,

    /// Palette file extension.
    pub palette_extension: String,

    /// Sound descriptor table.
    pub sound_table_path: String,

    /// Startup mouse cursor sprite.
    pub cursor_sprite_path: String,
    pub cursor_palette: String,
    pub cursor_frame: usize,
    pub cursor_hotspot: Point,

    /// Sprite shown while the next scene is being built.
    pub loading_sprite_path: String,
    pub loading_palette: String,
    pub loading_position: Point,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: 40,
            stall_threshold_ms: 1_000,
            transition_capacity: 16,
            palette_prefix: "data\\global\\palette\\".into(),
            palette_extension: ".dat".into(),
            sound_table_path: "data\\global\\excel\\Sounds.txt".into(),
            cursor_sprite_path: "data\\global\\ui\\CURSOR\\ohand.DC6".into(),
            cursor_palette: "units".into(),
            cursor_frame: 0,
            cursor_hotspot: Point::new(0, 3),
            loading_sprite_path: "data\\global\\ui\\Loading\\loadingscreen.dc6".into(),
            loading_palette: "loading".into(),
            loading_position: Point::new(300, 400),
        }
    }
}

impl EngineConfig {
    /// Ticks per second implied by the frame budget.
    pub fn target_tps(&self) -> f64 {
        1_000.0 / f64::from(self.frame_budget_ms)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
