//=========================================================================
// Core Systems
//
// Engine subsystems driven by the main loop.
//
// Responsibilities:
// - Pace ticks at a fixed rate (`frame_pacer`)
// - Guard the game state for the duration of a tick (`game_state`)
// - Own the active scene and defer transitions (`scene`)
// - Memoize expensive construction across threads (`cache`)
// - Load palettes and sound descriptors at startup (`resources`)
// - Describe the render window the loop drives (`platform_bridge`)
//
// Notes:
// Nothing in here spawns threads. The loop in `Engine::run` calls into
// these modules from whichever thread runs it; the cache, game state and
// scene director are the pieces that may be shared with other threads.
//
//=========================================================================

pub mod cache;
pub mod frame_pacer;
pub mod game_state;
pub mod platform_bridge;
pub mod resources;
pub mod scene;
