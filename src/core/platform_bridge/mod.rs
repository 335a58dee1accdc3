//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the rendering/platform backend with the engine core.
//
// This module defines the contract the core consumes from the render
// surface, so backends (SDL, winit + wgpu, a headless test double) can
// be swapped without changing the main loop.
//
// Components:
// - `interface`: `RenderWindow` trait and the plain geometry it uses
//
//=========================================================================

//=== Module Declarations =================================================

pub mod interface;

//=== Public API ==========================================================

pub use interface::{Point, RenderWindow};
