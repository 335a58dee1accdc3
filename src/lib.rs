//=========================================================================
// Cadence Engine - Library Root
//
// This crate defines the public API surface of the Cadence Engine.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the core subsystems (scenes, cache, game state guard, pacing)
//   for games that embed them directly
// - Keep configuration and error types at the crate root
//
// Typical usage:
// ```ignore
// use cadence_engine::EngineBuilder;
//
// let mut engine = EngineBuilder::new(window, factory, state, GameScene::MainMenu)
//     .with_resources(archives, decoder)
//     .build();
// engine.run()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine subsystems. Exposed for extensibility, but
// most games only touch the `Engine` facade and the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the main loop and startup sequence.
//
mod config;
mod engine;
mod error;

//--- Public Exports ------------------------------------------------------

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder, Sleeper, TickOutcome};
pub use error::{EngineError, Result};
