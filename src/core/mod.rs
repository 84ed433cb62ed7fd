//! Core engine types: seats, room state, RNG, configuration.
//!
//! Nothing in here knows about abilities or patterns. The registry and the
//! dispatcher build on these types; the room layer owns the `RoomState`
//! values and hands them in by reference.

pub mod player;
pub mod rng;
pub mod config;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::EngineConfig;
pub use state::{Phase, Place, PlayerState, RoomState};
