//! # rust-hegemony
//!
//! Rule-resolution core for a multiplayer hegemony card game.
//!
//! Given a room snapshot and a candidate action, the crate answers which
//! abilities react to an event and in what order, whether a card satisfies
//! an eligibility expression, and how distances, attack ranges, hand-size
//! limits and target counts are corrected by the active abilities.
//!
//! ## Design Principles
//!
//! 1. **One registry value**: content is loaded once into a [`Registry`]
//!    and shared read-only by every room. There is no global state, so tests
//!    build as many registries as they like.
//!
//! 2. **Tagged abilities**: an [`Ability`] carries one
//!    [`AbilityKind`](abilities::AbilityKind); callers branch on the tag or
//!    use typed accessors instead of comparing class names.
//!
//! 3. **Explicit context**: trigger hooks get a `TriggerContext` holding
//!    exclusive borrows of the room and the event payload; nothing is
//!    mutated behind the dispatcher's back.
//!
//! 4. **Fail closed**: malformed patterns match nothing and lookups return
//!    `Option`. Only lifecycle violations panic.
//!
//! ## Modules
//!
//! - `core`: seats, room state, RNG, configuration
//! - `cards`: templates, runtime cards, move reasons
//! - `pattern`: the card pattern language
//! - `abilities`: the ability model and capability traits
//! - `triggers`: events, payloads and the dispatcher
//! - `registry`: packages, generals and the content registry
//! - `rules`: the `GameView` facade for legality and corrections
//! - `content`: built-in packages

pub mod core;
pub mod cards;
pub mod pattern;
pub mod abilities;
pub mod triggers;
pub mod registry;
pub mod rules;
pub mod content;
pub mod error;

// Re-export commonly used types
pub use crate::core::{EngineConfig, GameRng, Phase, Place, PlayerId, PlayerMap, PlayerState, RoomState};

pub use crate::cards::{
    Card, CardId, CardMoveReason, CardTemplate, CardType, Color, EquipSlot, HandlingMethod,
    MoveReasonCode, Suit,
};

pub use crate::pattern::{match_expression, CardPattern, ExpPattern};

pub use crate::abilities::{Ability, AbilityKindTag, Frequency, TriggerAbility, ViewAsAbility};

pub use crate::triggers::{DispatchOutcome, EventPayload, TriggerDispatcher, TriggerEvent};

pub use crate::registry::{General, Package, PackageCatalog, Registry};

pub use crate::rules::GameView;

pub use crate::error::{EngineError, EngineResult};
