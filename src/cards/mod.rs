//! Card system: templates, runtime cards and move reasons.
//!
//! ## Key Types
//!
//! - `CardId`: dense registry-issued identifier
//! - `CardTemplate`: static data of a physical card
//! - `Card`: physical or virtual card that rules are asked about
//! - `CardMoveReason`: why a card changed location, with a stable code catalog

pub mod card;
pub mod definition;
pub mod move_reason;

pub use card::{Card, MAX_RANK};
pub use definition::{CardId, CardTemplate, CardType, Color, EquipSlot, HandlingMethod, Suit};
pub use move_reason::{CardMoveReason, MoveReasonCode};
