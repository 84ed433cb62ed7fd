//! Trigger events, their payloads and the dispatcher.
//!
//! The room raises a [`TriggerEvent`] with an [`EventPayload`]; the
//! [`TriggerDispatcher`] asks the registry for every trigger ability
//! subscribed to it, orders them and runs each through its lifecycle.
//!
//! ## Example Usage
//!
//! ```
//! use rust_hegemony::abilities::{Ability, TriggerAbility};
//! use rust_hegemony::core::{PlayerId, RoomState};
//! use rust_hegemony::registry::{Package, Registry};
//! use rust_hegemony::triggers::{EventPayload, TriggerDispatcher, TriggerEvent};
//!
//! // "Draw one extra card in the draw phase."
//! let package = Package::new("demo").with_ability(Ability::trigger(
//!     "fortitude",
//!     TriggerAbility::draw_cards(|_ctx, _who, n| n + 1),
//! ));
//! let mut registry = Registry::new();
//! registry.add_package(package);
//!
//! let mut room = RoomState::new(2);
//! room.player_mut(PlayerId::new(0)).acquire_ability("fortitude");
//!
//! let mut payload = EventPayload::Count(2);
//! let outcome = TriggerDispatcher::new(&registry).raise_event(
//!     &mut room,
//!     TriggerEvent::DrawNCards,
//!     Some(PlayerId::new(0)),
//!     &mut payload,
//! );
//!
//! assert_eq!(payload.count(), Some(3));
//! assert!(!outcome.broken);
//! ```

mod dispatcher;
mod event;
mod payload;

pub use dispatcher::{DispatchOutcome, TriggerContext, TriggerDispatcher, MAX_DISPATCH_DEPTH};
pub use event::TriggerEvent;
pub use payload::{
    CardEffectStruct, CardResponseStruct, CardUseStruct, CardsMoveStruct, DamageNature,
    DamageStruct, DeathStruct, EventPayload, GeneralEvent, JudgeStruct, PindianStruct,
    RecoverStruct,
};
