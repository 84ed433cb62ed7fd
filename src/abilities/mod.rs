//! The ability model.
//!
//! An [`Ability`] is a name, a few common flags and one [`AbilityKind`]:
//!
//! - `Trigger`: reacts to events through the dispatcher ([`TriggerAbility`])
//! - `ViewAs`: composes cards into a virtual card ([`ViewAsAbility`])
//! - `Prohibit`: forbids a card from targeting a player
//! - `Distance`, `MaxHandSize`, `AttackRange`: numeric corrections with an
//!   additive extra and a fixed override
//! - `TargetModifier`: use count, distance limit and target count for cards
//!   matching a pattern
//!
//! The non-trigger kinds are capability traits in [`capability`]; closures
//! implement the single-question forms, so most content is a constructor
//! call with a closure.

pub mod ability;
pub mod capability;
pub mod trigger;
pub mod view_as;

pub use ability::{Ability, AbilityKind, AbilityKindTag, Frequency, SkillPlace, TargetModifierAbility};
pub use capability::{
    is_uncapped, DistanceAdjusting, HandSizeAdjusting, NoDistanceLimit, Prohibiting,
    RangeAdjusting, TargetModKind, TargetModifying, NO_LIMIT, UNCAPPED_THRESHOLD,
};
pub use trigger::{
    default_triggerable, fake_move_flag, ReactorNames, TriggerAbility, TriggerBehavior,
    TriggerFamily, TriggerList,
};
pub use view_as::{CardUseReason, ViewAsAbility, ViewAsBehavior, ViewAsShape};
