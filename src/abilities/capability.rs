//! Capability traits for the non-trigger ability kinds.
//!
//! Each kind answers one narrow question about a `GameView`. Every method
//! defaults to "no opinion" (`false` or `0`), so an implementation only
//! overrides what it changes.
//!
//! Closures implement the single-question forms directly:
//!
//! ```
//! use rust_hegemony::abilities::{Ability, AbilityKindTag};
//!
//! // Everyone else is one step closer to seat 0.
//! let ability = Ability::distance("swift_horse", |_view, from, _to| {
//!     if from.index() == 0 { -1 } else { 0 }
//! });
//! assert_eq!(ability.kind.tag(), AbilityKindTag::Distance);
//! ```

use crate::cards::Card;
use crate::core::PlayerId;
use crate::rules::GameView;

/// Target-modifier answers at or above this mean "no cap".
pub const UNCAPPED_THRESHOLD: i32 = 998;

/// Canonical "no cap" answer.
pub const NO_LIMIT: i32 = 1000;

/// Whether a target-modifier answer means "no cap".
#[must_use]
pub const fn is_uncapped(value: i32) -> bool {
    value >= UNCAPPED_THRESHOLD
}

/// Forbids a card from targeting a player.
pub trait Prohibiting: Send + Sync {
    fn is_prohibited(
        &self,
        view: &GameView<'_>,
        from: Option<PlayerId>,
        to: PlayerId,
        card: &Card,
        others: &[PlayerId],
    ) -> bool;
}

impl<F> Prohibiting for F
where
    F: Fn(&GameView<'_>, Option<PlayerId>, PlayerId, &Card, &[PlayerId]) -> bool + Send + Sync,
{
    fn is_prohibited(
        &self,
        view: &GameView<'_>,
        from: Option<PlayerId>,
        to: PlayerId,
        card: &Card,
        others: &[PlayerId],
    ) -> bool {
        self(view, from, to, card, others)
    }
}

/// Adjusts the distance between two seats.
pub trait DistanceAdjusting: Send + Sync {
    /// Added to the seat distance.
    fn correct(&self, _view: &GameView<'_>, _from: PlayerId, _to: PlayerId) -> i32 {
        0
    }

    /// Positive values replace the seat distance.
    fn fixed(&self, _view: &GameView<'_>, _from: PlayerId, _to: PlayerId) -> i32 {
        0
    }
}

impl<F> DistanceAdjusting for F
where
    F: Fn(&GameView<'_>, PlayerId, PlayerId) -> i32 + Send + Sync,
{
    fn correct(&self, view: &GameView<'_>, from: PlayerId, to: PlayerId) -> i32 {
        self(view, from, to)
    }
}

/// Adjusts a player's hand-size limit.
pub trait HandSizeAdjusting: Send + Sync {
    /// Added to the limit.
    fn extra(&self, _view: &GameView<'_>, _player: PlayerId) -> i32 {
        0
    }

    /// Positive values replace hp as the base of the limit.
    fn fixed(&self, _view: &GameView<'_>, _player: PlayerId) -> i32 {
        0
    }
}

impl<F> HandSizeAdjusting for F
where
    F: Fn(&GameView<'_>, PlayerId) -> i32 + Send + Sync,
{
    fn extra(&self, view: &GameView<'_>, player: PlayerId) -> i32 {
        self(view, player)
    }
}

/// Adjusts a player's attack range.
pub trait RangeAdjusting: Send + Sync {
    /// Added to the range.
    fn extra(&self, _view: &GameView<'_>, _player: PlayerId, _include_weapon: bool) -> i32 {
        0
    }

    /// Positive values replace the range.
    fn fixed(&self, _view: &GameView<'_>, _player: PlayerId, _include_weapon: bool) -> i32 {
        0
    }
}

impl<F> RangeAdjusting for F
where
    F: Fn(&GameView<'_>, PlayerId, bool) -> i32 + Send + Sync,
{
    fn extra(&self, view: &GameView<'_>, player: PlayerId, include_weapon: bool) -> i32 {
        self(view, player, include_weapon)
    }
}

/// Which target-modifier knob is asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetModKind {
    /// Extra uses per turn.
    Residue,
    /// Extra distance a target may be at.
    DistanceLimit,
    /// Extra targets per use.
    ExtraTarget,
}

impl TargetModKind {
    /// Whether an answer of at least [`UNCAPPED_THRESHOLD`] ends aggregation.
    #[must_use]
    pub const fn has_sentinel(self) -> bool {
        matches!(self, Self::Residue | Self::DistanceLimit)
    }
}

/// Adjusts use count, distance limit or target count for matching cards.
///
/// Only asked for cards matching the owning ability's pattern.
pub trait TargetModifying: Send + Sync {
    fn residue(&self, _view: &GameView<'_>, _from: PlayerId, _card: &Card) -> i32 {
        0
    }

    fn distance_limit(&self, _view: &GameView<'_>, _from: PlayerId, _card: &Card) -> i32 {
        0
    }

    fn extra_targets(&self, _view: &GameView<'_>, _from: PlayerId, _card: &Card) -> i32 {
        0
    }

    /// Answer for one knob.
    fn value(&self, kind: TargetModKind, view: &GameView<'_>, from: PlayerId, card: &Card) -> i32 {
        match kind {
            TargetModKind::Residue => self.residue(view, from, card),
            TargetModKind::DistanceLimit => self.distance_limit(view, from, card),
            TargetModKind::ExtraTarget => self.extra_targets(view, from, card),
        }
    }
}

/// Lifts the distance limit of cards produced by one view-as ability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoDistanceLimit {
    skill_name: String,
}

impl NoDistanceLimit {
    #[must_use]
    pub fn new(skill_name: impl Into<String>) -> Self {
        Self { skill_name: skill_name.into() }
    }
}

impl TargetModifying for NoDistanceLimit {
    fn distance_limit(&self, _view: &GameView<'_>, _from: PlayerId, card: &Card) -> i32 {
        if card.skill_name() == Some(self.skill_name.as_str()) {
            NO_LIMIT
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert!(!is_uncapped(997));
        assert!(is_uncapped(998));
        assert!(is_uncapped(NO_LIMIT));
        assert!(TargetModKind::Residue.has_sentinel());
        assert!(TargetModKind::DistanceLimit.has_sentinel());
        assert!(!TargetModKind::ExtraTarget.has_sentinel());
    }
}
