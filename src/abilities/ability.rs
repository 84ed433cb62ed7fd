//! The `Ability` type.
//!
//! Every ability shares a handful of common fields (name, frequency,
//! visibility, lord/attached flags, limit mark) and carries exactly one
//! [`AbilityKind`]. Callers branch on [`AbilityKind::tag`] or use the typed
//! accessors; there is no string-based kind lookup.
//!
//! ```
//! use rust_hegemony::abilities::{Ability, AbilityKindTag, Frequency, TriggerAbility};
//!
//! let ability = Ability::trigger("fortitude", TriggerAbility::draw_cards(|_, _, n| n + 1))
//!     .with_frequency(Frequency::Compulsory);
//!
//! assert_eq!(ability.name(), "fortitude");
//! assert_eq!(ability.kind.tag(), AbilityKindTag::Trigger);
//! assert!(ability.as_trigger().is_some());
//! assert!(ability.as_view_as().is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum::Display;

use super::capability::{
    DistanceAdjusting, HandSizeAdjusting, NoDistanceLimit, Prohibiting, RangeAdjusting,
    TargetModifying,
};
use super::trigger::TriggerAbility;
use super::view_as::ViewAsAbility;
use crate::cards::Card;
use crate::core::{PlayerId, PlayerState};
use crate::pattern::{CardPattern, ExpPattern};
use crate::rules::GameView;

/// How the owner is asked about the ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Frequency {
    Frequent,
    #[default]
    NotFrequent,
    Compulsory,
    Limited,
    Wake,
}

/// Which general slot an ability is tied to, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillPlace {
    Head,
    Deputy,
}

/// Discriminator of [`AbilityKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AbilityKindTag {
    Trigger,
    ViewAs,
    Prohibit,
    Distance,
    MaxHandSize,
    TargetModifier,
    AttackRange,
}

/// Target-modifier part of an ability: a pattern plus the knobs.
#[derive(Clone)]
pub struct TargetModifierAbility {
    pattern: ExpPattern,
    behavior: Arc<dyn TargetModifying>,
}

impl TargetModifierAbility {
    pub fn new(pattern: impl Into<String>, behavior: impl TargetModifying + 'static) -> Self {
        Self {
            pattern: ExpPattern::new(pattern),
            behavior: Arc::new(behavior),
        }
    }

    /// Expression for the cards this modifier applies to. Always compiled as
    /// an expression; registered pattern names are not consulted.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn applies_to(&self, player: Option<&PlayerState>, card: &Card) -> bool {
        self.pattern.matches(player, card)
    }

    #[must_use]
    pub fn behavior(&self) -> &dyn TargetModifying {
        self.behavior.as_ref()
    }
}

/// Kind-specific part of an ability.
#[derive(Clone)]
pub enum AbilityKind {
    Trigger(TriggerAbility),
    ViewAs(ViewAsAbility),
    Prohibit(Arc<dyn Prohibiting>),
    Distance(Arc<dyn DistanceAdjusting>),
    MaxHandSize(Arc<dyn HandSizeAdjusting>),
    TargetModifier(TargetModifierAbility),
    AttackRange(Arc<dyn RangeAdjusting>),
}

impl AbilityKind {
    #[must_use]
    pub fn tag(&self) -> AbilityKindTag {
        match self {
            Self::Trigger(_) => AbilityKindTag::Trigger,
            Self::ViewAs(_) => AbilityKindTag::ViewAs,
            Self::Prohibit(_) => AbilityKindTag::Prohibit,
            Self::Distance(_) => AbilityKindTag::Distance,
            Self::MaxHandSize(_) => AbilityKindTag::MaxHandSize,
            Self::TargetModifier(_) => AbilityKindTag::TargetModifier,
            Self::AttackRange(_) => AbilityKindTag::AttackRange,
        }
    }
}

impl fmt::Debug for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trigger(trigger) => trigger.fmt(f),
            Self::ViewAs(view_as) => view_as.fmt(f),
            Self::TargetModifier(modifier) => f
                .debug_struct("TargetModifier")
                .field("pattern", &modifier.pattern())
                .finish_non_exhaustive(),
            other => write!(f, "{}", other.tag()),
        }
    }
}

/// A named unit of rule-affecting behaviour.
#[derive(Clone, Debug)]
pub struct Ability {
    name: String,
    frequency: Frequency,
    visible: bool,
    lord: bool,
    attached: bool,
    limit_mark: Option<String>,
    can_preshow: bool,
    place: Option<SkillPlace>,
    /// Kind-specific behaviour.
    pub kind: AbilityKind,
}

impl Ability {
    /// An ability of any kind. Names starting with `#` are hidden.
    pub fn new(name: impl Into<String>, kind: AbilityKind) -> Self {
        let name = name.into();
        Self {
            visible: !name.starts_with('#'),
            name,
            frequency: Frequency::default(),
            lord: false,
            attached: false,
            limit_mark: None,
            can_preshow: true,
            place: None,
            kind,
        }
    }

    pub fn trigger(name: impl Into<String>, trigger: TriggerAbility) -> Self {
        Self::new(name, AbilityKind::Trigger(trigger))
    }

    pub fn view_as(name: impl Into<String>, view_as: ViewAsAbility) -> Self {
        Self::new(name, AbilityKind::ViewAs(view_as))
    }

    /// A prohibition from a predicate `(view, from, to, card, others)`.
    pub fn prohibit<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&GameView<'_>, Option<PlayerId>, PlayerId, &Card, &[PlayerId]) -> bool
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, AbilityKind::Prohibit(Arc::new(predicate)))
    }

    /// An additive distance correction `(view, from, to)`.
    pub fn distance<F>(name: impl Into<String>, correct: F) -> Self
    where
        F: Fn(&GameView<'_>, PlayerId, PlayerId) -> i32 + Send + Sync + 'static,
    {
        Self::new(name, AbilityKind::Distance(Arc::new(correct)))
    }

    /// A distance ability with both extra and fixed answers.
    pub fn distance_with(name: impl Into<String>, behavior: impl DistanceAdjusting + 'static) -> Self {
        Self::new(name, AbilityKind::Distance(Arc::new(behavior)))
    }

    /// An additive hand-size correction `(view, player)`.
    pub fn max_hand_size<F>(name: impl Into<String>, extra: F) -> Self
    where
        F: Fn(&GameView<'_>, PlayerId) -> i32 + Send + Sync + 'static,
    {
        Self::new(name, AbilityKind::MaxHandSize(Arc::new(extra)))
    }

    /// A hand-size ability with both extra and fixed answers.
    pub fn max_hand_size_with(
        name: impl Into<String>,
        behavior: impl HandSizeAdjusting + 'static,
    ) -> Self {
        Self::new(name, AbilityKind::MaxHandSize(Arc::new(behavior)))
    }

    /// An additive attack-range correction `(view, player, include_weapon)`.
    pub fn attack_range<F>(name: impl Into<String>, extra: F) -> Self
    where
        F: Fn(&GameView<'_>, PlayerId, bool) -> i32 + Send + Sync + 'static,
    {
        Self::new(name, AbilityKind::AttackRange(Arc::new(extra)))
    }

    /// An attack-range ability with both extra and fixed answers.
    pub fn attack_range_with(
        name: impl Into<String>,
        behavior: impl RangeAdjusting + 'static,
    ) -> Self {
        Self::new(name, AbilityKind::AttackRange(Arc::new(behavior)))
    }

    /// A target modifier for cards matching `pattern`.
    pub fn target_modifier(
        name: impl Into<String>,
        pattern: impl Into<String>,
        behavior: impl TargetModifying + 'static,
    ) -> Self {
        Self::new(
            name,
            AbilityKind::TargetModifier(TargetModifierAbility::new(pattern, behavior)),
        )
    }

    /// Lifts the distance limit of cards produced by view-as ability
    /// `skill_name` and matching `pattern`.
    pub fn no_distance_limit(skill_name: &str, pattern: impl Into<String>) -> Self {
        Self::target_modifier(
            format!("#{skill_name}-no-distance-limit"),
            pattern,
            NoDistanceLimit::new(skill_name),
        )
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Hide from the owner's visible ability list.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Lord-only ability.
    #[must_use]
    pub fn lord(mut self) -> Self {
        self.lord = true;
        self
    }

    /// Granted to other players by its owner.
    #[must_use]
    pub fn attached(mut self) -> Self {
        self.attached = true;
        self
    }

    /// Mark consumed by a limited ability.
    #[must_use]
    pub fn with_limit_mark(mut self, mark: impl Into<String>) -> Self {
        self.limit_mark = Some(mark.into());
        self
    }

    /// Cannot be shown in advance.
    #[must_use]
    pub fn no_preshow(mut self) -> Self {
        self.can_preshow = false;
        self
    }

    /// Only active on one general slot.
    #[must_use]
    pub fn on_place(mut self, place: SkillPlace) -> Self {
        self.place = Some(place);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_lord(&self) -> bool {
        self.lord
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn limit_mark(&self) -> Option<&str> {
        self.limit_mark.as_deref()
    }

    #[must_use]
    pub fn can_preshow(&self) -> bool {
        self.can_preshow
    }

    #[must_use]
    pub fn place(&self) -> Option<SkillPlace> {
        self.place
    }

    // === Typed accessors ===

    #[must_use]
    pub fn as_trigger(&self) -> Option<&TriggerAbility> {
        match &self.kind {
            AbilityKind::Trigger(trigger) => Some(trigger),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_view_as(&self) -> Option<&ViewAsAbility> {
        match &self.kind {
            AbilityKind::ViewAs(view_as) => Some(view_as),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_prohibit(&self) -> Option<&dyn Prohibiting> {
        match &self.kind {
            AbilityKind::Prohibit(prohibit) => Some(prohibit.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_distance(&self) -> Option<&dyn DistanceAdjusting> {
        match &self.kind {
            AbilityKind::Distance(distance) => Some(distance.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_max_hand_size(&self) -> Option<&dyn HandSizeAdjusting> {
        match &self.kind {
            AbilityKind::MaxHandSize(max_hand) => Some(max_hand.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_target_modifier(&self) -> Option<&TargetModifierAbility> {
        match &self.kind {
            AbilityKind::TargetModifier(modifier) => Some(modifier),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_attack_range(&self) -> Option<&dyn RangeAdjusting> {
        match &self.kind {
            AbilityKind::AttackRange(range) => Some(range.as_ref()),
            _ => None,
        }
    }
}
