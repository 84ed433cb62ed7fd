//! Event payloads.
//!
//! Every raised event carries one `EventPayload` that reactors may read and
//! rewrite in place; the room layer reads the final value back after the
//! dispatch. Which variant goes with which event:
//!
//! | Variant | Events | Writable |
//! |---|---|---|
//! | `Count` | `DrawNCards`, `AfterDrawNCards`, `ConfirmPlayerNum` | the count |
//! | `Phase` | `EventPhaseStart` / `Proceeding` / `End` / `Skipping` | - |
//! | `PhaseChange` | `EventPhaseChanging` | `to` |
//! | `Damage` | `ConfirmDamage` .. `DamageComplete` | amount, nature, target |
//! | `Recover` | `PreHpRecover`, `HpRecover` | amount |
//! | `HpChange` | `PreHpLost`, `HpLost`, `HpChanged`, `MaxHpChanged` | amount |
//! | `Dying` / `Death` | `Dying` .. `BuryVictim` | - |
//! | `CardUse` | `PreCardUsed` .. `TargetConfirmed`, `CardFinished` | targets |
//! | `CardEffect` | `CardEffect` .. `PostCardEffected` | nullified |
//! | `CardResponse` | `CardResponded` | - |
//! | `CardsMove` | `BeforeCardsMove`, `CardsMoveOneTime` | card list |
//! | `Judge` | `StartJudge` .. `FinishJudge` | judge card |
//! | `Pindian` | `PindianVerifying`, `Pindian` | numbers |
//! | `SkillName` | `EventAcquireSkill`, `EventLoseSkill` | - |
//! | `General` | `GeneralShown`, `GeneralHidden`, `GeneralRemoved` | - |
//! | `Empty` | everything else | - |

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardMoveReason};
use crate::core::{Phase, PlayerId, Place};

/// Damage element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageNature {
    #[default]
    Normal,
    Fire,
    Thunder,
}

/// One instance of damage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageStruct {
    pub from: Option<PlayerId>,
    pub to: PlayerId,
    pub card: Option<Card>,
    pub damage: i32,
    pub nature: DamageNature,
    /// Damage passed along an iron chain.
    pub chain: bool,
    /// Damage redirected by an ability.
    pub transfer: bool,
    /// Ability or card name that caused it.
    pub reason: Option<String>,
}

impl DamageStruct {
    /// One point of normal damage.
    #[must_use]
    pub fn new(from: Option<PlayerId>, to: PlayerId, damage: i32) -> Self {
        Self {
            from,
            to,
            card: None,
            damage,
            nature: DamageNature::Normal,
            chain: false,
            transfer: false,
            reason: None,
        }
    }

    /// Set the card that caused the damage.
    #[must_use]
    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Set the nature.
    #[must_use]
    pub fn with_nature(mut self, nature: DamageNature) -> Self {
        self.nature = nature;
        self
    }
}

/// A recovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverStruct {
    pub who: Option<PlayerId>,
    pub recover: i32,
    pub card: Option<Card>,
}

/// A player entering dying or death.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathStruct {
    pub who: PlayerId,
    pub damage: Option<DamageStruct>,
}

/// A card use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUseStruct {
    pub card: Card,
    pub from: PlayerId,
    pub to: Vec<PlayerId>,
    /// Whether the use was made by the owner or forced by an ability.
    pub is_owner_use: bool,
    /// Targets the card has no effect on.
    pub nullified: Vec<PlayerId>,
}

impl CardUseStruct {
    #[must_use]
    pub fn new(card: Card, from: PlayerId, to: Vec<PlayerId>) -> Self {
        Self {
            card,
            from,
            to,
            is_owner_use: true,
            nullified: Vec::new(),
        }
    }
}

/// One card taking effect on one target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffectStruct {
    pub card: Card,
    pub from: PlayerId,
    pub to: PlayerId,
    pub nullified: bool,
}

/// A card played in response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResponseStruct {
    pub card: Card,
    pub who: PlayerId,
    /// Response given by using the card rather than just showing it.
    pub is_use: bool,
}

/// One batch of cards changing place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsMoveStruct {
    pub card_ids: Vec<CardId>,
    pub from: Option<PlayerId>,
    pub to: Option<PlayerId>,
    pub from_place: Place,
    pub to_place: Place,
    pub from_pile: Option<String>,
    pub to_pile: Option<String>,
    pub reason: CardMoveReason,
}

impl CardsMoveStruct {
    /// A move with unknown places.
    #[must_use]
    pub fn new(card_ids: Vec<CardId>, reason: CardMoveReason) -> Self {
        Self {
            card_ids,
            from: None,
            to: None,
            from_place: Place::Unknown,
            to_place: Place::Unknown,
            from_pile: None,
            to_pile: None,
            reason,
        }
    }

    /// Set the destination.
    #[must_use]
    pub fn to(mut self, player: Option<PlayerId>, place: Place) -> Self {
        self.to = player;
        self.to_place = place;
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn from(mut self, player: Option<PlayerId>, place: Place) -> Self {
        self.from = player;
        self.from_place = place;
        self
    }
}

/// A judgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeStruct {
    pub who: PlayerId,
    /// Pattern a good result must match.
    pub pattern: String,
    /// Whether matching the pattern is the good outcome.
    pub good: bool,
    pub card: Option<Card>,
    pub reason: String,
}

/// A point comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PindianStruct {
    pub from: PlayerId,
    pub to: PlayerId,
    pub from_card: Option<Card>,
    pub to_card: Option<Card>,
    pub from_number: u8,
    pub to_number: u8,
    pub reason: String,
}

impl PindianStruct {
    /// Whether the initiator won.
    #[must_use]
    pub fn success(&self) -> bool {
        self.from_number > self.to_number
    }
}

/// A general being shown, hidden or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralEvent {
    pub name: String,
    /// Head general (otherwise deputy).
    pub head: bool,
}

/// Data carried by one raised event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    Count(i32),
    Phase(Phase),
    PhaseChange { from: Phase, to: Phase },
    Damage(DamageStruct),
    Recover(RecoverStruct),
    HpChange(i32),
    Dying(DeathStruct),
    Death(DeathStruct),
    CardUse(CardUseStruct),
    CardEffect(CardEffectStruct),
    CardResponse(CardResponseStruct),
    CardsMove(Vec<CardsMoveStruct>),
    Judge(JudgeStruct),
    Pindian(PindianStruct),
    SkillName(String),
    General(GeneralEvent),
    #[default]
    Empty,
}

impl EventPayload {
    /// The count of a `Count` payload.
    #[must_use]
    pub fn count(&self) -> Option<i32> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    /// Mutable count of a `Count` payload.
    pub fn count_mut(&mut self) -> Option<&mut i32> {
        match self {
            Self::Count(n) => Some(n),
            _ => None,
        }
    }

    /// The phase of a `Phase` payload.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Phase(phase) => Some(*phase),
            _ => None,
        }
    }

    #[must_use]
    pub fn damage(&self) -> Option<&DamageStruct> {
        match self {
            Self::Damage(damage) => Some(damage),
            _ => None,
        }
    }

    pub fn damage_mut(&mut self) -> Option<&mut DamageStruct> {
        match self {
            Self::Damage(damage) => Some(damage),
            _ => None,
        }
    }

    #[must_use]
    pub fn card_use(&self) -> Option<&CardUseStruct> {
        match self {
            Self::CardUse(card_use) => Some(card_use),
            _ => None,
        }
    }

    #[must_use]
    pub fn moves(&self) -> Option<&[CardsMoveStruct]> {
        match self {
            Self::CardsMove(moves) => Some(moves),
            _ => None,
        }
    }

    /// Skill name of `SkillName` payloads.
    #[must_use]
    pub fn skill_name(&self) -> Option<&str> {
        match self {
            Self::SkillName(name) => Some(name),
            _ => None,
        }
    }
}
