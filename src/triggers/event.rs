//! Trigger events.
//!
//! `TriggerEvent` is the closed vocabulary of points in the turn, damage,
//! judge and card-use lifecycle that abilities subscribe to. Its order is the
//! order the room layer raises them in within one flow; the enum itself does
//! not impose any ordering on reactors (that is the dispatcher's job).
//!
//! Names are stable strings so content can refer to events by name:
//!
//! ```
//! use rust_hegemony::triggers::TriggerEvent;
//!
//! let event: TriggerEvent = "DrawNCards".parse().unwrap();
//! assert_eq!(event, TriggerEvent::DrawNCards);
//! assert_eq!(TriggerEvent::Damaged.to_string(), "Damaged");
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// A named point in the game lifecycle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum TriggerEvent {
    NonTrigger,

    // Turn and phase.
    GameStart,
    TurnStart,
    EventPhaseStart,
    EventPhaseProceeding,
    EventPhaseEnd,
    EventPhaseChanging,
    EventPhaseSkipping,

    ConfirmPlayerNum,

    DrawNCards,
    AfterDrawNCards,

    // Hit points.
    PreHpRecover,
    HpRecover,
    PreHpLost,
    HpChanged,
    MaxHpChanged,
    PostHpReduced,
    HpLost,

    EventLoseSkill,
    EventAcquireSkill,

    // Judge.
    StartJudge,
    AskForRetrial,
    FinishRetrial,
    FinishJudge,

    PindianVerifying,
    Pindian,

    TurnedOver,
    ChainStateChanged,
    RemoveStateChanged,

    // Damage, in the order one damage flows through.
    ConfirmDamage,
    Predamage,
    DamageForseen,
    DamageCaused,
    DamageInflicted,
    PreDamageDone,
    DamageDone,
    Damage,
    Damaged,
    DamageComplete,

    // Dying and death.
    Dying,
    QuitDying,
    AskForPeaches,
    AskForPeachesDone,
    Death,
    BuryVictim,
    BeforeGameOverJudge,
    GameOverJudge,
    GameFinished,

    SlashEffected,
    SlashProceed,
    SlashHit,
    SlashMissed,

    JinkEffect,

    CardAsked,
    CardResponded,
    BeforeCardsMove,
    CardsMoveOneTime,

    // Card use.
    PreCardUsed,
    CardUsed,
    TargetChoosing,
    TargetConfirming,
    TargetChosen,
    TargetConfirmed,
    CardEffect,
    CardEffected,
    CardEffectConfirmed,
    PostCardEffected,
    CardFinished,
    TrickCardCanceling,

    ChoiceMade,

    StageChange,
    FetchDrawPileCard,

    TurnBroken,

    GeneralShown,
    GeneralHidden,
    GeneralRemoved,

    DFDebut,
}

impl TriggerEvent {
    /// Whether the event belongs to the damage flow.
    #[must_use]
    pub fn is_damage_step(self) -> bool {
        (Self::ConfirmDamage..=Self::DamageComplete).contains(&self)
    }

    /// Whether the event belongs to the card-use flow.
    #[must_use]
    pub fn is_card_use_step(self) -> bool {
        (Self::PreCardUsed..=Self::TrickCardCanceling).contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_round_trip() {
        for event in TriggerEvent::iter() {
            let name: &'static str = event.into();
            assert_eq!(name.parse::<TriggerEvent>().unwrap(), event);
        }
        assert!("NotAnEvent".parse::<TriggerEvent>().is_err());
    }

    #[test]
    fn test_vocabulary_size() {
        assert_eq!(TriggerEvent::COUNT, TriggerEvent::iter().count());
        assert_eq!(TriggerEvent::iter().next(), Some(TriggerEvent::NonTrigger));
        assert_eq!(TriggerEvent::iter().last(), Some(TriggerEvent::DFDebut));
    }

    #[test]
    fn test_flow_groups() {
        assert!(TriggerEvent::DamageCaused.is_damage_step());
        assert!(TriggerEvent::Damaged.is_damage_step());
        assert!(!TriggerEvent::Dying.is_damage_step());
        assert!(TriggerEvent::TargetConfirmed.is_card_use_step());
        assert!(!TriggerEvent::CardsMoveOneTime.is_card_use_step());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TriggerEvent::EventPhaseStart).unwrap();
        assert_eq!(json, "\"EventPhaseStart\"");
        let back: TriggerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TriggerEvent::EventPhaseStart);
    }
}
