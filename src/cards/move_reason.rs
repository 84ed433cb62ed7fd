//! Why a card changed location.
//!
//! A move reason pairs a numeric code from a fixed catalog with the player who
//! caused the move, a target hint, the ability involved and an extra event
//! tag. Codes are written to replays and read by external viewers, so their
//! values never change.
//!
//! ## Code layout
//!
//! The low nibble is the basic reason (use, response, discard, ...); the high
//! nibble picks a sub-category. `basic_reason()` recovers the basic reason:
//!
//! ```
//! use rust_hegemony::cards::MoveReasonCode;
//!
//! assert_eq!(MoveReasonCode::DISMANTLE.basic_reason(), MoveReasonCode::DISCARD);
//! assert_eq!(MoveReasonCode::ROB.basic_reason(), MoveReasonCode::GOT_CARD);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::error::EngineResult;

/// Numeric move-reason code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveReasonCode(pub u8);

impl MoveReasonCode {
    pub const UNKNOWN: Self = Self(0x00);
    pub const USE: Self = Self(0x01);
    pub const RESPONSE: Self = Self(0x02);
    pub const DISCARD: Self = Self(0x03);
    /// Recasting, e.g. chaining a card away.
    pub const RECAST: Self = Self(0x04);
    pub const PINDIAN: Self = Self(0x05);
    pub const DRAW: Self = Self(0x06);
    pub const GOT_CARD: Self = Self(0x07);
    pub const SHOW: Self = Self(0x08);
    pub const TRANSFER: Self = Self(0x09);
    pub const PUT: Self = Self(0x0A);

    // Use / response.
    /// Used while the user is not the current player.
    pub const LET_USE: Self = Self(0x11);
    pub const RETRIAL: Self = Self(0x12);

    // Discard.
    /// Discard phase of the game rule.
    pub const RULE_DISCARD: Self = Self(0x13);
    pub const THROW: Self = Self(0x23);
    /// One player throws another's card.
    pub const DISMANTLE: Self = Self(0x33);

    // Got card.
    /// Hand to another hand.
    pub const GIVE: Self = Self(0x17);
    /// Another's area to one's hand.
    pub const EXTRACTION: Self = Self(0x27);
    /// Table back to hand.
    pub const GOT_BACK: Self = Self(0x37);
    /// Discard pile to hand.
    pub const RECYCLE: Self = Self(0x47);
    pub const ROB: Self = Self(0x57);
    pub const PREVIEW_GIVE: Self = Self(0x67);

    // Show.
    pub const TURNOVER: Self = Self(0x18);
    pub const JUDGE: Self = Self(0x28);
    pub const PREVIEW: Self = Self(0x38);
    pub const DEMONSTRATE: Self = Self(0x48);

    // Transfer.
    pub const SWAP: Self = Self(0x19);
    pub const OVERRIDE: Self = Self(0x29);
    pub const EXCHANGE_FROM_PILE: Self = Self(0x39);

    // Put.
    /// An ownerless card enters the discard pile.
    pub const NATURAL_ENTER: Self = Self(0x1A);
    pub const REMOVE_FROM_PILE: Self = Self(0x2A);
    pub const JUDGE_DONE: Self = Self(0x3A);
    pub const CHANGE_EQUIP: Self = Self(0x4A);

    /// Mask selecting the basic reason.
    pub const BASIC_MASK: u8 = 0x0F;

    /// Every code in the catalog.
    pub const ALL: [Self; 33] = [
        Self::UNKNOWN,
        Self::USE,
        Self::RESPONSE,
        Self::DISCARD,
        Self::RECAST,
        Self::PINDIAN,
        Self::DRAW,
        Self::GOT_CARD,
        Self::SHOW,
        Self::TRANSFER,
        Self::PUT,
        Self::LET_USE,
        Self::RETRIAL,
        Self::RULE_DISCARD,
        Self::THROW,
        Self::DISMANTLE,
        Self::GIVE,
        Self::EXTRACTION,
        Self::GOT_BACK,
        Self::RECYCLE,
        Self::ROB,
        Self::PREVIEW_GIVE,
        Self::TURNOVER,
        Self::JUDGE,
        Self::PREVIEW,
        Self::DEMONSTRATE,
        Self::SWAP,
        Self::OVERRIDE,
        Self::EXCHANGE_FROM_PILE,
        Self::NATURAL_ENTER,
        Self::REMOVE_FROM_PILE,
        Self::JUDGE_DONE,
        Self::CHANGE_EQUIP,
    ];

    /// Raw code.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The basic reason (low nibble).
    #[must_use]
    pub const fn basic_reason(self) -> Self {
        Self(self.0 & Self::BASIC_MASK)
    }

    /// Whether the code is part of the catalog.
    #[must_use]
    pub fn is_known(self) -> bool {
        Self::ALL.contains(&self)
    }
}

impl std::fmt::Display for MoveReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Structured justification for a card move.
///
/// Equality compares all five fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardMoveReason {
    /// Catalog code.
    pub code: MoveReasonCode,

    /// Player who caused the move (not necessarily the card's owner).
    pub player: Option<PlayerId>,

    /// Nominal target. Display hint only: moves with several targets leave it
    /// empty, so rule decisions must not read it.
    pub target: Option<PlayerId>,

    /// Ability that caused the move.
    pub skill_name: Option<String>,

    /// Extra tag, e.g. the trick being judged.
    pub event_name: Option<String>,
}

impl CardMoveReason {
    /// A reason with a code and instigating player.
    #[must_use]
    pub fn new(code: MoveReasonCode, player: impl Into<Option<PlayerId>>) -> Self {
        Self {
            code,
            player: player.into(),
            ..Self::default()
        }
    }

    /// Set the target hint.
    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the ability name.
    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill_name = Some(skill.into());
        self
    }

    /// Set the event tag.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event_name = Some(event.into());
        self
    }

    /// Basic reason of the code.
    #[must_use]
    pub fn basic_reason(&self) -> MoveReasonCode {
        self.code.basic_reason()
    }

    /// Persisted replay encoding.
    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode the persisted replay encoding.
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
