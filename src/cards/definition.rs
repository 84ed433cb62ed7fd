//! Card templates - the static data of every physical card.
//!
//! The registry assigns each template a dense `CardId` equal to its insertion
//! order. A template records the object name ("fire_slash"), the kind chain a
//! pattern can test ("FireSlash", "Slash", "BasicCard"), the face (suit and
//! rank) and, for equipment, the slot and weapon range.
//!
//! Runtime cards built from templates or composed by view-as abilities live
//! in [`Card`](super::Card).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::EngineError;

/// Dense card identifier issued by the registry.
///
/// Ids start at 0 and follow template insertion order. They are the canonical
/// card reference in room state, move records and patterns (`#12`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into dense per-card storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Color {
    Red,
    Black,
    Colorless,
}

/// Card suit.
///
/// `NoSuitBlack` and `NoSuitRed` are produced when a virtual card is composed
/// of several sub-cards that share a colour but not a suit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Suit {
    Spade,
    Club,
    Heart,
    Diamond,
    NoSuitBlack,
    NoSuitRed,
    #[default]
    NoSuit,
}

impl Suit {
    /// Colour of this suit.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Spade | Self::Club | Self::NoSuitBlack => Color::Black,
            Self::Heart | Self::Diamond | Self::NoSuitRed => Color::Red,
            Self::NoSuit => Color::Colorless,
        }
    }

    /// Whether this is one of the four real suits.
    #[must_use]
    pub const fn is_real(self) -> bool {
        matches!(self, Self::Spade | Self::Club | Self::Heart | Self::Diamond)
    }

    /// The colour-only suit for a colour.
    #[must_use]
    pub const fn colorless_of(color: Color) -> Self {
        match color {
            Color::Red => Self::NoSuitRed,
            Color::Black => Self::NoSuitBlack,
            Color::Colorless => Self::NoSuit,
        }
    }
}

/// Broad card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CardType {
    #[strum(serialize = "SkillCard")]
    Skill,
    #[strum(serialize = "BasicCard")]
    Basic,
    #[strum(serialize = "EquipCard")]
    Equip,
    #[strum(serialize = "TrickCard")]
    Trick,
}

/// Equipment slot.
///
/// The `Display` form doubles as the kind name equipment templates carry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumIter,
)]
pub enum EquipSlot {
    Weapon,
    Armor,
    DefensiveHorse,
    OffensiveHorse,
    Treasure,
}

/// How a card is being handled when it leaves a player.
///
/// Names are the lowercase words content uses: `"use"`, `"response"`,
/// `"discard"`, `"recast"`, `"pindian"`, `"none"`.
///
/// ```
/// use rust_hegemony::cards::HandlingMethod;
///
/// assert_eq!("recast".parse::<HandlingMethod>().unwrap(), HandlingMethod::Recast);
/// assert!("juggle".parse::<HandlingMethod>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum HandlingMethod {
    #[default]
    None,
    Use,
    Response,
    Discard,
    Recast,
    Pindian,
}

impl FromStr for HandlingMethod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|method| <&'static str>::from(*method) == s)
            .ok_or_else(|| EngineError::UnknownHandlingMethod(s.to_string()))
    }
}

/// Static data of one physical card.
///
/// ```
/// use rust_hegemony::cards::{CardTemplate, CardType, Suit};
///
/// let fire = CardTemplate::new("fire_slash", CardType::Basic)
///     .with_kind("Slash")
///     .with_kind("FireSlash")
///     .with_face(Suit::Heart, 4);
///
/// assert!(fire.is_kind_of("Slash"));
/// assert!(fire.is_kind_of("BasicCard"));
/// assert!(!fire.is_kind_of("Jink"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Dense id, assigned by the registry when the owning package is added.
    pub id: CardId,

    /// Object name, e.g. `"fire_slash"`.
    pub name: String,

    /// Kind chain, most specific first, ending with the type class name.
    pub kinds: SmallVec<[String; 4]>,

    /// Broad category.
    pub card_type: CardType,

    /// Printed suit.
    pub suit: Suit,

    /// Printed rank, 1..=13 (0 when the card has none).
    pub rank: u8,

    /// Name of the package that contributed the card.
    pub package: String,

    /// Slot for equipment.
    pub equip_slot: Option<EquipSlot>,

    /// Attack range granted while equipped as a weapon.
    pub weapon_range: i32,
}

impl CardTemplate {
    /// Create a template. Its kind chain starts as the type class name.
    #[must_use]
    pub fn new(name: impl Into<String>, card_type: CardType) -> Self {
        let mut kinds = SmallVec::new();
        kinds.push(card_type.to_string());
        Self {
            id: CardId::new(0),
            name: name.into(),
            kinds,
            card_type,
            suit: Suit::NoSuit,
            rank: 0,
            package: String::new(),
            equip_slot: None,
            weapon_range: 0,
        }
    }

    /// Push a more specific kind onto the front of the chain.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.insert(0, kind.into());
        self
    }

    /// Set suit and rank.
    #[must_use]
    pub fn with_face(mut self, suit: Suit, rank: u8) -> Self {
        self.suit = suit;
        self.rank = rank;
        self
    }

    /// Mark as equipment for a slot; the slot name joins the kind chain.
    #[must_use]
    pub fn with_slot(mut self, slot: EquipSlot) -> Self {
        self.equip_slot = Some(slot);
        self.kinds.insert(0, slot.to_string());
        self
    }

    /// Set the weapon range.
    #[must_use]
    pub fn with_range(mut self, range: i32) -> Self {
        self.weapon_range = range;
        self
    }

    /// Whether the chain contains `kind`.
    #[must_use]
    pub fn is_kind_of(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// Printed colour.
    #[must_use]
    pub fn color(&self) -> Color {
        self.suit.color()
    }
}
