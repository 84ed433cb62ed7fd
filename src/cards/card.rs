//! Runtime cards - what patterns, prohibitions and target modifiers look at.
//!
//! A `Card` is either physical (built from a registered template) or virtual
//! (composed by a view-as ability, optionally out of sub-cards).
//!
//! ## Face of a virtual card
//!
//! - no sub-cards: no suit, rank 0, no effective id
//! - one sub-card: its suit, rank and effective id
//! - several: the shared suit if there is one, else the colour-only suit if
//!   they share a colour, else no suit; rank is the sum capped at 13; no
//!   effective id

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardId, CardTemplate, CardType, Color, Suit};
use super::HandlingMethod;

/// Highest rank a card face can carry.
pub const MAX_RANK: u8 = 13;

/// A card as the rule core sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    name: String,
    kinds: SmallVec<[String; 4]>,
    card_type: CardType,
    suit: Suit,
    rank: u8,
    id: Option<CardId>,
    is_virtual: bool,
    subcards: SmallVec<[CardId; 4]>,
    skill_name: Option<String>,
    handling_method: HandlingMethod,
}

impl Card {
    /// The physical card for a template.
    #[must_use]
    pub fn physical(template: &CardTemplate) -> Self {
        Self {
            name: template.name.clone(),
            kinds: template.kinds.clone(),
            card_type: template.card_type,
            suit: template.suit,
            rank: template.rank,
            id: Some(template.id),
            is_virtual: false,
            subcards: SmallVec::new(),
            skill_name: None,
            handling_method: HandlingMethod::Use,
        }
    }

    /// A virtual card with the name and kind chain of a template, no sub-cards.
    #[must_use]
    pub fn virtual_like(template: &CardTemplate) -> Self {
        Self {
            name: template.name.clone(),
            kinds: template.kinds.clone(),
            card_type: template.card_type,
            suit: Suit::NoSuit,
            rank: 0,
            id: None,
            is_virtual: true,
            subcards: SmallVec::new(),
            skill_name: None,
            handling_method: HandlingMethod::Use,
        }
    }

    /// A virtual card with an explicit kind chain (most specific first).
    ///
    /// The type class name is appended to the chain.
    #[must_use]
    pub fn new_virtual<I, S>(name: impl Into<String>, card_type: CardType, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chain: SmallVec<[String; 4]> = kinds.into_iter().map(Into::into).collect();
        chain.push(card_type.to_string());
        Self {
            name: name.into(),
            kinds: chain,
            card_type,
            suit: Suit::NoSuit,
            rank: 0,
            id: None,
            is_virtual: true,
            subcards: SmallVec::new(),
            skill_name: None,
            handling_method: HandlingMethod::Use,
        }
    }

    /// Compose this virtual card out of sub-cards, recomputing its face.
    ///
    /// Physical cards ignore this.
    #[must_use]
    pub fn with_subcards(mut self, subcards: &[Card]) -> Self {
        if !self.is_virtual {
            return self;
        }
        self.subcards = subcards.iter().filter_map(Card::effective_id).collect();
        match subcards {
            [] => {
                self.suit = Suit::NoSuit;
                self.rank = 0;
                self.id = None;
            }
            [only] => {
                self.suit = only.suit;
                self.rank = only.rank;
                self.id = only.effective_id();
            }
            [first, rest @ ..] => {
                self.suit = if rest.iter().all(|c| c.suit == first.suit) {
                    first.suit
                } else if rest.iter().all(|c| c.color() == first.color()) {
                    Suit::colorless_of(first.color())
                } else {
                    Suit::NoSuit
                };
                let total: u32 = subcards.iter().map(|c| u32::from(c.rank)).sum();
                self.rank = total.min(u32::from(MAX_RANK)) as u8;
                self.id = None;
            }
        }
        self
    }

    /// Name the view-as ability that produced this card.
    #[must_use]
    pub fn with_skill_name(mut self, name: impl Into<String>) -> Self {
        self.skill_name = Some(name.into());
        self
    }

    /// Set how the card is being handled.
    #[must_use]
    pub fn with_handling_method(mut self, method: HandlingMethod) -> Self {
        self.handling_method = method;
        self
    }

    /// Override the face (suit and rank).
    #[must_use]
    pub fn with_face(mut self, suit: Suit, rank: u8) -> Self {
        self.suit = suit;
        self.rank = rank.min(MAX_RANK);
        self
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the kind chain contains `kind`.
    #[must_use]
    pub fn is_kind_of(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// Kind chain, most specific first.
    #[must_use]
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    /// Broad category.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    /// Effective suit.
    #[must_use]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Effective colour.
    #[must_use]
    pub fn color(&self) -> Color {
        self.suit.color()
    }

    /// Effective rank (0 when none).
    #[must_use]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// The physical card this stands for, if any.
    #[must_use]
    pub fn effective_id(&self) -> Option<CardId> {
        self.id
    }

    /// Whether this card was composed by an ability.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// Ids of the physical cards composing a virtual card.
    #[must_use]
    pub fn subcards(&self) -> &[CardId] {
        &self.subcards
    }

    /// Name of the view-as ability that produced the card.
    #[must_use]
    pub fn skill_name(&self) -> Option<&str> {
        self.skill_name.as_deref()
    }

    /// How the card is being handled.
    #[must_use]
    pub fn handling_method(&self) -> HandlingMethod {
        self.handling_method
    }
}
