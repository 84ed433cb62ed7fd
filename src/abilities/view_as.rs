//! View-as abilities: use some cards (or none) as another card.
//!
//! The room layer drives selection one card at a time: `view_filter` says
//! whether a candidate may join the current selection, `view_as` turns a
//! complete selection into the virtual card (or `None` while incomplete).
//! Produced cards carry the ability name as their skill name.
//!
//! Three shapes cover almost all content:
//!
//! - zero-card: nothing can be selected; materialises from an empty selection
//! - one-card: exactly one card, optionally filtered by a pattern
//! - free-form: the behaviour decides everything

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::cards::Card;
use crate::core::PlayerId;
use crate::pattern::CardPattern;
use crate::rules::GameView;

/// Why the room is asking for a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CardUseReason {
    #[default]
    Unknown = 0x00,
    /// Free use during the play phase.
    Play = 0x01,
    /// Asked to show or play a card in response.
    Response = 0x02,
    /// Asked to use a card in response.
    ResponseUse = 0x12,
}

/// Hooks of a view-as ability.
pub trait ViewAsBehavior: Send + Sync {
    /// Whether `candidate` may join `selected`.
    fn view_filter(
        &self,
        _view: &GameView<'_>,
        _player: PlayerId,
        _selected: &[Card],
        _candidate: &Card,
    ) -> bool {
        false
    }

    /// The card a complete selection becomes.
    fn view_as(&self, view: &GameView<'_>, player: PlayerId, selected: &[Card]) -> Option<Card>;

    /// Usable during the play phase. By default only abilities that do not
    /// answer a response pattern are.
    fn enabled_at_play(
        &self,
        _view: &GameView<'_>,
        _player: PlayerId,
        response_pattern: Option<&str>,
    ) -> bool {
        response_pattern.is_none()
    }

    /// Usable when `pattern` is asked for. By default when it is exactly the
    /// response pattern.
    fn enabled_at_response(
        &self,
        _view: &GameView<'_>,
        _player: PlayerId,
        pattern: &str,
        response_pattern: Option<&str>,
    ) -> bool {
        response_pattern == Some(pattern)
    }
}

/// Selection shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAsShape {
    ZeroCard,
    /// One card; with a filter pattern the pattern decides eligibility,
    /// otherwise the behaviour's `view_filter` does.
    OneCard { filter: Option<String> },
    FreeForm,
}

/// View-as part of an ability.
#[derive(Clone)]
pub struct ViewAsAbility {
    shape: ViewAsShape,
    response_pattern: Option<String>,
    response_or_use: bool,
    expand_pile: Option<String>,
    behavior: Arc<dyn ViewAsBehavior>,
}

impl ViewAsAbility {
    /// A view-as ability of any shape.
    pub fn new(shape: ViewAsShape, behavior: impl ViewAsBehavior + 'static) -> Self {
        Self {
            shape,
            response_pattern: None,
            response_or_use: false,
            expand_pile: None,
            behavior: Arc::new(behavior),
        }
    }

    /// Produce a card from nothing.
    pub fn zero_card<F>(view_as: F) -> Self
    where
        F: Fn(&GameView<'_>, PlayerId) -> Option<Card> + Send + Sync + 'static,
    {
        Self::new(ViewAsShape::ZeroCard, ZeroCardFn(view_as))
    }

    /// Turn one card matching `filter` into another.
    pub fn one_card<F>(filter: impl Into<String>, view_as: F) -> Self
    where
        F: Fn(&GameView<'_>, PlayerId, &Card) -> Option<Card> + Send + Sync + 'static,
    {
        Self::new(
            ViewAsShape::OneCard { filter: Some(filter.into()) },
            OneCardFn(view_as),
        )
    }

    /// Free-form selection.
    pub fn free_form(behavior: impl ViewAsBehavior + 'static) -> Self {
        Self::new(ViewAsShape::FreeForm, behavior)
    }

    /// Answer this pattern when asked for it.
    #[must_use]
    pub fn with_response_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.response_pattern = Some(pattern.into());
        self
    }

    /// May also be used in response.
    #[must_use]
    pub fn response_or_use(mut self) -> Self {
        self.response_or_use = true;
        self
    }

    /// Let the player pick from a private pile too.
    #[must_use]
    pub fn with_expand_pile(mut self, pile: impl Into<String>) -> Self {
        self.expand_pile = Some(pile.into());
        self
    }

    #[must_use]
    pub fn shape(&self) -> &ViewAsShape {
        &self.shape
    }

    #[must_use]
    pub fn response_pattern(&self) -> Option<&str> {
        self.response_pattern.as_deref()
    }

    #[must_use]
    pub fn is_response_or_use(&self) -> bool {
        self.response_or_use
    }

    #[must_use]
    pub fn expand_pile(&self) -> Option<&str> {
        self.expand_pile.as_deref()
    }

    /// Whether `invoker` may start using ability `name` now.
    ///
    /// The invoker must own the ability or carry a flag of the same name.
    pub fn is_available(
        &self,
        name: &str,
        view: &GameView<'_>,
        invoker: PlayerId,
        reason: CardUseReason,
        pattern: &str,
    ) -> bool {
        let Some(seat) = view.room.try_player(invoker) else {
            return false;
        };
        if !seat.has_ability(name) && !seat.has_flag(name) {
            return false;
        }
        let response_pattern = self.response_pattern();
        match reason {
            CardUseReason::Play => self.behavior.enabled_at_play(view, invoker, response_pattern),
            CardUseReason::Response | CardUseReason::ResponseUse => {
                self.behavior.enabled_at_response(view, invoker, pattern, response_pattern)
            }
            CardUseReason::Unknown => false,
        }
    }

    /// Whether `candidate` may join `selected`.
    pub fn view_filter(
        &self,
        view: &GameView<'_>,
        player: PlayerId,
        selected: &[Card],
        candidate: &Card,
    ) -> bool {
        match &self.shape {
            ViewAsShape::ZeroCard => false,
            ViewAsShape::OneCard { filter } => {
                if !selected.is_empty() {
                    return false;
                }
                match filter {
                    Some(filter) => view
                        .registry
                        .pattern(filter)
                        .matches(view.room.try_player(player), candidate),
                    None => self.behavior.view_filter(view, player, selected, candidate),
                }
            }
            ViewAsShape::FreeForm => self.behavior.view_filter(view, player, selected, candidate),
        }
    }

    /// Materialise the selection as ability `name`'s card.
    pub fn view_as(
        &self,
        name: &str,
        view: &GameView<'_>,
        player: PlayerId,
        selected: &[Card],
    ) -> Option<Card> {
        let complete = match self.shape {
            ViewAsShape::ZeroCard => selected.is_empty(),
            ViewAsShape::OneCard { .. } => selected.len() == 1,
            ViewAsShape::FreeForm => true,
        };
        if !complete {
            return None;
        }
        self.behavior
            .view_as(view, player, selected)
            .map(|card| card.with_skill_name(name))
    }
}

impl fmt::Debug for ViewAsAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewAsAbility")
            .field("shape", &self.shape)
            .field("response_pattern", &self.response_pattern)
            .field("response_or_use", &self.response_or_use)
            .field("expand_pile", &self.expand_pile)
            .finish_non_exhaustive()
    }
}

struct ZeroCardFn<F>(F);

impl<F> ViewAsBehavior for ZeroCardFn<F>
where
    F: Fn(&GameView<'_>, PlayerId) -> Option<Card> + Send + Sync,
{
    fn view_as(&self, view: &GameView<'_>, player: PlayerId, _selected: &[Card]) -> Option<Card> {
        (self.0)(view, player)
    }
}

struct OneCardFn<F>(F);

impl<F> ViewAsBehavior for OneCardFn<F>
where
    F: Fn(&GameView<'_>, PlayerId, &Card) -> Option<Card> + Send + Sync,
{
    fn view_as(&self, view: &GameView<'_>, player: PlayerId, selected: &[Card]) -> Option<Card> {
        selected.first().and_then(|card| (self.0)(view, player, card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardTemplate, CardType, Suit};
    use crate::core::RoomState;
    use crate::registry::Registry;

    fn jink_as_slash() -> ViewAsAbility {
        ViewAsAbility::one_card("Jink", |_, _, card| {
            Some(
                Card::new_virtual("slash", CardType::Basic, ["Slash"])
                    .with_subcards(std::slice::from_ref(card)),
            )
        })
    }

    fn jink(id: u32) -> Card {
        let mut template = CardTemplate::new("jink", CardType::Basic)
            .with_kind("Jink")
            .with_face(Suit::Diamond, 3);
        template.id = CardId::new(id);
        Card::physical(&template)
    }

    fn room_with_owner() -> RoomState {
        let mut room = RoomState::new(2);
        room.player_mut(PlayerId::new(0)).acquire_ability("dragon_heart");
        room
    }

    #[test]
    fn test_use_reason_codes() {
        assert_eq!(CardUseReason::Play as u8, 0x01);
        assert_eq!(CardUseReason::ResponseUse as u8, 0x12);
    }

    #[test]
    fn test_one_card_filter_and_materialise() {
        let registry = Registry::new();
        let room = room_with_owner();
        let view = GameView::new(&registry, &room);
        let ability = jink_as_slash();
        let p0 = PlayerId::new(0);

        assert!(ability.view_filter(&view, p0, &[], &jink(1)));
        assert!(!ability.view_filter(&view, p0, &[jink(1)], &jink(2)));

        assert!(ability.view_as("dragon_heart", &view, p0, &[]).is_none());
        assert!(ability.view_as("dragon_heart", &view, p0, &[jink(1), jink(2)]).is_none());

        let card = ability.view_as("dragon_heart", &view, p0, &[jink(1)]).unwrap();
        assert!(card.is_kind_of("Slash"));
        assert_eq!(card.skill_name(), Some("dragon_heart"));
        assert_eq!(card.effective_id(), Some(CardId::new(1)));
        assert_eq!(card.suit(), Suit::Diamond);
    }

    #[test]
    fn test_zero_card_shape() {
        let registry = Registry::new();
        let room = room_with_owner();
        let view = GameView::new(&registry, &room);
        let ability = ViewAsAbility::zero_card(|_, _| {
            Some(Card::new_virtual("duel", CardType::Trick, ["Duel"]))
        });
        let p0 = PlayerId::new(0);

        assert!(!ability.view_filter(&view, p0, &[], &jink(1)));
        assert!(ability.view_as("x", &view, p0, &[]).is_some());
        assert!(ability.view_as("x", &view, p0, &[jink(1)]).is_none());
    }

    #[test]
    fn test_availability_requires_ownership_or_flag() {
        let registry = Registry::new();
        let mut room = room_with_owner();
        let ability = jink_as_slash();

        {
            let view = GameView::new(&registry, &room);
            assert!(ability.is_available("dragon_heart", &view, PlayerId::new(0), CardUseReason::Play, ""));
            assert!(!ability.is_available("dragon_heart", &view, PlayerId::new(1), CardUseReason::Play, ""));
        }

        room.player_mut(PlayerId::new(1)).set_flag("dragon_heart");
        let view = GameView::new(&registry, &room);
        assert!(ability.is_available("dragon_heart", &view, PlayerId::new(1), CardUseReason::Play, ""));
    }

    #[test]
    fn test_availability_by_reason() {
        let registry = Registry::new();
        let room = room_with_owner();
        let view = GameView::new(&registry, &room);
        let p0 = PlayerId::new(0);

        let plain = jink_as_slash();
        assert!(plain.is_available("dragon_heart", &view, p0, CardUseReason::Play, ""));
        assert!(!plain.is_available("dragon_heart", &view, p0, CardUseReason::Response, "slash"));
        assert!(!plain.is_available("dragon_heart", &view, p0, CardUseReason::Unknown, ""));

        let responder = jink_as_slash().with_response_pattern("slash");
        assert!(!responder.is_available("dragon_heart", &view, p0, CardUseReason::Play, ""));
        assert!(responder.is_available("dragon_heart", &view, p0, CardUseReason::Response, "slash"));
        assert!(responder.is_available("dragon_heart", &view, p0, CardUseReason::ResponseUse, "slash"));
        assert!(!responder.is_available("dragon_heart", &view, p0, CardUseReason::Response, "jink"));
    }

    #[test]
    fn test_pile_card_answers_response_use() {
        let registry = Registry::new();
        let mut room = room_with_owner();
        let p0 = PlayerId::new(0);
        room.player_mut(p0).add_to_pile("troops", CardId::new(7));

        let ability = ViewAsAbility::one_card("@troops", |_, _, card| {
            Some(Card::new_virtual("jink", CardType::Basic, ["Jink"]).with_subcards(std::slice::from_ref(card)))
        })
        .with_response_pattern("jink")
        .response_or_use()
        .with_expand_pile("troops");

        assert!(ability.is_response_or_use());
        assert_eq!(ability.expand_pile(), Some("troops"));
        assert!(!jink_as_slash().is_response_or_use());
        assert_eq!(jink_as_slash().expand_pile(), None);

        let view = GameView::new(&registry, &room);
        assert!(ability.is_available("dragon_heart", &view, p0, CardUseReason::ResponseUse, "jink"));
        assert!(!ability.is_available("dragon_heart", &view, p0, CardUseReason::Play, ""));

        // Only cards in the expanded pile can be picked.
        assert!(ability.view_filter(&view, p0, &[], &jink(7)));
        assert!(!ability.view_filter(&view, p0, &[], &jink(8)));
        let card = ability.view_as("dragon_heart", &view, p0, &[jink(7)]).unwrap();
        assert_eq!(card.effective_id(), Some(CardId::new(7)));
    }
}
