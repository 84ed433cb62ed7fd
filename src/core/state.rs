//! Room state: the game snapshot abilities read and mutate.
//!
//! ## PlayerState
//!
//! Everything the rule core needs to know about one seat:
//! - generals (head and deputy), hp, alive flag
//! - hand, equip area, judging area and named piles
//! - owned ability names, marks, flags, per-turn usage history
//!
//! ## RoomState
//!
//! All seats plus turn progression and the shared piles.
//!
//! Both use `im` persistent collections so the room layer can snapshot a room
//! in O(1) before asking speculative questions ("would this target be legal").

use im::{HashMap as ImHashMap, HashSet as ImHashSet, OrdMap, Vector};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::player::{PlayerId, PlayerMap};
use crate::cards::{CardId, EquipSlot};

/// Turn phase of the current player.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    RoundStart,
    Start,
    Judge,
    Draw,
    Play,
    Discard,
    Finish,
    #[default]
    NotActive,
}

/// Where a card sits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Place {
    Hand,
    Equip,
    DelayedTrick,
    Judge,
    Special,
    DiscardPile,
    DrawPile,
    Table,
    #[default]
    Unknown,
}

/// State of one seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Seat index.
    pub seat: PlayerId,
    /// Head general name.
    pub general: Option<String>,
    /// Deputy general name.
    pub deputy: Option<String>,
    /// Current hit points.
    pub hp: i32,
    /// Hit-point cap.
    pub max_hp: i32,
    /// Dead players keep their seat but stop counting for distance.
    pub alive: bool,
    /// Cards in hand, in draw order.
    pub hand: Vector<CardId>,
    /// Equipped cards by slot.
    pub equips: OrdMap<EquipSlot, CardId>,
    /// Delayed tricks waiting to be judged.
    pub judging: Vector<CardId>,
    /// Named private piles.
    pub piles: ImHashMap<String, Vector<CardId>>,

    abilities: Vector<String>,
    marks: ImHashMap<String, i32>,
    flags: ImHashSet<String>,
    history: ImHashMap<String, u32>,
}

impl PlayerState {
    /// A living seat with 4 hp and nothing else.
    #[must_use]
    pub fn new(seat: PlayerId) -> Self {
        Self {
            seat,
            general: None,
            deputy: None,
            hp: 4,
            max_hp: 4,
            alive: true,
            hand: Vector::new(),
            equips: OrdMap::new(),
            judging: Vector::new(),
            piles: ImHashMap::new(),
            abilities: Vector::new(),
            marks: ImHashMap::new(),
            flags: ImHashSet::new(),
            history: ImHashMap::new(),
        }
    }

    // === Abilities ===

    /// Owned ability names, in acquisition order.
    pub fn abilities(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(String::as_str)
    }

    /// Whether this seat owns the named ability.
    #[must_use]
    pub fn has_ability(&self, name: &str) -> bool {
        self.abilities.iter().any(|a| a == name)
    }

    /// Grant an ability. Returns false if it was already owned.
    pub fn acquire_ability(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_ability(&name) {
            return false;
        }
        self.abilities.push_back(name);
        true
    }

    /// Remove an ability. Returns false if it was not owned.
    pub fn detach_ability(&mut self, name: &str) -> bool {
        match self.abilities.iter().position(|a| a == name) {
            Some(index) => {
                self.abilities.remove(index);
                true
            }
            None => false,
        }
    }

    // === Cards ===

    /// Whether the card is in this seat's hand.
    #[must_use]
    pub fn hand_contains(&self, card: CardId) -> bool {
        self.hand.contains(&card)
    }

    /// Whether the card is equipped by this seat.
    #[must_use]
    pub fn has_equip(&self, card: CardId) -> bool {
        self.equips.values().any(|&c| c == card)
    }

    /// Card in an equip slot.
    #[must_use]
    pub fn equip_in(&self, slot: EquipSlot) -> Option<CardId> {
        self.equips.get(&slot).copied()
    }

    /// Whether the card waits in this seat's judging area.
    #[must_use]
    pub fn is_judging(&self, card: CardId) -> bool {
        self.judging.contains(&card)
    }

    /// Whether the named pile holds the card.
    #[must_use]
    pub fn pile_contains(&self, pile: &str, card: CardId) -> bool {
        self.piles.get(pile).is_some_and(|cards| cards.contains(&card))
    }

    /// Cards in a named pile.
    #[must_use]
    pub fn pile(&self, pile: &str) -> Vector<CardId> {
        self.piles.get(pile).cloned().unwrap_or_default()
    }

    /// Add a card to a named pile.
    pub fn add_to_pile(&mut self, pile: impl Into<String>, card: CardId) {
        self.piles
            .entry(pile.into())
            .or_insert_with(Vector::new)
            .push_back(card);
    }

    /// Number of cards in hand.
    #[must_use]
    pub fn hand_count(&self) -> usize {
        self.hand.len()
    }

    // === Marks and flags ===

    /// Mark count (0 when absent).
    #[must_use]
    pub fn mark(&self, name: &str) -> i32 {
        self.marks.get(name).copied().unwrap_or(0)
    }

    /// Add `delta` to a mark.
    pub fn add_mark(&mut self, name: impl Into<String>, delta: i32) {
        *self.marks.entry(name.into()).or_insert(0) += delta;
    }

    /// Whether a flag is set.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    /// Set a flag.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.flags.insert(name.into());
    }

    /// Clear a flag.
    pub fn clear_flag(&mut self, name: &str) {
        self.flags.remove(name);
    }

    // === History ===

    /// How often `key` was used this turn.
    #[must_use]
    pub fn history(&self, key: &str) -> u32 {
        self.history.get(key).copied().unwrap_or(0)
    }

    /// Record one more use of `key` this turn.
    pub fn add_history(&mut self, key: impl Into<String>) {
        *self.history.entry(key.into()).or_insert(0) += 1;
    }

    /// Forget this turn's usage.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// State of one room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomState {
    players: PlayerMap<PlayerState>,
    /// Seat whose turn it is.
    pub current: PlayerId,
    /// Phase of the current seat.
    pub phase: Phase,
    /// Turn number, starting at 1.
    pub turn_number: u32,
    /// Draw pile, top first.
    pub draw_pile: Vector<CardId>,
    /// Discard pile, oldest first.
    pub discard_pile: Vector<CardId>,
}

impl RoomState {
    /// A room with `player_count` fresh seats, seat 0 to act.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            players: PlayerMap::new(player_count, PlayerState::new),
            current: PlayerId::new(0),
            phase: Phase::default(),
            turn_number: 1,
            draw_pile: Vector::new(),
            discard_pile: Vector::new(),
        }
    }

    /// Replace the draw pile (top first).
    #[must_use]
    pub fn with_draw_pile(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.draw_pile = cards.into_iter().collect();
        self
    }

    /// Number of seats, dead or alive.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// A seat's state.
    ///
    /// Panics if the seat is outside the room.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    /// A seat's state, mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    /// A seat's state, `None` for a seat outside the room.
    #[must_use]
    pub fn try_player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.try_get(id)
    }

    /// All seats in seat order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().map(|(_, p)| p)
    }

    /// Living seats in turn order starting from `first`.
    #[must_use]
    pub fn seat_order_from(&self, first: PlayerId) -> Vec<PlayerId> {
        PlayerId::order_from(first, self.player_count())
            .filter(|&p| self.players[p].alive)
            .collect()
    }

    /// Living seats in turn order starting from the current seat.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.seat_order_from(self.current)
    }

    /// Seat order from the current seat, dead seats included.
    #[must_use]
    pub fn action_order(&self) -> Vec<PlayerId> {
        PlayerId::order_from(self.current, self.player_count()).collect()
    }

    /// Draw up to `n` cards from the top of the draw pile into a hand.
    ///
    /// Returns the cards actually drawn.
    pub fn draw_cards(&mut self, player: PlayerId, n: usize) -> Vec<CardId> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(card) = self.draw_pile.pop_front() else {
                break;
            };
            drawn.push(card);
        }
        let seat = &mut self.players[player];
        for &card in &drawn {
            seat.hand.push_back(card);
        }
        drawn
    }

    /// Move a card from a seat's hand, equip or judging area to the discard pile.
    ///
    /// Returns where it came from, `None` if the seat did not hold it.
    pub fn move_to_discard(&mut self, player: PlayerId, card: CardId) -> Option<Place> {
        let seat = &mut self.players[player];
        let from = if let Some(index) = seat.hand.index_of(&card) {
            seat.hand.remove(index);
            Place::Hand
        } else if let Some(slot) = seat
            .equips
            .iter()
            .find(|&(_, &c)| c == card)
            .map(|(&slot, _)| slot)
        {
            seat.equips.remove(&slot);
            Place::Equip
        } else if let Some(index) = seat.judging.index_of(&card) {
            seat.judging.remove(index);
            Place::DelayedTrick
        } else {
            return None;
        };
        self.discard_pile.push_back(card);
        Some(from)
    }

    /// Equip a card, sending any card it replaces to the discard pile.
    ///
    /// The card is taken out of the seat's hand if it is there.
    pub fn equip(&mut self, player: PlayerId, slot: EquipSlot, card: CardId) -> Option<CardId> {
        let seat = &mut self.players[player];
        if let Some(index) = seat.hand.index_of(&card) {
            seat.hand.remove(index);
        }
        let replaced = seat.equips.insert(slot, card);
        if let Some(old) = replaced {
            self.discard_pile.push_back(old);
        }
        replaced
    }

    /// Empty a named pile into the discard pile. Returns the moved cards.
    pub fn clear_pile(&mut self, player: PlayerId, pile: &str) -> Vec<CardId> {
        let cards: Vec<CardId> = self.players[player]
            .piles
            .remove(pile)
            .map(|v| v.into_iter().collect())
            .unwrap_or_default();
        self.discard_pile.extend(cards.iter().copied());
        cards
    }

    /// Kill a seat.
    pub fn kill(&mut self, player: PlayerId) {
        let seat = &mut self.players[player];
        seat.alive = false;
        seat.hp = seat.hp.min(0);
    }

    /// Pass the turn to the next living seat and reset per-turn history.
    pub fn advance_turn(&mut self) {
        let count = self.player_count();
        let mut next = self.current.next(count);
        for _ in 0..count {
            if self.players[next].alive {
                break;
            }
            next = next.next(count);
        }
        self.current = next;
        self.phase = Phase::RoundStart;
        self.turn_number += 1;
        for (_, seat) in self.players.iter_mut() {
            seat.clear_history();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CardId> {
        raw.iter().map(|&r| CardId::new(r)).collect()
    }

    #[test]
    fn test_abilities_are_unique_and_ordered() {
        let mut seat = PlayerState::new(PlayerId::new(0));
        assert!(seat.acquire_ability("horsemanship"));
        assert!(seat.acquire_ability("fortitude"));
        assert!(!seat.acquire_ability("horsemanship"));

        let names: Vec<_> = seat.abilities().collect();
        assert_eq!(names, vec!["horsemanship", "fortitude"]);

        assert!(seat.detach_ability("horsemanship"));
        assert!(!seat.detach_ability("horsemanship"));
        assert!(!seat.has_ability("horsemanship"));
    }

    #[test]
    fn test_marks_flags_history() {
        let mut seat = PlayerState::new(PlayerId::new(1));
        seat.add_mark("@fury", 2);
        seat.add_mark("@fury", -1);
        assert_eq!(seat.mark("@fury"), 1);
        assert_eq!(seat.mark("@missing"), 0);

        seat.set_flag("drunk");
        assert!(seat.has_flag("drunk"));
        seat.clear_flag("drunk");
        assert!(!seat.has_flag("drunk"));

        seat.add_history("Slash");
        seat.add_history("Slash");
        assert_eq!(seat.history("Slash"), 2);
        seat.clear_history();
        assert_eq!(seat.history("Slash"), 0);
    }

    #[test]
    fn test_draw_cards_stops_at_empty_pile() {
        let mut room = RoomState::new(2).with_draw_pile(ids(&[5, 6, 7]));
        let drawn = room.draw_cards(PlayerId::new(1), 2);
        assert_eq!(drawn, ids(&[5, 6]));

        let drawn = room.draw_cards(PlayerId::new(1), 5);
        assert_eq!(drawn, ids(&[7]));
        assert_eq!(room.player(PlayerId::new(1)).hand_count(), 3);
        assert!(room.draw_pile.is_empty());
    }

    #[test]
    fn test_equip_replaces_and_discards() {
        let mut room = RoomState::new(2).with_draw_pile(ids(&[1, 2]));
        let p0 = PlayerId::new(0);
        room.draw_cards(p0, 2);

        assert_eq!(room.equip(p0, EquipSlot::Weapon, CardId::new(1)), None);
        assert_eq!(room.player(p0).hand_count(), 1);
        assert_eq!(
            room.equip(p0, EquipSlot::Weapon, CardId::new(2)),
            Some(CardId::new(1))
        );
        assert_eq!(room.player(p0).equip_in(EquipSlot::Weapon), Some(CardId::new(2)));
        assert_eq!(room.discard_pile, Vector::from(ids(&[1])));
    }

    #[test]
    fn test_discard_reports_origin() {
        let mut room = RoomState::new(2).with_draw_pile(ids(&[1, 2]));
        let p0 = PlayerId::new(0);
        room.draw_cards(p0, 2);
        room.equip(p0, EquipSlot::Armor, CardId::new(2));

        assert_eq!(room.move_to_discard(p0, CardId::new(1)), Some(Place::Hand));
        assert_eq!(room.move_to_discard(p0, CardId::new(2)), Some(Place::Equip));
        assert_eq!(room.move_to_discard(p0, CardId::new(3)), None);
        assert_eq!(room.discard_pile.len(), 2);
    }

    #[test]
    fn test_piles() {
        let mut room = RoomState::new(2);
        let p1 = PlayerId::new(1);
        room.player_mut(p1).add_to_pile("fields", CardId::new(9));
        assert!(room.player(p1).pile_contains("fields", CardId::new(9)));
        assert!(!room.player(p1).pile_contains("other", CardId::new(9)));

        assert_eq!(room.clear_pile(p1, "fields"), ids(&[9]));
        assert!(room.player(p1).pile("fields").is_empty());
        assert!(room.discard_pile.contains(&CardId::new(9)));
    }

    #[test]
    fn test_advance_turn_skips_dead_seats() {
        let mut room = RoomState::new(4);
        room.kill(PlayerId::new(1));
        room.player_mut(PlayerId::new(0)).add_history("Slash");

        room.advance_turn();
        assert_eq!(room.current, PlayerId::new(2));
        assert_eq!(room.turn_number, 2);
        assert_eq!(room.phase, Phase::RoundStart);
        assert_eq!(room.player(PlayerId::new(0)).history("Slash"), 0);

        assert_eq!(
            room.alive_players(),
            vec![PlayerId::new(2), PlayerId::new(3), PlayerId::new(0)]
        );
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut room = RoomState::new(2).with_draw_pile(ids(&[1, 2, 3]));
        let snapshot = room.clone();
        room.draw_cards(PlayerId::new(0), 3);

        assert_eq!(snapshot.draw_pile.len(), 3);
        assert_eq!(snapshot.player(PlayerId::new(0)).hand_count(), 0);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::RoundStart.to_string(), "round_start");
        assert_eq!("discard".parse::<Phase>().unwrap(), Phase::Discard);
        assert_eq!(Place::DelayedTrick.to_string(), "delayed_trick");
    }
}
