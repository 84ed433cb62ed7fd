//! `GameView`: the read-only snapshot rule questions are asked against.

use std::fmt;

use crate::abilities::{is_uncapped, TargetModKind};
use crate::cards::{Card, EquipSlot};
use crate::core::{PlayerId, RoomState};
use crate::pattern::CardPattern;
use crate::registry::Registry;

/// Registry plus room state.
///
/// Every non-trigger capability receives one, and the room layer asks its
/// legality and correction questions through it.
#[derive(Clone, Copy)]
pub struct GameView<'a> {
    pub registry: &'a Registry,
    pub room: &'a RoomState,
}

impl<'a> GameView<'a> {
    #[must_use]
    pub fn new(registry: &'a Registry, room: &'a RoomState) -> Self {
        Self { registry, room }
    }

    /// Distance from `from` to `to`.
    ///
    /// The shorter way round the ring of living seats, plus every distance
    /// correction, at least 1. A positive fixed distance replaces all of it.
    /// 0 to oneself and whenever either player is dead.
    #[must_use]
    pub fn distance(&self, from: PlayerId, to: PlayerId) -> i32 {
        if from == to || !self.is_alive(from) || !self.is_alive(to) {
            return 0;
        }
        let fixed = self.registry.fixed_distance(self, from, to);
        if fixed > 0 {
            return fixed;
        }

        let ring = self.room.seat_order_from(from);
        let right = ring.iter().position(|&p| p == to).unwrap_or(0) as i32;
        let left = ring.len() as i32 - right;
        let distance = right.min(left) + self.registry.correct_distance(self, from, to);
        distance.max(1)
    }

    /// Attack range of `player`.
    ///
    /// A positive fixed range wins. Otherwise the weapon's range (at least 1,
    /// 1 when weapons are ignored) plus every extra, never below 0.
    #[must_use]
    pub fn attack_range(&self, player: PlayerId, include_weapon: bool) -> i32 {
        let fixed = self.registry.correct_attack_range(self, player, include_weapon, true);
        if fixed > 0 {
            return fixed;
        }
        let base = if include_weapon { self.weapon_range(player).max(1) } else { 1 };
        let extra = self.registry.correct_attack_range(self, player, include_weapon, false);
        (base + extra).max(0)
    }

    /// Whether `to` is within `from`'s attack range.
    #[must_use]
    pub fn in_attack_range(&self, from: PlayerId, to: PlayerId) -> bool {
        from != to
            && self.is_alive(from)
            && self.is_alive(to)
            && self.distance(from, to) <= self.attack_range(from, true)
    }

    /// Hand-size limit of `player`: hp (or a positive fixed value) plus
    /// every extra, never below 0.
    #[must_use]
    pub fn max_hand_size(&self, player: PlayerId) -> i32 {
        let fixed = self.registry.correct_max_cards(self, player, true);
        let base = if fixed > 0 {
            fixed
        } else {
            self.room.try_player(player).map_or(0, |p| p.hp)
        };
        (base + self.registry.correct_max_cards(self, player, false)).max(0)
    }

    /// Whether `card` in `player`'s hands satisfies a named pattern or
    /// expression.
    #[must_use]
    pub fn legal_use(&self, pattern: &str, player: PlayerId, card: &Card) -> bool {
        self.registry
            .pattern(pattern)
            .matches(self.room.try_player(player), card)
    }

    /// Whether `from` may target `to` with `card`.
    ///
    /// `reach` is the card's own distance limit before corrections. The
    /// target must not be prohibited and must be within the corrected limit,
    /// unless some modifier lifts the limit entirely.
    #[must_use]
    pub fn legal_target(
        &self,
        from: PlayerId,
        to: PlayerId,
        card: &Card,
        others: &[PlayerId],
        reach: i32,
    ) -> bool {
        if !self.is_alive(to) {
            return false;
        }
        if self.registry.is_prohibited(self, Some(from), to, card, others).is_some() {
            return false;
        }
        let correction = self.registry.correct_card_target(TargetModKind::DistanceLimit, self, from, card);
        is_uncapped(correction) || self.distance(from, to) <= reach + correction
    }

    /// How many times `from` may use `card` per turn, `None` if uncapped.
    #[must_use]
    pub fn residue_uses(&self, from: PlayerId, card: &Card, base: i32) -> Option<i32> {
        let correction = self.registry.correct_card_target(TargetModKind::Residue, self, from, card);
        if is_uncapped(correction) {
            None
        } else {
            Some(base + correction)
        }
    }

    /// Most targets one use of `card` may name.
    #[must_use]
    pub fn max_targets(&self, from: PlayerId, card: &Card, base: i32) -> i32 {
        base + self.registry.correct_card_target(TargetModKind::ExtraTarget, self, from, card)
    }

    fn is_alive(&self, player: PlayerId) -> bool {
        self.room.try_player(player).is_some_and(|p| p.alive)
    }

    fn weapon_range(&self, player: PlayerId) -> i32 {
        self.room
            .try_player(player)
            .and_then(|p| p.equip_in(EquipSlot::Weapon))
            .and_then(|id| self.registry.try_card(id))
            .map_or(0, |card| card.weapon_range)
    }
}

impl fmt::Debug for GameView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameView")
            .field("current", &self.room.current)
            .field("phase", &self.room.phase)
            .field("turn_number", &self.room.turn_number)
            .finish_non_exhaustive()
    }
}
