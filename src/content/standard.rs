//! The `standard` package.
//!
//! A small but complete package: the draw rule, a basic deck with a few
//! pieces of equipment, and generals carrying one ability of each kind.

use crate::abilities::{
    Ability, Frequency, TargetModifying, TriggerAbility, TriggerBehavior, ViewAsAbility,
    NO_LIMIT,
};
use crate::cards::{Card, CardMoveReason, CardTemplate, CardType, EquipSlot, MoveReasonCode, Suit};
use crate::core::{Phase, Place, PlayerId};
use crate::registry::{General, Package, PackageKind};
use crate::rules::GameView;
use crate::triggers::{CardsMoveStruct, EventPayload, TriggerContext, TriggerEvent};

/// Name of the package.
pub const STANDARD: &str = "standard";

/// Cards drawn in the draw phase before corrections.
pub const DRAW_PHASE_CARDS: i32 = 2;

/// Cards dealt to each player at game start.
pub const STARTING_HAND: usize = 4;

/// Build the package.
#[must_use]
pub fn standard_package() -> Package {
    Package::new(STANDARD)
        .with_kind(PackageKind::Mixed)
        .with_abilities(rule_abilities())
        .with_abilities(equip_abilities())
        .with_abilities(general_abilities())
        .with_cards(deck())
        .with_exp_pattern("slash", "Slash")
        .with_exp_pattern("jink", "Jink")
        .with_exp_pattern("peach", "Peach")
        .with_general(General::new("liubei$", "shu", 8).with_ability("fortress"))
        .with_general(
            General::new("guanyu", "shu", 10)
                .with_ability("martial_saint")
                .with_companion("zhangfei"),
        )
        .with_general(General::new("zhangfei", "shu", 8))
        .with_general(General::new("machao", "shu", 8).with_ability("horsemanship"))
        .with_general(General::new("zhugeliang", "shu", 6).with_ability("empty_city"))
        .with_general(General::new("xuchu", "wei", 8).with_ability("fortitude"))
        .with_general(General::new("xiahoudun", "wei", 8).with_ability("retaliation"))
}

// === Rule ===

fn rule_abilities() -> Vec<Ability> {
    vec![Ability::trigger(
        "#standard_rule",
        TriggerAbility::game_rule(
            [TriggerEvent::GameStart, TriggerEvent::EventPhaseProceeding],
            StandardRule,
        ),
    )]
}

/// Deals the starting hands and runs the draw phase.
struct StandardRule;

impl TriggerBehavior for StandardRule {
    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        match ctx.event {
            TriggerEvent::GameStart => {
                draw_with_move(ctx, ask_who, STARTING_HAND);
            }
            TriggerEvent::EventPhaseProceeding if ctx.payload.phase() == Some(Phase::Draw) => {
                let mut count = EventPayload::Count(DRAW_PHASE_CARDS);
                ctx.raise(TriggerEvent::DrawNCards, Some(ask_who), &mut count);
                let n = count.count().unwrap_or(0).max(0);

                let mut after = EventPayload::Count(n);
                ctx.raise(TriggerEvent::AfterDrawNCards, Some(ask_who), &mut after);
                draw_with_move(ctx, ask_who, n as usize);
            }
            _ => {}
        }
        false
    }
}

/// Draw into a hand and announce the move.
fn draw_with_move(ctx: &mut TriggerContext<'_>, who: PlayerId, n: usize) {
    let drawn = ctx.room.draw_cards(who, n);
    if drawn.is_empty() {
        return;
    }
    let reason = CardMoveReason::new(MoveReasonCode::DRAW, who);
    let moved = CardsMoveStruct::new(drawn, reason)
        .from(None, Place::DrawPile)
        .to(Some(who), Place::Hand);
    let mut payload = EventPayload::CardsMove(vec![moved]);
    ctx.raise(TriggerEvent::CardsMoveOneTime, Some(who), &mut payload);
}

// === Equipment ===

fn equip_abilities() -> Vec<Ability> {
    vec![
        Ability::target_modifier("crossbow", "Slash", Crossbow),
        Ability::distance("#horse", |view, from, to| {
            let mut correction = 0;
            if has_equip(view, from, EquipSlot::OffensiveHorse) {
                correction -= 1;
            }
            if has_equip(view, to, EquipSlot::DefensiveHorse) {
                correction += 1;
            }
            correction
        }),
    ]
}

/// Unlimited slashes while a crossbow is equipped.
struct Crossbow;

impl TargetModifying for Crossbow {
    fn residue(&self, view: &GameView<'_>, from: PlayerId, _card: &Card) -> i32 {
        let armed = view
            .room
            .try_player(from)
            .and_then(|p| p.equip_in(EquipSlot::Weapon))
            .and_then(|id| view.registry.try_card(id))
            .is_some_and(|card| card.name == "crossbow");
        if armed {
            NO_LIMIT
        } else {
            0
        }
    }
}

fn has_equip(view: &GameView<'_>, player: PlayerId, slot: EquipSlot) -> bool {
    view.room
        .try_player(player)
        .is_some_and(|p| p.equip_in(slot).is_some())
}

// === Generals ===

fn owns(view: &GameView<'_>, player: PlayerId, ability: &str) -> bool {
    view.room
        .try_player(player)
        .is_some_and(|p| p.alive && p.has_ability(ability))
}

fn general_abilities() -> Vec<Ability> {
    vec![
        // Everyone else is one closer.
        Ability::distance("horsemanship", |view, from, _to| {
            if owns(view, from, "horsemanship") {
                -1
            } else {
                0
            }
        })
        .with_frequency(Frequency::Compulsory),
        Ability::max_hand_size("fortress", |view, player| {
            if owns(view, player, "fortress") {
                2
            } else {
                0
            }
        })
        .with_frequency(Frequency::Compulsory)
        .lord(),
        Ability::trigger("fortitude", TriggerAbility::draw_cards(|_, _, n| n + 1))
            .with_frequency(Frequency::Frequent),
        Ability::trigger(
            "retaliation",
            TriggerAbility::masochism(|ctx, who, damage| {
                draw_with_move(ctx, who, damage.damage.max(0) as usize);
            }),
        ),
        // Slash and duel cannot target an owner with an empty hand.
        Ability::prohibit("empty_city", |view, _from, to, card: &Card, _others| {
            owns(view, to, "empty_city")
                && view.room.player(to).hand_count() == 0
                && (card.is_kind_of("Slash") || card.is_kind_of("Duel"))
        })
        .with_frequency(Frequency::Compulsory),
        Ability::view_as(
            "martial_saint",
            ViewAsAbility::one_card("red", |_, _, card| {
                Some(
                    Card::new_virtual("slash", CardType::Basic, ["Slash"])
                        .with_subcards(std::slice::from_ref(card)),
                )
            }),
        ),
    ]
}

// === Cards ===

fn basic(name: &str, kind: &str, suit: Suit, rank: u8) -> CardTemplate {
    CardTemplate::new(name, CardType::Basic)
        .with_kind(kind)
        .with_face(suit, rank)
}

fn fire_slash(suit: Suit, rank: u8) -> CardTemplate {
    CardTemplate::new("fire_slash", CardType::Basic)
        .with_kind("Slash")
        .with_kind("NatureSlash")
        .with_kind("FireSlash")
        .with_face(suit, rank)
}

fn duel(suit: Suit, rank: u8) -> CardTemplate {
    CardTemplate::new("duel", CardType::Trick)
        .with_kind("SingleTargetTrick")
        .with_kind("Duel")
        .with_face(suit, rank)
}

fn equipment(name: &str, kind: &str, slot: EquipSlot, suit: Suit, rank: u8) -> CardTemplate {
    CardTemplate::new(name, CardType::Equip)
        .with_slot(slot)
        .with_kind(kind)
        .with_face(suit, rank)
}

/// The deck, in id order.
fn deck() -> Vec<CardTemplate> {
    let mut cards = Vec::new();

    for rank in 7..=10 {
        cards.push(basic("slash", "Slash", Suit::Spade, rank));
    }
    for rank in 2..=7 {
        cards.push(basic("slash", "Slash", Suit::Club, rank));
    }
    for rank in [10, 11] {
        cards.push(basic("slash", "Slash", Suit::Heart, rank));
    }
    for rank in 6..=9 {
        cards.push(basic("slash", "Slash", Suit::Diamond, rank));
    }
    cards.push(fire_slash(Suit::Heart, 4));
    cards.push(fire_slash(Suit::Diamond, 4));
    cards.push(fire_slash(Suit::Diamond, 5));

    for rank in [2, 3, 7, 8, 10, 11] {
        cards.push(basic("jink", "Jink", Suit::Diamond, rank));
    }
    for rank in [2, 13] {
        cards.push(basic("jink", "Jink", Suit::Heart, rank));
    }
    for rank in [3, 4, 7, 8, 9, 12] {
        cards.push(basic("peach", "Peach", Suit::Heart, rank));
    }

    cards.push(duel(Suit::Spade, 1));
    cards.push(duel(Suit::Club, 1));
    cards.push(duel(Suit::Diamond, 1));

    cards.push(
        equipment("crossbow", "Crossbow", EquipSlot::Weapon, Suit::Club, 1).with_range(1),
    );
    cards.push(
        equipment("halberd", "Halberd", EquipSlot::Weapon, Suit::Diamond, 12).with_range(4),
    );
    cards.push(equipment("jueying", "Jueying", EquipSlot::DefensiveHorse, Suit::Spade, 5));
    cards.push(equipment("chitu", "Chitu", EquipSlot::OffensiveHorse, Suit::Heart, 5));

    cards
}
