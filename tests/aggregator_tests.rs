//! Correction aggregator tests.
//!
//! Extras sum, fixed values take the maximum, prohibitions stop at the first
//! match and sentinel target-modifier answers end aggregation early.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_hegemony::abilities::{
    Ability, HandSizeAdjusting, RangeAdjusting, TargetModKind, TargetModifying, NO_LIMIT,
};
use rust_hegemony::cards::{Card, CardType};
use rust_hegemony::core::{PlayerId, RoomState};
use rust_hegemony::registry::{Package, Registry};
use rust_hegemony::rules::GameView;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry_with(abilities: Vec<Ability>) -> Registry {
    let mut registry = Registry::new();
    registry.add_package(Package::new("test").with_abilities(abilities));
    registry
}

fn slash() -> Card {
    Card::new_virtual("slash", CardType::Basic, ["Slash"])
}

fn seat(n: u8) -> PlayerId {
    PlayerId::new(n)
}

/// +1 and -2 distance corrections add up to -1.
#[test]
fn test_distance_corrections_sum() {
    init_logging();
    let registry = registry_with(vec![
        Ability::distance("far", |_, _, _| 1),
        Ability::distance("near", |_, _, _| -2),
    ]);
    let room = RoomState::new(5);
    let view = GameView::new(&registry, &room);

    assert_eq!(registry.correct_distance(&view, seat(0), seat(2)), -1);
    assert_eq!(view.distance(seat(0), seat(2)), 1);
    // Never below 1.
    assert_eq!(view.distance(seat(0), seat(1)), 1);
    assert_eq!(view.distance(seat(0), seat(0)), 0);
}

/// The largest fixed distance replaces the seat distance.
#[test]
fn test_fixed_distance_takes_maximum() {
    init_logging();
    struct Fixed(i32);
    impl rust_hegemony::abilities::DistanceAdjusting for Fixed {
        fn fixed(&self, _: &GameView<'_>, _: PlayerId, _: PlayerId) -> i32 {
            self.0
        }
    }

    let registry = registry_with(vec![
        Ability::distance_with("two", Fixed(2)),
        Ability::distance_with("three", Fixed(3)),
        Ability::distance("far", |_, _, _| 5),
    ]);
    let room = RoomState::new(4);
    let view = GameView::new(&registry, &room);

    assert_eq!(registry.fixed_distance(&view, seat(0), seat(1)), 3);
    assert_eq!(view.distance(seat(0), seat(1)), 3);
}

/// Dead seats drop out of the ring and measure 0.
#[test]
fn test_distance_skips_dead_seats() {
    init_logging();
    let registry = Registry::new();
    let mut room = RoomState::new(5);
    let before = GameView::new(&registry, &room).distance(seat(0), seat(2));
    assert_eq!(before, 2);

    room.kill(seat(1));
    let view = GameView::new(&registry, &room);
    assert_eq!(view.distance(seat(0), seat(2)), 1);
    assert_eq!(view.distance(seat(0), seat(1)), 0);
}

struct HandSize {
    extra: i32,
    fixed: i32,
}

impl HandSizeAdjusting for HandSize {
    fn extra(&self, _: &GameView<'_>, _: PlayerId) -> i32 {
        self.extra
    }

    fn fixed(&self, _: &GameView<'_>, _: PlayerId) -> i32 {
        self.fixed
    }
}

/// Hand-size extras sum; fixed values take the maximum and replace hp.
#[test]
fn test_max_hand_size_aggregation() {
    init_logging();
    let registry = registry_with(vec![
        Ability::max_hand_size_with("a", HandSize { extra: 1, fixed: 0 }),
        Ability::max_hand_size_with("b", HandSize { extra: 2, fixed: 5 }),
        Ability::max_hand_size_with("c", HandSize { extra: -1, fixed: 3 }),
    ]);
    let mut room = RoomState::new(2);
    room.player_mut(seat(0)).hp = 1;
    let view = GameView::new(&registry, &room);

    assert_eq!(registry.correct_max_cards(&view, seat(0), false), 2);
    assert_eq!(registry.correct_max_cards(&view, seat(0), true), 5);
    assert_eq!(view.max_hand_size(seat(0)), 7);
}

/// Without a fixed value the base is hp, and the limit never goes negative.
#[test]
fn test_max_hand_size_floors_at_zero() {
    init_logging();
    let registry = registry_with(vec![Ability::max_hand_size("cursed", |_, _| -10)]);
    let mut room = RoomState::new(2);
    room.player_mut(seat(1)).hp = 3;
    let view = GameView::new(&registry, &room);
    assert_eq!(view.max_hand_size(seat(1)), 0);
}

struct Range {
    extra: i32,
    fixed: i32,
}

impl RangeAdjusting for Range {
    fn extra(&self, _: &GameView<'_>, _: PlayerId, _: bool) -> i32 {
        self.extra
    }

    fn fixed(&self, _: &GameView<'_>, _: PlayerId, _: bool) -> i32 {
        self.fixed
    }
}

/// Attack-range extras sum on top of the base; a positive fixed range wins.
#[test]
fn test_attack_range_aggregation() {
    init_logging();
    let registry = registry_with(vec![
        Ability::attack_range_with("long", Range { extra: 1, fixed: 0 }),
        Ability::attack_range_with("longer", Range { extra: 2, fixed: 0 }),
    ]);
    let room = RoomState::new(6);
    let view = GameView::new(&registry, &room);
    assert_eq!(registry.correct_attack_range(&view, seat(0), true, false), 3);
    assert_eq!(view.attack_range(seat(0), true), 4);
    assert!(view.in_attack_range(seat(0), seat(3)));

    let registry = registry_with(vec![
        Ability::attack_range_with("long", Range { extra: 1, fixed: 0 }),
        Ability::attack_range_with("pinned", Range { extra: 0, fixed: 2 }),
        Ability::attack_range_with("pinned_too", Range { extra: 0, fixed: 1 }),
    ]);
    let view = GameView::new(&registry, &room);
    assert_eq!(registry.correct_attack_range(&view, seat(0), true, true), 2);
    assert_eq!(view.attack_range(seat(0), true), 2);
}

/// The first prohibiting ability is reported.
#[test]
fn test_first_prohibition_is_reported() {
    init_logging();
    let registry = registry_with(vec![
        Ability::prohibit("never", |_, _, _, _: &Card, _| false),
        Ability::prohibit("no_slash", |_, _, to: PlayerId, card: &Card, _| {
            to.index() == 1 && card.is_kind_of("Slash")
        }),
        Ability::prohibit("no_anything", |_, _, to: PlayerId, _: &Card, _| to.index() == 1),
    ]);
    let room = RoomState::new(3);
    let view = GameView::new(&registry, &room);

    let hit = registry.is_prohibited(&view, Some(seat(0)), seat(1), &slash(), &[]);
    assert_eq!(hit.map(Ability::name), Some("no_slash"));

    let jink = Card::new_virtual("jink", CardType::Basic, ["Jink"]);
    let hit = registry.is_prohibited(&view, Some(seat(0)), seat(1), &jink, &[]);
    assert_eq!(hit.map(Ability::name), Some("no_anything"));

    assert!(registry.is_prohibited(&view, None, seat(2), &slash(), &[]).is_none());
    assert!(!view.legal_target(seat(0), seat(1), &slash(), &[], 1));
    assert!(view.legal_target(seat(0), seat(2), &slash(), &[], 1));
}

/// Counts how often it is asked.
struct Counting {
    asked: Arc<AtomicUsize>,
}

impl TargetModifying for Counting {
    fn residue(&self, _: &GameView<'_>, _: PlayerId, _: &Card) -> i32 {
        self.asked.fetch_add(1, Ordering::SeqCst);
        1
    }

    fn extra_targets(&self, _: &GameView<'_>, _: PlayerId, _: &Card) -> i32 {
        self.asked.fetch_add(1, Ordering::SeqCst);
        1
    }
}

struct Unbounded;

impl TargetModifying for Unbounded {
    fn residue(&self, _: &GameView<'_>, _: PlayerId, _: &Card) -> i32 {
        NO_LIMIT
    }

    fn extra_targets(&self, _: &GameView<'_>, _: PlayerId, _: &Card) -> i32 {
        1
    }
}

/// An uncapped residue ends aggregation; later modifiers are not asked.
/// Extra targets have no sentinel and always sum.
#[test]
fn test_sentinel_short_circuits() {
    init_logging();
    let asked = Arc::new(AtomicUsize::new(0));
    let registry = registry_with(vec![
        Ability::target_modifier("unbounded", "Slash", Unbounded),
        Ability::target_modifier("counted", "Slash", Counting { asked: Arc::clone(&asked) }),
    ]);
    let room = RoomState::new(2);
    let view = GameView::new(&registry, &room);

    let residue = registry.correct_card_target(TargetModKind::Residue, &view, seat(0), &slash());
    assert_eq!(residue, NO_LIMIT);
    assert_eq!(asked.load(Ordering::SeqCst), 0);
    assert_eq!(view.residue_uses(seat(0), &slash(), 1), None);

    let extra = registry.correct_card_target(TargetModKind::ExtraTarget, &view, seat(0), &slash());
    assert_eq!(extra, 2);
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert_eq!(view.max_targets(seat(0), &slash(), 1), 3);
}

/// Modifiers only answer for cards matching their pattern.
#[test]
fn test_modifier_pattern_filters_cards() {
    init_logging();
    let asked = Arc::new(AtomicUsize::new(0));
    let registry = registry_with(vec![
        Ability::target_modifier("jinks_only", "Jink", Counting { asked: Arc::clone(&asked) }),
        Ability::target_modifier("slashes", "Slash", Counting { asked: Arc::clone(&asked) }),
    ]);
    let room = RoomState::new(2);
    let view = GameView::new(&registry, &room);

    assert_eq!(view.residue_uses(seat(0), &slash(), 1), Some(2));
    assert_eq!(asked.load(Ordering::SeqCst), 1);
}

/// Cards from a named view-as ability ignore the distance limit.
#[test]
fn test_no_distance_limit_for_skill_cards() {
    init_logging();
    let registry = registry_with(vec![Ability::no_distance_limit("sharpshooter", "Slash")]);
    let room = RoomState::new(8);
    let view = GameView::new(&registry, &room);

    let plain = slash();
    let skilled = slash().with_skill_name("sharpshooter");
    assert!(!view.legal_target(seat(0), seat(4), &plain, &[], 1));
    assert!(view.legal_target(seat(0), seat(4), &skilled, &[], 1));
    assert!(registry.ability("#sharpshooter-no-distance-limit").is_some());
}

/// Modifier patterns are read as expressions even when a named pattern
/// shares the text.
#[test]
fn test_modifier_pattern_ignores_named_patterns() {
    init_logging();
    let asked = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    registry.add_package(
        Package::new("test")
            .with_exp_pattern("Slash", "Jink")
            .with_ability(Ability::target_modifier(
                "slashes",
                "Slash",
                Counting { asked: Arc::clone(&asked) },
            )),
    );
    let room = RoomState::new(2);
    let view = GameView::new(&registry, &room);

    let jink = Card::new_virtual("jink", CardType::Basic, ["Jink"]);
    assert_eq!(view.residue_uses(seat(0), &slash(), 1), Some(2));
    assert_eq!(view.residue_uses(seat(0), &jink, 1), Some(1));
    assert_eq!(asked.load(Ordering::SeqCst), 1);
}
