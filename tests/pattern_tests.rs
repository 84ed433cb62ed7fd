//! Pattern expression tests.
//!
//! Fixed scenarios for the expression language plus property tests for the
//! combinators: rank ranges, alternatives and negation.

use proptest::prelude::*;
use rust_hegemony::cards::{Card, CardId, CardTemplate, CardType, EquipSlot, Suit};
use rust_hegemony::core::{PlayerId, PlayerState};
use rust_hegemony::pattern::{match_expression, CardPattern, ExpPattern};

fn physical(id: u32, name: &str, kind: &str, suit: Suit, rank: u8) -> Card {
    let mut template = CardTemplate::new(name, CardType::Basic)
        .with_kind(kind)
        .with_face(suit, rank);
    template.id = CardId::new(id);
    Card::physical(&template)
}

fn suit_strategy() -> impl Strategy<Value = Suit> {
    prop::sample::select(vec![Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond])
}

fn card_strategy() -> impl Strategy<Value = Card> {
    (
        0u32..200,
        prop::sample::select(vec![("slash", "Slash"), ("jink", "Jink"), ("peach", "Peach")]),
        suit_strategy(),
        1u8..=13,
    )
        .prop_map(|(id, (name, kind), suit, rank)| physical(id, name, kind, suit, rank))
}

/// Atoms that do not depend on where the card is held.
fn atom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "spade", "heart", "club", "diamond", "red", "black", "nosuit", "Slash", "Jink",
            "BasicCard", "%peach", "."
        ])
        .prop_map(str::to_string),
        (1u8..=13).prop_map(|r| r.to_string()),
        (0u32..200).prop_map(|id| format!("#{id}")),
    ]
}

/// Suit list with a rank range, in one alternative and in another.
#[test]
fn test_suit_or_heart_with_range() {
    let pattern = ExpPattern::new("spade,heart+3~5");

    assert!(pattern.matches_card(&physical(0, "slash", "Slash", Suit::Spade, 12)));
    assert!(pattern.matches_card(&physical(1, "slash", "Slash", Suit::Heart, 4)));
    assert!(!pattern.matches_card(&physical(2, "slash", "Slash", Suit::Heart, 6)));
    assert!(!pattern.matches_card(&physical(3, "slash", "Slash", Suit::Club, 4)));
}

/// Face ranks and open-ended ranges.
#[test]
fn test_rank_names_and_open_ranges() {
    let queen = physical(0, "jink", "Jink", Suit::Diamond, 12);
    assert!(match_expression(None, &queen, "Q"));
    assert!(match_expression(None, &queen, "J~"));
    assert!(!match_expression(None, &queen, "~J"));
    assert!(match_expression(None, &queen, "10~K"));
}

/// Place atoms need a player; without one they are treated as satisfied.
#[test]
fn test_place_atoms() {
    let card = physical(7, "jink", "Jink", Suit::Heart, 2);
    let mut player = PlayerState::new(PlayerId::new(0));

    assert!(!match_expression(Some(&player), &card, "hand"));
    player.hand.push_back(CardId::new(7));
    assert!(match_expression(Some(&player), &card, "hand"));
    assert!(!match_expression(Some(&player), &card, "equipped"));

    player.hand.clear();
    player.equips.insert(EquipSlot::Armor, CardId::new(7));
    assert!(match_expression(Some(&player), &card, "equipped+red"));

    player.add_to_pile("wood", CardId::new(7));
    assert!(match_expression(Some(&player), &card, "@wood"));
    assert!(!match_expression(Some(&player), &card, "@field"));

    assert!(match_expression(None, &card, "hand+Jink"));
}

/// One malformed alternative does not poison the others.
#[test]
fn test_malformed_alternative_is_isolated() {
    let card = physical(0, "slash", "Slash", Suit::Club, 3);
    let pattern = ExpPattern::new("14~15,Slash");
    assert!(!pattern.is_well_formed());
    assert_eq!(pattern.alternative_count(), 2);
    assert!(pattern.matches_card(&card));

    assert!(!ExpPattern::new("").matches_card(&card));
    assert!(!ExpPattern::new("!").matches_card(&card));
}

/// Virtual cards carry no id; id and place atoms never match them.
#[test]
fn test_virtual_card_has_no_id() {
    let card = Card::new_virtual("slash", CardType::Basic, ["Slash"]);
    let player = PlayerState::new(PlayerId::new(1));
    assert!(!match_expression(None, &card, "#0"));
    assert!(!match_expression(Some(&player), &card, "hand"));
    assert!(match_expression(Some(&player), &card, "Slash"));
}

proptest! {
    /// `a~b` matches exactly the ranks in the inclusive range.
    #[test]
    fn test_rank_range_is_inclusive(card in card_strategy(), a in 1u8..=13, b in 1u8..=13) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let pattern = ExpPattern::new(format!("{low}~{high}"));
        prop_assert_eq!(pattern.matches_card(&card), (low..=high).contains(&card.rank()));
    }

    /// A list of alternatives matches when any single one does.
    #[test]
    fn test_alternatives_are_or(
        card in card_strategy(),
        atoms in prop::collection::vec(atom_strategy(), 1..5),
    ) {
        let joined = ExpPattern::new(atoms.join(","));
        let any = atoms.iter().any(|atom| match_expression(None, &card, atom));
        prop_assert_eq!(joined.matches_card(&card), any);
    }

    /// Qualifiers joined with `+` must all hold.
    #[test]
    fn test_qualifiers_are_and(
        card in card_strategy(),
        atoms in prop::collection::vec(atom_strategy(), 1..4),
    ) {
        let joined = ExpPattern::new(atoms.join("+"));
        let all = atoms.iter().all(|atom| match_expression(None, &card, atom));
        prop_assert_eq!(joined.matches_card(&card), all);
    }

    /// Negating a non-place atom inverts it.
    #[test]
    fn test_negation_inverts(card in card_strategy(), atom in atom_strategy()) {
        let plain = match_expression(None, &card, &atom);
        prop_assert_eq!(match_expression(None, &card, &format!("!{atom}")), !plain);
        prop_assert_eq!(match_expression(None, &card, &format!("^{atom}")), !plain);
    }

    /// Matching never depends on whitespace around qualifiers.
    #[test]
    fn test_whitespace_is_ignored(card in card_strategy(), atom in atom_strategy()) {
        let spaced = ExpPattern::new(format!(" {atom} + . "));
        prop_assert_eq!(spaced.matches(None, &card), match_expression(None, &card, &atom));
    }
}
