//! Pattern expressions.
//!
//! ## Grammar
//!
//! ```text
//! expression  := alternative ( "," alternative )*
//! alternative := qualifier ( "+" qualifier )*
//! qualifier   := [ "!" | "^" ] atom
//! ```
//!
//! Atoms:
//!
//! | Atom | Matches |
//! |---|---|
//! | `.` | anything |
//! | `spade` `heart` `club` `diamond` | that suit |
//! | `nosuit` | any suit that is not one of the four |
//! | `red` `black` `nocolor` | colour |
//! | `7`, `Q`, `3~5`, `~4`, `J~` | rank, inclusive range (open ends are 1 and 13) |
//! | `hand` `equipped` `judging` `@pile` | where the player holds the card |
//! | `#12` | effective card id |
//! | `%fire_slash` | exact object name |
//! | `Slash` | kind chain |
//!
//! Alternatives are OR-ed, qualifiers inside one alternative are AND-ed. A
//! malformed alternative matches nothing; the others still count.
//!
//! ```
//! use rust_hegemony::cards::{Card, CardType, Suit};
//! use rust_hegemony::pattern::ExpPattern;
//!
//! let pattern = ExpPattern::new("spade,heart+3~5");
//! let card = |suit, rank| Card::new_virtual("slash", CardType::Basic, ["Slash"]).with_face(suit, rank);
//!
//! assert!(pattern.matches_card(&card(Suit::Spade, 12)));
//! assert!(pattern.matches_card(&card(Suit::Heart, 4)));
//! assert!(!pattern.matches_card(&card(Suit::Club, 4)));
//! ```

use smallvec::SmallVec;
use std::fmt;

use crate::cards::{Card, CardId, Color, Suit, MAX_RANK};
use crate::core::PlayerState;

/// Something that decides whether a (player, card) pair is eligible.
///
/// `ExpPattern` is the textual implementation; packages may register their
/// own.
pub trait CardPattern: Send + Sync + fmt::Debug {
    /// Whether `card`, as held by `player`, matches.
    fn matches(&self, player: Option<&PlayerState>, card: &Card) -> bool;

    /// Source text (or a descriptive name for custom patterns).
    fn pattern_str(&self) -> &str;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Atom {
    Any,
    Suit(Suit),
    NoSuit,
    Color(Color),
    Rank { low: u8, high: u8 },
    Place(PlaceAtom),
    Id(CardId),
    Name(String),
    Kind(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PlaceAtom {
    Hand,
    Equipped,
    Judging,
    Pile(String),
}

impl PlaceAtom {
    fn holds(&self, player: &PlayerState, id: CardId) -> bool {
        match self {
            Self::Hand => player.hand_contains(id),
            Self::Equipped => player.has_equip(id),
            Self::Judging => player.is_judging(id),
            Self::Pile(pile) => player.pile_contains(pile, id),
        }
    }
}

impl Atom {
    fn eval(&self, player: Option<&PlayerState>, card: &Card) -> bool {
        match self {
            Self::Any => true,
            Self::Suit(suit) => card.suit() == *suit,
            Self::NoSuit => !card.suit().is_real(),
            Self::Color(color) => card.color() == *color,
            Self::Rank { low, high } => (*low..=*high).contains(&card.rank()),
            Self::Id(id) => card.effective_id() == Some(*id),
            Self::Name(name) => card.name() == name,
            Self::Kind(kind) => card.is_kind_of(kind),
            Self::Place(place) => match (player, card.effective_id()) {
                (Some(player), Some(id)) => place.holds(player, id),
                _ => false,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Qualifier {
    negated: bool,
    atom: Atom,
}

impl Qualifier {
    fn eval(&self, player: Option<&PlayerState>, card: &Card) -> bool {
        // Place qualifiers cannot be decided without a player.
        if player.is_none() && matches!(self.atom, Atom::Place(_)) {
            return true;
        }
        self.atom.eval(player, card) != self.negated
    }
}

type Alternative = SmallVec<[Qualifier; 4]>;

/// A compiled pattern expression.
///
/// Compiling never fails; malformed alternatives are kept as "matches
/// nothing". The source text is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpPattern {
    source: String,
    alternatives: Vec<Option<Alternative>>,
}

impl ExpPattern {
    /// Compile an expression.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let alternatives = source.split(',').map(parse_alternative).collect();
        Self { source, alternatives }
    }

    /// The source text, exactly as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether every alternative parsed.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.alternatives.iter().all(Option::is_some)
    }

    /// Number of alternatives, malformed ones included.
    #[must_use]
    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    /// Match without a player; place qualifiers are treated as satisfied.
    #[must_use]
    pub fn matches_card(&self, card: &Card) -> bool {
        self.matches(None, card)
    }
}

impl CardPattern for ExpPattern {
    fn matches(&self, player: Option<&PlayerState>, card: &Card) -> bool {
        self.alternatives.iter().flatten().any(|alternative| {
            alternative.iter().all(|q| q.eval(player, card))
        })
    }

    fn pattern_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for ExpPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compile and match in one step.
#[must_use]
pub fn match_expression(player: Option<&PlayerState>, card: &Card, expression: &str) -> bool {
    ExpPattern::new(expression).matches(player, card)
}

fn parse_alternative(text: &str) -> Option<Alternative> {
    text.split('+').map(parse_qualifier).collect()
}

fn parse_qualifier(text: &str) -> Option<Qualifier> {
    let text = text.trim();
    let (negated, rest) = match text.strip_prefix(|c: char| c == '!' || c == '^') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    parse_atom(rest).map(|atom| Qualifier { negated, atom })
}

fn parse_atom(text: &str) -> Option<Atom> {
    if text.is_empty() {
        return None;
    }
    if text == "." {
        return Some(Atom::Any);
    }
    if let Some(pile) = text.strip_prefix('@') {
        return is_name(pile).then(|| Atom::Place(PlaceAtom::Pile(pile.to_string())));
    }
    if let Some(id) = text.strip_prefix('#') {
        return id.parse().ok().map(|raw| Atom::Id(CardId::new(raw)));
    }
    if let Some(name) = text.strip_prefix('%') {
        return is_name(name).then(|| Atom::Name(name.to_string()));
    }
    if let Some((low, high)) = text.split_once('~') {
        let low = if low.trim().is_empty() { 1 } else { parse_rank(low.trim())? };
        let high = if high.trim().is_empty() { MAX_RANK } else { parse_rank(high.trim())? };
        return Some(Atom::Rank { low, high });
    }
    if let Some(rank) = parse_rank(text) {
        return Some(Atom::Rank { low: rank, high: rank });
    }

    let atom = match text {
        "spade" => Atom::Suit(Suit::Spade),
        "heart" => Atom::Suit(Suit::Heart),
        "club" => Atom::Suit(Suit::Club),
        "diamond" => Atom::Suit(Suit::Diamond),
        "nosuit" => Atom::NoSuit,
        "red" => Atom::Color(Color::Red),
        "black" => Atom::Color(Color::Black),
        "nocolor" => Atom::Color(Color::Colorless),
        "hand" => Atom::Place(PlaceAtom::Hand),
        "equipped" => Atom::Place(PlaceAtom::Equipped),
        "judging" => Atom::Place(PlaceAtom::Judging),
        kind if is_identifier(kind) => Atom::Kind(kind.to_string()),
        _ => return None,
    };
    Some(atom)
}

fn parse_rank(text: &str) -> Option<u8> {
    match text {
        "A" => Some(1),
        "J" => Some(11),
        "Q" => Some(12),
        "K" => Some(13),
        digits if digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse().ok().filter(|r| (1..=MAX_RANK).contains(r))
        }
        _ => None,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardTemplate, CardType, EquipSlot};
    use crate::core::PlayerId;

    fn physical(id: u32, name: &str, kind: &str, suit: Suit, rank: u8) -> Card {
        let mut template = CardTemplate::new(name, CardType::Basic)
            .with_kind(kind)
            .with_face(suit, rank);
        template.id = CardId::new(id);
        Card::physical(&template)
    }

    #[test]
    fn test_suits_and_colors() {
        let card = physical(0, "slash", "Slash", Suit::Club, 9);
        assert!(ExpPattern::new("club").matches_card(&card));
        assert!(ExpPattern::new("black").matches_card(&card));
        assert!(!ExpPattern::new("red").matches_card(&card));
        assert!(!ExpPattern::new("nosuit").matches_card(&card));
        assert!(!ExpPattern::new("nocolor").matches_card(&card));

        let blank = Card::new_virtual("slash", CardType::Basic, ["Slash"]);
        assert!(ExpPattern::new("nosuit+nocolor").matches_card(&blank));
    }

    #[test]
    fn test_rank_forms() {
        let queen = physical(0, "peach", "Peach", Suit::Heart, 12);
        for expr in ["Q", "12", "10~K", "~Q", "Q~", "~", "A~13"] {
            assert!(ExpPattern::new(expr).matches_card(&queen), "{expr}");
        }
        for expr in ["J", "1~11", "K~"] {
            assert!(!ExpPattern::new(expr).matches_card(&queen), "{expr}");
        }
    }

    #[test]
    fn test_kind_and_name() {
        let card = physical(4, "fire_slash", "Slash", Suit::Heart, 4);
        assert!(ExpPattern::new("Slash").matches_card(&card));
        assert!(ExpPattern::new("BasicCard").matches_card(&card));
        assert!(ExpPattern::new("%fire_slash").matches_card(&card));
        assert!(!ExpPattern::new("%slash").matches_card(&card));
        assert!(ExpPattern::new("#4").matches_card(&card));
        assert!(!ExpPattern::new("#5").matches_card(&card));
    }

    #[test]
    fn test_negation() {
        let card = physical(0, "jink", "Jink", Suit::Diamond, 2);
        assert!(ExpPattern::new("!Slash").matches_card(&card));
        assert!(ExpPattern::new("^spade").matches_card(&card));
        assert!(!ExpPattern::new("!Jink").matches_card(&card));
        assert!(ExpPattern::new("Jink+!black").matches_card(&card));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let card = physical(0, "jink", "Jink", Suit::Diamond, 2);
        let pattern = ExpPattern::new(" Slash , Jink + red ");
        assert!(pattern.is_well_formed());
        assert!(pattern.matches_card(&card));
        assert_eq!(pattern.as_str(), " Slash , Jink + red ");
    }

    #[test]
    fn test_malformed_alternative_fails_closed() {
        let card = physical(0, "jink", "Jink", Suit::Diamond, 2);
        for expr in ["", "!", "3~x", "1~2~3", "Jink+", "14", "#x", "%", "@", "jink?"] {
            let pattern = ExpPattern::new(expr);
            assert!(!pattern.is_well_formed(), "{expr}");
            assert!(!pattern.matches_card(&card), "{expr}");
        }

        // The other alternatives still count.
        let pattern = ExpPattern::new("3~x,Jink");
        assert!(!pattern.is_well_formed());
        assert_eq!(pattern.alternative_count(), 2);
        assert!(pattern.matches_card(&card));
    }

    #[test]
    fn test_places_with_player() {
        let mut seat = PlayerState::new(PlayerId::new(0));
        seat.hand.push_back(CardId::new(1));
        seat.equips.insert(EquipSlot::Weapon, CardId::new(2));
        seat.judging.push_back(CardId::new(3));
        seat.add_to_pile("fields", CardId::new(4));

        let card = |id| physical(id, "x", "Jink", Suit::Spade, 1);
        let check = |expr: &str, id| ExpPattern::new(expr).matches(Some(&seat), &card(id));

        assert!(check("hand", 1));
        assert!(!check("hand", 2));
        assert!(check("equipped", 2));
        assert!(check("judging", 3));
        assert!(check("@fields", 4));
        assert!(!check("@other", 4));
        assert!(check("!hand", 2));
    }

    #[test]
    fn test_places_without_player_are_satisfied() {
        let card = physical(1, "x", "Jink", Suit::Spade, 1);
        assert!(ExpPattern::new("hand").matches_card(&card));
        assert!(ExpPattern::new("!hand").matches_card(&card));
        assert!(ExpPattern::new("Jink+equipped").matches_card(&card));
    }

    #[test]
    fn test_virtual_card_without_id_is_nowhere() {
        let mut seat = PlayerState::new(PlayerId::new(0));
        seat.hand.push_back(CardId::new(1));
        let card = Card::new_virtual("slash", CardType::Basic, ["Slash"]);

        assert!(!ExpPattern::new("hand").matches(Some(&seat), &card));
        assert!(ExpPattern::new("!hand").matches(Some(&seat), &card));
    }

    #[test]
    fn test_display_is_source() {
        let pattern = ExpPattern::new("Slash|Jink");
        assert_eq!(pattern.to_string(), "Slash|Jink");
        assert_eq!(pattern.pattern_str(), "Slash|Jink");
    }

    #[test]
    fn test_match_expression() {
        let card = physical(0, "slash", "Slash", Suit::Spade, 1);
        assert!(match_expression(None, &card, "spade,heart+3~5"));
        assert!(!match_expression(None, &card, "heart"));
    }
}
