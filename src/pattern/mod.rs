//! Card eligibility patterns.
//!
//! Rules everywhere ask "may this card be used/targeted/discarded here".
//! The answer is a [`CardPattern`]: usually a compiled [`ExpPattern`] written
//! in the small expression language described in [`expr`], sometimes a
//! hand-written predicate registered by a package under a short name.
//!
//! Named patterns are looked up through the registry, which compiles and
//! caches unknown names as ad-hoc expressions.

pub mod expr;

use std::fmt;

use crate::cards::Card;
use crate::core::PlayerState;

pub use expr::{match_expression, CardPattern, ExpPattern};

/// A pattern backed by a closure.
///
/// ```
/// use rust_hegemony::cards::{Card, CardType};
/// use rust_hegemony::pattern::{CardPattern, FnPattern};
///
/// let two_plus = FnPattern::new("rank_two_plus", |_, card: &Card| card.rank() >= 2);
/// let card = Card::new_virtual("jink", CardType::Basic, ["Jink"]);
/// assert!(!two_plus.matches(None, &card));
/// assert_eq!(two_plus.pattern_str(), "rank_two_plus");
/// ```
pub struct FnPattern<F> {
    name: String,
    predicate: F,
}

impl<F> FnPattern<F>
where
    F: Fn(Option<&PlayerState>, &Card) -> bool + Send + Sync,
{
    /// Wrap a predicate under a descriptive name.
    #[must_use]
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self { name: name.into(), predicate }
    }
}

impl<F> CardPattern for FnPattern<F>
where
    F: Fn(Option<&PlayerState>, &Card) -> bool + Send + Sync,
{
    fn matches(&self, player: Option<&PlayerState>, card: &Card) -> bool {
        (self.predicate)(player, card)
    }

    fn pattern_str(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnPattern<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPattern").field("name", &self.name).finish_non_exhaustive()
    }
}
