//! Content packages.
//!
//! A package bundles abilities, card templates, generals and named patterns
//! under one name. Packages are plain values built with `with_*` methods;
//! nothing is registered until [`Registry::add_package`] absorbs them.
//!
//! [`Registry::add_package`]: super::Registry::add_package

use std::fmt;
use std::sync::Arc;

use crate::abilities::Ability;
use crate::cards::CardTemplate;
use crate::pattern::{CardPattern, ExpPattern};

use super::general::General;

/// What a package mainly contributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Generals,
    Cards,
    #[default]
    Mixed,
    /// Scenario content; not listed among extensions.
    Special,
}

/// A named bundle of content.
#[derive(Clone, Default)]
pub struct Package {
    name: String,
    kind: PackageKind,
    abilities: Vec<Ability>,
    cards: Vec<CardTemplate>,
    generals: Vec<General>,
    patterns: Vec<(String, Arc<dyn CardPattern>)>,
    related: Vec<(String, String)>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PackageKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = Ability>) -> Self {
        self.abilities.extend(abilities);
        self
    }

    /// Add a card template. Its id and package are assigned on registration.
    #[must_use]
    pub fn with_card(mut self, card: CardTemplate) -> Self {
        self.cards.push(card);
        self
    }

    /// Add several card templates.
    #[must_use]
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = CardTemplate>) -> Self {
        self.cards.extend(cards);
        self
    }

    #[must_use]
    pub fn with_general(mut self, general: General) -> Self {
        self.generals.push(general);
        self
    }

    /// Register a custom pattern under `name`.
    #[must_use]
    pub fn with_pattern(mut self, name: impl Into<String>, pattern: impl CardPattern + 'static) -> Self {
        self.patterns.push((name.into(), Arc::new(pattern)));
        self
    }

    /// Register a pattern expression under `name`.
    #[must_use]
    pub fn with_exp_pattern(self, name: impl Into<String>, expression: &str) -> Self {
        self.with_pattern(name, ExpPattern::new(expression))
    }

    /// Declare `related` as an ability that comes with `main`.
    #[must_use]
    pub fn with_related(mut self, main: impl Into<String>, related: impl Into<String>) -> Self {
        self.related.push((main.into(), related.into()));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    #[must_use]
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    #[must_use]
    pub fn cards(&self) -> &[CardTemplate] {
        &self.cards
    }

    #[must_use]
    pub fn generals(&self) -> &[General] {
        &self.generals
    }

    pub(crate) fn into_parts(self) -> PackageParts {
        PackageParts {
            name: self.name,
            kind: self.kind,
            abilities: self.abilities,
            cards: self.cards,
            generals: self.generals,
            patterns: self.patterns,
            related: self.related,
        }
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("abilities", &self.abilities.len())
            .field("cards", &self.cards.len())
            .field("generals", &self.generals.len())
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

pub(crate) struct PackageParts {
    pub name: String,
    pub kind: PackageKind,
    pub abilities: Vec<Ability>,
    pub cards: Vec<CardTemplate>,
    pub generals: Vec<General>,
    pub patterns: Vec<(String, Arc<dyn CardPattern>)>,
    pub related: Vec<(String, String)>,
}

/// Named package constructors, in load order.
#[derive(Clone, Default)]
pub struct PackageCatalog {
    entries: Vec<(String, fn() -> Package)>,
}

impl PackageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constructor. A name already present is replaced in place.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, build: fn() -> Package) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = build,
            None => self.entries.push((name, build)),
        }
        self
    }

    /// Constructor for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<fn() -> Package> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, build)| *build)
    }

    /// Known names, in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PackageCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;

    fn empty() -> Package {
        Package::new("empty")
    }

    fn cards() -> Package {
        Package::new("cards")
            .with_kind(PackageKind::Cards)
            .with_card(CardTemplate::new("jink", CardType::Basic).with_kind("Jink"))
    }

    #[test]
    fn test_builder_collects_content() {
        let package = cards()
            .with_general(General::new("caocao$", "wei", 8))
            .with_exp_pattern("red_basic", "red+BasicCard");
        assert_eq!(package.name(), "cards");
        assert_eq!(package.kind(), PackageKind::Cards);
        assert_eq!(package.cards().len(), 1);
        assert_eq!(package.generals().len(), 1);
        assert!(format!("{:?}", package).contains("patterns: 1"));
    }

    #[test]
    fn test_catalog_order_and_replace() {
        let catalog = PackageCatalog::new()
            .with("empty", empty)
            .with("cards", cards)
            .with("empty", cards);

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["empty", "cards"]);
        let build = catalog.get("empty").unwrap();
        assert_eq!(build().name(), "cards");
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.len(), 2);
    }
}
