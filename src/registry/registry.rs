//! The content registry.
//!
//! Built once at startup from an ordered list of packages, then shared
//! read-only by every room. Registration order is significant: it fixes card
//! ids and breaks ties between trigger abilities of equal priority.
//!
//! ## Duplicates
//!
//! Every registration is first-wins:
//!
//! - a package whose name is already present is ignored (`debug!`);
//! - an ability, general or named pattern whose name is already present is
//!   ignored (`warn!`), and the earlier definition stays authoritative.
//!
//! ## Patterns
//!
//! [`Registry::pattern`] returns the pattern registered under a name, or
//! compiles the name itself as an expression and caches the result. Repeated
//! lookups of one name return the same `Arc`.

use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::abilities::{
    is_uncapped, Ability, AbilityKind, TargetModKind, TriggerAbility, ViewAsAbility,
};
use crate::cards::{Card, CardId, CardTemplate, HandlingMethod};
use crate::core::{EngineConfig, GameRng, PlayerId, PlayerState, RoomState};
use crate::error::EngineError;
use crate::pattern::{CardPattern, ExpPattern};
use crate::rules::GameView;
use crate::triggers::TriggerEvent;

use super::general::General;
use super::package::{Package, PackageCatalog, PackageKind};

/// Per-kind indexes into the ability list, in registration order.
#[derive(Clone, Debug, Default)]
struct KindIndex {
    triggers: FxHashMap<TriggerEvent, Vec<usize>>,
    prohibits: Vec<usize>,
    distances: Vec<usize>,
    max_hand_sizes: Vec<usize>,
    target_modifiers: Vec<usize>,
    attack_ranges: Vec<usize>,
}

/// Queryable catalog of all loaded content.
pub struct Registry {
    config: EngineConfig,
    packages: Vec<(String, PackageKind)>,
    abilities: Vec<Ability>,
    ability_names: FxHashMap<String, usize>,
    kinds: KindIndex,
    related: FxHashMap<String, Vec<String>>,
    main_of: FxHashMap<String, String>,
    cards: Vec<CardTemplate>,
    card_names: FxHashMap<String, Vec<CardId>>,
    generals: Vec<General>,
    general_names: FxHashMap<String, usize>,
    patterns: RwLock<FxHashMap<String, Arc<dyn CardPattern>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Registry {
    /// An empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with a configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            packages: Vec::new(),
            abilities: Vec::new(),
            ability_names: FxHashMap::default(),
            kinds: KindIndex::default(),
            related: FxHashMap::default(),
            main_of: FxHashMap::default(),
            cards: Vec::new(),
            card_names: FxHashMap::default(),
            generals: Vec::new(),
            general_names: FxHashMap::default(),
            patterns: RwLock::new(FxHashMap::default()),
        }
    }

    /// Build a registry from the packages `config` names, in order.
    ///
    /// Names missing from the catalog are skipped with a warning.
    #[must_use]
    pub fn from_config(config: EngineConfig, catalog: &PackageCatalog) -> Self {
        let names = config.package_names.clone();
        let mut registry = Self::with_config(config);
        for name in &names {
            match catalog.get(name) {
                Some(build) => {
                    registry.add_package(build());
                }
                None => warn!("package {name:?} is not in the catalog, skipped"),
            }
        }
        registry
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Registration ===

    /// Absorb a package. Returns `false` if a package of that name was
    /// already registered, in which case nothing changes.
    pub fn add_package(&mut self, package: Package) -> bool {
        if self.packages.iter().any(|(name, _)| name == package.name()) {
            debug!("package {:?} already registered, ignored", package.name());
            return false;
        }

        let parts = package.into_parts();
        self.packages.push((parts.name.clone(), parts.kind));

        self.add_skills(parts.abilities);

        for (main, related) in parts.related {
            self.main_of.entry(related.clone()).or_insert_with(|| main.clone());
            let list = self.related.entry(main).or_default();
            if !list.contains(&related) {
                list.push(related);
            }
        }

        for mut template in parts.cards {
            template.id = CardId::new(self.cards.len() as u32);
            template.package = parts.name.clone();
            self.card_names.entry(template.name.clone()).or_default().push(template.id);
            self.cards.push(template);
        }

        {
            let mut patterns = self.patterns.write().unwrap_or_else(PoisonError::into_inner);
            for (name, pattern) in parts.patterns {
                if patterns.contains_key(&name) {
                    warn!("pattern {name:?} already registered, ignored");
                    continue;
                }
                patterns.insert(name, pattern);
            }
        }

        for general in parts.generals {
            self.add_general(&parts.name, general);
        }
        true
    }

    /// Register standalone abilities.
    pub fn add_skills(&mut self, abilities: impl IntoIterator<Item = Ability>) {
        for ability in abilities {
            if self.ability_names.contains_key(ability.name()) {
                warn!("ability {:?} already registered, ignored", ability.name());
                continue;
            }
            let index = self.abilities.len();
            match &ability.kind {
                AbilityKind::Trigger(trigger) => {
                    for &event in trigger.events() {
                        self.kinds.triggers.entry(event).or_default().push(index);
                    }
                }
                AbilityKind::ViewAs(_) => {}
                AbilityKind::Prohibit(_) => self.kinds.prohibits.push(index),
                AbilityKind::Distance(_) => self.kinds.distances.push(index),
                AbilityKind::MaxHandSize(_) => self.kinds.max_hand_sizes.push(index),
                AbilityKind::TargetModifier(_) => self.kinds.target_modifiers.push(index),
                AbilityKind::AttackRange(_) => self.kinds.attack_ranges.push(index),
            }
            self.ability_names.insert(ability.name().to_string(), index);
            self.abilities.push(ability);
        }
    }

    fn add_general(&mut self, package: &str, mut general: General) {
        if self.general_names.contains_key(general.name()) {
            warn!("general {:?} already registered, ignored", general.name());
            return;
        }
        general.set_package(package);

        let pulled: Vec<String> = general
            .extra_abilities()
            .iter()
            .filter(|name| !name.starts_with('#'))
            .flat_map(|name| self.related.get(name).into_iter().flatten().cloned())
            .collect();
        for name in pulled {
            general = general.with_extra_ability(name);
        }

        for name in general.abilities() {
            if !self.ability_names.contains_key(name) {
                debug!("general {:?} grants unknown ability {name:?}", general.name());
            }
        }

        self.general_names.insert(general.name().to_string(), self.generals.len());
        self.generals.push(general);
    }

    // === Abilities ===

    #[must_use]
    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.ability_entry(name).map(|(_, ability)| ability)
    }

    /// Ability with its registration index.
    #[must_use]
    pub fn ability_entry(&self, name: &str) -> Option<(usize, &Ability)> {
        let index = *self.ability_names.get(name)?;
        Some((index, &self.abilities[index]))
    }

    #[must_use]
    pub fn trigger_ability(&self, name: &str) -> Option<&TriggerAbility> {
        self.ability(name)?.as_trigger()
    }

    /// A view-as ability, or the one attached to the trigger ability `name`.
    #[must_use]
    pub fn view_as_ability(&self, name: &str) -> Option<&ViewAsAbility> {
        let ability = self.ability(name)?;
        match &ability.kind {
            AbilityKind::ViewAs(view_as) => Some(view_as),
            AbilityKind::Trigger(trigger) => {
                let attached = trigger.view_as_skill()?;
                self.ability(attached)?.as_view_as()
            }
            _ => None,
        }
    }

    /// Abilities declared as coming with `name`.
    pub fn related_abilities<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Ability> + 'a {
        self.related
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(move |related| self.ability(related))
    }

    /// The ability a hidden helper `name` comes with, or `name` itself.
    ///
    /// Visible abilities and abilities that have related abilities of their
    /// own are their own main ability.
    #[must_use]
    pub fn main_ability(&self, name: &str) -> Option<&Ability> {
        let ability = self.ability(name)?;
        if ability.is_visible() || self.related.contains_key(name) {
            return Some(ability);
        }
        match self.main_of.get(name) {
            Some(main) => self.ability(main).or(Some(ability)),
            None => Some(ability),
        }
    }

    /// Abilities in registration order.
    pub fn abilities(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.iter()
    }

    #[must_use]
    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    /// Trigger abilities subscribed to `event`, with registration indexes.
    pub fn triggers_for(&self, event: TriggerEvent) -> impl Iterator<Item = (usize, &Ability)> {
        self.kinds
            .triggers
            .get(&event)
            .into_iter()
            .flatten()
            .map(move |&index| (index, &self.abilities[index]))
    }

    /// Players who own `ability` in `room`, in seat order.
    ///
    /// Equipment triggers belong to living players with a card of the same
    /// name equipped; every other ability belongs to players listing it.
    #[must_use]
    pub fn owners(&self, room: &RoomState, ability: &Ability) -> Vec<PlayerId> {
        let name = ability.name();
        let equip = ability.as_trigger().is_some_and(TriggerAbility::is_equip);
        room.players()
            .filter(|p| {
                if equip {
                    p.alive
                        && p.equips
                            .values()
                            .any(|&id| self.try_card(id).is_some_and(|card| card.name == name))
                } else {
                    p.has_ability(name)
                }
            })
            .map(|p| p.seat)
            .collect()
    }

    // === Patterns ===

    /// Named pattern, or `name` compiled as an expression. Cached.
    pub fn pattern(&self, name: &str) -> Arc<dyn CardPattern> {
        if let Some(pattern) = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(pattern);
        }
        let mut patterns = self.patterns.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            patterns
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(ExpPattern::new(name))),
        )
    }

    /// Match an expression once, without caching it.
    #[must_use]
    pub fn match_exp_pattern(&self, expression: &str, player: Option<&PlayerState>, card: &Card) -> bool {
        ExpPattern::new(expression).matches(player, card)
    }

    // === Cards ===

    /// Template for `id`.
    ///
    /// # Panics
    ///
    /// If the registry never issued `id`.
    #[must_use]
    pub fn card(&self, id: CardId) -> &CardTemplate {
        match self.try_card(id) {
            Some(card) => card,
            None => panic!("{}", EngineError::CardOutOfRange { id, count: self.cards.len() }),
        }
    }

    #[must_use]
    pub fn try_card(&self, id: CardId) -> Option<&CardTemplate> {
        self.cards.get(id.index())
    }

    /// Ids of every card with object name `name`.
    #[must_use]
    pub fn cards_named(&self, name: &str) -> &[CardId] {
        self.card_names.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Ids of all cards outside banned packages, shuffled.
    pub fn random_cards(&self, rng: &mut GameRng) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .iter()
            .filter(|card| !self.config.is_package_banned(&card.package))
            .map(|card| card.id)
            .collect();
        rng.shuffle(&mut ids);
        ids
    }

    /// Handling method for a content-supplied name.
    ///
    /// # Panics
    ///
    /// If `name` is not a handling method; content naming one is defective.
    #[must_use]
    pub fn card_handling_method(&self, name: &str) -> HandlingMethod {
        match name.parse() {
            Ok(method) => method,
            Err(err) => panic!("{err}"),
        }
    }

    // === Generals ===

    #[must_use]
    pub fn general(&self, name: &str) -> Option<&General> {
        let index = *self.general_names.get(name)?;
        Some(&self.generals[index])
    }

    /// Generals in registration order.
    pub fn generals(&self) -> impl Iterator<Item = &General> {
        self.generals.iter()
    }

    /// Whether a general is hidden from selection.
    ///
    /// A general hidden by definition stays hidden unless the config unhides
    /// it; any other general is hidden only if the config hides it.
    #[must_use]
    pub fn is_general_hidden(&self, name: &str) -> bool {
        let Some(general) = self.general(name) else {
            return false;
        };
        let listed = |list: &[String]| list.iter().any(|n| n == name);
        if general.is_hidden() {
            !listed(&self.config.removed_hidden_generals)
        } else {
            listed(&self.config.extra_hidden_generals)
        }
    }

    /// Names of visible lords.
    #[must_use]
    pub fn lord_list(&self) -> Vec<&str> {
        self.generals
            .iter()
            .filter(|g| g.is_lord() && !self.is_general_hidden(g.name()))
            .map(General::name)
            .collect()
    }

    /// Number of generals, optionally excluding banned packages.
    #[must_use]
    pub fn general_count(&self, include_banned: bool) -> usize {
        if include_banned {
            return self.generals.len();
        }
        self.generals
            .iter()
            .filter(|g| !self.config.is_package_banned(g.package()))
            .count()
    }

    /// Generals available for selection: not hidden, not in a banned
    /// package, not banned by name.
    #[must_use]
    pub fn limited_general_names(&self) -> Vec<&str> {
        self.generals
            .iter()
            .filter(|g| {
                !self.is_general_hidden(g.name())
                    && !self.config.is_package_banned(g.package())
                    && !self.config.is_general_banned(g.name())
            })
            .map(General::name)
            .collect()
    }

    /// Up to `count` random selectable generals outside `ban_set`.
    pub fn random_generals(
        &self,
        count: usize,
        ban_set: &FxHashSet<String>,
        rng: &mut GameRng,
    ) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .limited_general_names()
            .into_iter()
            .filter(|name| !ban_set.contains(*name))
            .collect();
        rng.shuffle(&mut names);
        names.truncate(count);
        names
    }

    /// Whether two generals form a companion pair.
    #[must_use]
    pub fn is_companion(&self, first: &str, second: &str) -> bool {
        let (Some(a), Some(b)) = (self.general(first), self.general(second)) else {
            return false;
        };
        a.kingdom() == b.kingdom()
            && (a.is_lord()
                || b.is_lord()
                || a.lists_companion(b.name())
                || b.lists_companion(a.name()))
    }

    // === Packages ===

    /// Registered package names, in order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(|(name, _)| name.as_str())
    }

    /// Registered packages except scenario content.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .filter(|(_, kind)| *kind != PackageKind::Special)
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn has_package(&self, name: &str) -> bool {
        self.packages.iter().any(|(n, _)| n == name)
    }

    // === Correction aggregators ===

    /// First ability forbidding `card` from `from` to `to`.
    #[must_use]
    pub fn is_prohibited(
        &self,
        view: &GameView<'_>,
        from: Option<PlayerId>,
        to: PlayerId,
        card: &Card,
        others: &[PlayerId],
    ) -> Option<&Ability> {
        self.kinds
            .prohibits
            .iter()
            .map(|&index| &self.abilities[index])
            .find(|ability| {
                ability
                    .as_prohibit()
                    .is_some_and(|p| p.is_prohibited(view, from, to, card, others))
            })
    }

    /// Sum of every distance correction.
    #[must_use]
    pub fn correct_distance(&self, view: &GameView<'_>, from: PlayerId, to: PlayerId) -> i32 {
        self.each(&self.kinds.distances, Ability::as_distance)
            .map(|d| d.correct(view, from, to))
            .sum()
    }

    /// Largest fixed distance; 0 when nobody fixes it.
    #[must_use]
    pub fn fixed_distance(&self, view: &GameView<'_>, from: PlayerId, to: PlayerId) -> i32 {
        self.each(&self.kinds.distances, Ability::as_distance)
            .map(|d| d.fixed(view, from, to))
            .fold(0, i32::max)
    }

    /// Hand-size correction: the largest fixed value, or the sum of extras.
    #[must_use]
    pub fn correct_max_cards(&self, view: &GameView<'_>, player: PlayerId, fixed: bool) -> i32 {
        let abilities = self.each(&self.kinds.max_hand_sizes, Ability::as_max_hand_size);
        if fixed {
            abilities.map(|a| a.fixed(view, player)).fold(0, i32::max)
        } else {
            abilities.map(|a| a.extra(view, player)).sum()
        }
    }

    /// Target-modifier correction for one knob.
    ///
    /// Only modifiers whose pattern matches `(from, card)` contribute. For
    /// knobs with a sentinel, the first uncapped answer is returned as is and
    /// later modifiers are not asked.
    #[must_use]
    pub fn correct_card_target(
        &self,
        kind: TargetModKind,
        view: &GameView<'_>,
        from: PlayerId,
        card: &Card,
    ) -> i32 {
        let player = view.room.try_player(from);
        let mut total = 0;
        for modifier in self.each(&self.kinds.target_modifiers, Ability::as_target_modifier) {
            if !modifier.applies_to(player, card) {
                continue;
            }
            let value = modifier.behavior().value(kind, view, from, card);
            if kind.has_sentinel() && is_uncapped(value) {
                return value;
            }
            total += value;
        }
        total
    }

    /// Attack-range correction: the largest fixed value, or the sum of
    /// extras.
    #[must_use]
    pub fn correct_attack_range(
        &self,
        view: &GameView<'_>,
        player: PlayerId,
        include_weapon: bool,
        fixed: bool,
    ) -> i32 {
        let abilities = self.each(&self.kinds.attack_ranges, Ability::as_attack_range);
        if fixed {
            abilities
                .map(|a| a.fixed(view, player, include_weapon))
                .fold(0, i32::max)
        } else {
            abilities.map(|a| a.extra(view, player, include_weapon)).sum()
        }
    }

    fn each<'a, T: ?Sized + 'a>(
        &'a self,
        indexes: &'a [usize],
        accessor: fn(&'a Ability) -> Option<&'a T>,
    ) -> impl Iterator<Item = &'a T> + 'a {
        indexes.iter().filter_map(move |&index| accessor(&self.abilities[index]))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("packages", &self.packages)
            .field("abilities", &self.abilities.len())
            .field("cards", &self.cards.len())
            .field("generals", &self.generals.len())
            .finish_non_exhaustive()
    }
}
