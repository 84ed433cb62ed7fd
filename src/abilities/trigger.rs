//! Trigger abilities.
//!
//! A trigger ability subscribes to one or more [`TriggerEvent`]s and runs
//! through the dispatcher's lifecycle for each raised event:
//!
//! 1. `record` - bookkeeping, never blocks
//! 2. `triggerable` - who may react, with which ability names
//! 3. `cost` - per reactor; `false` skips the reactor
//! 4. `effect` - per reactor; `true` stops the whole dispatch
//!
//! ## Families
//!
//! `TriggerFamily` replaces the specialised subclasses. The family fixes the
//! default priority, the ownership rule (equipment families are owned by
//! whoever has the card equipped) and, for the adapter families, a canned
//! behaviour built from a closure:
//!
//! | Family | Reacts to | Default priority |
//! |---|---|---|
//! | `GameRule` | anything, global | -1 |
//! | `Ordinary`, adapters | anything | 0 |
//! | `Weapon`, `Armor`, `Treasure` | anything | 1 |
//! | `FakeMove` | card moves while flagged, global | 10 |

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::sync::Arc;

use crate::cards::EquipSlot;
use crate::core::{Phase, PlayerId};
use crate::triggers::{DamageStruct, TriggerContext, TriggerEvent};

/// Ability names one reactor may invoke.
pub type ReactorNames = SmallVec<[String; 2]>;

/// Reactors for one event instance: (player, ability names).
pub type TriggerList = Vec<(PlayerId, ReactorNames)>;

/// The four lifecycle hooks. All have defaults.
pub trait TriggerBehavior: Send + Sync {
    /// Observe the event before anyone reacts.
    fn record(&self, _ctx: &mut TriggerContext<'_>) {}

    /// Who may react.
    fn triggerable(&self, ctx: &TriggerContext<'_>) -> TriggerList {
        default_triggerable(ctx)
    }

    /// Pay the activation cost. `false` skips this reactor.
    fn cost(&self, _ctx: &mut TriggerContext<'_>, _ask_who: PlayerId) -> bool {
        true
    }

    /// Apply the ability. `true` stops the dispatch.
    fn effect(&self, _ctx: &mut TriggerContext<'_>, _ask_who: PlayerId) -> bool {
        false
    }
}

/// The event target reacts with this ability, if alive and entitled to it.
///
/// Global abilities accept any living target; others require the target to
/// own the ability.
#[must_use]
pub fn default_triggerable(ctx: &TriggerContext<'_>) -> TriggerList {
    let Some(target) = ctx.target else {
        return TriggerList::new();
    };
    let alive = ctx.room.try_player(target).is_some_and(|p| p.alive);
    if alive && (ctx.is_global() || ctx.is_owner(target)) {
        vec![(target, smallvec![ctx.ability_name().to_string()])]
    } else {
        TriggerList::new()
    }
}

/// Kind of trigger ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerFamily {
    Ordinary,
    GameRule,
    Weapon,
    Armor,
    Treasure,
    Masochism,
    PhaseChange,
    DrawCards,
    GameStart,
    FakeMove,
    DetachEffect,
}

impl TriggerFamily {
    /// Priority used for events without an override.
    #[must_use]
    pub const fn default_priority(self) -> f64 {
        match self {
            Self::GameRule => -1.0,
            Self::Weapon | Self::Armor | Self::Treasure => 1.0,
            Self::FakeMove => 10.0,
            Self::Ordinary
            | Self::Masochism
            | Self::PhaseChange
            | Self::DrawCards
            | Self::GameStart
            | Self::DetachEffect => 0.0,
        }
    }

    /// Owned through an equipped card rather than an ability list.
    #[must_use]
    pub const fn is_equip(self) -> bool {
        matches!(self, Self::Weapon | Self::Armor | Self::Treasure)
    }

    /// Equip slot of an equipment family.
    #[must_use]
    pub const fn equip_slot(self) -> Option<EquipSlot> {
        match self {
            Self::Weapon => Some(EquipSlot::Weapon),
            Self::Armor => Some(EquipSlot::Armor),
            Self::Treasure => Some(EquipSlot::Treasure),
            _ => None,
        }
    }
}

/// Trigger-specific part of an ability.
#[derive(Clone)]
pub struct TriggerAbility {
    family: TriggerFamily,
    events: SmallVec<[TriggerEvent; 4]>,
    priorities: FxHashMap<TriggerEvent, f64>,
    global: bool,
    view_as_skill: Option<String>,
    behavior: Arc<dyn TriggerBehavior>,
}

impl TriggerAbility {
    /// A trigger of any family with a custom behaviour.
    pub fn new(
        family: TriggerFamily,
        events: impl IntoIterator<Item = TriggerEvent>,
        behavior: impl TriggerBehavior + 'static,
    ) -> Self {
        let mut subscribed: SmallVec<[TriggerEvent; 4]> = SmallVec::new();
        for event in events {
            if !subscribed.contains(&event) {
                subscribed.push(event);
            }
        }
        Self {
            family,
            events: subscribed,
            priorities: FxHashMap::default(),
            global: matches!(family, TriggerFamily::GameRule | TriggerFamily::FakeMove),
            view_as_skill: None,
            behavior: Arc::new(behavior),
        }
    }

    /// An ordinary trigger whose only custom hook is its effect.
    pub fn on_effect<F>(events: impl IntoIterator<Item = TriggerEvent>, effect: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_>, PlayerId) -> bool + Send + Sync + 'static,
    {
        Self::new(TriggerFamily::Ordinary, events, EffectFn(effect))
    }

    /// A global game rule.
    pub fn game_rule(
        events: impl IntoIterator<Item = TriggerEvent>,
        behavior: impl TriggerBehavior + 'static,
    ) -> Self {
        Self::new(TriggerFamily::GameRule, events, behavior)
    }

    /// An equipment trigger owned by whoever has the card with the ability's
    /// name equipped.
    pub fn equip(
        slot: EquipSlot,
        events: impl IntoIterator<Item = TriggerEvent>,
        behavior: impl TriggerBehavior + 'static,
    ) -> Self {
        let family = match slot {
            EquipSlot::Armor => TriggerFamily::Armor,
            EquipSlot::Treasure => TriggerFamily::Treasure,
            EquipSlot::Weapon | EquipSlot::DefensiveHorse | EquipSlot::OffensiveHorse => {
                TriggerFamily::Weapon
            }
        };
        Self::new(family, events, behavior)
    }

    /// Reacts after its owner takes damage.
    pub fn masochism<F>(on_damaged: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_>, PlayerId, &DamageStruct) + Send + Sync + 'static,
    {
        Self::new(TriggerFamily::Masochism, [TriggerEvent::Damaged], Masochism(on_damaged))
    }

    /// Reacts when its owner's `phase` starts. The closure's result stops the
    /// dispatch (e.g. a skipped phase).
    pub fn phase_change<F>(phase: Phase, on_phase: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_>, PlayerId) -> bool + Send + Sync + 'static,
    {
        Self::new(
            TriggerFamily::PhaseChange,
            [TriggerEvent::EventPhaseStart],
            PhaseChange { phase, on_phase },
        )
    }

    /// Rewrites the number of cards its owner draws in the draw phase.
    pub fn draw_cards<F>(draw_num: F) -> Self
    where
        F: Fn(&TriggerContext<'_>, PlayerId, i32) -> i32 + Send + Sync + 'static,
    {
        Self::new(TriggerFamily::DrawCards, [TriggerEvent::DrawNCards], DrawCards(draw_num))
    }

    /// Runs once for its owner when the game starts.
    pub fn game_start<F>(on_start: F) -> Self
    where
        F: Fn(&mut TriggerContext<'_>, PlayerId) + Send + Sync + 'static,
    {
        Self::new(TriggerFamily::GameStart, [TriggerEvent::GameStart], GameStart(on_start))
    }

    /// Swallows card-move events while any player carries the
    /// `<skill_name>_InTempMoving` flag.
    pub fn fake_move(skill_name: &str) -> Self {
        Self::new(
            TriggerFamily::FakeMove,
            [TriggerEvent::BeforeCardsMove, TriggerEvent::CardsMoveOneTime],
            FakeMove { flag: fake_move_flag(skill_name) },
        )
    }

    /// Clears `pile` from the player who loses `skill_name`.
    pub fn detach_effect(skill_name: impl Into<String>, pile: impl Into<String>) -> Self {
        Self::new(
            TriggerFamily::DetachEffect,
            [TriggerEvent::EventLoseSkill],
            DetachEffect { skill: skill_name.into(), pile: pile.into() },
        )
    }

    /// Override the priority for one event.
    #[must_use]
    pub fn with_priority(mut self, event: TriggerEvent, priority: f64) -> Self {
        self.priorities.insert(event, priority);
        self
    }

    /// Override the priority for every subscribed event.
    #[must_use]
    pub fn with_default_priority(mut self, priority: f64) -> Self {
        for &event in &self.events {
            self.priorities.insert(event, priority);
        }
        self
    }

    /// Take part in every dispatch, owned or not.
    #[must_use]
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Attach a view-as ability by name.
    #[must_use]
    pub fn with_view_as_skill(mut self, name: impl Into<String>) -> Self {
        self.view_as_skill = Some(name.into());
        self
    }

    #[must_use]
    pub fn family(&self) -> TriggerFamily {
        self.family
    }

    /// Subscribed events, in subscription order.
    #[must_use]
    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    #[must_use]
    pub fn triggers_on(&self, event: TriggerEvent) -> bool {
        self.events.contains(&event)
    }

    /// Priority for an event; higher runs first.
    #[must_use]
    pub fn priority(&self, event: TriggerEvent) -> f64 {
        self.priorities
            .get(&event)
            .copied()
            .unwrap_or_else(|| self.family.default_priority())
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.global
    }

    #[must_use]
    pub fn is_equip(&self) -> bool {
        self.family.is_equip()
    }

    /// Name of the attached view-as ability.
    #[must_use]
    pub fn view_as_skill(&self) -> Option<&str> {
        self.view_as_skill.as_deref()
    }

    #[must_use]
    pub fn behavior(&self) -> &dyn TriggerBehavior {
        self.behavior.as_ref()
    }
}

impl fmt::Debug for TriggerAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerAbility")
            .field("family", &self.family)
            .field("events", &self.events)
            .field("priorities", &self.priorities)
            .field("global", &self.global)
            .field("view_as_skill", &self.view_as_skill)
            .finish_non_exhaustive()
    }
}

/// Flag a player carries while cards move on behalf of `skill_name`.
#[must_use]
pub fn fake_move_flag(skill_name: &str) -> String {
    format!("{skill_name}_InTempMoving")
}

struct EffectFn<F>(F);

impl<F> TriggerBehavior for EffectFn<F>
where
    F: Fn(&mut TriggerContext<'_>, PlayerId) -> bool + Send + Sync,
{
    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        (self.0)(ctx, ask_who)
    }
}

struct Masochism<F>(F);

impl<F> TriggerBehavior for Masochism<F>
where
    F: Fn(&mut TriggerContext<'_>, PlayerId, &DamageStruct) + Send + Sync,
{
    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        if let Some(damage) = ctx.payload.damage().cloned() {
            (self.0)(ctx, ask_who, &damage);
        }
        false
    }
}

struct PhaseChange<F> {
    phase: Phase,
    on_phase: F,
}

impl<F> TriggerBehavior for PhaseChange<F>
where
    F: Fn(&mut TriggerContext<'_>, PlayerId) -> bool + Send + Sync,
{
    fn triggerable(&self, ctx: &TriggerContext<'_>) -> TriggerList {
        if ctx.payload.phase() == Some(self.phase) {
            default_triggerable(ctx)
        } else {
            TriggerList::new()
        }
    }

    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        (self.on_phase)(ctx, ask_who)
    }
}

struct DrawCards<F>(F);

impl<F> TriggerBehavior for DrawCards<F>
where
    F: Fn(&TriggerContext<'_>, PlayerId, i32) -> i32 + Send + Sync,
{
    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        if let Some(n) = ctx.payload.count() {
            let rewritten = (self.0)(ctx, ask_who, n);
            if let Some(count) = ctx.payload.count_mut() {
                *count = rewritten;
            }
        }
        false
    }
}

struct GameStart<F>(F);

impl<F> TriggerBehavior for GameStart<F>
where
    F: Fn(&mut TriggerContext<'_>, PlayerId) + Send + Sync,
{
    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        (self.0)(ctx, ask_who);
        false
    }
}

struct FakeMove {
    flag: String,
}

impl TriggerBehavior for FakeMove {
    fn triggerable(&self, ctx: &TriggerContext<'_>) -> TriggerList {
        let flagged = ctx.room.players().any(|p| p.alive && p.has_flag(&self.flag));
        if !flagged {
            return TriggerList::new();
        }
        let who = ctx.target.unwrap_or(ctx.room.current);
        vec![(who, smallvec![ctx.ability_name().to_string()])]
    }

    fn effect(&self, _ctx: &mut TriggerContext<'_>, _ask_who: PlayerId) -> bool {
        true
    }
}

struct DetachEffect {
    skill: String,
    pile: String,
}

impl TriggerBehavior for DetachEffect {
    fn triggerable(&self, ctx: &TriggerContext<'_>) -> TriggerList {
        if ctx.payload.skill_name() == Some(self.skill.as_str()) {
            default_triggerable(ctx)
        } else {
            TriggerList::new()
        }
    }

    fn effect(&self, ctx: &mut TriggerContext<'_>, ask_who: PlayerId) -> bool {
        ctx.room.clear_pile(ask_who, &self.pile);
        false
    }
}
