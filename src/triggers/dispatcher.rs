//! Trigger dispatcher.
//!
//! `raise_event` runs every trigger ability subscribed to an event through
//! `record`, `triggerable`, `cost` and `effect`:
//!
//! 1. Candidates are every ability in the registry's per-event index,
//!    ordered by their priority for this event (descending), ties broken by
//!    registration order.
//! 2. Every candidate that is global or owned by someone in the room records
//!    the event.
//! 3. Candidates are then visited in order. Ownership is checked again just
//!    before each `triggerable`, so an ability granted by an earlier effect
//!    still reacts. Reactor entries are visited in seat order from the
//!    current player; each named ability pays its cost and applies its
//!    effect. An effect returning `true` ends the dispatch.
//!
//! Effects may raise nested events through [`TriggerContext::raise`]; nesting
//! deeper than [`MAX_DISPATCH_DEPTH`] is refused.

use log::{debug, error, trace};

use crate::abilities::{Ability, TriggerAbility, TriggerList};
use crate::core::{PlayerId, RoomState};
use crate::registry::Registry;
use crate::rules::GameView;

use super::event::TriggerEvent;
use super::payload::EventPayload;

/// Maximum nesting of events raised from inside effects.
pub const MAX_DISPATCH_DEPTH: usize = 64;

/// Result of one dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// An effect stopped the dispatch.
    pub broken: bool,
    /// Reactors whose cost was paid, in invocation order.
    pub invoked: Vec<(PlayerId, String)>,
}

impl DispatchOutcome {
    /// Names of invoked abilities, in order.
    pub fn invoked_names(&self) -> impl Iterator<Item = &str> {
        self.invoked.iter().map(|(_, name)| name.as_str())
    }
}

/// Everything a trigger hook can see and change.
///
/// `room` and `payload` are exclusive borrows for the duration of one hook
/// call, so one ability's changes are visible to the next.
pub struct TriggerContext<'a> {
    pub registry: &'a Registry,
    pub room: &'a mut RoomState,
    pub event: TriggerEvent,
    pub target: Option<PlayerId>,
    pub payload: &'a mut EventPayload,
    ability: &'a str,
    owners: &'a [PlayerId],
    global: bool,
    depth: usize,
}

impl<'a> TriggerContext<'a> {
    /// Name of the ability whose hook is running.
    #[must_use]
    pub fn ability_name(&self) -> &str {
        self.ability
    }

    /// Players owning the running ability, in seat order.
    #[must_use]
    pub fn owners(&self) -> &[PlayerId] {
        self.owners
    }

    #[must_use]
    pub fn is_owner(&self, player: PlayerId) -> bool {
        self.owners.contains(&player)
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Nesting depth of this dispatch; 0 for events raised by the room.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Read-only view for the capability queries.
    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView::new(self.registry, self.room)
    }

    /// Raise a nested event with its own payload.
    pub fn raise(
        &mut self,
        event: TriggerEvent,
        target: Option<PlayerId>,
        payload: &mut EventPayload,
    ) -> DispatchOutcome {
        TriggerDispatcher {
            registry: self.registry,
            depth: self.depth + 1,
        }
        .raise_event(self.room, event, target, payload)
    }
}

struct Candidate<'r> {
    index: usize,
    ability: &'r Ability,
    trigger: &'r TriggerAbility,
}

/// Runs trigger abilities for raised events.
#[derive(Clone, Copy, Debug)]
pub struct TriggerDispatcher<'r> {
    registry: &'r Registry,
    depth: usize,
}

impl<'r> TriggerDispatcher<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry, depth: 0 }
    }

    /// Dispatch `event` in `room`. The payload is rewritten in place.
    pub fn raise_event(
        &self,
        room: &mut RoomState,
        event: TriggerEvent,
        target: Option<PlayerId>,
        payload: &mut EventPayload,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        if self.depth >= MAX_DISPATCH_DEPTH {
            error!("{event} raised at nesting depth {}, refusing to dispatch", self.depth);
            return outcome;
        }

        let candidates = self.candidates(event);
        trace!("{event}: {} candidate(s) at depth {}", candidates.len(), self.depth);

        for candidate in &candidates {
            let owners = self.registry.owners(room, candidate.ability);
            if !candidate.trigger.is_global() && owners.is_empty() {
                continue;
            }
            let mut ctx = self.context(room, event, target, payload, candidate, &owners);
            candidate.trigger.behavior().record(&mut ctx);
        }

        for candidate in &candidates {
            let owners = self.registry.owners(room, candidate.ability);
            if !candidate.trigger.is_global() && owners.is_empty() {
                trace!("{event}: {} has no owner, skipped", candidate.ability.name());
                continue;
            }

            let reactors = {
                let ctx = self.context(room, event, target, payload, candidate, &owners);
                candidate.trigger.behavior().triggerable(&ctx)
            };
            let reactors = order_reactors(room, candidate.trigger, &owners, reactors);

            for (who, names) in reactors {
                for name in names {
                    if self.invoke(room, event, target, payload, who, &name, &mut outcome) {
                        outcome.broken = true;
                        trace!("{event}: dispatch broken by {name} for {who}");
                        return outcome;
                    }
                }
            }
        }

        outcome
    }

    /// Subscribed abilities in dispatch order. Ownership is left to the caller.
    fn candidates(&self, event: TriggerEvent) -> Vec<Candidate<'r>> {
        let mut candidates: Vec<Candidate<'r>> = self
            .registry
            .triggers_for(event)
            .filter_map(|(index, ability)| {
                let trigger = ability.as_trigger()?;
                Some(Candidate { index, ability, trigger })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.trigger
                .priority(event)
                .total_cmp(&a.trigger.priority(event))
                .then_with(|| a.index.cmp(&b.index))
        });
        candidates
    }

    /// Cost and effect of one named ability for one reactor. Returns whether
    /// the dispatch is broken.
    #[allow(clippy::too_many_arguments)]
    fn invoke(
        &self,
        room: &mut RoomState,
        event: TriggerEvent,
        target: Option<PlayerId>,
        payload: &mut EventPayload,
        who: PlayerId,
        name: &str,
        outcome: &mut DispatchOutcome,
    ) -> bool {
        let Some((index, ability)) = self.registry.ability_entry(name) else {
            debug!("{event}: reactor {who} names unknown ability {name}");
            return false;
        };
        let Some(trigger) = ability.as_trigger() else {
            debug!("{event}: reactor {who} names non-trigger ability {name}");
            return false;
        };

        let candidate = Candidate { index, ability, trigger };
        let owners = self.registry.owners(room, ability);
        let mut ctx = self.context(room, event, target, payload, &candidate, &owners);

        if !trigger.behavior().cost(&mut ctx, who) {
            trace!("{event}: {name} cost not paid by {who}");
            return false;
        }
        if ctx.room.try_player(who).is_some() {
            ctx.room.player_mut(who).add_history(name);
        }
        outcome.invoked.push((who, name.to_string()));
        trace!("{event}: {name} takes effect for {who}");

        trigger.behavior().effect(&mut ctx, who)
    }

    fn context<'c>(
        &self,
        room: &'c mut RoomState,
        event: TriggerEvent,
        target: Option<PlayerId>,
        payload: &'c mut EventPayload,
        candidate: &'c Candidate<'r>,
        owners: &'c [PlayerId],
    ) -> TriggerContext<'c>
    where
        'r: 'c,
    {
        TriggerContext {
            registry: self.registry,
            room,
            event,
            target,
            payload,
            ability: candidate.ability.name(),
            owners,
            global: candidate.trigger.is_global(),
            depth: self.depth,
        }
    }
}

/// Drop reactors that may not use a non-global ability, then sort the rest
/// by seat order from the current player.
fn order_reactors(
    room: &RoomState,
    trigger: &TriggerAbility,
    owners: &[PlayerId],
    mut reactors: TriggerList,
) -> TriggerList {
    if !trigger.is_global() {
        reactors.retain(|(who, _)| owners.contains(who));
    }
    let seats: Vec<PlayerId> = PlayerId::order_from(room.current, room.player_count()).collect();
    reactors.sort_by_key(|(who, _)| seats.iter().position(|s| s == who).unwrap_or(usize::MAX));
    reactors
}
