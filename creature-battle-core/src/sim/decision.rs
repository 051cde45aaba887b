//! The boundary contract between the engine and whatever selects actions:
//! a human at a prompt, a scripted test driver, or the bundled random AI.

use crate::sim::battle::Battle;
use crate::sim::creature::{CreatureId, Liveness};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionChoice {
    Fight,
    Switch,
    Run,
}

/// A chosen move slot plus an optional explicit target. A `None` target
/// lets the engine pick the default (first active foe) for single-target
/// moves; spread and self moves ignore it.
#[derive(Clone, Copy, Debug)]
pub struct MoveChoice {
    pub move_index: usize,
    pub target: Option<CreatureId>,
}

/// Supplies decisions to the engine. Implementations may block (e.g. on
/// stdin); the engine is fully synchronous and waits indefinitely.
///
/// `choose_switch` is only called with a non-empty candidate list: every
/// candidate is a healthy reserve combatant not already claimed by another
/// pending switch this round. `choose_move` must return a slot with uses
/// remaining; the engine substitutes Struggle itself when none exists.
pub trait DecisionProvider {
    fn choose_action(&mut self, battle: &Battle, actor: CreatureId) -> ActionChoice;
    fn choose_move(&mut self, battle: &Battle, actor: CreatureId) -> MoveChoice;
    fn choose_switch(
        &mut self,
        battle: &Battle,
        actor: CreatureId,
        candidates: &[CreatureId],
    ) -> Option<CreatureId>;
}

/// Seeded random selection: always fights when able, picks a uniformly
/// random usable move and a random healthy foe.
pub struct RandomDecider {
    rng: SmallRng,
}

impl RandomDecider {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }
}

impl DecisionProvider for RandomDecider {
    fn choose_action(&mut self, _battle: &Battle, _actor: CreatureId) -> ActionChoice {
        ActionChoice::Fight
    }

    fn choose_move(&mut self, battle: &Battle, actor: CreatureId) -> MoveChoice {
        let usable: Vec<usize> = battle
            .creature(actor)
            .moves
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.usable().then_some(idx))
            .collect();
        let move_index = usable.choose(&mut self.rng).copied().unwrap_or(0);
        let foes: Vec<CreatureId> = battle
            .side(actor.team.opponent())
            .active_ids()
            .into_iter()
            .filter(|&id| battle.creature(id).liveness() == Liveness::Active)
            .collect();
        MoveChoice {
            move_index,
            target: foes.choose(&mut self.rng).copied(),
        }
    }

    fn choose_switch(
        &mut self,
        _battle: &Battle,
        _actor: CreatureId,
        candidates: &[CreatureId],
    ) -> Option<CreatureId> {
        candidates.choose(&mut self.rng).copied()
    }
}

/// Plays back queued decisions in order, falling back to "fight with the
/// first move" when a queue runs dry. Intended for tests and demos.
#[derive(Default)]
pub struct ScriptedDecider {
    pub actions: VecDeque<ActionChoice>,
    pub moves: VecDeque<MoveChoice>,
    pub switches: VecDeque<CreatureId>,
}

impl ScriptedDecider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_action(mut self, action: ActionChoice) -> Self {
        self.actions.push_back(action);
        self
    }

    pub fn then_move(mut self, choice: MoveChoice) -> Self {
        self.moves.push_back(choice);
        self
    }

    pub fn then_switch(mut self, incoming: CreatureId) -> Self {
        self.switches.push_back(incoming);
        self
    }
}

impl DecisionProvider for ScriptedDecider {
    fn choose_action(&mut self, _battle: &Battle, _actor: CreatureId) -> ActionChoice {
        self.actions.pop_front().unwrap_or(ActionChoice::Fight)
    }

    fn choose_move(&mut self, _battle: &Battle, _actor: CreatureId) -> MoveChoice {
        self.moves
            .pop_front()
            .unwrap_or(MoveChoice { move_index: 0, target: None })
    }

    fn choose_switch(
        &mut self,
        _battle: &Battle,
        _actor: CreatureId,
        candidates: &[CreatureId],
    ) -> Option<CreatureId> {
        match self.switches.pop_front() {
            Some(id) if candidates.contains(&id) => Some(id),
            Some(_) | None => candidates.first().copied(),
        }
    }
}
