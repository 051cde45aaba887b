//! The effect ledger: the engine's live registry of active effect
//! instances, plus creation/execute/deletion dispatch over their
//! behavior variants.

use crate::data::effects::{
    get_effect, DurationSpec, EffectDef, EffectKind, EffectTargeting, Trigger,
};
use crate::sim::battle::Battle;
use crate::sim::creature::{CreatureId, Liveness, Status};
use crate::sim::damage;
use anyhow::Result;
use rand::Rng;

/// An active, possibly-targeted modifier living in the ledger.
#[derive(Clone, Copy, Debug)]
pub struct EffectInstance {
    pub def: &'static EffectDef,
    /// Remaining duration; `None` is unbounded.
    pub duration: Option<u32>,
    /// Per-turn counter for escalating effects, starting at 1.
    pub turn: u32,
    pub owner: Option<CreatureId>,
    pub target: Option<CreatureId>,
}

impl EffectInstance {
    fn expired(&self) -> bool {
        matches!(self.duration, Some(0))
    }
}

/// Positionally stable storage: removed instances leave a hole so indices
/// held across re-entrant trigger dispatch stay valid.
#[derive(Clone, Debug, Default)]
pub struct EffectLedger {
    entries: Vec<Option<EffectInstance>>,
}

impl EffectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn slots(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&EffectInstance> {
        self.entries.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut EffectInstance> {
        self.entries.get_mut(idx).and_then(Option::as_mut)
    }

    pub(crate) fn push(&mut self, instance: EffectInstance) {
        self.entries.push(Some(instance));
    }

    pub(crate) fn remove(&mut self, idx: usize) {
        if let Some(entry) = self.entries.get_mut(idx) {
            *entry = None;
        }
    }

    /// Number of live instances.
    pub fn active_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.entries.iter().flatten()
    }

    pub fn contains(
        &self,
        def: &'static EffectDef,
        owner: Option<CreatureId>,
        target: Option<CreatureId>,
    ) -> bool {
        self.iter().any(|inst| {
            inst.def.name == def.name && inst.owner == owner && inst.target == target
        })
    }

    /// Hard removal of every switch-bound instance targeting the departing
    /// combatant. Deliberately skips the deletion hook: effects dismissed
    /// by a switch must not fire.
    pub(crate) fn purge_switch_bound(&mut self, departing: CreatureId) {
        for entry in self.entries.iter_mut() {
            if let Some(inst) = entry {
                if inst.def.end_on_switch && inst.target == Some(departing) {
                    *entry = None;
                }
            }
        }
    }
}

/// Whether creating this effect would claim the target's status slot.
pub(crate) fn sets_status(def: &EffectDef) -> bool {
    matches!(
        def.kind,
        EffectKind::Condition { .. } | EffectKind::Residual { .. }
    )
}

/// Instantiates an effect by name and runs its creation hook against every
/// resolved target. A duplicate (name, owner, target) triple is a no-op.
pub(crate) fn add_effect(
    battle: &mut Battle,
    name: &str,
    owner: Option<CreatureId>,
    target: Option<CreatureId>,
) -> Result<()> {
    let def = get_effect(name)?;
    if battle.ledger.contains(def, owner, target) {
        return Ok(());
    }
    let duration = match def.duration {
        DurationSpec::Turns(n) => Some(n),
        DurationSpec::Random(lo, hi) => Some(battle.rng.gen_range(lo..=hi)),
        DurationSpec::Unbounded => None,
    };
    let instance = EffectInstance { def, duration, turn: 1, owner, target };
    for resolved in resolve_targets(battle, &instance) {
        run_creation(battle, def, resolved);
    }
    battle.ledger.push(instance);
    Ok(())
}

/// Resolves an instance's targeting mode to concrete combatants. Self
/// targeting is never filtered by liveness, since death-triggered effects
/// must still resolve against the dying combatant; everything else keeps
/// only active, healthy targets.
pub(crate) fn resolve_targets(battle: &Battle, instance: &EffectInstance) -> Vec<CreatureId> {
    let ids: Vec<CreatureId> = match instance.def.targeting {
        EffectTargeting::User => return instance.owner.into_iter().collect(),
        EffectTargeting::Single => match instance.target {
            Some(t) if battle.is_active_slot(t) => vec![t],
            _ => Vec::new(),
        },
        EffectTargeting::AlliesOfUser => match instance.owner {
            Some(owner) => battle.side(owner.team).active_ids(),
            None => Vec::new(),
        },
        EffectTargeting::FoesOfUser => match instance.owner {
            Some(owner) => battle.side(owner.team.opponent()).active_ids(),
            None => Vec::new(),
        },
        EffectTargeting::AllActive => battle.active_ids(),
    };
    ids.into_iter()
        .filter(|&id| battle.creature(id).liveness() == Liveness::Active)
        .collect()
}

/// Applies one ledger slot: runs the deletion hook and removes the
/// instance when its duration has run out, otherwise runs the per-turn
/// execute hook. Health is clamped and deaths are processed after every
/// target.
pub(crate) fn apply_effect(battle: &mut Battle, idx: usize, order: &[CreatureId]) {
    let Some(instance) = battle.ledger.get(idx) else {
        return;
    };
    let def = instance.def;
    let owner = instance.owner;
    let turn = instance.turn;
    let expired = instance.expired();
    let targets = resolve_targets(battle, instance);

    for target in targets {
        if expired {
            run_deletion(battle, def, owner, target);
        } else {
            run_execute(battle, def, target, turn);
        }
        battle.clamp_active_health();
        battle.check_death(order);
    }

    if expired {
        battle.ledger.remove(idx);
    }
}

fn run_creation(battle: &mut Battle, def: &'static EffectDef, target: CreatureId) {
    let name = battle.creature(target).name.clone();
    match def.kind {
        EffectKind::Condition { status, blocks_attack } => {
            let c = battle.creature_mut(target);
            c.status = Some(status);
            if blocks_attack {
                c.can_attack = false;
            }
            let line = match status {
                Status::Frozen => format!("{name} was frozen solid!"),
                Status::Asleep => format!("{name} fell asleep!"),
                Status::Paralyzed => format!("{name} is paralyzed! It may be unable to move!"),
                _ => format!("{name} was afflicted by {}!", def.name),
            };
            battle.emit(line);
        }
        EffectKind::Residual { status, .. } => {
            battle.creature_mut(target).status = Some(status);
            let line = match status {
                Status::Burned => format!("{name} was burned!"),
                Status::Poisoned => format!("{name} was poisoned!"),
                Status::Toxic => format!("{name} was badly poisoned!"),
                _ => format!("{name} was afflicted by {}!", def.name),
            };
            battle.emit(line);
        }
        EffectKind::Confusion { .. } => {
            battle.emit(format!("{name} became confused!"));
        }
        EffectKind::DestinyBond => {
            battle.emit(format!("{name} is trying to take its foe down with it!"));
        }
    }
}

fn run_execute(battle: &mut Battle, def: &'static EffectDef, target: CreatureId, turn: u32) {
    let name = battle.creature(target).name.clone();
    match def.kind {
        EffectKind::Condition { status, blocks_attack } => {
            if blocks_attack {
                battle.creature_mut(target).can_attack = false;
            }
            let line = match status {
                Status::Frozen => format!("{name} is frozen solid."),
                Status::Asleep => format!("{name} is fast asleep."),
                _ => format!("{name} is afflicted by {}.", def.name),
            };
            battle.emit(line);
        }
        EffectKind::Residual { status, denom, escalating } => {
            let max_hp = battle.creature(target).max_hp;
            let per_tick = (max_hp as u32 / denom as u32).max(1);
            let scaled = if escalating { per_tick * turn } else { per_tick };
            let damage = scaled.min(u16::MAX as u32) as u16;
            battle.creature_mut(target).take_damage(damage);
            let line = match status {
                Status::Burned => format!("{name} is hurt by its burn."),
                _ => format!("{name} is hurt by poison."),
            };
            battle.emit(line);
        }
        EffectKind::Confusion { power } => {
            battle.emit(format!("{name} is confused!"));
            if battle.rng.gen_bool(0.5) {
                let victim = battle.creature(target);
                let damage = damage::confusion_strike(victim, power);
                let c = battle.creature_mut(target);
                c.can_attack = false;
                c.take_damage(damage);
                battle.emit(format!("{name} hurt itself in its confusion!"));
            }
        }
        EffectKind::DestinyBond => {}
    }
}

fn run_deletion(
    battle: &mut Battle,
    def: &'static EffectDef,
    owner: Option<CreatureId>,
    target: CreatureId,
) {
    let name = battle.creature(target).name.clone();
    match def.kind {
        EffectKind::Condition { status, blocks_attack } => {
            let c = battle.creature_mut(target);
            if c.status == Some(status) {
                c.status = None;
            }
            if blocks_attack {
                c.can_attack = true;
            }
            let line = match status {
                Status::Frozen => format!("{name} thawed out!"),
                Status::Asleep => format!("{name} woke up!"),
                _ => format!("{name} recovered from {}.", def.name),
            };
            battle.emit(line);
        }
        EffectKind::Residual { status, .. } => {
            let c = battle.creature_mut(target);
            if c.status == Some(status) {
                c.status = None;
            }
            battle.emit(format!("{name} recovered from its {}.", def.name));
        }
        EffectKind::Confusion { .. } => {
            battle.emit(format!("{name} snapped out of confusion!"));
        }
        EffectKind::DestinyBond => {
            let Some(owner) = owner else { return };
            let Some(last) = battle.creature(owner).last_hit_by else {
                return;
            };
            let attacker = last.attacker;
            if attacker.team == owner.team {
                return;
            }
            if battle.creature(attacker).liveness() != Liveness::Active {
                return;
            }
            let attacker_name = battle.creature(attacker).name.clone();
            let hp = battle.creature(attacker).current_hp;
            battle.creature_mut(attacker).take_damage(hp);
            battle.emit(format!("{name} took {attacker_name} down with it!"));
        }
    }
}
