//! Move behavior execution. The turn engine has already resolved the
//! move definition, spent a use, announced it, and run the hit check;
//! this module applies what the move actually does to one target.

use anyhow::Result;
use rand::Rng;

use crate::data::effects::get_effect;
use crate::data::moves::{MoveBehavior, MoveDef};
use crate::sim::battle::Battle;
use crate::sim::creature::{CreatureId, Liveness};
use crate::sim::{damage, effects};

/// Applies `def` from `user` to one resolved `target`. `target_count` is
/// the number of targets the move resolved against this execution, for
/// the spread penalty.
pub(crate) fn execute(
    battle: &mut Battle,
    def: &'static MoveDef,
    user: CreatureId,
    target: CreatureId,
    target_count: usize,
) -> Result<()> {
    match def.behavior {
        MoveBehavior::Strike { effect, crit_boost, recoil } => {
            strike(battle, def, user, target, target_count, effect, crit_boost, recoil)
        }
        MoveBehavior::Afflict { effect } => {
            if battle.creature(target).status.is_some() {
                battle.emit("But it failed!");
                Ok(())
            } else {
                effects::add_effect(battle, effect, Some(user), Some(target))
            }
        }
        MoveBehavior::Ward { effect } => {
            effects::add_effect(battle, effect, Some(user), Some(user))
        }
        MoveBehavior::StatShift { stage, delta } => {
            battle.creature_mut(target).stages.shift(stage, delta);
            let line = format!(
                "{}'s {} {}!",
                battle.creature(target).ident(),
                stage.label(),
                if delta > 0 { "rose" } else { "fell" },
            );
            battle.emit(line);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn strike(
    battle: &mut Battle,
    def: &'static MoveDef,
    user: CreatureId,
    target: CreatureId,
    target_count: usize,
    effect: Option<crate::data::moves::SecondaryEffect>,
    crit_boost: i8,
    recoil: Option<f32>,
) -> Result<()> {
    let crit_stage = battle
        .creature(user)
        .stages
        .crit
        .saturating_add(crit_boost);
    let crit = damage::crit_check(crit_stage, &mut battle.rng);
    let factor: f32 = battle.rng.gen_range(0.85..=1.0);
    let weather = battle.weather;

    let rolled = {
        let attacker = battle.creature(user);
        let defender = battle.creature(target);
        damage::damage_roll(def, attacker, defender, weather, target_count, crit, factor)
    };
    if crit && rolled > 0 {
        battle.emit("A critical hit!");
    }
    match damage::weather_affinity(def.move_type, weather) {
        w if w > 1.0 => battle.emit("The weather empowered the attack!"),
        w if w < 1.0 => battle.emit("The weather weakened the attack..."),
        _ => {}
    }
    let dealt = battle.creature_mut(target).take_damage(rolled);

    if let Some(fraction) = recoil {
        let kickback = (dealt as f32 * fraction).floor() as u16;
        if kickback > 0 {
            battle.creature_mut(user).take_damage(kickback);
            let line = format!(
                "{} received some recoil damage.",
                battle.creature(user).ident()
            );
            battle.emit(line);
        }
    }

    if let Some(secondary) = effect {
        let edef = get_effect(secondary.effect)?;
        let slot_free =
            !effects::sets_status(edef) || battle.creature(target).status.is_none();
        let target_up = battle.creature(target).liveness() == Liveness::Active;
        if slot_free && target_up && battle.rng.gen_bool(secondary.chance) {
            effects::add_effect(battle, secondary.effect, Some(user), Some(target))?;
        }
    }
    Ok(())
}

/// Hook run when a move is declared, before any hit check. No catalog
/// move currently reacts here; the dispatch point keeps the declaration
/// order fixed.
pub(crate) fn on_use(battle: &mut Battle, def: &'static MoveDef, user: CreatureId) {
    let _ = (battle, def, user);
}

/// Hook run when a move misses one of its targets.
pub(crate) fn on_miss(battle: &mut Battle, def: &'static MoveDef, user: CreatureId) {
    let _ = (battle, def, user);
}
