//! Hit, critical-hit and damage computations. The damage roll itself is a
//! pure function: the crit flag and the random factor are parameters so
//! callers (and tests) control every draw.

use crate::data::moves::{Accuracy, MoveDef, MoveTargeting};
use crate::data::types::{affinity_dual, Category, Type};
use crate::sim::battle::Weather;
use crate::sim::creature::{Creature, Status};
use crate::sim::stats::{accuracy_multiplier, effective_stat};
use rand::Rng;

/// Accuracy check combining the attacker's accuracy stage and the
/// defender's evasion stage. Always-hit moves bypass the roll.
pub fn hit_check(
    def: &MoveDef,
    attacker: &Creature,
    defender: &Creature,
    rng: &mut impl Rng,
) -> bool {
    let percent = match def.accuracy {
        Accuracy::AlwaysHits => return true,
        Accuracy::Percent(p) => p,
    };
    let stage = (attacker.stages.accuracy - defender.stages.evasion).clamp(-6, 6);
    percent as f32 / 100.0 * accuracy_multiplier(stage) >= rng.gen::<f32>()
}

/// Critical-hit roll: 1/24 at stage 0 or below, 1/8 at 1, 1/2 at 2,
/// guaranteed at 3 and above.
pub fn crit_check(crit_stage: i8, rng: &mut impl Rng) -> bool {
    match crit_stage {
        s if s <= 0 => rng.gen_bool(1.0 / 24.0),
        1 => rng.gen_bool(1.0 / 8.0),
        2 => rng.gen_bool(0.5),
        _ => true,
    }
}

/// Weather multiplier for a move's type: boosting weather is 1.5, the
/// opposing weather 0.5.
pub fn weather_affinity(move_type: Type, weather: Weather) -> f32 {
    match (move_type, weather) {
        (Type::Fire, Weather::Sunny) | (Type::Water, Weather::Rain) => 1.5,
        (Type::Fire, Weather::Rain) | (Type::Water, Weather::Sunny) => 0.5,
        _ => 1.0,
    }
}

/// The full damage pipeline for one target. On a critical hit the
/// attacker's offensive stage is floored at 0 and the defender's
/// defensive stage capped at 0 for this calculation only. `random_factor`
/// must lie in [0.85, 1.0].
pub fn damage_roll(
    def: &MoveDef,
    attacker: &Creature,
    defender: &Creature,
    weather: Weather,
    target_count: usize,
    crit: bool,
    random_factor: f32,
) -> u16 {
    debug_assert!(def.category != Category::Status, "status moves deal no damage");
    let (attack_base, attack_stage) = match def.category {
        Category::Physical => (attacker.attack, attacker.stages.attack),
        _ => (attacker.sp_attack, attacker.stages.sp_attack),
    };
    let (defense_base, defense_stage) = match def.category {
        Category::Physical => (defender.defense, defender.stages.defense),
        _ => (defender.sp_defense, defender.stages.sp_defense),
    };
    let attack_stage = if crit { attack_stage.max(0) } else { attack_stage };
    let defense_stage = if crit { defense_stage.min(0) } else { defense_stage };

    let offense = effective_stat(attack_base, attack_stage) as f32;
    let guard = effective_stat(defense_base, defense_stage) as f32;
    let base =
        ((2.0 * attacker.level as f32 / 5.0 + 2.0) * def.power as f32 * offense / guard) / 50.0
            + 2.0;

    let spread = if target_count > 1 && def.targeting == MoveTargeting::AllFoes {
        0.75
    } else {
        1.0
    };
    let weather = weather_affinity(def.move_type, weather);
    let crit_mult = if crit { 1.5 } else { 1.0 };
    let stab = if attacker.has_type(def.move_type) { 1.5 } else { 1.0 };
    let affinity = affinity_dual(def.move_type, defender.primary_type, defender.secondary_type);
    let burn = if def.category == Category::Physical && attacker.status == Some(Status::Burned) {
        0.5
    } else {
        1.0
    };

    (base * spread * weather * crit_mult * random_factor * stab * affinity * burn)
        .floor()
        .max(0.0) as u16
}

/// Typeless self-inflicted confusion hit: the plain base formula with the
/// combatant's own attack against its own defense, no multipliers.
pub fn confusion_strike(victim: &Creature, power: u16) -> u16 {
    let offense = effective_stat(victim.attack, victim.stages.attack) as f32;
    let guard = effective_stat(victim.defense, victim.stages.defense) as f32;
    let base =
        ((2.0 * victim.level as f32 / 5.0 + 2.0) * power as f32 * offense / guard) / 50.0 + 2.0;
    base.floor() as u16
}
