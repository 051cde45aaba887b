//! Ability hook dispatch. Each hook point is invoked unconditionally by
//! the turn engine; a kind with no behavior at that point is a no-op.

use crate::data::abilities::AbilityKind;
use crate::sim::battle::{Battle, Weather};
use crate::sim::creature::{CreatureId, Liveness};
use crate::sim::stats::Stage;

pub(crate) fn on_switch_in(battle: &mut Battle, user: CreatureId) {
    match battle.creature(user).ability.def.kind {
        AbilityKind::Intimidate => {
            let foes: Vec<CreatureId> = battle
                .side(user.team.opponent())
                .active_ids()
                .into_iter()
                .filter(|&id| battle.creature(id).liveness() == Liveness::Active)
                .collect();
            for foe in foes {
                battle.creature_mut(foe).stages.shift(Stage::Attack, -1);
                let name = battle.creature(foe).name.clone();
                battle.emit(format!("{name}'s attack fell!"));
            }
        }
        AbilityKind::Drought => {
            if battle.weather != Weather::Sunny {
                battle.weather = Weather::Sunny;
                battle.emit("The sunlight turned harsh!");
            }
        }
        AbilityKind::Drizzle => {
            if battle.weather != Weather::Rain {
                battle.weather = Weather::Rain;
                battle.emit("It started to rain!");
            }
        }
        AbilityKind::SpeedBoost | AbilityKind::Inert => {}
    }
}

pub(crate) fn on_turn_start(battle: &mut Battle, user: CreatureId) {
    // No current ability acts at turn start; the hook point stays so the
    // engine's dispatch order is fixed.
    let _ = (battle, user);
}

pub(crate) fn on_turn_end(battle: &mut Battle, user: CreatureId) {
    match battle.creature(user).ability.def.kind {
        AbilityKind::SpeedBoost => {
            battle.creature_mut(user).stages.shift(Stage::Speed, 1);
            let name = battle.creature(user).name.clone();
            battle.emit(format!("{name}'s speed rose!"));
        }
        _ => {}
    }
}

pub(crate) fn on_switch_out(battle: &mut Battle, user: CreatureId) {
    let _ = (battle, user);
}

pub(crate) fn on_death(battle: &mut Battle, user: CreatureId) {
    let _ = (battle, user);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::templates::get_template;
    use crate::sim::battle::Battle;
    use crate::sim::creature::{Creature, Team};

    fn creature(name: &str, team: Team) -> Creature {
        Creature::from_template(get_template(name).unwrap(), team).unwrap()
    }

    #[test]
    fn intimidate_lowers_active_foes_attack() {
        let mut battle = Battle::new(
            vec![creature("joltbeak", Team::Ally)],
            vec![creature("duneshell", Team::Enemy)],
            1,
            7,
        )
        .unwrap();
        let ally = battle.allies.active_ids()[0];
        let enemy = battle.enemies.active_ids()[0];
        on_switch_in(&mut battle, ally);
        assert_eq!(battle.creature(enemy).stages.attack, -1);
        assert_eq!(battle.creature(ally).stages.attack, 0);
    }

    #[test]
    fn drought_sets_sun_once() {
        let mut battle = Battle::new(
            vec![creature("flareling", Team::Ally)],
            vec![creature("torrentle", Team::Enemy)],
            1,
            7,
        )
        .unwrap();
        let ally = battle.allies.active_ids()[0];
        on_switch_in(&mut battle, ally);
        assert_eq!(battle.weather, Weather::Sunny);
    }

    #[test]
    fn speed_boost_raises_speed_at_turn_end() {
        let mut battle = Battle::new(
            vec![creature("verdantail", Team::Ally)],
            vec![creature("torrentle", Team::Enemy)],
            1,
            7,
        )
        .unwrap();
        let ally = battle.allies.active_ids()[0];
        on_turn_end(&mut battle, ally);
        on_turn_end(&mut battle, ally);
        assert_eq!(battle.creature(ally).stages.speed, 2);
    }
}
