use creature_battle_core::battle_log::BattleLog;
use creature_battle_core::data::templates::get_template;
use creature_battle_core::sim::{
    ActionChoice, Battle, Creature, MoveChoice, Outcome, ScriptedDecider, Status, Team,
};

fn make_creature(name: &str) -> Creature {
    Creature::from_template(get_template(name).expect("template exists"), Team::Ally)
        .expect("catalog entries resolve")
}

fn scripted_moves(choices: &[(usize, usize)]) -> ScriptedDecider {
    // (move_index, repeat) pairs, queued in order.
    let mut decider = ScriptedDecider::new();
    for &(index, repeat) in choices {
        for _ in 0..repeat {
            decider
                .moves
                .push_back(MoveChoice { move_index: index, target: None });
        }
    }
    decider
}

#[test]
fn lethal_strike_ends_the_session_with_a_win() {
    let mut battle = Battle::new(
        vec![make_creature("flareling")],
        vec![make_creature("duneshell")],
        1,
        42,
    )
    .expect("valid setup");
    battle.log = Some(BattleLog::new());
    let enemy = battle.enemies.active_ids()[0];
    let hp = battle.creature(enemy).current_hp;
    battle.creature_mut(enemy).take_damage(hp - 1);

    // Flareling outspeeds and Scratch never misses at even stages.
    let mut ally = scripted_moves(&[(3, 1)]);
    let mut foe = ScriptedDecider::new();
    let outcome = battle.run(&mut ally, &mut foe).expect("session completes");

    assert_eq!(outcome, Outcome::Win);
    assert_eq!(battle.creature(enemy).current_hp, 0);
    assert_eq!(battle.creature(enemy).status, Some(Status::Fainted));
    let log = battle.log.as_ref().unwrap();
    assert_eq!(log.lines().last().map(String::as_str), Some("You win!"));
}

#[test]
fn running_away_escapes_immediately() {
    let mut battle = Battle::new(
        vec![make_creature("torrentle")],
        vec![make_creature("duneshell")],
        1,
        1,
    )
    .expect("valid setup");
    battle.log = Some(BattleLog::new());
    let enemy = battle.enemies.active_ids()[0];
    let enemy_hp = battle.creature(enemy).current_hp;

    let mut ally = ScriptedDecider::new().then_action(ActionChoice::Run);
    let mut foe = ScriptedDecider::new();
    let outcome = battle.run(&mut ally, &mut foe).expect("session completes");

    assert_eq!(outcome, Outcome::Escaped);
    assert_eq!(battle.creature(enemy).current_hp, enemy_hp);
    let log = battle.log.as_ref().unwrap();
    assert_eq!(
        log.lines().last().map(String::as_str),
        Some("Got away safely!"),
    );
}

#[test]
fn freeze_blocks_attacking_until_it_thaws() {
    let mut battle = Battle::new(
        vec![make_creature("torrentle")],
        vec![make_creature("duneshell")],
        1,
        9,
    )
    .expect("valid setup");
    let me = battle.allies.active_ids()[0];
    let foe = battle.enemies.active_ids()[0];
    battle
        .add_effect("freeze", None, Some(foe))
        .expect("effect exists");
    assert_eq!(battle.creature(foe).status, Some(Status::Frozen));
    assert!(!battle.creature(foe).can_attack);

    // Torrentle spends every round hardening; the foe attacks the round
    // it thaws, never before.
    let mut ally = scripted_moves(&[(3, 10)]);
    let mut enemy = ScriptedDecider::new();
    let mut thawed = false;
    for _ in 0..10 {
        let outcome = battle.run_turn(&mut ally, &mut enemy).expect("round runs");
        assert_eq!(outcome, None);
        if battle.creature(foe).status.is_none() {
            thawed = true;
            break;
        }
        assert_eq!(battle.creature(foe).status, Some(Status::Frozen));
        assert_eq!(battle.creature(me).current_hp, battle.creature(me).max_hp);
    }

    assert!(thawed, "a 2-6 round freeze must thaw within ten rounds");
    assert!(battle.creature(foe).can_attack);
    assert_eq!(battle.ledger.active_count(), 0);
}

#[test]
fn destiny_bond_takes_the_killer_down() {
    let mut battle = Battle::new(
        vec![make_creature("frostmaw")],
        vec![make_creature("flareling")],
        1,
        5,
    )
    .expect("valid setup");
    let me = battle.allies.active_ids()[0];
    let foe = battle.enemies.active_ids()[0];
    battle
        .add_effect("destiny-bond", Some(me), Some(me))
        .expect("effect exists");
    let hp = battle.creature(me).current_hp;
    battle.creature_mut(me).take_damage(hp - 1);

    // Flareling outspeeds and claws the bond holder down, then falls
    // with it; an empty ally roster is a loss even when both sides drop.
    let mut ally = scripted_moves(&[(2, 1)]);
    let mut enemy = scripted_moves(&[(3, 1)]);
    let outcome = battle.run_turn(&mut ally, &mut enemy).expect("round runs");

    assert_eq!(outcome, Some(Outcome::Loss));
    assert_eq!(battle.creature(me).current_hp, 0);
    assert_eq!(battle.creature(foe).current_hp, 0);
    assert_eq!(battle.creature(foe).status, Some(Status::Fainted));
}

#[test]
fn destiny_bond_ignores_a_teammate_kill() {
    let mut battle = Battle::new(
        vec![make_creature("flareling"), make_creature("frostmaw")],
        vec![make_creature("torrentle"), make_creature("duneshell")],
        2,
        5,
    )
    .expect("valid setup");
    let striker = battle.allies.active_ids()[0];
    let holder = battle.allies.active_ids()[1];
    battle
        .add_effect("destiny-bond", Some(holder), Some(holder))
        .expect("effect exists");
    let hp = battle.creature(holder).current_hp;
    battle.creature_mut(holder).take_damage(hp - 1);

    // Flareling scratches its own teammate; the bond only avenges kills
    // from across the field.
    let mut ally = ScriptedDecider::new()
        .then_move(MoveChoice { move_index: 3, target: Some(holder) })
        .then_move(MoveChoice { move_index: 2, target: None });
    let mut enemy = scripted_moves(&[(3, 1), (2, 1)]);
    let outcome = battle.run_turn(&mut ally, &mut enemy).expect("round runs");

    assert_eq!(outcome, None);
    assert_eq!(battle.creature(holder).status, Some(Status::Fainted));
    assert_eq!(
        battle.creature(striker).current_hp,
        battle.creature(striker).max_hp,
    );
}

#[test]
fn switch_retargets_the_incoming_combatant_and_drops_bound_effects() {
    let mut battle = Battle::new(
        vec![make_creature("verdantail"), make_creature("duneshell")],
        vec![make_creature("flareling")],
        1,
        13,
    )
    .expect("valid setup");
    let lead = battle.allies.active_ids()[0];
    let bench = battle.allies.reserve_ids()[0];
    battle
        .add_effect("confusion", None, Some(lead))
        .expect("effect exists");

    // Verdantail outspeeds Flareling, so the switch resolves before the
    // queued Scratch, which must follow the incoming combatant.
    let mut ally = ScriptedDecider::new()
        .then_action(ActionChoice::Switch)
        .then_switch(bench);
    let mut enemy = ScriptedDecider::new()
        .then_move(MoveChoice { move_index: 3, target: Some(lead) });
    let outcome = battle.run_turn(&mut ally, &mut enemy).expect("round runs");

    assert_eq!(outcome, None);
    assert_eq!(battle.creature(lead).current_hp, battle.creature(lead).max_hp);
    assert!(battle.creature(bench).current_hp < battle.creature(bench).max_hp);
    assert!(battle.is_active_slot(bench));
    assert!(!battle.is_active_slot(lead));
    // Confusion ends on switching out, without a recovery announcement.
    assert_eq!(battle.ledger.active_count(), 0);
}

#[test]
fn exhausted_moves_force_struggle_with_recoil() {
    let mut battle = Battle::new(
        vec![make_creature("torrentle")],
        vec![make_creature("duneshell")],
        1,
        21,
    )
    .expect("valid setup");
    battle.log = Some(BattleLog::new());
    let me = battle.allies.active_ids()[0];
    let foe = battle.enemies.active_ids()[0];
    for slot in &mut battle.creature_mut(me).moves {
        slot.remaining = Some(0);
    }

    let mut ally = ScriptedDecider::new();
    let mut enemy = scripted_moves(&[(2, 1)]);
    let outcome = battle.run_turn(&mut ally, &mut enemy).expect("round runs");

    assert_eq!(outcome, None);
    assert!(battle.creature(foe).current_hp < battle.creature(foe).max_hp);
    assert!(
        battle.creature(me).current_hp < battle.creature(me).max_hp,
        "struggle recoil hurts the user",
    );
    let log = battle.log.as_ref().unwrap();
    assert!(log.lines().iter().any(|l| l.ends_with("has no moves left!")));
    assert!(log
        .lines()
        .iter()
        .any(|l| l.ends_with("received some recoil damage.")));
}

#[test]
fn toxic_damage_escalates_each_round() {
    let mut battle = Battle::new(
        vec![make_creature("torrentle")],
        vec![make_creature("duneshell")],
        1,
        2,
    )
    .expect("valid setup");
    let foe = battle.enemies.active_ids()[0];
    battle
        .add_effect("toxic", None, Some(foe))
        .expect("effect exists");
    assert_eq!(battle.creature(foe).status, Some(Status::Toxic));

    // Both sides harden so the poison is the only source of damage.
    let mut ally = scripted_moves(&[(3, 2)]);
    let mut enemy = scripted_moves(&[(2, 2)]);

    let start = battle.creature(foe).current_hp;
    battle.run_turn(&mut ally, &mut enemy).expect("round runs");
    let after_one = battle.creature(foe).current_hp;
    battle.run_turn(&mut ally, &mut enemy).expect("round runs");
    let after_two = battle.creature(foe).current_hp;

    let first_tick = start - after_one;
    let second_tick = after_one - after_two;
    assert!(first_tick > 0);
    assert_eq!(second_tick, first_tick * 2);
}

#[test]
fn duplicate_effects_are_not_stacked() {
    let mut battle = Battle::new(
        vec![make_creature("flareling")],
        vec![make_creature("torrentle")],
        1,
        0,
    )
    .expect("valid setup");
    let foe = battle.enemies.active_ids()[0];
    battle.add_effect("burn", None, Some(foe)).expect("effect exists");
    battle.add_effect("burn", None, Some(foe)).expect("effect exists");
    assert_eq!(battle.ledger.active_count(), 1);
}
