//! Interactive decision provider: menus on stdout, selections on stdin.
//! Invalid input re-prompts locally; the engine never sees it. On EOF the
//! prompts fall back to safe defaults so a piped session still finishes.

use creature_battle_core::data::moves::MoveTargeting;
use creature_battle_core::sim::{
    ActionChoice, Battle, CreatureId, DecisionProvider, Liveness, MoveChoice,
};
use std::io::{self, Write};

pub struct PromptDecider;

fn read_line() -> Option<String> {
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn flush() {
    let _ = io::stdout().flush();
}

fn print_field(battle: &Battle) {
    for id in battle.active_ids() {
        let c = battle.creature(id);
        let side = match c.team {
            creature_battle_core::sim::Team::Ally => "you",
            creature_battle_core::sim::Team::Enemy => "foe",
        };
        let status = c
            .status
            .map(|s| format!(" {s}"))
            .unwrap_or_default();
        println!("  [{side}] {} {}/{}{}", c.ident(), c.current_hp, c.max_hp, status);
    }
}

impl DecisionProvider for PromptDecider {
    fn choose_action(&mut self, battle: &Battle, actor: CreatureId) -> ActionChoice {
        println!();
        print_field(battle);
        println!("What will {} do?", battle.creature(actor).name);
        loop {
            print!("  1: Fight  2: Switch  3: Run > ");
            flush();
            let Some(input) = read_line() else {
                return ActionChoice::Fight;
            };
            match input.as_str() {
                "1" => return ActionChoice::Fight,
                "2" => return ActionChoice::Switch,
                "3" => return ActionChoice::Run,
                _ => println!("Pick 1, 2 or 3."),
            }
        }
    }

    fn choose_move(&mut self, battle: &Battle, actor: CreatureId) -> MoveChoice {
        let creature = battle.creature(actor);
        println!("Moves for {}:", creature.name);
        for (i, slot) in creature.moves.iter().enumerate() {
            let uses = match slot.remaining {
                Some(n) => format!("{n} left"),
                None => "unlimited".to_string(),
            };
            println!("  {}: {} ({uses})", i + 1, slot.def.name);
        }
        let move_index = loop {
            print!("Move number > ");
            flush();
            let Some(input) = read_line() else { break 0 };
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= creature.moves.len() => {
                    if creature.moves[n - 1].usable() {
                        break n - 1;
                    }
                    println!("No uses left for that move.");
                }
                _ => println!("Out of range."),
            }
        };

        let def = creature.moves[move_index].def;
        let target = if battle.battle_size > 1 && def.targeting == MoveTargeting::Single {
            prompt_target(battle, actor)
        } else {
            None
        };
        MoveChoice { move_index, target }
    }

    fn choose_switch(
        &mut self,
        battle: &Battle,
        _actor: CreatureId,
        candidates: &[CreatureId],
    ) -> Option<CreatureId> {
        println!("Send out which creature?");
        for (i, &id) in candidates.iter().enumerate() {
            let c = battle.creature(id);
            println!("  {}: {} {}/{}", i + 1, c.ident(), c.current_hp, c.max_hp);
        }
        loop {
            print!("Number > ");
            flush();
            let Some(input) = read_line() else {
                return candidates.first().copied();
            };
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= candidates.len() => return Some(candidates[n - 1]),
                _ => println!("Out of range."),
            }
        }
    }
}

fn prompt_target(battle: &Battle, actor: CreatureId) -> Option<CreatureId> {
    let foes: Vec<CreatureId> = battle
        .side(actor.team.opponent())
        .active_ids()
        .into_iter()
        .filter(|&id| battle.creature(id).liveness() == Liveness::Active)
        .collect();
    if foes.len() <= 1 {
        return foes.first().copied();
    }
    println!("Target which foe?");
    for (i, &id) in foes.iter().enumerate() {
        let c = battle.creature(id);
        println!("  {}: {} {}/{}", i + 1, c.ident(), c.current_hp, c.max_hp);
    }
    loop {
        print!("Number > ");
        flush();
        let Some(input) = read_line() else {
            return foes.first().copied();
        };
        match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= foes.len() => return Some(foes[n - 1]),
            _ => println!("Out of range."),
        }
    }
}
