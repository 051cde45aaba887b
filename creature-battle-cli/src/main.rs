mod ui;

use anyhow::{anyhow, Context, Result};
use creature_battle_core::battle_log::BattleLog;
use creature_battle_core::data::templates::{get_template, template_names};
use creature_battle_core::sim::{Battle, Creature, DecisionProvider, RandomDecider, Team};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::env;
use std::fs;

use ui::PromptDecider;

/// Team file format for `--teams`: template names per side, looked up in
/// the built-in dex.
#[derive(Deserialize)]
struct TeamsJson {
    allies: Vec<String>,
    enemies: Vec<String>,
}

struct Options {
    seed: u64,
    auto: bool,
    battle_size: usize,
    teams_path: Option<String>,
    log_json: Option<String>,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        seed: 0x5eed,
        auto: false,
        battle_size: 1,
        teams_path: None,
        log_json: None,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                opts.seed = value
                    .parse()
                    .with_context(|| format!("invalid seed '{value}'"))?;
            }
            "--auto" => opts.auto = true,
            "--size" => {
                let value = args.next().ok_or_else(|| anyhow!("--size needs a value"))?;
                opts.battle_size = value
                    .parse()
                    .with_context(|| format!("invalid battle size '{value}'"))?;
            }
            "--teams" => {
                opts.teams_path = Some(args.next().ok_or_else(|| anyhow!("--teams needs a path"))?);
            }
            "--log-json" => {
                opts.log_json =
                    Some(args.next().ok_or_else(|| anyhow!("--log-json needs a path"))?);
            }
            other => {
                return Err(anyhow!(
                    "Unknown arg '{other}'. Usage: creature-battle-cli [--seed <u64>] [--auto] [--size <n>] [--teams <file.json>] [--log-json <out.json>]"
                ));
            }
        }
    }
    Ok(opts)
}

fn build_team(names: &[String], team: Team) -> Result<Vec<Creature>> {
    names
        .iter()
        .map(|name| {
            let template =
                get_template(name).with_context(|| format!("unknown template '{name}'"))?;
            Creature::from_template(template, team)
        })
        .collect()
}

fn load_teams(opts: &Options) -> Result<(Vec<Creature>, Vec<Creature>)> {
    let teams = match &opts.teams_path {
        Some(path) => {
            let content =
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse team file {path}"))?
        }
        None => {
            // Demo split: shuffle the dex with the session seed, then
            // deal half to each side.
            let mut names: Vec<String> = template_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            let mut rng = SmallRng::seed_from_u64(opts.seed);
            names.shuffle(&mut rng);
            let half = names.len() / 2;
            TeamsJson {
                allies: names[..half].to_vec(),
                enemies: names[half..].to_vec(),
            }
        }
    };
    let allies = build_team(&teams.allies, Team::Ally)?;
    let enemies = build_team(&teams.enemies, Team::Enemy)?;
    Ok((allies, enemies))
}

fn main() -> Result<()> {
    let opts = parse_args()?;
    let (allies, enemies) = load_teams(&opts)?;

    let mut battle = Battle::new(allies, enemies, opts.battle_size, opts.seed)?;
    battle.log = Some(BattleLog::echoing());

    let mut enemy_provider = RandomDecider::new(opts.seed.wrapping_add(1));
    let mut prompt = PromptDecider;
    let mut auto = RandomDecider::new(opts.seed);
    let ally_provider: &mut dyn DecisionProvider = if opts.auto { &mut auto } else { &mut prompt };

    battle.run(ally_provider, &mut enemy_provider)?;

    if let Some(path) = &opts.log_json {
        let log = battle.log.as_ref().expect("log attached above");
        let json = serde_json::to_string_pretty(&log.to_json())?;
        fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
    }
    Ok(())
}
