//! The turn engine. A `Battle` owns both rosters, the effect ledger, the
//! seeded RNG, and an optional notification log, and drives rounds until
//! one side is out of combatants or the player runs.
//!
//! Three queues are index-aligned with the round order: one slot per
//! combatant in the move queue and the switch queue, with `None` holes
//! where a combatant chose the other action. Positional alignment is what
//! keeps resolution stable while switches rewrite the order in place.

use anyhow::{bail, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::battle_log::BattleLog;
use crate::data::effects::Trigger;
use crate::data::moves::{struggle, MoveDef, MoveTargeting};
use crate::data::types::{affinity_dual, Category};
use crate::sim::creature::{Creature, CreatureId, LastHit, Liveness, Status, Team};
use crate::sim::decision::{ActionChoice, DecisionProvider};
use crate::sim::effects::{self, EffectLedger};
use crate::sim::stats::effective_stat;
use crate::sim::{abilities, damage, moves, switching};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Weather {
    #[default]
    None,
    Sunny,
    Rain,
    Hail,
    Sandstorm,
}

impl Weather {
    fn describe(self) -> Option<&'static str> {
        match self {
            Weather::None => None,
            Weather::Sunny => Some("very sunny"),
            Weather::Rain => Some("raining"),
            Weather::Hail => Some("hailing"),
            Weather::Sandstorm => Some("a dry sandstorm"),
        }
    }
}

/// How a session ends, from the ally side's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Win,
    Loss,
    Escaped,
}

/// One team's roster. `members` owns every combatant; `active` and
/// `reserve` hold member indices and are swapped positionally on switch,
/// so a `CreatureId` stays valid for the whole battle.
#[derive(Clone, Debug)]
pub struct Side {
    pub team: Team,
    pub members: Vec<Creature>,
    pub active: Vec<usize>,
    pub reserve: Vec<usize>,
}

impl Side {
    fn new(team: Team, mut members: Vec<Creature>, battle_size: usize) -> Self {
        for member in &mut members {
            member.team = team;
        }
        let active = (0..battle_size).collect();
        let reserve = (battle_size..members.len()).collect();
        Self { team, members, active, reserve }
    }

    pub fn active_ids(&self) -> Vec<CreatureId> {
        self.active
            .iter()
            .map(|&slot| CreatureId { team: self.team, slot })
            .collect()
    }

    pub fn reserve_ids(&self) -> Vec<CreatureId> {
        self.reserve
            .iter()
            .map(|&slot| CreatureId { team: self.team, slot })
            .collect()
    }

    /// True once every member, benched or not, is at 0 HP.
    pub fn all_down(&self) -> bool {
        self.members.iter().all(|c| c.current_hp == 0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MoveCommand {
    /// Slot into the user's move list; `None` forces Struggle.
    pub move_index: Option<usize>,
    pub target: Option<CreatureId>,
}

#[derive(Clone, Copy, Debug)]
pub struct SwitchCommand {
    pub outgoing: CreatureId,
    pub incoming: CreatureId,
}

pub struct Battle {
    pub battle_size: usize,
    pub turn_number: u32,
    pub weather: Weather,
    pub allies: Side,
    pub enemies: Side,
    pub ledger: EffectLedger,
    pub log: Option<BattleLog>,
    pub(crate) rng: SmallRng,
    move_queue: Vec<Option<MoveCommand>>,
    switch_queue: Vec<Option<SwitchCommand>>,
}

impl Battle {
    /// Battle size: 1 = 1v1, 2 = 2v2, and so on. Both rosters must field
    /// at least `battle_size` combatants.
    pub fn new(
        allies: Vec<Creature>,
        enemies: Vec<Creature>,
        battle_size: usize,
        seed: u64,
    ) -> Result<Self> {
        if battle_size == 0 {
            bail!("battle size must be at least 1");
        }
        if allies.len() < battle_size || enemies.len() < battle_size {
            bail!(
                "each side needs at least {battle_size} combatants ({} vs {})",
                allies.len(),
                enemies.len(),
            );
        }
        Ok(Self {
            battle_size,
            turn_number: 1,
            weather: Weather::None,
            allies: Side::new(Team::Ally, allies, battle_size),
            enemies: Side::new(Team::Enemy, enemies, battle_size),
            ledger: EffectLedger::new(),
            log: None,
            rng: SmallRng::seed_from_u64(seed),
            move_queue: Vec::new(),
            switch_queue: Vec::new(),
        })
    }

    pub fn creature(&self, id: CreatureId) -> &Creature {
        &self.side(id.team).members[id.slot]
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> &mut Creature {
        let slot = id.slot;
        &mut self.side_mut(id.team).members[slot]
    }

    pub fn side(&self, team: Team) -> &Side {
        match team {
            Team::Ally => &self.allies,
            Team::Enemy => &self.enemies,
        }
    }

    pub fn side_mut(&mut self, team: Team) -> &mut Side {
        match team {
            Team::Ally => &mut self.allies,
            Team::Enemy => &mut self.enemies,
        }
    }

    /// Every combatant currently holding a field position, allies first.
    pub fn active_ids(&self) -> Vec<CreatureId> {
        let mut ids = self.allies.active_ids();
        ids.extend(self.enemies.active_ids());
        ids
    }

    pub fn is_active_slot(&self, id: CreatureId) -> bool {
        self.side(id.team).active.contains(&id.slot)
    }

    /// Floors every fielded combatant's health into `[0, max]`. Damage
    /// and healing already clamp; this backstops effect hooks.
    pub(crate) fn clamp_active_health(&mut self) {
        for id in self.active_ids() {
            let c = self.creature_mut(id);
            c.current_hp = c.current_hp.min(c.max_hp);
        }
    }

    pub(crate) fn emit(&mut self, line: impl Into<String>) {
        if let Some(log) = self.log.as_mut() {
            log.push(line);
        }
    }

    fn emit_state(&mut self) {
        for id in self.active_ids() {
            let c = self.creature(id);
            let ident = c.ident();
            let hp = format!("{}/{}", c.current_hp, c.max_hp);
            let status = c.status.map(|s| s.to_string()).unwrap_or_default();
            let line = format!("{ident:<20} [{hp}] {status}");
            self.emit(line);
        }
    }

    /// Registers a named effect. See [`EffectLedger`] for the dedup and
    /// targeting rules.
    pub fn add_effect(
        &mut self,
        name: &str,
        owner: Option<CreatureId>,
        target: Option<CreatureId>,
    ) -> Result<()> {
        effects::add_effect(self, name, owner, target)
    }

    /// Rewrites queued move targets after a switch so they track the
    /// incoming combatant instead of failing against the departed one.
    pub(crate) fn retarget_moves(&mut self, outgoing: CreatureId, incoming: CreatureId) {
        for cmd in self.move_queue.iter_mut().flatten() {
            if cmd.target == Some(outgoing) {
                cmd.target = Some(incoming);
            }
        }
    }

    /// Disjoint borrows for a roll: two combatants read-only plus the RNG
    /// mutably, which a method returning `&Creature` pairs cannot give.
    fn roll_parts(
        &mut self,
        attacker: CreatureId,
        defender: CreatureId,
    ) -> (&Creature, &Creature, &mut SmallRng) {
        let Battle { allies, enemies, rng, .. } = self;
        let a = match attacker.team {
            Team::Ally => &allies.members[attacker.slot],
            Team::Enemy => &enemies.members[attacker.slot],
        };
        let d = match defender.team {
            Team::Ally => &allies.members[defender.slot],
            Team::Enemy => &enemies.members[defender.slot],
        };
        (a, d, rng)
    }

    /// Fielded combatants sorted by effective speed, fastest first.
    /// Paralysis halves speed. Ties are broken by a pre-drawn random key
    /// per combatant.
    pub(crate) fn speed_order(&mut self) -> Vec<CreatureId> {
        let mut keyed: Vec<(u16, f32, CreatureId)> = Vec::new();
        for id in self.active_ids() {
            let c = self.creature(id);
            let mut speed = effective_stat(c.speed, c.stages.speed);
            if c.status == Some(Status::Paralyzed) {
                speed /= 2;
            }
            let tiebreak = self.rng.gen::<f32>();
            keyed.push((speed, tiebreak, id));
        }
        keyed.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        });
        let tied = keyed.windows(2).any(|w| w[0].0 == w[1].0);
        if tied {
            self.emit("A speed tie was broken by chance!");
        }
        keyed.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Loss takes precedence when both sides go down in the same round.
    pub fn check_victory(&self) -> Option<Outcome> {
        if self.allies.all_down() {
            Some(Outcome::Loss)
        } else if self.enemies.all_down() {
            Some(Outcome::Win)
        } else {
            None
        }
    }

    /// Marks every combatant at 0 HP as fainted, in round order, firing
    /// its owned on-death effects and its ability's death hook. Runs
    /// after each health-mutating step so chained faints resolve in
    /// speed order; re-entry is safe because the Fainted mark is set
    /// before any hook fires.
    pub(crate) fn check_death(&mut self, order: &[CreatureId]) {
        for &id in order {
            let c = self.creature(id);
            if c.current_hp != 0 || c.status == Some(Status::Fainted) {
                continue;
            }
            let line = format!("{} fainted!", self.creature(id).ident());
            self.emit(line);
            self.creature_mut(id).status = Some(Status::Fainted);

            for idx in 0..self.ledger.slots() {
                let fires = self.ledger.get(idx).is_some_and(|e| {
                    e.def.trigger == Trigger::OnDeath && e.owner == Some(id)
                });
                if fires {
                    effects::apply_effect(self, idx, order);
                }
            }
            abilities::on_death(self, id);
        }
    }

    /// Runs the session to completion, querying each side's provider for
    /// decisions every round.
    pub fn run(
        &mut self,
        ally_provider: &mut dyn DecisionProvider,
        enemy_provider: &mut dyn DecisionProvider,
    ) -> Result<Outcome> {
        let order = self.speed_order();
        for id in order {
            abilities::on_switch_in(self, id);
        }
        self.emit_state();

        loop {
            let banner = format!("---- Turn {} ----------------------", self.turn_number);
            self.emit(banner);
            if let Some(outcome) = self.run_turn(ally_provider, enemy_provider)? {
                let line = match outcome {
                    Outcome::Win => "You win!",
                    Outcome::Loss => "You're out of creatures!",
                    Outcome::Escaped => "Got away safely!",
                };
                self.emit(line);
                return Ok(outcome);
            }
        }
    }

    /// One full round. `Ok(None)` means the battle continues.
    pub fn run_turn(
        &mut self,
        ally_provider: &mut dyn DecisionProvider,
        enemy_provider: &mut dyn DecisionProvider,
    ) -> Result<Option<Outcome>> {
        if let Some(desc) = self.weather.describe() {
            self.emit(format!("It's {desc}."));
        }
        if let Some(outcome) = self.check_victory() {
            return Ok(Some(outcome));
        }

        let mut order = self.speed_order();

        self.move_queue.clear();
        self.switch_queue.clear();
        let mut pending: Vec<CreatureId> = Vec::new();
        for i in 0..order.len() {
            let actor = order[i];
            let provider: &mut dyn DecisionProvider = match actor.team {
                Team::Ally => &mut *ally_provider,
                Team::Enemy => &mut *enemy_provider,
            };

            // A downed combatant's slot is a forced switch; the incoming
            // combatant also picks the move it will use this round.
            if self.creature(actor).current_hp == 0 {
                let candidates = switching::switch_candidates(self, actor.team, &pending);
                if candidates.is_empty() {
                    self.switch_queue.push(None);
                    self.move_queue.push(None);
                    continue;
                }
                let incoming = Self::validated_switch(
                    provider.choose_switch(self, actor, &candidates),
                    &candidates,
                );
                pending.push(incoming);
                self.switch_queue
                    .push(Some(SwitchCommand { outgoing: actor, incoming }));
                let cmd = self.build_move_command(provider, incoming);
                self.move_queue.push(Some(cmd));
                continue;
            }

            let mut action = provider.choose_action(self, actor);
            while action == ActionChoice::Switch
                && switching::switch_candidates(self, actor.team, &pending).is_empty()
            {
                self.emit("No other creatures are in a condition to fight!");
                action = provider.choose_action(self, actor);
            }

            match action {
                ActionChoice::Fight => {
                    let cmd = self.build_move_command(provider, actor);
                    self.move_queue.push(Some(cmd));
                    self.switch_queue.push(None);
                }
                ActionChoice::Switch => {
                    let candidates = switching::switch_candidates(self, actor.team, &pending);
                    let incoming = Self::validated_switch(
                        provider.choose_switch(self, actor, &candidates),
                        &candidates,
                    );
                    pending.push(incoming);
                    self.move_queue.push(None);
                    self.switch_queue
                        .push(Some(SwitchCommand { outgoing: actor, incoming }));
                }
                ActionChoice::Run => return Ok(Some(Outcome::Escaped)),
            }
        }

        // Resolution, fastest first. A pending switch resolves before the
        // slot acts, and the incoming combatant takes over the slot.
        for i in 0..order.len() {
            let occupant = match self.switch_queue.get(i).copied().flatten() {
                Some(cmd) => {
                    switching::perform_switch(self, cmd.outgoing, cmd.incoming, &mut order);
                    cmd.incoming
                }
                None => order[i],
            };
            if self.creature(occupant).current_hp == 0 {
                continue;
            }

            // The attack gate resets here; blocking effects re-impose it
            // below, each round they remain active.
            self.creature_mut(occupant).can_attack = true;
            abilities::on_turn_start(self, occupant);
            for idx in 0..self.ledger.slots() {
                let fires = self.ledger.get(idx).is_some_and(|e| {
                    e.def.trigger == Trigger::StartOfTurn && e.target == Some(occupant)
                });
                if fires {
                    effects::apply_effect(self, idx, &order);
                }
            }
            if let Some(outcome) = self.check_victory() {
                return Ok(Some(outcome));
            }

            if self.creature(occupant).can_attack {
                if let Some(cmd) = self.move_queue.get(i).copied().flatten() {
                    if let Some(outcome) = self.perform_move(occupant, cmd, &order)? {
                        return Ok(Some(outcome));
                    }
                }
            }
        }

        // End-of-turn effects fire, then every live instance ages.
        for idx in 0..self.ledger.slots() {
            let fires = self
                .ledger
                .get(idx)
                .is_some_and(|e| e.def.trigger == Trigger::EndOfTurn);
            if fires {
                effects::apply_effect(self, idx, &order);
            }
            if let Some(instance) = self.ledger.get_mut(idx) {
                if instance.def.counts_turns {
                    instance.turn += 1;
                }
                if let Some(duration) = instance.duration.as_mut() {
                    *duration = duration.saturating_sub(1);
                }
            }
        }

        for &id in &order {
            if self.creature(id).current_hp > 0 {
                abilities::on_turn_end(self, id);
                if self.creature(id).ability.def.tracks_turns {
                    self.creature_mut(id).ability.turns += 1;
                }
            }
        }

        let outcome = self.check_victory();
        if outcome.is_none() {
            self.turn_number += 1;
        }
        Ok(outcome)
    }

    fn validated_switch(choice: Option<CreatureId>, candidates: &[CreatureId]) -> CreatureId {
        match choice {
            Some(id) if candidates.contains(&id) => id,
            _ => candidates[0],
        }
    }

    /// First healthy foe across from `team`, the default single target.
    fn default_foe(&self, team: Team) -> Option<CreatureId> {
        self.side(team.opponent())
            .active_ids()
            .into_iter()
            .find(|&id| self.creature(id).liveness() == Liveness::Active)
    }

    fn build_move_command(
        &mut self,
        provider: &mut dyn DecisionProvider,
        actor: CreatureId,
    ) -> MoveCommand {
        if !self.creature(actor).has_usable_move() {
            let line = format!("{} has no moves left!", self.creature(actor).ident());
            self.emit(line);
            return MoveCommand { move_index: None, target: self.default_foe(actor.team) };
        }

        let choice = provider.choose_move(self, actor);
        let slots = &self.creature(actor).moves;
        let move_index = if slots.get(choice.move_index).is_some_and(|s| s.usable()) {
            choice.move_index
        } else {
            slots
                .iter()
                .position(|s| s.usable())
                .expect("a usable move exists when has_usable_move holds")
        };

        let def = self.creature(actor).moves[move_index].def;
        let target = match def.targeting {
            MoveTargeting::User | MoveTargeting::AllFoes => None,
            MoveTargeting::Single => choice
                .target
                .filter(|&t| self.is_active_slot(t))
                .or_else(|| self.default_foe(actor.team)),
        };
        MoveCommand { move_index: Some(move_index), target }
    }

    /// "But it had no effect!" / "It's super effective!" for damaging
    /// moves, ahead of the damage itself.
    fn emit_effectiveness(&mut self, def: &MoveDef, target: CreatureId) {
        if def.category == Category::Status {
            return;
        }
        let c = self.creature(target);
        let multiplier = affinity_dual(def.move_type, c.primary_type, c.secondary_type);
        if multiplier == 0.0 {
            self.emit("But it had no effect!");
        } else if multiplier >= 2.0 {
            self.emit("It's super effective!");
        }
    }

    fn perform_move(
        &mut self,
        user: CreatureId,
        cmd: MoveCommand,
        order: &[CreatureId],
    ) -> Result<Option<Outcome>> {
        let def: &'static MoveDef = match cmd.move_index {
            Some(idx) => {
                let slot = &mut self.creature_mut(user).moves[idx];
                slot.spend();
                slot.def
            }
            None => struggle(),
        };

        let line = format!("{} used {}!", self.creature(user).ident(), def.name);
        self.emit(line);
        moves::on_use(self, def, user);

        let targets: Vec<CreatureId> = match def.targeting {
            MoveTargeting::User => vec![user],
            MoveTargeting::Single => cmd.target.into_iter().collect(),
            MoveTargeting::AllFoes => self
                .side(user.team.opponent())
                .active_ids()
                .into_iter()
                .filter(|&id| self.creature(id).liveness() == Liveness::Active)
                .collect(),
        };
        if targets.is_empty() {
            self.emit("But it failed!");
        }

        let target_count = targets.len();
        for target in targets {
            let hit = if def.targeting == MoveTargeting::User {
                true
            } else {
                let (attacker, defender, rng) = self.roll_parts(user, target);
                damage::hit_check(def, attacker, defender, rng)
            };

            if !hit {
                moves::on_miss(self, def, user);
                self.emit("But it missed!");
                continue;
            }

            self.emit_effectiveness(def, target);
            if target != user && self.creature(target).liveness() != Liveness::Active {
                self.emit("But it failed!");
                continue;
            }
            moves::execute(self, def, user, target, target_count)?;
            if target != user {
                self.creature_mut(target).last_hit_by =
                    Some(LastHit { move_def: def, attacker: user });
            }
        }

        self.clamp_active_health();
        self.check_death(order);
        self.emit_state();
        Ok(self.check_victory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::templates::get_template;
    use crate::sim::creature::Creature;

    fn creature(name: &str) -> Creature {
        Creature::from_template(get_template(name).unwrap(), Team::Ally).unwrap()
    }

    fn duel(ally: &str, enemy: &str) -> Battle {
        Battle::new(vec![creature(ally)], vec![creature(enemy)], 1, 11).unwrap()
    }

    #[test]
    fn rejects_a_side_smaller_than_the_battle_size() {
        let result = Battle::new(vec![creature("flareling")], vec![creature("torrentle")], 2, 0);
        assert!(result.is_err());
    }

    #[test]
    fn faster_combatant_acts_first() {
        // Joltbeak at speed 120 outruns Duneshell at 45.
        let mut battle = duel("joltbeak", "duneshell");
        let order = battle.speed_order();
        assert_eq!(order[0], battle.allies.active_ids()[0]);
    }

    #[test]
    fn paralysis_halves_ordering_speed() {
        // Flareling (100) vs Duneshell (45): paralysis drops 100 to 50,
        // which still wins, while halving below 45 would not.
        let mut battle = duel("flareling", "torrentle");
        let ally = battle.allies.active_ids()[0];
        let enemy = battle.enemies.active_ids()[0];
        battle.creature_mut(ally).status = Some(Status::Paralyzed);
        // Torrentle's base 60 now beats the halved 50.
        let order = battle.speed_order();
        assert_eq!(order[0], enemy);
    }

    #[test]
    fn loss_outranks_win_when_both_sides_fall() {
        let mut battle = duel("flareling", "torrentle");
        let ally = battle.allies.active_ids()[0];
        let enemy = battle.enemies.active_ids()[0];
        let hp = battle.creature(ally).current_hp;
        battle.creature_mut(ally).take_damage(hp);
        let hp = battle.creature(enemy).current_hp;
        battle.creature_mut(enemy).take_damage(hp);
        assert_eq!(battle.check_victory(), Some(Outcome::Loss));
    }

    #[test]
    fn death_check_marks_and_announces_exactly_once() {
        let mut battle = duel("flareling", "torrentle");
        battle.log = Some(BattleLog::new());
        let enemy = battle.enemies.active_ids()[0];
        let hp = battle.creature(enemy).current_hp;
        battle.creature_mut(enemy).take_damage(hp);
        let order = battle.active_ids();
        battle.check_death(&order);
        battle.check_death(&order);
        assert_eq!(battle.creature(enemy).status, Some(Status::Fainted));
        let faint_lines = battle
            .log
            .as_ref()
            .unwrap()
            .lines()
            .iter()
            .filter(|l| l.ends_with("fainted!"))
            .count();
        assert_eq!(faint_lines, 1);
    }

    #[test]
    fn default_foe_skips_downed_combatants() {
        let mut battle = Battle::new(
            vec![creature("flareling"), creature("torrentle")],
            vec![creature("duneshell"), creature("frostmaw")],
            2,
            3,
        )
        .unwrap();
        let first = battle.enemies.active_ids()[0];
        let second = battle.enemies.active_ids()[1];
        let hp = battle.creature(first).current_hp;
        battle.creature_mut(first).take_damage(hp);
        assert_eq!(battle.default_foe(Team::Ally), Some(second));
    }
}
