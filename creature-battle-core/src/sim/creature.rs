use crate::data::abilities::AbilityDef;
use crate::data::moves::MoveDef;
use crate::data::templates::CreatureTemplate;
use crate::data::types::Type;
use crate::data::{abilities, moves};
use crate::sim::stats::{Stage, STAGE_MAX, STAGE_MIN};
use anyhow::Result;
use serde::Deserialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Team {
    Ally,
    Enemy,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Ally => Team::Enemy,
            Team::Enemy => Team::Ally,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "\u{2642}"),
            Gender::Female => write!(f, "\u{2640}"),
            Gender::Unknown => Ok(()),
        }
    }
}

/// Mutually exclusive status conditions. A healthy combatant carries `None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Burned,
    Poisoned,
    Frozen,
    Paralyzed,
    Asleep,
    Toxic,
    Fainted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Status::Burned => "BRN",
            Status::Poisoned => "PSN",
            Status::Frozen => "FRZ",
            Status::Paralyzed => "PRZ",
            Status::Asleep => "SLP",
            Status::Toxic => "TOX",
            Status::Fainted => "FNT",
        };
        write!(f, "{code}")
    }
}

/// Explicit liveness, instead of overloading the health field's zero
/// boundary: `JustFainted` combatants have hit 0 HP but their on-death
/// processing has not happened yet this tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Liveness {
    Active,
    JustFainted,
    Removed,
}

/// Stable handle to a combatant: the team plus its slot in that side's
/// member list. Slots never move, so handles survive switches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CreatureId {
    pub team: Team,
    pub slot: usize,
}

/// The seven clamped stat stages plus the unclamped critical-hit stage.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StageSet {
    pub attack: i8,
    pub defense: i8,
    pub sp_attack: i8,
    pub sp_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
    pub crit: i8,
}

impl StageSet {
    pub fn get(&self, stage: Stage) -> i8 {
        match stage {
            Stage::Attack => self.attack,
            Stage::Defense => self.defense,
            Stage::SpAttack => self.sp_attack,
            Stage::SpDefense => self.sp_defense,
            Stage::Speed => self.speed,
            Stage::Accuracy => self.accuracy,
            Stage::Evasion => self.evasion,
            Stage::Crit => self.crit,
        }
    }

    /// Shifts a stage by `delta`, clamping to [-6, 6] for everything but
    /// the critical-hit stage.
    pub fn shift(&mut self, stage: Stage, delta: i8) {
        let slot = match stage {
            Stage::Attack => &mut self.attack,
            Stage::Defense => &mut self.defense,
            Stage::SpAttack => &mut self.sp_attack,
            Stage::SpDefense => &mut self.sp_defense,
            Stage::Speed => &mut self.speed,
            Stage::Accuracy => &mut self.accuracy,
            Stage::Evasion => &mut self.evasion,
            Stage::Crit => {
                self.crit = self.crit.saturating_add(delta);
                return;
            }
        };
        *slot = slot.saturating_add(delta).clamp(STAGE_MIN, STAGE_MAX);
    }
}

/// Per-combatant copy of a move with its own remaining uses.
#[derive(Clone, Copy, Debug)]
pub struct MoveSlot {
    pub def: &'static MoveDef,
    /// `None` mirrors an unlimited-use definition.
    pub remaining: Option<u8>,
}

impl MoveSlot {
    pub fn new(def: &'static MoveDef) -> Self {
        Self { def, remaining: def.uses }
    }

    pub fn usable(&self) -> bool {
        self.remaining.map_or(true, |n| n > 0)
    }

    pub fn spend(&mut self) {
        if let Some(n) = self.remaining.as_mut() {
            *n = n.saturating_sub(1);
        }
    }
}

/// The single fixed ability attached to a combatant for the whole battle.
#[derive(Clone, Copy, Debug)]
pub struct AbilitySlot {
    pub def: &'static AbilityDef,
    /// Turns since switch-in, kept only for abilities that track it.
    pub turns: u32,
}

/// Record of the last move that connected against a combatant, consumed
/// by retaliation effects.
#[derive(Clone, Copy, Debug)]
pub struct LastHit {
    pub move_def: &'static MoveDef,
    pub attacker: CreatureId,
}

#[derive(Clone, Debug)]
pub struct Creature {
    pub name: String,
    pub gender: Gender,
    pub level: u8,
    pub current_hp: u16,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
    pub primary_type: Type,
    pub secondary_type: Option<Type>,
    pub stages: StageSet,
    pub status: Option<Status>,
    /// Gate set and cleared by effects (freeze, confusion) independently
    /// of the status condition; re-derived at the combatant's slot each
    /// round.
    pub can_attack: bool,
    pub moves: Vec<MoveSlot>,
    pub ability: AbilitySlot,
    pub team: Team,
    pub last_hit_by: Option<LastHit>,
}

fn scaled_hp(base: u16, level: u8) -> u16 {
    (base as u32 * level as u32 / 50 + level as u32 + 10) as u16
}

impl Creature {
    /// Instantiates a battle-ready combatant from a template, resolving
    /// its ability and move names against the catalogs.
    pub fn from_template(template: &CreatureTemplate, team: Team) -> Result<Self> {
        let ability = abilities::get_ability(&template.ability)?;
        let mut move_slots = Vec::with_capacity(template.moves.len());
        for name in &template.moves {
            move_slots.push(MoveSlot::new(moves::get_move(name)?));
        }
        let max_hp = scaled_hp(template.health, template.level);
        Ok(Self {
            name: template.name.clone(),
            gender: template.gender,
            level: template.level,
            current_hp: max_hp,
            max_hp,
            attack: template.attack,
            defense: template.defense,
            sp_attack: template.sp_attack,
            sp_defense: template.sp_defense,
            speed: template.speed,
            primary_type: template.primary_type,
            secondary_type: template.secondary_type,
            stages: StageSet::default(),
            status: None,
            can_attack: true,
            moves: move_slots,
            ability: AbilitySlot { def: ability, turns: 0 },
            team,
            last_hit_by: None,
        })
    }

    /// Applies damage, never dropping below 0 HP. Returns the amount
    /// actually dealt after clamping to remaining health.
    pub fn take_damage(&mut self, damage: u16) -> u16 {
        let dealt = damage.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restores health, clamped to max HP.
    pub fn heal(&mut self, amount: u16) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    pub fn liveness(&self) -> Liveness {
        if self.current_hp > 0 {
            Liveness::Active
        } else if self.status == Some(Status::Fainted) {
            Liveness::Removed
        } else {
            Liveness::JustFainted
        }
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(MoveSlot::usable)
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.primary_type == t || self.secondary_type == Some(t)
    }

    /// Identity line, e.g. `Flareling♂ Lv. 50`.
    pub fn ident(&self) -> String {
        format!("{}{} Lv. {}", self.name, self.gender, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::templates::get_template;

    fn flareling() -> Creature {
        Creature::from_template(get_template("flareling").unwrap(), Team::Ally).unwrap()
    }

    #[test]
    fn template_instantiation_scales_hp_with_level() {
        let c = flareling();
        // 190 * 50 / 50 + 50 + 10
        assert_eq!(c.max_hp, 250);
        assert_eq!(c.current_hp, c.max_hp);
        assert_eq!(c.moves.len(), 4);
        assert!(c.can_attack);
    }

    #[test]
    fn damage_is_clamped_to_remaining_health() {
        let mut c = flareling();
        c.current_hp = 30;
        let dealt = c.take_damage(999);
        assert_eq!(dealt, 30);
        assert_eq!(c.current_hp, 0);
        assert_eq!(c.liveness(), Liveness::JustFainted);
    }

    #[test]
    fn heal_is_clamped_to_max() {
        let mut c = flareling();
        c.current_hp = c.max_hp - 5;
        c.heal(500);
        assert_eq!(c.current_hp, c.max_hp);
    }

    #[test]
    fn stage_shift_clamps_everything_but_crit() {
        let mut stages = StageSet::default();
        stages.shift(Stage::Attack, 9);
        assert_eq!(stages.attack, STAGE_MAX);
        stages.shift(Stage::Attack, -20);
        assert_eq!(stages.attack, STAGE_MIN);
        stages.shift(Stage::Crit, 9);
        assert_eq!(stages.crit, 9);
    }

    #[test]
    fn move_slot_uses_count_down_and_stop_at_zero() {
        let mut slot = MoveSlot::new(crate::data::moves::get_move("blizzard").unwrap());
        assert_eq!(slot.remaining, Some(5));
        for _ in 0..8 {
            slot.spend();
        }
        assert_eq!(slot.remaining, Some(0));
        assert!(!slot.usable());
        let mut struggle = MoveSlot::new(crate::data::moves::struggle());
        struggle.spend();
        assert!(struggle.usable());
    }

    #[test]
    fn fainted_is_removed_liveness() {
        let mut c = flareling();
        c.current_hp = 0;
        c.status = Some(Status::Fainted);
        assert_eq!(c.liveness(), Liveness::Removed);
    }
}
