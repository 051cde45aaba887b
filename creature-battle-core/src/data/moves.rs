use crate::data::normalize_id;
use crate::data::types::{Category, Type};
use crate::sim::stats::Stage;
use anyhow::{anyhow, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Accuracy {
    Percent(u16),
    /// Bypasses the hit check entirely.
    AlwaysHits,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveTargeting {
    /// One chosen combatant.
    Single,
    /// Adjacent spread: every active foe of the user.
    AllFoes,
    /// The user itself.
    User,
}

/// Chance-gated effect attached to a damaging move.
#[derive(Clone, Copy, Debug)]
pub struct SecondaryEffect {
    pub effect: &'static str,
    pub chance: f64,
}

/// Closed set of move behaviors. Each variant carries only the typed
/// fields it needs; hooks on variants a move does not use are no-ops.
#[derive(Clone, Copy, Debug)]
pub enum MoveBehavior {
    /// Damaging hit with optional secondary effect, a temporary crit-stage
    /// boost for the damage roll, and fractional recoil of damage dealt.
    Strike {
        effect: Option<SecondaryEffect>,
        crit_boost: i8,
        recoil: Option<f32>,
    },
    /// Status move that creates an effect on the target; fails if the
    /// target already carries a status condition.
    Afflict { effect: &'static str },
    /// Status move that creates a self-targeted effect on the user.
    Ward { effect: &'static str },
    /// Status move that shifts a stat stage on its resolved targets.
    StatShift { stage: Stage, delta: i8 },
}

#[derive(Clone, Copy, Debug)]
pub struct MoveDef {
    pub name: &'static str,
    pub move_type: Type,
    pub category: Category,
    pub power: u16,
    pub accuracy: Accuracy,
    /// Base uses; `None` means unlimited (Struggle).
    pub uses: Option<u8>,
    pub targeting: MoveTargeting,
    pub behavior: MoveBehavior,
}

static MOVES: phf::Map<&'static str, MoveDef> = phf::phf_map! {
    "struggle" => MoveDef {
        name: "Struggle",
        move_type: Type::Normal,
        category: Category::Physical,
        power: 50,
        accuracy: Accuracy::AlwaysHits,
        uses: None,
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike { effect: None, crit_boost: 0, recoil: Some(0.25) },
    },
    "scratch" => MoveDef {
        name: "Scratch",
        move_type: Type::Normal,
        category: Category::Physical,
        power: 40,
        accuracy: Accuracy::Percent(100),
        uses: Some(35),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike { effect: None, crit_boost: 0, recoil: None },
    },
    "ember" => MoveDef {
        name: "Ember",
        move_type: Type::Fire,
        category: Category::Special,
        power: 40,
        accuracy: Accuracy::Percent(100),
        uses: Some(35),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike {
            effect: Some(SecondaryEffect { effect: "burn", chance: 0.1 }),
            crit_boost: 0,
            recoil: None,
        },
    },
    "blazekick" => MoveDef {
        name: "Blaze Kick",
        move_type: Type::Fire,
        category: Category::Physical,
        power: 85,
        accuracy: Accuracy::Percent(90),
        uses: Some(10),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike {
            effect: Some(SecondaryEffect { effect: "burn", chance: 0.1 }),
            crit_boost: 2,
            recoil: None,
        },
    },
    "willowisp" => MoveDef {
        name: "Will-o-Wisp",
        move_type: Type::Fire,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::Percent(85),
        uses: Some(15),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Afflict { effect: "burn" },
    },
    "blizzard" => MoveDef {
        name: "Blizzard",
        move_type: Type::Ice,
        category: Category::Special,
        power: 110,
        accuracy: Accuracy::Percent(70),
        uses: Some(5),
        targeting: MoveTargeting::AllFoes,
        behavior: MoveBehavior::Strike {
            effect: Some(SecondaryEffect { effect: "freeze", chance: 0.1 }),
            crit_boost: 0,
            recoil: None,
        },
    },
    "dizzypunch" => MoveDef {
        name: "Dizzy Punch",
        move_type: Type::Normal,
        category: Category::Physical,
        power: 70,
        accuracy: Accuracy::Percent(100),
        uses: Some(10),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike {
            effect: Some(SecondaryEffect { effect: "confusion", chance: 0.2 }),
            crit_boost: 0,
            recoil: None,
        },
    },
    "harden" => MoveDef {
        name: "Harden",
        move_type: Type::Normal,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::AlwaysHits,
        uses: Some(30),
        targeting: MoveTargeting::User,
        behavior: MoveBehavior::StatShift { stage: Stage::Defense, delta: 1 },
    },
    "growl" => MoveDef {
        name: "Growl",
        move_type: Type::Normal,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::Percent(100),
        uses: Some(40),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::StatShift { stage: Stage::Attack, delta: -1 },
    },
    "bubblebeam" => MoveDef {
        name: "Bubble Beam",
        move_type: Type::Water,
        category: Category::Special,
        power: 65,
        accuracy: Accuracy::Percent(100),
        uses: Some(20),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike { effect: None, crit_boost: 0, recoil: None },
    },
    "gust" => MoveDef {
        name: "Gust",
        move_type: Type::Flying,
        category: Category::Special,
        power: 40,
        accuracy: Accuracy::Percent(100),
        uses: Some(35),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike { effect: None, crit_boost: 0, recoil: None },
    },
    "vinelash" => MoveDef {
        name: "Vine Lash",
        move_type: Type::Grass,
        category: Category::Physical,
        power: 45,
        accuracy: Accuracy::Percent(100),
        uses: Some(25),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike { effect: None, crit_boost: 0, recoil: None },
    },
    "sparkburst" => MoveDef {
        name: "Spark Burst",
        move_type: Type::Electric,
        category: Category::Special,
        power: 65,
        accuracy: Accuracy::Percent(100),
        uses: Some(20),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike {
            effect: Some(SecondaryEffect { effect: "paralysis", chance: 0.1 }),
            crit_boost: 0,
            recoil: None,
        },
    },
    "staticjolt" => MoveDef {
        name: "Static Jolt",
        move_type: Type::Electric,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::Percent(90),
        uses: Some(20),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Afflict { effect: "paralysis" },
    },
    "lullaby" => MoveDef {
        name: "Lullaby",
        move_type: Type::Normal,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::Percent(75),
        uses: Some(10),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Afflict { effect: "sleep" },
    },
    "toxicspores" => MoveDef {
        name: "Toxic Spores",
        move_type: Type::Grass,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::Percent(90),
        uses: Some(10),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Afflict { effect: "toxic" },
    },
    "earthchurn" => MoveDef {
        name: "Earth Churn",
        move_type: Type::Ground,
        category: Category::Physical,
        power: 80,
        accuracy: Accuracy::Percent(100),
        uses: Some(15),
        targeting: MoveTargeting::Single,
        behavior: MoveBehavior::Strike { effect: None, crit_boost: 0, recoil: None },
    },
    "destinybond" => MoveDef {
        name: "Destiny Bond",
        move_type: Type::Normal,
        category: Category::Status,
        power: 0,
        accuracy: Accuracy::AlwaysHits,
        uses: Some(5),
        targeting: MoveTargeting::User,
        behavior: MoveBehavior::Ward { effect: "destiny-bond" },
    },
};

/// Look a move up by name. An unknown name is a configuration error.
pub fn get_move(name: &str) -> Result<&'static MoveDef> {
    let id = normalize_id(name);
    MOVES
        .get(id.as_str())
        .ok_or_else(|| anyhow!("'{}' is not a known move", name))
}

/// The fallback move forced on a combatant with no uses left anywhere.
pub fn struggle() -> &'static MoveDef {
    MOVES.get("struggle").expect("struggle is always in the catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_punctuation() {
        for name in ["Blaze Kick", "blazekick", "BLAZE-KICK"] {
            let def = get_move(name).expect("catalog entry exists");
            assert_eq!(def.name, "Blaze Kick");
        }
    }

    #[test]
    fn unknown_move_is_an_error() {
        assert!(get_move("hyper-beam").is_err());
    }

    #[test]
    fn struggle_has_unlimited_uses_and_recoil() {
        let def = struggle();
        assert_eq!(def.uses, None);
        assert!(matches!(
            def.behavior,
            MoveBehavior::Strike { recoil: Some(_), .. }
        ));
    }
}
