use crate::data::normalize_id;
use anyhow::{anyhow, Result};

/// Closed set of ability behaviors. Hook points with no behavior for a
/// given kind are documented no-ops.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbilityKind {
    /// No battle behavior.
    Inert,
    /// Lowers every active foe's attack stage on switch-in.
    Intimidate,
    /// Raises the user's speed stage at the end of every turn.
    SpeedBoost,
    /// Turns the weather sunny on switch-in.
    Drought,
    /// Turns the weather rainy on switch-in.
    Drizzle,
}

#[derive(Clone, Copy, Debug)]
pub struct AbilityDef {
    pub name: &'static str,
    pub kind: AbilityKind,
    /// Whether the combatant's ability slot keeps a turns-since-switch-in
    /// counter for this ability.
    pub tracks_turns: bool,
}

static ABILITIES: phf::Map<&'static str, AbilityDef> = phf::phf_map! {
    "noability" => AbilityDef { name: "No Ability", kind: AbilityKind::Inert, tracks_turns: false },
    "intimidate" => AbilityDef { name: "Intimidate", kind: AbilityKind::Intimidate, tracks_turns: false },
    "speedboost" => AbilityDef { name: "Speed Boost", kind: AbilityKind::SpeedBoost, tracks_turns: true },
    "drought" => AbilityDef { name: "Drought", kind: AbilityKind::Drought, tracks_turns: false },
    "drizzle" => AbilityDef { name: "Drizzle", kind: AbilityKind::Drizzle, tracks_turns: false },
};

/// Look an ability up by name. An unknown name is a configuration error.
pub fn get_ability(name: &str) -> Result<&'static AbilityDef> {
    let id = normalize_id(name);
    ABILITIES
        .get(id.as_str())
        .ok_or_else(|| anyhow!("'{}' is not a known ability", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(get_ability("Speed Boost").unwrap().kind, AbilityKind::SpeedBoost);
        assert_eq!(get_ability("INTIMIDATE").unwrap().kind, AbilityKind::Intimidate);
    }

    #[test]
    fn unknown_ability_is_an_error() {
        assert!(get_ability("levitate").is_err());
    }
}
