use crate::data::normalize_id;
use crate::data::types::Type;
use crate::sim::creature::Gender;
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Immutable blueprint a battle-ready combatant is instantiated from.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub level: u8,
    /// Base health; the combatant's max HP is derived from this and level.
    pub health: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
    pub primary_type: Type,
    #[serde(default)]
    pub secondary_type: Option<Type>,
    pub ability: String,
    pub moves: Vec<String>,
}

static DEX: Lazy<HashMap<String, CreatureTemplate>> = Lazy::new(|| {
    let templates: Vec<CreatureTemplate> =
        serde_json::from_str(include_str!("../../templates/creatures.json"))
            .expect("templates/creatures.json is malformed");
    templates
        .into_iter()
        .map(|t| (normalize_id(&t.name), t))
        .collect()
});

/// Look a built-in creature template up by name. An unknown name is a
/// configuration error.
pub fn get_template(name: &str) -> Result<&'static CreatureTemplate> {
    let id = normalize_id(name);
    DEX.get(id.as_str())
        .ok_or_else(|| anyhow!("'{}' is not a known creature template", name))
}

/// Names of every built-in template, for menus and tooling.
pub fn template_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = DEX.values().map(|t| t.name.as_str()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::abilities::get_ability;
    use crate::data::moves::get_move;

    #[test]
    fn built_in_dex_parses_and_resolves() {
        assert!(!template_names().is_empty());
        for name in template_names() {
            let template = get_template(name).expect("template exists");
            get_ability(&template.ability).expect("template ability resolves");
            assert!(!template.moves.is_empty());
            for mv in &template.moves {
                get_move(mv).expect("template move resolves");
            }
        }
    }

    #[test]
    fn unknown_template_is_an_error() {
        assert!(get_template("missingno").is_err());
    }
}
