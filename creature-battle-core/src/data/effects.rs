use crate::data::normalize_id;
use crate::sim::creature::Status;
use anyhow::{anyhow, Result};

/// The phase of the turn at which an effect's behavior fires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trigger {
    StartOfTurn,
    EndOfTurn,
    OnDeath,
    OnSwitchIn,
    OnSwitchOut,
}

/// Which combatants an effect's behavior is resolved against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EffectTargeting {
    /// The effect's owner, resolved even while fainting.
    User,
    /// The explicit target, while it occupies an active slot.
    Single,
    /// Every active, healthy ally of the owner.
    AlliesOfUser,
    /// Every active, healthy foe of the owner.
    FoesOfUser,
    /// Every active, healthy combatant on the field.
    AllActive,
}

#[derive(Clone, Copy, Debug)]
pub enum DurationSpec {
    Turns(u32),
    /// Rolled once at creation, inclusive on both ends.
    Random(u32, u32),
    Unbounded,
}

/// Closed set of effect behaviors. Each variant carries only the typed
/// fields it needs; creation/execute/deletion hooks are dispatched over
/// the variant and an absent hook is a no-op.
#[derive(Clone, Copy, Debug)]
pub enum EffectKind {
    /// Sets a status condition at creation and clears it on expiry;
    /// optionally gates the target's ability to attack while present.
    Condition { status: Status, blocks_attack: bool },
    /// Sets a status condition at creation and deals `max_hp / denom`
    /// damage each end of turn, multiplied by the per-turn counter when
    /// escalating.
    Residual { status: Status, denom: u16, escalating: bool },
    /// Each turn, even odds of blocking the move and striking the target
    /// with a typeless physical blow of the given power.
    Confusion { power: u16 },
    /// On the owner's death, takes the last attacker down as well if the
    /// hit came from the opposing side.
    DestinyBond,
}

#[derive(Clone, Copy, Debug)]
pub struct EffectDef {
    pub name: &'static str,
    pub kind: EffectKind,
    pub trigger: Trigger,
    pub targeting: EffectTargeting,
    pub duration: DurationSpec,
    /// Keeps a per-turn counter, incremented by the end-of-turn aging pass.
    pub counts_turns: bool,
    /// Removed without a deletion hook when its target leaves the field.
    pub end_on_switch: bool,
}

static EFFECTS: phf::Map<&'static str, EffectDef> = phf::phf_map! {
    "freeze" => EffectDef {
        name: "Freeze",
        kind: EffectKind::Condition { status: Status::Frozen, blocks_attack: true },
        trigger: Trigger::StartOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Random(2, 6),
        counts_turns: false,
        end_on_switch: false,
    },
    "sleep" => EffectDef {
        name: "Sleep",
        kind: EffectKind::Condition { status: Status::Asleep, blocks_attack: true },
        trigger: Trigger::StartOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Random(2, 4),
        counts_turns: false,
        end_on_switch: false,
    },
    "paralysis" => EffectDef {
        name: "Paralysis",
        kind: EffectKind::Condition { status: Status::Paralyzed, blocks_attack: false },
        trigger: Trigger::StartOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Unbounded,
        counts_turns: false,
        end_on_switch: false,
    },
    "burn" => EffectDef {
        name: "Burn",
        kind: EffectKind::Residual { status: Status::Burned, denom: 16, escalating: false },
        trigger: Trigger::EndOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Unbounded,
        counts_turns: false,
        end_on_switch: false,
    },
    "poison" => EffectDef {
        name: "Poison",
        kind: EffectKind::Residual { status: Status::Poisoned, denom: 8, escalating: false },
        trigger: Trigger::EndOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Unbounded,
        counts_turns: false,
        end_on_switch: false,
    },
    "toxic" => EffectDef {
        name: "Toxic",
        kind: EffectKind::Residual { status: Status::Toxic, denom: 8, escalating: true },
        trigger: Trigger::EndOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Unbounded,
        counts_turns: true,
        end_on_switch: false,
    },
    "confusion" => EffectDef {
        name: "Confusion",
        kind: EffectKind::Confusion { power: 40 },
        trigger: Trigger::StartOfTurn,
        targeting: EffectTargeting::Single,
        duration: DurationSpec::Random(2, 5),
        counts_turns: false,
        end_on_switch: true,
    },
    "destinybond" => EffectDef {
        name: "Destiny Bond",
        kind: EffectKind::DestinyBond,
        trigger: Trigger::OnDeath,
        targeting: EffectTargeting::User,
        duration: DurationSpec::Turns(0),
        counts_turns: false,
        end_on_switch: true,
    },
};

/// Look an effect up by name. An unknown name is a configuration error.
pub fn get_effect(name: &str) -> Result<&'static EffectDef> {
    let id = normalize_id(name);
    EFFECTS
        .get(id.as_str())
        .ok_or_else(|| anyhow!("'{}' is not a known effect", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_normalizes_names() {
        assert_eq!(get_effect("Destiny Bond").unwrap().name, "Destiny Bond");
        assert_eq!(get_effect("destiny-bond").unwrap().name, "Destiny Bond");
    }

    #[test]
    fn unknown_effect_is_an_error() {
        assert!(get_effect("leech-seed").is_err());
    }

    #[test]
    fn destiny_bond_expires_immediately_and_ends_on_switch() {
        let def = get_effect("destiny-bond").unwrap();
        assert!(matches!(def.duration, DurationSpec::Turns(0)));
        assert!(def.end_on_switch);
        assert_eq!(def.trigger, Trigger::OnDeath);
    }
}
