//! Stage arithmetic: the multiplier tables applied to base stats and
//! accuracy before any damage or hit computation.

pub const STAGE_MIN: i8 = -6;
pub const STAGE_MAX: i8 = 6;

/// One of the stage-modified attributes of a combatant. `Crit` is tiered
/// rather than clamped and never feeds [`effective_stat`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
    Crit,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Attack => "attack",
            Stage::Defense => "defense",
            Stage::SpAttack => "sp. attack",
            Stage::SpDefense => "sp. defense",
            Stage::Speed => "speed",
            Stage::Accuracy => "accuracy",
            Stage::Evasion => "evasion",
            Stage::Crit => "critical-hit rate",
        }
    }
}

/// Stage multiplier for attack, defense, sp. attack, sp. defense and speed:
/// `(2 + stage) / 2` upward, `2 / (2 - stage)` downward, clamped to [1, 999].
pub fn effective_stat(base: u16, stage: i8) -> u16 {
    let stage = stage.clamp(STAGE_MIN, STAGE_MAX);
    let (num, den) = if stage >= 0 {
        ((2 + stage) as u32, 2u32)
    } else {
        (2u32, (2 - stage) as u32)
    };
    (base as u32 * num / den).clamp(1, 999) as u16
}

/// Accuracy and evasion stages use a gentler base-3 table.
pub fn accuracy_multiplier(stage: i8) -> f32 {
    let stage = stage.clamp(STAGE_MIN, STAGE_MAX);
    let (num, den) = if stage >= 0 {
        ((3 + stage) as f32, 3.0)
    } else {
        (3.0, (3 - stage) as f32)
    };
    num / den
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_stage_is_identity() {
        assert_eq!(effective_stat(100, 0), 100);
    }

    #[test]
    fn extreme_stages_follow_the_table() {
        assert_eq!(effective_stat(100, 6), 400);
        assert_eq!(effective_stat(100, -6), 25);
        assert_eq!(effective_stat(100, 2), 200);
        assert_eq!(effective_stat(100, -2), 50);
    }

    #[test]
    fn result_is_clamped_to_valid_range() {
        assert_eq!(effective_stat(600, 6), 999);
        assert_eq!(effective_stat(1, -6), 1);
    }

    #[test]
    fn out_of_range_stage_is_clamped_first() {
        assert_eq!(effective_stat(100, 12), effective_stat(100, 6));
        assert_eq!(effective_stat(100, -12), effective_stat(100, -6));
    }

    #[test]
    fn accuracy_table_is_base_three() {
        assert_eq!(accuracy_multiplier(0), 1.0);
        assert_eq!(accuracy_multiplier(6), 3.0);
        assert_eq!(accuracy_multiplier(-6), 3.0 / 9.0);
    }
}
