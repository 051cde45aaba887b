//! Turn-based creature battle engine.
//!
//! The main entry point is [`sim::Battle`]: build two rosters from the
//! template dex, hand each side a [`sim::DecisionProvider`], and call
//! [`sim::Battle::run`] to play a session to its outcome.

pub mod battle_log;
pub mod data;
pub mod sim;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle_log::BattleLog;
    pub use crate::data::templates::{get_template, template_names};
    pub use crate::sim::{
        ActionChoice, Battle, Creature, CreatureId, DecisionProvider, MoveChoice, Outcome,
        RandomDecider, Team, Weather,
    };
}
