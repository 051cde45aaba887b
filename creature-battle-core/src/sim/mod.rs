pub mod abilities;
pub mod battle;
pub mod creature;
pub mod damage;
pub mod decision;
pub mod effects;
pub mod moves;
pub mod stats;
pub mod switching;

pub use battle::{Battle, Outcome, Side, Weather};
pub use creature::{Creature, CreatureId, Liveness, Status, Team};
pub use decision::{ActionChoice, DecisionProvider, MoveChoice, RandomDecider, ScriptedDecider};
pub use effects::EffectLedger;
