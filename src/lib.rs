//! Combatant state machine and effect-resolution core for two-sided
//! Pokemon-style battles.
//!
//! The entry point is [`sim::battle::Battle`]: build two [`sim::battle::Trainer`]s
//! from loader snapshots, then drive the battle through the operations in
//! [`sim`]. Every mutating call returns the narrative of what happened.

pub mod battle_logger;
pub mod config;
pub mod model;
pub mod sim;

pub use config::BattleOptions;
pub use model::CombatantSnapshot;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::config::BattleOptions;
    pub use crate::model::{CombatantSnapshot, Gender};
    pub use crate::sim::abilities::Ability;
    pub use crate::sim::battle::{Battle, MonRef, Side, Trainer};
    pub use crate::sim::damage::{damage, heal, DamageContext};
    pub use crate::sim::faint_handler::faint;
    pub use crate::sim::moves::{DamageClass, MoveDescriptor, MoveFlags};
    pub use crate::sim::pokemon::{confuse, effectiveness, flinch, infatuate, is_grounded, weight, Pokemon};
    pub use crate::sim::stat_stages::append_stat;
    pub use crate::sim::stats::StatKind;
    pub use crate::sim::status::{apply_status, StatusKind};
    pub use crate::sim::switching::{remove, send_out};
    pub use crate::sim::turn::next_turn;
    pub use crate::sim::types::ElementType;
    pub use crate::sim::weather_field::{TerrainKind, WeatherKind};
}
