pub mod abilities;
pub mod battle;
pub mod damage;
pub mod effects;
pub mod faint_handler;
pub mod items;
pub mod moves;
pub mod pokemon;
pub mod rng;
pub mod stat_stages;
pub mod stats;
pub mod status;
pub mod switching;
pub mod turn;
pub mod types;
pub mod volatile;
pub mod weather_field;

#[cfg(test)]
pub(crate) mod testing;

pub use battle::{Battle, MonRef, Side, Trainer};
pub use pokemon::Pokemon;

/// `" {word} {source}"`, or nothing when there is no source to name.
pub(crate) fn source_suffix(word: &str, source: &str) -> String {
    if source.is_empty() {
        String::new()
    } else {
        format!(" {word} {source}")
    }
}
