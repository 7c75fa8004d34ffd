use crate::sim::moves::MoveDescriptor;
use crate::sim::stats::{BaseStats, NatureMultipliers};
use crate::sim::types::ElementType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

fn default_level() -> u8 {
    100
}

fn default_ivs() -> [u8; 6] {
    [31; 6]
}

fn default_weight() -> u32 {
    100
}

/// Fully resolved starting state of a combatant, as produced by the data loader.
///
/// The core does no lookups of its own; everything a combatant needs to be
/// built and to change form later is carried here.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CombatantSnapshot {
    pub species_id: u32,
    pub species_name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    /// Form the combatant starts in. Must be a key of `base_stats`.
    pub form: String,
    #[serde(default = "default_level")]
    pub level: u8,
    pub max_hp: u32,
    /// Current HP when the combatant enters battle already damaged.
    #[serde(default)]
    pub hp: Option<u32>,
    pub base_stats: HashMap<String, BaseStats>,
    /// Types per form, for forms whose typing differs from the starting one.
    #[serde(default)]
    pub form_types: HashMap<String, Vec<ElementType>>,
    #[serde(default = "default_ivs")]
    pub ivs: [u8; 6],
    #[serde(default)]
    pub evs: [u8; 6],
    #[serde(default)]
    pub nature: NatureMultipliers,
    pub types: Vec<ElementType>,
    pub ability: String,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub moves: Vec<MoveDescriptor>,
    /// Hectograms.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_output_deserializes_with_defaults() {
        let raw = r#"{
            "species_id": 25,
            "species_name": "Pikachu",
            "form": "pikachu",
            "max_hp": 211,
            "base_stats": { "pikachu": { "hp": 35, "attack": 55, "defense": 40, "sp_attack": 50, "sp_defense": 50, "speed": 90 } },
            "types": ["electric"],
            "ability": "static",
            "moves": [{ "id": 85, "name": "thunderbolt", "type": "electric", "damage_class": "special", "power": 90 }]
        }"#;
        let snapshot: CombatantSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.level, 100);
        assert_eq!(snapshot.ivs, [31; 6]);
        assert_eq!(snapshot.weight, 100);
        assert_eq!(snapshot.nature, NatureMultipliers::default());
        assert_eq!(snapshot.moves[0].pp, 10);
        assert!(!snapshot.moves[0].flags.contact);
    }
}
