use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::items::type_items::{memory_type, plate_type};
use crate::sim::rng::BattleRng;
use crate::sim::types::ElementType;
use crate::sim::weather_field::WeatherKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    Status,
    Physical,
    Special,
}

/// Classifiers the combatant core reads off a move.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveFlags {
    pub contact: bool,
    pub sound: bool,
    /// False for moves that hit through a substitute regardless of ability.
    pub affected_by_substitute: bool,
    pub wind: bool,
    pub punch: bool,
    pub bite: bool,
    /// Sunsteel Strike, Moongeist Beam, Photon Geyser.
    pub ignores_ability: bool,
}

impl Default for MoveFlags {
    fn default() -> Self {
        Self {
            contact: false,
            sound: false,
            affected_by_substitute: true,
            wind: false,
            punch: false,
            bite: false,
            ignores_ability: false,
        }
    }
}

/// Move description handed to the core by the move layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: ElementType,
    pub damage_class: DamageClass,
    #[serde(default)]
    pub effect: u32,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub crit_rate: u8,
    #[serde(default)]
    pub min_hits: Option<u8>,
    #[serde(default)]
    pub max_hits: Option<u8>,
    #[serde(default = "default_pp")]
    pub pp: u32,
    #[serde(default)]
    pub flags: MoveFlags,
}

fn default_pp() -> u32 {
    10
}

impl MoveDescriptor {
    pub fn is_damaging(&self) -> bool {
        self.damage_class != DamageClass::Status
    }

    pub fn makes_contact(&self) -> bool {
        self.flags.contact
    }

    /// Elemental type of this move when `user` uses it.
    pub fn resolved_type(&self, battle: &Battle, user: MonRef) -> ElementType {
        let pokemon = battle.mon(user);
        let ability = battle.ability(user);
        match self.name.as_str() {
            "weather-ball" => {
                return match battle.weather() {
                    Some(WeatherKind::Sun | WeatherKind::HarshSunlight) => ElementType::Fire,
                    Some(WeatherKind::Rain | WeatherKind::HeavyRain) => ElementType::Water,
                    Some(WeatherKind::Hail | WeatherKind::Snow) => ElementType::Ice,
                    Some(WeatherKind::Sandstorm) => ElementType::Rock,
                    _ => ElementType::Normal,
                };
            }
            "judgment" => {
                if let Some(element) = battle.usable_item(user).and_then(plate_type) {
                    return element;
                }
            }
            "multi-attack" => {
                if let Some(element) = battle.usable_item(user).and_then(memory_type) {
                    return element;
                }
            }
            "revelation-dance" => {
                if let Some(first) = pokemon.types.first() {
                    return *first;
                }
            }
            _ => {}
        }
        match (ability, self.move_type) {
            (Ability::Normalize, _) => ElementType::Normal,
            (Ability::Aerilate, ElementType::Normal) => ElementType::Flying,
            (Ability::Pixilate, ElementType::Normal) => ElementType::Fairy,
            (Ability::Refrigerate, ElementType::Normal) => ElementType::Ice,
            (Ability::Galvanize, ElementType::Normal) => ElementType::Electric,
            (Ability::LiquidVoice, _) if self.flags.sound => ElementType::Water,
            _ => self.move_type,
        }
    }

    /// Number of hits this use of the move lands.
    pub fn hit_count(&self, battle: &mut Battle, user: MonRef) -> u8 {
        let (Some(min_hits), Some(max_hits)) = (self.min_hits, self.max_hits) else {
            return 1;
        };
        if min_hits == max_hits {
            return min_hits;
        }
        if battle.ability(user) == Ability::SkillLink {
            return max_hits;
        }
        if battle.holds(user, "loaded-dice") {
            let low = max_hits.saturating_sub(1).max(min_hits);
            return roll_between(&mut battle.rng, low, max_hits);
        }
        if min_hits == 2 && max_hits == 5 {
            return match battle.rng.range(0, 20) {
                0..=6 => 2,
                7..=13 => 3,
                14..=16 => 4,
                _ => 5,
            };
        }
        roll_between(&mut battle.rng, min_hits, max_hits)
    }
}

fn roll_between(rng: &mut BattleRng, low: u8, high: u8) -> u8 {
    rng.range(low as u64, high as u64 + 1) as u8
}

/// A move in a combatant's move list together with its remaining PP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub descriptor: MoveDescriptor,
    pub pp: u32,
}

impl MoveSlot {
    pub fn new(descriptor: MoveDescriptor) -> Self {
        let pp = descriptor.pp;
        Self { descriptor, pp }
    }
}
