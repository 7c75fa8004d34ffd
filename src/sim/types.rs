use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    /// The "???" type. Hits everything neutrally and is never resisted.
    Typeless,
}

impl ElementType {
    pub const ALL: [ElementType; 18] = [
        ElementType::Normal,
        ElementType::Fire,
        ElementType::Water,
        ElementType::Electric,
        ElementType::Grass,
        ElementType::Ice,
        ElementType::Fighting,
        ElementType::Poison,
        ElementType::Ground,
        ElementType::Flying,
        ElementType::Psychic,
        ElementType::Bug,
        ElementType::Rock,
        ElementType::Ghost,
        ElementType::Dragon,
        ElementType::Dark,
        ElementType::Steel,
        ElementType::Fairy,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Normal => "Normal",
            ElementType::Fire => "Fire",
            ElementType::Water => "Water",
            ElementType::Electric => "Electric",
            ElementType::Grass => "Grass",
            ElementType::Ice => "Ice",
            ElementType::Fighting => "Fighting",
            ElementType::Poison => "Poison",
            ElementType::Ground => "Ground",
            ElementType::Flying => "Flying",
            ElementType::Psychic => "Psychic",
            ElementType::Bug => "Bug",
            ElementType::Rock => "Rock",
            ElementType::Ghost => "Ghost",
            ElementType::Dragon => "Dragon",
            ElementType::Dark => "Dark",
            ElementType::Steel => "Steel",
            ElementType::Fairy => "Fairy",
            ElementType::Typeless => "???",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let element = match s.to_ascii_lowercase().as_str() {
            "normal" => ElementType::Normal,
            "fire" => ElementType::Fire,
            "water" => ElementType::Water,
            "electric" => ElementType::Electric,
            "grass" => ElementType::Grass,
            "ice" => ElementType::Ice,
            "fighting" => ElementType::Fighting,
            "poison" => ElementType::Poison,
            "ground" => ElementType::Ground,
            "flying" => ElementType::Flying,
            "psychic" => ElementType::Psychic,
            "bug" => ElementType::Bug,
            "rock" => ElementType::Rock,
            "ghost" => ElementType::Ghost,
            "dragon" => ElementType::Dragon,
            "dark" => ElementType::Dark,
            "steel" => ElementType::Steel,
            "fairy" => ElementType::Fairy,
            "???" | "typeless" => ElementType::Typeless,
            other => return Err(anyhow!("unknown element type '{other}'")),
        };
        Ok(element)
    }
}

/// Attacking type x defending type -> damage percentage (0, 50, 100 or 200).
#[derive(Clone, Debug)]
pub struct TypeChart {
    table: HashMap<(ElementType, ElementType), u16>,
}

impl Default for TypeChart {
    fn default() -> Self {
        let mut table = HashMap::new();
        for attacking in ElementType::ALL {
            for defending in ElementType::ALL {
                let percent = standard_percent(attacking, defending);
                if percent != 100 {
                    table.insert((attacking, defending), percent);
                }
            }
        }
        Self { table }
    }
}

impl TypeChart {
    /// Raw chart percentage. Typeless on either side is always neutral.
    pub fn percent(&self, attacking: ElementType, defending: ElementType) -> u16 {
        if attacking == ElementType::Typeless || defending == ElementType::Typeless {
            return 100;
        }
        self.table.get(&(attacking, defending)).copied().unwrap_or(100)
    }

    /// Percentage after applying inverse-battle rules: immunities and resistances
    /// become weaknesses, weaknesses become resistances.
    pub fn percent_with_inverse(&self, attacking: ElementType, defending: ElementType, inverse: bool) -> u16 {
        let percent = self.percent(attacking, defending);
        if !inverse {
            return percent;
        }
        match percent {
            0 | 50 => 200,
            200 => 50,
            other => other,
        }
    }
}

fn standard_percent(attacking: ElementType, defending: ElementType) -> u16 {
    use ElementType::*;
    let multiplier: f32 = match attacking {
        Normal => match defending {
            Rock | Steel => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => 0.5,
            Grass | Ice | Bug | Steel => 2.0,
            _ => 1.0,
        },
        Water => match defending {
            Water | Grass | Dragon => 0.5,
            Fire | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Electric => match defending {
            Electric | Grass | Dragon => 0.5,
            Water | Flying => 2.0,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
            Water | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => 0.5,
            Grass | Ground | Flying | Dragon => 2.0,
            _ => 1.0,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => 2.0,
            Poison | Flying | Psychic | Bug | Fairy => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass | Fairy => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            Steel => 0.0,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock | Steel => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fighting | Poison => 2.0,
            Psychic | Steel => 0.5,
            Dark => 0.0,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Psychic | Dark => 2.0,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground | Steel => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Ghost | Psychic => 2.0,
            Dark => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Steel => 0.5,
            Fairy => 0.0,
            _ => 1.0,
        },
        Dark => match defending {
            Psychic | Ghost => 2.0,
            Fighting | Dark | Fairy => 0.5,
            _ => 1.0,
        },
        Steel => match defending {
            Rock | Ice | Fairy => 2.0,
            Fire | Water | Electric | Steel => 0.5,
            _ => 1.0,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => 2.0,
            Fire | Poison | Steel => 0.5,
            _ => 1.0,
        },
        Typeless => 1.0,
    };
    (multiplier * 100.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_matches_standard_matchups() {
        let chart = TypeChart::default();
        assert_eq!(chart.percent(ElementType::Water, ElementType::Fire), 200);
        assert_eq!(chart.percent(ElementType::Fire, ElementType::Water), 50);
        assert_eq!(chart.percent(ElementType::Normal, ElementType::Ghost), 0);
        assert_eq!(chart.percent(ElementType::Normal, ElementType::Normal), 100);
        assert_eq!(chart.percent(ElementType::Typeless, ElementType::Steel), 100);
    }

    #[test]
    fn inverse_flips_effectiveness() {
        let chart = TypeChart::default();
        assert_eq!(chart.percent_with_inverse(ElementType::Normal, ElementType::Ghost, true), 200);
        assert_eq!(chart.percent_with_inverse(ElementType::Water, ElementType::Fire, true), 50);
        assert_eq!(chart.percent_with_inverse(ElementType::Fire, ElementType::Water, true), 200);
        assert_eq!(chart.percent_with_inverse(ElementType::Normal, ElementType::Fire, true), 100);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!("FIRE".parse::<ElementType>().unwrap(), ElementType::Fire);
        assert!("plasma".parse::<ElementType>().is_err());
    }
}
