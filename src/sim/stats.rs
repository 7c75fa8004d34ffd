use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Multiplier applied to a battle stat, indexed by `stage + 6`.
pub const STAGE_MULTIPLIERS: [f64; 13] = [
    2.0 / 8.0,
    2.0 / 7.0,
    2.0 / 6.0,
    2.0 / 5.0,
    2.0 / 4.0,
    2.0 / 3.0,
    1.0,
    3.0 / 2.0,
    4.0 / 2.0,
    5.0 / 2.0,
    6.0 / 2.0,
    7.0 / 2.0,
    8.0 / 2.0,
];

pub fn stage_multiplier(stage: i8) -> f64 {
    STAGE_MULTIPLIERS[(stage.clamp(MIN_STAGE, MAX_STAGE) + 6) as usize]
}

/// The seven stats that carry a stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl StatKind {
    pub const ALL: [StatKind; 7] = [
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpAttack,
        StatKind::SpDefense,
        StatKind::Speed,
        StatKind::Accuracy,
        StatKind::Evasion,
    ];

    /// Stats that have a raw value (everything but accuracy and evasion).
    pub const BATTLE: [StatKind; 5] = [
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpAttack,
        StatKind::SpDefense,
        StatKind::Speed,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::SpAttack => "special attack",
            StatKind::SpDefense => "special defense",
            StatKind::Speed => "speed",
            StatKind::Accuracy => "accuracy",
            StatKind::Evasion => "evasion",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "attack" | "atk" => Ok(StatKind::Attack),
            "defense" | "def" => Ok(StatKind::Defense),
            "special attack" | "spa" | "spatk" => Ok(StatKind::SpAttack),
            "special defense" | "spd" | "spdef" => Ok(StatKind::SpDefense),
            "speed" | "spe" => Ok(StatKind::Speed),
            "accuracy" | "acc" => Ok(StatKind::Accuracy),
            "evasion" | "eva" => Ok(StatKind::Evasion),
            other => Err(anyhow!("unknown stat '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub sp_attack: i8,
    pub sp_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn get(&self, stat: StatKind) -> i8 {
        match stat {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpAttack => self.sp_attack,
            StatKind::SpDefense => self.sp_defense,
            StatKind::Speed => self.speed,
            StatKind::Accuracy => self.accuracy,
            StatKind::Evasion => self.evasion,
        }
    }

    pub(crate) fn get_mut(&mut self, stat: StatKind) -> &mut i8 {
        match stat {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::SpAttack => &mut self.sp_attack,
            StatKind::SpDefense => &mut self.sp_defense,
            StatKind::Speed => &mut self.speed,
            StatKind::Accuracy => &mut self.accuracy,
            StatKind::Evasion => &mut self.evasion,
        }
    }

    /// Stores a stage, clamped to [-6, 6].
    pub fn set(&mut self, stat: StatKind, stage: i8) {
        *self.get_mut(stat) = stage.clamp(MIN_STAGE, MAX_STAGE);
    }

    pub fn has_negative(&self) -> bool {
        StatKind::ALL.iter().any(|stat| self.get(*stat) < 0)
    }

    /// Resets every lowered stage to zero, leaving raised stages alone.
    pub fn clear_negative(&mut self) {
        for stat in StatKind::ALL {
            let stage = self.get_mut(stat);
            if *stage < 0 {
                *stage = 0;
            }
        }
    }
}

/// Base stats of one form, as delivered by the data loader.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

/// Nature multipliers for the five battle stats (1.1 / 1.0 / 0.9).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NatureMultipliers {
    pub attack: f64,
    pub defense: f64,
    pub sp_attack: f64,
    pub sp_defense: f64,
    pub speed: f64,
}

impl Default for NatureMultipliers {
    fn default() -> Self {
        Self {
            attack: 1.0,
            defense: 1.0,
            sp_attack: 1.0,
            sp_defense: 1.0,
            speed: 1.0,
        }
    }
}

impl NatureMultipliers {
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpAttack => self.sp_attack,
            StatKind::SpDefense => self.sp_defense,
            StatKind::Speed => self.speed,
            StatKind::Accuracy | StatKind::Evasion => 1.0,
        }
    }
}

/// Live values of the five battle stats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatsSet {
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl StatsSet {
    pub fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpAttack => self.sp_attack,
            StatKind::SpDefense => self.sp_defense,
            StatKind::Speed => self.speed,
            StatKind::Accuracy | StatKind::Evasion => 0,
        }
    }

    /// Recomputes live stats for a form. IV/EV arrays are ordered
    /// hp, attack, defense, sp. attack, sp. defense, speed.
    pub fn from_base(base: &BaseStats, ivs: [u8; 6], evs: [u8; 6], level: u8, nature: &NatureMultipliers) -> Self {
        let stat = |value: u32, idx: usize, kind: StatKind| calc_stat(value, ivs[idx], evs[idx], level, nature.get(kind));
        Self {
            attack: stat(base.attack, 1, StatKind::Attack),
            defense: stat(base.defense, 2, StatKind::Defense),
            sp_attack: stat(base.sp_attack, 3, StatKind::SpAttack),
            sp_defense: stat(base.sp_defense, 4, StatKind::SpDefense),
            speed: stat(base.speed, 5, StatKind::Speed),
        }
    }
}

pub fn calc_hp(base: u32, iv: u8, ev: u8, level: u8) -> u32 {
    if base == 1 {
        // Shedinja.
        return 1;
    }
    let ev_quarter = (ev / 4) as u32;
    let base_value = base * 2 + iv as u32 + ev_quarter;
    let intermediate = (base_value * level as u32) / 100;
    intermediate + level as u32 + 10
}

pub fn calc_stat(base: u32, iv: u8, ev: u8, level: u8, nature_mod: f64) -> u32 {
    let ev_quarter = (ev / 4) as u32;
    let base_value = base * 2 + iv as u32 + ev_quarter;
    let intermediate = (base_value * level as u32) / 100;
    let stat = (intermediate + 5) as f64 * nature_mod;
    stat.floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_table_is_centered_on_zero() {
        assert_eq!(stage_multiplier(0), 1.0);
        assert_eq!(stage_multiplier(-6), 0.25);
        assert_eq!(stage_multiplier(6), 4.0);
        assert_eq!(stage_multiplier(1), 1.5);
        assert!((stage_multiplier(-1) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stage_multiplier(12), 4.0);
    }

    #[test]
    fn stat_names_parse() {
        assert_eq!("special attack".parse::<StatKind>().unwrap(), StatKind::SpAttack);
        assert_eq!("sp-defense".parse::<StatKind>().unwrap(), StatKind::SpDefense);
        assert_eq!("ATK".parse::<StatKind>().unwrap(), StatKind::Attack);
        assert!("luck".parse::<StatKind>().is_err());
    }

    #[test]
    fn stages_are_clamped_on_set() {
        let mut stages = StatStages::default();
        stages.set(StatKind::Speed, 9);
        stages.set(StatKind::Evasion, -9);
        assert_eq!(stages.speed, 6);
        assert_eq!(stages.evasion, -6);
        stages.clear_negative();
        assert_eq!(stages.evasion, 0);
        assert_eq!(stages.speed, 6);
    }

    #[test]
    fn level_fifty_stats_match_reference() {
        // Charizard, Adamant, 0/252/0/0/4/252.
        let base = BaseStats {
            hp: 78,
            attack: 84,
            defense: 78,
            sp_attack: 109,
            sp_defense: 85,
            speed: 100,
        };
        let nature = NatureMultipliers {
            attack: 1.1,
            sp_attack: 0.9,
            ..NatureMultipliers::default()
        };
        let ivs = [31; 6];
        let evs = [0, 252, 0, 0, 4, 252];
        assert_eq!(calc_hp(base.hp, ivs[0], evs[0], 50), 153);
        let stats = StatsSet::from_base(&base, ivs, evs, 50, &nature);
        assert_eq!(stats.attack, 149);
        assert_eq!(stats.defense, 98);
        assert_eq!(stats.sp_attack, 116);
        assert_eq!(stats.sp_defense, 106);
        assert_eq!(stats.speed, 152);
    }
}
