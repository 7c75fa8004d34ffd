#![allow(dead_code)]

use pokemon_duel_core::prelude::*;
use pokemon_duel_core::sim::stats::{BaseStats, NatureMultipliers};
use std::collections::HashMap;

pub fn make_move(name: &str, move_type: ElementType, damage_class: DamageClass, contact: bool) -> MoveDescriptor {
    MoveDescriptor {
        id: 1,
        name: name.to_string(),
        move_type,
        damage_class,
        effect: 0,
        power: Some(80),
        accuracy: Some(100),
        priority: 0,
        crit_rate: 0,
        min_hits: None,
        max_hits: None,
        pp: 10,
        flags: MoveFlags {
            contact,
            ..MoveFlags::default()
        },
    }
}

pub fn tackle() -> MoveDescriptor {
    make_move("tackle", ElementType::Normal, DamageClass::Physical, true)
}

/// A Normal-type with flat 100 base stats and the given max HP.
pub fn make_mon(species: &str, max_hp: u32, ability: &str) -> CombatantSnapshot {
    let base = BaseStats {
        hp: 100,
        attack: 100,
        defense: 100,
        sp_attack: 100,
        sp_defense: 100,
        speed: 100,
    };
    CombatantSnapshot {
        species_id: 1,
        species_name: species.to_string(),
        nickname: None,
        form: species.to_lowercase(),
        level: 50,
        max_hp,
        hp: None,
        base_stats: HashMap::from([(species.to_lowercase(), base)]),
        form_types: HashMap::new(),
        ivs: [31; 6],
        evs: [0; 6],
        nature: NatureMultipliers::default(),
        types: vec![ElementType::Normal],
        ability: ability.to_string(),
        item: None,
        gender: None,
        moves: vec![tackle()],
        weight: 500,
    }
}

pub fn trainer(name: &str, side: Side, party: &[CombatantSnapshot]) -> Trainer {
    let party = party
        .iter()
        .enumerate()
        .map(|(slot, snapshot)| Pokemon::from_snapshot(snapshot, side, slot as u64).unwrap())
        .collect();
    Trainer::new(name, party)
}

pub fn options(seed: u64) -> BattleOptions {
    BattleOptions {
        seed: Some(seed),
        record_log: true,
        ..BattleOptions::default()
    }
}

/// Both leads sent out through the regular entry path.
pub fn start(a: &[CombatantSnapshot], b: &[CombatantSnapshot]) -> Battle {
    let mut battle = Battle::new(trainer("Red", Side::A, a), trainer("Blue", Side::B, b), &options(42));
    battle.switch_in(Side::A, 0);
    battle.switch_in(Side::B, 0);
    battle
}

pub fn lead(side: Side) -> MonRef {
    MonRef::new(side, 0)
}
