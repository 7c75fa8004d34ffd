//! Builders shared by the unit tests.

use crate::config::BattleOptions;
use crate::model::{CombatantSnapshot, Gender};
use crate::sim::battle::{Battle, Side, Trainer};
use crate::sim::moves::{DamageClass, MoveDescriptor, MoveFlags};
use crate::sim::pokemon::Pokemon;
use crate::sim::stats::{calc_hp, BaseStats, NatureMultipliers};
use crate::sim::types::ElementType;
use std::collections::HashMap;

const LEVEL: u8 = 50;

fn display_name(species: &str) -> String {
    let mut chars = species.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// A level 50 Normal-type with 100 in every base stat and no ability or item.
pub(crate) fn snapshot(species: &str) -> CombatantSnapshot {
    let base = BaseStats {
        hp: 100,
        attack: 100,
        defense: 100,
        sp_attack: 100,
        sp_defense: 100,
        speed: 100,
    };
    CombatantSnapshot {
        species_id: 0,
        species_name: display_name(species),
        nickname: None,
        form: species.to_string(),
        level: LEVEL,
        max_hp: calc_hp(base.hp, 31, 0, LEVEL),
        hp: None,
        base_stats: HashMap::from([(species.to_string(), base)]),
        form_types: HashMap::new(),
        ivs: [31; 6],
        evs: [0; 6],
        nature: NatureMultipliers::default(),
        types: vec![ElementType::Normal],
        ability: "none".to_string(),
        item: None,
        gender: None,
        moves: vec![tackle()],
        weight: 1000,
    }
}

pub(crate) fn with_ability(mut snapshot: CombatantSnapshot, ability: &str) -> CombatantSnapshot {
    snapshot.ability = ability.to_string();
    snapshot
}

pub(crate) fn with_item(mut snapshot: CombatantSnapshot, item: &str) -> CombatantSnapshot {
    snapshot.item = Some(item.to_string());
    snapshot
}

pub(crate) fn with_types(mut snapshot: CombatantSnapshot, types: &[ElementType]) -> CombatantSnapshot {
    snapshot.types = types.to_vec();
    snapshot
}

pub(crate) fn with_gender(mut snapshot: CombatantSnapshot, gender: Gender) -> CombatantSnapshot {
    snapshot.gender = Some(gender);
    snapshot
}

/// Registers an extra form with the same base stats as the starting one.
pub(crate) fn with_form(mut snapshot: CombatantSnapshot, form: &str, types: &[ElementType]) -> CombatantSnapshot {
    let base = snapshot.base_stats[&snapshot.form];
    snapshot.base_stats.insert(form.to_string(), base);
    snapshot.form_types.insert(form.to_string(), types.to_vec());
    snapshot
}

pub(crate) fn move_named(name: &str, move_type: ElementType, damage_class: DamageClass) -> MoveDescriptor {
    MoveDescriptor {
        id: 0,
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
        flags: MoveFlags::default(),
    }
}

pub(crate) fn tackle() -> MoveDescriptor {
    let mut tackle = move_named("tackle", ElementType::Normal, DamageClass::Physical);
    tackle.id = 33;
    tackle.flags.contact = true;
    tackle
}

fn trainer(name: &str, side: Side, party: Vec<CombatantSnapshot>) -> Trainer {
    let party = party
        .iter()
        .enumerate()
        .map(|(slot, snapshot)| {
            Pokemon::from_snapshot(snapshot, side, (side.index() * 10 + slot) as u64).expect("test snapshot is valid")
        })
        .collect();
    Trainer::new(name, party)
}

/// A seeded battle with nobody sent out yet.
pub(crate) fn battle_with(a: Vec<CombatantSnapshot>, b: Vec<CombatantSnapshot>) -> Battle {
    let options = BattleOptions {
        seed: Some(0),
        ..BattleOptions::default()
    };
    Battle::new(trainer("Red", Side::A, a), trainer("Blue", Side::B, b), &options)
}

/// A battle with both leads already on the field, without running entry effects.
pub(crate) fn active_battle(a: CombatantSnapshot, b: CombatantSnapshot) -> Battle {
    let mut battle = battle_with(vec![a], vec![b]);
    battle.trainers[0].current = Some(0);
    battle.trainers[1].current = Some(0);
    battle
}

pub(crate) fn add_bench(battle: &mut Battle, side: Side, snapshot: CombatantSnapshot) {
    let trainer = battle.trainer_mut(side);
    let slot = trainer.party.len();
    let mut mon = Pokemon::from_snapshot(&snapshot, side, (side.index() * 10 + slot) as u64).expect("test snapshot is valid");
    mon.slot = slot;
    trainer.party.push(mon);
}
