//! Reactions to a combatant being hit by a move.

use crate::sim::abilities::events::AbilityTrigger;
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::{damage, heal, DamageContext};
use crate::sim::items::battle_items::pop_air_balloon;
use crate::sim::moves::{DamageClass, MoveDescriptor};
use crate::sim::stat_stages::{append_stat, append_stats};
use crate::sim::stats::{StatKind, MAX_STAGE};
use crate::sim::status::{apply_status, cure_status, StatusKind};
use crate::sim::types::ElementType;
use crate::sim::weather_field::{TerrainKind, WeatherKind};

/// Attacker-side effects after `target` was knocked out by `move_`.
pub fn on_knocked_out(battle: &mut Battle, target: MonRef, attacker: MonRef, move_: &MoveDescriptor, dealt: u32) -> String {
    let mut msg = String::new();
    if battle.mon(attacker).hp == 0 {
        return msg;
    }
    let fallen = battle.mon(target);
    let fallen_ability = fallen.ability;
    let fallen_name = fallen.name().to_string();
    if fallen_ability.responds_to(AbilityTrigger::OnKnockOut) {
        match fallen_ability {
            Ability::Aftermath if move_.makes_contact() => {
                let damp = battle.active_mons().into_iter().any(|r| battle.ability(r) == Ability::Damp);
                if !damp {
                    let amount = battle.mon(attacker).hp_fraction(4);
                    let source = format!("{fallen_name}'s aftermath");
                    msg += &damage(battle, attacker, amount, &DamageContext::indirect(&source)).0;
                }
            }
            Ability::InnardsOut => {
                let source = format!("{fallen_name}'s innards out");
                msg += &damage(battle, attacker, dealt, &DamageContext::indirect(&source)).0;
            }
            _ => {}
        }
    }
    if battle.mon(attacker).hp > 0 && battle.ability(attacker) == Ability::BeastBoost {
        let mon = battle.mon(attacker);
        let best = StatKind::BATTLE
            .into_iter()
            .max_by_key(|stat| (mon.stats.get(*stat), std::cmp::Reverse(*stat as u8)))
            .unwrap_or(StatKind::Attack);
        msg += &append_stat(battle, attacker, 1, Some(attacker), None, best, true);
    }
    msg
}

/// Defender-side reactions to a hit that left it standing.
pub fn after_hit(
    battle: &mut Battle,
    target: MonRef,
    attacker: MonRef,
    move_: &MoveDescriptor,
    move_type: ElementType,
    critical: bool,
    crossed_half: bool,
) -> String {
    let mut msg = String::new();
    if move_type == ElementType::Fire && battle.mon(target).nv.is(StatusKind::Freeze) {
        msg += &cure_status(battle, target, "");
    }

    let ability = battle.ability(target);
    let name = battle.mon(target).name().to_string();
    let physical = move_.damage_class == DamageClass::Physical;
    let external = attacker != target;
    let raise = |battle: &mut Battle, stat: StatKind, delta: i8| append_stat(battle, target, delta, Some(target), None, stat, true);

    if ability.responds_to(AbilityTrigger::OnDamagingHit) && external {
        msg += &match ability {
            Ability::ColorChange if !battle.mon(target).has_type(move_type) && move_type != ElementType::Typeless => {
                battle.mon_mut(target).types = vec![move_type];
                format!("{name}'s Color Change made it the {move_type} type!\n")
            }
            Ability::AngerPoint if critical && battle.mon(target).stages.attack < MAX_STAGE => {
                battle.mon_mut(target).stages.set(StatKind::Attack, MAX_STAGE);
                format!("{name}'s Anger Point maxed its attack!\n")
            }
            Ability::Justified if move_type == ElementType::Dark => raise(battle, StatKind::Attack, 1),
            Ability::Rattled if matches!(move_type, ElementType::Bug | ElementType::Dark | ElementType::Ghost) => {
                raise(battle, StatKind::Speed, 1)
            }
            Ability::Stamina => raise(battle, StatKind::Defense, 1),
            Ability::WaterCompaction if move_type == ElementType::Water => raise(battle, StatKind::Defense, 2),
            Ability::SteamEngine if matches!(move_type, ElementType::Water | ElementType::Fire) => {
                raise(battle, StatKind::Speed, 6)
            }
            Ability::ThermalExchange if move_type == ElementType::Fire => raise(battle, StatKind::Attack, 1),
            Ability::WeakArmor if physical => {
                append_stats(battle, target, &[(StatKind::Defense, -1), (StatKind::Speed, 2)], Some(target), None)
            }
            Ability::Electromorphosis => {
                battle.mon_mut(target).volatile.charge.set(Some(2));
                format!("Being hit by {} charged {name} with power!\n", move_.name)
            }
            Ability::WindPower if move_.flags.wind => {
                battle.mon_mut(target).volatile.charge.set(Some(2));
                format!("Being hit by {} charged {name} with power!\n", move_.name)
            }
            Ability::SandSpit => battle.set_weather(WeatherKind::Sandstorm, Some(target)),
            Ability::SeedSower => battle.set_terrain(TerrainKind::Grassy, Some(target)),
            Ability::CottonDown => {
                let mut msg = String::new();
                for other in battle.active_mons().into_iter().filter(|r| *r != target) {
                    msg += &append_stat(battle, other, -1, Some(target), None, StatKind::Speed, true);
                }
                msg
            }
            Ability::ToxicDebris if physical => {
                let conditions = &mut battle.trainer_mut(attacker.side).conditions;
                if conditions.toxic_spikes < 2 {
                    conditions.toxic_spikes += 1;
                    "Poison spikes were scattered on the ground all around the opposing team!\n".to_string()
                } else {
                    String::new()
                }
            }
            Ability::Berserk if crossed_half => raise(battle, StatKind::SpAttack, 1),
            Ability::AngerShell if crossed_half => append_stats(
                battle,
                target,
                &[
                    (StatKind::Attack, 1),
                    (StatKind::SpAttack, 1),
                    (StatKind::Speed, 1),
                    (StatKind::Defense, -1),
                    (StatKind::SpDefense, -1),
                ],
                Some(target),
                None,
            ),
            Ability::Illusion => {
                if battle.mon_mut(target).volatile.illusion_name.take().is_some() {
                    format!("{}'s illusion wore off!\n", battle.mon(target).name())
                } else {
                    String::new()
                }
            }
            _ => String::new(),
        };
    }
    if move_.is_damaging() {
        msg += &pop_air_balloon(battle, target);
    }
    msg
}

/// Bookkeeping every damaging hit leaves behind, and the attacker-side hooks
/// that read it.
pub fn record_hit(battle: &mut Battle, target: MonRef, attacker: MonRef, move_: &MoveDescriptor, dealt: u32) -> String {
    let mut msg = String::new();
    let external = attacker != target;
    {
        let volatile = &mut battle.mon_mut(target).volatile;
        volatile.last_move_damage = Some((dealt, move_.damage_class));
        if let Some(stored) = volatile.bide.as_mut() {
            *stored += dealt;
        }
    }
    if !external || battle.mon(attacker).hp == 0 {
        return msg;
    }
    if battle.mon(target).volatile.rage && battle.mon(target).hp > 0 {
        msg += &format!("{}'s rage is building!\n", battle.mon(target).name());
        msg += &append_stat(battle, target, 1, Some(target), None, StatKind::Attack, true);
    }

    if battle.ability(target) == Ability::CursedBody && battle.rng.chance(3, 10) {
        msg += &cursed_body(battle, target, attacker);
    }

    let attacker_ability = battle.ability(attacker);
    let sheer_force = battle.mon(attacker).volatile.turn.sheer_force_boosted;
    if attacker_ability == Ability::Magician && battle.mon(attacker).held_item.is_empty() && !sheer_force {
        if let Some(item) = battle.remove_item(target, Some(attacker)) {
            let thief = battle.mon_mut(attacker);
            thief.held_item.give(&item);
            thief.persistent.ever_held_item = true;
            msg += &format!(
                "{} stole {}'s {}!\n",
                battle.mon(attacker).name(),
                battle.mon(target).name(),
                item.replace('-', " ")
            );
        }
    }
    if attacker_ability == Ability::ToxicChain && battle.rng.chance(3, 10) {
        let source = format!("{}'s toxic chain", battle.mon(attacker).name());
        msg += &apply_status(battle, target, StatusKind::BadlyPoisoned, Some(attacker), Some(move_), &source, false);
    }
    if battle.holds(attacker, "shell-bell") && !sheer_force && dealt > 0 {
        msg += &heal(battle, attacker, (dealt / 8).max(1), "its shell bell");
    }
    msg
}

/// Disables the move that just hit, unless the attacker is shielded by Aroma
/// Veil or the move was sound-based against a Soundproof target.
fn cursed_body(battle: &mut Battle, target: MonRef, attacker: MonRef) -> String {
    if battle.ability(attacker) == Ability::AromaVeil {
        return String::new();
    }
    let foe = battle.mon(attacker);
    let Some(slot) = foe.volatile.last_move else {
        return String::new();
    };
    let sound = foe.moves.get(slot).is_some_and(|m| m.descriptor.flags.sound);
    if foe.volatile.disable.active() || (sound && battle.ability(target) == Ability::Soundproof) {
        return String::new();
    }
    let move_name = foe.moves.get(slot).map(|m| m.descriptor.name.clone()).unwrap_or_default();
    let foe_name = foe.name().to_string();
    battle.mon_mut(attacker).volatile.disable.set(slot, Some(4));
    format!("{foe_name}'s {move_name} was disabled by {}'s Cursed Body!\n", battle.mon(target).name())
}

/// Emergency Exit and Wimp Out pull their holder out below half HP.
pub fn low_hp_retreat(battle: &mut Battle, target: MonRef) -> String {
    let ability = battle.ability(target);
    if !matches!(ability, Ability::EmergencyExit | Ability::WimpOut) {
        return String::new();
    }
    if battle.mon(target).hp == 0 || !battle.trainer(target.side).has_other_alive(target.slot) {
        return String::new();
    }
    let mon = battle.mon_mut(target);
    mon.volatile.swap_out = true;
    format!("{}'s {ability} activated!\n", mon.name())
}

/// Cramorant spits out its catch at whoever hit it.
pub fn gulp_missile(battle: &mut Battle, target: MonRef, attacker: MonRef) -> String {
    if battle.ability(target) != Ability::GulpMissile || battle.mon(attacker).hp == 0 {
        return String::new();
    }
    let form = battle.mon(target).form.clone();
    let gorging = match form.as_str() {
        "cramorant-gulping" => false,
        "cramorant-gorging" => true,
        _ => return String::new(),
    };
    battle.mon_mut(target).form("cramorant");
    let source = format!("{}'s gulp missile", battle.mon(target).name());
    let amount = battle.mon(attacker).hp_fraction(4);
    let mut msg = damage(battle, attacker, amount, &DamageContext::indirect(&source)).0;
    if gorging {
        msg += &apply_status(battle, attacker, StatusKind::Paralysis, Some(target), None, &source, false);
    } else {
        msg += &append_stat(battle, attacker, -1, Some(target), None, StatKind::Defense, true);
    }
    msg
}
