//! Abilities that act when their holder enters the field.

use crate::sim::abilities::events::AbilityTrigger;
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef, Side};
use crate::sim::items::type_items::{memory_type, plate_type};
use crate::sim::pokemon::{effective_stat, effectiveness};
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::StatKind;
use crate::sim::weather_field::{update_terrain_types, update_weather_forms, TerrainKind, WeatherKind};

const OHKO_MOVES: [&str; 4] = ["fissure", "guillotine", "horn-drill", "sheer-cold"];

/// Runs the entry ability of `target`.
///
/// `check_looping` is false when this call comes from a copied ability, so a
/// Trace that copies Trace stops after one copy.
pub fn on_send_out(battle: &mut Battle, target: MonRef, check_looping: bool) -> String {
    let ability = battle.ability(target);
    if !ability.responds_to(AbilityTrigger::OnSendOut) {
        return String::new();
    }
    let name = battle.mon(target).name().to_string();
    let opponent = battle.opponent(target).filter(|foe| battle.mon(*foe).hp > 0);
    log::trace!("{name} entry ability {}", ability.id());

    if let Some(weather) = weather_setter(ability) {
        return battle.set_weather(weather, Some(target));
    }
    if let Some(terrain) = terrain_setter(ability) {
        return battle.set_terrain(terrain, Some(target));
    }
    if let Some(aura) = aura_message(ability, &name, battle, target.side) {
        return aura;
    }

    match ability {
        Ability::OrichalcumPulse => {
            let mut msg = format!("{name} turned the sunlight harsh, sending its ancient pulse into a frenzy!\n");
            msg += &battle.set_weather(WeatherKind::Sun, Some(target));
            msg
        }
        Ability::HadronEngine => {
            let mut msg = format!("{name} turned the ground into Electric Terrain, energizing its futuristic engine!\n");
            msg += &battle.set_terrain(TerrainKind::Electric, Some(target));
            msg
        }
        Ability::Intimidate => opponent.map_or_else(String::new, |foe| intimidate(battle, target, foe)),
        Ability::ScreenCleaner => {
            for side in [Side::A, Side::B] {
                battle.trainer_mut(side).conditions.clear_screens();
            }
            format!("{name}'s Screen Cleaner removed the effects of screens!\n")
        }
        Ability::IntrepidSword => append_stat(battle, target, 1, Some(target), None, StatKind::Attack, true),
        Ability::DauntlessShield => append_stat(battle, target, 1, Some(target), None, StatKind::Defense, true),
        Ability::Download => opponent.map_or_else(String::new, |foe| {
            let stat = if effective_stat(battle, foe, StatKind::Defense) < effective_stat(battle, foe, StatKind::SpDefense) {
                StatKind::Attack
            } else {
                StatKind::SpAttack
            };
            append_stat(battle, target, 1, Some(target), None, stat, true)
        }),
        Ability::Trace => opponent.map_or_else(String::new, |foe| trace(battle, target, foe, check_looping)),
        Ability::Anticipation => opponent.map_or_else(String::new, |foe| anticipation(battle, target, foe)),
        Ability::Forewarn => opponent.map_or_else(String::new, |foe| forewarn(battle, target, foe)),
        Ability::Frisk => opponent
            .and_then(|foe| {
                let item = battle.mon(foe).held_item.id()?.replace('-', " ");
                Some(format!("{name} frisked {} and found its {item}!\n", battle.mon(foe).name()))
            })
            .unwrap_or_default(),
        Ability::Multitype | Ability::RksSystem => type_lock(battle, target, ability),
        Ability::Forecast | Ability::FlowerGift => update_weather_forms(battle),
        Ability::Mimicry => update_terrain_types(battle),
        Ability::WindRider if battle.trainer(target.side).conditions.tailwind.active() => {
            append_stat(battle, target, 1, Some(target), None, StatKind::Attack, true)
        }
        Ability::SupersweetSyrup if !battle.mon(target).persistent.supersweet_syrup => {
            battle.mon_mut(target).persistent.supersweet_syrup = true;
            let mut msg = format!("A supersweet aroma is wafting from the syrup covering {name}!\n");
            if let Some(foe) = opponent {
                msg += &append_stat(battle, foe, -1, Some(target), None, StatKind::Evasion, true);
            }
            msg
        }
        Ability::SlowStart => {
            battle.mon_mut(target).volatile.slow_start.set(Some(5));
            format!("{name} can't get it going!\n")
        }
        Ability::ZeroToHero if battle.mon(target).form == "palafin-hero" => {
            format!("{name} underwent a heroic transformation!\n")
        }
        _ => String::new(),
    }
}

fn weather_setter(ability: Ability) -> Option<WeatherKind> {
    match ability {
        Ability::Drizzle => Some(WeatherKind::Rain),
        Ability::Drought => Some(WeatherKind::Sun),
        Ability::SandStream => Some(WeatherKind::Sandstorm),
        Ability::SnowWarning => Some(WeatherKind::Snow),
        Ability::PrimordialSea => Some(WeatherKind::HeavyRain),
        Ability::DesolateLand => Some(WeatherKind::HarshSunlight),
        Ability::DeltaStream => Some(WeatherKind::StrongWinds),
        _ => None,
    }
}

fn terrain_setter(ability: Ability) -> Option<TerrainKind> {
    match ability {
        Ability::ElectricSurge => Some(TerrainKind::Electric),
        Ability::GrassySurge => Some(TerrainKind::Grassy),
        Ability::MistySurge => Some(TerrainKind::Misty),
        Ability::PsychicSurge => Some(TerrainKind::Psychic),
        _ => None,
    }
}

/// Entry abilities that only announce themselves.
fn aura_message(ability: Ability, name: &str, battle: &Battle, side: Side) -> Option<String> {
    let text = match ability {
        Ability::Pressure => format!("{name} is exerting its pressure!\n"),
        Ability::MoldBreaker => format!("{name} breaks the mold!\n"),
        Ability::Teravolt => format!("{name} is radiating a bursting aura!\n"),
        Ability::Turboblaze => format!("{name} is radiating a blazing aura!\n"),
        Ability::DarkAura => format!("{name} is radiating a dark aura!\n"),
        Ability::FairyAura => format!("{name} is radiating a fairy aura!\n"),
        Ability::AuraBreak => format!("{name} reversed all other Pokemon's auras!\n"),
        Ability::Comatose => format!("{name} is drowsing!\n"),
        Ability::AirLock | Ability::CloudNine => "The effects of the weather disappeared.\n".to_string(),
        Ability::NeutralizingGas => "Neutralizing gas filled the area!\n".to_string(),
        Ability::Unnerve => {
            let foe = &battle.trainer(side.opposite()).name;
            format!("{foe}'s team is too nervous to eat berries!\n")
        }
        Ability::SwordOfRuin => format!("{name}'s Sword of Ruin weakened the defense of all surrounding Pokemon!\n"),
        Ability::BeadsOfRuin => format!("{name}'s Beads of Ruin weakened the special defense of all surrounding Pokemon!\n"),
        Ability::TabletsOfRuin => format!("{name}'s Tablets of Ruin weakened the attack of all surrounding Pokemon!\n"),
        Ability::VesselOfRuin => format!("{name}'s Vessel of Ruin weakened the special attack of all surrounding Pokemon!\n"),
        _ => return None,
    };
    Some(text)
}

fn intimidate(battle: &mut Battle, user: MonRef, foe: MonRef) -> String {
    if battle.mon(foe).volatile.substitute > 0 {
        return String::new();
    }
    let mut msg = format!("{}'s Intimidate cuts {}'s attack!\n", battle.mon(user).name(), battle.mon(foe).name());
    let foe_name = battle.mon(foe).name().to_string();
    match battle.ability_against(foe, Some(user), None) {
        blocker @ (Ability::InnerFocus | Ability::Oblivious | Ability::OwnTempo | Ability::Scrappy) => {
            msg += &format!("{foe_name}'s {blocker} prevents intimidation!\n");
            return msg;
        }
        Ability::GuardDog => {
            msg += &append_stat(battle, foe, 1, Some(foe), None, StatKind::Attack, true);
            return msg;
        }
        _ => {}
    }
    msg += &append_stat(battle, foe, -1, Some(user), None, StatKind::Attack, true);
    if battle.ability(foe) == Ability::Rattled {
        msg += &append_stat(battle, foe, 1, Some(foe), None, StatKind::Speed, true);
    }
    if battle.holds(foe, "adrenaline-orb") {
        battle.consume_item(foe);
        msg += &format!("{foe_name} used its adrenaline orb!\n");
        msg += &append_stat(battle, foe, 1, Some(foe), None, StatKind::Speed, true);
    }
    msg
}

fn trace(battle: &mut Battle, user: MonRef, foe: MonRef, check_looping: bool) -> String {
    let copied = battle.mon(foe).ability;
    if copied.untraceable() {
        return String::new();
    }
    battle.mon_mut(user).ability = copied;
    let mut msg = format!(
        "{} traced {}'s {copied}!\n",
        battle.mon(user).name(),
        battle.mon(foe).name()
    );
    if check_looping {
        msg += &on_send_out(battle, user, false);
    }
    msg
}

fn anticipation(battle: &Battle, user: MonRef, foe: MonRef) -> String {
    let dangerous = battle.mon(foe).moves.iter().any(|slot| {
        let descriptor = &slot.descriptor;
        OHKO_MOVES.contains(&descriptor.name.as_str())
            || (descriptor.is_damaging() && effectiveness(battle, user, descriptor.move_type, None, None) > 1.0)
    });
    if dangerous {
        format!("{} shuddered!\n", battle.mon(user).name())
    } else {
        String::new()
    }
}

/// Reveals the opponent's strongest move. OHKO moves count as 150 power and
/// ties are broken at random.
fn forewarn(battle: &mut Battle, user: MonRef, foe: MonRef) -> String {
    let rated: Vec<(u32, String)> = battle
        .mon(foe)
        .moves
        .iter()
        .map(|slot| {
            let descriptor = &slot.descriptor;
            let power = if OHKO_MOVES.contains(&descriptor.name.as_str()) {
                150
            } else {
                descriptor.power.unwrap_or(0)
            };
            (power, descriptor.name.clone())
        })
        .collect();
    let Some(best) = rated.iter().map(|(power, _)| *power).max() else {
        return String::new();
    };
    let tied: Vec<&String> = rated.iter().filter(|(power, _)| *power == best).map(|(_, name)| name).collect();
    let Some(pick) = battle.rng.pick(&tied) else {
        return String::new();
    };
    format!("{}'s Forewarn alerted it to {pick}!\n", battle.mon(user).name())
}

/// Arceus and Silvally take the type of their plate or memory.
fn type_lock(battle: &mut Battle, target: MonRef, ability: Ability) -> String {
    let (element, species) = match ability {
        Ability::Multitype => (battle.usable_item(target).and_then(plate_type), "arceus"),
        _ => (battle.usable_item(target).and_then(memory_type), "silvally"),
    };
    let Some(element) = element else {
        return String::new();
    };
    let mon = battle.mon_mut(target);
    if mon.types == [element] {
        return String::new();
    }
    let form = format!("{species}-{}", element.name().to_ascii_lowercase());
    mon.form(&form);
    mon.types = vec![element];
    format!("{} transformed into the {element} type!\n", mon.name())
}
