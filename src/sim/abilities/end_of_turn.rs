//! Ability upkeep run once per combatant at the end of every turn.

use crate::sim::abilities::events::AbilityTrigger;
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::{damage, heal, DamageContext};
use crate::sim::items::berries::is_berry;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::{StatKind, MAX_STAGE, MIN_STAGE};
use crate::sim::status::{cure_status, is_asleep, status_blocked_by_ability};
use crate::sim::weather_field::WeatherKind;

/// Self cures, weather healing, stat and item upkeep, then HP-driven form changes.
pub fn ability_upkeep(battle: &mut Battle, target: MonRef) -> String {
    if battle.mon(target).hp == 0 {
        return String::new();
    }
    let ability = battle.ability(target);
    let mut msg = String::new();

    // A status picked up before the ability changed is shed now.
    if ability.responds_to(AbilityTrigger::OnStatusImmunity) {
        if let Some(kind) = battle.mon(target).nv.current() {
            if status_blocked_by_ability(ability, kind) {
                let source = format!("its {}", ability.name().to_lowercase());
                msg += &cure_status(battle, target, &source);
            }
        }
    }
    if !ability.responds_to(AbilityTrigger::OnEndOfTurn) {
        return msg;
    }

    msg += &match ability {
        Ability::DrySkin | Ability::RainDish | Ability::IceBody | Ability::SolarPower => {
            weather_upkeep(battle, target, ability)
        }
        Ability::Moody => moody(battle, target),
        Ability::Pickup => pickup(battle, target),
        Ability::Harvest => harvest(battle, target),
        // Not on the turn it came in.
        Ability::SpeedBoost if battle.mon(target).volatile.active_turns > 1 => {
            append_stat(battle, target, 1, Some(target), None, StatKind::Speed, true)
        }
        Ability::SlowStart => {
            if battle.mon_mut(target).volatile.slow_start.tick() {
                format!("{} finally got its act together!\n", battle.mon(target).name())
            } else {
                String::new()
            }
        }
        Ability::ZenMode
        | Ability::Schooling
        | Ability::ShieldsDown
        | Ability::PowerConstruct
        | Ability::HungerSwitch => form_upkeep(battle, target, ability),
        _ => String::new(),
    };
    msg
}

fn weather_upkeep(battle: &mut Battle, target: MonRef, ability: Ability) -> String {
    let weather = battle.weather();
    let rain = matches!(weather, Some(WeatherKind::Rain | WeatherKind::HeavyRain));
    let sun = matches!(weather, Some(WeatherKind::Sun | WeatherKind::HarshSunlight));
    let cold = matches!(weather, Some(WeatherKind::Hail | WeatherKind::Snow));
    let utility_umbrella = battle.holds(target, "utility-umbrella");
    let eighth = battle.mon(target).hp_fraction(8);
    let sixteenth = battle.mon(target).hp_fraction(16);
    let source = format!("its {}", ability.name().to_lowercase());
    match ability {
        Ability::DrySkin if rain && !utility_umbrella => heal(battle, target, eighth, &source),
        Ability::DrySkin | Ability::SolarPower if sun && !utility_umbrella => {
            damage(battle, target, eighth, &DamageContext::indirect(&source)).0
        }
        Ability::RainDish if rain && !utility_umbrella => heal(battle, target, sixteenth, &source),
        Ability::IceBody if cold => heal(battle, target, sixteenth, &source),
        _ => String::new(),
    }
}

/// +2 to one stat that can still rise, then -1 to a different one that can still fall.
fn moody(battle: &mut Battle, target: MonRef) -> String {
    let stages = battle.mon(target).stages;
    let raisable: Vec<StatKind> = StatKind::BATTLE
        .into_iter()
        .filter(|stat| stages.get(*stat) < MAX_STAGE)
        .collect();
    let raised = battle.rng.pick(&raisable).copied();
    let lowerable: Vec<StatKind> = StatKind::BATTLE
        .into_iter()
        .filter(|stat| Some(*stat) != raised && stages.get(*stat) > MIN_STAGE)
        .collect();
    let lowered = battle.rng.pick(&lowerable).copied();

    let mut msg = String::new();
    if let Some(stat) = raised {
        msg += &append_stat(battle, target, 2, Some(target), None, stat, true);
    }
    if let Some(stat) = lowered {
        msg += &append_stat(battle, target, -1, Some(target), None, stat, true);
    }
    msg
}

/// Picks up the item the opponent used up this turn.
fn pickup(battle: &mut Battle, target: MonRef) -> String {
    if !battle.mon(target).held_item.is_empty() {
        return String::new();
    }
    let Some(opponent) = battle.opponent(target) else {
        return String::new();
    };
    let Some(item) = battle.mon_mut(opponent).volatile.turn.consumed_item.take() else {
        return String::new();
    };
    let mon = battle.mon_mut(target);
    mon.held_item.give(&item);
    format!("{} found one {}!\n", mon.name(), item.replace('-', " "))
}

/// Regrows the last eaten berry: always in sun, otherwise half the time.
fn harvest(battle: &mut Battle, target: MonRef) -> String {
    let mon = battle.mon(target);
    if !mon.held_item.is_empty() || !mon.held_item.last_consumed().is_some_and(is_berry) {
        return String::new();
    }
    let sun = matches!(battle.weather(), Some(WeatherKind::Sun | WeatherKind::HarshSunlight));
    if !sun && !battle.rng.chance(1, 2) {
        return String::new();
    }
    let mon = battle.mon_mut(target);
    let Some(berry) = mon.held_item.restore().map(|id| id.replace('-', " ")) else {
        return String::new();
    };
    format!("{} harvested one {berry}!\n", mon.name())
}

fn form_upkeep(battle: &mut Battle, target: MonRef, ability: Ability) -> String {
    let mon = battle.mon(target);
    let at_half = mon.hp * 2 <= mon.starting_hp;
    let above_quarter = mon.hp * 4 > mon.starting_hp;
    let form = mon.form.clone();
    let next = match ability {
        Ability::ZenMode if form.starts_with("darmanitan") => {
            let standard = form.trim_end_matches("-zen").to_string();
            if at_half {
                format!("{standard}-zen")
            } else {
                standard
            }
        }
        Ability::Schooling if form.starts_with("wishiwashi") => {
            if mon.baseline().level >= 20 && above_quarter {
                "wishiwashi-school".to_string()
            } else {
                "wishiwashi-solo".to_string()
            }
        }
        Ability::ShieldsDown if form.starts_with("minior") => {
            let core = form.trim_end_matches("-meteor").to_string();
            if at_half {
                core
            } else {
                format!("{core}-meteor")
            }
        }
        Ability::PowerConstruct if form.starts_with("zygarde") && at_half => "zygarde-complete".to_string(),
        Ability::HungerSwitch if form.starts_with("morpeko") => {
            if form == "morpeko-hangry" {
                "morpeko-full-belly".to_string()
            } else {
                "morpeko-hangry".to_string()
            }
        }
        _ => return String::new(),
    };
    if next == form {
        return String::new();
    }
    let mon = battle.mon_mut(target);
    let changed = if ability == Ability::PowerConstruct {
        mon.form_with_hp_increase(&next)
    } else {
        mon.form(&next)
    };
    if !changed {
        log::warn!("{} has no form '{next}'", mon.name());
        return String::new();
    }
    log::debug!("{} changed form {form} -> {next}", mon.name());
    format!("{} transformed into its {} form!\n", mon.name(), next.replace('-', " "))
}

/// Damage the sleeping `target` takes from each opposing Bad Dreams holder.
pub fn bad_dreams(battle: &mut Battle, target: MonRef) -> String {
    let Some(opponent) = battle.opponent(target) else {
        return String::new();
    };
    if battle.mon(target).hp == 0 || battle.ability(opponent) != Ability::BadDreams || !is_asleep(battle, target) {
        return String::new();
    }
    let amount = battle.mon(target).hp_fraction(8);
    let source = format!("{}'s bad dreams", battle.mon(opponent).name());
    damage(battle, target, amount, &DamageContext::indirect(&source)).0
}
