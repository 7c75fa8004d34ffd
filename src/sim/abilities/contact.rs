use crate::sim::abilities::events::AbilityTrigger;
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::{damage, DamageContext};
use crate::sim::moves::MoveDescriptor;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::StatKind;
use crate::sim::status::{apply_status, StatusKind};
use crate::sim::types::ElementType;

/// Effects of `attacker` touching `target` with `move_`. Runs after the hit
/// itself has fully resolved.
pub fn on_contact(battle: &mut Battle, target: MonRef, attacker: MonRef, move_: &MoveDescriptor) -> String {
    let mut msg = String::new();
    let padded = battle.holds(attacker, "protective-pads");
    let ability = battle.ability(target);

    if !padded && ability.responds_to(AbilityTrigger::OnContact) {
        msg += &defender_ability(battle, target, attacker, move_, ability);
    }
    if !padded && battle.holds(target, "rocky-helmet") && battle.mon(attacker).hp > 0 {
        let amount = battle.mon(attacker).hp_fraction(6);
        let source = format!("{}'s rocky helmet", battle.mon(target).name());
        msg += &damage(battle, attacker, amount, &DamageContext::indirect(&source)).0;
    }

    if battle.ability(attacker) == Ability::PoisonTouch && battle.rng.chance(3, 10) {
        let source = format!("{}'s poison touch", battle.mon(attacker).name());
        msg += &apply_status(battle, target, StatusKind::Poison, Some(attacker), Some(move_), &source, false);
    }
    msg
}

fn defender_ability(
    battle: &mut Battle,
    target: MonRef,
    attacker: MonRef,
    move_: &MoveDescriptor,
    ability: Ability,
) -> String {
    if battle.mon(attacker).hp == 0 {
        return String::new();
    }
    let source = format!("{}'s {}", battle.mon(target).name(), ability.name().to_lowercase());
    let inflict = |battle: &mut Battle, kind: StatusKind| {
        if battle.rng.chance(3, 10) {
            apply_status(battle, attacker, kind, Some(target), None, &source, false)
        } else {
            String::new()
        }
    };
    match ability {
        Ability::Static => inflict(battle, StatusKind::Paralysis),
        Ability::FlameBody => inflict(battle, StatusKind::Burn),
        Ability::PoisonPoint => inflict(battle, StatusKind::Poison),
        Ability::EffectSpore => effect_spore(battle, target, attacker, &source),
        Ability::RoughSkin | Ability::IronBarbs => {
            let amount = battle.mon(attacker).hp_fraction(8);
            damage(battle, attacker, amount, &DamageContext::indirect(&source)).0
        }
        Ability::Gooey | Ability::TanglingHair => {
            append_stat(battle, attacker, -1, Some(target), None, StatKind::Speed, true)
        }
        Ability::Mummy | Ability::LingeringAroma => spread_ability(battle, attacker, ability),
        Ability::WanderingSpirit => swap_abilities(battle, target, attacker),
        Ability::PerishBody => perish_body(battle, target, attacker),
        Ability::Pickpocket if move_.is_damaging() => pickpocket(battle, target, attacker),
        _ => String::new(),
    }
}

/// 30% in total: 9 poison, 10 paralysis, 11 sleep.
fn effect_spore(battle: &mut Battle, target: MonRef, attacker: MonRef, source: &str) -> String {
    let immune = battle.mon(attacker).has_type(ElementType::Grass)
        || battle.ability(attacker) == Ability::Overcoat
        || battle.holds(attacker, "safety-goggles");
    if immune {
        return String::new();
    }
    let kind = match battle.rng.range(0, 100) {
        0..=8 => StatusKind::Poison,
        9..=18 => StatusKind::Paralysis,
        19..=29 => StatusKind::Sleep,
        _ => return String::new(),
    };
    apply_status(battle, attacker, kind, Some(target), None, source, false)
}

fn spread_ability(battle: &mut Battle, attacker: MonRef, ability: Ability) -> String {
    let current = battle.mon(attacker).ability;
    if current == ability || current.unsuppressable() {
        return String::new();
    }
    let foe = battle.mon_mut(attacker);
    foe.ability = ability;
    log::debug!("{} caught {ability} on contact", foe.name());
    format!("{}'s ability became {ability}!\n", foe.name())
}

fn swap_abilities(battle: &mut Battle, target: MonRef, attacker: MonRef) -> String {
    let theirs = battle.mon(attacker).ability;
    if theirs.unsuppressable() || theirs == Ability::WanderingSpirit {
        return String::new();
    }
    battle.mon_mut(attacker).ability = Ability::WanderingSpirit;
    battle.mon_mut(target).ability = theirs;
    format!(
        "{} swapped abilities with {}!\n",
        battle.mon(target).name(),
        battle.mon(attacker).name()
    )
}

/// Both sides start a three-turn perish count unless one is already running.
fn perish_body(battle: &mut Battle, target: MonRef, attacker: MonRef) -> String {
    let mut msg = String::new();
    for mon in [target, attacker] {
        let perish = &mut battle.mon_mut(mon).volatile.perish_song;
        if !perish.active() {
            perish.set(Some(3));
            msg += &format!("{} will faint in three turns!\n", battle.mon(mon).name());
        }
    }
    msg
}

fn pickpocket(battle: &mut Battle, target: MonRef, attacker: MonRef) -> String {
    if !battle.mon(target).held_item.is_empty() || battle.holds(attacker, "protective-pads") {
        return String::new();
    }
    let Some(item) = battle.remove_item(attacker, Some(target)) else {
        return String::new();
    };
    let thief = battle.mon_mut(target);
    thief.held_item.give(&item);
    thief.persistent.ever_held_item = true;
    format!(
        "{} stole {}'s {}!\n",
        battle.mon(target).name(),
        battle.mon(attacker).name(),
        item.replace('-', " ")
    )
}
