//! Abilities and items that react to stage changes.

use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::moves::MoveDescriptor;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::StatKind;
use crate::sim::types::ElementType;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StatBlock {
    Allowed,
    Blocked(String),
    /// Mirror Armor: the drop goes back to whoever caused it.
    Reflected(String),
}

/// Checks, in order, everything that stops an external stat drop on `target`.
pub fn block_stat_drop(
    battle: &Battle,
    target: MonRef,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
    stat: StatKind,
    check_looping: bool,
) -> StatBlock {
    let mon = battle.mon(target);
    let name = mon.name();
    let ability = battle.ability_against(target, attacker, move_);
    let whole = |ability: Ability| StatBlock::Blocked(format!("{name}'s {ability} prevents its stats from being lowered!\n"));
    let single = |ability: Ability| {
        StatBlock::Blocked(format!("{name}'s {ability} prevents its {stat} from being lowered!\n"))
    };
    match ability {
        Ability::ClearBody | Ability::WhiteSmoke | Ability::FullMetalBody => return whole(ability),
        Ability::HyperCutter if stat == StatKind::Attack => return single(ability),
        Ability::KeenEye | Ability::MindsEye if stat == StatKind::Accuracy => return single(ability),
        Ability::BigPecks if stat == StatKind::Defense => return single(ability),
        Ability::FlowerVeil if mon.has_type(ElementType::Grass) => return whole(ability),
        _ => {}
    }
    if battle.holds(target, "clear-amulet") {
        return StatBlock::Blocked(format!("{name}'s clear amulet prevents its stats from being lowered!\n"));
    }
    let infiltrator = attacker.is_some_and(|attacker| battle.ability(attacker) == Ability::Infiltrator);
    if battle.trainer(target.side).conditions.mist.active() && !infiltrator {
        return StatBlock::Blocked(format!("{name} is protected by the mist!\n"));
    }
    if ability == Ability::MirrorArmor && check_looping && attacker.is_some() {
        return StatBlock::Reflected(format!("{name}'s Mirror Armor reflected the stat drop!\n"));
    }
    StatBlock::Allowed
}

/// Cascades after a stat of `target` was lowered.
pub fn on_stat_lowered(
    battle: &mut Battle,
    target: MonRef,
    external: bool,
    check_looping: bool,
) -> String {
    let mut msg = String::new();
    if external {
        let answer = match battle.ability(target) {
            Ability::Defiant => Some(StatKind::Attack),
            Ability::Competitive => Some(StatKind::SpAttack),
            _ => None,
        };
        if let Some(stat) = answer {
            msg += &append_stat(battle, target, 2, Some(target), None, stat, check_looping);
        }
    }
    let has_replacement = battle.trainer(target.side).has_other_alive(target.slot);
    if battle.holds(target, "eject-pack") && has_replacement && battle.mon(target).hp > 0 {
        battle.consume_item(target);
        let mon = battle.mon_mut(target);
        mon.volatile.swap_out = true;
        msg += &format!("{} is switched out by the eject pack!\n", mon.name());
    }
    msg
}

/// Opportunist and Mirror Herb copy a raise made by someone else.
pub fn on_stat_raised(battle: &mut Battle, target: MonRef, applied: i8, stat: StatKind) -> String {
    let mut msg = String::new();
    for other in battle.active_mons() {
        if other == target || battle.mon(other).hp == 0 {
            continue;
        }
        if battle.ability(other) == Ability::Opportunist {
            msg += &format!("{}'s Opportunist copied the change!\n", battle.mon(other).name());
            msg += &append_stat(battle, other, applied, Some(other), None, stat, false);
        } else if battle.holds(other, "mirror-herb") {
            battle.consume_item(other);
            msg += &format!("{} used its mirror herb!\n", battle.mon(other).name());
            msg += &append_stat(battle, other, applied, Some(other), None, stat, false);
        }
    }
    msg
}
