use crate::sim::abilities::stat_change::{block_stat_drop, on_stat_lowered, on_stat_raised, StatBlock};
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::moves::MoveDescriptor;
use crate::sim::stats::{StatKind, MAX_STAGE, MIN_STAGE};

fn change_verb(applied: i8) -> &'static str {
    match applied {
        1 => "rose",
        2 => "rose sharply",
        a if a >= 3 => "rose drastically",
        -1 => "fell",
        -2 => "harshly fell",
        _ => "severely fell",
    }
}

/// Moves one stat stage of `target` by `delta`.
///
/// `check_looping` is true for a fresh change and false for one that is
/// itself the product of a reflection or copy, so Mirror Armor and
/// Opportunist cannot bounce the same change back and forth.
pub fn append_stat(
    battle: &mut Battle,
    target: MonRef,
    delta: i8,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
    stat: StatKind,
    check_looping: bool,
) -> String {
    let mon = battle.mon(target);
    if mon.hp == 0 || delta == 0 {
        return String::new();
    }
    let external = attacker.is_some_and(|attacker| attacker != target);
    if external && mon.volatile.substitute > 0 && move_.is_some_and(|m| m.flags.affected_by_substitute) {
        return String::new();
    }
    let name = mon.name().to_string();

    let mut change = delta;
    match battle.ability_against(target, attacker, move_) {
        Ability::Simple => change = change.saturating_mul(2),
        Ability::Contrary => change = change.saturating_neg(),
        _ => {}
    }

    let current = battle.mon(target).stages.get(stat);
    let target_stage = (i16::from(current) + i16::from(change)).clamp(i16::from(MIN_STAGE), i16::from(MAX_STAGE));
    let applied = target_stage as i8 - current;
    if applied == 0 {
        let direction = if change > 0 { "higher" } else { "lower" };
        return format!("{name}'s {stat} won't go any {direction}!\n");
    }

    if applied < 0 && external {
        match block_stat_drop(battle, target, attacker, move_, stat, check_looping) {
            StatBlock::Allowed => {}
            StatBlock::Blocked(msg) => return msg,
            StatBlock::Reflected(mut msg) => {
                if let Some(attacker) = attacker {
                    msg += &append_stat(battle, attacker, delta, Some(target), move_, stat, false);
                }
                return msg;
            }
        }
    }

    let mon = battle.mon_mut(target);
    mon.stages.set(stat, current + applied);
    if applied > 0 {
        mon.volatile.turn.stat_increased = true;
    } else {
        mon.volatile.turn.stat_decreased = true;
    }
    log::trace!("{name} {stat} stage {current} -> {}", current + applied);
    let mut msg = format!("{name}'s {stat} {}!\n", change_verb(applied));

    if applied < 0 {
        msg += &on_stat_lowered(battle, target, external, check_looping);
    } else if check_looping {
        msg += &on_stat_raised(battle, target, applied, stat);
    }
    msg
}

/// Applies several stage changes from one source in order.
pub fn append_stats(
    battle: &mut Battle,
    target: MonRef,
    changes: &[(StatKind, i8)],
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
) -> String {
    changes
        .iter()
        .map(|(stat, delta)| append_stat(battle, target, *delta, attacker, move_, *stat, true))
        .collect()
}
