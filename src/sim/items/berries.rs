use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::heal;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::{StatKind, MAX_STAGE};
use crate::sim::status::{cure_status, StatusKind};

enum BerryEffect {
    /// Restores `starting_hp / divisor` once HP is at or below half.
    HalfHeal(u32),
    /// Restores a flat amount once HP is at or below half.
    FlatHeal(u32),
    /// Restores `starting_hp / divisor` at the pinch threshold.
    PinchHeal(u32),
    PinchStat(StatKind),
    /// Starf Berry: +2 to a random stat that can still rise.
    PinchRandomStat,
    Cure(StatusKind),
    /// Pecha cures both kinds of poison.
    CurePoison,
    CureConfusion,
    /// Lum Berry: any status and confusion.
    CureAll,
}

fn berry_effect(id: &str) -> Option<BerryEffect> {
    let effect = match id {
        "sitrus-berry" => BerryEffect::HalfHeal(4),
        "oran-berry" => BerryEffect::FlatHeal(10),
        "figy-berry" | "wiki-berry" | "mago-berry" | "aguav-berry" | "iapapa-berry" => BerryEffect::PinchHeal(3),
        "liechi-berry" => BerryEffect::PinchStat(StatKind::Attack),
        "ganlon-berry" => BerryEffect::PinchStat(StatKind::Defense),
        "salac-berry" => BerryEffect::PinchStat(StatKind::Speed),
        "petaya-berry" => BerryEffect::PinchStat(StatKind::SpAttack),
        "apicot-berry" => BerryEffect::PinchStat(StatKind::SpDefense),
        "starf-berry" => BerryEffect::PinchRandomStat,
        "cheri-berry" => BerryEffect::Cure(StatusKind::Paralysis),
        "chesto-berry" => BerryEffect::Cure(StatusKind::Sleep),
        "rawst-berry" => BerryEffect::Cure(StatusKind::Burn),
        "aspear-berry" => BerryEffect::Cure(StatusKind::Freeze),
        "pecha-berry" => BerryEffect::CurePoison,
        "persim-berry" => BerryEffect::CureConfusion,
        "lum-berry" => BerryEffect::CureAll,
        _ => return None,
    };
    Some(effect)
}

pub fn is_berry(id: &str) -> bool {
    id.ends_with("-berry")
}

fn opponent_unnerves(battle: &Battle, target: MonRef) -> bool {
    battle
        .opponent(target)
        .is_some_and(|opponent| battle.mon(opponent).hp > 0 && battle.ability(opponent) == Ability::Unnerve)
}

/// Whether the berry's trigger condition holds for `target` right now.
fn wants_berry(battle: &Battle, target: MonRef, effect: &BerryEffect) -> bool {
    let mon = battle.mon(target);
    let pinch_divisor = if battle.ability(target) == Ability::Gluttony { 2 } else { 4 };
    let at_half = mon.hp * 2 <= mon.starting_hp;
    let at_pinch = mon.hp * pinch_divisor <= mon.starting_hp;
    match effect {
        BerryEffect::HalfHeal(_) | BerryEffect::FlatHeal(_) => at_half,
        BerryEffect::PinchHeal(_) => at_pinch,
        BerryEffect::PinchStat(stat) => at_pinch && mon.stages.get(*stat) < MAX_STAGE,
        BerryEffect::PinchRandomStat => at_pinch,
        BerryEffect::Cure(kind) => mon.nv.is(*kind),
        BerryEffect::CurePoison => mon.nv.poisoned(),
        BerryEffect::CureConfusion => mon.volatile.confusion.active(),
        BerryEffect::CureAll => !mon.nv.is_none() || mon.volatile.confusion.active(),
    }
}

/// Eats the held berry of `target` if its condition is met.
pub fn maybe_eat_berry(battle: &mut Battle, target: MonRef) -> String {
    if battle.mon(target).hp == 0 {
        return String::new();
    }
    let Some(id) = battle.usable_item(target).filter(|id| is_berry(id)).map(str::to_string) else {
        return String::new();
    };
    let Some(effect) = berry_effect(&id) else {
        return String::new();
    };
    if opponent_unnerves(battle, target) || !wants_berry(battle, target, &effect) {
        return String::new();
    }
    eat_berry(battle, target, &id, effect)
}

fn eat_berry(battle: &mut Battle, target: MonRef, id: &str, effect: BerryEffect) -> String {
    battle.consume_item(target);
    let ability = battle.ability(target);
    let ripen = if ability == Ability::Ripen { 2 } else { 1 };
    let name = battle.mon(target).name().to_string();
    let berry = id.replace('-', " ");
    let mut msg = format!("{name} ate its {berry}!\n");
    let max_hp = battle.mon(target).starting_hp;
    log::trace!("{name} ate {id}");

    match effect {
        BerryEffect::HalfHeal(divisor) | BerryEffect::PinchHeal(divisor) => {
            msg += &heal(battle, target, (max_hp / divisor).max(1) * ripen, &berry);
        }
        BerryEffect::FlatHeal(amount) => msg += &heal(battle, target, amount * ripen, &berry),
        BerryEffect::PinchStat(stat) => {
            msg += &append_stat(battle, target, ripen as i8, Some(target), None, stat, true);
        }
        BerryEffect::PinchRandomStat => {
            let candidates: Vec<StatKind> = StatKind::BATTLE
                .into_iter()
                .filter(|stat| battle.mon(target).stages.get(*stat) < MAX_STAGE)
                .collect();
            if let Some(stat) = battle.rng.pick(&candidates).copied() {
                msg += &append_stat(battle, target, 2 * ripen as i8, Some(target), None, stat, true);
            }
        }
        BerryEffect::Cure(_) | BerryEffect::CurePoison => msg += &cure_status(battle, target, &berry),
        BerryEffect::CureConfusion => {
            battle.mon_mut(target).volatile.confusion.set(Some(0));
            msg += &format!("{name} snapped out of its confusion!\n");
        }
        BerryEffect::CureAll => {
            msg += &cure_status(battle, target, &berry);
            let confusion = &mut battle.mon_mut(target).volatile.confusion;
            if confusion.active() {
                confusion.set(Some(0));
                msg += &format!("{name} snapped out of its confusion!\n");
            }
        }
    }
    if ability == Ability::CheekPouch {
        msg += &heal(battle, target, (max_hp / 3).max(1), "its cheek pouch");
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::battle::Side;
    use crate::sim::status::apply_status;
    use crate::sim::testing::{active_battle, snapshot, with_ability, with_item};
    use pretty_assertions::assert_eq;

    fn me() -> MonRef {
        MonRef::new(Side::A, 0)
    }

    #[test]
    fn sitrus_waits_for_half_hp() {
        let mut battle = active_battle(with_item(snapshot("snorlax"), "sitrus-berry"), snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        battle.mon_mut(me()).hp = max / 2 + 1;
        assert_eq!(maybe_eat_berry(&mut battle, me()), "");
        battle.mon_mut(me()).hp = max / 2;
        let msg = maybe_eat_berry(&mut battle, me());
        assert!(msg.starts_with("Snorlax ate its sitrus berry!\n"));
        assert_eq!(battle.mon(me()).hp, max / 2 + max / 4);
        assert_eq!(battle.mon(me()).held_item.last_consumed(), Some("sitrus-berry"));
    }

    #[test]
    fn gluttony_eats_pinch_berries_early() {
        let mut battle = active_battle(with_ability(with_item(snapshot("snorlax"), "liechi-berry"), "gluttony"), snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        battle.mon_mut(me()).hp = max / 2;
        maybe_eat_berry(&mut battle, me());
        assert_eq!(battle.mon(me()).stages.attack, 1);
    }

    #[test]
    fn ripen_doubles_the_boost() {
        let mut battle = active_battle(with_ability(with_item(snapshot("applin"), "salac-berry"), "ripen"), snapshot("gengar"));
        battle.mon_mut(me()).hp = 1;
        maybe_eat_berry(&mut battle, me());
        assert_eq!(battle.mon(me()).stages.speed, 2);
    }

    #[test]
    fn unnerve_keeps_berries_uneaten() {
        let mut battle = active_battle(with_item(snapshot("snorlax"), "sitrus-berry"), with_ability(snapshot("mewtwo"), "unnerve"));
        battle.mon_mut(me()).hp = 1;
        assert_eq!(maybe_eat_berry(&mut battle, me()), "");
        assert!(battle.mon(me()).held_item.is("sitrus-berry"));
    }

    #[test]
    fn lum_cures_status_as_it_lands() {
        let mut battle = active_battle(with_item(snapshot("snorlax"), "lum-berry"), snapshot("gengar"));
        let msg = apply_status(&mut battle, me(), StatusKind::Burn, None, None, "", false);
        assert!(msg.contains("ate its lum berry"));
        assert!(battle.mon(me()).nv.is_none());
    }

    #[test]
    fn cheek_pouch_adds_a_heal() {
        let mut battle = active_battle(with_ability(with_item(snapshot("dedenne"), "oran-berry"), "cheek-pouch"), snapshot("gengar"));
        battle.mon_mut(me()).hp = 10;
        let max = battle.mon(me()).starting_hp;
        maybe_eat_berry(&mut battle, me());
        assert_eq!(battle.mon(me()).hp, 20 + max / 3);
    }
}
