use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::moves::MoveDescriptor;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::StatKind;
use crate::sim::switching::remove;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KoPrevention {
    Endure,
    Sturdy,
    FocusSash,
    FocusBand,
}

/// Clamps a lethal hit to leave `target` at 1 HP when something lets it hang on.
pub fn prevent_ko(
    battle: &mut Battle,
    target: MonRef,
    damage: u32,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
) -> (u32, Option<KoPrevention>) {
    let defender = battle.mon(target);
    if damage < defender.hp {
        return (damage, None);
    }
    let survive = defender.hp - 1;
    let full_hp = defender.hp == defender.starting_hp;

    if defender.volatile.turn.endure {
        return (survive, Some(KoPrevention::Endure));
    }
    if full_hp && battle.ability_against(target, attacker, move_) == Ability::Sturdy {
        return (survive, Some(KoPrevention::Sturdy));
    }
    if full_hp && battle.holds(target, "focus-sash") {
        battle.consume_item(target);
        return (survive, Some(KoPrevention::FocusSash));
    }
    if battle.holds(target, "focus-band") && battle.rng.chance(1, 10) {
        return (survive, Some(KoPrevention::FocusBand));
    }
    (damage, None)
}

/// Knocks `target` out and runs what reacts to the knockout, then takes it
/// off the field.
///
/// The knockout cascade only runs when a move from a live attacker caused it.
pub fn faint(battle: &mut Battle, target: MonRef, attacker: Option<MonRef>, move_: Option<&MoveDescriptor>) -> String {
    let mon = battle.mon_mut(target);
    mon.hp = 0;
    let name = mon.name().to_string();
    log::debug!("{name} fainted (side {:?}, slot {})", target.side, target.slot);
    let mut msg = format!("{name} fainted!\n");

    let live_attacker = attacker.filter(|a| *a != target && battle.mon(*a).hp > 0);
    if let (Some(attacker), Some(move_)) = (live_attacker, move_) {
        msg += &knockout_cascade(battle, target, attacker, move_);
    }

    let trainer = battle.trainer_mut(target.side);
    trainer.retaliate.set(Some(2));
    trainer.num_fainted += 1;
    msg += &remove(battle, target, true);
    msg
}

fn knockout_cascade(battle: &mut Battle, target: MonRef, attacker: MonRef, move_: &MoveDescriptor) -> String {
    let mut msg = String::new();
    let fallen = battle.mon(target);
    let name = fallen.name().to_string();
    let destiny_bond = fallen.volatile.destiny_bond;
    let grudge = fallen.volatile.grudge;

    // Only while the bonded side still has someone left, so two bonds cannot
    // keep taking each other down.
    if destiny_bond && battle.trainer(target.side).has_alive_pokemon() {
        msg += &format!("{name} took its attacker down with it!\n");
        msg += &faint(battle, attacker, None, None);
    }

    if battle.ability(attacker) == Ability::BattleBond && battle.mon(attacker).form == "greninja" {
        let greninja = battle.mon_mut(attacker);
        if greninja.hp > 0 && greninja.form("greninja-ash") {
            msg += &format!("{} became fully charged due to its bond with its trainer!\n", greninja.name());
        }
    }

    if grudge {
        let holder = battle.mon_mut(attacker);
        if let Some(slot) = holder.moves.iter_mut().find(|slot| slot.descriptor.id == move_.id) {
            slot.pp = 0;
            msg += &format!("{}'s {} lost all its PP due to the grudge!\n", holder.name(), move_.name);
        }
    }

    let boost = match battle.ability(attacker) {
        Ability::Moxie | Ability::ChillingNeigh => Some(StatKind::Attack),
        Ability::GrimNeigh => Some(StatKind::SpAttack),
        _ => None,
    };
    if let Some(stat) = boost {
        msg += &append_stat(battle, attacker, 1, Some(attacker), None, stat, true);
    }

    for other in battle.active_mons() {
        if other != target && battle.mon(other).hp > 0 && battle.ability(other) == Ability::SoulHeart {
            msg += &append_stat(battle, other, 1, Some(other), None, StatKind::SpAttack, true);
        }
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::battle::Side;
    use crate::sim::testing::{active_battle, add_bench, snapshot, tackle, with_ability, with_form, with_item};
    use crate::sim::types::ElementType;
    use pretty_assertions::assert_eq;

    fn me() -> MonRef {
        MonRef::new(Side::A, 0)
    }

    fn foe() -> MonRef {
        MonRef::new(Side::B, 0)
    }

    #[test]
    fn endure_leaves_one_hp() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).hp = 10;
        battle.mon_mut(me()).volatile.turn.endure = true;
        assert_eq!(prevent_ko(&mut battle, me(), 999, Some(foe()), None), (9, Some(KoPrevention::Endure)));
    }

    #[test]
    fn endure_holds_at_one_hp() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).hp = 1;
        battle.mon_mut(me()).volatile.turn.endure = true;
        assert_eq!(prevent_ko(&mut battle, me(), 10, Some(foe()), None), (0, Some(KoPrevention::Endure)));
    }

    #[test]
    fn sturdy_needs_full_hp() {
        let mut battle = active_battle(with_ability(snapshot("magnezone"), "sturdy"), snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        assert_eq!(prevent_ko(&mut battle, me(), 999, Some(foe()), None), (max - 1, Some(KoPrevention::Sturdy)));
        battle.mon_mut(me()).hp = max - 1;
        assert_eq!(prevent_ko(&mut battle, me(), 999, Some(foe()), None), (999, None));
    }

    #[test]
    fn focus_band_is_a_roll() {
        let mut battle = active_battle(with_item(snapshot("snorlax"), "focus-band"), snapshot("gengar"));
        battle.rng.script([0, 5]);
        let hp = battle.mon(me()).hp;
        assert_eq!(prevent_ko(&mut battle, me(), 999, Some(foe()), None), (hp - 1, Some(KoPrevention::FocusBand)));
        assert_eq!(prevent_ko(&mut battle, me(), 999, Some(foe()), None), (999, None));
        assert!(battle.mon(me()).held_item.is("focus-band"));
    }

    #[test]
    fn faint_marks_the_side_and_leaves_the_field() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        let msg = faint(&mut battle, me(), None, None);
        assert_eq!(msg, "Snorlax fainted!\n");
        assert_eq!(battle.trainers[0].num_fainted, 1);
        assert!(battle.trainers[0].retaliate.active());
        assert_eq!(battle.trainers[0].current, None);
    }

    #[test]
    fn moxie_boosts_on_a_knockout() {
        let mut battle = active_battle(snapshot("snorlax"), with_ability(snapshot("gyarados"), "moxie"));
        let tackle = tackle();
        faint(&mut battle, me(), Some(foe()), Some(&tackle));
        assert_eq!(battle.mon(foe()).stages.attack, 1);
    }

    #[test]
    fn destiny_bond_takes_the_attacker_along() {
        let mut battle = active_battle(snapshot("gengar"), snapshot("snorlax"));
        add_bench(&mut battle, Side::A, snapshot("eevee"));
        battle.mon_mut(me()).volatile.destiny_bond = true;
        let tackle = tackle();
        let msg = faint(&mut battle, me(), Some(foe()), Some(&tackle));
        assert!(msg.contains("took its attacker down with it"));
        assert_eq!(battle.mon(foe()).hp, 0);
        assert_eq!(battle.trainers[1].num_fainted, 1);
    }

    #[test]
    fn destiny_bond_needs_a_survivor_on_the_bonded_side() {
        let mut battle = active_battle(snapshot("gengar"), snapshot("snorlax"));
        battle.mon_mut(me()).volatile.destiny_bond = true;
        let tackle = tackle();
        faint(&mut battle, me(), Some(foe()), Some(&tackle));
        assert!(battle.mon(foe()).hp > 0);
    }

    #[test]
    fn grudge_drains_the_finishing_move() {
        let mut battle = active_battle(snapshot("dusknoir"), snapshot("snorlax"));
        battle.mon_mut(me()).volatile.grudge = true;
        let tackle = tackle();
        let msg = faint(&mut battle, me(), Some(foe()), Some(&tackle));
        assert!(msg.contains("lost all its PP"));
        assert_eq!(battle.mon(foe()).moves[0].pp, 0);
    }

    #[test]
    fn battle_bond_changes_greninja() {
        let greninja = with_ability(
            with_form(snapshot("greninja"), "greninja-ash", &[ElementType::Water, ElementType::Dark]),
            "battle-bond",
        );
        let mut battle = active_battle(snapshot("snorlax"), greninja);
        let tackle = tackle();
        faint(&mut battle, me(), Some(foe()), Some(&tackle));
        assert_eq!(battle.mon(foe()).form, "greninja-ash");
    }
}
