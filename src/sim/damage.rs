use crate::sim::abilities::{contact, on_damage, Ability};
use crate::sim::battle::{Battle, MonRef};
use crate::sim::faint_handler::{faint, prevent_ko, KoPrevention};
use crate::sim::items::berries::maybe_eat_berry;
use crate::sim::moves::{DamageClass, MoveDescriptor};
use crate::sim::source_suffix;
use crate::sim::types::ElementType;

/// Where a chunk of damage comes from.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageContext<'a> {
    pub attacker: Option<MonRef>,
    pub move_: Option<&'a MoveDescriptor>,
    /// Type the move hit with, after type-changing effects.
    pub move_type: Option<ElementType>,
    pub critical: bool,
    /// Fraction of the damage dealt that the attacker drains back.
    pub drain_ratio: Option<f64>,
    /// Named in the narrative ("from its burn").
    pub source: &'a str,
}

impl<'a> DamageContext<'a> {
    /// Damage with no move behind it: status, weather, hazards, recoil.
    pub fn indirect(source: &'a str) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn from_move(attacker: MonRef, move_: &'a MoveDescriptor, move_type: ElementType) -> Self {
        Self {
            attacker: Some(attacker),
            move_: Some(move_),
            move_type: Some(move_type),
            ..Self::default()
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn drain(mut self, ratio: f64) -> Self {
        self.drain_ratio = Some(ratio);
        self
    }

    fn external(&self, target: MonRef) -> bool {
        self.attacker.is_some_and(|attacker| attacker != target)
    }
}

fn substitute_takes_hit(battle: &Battle, target: MonRef, ctx: &DamageContext) -> bool {
    let Some(move_) = ctx.move_ else {
        return false;
    };
    if battle.mon(target).volatile.substitute == 0 || !ctx.external(target) {
        return false;
    }
    if !move_.flags.affected_by_substitute || move_.flags.sound {
        return false;
    }
    !ctx.attacker.is_some_and(|attacker| battle.ability(attacker) == Ability::Infiltrator)
}

/// Disguise and Ice Face take the hit by changing form. Returns the narrative
/// when the hit was absorbed.
fn form_absorbs_hit(battle: &mut Battle, target: MonRef, ctx: &DamageContext) -> Option<String> {
    let move_ = ctx.move_.filter(|m| m.is_damaging())?;
    if !ctx.external(target) {
        return None;
    }
    let ability = battle.ability_against(target, ctx.attacker, Some(move_));
    let mon = battle.mon_mut(target);
    match ability {
        Ability::Disguise if mon.form == "mimikyu" => {
            if !mon.form("mimikyu-busted") {
                return None;
            }
            let name = mon.name().to_string();
            let cost = mon.hp_fraction(8);
            let mut msg = format!("{name}'s disguise was busted!\n");
            let own = DamageContext {
                attacker: Some(target),
                source: "its disguise",
                ..DamageContext::default()
            };
            msg += &damage(battle, target, cost, &own).0;
            Some(msg)
        }
        Ability::IceFace if mon.form == "eiscue" && move_.damage_class == DamageClass::Physical => {
            if !mon.form("eiscue-noice") {
                return None;
            }
            Some(format!("{}'s ice face was broken!\n", mon.name()))
        }
        _ => None,
    }
}

fn prevention_message(name: &str, prevention: KoPrevention) -> String {
    match prevention {
        KoPrevention::Endure => format!("{name} endured the hit!\n"),
        KoPrevention::Sturdy => format!("{name} endured the hit with its Sturdy!\n"),
        KoPrevention::FocusSash => format!("{name} hung on using its focus sash!\n"),
        KoPrevention::FocusBand => format!("{name} hung on using its focus band!\n"),
    }
}

/// Deals `amount` damage to `target` and runs everything that reacts to it.
///
/// Returns the narrative and the damage actually dealt. A hit absorbed by a
/// substitute reports the HP the substitute lost.
pub fn damage(battle: &mut Battle, target: MonRef, amount: u32, ctx: &DamageContext) -> (String, u32) {
    if battle.mon(target).hp == 0 {
        return (String::new(), 0);
    }
    let mut amount = amount.max(1);

    let self_inflicted = ctx.attacker == Some(target);
    if ctx.move_.is_none() && !self_inflicted && battle.ability(target) == Ability::MagicGuard {
        return (String::new(), 0);
    }

    if substitute_takes_hit(battle, target, ctx) {
        let mon = battle.mon_mut(target);
        let absorbed = amount.min(mon.volatile.substitute);
        mon.volatile.substitute -= absorbed;
        let name = mon.name().to_string();
        let mut msg = format!("The substitute took damage for {name}!\n");
        if mon.volatile.substitute == 0 {
            msg += &format!("{name}'s substitute broke!\n");
        }
        return (msg, absorbed);
    }

    if let Some(msg) = form_absorbs_hit(battle, target, ctx) {
        return (msg, 0);
    }

    let mut msg = String::new();
    if ctx.move_.is_some() && amount >= battle.mon(target).hp {
        let (clamped, prevention) = prevent_ko(battle, target, amount, ctx.attacker, ctx.move_);
        amount = clamped;
        if let Some(prevention) = prevention {
            msg += &prevention_message(battle.mon(target).name(), prevention);
        }
    }

    let mon = battle.mon_mut(target);
    let before = mon.hp;
    let dealt = amount.min(before);
    mon.hp = before - dealt;
    let max_hp = mon.starting_hp;
    let crossed_half = before * 2 > max_hp && mon.hp * 2 <= max_hp;
    let crossed_quarter = before * 4 > max_hp && mon.hp * 4 <= max_hp;
    mon.volatile.turn.dropped_below_half |= crossed_half;
    mon.volatile.turn.dropped_below_quarter |= crossed_quarter;
    mon.volatile.turn.damage_this_turn += dealt;
    if ctx.move_.is_some() {
        mon.persistent.times_hit += 1;
    }
    let name = mon.name().to_string();
    log::trace!("{name} hp {before} -> {}", mon.hp);
    if dealt > 0 {
        msg = format!("{name} took {dealt} damage{}!\n", source_suffix("from", ctx.source)) + &msg;
    }

    if let (Some(ratio), Some(attacker)) = (ctx.drain_ratio, ctx.attacker) {
        msg += &drain(battle, target, attacker, dealt, ratio);
    }

    if battle.mon(target).hp == 0 {
        msg += &faint(battle, target, ctx.attacker, ctx.move_);
        if let (Some(attacker), Some(move_)) = (ctx.attacker, ctx.move_) {
            msg += &on_damage::on_knocked_out(battle, target, attacker, move_, dealt);
        }
        return (msg, dealt);
    }

    let (Some(attacker), Some(move_)) = (ctx.attacker, ctx.move_) else {
        msg += &maybe_eat_berry(battle, target);
        return (msg, dealt);
    };
    if let Some(move_type) = ctx.move_type {
        msg += &on_damage::after_hit(battle, target, attacker, move_, move_type, ctx.critical, crossed_half);
    }
    msg += &on_damage::record_hit(battle, target, attacker, move_, dealt);
    if crossed_half {
        msg += &on_damage::low_hp_retreat(battle, target);
    }
    if ctx.external(target) {
        msg += &on_damage::gulp_missile(battle, target, attacker);
    }
    msg += &maybe_eat_berry(battle, target);
    if move_.makes_contact() && ctx.external(target) {
        msg += &contact::on_contact(battle, target, attacker, move_);
    }
    (msg, dealt)
}

fn drain(battle: &mut Battle, target: MonRef, attacker: MonRef, dealt: u32, ratio: f64) -> String {
    if battle.mon(attacker).hp == 0 {
        return String::new();
    }
    let mut amount = ((dealt as f64 * ratio) as u32).max(1);
    if battle.holds(attacker, "big-root") {
        amount = (amount as f64 * 1.3) as u32;
    }
    if battle.ability(target) == Ability::LiquidOoze {
        let ooze = DamageContext::indirect("the liquid ooze");
        return damage(battle, attacker, amount, &ooze).0;
    }
    heal(battle, attacker, amount, "the drain")
}

/// Restores up to `amount` HP. Never goes past max HP.
pub fn heal(battle: &mut Battle, target: MonRef, amount: u32, source: &str) -> String {
    let mon = battle.mon_mut(target);
    if mon.hp == 0 {
        return String::new();
    }
    if mon.volatile.heal_block.active() {
        return format!("{} is blocked from healing!\n", mon.name());
    }
    let healed = amount.max(1).min(mon.starting_hp - mon.hp);
    if healed == 0 {
        return String::new();
    }
    mon.hp += healed;
    format!("{} healed {healed} hp{}!\n", mon.name(), source_suffix("from", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::battle::Side;
    use crate::sim::testing::{active_battle, move_named, snapshot, tackle, with_ability, with_form, with_item, with_types};
    use pretty_assertions::assert_eq;

    fn me() -> MonRef {
        MonRef::new(Side::A, 0)
    }

    fn foe() -> MonRef {
        MonRef::new(Side::B, 0)
    }

    fn set_hp(battle: &mut Battle, target: MonRef, hp: u32, max: u32) {
        let mon = battle.mon_mut(target);
        mon.starting_hp = max;
        mon.hp = hp;
    }

    #[test]
    fn plain_hit_lowers_hp() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        set_hp(&mut battle, me(), 100, 100);
        let tackle = tackle();
        let (msg, dealt) = damage(&mut battle, me(), 40, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).hp, 60);
        assert_eq!(dealt, 40);
        assert!(msg.contains("took 40 damage"));
    }

    #[test]
    fn zero_is_floored_to_one() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        let (_, dealt) = damage(&mut battle, me(), 0, &DamageContext::indirect("the sandstorm"));
        assert_eq!(dealt, 1);
    }

    #[test]
    fn magic_guard_ignores_indirect_damage() {
        let mut battle = active_battle(with_ability(snapshot("clefable"), "magic-guard"), snapshot("gengar"));
        let before = battle.mon(me()).hp;
        let (msg, dealt) = damage(&mut battle, me(), 30, &DamageContext::indirect("its burn"));
        assert_eq!((msg.as_str(), dealt), ("", 0));
        assert_eq!(battle.mon(me()).hp, before);
    }

    #[test]
    fn substitute_soaks_the_hit() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.substitute = 20;
        let before = battle.mon(me()).hp;
        let tackle = tackle();
        let (msg, dealt) = damage(&mut battle, me(), 30, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).volatile.substitute, 0);
        assert_eq!(battle.mon(me()).hp, before);
        assert_eq!(dealt, 20);
        assert!(msg.contains("substitute broke"));
    }

    #[test]
    fn sound_moves_go_through_substitute() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.substitute = 20;
        let mut hyper_voice = move_named("hyper-voice", ElementType::Normal, DamageClass::Special);
        hyper_voice.flags.sound = true;
        let before = battle.mon(me()).hp;
        damage(&mut battle, me(), 30, &DamageContext::from_move(foe(), &hyper_voice, ElementType::Normal));
        assert_eq!(battle.mon(me()).volatile.substitute, 20);
        assert_eq!(battle.mon(me()).hp, before - 30);
    }

    #[test]
    fn sturdy_survives_at_one() {
        let mut battle = active_battle(with_ability(snapshot("magnezone"), "sturdy"), snapshot("gengar"));
        set_hp(&mut battle, me(), 50, 50);
        let tackle = tackle();
        let (msg, dealt) = damage(&mut battle, me(), 60, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).hp, 1);
        assert_eq!(dealt, 49);
        assert!(msg.contains("endured the hit with its Sturdy"));
    }

    #[test]
    fn focus_sash_is_used_up() {
        let mut battle = active_battle(with_item(snapshot("alakazam"), "focus-sash"), snapshot("gengar"));
        let tackle = tackle();
        let max = battle.mon(me()).starting_hp;
        damage(&mut battle, me(), max * 2, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).hp, 1);
        assert!(battle.mon(me()).held_item.is_empty());
    }

    #[test]
    fn endure_at_one_hp_takes_nothing() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).hp = 1;
        battle.mon_mut(me()).volatile.turn.endure = true;
        let tackle = tackle();
        let (msg, dealt) = damage(&mut battle, me(), 10, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).hp, 1);
        assert_eq!(dealt, 0);
        assert_eq!(msg, "Snorlax endured the hit!\n");
    }

    #[test]
    fn focus_sash_saves_a_one_hp_holder() {
        let mut battle = active_battle(with_item(snapshot("shedinja"), "focus-sash"), snapshot("gengar"));
        set_hp(&mut battle, me(), 1, 1);
        let tackle = tackle();
        let (msg, _) = damage(&mut battle, me(), 50, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).hp, 1);
        assert!(battle.mon(me()).held_item.is_empty());
        assert!(msg.contains("hung on using its focus sash"));
        assert!(!msg.contains("fainted"));
    }

    #[test]
    fn disguise_takes_a_fixed_cost_instead() {
        let mimikyu = with_ability(
            with_form(snapshot("mimikyu"), "mimikyu-busted", &[ElementType::Ghost, ElementType::Fairy]),
            "disguise",
        );
        let mut battle = active_battle(mimikyu, snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        let tackle = tackle();
        let (msg, dealt) = damage(&mut battle, me(), 150, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(dealt, 0);
        assert!(msg.contains("disguise was busted"));
        assert_eq!(battle.mon(me()).form, "mimikyu-busted");
        assert_eq!(battle.mon(me()).hp, max - max / 8);
    }

    #[test]
    fn liquid_ooze_turns_drain_into_damage() {
        let mut battle = active_battle(with_ability(snapshot("tentacruel"), "liquid-ooze"), snapshot("venusaur"));
        let giga_drain = move_named("giga-drain", ElementType::Grass, DamageClass::Special);
        let before = battle.mon(foe()).hp;
        set_hp(&mut battle, foe(), before - 50, before);
        let ctx = DamageContext::from_move(foe(), &giga_drain, ElementType::Grass).drain(0.5);
        let (msg, _) = damage(&mut battle, me(), 40, &ctx);
        assert!(msg.contains("liquid ooze"));
        assert_eq!(battle.mon(foe()).hp, before - 50 - 20);
    }

    #[test]
    fn drain_heals_the_attacker() {
        let mut battle = active_battle(snapshot("snorlax"), with_item(snapshot("venusaur"), "big-root"));
        let giga_drain = move_named("giga-drain", ElementType::Grass, DamageClass::Special);
        let max = battle.mon(foe()).starting_hp;
        set_hp(&mut battle, foe(), 10, max);
        let ctx = DamageContext::from_move(foe(), &giga_drain, ElementType::Grass).drain(0.5);
        damage(&mut battle, me(), 40, &ctx);
        assert_eq!(battle.mon(foe()).hp, 10 + 26);
    }

    #[test]
    fn substitute_hits_drain_nothing() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("venusaur"));
        battle.mon_mut(me()).volatile.substitute = 30;
        let giga_drain = move_named("giga-drain", ElementType::Grass, DamageClass::Special);
        let max = battle.mon(foe()).starting_hp;
        set_hp(&mut battle, foe(), 10, max);
        let ctx = DamageContext::from_move(foe(), &giga_drain, ElementType::Grass).drain(0.5);
        let (_, dealt) = damage(&mut battle, me(), 20, &ctx);
        assert_eq!(dealt, 20);
        assert_eq!(battle.mon(foe()).hp, 10);
        assert_eq!(battle.mon(me()).volatile.substitute, 10);
    }

    #[test]
    fn lethal_hit_faints() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        let tackle = tackle();
        let (msg, _) = damage(&mut battle, me(), 999, &DamageContext::from_move(foe(), &tackle, ElementType::Normal));
        assert_eq!(battle.mon(me()).hp, 0);
        assert!(msg.contains("Snorlax fainted!"));
        assert_eq!(battle.trainers[0].num_fainted, 1);
    }

    #[test]
    fn fainted_targets_take_nothing() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).hp = 0;
        assert_eq!(damage(&mut battle, me(), 10, &DamageContext::indirect("")), (String::new(), 0));
    }

    #[test]
    fn heal_is_capped_and_blockable() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        set_hp(&mut battle, me(), 90, 100);
        assert_eq!(heal(&mut battle, me(), 50, "leftovers"), "Snorlax healed 10 hp from leftovers!\n");
        assert_eq!(battle.mon(me()).hp, 100);
        assert_eq!(heal(&mut battle, me(), 50, ""), "");
        battle.mon_mut(me()).hp = 40;
        battle.mon_mut(me()).volatile.heal_block.set(Some(3));
        heal(&mut battle, me(), 50, "");
        assert_eq!(battle.mon(me()).hp, 40);
    }

    #[test]
    fn heal_then_damage_round_trips() {
        let mut battle = active_battle(snapshot("snorlax"), with_types(snapshot("gengar"), &[ElementType::Ghost]));
        set_hp(&mut battle, me(), 30, 100);
        heal(&mut battle, me(), 25, "");
        damage(&mut battle, me(), 25, &DamageContext::indirect(""));
        assert_eq!(battle.mon(me()).hp, 30);
    }

    #[test]
    fn half_threshold_is_recorded() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        set_hp(&mut battle, me(), 100, 100);
        damage(&mut battle, me(), 30, &DamageContext::indirect(""));
        assert!(!battle.mon(me()).volatile.turn.dropped_below_half);
        damage(&mut battle, me(), 30, &DamageContext::indirect(""));
        assert!(battle.mon(me()).volatile.turn.dropped_below_half);
        assert!(!battle.mon(me()).volatile.turn.dropped_below_quarter);
    }
}
