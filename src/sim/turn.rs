//! End-of-turn upkeep for the active combatants and the field.

use crate::sim::abilities::end_of_turn::{ability_upkeep, bad_dreams};
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef, Side};
use crate::sim::damage::{damage, heal, DamageContext};
use crate::sim::faint_handler::faint;
use crate::sim::items::battle_items::{residual_item, status_orb, white_herb};
use crate::sim::pokemon::is_grounded;
use crate::sim::stat_stages::{append_stat, append_stats};
use crate::sim::stats::StatKind;
use crate::sim::status::{apply_status, status_tick, StatusKind};
use crate::sim::switching::resolve_wish;
use crate::sim::types::ElementType;
use crate::sim::volatile::{SemiInvulnerable, TurnFlags};
use crate::sim::weather_field::{TerrainKind, WeatherKind};

/// Upkeep for one active combatant, in the order the rules resolve it.
/// Stops early once `target` faints.
pub fn next_turn(battle: &mut Battle, target: MonRef) -> String {
    if battle.mon(target).hp == 0 {
        return String::new();
    }
    {
        let volatile = &mut battle.mon_mut(target).volatile;
        volatile.turn = TurnFlags::default();
        volatile.active_turns += 1;
    }

    let steps: [fn(&mut Battle, MonRef) -> String; 9] = [
        tick_countdowns,
        status_tick,
        item_upkeep,
        ability_upkeep,
        opponent_effects,
        weather_damage,
        binding_effects,
        grassy_terrain,
        perish_count,
    ];
    let mut msg = String::new();
    for step in steps {
        msg += &step(battle, target);
        if battle.mon(target).hp == 0 {
            break;
        }
    }
    msg
}

fn tick_countdowns(battle: &mut Battle, target: MonRef) -> String {
    let mon = battle.mon_mut(target);
    let name = mon.name().to_string();
    let volatile = &mut mon.volatile;
    let mut msg = String::new();

    let timers = [
        (&mut volatile.taunt, "'s taunt wore off!"),
        (&mut volatile.heal_block, "'s heal block wore off!"),
        (&mut volatile.embargo, " can use items again!"),
        (&mut volatile.throat_chop, " can use sound-based moves again!"),
        (&mut volatile.magnet_rise, "'s electromagnetism wore off!"),
        (&mut volatile.telekinesis, " was freed from the telekinesis!"),
        (&mut volatile.uproar, " calmed down."),
        (&mut volatile.charge, ""),
        (&mut volatile.laser_focus, ""),
        (&mut volatile.destiny_bond_cooldown, ""),
        (&mut volatile.glaive_rush, ""),
    ];
    for (effect, ending) in timers {
        if effect.tick() && !ending.is_empty() {
            msg += &format!("{name}{ending}\n");
        }
    }
    if volatile.encore.tick() {
        msg += &format!("{name}'s encore ended!\n");
    }
    if volatile.disable.tick() {
        msg += &format!("{name}'s move is no longer disabled!\n");
    }
    volatile.lock_on.tick();
    let drowsy = volatile.yawn.tick();

    if drowsy {
        msg += &apply_status(battle, target, StatusKind::Sleep, None, None, "", false);
    }
    msg
}

fn item_upkeep(battle: &mut Battle, target: MonRef) -> String {
    let mut msg = white_herb(battle, target);
    msg += &status_orb(battle, target);
    msg += &residual_item(battle, target);
    msg
}

/// Bad Dreams, Leech Seed, Curse and Syrup Bomb.
fn opponent_effects(battle: &mut Battle, target: MonRef) -> String {
    let mut msg = bad_dreams(battle, target);
    let opponent = battle.opponent(target);

    if battle.mon(target).volatile.leech_seeded && battle.mon(target).hp > 0 {
        if let Some(seeder) = opponent.filter(|r| battle.mon(*r).hp > 0) {
            msg += &leech_seed(battle, target, seeder);
        }
    }
    if battle.mon(target).volatile.cursed && battle.mon(target).hp > 0 {
        let amount = battle.mon(target).hp_fraction(4);
        msg += &damage(battle, target, amount, &DamageContext::indirect("the curse")).0;
    }
    if battle.mon(target).hp > 0 {
        let bomber = battle.mon(target).volatile.syrup_bomb.item().copied();
        if let Some(bomber) = bomber {
            msg += &append_stat(battle, target, -1, Some(bomber), None, StatKind::Speed, true);
        }
        if battle.mon_mut(target).volatile.syrup_bomb.tick() {
            msg += &format!("{} is no longer covered in syrup!\n", battle.mon(target).name());
        }
    }
    msg
}

fn leech_seed(battle: &mut Battle, target: MonRef, seeder: MonRef) -> String {
    let amount = battle.mon(target).hp_fraction(8);
    let (mut msg, dealt) = damage(battle, target, amount, &DamageContext::indirect("leech seed"));
    if dealt == 0 {
        return msg;
    }
    let mut drained = dealt;
    if battle.holds(seeder, "big-root") {
        drained = (drained as f64 * 1.3) as u32;
    }
    if battle.ability(target) == Ability::LiquidOoze {
        msg += &damage(battle, seeder, drained, &DamageContext::indirect("the liquid ooze")).0;
    } else {
        msg += &heal(battle, seeder, drained, "leech seed");
    }
    msg
}

fn weather_damage(battle: &mut Battle, target: MonRef) -> String {
    let weather = battle.weather();
    let mon = battle.mon(target);
    let hidden = matches!(
        mon.volatile.semi_invulnerable,
        Some(SemiInvulnerable::Dig | SemiInvulnerable::Dive)
    );
    if hidden || battle.holds(target, "safety-goggles") {
        return String::new();
    }
    let ability = battle.ability(target);
    let source = match weather {
        Some(WeatherKind::Sandstorm) => {
            let immune_type = [ElementType::Rock, ElementType::Ground, ElementType::Steel]
                .into_iter()
                .any(|t| mon.has_type(t));
            let immune_ability = matches!(
                ability,
                Ability::SandVeil | Ability::SandRush | Ability::SandForce | Ability::Overcoat
            );
            if immune_type || immune_ability {
                return String::new();
            }
            "the sandstorm"
        }
        Some(WeatherKind::Hail) => {
            let immune = mon.has_type(ElementType::Ice)
                || matches!(ability, Ability::IceBody | Ability::SnowCloak | Ability::Overcoat);
            if immune {
                return String::new();
            }
            "the hail"
        }
        _ => return String::new(),
    };
    let amount = mon.hp_fraction(16);
    damage(battle, target, amount, &DamageContext::indirect(source)).0
}

/// Bind, Ingrain, Aqua Ring, Octolock and Salt Cure.
fn binding_effects(battle: &mut Battle, target: MonRef) -> String {
    let mut msg = String::new();

    let binder = battle.mon(target).volatile.bind.item().copied();
    if let Some(binder) = binder {
        if battle.mon(binder).hp == 0 || !battle.is_active(binder) {
            battle.mon_mut(target).volatile.bind.end();
        } else {
            let divisor = if battle.mon(target).volatile.bind_binding_band { 6 } else { 8 };
            let amount = battle.mon(target).hp_fraction(divisor);
            msg += &damage(battle, target, amount, &DamageContext::indirect("the bind")).0;
            if battle.mon_mut(target).volatile.bind.tick() {
                msg += &format!("{} was freed from the bind!\n", battle.mon(target).name());
            }
        }
    }

    let big_root = battle.holds(target, "big-root");
    for (active, source) in [
        (battle.mon(target).volatile.ingrain, "its roots"),
        (battle.mon(target).volatile.aqua_ring, "its aqua ring"),
    ] {
        if active && battle.mon(target).hp > 0 {
            let mut amount = battle.mon(target).hp_fraction(16);
            if big_root {
                amount = (amount as f64 * 1.3) as u32;
            }
            msg += &heal(battle, target, amount, source);
        }
    }

    let octolocker = battle.mon(target).volatile.octolock;
    if let Some(octolocker) = octolocker.filter(|r| battle.mon(*r).hp > 0) {
        msg += &append_stats(
            battle,
            target,
            &[(StatKind::Defense, -1), (StatKind::SpDefense, -1)],
            Some(octolocker),
            None,
        );
    }

    if battle.mon(target).volatile.salt_cure && battle.mon(target).hp > 0 {
        let mon = battle.mon(target);
        let divisor = if mon.has_type(ElementType::Water) || mon.has_type(ElementType::Steel) { 4 } else { 8 };
        let amount = mon.hp_fraction(divisor);
        msg += &damage(battle, target, amount, &DamageContext::indirect("the salt cure")).0;
    }
    msg
}

fn grassy_terrain(battle: &mut Battle, target: MonRef) -> String {
    if battle.terrain() != Some(TerrainKind::Grassy) || !is_grounded(battle, target, None, None) {
        return String::new();
    }
    let amount = battle.mon(target).hp_fraction(16);
    heal(battle, target, amount, "the grassy terrain")
}

fn perish_count(battle: &mut Battle, target: MonRef) -> String {
    let perish = &mut battle.mon_mut(target).volatile.perish_song;
    if !perish.active() {
        return String::new();
    }
    let expired = perish.tick();
    let left = perish.turns_left().unwrap_or(0);
    let name = battle.mon(target).name().to_string();
    let mut msg = format!("{name}'s perish count fell to {left}!\n");
    if expired {
        msg += &faint(battle, target, None, None);
    }
    msg
}

impl Battle {
    /// Closes the current turn: upkeep for both active combatants, then the
    /// field and side timers, then a pending Wish.
    pub fn end_turn(&mut self) -> String {
        let mut msg = String::new();
        let consumed: Vec<(MonRef, Option<String>)> = self
            .active_mons()
            .into_iter()
            .map(|target| (target, self.mon(target).volatile.turn.consumed_item.clone()))
            .collect();
        for (target, item) in consumed {
            msg += &next_turn(self, target);
            // Pickup on the side that upkeeps later still sees this turn's item.
            let turn = &mut self.mon_mut(target).volatile.turn;
            if turn.consumed_item.is_none() {
                turn.consumed_item = item;
            }
        }
        for target in self.active_mons() {
            self.mon_mut(target).volatile.turn.consumed_item = None;
        }
        msg += &self.tick_weather();
        msg += &self.tick_terrain();

        let field = &mut self.field;
        let timers = [
            (&mut field.trick_room, "The twisted dimensions returned to normal!"),
            (&mut field.magic_room, "Magic Room wore off, and held items' effects returned to normal!"),
            (&mut field.wonder_room, "Wonder Room wore off, and Defense and Sp. Def stats returned to normal!"),
            (&mut field.gravity, "Gravity returned to normal!"),
            (&mut field.mud_sport, "The effects of Mud Sport have faded."),
            (&mut field.water_sport, "The effects of Water Sport have faded."),
            (&mut field.fairy_lock, ""),
        ];
        for (effect, ending) in timers {
            if effect.tick() && !ending.is_empty() {
                msg += ending;
                msg.push('\n');
            }
        }

        for side in [Side::A, Side::B] {
            let trainer = self.trainer_mut(side);
            let name = trainer.name.clone();
            msg += &trainer.conditions.tick(&name);
            trainer.retaliate.tick();
            if let Some(active) = self.active(side) {
                msg += &resolve_wish(self, active);
            }
        }

        self.turn += 1;
        log::debug!("turn {} ended", self.turn);
        self.record(&msg);
        self.record_outcome();
        msg
    }

    /// Writes the result line once a side has nobody left to send out.
    fn record_outcome(&mut self) {
        let standing = [Side::A, Side::B].map(|side| self.trainer(side).has_alive_pokemon());
        let Some(logger) = self.logger.as_mut() else {
            return;
        };
        match standing {
            [true, false] => logger.log_win(&self.trainers[0].name),
            [false, true] => logger.log_win(&self.trainers[1].name),
            [false, false] => logger.log_tie(),
            [true, true] => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::{active_battle, snapshot, with_ability, with_item, with_types};
    use pretty_assertions::assert_eq;

    fn me() -> MonRef {
        MonRef::new(Side::A, 0)
    }

    fn foe() -> MonRef {
        MonRef::new(Side::B, 0)
    }

    #[test]
    fn turn_flags_are_cleared_first() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.turn.flinched = true;
        battle.mon_mut(me()).volatile.turn.protection = Some(crate::sim::volatile::Protection::Protect);
        next_turn(&mut battle, me());
        let turn = &battle.mon(me()).volatile.turn;
        assert!(!turn.flinched);
        assert!(turn.protection.is_none());
        assert_eq!(battle.mon(me()).volatile.active_turns, 1);
    }

    #[test]
    fn taunt_expiry_is_reported() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.taunt.set(Some(1));
        let msg = next_turn(&mut battle, me());
        assert!(msg.contains("Snorlax's taunt wore off!"));
    }

    #[test]
    fn yawn_puts_the_target_to_sleep() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.yawn.set(Some(2));
        next_turn(&mut battle, me());
        assert!(battle.mon(me()).nv.is_none());
        let msg = next_turn(&mut battle, me());
        assert!(msg.contains("fell asleep"));
        assert!(battle.mon(me()).nv.is(StatusKind::Sleep));
    }

    #[test]
    fn leech_seed_drains_into_the_seeder() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("venusaur"));
        battle.mon_mut(me()).volatile.leech_seeded = true;
        battle.mon_mut(foe()).hp = 100;
        let max = battle.mon(me()).starting_hp;
        next_turn(&mut battle, me());
        assert_eq!(battle.mon(me()).hp, max - max / 8);
        assert_eq!(battle.mon(foe()).hp, 100 + max / 8);
    }

    #[test]
    fn sandstorm_spares_rock_types() {
        let mut battle = active_battle(snapshot("snorlax"), with_types(snapshot("tyranitar"), &[ElementType::Rock]));
        battle.set_weather(WeatherKind::Sandstorm, None);
        let max = battle.mon(me()).starting_hp;
        let msg = battle.end_turn();
        assert!(msg.contains("Snorlax took 10 damage from the sandstorm!"));
        assert_eq!(battle.mon(me()).hp, max - max / 16);
        assert_eq!(battle.mon(foe()).hp, max);
    }

    #[test]
    fn leftovers_run_before_ability_upkeep() {
        let mut battle = active_battle(
            with_item(with_ability(snapshot("ninjask"), "speed-boost"), "leftovers"),
            snapshot("gengar"),
        );
        battle.mon_mut(me()).hp = 100;
        battle.mon_mut(me()).volatile.active_turns = 1;
        let msg = next_turn(&mut battle, me());
        let heal_at = msg.find("leftovers").unwrap();
        let boost_at = msg.find("speed rose").unwrap();
        assert!(heal_at < boost_at);
    }

    #[test]
    fn perish_count_faints_on_zero() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.perish_song.set(Some(2));
        assert!(next_turn(&mut battle, me()).contains("perish count fell to 1"));
        let msg = next_turn(&mut battle, me());
        assert!(msg.contains("perish count fell to 0"));
        assert!(msg.contains("Snorlax fainted!"));
        assert_eq!(battle.mon(me()).hp, 0);
    }

    #[test]
    fn grassy_terrain_heals_grounded_mons() {
        let mut battle = active_battle(snapshot("snorlax"), with_types(snapshot("pidgeot"), &[ElementType::Flying]));
        battle.set_terrain(TerrainKind::Grassy, None);
        battle.mon_mut(me()).hp = 100;
        battle.mon_mut(foe()).hp = 100;
        battle.end_turn();
        assert_eq!(battle.mon(me()).hp, 110);
        assert_eq!(battle.mon(foe()).hp, 100);
    }

    #[test]
    fn end_turn_ticks_field_timers_and_counts_turns() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.field.trick_room.set(Some(1));
        battle.trainer_mut(Side::A).conditions.reflect.set(Some(1));
        let msg = battle.end_turn();
        assert!(msg.contains("The twisted dimensions returned to normal!"));
        assert!(msg.contains("Red's reflect wore off!"));
        assert_eq!(battle.turn, 1);
    }

    #[test]
    fn pickup_works_from_either_side() {
        for (holder, user) in [(foe(), me()), (me(), foe())] {
            let (a, b) = if holder == me() {
                (with_item(snapshot("snorlax"), "sitrus-berry"), with_ability(snapshot("zigzagoon"), "pickup"))
            } else {
                (with_ability(snapshot("zigzagoon"), "pickup"), with_item(snapshot("snorlax"), "sitrus-berry"))
            };
            let mut battle = active_battle(a, b);
            battle.consume_item(holder);
            let msg = battle.end_turn();
            assert!(msg.contains("Zigzagoon found one sitrus berry!"), "{msg}");
            assert!(battle.mon(user).held_item.is("sitrus-berry"));
            assert_eq!(battle.mon(holder).volatile.turn.consumed_item, None);
        }
    }

    #[test]
    fn wish_heals_when_it_comes_true() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.trainer_mut(Side::A).wish.set(50, Some(2));
        battle.mon_mut(me()).hp = 10;
        battle.end_turn();
        assert_eq!(battle.mon(me()).hp, 10);
        let msg = battle.end_turn();
        assert!(msg.contains("healed 50 hp from the wish"));
        assert_eq!(battle.mon(me()).hp, 60);
    }
}
