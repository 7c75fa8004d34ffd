use crate::sim::abilities::{send_out as send_out_abilities, switch_out, Ability};
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::{damage, heal, DamageContext};
use crate::sim::effects::ExpiringEffect;
use crate::sim::items::battle_items::announce_air_balloon;
use crate::sim::pokemon::{effectiveness, is_grounded, Pokemon};
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::{StatKind, StatStages};
use crate::sim::status::{apply_status, StatusKind};
use crate::sim::types::ElementType;
use crate::sim::weather_field::terrain_seed;

/// What Baton Pass hands over to the next combatant on the same side.
#[derive(Clone, Debug, Default)]
pub struct BatonPass {
    stages: StatStages,
    substitute: u32,
    confusion: ExpiringEffect,
    focus_energy: bool,
    leech_seeded: bool,
    cursed: bool,
    ingrain: bool,
    aqua_ring: bool,
    magnet_rise: ExpiringEffect,
    perish_song: ExpiringEffect,
    power_trick: bool,
    ability_suppressed: bool,
}

impl BatonPass {
    pub fn capture(mon: &Pokemon) -> Self {
        let volatile = &mon.volatile;
        Self {
            stages: mon.stages,
            substitute: volatile.substitute,
            confusion: volatile.confusion.clone(),
            focus_energy: volatile.focus_energy,
            leech_seeded: volatile.leech_seeded,
            cursed: volatile.cursed,
            ingrain: volatile.ingrain,
            aqua_ring: volatile.aqua_ring,
            magnet_rise: volatile.magnet_rise.clone(),
            perish_song: volatile.perish_song.clone(),
            power_trick: volatile.power_trick,
            ability_suppressed: volatile.ability_suppressed,
        }
    }

    fn apply(self, mon: &mut Pokemon) {
        mon.stages = self.stages;
        let volatile = &mut mon.volatile;
        volatile.substitute = self.substitute;
        volatile.confusion = self.confusion;
        volatile.focus_energy = self.focus_energy;
        volatile.leech_seeded = self.leech_seeded;
        volatile.cursed = self.cursed;
        volatile.ingrain = self.ingrain;
        volatile.aqua_ring = self.aqua_ring;
        volatile.magnet_rise = self.magnet_rise;
        volatile.perish_song = self.perish_song;
        volatile.power_trick = self.power_trick;
        volatile.ability_suppressed = self.ability_suppressed;
    }
}

/// Stores the Baton Pass payload of `user` for whoever comes in next.
pub fn prepare_baton_pass(battle: &mut Battle, user: MonRef) {
    let payload = BatonPass::capture(battle.mon(user));
    battle.trainer_mut(user.side).baton_pass = Some(payload);
    battle.mon_mut(user).volatile.swap_out = true;
}

/// Shed Tail: pays half of max HP to leave a substitute for the next combatant.
pub fn prepare_shed_tail(battle: &mut Battle, user: MonRef) -> String {
    let mon = battle.mon(user);
    let cost = mon.starting_hp.div_ceil(2);
    if mon.hp <= cost || mon.volatile.substitute > 0 || !battle.trainer(user.side).has_other_alive(user.slot) {
        return "But it failed!\n".to_string();
    }
    let substitute = mon.hp_fraction(4);
    let own = DamageContext {
        attacker: Some(user),
        source: "its shed tail",
        ..DamageContext::default()
    };
    let mut msg = damage(battle, user, cost, &own).0;
    battle.trainer_mut(user.side).next_substitute = Some(substitute);
    battle.mon_mut(user).volatile.swap_out = true;
    msg += &format!("{} shed its tail to create a decoy!\n", battle.mon(user).name());
    msg
}

/// Illusion takes the look of the last party member that can still battle.
fn resolve_illusion(battle: &mut Battle, incoming: MonRef) {
    if battle.ability(incoming) != Ability::Illusion {
        return;
    }
    let disguise = battle
        .trainer(incoming.side)
        .party
        .iter()
        .enumerate()
        .rev()
        .find(|(slot, mon)| *slot != incoming.slot && mon.hp > 0)
        .map(|(_, mon)| mon.name.clone());
    battle.mon_mut(incoming).volatile.illusion_name = disguise;
}

/// Ends the trapping effects the opponent was held by from this side.
fn release_opponent(battle: &mut Battle, incoming: MonRef) {
    let Some(opponent) = battle.opponent(incoming) else {
        return;
    };
    let volatile = &mut battle.mon_mut(opponent).volatile;
    if volatile.bind.item().is_some_and(|binder| binder.side == incoming.side) {
        volatile.bind.end();
    }
    if volatile.octolock.is_some_and(|holder| holder.side == incoming.side) {
        volatile.octolock = None;
    }
    volatile.trapped = false;
}

fn entry_hazards(battle: &mut Battle, incoming: MonRef) -> String {
    let mut msg = String::new();
    let conditions = battle.trainer(incoming.side).conditions.clone();
    let boots = battle.holds(incoming, "heavy-duty-boots");
    let grounded = is_grounded(battle, incoming, None, None);
    let name = battle.mon(incoming).name().to_string();
    let max_hp = battle.mon(incoming).starting_hp;

    if conditions.toxic_spikes > 0 && grounded {
        if battle.mon(incoming).has_type(ElementType::Poison) {
            battle.trainer_mut(incoming.side).conditions.toxic_spikes = 0;
            msg += &format!("{name} absorbed the toxic spikes!\n");
        } else if !boots {
            let kind = if conditions.toxic_spikes >= 2 { StatusKind::BadlyPoisoned } else { StatusKind::Poison };
            msg += &apply_status(battle, incoming, kind, None, None, "the toxic spikes", false);
        }
    }
    if boots {
        return msg;
    }
    if conditions.spikes > 0 && grounded {
        let divisor = match conditions.spikes {
            1 => 8,
            2 => 6,
            _ => 4,
        };
        msg += &damage(battle, incoming, (max_hp / divisor).max(1), &DamageContext::indirect("the spikes")).0;
    }
    if conditions.stealth_rock && battle.mon(incoming).hp > 0 {
        let multiplier = effectiveness(battle, incoming, ElementType::Rock, None, None);
        let amount = (max_hp as f64 * multiplier / 8.0) as u32;
        msg += &damage(battle, incoming, amount, &DamageContext::indirect("the stealth rock")).0;
    }
    if conditions.sticky_web && grounded && battle.mon(incoming).hp > 0 {
        msg += &format!("{name} was caught in a sticky web!\n");
        let setter = battle.opponent(incoming);
        msg += &append_stat(battle, incoming, -1, setter, None, StatKind::Speed, true);
    }
    msg
}

fn restoring_wish(battle: &mut Battle, incoming: MonRef) -> String {
    let trainer = battle.trainer_mut(incoming.side);
    let (healing_wish, lunar_dance) = (trainer.healing_wish, trainer.lunar_dance);
    if !healing_wish && !lunar_dance {
        return String::new();
    }
    trainer.healing_wish = false;
    trainer.lunar_dance = false;
    let mon = battle.mon_mut(incoming);
    mon.hp = mon.starting_hp;
    mon.nv.reset();
    if lunar_dance {
        for slot in &mut mon.moves {
            slot.pp = slot.descriptor.pp;
        }
    }
    let source = if lunar_dance { "lunar dance" } else { "healing wish" };
    format!("{} was restored by the {source}!\n", mon.name())
}

/// Puts `incoming` on the field for its side and runs every entry effect.
pub fn send_out(battle: &mut Battle, incoming: MonRef) -> String {
    if battle.mon(incoming).hp == 0 {
        return String::new();
    }
    battle.trainer_mut(incoming.side).current = Some(incoming.slot);
    let mon = battle.mon_mut(incoming);
    mon.persistent.ever_sent_out = true;
    mon.volatile.turn.swapped_in = true;
    resolve_illusion(battle, incoming);

    let trainer = battle.trainer(incoming.side).name.clone();
    let mut msg = format!("{trainer} sent out {}!\n", battle.mon(incoming).name());
    log::debug!("{trainer} sent out slot {}", incoming.slot);
    release_opponent(battle, incoming);

    let trainer = battle.trainer_mut(incoming.side);
    let baton_pass = trainer.baton_pass.take();
    let shed_tail = trainer.next_substitute.take();
    if let Some(payload) = baton_pass {
        payload.apply(battle.mon_mut(incoming));
    }
    if let Some(substitute) = shed_tail {
        battle.mon_mut(incoming).volatile.substitute = substitute;
    }

    msg += &entry_hazards(battle, incoming);
    if battle.mon(incoming).hp == 0 {
        return msg;
    }
    msg += &send_out_abilities::on_send_out(battle, incoming, true);
    msg += &restoring_wish(battle, incoming);
    msg += &terrain_seed(battle, incoming);
    msg += &announce_air_balloon(battle, incoming);
    msg
}

/// Takes `target` off the field and throws away its stint state.
///
/// Switch-out abilities only run for a live combatant that was on the field,
/// so removing the same combatant twice changes nothing the second time.
pub fn remove(battle: &mut Battle, target: MonRef, fainted: bool) -> String {
    let mut msg = String::new();
    let was_active = battle.is_active(target);
    if !fainted && was_active && battle.mon(target).hp > 0 {
        msg += &switch_out::on_switch_out(battle, target);
    }
    battle.mon_mut(target).reset_to_baseline();
    if was_active {
        battle.trainer_mut(target.side).current = None;
    }
    if let Some(opponent) = battle.opponent(target) {
        let volatile = &mut battle.mon_mut(opponent).volatile;
        if volatile.infatuated == Some(target) {
            volatile.infatuated = None;
        }
        if volatile.bind.item() == Some(&target) {
            volatile.bind.end();
        }
        if volatile.octolock == Some(target) {
            volatile.octolock = None;
        }
    }
    msg += &battle.check_weather_source();
    msg
}

/// Heals the active combatant of `side` if a Wish comes due.
pub(crate) fn resolve_wish(battle: &mut Battle, target: MonRef) -> String {
    let trainer = battle.trainer_mut(target.side);
    let pending = trainer.wish.item().copied();
    if !trainer.wish.tick() {
        return String::new();
    }
    let Some(amount) = pending else {
        return String::new();
    };
    heal(battle, target, amount, "the wish")
}
