use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::{damage, heal, DamageContext};
use crate::sim::status::{apply_status, StatusKind};
use crate::sim::types::ElementType;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndOfTurnEffect {
    Heal { amount: u32, item_id: &'static str },
    Damage { amount: u32, item_id: &'static str },
}

pub fn end_of_turn_effect(battle: &Battle, target: MonRef) -> Option<EndOfTurnEffect> {
    let mon = battle.mon(target);
    let max_hp = mon.starting_hp;
    match battle.usable_item(target)? {
        "leftovers" if mon.hp < max_hp => Some(EndOfTurnEffect::Heal {
            amount: mon.hp_fraction(16),
            item_id: "leftovers",
        }),
        "black-sludge" if mon.has_type(ElementType::Poison) => (mon.hp < max_hp).then(|| EndOfTurnEffect::Heal {
            amount: mon.hp_fraction(16),
            item_id: "black sludge",
        }),
        "black-sludge" => Some(EndOfTurnEffect::Damage {
            amount: mon.hp_fraction(8),
            item_id: "black sludge",
        }),
        _ => None,
    }
}

/// Leftovers and Black Sludge.
pub fn residual_item(battle: &mut Battle, target: MonRef) -> String {
    match end_of_turn_effect(battle, target) {
        Some(EndOfTurnEffect::Heal { amount, item_id }) => heal(battle, target, amount, &format!("its {item_id}")),
        Some(EndOfTurnEffect::Damage { amount, item_id }) => {
            let source = format!("its {item_id}");
            damage(battle, target, amount, &DamageContext::indirect(&source)).0
        }
        None => String::new(),
    }
}

/// Toxic Orb and Flame Orb afflict their holder at the end of the turn.
pub fn status_orb(battle: &mut Battle, target: MonRef) -> String {
    let (kind, source) = match battle.usable_item(target) {
        Some("toxic-orb") => (StatusKind::BadlyPoisoned, "its toxic orb"),
        Some("flame-orb") => (StatusKind::Burn, "its flame orb"),
        _ => return String::new(),
    };
    apply_status(battle, target, kind, Some(target), None, source, false)
}

/// Resets every lowered stage once.
pub fn white_herb(battle: &mut Battle, target: MonRef) -> String {
    if !battle.holds(target, "white-herb") || !battle.mon(target).stages.has_negative() {
        return String::new();
    }
    battle.consume_item(target);
    let mon = battle.mon_mut(target);
    mon.stages.clear_negative();
    format!("{} returned its stats to normal using its white herb!\n", mon.name())
}

/// Cures the move-restricting conditions Mental Herb covers.
pub fn mental_herb(battle: &mut Battle, target: MonRef) -> String {
    if !battle.holds(target, "mental-herb") {
        return String::new();
    }
    let volatile = &battle.mon(target).volatile;
    let afflicted = volatile.infatuated.is_some()
        || volatile.taunt.active()
        || volatile.encore.active()
        || volatile.torment
        || volatile.disable.active()
        || volatile.heal_block.active();
    if !afflicted {
        return String::new();
    }
    battle.consume_item(target);
    let mon = battle.mon_mut(target);
    let volatile = &mut mon.volatile;
    volatile.infatuated = None;
    volatile.taunt.set(Some(0));
    volatile.encore.end();
    volatile.torment = false;
    volatile.disable.end();
    volatile.heal_block.set(Some(0));
    format!("{} cured itself using its mental herb!\n", mon.name())
}

pub fn announce_air_balloon(battle: &Battle, target: MonRef) -> String {
    if battle.holds(target, "air-balloon") {
        format!("{} floats in the air with its air balloon!\n", battle.mon(target).name())
    } else {
        String::new()
    }
}

/// Any damaging hit pops the balloon.
pub fn pop_air_balloon(battle: &mut Battle, target: MonRef) -> String {
    if !battle.holds(target, "air-balloon") {
        return String::new();
    }
    battle.consume_item(target);
    format!("{}'s air balloon popped!\n", battle.mon(target).name())
}
