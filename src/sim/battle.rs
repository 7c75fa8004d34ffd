use crate::battle_logger::BattleLogger;
use crate::config::BattleOptions;
use crate::sim::effects::{ExpiringEffect, ExpiringItem};
use crate::sim::pokemon::Pokemon;
use crate::sim::rng::BattleRng;
use crate::sim::switching::{self, BatonPass};
use crate::sim::types::TypeChart;
use crate::sim::weather_field::{Terrain, Weather};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Handle to one combatant: the side it belongs to and its party slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MonRef {
    pub side: Side,
    pub slot: usize,
}

impl MonRef {
    pub fn new(side: Side, slot: usize) -> Self {
        Self { side, slot }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SideConditions {
    pub stealth_rock: bool,
    pub spikes: u8,
    pub toxic_spikes: u8,
    pub sticky_web: bool,
    pub reflect: ExpiringEffect,
    pub light_screen: ExpiringEffect,
    pub aurora_veil: ExpiringEffect,
    pub mist: ExpiringEffect,
    pub safeguard: ExpiringEffect,
    pub tailwind: ExpiringEffect,
    pub lucky_chant: ExpiringEffect,
}

impl SideConditions {
    pub fn clear_screens(&mut self) {
        self.reflect.set(Some(0));
        self.light_screen.set(Some(0));
        self.aurora_veil.set(Some(0));
    }

    /// Ticks every timed condition and returns the messages for those that ran out.
    pub fn tick(&mut self, trainer: &str) -> String {
        let mut msg = String::new();
        let timers: [(&mut ExpiringEffect, &str); 7] = [
            (&mut self.reflect, "reflect"),
            (&mut self.light_screen, "light screen"),
            (&mut self.aurora_veil, "aurora veil"),
            (&mut self.mist, "mist"),
            (&mut self.safeguard, "safeguard"),
            (&mut self.tailwind, "tailwind"),
            (&mut self.lucky_chant, "lucky chant"),
        ];
        for (effect, name) in timers {
            if effect.tick() {
                msg += &format!("{trainer}'s {name} wore off!\n");
            }
        }
        msg
    }
}

/// One side of the battle: its party and everything that belongs to the side
/// rather than to a single combatant.
#[derive(Clone, Debug)]
pub struct Trainer {
    pub name: String,
    pub party: Vec<Pokemon>,
    pub current: Option<usize>,
    pub num_fainted: u32,
    /// Open for the turn after a party member fainted (Retaliate).
    pub retaliate: ExpiringEffect,
    pub conditions: SideConditions,
    pub baton_pass: Option<BatonPass>,
    pub next_substitute: Option<u32>,
    pub healing_wish: bool,
    pub lunar_dance: bool,
    /// Pending Wish heal amount.
    pub wish: ExpiringItem<u32>,
}

impl Trainer {
    pub fn new(name: impl Into<String>, party: Vec<Pokemon>) -> Self {
        Self {
            name: name.into(),
            party,
            current: None,
            num_fainted: 0,
            retaliate: ExpiringEffect::default(),
            conditions: SideConditions::default(),
            baton_pass: None,
            next_substitute: None,
            healing_wish: false,
            lunar_dance: false,
            wish: ExpiringItem::default(),
        }
    }

    pub fn has_alive_pokemon(&self) -> bool {
        self.party.iter().any(|mon| mon.hp > 0)
    }

    /// Whether a party member other than `slot` can still battle.
    pub fn has_other_alive(&self, slot: usize) -> bool {
        self.party.iter().enumerate().any(|(idx, mon)| idx != slot && mon.hp > 0)
    }
}

/// Field-wide timers shared by both sides.
#[derive(Clone, Debug, Default)]
pub struct Field {
    pub weather: Weather,
    pub terrain: Terrain,
    pub trick_room: ExpiringEffect,
    pub magic_room: ExpiringEffect,
    pub wonder_room: ExpiringEffect,
    pub gravity: ExpiringEffect,
    pub mud_sport: ExpiringEffect,
    pub water_sport: ExpiringEffect,
    pub fairy_lock: ExpiringEffect,
}

/// The battle aggregate: owns both parties, the field and the random source.
/// Every rule operation borrows it mutably and addresses combatants by [`MonRef`].
pub struct Battle {
    pub trainers: [Trainer; 2],
    pub field: Field,
    pub type_chart: TypeChart,
    pub inverse_battle: bool,
    pub turn: u32,
    pub rng: BattleRng,
    pub logger: Option<BattleLogger>,
}

impl Battle {
    pub fn new(trainer_a: Trainer, trainer_b: Trainer, options: &BattleOptions) -> Self {
        let mut trainers = [trainer_a, trainer_b];
        for (side, trainer) in [Side::A, Side::B].into_iter().zip(trainers.iter_mut()) {
            for (slot, mon) in trainer.party.iter_mut().enumerate() {
                mon.side = side;
                mon.slot = slot;
            }
        }
        let rng = options.seed.map(BattleRng::seeded).unwrap_or_default();
        let logger = options.record_log.then(|| {
            let mut logger = BattleLogger::new(&options.format_id, &trainers[0].name, &trainers[1].name);
            logger.set_seed(rng.initial_seed());
            logger
        });
        log::debug!(
            "battle created: {} vs {} (seed {}, inverse {})",
            trainers[0].name,
            trainers[1].name,
            rng.initial_seed(),
            options.inverse_battle
        );
        Self {
            trainers,
            field: Field::default(),
            type_chart: TypeChart::default(),
            inverse_battle: options.inverse_battle,
            turn: 0,
            rng,
            logger,
        }
    }

    pub fn trainer(&self, side: Side) -> &Trainer {
        &self.trainers[side.index()]
    }

    pub fn trainer_mut(&mut self, side: Side) -> &mut Trainer {
        &mut self.trainers[side.index()]
    }

    /// Panics if `target` does not point into a party.
    pub fn mon(&self, target: MonRef) -> &Pokemon {
        &self.trainers[target.side.index()].party[target.slot]
    }

    pub fn mon_mut(&mut self, target: MonRef) -> &mut Pokemon {
        &mut self.trainers[target.side.index()].party[target.slot]
    }

    pub fn active(&self, side: Side) -> Option<MonRef> {
        self.trainer(side).current.map(|slot| MonRef::new(side, slot))
    }

    pub fn is_active(&self, target: MonRef) -> bool {
        self.trainer(target.side).current == Some(target.slot)
    }

    /// The combatant currently facing `target`.
    pub fn opponent(&self, target: MonRef) -> Option<MonRef> {
        self.active(target.side.opposite())
    }

    /// Active combatants, side A first.
    pub fn active_mons(&self) -> Vec<MonRef> {
        [Side::A, Side::B].into_iter().filter_map(|side| self.active(side)).collect()
    }

    /// Appends narrative to the log of the current turn, if recording.
    pub fn record(&mut self, msg: &str) {
        if msg.is_empty() {
            return;
        }
        if let Some(logger) = self.logger.as_mut() {
            logger.log_narrative(self.turn, msg);
        }
    }

    /// Sends `slot` of `side` into battle, removing whoever was active first.
    pub fn switch_in(&mut self, side: Side, slot: usize) -> String {
        let mut msg = String::new();
        if let Some(outgoing) = self.active(side) {
            if outgoing.slot == slot {
                return msg;
            }
            msg += &switching::remove(self, outgoing, false);
        }
        msg += &switching::send_out(self, MonRef::new(side, slot));
        self.record(&msg);
        msg
    }
}
