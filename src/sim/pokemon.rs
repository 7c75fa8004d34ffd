use crate::model::{CombatantSnapshot, Gender};
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef, Side};
use crate::sim::items::berries::maybe_eat_berry;
use crate::sim::items::battle_items::mental_herb;
use crate::sim::items::HeldItem;
use crate::sim::moves::{MoveDescriptor, MoveSlot};
use crate::sim::source_suffix;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::{calc_hp, stage_multiplier, BaseStats, NatureMultipliers, StatKind, StatStages, StatsSet};
use crate::sim::status::{NonVolatileStatus, StatusKind};
use crate::sim::types::ElementType;
use crate::sim::volatile::{PerBattlePersistent, PerStintVolatile};
use crate::sim::weather_field::{TerrainKind, WeatherKind};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;

/// Starting state captured at creation. Never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Baseline {
    pub species_name: String,
    pub form: String,
    pub level: u8,
    pub starting_hp: u32,
    pub base_stats: HashMap<String, BaseStats>,
    pub form_types: HashMap<String, Vec<ElementType>>,
    pub ivs: [u8; 6],
    pub evs: [u8; 6],
    pub nature: NatureMultipliers,
    pub types: Vec<ElementType>,
    pub ability: Ability,
    pub moves: Vec<MoveDescriptor>,
    pub weight: u32,
}

/// One combatant's full battle-time state.
#[derive(Clone, Debug)]
pub struct Pokemon {
    pub id: u64,
    pub species_id: u32,
    pub side: Side,
    pub slot: usize,
    baseline: Baseline,
    /// Nickname, or the species name when there is none.
    pub name: String,
    pub form: String,
    pub gender: Option<Gender>,
    pub hp: u32,
    pub starting_hp: u32,
    pub stats: StatsSet,
    pub stages: StatStages,
    pub types: Vec<ElementType>,
    pub ability: Ability,
    pub moves: Vec<MoveSlot>,
    pub weight: u32,
    pub nv: NonVolatileStatus,
    pub held_item: HeldItem,
    pub persistent: PerBattlePersistent,
    pub volatile: PerStintVolatile,
}

impl Pokemon {
    pub fn from_snapshot(snapshot: &CombatantSnapshot, side: Side, id: u64) -> Result<Self> {
        let ability: Ability = snapshot
            .ability
            .parse()
            .with_context(|| format!("snapshot of {}", snapshot.species_name))?;
        let Some(base) = snapshot.base_stats.get(&snapshot.form) else {
            bail!("{} has no base stats for form '{}'", snapshot.species_name, snapshot.form);
        };
        if snapshot.types.is_empty() || snapshot.types.len() > 2 {
            bail!("{} must have one or two types, got {}", snapshot.species_name, snapshot.types.len());
        }
        if snapshot.max_hp == 0 {
            bail!("{} has zero max HP", snapshot.species_name);
        }
        let stats = StatsSet::from_base(base, snapshot.ivs, snapshot.evs, snapshot.level, &snapshot.nature);
        let baseline = Baseline {
            species_name: snapshot.species_name.clone(),
            form: snapshot.form.clone(),
            level: snapshot.level,
            starting_hp: snapshot.max_hp,
            base_stats: snapshot.base_stats.clone(),
            form_types: snapshot.form_types.clone(),
            ivs: snapshot.ivs,
            evs: snapshot.evs,
            nature: snapshot.nature,
            types: snapshot.types.clone(),
            ability,
            moves: snapshot.moves.clone(),
            weight: snapshot.weight,
        };
        let held_item = HeldItem::new(snapshot.item.as_deref());
        let persistent = PerBattlePersistent {
            ever_held_item: !held_item.is_empty(),
            ..PerBattlePersistent::default()
        };
        Ok(Self {
            id,
            species_id: snapshot.species_id,
            side,
            slot: 0,
            name: snapshot.nickname.clone().unwrap_or_else(|| snapshot.species_name.clone()),
            form: snapshot.form.clone(),
            gender: snapshot.gender,
            hp: snapshot.hp.unwrap_or(snapshot.max_hp).min(snapshot.max_hp),
            starting_hp: snapshot.max_hp,
            stats,
            stages: StatStages::default(),
            types: snapshot.types.clone(),
            ability,
            moves: snapshot.moves.iter().cloned().map(MoveSlot::new).collect(),
            weight: snapshot.weight,
            nv: NonVolatileStatus::default(),
            held_item,
            persistent,
            volatile: PerStintVolatile::default(),
            baseline,
        })
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Name shown in battle, which is the disguise while Illusion holds.
    pub fn name(&self) -> &str {
        self.volatile.illusion_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// `starting_hp / divisor`, at least 1.
    pub fn hp_fraction(&self, divisor: u32) -> u32 {
        (self.starting_hp / divisor).max(1)
    }

    /// Types, minus Flying for the turn it roosts.
    pub fn effective_types(&self) -> Vec<ElementType> {
        let mut types = self.types.clone();
        if self.volatile.turn.roost {
            types.retain(|t| *t != ElementType::Flying);
        }
        if types.is_empty() {
            types.push(ElementType::Normal);
        }
        types
    }

    pub fn has_type(&self, element: ElementType) -> bool {
        self.effective_types().contains(&element)
    }

    /// Types the current form has by default.
    pub fn form_types(&self) -> Vec<ElementType> {
        self.baseline
            .form_types
            .get(&self.form)
            .cloned()
            .unwrap_or_else(|| self.baseline.types.clone())
    }

    /// Switches to `form`, recomputing live stats and types. Max HP is left
    /// alone. Returns false if the species has no such form.
    pub fn form(&mut self, form: &str) -> bool {
        let Some(base) = self.baseline.base_stats.get(form) else {
            return false;
        };
        self.stats = StatsSet::from_base(base, self.baseline.ivs, self.baseline.evs, self.baseline.level, &self.baseline.nature);
        self.form = form.to_string();
        if let Some(types) = self.baseline.form_types.get(form) {
            self.types = types.clone();
        } else if form == self.baseline.form {
            self.types = self.baseline.types.clone();
        }
        true
    }

    /// Like [`Pokemon::form`], but also recomputes max HP. Current HP moves by
    /// the same amount the maximum grew, which is not counted as healing.
    pub fn form_with_hp_increase(&mut self, form: &str) -> bool {
        let Some(base) = self.baseline.base_stats.get(form).copied() else {
            return false;
        };
        self.form(form);
        let new_max = calc_hp(base.hp, self.baseline.ivs[0], self.baseline.evs[0], self.baseline.level);
        if new_max > self.starting_hp {
            let gained = new_max - self.starting_hp;
            if self.hp > 0 {
                self.hp += gained;
            }
        } else {
            self.hp = self.hp.min(new_max);
        }
        self.starting_hp = new_max;
        true
    }

    /// Restores everything tied to one stint on the field. Status, HP, PP,
    /// and the persistent group are kept.
    pub(crate) fn reset_to_baseline(&mut self) {
        self.volatile = PerStintVolatile::default();
        self.stages = StatStages::default();
        self.ability = self.baseline.ability;
        self.weight = self.baseline.weight;
        self.types = self.baseline.types.clone();
        for (slot, original) in self.moves.iter_mut().zip(self.baseline.moves.iter()) {
            if slot.descriptor.id != original.id {
                *slot = MoveSlot::new(original.clone());
            }
        }
        let form = if self.persistent.hero_form && self.baseline.base_stats.contains_key("palafin-hero") {
            "palafin-hero".to_string()
        } else {
            self.baseline.form.clone()
        };
        self.form(&form);
        self.starting_hp = self.baseline.starting_hp;
        self.hp = self.hp.min(self.starting_hp);
        self.nv.nightmare = false;
    }
}

/// Whether `target` touches the ground for terrain, hazards and Ground moves.
pub fn is_grounded(battle: &Battle, target: MonRef, attacker: Option<MonRef>, move_: Option<&MoveDescriptor>) -> bool {
    let mon = battle.mon(target);
    if battle.field.gravity.active() || mon.volatile.ingrain || mon.volatile.smack_down || battle.holds(target, "iron-ball") {
        return true;
    }
    if mon.has_type(ElementType::Flying) {
        return false;
    }
    if battle.ability_against(target, attacker, move_) == Ability::Levitate {
        return false;
    }
    if battle.holds(target, "air-balloon") {
        return false;
    }
    !(mon.volatile.magnet_rise.active() || mon.volatile.telekinesis.active())
}

/// Weight in hectograms after Autotomize, abilities and Float Stone.
pub fn weight(battle: &Battle, target: MonRef, attacker: Option<MonRef>, move_: Option<&MoveDescriptor>) -> u32 {
    let mon = battle.mon(target);
    let mut weight = mon.weight.saturating_sub(1000 * mon.volatile.autotomize as u32).max(1);
    match battle.ability_against(target, attacker, move_) {
        Ability::HeavyMetal => weight *= 2,
        Ability::LightMetal => weight = (weight / 2).max(1),
        _ => {}
    }
    if battle.holds(target, "float-stone") {
        weight = (weight / 2).max(1);
    }
    weight
}

/// Damage multiplier of a `move_type` hit on `target` (0.0, 0.25 .. 4.0).
pub fn effectiveness(
    battle: &Battle,
    target: MonRef,
    move_type: ElementType,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
) -> f64 {
    let mon = battle.mon(target);
    let attacker_ability = attacker.map(|attacker| battle.ability(attacker));
    let sees_ghosts = mon.volatile.identified || matches!(attacker_ability, Some(Ability::Scrappy | Ability::MindsEye));
    let grounded = is_grounded(battle, target, attacker, move_);
    if move_type == ElementType::Ground && !grounded {
        return 0.0;
    }
    let strong_winds = battle.weather() == Some(WeatherKind::StrongWinds);
    let mut multiplier = 1.0;
    for defending in mon.effective_types() {
        let mut percent = battle.type_chart.percent_with_inverse(move_type, defending, battle.inverse_battle);
        let ignore_immunity = match (move_type, defending) {
            (ElementType::Normal | ElementType::Fighting, ElementType::Ghost) => sees_ghosts,
            (ElementType::Psychic, ElementType::Dark) => mon.volatile.miracle_eye,
            (ElementType::Ground, ElementType::Flying) => grounded,
            _ => false,
        };
        if ignore_immunity && percent == 0 {
            percent = 100;
        }
        if strong_winds && defending == ElementType::Flying && percent > 100 {
            percent = 100;
        }
        multiplier *= percent as f64 / 100.0;
    }
    if move_type == ElementType::Fire && mon.volatile.tar_shot {
        multiplier *= 2.0;
    }
    multiplier
}

/// A battle stat after stages and the modifiers that live on the combatant.
/// Accuracy and evasion have no raw value; use the stage queries for them.
pub fn effective_stat(battle: &Battle, target: MonRef, stat: StatKind) -> u32 {
    let mon = battle.mon(target);
    let raw_stat = match stat {
        StatKind::Attack if mon.volatile.power_trick => StatKind::Defense,
        StatKind::Defense if mon.volatile.power_trick => StatKind::Attack,
        StatKind::Defense if battle.field.wonder_room.active() => StatKind::SpDefense,
        StatKind::SpDefense if battle.field.wonder_room.active() => StatKind::Defense,
        StatKind::Accuracy | StatKind::Evasion => return 0,
        other => other,
    };
    let ability = battle.ability(target);
    let mut value = mon.stats.get(raw_stat) as f64 * stage_multiplier(mon.stages.get(stat));
    let item = battle.usable_item(target);
    match stat {
        StatKind::Attack => {
            if item == Some("choice-band") {
                value *= 1.5;
            }
            if ability == Ability::SlowStart && mon.volatile.slow_start.active() {
                value *= 0.5;
            }
        }
        StatKind::SpAttack => {
            if item == Some("choice-specs") {
                value *= 1.5;
            }
            if ability == Ability::SolarPower && matches!(battle.weather(), Some(WeatherKind::Sun | WeatherKind::HarshSunlight)) {
                value *= 1.5;
            }
        }
        StatKind::SpDefense if item == Some("assault-vest") => value *= 1.5,
        StatKind::Speed => {
            let weather = battle.weather();
            let doubled = match ability {
                Ability::SwiftSwim => matches!(weather, Some(WeatherKind::Rain | WeatherKind::HeavyRain)),
                Ability::Chlorophyll => matches!(weather, Some(WeatherKind::Sun | WeatherKind::HarshSunlight)),
                Ability::SandRush => weather == Some(WeatherKind::Sandstorm),
                Ability::SlushRush => matches!(weather, Some(WeatherKind::Hail | WeatherKind::Snow)),
                Ability::Unburden => mon.volatile.unburden && mon.held_item.is_empty(),
                _ => false,
            };
            if doubled {
                value *= 2.0;
            }
            if ability == Ability::QuickFeet && !mon.nv.is_none() {
                value *= 1.5;
            } else if mon.nv.is(StatusKind::Paralysis) {
                value *= 0.5;
            }
            if ability == Ability::SlowStart && mon.volatile.slow_start.active() {
                value *= 0.5;
            }
            if battle.trainer(target.side).conditions.tailwind.active() {
                value *= 2.0;
            }
            match item {
                Some("choice-scarf") => value *= 1.5,
                Some("iron-ball") => value *= 0.5,
                _ => {}
            }
        }
        _ => {}
    }
    value.floor().max(1.0) as u32
}

pub fn accuracy_stage(battle: &Battle, target: MonRef) -> i8 {
    battle.mon(target).stages.accuracy
}

/// Evasion stage of `target` as `attacker` sees it. Foresight, Miracle Eye
/// and Keen Eye ignore raised evasion.
pub fn evasion_stage(battle: &Battle, target: MonRef, attacker: Option<MonRef>) -> i8 {
    let mon = battle.mon(target);
    let stage = mon.stages.evasion;
    let ignores_raise = mon.volatile.identified
        || mon.volatile.miracle_eye
        || attacker.is_some_and(|attacker| matches!(battle.ability(attacker), Ability::KeenEye | Ability::MindsEye));
    if ignores_raise {
        stage.min(0)
    } else {
        stage
    }
}

fn shielded_from(battle: &Battle, target: MonRef, attacker: Option<MonRef>, move_: Option<&MoveDescriptor>) -> bool {
    let external = attacker.is_some_and(|attacker| attacker != target);
    if !external {
        return false;
    }
    let infiltrator = attacker.is_some_and(|attacker| battle.ability(attacker) == Ability::Infiltrator);
    let sub_blocks = move_.map_or(false, |m| m.flags.affected_by_substitute && !m.flags.sound);
    battle.mon(target).volatile.substitute > 0 && sub_blocks && !infiltrator
}

pub fn confuse(
    battle: &mut Battle,
    target: MonRef,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
    source: &str,
) -> String {
    let mon = battle.mon(target);
    if mon.hp == 0 || mon.volatile.confusion.active() || shielded_from(battle, target, attacker, move_) {
        return String::new();
    }
    if battle.ability_against(target, attacker, move_) == Ability::OwnTempo {
        return String::new();
    }
    let external = attacker.is_some_and(|attacker| attacker != target);
    if external {
        if battle.terrain() == Some(TerrainKind::Misty) && is_grounded(battle, target, attacker, move_) {
            return String::new();
        }
        let infiltrator = attacker.is_some_and(|attacker| battle.ability(attacker) == Ability::Infiltrator);
        if battle.trainer(target.side).conditions.safeguard.active() && !infiltrator {
            return String::new();
        }
    }
    let turns = battle.rng.range(2, 6) as u32;
    let mon = battle.mon_mut(target);
    mon.volatile.confusion.set(Some(turns));
    let mut msg = format!("{} became confused{}!\n", mon.name(), source_suffix("from", source));
    msg += &maybe_eat_berry(battle, target);
    msg
}

pub fn flinch(
    battle: &mut Battle,
    target: MonRef,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
) -> String {
    if battle.mon(target).hp == 0 || shielded_from(battle, target, attacker, move_) {
        return String::new();
    }
    let ability = battle.ability_against(target, attacker, move_);
    if ability == Ability::InnerFocus {
        return String::new();
    }
    battle.mon_mut(target).volatile.turn.flinched = true;
    if ability == Ability::Steadfast {
        return append_stat(battle, target, 1, Some(target), None, StatKind::Speed, true);
    }
    String::new()
}

pub fn infatuate(
    battle: &mut Battle,
    target: MonRef,
    attacker: MonRef,
    move_: Option<&MoveDescriptor>,
    source: &str,
) -> String {
    let mon = battle.mon(target);
    let (Some(gender), Some(attacker_gender)) = (mon.gender, battle.mon(attacker).gender) else {
        return String::new();
    };
    if mon.hp == 0 || gender == attacker_gender || mon.volatile.infatuated.is_some() {
        return String::new();
    }
    if matches!(
        battle.ability_against(target, Some(attacker), move_),
        Ability::Oblivious | Ability::AromaVeil
    ) {
        return String::new();
    }
    battle.mon_mut(target).volatile.infatuated = Some(attacker);
    let mut msg = format!("{} fell in love{}!\n", battle.mon(target).name(), source_suffix("from", source));
    let attacker_mon = battle.mon(attacker);
    let back = attacker_mon.hp > 0
        && attacker_mon.volatile.infatuated.is_none()
        && !matches!(battle.ability(attacker), Ability::Oblivious | Ability::AromaVeil);
    if battle.holds(target, "destiny-knot") && back {
        battle.mon_mut(attacker).volatile.infatuated = Some(target);
        msg += &format!("{} fell in love from the destiny knot!\n", battle.mon(attacker).name());
    }
    msg += &mental_herb(battle, target);
    msg
}
