use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::{damage, heal, DamageContext};
use crate::sim::effects::ExpiringEffect;
use crate::sim::items::berries::maybe_eat_berry;
use crate::sim::moves::MoveDescriptor;
use crate::sim::pokemon::is_grounded;
use crate::sim::source_suffix;
use crate::sim::types::ElementType;
use crate::sim::weather_field::{TerrainKind, WeatherKind};
use anyhow::{anyhow, Error};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StatusKind {
    Burn,
    Poison,
    BadlyPoisoned,
    Paralysis,
    Sleep,
    Freeze,
}

impl StatusKind {
    pub const fn name(self) -> &'static str {
        match self {
            StatusKind::Burn => "burn",
            StatusKind::Poison => "poison",
            StatusKind::BadlyPoisoned => "bad poison",
            StatusKind::Paralysis => "paralysis",
            StatusKind::Sleep => "sleep",
            StatusKind::Freeze => "freeze",
        }
    }

    pub fn is_poison(self) -> bool {
        matches!(self, StatusKind::Poison | StatusKind::BadlyPoisoned)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatusKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brn" | "burn" => Ok(StatusKind::Burn),
            "psn" | "poison" => Ok(StatusKind::Poison),
            "tox" | "toxic" | "bad poison" | "badly-poisoned" => Ok(StatusKind::BadlyPoisoned),
            "par" | "paralysis" => Ok(StatusKind::Paralysis),
            "slp" | "sleep" => Ok(StatusKind::Sleep),
            "frz" | "freeze" => Ok(StatusKind::Freeze),
            other => Err(anyhow!("unknown status '{other}'")),
        }
    }
}

/// The single non-volatile status slot. Survives switching.
#[derive(Clone, Debug, Default)]
pub struct NonVolatileStatus {
    current: Option<StatusKind>,
    sleep: ExpiringEffect,
    badly_poisoned_turns: u32,
    pub nightmare: bool,
}

impl NonVolatileStatus {
    pub fn current(&self) -> Option<StatusKind> {
        self.current
    }

    pub fn is(&self, kind: StatusKind) -> bool {
        self.current == Some(kind)
    }

    pub fn is_none(&self) -> bool {
        self.current.is_none()
    }

    pub fn poisoned(&self) -> bool {
        self.current.is_some_and(StatusKind::is_poison)
    }

    pub fn sleep_turns_left(&self) -> Option<u32> {
        self.is(StatusKind::Sleep).then(|| self.sleep.turns_left()).flatten()
    }

    pub fn badly_poisoned_turns(&self) -> u32 {
        self.badly_poisoned_turns
    }

    fn set(&mut self, kind: StatusKind, sleep_turns: u32) {
        self.reset();
        self.current = Some(kind);
        if kind == StatusKind::Sleep {
            self.sleep.set(Some(sleep_turns));
        }
    }

    fn advance_toxic(&mut self) -> u32 {
        self.badly_poisoned_turns = (self.badly_poisoned_turns + 1).min(15);
        self.badly_poisoned_turns
    }

    /// Clears the status, the toxic counter and nightmare together.
    pub fn reset(&mut self) {
        self.current = None;
        self.sleep.set(Some(0));
        self.badly_poisoned_turns = 0;
        self.nightmare = false;
    }
}

/// Asleep for the purposes of Sleep Talk, Nightmare and Bad Dreams.
pub fn is_asleep(battle: &Battle, target: MonRef) -> bool {
    battle.mon(target).nv.is(StatusKind::Sleep) || battle.ability(target) == Ability::Comatose
}

pub(crate) fn status_blocked_by_ability(ability: Ability, kind: StatusKind) -> bool {
    use Ability as A;
    match kind {
        StatusKind::Burn => matches!(ability, A::WaterVeil | A::WaterBubble | A::ThermalExchange),
        StatusKind::Poison | StatusKind::BadlyPoisoned => matches!(ability, A::Immunity | A::PastelVeil),
        StatusKind::Paralysis => ability == A::Limber,
        StatusKind::Sleep => matches!(ability, A::Insomnia | A::VitalSpirit | A::SweetVeil),
        StatusKind::Freeze => ability == A::MagmaArmor,
    }
}

fn inflicted_message(name: &str, kind: StatusKind, source: &str) -> String {
    let suffix = source_suffix("from", source);
    match kind {
        StatusKind::Burn => format!("{name} was burned{suffix}!\n"),
        StatusKind::Poison => format!("{name} was poisoned{suffix}!\n"),
        StatusKind::BadlyPoisoned => format!("{name} was badly poisoned{suffix}!\n"),
        StatusKind::Paralysis => format!("{name} was paralyzed{suffix}! It may be unable to move!\n"),
        StatusKind::Sleep => format!("{name} fell asleep{suffix}!\n"),
        StatusKind::Freeze => format!("{name} was frozen solid{suffix}!\n"),
    }
}

/// Tries to give `target` a non-volatile status.
///
/// `force` replaces an existing status (Rest) and skips nothing else.
pub fn apply_status(
    battle: &mut Battle,
    target: MonRef,
    kind: StatusKind,
    attacker: Option<MonRef>,
    move_: Option<&MoveDescriptor>,
    source: &str,
    force: bool,
) -> String {
    let mon = battle.mon(target);
    if mon.hp == 0 {
        return String::new();
    }
    if !mon.nv.is_none() && !force {
        return String::new();
    }
    let external = attacker.is_some_and(|attacker| attacker != target);
    let ability = battle.ability_against(target, attacker, move_);

    if matches!(ability, Ability::Comatose | Ability::PurifyingSalt) {
        return String::new();
    }
    if ability == Ability::ShieldsDown && mon.form.contains("meteor") {
        return String::new();
    }

    let corrosion = attacker.is_some_and(|attacker| battle.ability(attacker) == Ability::Corrosion);
    let type_immune = match kind {
        StatusKind::Burn => mon.has_type(ElementType::Fire),
        StatusKind::Freeze => {
            mon.has_type(ElementType::Ice)
                || matches!(battle.weather(), Some(WeatherKind::Sun | WeatherKind::HarshSunlight))
        }
        StatusKind::Paralysis => mon.has_type(ElementType::Electric),
        StatusKind::Poison | StatusKind::BadlyPoisoned => {
            !corrosion && (mon.has_type(ElementType::Poison) || mon.has_type(ElementType::Steel))
        }
        StatusKind::Sleep => false,
    };
    if type_immune {
        return String::new();
    }

    if status_blocked_by_ability(ability, kind) {
        return String::new();
    }
    if ability == Ability::LeafGuard && matches!(battle.weather(), Some(WeatherKind::Sun | WeatherKind::HarshSunlight)) {
        return String::new();
    }
    if ability == Ability::FlowerVeil && mon.has_type(ElementType::Grass) {
        return String::new();
    }
    if kind == StatusKind::Sleep && battle.active_mons().iter().any(|r| battle.mon(*r).volatile.uproar.active()) {
        return String::new();
    }

    let grounded = is_grounded(battle, target, attacker, move_);
    match battle.terrain() {
        Some(TerrainKind::Misty) if grounded => return String::new(),
        Some(TerrainKind::Electric) if grounded && kind == StatusKind::Sleep => return String::new(),
        _ => {}
    }
    let infiltrator = attacker.is_some_and(|attacker| battle.ability(attacker) == Ability::Infiltrator);
    if external && !infiltrator && battle.trainer(target.side).conditions.safeguard.active() {
        return String::new();
    }
    let sub_blocks = move_.map_or(true, |m| m.flags.affected_by_substitute && !m.flags.sound);
    if external && sub_blocks && !infiltrator && battle.mon(target).volatile.substitute > 0 {
        return String::new();
    }

    // Minior's core is shielded while it is still in its meteor shell.
    let form = &battle.mon(target).form;
    if form.starts_with("minior") && form.contains("meteor") {
        return String::new();
    }

    let sleep_turns = match kind {
        StatusKind::Sleep if force => 3,
        StatusKind::Sleep => battle.rng.range(2, 5) as u32,
        _ => 0,
    };
    let name = battle.mon(target).name().to_string();
    battle.mon_mut(target).nv.set(kind, sleep_turns);
    log::trace!("{name} gained status {kind}");
    let mut msg = inflicted_message(&name, kind, source);

    if let Some(attacker) = attacker.filter(|_| external) {
        let mirrors = matches!(
            kind,
            StatusKind::Burn | StatusKind::Poison | StatusKind::BadlyPoisoned | StatusKind::Paralysis
        );
        if mirrors && battle.ability(target) == Ability::Synchronize && battle.mon(attacker).hp > 0 {
            let source = format!("{name}'s synchronize");
            msg += &apply_status(battle, attacker, kind, Some(target), None, &source, false);
        }
    }
    msg += &maybe_eat_berry(battle, target);
    msg
}

/// Cures the status of `target`, reporting it in the status's own words.
pub fn cure_status(battle: &mut Battle, target: MonRef, source: &str) -> String {
    let mon = battle.mon_mut(target);
    let Some(kind) = mon.nv.current() else {
        return String::new();
    };
    mon.nv.reset();
    let name = mon.name().to_string();
    let suffix = source_suffix("thanks to", source);
    match kind {
        StatusKind::Sleep => format!("{name} woke up{suffix}!\n"),
        StatusKind::Freeze => format!("{name} thawed out{suffix}!\n"),
        other => format!("{name}'s {other} was cured{suffix}!\n"),
    }
}

/// Residual damage (or Poison Heal healing) for the status of `target`, then
/// the weather- and chance-based self cures.
pub fn status_tick(battle: &mut Battle, target: MonRef) -> String {
    let mon = battle.mon(target);
    if mon.hp == 0 {
        return String::new();
    }
    let Some(kind) = mon.nv.current() else {
        return String::new();
    };
    let max_hp = mon.starting_hp;
    let ability = battle.ability(target);
    let indirect = DamageContext::indirect;
    let mut msg = String::new();
    match kind {
        StatusKind::Burn => {
            let divisor = if ability == Ability::Heatproof { 32 } else { 16 };
            msg += &damage(battle, target, (max_hp / divisor).max(1), &indirect("its burn")).0;
        }
        StatusKind::Poison | StatusKind::BadlyPoisoned => {
            let amount = if kind == StatusKind::Poison {
                (max_hp / 8).max(1)
            } else {
                let turns = battle.mon_mut(target).nv.advance_toxic();
                (max_hp / 16).max(1) * turns
            };
            if ability == Ability::PoisonHeal {
                msg += &heal(battle, target, (max_hp / 8).max(1), "its poison heal");
            } else {
                msg += &damage(battle, target, amount, &indirect("its poison")).0;
            }
        }
        StatusKind::Sleep if battle.mon(target).nv.nightmare => {
            msg += &damage(battle, target, (max_hp / 4).max(1), &indirect("its nightmare")).0;
        }
        _ => {}
    }
    if battle.mon(target).hp == 0 {
        return msg;
    }
    let rain = matches!(battle.weather(), Some(WeatherKind::Rain | WeatherKind::HeavyRain));
    if ability == Ability::Hydration && rain {
        msg += &cure_status(battle, target, "its hydration");
    } else if ability == Ability::ShedSkin && battle.rng.chance(1, 3) {
        msg += &cure_status(battle, target, "its shed skin");
    }
    msg
}

/// Runs down the sleep counter when `target` tries to act. Early Bird counts
/// down twice as fast.
pub fn try_wake(battle: &mut Battle, target: MonRef) -> String {
    if !battle.mon(target).nv.is(StatusKind::Sleep) {
        return String::new();
    }
    let early_bird = battle.ability(target) == Ability::EarlyBird;
    let mon = battle.mon_mut(target);
    let mut woke = mon.nv.sleep.tick();
    if early_bird && !woke {
        woke = mon.nv.sleep.tick();
    }
    let name = mon.name().to_string();
    if woke {
        mon.nv.reset();
        format!("{name} woke up!\n")
    } else {
        format!("{name} is fast asleep.\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::battle::Side;
    use crate::sim::testing::{active_battle, snapshot, with_ability, with_types};
    use crate::sim::weather_field::TerrainKind;

    fn foe() -> MonRef {
        MonRef::new(Side::B, 0)
    }

    fn me() -> MonRef {
        MonRef::new(Side::A, 0)
    }

    #[test]
    fn only_one_status_at_a_time() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        let msg = apply_status(&mut battle, me(), StatusKind::Burn, Some(foe()), None, "", false);
        assert_eq!(msg, "Snorlax was burned!\n");
        assert_eq!(apply_status(&mut battle, me(), StatusKind::Paralysis, Some(foe()), None, "", false), "");
        assert!(battle.mon(me()).nv.is(StatusKind::Burn));
    }

    #[test]
    fn forced_status_replaces_the_old_one() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        apply_status(&mut battle, me(), StatusKind::Burn, Some(foe()), None, "", false);
        apply_status(&mut battle, me(), StatusKind::Sleep, Some(me()), None, "", true);
        assert!(battle.mon(me()).nv.is(StatusKind::Sleep));
        assert_eq!(battle.mon(me()).nv.sleep_turns_left(), Some(3));
    }

    #[test]
    fn types_are_immune_to_their_own_status() {
        let mut battle = active_battle(with_types(snapshot("charizard"), &[ElementType::Fire]), snapshot("gengar"));
        assert_eq!(apply_status(&mut battle, me(), StatusKind::Burn, Some(foe()), None, "", false), "");
        assert!(battle.mon(me()).nv.is_none());
    }

    #[test]
    fn corrosion_poisons_steel_types() {
        let mut battle = active_battle(
            with_types(snapshot("skarmory"), &[ElementType::Steel]),
            with_ability(snapshot("salazzle"), "corrosion"),
        );
        let msg = apply_status(&mut battle, me(), StatusKind::Poison, Some(foe()), None, "", false);
        assert!(msg.contains("was poisoned"));
    }

    #[test]
    fn misty_terrain_protects_grounded_targets() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.field.terrain.force(TerrainKind::Misty, Some(5));
        assert_eq!(apply_status(&mut battle, me(), StatusKind::Sleep, Some(foe()), None, "", false), "");
    }

    #[test]
    fn substitute_blocks_external_status() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.mon_mut(me()).volatile.substitute = 30;
        assert_eq!(apply_status(&mut battle, me(), StatusKind::Burn, Some(foe()), None, "", false), "");
        let msg = apply_status(&mut battle, me(), StatusKind::Burn, None, None, "its flame orb", false);
        assert_eq!(msg, "Snorlax was burned from its flame orb!\n");
    }

    #[test]
    fn synchronize_mirrors_the_status() {
        let mut battle = active_battle(with_ability(snapshot("espeon"), "synchronize"), snapshot("gengar"));
        let msg = apply_status(&mut battle, me(), StatusKind::Paralysis, Some(foe()), None, "", false);
        assert!(msg.contains("Gengar was paralyzed from Espeon's synchronize!"));
        assert!(battle.mon(foe()).nv.is(StatusKind::Paralysis));
    }

    #[test]
    fn toxic_damage_ramps_up() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        apply_status(&mut battle, me(), StatusKind::BadlyPoisoned, Some(foe()), None, "", false);
        status_tick(&mut battle, me());
        assert_eq!(battle.mon(me()).hp, max - max / 16);
        status_tick(&mut battle, me());
        assert_eq!(battle.mon(me()).hp, max - 3 * (max / 16));
    }

    #[test]
    fn reset_clears_everything_at_once() {
        let mut status = NonVolatileStatus::default();
        status.set(StatusKind::BadlyPoisoned, 0);
        status.advance_toxic();
        status.nightmare = true;
        status.reset();
        assert!(status.is_none());
        assert_eq!(status.badly_poisoned_turns(), 0);
        assert!(!status.nightmare);
    }

    #[test]
    fn sleeper_wakes_when_the_counter_runs_out() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        apply_status(&mut battle, me(), StatusKind::Sleep, Some(me()), None, "", true);
        assert_eq!(try_wake(&mut battle, me()), "Snorlax is fast asleep.\n");
        assert_eq!(try_wake(&mut battle, me()), "Snorlax is fast asleep.\n");
        assert_eq!(try_wake(&mut battle, me()), "Snorlax woke up!\n");
        assert!(battle.mon(me()).nv.is_none());
    }

    #[test]
    fn safeguard_stops_external_status_only() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.trainer_mut(Side::A).conditions.safeguard.set(Some(5));
        assert_eq!(apply_status(&mut battle, me(), StatusKind::Burn, Some(foe()), None, "", false), "");
        assert!(battle.mon(me()).nv.is_none());
        apply_status(&mut battle, me(), StatusKind::Sleep, Some(me()), None, "", true);
        assert!(battle.mon(me()).nv.is(StatusKind::Sleep));
    }

    #[test]
    fn burn_chips_a_sixteenth_and_heatproof_halves_it() {
        for (ability, divisor) in [("none", 16), ("heatproof", 32)] {
            let mut battle = active_battle(with_ability(snapshot("bronzong"), ability), snapshot("gengar"));
            let max = battle.mon(me()).starting_hp;
            apply_status(&mut battle, me(), StatusKind::Burn, None, None, "", true);
            status_tick(&mut battle, me());
            assert_eq!(battle.mon(me()).hp, max - max / divisor, "{ability}");
        }
    }

    #[test]
    fn poison_heal_heals_instead_of_hurting() {
        let mut battle = active_battle(with_ability(snapshot("breloom"), "poison-heal"), snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        apply_status(&mut battle, me(), StatusKind::BadlyPoisoned, None, None, "", true);
        battle.mon_mut(me()).hp = max / 2;
        status_tick(&mut battle, me());
        assert_eq!(battle.mon(me()).hp, max / 2 + max / 8);
    }

    #[test]
    fn nightmare_hurts_a_quarter_while_asleep() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        let max = battle.mon(me()).starting_hp;
        apply_status(&mut battle, me(), StatusKind::Sleep, None, None, "", true);
        status_tick(&mut battle, me());
        assert_eq!(battle.mon(me()).hp, max);
        battle.mon_mut(me()).nv.nightmare = true;
        let msg = status_tick(&mut battle, me());
        assert!(msg.contains("from its nightmare"));
        assert_eq!(battle.mon(me()).hp, max - max / 4);
    }

    #[test]
    fn only_unforced_sleep_draws_a_duration() {
        let mut battle = active_battle(snapshot("snorlax"), snapshot("gengar"));
        battle.rng.script([1]);
        apply_status(&mut battle, me(), StatusKind::Burn, None, None, "", false);
        apply_status(&mut battle, foe(), StatusKind::Sleep, None, None, "", false);
        assert_eq!(battle.mon(foe()).nv.sleep_turns_left(), Some(3));
    }
}
