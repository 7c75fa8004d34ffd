use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::effects::ExpiringEffect;
use crate::sim::stat_stages::append_stat;
use crate::sim::stats::StatKind;
use crate::sim::types::ElementType;
use anyhow::{anyhow, Error};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WeatherKind {
    Sun,
    Rain,
    Hail,
    Snow,
    Sandstorm,
    HarshSunlight,
    HeavyRain,
    StrongWinds,
}

impl WeatherKind {
    pub const fn tag(self) -> &'static str {
        match self {
            WeatherKind::Sun => "sun",
            WeatherKind::Rain => "rain",
            WeatherKind::Hail => "hail",
            WeatherKind::Snow => "snow",
            WeatherKind::Sandstorm => "sandstorm",
            WeatherKind::HarshSunlight => "h-sun",
            WeatherKind::HeavyRain => "h-rain",
            WeatherKind::StrongWinds => "h-wind",
        }
    }

    /// Weathers set by primal abilities. Only clearing removes them.
    pub fn is_extreme(self) -> bool {
        matches!(self, WeatherKind::HarshSunlight | WeatherKind::HeavyRain | WeatherKind::StrongWinds)
    }

    fn start_message(self) -> &'static str {
        match self {
            WeatherKind::Sun => "The sunlight turned harsh!\n",
            WeatherKind::Rain => "It started to rain!\n",
            WeatherKind::Hail => "It started to hail!\n",
            WeatherKind::Snow => "It started to snow!\n",
            WeatherKind::Sandstorm => "A sandstorm kicked up!\n",
            WeatherKind::HarshSunlight => "The sunlight turned extremely harsh!\n",
            WeatherKind::HeavyRain => "A heavy rain began to fall!\n",
            WeatherKind::StrongWinds => "Mysterious strong winds are protecting Flying-type Pokemon!\n",
        }
    }

    fn end_message(self) -> &'static str {
        match self {
            WeatherKind::Sun | WeatherKind::HarshSunlight => "The sunlight faded.\n",
            WeatherKind::Rain | WeatherKind::HeavyRain => "The rain stopped.\n",
            WeatherKind::Hail => "The hail stopped.\n",
            WeatherKind::Snow => "The snow stopped.\n",
            WeatherKind::Sandstorm => "The sandstorm subsided.\n",
            WeatherKind::StrongWinds => "The mysterious air current has dissipated!\n",
        }
    }

    fn extending_rock(self) -> Option<&'static str> {
        match self {
            WeatherKind::Sun => Some("heat-rock"),
            WeatherKind::Rain => Some("damp-rock"),
            WeatherKind::Hail | WeatherKind::Snow => Some("icy-rock"),
            WeatherKind::Sandstorm => Some("smooth-rock"),
            _ => None,
        }
    }

    /// Ability whose holder keeps this weather alive.
    fn sustained_by(self) -> Option<Ability> {
        match self {
            WeatherKind::HarshSunlight => Some(Ability::DesolateLand),
            WeatherKind::HeavyRain => Some(Ability::PrimordialSea),
            WeatherKind::StrongWinds => Some(Ability::DeltaStream),
            _ => None,
        }
    }
}

impl FromStr for WeatherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sun" => Ok(WeatherKind::Sun),
            "rain" => Ok(WeatherKind::Rain),
            "hail" => Ok(WeatherKind::Hail),
            "snow" => Ok(WeatherKind::Snow),
            "sandstorm" => Ok(WeatherKind::Sandstorm),
            "h-sun" => Ok(WeatherKind::HarshSunlight),
            "h-rain" => Ok(WeatherKind::HeavyRain),
            "h-wind" => Ok(WeatherKind::StrongWinds),
            other => Err(anyhow!("unknown weather '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TerrainKind {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl TerrainKind {
    pub const fn tag(self) -> &'static str {
        match self {
            TerrainKind::Electric => "electric",
            TerrainKind::Grassy => "grassy",
            TerrainKind::Misty => "misty",
            TerrainKind::Psychic => "psychic",
        }
    }

    /// Type Mimicry takes on.
    pub fn element(self) -> ElementType {
        match self {
            TerrainKind::Electric => ElementType::Electric,
            TerrainKind::Grassy => ElementType::Grass,
            TerrainKind::Misty => ElementType::Fairy,
            TerrainKind::Psychic => ElementType::Psychic,
        }
    }

    fn seed(self) -> (&'static str, StatKind) {
        match self {
            TerrainKind::Electric => ("electric-seed", StatKind::Defense),
            TerrainKind::Grassy => ("grassy-seed", StatKind::Defense),
            TerrainKind::Misty => ("misty-seed", StatKind::SpDefense),
            TerrainKind::Psychic => ("psychic-seed", StatKind::SpDefense),
        }
    }
}

impl FromStr for TerrainKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electric" => Ok(TerrainKind::Electric),
            "grassy" => Ok(TerrainKind::Grassy),
            "misty" => Ok(TerrainKind::Misty),
            "psychic" => Ok(TerrainKind::Psychic),
            other => Err(anyhow!("unknown terrain '{other}'")),
        }
    }
}

/// A countdown tagged with the kind of field effect it belongs to.
#[derive(Clone, Debug)]
pub struct FieldSlot<K> {
    kind: Option<K>,
    effect: ExpiringEffect,
}

impl<K> Default for FieldSlot<K> {
    fn default() -> Self {
        Self {
            kind: None,
            effect: ExpiringEffect::default(),
        }
    }
}

impl<K: Copy> FieldSlot<K> {
    pub fn kind(&self) -> Option<K> {
        self.kind.filter(|_| self.effect.active())
    }

    pub fn turns_left(&self) -> Option<u32> {
        self.effect.turns_left()
    }

    /// Installs `kind` with no rule checks and no side effects.
    pub fn force(&mut self, kind: K, turns: Option<u32>) {
        self.kind = Some(kind);
        self.effect.set(turns);
    }

    fn clear(&mut self) -> Option<K> {
        let kind = self.kind();
        self.kind = None;
        self.effect.set(Some(0));
        kind
    }

    /// Returns the kind that just expired, if any.
    fn tick(&mut self) -> Option<K> {
        let kind = self.kind();
        if self.effect.tick() {
            self.kind = None;
            return kind;
        }
        None
    }
}

pub type Weather = FieldSlot<WeatherKind>;
pub type Terrain = FieldSlot<TerrainKind>;

impl Battle {
    /// Weather as the rules see it: masked while a Cloud Nine or Air Lock
    /// holder is on the field.
    pub fn weather(&self) -> Option<WeatherKind> {
        let suppressed = self
            .active_mons()
            .into_iter()
            .any(|r| matches!(self.ability(r), Ability::CloudNine | Ability::AirLock));
        if suppressed {
            return None;
        }
        self.field.weather.kind()
    }

    pub fn terrain(&self) -> Option<TerrainKind> {
        self.field.terrain.kind()
    }

    /// Starts `kind`. Refuses to overwrite an extreme weather with a normal one,
    /// returning an empty narrative.
    pub fn set_weather(&mut self, kind: WeatherKind, initiator: Option<MonRef>) -> String {
        let current = self.field.weather.kind();
        if current.is_some_and(|current| current.is_extreme() && !kind.is_extreme()) {
            return String::new();
        }
        if current == Some(kind) {
            return String::new();
        }
        let turns = if kind.is_extreme() {
            None
        } else {
            let extended = match (initiator, kind.extending_rock()) {
                (Some(initiator), Some(rock)) => self.holds(initiator, rock),
                _ => false,
            };
            Some(if extended { 8 } else { 5 })
        };
        self.field.weather.force(kind, turns);
        log::debug!("weather set to {} for {turns:?} turns", kind.tag());
        let mut msg = kind.start_message().to_string();
        msg += &update_weather_forms(self);
        msg
    }

    pub fn clear_weather(&mut self) -> String {
        let Some(kind) = self.field.weather.clear() else {
            return String::new();
        };
        let mut msg = kind.end_message().to_string();
        msg += &update_weather_forms(self);
        msg
    }

    pub fn tick_weather(&mut self) -> String {
        let Some(kind) = self.field.weather.tick() else {
            return String::new();
        };
        let mut msg = kind.end_message().to_string();
        msg += &update_weather_forms(self);
        msg
    }

    /// Lifts an extreme weather whose sustaining ability is no longer on the field.
    pub fn check_weather_source(&mut self) -> String {
        let Some(required) = self.field.weather.kind().and_then(WeatherKind::sustained_by) else {
            return String::new();
        };
        if self.active_mons().into_iter().any(|r| self.ability(r) == required) {
            return String::new();
        }
        self.clear_weather()
    }

    pub fn set_terrain(&mut self, kind: TerrainKind, initiator: Option<MonRef>) -> String {
        if self.field.terrain.kind() == Some(kind) {
            return String::new();
        }
        let extended = initiator.is_some_and(|initiator| self.holds(initiator, "terrain-extender"));
        self.field.terrain.force(kind, Some(if extended { 8 } else { 5 }));
        log::debug!("terrain set to {}", kind.tag());
        let mut msg = match kind {
            TerrainKind::Electric => "An electric current ran across the battlefield!\n",
            TerrainKind::Grassy => "Grass grew to cover the battlefield!\n",
            TerrainKind::Misty => "Mist swirled around the battlefield!\n",
            TerrainKind::Psychic => "The battlefield got weird!\n",
        }
        .to_string();
        msg += &update_terrain_types(self);
        for mon in self.active_mons() {
            msg += &terrain_seed(self, mon);
        }
        msg
    }

    pub fn clear_terrain(&mut self) -> String {
        let Some(kind) = self.field.terrain.clear() else {
            return String::new();
        };
        let mut msg = terrain_end_message(kind).to_string();
        msg += &update_terrain_types(self);
        msg
    }

    pub fn tick_terrain(&mut self) -> String {
        let Some(kind) = self.field.terrain.tick() else {
            return String::new();
        };
        let mut msg = terrain_end_message(kind).to_string();
        msg += &update_terrain_types(self);
        msg
    }
}

fn terrain_end_message(kind: TerrainKind) -> &'static str {
    match kind {
        TerrainKind::Electric => "The electricity disappeared from the battlefield.\n",
        TerrainKind::Grassy => "The grass disappeared from the battlefield.\n",
        TerrainKind::Misty => "The mist disappeared from the battlefield.\n",
        TerrainKind::Psychic => "The weirdness disappeared from the battlefield!\n",
    }
}

/// Castform and Cherrim follow the weather while their ability works.
pub fn update_weather_forms(battle: &mut Battle) -> String {
    let mut msg = String::new();
    let weather = battle.weather();
    for r in battle.active_mons() {
        let ability = battle.ability(r);
        let mon = battle.mon(r);
        let wanted = if mon.form.starts_with("castform") {
            match (ability, weather) {
                (Ability::Forecast, Some(WeatherKind::Sun | WeatherKind::HarshSunlight)) => "castform-sunny",
                (Ability::Forecast, Some(WeatherKind::Rain | WeatherKind::HeavyRain)) => "castform-rainy",
                (Ability::Forecast, Some(WeatherKind::Hail | WeatherKind::Snow)) => "castform-snowy",
                _ => "castform",
            }
        } else if mon.form.starts_with("cherrim") {
            match (ability, weather) {
                (Ability::FlowerGift, Some(WeatherKind::Sun | WeatherKind::HarshSunlight)) => "cherrim-sunshine",
                _ => "cherrim",
            }
        } else {
            continue;
        };
        if mon.form != wanted {
            let mon = battle.mon_mut(r);
            if mon.form(wanted) {
                msg += &format!("{} transformed!\n", mon.name());
            }
        }
    }
    msg
}

/// Mimicry turns its holder into the terrain's type, and back once it ends.
pub fn update_terrain_types(battle: &mut Battle) -> String {
    let mut msg = String::new();
    let terrain = battle.terrain();
    for r in battle.active_mons() {
        if battle.ability(r) != Ability::Mimicry {
            continue;
        }
        let mon = battle.mon_mut(r);
        let wanted = match terrain {
            Some(kind) => vec![kind.element()],
            None => mon.form_types(),
        };
        if mon.types != wanted {
            mon.types = wanted;
            msg += &match terrain {
                Some(kind) => format!("{}'s type changed to {}!\n", mon.name(), kind.element()),
                None => format!("{} returned to its original type!\n", mon.name()),
            };
        }
    }
    msg
}

/// Fires a matching terrain seed held by `target`.
pub fn terrain_seed(battle: &mut Battle, target: MonRef) -> String {
    let Some(kind) = battle.terrain() else {
        return String::new();
    };
    let (seed, stat) = kind.seed();
    if battle.mon(target).hp == 0 || !battle.holds(target, seed) {
        return String::new();
    }
    battle.consume_item(target);
    let name = battle.mon(target).name().to_string();
    let mut msg = format!("{name} used its {}!\n", seed.replace('-', " "));
    msg += &append_stat(battle, target, 1, Some(target), None, stat, true);
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::battle::Side;
    use crate::sim::testing::{active_battle, snapshot, with_ability, with_form, with_item};
    use rstest::rstest;

    #[test]
    fn extreme_weather_blocks_normal_weather() {
        let mut battle = active_battle(snapshot("kyogre"), snapshot("groudon"));
        battle.set_weather(WeatherKind::HeavyRain, None);
        assert_eq!(battle.set_weather(WeatherKind::Rain, None), "");
        assert_eq!(battle.weather(), Some(WeatherKind::HeavyRain));
        assert_eq!(battle.field.weather.turns_left(), None);
        battle.clear_weather();
        assert!(battle.set_weather(WeatherKind::Rain, None).contains("started to rain"));
    }

    #[test]
    fn extreme_weather_can_replace_extreme_weather() {
        let mut battle = active_battle(snapshot("kyogre"), snapshot("groudon"));
        battle.set_weather(WeatherKind::HeavyRain, None);
        battle.set_weather(WeatherKind::HarshSunlight, None);
        assert_eq!(battle.weather(), Some(WeatherKind::HarshSunlight));
    }

    #[rstest]
    #[case(None, Some(5))]
    #[case(Some("damp-rock"), Some(8))]
    #[case(Some("heat-rock"), Some(5))]
    fn rain_duration_depends_on_the_rock(#[case] item: Option<&str>, #[case] turns: Option<u32>) {
        let setter = match item {
            Some(item) => with_item(snapshot("pelipper"), item),
            None => snapshot("pelipper"),
        };
        let mut battle = active_battle(setter, snapshot("groudon"));
        battle.set_weather(WeatherKind::Rain, Some(MonRef::new(Side::A, 0)));
        assert_eq!(battle.field.weather.turns_left(), turns);
    }

    #[test]
    fn weather_expires_after_its_turns() {
        let mut battle = active_battle(snapshot("pelipper"), snapshot("groudon"));
        battle.set_weather(WeatherKind::Sandstorm, None);
        for _ in 0..4 {
            assert_eq!(battle.tick_weather(), "");
        }
        assert_eq!(battle.tick_weather(), "The sandstorm subsided.\n");
        assert_eq!(battle.weather(), None);
    }

    #[test]
    fn cloud_nine_masks_weather_without_clearing_it() {
        let mut battle = active_battle(with_ability(snapshot("golduck"), "cloud-nine"), snapshot("groudon"));
        battle.set_weather(WeatherKind::Sun, None);
        assert_eq!(battle.weather(), None);
        assert_eq!(battle.field.weather.kind(), Some(WeatherKind::Sun));
    }

    #[test]
    fn castform_follows_the_weather() {
        let castform = with_form(with_ability(snapshot("castform"), "forecast"), "castform-rainy", &[ElementType::Water]);
        let mut battle = active_battle(castform, snapshot("groudon"));
        let castform = MonRef::new(Side::A, 0);
        let msg = battle.set_weather(WeatherKind::Rain, None);
        assert!(msg.contains("Castform transformed!"));
        assert_eq!(battle.mon(castform).form, "castform-rainy");
        assert_eq!(battle.mon(castform).types, vec![ElementType::Water]);
        battle.clear_weather();
        assert_eq!(battle.mon(castform).form, "castform");
    }

    #[test]
    fn seed_fires_when_terrain_starts() {
        let mut battle = active_battle(with_item(snapshot("tapu-koko"), "electric-seed"), snapshot("groudon"));
        let koko = MonRef::new(Side::A, 0);
        let msg = battle.set_terrain(TerrainKind::Electric, Some(koko));
        assert!(msg.contains("used its electric seed"));
        assert_eq!(battle.mon(koko).stages.defense, 1);
        assert!(battle.mon(koko).held_item.is_empty());
    }

    #[test]
    fn mimicry_tracks_the_terrain() {
        let mut battle = active_battle(with_ability(snapshot("stunfisk"), "mimicry"), snapshot("groudon"));
        let fish = MonRef::new(Side::A, 0);
        battle.set_terrain(TerrainKind::Psychic, None);
        assert_eq!(battle.mon(fish).types, vec![ElementType::Psychic]);
        battle.clear_terrain();
        assert_eq!(battle.mon(fish).types, vec![ElementType::Normal]);
    }
}
