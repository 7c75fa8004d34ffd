//! Ability identity plus the per-trigger handler modules.
//!
//! Handlers are grouped by the hook they run on rather than by ability, so the
//! whole set that reacts to (say) contact can be exercised on its own.

pub mod contact;
pub mod end_of_turn;
pub mod events;
pub mod on_damage;
pub mod send_out;
pub mod stat_change;
pub mod switch_out;

use crate::sim::battle::{Battle, MonRef};
use crate::sim::moves::MoveDescriptor;
use anyhow::{anyhow, Error};
use std::fmt;
use std::str::FromStr;

macro_rules! abilities {
    ($($variant:ident => $id:literal),* $(,)?) => {
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        pub enum Ability {
            /// No ability, or an ability that is currently suppressed.
            None,
            $($variant),*
        }

        impl Ability {
            pub const fn id(self) -> &'static str {
                match self {
                    Ability::None => "none",
                    $(Ability::$variant => $id),*
                }
            }
        }

        impl FromStr for Ability {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
                match id.as_str() {
                    "" | "none" => Ok(Ability::None),
                    $($id => Ok(Ability::$variant),)*
                    other => Err(anyhow!("unknown ability '{other}'")),
                }
            }
        }
    };
}

abilities! {
    Aerilate => "aerilate",
    Aftermath => "aftermath",
    AirLock => "air-lock",
    AngerPoint => "anger-point",
    AngerShell => "anger-shell",
    Anticipation => "anticipation",
    AromaVeil => "aroma-veil",
    AuraBreak => "aura-break",
    BadDreams => "bad-dreams",
    BattleBond => "battle-bond",
    BeadsOfRuin => "beads-of-ruin",
    BeastBoost => "beast-boost",
    Berserk => "berserk",
    BigPecks => "big-pecks",
    CheekPouch => "cheek-pouch",
    ChillingNeigh => "chilling-neigh",
    Chlorophyll => "chlorophyll",
    ClearBody => "clear-body",
    CloudNine => "cloud-nine",
    ColorChange => "color-change",
    Comatose => "comatose",
    Competitive => "competitive",
    Contrary => "contrary",
    Corrosion => "corrosion",
    CottonDown => "cotton-down",
    CursedBody => "cursed-body",
    Damp => "damp",
    DarkAura => "dark-aura",
    DauntlessShield => "dauntless-shield",
    Defiant => "defiant",
    DeltaStream => "delta-stream",
    DesolateLand => "desolate-land",
    Disguise => "disguise",
    Download => "download",
    Drizzle => "drizzle",
    Drought => "drought",
    DrySkin => "dry-skin",
    EarlyBird => "early-bird",
    EffectSpore => "effect-spore",
    ElectricSurge => "electric-surge",
    Electromorphosis => "electromorphosis",
    EmergencyExit => "emergency-exit",
    FairyAura => "fairy-aura",
    FlameBody => "flame-body",
    FlowerGift => "flower-gift",
    FlowerVeil => "flower-veil",
    Forecast => "forecast",
    Forewarn => "forewarn",
    Frisk => "frisk",
    FullMetalBody => "full-metal-body",
    Galvanize => "galvanize",
    Gluttony => "gluttony",
    Gooey => "gooey",
    GrassySurge => "grassy-surge",
    GrimNeigh => "grim-neigh",
    GuardDog => "guard-dog",
    GulpMissile => "gulp-missile",
    HadronEngine => "hadron-engine",
    Harvest => "harvest",
    Heatproof => "heatproof",
    HeavyMetal => "heavy-metal",
    HungerSwitch => "hunger-switch",
    Hydration => "hydration",
    HyperCutter => "hyper-cutter",
    IceBody => "ice-body",
    IceFace => "ice-face",
    Illusion => "illusion",
    Immunity => "immunity",
    Imposter => "imposter",
    Infiltrator => "infiltrator",
    InnardsOut => "innards-out",
    InnerFocus => "inner-focus",
    Insomnia => "insomnia",
    Intimidate => "intimidate",
    IntrepidSword => "intrepid-sword",
    IronBarbs => "iron-barbs",
    Justified => "justified",
    KeenEye => "keen-eye",
    Klutz => "klutz",
    LeafGuard => "leaf-guard",
    Levitate => "levitate",
    LightMetal => "light-metal",
    Limber => "limber",
    LingeringAroma => "lingering-aroma",
    LiquidOoze => "liquid-ooze",
    LiquidVoice => "liquid-voice",
    MagicGuard => "magic-guard",
    Magician => "magician",
    MagmaArmor => "magma-armor",
    Mimicry => "mimicry",
    MindsEye => "minds-eye",
    MirrorArmor => "mirror-armor",
    MistySurge => "misty-surge",
    MoldBreaker => "mold-breaker",
    Moody => "moody",
    Moxie => "moxie",
    Multitype => "multitype",
    Mummy => "mummy",
    NaturalCure => "natural-cure",
    NeutralizingGas => "neutralizing-gas",
    Normalize => "normalize",
    Oblivious => "oblivious",
    Opportunist => "opportunist",
    OrichalcumPulse => "orichalcum-pulse",
    Overcoat => "overcoat",
    OwnTempo => "own-tempo",
    PastelVeil => "pastel-veil",
    PerishBody => "perish-body",
    Pickpocket => "pickpocket",
    Pickup => "pickup",
    Pixilate => "pixilate",
    PoisonHeal => "poison-heal",
    PoisonPoint => "poison-point",
    PoisonTouch => "poison-touch",
    PowerConstruct => "power-construct",
    Pressure => "pressure",
    PrimordialSea => "primordial-sea",
    PsychicSurge => "psychic-surge",
    PurifyingSalt => "purifying-salt",
    QuickFeet => "quick-feet",
    RainDish => "rain-dish",
    Rattled => "rattled",
    Refrigerate => "refrigerate",
    Regenerator => "regenerator",
    Ripen => "ripen",
    RksSystem => "rks-system",
    RoughSkin => "rough-skin",
    SandForce => "sand-force",
    SandRush => "sand-rush",
    SandSpit => "sand-spit",
    SandStream => "sand-stream",
    SandVeil => "sand-veil",
    Schooling => "schooling",
    Scrappy => "scrappy",
    ScreenCleaner => "screen-cleaner",
    SeedSower => "seed-sower",
    SheerForce => "sheer-force",
    ShedSkin => "shed-skin",
    ShieldsDown => "shields-down",
    Simple => "simple",
    SkillLink => "skill-link",
    SlowStart => "slow-start",
    SlushRush => "slush-rush",
    SnowCloak => "snow-cloak",
    SnowWarning => "snow-warning",
    SolarPower => "solar-power",
    SoulHeart => "soul-heart",
    Soundproof => "soundproof",
    SpeedBoost => "speed-boost",
    Stamina => "stamina",
    Static => "static",
    Steadfast => "steadfast",
    SteamEngine => "steam-engine",
    StickyHold => "sticky-hold",
    Sturdy => "sturdy",
    SupersweetSyrup => "supersweet-syrup",
    SweetVeil => "sweet-veil",
    SwiftSwim => "swift-swim",
    SwordOfRuin => "sword-of-ruin",
    Synchronize => "synchronize",
    TabletsOfRuin => "tablets-of-ruin",
    TanglingHair => "tangling-hair",
    Teravolt => "teravolt",
    ThermalExchange => "thermal-exchange",
    ToxicChain => "toxic-chain",
    ToxicDebris => "toxic-debris",
    Trace => "trace",
    Turboblaze => "turboblaze",
    Unburden => "unburden",
    Unnerve => "unnerve",
    VesselOfRuin => "vessel-of-ruin",
    VitalSpirit => "vital-spirit",
    WanderingSpirit => "wandering-spirit",
    WaterBubble => "water-bubble",
    WaterCompaction => "water-compaction",
    WaterVeil => "water-veil",
    WeakArmor => "weak-armor",
    WhiteSmoke => "white-smoke",
    WimpOut => "wimp-out",
    WindPower => "wind-power",
    WindRider => "wind-rider",
    ZenMode => "zen-mode",
    ZeroToHero => "zero-to-hero",
}

impl Ability {
    /// Display name, e.g. `rough-skin` -> `Rough Skin`.
    pub fn name(self) -> String {
        match self {
            Ability::RksSystem => "RKS System".to_string(),
            Ability::SoulHeart => "Soul-Heart".to_string(),
            _ => self
                .id()
                .split('-')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Abilities that Mold Breaker and ability-ignoring moves skip over.
    pub fn breakable(self) -> bool {
        matches!(
            self,
            Ability::AromaVeil
                | Ability::BigPecks
                | Ability::ClearBody
                | Ability::Contrary
                | Ability::Disguise
                | Ability::DrySkin
                | Ability::FlowerGift
                | Ability::FlowerVeil
                | Ability::Heatproof
                | Ability::HeavyMetal
                | Ability::HyperCutter
                | Ability::IceFace
                | Ability::Immunity
                | Ability::InnerFocus
                | Ability::Insomnia
                | Ability::KeenEye
                | Ability::LeafGuard
                | Ability::Levitate
                | Ability::LightMetal
                | Ability::Limber
                | Ability::MagmaArmor
                | Ability::MirrorArmor
                | Ability::Oblivious
                | Ability::Overcoat
                | Ability::OwnTempo
                | Ability::PastelVeil
                | Ability::PurifyingSalt
                | Ability::SandVeil
                | Ability::Simple
                | Ability::SnowCloak
                | Ability::Soundproof
                | Ability::StickyHold
                | Ability::Sturdy
                | Ability::SweetVeil
                | Ability::ThermalExchange
                | Ability::VitalSpirit
                | Ability::WaterBubble
                | Ability::WaterVeil
                | Ability::WhiteSmoke
        )
    }

    /// Abilities that Gastro Acid and Neutralizing Gas cannot switch off.
    pub fn unsuppressable(self) -> bool {
        matches!(
            self,
            Ability::BattleBond
                | Ability::Comatose
                | Ability::Disguise
                | Ability::GulpMissile
                | Ability::IceFace
                | Ability::Multitype
                | Ability::PowerConstruct
                | Ability::RksSystem
                | Ability::Schooling
                | Ability::ShieldsDown
                | Ability::ZenMode
                | Ability::ZeroToHero
        )
    }

    /// Abilities that cannot be copied by Trace.
    pub fn untraceable(self) -> bool {
        self.unsuppressable()
            || matches!(
                self,
                Ability::None
                    | Ability::Trace
                    | Ability::Illusion
                    | Ability::Imposter
                    | Ability::FlowerGift
                    | Ability::Forecast
                    | Ability::HungerSwitch
                    | Ability::NeutralizingGas
            )
    }

    /// Mold Breaker and its aliases.
    pub fn breaks_molds(self) -> bool {
        matches!(self, Ability::MoldBreaker | Ability::Teravolt | Ability::Turboblaze)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Battle {
    /// Ability of `target` as the rules see it, with no attacker involved.
    pub fn ability(&self, target: MonRef) -> Ability {
        self.ability_against(target, None, None)
    }

    /// Ability of `target` when `attacker` is acting on it with `move_`.
    ///
    /// Returns [`Ability::None`] while the ability is suppressed (Gastro Acid,
    /// Neutralizing Gas) or ignored (Mold Breaker family, ability-ignoring moves).
    pub fn ability_against(
        &self,
        target: MonRef,
        attacker: Option<MonRef>,
        move_: Option<&MoveDescriptor>,
    ) -> Ability {
        let mon = self.mon(target);
        let ability = mon.ability;
        if ability == Ability::None || ability.unsuppressable() {
            return ability;
        }
        if mon.volatile.ability_suppressed {
            return Ability::None;
        }
        let gas = self.active_mons().into_iter().any(|other| {
            other != target
                && self.mon(other).ability == Ability::NeutralizingGas
                && !self.mon(other).volatile.ability_suppressed
        });
        if gas && ability != Ability::NeutralizingGas {
            return Ability::None;
        }
        if let Some(attacker) = attacker.filter(|attacker| *attacker != target) {
            let ignored = move_.is_some_and(|m| m.flags.ignores_ability) || self.ability(attacker).breaks_molds();
            if ignored && ability.breakable() {
                return Ability::None;
            }
        }
        ability
    }
}
