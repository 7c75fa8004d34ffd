use crate::sim::abilities::Ability;

/// Hooks the combatant core runs abilities on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AbilityTrigger {
    OnSendOut,      // 場に出た時
    OnSwitchOut,    // 引っ込む時
    OnDamagingHit,  // ダメージを受けた時
    OnContact,      // 接触技を受けた時
    OnKnockOut,     // 相手を倒した時
    OnStatChange,   // 能力変化を受ける時
    OnStatusImmunity,
    OnEndOfTurn,    // ターン終了時
}

impl AbilityTrigger {
    pub const ALL: [AbilityTrigger; 8] = [
        AbilityTrigger::OnSendOut,
        AbilityTrigger::OnSwitchOut,
        AbilityTrigger::OnDamagingHit,
        AbilityTrigger::OnContact,
        AbilityTrigger::OnKnockOut,
        AbilityTrigger::OnStatChange,
        AbilityTrigger::OnStatusImmunity,
        AbilityTrigger::OnEndOfTurn,
    ];
}

impl Ability {
    /// Whether this ability has a handler on `trigger`.
    pub fn responds_to(self, trigger: AbilityTrigger) -> bool {
        use Ability as A;
        match trigger {
            AbilityTrigger::OnSendOut => matches!(
                self,
                A::AirLock
                    | A::Anticipation
                    | A::AuraBreak
                    | A::BeadsOfRuin
                    | A::CloudNine
                    | A::Comatose
                    | A::DarkAura
                    | A::DauntlessShield
                    | A::DeltaStream
                    | A::DesolateLand
                    | A::Download
                    | A::Drizzle
                    | A::Drought
                    | A::ElectricSurge
                    | A::FairyAura
                    | A::FlowerGift
                    | A::Forecast
                    | A::Forewarn
                    | A::Frisk
                    | A::GrassySurge
                    | A::HadronEngine
                    | A::Illusion
                    | A::Intimidate
                    | A::IntrepidSword
                    | A::Mimicry
                    | A::MistySurge
                    | A::MoldBreaker
                    | A::Multitype
                    | A::NeutralizingGas
                    | A::OrichalcumPulse
                    | A::Pressure
                    | A::PrimordialSea
                    | A::PsychicSurge
                    | A::RksSystem
                    | A::SandStream
                    | A::ScreenCleaner
                    | A::SlowStart
                    | A::SnowWarning
                    | A::SupersweetSyrup
                    | A::SwordOfRuin
                    | A::TabletsOfRuin
                    | A::Teravolt
                    | A::Trace
                    | A::Turboblaze
                    | A::Unnerve
                    | A::VesselOfRuin
                    | A::WindRider
                    | A::ZeroToHero
            ),
            AbilityTrigger::OnSwitchOut => {
                matches!(self, A::NaturalCure | A::Regenerator | A::ZeroToHero | A::NeutralizingGas)
            }
            AbilityTrigger::OnDamagingHit => matches!(
                self,
                A::AngerPoint
                    | A::AngerShell
                    | A::Berserk
                    | A::ColorChange
                    | A::CottonDown
                    | A::CursedBody
                    | A::Electromorphosis
                    | A::EmergencyExit
                    | A::GulpMissile
                    | A::Illusion
                    | A::Justified
                    | A::Rattled
                    | A::SandSpit
                    | A::SeedSower
                    | A::Stamina
                    | A::SteamEngine
                    | A::ThermalExchange
                    | A::ToxicDebris
                    | A::WaterCompaction
                    | A::WeakArmor
                    | A::WimpOut
                    | A::WindPower
            ),
            AbilityTrigger::OnContact => matches!(
                self,
                A::EffectSpore
                    | A::FlameBody
                    | A::Gooey
                    | A::IronBarbs
                    | A::LingeringAroma
                    | A::Mummy
                    | A::PerishBody
                    | A::Pickpocket
                    | A::PoisonPoint
                    | A::PoisonTouch
                    | A::RoughSkin
                    | A::Static
                    | A::TanglingHair
                    | A::WanderingSpirit
            ),
            AbilityTrigger::OnKnockOut => matches!(
                self,
                A::Aftermath
                    | A::BattleBond
                    | A::BeastBoost
                    | A::ChillingNeigh
                    | A::GrimNeigh
                    | A::InnardsOut
                    | A::Moxie
                    | A::SoulHeart
            ),
            AbilityTrigger::OnStatChange => matches!(
                self,
                A::BigPecks
                    | A::ClearBody
                    | A::Competitive
                    | A::Contrary
                    | A::Defiant
                    | A::FlowerVeil
                    | A::FullMetalBody
                    | A::HyperCutter
                    | A::KeenEye
                    | A::MindsEye
                    | A::MirrorArmor
                    | A::Opportunist
                    | A::Simple
                    | A::WhiteSmoke
            ),
            AbilityTrigger::OnStatusImmunity => matches!(
                self,
                A::Comatose
                    | A::Immunity
                    | A::Insomnia
                    | A::LeafGuard
                    | A::Limber
                    | A::MagmaArmor
                    | A::PastelVeil
                    | A::PurifyingSalt
                    | A::ShieldsDown
                    | A::SweetVeil
                    | A::ThermalExchange
                    | A::VitalSpirit
                    | A::WaterBubble
                    | A::WaterVeil
                    | A::FlowerVeil
            ),
            AbilityTrigger::OnEndOfTurn => matches!(
                self,
                A::BadDreams
                    | A::DrySkin
                    | A::Harvest
                    | A::HungerSwitch
                    | A::Hydration
                    | A::IceBody
                    | A::Moody
                    | A::Pickup
                    | A::PoisonHeal
                    | A::PowerConstruct
                    | A::RainDish
                    | A::Schooling
                    | A::ShedSkin
                    | A::ShieldsDown
                    | A::SlowStart
                    | A::SolarPower
                    | A::SpeedBoost
                    | A::ZenMode
            ),
        }
    }

    /// Every hook this ability has a handler on.
    pub fn triggers(self) -> Vec<AbilityTrigger> {
        AbilityTrigger::ALL
            .into_iter()
            .filter(|trigger| self.responds_to(*trigger))
            .collect()
    }
}
