//! State that lives for one stint on the field, and the small set that outlives it.

use crate::sim::battle::MonRef;
use crate::sim::effects::{ExpiringEffect, ExpiringItem, LockedMove};
use crate::sim::moves::DamageClass;

/// Two-turn moves that take the user out of reach for a turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SemiInvulnerable {
    Dig,
    Dive,
    Fly,
    Bounce,
    ShadowForce,
    PhantomForce,
    SkyDrop,
}

/// The protecting move in effect for this turn. Only one can be up at a time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Protection {
    Protect,
    KingsShield,
    SpikyShield,
    BanefulBunker,
    SilkTrap,
    BurningBulwark,
    Obstruct,
    MatBlock,
    QuickGuard,
    WideGuard,
    CraftyShield,
}

/// Flags that only hold for the current turn. Cleared first thing in upkeep.
#[derive(Clone, Debug, Default)]
pub struct TurnFlags {
    pub flinched: bool,
    pub protection: Option<Protection>,
    pub endure: bool,
    pub swapped_in: bool,
    pub has_moved: bool,
    pub roost: bool,
    pub stat_increased: bool,
    pub stat_decreased: bool,
    pub dropped_below_half: bool,
    pub dropped_below_quarter: bool,
    pub magic_coat: bool,
    pub snatch: bool,
    pub powder: bool,
    pub electrify: bool,
    /// Sheer Force dropped this move's secondary effects.
    pub sheer_force_boosted: bool,
    pub focus_punch: bool,
    pub beak_blast: bool,
    pub consumed_item: Option<String>,
    pub damage_this_turn: u32,
}

/// Everything that is thrown away when the combatant leaves the field.
#[derive(Clone, Debug, Default)]
pub struct PerStintVolatile {
    pub turn: TurnFlags,

    pub confusion: ExpiringEffect,
    pub infatuated: Option<MonRef>,
    pub substitute: u32,
    pub semi_invulnerable: Option<SemiInvulnerable>,
    pub locked_move: Option<LockedMove>,
    pub recharging: bool,

    // trapping and drains
    pub trapped: bool,
    pub bind: ExpiringItem<MonRef>,
    pub bind_binding_band: bool,
    pub octolock: Option<MonRef>,
    pub leech_seeded: bool,
    pub cursed: bool,
    pub ingrain: bool,
    pub aqua_ring: bool,
    pub salt_cure: bool,
    pub syrup_bomb: ExpiringItem<MonRef>,

    // move restrictions
    pub taunt: ExpiringEffect,
    pub encore: ExpiringItem<usize>,
    pub disable: ExpiringItem<usize>,
    pub torment: bool,
    pub imprison: bool,
    pub heal_block: ExpiringEffect,
    pub embargo: ExpiringEffect,
    pub throat_chop: ExpiringEffect,
    pub choice_move: Option<usize>,

    // countdowns
    pub yawn: ExpiringEffect,
    pub perish_song: ExpiringEffect,
    pub magnet_rise: ExpiringEffect,
    pub telekinesis: ExpiringEffect,
    pub laser_focus: ExpiringEffect,
    pub uproar: ExpiringEffect,
    pub slow_start: ExpiringEffect,
    pub charge: ExpiringEffect,
    pub lock_on: ExpiringItem<MonRef>,
    pub destiny_bond_cooldown: ExpiringEffect,
    pub glaive_rush: ExpiringEffect,

    pub destiny_bond: bool,
    pub grudge: bool,
    pub rage: bool,
    pub bide: Option<u32>,
    pub minimized: bool,
    pub defense_curl: bool,
    pub focus_energy: bool,
    pub flash_fire: bool,
    pub unburden: bool,
    pub identified: bool,
    pub miracle_eye: bool,
    pub smack_down: bool,
    pub tar_shot: bool,
    pub no_retreat: bool,
    pub power_trick: bool,
    pub stockpile: u8,
    pub autotomize: u8,
    pub ability_suppressed: bool,
    pub illusion_name: Option<String>,
    pub last_move: Option<usize>,
    pub last_move_damage: Option<(u32, DamageClass)>,
    /// Forced to leave the field once the current action resolves.
    pub swap_out: bool,
    pub active_turns: u32,
}

/// The few fields that survive switching out.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PerBattlePersistent {
    pub times_hit: u32,
    pub ever_held_item: bool,
    pub supersweet_syrup: bool,
    pub ever_sent_out: bool,
    /// Zero to Hero: once set, the combatant comes back in its hero form.
    pub hero_form: bool,
}
