use crate::sim::abilities::events::AbilityTrigger;
use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use crate::sim::damage::heal;
use crate::sim::status::cure_status;

/// Abilities that act as their holder leaves the field alive.
pub fn on_switch_out(battle: &mut Battle, target: MonRef) -> String {
    let ability = battle.ability(target);
    if !ability.responds_to(AbilityTrigger::OnSwitchOut) {
        return String::new();
    }
    match ability {
        Ability::NaturalCure => cure_status(battle, target, "its natural cure"),
        Ability::Regenerator => {
            let amount = battle.mon(target).hp_fraction(3);
            heal(battle, target, amount, "its regenerator")
        }
        Ability::ZeroToHero => {
            let mon = battle.mon_mut(target);
            if mon.form == "palafin" && !mon.persistent.hero_form {
                mon.persistent.hero_form = true;
                log::debug!("{} locked into its hero form", mon.name());
            }
            String::new()
        }
        Ability::NeutralizingGas => "The effects of the neutralizing gas wore off!\n".to_string(),
        _ => String::new(),
    }
}
