pub mod battle_items;
pub mod berries;
pub mod type_items;

use crate::sim::abilities::Ability;
use crate::sim::battle::{Battle, MonRef};
use serde::{Deserialize, Serialize};

/// Canonical item id: lowercase, words joined by `-` ("Sitrus Berry" -> "sitrus-berry").
pub fn normalize_item_id(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '_' | '-' => Some('-'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// The item slot of a combatant, plus the last item it used up.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct HeldItem {
    item: Option<String>,
    consumed: Option<String>,
}

impl HeldItem {
    pub fn new(item: Option<&str>) -> Self {
        Self {
            item: item.map(normalize_item_id).filter(|id| !id.is_empty()),
            consumed: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn is(&self, id: &str) -> bool {
        self.item.as_deref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    /// Removes the item without remembering it (Knock Off, Thief).
    pub fn take(&mut self) -> Option<String> {
        self.item.take()
    }

    pub fn give(&mut self, id: &str) {
        self.item = Some(normalize_item_id(id));
    }

    /// Uses the item up, remembering it for Harvest and Pickup.
    pub fn consume(&mut self) -> Option<String> {
        let item = self.item.take()?;
        self.consumed = Some(item.clone());
        Some(item)
    }

    pub fn last_consumed(&self) -> Option<&str> {
        self.consumed.as_deref()
    }

    /// Puts the last consumed item back in the slot if it is empty.
    pub fn restore(&mut self) -> Option<&str> {
        if self.item.is_some() {
            return None;
        }
        self.item = self.consumed.take();
        self.item.as_deref()
    }
}

impl Battle {
    /// Held item of `target` if it can take effect right now.
    pub fn usable_item(&self, target: MonRef) -> Option<&str> {
        let mon = self.mon(target);
        let id = mon.held_item.id()?;
        if mon.volatile.embargo.active() || self.field.magic_room.active() || self.ability(target) == Ability::Klutz {
            return None;
        }
        Some(id)
    }

    pub fn holds(&self, target: MonRef, item: &str) -> bool {
        self.usable_item(target) == Some(item)
    }

    /// Uses up the item of `target`. Triggers Unburden and records the use for
    /// this turn.
    pub fn consume_item(&mut self, target: MonRef) -> Option<String> {
        let unburden = self.ability(target) == Ability::Unburden;
        let mon = self.mon_mut(target);
        let item = mon.held_item.consume()?;
        mon.volatile.turn.consumed_item = Some(item.clone());
        if unburden {
            mon.volatile.unburden = true;
        }
        Some(item)
    }

    /// Strips the item off `target` (Knock Off, Magician, Pickpocket).
    /// Bound items and Sticky Hold holders keep theirs.
    pub fn remove_item(&mut self, target: MonRef, attacker: Option<MonRef>) -> Option<String> {
        let id = self.mon(target).held_item.id()?;
        if type_items::is_bound_item(id) {
            return None;
        }
        if attacker.is_some_and(|a| a != target) && self.ability_against(target, attacker, None) == Ability::StickyHold {
            return None;
        }
        let unburden = self.ability(target) == Ability::Unburden;
        let mon = self.mon_mut(target);
        let item = mon.held_item.take()?;
        if unburden {
            mon.volatile.unburden = true;
        }
        Some(item)
    }

    /// Trick / Switcheroo. Fails if either side holds a bound item, both slots
    /// are empty, or the target has Sticky Hold.
    pub fn swap_items(&mut self, user: MonRef, target: MonRef) -> bool {
        let user_item = self.mon(user).held_item.id().map(str::to_string);
        let target_item = self.mon(target).held_item.id().map(str::to_string);
        if user_item.is_none() && target_item.is_none() {
            return false;
        }
        if user_item.iter().chain(target_item.iter()).any(|id| type_items::is_bound_item(id)) {
            return false;
        }
        if self.ability_against(target, Some(user), None) == Ability::StickyHold {
            return false;
        }
        for (mon, incoming) in [(user, target_item), (target, user_item)] {
            let mon = self.mon_mut(mon);
            mon.held_item.take();
            if let Some(id) = incoming {
                mon.held_item.give(&id);
                mon.persistent.ever_held_item = true;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_normalized() {
        assert_eq!(normalize_item_id("Sitrus Berry"), "sitrus-berry");
        assert_eq!(normalize_item_id("King's Rock"), "kings-rock");
        assert_eq!(normalize_item_id("never_melt ice"), "never-melt-ice");
    }

    #[test]
    fn consumed_item_can_be_restored_once() {
        let mut slot = HeldItem::new(Some("Sitrus Berry"));
        assert!(slot.is("sitrus-berry"));
        assert_eq!(slot.consume().as_deref(), Some("sitrus-berry"));
        assert!(slot.is_empty());
        assert_eq!(slot.last_consumed(), Some("sitrus-berry"));
        assert_eq!(slot.restore(), Some("sitrus-berry"));
        assert_eq!(slot.restore(), None);
    }

    #[test]
    fn taken_items_are_not_remembered() {
        let mut slot = HeldItem::new(Some("leftovers"));
        assert_eq!(slot.take().as_deref(), Some("leftovers"));
        assert_eq!(slot.last_consumed(), None);
    }

    fn duel(a: crate::model::CombatantSnapshot, b: crate::model::CombatantSnapshot) -> Battle {
        crate::sim::testing::active_battle(a, b)
    }

    #[test]
    fn trick_swaps_held_items() {
        use crate::sim::testing::{snapshot, with_item};
        let mut battle = duel(with_item(snapshot("alakazam"), "choice-scarf"), with_item(snapshot("machamp"), "leftovers"));
        let (me, foe) = (MonRef::new(crate::sim::battle::Side::A, 0), MonRef::new(crate::sim::battle::Side::B, 0));
        assert!(battle.swap_items(me, foe));
        assert!(battle.mon(me).held_item.is("leftovers"));
        assert!(battle.mon(foe).held_item.is("choice-scarf"));
    }

    #[test]
    fn trick_fails_on_bound_items_and_sticky_hold() {
        use crate::sim::testing::{snapshot, with_ability, with_item};
        let (me, foe) = (MonRef::new(crate::sim::battle::Side::A, 0), MonRef::new(crate::sim::battle::Side::B, 0));
        let mut battle = duel(with_item(snapshot("alakazam"), "choice-scarf"), with_item(snapshot("arceus"), "flame-plate"));
        assert!(!battle.swap_items(me, foe));
        let mut battle = duel(
            with_item(snapshot("alakazam"), "choice-scarf"),
            with_item(with_ability(snapshot("muk"), "sticky-hold"), "leftovers"),
        );
        assert!(!battle.swap_items(me, foe));
        assert!(battle.mon(me).held_item.is("choice-scarf"));
    }
}
