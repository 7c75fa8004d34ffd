//! Countdown primitives shared by volatile conditions, side conditions and the field.

use serde::{Deserialize, Serialize};

/// A duration counter. `None` means the effect stays active until it is explicitly
/// cleared with `set(Some(0))`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpiringEffect {
    turns: Option<u32>,
}

impl Default for ExpiringEffect {
    fn default() -> Self {
        Self { turns: Some(0) }
    }
}

impl ExpiringEffect {
    pub fn new(turns: Option<u32>) -> Self {
        Self { turns }
    }

    pub fn active(&self) -> bool {
        match self.turns {
            None => true,
            Some(turns) => turns > 0,
        }
    }

    /// Counts one turn down. Returns true exactly once, on the turn the effect ends.
    pub fn tick(&mut self) -> bool {
        match self.turns.as_mut() {
            Some(turns) if *turns > 0 => {
                *turns -= 1;
                *turns == 0
            }
            _ => false,
        }
    }

    pub fn set(&mut self, turns: Option<u32>) {
        self.turns = turns;
    }

    pub fn turns_left(&self) -> Option<u32> {
        self.turns
    }
}

/// An [`ExpiringEffect`] that carries a payload (a move slot, a combatant) which is
/// dropped on the same tick the countdown runs out.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpiringItem<T> {
    effect: ExpiringEffect,
    item: Option<T>,
}

impl<T> Default for ExpiringItem<T> {
    fn default() -> Self {
        Self {
            effect: ExpiringEffect::default(),
            item: None,
        }
    }
}

impl<T> ExpiringItem<T> {
    pub fn active(&self) -> bool {
        self.item.is_some() && self.effect.active()
    }

    pub fn tick(&mut self) -> bool {
        let expired = self.effect.tick();
        if expired {
            self.item = None;
        }
        expired
    }

    pub fn set(&mut self, item: T, turns: Option<u32>) {
        self.item = Some(item);
        self.effect.set(turns);
    }

    /// Ends the effect immediately, without reporting an expiry.
    pub fn end(&mut self) {
        self.item = None;
        self.effect.set(Some(0));
    }

    pub fn item(&self) -> Option<&T> {
        if self.effect.active() {
            self.item.as_ref()
        } else {
            None
        }
    }

    pub fn turns_left(&self) -> Option<u32> {
        self.effect.turns_left()
    }
}

/// A move the combatant is forced to keep using (Outrage, Uproar, Rollout...).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LockedMove {
    pub slot: usize,
    pub turn: u8,
    pub total_turns: u8,
}

impl LockedMove {
    pub fn new(slot: usize, total_turns: u8) -> Self {
        Self {
            slot,
            turn: 0,
            total_turns,
        }
    }

    pub fn next_turn(&mut self) {
        self.turn = self.turn.saturating_add(1);
    }

    pub fn is_last_turn(&self) -> bool {
        self.turn.saturating_add(1) >= self.total_turns
    }
}
