use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

/// The single source of randomness for a battle.
///
/// Every roll in the engine goes through here so a battle can be replayed from
/// its seed. Scripted values are consumed before the generator is touched,
/// which lets tests pin individual decisions.
#[derive(Clone, Debug)]
pub struct BattleRng {
    initial_seed: u64,
    rng: SmallRng,
    scripted: VecDeque<u64>,
}

impl BattleRng {
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            initial_seed: seed,
            rng: SmallRng::seed_from_u64(seed),
            scripted: VecDeque::new(),
        }
    }

    /// Seed used to build this generator; feeding it back replays the battle.
    pub fn initial_seed(&self) -> u64 {
        self.initial_seed
    }

    /// Queue raw values to be returned by the next draws, in order.
    pub fn script(&mut self, values: impl IntoIterator<Item = u64>) {
        self.scripted.extend(values);
    }

    fn next(&mut self) -> u64 {
        if let Some(value) = self.scripted.pop_front() {
            return value;
        }
        self.rng.next_u64()
    }

    /// True with probability `numerator / denominator`.
    pub fn chance(&mut self, numerator: u64, denominator: u64) -> bool {
        self.next() % denominator < numerator
    }

    /// Uniform integer in `[min, max)`.
    pub fn range(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(max > min, "empty range {min}..{max}");
        self.next() % (max - min) + min
    }

    /// Uniformly picks one element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range(0, items.len() as u64) as usize;
        items.get(idx)
    }
}

impl Default for BattleRng {
    fn default() -> Self {
        Self::new()
    }
}
