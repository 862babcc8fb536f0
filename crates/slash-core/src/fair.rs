//! Fairness-randomized selection
//!
//! A [`FairPool`] hands out every item exactly once per cycle before any
//! item repeats; the enumeration order is reshuffled at the start of each
//! cycle. A [`FairRegistry`] owns one pool per category for the lifetime of
//! the process and serializes draws per category.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::error::{Error, Result};

/// Rotating-shuffle pool of items.
#[derive(Debug, Clone)]
pub struct FairPool<T> {
    items: Vec<T>,
    draws: u64,
}

impl<T: Clone> FairPool<T> {
    /// Create a pool. Fails when `items` is empty.
    pub fn new(category: &str, items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyPool(category.to_string()));
        }
        Ok(Self { items, draws: 0 })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of draws served so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Draw the next item, reshuffling with `rng` at every cycle boundary.
    pub fn draw_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> T {
        let len = self.items.len();
        if self.draws % len as u64 == 0 {
            self.items.shuffle(rng);
        }
        self.draws += 1;
        self.items.rotate_right(1);
        self.items[len - 1].clone()
    }

    /// Draw the next item using the thread-local RNG.
    pub fn draw(&mut self) -> T {
        self.draw_with(&mut rand::thread_rng())
    }
}

/// Process-wide set of pools keyed by category name.
///
/// Categories are fixed at construction, so the map is never mutated after
/// [`FairRegistryBuilder::build`]; each pool sits behind its own lock.
#[derive(Debug)]
pub struct FairRegistry<T> {
    pools: HashMap<String, Mutex<FairPool<T>>>,
}

impl<T: Clone> FairRegistry<T> {
    pub fn builder() -> FairRegistryBuilder<T> {
        FairRegistryBuilder { pools: HashMap::new() }
    }

    /// Draw from the pool registered under `category`.
    pub fn draw(&self, category: &str) -> Result<T> {
        let pool = self
            .pools
            .get(category)
            .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;
        let mut pool = pool.lock().unwrap_or_else(PoisonError::into_inner);
        let item = pool.draw();
        trace!(category, draws = pool.draw_count(), "Drew from fair pool");
        Ok(item)
    }

    /// Registered category names.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }
}

/// Builder collecting the pools of a [`FairRegistry`].
pub struct FairRegistryBuilder<T> {
    pools: HashMap<String, Mutex<FairPool<T>>>,
}

impl<T: Clone> FairRegistryBuilder<T> {
    /// Register a pool; fails when `items` is empty.
    pub fn pool(mut self, category: impl Into<String>, items: Vec<T>) -> Result<Self> {
        let category = category.into();
        let pool = FairPool::new(&category, items)?;
        self.pools.insert(category, Mutex::new(pool));
        Ok(self)
    }

    pub fn build(self) -> FairRegistry<T> {
        FairRegistry { pools: self.pools }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn empty_pool_is_rejected() {
        let result = FairPool::<u32>::new("stickers", vec![]);
        assert!(matches!(result, Err(Error::EmptyPool(name)) if name == "stickers"));
    }

    #[test]
    fn every_cycle_covers_all_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = FairPool::new("letters", vec!['a', 'b', 'c', 'd', 'e']).unwrap();

        for _ in 0..4 {
            let cycle: HashSet<char> = (0..5).map(|_| pool.draw_with(&mut rng)).collect();
            assert_eq!(cycle.len(), 5);
        }
        assert_eq!(pool.draw_count(), 20);
    }

    #[test]
    fn consecutive_window_across_cycle_boundary_has_no_early_repeat() {
        // A window straddling a reshuffle may repeat, but never within a cycle.
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = FairPool::new("n", (0..8).collect::<Vec<u32>>()).unwrap();

        let drawn: Vec<u32> = (0..24).map(|_| pool.draw_with(&mut rng)).collect();
        for cycle in drawn.chunks(8) {
            let unique: HashSet<_> = cycle.iter().collect();
            assert_eq!(unique.len(), 8, "cycle repeated an item: {cycle:?}");
        }
    }

    #[test]
    fn single_item_pool_always_returns_it() {
        let mut pool = FairPool::new("one", vec!["only"]).unwrap();
        for _ in 0..3 {
            assert_eq!(pool.draw(), "only");
        }
    }

    #[test]
    fn registry_rejects_unknown_category() {
        let registry = FairRegistry::builder()
            .pool("reject", vec!["no".to_string()])
            .unwrap()
            .build();

        assert!(matches!(registry.draw("stickers"), Err(Error::UnknownCategory(c)) if c == "stickers"));
    }

    #[test]
    fn registry_categories_draw_independently() {
        let registry = FairRegistry::builder()
            .pool("a", vec![1, 2, 3])
            .unwrap()
            .pool("b", vec![10, 20])
            .unwrap()
            .build();

        let a: HashSet<i32> = (0..3).map(|_| registry.draw("a").unwrap()).collect();
        let b1: HashSet<i32> = (0..2).map(|_| registry.draw("b").unwrap()).collect();
        let b2: HashSet<i32> = (0..2).map(|_| registry.draw("b").unwrap()).collect();

        assert_eq!(a, HashSet::from([1, 2, 3]));
        assert_eq!(b1, HashSet::from([10, 20]));
        assert_eq!(b2, HashSet::from([10, 20]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_draws_keep_cycle_coverage() {
        let items: Vec<u32> = (0..16).collect();
        let registry = Arc::new(FairRegistry::builder().pool("n", items).unwrap().build());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move { registry.draw("n").unwrap() }));
        }

        let mut drawn = HashSet::new();
        for handle in handles {
            drawn.insert(handle.await.unwrap());
        }
        assert_eq!(drawn.len(), 16);
    }
}
