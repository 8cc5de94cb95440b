//! Lock-guarded world handle for multi-threaded agent layers

use std::sync::{Arc, PoisonError, RwLock};

use crate::world::World;

/// Many concurrent readers, one writer. `step()` and every deposit or
/// pick-up go through [`SharedWorld::write`], so no reader ever observes a
/// half-dispersed grid.
#[derive(Clone, Debug)]
pub struct SharedWorld {
    inner: Arc<RwLock<World>>,
}

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    pub fn read<T>(&self, f: impl FnOnce(&World) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<T>(&self, f: impl FnOnce(&mut World) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn step(&self) {
        self.write(World::step);
    }

    /// Recover the world once every other handle has been dropped.
    pub fn try_into_inner(self) -> Result<World, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::geometry::Position;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::thread;

    #[test]
    fn test_concurrent_deposits_and_steps() {
        let world = World::new(
            WorldConfig::with_size(16, 16, 1),
            ChaCha8Rng::seed_from_u64(1),
        )
        .unwrap();
        let shared = SharedWorld::new(world);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        shared
                            .write(|w| w.drop_foraging_pheromone(Position::new(i as f32, 0.0), 0.1))
                            .unwrap();
                        let value = shared
                            .read(|w| w.foraging_strength(Position::new(i as f32, 0.0)))
                            .unwrap();
                        assert!((0.0..=1.0).contains(&value));
                    }
                })
            })
            .collect();
        for _ in 0..20 {
            shared.step();
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let world = shared.try_into_inner().unwrap();
        assert_eq!(world.tick(), 20);
        assert!(world
            .pheromone(crate::pheromone::PheromoneKind::Foraging)
            .cells()
            .iter()
            .all(|&v| (0.0..=1.0).contains(&v)));
    }
}
