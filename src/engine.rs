use anyhow::{Context, Result};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{
    rng::RngManager,
    world::{World, WorldStats},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    colonies: Vec<Box<dyn Colony>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            colonies: Vec::new(),
        }
    }

    pub fn with_colony(mut self, colony: impl Colony + 'static) -> Self {
        self.colonies.push(Box::new(colony));
        self
    }

    pub fn push_colony(&mut self, colony: impl Colony + 'static) {
        self.colonies.push(Box::new(colony));
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            colonies: self.colonies,
            settings: self.settings,
        }
    }
}

/// Fixed-step driver: every tick each colony acts, then the world steps.
pub struct Engine {
    rng: RngManager,
    colonies: Vec<Box<dyn Colony>>,
    settings: EngineSettings,
}

impl Engine {
    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Like [`Engine::run`], calling `hook` with the stats after every step.
    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&WorldStats),
    {
        for _ in 0..ticks {
            let current_tick = world.tick();
            for colony in &mut self.colonies {
                let rng_stream = self.rng.stream(colony.name());
                let ctx = TickContext {
                    tick: current_tick,
                    scenario_name: &self.settings.scenario_name,
                };
                colony
                    .run(&ctx, world, rng_stream)
                    .with_context(|| {
                        format!("colony '{}' failed at tick {}", colony.name(), current_tick)
                    })?;
            }
            world.step();
            hook(&world.stats());
        }
        info!(
            scenario = %self.settings.scenario_name,
            tick = world.tick(),
            remaining_food = world.remaining_food(),
            replacements = world.replacements(),
            "Engine run finished"
        );
        Ok(())
    }
}

pub struct TickContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

/// The agent layer. Each colony gets its own deterministic random stream.
pub trait Colony {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &TickContext, world: &mut World, rng: &mut ChaCha8Rng) -> Result<()>;
}
