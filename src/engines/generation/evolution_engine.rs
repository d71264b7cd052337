use crate::config::evolution::{EvolutionConfig, PairingPolicy};
use crate::config::traits::ConfigSection;
use crate::config::AppConfig;
use crate::data::validator::PopulationValidator;
use crate::engines::generation::{
    operators::perfect_shuffle,
    selection::{build_pool, make_fillers, select_survivors, Origin, PoolMember},
};
use crate::error::{TunebreedError, ValidationError};
use crate::types::{Fitness, Individual, Population, PopulationShape, Ratings};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy)]
enum Reinsert {
    None,
    Survivors,
    All,
}

impl Reinsert {
    fn keeps(self, origin: Origin) -> bool {
        match self {
            Reinsert::None => false,
            Reinsert::Survivors => origin == Origin::Survivor,
            Reinsert::All => true,
        }
    }
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    shape: PopulationShape,
    rng: StdRng,
}

pub trait ProgressCallback: Send {
    fn on_cycle_start(&mut self, generation: u64);
    fn on_survivors_selected(&mut self, survivors: usize, best_fitness: Fitness);
    fn on_cycle_complete(&mut self, generation: u64, population_size: usize);
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, shape: PopulationShape) -> Result<Self, TunebreedError> {
        config.validate()?;
        if shape.population_size != config.population_size {
            return Err(TunebreedError::Configuration(format!(
                "population shape holds {} melodies but evolution expects {}",
                shape.population_size, config.population_size
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self { config, shape, rng })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, TunebreedError> {
        Self::new(config.evolution.clone(), config.shape())
    }

    pub fn shape(&self) -> PopulationShape {
        self.shape
    }

    /// Compute the next generation from a rated population.
    ///
    /// The input is left untouched; on any error nothing of the partial
    /// result escapes.
    pub fn evolve<C: ProgressCallback>(
        &mut self,
        population: &Population,
        ratings: &Ratings,
        callback: &mut C,
    ) -> Result<Population, TunebreedError> {
        let generation = population.generation + 1;
        callback.on_cycle_start(generation);

        PopulationValidator::validate_population(population, &self.shape)?;
        let rated = population.rate(ratings)?;
        let best_fitness = rated.iter().map(|r| r.fitness).max().unwrap_or(0);

        let survivors = select_survivors(rated, self.config.survivors);
        callback.on_survivors_selected(survivors.len(), best_fitness);

        let fillers = make_fillers(
            self.config.filler_count(),
            self.config.filler_mode,
            self.shape.sequence_length,
            self.shape.scale_size,
            &mut self.rng,
        );

        let individuals = match self.config.pairing {
            PairingPolicy::ReinsertParents => {
                let pool = build_pool(survivors, fillers, &mut self.rng);
                let mut next = Vec::with_capacity(self.shape.population_size);
                self.cross_pool(&pool, Reinsert::All, &mut next)?;
                next
            }
            PairingPolicy::Legacy => {
                let pool = build_pool(survivors, fillers, &mut self.rng);
                let mut next = Vec::with_capacity(self.shape.population_size);
                self.cross_pool(&pool, Reinsert::Survivors, &mut next)?;
                next
            }
            PairingPolicy::DoubleShuffle => {
                let mut next = Vec::with_capacity(self.shape.population_size);
                let first = build_pool(survivors.clone(), fillers.clone(), &mut self.rng);
                self.cross_pool(&first, Reinsert::None, &mut next)?;
                let second = build_pool(survivors, fillers, &mut self.rng);
                self.cross_pool(&second, Reinsert::None, &mut next)?;
                next
            }
        };

        let next = Population::new(generation, individuals);
        PopulationValidator::validate_population(&next, &self.shape)?;

        callback.on_cycle_complete(generation, next.len());
        Ok(next)
    }

    /// Cross consecutive pool members pairwise. Parents picked by `reinsert`
    /// are appended unmodified right after their pair's children.
    fn cross_pool(
        &self,
        pool: &[PoolMember],
        reinsert: Reinsert,
        next: &mut Vec<Individual>,
    ) -> Result<(), ValidationError> {
        for pair in pool.chunks_exact(2) {
            let (first, second) =
                perfect_shuffle(&pair[0].individual, &pair[1].individual, self.config.shift)?;
            next.push(first);
            next.push(second);

            next.extend(
                pair.iter()
                    .filter(|member| reinsert.keeps(member.origin))
                    .map(|member| member.individual.clone()),
            );
        }
        Ok(())
    }
}
