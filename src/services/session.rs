use crate::data::stores::PopulationStore;
use crate::engines::generation::{
    operators::replace_note, EvolutionEngine, LogProgressCallback, ProgressCallback,
};
use crate::error::{Result, TunebreedError, ValidationError};
use crate::types::{Population, Ratings};
use std::sync::{Arc, Mutex, MutexGuard};

struct SessionState<S> {
    store: S,
    engine: EvolutionEngine,
}

/// Single-writer handle on the current population.
///
/// Every operation holds the lock from load to save, so two evolution
/// cycles can never interleave. Clones share the same lock.
pub struct EvolutionSession<S: PopulationStore> {
    state: Arc<Mutex<SessionState<S>>>,
}

impl<S: PopulationStore> Clone for EvolutionSession<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: PopulationStore> EvolutionSession<S> {
    pub fn new(store: S, engine: EvolutionEngine) -> Result<Self> {
        if store.shape() != engine.shape() {
            return Err(TunebreedError::Configuration(format!(
                "store shape {:?} does not match engine shape {:?}",
                store.shape(),
                engine.shape()
            )));
        }
        Ok(Self {
            state: Arc::new(Mutex::new(SessionState { store, engine })),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState<S>>> {
        self.state.lock().map_err(|_| TunebreedError::LockPoisoned)
    }

    /// The current generation, seeding storage on first use.
    pub fn current(&self) -> Result<Population> {
        self.lock()?.store.load()
    }

    pub fn evolve(&self, ratings: &Ratings) -> Result<Population> {
        self.evolve_with(ratings, &mut LogProgressCallback)
    }

    /// One full cycle: load, evolve, save. Nothing is saved if any step fails.
    pub fn evolve_with<C: ProgressCallback>(
        &self,
        ratings: &Ratings,
        callback: &mut C,
    ) -> Result<Population> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let population = state.store.load()?;
        let next = state.engine.evolve(&population, ratings, callback)?;
        state.store.save(&next)?;
        Ok(next)
    }

    /// Replace every `from` with `to` in one melody and persist the result.
    pub fn rewrite(&self, individual: usize, from: usize, to: usize) -> Result<Population> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let population = state.store.load()?;
        let scale_size = state.store.shape().scale_size;
        let melody = population
            .get(individual)
            .ok_or(ValidationError::UnknownMelody {
                index: individual,
                available: population.len(),
            })?;
        let rewritten = replace_note(melody, from, to, scale_size)?;
        let next = population.with_replaced(individual, rewritten)?;
        state.store.save(&next)?;

        log::info!("Rewrote melody {}: note {} -> {}", individual, from, to);
        Ok(next)
    }

    pub fn reset(&self) -> Result<Population> {
        let population = self.lock()?.store.reset()?;
        log::info!("Population reset to seed");
        Ok(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::evolution::{EvolutionConfig, FillerMode, PairingPolicy};
    use crate::data::stores::MemoryStore;
    use crate::engines::generation::SilentProgressCallback;
    use crate::types::PopulationShape;
    use std::thread;

    fn session(seed: u64) -> EvolutionSession<MemoryStore> {
        let config = EvolutionConfig {
            population_size: 16,
            survivors: 4,
            shift: 5,
            seed_voices: 8,
            filler_mode: FillerMode::Random,
            pairing: PairingPolicy::ReinsertParents,
            seed: Some(seed),
            max_brood: None,
        };
        let shape = PopulationShape {
            population_size: 16,
            sequence_length: 32,
            scale_size: 8,
        };
        let engine = EvolutionEngine::new(config, shape).unwrap();
        EvolutionSession::new(MemoryStore::new(shape, 8), engine).unwrap()
    }

    #[test]
    fn test_evolve_persists_next_generation() {
        let session = session(1);
        let ratings = Ratings::from_selection(&[0, 5, 9, 12], 16).unwrap();
        let next = session
            .evolve_with(&ratings, &mut SilentProgressCallback)
            .unwrap();
        assert_eq!(next.generation, 1);
        assert_eq!(session.current().unwrap(), next);
    }

    #[test]
    fn test_failed_cycle_keeps_previous_generation() {
        let session = session(2);
        let before = session.current().unwrap();

        let err = session.evolve(&Ratings::unrated(16)).unwrap_err();
        assert!(matches!(
            err,
            TunebreedError::Validation(ValidationError::MissingFitness { individual: 0 })
        ));
        assert_eq!(session.current().unwrap(), before);
    }

    #[test]
    fn test_rewrite_single_melody() {
        let session = session(3);
        let before = session.current().unwrap();
        let after = session.rewrite(2, 2, 7).unwrap();

        assert_eq!(after.generation, before.generation);
        assert!(after.get(2).unwrap().notes().iter().all(|&n| n == 7));
        for i in (0..16).filter(|&i| i != 2) {
            assert_eq!(after.get(i), before.get(i));
        }
        assert_eq!(session.current().unwrap(), after);
    }

    #[test]
    fn test_rewrite_rejects_bad_input() {
        let session = session(4);
        assert!(matches!(
            session.rewrite(16, 0, 1),
            Err(TunebreedError::Validation(ValidationError::UnknownMelody { index: 16, .. }))
        ));
        assert!(matches!(
            session.rewrite(0, 0, 8),
            Err(TunebreedError::Validation(ValidationError::InvalidNote { value: 8, .. }))
        ));
    }

    #[test]
    fn test_reset_returns_to_seed() {
        let session = session(5);
        let seed = session.current().unwrap();
        session.evolve(&Ratings::from_scores(vec![1; 16])).unwrap();
        assert_ne!(session.current().unwrap().generation, 0);
        assert_eq!(session.reset().unwrap(), seed);
    }

    #[test]
    fn test_concurrent_cycles_serialize() {
        let session = session(6);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let session = session.clone();
                thread::spawn(move || {
                    for round in 0..5 {
                        let ratings =
                            Ratings::from_selection(&[t, (t + round) % 16, 15 - t], 16).unwrap();
                        session
                            .evolve_with(&ratings, &mut SilentProgressCallback)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let population = session.current().unwrap();
        assert_eq!(population.generation, 20);
        assert_eq!(population.len(), 16);
    }
}
