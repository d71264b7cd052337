use crate::config::evolution::FillerMode;
use crate::types::{Individual, RatedIndividual, ScaleIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Where a pool member came from. The legacy pairing re-appends survivors only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Survivor,
    Filler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMember {
    pub individual: Individual,
    pub origin: Origin,
}

/// Highest fitness first. Stable, so equal scores keep their input order.
pub fn sort_by_fitness(mut rated: Vec<RatedIndividual>) -> Vec<RatedIndividual> {
    rated.sort_by(|a, b| b.fitness.cmp(&a.fitness));
    rated
}

/// Best `count` individuals, fitness stripped.
pub fn select_survivors(rated: Vec<RatedIndividual>, count: usize) -> Vec<Individual> {
    sort_by_fitness(rated)
        .into_iter()
        .take(count)
        .map(RatedIndividual::into_individual)
        .collect()
}

/// Constant melodies that reseed diversity each generation.
pub fn make_fillers<R: Rng>(
    count: usize,
    mode: FillerMode,
    sequence_length: usize,
    scale_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..count)
        .map(|i| {
            let note = match mode {
                FillerMode::Random => rng.gen_range(0..scale_size),
                FillerMode::Cycle => i % scale_size,
            };
            Individual::constant(note as ScaleIndex, sequence_length)
        })
        .collect()
}

/// Survivors followed by fillers, tagged, in uniformly random order.
pub fn build_pool<R: Rng>(
    survivors: Vec<Individual>,
    fillers: Vec<Individual>,
    rng: &mut R,
) -> Vec<PoolMember> {
    let mut pool: Vec<PoolMember> = survivors
        .into_iter()
        .map(|individual| PoolMember {
            individual,
            origin: Origin::Survivor,
        })
        .chain(fillers.into_iter().map(|individual| PoolMember {
            individual,
            origin: Origin::Filler,
        }))
        .collect();
    pool.shuffle(rng);
    pool
}
