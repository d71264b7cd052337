use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Position in the scale table. Never a raw pitch.
pub type ScaleIndex = u8;

/// Externally supplied score; higher survives.
pub type Fitness = u32;

/// One melody: an ordered run of scale indices.
///
/// Individuals are values. Every operator in the crate builds a new one
/// instead of editing notes in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Individual(Vec<ScaleIndex>);

impl Individual {
    pub fn new(notes: Vec<ScaleIndex>) -> Self {
        Self(notes)
    }

    /// A melody that repeats one note `length` times.
    pub fn constant(note: ScaleIndex, length: usize) -> Self {
        Self(vec![note; length])
    }

    pub fn notes(&self) -> &[ScaleIndex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_notes(self) -> Vec<ScaleIndex> {
        self.0
    }

    pub fn rated(self, fitness: Fitness) -> RatedIndividual {
        RatedIndividual {
            individual: self,
            fitness,
        }
    }
}

impl From<Vec<ScaleIndex>> for Individual {
    fn from(notes: Vec<ScaleIndex>) -> Self {
        Self(notes)
    }
}

/// An individual annotated with its score for one selection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedIndividual {
    pub individual: Individual,
    pub fitness: Fitness,
}

impl RatedIndividual {
    /// Drops the score. Survivors pass through here before re-entering a population.
    pub fn into_individual(self) -> Individual {
        self.individual
    }
}

/// Per-individual scores as they arrive from the user; `None` is unrated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ratings(Vec<Option<Fitness>>);

impl Ratings {
    pub fn unrated(count: usize) -> Self {
        Self(vec![None; count])
    }

    pub fn from_scores(scores: Vec<Fitness>) -> Self {
        Self(scores.into_iter().map(Some).collect())
    }

    /// Checkbox-style rating: selected individuals score 1, the rest 0.
    pub fn from_selection(selected: &[usize], count: usize) -> Result<Self, ValidationError> {
        let mut scores = vec![Some(0); count];
        for &index in selected {
            let slot = scores.get_mut(index).ok_or(ValidationError::UnknownMelody {
                index,
                available: count,
            })?;
            *slot = Some(1);
        }
        Ok(Self(scores))
    }

    pub fn set(&mut self, index: usize, fitness: Fitness) -> Result<(), ValidationError> {
        let available = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or(ValidationError::UnknownMelody { index, available })?;
        *slot = Some(fitness);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<Fitness> {
        self.0.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The dimensions every population must match: `P` individuals of `L` notes over `S` scale steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationShape {
    pub population_size: usize,
    pub sequence_length: usize,
    pub scale_size: usize,
}

/// One generation of melodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    pub generation: u64,
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new(generation: u64, individuals: Vec<Individual>) -> Self {
        Self {
            generation,
            individuals,
        }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// Attach ratings for a selection pass. Every individual must be rated.
    pub fn rate(&self, ratings: &Ratings) -> Result<Vec<RatedIndividual>, ValidationError> {
        if ratings.len() != self.individuals.len() {
            return Err(ValidationError::RatingCount {
                expected: self.individuals.len(),
                actual: ratings.len(),
            });
        }

        self.individuals
            .iter()
            .enumerate()
            .map(|(i, individual)| {
                ratings
                    .get(i)
                    .map(|fitness| individual.clone().rated(fitness))
                    .ok_or(ValidationError::MissingFitness { individual: i })
            })
            .collect()
    }

    /// Copy of this population with one individual swapped out. The generation is unchanged.
    pub fn with_replaced(
        &self,
        index: usize,
        individual: Individual,
    ) -> Result<Population, ValidationError> {
        if index >= self.individuals.len() {
            return Err(ValidationError::UnknownMelody {
                index,
                available: self.individuals.len(),
            });
        }
        let mut individuals = self.individuals.clone();
        individuals[index] = individual;
        Ok(Population::new(self.generation, individuals))
    }
}
