use super::PopulationStore;
use crate::data::codec;
use crate::data::validator::PopulationValidator;
use crate::engines::generation::seed::seed_population;
use crate::error::Result;
use crate::types::{Population, PopulationShape};

/// Keeps the encoded population in memory. Goes through the same codec as
/// [`super::JsonFileStore`], so schema checks behave identically.
pub struct MemoryStore {
    encoded: Option<String>,
    shape: PopulationShape,
    seed_voices: usize,
}

impl MemoryStore {
    pub fn new(shape: PopulationShape, seed_voices: usize) -> Self {
        Self {
            encoded: None,
            shape,
            seed_voices,
        }
    }

    /// Start from raw persisted text, e.g. to exercise corrupt-data handling.
    pub fn from_encoded(encoded: String, shape: PopulationShape, seed_voices: usize) -> Self {
        Self {
            encoded: Some(encoded),
            shape,
            seed_voices,
        }
    }
}

impl PopulationStore for MemoryStore {
    fn load(&mut self) -> Result<Population> {
        match &self.encoded {
            Some(text) => Ok(codec::decode(text, &self.shape)?),
            None => self.reset(),
        }
    }

    fn save(&mut self, population: &Population) -> Result<()> {
        PopulationValidator::validate_population(population, &self.shape)?;
        self.encoded = Some(codec::encode(population, &self.shape)?);
        Ok(())
    }

    fn reset(&mut self) -> Result<Population> {
        let population = seed_population(&self.shape, self.seed_voices)?;
        self.save(&population)?;
        Ok(population)
    }

    fn shape(&self) -> PopulationShape {
        self.shape
    }
}
