pub mod file;
pub mod memory;

pub use file::{atomic_write, JsonFileStore};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{Population, PopulationShape};

/// Durable holder of the current generation.
pub trait PopulationStore: Send {
    /// The persisted population, seeding and persisting one first if none exists.
    fn load(&mut self) -> Result<Population>;

    /// Replace the persisted population. Either the whole population is written or nothing is.
    fn save(&mut self, population: &Population) -> Result<()>;

    /// Discard any persisted state and start over from the seed population.
    fn reset(&mut self) -> Result<Population>;

    fn shape(&self) -> PopulationShape;
}
