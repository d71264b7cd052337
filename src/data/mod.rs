pub mod codec;
pub mod stores;
pub mod validator;

pub use stores::{atomic_write, JsonFileStore, MemoryStore, PopulationStore};
pub use validator::PopulationValidator;
