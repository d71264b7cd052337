pub mod seed;
pub mod operators;
pub mod selection;
pub mod evolution_engine;
pub mod progress;

pub use evolution_engine::{EvolutionEngine, ProgressCallback};
pub use operators::{perfect_shuffle, replace_note};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage, SilentProgressCallback};
pub use seed::seed_population;
pub use selection::{sort_by_fitness, select_survivors, Origin, PoolMember};
