pub mod traits;
pub mod evolution;
pub mod scale;
pub mod storage;
pub mod render;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, FillerMode, PairingPolicy};
pub use scale::ScaleConfig;
pub use storage::StorageConfig;
pub use render::RenderConfig;
