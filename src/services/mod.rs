pub mod session;
pub mod workshop;

pub use session::EvolutionSession;
pub use workshop::Workshop;
