pub mod batch;
pub mod midi;
pub mod renderer;

pub use batch::{render_population, render_with_timeout, write_artifacts, RenderOutcome};
pub use midi::MidiRenderer;
pub use renderer::Renderer;
