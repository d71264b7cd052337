use crate::error::RenderError;
use crate::types::Individual;

/// Turns a melody into a playable artifact.
///
/// Implementations must be deterministic: the same melody always yields the same bytes.
pub trait Renderer: Send + Sync {
    fn render(&self, individual: &Individual) -> Result<Vec<u8>, RenderError>;

    /// File extension for written artifacts, without the dot.
    fn extension(&self) -> &'static str;
}
