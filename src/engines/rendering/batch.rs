use super::renderer::Renderer;
use crate::data::stores::atomic_write;
use crate::error::{RenderError, StorageError, TunebreedError};
use crate::types::{Individual, Population};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Rendering result for one melody of a population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub index: usize,
    pub result: Result<Vec<u8>, RenderError>,
}

impl RenderOutcome {
    /// The failure, tagged with the melody it belongs to.
    pub fn failure(&self) -> Option<TunebreedError> {
        self.result.as_ref().err().map(|e| TunebreedError::Render {
            individual: self.index,
            source: e.clone(),
        })
    }
}

/// Render every melody in parallel. A failure only affects its own outcome.
pub fn render_population(
    renderer: Arc<dyn Renderer>,
    population: &Population,
    timeout: Option<Duration>,
) -> Vec<RenderOutcome> {
    population
        .individuals()
        .par_iter()
        .enumerate()
        .map(|(index, individual)| {
            let result = match timeout {
                Some(limit) => render_with_timeout(Arc::clone(&renderer), individual.clone(), limit),
                None => renderer.render(individual),
            };
            if let Err(e) = &result {
                log::warn!("Melody {} failed to render: {}", index, e);
            }
            RenderOutcome { index, result }
        })
        .collect()
}

/// Runs the renderer on its own thread and gives up after `limit`.
/// A render that overruns is abandoned, not cancelled.
pub fn render_with_timeout(
    renderer: Arc<dyn Renderer>,
    individual: Individual,
    limit: Duration,
) -> Result<Vec<u8>, RenderError> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(renderer.render(&individual));
    });

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(RenderError::Timeout {
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
        Err(RecvTimeoutError::Disconnected) => {
            Err(RenderError::Encoding("renderer stopped without a result".to_string()))
        }
    }
}

/// Write each successful outcome to `dir/melody{index}.{extension}`.
pub fn write_artifacts(
    dir: &Path,
    outcomes: &[RenderOutcome],
    extension: &str,
) -> Result<Vec<PathBuf>, StorageError> {
    let mut written = Vec::new();
    for outcome in outcomes {
        if let Ok(bytes) = &outcome.result {
            let path = dir.join(format!("melody{}.{}", outcome.index, extension));
            atomic_write(&path, bytes)?;
            written.push(path);
        }
    }
    log::info!("Wrote {} artifacts to {}", written.len(), dir.display());
    Ok(written)
}
