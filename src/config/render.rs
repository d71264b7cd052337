use super::traits::ConfigSection;
use crate::error::TunebreedError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// General MIDI program, 0-based. 24 is the nylon-string guitar.
    pub program: u8,
    pub ticks_per_quarter: u16,
    pub ticks_per_note: u32,
    pub velocity: u8,
    pub title: String,
    pub output_dir: PathBuf,
    pub timeout_ms: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            program: 24,
            ticks_per_quarter: 48,
            ticks_per_note: 12,
            velocity: 100,
            title: "Genetic algorithm".to_string(),
            output_dir: PathBuf::from("midi"),
            timeout_ms: Some(5_000),
        }
    }
}

impl RenderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl ConfigSection for RenderConfig {
    fn section_name() -> &'static str {
        "render"
    }

    fn validate(&self) -> Result<(), TunebreedError> {
        if self.program > 127 {
            return Err(Self::invalid("program must be between 0 and 127"));
        }
        if self.velocity == 0 || self.velocity > 127 {
            return Err(Self::invalid("velocity must be between 1 and 127"));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7fff {
            return Err(Self::invalid("ticks_per_quarter must be between 1 and 32767"));
        }
        if self.ticks_per_note == 0 || self.ticks_per_note > 0x0fff_ffff {
            return Err(Self::invalid("ticks_per_note must fit a MIDI delta time"));
        }
        if self.timeout_ms == Some(0) {
            return Err(Self::invalid("timeout_ms must be positive when set"));
        }
        Ok(())
    }
}
