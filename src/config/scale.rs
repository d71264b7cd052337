use super::traits::ConfigSection;
use crate::error::TunebreedError;
use serde::{Deserialize, Serialize};

/// A natural minor scale from C3 up to D5, as MIDI note numbers.
pub const DEFAULT_SCALE: [u8; 16] = [48, 50, 52, 53, 55, 57, 59, 60, 62, 64, 65, 67, 69, 71, 72, 74];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Pitch for each scale index.
    pub notes: Vec<u8>,
    pub sequence_length: usize,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            notes: DEFAULT_SCALE.to_vec(),
            sequence_length: 256,
        }
    }
}

impl ScaleConfig {
    pub fn size(&self) -> usize {
        self.notes.len()
    }

    /// Scale index for a pitch, if the pitch is in the table.
    pub fn index_of(&self, pitch: u8) -> Option<u8> {
        self.notes
            .iter()
            .position(|&p| p == pitch)
            .and_then(|i| u8::try_from(i).ok())
    }
}

impl ConfigSection for ScaleConfig {
    fn section_name() -> &'static str {
        "scale"
    }

    fn validate(&self) -> Result<(), TunebreedError> {
        if self.notes.is_empty() {
            return Err(Self::invalid("notes must not be empty"));
        }
        // Scale indices are stored as u8.
        if self.notes.len() > usize::from(u8::MAX) + 1 {
            return Err(Self::invalid(format!(
                "at most 256 notes are supported, got {}",
                self.notes.len()
            )));
        }
        if let Some(pitch) = self.notes.iter().find(|&&p| p > 127) {
            return Err(Self::invalid(format!("pitch {} is outside the MIDI range", pitch)));
        }
        if self.sequence_length == 0 {
            return Err(Self::invalid("sequence_length must be at least 1"));
        }
        Ok(())
    }
}
