//! Saved and fresh melody lists for hands-on breeding.
//!
//! Instead of rating a fixed-size population, the user keeps melodies they
//! like from the fresh list, then breeds any subset of the saved ones into a
//! new fresh list of the size they ask for.

use crate::config::AppConfig;
use crate::data::stores::atomic_write;
use crate::data::validator::PopulationValidator;
use crate::engines::generation::{operators::perfect_shuffle, seed::single_note_melodies};
use crate::error::{Result, StorageError, ValidationError};
use crate::types::{Individual, PopulationShape};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const WORKSHOP_SCHEMA: &str = "tunebreed/workshop";
pub const WORKSHOP_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    saved: Vec<Individual>,
    fresh: Vec<Individual>,
    sequence_length: usize,
    scale_size: usize,
    shift: usize,
    #[serde(skip)]
    brood_limit: usize,
}

#[derive(Serialize, Deserialize)]
struct WorkshopRecord {
    schema: String,
    version: u32,
    workshop: Workshop,
}

impl Workshop {
    pub fn new(sequence_length: usize, scale_size: usize, voices: usize, shift: usize) -> Self {
        Self {
            saved: Vec::new(),
            fresh: single_note_melodies(voices, sequence_length, scale_size),
            sequence_length,
            scale_size,
            shift,
            brood_limit: voices,
        }
    }

    /// Cap how many melodies a single breed may produce.
    pub fn with_brood_limit(mut self, limit: usize) -> Self {
        self.brood_limit = limit;
        self
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.scale.sequence_length,
            config.scale.size(),
            config.evolution.seed_voices,
            config.evolution.shift,
        )
        .with_brood_limit(config.evolution.brood_limit())
    }

    pub fn saved(&self) -> &[Individual] {
        &self.saved
    }

    pub fn fresh(&self) -> &[Individual] {
        &self.fresh
    }

    /// Copy fresh melodies into the saved list, in the order given.
    pub fn keep(&mut self, indices: &[usize]) -> std::result::Result<usize, ValidationError> {
        let picked = pick(&self.fresh, indices)?;
        let count = picked.len();
        self.saved.extend(picked);
        Ok(count)
    }

    /// Remove saved melodies. Repeated indices count once.
    pub fn discard(&mut self, indices: &[usize]) -> std::result::Result<usize, ValidationError> {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        if let Some(&index) = unique.iter().find(|&&i| i >= self.saved.len()) {
            return Err(ValidationError::UnknownMelody {
                index,
                available: self.saved.len(),
            });
        }
        for &index in unique.iter().rev() {
            self.saved.remove(index);
        }
        Ok(unique.len())
    }

    /// Breed the selected saved melodies into a new fresh list.
    ///
    /// The selection is padded with single-note melodies up to `requested`,
    /// shuffled, and crossed pairwise. Returns `false` and changes nothing
    /// when fewer than two melodies are selected.
    pub fn breed<R: Rng>(
        &mut self,
        indices: &[usize],
        requested: usize,
        rng: &mut R,
    ) -> std::result::Result<bool, ValidationError> {
        let total = requested.max(indices.len());
        if total > self.brood_limit {
            return Err(ValidationError::BroodTooLarge {
                requested: total,
                limit: self.brood_limit,
            });
        }

        let selected = pick(&self.saved, indices)?;
        if selected.len() < 2 {
            return Ok(false);
        }
        let mut pool = selected;
        pool.extend(single_note_melodies(
            total - pool.len(),
            self.sequence_length,
            self.scale_size,
        ));
        pool.shuffle(rng);

        let mut children = Vec::with_capacity(total);
        for pair in pool.chunks_exact(2) {
            let (first, second) = perfect_shuffle(&pair[0], &pair[1], self.shift)?;
            children.push(first);
            children.push(second);
            if children.len() >= total {
                break;
            }
        }
        children.truncate(total);

        log::info!(
            "Bred {} new melodies from {} saved",
            children.len(),
            indices.len()
        );
        self.fresh = children;
        Ok(true)
    }

    /// Read a workshop from `path`, or start a new one when the file is missing.
    pub fn load(path: &Path, config: &AppConfig) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::from_app_config(config)),
            Err(source) => {
                return Err(StorageError::Read {
                    path: path.to_path_buf(),
                    source,
                }
                .into())
            }
        };

        let record: WorkshopRecord = serde_json::from_str(&text).map_err(StorageError::from)?;
        if record.schema != WORKSHOP_SCHEMA || record.version != WORKSHOP_VERSION {
            return Err(StorageError::SchemaMismatch {
                expected: format!("{} v{}", WORKSHOP_SCHEMA, WORKSHOP_VERSION),
                found: format!("{} v{}", record.schema, record.version),
            }
            .into());
        }

        let mut workshop = record.workshop;
        if workshop.sequence_length != config.scale.sequence_length
            || workshop.scale_size != config.scale.size()
        {
            return Err(StorageError::SchemaMismatch {
                expected: format!(
                    "{} notes over {} scale steps",
                    config.scale.sequence_length,
                    config.scale.size()
                ),
                found: format!(
                    "{} notes over {} scale steps",
                    workshop.sequence_length, workshop.scale_size
                ),
            }
            .into());
        }
        workshop.validate().map_err(StorageError::Corrupt)?;
        workshop.shift = config.evolution.shift;
        workshop.brood_limit = config.evolution.brood_limit();
        Ok(workshop)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let record = WorkshopRecord {
            schema: WORKSHOP_SCHEMA.to_string(),
            version: WORKSHOP_VERSION,
            workshop: self.clone(),
        };
        let text = serde_json::to_string(&record).map_err(StorageError::from)?;
        atomic_write(path, text.as_bytes())?;
        Ok(())
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        let shape = PopulationShape {
            population_size: self.saved.len() + self.fresh.len(),
            sequence_length: self.sequence_length,
            scale_size: self.scale_size,
        };
        for (i, melody) in self.saved.iter().chain(&self.fresh).enumerate() {
            PopulationValidator::validate_individual(i, melody, &shape)?;
        }
        Ok(())
    }
}

fn pick(
    melodies: &[Individual],
    indices: &[usize],
) -> std::result::Result<Vec<Individual>, ValidationError> {
    indices
        .iter()
        .map(|&index| {
            melodies
                .get(index)
                .cloned()
                .ok_or(ValidationError::UnknownMelody {
                    index,
                    available: melodies.len(),
                })
        })
        .collect()
}
