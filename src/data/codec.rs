//! Versioned JSON encoding of a population.
//!
//! The envelope names its schema and version so that a file written by an
//! incompatible build is rejected instead of being misread.

use crate::data::validator::PopulationValidator;
use crate::error::StorageError;
use crate::types::{Individual, Population, PopulationShape};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA: &str = "tunebreed/population";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PopulationRecord {
    schema: String,
    version: u32,
    generation: u64,
    saved_at: DateTime<Utc>,
    sequence_length: usize,
    scale_size: usize,
    individuals: Vec<Individual>,
}

#[derive(Debug, Deserialize)]
struct RecordHeader {
    schema: String,
    version: u32,
}

pub fn encode(population: &Population, shape: &PopulationShape) -> Result<String, StorageError> {
    let record = PopulationRecord {
        schema: SCHEMA.to_string(),
        version: SCHEMA_VERSION,
        generation: population.generation,
        saved_at: Utc::now(),
        sequence_length: shape.sequence_length,
        scale_size: shape.scale_size,
        individuals: population.individuals().to_vec(),
    };
    Ok(serde_json::to_string(&record)?)
}

/// Parse and validate against `shape`. Nothing is repaired.
pub fn decode(text: &str, shape: &PopulationShape) -> Result<Population, StorageError> {
    let header: RecordHeader = serde_json::from_str(text)?;
    if header.schema != SCHEMA || header.version != SCHEMA_VERSION {
        return Err(StorageError::SchemaMismatch {
            expected: format!("{} v{}", SCHEMA, SCHEMA_VERSION),
            found: format!("{} v{}", header.schema, header.version),
        });
    }

    let record: PopulationRecord = serde_json::from_str(text)?;
    if record.sequence_length != shape.sequence_length || record.scale_size != shape.scale_size {
        return Err(StorageError::SchemaMismatch {
            expected: format!(
                "{} notes over {} scale steps",
                shape.sequence_length, shape.scale_size
            ),
            found: format!(
                "{} notes over {} scale steps",
                record.sequence_length, record.scale_size
            ),
        });
    }

    let population = Population::new(record.generation, record.individuals);
    PopulationValidator::validate_population(&population, shape).map_err(StorageError::Corrupt)?;
    Ok(population)
}
