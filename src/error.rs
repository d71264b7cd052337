use std::path::PathBuf;
use thiserror::Error;

/// Structural problems with an individual, a population or caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("individual {individual}: expected {expected} notes, found {actual}")]
    InvalidLength {
        individual: usize,
        expected: usize,
        actual: usize,
    },

    #[error("individual {individual}, position {position}: scale index {value} outside 0..{scale_size}")]
    IndexOutOfRange {
        individual: usize,
        position: usize,
        value: usize,
        scale_size: usize,
    },

    #[error("scale index {value} outside 0..{scale_size}")]
    InvalidNote { value: usize, scale_size: usize },

    #[error("expected {expected} individuals, found {actual}")]
    PopulationSize { expected: usize, actual: usize },

    #[error("individual {individual} has no fitness")]
    MissingFitness { individual: usize },

    #[error("expected {expected} ratings, found {actual}")]
    RatingCount { expected: usize, actual: usize },

    #[error("parents differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("no melody at index {index} (have {available})")]
    UnknownMelody { index: usize, available: usize },

    #[error("cannot breed {requested} melodies, the limit is {limit}")]
    BroodTooLarge { requested: usize, limit: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed population data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("corrupt population data: {0}")]
    Corrupt(#[source] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("note {position} has no pitch for scale index {value}")]
    UnmappedNote { position: usize, value: usize },

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("timed out after {millis} ms")]
    Timeout { millis: u64 },
}

#[derive(Error, Debug)]
pub enum TunebreedError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error for melody {individual}: {source}")]
    Render {
        individual: usize,
        #[source]
        source: RenderError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Population lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TunebreedError>;
