pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod services;
pub mod types;

pub use error::{Result, TunebreedError};
pub use types::{Fitness, Individual, Population, PopulationShape, RatedIndividual, Ratings, ScaleIndex};
