use super::traits::ConfigSection;
use crate::error::TunebreedError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub population_path: PathBuf,
    pub workshop_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            population_path: PathBuf::from("population.json"),
            workshop_path: PathBuf::from("workshop.json"),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn section_name() -> &'static str {
        "storage"
    }

    fn validate(&self) -> Result<(), TunebreedError> {
        if self.population_path.as_os_str().is_empty() {
            return Err(Self::invalid("population_path must not be empty"));
        }
        if self.workshop_path.as_os_str().is_empty() {
            return Err(Self::invalid("workshop_path must not be empty"));
        }
        if self.population_path == self.workshop_path {
            return Err(Self::invalid("population_path and workshop_path must differ"));
        }
        Ok(())
    }
}
