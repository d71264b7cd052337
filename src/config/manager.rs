use super::{
    evolution::EvolutionConfig, render::RenderConfig, scale::ScaleConfig,
    storage::StorageConfig, traits::ConfigSection,
};
use crate::error::TunebreedError;
use crate::types::PopulationShape;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `TUNEBREED__EVOLUTION__SHIFT=16`.
pub const ENV_PREFIX: &str = "TUNEBREED";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scale: ScaleConfig,
    pub evolution: EvolutionConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TunebreedError> {
        self.scale.validate()?;
        self.evolution.validate()?;
        self.storage.validate()?;
        self.render.validate()?;

        if self.evolution.seed_voices > self.scale.size() {
            return Err(TunebreedError::Configuration(format!(
                "seed_voices ({}) exceeds the scale size ({})",
                self.evolution.seed_voices,
                self.scale.size()
            )));
        }
        Ok(())
    }

    pub fn shape(&self) -> PopulationShape {
        PopulationShape {
            population_size: self.evolution.population_size,
            sequence_length: self.scale.sequence_length,
            scale_size: self.scale.size(),
        }
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Defaults, then `path` if it exists, then environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TunebreedError> {
        let config = Self::layered(Some(path.as_ref()))?;
        self.replace(config)
    }

    /// Defaults plus environment overrides only.
    pub fn load_from_env(&self) -> Result<(), TunebreedError> {
        let config = Self::layered(None)?;
        self.replace(config)
    }

    fn layered(path: Option<&Path>) -> Result<AppConfig, TunebreedError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| TunebreedError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| TunebreedError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TunebreedError> {
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)
            .map_err(|e| TunebreedError::Configuration(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, TunebreedError> {
        toml::to_string_pretty(&self.get())
            .map_err(|e| TunebreedError::Configuration(format!("Failed to serialize: {}", e)))
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Applies `f` to a copy and keeps it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), TunebreedError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), TunebreedError> {
        config.validate()?;
        let mut guard = self.config.write().map_err(|_| TunebreedError::LockPoisoned)?;
        *guard = config;
        Ok(())
    }
}
