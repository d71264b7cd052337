use crate::error::TunebreedError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), TunebreedError>;

    fn invalid(message: impl Into<String>) -> TunebreedError {
        TunebreedError::Configuration(format!("[{}] {}", Self::section_name(), message.into()))
    }
}
