use super::traits::ConfigSection;
use crate::error::TunebreedError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub survivors: usize,
    pub shift: usize,
    pub seed_voices: usize,
    pub filler_mode: FillerMode,
    pub pairing: PairingPolicy,
    pub seed: Option<u64>,
    /// Most melodies one workshop breed may produce. Falls back to `seed_voices`.
    pub max_brood: Option<usize>,
}

/// How filler melodies pick their note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillerMode {
    /// Uniform over the whole scale.
    Random,
    /// Filler `i` plays scale step `i mod S`.
    Cycle,
}

/// How the crossover pool is refilled to a full population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Pool of `P / 2`; each pair's children followed by both parents unmodified.
    ReinsertParents,
    /// Pool of `P / 2` paired twice under independent shuffles; children only.
    DoubleShuffle,
    /// Pool of `P - N` (`P - 2N` fillers); children plus an untouched copy of
    /// every survivor. Fillers are dropped after crossover.
    Legacy,
}

impl PairingPolicy {
    /// Pool size this policy needs to land on exactly `population_size` individuals.
    pub fn pool_size(self, population_size: usize, survivors: usize) -> usize {
        match self {
            PairingPolicy::ReinsertParents | PairingPolicy::DoubleShuffle => population_size / 2,
            PairingPolicy::Legacy => population_size.saturating_sub(survivors),
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 48,
            survivors: 16,
            shift: 8,
            seed_voices: 16,
            filler_mode: FillerMode::Random,
            pairing: PairingPolicy::ReinsertParents,
            seed: None,
            max_brood: None,
        }
    }
}

impl EvolutionConfig {
    pub fn pool_size(&self) -> usize {
        self.pairing.pool_size(self.population_size, self.survivors)
    }

    pub fn filler_count(&self) -> usize {
        self.pool_size().saturating_sub(self.survivors)
    }

    pub fn brood_limit(&self) -> usize {
        self.max_brood.unwrap_or(self.seed_voices)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), TunebreedError> {
        if self.population_size < 2 {
            return Err(Self::invalid("population_size must be at least 2"));
        }
        if self.survivors == 0 {
            return Err(Self::invalid("survivors must be at least 1"));
        }
        if self.seed_voices == 0 {
            return Err(Self::invalid("seed_voices must be at least 1"));
        }
        if self.brood_limit() < 2 {
            return Err(Self::invalid(format!(
                "max_brood must be at least 2, got {}",
                self.brood_limit()
            )));
        }

        match self.pairing {
            PairingPolicy::Legacy => {
                if 2 * self.survivors > self.population_size {
                    return Err(Self::invalid(format!(
                        "survivors ({}) must be at most half of population_size ({})",
                        self.survivors, self.population_size
                    )));
                }
                if (self.population_size - self.survivors) % 2 != 0 {
                    return Err(Self::invalid(format!(
                        "population_size - survivors must be even, got {}",
                        self.population_size - self.survivors
                    )));
                }
            }
            PairingPolicy::ReinsertParents | PairingPolicy::DoubleShuffle => {
                if self.population_size % 4 != 0 {
                    return Err(Self::invalid(format!(
                        "population_size must be divisible by 4 for a pool of half its size, got {}",
                        self.population_size
                    )));
                }
                if self.survivors > self.population_size / 2 {
                    return Err(Self::invalid(format!(
                        "survivors ({}) must not exceed population_size / 2 ({})",
                        self.survivors,
                        self.population_size / 2
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_arithmetic() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pairing, PairingPolicy::ReinsertParents);
        assert_eq!(config.pool_size(), config.population_size / 2);
        assert_eq!(config.pool_size(), 24);
        assert_eq!(config.filler_count(), 8);

        let legacy = EvolutionConfig {
            pairing: PairingPolicy::Legacy,
            ..EvolutionConfig::default()
        };
        assert!(legacy.validate().is_ok());
        assert_eq!(legacy.pool_size(), 32);
        assert_eq!(legacy.filler_count(), 16);

        let doubled = EvolutionConfig {
            pairing: PairingPolicy::DoubleShuffle,
            ..EvolutionConfig::default()
        };
        assert!(doubled.validate().is_ok());
        assert_eq!(doubled.pool_size(), 24);
        assert_eq!(doubled.filler_count(), 8);
    }

    #[test]
    fn test_brood_limit_defaults_to_seed_voices() {
        let config = EvolutionConfig::default();
        assert_eq!(config.brood_limit(), 16);

        let capped = EvolutionConfig {
            max_brood: Some(40),
            ..EvolutionConfig::default()
        };
        assert_eq!(capped.brood_limit(), 40);

        let tiny = EvolutionConfig {
            max_brood: Some(1),
            ..EvolutionConfig::default()
        };
        assert!(tiny.validate().is_err());
    }

    #[test]
    fn test_rejects_odd_pool() {
        let legacy = EvolutionConfig {
            population_size: 48,
            survivors: 15,
            pairing: PairingPolicy::Legacy,
            ..EvolutionConfig::default()
        };
        assert!(legacy.validate().is_err());

        let halved = EvolutionConfig {
            population_size: 50,
            ..EvolutionConfig::default()
        };
        assert!(halved.validate().is_err());
    }

    #[test]
    fn test_rejects_too_many_survivors() {
        let config = EvolutionConfig {
            population_size: 16,
            survivors: 10,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());

        let legacy = EvolutionConfig {
            population_size: 16,
            survivors: 10,
            pairing: PairingPolicy::Legacy,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());

        let doubled = EvolutionConfig {
            population_size: 18,
            survivors: 4,
            pairing: PairingPolicy::DoubleShuffle,
            ..EvolutionConfig::default()
        };
        assert!(doubled.validate().is_err());
    }
}
