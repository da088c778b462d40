use crate::error::ConfigError;
use crate::model::parameters::{NPARAMS, Parameters};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Smallest ensemble accepted by the affine-invariant sampler
pub const MIN_WALKERS: usize = 2 * (NPARAMS + 1);

/// Configuration of the MCMC driver
///
/// Every chain is an independent ensemble of `walkers` walkers. The first `warmup` ensemble
/// steps are discarded, after that every `thin`-th step is kept, walker by walker, until the
/// chain has `draws` draws.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SamplerConfig {
    chains: usize,
    warmup: usize,
    draws: usize,
    thin: usize,
    walkers: Option<usize>,
    init_jitter: f64,
    seed: Option<u64>,
    init: Option<Parameters>,
}

impl SamplerConfig {
    pub fn new() -> Self {
        Self {
            chains: 4,
            warmup: 1000,
            draws: 1000,
            thin: 1,
            walkers: None,
            init_jitter: 1e-2,
            seed: None,
            init: None,
        }
    }

    pub fn default_walkers() -> usize {
        usize::max(4 * NPARAMS, MIN_WALKERS)
    }

    pub fn with_chains(mut self, chains: usize) -> Self {
        self.chains = chains;
        self
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws;
        self
    }

    pub fn with_thin(mut self, thin: usize) -> Self {
        self.thin = thin;
        self
    }

    pub fn with_walkers(mut self, walkers: usize) -> Self {
        self.walkers = Some(walkers);
        self
    }

    /// Standard deviation of the initial walker scatter in unconstrained coordinates
    pub fn with_init_jitter(mut self, init_jitter: f64) -> Self {
        self.init_jitter = init_jitter;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initial point of every chain, it is used as is
    pub fn with_init(mut self, init: Parameters) -> Self {
        self.init = Some(init);
        self
    }

    pub fn chains(&self) -> usize {
        self.chains
    }

    pub fn warmup(&self) -> usize {
        self.warmup
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn thin(&self) -> usize {
        self.thin
    }

    pub fn walkers(&self) -> usize {
        self.walkers.unwrap_or_else(Self::default_walkers)
    }

    pub fn init_jitter(&self) -> f64 {
        self.init_jitter
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn init(&self) -> Option<&Parameters> {
        self.init.as_ref()
    }

    /// Number of ensemble steps after warm-up needed to collect all draws of a chain
    pub fn retained_steps(&self) -> usize {
        self.draws.div_ceil(self.walkers())
    }

    /// Total number of ensemble steps of a chain
    pub fn iterations(&self) -> usize {
        self.warmup + self.retained_steps() * self.thin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains == 0 {
            return Err(ConfigError::InvalidChains(self.chains));
        }
        if self.draws == 0 {
            return Err(ConfigError::InvalidDraws(self.draws));
        }
        if self.thin == 0 {
            return Err(ConfigError::InvalidThin(self.thin));
        }
        let walkers = self.walkers();
        if walkers < MIN_WALKERS || walkers % 2 != 0 {
            return Err(ConfigError::InvalidWalkers {
                actual: walkers,
                minimum: MIN_WALKERS,
            });
        }
        if !(self.init_jitter > 0.0 && self.init_jitter.is_finite()) {
            return Err(ConfigError::InvalidJitter(self.init_jitter));
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.chains(), 4);
        assert_eq!(config.warmup(), 1000);
        assert_eq!(config.draws(), 1000);
        assert_eq!(config.walkers(), 28);
        assert_eq!(config.seed(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn step_count() {
        let config = SamplerConfig::new()
            .with_warmup(100)
            .with_draws(50)
            .with_walkers(16)
            .with_thin(5);
        // 50 draws need 4 steps of 16 walkers
        assert_eq!(config.retained_steps(), 4);
        assert_eq!(config.iterations(), 120);
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            SamplerConfig::new().with_chains(0).validate(),
            Err(ConfigError::InvalidChains(0))
        );
        assert_eq!(
            SamplerConfig::new().with_draws(0).validate(),
            Err(ConfigError::InvalidDraws(0))
        );
        assert_eq!(
            SamplerConfig::new().with_thin(0).validate(),
            Err(ConfigError::InvalidThin(0))
        );
        assert_eq!(
            SamplerConfig::new().with_walkers(17).validate(),
            Err(ConfigError::InvalidWalkers {
                actual: 17,
                minimum: MIN_WALKERS
            })
        );
        assert_eq!(
            SamplerConfig::new().with_walkers(8).validate(),
            Err(ConfigError::InvalidWalkers {
                actual: 8,
                minimum: MIN_WALKERS
            })
        );
        assert!(matches!(
            SamplerConfig::new().with_init_jitter(0.0).validate(),
            Err(ConfigError::InvalidJitter(_))
        ));
    }

    #[test]
    fn zero_warmup_is_allowed() {
        assert!(SamplerConfig::new().with_warmup(0).validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: SamplerConfig =
            serde_json::from_str(r#"{"chains": 2, "seed": 42}"#).unwrap();
        assert_eq!(config, SamplerConfig::new().with_chains(2).with_seed(42));
    }
}
