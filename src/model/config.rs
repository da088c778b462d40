use crate::error::ConfigError;
use crate::model::parameters::parameter_specs;
use crate::prior::{ModelPriors, WeatherEffectPrior};
use crate::transforms::Saturation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of days of the synthetic reference year
pub const REFERENCE_DAYS: usize = 365;

/// Fixed part of the saturation limit, the inferred increase is added on top of it
pub const SATURATION_LIMIT_BASELINE: f64 = 50.0;

/// Structural configuration of the generative model
///
/// Everything that is not inferred lives here: the saturation family, all
/// hyperparameters, the weather mixture and the size of the reference grid. Priors missing
/// from a serialized config are filled with [ModelPriors::default_for] of its saturation
/// family.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(
    into = "ModelConfigParameters",
    try_from = "ModelConfigParameters"
)]
pub struct ModelConfig {
    saturation: Saturation,
    saturation_limit_baseline: f64,
    priors: ModelPriors,
    weather_effect: WeatherEffectPrior,
    reference_days: usize,
}

impl ModelConfig {
    /// Default configuration of the given saturation family
    pub fn new(saturation: Saturation) -> Self {
        Self {
            saturation,
            saturation_limit_baseline: SATURATION_LIMIT_BASELINE,
            priors: ModelPriors::default_for(&saturation),
            weather_effect: WeatherEffectPrior::default(),
            reference_days: REFERENCE_DAYS,
        }
    }

    pub fn soft_min() -> Self {
        Self::new(Saturation::soft_min())
    }

    pub fn tanh() -> Self {
        Self::new(Saturation::tanh())
    }

    pub fn with_saturation_limit_baseline(mut self, baseline: f64) -> Self {
        self.saturation_limit_baseline = baseline;
        self
    }

    pub fn with_priors(mut self, priors: ModelPriors) -> Self {
        self.priors = priors;
        self
    }

    pub fn with_weather_effect(mut self, weather_effect: WeatherEffectPrior) -> Self {
        self.weather_effect = weather_effect;
        self
    }

    pub fn with_reference_days(mut self, days: usize) -> Self {
        self.reference_days = days;
        self
    }

    pub fn saturation(&self) -> &Saturation {
        &self.saturation
    }

    pub fn saturation_limit_baseline(&self) -> f64 {
        self.saturation_limit_baseline
    }

    pub fn priors(&self) -> &ModelPriors {
        &self.priors
    }

    pub fn weather_effect(&self) -> &WeatherEffectPrior {
        &self.weather_effect
    }

    pub fn reference_days(&self) -> usize {
        self.reference_days
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.saturation_limit_baseline > 0.0 && self.saturation_limit_baseline.is_finite()) {
            return Err(ConfigError::InvalidBaseline(self.saturation_limit_baseline));
        }
        if self.reference_days == 0 {
            return Err(ConfigError::EmptyReferenceGrid);
        }
        let names = parameter_specs(&self.saturation).map(|spec| spec.name);
        self.priors.validate(&names)?;
        self.weather_effect.validate()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::soft_min()
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "ModelConfig")]
struct ModelConfigParameters {
    #[serde(default)]
    saturation: Saturation,
    #[serde(default = "default_baseline")]
    saturation_limit_baseline: f64,
    #[serde(default)]
    priors: Option<ModelPriors>,
    #[serde(default)]
    weather_effect: WeatherEffectPrior,
    #[serde(default = "default_reference_days")]
    reference_days: usize,
}

fn default_baseline() -> f64 {
    SATURATION_LIMIT_BASELINE
}

fn default_reference_days() -> usize {
    REFERENCE_DAYS
}

impl From<ModelConfig> for ModelConfigParameters {
    fn from(f: ModelConfig) -> Self {
        Self {
            saturation: f.saturation,
            saturation_limit_baseline: f.saturation_limit_baseline,
            priors: Some(f.priors),
            weather_effect: f.weather_effect,
            reference_days: f.reference_days,
        }
    }
}

impl TryFrom<ModelConfigParameters> for ModelConfig {
    type Error = ConfigError;

    fn try_from(f: ModelConfigParameters) -> Result<Self, Self::Error> {
        let priors = f
            .priors
            .unwrap_or_else(|| ModelPriors::default_for(&f.saturation));
        let config = Self {
            saturation: f.saturation,
            saturation_limit_baseline: f.saturation_limit_baseline,
            priors,
            weather_effect: f.weather_effect,
            reference_days: f.reference_days,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prior::LnPrior1D;

    #[test]
    fn defaults_are_valid() {
        assert!(ModelConfig::soft_min().validate().is_ok());
        assert!(ModelConfig::tanh().validate().is_ok());
        assert_eq!(ModelConfig::default().saturation_limit_baseline(), 50.0);
        assert_eq!(ModelConfig::default().reference_days(), 365);
    }

    #[test]
    fn invalid_baseline() {
        for baseline in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let config = ModelConfig::default().with_saturation_limit_baseline(baseline);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidBaseline(_))
            ));
        }
    }

    #[test]
    fn empty_reference_grid() {
        let config = ModelConfig::default().with_reference_days(0);
        assert_eq!(config.validate(), Err(ConfigError::EmptyReferenceGrid));
    }

    #[test]
    fn invalid_prior_names_the_control_parameter() {
        let mut priors = ModelPriors::default_for(&Saturation::tanh());
        priors.saturation_control = LnPrior1D::beta(0.0, 2.0);
        let config = ModelConfig::tanh().with_priors(priors);
        match config.validate() {
            Err(ConfigError::InvalidPrior { parameter, .. }) => {
                assert_eq!(parameter, "saturation_sharpness")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_priors_follow_saturation_family() {
        let config: ModelConfig = serde_json::from_str(r#"{"saturation": {"Tanh": {}}}"#).unwrap();
        assert_eq!(config, ModelConfig::tanh());
        let config: ModelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ModelConfig::soft_min());
    }

    #[test]
    fn deserialization_validates() {
        let result: Result<ModelConfig, _> =
            serde_json::from_str(r#"{"saturation_limit_baseline": -5.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serialization_round_trip() {
        let config = ModelConfig::tanh()
            .with_weather_effect(WeatherEffectPrior::beta_family())
            .with_reference_days(366);
        let json = serde_json::to_string(&config).unwrap();
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
