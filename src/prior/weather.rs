use crate::error::ConfigError;
use crate::prior::ln_prior_1d::{LnPrior1D, LnPrior1DTrait, MixLnPrior1D};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Two-component mixture prior of the daily weather effect
///
/// `ln p(w) = logsumexp(ln(1 - λ) + ln f_variable(w), ln λ + ln f_clear_sky(w))`, where λ is
/// [WeatherEffectPrior::clear_sky_weight]. Both components are fixed, λ is not inferred.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(into = "WeatherEffectPriorParameters", from = "WeatherEffectPriorParameters")]
pub struct WeatherEffectPrior {
    clear_sky_weight: f64,
    variable: LnPrior1D,
    clear_sky: LnPrior1D,
    mix: MixLnPrior1D,
}

impl WeatherEffectPrior {
    pub fn new(clear_sky_weight: f64, variable: LnPrior1D, clear_sky: LnPrior1D) -> Self {
        let mix = MixLnPrior1D::new(&[
            (1.0 - clear_sky_weight, variable.clone()),
            (clear_sky_weight, clear_sky.clone()),
        ]);
        Self {
            clear_sky_weight,
            variable,
            clear_sky,
            mix,
        }
    }

    /// Beta-family variant: broad `Beta(2, 2)` days and `Beta(10, 1)` clear days, λ = 0.25
    pub fn beta_family() -> Self {
        Self::new(0.25, LnPrior1D::beta(2.0, 2.0), LnPrior1D::beta(10.0, 1.0))
    }

    pub fn clear_sky_weight(&self) -> f64 {
        self.clear_sky_weight
    }

    pub fn variable(&self) -> &LnPrior1D {
        &self.variable
    }

    pub fn clear_sky(&self) -> &LnPrior1D {
        &self.clear_sky
    }

    #[inline]
    pub fn ln_prob(&self, weather_effect: f64) -> f64 {
        self.mix.ln_prior_1d(weather_effect)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.clear_sky_weight > 0.0 && self.clear_sky_weight < 1.0) {
            return Err(ConfigError::InvalidMixingWeight(self.clear_sky_weight));
        }
        for (prior, parameter) in [
            (&self.variable, "variable weather effect"),
            (&self.clear_sky, "clear-sky weather effect"),
        ] {
            prior
                .validate()
                .map_err(|reason| ConfigError::InvalidPrior { parameter, reason })?;
        }
        Ok(())
    }
}

/// Default gamma-family mixture
///
/// λ = 0.15, ordinary days are `Gamma(5, rate 8)` with mean 0.625 and clear days are
/// `Gamma(180, rate 200)` tightly around 0.9.
impl Default for WeatherEffectPrior {
    fn default() -> Self {
        Self::new(
            0.15,
            LnPrior1D::gamma(5.0, 8.0),
            LnPrior1D::gamma(180.0, 200.0),
        )
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "WeatherEffectPrior")]
struct WeatherEffectPriorParameters {
    clear_sky_weight: f64,
    variable: LnPrior1D,
    clear_sky: LnPrior1D,
}

impl From<WeatherEffectPrior> for WeatherEffectPriorParameters {
    fn from(f: WeatherEffectPrior) -> Self {
        Self {
            clear_sky_weight: f.clear_sky_weight,
            variable: f.variable,
            clear_sky: f.clear_sky,
        }
    }
}

impl From<WeatherEffectPriorParameters> for WeatherEffectPrior {
    fn from(f: WeatherEffectPriorParameters) -> Self {
        Self::new(f.clear_sky_weight, f.variable, f.clear_sky)
    }
}
