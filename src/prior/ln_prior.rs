use crate::error::ConfigError;
use crate::model::parameters::{NPARAMS, Parameters};
use crate::prior::ln_prior_1d::{LnPrior1D, LnPrior1DTrait};
use crate::transforms::Saturation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Independent priors of all model parameters
///
/// The joint log-prior is the sum of the components. Components are pure configuration, any
/// [LnPrior1D] may be used, and the parameter domains are enforced independently of them.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ModelPriors {
    pub min: LnPrior1D,
    pub amplitude: LnPrior1D,
    pub phase: LnPrior1D,
    pub beta_c1: LnPrior1D,
    pub beta_s1: LnPrior1D,
    pub saturation_limit_increase: LnPrior1D,
    pub saturation_control: LnPrior1D,
}

impl ModelPriors {
    /// Default priors, the control prior follows the saturation family
    pub fn default_for(saturation: &Saturation) -> Self {
        let saturation_control = match saturation {
            Saturation::SoftMin(_) => LnPrior1D::gamma_from_moments(5.0, 2.5),
            Saturation::Tanh(_) => LnPrior1D::beta(5.0, 2.0),
        };
        Self {
            min: LnPrior1D::gamma_from_moments(20.0, 5.0),
            amplitude: LnPrior1D::gamma_from_moments(40.0, 10.0),
            // Peak production at the December solstice
            phase: LnPrior1D::von_mises(0.17, 5.0),
            beta_c1: LnPrior1D::normal(0.0, 0.5),
            beta_s1: LnPrior1D::normal(0.0, 0.5),
            saturation_limit_increase: LnPrior1D::gamma_from_moments(1.0, f64::sqrt(0.5)),
            saturation_control,
        }
    }

    pub fn components(&self) -> [&LnPrior1D; NPARAMS] {
        [
            &self.min,
            &self.amplitude,
            &self.phase,
            &self.beta_c1,
            &self.beta_s1,
            &self.saturation_limit_increase,
            &self.saturation_control,
        ]
    }

    pub fn ln_prior(&self, params: &Parameters) -> f64 {
        self.components()
            .iter()
            .zip(params.to_array())
            .map(|(prior, x)| prior.ln_prior_1d(x))
            .sum()
    }

    /// Validate every component, `names` are used for error reporting
    pub fn validate(&self, names: &[&'static str; NPARAMS]) -> Result<(), ConfigError> {
        for (prior, &parameter) in self.components().iter().zip(names.iter()) {
            prior
                .validate()
                .map_err(|reason| ConfigError::InvalidPrior { parameter, reason })?;
        }
        Ok(())
    }
}

impl Default for ModelPriors {
    fn default() -> Self {
        Self::default_for(&Saturation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn joint_prior_is_sum_of_components() {
        let priors = ModelPriors::default();
        let params = Parameters::default_init(&Saturation::soft_min());
        let expected: f64 = priors
            .components()
            .iter()
            .zip(params.to_array())
            .map(|(p, x)| p.ln_prior_1d(x))
            .sum();
        assert_relative_eq!(priors.ln_prior(&params), expected);
        assert!(expected.is_finite());
    }

    #[test]
    fn default_moments() {
        let LnPrior1D::Gamma(min) = ModelPriors::default().min else {
            panic!("min prior must be gamma");
        };
        assert_relative_eq!(min.mean(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(min.std(), 5.0, epsilon = 1e-12);
        let LnPrior1D::Gamma(increase) = ModelPriors::default().saturation_limit_increase else {
            panic!("saturation_limit_increase prior must be gamma");
        };
        assert_relative_eq!(increase.mean(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn tanh_control_prior_is_on_unit_interval() {
        let priors = ModelPriors::default_for(&Saturation::tanh());
        assert!(priors.saturation_control.ln_prior_1d(0.5).is_finite());
        assert_eq!(priors.saturation_control.ln_prior_1d(1.5), f64::NEG_INFINITY);
    }

    #[test]
    fn invalid_component_is_named() {
        let mut priors = ModelPriors::default();
        priors.amplitude = LnPrior1D::gamma(-1.0, 1.0);
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        match priors.validate(&names) {
            Err(ConfigError::InvalidPrior { parameter, .. }) => assert_eq!(parameter, "b"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
