use crate::error::Error;
use crate::model::config::ModelConfig;
use crate::model::data::Observations;
use crate::model::derived::{DerivedQuantities, reference_grid};
use crate::model::domain::{Domain, within_domains};
use crate::model::parameters::{NPARAMS, ParameterSpec, Parameters, parameter_specs};
use crate::transforms::{SaturationTrait, available_energy, instantaneous_phase, seasonal_oscillation};

use itertools::Itertools;
use ndarray::Array1;

/// Generative model of daily production bound to its observations
///
/// This is the model declaration handed to a sampler: the parameter schema
/// ([SolarModel::parameter_specs]), the log-density in constrained
/// ([SolarModel::ln_posterior]) and unconstrained ([SolarModel::ln_posterior_unconstrained])
/// coordinates, and the generated quantities ([SolarModel::derived]).
///
/// Density evaluation never fails: every domain violation, including production at or above the
/// saturation limit, and every NaN is reported as `-∞`.
#[derive(Clone, Debug)]
pub struct SolarModel {
    config: ModelConfig,
    observations: Observations,
    specs: [ParameterSpec; NPARAMS],
    domains: [Domain; NPARAMS],
    reference_grid: Array1<f64>,
}

impl SolarModel {
    pub fn new(config: ModelConfig, observations: Observations) -> Result<Self, Error> {
        config.validate()?;
        let specs = parameter_specs(config.saturation());
        let domains = specs.map(|spec| spec.domain);
        let reference_grid = reference_grid(config.reference_days());
        Ok(Self {
            config,
            observations,
            specs,
            domains,
            reference_grid,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn observations(&self) -> &Observations {
        &self.observations
    }

    pub fn reference_grid(&self) -> &Array1<f64> {
        &self.reference_grid
    }

    pub fn parameter_specs(&self) -> &[ParameterSpec; NPARAMS] {
        &self.specs
    }

    pub fn parameter_names(&self) -> [&'static str; NPARAMS] {
        self.specs.map(|spec| spec.name)
    }

    pub fn saturation_limit(&self, params: &Parameters) -> f64 {
        self.config.saturation_limit_baseline() + params.saturation_limit_increase
    }

    /// Share of the available energy realized on a day, `None` where production can't be
    /// unsaturated
    pub fn weather_effect(&self, params: &Parameters, t_year: f64, production: f64) -> Option<f64> {
        let phi = instantaneous_phase(t_year, params.phase);
        let osc = seasonal_oscillation(phi, params.beta_c1, params.beta_s1);
        let e_available = available_energy(params.min, params.amplitude, osc);
        let energy = self.config.saturation().inv_saturation(
            production,
            self.saturation_limit(params),
            params.saturation_control,
        )?;
        Some(energy / e_available)
    }

    fn ln_likelihood_terms<'a>(&'a self, params: &'a Parameters) -> impl Iterator<Item = f64> + 'a {
        let weather_prior = self.config.weather_effect();
        self.observations
            .t_year()
            .into_iter()
            .zip(self.observations.production())
            .map(move |(&t_year, &production)| {
                self.weather_effect(params, t_year, production)
                    .map_or(f64::NEG_INFINITY, |w| weather_prior.ln_prob(w))
            })
    }

    pub fn ln_prior(&self, params: &Parameters) -> f64 {
        if !within_domains(&params.to_array(), &self.domains) {
            return f64::NEG_INFINITY;
        }
        nan_to_neg_inf(self.config.priors().ln_prior(params))
    }

    /// Log-likelihood of the weather effects of all observations
    ///
    /// Parameters outside of their domains are not checked here, see [SolarModel::ln_posterior].
    pub fn ln_likelihood(&self, params: &Parameters) -> f64 {
        let mut total = 0.0;
        for term in self.ln_likelihood_terms(params) {
            total += nan_to_neg_inf(term);
            if total == f64::NEG_INFINITY {
                break;
            }
        }
        nan_to_neg_inf(total)
    }

    /// Unnormalized log-posterior in constrained coordinates
    pub fn ln_posterior(&self, params: &Parameters) -> f64 {
        let ln_prior = self.ln_prior(params);
        if ln_prior == f64::NEG_INFINITY {
            return ln_prior;
        }
        nan_to_neg_inf(ln_prior + self.ln_likelihood(params))
    }

    /// Map unconstrained coordinates into the parameter domains
    pub fn constrain(&self, u: &[f64; NPARAMS]) -> Parameters {
        let mut x = [0.0; NPARAMS];
        for ((x, &u), domain) in x.iter_mut().zip(u).zip(&self.domains) {
            *x = domain.constrain(u);
        }
        Parameters::from_array(&x)
    }

    /// Inverse of [SolarModel::constrain], `None` if a value is on or outside its domain border
    pub fn unconstrain(&self, params: &Parameters) -> Option<[f64; NPARAMS]> {
        let x = params.to_array();
        let mut u = [0.0; NPARAMS];
        for ((u, x), domain) in u.iter_mut().zip(x).zip(&self.domains) {
            *u = domain.unconstrain(x)?;
        }
        Some(u)
    }

    /// Log-posterior in unconstrained coordinates including the log-Jacobian of [SolarModel::constrain]
    pub fn ln_posterior_unconstrained(&self, u: &[f64; NPARAMS]) -> f64 {
        let ln_jacobian: f64 = u
            .iter()
            .zip(&self.domains)
            .map(|(&u, domain)| domain.ln_jacobian(u))
            .sum();
        let params = self.constrain(u);
        nan_to_neg_inf(self.ln_posterior(&params) + ln_jacobian)
    }

    /// First observation with a non-finite likelihood term
    pub fn rejecting_observation(&self, params: &Parameters) -> Option<usize> {
        self.ln_likelihood_terms(params)
            .find_position(|term| !term.is_finite())
            .map(|(index, _)| index)
    }

    pub fn derived(&self, params: &Parameters) -> DerivedQuantities {
        DerivedQuantities::evaluate(self, params)
    }
}

#[inline]
fn nan_to_neg_inf(x: f64) -> f64 {
    if x.is_nan() { f64::NEG_INFINITY } else { x }
}
