use crate::model::density::SolarModel;
use crate::model::parameters::Parameters;
use crate::transforms::{SaturationTrait, available_energy, instantaneous_phase, seasonal_oscillation};

use ndarray::{Array1, Zip};
use ndarray_stats::QuantileExt;
use serde::Serialize;

/// Evenly spaced synthetic year fractions `i / days`, `i = 0..days`
pub fn reference_grid(days: usize) -> Array1<f64> {
    Array1::from_shape_fn(days, |i| i as f64 / days as f64)
}

/// Deterministic quantities of a single draw
///
/// Per-day series align with the observations, `*_ref` series with the reference grid.
/// Undefined weather effects, where production reaches the saturation limit, are NaN.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DerivedQuantities {
    #[serde(rename = "E_available")]
    pub e_available: Array1<f64>,
    pub weather_effect: Array1<f64>,
    #[serde(rename = "E_optimal")]
    pub e_optimal: Array1<f64>,
    #[serde(rename = "E_available_ref")]
    pub e_available_ref: Array1<f64>,
    #[serde(rename = "E_optimal_ref")]
    pub e_optimal_ref: Array1<f64>,
    pub saturation_limit: f64,
    /// Saturated energy of the longest cloudless day
    #[serde(rename = "E_optimal_max")]
    pub e_optimal_max: f64,
    /// Saturated energy of the shortest cloudless day
    #[serde(rename = "E_optimal_min")]
    pub e_optimal_min: f64,
}

impl DerivedQuantities {
    pub fn evaluate(model: &SolarModel, params: &Parameters) -> Self {
        let saturation = model.config().saturation();
        let limit = model.saturation_limit(params);
        let control = params.saturation_control;
        let e_available_at = |t_year: f64| {
            let phi = instantaneous_phase(t_year, params.phase);
            let osc = seasonal_oscillation(phi, params.beta_c1, params.beta_s1);
            available_energy(params.min, params.amplitude, osc)
        };

        let observations = model.observations();
        let e_available = observations.t_year().mapv(e_available_at);
        let weather_effect = Zip::from(observations.production())
            .and(&e_available)
            .map_collect(|&production, &e_available| {
                saturation
                    .inv_saturation(production, limit, control)
                    .map_or(f64::NAN, |energy| energy / e_available)
            });
        let e_optimal = e_available.mapv(|e| saturation.saturation(e, limit, control));

        let e_available_ref = model.reference_grid().mapv(e_available_at);
        let e_optimal_ref = e_available_ref.mapv(|e| saturation.saturation(e, limit, control));

        Self {
            e_available,
            weather_effect,
            e_optimal,
            e_available_ref,
            e_optimal_ref,
            saturation_limit: limit,
            e_optimal_max: saturation.saturation(params.min + params.amplitude, limit, control),
            e_optimal_min: saturation.saturation(params.min, limit, control),
        }
    }

    /// Index of the reference day with the highest optimal production
    pub fn peak_day(&self) -> Option<usize> {
        self.e_optimal_ref.argmax().ok()
    }
}
