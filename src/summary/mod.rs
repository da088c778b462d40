//! Generated quantities of posterior draws
//!
//! Every retained draw is evaluated once by [SolarModel::derived], the results are gathered into
//! named series (draw × day) and scalars (one value per draw).

pub mod series;
pub use series::{autocorrelation, autocorrelations, column_quantiles};

use crate::inference::PosteriorDraws;
use crate::model::{DerivedQuantities, Parameters, SolarModel};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, stack};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Names of per-day series
pub const SERIES_NAMES: [&str; 5] = [
    "E_available",
    "weather_effect",
    "E_optimal",
    "E_available_ref",
    "E_optimal_ref",
];

/// Names of derived per-draw scalars, parameters are added by their own names
pub const SCALAR_NAMES: [&str; 4] = [
    "saturation_limit",
    "E_optimal_max",
    "E_optimal_min",
    "peak_day",
];

/// All quantities of a single draw
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DrawRecord {
    pub scalars: BTreeMap<&'static str, f64>,
    pub series: BTreeMap<&'static str, Array1<f64>>,
}

/// Derived quantities of all posterior draws, in the chain/draw order of [PosteriorDraws]
#[derive(Clone, Debug, Serialize)]
pub struct PosteriorSummary {
    reference_days: usize,
    series: BTreeMap<&'static str, Array2<f64>>,
    scalars: BTreeMap<&'static str, Array1<f64>>,
}

impl PosteriorSummary {
    #[tracing::instrument(skip_all, fields(draws = draws.len()))]
    pub fn new(model: &SolarModel, draws: &PosteriorDraws) -> Self {
        let parameters: Vec<Parameters> = draws.parameters().collect();
        let derived: Vec<DerivedQuantities> = parameters
            .par_iter()
            .map(|params| model.derived(params))
            .collect();

        let n_obs = model.observations().len();
        let reference_days = model.config().reference_days();
        let stack_series = |len: usize, f: fn(&DerivedQuantities) -> ArrayView1<f64>| {
            if derived.is_empty() {
                return Array2::zeros((0, len));
            }
            let views: Vec<_> = derived.iter().map(f).collect();
            // Every draw has the same series lengths
            stack(Axis(0), &views).unwrap_or_else(|_| Array2::zeros((0, len)))
        };
        let series = BTreeMap::from([
            ("E_available", stack_series(n_obs, |d| d.e_available.view())),
            ("weather_effect", stack_series(n_obs, |d| d.weather_effect.view())),
            ("E_optimal", stack_series(n_obs, |d| d.e_optimal.view())),
            (
                "E_available_ref",
                stack_series(reference_days, |d| d.e_available_ref.view()),
            ),
            (
                "E_optimal_ref",
                stack_series(reference_days, |d| d.e_optimal_ref.view()),
            ),
        ]);

        let collect_scalar =
            |f: fn(&DerivedQuantities) -> f64| derived.iter().map(f).collect::<Array1<f64>>();
        let mut scalars = BTreeMap::from([
            ("saturation_limit", collect_scalar(|d| d.saturation_limit)),
            ("E_optimal_max", collect_scalar(|d| d.e_optimal_max)),
            ("E_optimal_min", collect_scalar(|d| d.e_optimal_min)),
            (
                "peak_day",
                collect_scalar(|d| d.peak_day().map_or(f64::NAN, |day| day as f64)),
            ),
        ]);
        for (index, &name) in model.parameter_names().iter().enumerate() {
            scalars.insert(
                name,
                parameters.iter().map(|p| p.to_array()[index]).collect(),
            );
        }

        Self {
            reference_days,
            series,
            scalars,
        }
    }

    /// Number of draws
    pub fn len(&self) -> usize {
        self.scalars
            .get("saturation_limit")
            .map_or(0, |values| values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn series_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.series.keys().copied()
    }

    pub fn scalar_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scalars.keys().copied()
    }

    /// Per-day series of all draws, draw × day
    pub fn series(&self, name: &str) -> Option<ArrayView2<'_, f64>> {
        self.series.get(name).map(|values| values.view())
    }

    pub fn scalar(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.scalars.get(name).map(|values| values.view())
    }

    pub fn draw(&self, index: usize) -> Option<DrawRecord> {
        if index >= self.len() {
            return None;
        }
        Some(DrawRecord {
            scalars: self
                .scalars
                .iter()
                .map(|(&name, values)| (name, values[index]))
                .collect(),
            series: self
                .series
                .iter()
                .map(|(&name, values)| (name, values.row(index).to_owned()))
                .collect(),
        })
    }

    /// Quantiles of a series across draws for every day, quantile × day
    pub fn series_quantiles(&self, name: &str, quantiles: &[f64]) -> Option<Array2<f64>> {
        self.series(name)
            .map(|values| column_quantiles(values, quantiles))
    }

    /// Share of draws having their peak on every day of the reference grid
    pub fn peak_day_distribution(&self) -> Array1<f64> {
        let mut counts = Array1::zeros(self.reference_days);
        let Some(peak_days) = self.scalars.get("peak_day") else {
            return counts;
        };
        for &day in peak_days.iter().filter(|day| day.is_finite()) {
            counts[day as usize] += 1.0;
        }
        if !self.is_empty() {
            counts /= self.len() as f64;
        }
        counts
    }

    /// Autocorrelation of the weather effect series of every draw, draw × lag for lags
    /// `0..=max_lag`
    pub fn weather_effect_autocorrelation(&self, max_lag: usize) -> Array2<f64> {
        let mut result = Array2::from_elem((self.len(), max_lag + 1), f64::NAN);
        if let Some(weather_effect) = self.series.get("weather_effect") {
            for (row, mut output) in weather_effect
                .axis_iter(Axis(0))
                .zip(result.axis_iter_mut(Axis(0)))
            {
                output.assign(&autocorrelations(row, max_lag));
            }
        }
        result
    }
}
