use crate::error::InputError;
use crate::inference::calendar::year_fraction;

use chrono::NaiveDate;
use itertools::Itertools;
use ndarray::{Array1, ArrayView1};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Validated daily observations
///
/// Every day has a year fraction in `[0, 1)` and a finite non-negative production. The order is
/// kept but doesn't matter for the model, observations are conditionally independent.
#[derive(Clone, Debug, PartialEq)]
pub struct Observations {
    t_year: Array1<f64>,
    production: Array1<f64>,
}

impl Observations {
    pub fn new(t_year: Array1<f64>, production: Array1<f64>) -> Result<Self, InputError> {
        if t_year.len() != production.len() {
            return Err(InputError::LengthMismatch {
                declared: t_year.len(),
                t_year: t_year.len(),
                production: production.len(),
            });
        }
        if let Some((index, &value)) = t_year
            .iter()
            .find_position(|&&t| !(0.0..1.0).contains(&t))
        {
            return Err(InputError::YearFractionOutOfRange { index, value });
        }
        if let Some((index, &value)) = production
            .iter()
            .find_position(|&&p| !(p >= 0.0 && p.is_finite()))
        {
            return Err(InputError::InvalidProduction { index, value });
        }
        Ok(Self { t_year, production })
    }

    /// Build observations from calendar days, see [year_fraction]
    pub fn from_daily<I>(days: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (t_year, production): (Vec<_>, Vec<_>) = days
            .into_iter()
            .map(|(date, production)| (year_fraction(date), production))
            .unzip();
        Self::new(t_year.into(), production.into())
    }

    pub fn len(&self) -> usize {
        self.t_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t_year.is_empty()
    }

    pub fn t_year(&self) -> ArrayView1<'_, f64> {
        self.t_year.view()
    }

    pub fn production(&self) -> ArrayView1<'_, f64> {
        self.production.view()
    }

    /// Largest observed production, zero for no observations
    pub fn max_production(&self) -> f64 {
        self.production.iter().copied().fold(0.0, f64::max)
    }
}

/// Data block of the model declaration
///
/// `N` is declared explicitly and must agree with both sequences.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ModelData {
    #[serde(rename = "N")]
    pub n: usize,
    pub production: Vec<f64>,
    pub t_year: Vec<f64>,
}

impl TryFrom<ModelData> for Observations {
    type Error = InputError;

    fn try_from(data: ModelData) -> Result<Self, Self::Error> {
        if data.n != data.t_year.len() || data.n != data.production.len() {
            return Err(InputError::LengthMismatch {
                declared: data.n,
                t_year: data.t_year.len(),
                production: data.production.len(),
            });
        }
        Self::new(data.t_year.into(), data.production.into())
    }
}

impl From<&Observations> for ModelData {
    fn from(observations: &Observations) -> Self {
        Self {
            n: observations.len(),
            production: observations.production.to_vec(),
            t_year: observations.t_year.to_vec(),
        }
    }
}
