//! Generative model of daily solar production
//!
//! Production of a day is the saturated share of the seasonally varying available energy:
//! `production = saturation(weather_effect · E_available, limit, control)`. The model is
//! inverted on the observations, turning every production value into a weather effect which is
//! scored by [WeatherEffectPrior](crate::prior::WeatherEffectPrior).

pub mod config;
pub use config::{ModelConfig, REFERENCE_DAYS, SATURATION_LIMIT_BASELINE};

pub mod data;
pub use data::{ModelData, Observations};

pub mod density;
pub use density::SolarModel;

pub mod derived;
pub use derived::{DerivedQuantities, reference_grid};

pub mod domain;
pub use domain::Domain;

pub mod parameters;
pub use parameters::{NPARAMS, ParameterSpec, Parameters, parameter_specs};
