#![doc = include_str!("../README.md")]


mod error;
pub use error::{ConfigError, Error, InputError, SamplerError};

pub mod inference;
pub use inference::{PosteriorDraws, SamplerConfig, sample};

mod math;

pub mod model;
pub use model::{ModelConfig, ModelData, Observations, Parameters, SolarModel};

pub mod prior;
pub use prior::{LnPrior1D, ModelPriors, WeatherEffectPrior};

mod sorted_array;

pub mod summary;
pub use summary::{DrawRecord, PosteriorSummary};

pub mod transforms;
pub use transforms::{Saturation, SaturationTrait};

pub use ndarray;
