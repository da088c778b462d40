//! MCMC inference of the model parameters
//!
//! The sampler itself is the [emcee] ensemble sampler, this module prepares the data, scatters
//! the walkers, runs independent chains and collects their draws.

pub mod calendar;
pub use calendar::{days_in_year, year_fraction};

pub mod config;
pub use config::{MIN_WALKERS, SamplerConfig};

pub mod draws;
pub use draws::{ChainDraws, PosteriorDraws};

pub mod mcmc;
pub use mcmc::sample;
