pub mod ln_prior;
pub use ln_prior::ModelPriors;

pub mod ln_prior_1d;
pub use ln_prior_1d::{LnPrior1D, LnPrior1DTrait};

pub mod weather;
pub use weather::WeatherEffectPrior;
