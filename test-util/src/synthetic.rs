use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use rand::distr::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Gamma;
use solar_yield_model::inference::{days_in_year, year_fraction};
use solar_yield_model::model::{ModelConfig, Observations, Parameters, SATURATION_LIMIT_BASELINE};
use solar_yield_model::prior::LnPrior1D;
use solar_yield_model::transforms::{
    available_energy, instantaneous_phase, seasonal_oscillation, SaturationTrait,
};

/// Daily production simulated from the generative model
#[derive(Clone, Debug)]
pub struct SyntheticYear {
    pub parameters: Parameters,
    pub config: ModelConfig,
    pub days: Vec<(NaiveDate, f64)>,
    pub weather_effect: Vec<f64>,
}

impl SyntheticYear {
    pub fn observations(&self) -> Observations {
        Observations::from_daily(self.days.iter().copied()).unwrap()
    }
}

fn gamma_sampler(prior: &LnPrior1D) -> Gamma<f64> {
    match prior {
        LnPrior1D::Gamma(gamma) => Gamma::new(gamma.shape, 1.0 / gamma.rate).unwrap(),
        _ => panic!("synthetic weather needs gamma mixture components"),
    }
}

/// `n` consecutive days starting at `start`
///
/// Weather effects are drawn from the configured gamma mixture, production is the saturated
/// weather-scaled available energy.
pub fn synthetic_days(
    parameters: &Parameters,
    config: &ModelConfig,
    start: NaiveDate,
    n: u64,
    seed: u64,
) -> SyntheticYear {
    let mut rng = StdRng::seed_from_u64(seed);
    let weather = config.weather_effect();
    let clear_sky = Bernoulli::new(weather.clear_sky_weight()).unwrap();
    let variable = gamma_sampler(weather.variable());
    let clear = gamma_sampler(weather.clear_sky());
    let limit = config.saturation_limit_baseline() + parameters.saturation_limit_increase;

    let (days, weather_effect) = (0..n)
        .map(|i| {
            let date = start + Days::new(i);
            let w = if clear_sky.sample(&mut rng) {
                clear.sample(&mut rng)
            } else {
                variable.sample(&mut rng)
            };
            let phi = instantaneous_phase(year_fraction(date), parameters.phase);
            let osc = seasonal_oscillation(phi, parameters.beta_c1, parameters.beta_s1);
            let energy = w * available_energy(parameters.min, parameters.amplitude, osc);
            let production =
                config
                    .saturation()
                    .saturation(energy, limit, parameters.saturation_control);
            ((date, production), w)
        })
        .unzip();
    SyntheticYear {
        parameters: *parameters,
        config: config.clone(),
        days,
        weather_effect,
    }
}

/// One calendar year of soft-min saturated production
pub fn synthetic_year(parameters: &Parameters, year: i32, seed: u64) -> SyntheticYear {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let n = days_in_year(start).into();
    synthetic_days(parameters, &ModelConfig::soft_min(), start, n, seed)
}

lazy_static! {
    /// Parameters behind [SYNTHETIC_YEAR]
    pub static ref SYNTHETIC_YEAR_PARAMETERS: Parameters = Parameters {
        min: 20.0,
        amplitude: 40.0,
        phase: 0.17,
        beta_c1: 0.1,
        beta_s1: -0.1,
        saturation_limit_increase: 52.0 - SATURATION_LIMIT_BASELINE,
        saturation_control: 4.0,
    };

    pub static ref SYNTHETIC_YEAR: SyntheticYear =
        synthetic_year(&SYNTHETIC_YEAR_PARAMETERS, 2023, 0);
}
