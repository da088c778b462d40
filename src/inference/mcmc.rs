use crate::error::{ConfigError, Error, SamplerError};
use crate::inference::config::SamplerConfig;
use crate::inference::draws::{ChainDraws, PosteriorDraws};
use crate::model::density::SolarModel;
use crate::model::parameters::{NPARAMS, Parameters};

use emcee::{EnsembleSampler, Guess, Prob};
use emcee_rand::distributions::{IndependentSample, Normal};
use emcee_rand::{Rng, SeedableRng, StdRng};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Acceptance fraction below which a chain is reported as poorly mixing
const LOW_ACCEPTANCE: f64 = 0.05;

/// Attempts to scatter a single walker into a region of finite density
const WALKER_INIT_ATTEMPTS: usize = 100;

/// Margin of the saturation limit over the largest observation for the default initial point
const INIT_LIMIT_MARGIN: f64 = 0.05;

/// emcee view of the model, the sampler moves in unconstrained coordinates
struct EmceeModel<'a> {
    model: &'a SolarModel,
}

impl EmceeModel<'_> {
    fn unconstrained(guess: &Guess) -> [f64; NPARAMS] {
        let mut u = [f64::NAN; NPARAMS];
        u.iter_mut()
            .zip(guess.values.iter())
            .for_each(|(u, &v)| *u = v as f64);
        u
    }
}

impl Prob for EmceeModel<'_> {
    fn lnlike(&self, params: &Guess) -> f32 {
        let params = self.model.constrain(&Self::unconstrained(params));
        self.model.ln_likelihood(&params) as f32
    }

    fn lnprior(&self, params: &Guess) -> f32 {
        let u = Self::unconstrained(params);
        let ln_jacobian: f64 = u
            .iter()
            .zip(self.model.parameter_specs())
            .map(|(&u, spec)| spec.domain.ln_jacobian(u))
            .sum();
        let ln_prior = self.model.ln_prior(&self.model.constrain(&u)) + ln_jacobian;
        if ln_prior.is_nan() {
            f32::NEG_INFINITY
        } else {
            ln_prior as f32
        }
    }
}

/// Initial point shared by all chains
///
/// A user-supplied point is used as is. The default point has its saturation limit raised above
/// the largest observation, otherwise the first summer day would reject it.
fn initial_point(model: &SolarModel, config: &SamplerConfig) -> Result<Parameters, ConfigError> {
    let init = match config.init() {
        Some(init) => *init,
        None => {
            let mut init = Parameters::default_init(model.config().saturation());
            let max_production = model.observations().max_production();
            let required_increase = max_production * (1.0 + INIT_LIMIT_MARGIN)
                - model.config().saturation_limit_baseline();
            if required_increase > init.saturation_limit_increase {
                info!(
                    from = init.saturation_limit_increase,
                    to = required_increase,
                    max_production,
                    "raising initial saturation limit increase above observed production"
                );
                init.saturation_limit_increase = required_increase;
            }
            init
        }
    };
    for (spec, value) in model.parameter_specs().iter().zip(init.to_array()) {
        if spec.domain.unconstrain(value).is_none() {
            return Err(ConfigError::InitOutsideDomain {
                parameter: spec.name,
                value,
            });
        }
    }
    Ok(init)
}

fn chain_rng(seed: Option<u64>, chain: usize) -> StdRng {
    let base = match seed {
        Some(seed) => seed as usize,
        None => emcee_rand::thread_rng().r#gen::<usize>(),
    };
    StdRng::from_seed(&[base, chain][..])
}

/// Scatter walkers around `u0`, every walker must have a finite density
fn initial_walkers(
    prob: &EmceeModel,
    u0: &[f64; NPARAMS],
    jitter: f64,
    walkers: usize,
    chain: usize,
    rng: &mut StdRng,
) -> Result<Vec<Guess>, SamplerError> {
    let normal = Normal::new(0.0, jitter);
    (0..walkers)
        .map(|_| {
            (0..WALKER_INIT_ATTEMPTS)
                .map(|_| Guess {
                    values: u0
                        .iter()
                        .map(|&u| (u + normal.ind_sample(&mut *rng)) as f32)
                        .collect(),
                })
                .find(|guess| prob.lnprob(guess).is_finite())
                .ok_or(SamplerError::WalkerInitialization { chain, walkers })
        })
        .collect()
}

#[tracing::instrument(skip(model, config, u0), fields(walkers = config.walkers()))]
fn run_chain(
    model: &SolarModel,
    config: &SamplerConfig,
    u0: &[f64; NPARAMS],
    chain: usize,
) -> Result<ChainDraws, Error> {
    let prob = EmceeModel { model };
    let walkers = config.walkers();
    let mut rng = chain_rng(config.seed(), chain);
    let guesses = initial_walkers(&prob, u0, config.init_jitter(), walkers, chain, &mut rng)?;

    let mut sampler =
        EnsembleSampler::new(walkers, NPARAMS, &prob).map_err(|e| SamplerError::Ensemble {
            chain,
            message: e.to_string(),
        })?;
    sampler.seed(&[rng.r#gen::<usize>(), chain]);

    let draws = config.draws();
    let mut positions: Vec<f64> = Vec::with_capacity(draws * NPARAMS);
    let mut step_index = 0;
    sampler
        .sample(&guesses, config.iterations(), |step| {
            step_index += 1;
            if step_index <= config.warmup() || (step_index - config.warmup()) % config.thin() != 0
            {
                return;
            }
            for guess in step.pos.iter() {
                if positions.len() == draws * NPARAMS {
                    break;
                }
                let u = EmceeModel::unconstrained(guess);
                positions.extend(model.constrain(&u).to_array());
            }
        })
        .map_err(|e| SamplerError::Ensemble {
            chain,
            message: e.to_string(),
        })?;

    let acceptance = sampler.acceptance_fraction();
    let acceptance_fraction =
        acceptance.iter().map(|&a| a as f64).sum::<f64>() / acceptance.len().max(1) as f64;

    let n = positions.len() / NPARAMS;
    let draws = Array2::from_shape_vec((n, NPARAMS), positions).map_err(|e| {
        SamplerError::Ensemble {
            chain,
            message: e.to_string(),
        }
    })?;
    let mut chain_draws = ChainDraws {
        chain,
        draws,
        ln_posterior: Array1::zeros(n),
        acceptance_fraction,
    };
    chain_draws.ln_posterior = chain_draws
        .parameters()
        .map(|params| model.ln_posterior(&params))
        .collect();

    if acceptance_fraction < LOW_ACCEPTANCE {
        warn!(chain, acceptance_fraction, "low acceptance, chain may be stuck");
    }
    debug!(chain, draws = n, acceptance_fraction, "chain finished");
    Ok(chain_draws)
}

/// Sample the posterior of `model`, one emcee ensemble per chain
///
/// Chains run in parallel on the rayon thread pool and are returned in chain order. An initial
/// point with a non-finite density is reported before any sampling is done.
#[tracing::instrument(skip_all, fields(chains = config.chains(), observations = model.observations().len()))]
pub fn sample(model: &SolarModel, config: &SamplerConfig) -> Result<PosteriorDraws, Error> {
    config.validate()?;
    let init = initial_point(model, config)?;
    // Chains share the initial point, so it is checked once and reported for the first chain
    if !model.ln_posterior(&init).is_finite() {
        return Err(SamplerError::InitialPointRejected {
            chain: 0,
            observation: model.rejecting_observation(&init),
        }
        .into());
    }
    let u0 = model
        .unconstrain(&init)
        .ok_or(SamplerError::InitialPointRejected {
            chain: 0,
            observation: None,
        })?;
    info!(
        warmup = config.warmup(),
        draws = config.draws(),
        thin = config.thin(),
        "starting MCMC"
    );
    let chains = (0..config.chains())
        .into_par_iter()
        .map(|chain| run_chain(model, config, &u0, chain))
        .collect::<Result<Vec<_>, _>>()?;
    info!(draws = chains.iter().map(ChainDraws::len).sum::<usize>(), "MCMC finished");
    Ok(PosteriorDraws::new(model.parameter_names(), chains))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelConfig;
    use crate::tests::*;

    fn quick_config() -> SamplerConfig {
        SamplerConfig::new()
            .with_chains(2)
            .with_warmup(20)
            .with_draws(40)
            .with_walkers(16)
            .with_seed(0)
    }

    #[test]
    fn draws_have_requested_shape() {
        let model = SolarModel::new(ModelConfig::soft_min(), scenario_observations()).unwrap();
        let draws = sample(&model, &quick_config()).unwrap();
        assert_eq!(draws.chains().len(), 2);
        for (i, chain) in draws.chains().iter().enumerate() {
            assert_eq!(chain.chain(), i);
            assert_eq!(chain.draws().dim(), (40, NPARAMS));
            assert!(chain.ln_posterior().iter().all(|lp| lp.is_finite()));
            assert!((0.0..=1.0).contains(&chain.acceptance_fraction()));
        }
        assert_eq!(draws.parameter("min").unwrap().len(), 80);
    }

    #[test]
    fn draws_stay_inside_domains() {
        let model = SolarModel::new(ModelConfig::tanh(), scenario_observations()).unwrap();
        let draws = sample(&model, &quick_config()).unwrap();
        for params in draws.parameters() {
            for (spec, x) in model.parameter_specs().iter().zip(params.to_array()) {
                assert!(spec.domain.contains(x), "{} = {x}", spec.name);
            }
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let model = SolarModel::new(ModelConfig::soft_min(), scenario_observations()).unwrap();
        let a = sample(&model, &quick_config()).unwrap();
        let b = sample(&model, &quick_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn default_init_clears_the_largest_observation() {
        let observations = Observations::new(array![0.0, 0.5], array![20.0, 60.0]).unwrap();
        let model = SolarModel::new(ModelConfig::soft_min(), observations).unwrap();
        let init = initial_point(&model, &quick_config()).unwrap();
        assert!(model.saturation_limit(&init) > 60.0);
        assert!(model.ln_posterior(&init).is_finite());
    }

    #[test]
    fn rejected_initial_point_names_observation() {
        let observations = Observations::new(array![0.0, 0.5], array![20.0, 60.0]).unwrap();
        let model = SolarModel::new(ModelConfig::soft_min(), observations).unwrap();
        let config = quick_config().with_init(scenario_parameters());
        assert_eq!(
            sample(&model, &config),
            Err(Error::Sampler(SamplerError::InitialPointRejected {
                chain: 0,
                observation: Some(1)
            }))
        );
    }

    #[test]
    fn initial_point_outside_domain() {
        let model = SolarModel::new(ModelConfig::tanh(), scenario_observations()).unwrap();
        let init = Parameters {
            saturation_control: 1.0,
            ..scenario_parameters()
        };
        assert_eq!(
            sample(&model, &quick_config().with_init(init)),
            Err(Error::Config(ConfigError::InitOutsideDomain {
                parameter: "saturation_sharpness",
                value: 1.0
            }))
        );
    }

    #[test]
    fn invalid_config_is_fatal() {
        let model = SolarModel::new(ModelConfig::soft_min(), scenario_observations()).unwrap();
        assert!(matches!(
            sample(&model, &quick_config().with_chains(0)),
            Err(Error::Config(ConfigError::InvalidChains(0)))
        ));
    }
}
