/// Error returned when observations can't be turned into model data
///
/// These are detected before inference starts and are always fatal.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("declared N = {declared} doesn't match t_year length {t_year} and production length {production}")]
    LengthMismatch {
        declared: usize,
        t_year: usize,
        production: usize,
    },

    #[error("production[{index}] = {value} must be finite and non-negative")]
    InvalidProduction { index: usize, value: f64 },

    #[error("t_year[{index}] = {value} is outside of [0, 1)")]
    YearFractionOutOfRange { index: usize, value: f64 },
}

/// Error returned from configuration validation
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("number of chains must be at least 1, got {0}")]
    InvalidChains(usize),

    #[error("number of draws must be at least 1, got {0}")]
    InvalidDraws(usize),

    #[error("thinning interval must be at least 1, got {0}")]
    InvalidThin(usize),

    #[error("number of walkers must be even and at least {minimum}, got {actual}")]
    InvalidWalkers { actual: usize, minimum: usize },

    #[error("initial jitter must be positive and finite, got {0}")]
    InvalidJitter(f64),

    #[error("prior of {parameter} is invalid: {reason}")]
    InvalidPrior {
        parameter: &'static str,
        reason: String,
    },

    #[error("clear-sky weight must be inside (0, 1), got {0}")]
    InvalidMixingWeight(f64),

    #[error("saturation limit baseline must be positive and finite, got {0}")]
    InvalidBaseline(f64),

    #[error("reference grid must have at least one day")]
    EmptyReferenceGrid,

    #[error("initial value of {parameter} = {value} is outside of its domain")]
    InitOutsideDomain { parameter: &'static str, value: f64 },
}

/// Error returned from the MCMC driver
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SamplerError {
    #[error("log-posterior is not finite at the initial point of chain {chain}{}", observation_hint(.observation))]
    InitialPointRejected {
        chain: usize,
        observation: Option<usize>,
    },

    #[error("could not find {walkers} distinct walker positions with finite density for chain {chain}")]
    WalkerInitialization { chain: usize, walkers: usize },

    #[error("ensemble sampler failed in chain {chain}: {message}")]
    Ensemble { chain: usize, message: String },
}

fn observation_hint(observation: &Option<usize>) -> String {
    match observation {
        Some(i) => format!(", first rejecting observation is #{i}"),
        None => String::new(),
    }
}

/// Any error of this crate
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sampler(#[from] SamplerError),
}
