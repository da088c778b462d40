pub use synthetic::{
    SYNTHETIC_YEAR, SYNTHETIC_YEAR_PARAMETERS, SyntheticYear, synthetic_days, synthetic_year,
};

mod synthetic;
