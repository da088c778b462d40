use crate::model::domain::Domain;
use crate::transforms::{Saturation, SaturationTrait};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of inferred parameters
pub const NPARAMS: usize = 7;

/// One realization of the model unknowns
///
/// The canonical order, used by [Parameters::to_array] and by every per-parameter array of
/// this crate, is the field order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Parameters {
    /// Available energy on the shortest cloudless day
    pub min: f64,
    /// Difference of available energy between the longest and the shortest day
    pub amplitude: f64,
    /// Offset of the day of peak production, radians
    pub phase: f64,
    pub beta_c1: f64,
    pub beta_s1: f64,
    /// Excess of the saturation limit over its fixed baseline
    pub saturation_limit_increase: f64,
    /// Smoothness or sharpness of the saturation, depending on the family
    pub saturation_control: f64,
}

impl Parameters {
    pub fn to_array(&self) -> [f64; NPARAMS] {
        [
            self.min,
            self.amplitude,
            self.phase,
            self.beta_c1,
            self.beta_s1,
            self.saturation_limit_increase,
            self.saturation_control,
        ]
    }

    pub fn from_array(x: &[f64; NPARAMS]) -> Self {
        let [
            min,
            amplitude,
            phase,
            beta_c1,
            beta_s1,
            saturation_limit_increase,
            saturation_control,
        ] = *x;
        Self {
            min,
            amplitude,
            phase,
            beta_c1,
            beta_s1,
            saturation_limit_increase,
            saturation_control,
        }
    }

    /// Default starting point of the sampler for the given saturation family
    pub fn default_init(saturation: &Saturation) -> Self {
        let saturation_control = match saturation {
            Saturation::SoftMin(_) => 5.0,
            Saturation::Tanh(_) => 0.5,
        };
        Self {
            min: 20.0,
            amplitude: 40.0,
            phase: 0.17,
            beta_c1: 0.0,
            beta_s1: 0.0,
            saturation_limit_increase: 1.0,
            saturation_control,
        }
    }
}

/// Name and support of a single parameter
#[derive(Clone, Copy, Debug, Serialize, JsonSchema, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub domain: Domain,
}

/// Names and domains of all parameters in the canonical order
///
/// Only the saturation control depends on the family.
pub fn parameter_specs(saturation: &Saturation) -> [ParameterSpec; NPARAMS] {
    [
        ParameterSpec {
            name: "min",
            domain: Domain::Positive,
        },
        ParameterSpec {
            name: "amplitude",
            domain: Domain::Positive,
        },
        ParameterSpec {
            name: "phase",
            domain: Domain::Interval {
                lower: -PI,
                upper: PI,
            },
        },
        ParameterSpec {
            name: "beta_c1",
            domain: Domain::Real,
        },
        ParameterSpec {
            name: "beta_s1",
            domain: Domain::Real,
        },
        ParameterSpec {
            name: "saturation_limit_increase",
            domain: Domain::Positive,
        },
        ParameterSpec {
            name: saturation.control_name(),
            domain: saturation.control_domain(),
        },
    ]
}
