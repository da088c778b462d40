use crate::math::{logistic, logit, softplus};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Support of a model parameter
///
/// The sampler works with unconstrained values `u`, [Domain::constrain] maps them into the
/// support, so invalid regions can't be proposed at all. The change of variables contributes
/// [Domain::ln_jacobian] to the log-density.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub enum Domain {
    Real,
    /// `(0, ∞)`, `x = exp(u)`
    Positive,
    /// `[lower, upper]`, `x = lower + (upper - lower) logistic(u)`
    Interval { lower: f64, upper: f64 },
}

impl Domain {
    pub fn contains(&self, x: f64) -> bool {
        match *self {
            Self::Real => x.is_finite(),
            Self::Positive => x > 0.0 && x.is_finite(),
            Self::Interval { lower, upper } => (lower..=upper).contains(&x),
        }
    }

    #[inline]
    pub fn constrain(&self, u: f64) -> f64 {
        match *self {
            Self::Real => u,
            Self::Positive => f64::exp(u),
            Self::Interval { lower, upper } => lower + (upper - lower) * logistic(u),
        }
    }

    /// Inverse of [Domain::constrain], `None` outside of the open support
    pub fn unconstrain(&self, x: f64) -> Option<f64> {
        let u = match *self {
            Self::Real => x,
            Self::Positive => f64::ln(x),
            Self::Interval { lower, upper } => logit((x - lower) / (upper - lower)),
        };
        u.is_finite().then_some(u)
    }

    /// `ln |dx/du|`
    #[inline]
    pub fn ln_jacobian(&self, u: f64) -> f64 {
        match *self {
            Self::Real => 0.0,
            Self::Positive => u,
            Self::Interval { lower, upper } => {
                f64::ln(upper - lower) - softplus(u) - softplus(-u)
            }
        }
    }
}

pub(crate) fn within_domains<const NPARAMS: usize>(
    x: &[f64; NPARAMS],
    domains: &[Domain; NPARAMS],
) -> bool {
    x.iter()
        .zip(domains.iter())
        .all(|(&x, domain)| domain.contains(x))
}
