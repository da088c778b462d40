use crate::math::{log_diff_exp, log_sum_exp, log1m_exp};
use crate::model::domain::Domain;

use enum_dispatch::enum_dispatch;
use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Smooth inverter clipping `f(E)` and its exact inverse
///
/// Every implementation satisfies `f(0) = 0`, `f(E) <= E`, `f(E) < limit` and has a
/// non-increasing derivative not exceeding unity, so it is linear near zero and saturates for
/// large `E`.
#[enum_dispatch]
pub trait SaturationTrait {
    /// Realized energy after clipping of the available energy `energy`
    fn saturation(&self, energy: f64, limit: f64, control: f64) -> f64;

    /// Available energy which saturates to `saturated`
    ///
    /// `None` if `saturated >= limit`, since the forward map only approaches `limit`
    /// asymptotically.
    fn inv_saturation(&self, saturated: f64, limit: f64, control: f64) -> Option<f64>;

    /// Name of the control parameter of this family
    fn control_name(&self) -> &'static str;

    /// Domain of the control parameter, the sampler is never allowed to leave it
    fn control_domain(&self) -> Domain;
}

/// Family of the saturation function
#[enum_dispatch(SaturationTrait)]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Saturation {
    SoftMin(SoftMinSaturation),
    Tanh(TanhSaturation),
}

impl Saturation {
    pub fn soft_min() -> Self {
        SoftMinSaturation {}.into()
    }

    pub fn tanh() -> Self {
        TanhSaturation {}.into()
    }
}

impl Default for Saturation {
    fn default() -> Self {
        Self::soft_min()
    }
}

macro_const! {
    const SOFT_MIN_DOC: &str = r#"
Soft minimum of available energy and the saturation limit

With smoothness $s$ and $a = e^{-\gamma/s}$ for limit $\gamma$:

$$
e^{-f(E)/s} = a + (1 - a)\,e^{-E/s},
\quad
f(E) = -s \ln\left(e^{\ln(1-a) - E/s} + e^{-\gamma/s}\right),
$$

i.e. the log-sum-exp soft minimum $-s \ln(e^{-E/s} + e^{-\gamma/s})$ re-weighted to pass
through the origin. Smaller $s$ gives a sharper corner, $f'(0) = 1 - a$ is unity up to
$e^{-\gamma/s}$. Both directions are evaluated with `exp_m1` / `ln_1p`, which is the
log-sum-exp (forward) and log-diff-exp (inverse) form without cancellation. Far from the
origin, where the `ln_1p` argument approaches $-1$ and would underflow, the explicit
max-subtracted log-sum-exp and log-diff-exp are used instead.
"#;
}

#[doc = SOFT_MIN_DOC!()]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct SoftMinSaturation {}

impl SoftMinSaturation {
    pub const fn doc() -> &'static str {
        SOFT_MIN_DOC
    }
}

impl SaturationTrait for SoftMinSaturation {
    #[inline]
    fn saturation(&self, energy: f64, limit: f64, smoothness: f64) -> f64 {
        // 1 - a
        let weight = -f64::exp_m1(-limit / smoothness);
        let arg = weight * f64::exp_m1(-energy / smoothness);
        if arg > -0.5 {
            -smoothness * f64::ln_1p(arg)
        } else {
            -smoothness
                * log_sum_exp(
                    log1m_exp(-limit / smoothness) - energy / smoothness,
                    -limit / smoothness,
                )
        }
    }

    #[inline]
    fn inv_saturation(&self, saturated: f64, limit: f64, smoothness: f64) -> Option<f64> {
        if !(saturated < limit) {
            return None;
        }
        let weight = -f64::exp_m1(-limit / smoothness);
        let arg = f64::exp_m1(-saturated / smoothness) / weight;
        let energy = if arg > -0.5 {
            -smoothness * f64::ln_1p(arg)
        } else {
            -smoothness
                * (log_diff_exp(-saturated / smoothness, -limit / smoothness)
                    - log1m_exp(-limit / smoothness))
        };
        energy.is_finite().then_some(energy)
    }

    fn control_name(&self) -> &'static str {
        "saturation_smoothness"
    }

    fn control_domain(&self) -> Domain {
        Domain::Positive
    }
}

macro_const! {
    const TANH_DOC: &str = r#"
Hyperbolic saturation with bounded sharpness

With sharpness $\sigma \in (0, 1)$ and limit $\gamma$ the smoothness is
$c = \gamma / (\sqrt{2}\sigma)$ and

$$
f(E) = \gamma \tanh\left(\frac{c}{\gamma} \sinh\frac{E}{c}\right).
$$

$f(0) = 0$ and $f'(0) = 1$ hold for any $\sigma$, while $\gamma / c \le \sqrt{2}$ keeps the
derivative from exceeding unity away from zero. That's why $\sigma$ lives in $(0, 1)$ by
construction of the parameter space rather than through its prior.
"#;
}

#[doc = TANH_DOC!()]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct TanhSaturation {}

impl TanhSaturation {
    pub const fn doc() -> &'static str {
        TANH_DOC
    }

    #[inline]
    fn smoothness(limit: f64, sharpness: f64) -> f64 {
        limit / (std::f64::consts::SQRT_2 * sharpness)
    }
}

impl SaturationTrait for TanhSaturation {
    #[inline]
    fn saturation(&self, energy: f64, limit: f64, sharpness: f64) -> f64 {
        let c = Self::smoothness(limit, sharpness);
        limit * f64::tanh(c * f64::sinh(energy / c) / limit)
    }

    #[inline]
    fn inv_saturation(&self, saturated: f64, limit: f64, sharpness: f64) -> Option<f64> {
        if !(saturated < limit) {
            return None;
        }
        let c = Self::smoothness(limit, sharpness);
        let energy = c * f64::asinh(limit * f64::atanh(saturated / limit) / c);
        energy.is_finite().then_some(energy)
    }

    fn control_name(&self) -> &'static str {
        "saturation_sharpness"
    }

    fn control_domain(&self) -> Domain {
        Domain::Interval {
            lower: 0.0,
            upper: 1.0,
        }
    }
}
