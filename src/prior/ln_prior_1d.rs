use crate::math::{ln_bessel_i0, ln_gamma, log_sum_exp_iter};

use enum_dispatch::enum_dispatch;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[enum_dispatch]
pub trait LnPrior1DTrait: Clone + Debug + Serialize + DeserializeOwned + PartialEq {
    /// Evaluate the natural logarithm of the prior density at x
    fn ln_prior_1d(&self, x: f64) -> f64;

    /// Check that hyperparameters describe a proper distribution
    fn validate(&self) -> Result<(), String>;
}

/// Natural logarithm of prior for a single model parameter
#[enum_dispatch(LnPrior1DTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum LnPrior1D {
    Normal(NormalLnPrior1D),
    LogNormal(LogNormalLnPrior1D),
    Uniform(UniformLnPrior1D),
    Gamma(GammaLnPrior1D),
    Beta(BetaLnPrior1D),
    VonMises(VonMisesLnPrior1D),
    Mix(MixLnPrior1D),
}

impl LnPrior1D {
    pub fn normal(mu: f64, std: f64) -> Self {
        NormalLnPrior1D::new(mu, std).into()
    }

    pub fn log_normal(mu: f64, std: f64) -> Self {
        LogNormalLnPrior1D::new(mu, std).into()
    }

    pub fn uniform(left: f64, right: f64) -> Self {
        UniformLnPrior1D::new(left, right).into()
    }

    pub fn gamma(shape: f64, rate: f64) -> Self {
        GammaLnPrior1D::new(shape, rate).into()
    }

    /// Gamma distribution with the given mean and standard deviation
    pub fn gamma_from_moments(mean: f64, std: f64) -> Self {
        GammaLnPrior1D::from_moments(mean, std).into()
    }

    pub fn beta(alpha: f64, beta: f64) -> Self {
        BetaLnPrior1D::new(alpha, beta).into()
    }

    pub fn von_mises(mu: f64, kappa: f64) -> Self {
        VonMisesLnPrior1D::new(mu, kappa).into()
    }

    pub fn mix(weight_prior_pairs: &[(f64, LnPrior1D)]) -> Self {
        MixLnPrior1D::new(weight_prior_pairs).into()
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{name} must be finite, got {value}"))
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), String> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(format!("{name} must be positive and finite, got {value}"))
    }
}

const LN_SQRT_TAU: f64 = 0.918_938_533_204_672_8;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NormalLnPrior1D {
    pub mu: f64,
    pub std: f64,
}

impl NormalLnPrior1D {
    pub fn new(mu: f64, std: f64) -> Self {
        Self { mu, std }
    }
}

impl LnPrior1DTrait for NormalLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.std;
        -0.5 * z * z - f64::ln(self.std) - LN_SQRT_TAU
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("mu", self.mu)?;
        check_positive("std", self.std)
    }
}

/// Log-normal distribution, `mu` and `std` are of `ln x`
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LogNormalLnPrior1D {
    pub mu: f64,
    pub std: f64,
}

impl LogNormalLnPrior1D {
    pub fn new(mu: f64, std: f64) -> Self {
        Self { mu, std }
    }
}

impl LnPrior1DTrait for LogNormalLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let ln_x = f64::ln(x);
        let z = (ln_x - self.mu) / self.std;
        -0.5 * z * z - f64::ln(self.std) - LN_SQRT_TAU - ln_x
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("mu", self.mu)?;
        check_positive("std", self.std)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UniformLnPrior1D {
    pub range: std::ops::RangeInclusive<f64>,
}

impl UniformLnPrior1D {
    pub fn new(left: f64, right: f64) -> Self {
        Self { range: left..=right }
    }
}

impl LnPrior1DTrait for UniformLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        if self.range.contains(&x) {
            -f64::ln(self.range.end() - self.range.start())
        } else {
            f64::NEG_INFINITY
        }
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("left", *self.range.start())?;
        check_finite("right", *self.range.end())?;
        if self.range.start() < self.range.end() {
            Ok(())
        } else {
            Err("right must be larger than left".into())
        }
    }
}

/// Gamma distribution in the shape-rate parameterization
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GammaLnPrior1D {
    pub shape: f64,
    pub rate: f64,
}

impl GammaLnPrior1D {
    pub fn new(shape: f64, rate: f64) -> Self {
        Self { shape, rate }
    }

    /// Moment matching: `shape = (mean / std)^2`, `rate = mean / std^2`
    pub fn from_moments(mean: f64, std: f64) -> Self {
        Self::new((mean / std).powi(2), mean / std.powi(2))
    }

    pub fn mean(&self) -> f64 {
        self.shape / self.rate
    }

    pub fn std(&self) -> f64 {
        self.shape.sqrt() / self.rate
    }
}

impl LnPrior1DTrait for GammaLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        if x < 0.0 {
            return f64::NEG_INFINITY;
        }
        if x == 0.0 {
            return if self.shape == 1.0 {
                f64::ln(self.rate)
            } else if self.shape < 1.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        self.shape * f64::ln(self.rate) - ln_gamma(self.shape) + (self.shape - 1.0) * f64::ln(x)
            - self.rate * x
    }

    fn validate(&self) -> Result<(), String> {
        check_positive("shape", self.shape)?;
        check_positive("rate", self.rate)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BetaLnPrior1D {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaLnPrior1D {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    fn ln_norm(&self) -> f64 {
        ln_gamma(self.alpha + self.beta) - ln_gamma(self.alpha) - ln_gamma(self.beta)
    }
}

impl LnPrior1DTrait for BetaLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return f64::NEG_INFINITY;
        }
        // 0 * ln(0) is zero for the uniform edge
        let ln_edge = |power: f64, y: f64| if power == 0.0 { 0.0 } else { power * f64::ln(y) };
        self.ln_norm() + ln_edge(self.alpha - 1.0, x) + ln_edge(self.beta - 1.0, 1.0 - x)
    }

    fn validate(&self) -> Result<(), String> {
        check_positive("alpha", self.alpha)?;
        check_positive("beta", self.beta)
    }
}

/// von Mises distribution of an angle on `[-π, π]`
///
/// `ln p = κ cos(x - μ) - ln(2π I₀(κ))`, `κ` is the concentration around `μ`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VonMisesLnPrior1D {
    pub mu: f64,
    pub kappa: f64,
}

impl VonMisesLnPrior1D {
    pub fn new(mu: f64, kappa: f64) -> Self {
        Self { mu, kappa }
    }
}

impl LnPrior1DTrait for VonMisesLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        self.kappa * f64::cos(x - self.mu) - f64::ln(std::f64::consts::TAU) - ln_bessel_i0(self.kappa)
    }

    fn validate(&self) -> Result<(), String> {
        check_finite("mu", self.mu)?;
        if self.kappa >= 0.0 && self.kappa.is_finite() {
            Ok(())
        } else {
            Err(format!(
                "kappa must be non-negative and finite, got {}",
                self.kappa
            ))
        }
    }
}

/// Mixture of priors, evaluated as log-sum-exp of `ln(weight) + ln p_i`
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MixLnPrior1D {
    mix: Vec<(f64, LnPrior1D)>,
}

impl MixLnPrior1D {
    /// Create MixLnPrior1D from pairs of a weight (positive number) and an instance of `LnPrior1D`
    ///
    /// Weights are normalized to unity sum.
    pub fn new(weight_prior_pairs: &[(f64, LnPrior1D)]) -> Self {
        let total_weight: f64 = weight_prior_pairs.iter().map(|(weight, _)| *weight).sum();
        Self {
            mix: weight_prior_pairs
                .iter()
                .map(|(weight, prior)| (*weight / total_weight, prior.clone()))
                .collect(),
        }
    }

    pub fn components(&self) -> &[(f64, LnPrior1D)] {
        &self.mix
    }
}

impl LnPrior1DTrait for MixLnPrior1D {
    fn ln_prior_1d(&self, x: f64) -> f64 {
        log_sum_exp_iter(
            self.mix
                .iter()
                .map(|(weight, prior)| f64::ln(*weight) + prior.ln_prior_1d(x)),
        )
    }

    fn validate(&self) -> Result<(), String> {
        if self.mix.is_empty() {
            return Err("mixture must have at least one component".into());
        }
        for (weight, prior) in &self.mix {
            check_positive("mixture weight", *weight)?;
            prior.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn integrate(prior: &LnPrior1D, left: f64, right: f64) -> f64 {
        const N: usize = 200_000;
        let h = (right - left) / N as f64;
        (0..N)
            .map(|i| left + (i as f64 + 0.5) * h)
            .map(|x| f64::exp(prior.ln_prior_1d(x)) * h)
            .sum()
    }

    #[test]
    fn densities_are_normalized() {
        let cases = [
            (LnPrior1D::normal(0.0, 0.5), -6.0, 6.0),
            (LnPrior1D::log_normal(1.0, 0.5), 0.0, 60.0),
            (LnPrior1D::uniform(-1.0, 3.0), -2.0, 4.0),
            (LnPrior1D::gamma_from_moments(20.0, 5.0), 0.0, 80.0),
            (LnPrior1D::gamma(5.0, 8.0), 0.0, 5.0),
            (LnPrior1D::beta(5.0, 2.0), 0.0, 1.0),
            (LnPrior1D::von_mises(0.17, 5.0), -PI, PI),
            (LnPrior1D::von_mises(0.0, 0.0), -PI, PI),
        ];
        for (prior, left, right) in cases {
            assert_relative_eq!(integrate(&prior, left, right), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn normal_reference_value() {
        // scipy.stats.norm(0, 0.5).logpdf(0.3)
        assert_relative_eq!(
            LnPrior1D::normal(0.0, 0.5).ln_prior_1d(0.3),
            -0.40579135264472743,
            epsilon = 1e-12
        );
    }

    #[test]
    fn gamma_reference_value() {
        // scipy.stats.gamma(5, scale=1/8).logpdf(0.6)
        assert_relative_eq!(
            LnPrior1D::gamma(5.0, 8.0).ln_prior_1d(0.6),
            0.37585138298727117,
            epsilon = 1e-10
        );
    }

    #[test]
    fn gamma_moments() {
        let g = GammaLnPrior1D::from_moments(20.0, 2.5);
        assert_relative_eq!(g.mean(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(g.std(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn supports() {
        assert_eq!(LnPrior1D::gamma(2.0, 1.0).ln_prior_1d(-1.0), f64::NEG_INFINITY);
        assert_eq!(LnPrior1D::gamma(5.0, 8.0).ln_prior_1d(0.0), f64::NEG_INFINITY);
        assert_eq!(LnPrior1D::beta(2.0, 2.0).ln_prior_1d(1.5), f64::NEG_INFINITY);
        assert_eq!(LnPrior1D::log_normal(0.0, 1.0).ln_prior_1d(0.0), f64::NEG_INFINITY);
        assert_eq!(LnPrior1D::uniform(0.0, 1.0).ln_prior_1d(2.0), f64::NEG_INFINITY);
        assert_relative_eq!(LnPrior1D::beta(1.0, 1.0).ln_prior_1d(0.0), 0.0);
    }

    #[test]
    fn von_mises_peaks_at_mu() {
        let prior = LnPrior1D::von_mises(0.17, 5.0);
        assert!(prior.ln_prior_1d(0.17) > prior.ln_prior_1d(0.5));
        assert!(prior.ln_prior_1d(0.17) > prior.ln_prior_1d(-0.2));
        assert_relative_eq!(
            prior.ln_prior_1d(0.17 + 2.0 * PI),
            prior.ln_prior_1d(0.17),
            epsilon = 1e-12
        );
    }

    #[test]
    fn mixture_equals_probability_space_mixture() {
        let a = LnPrior1D::gamma(5.0, 8.0);
        let b = LnPrior1D::gamma(180.0, 200.0);
        for &lambda in &[0.15, 0.25, 0.5] {
            let mix = LnPrior1D::mix(&[(1.0 - lambda, a.clone()), (lambda, b.clone())]);
            for &x in &[0.05, 0.3, 0.62, 0.9, 1.05] {
                let naive = f64::ln(
                    (1.0 - lambda) * f64::exp(a.ln_prior_1d(x))
                        + lambda * f64::exp(b.ln_prior_1d(x)),
                );
                assert_relative_eq!(mix.ln_prior_1d(x), naive, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn mixture_weights_are_normalized() {
        let mix = MixLnPrior1D::new(&[
            (2.0, LnPrior1D::normal(5.0, 1.0)),
            (6.0, LnPrior1D::normal(10.0, 1.0)),
        ]);
        let weights: Vec<_> = mix.components().iter().map(|(w, _)| *w).collect();
        assert_eq!(weights, [0.25, 0.75]);
    }

    #[test]
    fn mixture_far_in_the_tail_is_finite() {
        let mix = LnPrior1D::mix(&[
            (0.5, LnPrior1D::normal(0.0, 1.0)),
            (0.5, LnPrior1D::normal(1.0, 1.0)),
        ]);
        // Both components underflow in probability space
        assert!(mix.ln_prior_1d(100.0).is_finite());
    }

    #[test]
    fn validation() {
        assert!(LnPrior1D::gamma(0.0, 1.0).validate().is_err());
        assert!(LnPrior1D::normal(0.0, -1.0).validate().is_err());
        assert!(LnPrior1D::uniform(1.0, 1.0).validate().is_err());
        assert!(LnPrior1D::von_mises(0.0, f64::NAN).validate().is_err());
        assert!(LnPrior1D::mix(&[]).validate().is_err());
        assert!(
            LnPrior1D::mix(&[(1.0, LnPrior1D::beta(-1.0, 1.0))])
                .validate()
                .is_err()
        );
        assert!(LnPrior1D::beta(5.0, 2.0).validate().is_ok());
    }

    #[test]
    fn serialization_round_trip() {
        let prior = LnPrior1D::mix(&[
            (0.85, LnPrior1D::gamma(5.0, 8.0)),
            (0.15, LnPrior1D::gamma(180.0, 200.0)),
        ]);
        let json = serde_json::to_string(&prior).unwrap();
        let back: LnPrior1D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prior);
    }
}
