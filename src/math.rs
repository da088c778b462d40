//! Log-space arithmetic shared by the saturation transforms, priors and mixtures.

/// `ln(exp(a) + exp(b))` without overflow
#[inline]
pub fn log_sum_exp(a: f64, b: f64) -> f64 {
    let max = f64::max(a, b);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    max + f64::ln_1p(f64::exp(-(a - b).abs()))
}

/// `ln(sum(exp(x_i)))` over an arbitrary number of terms
pub fn log_sum_exp_iter(terms: impl IntoIterator<Item = f64> + Clone) -> f64 {
    let max = terms.clone().into_iter().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + f64::ln(terms.into_iter().map(|x| f64::exp(x - max)).sum::<f64>())
}

/// `ln(exp(a) - exp(b))`, NaN if `a < b` and `-inf` if `a == b`
#[inline]
pub fn log_diff_exp(a: f64, b: f64) -> f64 {
    if b > a {
        return f64::NAN;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    a + log1m_exp(b - a)
}

/// `ln(1 - exp(x))` for `x <= 0`
#[inline]
pub fn log1m_exp(x: f64) -> f64 {
    // Mächler (2012): switch between the two forms at -ln 2
    if x > -std::f64::consts::LN_2 {
        f64::ln(-f64::exp_m1(x))
    } else {
        f64::ln_1p(-f64::exp(x))
    }
}

/// `ln(1 + exp(x))`
#[inline]
pub fn softplus(x: f64) -> f64 {
    f64::max(x, 0.0) + f64::ln_1p(f64::exp(-x.abs()))
}

#[inline]
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        (1.0 + f64::exp(-x)).recip()
    } else {
        let e = f64::exp(x);
        e / (1.0 + e)
    }
}

/// `ln(x / (1 - x))`
#[inline]
pub fn logit(x: f64) -> f64 {
    f64::ln(x) - f64::ln_1p(-x)
}

#[inline]
pub fn ln_gamma(x: f64) -> f64 {
    libm::lgamma(x)
}

/// Natural logarithm of the modified Bessel function of the first kind of order zero
///
/// Polynomial approximations 9.8.1 and 9.8.2 of Abramowitz & Stegun, relative error is below
/// 2e-7. The large-argument branch is evaluated in log space, so it doesn't overflow.
pub fn ln_bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax <= 3.75 {
        let t = (ax / 3.75).powi(2);
        let p = 1.0
            + t * (3.5156229
                + t * (3.0899424
                    + t * (1.2067492 + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))));
        f64::ln(p)
    } else {
        let t = 3.75 / ax;
        let p = 0.39894228
            + t * (0.01328592
                + t * (0.00225319
                    + t * (-0.00157565
                        + t * (0.00916281
                            + t * (-0.02057706
                                + t * (0.02635537 + t * (-0.01647633 + t * 0.00392377)))))));
        ax - 0.5 * f64::ln(ax) + f64::ln(p)
    }
}
