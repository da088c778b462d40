use ndarray::{Array1, ArrayView1};
use std::f64::consts::TAU;

/// Angle of the annual cycle at year fraction `t_year`: `2π t_year + phase`
#[inline]
pub fn instantaneous_phase(t_year: f64, phase: f64) -> f64 {
    TAU * t_year + phase
}

/// [instantaneous_phase] over a sequence of days
pub fn instantaneous_phases(t_year: ArrayView1<f64>, phase: f64) -> Array1<f64> {
    t_year.mapv(|t| instantaneous_phase(t, phase))
}

/// Normalized shape of the annual curve
///
/// `0.5 (1 + cos(φ + β_c1 cos φ + β_s1 sin φ))`. The betas distort the sinusoid, the result
/// is in `[0, 1]` for any phase. It is not clamped, a pure cosine of any argument stays
/// in the unit interval anyway.
#[inline]
pub fn seasonal_oscillation(phi: f64, beta_c1: f64, beta_s1: f64) -> f64 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    0.5 * (1.0 + f64::cos(phi + beta_c1 * cos_phi + beta_s1 * sin_phi))
}

/// Energy available on a cloudless day before clipping
#[inline]
pub fn available_energy(min: f64, amplitude: f64, oscillation: f64) -> f64 {
    min + amplitude * oscillation
}
