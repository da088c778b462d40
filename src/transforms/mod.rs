//! Pure transforms of the generative model
//!
//! Nothing here holds state, all functions are evaluated many times per sampler iteration.

pub mod saturation;
pub use saturation::{Saturation, SaturationTrait, SoftMinSaturation, TanhSaturation};

pub mod seasonal;
pub use seasonal::{
    available_energy, instantaneous_phase, instantaneous_phases, seasonal_oscillation,
};
