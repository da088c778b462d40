use ndarray::{Array1, ArrayView1};
use std::ops::Deref;

/// Finite sample values in ascending order, NaN values are dropped on construction
#[derive(Clone, Debug, PartialEq)]
pub struct SortedArray(Array1<f64>);

impl SortedArray {
    pub fn maximum(&self) -> Option<f64> {
        self.last().copied()
    }

    pub fn minimum(&self) -> Option<f64> {
        self.first().copied()
    }

    pub fn median(&self) -> Option<f64> {
        self.ppf(0.5)
    }

    // R-5 from https://en.wikipedia.org/wiki/Quantile
    pub fn ppf(&self, q: f64) -> Option<f64> {
        if self.is_empty() || !(0.0..=1.0).contains(&q) {
            return None;
        }
        let h = (self.len() as f64) * q - 0.5;
        let h_floor = h.floor();
        if h_floor < 0.0 {
            return self.minimum();
        }
        let i = h_floor as usize;
        if i >= self.len() - 1 {
            self.maximum()
        } else {
            Some(self[i] + (h - h_floor) * (self[i + 1] - self[i]))
        }
    }
}

impl From<Vec<f64>> for SortedArray {
    fn from(mut v: Vec<f64>) -> Self {
        v.retain(|x| !x.is_nan());
        v.sort_unstable_by(f64::total_cmp);
        Self(Array1::from_vec(v))
    }
}

impl From<ArrayView1<'_, f64>> for SortedArray {
    fn from(v: ArrayView1<'_, f64>) -> Self {
        v.to_vec().into()
    }
}

impl Deref for SortedArray {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        // Built from a Vec, so always contiguous
        self.0.as_slice().unwrap_or(&[])
    }
}
