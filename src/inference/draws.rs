use crate::model::parameters::{NPARAMS, Parameters};

use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1, Axis, concatenate};
use serde::Serialize;

/// Retained draws of a single chain
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChainDraws {
    pub(crate) chain: usize,
    /// Constrained parameter values, one row per draw in the canonical parameter order
    pub(crate) draws: Array2<f64>,
    pub(crate) ln_posterior: Array1<f64>,
    /// Mean acceptance fraction of the ensemble walkers
    pub(crate) acceptance_fraction: f64,
}

impl ChainDraws {
    pub fn chain(&self) -> usize {
        self.chain
    }

    pub fn draws(&self) -> &Array2<f64> {
        &self.draws
    }

    pub fn ln_posterior(&self) -> ArrayView1<'_, f64> {
        self.ln_posterior.view()
    }

    pub fn acceptance_fraction(&self) -> f64 {
        self.acceptance_fraction
    }

    pub fn len(&self) -> usize {
        self.draws.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.nrows() == 0
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameters> + '_ {
        self.draws.rows().into_iter().map(|row| {
            let mut x = [0.0; NPARAMS];
            x.iter_mut().zip(row).for_each(|(x, &v)| *x = v);
            Parameters::from_array(&x)
        })
    }
}

/// Posterior draws of all chains, grouped by chain in chain order
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PosteriorDraws {
    parameter_names: [&'static str; NPARAMS],
    chains: Vec<ChainDraws>,
}

impl PosteriorDraws {
    pub fn new(parameter_names: [&'static str; NPARAMS], chains: Vec<ChainDraws>) -> Self {
        Self {
            parameter_names,
            chains,
        }
    }

    pub fn parameter_names(&self) -> &[&'static str; NPARAMS] {
        &self.parameter_names
    }

    pub fn chains(&self) -> &[ChainDraws] {
        &self.chains
    }

    /// Total number of draws
    pub fn len(&self) -> usize {
        self.chains.iter().map(ChainDraws::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All draws of a parameter, chains concatenated in order
    pub fn parameter(&self, name: &str) -> Option<Array1<f64>> {
        let (index, _) = self
            .parameter_names
            .iter()
            .find_position(|&&parameter| parameter == name)?;
        let columns = self
            .chains
            .iter()
            .map(|chain| chain.draws.column(index))
            .collect::<Vec<_>>();
        Some(concat_views(&columns))
    }

    pub fn ln_posterior(&self) -> Array1<f64> {
        let views = self
            .chains
            .iter()
            .map(|chain| chain.ln_posterior.view())
            .collect::<Vec<_>>();
        concat_views(&views)
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameters> + '_ {
        self.chains.iter().flat_map(ChainDraws::parameters)
    }
}

fn concat_views(views: &[ArrayView1<f64>]) -> Array1<f64> {
    if views.is_empty() {
        return Array1::zeros(0);
    }
    // Shapes of 1-D views always agree along the other axes
    concatenate(Axis(0), views).unwrap_or_else(|_| Array1::zeros(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    fn draws() -> PosteriorDraws {
        let names = [
            "min",
            "amplitude",
            "phase",
            "beta_c1",
            "beta_s1",
            "saturation_limit_increase",
            "saturation_smoothness",
        ];
        let chain = |chain: usize, offset: f64| ChainDraws {
            chain,
            draws: Array2::from_shape_fn((2, NPARAMS), |(i, j)| offset + (10 * i + j) as f64),
            ln_posterior: array![-offset, -offset - 1.0],
            acceptance_fraction: 0.3,
        };
        PosteriorDraws::new(names, vec![chain(0, 0.0), chain(1, 100.0)])
    }

    #[test]
    fn parameter_concatenates_chains_in_order() {
        let draws = draws();
        assert_eq!(draws.len(), 4);
        assert_eq!(
            draws.parameter("amplitude").unwrap(),
            array![1.0, 11.0, 101.0, 111.0]
        );
        assert_eq!(draws.ln_posterior(), array![-0.0, -1.0, -100.0, -101.0]);
        assert_eq!(draws.parameter("saturation_sharpness"), None);
    }

    #[test]
    fn parameters_follow_canonical_order() {
        let params: Vec<_> = draws().parameters().collect();
        assert_eq!(params.len(), 4);
        assert_eq!(params[1].min, 10.0);
        assert_eq!(params[1].saturation_control, 16.0);
        assert_eq!(params[2].phase, 102.0);
    }
}
