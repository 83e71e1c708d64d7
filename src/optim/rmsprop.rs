//! # RMSProp
//!
//! AdaGrad with a leaky sum: `s = γ·s_last + (1−γ)·g²`,
//! `d_i = −g_i / (√s_i + ε)`, step along `d` from the stepsize search.

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::OptimResult;
use crate::functor::{Functor, Scalar};
use crate::params::RmsPropParams;
use crate::stepsize::{FixedStepParams, StepsizeSearchParams};
use ndarray::{Array1, Zip};

#[derive(Debug, Clone, Default)]
pub struct RmsProp {
    s: Array1<Scalar>,
    s_last: Array1<Scalar>,
}

pub type RmsPropOptimizer<'a, F> = LineSearchOptimizer<'a, F, RmsProp>;

impl RmsProp {
    pub fn squared_gradient_average(&self) -> &Array1<Scalar> {
        &self.s_last
    }
}

impl<F: Functor> UpdateRule<F> for RmsProp {
    type Params = RmsPropParams;

    fn name(&self) -> &'static str {
        "rmsprop"
    }

    fn default_stepsize_search(&self, params: &RmsPropParams) -> StepsizeSearchParams {
        StepsizeSearchParams::Fixed(FixedStepParams { step: params.alpha })
    }

    fn reset(&mut self, dim: usize) {
        self.s = Array1::zeros(dim);
        self.s_last = Array1::zeros(dim);
    }

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &RmsPropParams,
    ) -> OptimResult<Array1<Scalar>> {
        let gamma = params.gamma;
        Zip::from(&mut self.s)
            .and(&self.s_last)
            .and(step.g)
            .for_each(|s, &s_last, &g| *s = gamma * s_last + (1.0 - gamma) * g * g);

        let d = Zip::from(step.g)
            .and(&self.s)
            .map_collect(|&g, &s| -g / (s.sqrt() + params.epsilon));

        step.search_along(d)
    }

    fn commit(&mut self) {
        self.s_last.assign(&self.s);
    }
}
