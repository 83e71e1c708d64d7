//! # Adam
//!
//! Implements the Adam algorithm.
//! Reference: Adam: A Method for Stochastic Optimization - https://arxiv.org/abs/1412.6980

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::OptimResult;
use crate::functor::{Functor, Scalar};
use crate::params::AdamParams;
use crate::stepsize::{FixedStepParams, StepsizeSearchParams};
use ndarray::{Array1, Zip};

/// Moment estimates with their shadows from the last completed iteration.
#[derive(Debug, Clone, Default)]
pub struct Adam {
    exp_avg: Array1<Scalar>,         // 1st moment estimate (momentum) - m_t
    exp_avg_sq: Array1<Scalar>,      // 2nd moment estimate (RMSprop like) - v_t
    exp_avg_last: Array1<Scalar>,
    exp_avg_sq_last: Array1<Scalar>,
}

pub type AdamOptimizer<'a, F> = LineSearchOptimizer<'a, F, Adam>;

impl Adam {
    pub fn first_moment(&self) -> &Array1<Scalar> {
        &self.exp_avg_last
    }

    pub fn second_moment(&self) -> &Array1<Scalar> {
        &self.exp_avg_sq_last
    }
}

/// `1 - β^t`. Exponents past `i32::MAX` saturate, where the power has long since
/// reached zero.
fn bias_correction(beta: Scalar, iteration: usize) -> Scalar {
    let t = i32::try_from(iteration).unwrap_or(i32::MAX);
    1.0 - beta.powi(t)
}

impl<F: Functor> UpdateRule<F> for Adam {
    type Params = AdamParams;

    fn name(&self) -> &'static str {
        "adam"
    }

    fn default_stepsize_search(&self, params: &AdamParams) -> StepsizeSearchParams {
        StepsizeSearchParams::Fixed(FixedStepParams { step: params.alpha })
    }

    fn reset(&mut self, dim: usize) {
        self.exp_avg = Array1::zeros(dim);
        self.exp_avg_sq = Array1::zeros(dim);
        self.exp_avg_last = Array1::zeros(dim);
        self.exp_avg_sq_last = Array1::zeros(dim);
    }

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &AdamParams,
    ) -> OptimResult<Array1<Scalar>> {
        let (beta1, beta2) = (params.beta1, params.beta2);

        // Bias correction terms
        let bias_correction1 = bias_correction(beta1, step.iteration);
        let bias_correction2 = bias_correction(beta2, step.iteration);

        // m_t = beta1 * m_{t-1} + (1 - beta1) * g_t
        Zip::from(&mut self.exp_avg)
            .and(&self.exp_avg_last)
            .and(step.g)
            .for_each(|m, &m_last, &g| *m = beta1 * m_last + (1.0 - beta1) * g);

        // v_t = beta2 * v_{t-1} + (1 - beta2) * g_t^2
        Zip::from(&mut self.exp_avg_sq)
            .and(&self.exp_avg_sq_last)
            .and(step.g)
            .for_each(|v, &v_last, &g| *v = beta2 * v_last + (1.0 - beta2) * g * g);

        // d = -m_hat / (sqrt(v_hat) + eps)
        let d = Zip::from(&self.exp_avg)
            .and(&self.exp_avg_sq)
            .map_collect(|&m, &v| {
                let m_hat = m / bias_correction1;
                let v_hat = v / bias_correction2;
                -m_hat / (v_hat.sqrt() + params.epsilon)
            });

        step.search_along(d)
    }

    fn commit(&mut self) {
        self.exp_avg_last.assign(&self.exp_avg);
        self.exp_avg_sq_last.assign(&self.exp_avg_sq);
    }
}
