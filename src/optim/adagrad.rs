//! # AdaGrad
//!
//! Implements the Adagrad algorithm.
//! Reference: Adaptive Subgradient Methods for Online Learning and Stochastic Optimization - http://jmlr.org/papers/v12/duchi11a.html
//!
//! The sum of squared gradients scales each coordinate of the direction,
//! `d_i = −g_i / (√s_i + ε)`; the step along `d` comes from the stepsize search
//! (fixed `α` by default).

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::OptimResult;
use crate::functor::{Functor, Scalar};
use crate::params::AdaGradParams;
use crate::stepsize::{FixedStepParams, StepsizeSearchParams};
use ndarray::{Array1, Zip};

#[derive(Debug, Clone, Default)]
pub struct AdaGrad {
    sum: Array1<Scalar>,      // Sum of squared gradients
    sum_last: Array1<Scalar>,
}

pub type AdaGradOptimizer<'a, F> = LineSearchOptimizer<'a, F, AdaGrad>;

impl AdaGrad {
    pub fn squared_gradient_sum(&self) -> &Array1<Scalar> {
        &self.sum_last
    }
}

impl<F: Functor> UpdateRule<F> for AdaGrad {
    type Params = AdaGradParams;

    fn name(&self) -> &'static str {
        "adagrad"
    }

    fn default_stepsize_search(&self, params: &AdaGradParams) -> StepsizeSearchParams {
        StepsizeSearchParams::Fixed(FixedStepParams { step: params.alpha })
    }

    fn reset(&mut self, dim: usize) {
        self.sum = Array1::zeros(dim);
        self.sum_last = Array1::zeros(dim);
    }

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &AdaGradParams,
    ) -> OptimResult<Array1<Scalar>> {
        // sum = sum_last + g^2
        Zip::from(&mut self.sum)
            .and(&self.sum_last)
            .and(step.g)
            .for_each(|s, &s_last, &g| *s = s_last + g * g);

        // d = -g / (sqrt(sum) + eps)
        let d = Zip::from(step.g)
            .and(&self.sum)
            .map_collect(|&g, &s| -g / (s.sqrt() + params.epsilon));

        step.search_along(d)
    }

    fn commit(&mut self) {
        self.sum_last.assign(&self.sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functor::{shared, QuadraticFunctor};
    use crate::optim::Optimizer;
    use crate::report::SilentReporter;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn first_step_is_alpha_times_sign_of_gradient() {
        let f = shared(QuadraticFunctor::diagonal(array![2.0, 8.0]));
        let mut params = AdaGradParams {
            alpha: 0.5,
            ..AdaGradParams::default()
        };
        params.base.max_iteration_times = 1;

        let mut opt = AdaGradOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![1.0, -1.0], f, &mut params).unwrap();
        let x = opt.optimize().unwrap();

        // g / sqrt(g^2) = sign(g), independent of scale
        assert_abs_diff_eq!(x[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(x[1], -0.5, epsilon = 1e-6);
        assert_eq!(opt.rule().squared_gradient_sum(), &array![4.0, 64.0]);
    }
}
