//! # Momentum
//!
//! Heavy-ball method. The velocity accumulates past directions,
//! `v = β·v_last − g`, and the step length along `v` comes from the stepsize search.
//! With the default fixed step `α` this is the classic update `x ← x + α·v`.

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::OptimResult;
use crate::functor::{Functor, Scalar};
use crate::params::MomentumParams;
use crate::stepsize::{FixedStepParams, StepsizeSearchParams};
use ndarray::Array1;

#[derive(Debug, Clone, Default)]
pub struct Momentum {
    v: Array1<Scalar>,
    v_last: Array1<Scalar>,
}

pub type MomentumOptimizer<'a, F> = LineSearchOptimizer<'a, F, Momentum>;

impl Momentum {
    /// Velocity of the last completed iteration.
    pub fn velocity(&self) -> &Array1<Scalar> {
        &self.v_last
    }
}

impl<F: Functor> UpdateRule<F> for Momentum {
    type Params = MomentumParams;

    fn name(&self) -> &'static str {
        "momentum"
    }

    fn default_stepsize_search(&self, params: &MomentumParams) -> StepsizeSearchParams {
        StepsizeSearchParams::Fixed(FixedStepParams { step: params.alpha })
    }

    fn reset(&mut self, dim: usize) {
        self.v = Array1::zeros(dim);
        self.v_last = Array1::zeros(dim);
    }

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &MomentumParams,
    ) -> OptimResult<Array1<Scalar>> {
        self.v = &self.v_last * params.beta - step.g;
        step.search_along(self.v.clone())
    }

    fn commit(&mut self) {
        self.v_last.assign(&self.v);
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
    fn first_two_steps_follow_heavy_ball_update() {
        // f = x^2, g = 2x
        let f = shared(QuadraticFunctor::diagonal(array![2.0]));
        let mut params = MomentumParams {
            alpha: 0.1,
            beta: 0.5,
            ..MomentumParams::default()
        };
        params.base.max_iteration_times = 2;

        let mut opt = MomentumOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![1.0], f.clone(), &mut params).unwrap();
        let x = opt.optimize().unwrap();

        // v1 = -2, x1 = 1 - 0.2 = 0.8
        // v2 = 0.5 * -2 - 1.6 = -2.6, x2 = 0.8 - 0.26 = 0.54
        assert_abs_diff_eq!(x[0], 0.54, epsilon = 1e-12);
        assert_abs_diff_eq!(opt.rule().velocity()[0], -2.6, epsilon = 1e-12);
        assert_eq!(opt.iterations(), 2);
    }
}
