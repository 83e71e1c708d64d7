//! # Nesterov Momentum
//!
//! Like [`super::Momentum`], but the gradient is taken at the look-ahead point
//! `x + β·t_last·v_last`, where `t_last` is the previous step length:
//!
//! ```text
//! g̃ = ∇f(x + β·t_last·v_last)
//! v = β·v_last − g̃
//! x ← x + t·v
//! ```
//!
//! The functor is moved to the look-ahead point only for the gradient query and is back
//! on `x` before the stepsize search runs.

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::{OptimError, OptimResult};
use crate::functor::{Functor, Scalar};
use crate::params::NesterovMomentumParams;
use crate::stepsize::{FixedStepParams, StepsizeSearchParams};
use ndarray::Array1;

#[derive(Debug, Clone, Default)]
pub struct NesterovMomentum {
    v: Array1<Scalar>,
    v_last: Array1<Scalar>,
}

pub type NesterovMomentumOptimizer<'a, F> = LineSearchOptimizer<'a, F, NesterovMomentum>;

impl NesterovMomentum {
    pub fn velocity(&self) -> &Array1<Scalar> {
        &self.v_last
    }
}

impl<F: Functor> UpdateRule<F> for NesterovMomentum {
    type Params = NesterovMomentumParams;

    fn name(&self) -> &'static str {
        "nesterov_momentum"
    }

    fn default_stepsize_search(&self, params: &NesterovMomentumParams) -> StepsizeSearchParams {
        StepsizeSearchParams::Fixed(FixedStepParams { step: params.alpha })
    }

    fn reset(&mut self, dim: usize) {
        self.v = Array1::zeros(dim);
        self.v_last = Array1::zeros(dim);
    }

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &NesterovMomentumParams,
    ) -> OptimResult<Array1<Scalar>> {
        let shift = params.beta * step.last_stepsize();
        let g_ahead = if shift == 0.0 {
            step.g.clone()
        } else {
            let mut ahead = step.x.clone();
            ahead.scaled_add(shift, &self.v_last);
            let mut f = step.functor.borrow_mut();
            f.set_x(&ahead);
            let g = f.jacobian();
            f.set_x(step.x);
            g
        };
        if g_ahead.len() != step.x.len() {
            return Err(OptimError::dimension(
                "look-ahead gradient",
                step.x.len(),
                g_ahead.len(),
            ));
        }

        self.v = &self.v_last * params.beta - &g_ahead;
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
    fn second_step_uses_look_ahead_gradient() {
        // f = x^2, g = 2x
        let f = shared(QuadraticFunctor::diagonal(array![2.0]));
        let mut params = NesterovMomentumParams {
            alpha: 0.1,
            beta: 0.5,
            ..NesterovMomentumParams::default()
        };
        params.base.max_iteration_times = 2;

        let mut opt = NesterovMomentumOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![1.0], f.clone(), &mut params).unwrap();
        let x = opt.optimize().unwrap();

        // v1 = -2, x1 = 0.8
        // look-ahead = 0.8 + 0.5 * 0.1 * -2 = 0.7, g = 1.4
        // v2 = -1 - 1.4 = -2.4, x2 = 0.8 - 0.24 = 0.56
        assert_abs_diff_eq!(x[0], 0.56, epsilon = 1e-12);
        assert_abs_diff_eq!(opt.rule().velocity()[0], -2.4, epsilon = 1e-12);
        assert_eq!(f.borrow().x(), &x);
    }
}
