//! # Gradient Descent

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::OptimResult;
use crate::functor::{Functor, Scalar};
use crate::params::GradientDescentParams;
use crate::stepsize::{GoldenSectionParams, StepsizeSearchParams};
use ndarray::Array1;

/// Steepest descent: `d = -g`, step length from the stepsize search
/// (golden-section by default).
#[derive(Debug, Clone, Default)]
pub struct GradientDescent;

pub type GradientDescentOptimizer<'a, F> = LineSearchOptimizer<'a, F, GradientDescent>;

impl<F: Functor> UpdateRule<F> for GradientDescent {
    type Params = GradientDescentParams;

    fn name(&self) -> &'static str {
        "gradient_descent"
    }

    fn default_stepsize_search(&self, _params: &GradientDescentParams) -> StepsizeSearchParams {
        StepsizeSearchParams::GoldenSection(GoldenSectionParams::default())
    }

    fn reset(&mut self, _dim: usize) {}

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        _params: &GradientDescentParams,
    ) -> OptimResult<Array1<Scalar>> {
        let d = -step.g;
        step.search_along(d)
    }

    fn commit(&mut self) {}
}
