//! # AdaDelta
//!
//! Two running averages, of squared gradients and of squared updates:
//!
//! ```text
//! s    = γ·s_last    + (1−γ)·g²
//! s_dx = γ·s_dx_last + (1−γ)·dx²
//! ```
//!
//! Runs in two phases keyed on the iteration number:
//!
//! * before `phase_switch_iteration`: `d = −g`, step length from the stepsize search
//!   (golden-section by default), `dx = t·d`; the averages are only recorded;
//! * from `phase_switch_iteration` on: the closed-form update
//!   `dx_i = −√(s_dx_last_i) / (√s_i + ε) · g_i`, no stepsize search.
//!
//! The first phase warms up `s_dx`, which is zero at start and would otherwise keep the
//! closed-form update stuck at zero.

use super::{LineSearchOptimizer, StepContext, UpdateRule};
use crate::error::OptimResult;
use crate::functor::{Functor, Scalar};
use crate::params::AdaDeltaParams;
use crate::stepsize::{GoldenSectionParams, StepsizeSearchParams};
use ndarray::{Array1, Zip};

#[derive(Debug, Clone, Default)]
pub struct AdaDelta {
    s: Array1<Scalar>,         // running average of squared gradients
    s_last: Array1<Scalar>,
    s_dx: Array1<Scalar>,      // running average of squared updates
    s_dx_last: Array1<Scalar>,
}

pub type AdaDeltaOptimizer<'a, F> = LineSearchOptimizer<'a, F, AdaDelta>;

impl AdaDelta {
    /// Squared-gradient average after the last completed iteration.
    pub fn squared_gradient_average(&self) -> &Array1<Scalar> {
        &self.s_last
    }

    /// Squared-update average after the last completed iteration.
    pub fn squared_update_average(&self) -> &Array1<Scalar> {
        &self.s_dx_last
    }

    fn record(&mut self, g: &Array1<Scalar>, dx: &Array1<Scalar>, gamma: Scalar) {
        Zip::from(&mut self.s)
            .and(&self.s_last)
            .and(g)
            .for_each(|s, &s_last, &g| *s = gamma * s_last + (1.0 - gamma) * g * g);
        Zip::from(&mut self.s_dx)
            .and(&self.s_dx_last)
            .and(dx)
            .for_each(|s_dx, &s_dx_last, &dx| {
                *s_dx = gamma * s_dx_last + (1.0 - gamma) * dx * dx
            });
    }
}

impl<F: Functor> UpdateRule<F> for AdaDelta {
    type Params = AdaDeltaParams;

    fn name(&self) -> &'static str {
        "adadelta"
    }

    fn default_stepsize_search(&self, _params: &AdaDeltaParams) -> StepsizeSearchParams {
        StepsizeSearchParams::GoldenSection(GoldenSectionParams::default())
    }

    fn reset(&mut self, dim: usize) {
        self.s = Array1::zeros(dim);
        self.s_last = Array1::zeros(dim);
        self.s_dx = Array1::zeros(dim);
        self.s_dx_last = Array1::zeros(dim);
    }

    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &AdaDeltaParams,
    ) -> OptimResult<Array1<Scalar>> {
        let gamma = params.gamma;

        if step.iteration < params.phase_switch_iteration {
            let d = -step.g;
            let dx = step.search_along(d)?;
            self.record(step.g, &dx, gamma);
            return Ok(dx);
        }

        // s has to be current before dx reads it
        Zip::from(&mut self.s)
            .and(&self.s_last)
            .and(step.g)
            .for_each(|s, &s_last, &g| *s = gamma * s_last + (1.0 - gamma) * g * g);
        let dx = Zip::from(&self.s_dx_last)
            .and(&self.s)
            .and(step.g)
            .map_collect(|&s_dx_last, &s, &g| -s_dx_last.sqrt() / (s.sqrt() + params.epsilon) * g);
        Zip::from(&mut self.s_dx)
            .and(&self.s_dx_last)
            .and(&dx)
            .for_each(|s_dx, &s_dx_last, &dx| {
                *s_dx = gamma * s_dx_last + (1.0 - gamma) * dx * dx
            });

        step.set_direction(dx.clone());
        Ok(dx)
    }

    fn commit(&mut self) {
        self.s_last.assign(&self.s);
        self.s_dx_last.assign(&self.s_dx);
    }
}
