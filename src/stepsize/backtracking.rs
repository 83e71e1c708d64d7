//! # Backtracking Stepsize Search
//!
//! Starts at `initial_step` and shrinks by `rho` until the Armijo condition
//!
//! ```text
//! f(x + t·d) ≤ f(x) + c1·t·∇f(x)ᵀd
//! ```
//!
//! holds. If the iteration cap is hit first, the best tried step that lowered `f` is
//! returned, or 0 when none did.

use super::{bound, wrong_params, LineProbe, StepsizeSearch, StepsizeSearchParams};
use crate::error::{OptimError, OptimResult};
use crate::functor::{Functor, Scalar, SharedFunctor};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub(crate) const NAME: &str = "backtracking";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktrackingParams {
    pub initial_step: Scalar,
    /// Shrink factor, in (0, 1).
    pub rho: Scalar,
    /// Armijo constant, in (0, 1).
    pub c1: Scalar,
    pub max_iterations: usize,
}

impl Default for BacktrackingParams {
    fn default() -> Self {
        BacktrackingParams {
            initial_step: 1.0,
            rho: 0.5,
            c1: 1e-4,
            max_iterations: 50,
        }
    }
}

impl BacktrackingParams {
    pub fn validate(&self) -> OptimResult<()> {
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(OptimError::invalid("initial_step", "must be finite and > 0"));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(OptimError::invalid("rho", "must lie in (0, 1)"));
        }
        if !(self.c1 > 0.0 && self.c1 < 1.0) {
            return Err(OptimError::invalid("c1", "must lie in (0, 1)"));
        }
        Ok(())
    }
}

pub struct Backtracking<F: Functor> {
    f: Option<SharedFunctor<F>>,
    params: BacktrackingParams,
}

impl<F: Functor> Backtracking<F> {
    pub fn new() -> Self {
        Backtracking {
            f: None,
            params: BacktrackingParams::default(),
        }
    }

    pub fn with_params(params: BacktrackingParams) -> OptimResult<Self> {
        params.validate()?;
        Ok(Backtracking { f: None, params })
    }
}

impl<F: Functor> Default for Backtracking<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Functor> StepsizeSearch<F> for Backtracking<F> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bind(&mut self, f: SharedFunctor<F>) {
        self.f = Some(f);
    }

    fn is_bound(&self) -> bool {
        self.f.is_some()
    }

    fn set_params(&mut self, params: &StepsizeSearchParams) -> OptimResult<()> {
        match params {
            StepsizeSearchParams::Backtracking(p) => {
                p.validate()?;
                self.params = p.clone();
                Ok(())
            }
            other => Err(wrong_params(NAME, other)),
        }
    }

    fn search(&mut self, d: &Array1<Scalar>) -> OptimResult<Scalar> {
        let f = bound(&self.f, NAME)?;
        let (fx, g) = {
            let f = f.borrow();
            (f.value(), f.jacobian())
        };
        let mut probe = LineProbe::new(f, d, "backtracking direction")?;
        if g.len() != probe.x0().len() {
            return Err(OptimError::dimension("backtracking gradient", probe.x0().len(), g.len()));
        }

        let slope = g.dot(d);
        if !(slope < 0.0) {
            return Ok(0.0);
        }

        let mut t = self.params.initial_step;
        // (step, value) of the lowest tried point below f(x)
        let mut best: Option<(Scalar, Scalar)> = None;
        for _ in 0..self.params.max_iterations {
            let trial = probe.value_at(t);
            if trial.is_finite() {
                if trial <= fx + self.params.c1 * t * slope {
                    return Ok(t);
                }
                if trial < fx && best.map_or(true, |(_, v)| trial < v) {
                    best = Some((t, trial));
                }
            }
            t *= self.params.rho;
        }
        Ok(best.map_or(0.0, |(step, _)| step))
    }

    fn reset(&mut self, params: &StepsizeSearchParams) -> OptimResult<()> {
        self.set_params(params)
    }
}
