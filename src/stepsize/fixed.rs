//! # Fixed Stepsize
//!
//! Always answers with the configured step. This turns the learning rate of momentum
//! and adaptive methods into a stepsize strategy, so they run through the same
//! skeleton as the searching methods.

use super::{bound, wrong_params, StepsizeSearch, StepsizeSearchParams};
use crate::error::{OptimError, OptimResult};
use crate::functor::{Functor, Scalar, SharedFunctor};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub(crate) const NAME: &str = "fixed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStepParams {
    pub step: Scalar,
}

impl Default for FixedStepParams {
    fn default() -> Self {
        FixedStepParams { step: 0.001 }
    }
}

impl FixedStepParams {
    pub fn validate(&self) -> OptimResult<()> {
        if !(self.step.is_finite() && self.step >= 0.0) {
            return Err(OptimError::invalid("step", "must be finite and >= 0"));
        }
        Ok(())
    }
}

pub struct FixedStep<F: Functor> {
    f: Option<SharedFunctor<F>>,
    step: Scalar,
}

impl<F: Functor> FixedStep<F> {
    pub fn new() -> Self {
        FixedStep {
            f: None,
            step: FixedStepParams::default().step,
        }
    }

    pub fn with_step(step: Scalar) -> OptimResult<Self> {
        FixedStepParams { step }.validate()?;
        Ok(FixedStep { f: None, step })
    }
}

impl<F: Functor> Default for FixedStep<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Functor> StepsizeSearch<F> for FixedStep<F> {
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
            StepsizeSearchParams::Fixed(p) => {
                p.validate()?;
                self.step = p.step;
                Ok(())
            }
            other => Err(wrong_params(NAME, other)),
        }
    }

    fn search(&mut self, d: &Array1<Scalar>) -> OptimResult<Scalar> {
        let f = bound(&self.f, NAME)?;
        let dim = f.borrow().dim();
        if d.len() != dim {
            return Err(OptimError::dimension("fixed direction", dim, d.len()));
        }
        Ok(self.step)
    }

    fn reset(&mut self, params: &StepsizeSearchParams) -> OptimResult<()> {
        self.set_params(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functor::{shared, QuadraticFunctor};
    use ndarray::array;

    #[test]
    fn returns_configured_step_once_bound() {
        let mut fixed = FixedStep::with_step(0.25).unwrap();
        assert_eq!(
            fixed.search(&array![1.0]),
            Err(OptimError::UnboundStrategy("fixed"))
        );

        fixed.bind(shared(QuadraticFunctor::diagonal(array![1.0])));
        assert_eq!(fixed.search(&array![1.0]), Ok(0.25));
    }

    #[test]
    fn negative_step_is_rejected() {
        assert!(FixedStep::<QuadraticFunctor>::with_step(-1.0).is_err());
    }
}
