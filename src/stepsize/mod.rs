//! # Stepsize Search (`stepsize`)
//!
//! Strategies that pick a step length along a descent direction. An optimizer owns one
//! strategy, binds it to the functor it optimizes, and calls [`StepsizeSearch::search`]
//! once per iteration.
//!
//! Strategies may move the functor while probing trial points, but every strategy in
//! this module puts the functor back on the point it had when `search` was entered
//! before returning, including on error paths. Callers can rely on value and gradient
//! queries after `search` describing the same point as before it.

use crate::error::{OptimError, OptimResult};
use crate::functor::{Functor, Scalar, SharedFunctor};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod backtracking;
pub mod fixed;
pub mod golden_section;

pub use backtracking::{Backtracking, BacktrackingParams};
pub use fixed::{FixedStep, FixedStepParams};
pub use golden_section::{GoldenSection, GoldenSectionParams};

/// Base trait for all stepsize search strategies.
pub trait StepsizeSearch<F: Functor> {
    /// Short identifier used in errors and reports.
    fn name(&self) -> &'static str;

    /// Binds the objective. Must happen before the first `search`.
    fn bind(&mut self, f: SharedFunctor<F>);

    fn is_bound(&self) -> bool;

    /// Applies strategy-specific params. Strategies without params accept anything.
    fn set_params(&mut self, _params: &StepsizeSearchParams) -> OptimResult<()> {
        Ok(())
    }

    /// Returns a non-negative step length along `d` from the functor's current point.
    ///
    /// # Errors
    /// * `UnboundStrategy` if `bind` was never called
    /// * `DimensionMismatch` if `d` does not match the functor dimension
    fn search(&mut self, d: &Array1<Scalar>) -> OptimResult<Scalar>;

    /// Re-initializes the strategy with `params`, clearing any state from previous
    /// searches. The binding is kept.
    fn reset(&mut self, params: &StepsizeSearchParams) -> OptimResult<()>;
}

/// Params for every strategy, keyed by strategy name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepsizeSearchParams {
    GoldenSection(GoldenSectionParams),
    Fixed(FixedStepParams),
    Backtracking(BacktrackingParams),
}

impl StepsizeSearchParams {
    pub fn validate(&self) -> OptimResult<()> {
        match self {
            StepsizeSearchParams::GoldenSection(p) => p.validate(),
            StepsizeSearchParams::Fixed(p) => p.validate(),
            StepsizeSearchParams::Backtracking(p) => p.validate(),
        }
    }

    /// Builds the strategy these params describe, already reset with them.
    pub fn build<'s, F: Functor + 's>(&self) -> OptimResult<Box<dyn StepsizeSearch<F> + 's>> {
        let mut search: Box<dyn StepsizeSearch<F> + 's> = match self {
            StepsizeSearchParams::GoldenSection(_) => Box::new(GoldenSection::new()),
            StepsizeSearchParams::Fixed(_) => Box::new(FixedStep::new()),
            StepsizeSearchParams::Backtracking(_) => Box::new(Backtracking::new()),
        };
        search.reset(self)?;
        Ok(search)
    }

    fn strategy_name(&self) -> &'static str {
        match self {
            StepsizeSearchParams::GoldenSection(_) => golden_section::NAME,
            StepsizeSearchParams::Fixed(_) => fixed::NAME,
            StepsizeSearchParams::Backtracking(_) => backtracking::NAME,
        }
    }
}

impl Default for StepsizeSearchParams {
    fn default() -> Self {
        StepsizeSearchParams::GoldenSection(GoldenSectionParams::default())
    }
}

fn wrong_params(expected: &'static str, got: &StepsizeSearchParams) -> OptimError {
    OptimError::invalid(
        "stepsize_search",
        format!(
            "strategy '{}' cannot take params for '{}'",
            expected,
            got.strategy_name()
        ),
    )
}

fn bound<'f, F: Functor>(
    f: &'f Option<SharedFunctor<F>>,
    name: &'static str,
) -> OptimResult<&'f SharedFunctor<F>> {
    f.as_ref().ok_or(OptimError::UnboundStrategy(name))
}

/// Evaluates `φ(t) = f(x0 + t·d)` on the bound functor and moves it back to `x0` when
/// dropped.
struct LineProbe<'f, F: Functor> {
    f: &'f SharedFunctor<F>,
    x0: Array1<Scalar>,
    d: &'f Array1<Scalar>,
    trial: Array1<Scalar>,
}

impl<'f, F: Functor> LineProbe<'f, F> {
    fn new(f: &'f SharedFunctor<F>, d: &'f Array1<Scalar>, context: &str) -> OptimResult<Self> {
        let x0 = f.borrow().x().clone();
        if d.len() != x0.len() {
            return Err(OptimError::dimension(context, x0.len(), d.len()));
        }
        let trial = x0.clone();
        Ok(LineProbe { f, x0, d, trial })
    }

    fn x0(&self) -> &Array1<Scalar> {
        &self.x0
    }

    fn value_at(&mut self, t: Scalar) -> Scalar {
        self.trial.assign(&self.x0);
        self.trial.scaled_add(t, self.d);
        let mut f = self.f.borrow_mut();
        f.set_x(&self.trial);
        f.value()
    }
}

impl<F: Functor> Drop for LineProbe<'_, F> {
    fn drop(&mut self) {
        self.f.borrow_mut().set_x(&self.x0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_strategy_carries_its_name() {
        type Q = crate::functor::QuadraticFunctor;
        let params = StepsizeSearchParams::Backtracking(BacktrackingParams::default());
        let search = params.build::<Q>().unwrap();
        assert_eq!(search.name(), "backtracking");
        assert!(!search.is_bound());
    }

    #[test]
    fn params_json_is_keyed_by_strategy() {
        let params: StepsizeSearchParams =
            serde_json::from_str(r#"{ "fixed": { "step": 0.05 } }"#).unwrap();
        assert_eq!(params, StepsizeSearchParams::Fixed(FixedStepParams { step: 0.05 }));
    }
}
