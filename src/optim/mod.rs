//! # Optimization Algorithms (`optim`)
//!
//! Line-search optimizers built on one shared iteration skeleton,
//! [`LineSearchOptimizer`]. A method only supplies an [`UpdateRule`]: how to turn the
//! current gradient and its own accumulators into an update `dx`, usually by choosing a
//! direction and asking the bound stepsize search how far to go along it.
//!
//! ```ignore
//! use descent::functor::{shared, QuadraticFunctor};
//! use descent::optim::{AdaDeltaOptimizer, Optimizer};
//! use descent::params::AdaDeltaParams;
//!
//! let f = shared(QuadraticFunctor::diagonal(ndarray::array![2.0]));
//! let mut params = AdaDeltaParams::default();
//! let mut opt = AdaDeltaOptimizer::new();
//! opt.init(&ndarray::array![10.0], f.clone(), &mut params)?;
//! let x_min = opt.optimize()?;
//! ```

use crate::error::OptimResult;
use crate::functor::{Functor, Scalar, SharedFunctor};
use crate::params::OptimizerParams;
use crate::stepsize::{StepsizeSearch, StepsizeSearchParams};
use ndarray::Array1;

// --- Submodules ---
pub mod line_search;
pub mod gradient_descent;
pub mod momentum;
pub mod nesterov;
pub mod adagrad;
pub mod rmsprop;
pub mod adadelta;
pub mod adam;

// Re-export optimizers
pub use line_search::LineSearchOptimizer;
pub use gradient_descent::{GradientDescent, GradientDescentOptimizer};
pub use momentum::{Momentum, MomentumOptimizer};
pub use nesterov::{NesterovMomentum, NesterovMomentumOptimizer};
pub use adagrad::{AdaGrad, AdaGradOptimizer};
pub use rmsprop::{RmsProp, RmsPropOptimizer};
pub use adadelta::{AdaDelta, AdaDeltaOptimizer};
pub use adam::{Adam, AdamOptimizer};

// --- Optimizer Trait ---

/// Where an optimizer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerStatus {
    /// Constructed or initialized, `optimize` not yet called.
    Init,
    Iterating,
    /// Gradient norm dropped below the threshold.
    Converged,
    /// Iteration cap reached first. The returned point is not guaranteed optimal.
    MaxIterExceeded,
}

/// Object-safe surface shared by every optimizer.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    fn status(&self) -> OptimizerStatus;

    /// Iterations taken since `init`.
    fn iterations(&self) -> usize;

    /// Runs until convergence or the iteration cap and returns the last point. Both
    /// terminal states return `Ok`; check [`Optimizer::status`] to tell them apart.
    ///
    /// # Errors
    /// * `Uninitialized` if `init` was not called
    /// * `DimensionMismatch` if the functor's gradient changes size
    fn optimize(&mut self) -> OptimResult<Array1<Scalar>>;
}

// --- Update Rule ---

/// Per-method part of an optimizer: direction, step and accumulator updates.
pub trait UpdateRule<F: Functor> {
    type Params: OptimizerParams;

    fn name(&self) -> &'static str;

    /// Strategy used when the caller does not choose one.
    fn default_stepsize_search(&self, params: &Self::Params) -> StepsizeSearchParams;

    /// Zeroes all accumulators and shadows to dimension `dim`.
    fn reset(&mut self, dim: usize);

    /// Computes the update `dx` for the current iteration. Shadows must not be
    /// overwritten here.
    fn compute_update(
        &mut self,
        step: &mut StepContext<'_, F>,
        params: &Self::Params,
    ) -> OptimResult<Array1<Scalar>>;

    /// Rolls the accumulators of this iteration into their shadows.
    fn commit(&mut self);
}

/// What an update rule gets to see and use during one iteration.
pub struct StepContext<'s, F: Functor> {
    /// 1-based number of the iteration being computed.
    pub iteration: usize,
    pub x: &'s Array1<Scalar>,
    pub g: &'s Array1<Scalar>,
    pub functor: &'s SharedFunctor<F>,
    search: &'s mut dyn StepsizeSearch<F>,
    stepsize: &'s mut Scalar,
    direction: &'s mut Array1<Scalar>,
}

impl<'s, F: Functor> StepContext<'s, F> {
    /// Step length chosen in the previous iteration (0 before the first search).
    pub fn last_stepsize(&self) -> Scalar {
        *self.stepsize
    }

    /// Records `d` as the current direction, asks the stepsize search for a step
    /// length `t` along it and returns `t·d`.
    pub fn search_along(&mut self, d: Array1<Scalar>) -> OptimResult<Array1<Scalar>> {
        *self.direction = d;
        let t = self.search.search(self.direction)?;
        *self.stepsize = t;
        Ok(&*self.direction * t)
    }

    /// Records `d` as the current direction without searching.
    pub fn set_direction(&mut self, d: Array1<Scalar>) {
        *self.direction = d;
    }
}

/// Runs one iteration of `rule` by hand with a fixed step, the way
/// [`LineSearchOptimizer`] would, and returns the gradient it saw and the update.
#[cfg(test)]
pub(crate) fn step_once<F: Functor, R: UpdateRule<F>>(
    rule: &mut R,
    params: &R::Params,
    f: &SharedFunctor<F>,
    iteration: usize,
    step: Scalar,
) -> (Array1<Scalar>, Array1<Scalar>) {
    let mut search = crate::stepsize::FixedStep::<F>::with_step(step).unwrap();
    search.bind(f.clone());
    let (x, g) = {
        let f = f.borrow();
        (f.x().clone(), f.jacobian())
    };
    let mut stepsize = 0.0;
    let mut direction = Array1::zeros(x.len());
    let dx = {
        let mut ctx = StepContext {
            iteration,
            x: &x,
            g: &g,
            functor: f,
            search: &mut search,
            stepsize: &mut stepsize,
            direction: &mut direction,
        };
        rule.compute_update(&mut ctx, params).unwrap()
    };
    f.borrow_mut().set_x(&(&x + &dx));
    rule.commit();
    (g, dx)
}
