//! # Descent Core Library
//!
//! Line-search first-order optimizers for smooth objectives over `ℝⁿ`: gradient
//! descent, momentum, Nesterov momentum, AdaGrad, RMSProp, AdaDelta and Adam.
//! Each optimizer picks a direction from the gradient (and its own running averages)
//! and asks a pluggable stepsize search how far to move along it.
//!
//! The objective is a [`functor::Functor`] that holds the current point and answers
//! value and gradient there. It is shared between the caller, the optimizer and the
//! stepsize search.

pub mod error;
pub mod functor;
pub mod params;
pub mod stepsize;
pub mod optim;
pub mod report;
pub mod config;
pub mod utils;

pub use error::{OptimError, OptimResult};
pub use functor::{shared, Functor, Scalar, SharedFunctor};
pub use optim::{Optimizer, OptimizerStatus};
pub use config::{MethodConfig, OptimizerConfig};

pub mod prelude {
    pub use crate::functor::{shared, ClosureFunctor, Functor, NumericalDiffFunctor, QuadraticFunctor, Scalar};
    pub use crate::optim::{
        AdaDeltaOptimizer, AdaGradOptimizer, AdamOptimizer, GradientDescentOptimizer,
        MomentumOptimizer, NesterovMomentumOptimizer, Optimizer, OptimizerStatus,
        RmsPropOptimizer,
    };
    pub use crate::params::*;
    pub use crate::report::{ConsoleReporter, RecordingReporter, Reporter, SilentReporter};
    pub use crate::stepsize::{StepsizeSearch, StepsizeSearchParams};
}
