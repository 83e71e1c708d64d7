//! # Objective Functions (`functor`)
//!
//! The objective an optimizer minimizes. A functor carries its current input point and
//! answers value and gradient queries for that point; it is re-pointed with
//! [`Functor::set_x`].
//!
//! The optimizer and its stepsize search strategy both work on the same functor, so it
//! is passed around as a [`SharedFunctor`]. The caller keeps its own handle and can read
//! the final point from it once optimization is done.

use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

pub mod closure;
pub mod quadratic;

pub use closure::{ClosureFunctor, NumericalDiffFunctor};
pub use quadratic::QuadraticFunctor;

/// Scalar type used for points, values and gradients.
pub type Scalar = f64;

/// Handle to a functor shared by an optimizer and its stepsize search strategy.
pub type SharedFunctor<F> = Rc<RefCell<F>>;

/// Wraps a functor into a [`SharedFunctor`].
pub fn shared<F: Functor>(f: F) -> SharedFunctor<F> {
    Rc::new(RefCell::new(f))
}

/// Objective function contract consumed by optimizers and stepsize search strategies.
///
/// `value` and `jacobian` must always describe the point given to the last `set_x`.
pub trait Functor {
    /// Dimension of the input point.
    fn dim(&self) -> usize;

    /// Current input point.
    fn x(&self) -> &Array1<Scalar>;

    /// Re-points the functor. `x.len()` equals `dim()`; optimizers check this before
    /// calling.
    fn set_x(&mut self, x: &Array1<Scalar>);

    /// Objective value at the current point.
    fn value(&self) -> Scalar;

    /// Gradient at the current point.
    fn jacobian(&self) -> Array1<Scalar>;
}

/// Euclidean norm of a vector.
pub fn norm(v: &Array1<Scalar>) -> Scalar {
    v.dot(v).sqrt()
}
