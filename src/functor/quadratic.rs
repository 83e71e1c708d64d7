//! # Quadratic Objective
//!
//! `f(x) = ½ xᵀAx − bᵀx + c` with gradient `Ax − b`. For symmetric positive definite
//! `A` the unique minimizer solves `Ax = b`.

use super::{Functor, Scalar};
use crate::error::{OptimError, OptimResult};
use ndarray::{Array1, Array2};

#[derive(Debug, Clone)]
pub struct QuadraticFunctor {
    a: Array2<Scalar>,
    b: Array1<Scalar>,
    c: Scalar,
    x: Array1<Scalar>,
}

impl QuadraticFunctor {
    /// Creates the quadratic, pointed at the origin.
    ///
    /// # Errors
    /// `DimensionMismatch` if `a` is not square or `b` does not match it.
    pub fn new(a: Array2<Scalar>, b: Array1<Scalar>, c: Scalar) -> OptimResult<Self> {
        let (rows, cols) = a.dim();
        if rows != cols {
            return Err(OptimError::dimension("QuadraticFunctor matrix", rows, cols));
        }
        if b.len() != rows {
            return Err(OptimError::dimension("QuadraticFunctor vector", rows, b.len()));
        }
        Ok(QuadraticFunctor {
            a,
            b,
            c,
            x: Array1::zeros(rows),
        })
    }

    /// Separable quadratic `Σ ½ d_i x_i²` with the given diagonal.
    pub fn diagonal(diag: Array1<Scalar>) -> Self {
        let n = diag.len();
        QuadraticFunctor {
            a: Array2::from_diag(&diag),
            b: Array1::zeros(n),
            c: 0.0,
            x: Array1::zeros(n),
        }
    }
}

impl Functor for QuadraticFunctor {
    fn dim(&self) -> usize {
        self.b.len()
    }

    fn x(&self) -> &Array1<Scalar> {
        &self.x
    }

    fn set_x(&mut self, x: &Array1<Scalar>) {
        self.x.assign(x);
    }

    fn value(&self) -> Scalar {
        0.5 * self.x.dot(&self.a.dot(&self.x)) - self.b.dot(&self.x) + self.c
    }

    fn jacobian(&self) -> Array1<Scalar> {
        self.a.dot(&self.x) - &self.b
    }
}
