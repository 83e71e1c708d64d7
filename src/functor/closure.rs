//! # Closure-backed Functors

use super::{Functor, Scalar};
use ndarray::Array1;
use std::fmt;

/// Functor built from a value closure and a gradient closure.
pub struct ClosureFunctor<V, G>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
    G: Fn(&Array1<Scalar>) -> Array1<Scalar>,
{
    x: Array1<Scalar>,
    value_fn: V,
    gradient_fn: G,
}

impl<V, G> ClosureFunctor<V, G>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
    G: Fn(&Array1<Scalar>) -> Array1<Scalar>,
{
    /// Creates a functor of dimension `dim`, pointed at the origin.
    pub fn new(dim: usize, value_fn: V, gradient_fn: G) -> Self {
        ClosureFunctor {
            x: Array1::zeros(dim),
            value_fn,
            gradient_fn,
        }
    }
}

impl<V, G> Functor for ClosureFunctor<V, G>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
    G: Fn(&Array1<Scalar>) -> Array1<Scalar>,
{
    fn dim(&self) -> usize {
        self.x.len()
    }

    fn x(&self) -> &Array1<Scalar> {
        &self.x
    }

    fn set_x(&mut self, x: &Array1<Scalar>) {
        self.x.assign(x);
    }

    fn value(&self) -> Scalar {
        (self.value_fn)(&self.x)
    }

    fn jacobian(&self) -> Array1<Scalar> {
        (self.gradient_fn)(&self.x)
    }
}

impl<V, G> fmt::Debug for ClosureFunctor<V, G>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
    G: Fn(&Array1<Scalar>) -> Array1<Scalar>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureFunctor").field("x", &self.x).finish()
    }
}

/// Functor for objectives that only provide a value. The gradient is estimated with
/// central differences, using a per-coordinate step of `sqrt(eps) * max(1, |x_i|)`.
pub struct NumericalDiffFunctor<V>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
{
    x: Array1<Scalar>,
    value_fn: V,
}

impl<V> NumericalDiffFunctor<V>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
{
    pub fn new(dim: usize, value_fn: V) -> Self {
        NumericalDiffFunctor {
            x: Array1::zeros(dim),
            value_fn,
        }
    }
}

impl<V> Functor for NumericalDiffFunctor<V>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
{
    fn dim(&self) -> usize {
        self.x.len()
    }

    fn x(&self) -> &Array1<Scalar> {
        &self.x
    }

    fn set_x(&mut self, x: &Array1<Scalar>) {
        self.x.assign(x);
    }

    fn value(&self) -> Scalar {
        (self.value_fn)(&self.x)
    }

    fn jacobian(&self) -> Array1<Scalar> {
        let base_step = Scalar::EPSILON.sqrt();
        let mut probe = self.x.clone();
        let mut grad = Array1::zeros(self.x.len());

        for i in 0..self.x.len() {
            let xi = self.x[i];
            let h = base_step * xi.abs().max(1.0);

            probe[i] = xi + h;
            let forward = (self.value_fn)(&probe);
            probe[i] = xi - h;
            let backward = (self.value_fn)(&probe);
            probe[i] = xi;

            grad[i] = (forward - backward) / (2.0 * h);
        }
        grad
    }
}

impl<V> fmt::Debug for NumericalDiffFunctor<V>
where
    V: Fn(&Array1<Scalar>) -> Scalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericalDiffFunctor").field("x", &self.x).finish()
    }
}
