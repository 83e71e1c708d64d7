//! # Golden-Section Stepsize Search
//!
//! Minimizes `φ(t) = f(x + t·d)` over `t ≥ 0`. The minimum is first bracketed by
//! stepping forward with geometrically growing steps until `φ` stops decreasing, then
//! the bracket is shrunk by the golden ratio until it is narrower than the tolerance.

use super::{bound, wrong_params, LineProbe, StepsizeSearch, StepsizeSearchParams};
use crate::error::{OptimError, OptimResult};
use crate::functor::{Functor, Scalar, SharedFunctor};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub(crate) const NAME: &str = "golden_section";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenSectionParams {
    /// First trial step of the bracketing phase.
    pub initial_step: Scalar,
    /// Growth factor of the trial step while `φ` keeps decreasing.
    pub expansion: Scalar,
    /// Bracket width (relative to `max(1, t)`) at which the search stops.
    pub tolerance: Scalar,
    pub max_bracket_iterations: usize,
    pub max_iterations: usize,
}

impl Default for GoldenSectionParams {
    fn default() -> Self {
        GoldenSectionParams {
            initial_step: 1e-3,
            expansion: 2.0,
            tolerance: 1e-8,
            max_bracket_iterations: 60,
            max_iterations: 200,
        }
    }
}

impl GoldenSectionParams {
    pub fn validate(&self) -> OptimResult<()> {
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(OptimError::invalid("initial_step", "must be finite and > 0"));
        }
        if !(self.expansion.is_finite() && self.expansion > 1.0) {
            return Err(OptimError::invalid("expansion", "must be finite and > 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(OptimError::invalid("tolerance", "must be finite and > 0"));
        }
        Ok(())
    }
}

/// Golden-section line search.
pub struct GoldenSection<F: Functor> {
    f: Option<SharedFunctor<F>>,
    params: GoldenSectionParams,
}

impl<F: Functor> GoldenSection<F> {
    pub fn new() -> Self {
        GoldenSection {
            f: None,
            params: GoldenSectionParams::default(),
        }
    }

    pub fn with_params(params: GoldenSectionParams) -> OptimResult<Self> {
        params.validate()?;
        Ok(GoldenSection { f: None, params })
    }

    pub fn params(&self) -> &GoldenSectionParams {
        &self.params
    }

    /// Brackets the minimum of `φ`, returning `(lo, hi)` or `Err(t)` when `φ` was still
    /// decreasing at `t` after the last expansion.
    fn bracket(&self, probe: &mut LineProbe<'_, F>, phi0: Scalar) -> Result<(Scalar, Scalar), Scalar> {
        let mut step = self.params.initial_step;
        let mut hi = step;
        let mut phi_hi = finite_or_inf(probe.value_at(hi));
        if phi_hi >= phi0 {
            return Ok((0.0, hi));
        }

        let mut lo = 0.0;
        let mut mid = hi;
        let mut phi_mid = phi_hi;
        for _ in 0..self.params.max_bracket_iterations {
            step *= self.params.expansion;
            hi = mid + step;
            phi_hi = finite_or_inf(probe.value_at(hi));
            if phi_hi >= phi_mid {
                return Ok((lo, hi));
            }
            lo = mid;
            mid = hi;
            phi_mid = phi_hi;
        }
        Err(hi)
    }
}

impl<F: Functor> Default for GoldenSection<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Functor> StepsizeSearch<F> for GoldenSection<F> {
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
            StepsizeSearchParams::GoldenSection(p) => {
                p.validate()?;
                self.params = p.clone();
                Ok(())
            }
            other => Err(wrong_params(NAME, other)),
        }
    }

    fn search(&mut self, d: &Array1<Scalar>) -> OptimResult<Scalar> {
        let f = bound(&self.f, NAME)?;
        let mut probe = LineProbe::new(f, d, "golden_section direction")?;
        let phi0 = finite_or_inf(probe.value_at(0.0));

        let (mut a, mut b) = match self.bracket(&mut probe, phi0) {
            Ok(bracket) => bracket,
            Err(still_decreasing) => return Ok(still_decreasing),
        };

        let inv_phi = ((5.0_f64).sqrt() - 1.0) / 2.0; // ≈ 0.618034
        let inv_phi2 = 1.0 - inv_phi;

        let mut x1 = a + inv_phi2 * (b - a);
        let mut x2 = a + inv_phi * (b - a);
        let mut f1 = finite_or_inf(probe.value_at(x1));
        let mut f2 = finite_or_inf(probe.value_at(x2));

        for _ in 0..self.params.max_iterations {
            if b - a < self.params.tolerance * b.max(1.0) {
                break;
            }
            if f1 < f2 {
                // Minimum is in [a, x2]
                b = x2;
                x2 = x1;
                f2 = f1;
                x1 = a + inv_phi2 * (b - a);
                f1 = finite_or_inf(probe.value_at(x1));
            } else {
                // Minimum is in [x1, b]
                a = x1;
                x1 = x2;
                f1 = f2;
                x2 = a + inv_phi * (b - a);
                f2 = finite_or_inf(probe.value_at(x2));
            }
        }

        let t = 0.5 * (a + b);
        if finite_or_inf(probe.value_at(t)) > phi0 {
            return Ok(0.0);
        }
        Ok(t)
    }

    fn reset(&mut self, params: &StepsizeSearchParams) -> OptimResult<()> {
        self.set_params(params)
    }
}

fn finite_or_inf(v: Scalar) -> Scalar {
    if v.is_nan() {
        Scalar::INFINITY
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functor::{shared, QuadraticFunctor};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn finds_exact_step_on_parabola() {
        let f = shared(QuadraticFunctor::diagonal(array![2.0]));
        f.borrow_mut().set_x(&array![10.0]);

        let mut gs = GoldenSection::new();
        gs.bind(f.clone());
        // d = -g = -20, minimum of (10 - 20t)^2 at t = 0.5
        let t = gs.search(&array![-20.0]).unwrap();
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-6);
        assert_eq!(f.borrow().x(), &array![10.0]);
    }

    #[test]
    fn ascent_direction_gives_zero_step() {
        let f = shared(QuadraticFunctor::diagonal(array![2.0, 2.0]));
        f.borrow_mut().set_x(&array![1.0, 1.0]);

        let mut gs = GoldenSection::new();
        gs.bind(f.clone());
        let t = gs.search(&array![1.0, 1.0]).unwrap();
        assert!(t.abs() < 1e-6);
        assert_eq!(f.borrow().x(), &array![1.0, 1.0]);
    }

    #[test]
    fn unbounded_direction_returns_last_decreasing_step() {
        let f = shared(crate::functor::ClosureFunctor::new(
            1,
            |x: &Array1<Scalar>| -x[0],
            |_x: &Array1<Scalar>| array![-1.0],
        ));
        let params = GoldenSectionParams {
            max_bracket_iterations: 3,
            ..GoldenSectionParams::default()
        };
        let mut gs = GoldenSection::with_params(params).unwrap();
        gs.bind(f);
        // 1e-3 + 2e-3 + 4e-3 + 8e-3
        let t = gs.search(&array![1.0]).unwrap();
        assert_abs_diff_eq!(t, 0.015, epsilon = 1e-12);
    }

    #[test]
    fn rejects_params_of_other_strategy() {
        let mut gs: GoldenSection<QuadraticFunctor> = GoldenSection::new();
        let err = gs
            .set_params(&StepsizeSearchParams::Fixed(Default::default()))
            .unwrap_err();
        assert!(matches!(err, OptimError::InvalidParameter { .. }));
    }
}
