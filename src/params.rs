//! # Optimizer Params
//!
//! One hyperparameter bundle per optimization method. Every bundle embeds
//! [`LineSearchParams`], which holds the stopping rule and the iteration counter the
//! optimizer increments in place.
//!
//! Bundles are created by the caller, lent to an optimizer with `&mut` for the length of
//! a run, and read back afterwards (e.g. to see how many iterations were used).

use crate::error::{OptimError, OptimResult};
use crate::functor::Scalar;
use serde::{Deserialize, Serialize};

/// Access to the shared stopping rule of a params bundle.
pub trait OptimizerParams {
    fn line_search(&self) -> &LineSearchParams;

    fn line_search_mut(&mut self) -> &mut LineSearchParams;

    /// Checks every field, failing with `InvalidParameter` on the first bad one.
    fn validate(&self) -> OptimResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSearchParams {
    /// Gradient norm under which the current point is accepted.
    pub min_gradient: Scalar,
    pub max_iteration_times: usize,
    /// Iterations taken so far. Runtime state, never serialized.
    #[serde(skip)]
    pub iteration_times: usize,
}

impl Default for LineSearchParams {
    fn default() -> Self {
        LineSearchParams {
            min_gradient: 0.01,
            max_iteration_times: 10_000,
            iteration_times: 0,
        }
    }
}

impl LineSearchParams {
    /// Sets the gradient threshold that stops the iterations.
    pub fn set_min_gradient(&mut self, value: Scalar) {
        self.min_gradient = value;
    }

    fn validate(&self) -> OptimResult<()> {
        if !(self.min_gradient.is_finite() && self.min_gradient >= 0.0) {
            return Err(OptimError::invalid("min_gradient", "must be finite and >= 0"));
        }
        Ok(())
    }
}

fn check_rate(name: &str, value: Scalar) -> OptimResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(OptimError::invalid(name, "must be finite and >= 0"));
    }
    Ok(())
}

fn check_unit(name: &str, value: Scalar) -> OptimResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(OptimError::invalid(name, "must lie in [0, 1]"));
    }
    Ok(())
}

fn check_epsilon(value: Scalar) -> OptimResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(OptimError::invalid("epsilon", "must be finite and > 0"));
    }
    Ok(())
}

macro_rules! impl_line_search_access {
    ($t:ty, |$p:ident| $check:block) => {
        impl OptimizerParams for $t {
            fn line_search(&self) -> &LineSearchParams {
                &self.base
            }

            fn line_search_mut(&mut self) -> &mut LineSearchParams {
                &mut self.base
            }

            fn validate(&self) -> OptimResult<()> {
                self.base.validate()?;
                let $p = self;
                $check
                Ok(())
            }
        }
    };
}

/// Plain gradient descent has nothing beyond the stopping rule; the step comes from the
/// stepsize search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientDescentParams {
    pub base: LineSearchParams,
}

impl_line_search_access!(GradientDescentParams, |_p| {});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    pub base: LineSearchParams,
    /// Learning rate
    pub alpha: Scalar,
    /// Momentum coefficient
    pub beta: Scalar,
}

impl Default for MomentumParams {
    fn default() -> Self {
        MomentumParams {
            base: LineSearchParams::default(),
            alpha: 0.001,
            beta: 0.9,
        }
    }
}

impl_line_search_access!(MomentumParams, |p| {
    check_rate("alpha", p.alpha)?;
    check_unit("beta", p.beta)?;
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NesterovMomentumParams {
    pub base: LineSearchParams,
    pub alpha: Scalar,
    pub beta: Scalar,
}

impl Default for NesterovMomentumParams {
    fn default() -> Self {
        NesterovMomentumParams {
            base: LineSearchParams::default(),
            alpha: 0.001,
            beta: 0.9,
        }
    }
}

impl_line_search_access!(NesterovMomentumParams, |p| {
    check_rate("alpha", p.alpha)?;
    check_unit("beta", p.beta)?;
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaGradParams {
    pub base: LineSearchParams,
    pub alpha: Scalar,
    pub epsilon: Scalar,
}

impl Default for AdaGradParams {
    fn default() -> Self {
        AdaGradParams {
            base: LineSearchParams::default(),
            alpha: 0.01,
            epsilon: 1e-8,
        }
    }
}

impl_line_search_access!(AdaGradParams, |p| {
    check_rate("alpha", p.alpha)?;
    check_epsilon(p.epsilon)?;
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RmsPropParams {
    pub base: LineSearchParams,
    pub alpha: Scalar,
    /// Decay of the squared-gradient running average
    pub gamma: Scalar,
    pub epsilon: Scalar,
}

impl Default for RmsPropParams {
    fn default() -> Self {
        RmsPropParams {
            base: LineSearchParams::default(),
            alpha: 0.001,
            gamma: 0.9,
            epsilon: 1e-8,
        }
    }
}

impl_line_search_access!(RmsPropParams, |p| {
    check_rate("alpha", p.alpha)?;
    check_unit("gamma", p.gamma)?;
    check_epsilon(p.epsilon)?;
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaDeltaParams {
    pub base: LineSearchParams,
    /// Decay of both running averages
    pub gamma: Scalar,
    pub epsilon: Scalar,
    /// First iteration that uses the closed-form adaptive update instead of the
    /// stepsize search.
    pub phase_switch_iteration: usize,
}

impl Default for AdaDeltaParams {
    fn default() -> Self {
        AdaDeltaParams {
            base: LineSearchParams::default(),
            gamma: 0.9,
            epsilon: 1e-8,
            phase_switch_iteration: 1000,
        }
    }
}

impl_line_search_access!(AdaDeltaParams, |p| {
    check_unit("gamma", p.gamma)?;
    check_epsilon(p.epsilon)?;
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamParams {
    pub base: LineSearchParams,
    pub alpha: Scalar,
    pub beta1: Scalar,
    pub beta2: Scalar,
    pub epsilon: Scalar,
}

impl Default for AdamParams {
    fn default() -> Self {
        AdamParams {
            base: LineSearchParams::default(),
            alpha: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

impl_line_search_access!(AdamParams, |p| {
    check_rate("alpha", p.alpha)?;
    // beta = 1 would zero the bias correction
    if !(0.0..1.0).contains(&p.beta1) {
        return Err(OptimError::invalid("beta1", "must lie in [0, 1)"));
    }
    if !(0.0..1.0).contains(&p.beta2) {
        return Err(OptimError::invalid("beta2", "must lie in [0, 1)"));
    }
    check_epsilon(p.epsilon)?;
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let p = NesterovMomentumParams::default();
        assert_eq!(p.base.min_gradient, 0.01);
        assert_eq!(p.alpha, 0.001);
        assert_eq!(p.beta, 0.9);
        assert_eq!(AdaDeltaParams::default().phase_switch_iteration, 1000);
    }

    #[test]
    fn validation_names_the_field() {
        let p = RmsPropParams {
            gamma: 1.5,
            ..RmsPropParams::default()
        };
        match p.validate() {
            Err(OptimError::InvalidParameter { parameter, .. }) => assert_eq!(parameter, "gamma"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }

        let mut p = GradientDescentParams::default();
        p.base.set_min_gradient(-1.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn counter_is_not_serialized() {
        let mut p = AdaDeltaParams::default();
        p.base.iteration_times = 42;
        let value = serde_json::to_value(&p).unwrap();
        assert!(value["base"].get("iteration_times").is_none());
        assert!(value["base"].get("max_iteration_times").is_some());

        let back: AdaDeltaParams = serde_json::from_value(value).unwrap();
        assert_eq!(back.base.iteration_times, 0);
        assert_eq!(back.gamma, p.gamma);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let p: MomentumParams = serde_json::from_str(r#"{ "beta": 0.5, "base": { "min_gradient": 1e-4 } }"#).unwrap();
        assert_eq!(p.beta, 0.5);
        assert_eq!(p.alpha, 0.001);
        assert_eq!(p.base.min_gradient, 1e-4);
    }
}
