//! # Run Configuration
//!
//! Describes an optimizer run (method, its params and optionally the stepsize search)
//! as plain data, so it can be kept in a JSON file and turned into a ready optimizer.
//!
//! # Example
//!
//! ```json
//! {
//!   "method": { "adadelta": { "gamma": 0.9, "epsilon": 1e-8, "base": { "min_gradient": 0.01 } } },
//!   "stepsize_search": { "golden_section": { "tolerance": 1e-10 } }
//! }
//! ```
//!
//! Omitted fields take their defaults; `stepsize_search` can be left out entirely to use
//! the method's default strategy.

use crate::error::OptimResult;
use crate::functor::{Functor, Scalar, SharedFunctor};
use crate::optim::{
    AdaDeltaOptimizer, AdaGradOptimizer, AdamOptimizer, GradientDescentOptimizer,
    LineSearchOptimizer, MomentumOptimizer, NesterovMomentumOptimizer, Optimizer,
    RmsPropOptimizer, UpdateRule,
};
use crate::params::{
    AdaDeltaParams, AdaGradParams, AdamParams, GradientDescentParams, LineSearchParams,
    MomentumParams, NesterovMomentumParams, OptimizerParams, RmsPropParams,
};
use crate::report::{ConsoleReporter, Reporter};
use crate::stepsize::StepsizeSearchParams;
use crate::utils::serialization::SerializationError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Optimization method together with its params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodConfig {
    GradientDescent(GradientDescentParams),
    Momentum(MomentumParams),
    NesterovMomentum(NesterovMomentumParams),
    #[serde(rename = "adagrad")]
    AdaGrad(AdaGradParams),
    #[serde(rename = "rmsprop")]
    RmsProp(RmsPropParams),
    #[serde(rename = "adadelta")]
    AdaDelta(AdaDeltaParams),
    Adam(AdamParams),
}

impl MethodConfig {
    pub fn line_search(&self) -> &LineSearchParams {
        match self {
            MethodConfig::GradientDescent(p) => p.line_search(),
            MethodConfig::Momentum(p) => p.line_search(),
            MethodConfig::NesterovMomentum(p) => p.line_search(),
            MethodConfig::AdaGrad(p) => p.line_search(),
            MethodConfig::RmsProp(p) => p.line_search(),
            MethodConfig::AdaDelta(p) => p.line_search(),
            MethodConfig::Adam(p) => p.line_search(),
        }
    }

    pub fn validate(&self) -> OptimResult<()> {
        match self {
            MethodConfig::GradientDescent(p) => p.validate(),
            MethodConfig::Momentum(p) => p.validate(),
            MethodConfig::NesterovMomentum(p) => p.validate(),
            MethodConfig::AdaGrad(p) => p.validate(),
            MethodConfig::RmsProp(p) => p.validate(),
            MethodConfig::AdaDelta(p) => p.validate(),
            MethodConfig::Adam(p) => p.validate(),
        }
    }
}

impl Default for MethodConfig {
    fn default() -> Self {
        MethodConfig::AdaDelta(AdaDeltaParams::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub method: MethodConfig,
    /// Overrides the method's default stepsize search.
    pub stepsize_search: Option<StepsizeSearchParams>,
}

impl OptimizerConfig {
    pub fn new(method: MethodConfig) -> Self {
        OptimizerConfig {
            method,
            stepsize_search: None,
        }
    }

    #[must_use]
    pub fn with_stepsize_search(mut self, params: StepsizeSearchParams) -> Self {
        self.stepsize_search = Some(params);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, SerializationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> OptimResult<()> {
        self.method.validate()?;
        if let Some(search) = &self.stepsize_search {
            search.validate()?;
        }
        Ok(())
    }

    /// Builds the configured optimizer, reporting to the console, and initializes it at
    /// `initial`. The params inside this configuration are lent to the optimizer, so
    /// the iteration count can be read from `self.method` once it is dropped.
    pub fn build<'a, F: Functor + 'a>(
        &'a mut self,
        initial: &Array1<Scalar>,
        f: SharedFunctor<F>,
    ) -> OptimResult<Box<dyn Optimizer + 'a>> {
        self.build_with_reporter(initial, f, ConsoleReporter::default())
    }

    pub fn build_with_reporter<'a, F: Functor + 'a>(
        &'a mut self,
        initial: &Array1<Scalar>,
        f: SharedFunctor<F>,
        reporter: impl Reporter + 'a,
    ) -> OptimResult<Box<dyn Optimizer + 'a>> {
        let search = self.stepsize_search.clone();
        match &mut self.method {
            MethodConfig::GradientDescent(p) => {
                assemble(GradientDescentOptimizer::new(), search, reporter, initial, f, p)
            }
            MethodConfig::Momentum(p) => {
                assemble(MomentumOptimizer::new(), search, reporter, initial, f, p)
            }
            MethodConfig::NesterovMomentum(p) => {
                assemble(NesterovMomentumOptimizer::new(), search, reporter, initial, f, p)
            }
            MethodConfig::AdaGrad(p) => {
                assemble(AdaGradOptimizer::new(), search, reporter, initial, f, p)
            }
            MethodConfig::RmsProp(p) => {
                assemble(RmsPropOptimizer::new(), search, reporter, initial, f, p)
            }
            MethodConfig::AdaDelta(p) => {
                assemble(AdaDeltaOptimizer::new(), search, reporter, initial, f, p)
            }
            MethodConfig::Adam(p) => {
                assemble(AdamOptimizer::new(), search, reporter, initial, f, p)
            }
        }
    }
}

fn assemble<'a, F, R>(
    opt: LineSearchOptimizer<'a, F, R>,
    search: Option<StepsizeSearchParams>,
    reporter: impl Reporter + 'a,
    initial: &Array1<Scalar>,
    f: SharedFunctor<F>,
    params: &'a mut R::Params,
) -> OptimResult<Box<dyn Optimizer + 'a>>
where
    F: Functor + 'a,
    R: UpdateRule<F> + 'a,
{
    let mut opt = opt.with_reporter(reporter);
    if let Some(search) = search {
        opt = opt.with_stepsize_params(search);
    }
    opt.init(initial, f, params)?;
    Ok(Box::new(opt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepsize::FixedStepParams;

    #[test]
    fn parses_method_and_strategy() {
        let json = r#"{
            "method": { "momentum": { "alpha": 0.05, "base": { "max_iteration_times": 300 } } },
            "stepsize_search": { "fixed": { "step": 0.02 } }
        }"#;
        let config = OptimizerConfig::from_json_str(json).unwrap();

        match &config.method {
            MethodConfig::Momentum(p) => {
                assert_eq!(p.alpha, 0.05);
                assert_eq!(p.beta, 0.9);
                assert_eq!(p.base.max_iteration_times, 300);
            }
            other => panic!("unexpected method {:?}", other),
        }
        assert_eq!(
            config.stepsize_search,
            Some(StepsizeSearchParams::Fixed(FixedStepParams { step: 0.02 }))
        );
    }

    #[test]
    fn empty_object_is_default_adadelta() {
        let config = OptimizerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, OptimizerConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn method_names_are_stable() {
        let config = OptimizerConfig::new(MethodConfig::RmsProp(RmsPropParams::default()));
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"rmsprop\""));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = OptimizerConfig::from_json_str(r#"{ "method": { "newton": {} } }"#);
        assert!(matches!(err, Err(SerializationError::Json(_))));
    }
}
