//! Convergence tests for every optimization method
//!
//! This file tests:
//! - Every method reaching a tight gradient threshold on a convex quadratic, with both
//!   searching strategies
//! - The learning-rate methods reaching a looser threshold with their default fixed step
//! - AdaDelta on x^2 from a distant start
//! - Objectives without an analytic gradient

use approx::assert_abs_diff_eq;
use descent::config::{MethodConfig, OptimizerConfig};
use descent::functor::{norm, shared, Functor, NumericalDiffFunctor, QuadraticFunctor};
use descent::optim::{
    AdaDeltaOptimizer, AdaGradOptimizer, GradientDescentOptimizer, MomentumOptimizer,
    NesterovMomentumOptimizer, Optimizer, OptimizerStatus,
};
use descent::params::*;
use descent::report::SilentReporter;
use descent::stepsize::{BacktrackingParams, GoldenSectionParams, StepsizeSearchParams};
use ndarray::{array, Array1};

fn tight(base: &mut LineSearchParams) {
    base.min_gradient = 1e-6;
    base.max_iteration_times = 5_000;
}

fn all_methods() -> Vec<MethodConfig> {
    let mut gd = GradientDescentParams::default();
    tight(&mut gd.base);
    let mut momentum = MomentumParams {
        beta: 0.5,
        ..MomentumParams::default()
    };
    tight(&mut momentum.base);
    let mut nesterov = NesterovMomentumParams {
        beta: 0.5,
        ..NesterovMomentumParams::default()
    };
    tight(&mut nesterov.base);
    let mut adagrad = AdaGradParams::default();
    tight(&mut adagrad.base);
    let mut rmsprop = RmsPropParams::default();
    tight(&mut rmsprop.base);
    let mut adadelta = AdaDeltaParams::default();
    tight(&mut adadelta.base);
    let mut adam = AdamParams::default();
    tight(&mut adam.base);

    vec![
        MethodConfig::GradientDescent(gd),
        MethodConfig::Momentum(momentum),
        MethodConfig::NesterovMomentum(nesterov),
        MethodConfig::AdaGrad(adagrad),
        MethodConfig::RmsProp(rmsprop),
        MethodConfig::AdaDelta(adadelta),
        MethodConfig::Adam(adam),
    ]
}

fn assert_converges(config: &mut OptimizerConfig) {
    let f = shared(QuadraticFunctor::diagonal(array![1.0, 3.0]));
    let label = format!("{:?}", config.method);

    let mut opt = config
        .build_with_reporter(&array![1.0, 0.5], f.clone(), SilentReporter)
        .unwrap();
    let x = opt.optimize().unwrap();

    assert_eq!(opt.status(), OptimizerStatus::Converged, "{}", label);
    // Smallest curvature is 1, so |x| <= |g|
    assert!(norm(&x) < 1e-5, "{}: x = {}", label, x);
    assert_eq!(f.borrow().x(), &x);
}

// ============================================================================
// Searching Strategies
// ============================================================================

mod searching_strategy_tests {
    use super::*;

    #[test]
    fn test_every_method_converges_with_backtracking() {
        for method in all_methods() {
            let mut config = OptimizerConfig::new(method).with_stepsize_search(
                StepsizeSearchParams::Backtracking(BacktrackingParams::default()),
            );
            assert_converges(&mut config);
        }
    }

    #[test]
    fn test_every_method_converges_with_golden_section() {
        for method in all_methods() {
            let mut config = OptimizerConfig::new(method).with_stepsize_search(
                StepsizeSearchParams::GoldenSection(GoldenSectionParams::default()),
            );
            assert_converges(&mut config);
        }
    }
}

// ============================================================================
// Default Strategies
// ============================================================================

mod default_strategy_tests {
    use super::*;

    fn loose(base: &mut LineSearchParams) {
        base.min_gradient = 1e-4;
        base.max_iteration_times = 10_000;
    }

    #[test]
    fn test_momentum_with_fixed_rate() {
        let f = shared(QuadraticFunctor::diagonal(array![1.0, 3.0]));
        let mut params = MomentumParams {
            alpha: 0.1,
            beta: 0.5,
            ..MomentumParams::default()
        };
        loose(&mut params.base);

        let mut opt = MomentumOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![1.0, 0.5], f, &mut params).unwrap();
        let x = opt.optimize().unwrap();

        assert_eq!(opt.status(), OptimizerStatus::Converged);
        assert!(norm(&x) < 1e-4);
    }

    #[test]
    fn test_nesterov_with_fixed_rate() {
        let f = shared(QuadraticFunctor::diagonal(array![1.0, 3.0]));
        let mut params = NesterovMomentumParams {
            alpha: 0.1,
            beta: 0.5,
            ..NesterovMomentumParams::default()
        };
        loose(&mut params.base);

        let mut opt = NesterovMomentumOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![1.0, 0.5], f, &mut params).unwrap();
        let x = opt.optimize().unwrap();

        assert_eq!(opt.status(), OptimizerStatus::Converged);
        assert!(norm(&x) < 1e-4);
    }

    #[test]
    fn test_adagrad_with_fixed_rate() {
        let f = shared(QuadraticFunctor::diagonal(array![1.0, 3.0]));
        let mut params = AdaGradParams {
            alpha: 0.5,
            ..AdaGradParams::default()
        };
        loose(&mut params.base);

        let mut opt = AdaGradOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![1.0, 0.5], f, &mut params).unwrap();
        let x = opt.optimize().unwrap();

        assert_eq!(opt.status(), OptimizerStatus::Converged);
        assert!(norm(&x) < 1e-4);
    }

    #[test]
    fn test_adadelta_on_square_from_ten() {
        let f = shared(QuadraticFunctor::diagonal(array![2.0]));
        let mut params = AdaDeltaParams {
            gamma: 0.9,
            epsilon: 1e-8,
            ..AdaDeltaParams::default()
        };
        params.base.min_gradient = 0.01;
        params.base.max_iteration_times = 500;

        let mut opt = AdaDeltaOptimizer::new().with_reporter(SilentReporter);
        opt.init(&array![10.0], f.clone(), &mut params).unwrap();
        let x = opt.optimize().unwrap();

        assert_eq!(opt.status(), OptimizerStatus::Converged);
        assert!(x[0].abs() < 1e-3);
        assert!(norm(&f.borrow().jacobian()) < 0.01);
    }
}

// ============================================================================
// Objectives Without Analytic Gradient
// ============================================================================

mod numerical_gradient_tests {
    use super::*;

    #[test]
    fn test_gradient_descent_on_finite_differences() {
        let f = shared(NumericalDiffFunctor::new(2, |x: &Array1<f64>| {
            (x[0] - 1.0).powi(2) + 3.0 * (x[1] + 2.0).powi(2)
        }));
        let mut params = GradientDescentParams::default();
        params.base.min_gradient = 1e-5;
        params.base.max_iteration_times = 5_000;

        let mut opt = GradientDescentOptimizer::new()
            .with_stepsize_params(StepsizeSearchParams::Backtracking(BacktrackingParams::default()))
            .with_reporter(SilentReporter);
        opt.init(&array![0.0, 0.0], f, &mut params).unwrap();
        let x = opt.optimize().unwrap();

        assert_eq!(opt.status(), OptimizerStatus::Converged);
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(x[1], -2.0, epsilon = 1e-4);
    }
}
