//! # Line-Search Optimizer
//!
//! The iteration skeleton every method runs through:
//!
//! ```text
//! Init ──optimize──▶ Iterating ──‖g‖ < min_gradient──▶ Converged
//!                        │
//!                        └──iteration_times >= max──▶ MaxIterExceeded
//! ```
//!
//! Each pass reads value and gradient from the functor, checks the cap, then the
//! gradient threshold, and otherwise lets the [`UpdateRule`] compute `dx`, moves the
//! functor to `x + dx` and rolls the rule's accumulators.

use super::{Optimizer, OptimizerStatus, StepContext, UpdateRule};
use crate::error::{OptimError, OptimResult};
use crate::functor::{norm, Functor, Scalar, SharedFunctor};
use crate::params::OptimizerParams;
use crate::report::{ConsoleReporter, IterationRecord, Reporter};
use crate::stepsize::{StepsizeSearch, StepsizeSearchParams};
use ndarray::Array1;

enum SearchChoice {
    /// The rule's default strategy, rebuilt on every `init`.
    Rule,
    /// Built from params on every `init`.
    Params(StepsizeSearchParams),
    /// Injected by the caller; kept across `init` calls.
    Custom,
}

/// Generic line-search optimizer, specialized by an update rule `R`.
///
/// The params bundle is borrowed for `'a`: the optimizer increments its iteration
/// counter in place and the caller gets it back when the optimizer is dropped. The
/// functor is shared with the stepsize search and the caller.
pub struct LineSearchOptimizer<'a, F: Functor + 'a, R: UpdateRule<F>> {
    rule: R,
    f: Option<SharedFunctor<F>>,
    params: Option<&'a mut R::Params>,
    ss: Option<Box<dyn StepsizeSearch<F> + 'a>>,
    search_choice: SearchChoice,
    reporter: Box<dyn Reporter + 'a>,
    stepsize: Scalar,
    d: Array1<Scalar>,
    x: Array1<Scalar>,
    x_next: Array1<Scalar>,
    g: Array1<Scalar>,
    value: Scalar,
    status: OptimizerStatus,
}

impl<'a, F: Functor + 'a, R: UpdateRule<F> + Default> LineSearchOptimizer<'a, F, R> {
    pub fn new() -> Self {
        Self::with_rule(R::default())
    }
}

impl<'a, F: Functor + 'a, R: UpdateRule<F> + Default> Default for LineSearchOptimizer<'a, F, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, F: Functor + 'a, R: UpdateRule<F>> LineSearchOptimizer<'a, F, R> {
    pub fn with_rule(rule: R) -> Self {
        LineSearchOptimizer {
            rule,
            f: None,
            params: None,
            ss: None,
            search_choice: SearchChoice::Rule,
            reporter: Box::new(ConsoleReporter::default()),
            stepsize: 0.0,
            d: Array1::zeros(0),
            x: Array1::zeros(0),
            x_next: Array1::zeros(0),
            g: Array1::zeros(0),
            value: 0.0,
            status: OptimizerStatus::Init,
        }
    }

    /// Uses `search` instead of the method's default strategy. It is bound to the
    /// functor during `init`; its own params are left alone.
    #[must_use]
    pub fn with_stepsize_search(mut self, search: Box<dyn StepsizeSearch<F> + 'a>) -> Self {
        self.ss = Some(search);
        self.search_choice = SearchChoice::Custom;
        self
    }

    /// Builds the stepsize search from `params` instead of the method's default.
    #[must_use]
    pub fn with_stepsize_params(mut self, params: StepsizeSearchParams) -> Self {
        self.ss = None;
        self.search_choice = SearchChoice::Params(params);
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'a) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Binds the functor and params, moves the functor to `initial`, prepares and binds
    /// the stepsize search and zeroes the rule's accumulators. Resets the iteration
    /// counter in `params`.
    ///
    /// # Errors
    /// * `InvalidParameter` if `params` (or the configured stepsize params) fail validation
    /// * `DimensionMismatch` if `initial` or the gradient disagree with `f.dim()`
    pub fn init(
        &mut self,
        initial: &Array1<Scalar>,
        f: SharedFunctor<F>,
        params: &'a mut R::Params,
    ) -> OptimResult<()> {
        params.validate()?;

        let dim = f.borrow().dim();
        if initial.len() != dim {
            return Err(OptimError::dimension("initial point", dim, initial.len()));
        }

        // Everything that can reject the configuration runs before the functor moves
        let mut ss = match &self.search_choice {
            SearchChoice::Rule => self.rule.default_stepsize_search(params).build()?,
            SearchChoice::Params(p) => p.build()?,
            SearchChoice::Custom => match self.ss.take() {
                Some(ss) => ss,
                None => self.rule.default_stepsize_search(params).build()?,
            },
        };

        f.borrow_mut().set_x(initial);
        let (x, value, g) = match read_point(&f, dim) {
            Ok(point) => point,
            Err(err) => {
                if matches!(self.search_choice, SearchChoice::Custom) {
                    self.ss = Some(ss);
                }
                return Err(err);
            }
        };
        ss.bind(f.clone());

        self.rule.reset(dim);
        params.line_search_mut().iteration_times = 0;

        self.ss = Some(ss);
        self.f = Some(f);
        self.params = Some(params);
        self.stepsize = 0.0;
        self.d = Array1::zeros(dim);
        self.x_next = Array1::zeros(dim);
        self.x = x;
        self.g = g;
        self.value = value;
        self.status = OptimizerStatus::Init;
        Ok(())
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Step length chosen by the last stepsize search.
    pub fn stepsize(&self) -> Scalar {
        self.stepsize
    }

    /// Direction of the last update.
    pub fn direction(&self) -> &Array1<Scalar> {
        &self.d
    }

    pub fn stepsize_search(&self) -> Option<&(dyn StepsizeSearch<F> + 'a)> {
        self.ss.as_deref()
    }
}

impl<'a, F: Functor + 'a, R: UpdateRule<F>> Optimizer for LineSearchOptimizer<'a, F, R> {
    fn name(&self) -> &'static str {
        self.rule.name()
    }

    fn status(&self) -> OptimizerStatus {
        self.status
    }

    fn iterations(&self) -> usize {
        self.params
            .as_deref()
            .map(|p| p.line_search().iteration_times)
            .unwrap_or(0)
    }

    fn optimize(&mut self) -> OptimResult<Array1<Scalar>> {
        let name = self.rule.name();
        let LineSearchOptimizer {
            rule,
            f,
            params,
            ss,
            reporter,
            stepsize,
            d,
            x,
            x_next,
            g,
            value,
            status,
            ..
        } = self;
        let (f, params, ss) = match (f.as_ref(), params.as_deref_mut(), ss.as_deref_mut()) {
            (Some(f), Some(params), Some(ss)) => (f, params, ss),
            _ => return Err(OptimError::Uninitialized(name)),
        };
        let dim = x.len();

        (*x, *value, *g) = read_point(f, dim)?;
        reporter.on_start(name, x, *value);
        *status = OptimizerStatus::Iterating;

        loop {
            (*x, *value, *g) = read_point(f, dim)?;

            let ls = params.line_search();
            if ls.iteration_times >= ls.max_iteration_times {
                *status = OptimizerStatus::MaxIterExceeded;
                reporter.on_max_iterations(ls.iteration_times, x, *value);
                return Ok(x.clone());
            }
            let gradient_norm = norm(g);
            if gradient_norm < ls.min_gradient {
                *status = OptimizerStatus::Converged;
                reporter.on_converged(ls.iteration_times, x, *value);
                return Ok(x.clone());
            }

            params.line_search_mut().iteration_times += 1;
            let iteration = params.line_search().iteration_times;
            reporter.on_iteration(&IterationRecord {
                iteration,
                x: x.clone(),
                value: *value,
                gradient_norm,
            });

            let dx = {
                let mut step = StepContext {
                    iteration,
                    x: &*x,
                    g: &*g,
                    functor: f,
                    search: &mut *ss,
                    stepsize: &mut *stepsize,
                    direction: &mut *d,
                };
                rule.compute_update(&mut step, params)?
            };
            if dx.len() != dim {
                return Err(OptimError::dimension("update step", dim, dx.len()));
            }

            *x_next = &*x + &dx;
            f.borrow_mut().set_x(x_next);
            rule.commit();
        }
    }
}

fn read_point<F: Functor>(
    f: &SharedFunctor<F>,
    dim: usize,
) -> OptimResult<(Array1<Scalar>, Scalar, Array1<Scalar>)> {
    let f = f.borrow();
    let g = f.jacobian();
    if g.len() != dim {
        return Err(OptimError::dimension("gradient", dim, g.len()));
    }
    Ok((f.x().clone(), f.value(), g))
}
