//! # Progress Reporting
//!
//! Optimizers never print. They call a [`Reporter`] at fixed points of the iteration
//! loop: once before the first iteration, once per update step, and once when a
//! terminal state is reached.

use crate::functor::Scalar;
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// Snapshot of one update step, taken before the step is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub iteration: usize,
    pub x: Array1<Scalar>,
    pub value: Scalar,
    pub gradient_norm: Scalar,
}

/// Observer of optimizer progress. Every hook defaults to a no-op.
pub trait Reporter {
    fn on_start(&mut self, _optimizer: &str, _x: &Array1<Scalar>, _value: Scalar) {}

    fn on_iteration(&mut self, _record: &IterationRecord) {}

    fn on_converged(&mut self, _iterations: usize, _x: &Array1<Scalar>, _value: Scalar) {}

    /// The iteration cap was hit before the gradient threshold.
    fn on_max_iterations(&mut self, _iterations: usize, _x: &Array1<Scalar>, _value: Scalar) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Human-readable progress on the console. Summaries go to stdout, the
/// non-convergence notice to stderr. Per-iteration lines only when `verbose`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn verbose() -> Self {
        ConsoleReporter { verbose: true }
    }
}

impl Reporter for ConsoleReporter {
    fn on_start(&mut self, optimizer: &str, x: &Array1<Scalar>, value: Scalar) {
        println!("Optimizer: {}", optimizer);
        println!("Initial x: {}", x);
        println!("Initial value: {}", value);
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        if self.verbose {
            println!(
                "Iteration {}: x = {}, value = {}, |g| = {}",
                record.iteration, record.x, record.value, record.gradient_norm
            );
        }
    }

    fn on_converged(&mut self, iterations: usize, x: &Array1<Scalar>, value: Scalar) {
        println!("Iteration times: {}", iterations);
        println!("Result x: {}", x);
        println!("Result value: {}", value);
    }

    fn on_max_iterations(&mut self, iterations: usize, x: &Array1<Scalar>, value: Scalar) {
        eprintln!(
            "Beyond max iteration times ({}), cannot convergence",
            iterations
        );
        println!("Result x: {}", x);
        println!("Result value: {}", value);
    }
}

/// How a recorded run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedOutcome {
    Converged { iterations: usize },
    MaxIterations { iterations: usize },
}

#[derive(Debug, Default)]
struct Trace {
    records: Vec<IterationRecord>,
    outcome: Option<RecordedOutcome>,
}

/// Keeps every iteration in memory. Clones share the same trace, so keep one clone and
/// hand the other to the optimizer.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    trace: Rc<RefCell<Trace>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<IterationRecord> {
        self.trace.borrow().records.clone()
    }

    pub fn len(&self) -> usize {
        self.trace.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn outcome(&self) -> Option<RecordedOutcome> {
        self.trace.borrow().outcome
    }
}

impl Reporter for RecordingReporter {
    fn on_start(&mut self, _optimizer: &str, _x: &Array1<Scalar>, _value: Scalar) {
        let mut trace = self.trace.borrow_mut();
        trace.records.clear();
        trace.outcome = None;
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        self.trace.borrow_mut().records.push(record.clone());
    }

    fn on_converged(&mut self, iterations: usize, _x: &Array1<Scalar>, _value: Scalar) {
        self.trace.borrow_mut().outcome = Some(RecordedOutcome::Converged { iterations });
    }

    fn on_max_iterations(&mut self, iterations: usize, _x: &Array1<Scalar>, _value: Scalar) {
        self.trace.borrow_mut().outcome = Some(RecordedOutcome::MaxIterations { iterations });
    }
}
