//! Training session: owns the mixture while the E/M loop runs and recovers
//! from numerical failures by reseeding and reinitializing.

use super::expectation::e_step;
use super::fitted::FittedModel;
use super::maximization::m_step;
use super::model::{ColumnSummary, EmModel};
use super::params::{EmParams, Initialization};
use super::restart::SeedSchedule;
use crate::dataset::{Dataset, Instance};
use crate::diagnostics::timing::{elapsed_ms, Stage};
use crate::diagnostics::{FitReport, FitState, IterationRecord, RestartEvent};
use crate::error::{EmError, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Result of one uninterrupted run of the E/M loop.
struct Attempt {
    log_likelihood: f64,
    converged: bool,
    trace: Vec<IterationRecord>,
}

pub(crate) struct Trainer<'a> {
    data: &'a Dataset,
    params: &'a EmParams,
    init: &'a Initialization,
    columns: Vec<ColumnSummary>,
    seeds: SeedSchedule,
    num_clusters: usize,
    state: FitState,
    report: FitReport,
}

impl<'a> Trainer<'a> {
    pub(crate) fn new(
        data: &'a Dataset,
        params: &'a EmParams,
        init: &'a Initialization,
    ) -> Result<Self> {
        validate(data, params, init)?;
        let t0 = Instant::now();
        let columns = ColumnSummary::collect(data, params)?;
        let mut report = FitReport::new(params.num_clusters);
        report.timing.record(Stage::ColumnSummaries, t0);
        Ok(Self {
            data,
            params,
            init,
            columns,
            seeds: SeedSchedule::new(params.seed),
            num_clusters: params.num_clusters,
            state: FitState::Uninitialized,
            report,
        })
    }

    fn transition(&mut self, next: FitState) {
        debug!("EM state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Build a fresh model for the current cluster count and seed.
    fn initialize(&mut self) -> Result<EmModel> {
        let init = self.init;
        let model = match init {
            Initialization::Centers { centers, sizes } => EmModel::initialize(
                self.data,
                centers,
                sizes,
                self.num_clusters,
                &self.columns,
                self.params,
            )?,
            Initialization::RandomRows => {
                let k = self.num_clusters;
                let n = self.data.num_instances();
                let rows = rand::seq::index::sample(self.seeds.rng(), n, k);
                let centers: Vec<Instance> = rows
                    .iter()
                    .map(|row| self.data.instances()[row].clone())
                    .collect();
                EmModel::initialize(
                    self.data,
                    &centers,
                    &vec![1.0; k],
                    k,
                    &self.columns,
                    self.params,
                )?
            }
        };
        self.transition(FitState::Initialized);
        Ok(model)
    }

    /// Run E/M rounds until the gain drops under the tolerance or the
    /// iteration cap is reached.
    fn iterate(&mut self, model: &mut EmModel) -> Result<Attempt> {
        self.transition(FitState::Iterating);
        let mut trace = Vec::new();
        let mut llk = 0.0;
        for i in 0..self.params.max_iterations {
            let llk_old = llk;
            llk = e_step(self.data, model, self.params.parallel)?;
            let gain = (i > 0).then(|| llk - llk_old);
            debug!("EM iteration {i}: loglik={llk:.9} gain={gain:?}");
            trace.push(IterationRecord {
                iteration: i,
                log_likelihood: llk,
                gain,
            });
            if gain.is_some_and(|g| g < self.params.convergence_tolerance) {
                return Ok(Attempt {
                    log_likelihood: llk,
                    converged: true,
                    trace,
                });
            }
            m_step(self.data, model, &self.columns, self.params.min_std_dev)?;
        }
        Ok(Attempt {
            log_likelihood: llk,
            converged: false,
            trace,
        })
    }

    /// Fit the mixture, restarting after numerical failures.
    ///
    /// Every failure advances the seed and reinitializes from the same
    /// starting point. Once `restarts_per_reduction` consecutive restarts have
    /// failed, the next failure drops one cluster. The loop gives up when the
    /// restart budget is spent or a single cluster keeps failing.
    pub(crate) fn run(mut self) -> Result<FittedModel> {
        let t0 = Instant::now();
        let mut model = self.initialize()?;
        let mut restarts = 0usize;
        let mut since_reduction = 0usize;
        loop {
            let attempt_start = Instant::now();
            match self.iterate(&mut model) {
                Ok(attempt) => {
                    self.report
                        .timing
                        .record(Stage::Attempt(restarts), attempt_start);
                    self.transition(FitState::Converged);
                    info!(
                        "EM finished: k={} iterations={} loglik={:.6} converged={} restarts={}",
                        self.num_clusters,
                        attempt.trace.len(),
                        attempt.log_likelihood,
                        attempt.converged,
                        restarts
                    );
                    self.report.state = self.state;
                    self.report.final_clusters = self.num_clusters;
                    self.report.converged = attempt.converged;
                    self.report.final_log_likelihood = attempt.log_likelihood;
                    self.report.iterations = attempt.trace;
                    self.report.timing.total_ms = elapsed_ms(t0);
                    return Ok(FittedModel::new(model, self.report));
                }
                Err(err) => {
                    self.report
                        .timing
                        .record(Stage::Attempt(restarts), attempt_start);
                    self.transition(FitState::Reinitializing);
                    since_reduction += 1;
                    let budget_spent =
                        self.params.max_restarts.is_some_and(|max| restarts >= max);
                    let must_reduce = since_reduction > self.params.restarts_per_reduction;
                    if budget_spent || (must_reduce && self.num_clusters <= 1) {
                        warn!("EM giving up after {restarts} restarts: {err}");
                        return Err(EmError::RetryBudgetExhausted {
                            restarts,
                            last_failure: err.to_string(),
                        });
                    }
                    restarts += 1;
                    self.seeds.advance();
                    if must_reduce {
                        self.num_clusters -= 1;
                        since_reduction = 0;
                        warn!("EM reducing number of clusters to {}", self.num_clusters);
                    }
                    warn!(
                        "EM restart {restarts} with seed {} after training failure: {err}",
                        self.seeds.seed()
                    );
                    self.report.restarts.push(RestartEvent {
                        restart: restarts,
                        next_seed: self.seeds.seed(),
                        num_clusters: self.num_clusters,
                        reason: err.to_string(),
                    });
                    model = self.initialize()?;
                }
            }
        }
    }
}

fn validate(data: &Dataset, params: &EmParams, init: &Initialization) -> Result<()> {
    let k = params.num_clusters;
    if k == 0 {
        return Err(EmError::invalid("number of clusters must be > 0"));
    }
    if data.is_empty() {
        return Err(EmError::invalid("cannot cluster an empty dataset"));
    }
    if params.max_iterations == 0 {
        return Err(EmError::invalid("max_iterations must be > 0"));
    }
    if params.restarts_per_reduction == 0 {
        return Err(EmError::invalid("restarts_per_reduction must be > 0"));
    }
    if !(params.min_std_dev > 0.0 && params.min_std_dev.is_finite()) {
        return Err(EmError::invalid(format!(
            "min_std_dev must be positive and finite, got {}",
            params.min_std_dev
        )));
    }
    if let Some(floors) = &params.min_std_dev_per_attribute {
        if floors.len() != data.num_attributes() {
            return Err(EmError::invalid(format!(
                "{} per-attribute floors for {} attributes",
                floors.len(),
                data.num_attributes()
            )));
        }
        if let Some(bad) = floors.iter().find(|f| !(**f > 0.0 && f.is_finite())) {
            return Err(EmError::invalid(format!(
                "per-attribute floor must be positive and finite, got {bad}"
            )));
        }
    }
    match init {
        Initialization::Centers { centers, sizes } => {
            if centers.len() < k {
                return Err(EmError::invalid(format!(
                    "{k} clusters need at least {k} centers, got {}",
                    centers.len()
                )));
            }
            if sizes.len() != centers.len() {
                return Err(EmError::invalid(format!(
                    "{} sizes given for {} centers",
                    sizes.len(),
                    centers.len()
                )));
            }
            for center in centers {
                data.check_instance(center)?;
            }
            if let Some(bad) = sizes.iter().find(|s| !(**s >= 0.0)) {
                return Err(EmError::invalid(format!(
                    "cluster sizes must be non-negative, got {bad}"
                )));
            }
        }
        Initialization::RandomRows => {
            if k > data.num_instances() {
                return Err(EmError::invalid(format!(
                    "{k} clusters requested from {} rows",
                    data.num_instances()
                )));
            }
        }
    }
    Ok(())
}
