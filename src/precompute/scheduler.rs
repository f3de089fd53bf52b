// Sat Jan 17 2026 - Alex

use crate::config::Config;
use crate::data::ReferenceData;
use crate::geo::{CacheStats, DistanceEstimator};
use crate::precompute::error::PrecomputeResult;
use crate::precompute::job::{JobOutcome, PostalCodeJob};
use crate::precompute::report::RunReport;
use crate::store::ResultStore;
use crate::ui::progress::ProgressManager;
use crate::utils::logging::scoped_timer;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateMode {
    /// Wipe the store and compute every postal code.
    Full,
    /// Compute only postal codes without a stored result.
    Incremental,
}

impl RegenerateMode {
    pub fn from_flag(regenerate: bool) -> Self {
        if regenerate {
            RegenerateMode::Full
        } else {
            RegenerateMode::Incremental
        }
    }
}

impl fmt::Display for RegenerateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegenerateMode::Full => write!(f, "full"),
            RegenerateMode::Incremental => write!(f, "incremental"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPlan {
    /// The mode that will actually run; an incremental request on an empty store becomes full.
    pub mode: RegenerateMode,
    pub known: usize,
    pub scheduled: Vec<String>,
}

impl WorkPlan {
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ProgressCounter {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl ProgressCounter {
    fn start(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn tick(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

pub struct PrecomputeScheduler {
    data: Arc<ReferenceData>,
    store: Arc<dyn ResultStore>,
    tolerance: f64,
    workers: usize,
    show_progress: bool,
    progress: Arc<ProgressCounter>,
}

impl PrecomputeScheduler {
    pub fn new(data: Arc<ReferenceData>, store: Arc<dyn ResultStore>, config: &Config) -> Self {
        Self {
            data,
            store,
            tolerance: config.tolerance_miles,
            workers: config.workers.max(1),
            show_progress: config.show_progress,
            progress: Arc::new(ProgressCounter::default()),
        }
    }

    pub fn progress(&self) -> Arc<ProgressCounter> {
        self.progress.clone()
    }

    /// Decides what a run in `mode` would compute. Touches nothing on disk.
    pub fn plan(&self, mode: RegenerateMode) -> WorkPlan {
        let codes = self.data.postal_codes.codes();
        let known = codes.len();

        let mode = if mode == RegenerateMode::Incremental && !self.store.is_initialized() {
            log::info!("No result store found, falling back to a full run");
            RegenerateMode::Full
        } else {
            mode
        };

        let scheduled = match mode {
            RegenerateMode::Full => codes.into_iter().collect(),
            RegenerateMode::Incremental => codes
                .into_iter()
                .filter(|code| !self.store.exists(code))
                .collect(),
        };

        WorkPlan { mode, known, scheduled }
    }

    pub fn run(&self, mode: RegenerateMode) -> PrecomputeResult<RunReport> {
        let started = Instant::now();
        let plan = self.plan(mode);

        if plan.mode == RegenerateMode::Full {
            let _timer = scoped_timer("reset result store");
            self.store.reset()?;
        }

        log::info!(
            "Scheduling {} of {} postal codes ({} mode, {} workers, {} mile tolerance)",
            plan.scheduled.len(),
            plan.known,
            plan.mode,
            self.workers,
            self.tolerance
        );

        let mut report = RunReport::new(plan.mode, plan.known, plan.scheduled.len());
        if plan.is_empty() {
            report.elapsed = started.elapsed();
            return Ok(report);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("precompute-{}", i))
            .build()?;

        // one estimator per worker thread; the locks are never contended
        let estimators: Vec<Mutex<DistanceEstimator>> = (0..self.workers)
            .map(|_| Mutex::new(DistanceEstimator::new(self.tolerance)))
            .collect();

        let progress_manager = if self.show_progress {
            ProgressManager::new()
        } else {
            ProgressManager::hidden()
        };
        let bar = progress_manager.create_main_progress(plan.scheduled.len() as u64, "Computing nearby schools");

        self.progress.start(plan.scheduled.len());
        let job = PostalCodeJob::new(&self.data, self.store.as_ref());

        let outcomes: Vec<JobOutcome> = {
            let _timer = scoped_timer("postal code fan-out");
            pool.install(|| {
                plan.scheduled
                    .par_iter()
                    .map(|code| {
                        let slot = rayon::current_thread_index().unwrap_or(0) % estimators.len();
                        let outcome = job.process(code, &mut estimators[slot].lock());
                        self.progress.tick();
                        bar.inc(1);
                        outcome
                    })
                    .collect()
            })
        };

        bar.finish_with_message("Done");

        for outcome in &outcomes {
            report.record(outcome);
        }

        let mut cache = CacheStats::default();
        let mut released = 0;
        for estimator in &estimators {
            let mut estimator = estimator.lock();
            cache.merge(&estimator.cache_stats());
            released += estimator.release();
        }
        log::debug!("Released {} cached distances", released);

        report.cache = cache;
        report.cache_released = released;
        report.elapsed = started.elapsed();

        if !report.is_clean() {
            log::warn!(
                "{} postal codes have no result and will be retried on the next incremental run",
                report.failed_codes.len()
            );
        }

        Ok(report)
    }
}
