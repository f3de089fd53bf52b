// Sat Jan 17 2026 - Alex

use crate::geo::CacheStats;
use crate::precompute::job::JobOutcome;
use crate::precompute::scheduler::RegenerateMode;
use crate::utils::format_duration;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: RegenerateMode,
    pub known: usize,
    pub scheduled: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub rows_written: usize,
    pub failed_codes: Vec<String>,
    pub cache: CacheStats,
    pub cache_released: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(mode: RegenerateMode, known: usize, scheduled: usize) -> Self {
        Self {
            mode,
            known,
            scheduled,
            written: 0,
            skipped: 0,
            failed: 0,
            rows_written: 0,
            failed_codes: Vec::new(),
            cache: CacheStats::default(),
            cache_released: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Written { rows, .. } => {
                self.written += 1;
                self.rows_written += rows;
            }
            JobOutcome::Skipped { code, .. } => {
                self.skipped += 1;
                self.failed_codes.push(code.clone());
            }
            JobOutcome::Failed { code, .. } => {
                self.failed += 1;
                self.failed_codes.push(code.clone());
            }
        }
    }

    pub fn completed(&self) -> usize {
        self.written + self.skipped + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} run: {}/{} postal codes scheduled | written: {} | skipped: {} | failed: {} | rows: {} | cache: {} entries released, {:.1}% hits | {}",
            self.mode,
            self.scheduled,
            self.known,
            self.written,
            self.skipped,
            self.failed,
            self.rows_written,
            self.cache_released,
            self.cache.hit_rate() * 100.0,
            format_duration(self.elapsed)
        )
    }
}
