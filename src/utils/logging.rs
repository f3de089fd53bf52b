// Tue Jan 13 2026 - Alex

use log::LevelFilter;
use std::time::Instant;

pub fn level_from_str(s: &str) -> LevelFilter {
    match s.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Installs the global logger. Later calls are ignored so tests can call it freely.
pub fn init_logger(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}

pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        log::debug!("[TIMER] {} took {:.2}ms", self.name, elapsed.as_secs_f64() * 1000.0);
    }
}

pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name)
}
