//! Timing utilities
//!
//! Learn and annotate calls scan every node of a graph once per query node,
//! so their duration grows with the graph. The timer logs how long a call
//! took and how many items it processed, escalating the level when a call
//! crosses its thresholds.

use std::time::{Duration, Instant};
use std::fmt::{Display, Formatter, Result as FmtResult};
use log::{log, Level};

/// Timer for measuring the duration of a pipeline stage
#[derive(Debug, Clone)]
pub struct Timer {
    /// Name of the timed stage
    name: String,

    /// Start time
    start: Instant,

    /// Items processed so far
    items: u64,

    /// Duration above which completion is logged at info level
    info_threshold: Option<Duration>,

    /// Duration above which completion is logged at warn level
    warn_threshold: Option<Duration>,

    /// Whether to log automatically on drop
    log_on_drop: bool,
}

impl Timer {
    /// Create a new timer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Timer {
            name: name.into(),
            start: Instant::now(),
            items: 0,
            info_threshold: None,
            warn_threshold: None,
            log_on_drop: true,
        }
    }

    /// Log completion at info level once `threshold` has passed
    pub fn with_info_threshold(mut self, threshold: Duration) -> Self {
        self.info_threshold = Some(threshold);
        self
    }

    /// Log completion at warn level once `threshold` has passed
    pub fn with_warn_threshold(mut self, threshold: Duration) -> Self {
        self.warn_threshold = Some(threshold);
        self
    }

    /// Disable automatic logging on drop
    pub fn without_auto_log(mut self) -> Self {
        self.log_on_drop = false;
        self
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record processed items
    pub fn add_items(&mut self, count: u64) {
        self.items += count;
    }

    /// Items recorded so far
    pub fn items(&self) -> u64 {
        self.items
    }

    /// Level the elapsed time would be logged at right now
    pub fn level(&self) -> Level {
        let elapsed = self.elapsed();
        let exceeded = |threshold: Option<Duration>| threshold.map_or(false, |t| elapsed > t);

        if exceeded(self.warn_threshold) {
            Level::Warn
        } else if exceeded(self.info_threshold) {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Log the elapsed time at a level chosen by the thresholds
    ///
    /// Anything above debug level is tagged `[SLOW]`.
    pub fn log(&self, message: impl Into<String>) {
        let level = self.level();
        let msg = format!(
            "{} {}: {:?} ({} items)",
            self.name,
            message.into(),
            self.elapsed(),
            self.items
        );

        if level == Level::Debug {
            log!(level, "{}", msg);
        } else {
            log!(level, "{} [SLOW]", msg);
        }
    }
}

impl Display for Timer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {:?}", self.name, self.elapsed())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if self.log_on_drop {
            self.log("completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timer_items() {
        let mut timer = Timer::new("scan").without_auto_log();
        timer.add_items(3);
        timer.add_items(4);
        assert_eq!(timer.items(), 7);
        assert!(timer.to_string().starts_with("scan: "));
    }

    #[test]
    fn test_timer_thresholds() {
        let timer = Timer::new("scan")
            .with_info_threshold(Duration::from_millis(5))
            .with_warn_threshold(Duration::from_secs(60))
            .without_auto_log();

        thread::sleep(Duration::from_millis(10));
        assert_eq!(timer.level(), Level::Info);
        assert!(timer.elapsed() >= Duration::from_millis(10));

        let slow = Timer::new("scan")
            .with_info_threshold(Duration::from_millis(1))
            .with_warn_threshold(Duration::from_millis(5))
            .without_auto_log();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(slow.level(), Level::Warn);
    }

    #[test]
    fn test_timer_without_thresholds() {
        let timer = Timer::new("scan");
        assert_eq!(timer.level(), Level::Debug);
    }
}
