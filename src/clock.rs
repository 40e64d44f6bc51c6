use chrono::{Local, NaiveDateTime};
use rand::Rng;
use std::time::Duration;

use crate::error::ConfigError;

/// Source of the current local date and time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the process's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Decides how long to pause between a fetch and parsing the page
pub trait DelayPolicy: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Random pause drawn uniformly from `[min, max]` seconds
#[derive(Debug, Clone, Copy)]
pub struct UniformDelay {
    min_secs: f64,
    max_secs: f64,
}

impl UniformDelay {
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, ConfigError> {
        if !(min_secs >= 0.0 && max_secs >= min_secs && max_secs.is_finite()) {
            return Err(ConfigError::DelayRange {
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(Self { min_secs, max_secs })
    }
}

impl Default for UniformDelay {
    fn default() -> Self {
        Self {
            min_secs: 2.0,
            max_secs: 5.0,
        }
    }
}

impl DelayPolicy for UniformDelay {
    fn next_delay(&self) -> Duration {
        if self.max_secs <= self.min_secs {
            return Duration::from_secs_f64(self.min_secs);
        }
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

/// Skips the pause entirely (tests, one-off debugging)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}
