//! Wall-clock source, injectable so tests control "now" and "today".

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Local calendar day used for `dateKey` bucketing.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Arc<Mutex<DateTime<Local>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            at: Arc::new(Mutex::new(at)),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut at) = self.at.lock() {
            *at += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        match self.at.lock() {
            Ok(at) => *at,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
