use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type DynClock = Arc<dyn Clock + Send + Sync>;

/// where services get "now" from, tests swap in a clock they can move around
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
