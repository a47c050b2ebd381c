use chrono::{DateTime, Local, NaiveDate, Utc};

/// Time source for the state machine, injectable so tests can pin or advance
/// the clock.
pub trait Clock: Send + Sync {
    /// The current instant, for check-in/check-out timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// The record date key: the server's local calendar day.
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
