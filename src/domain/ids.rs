use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Time source for timestamps and transaction ids, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Default clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a human-readable transaction id from the clock plus a random
/// suffix. Owned by the domain layer so callers never invent their own ids.
pub fn transaction_id(clock: &dyn Clock) -> String {
    let stamp = clock.now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("TXN-{}-{}", stamp, &suffix[..6])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn transaction_ids_embed_the_clock_and_differ() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap());
        let first = transaction_id(&clock);
        let second = transaction_id(&clock);
        assert!(first.starts_with("TXN-20240305103000-"));
        assert_ne!(first, second, "random suffix must differ per call");
    }
}
