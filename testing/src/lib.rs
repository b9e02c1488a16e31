//! # Rooms Testing
//!
//! Testing utilities and helpers for the Rooms booking backend.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits (`FixedClock`, `SequentialIdGenerator`)
//! - [`ReducerTest`], a Given-When-Then builder for reducer unit tests
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use rooms_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(SettlementSaga::new(config))
//!     .with_env(environment)
//!     .given_state(SettlementState::default())
//!     .when_action(SettlementAction::CreateOrder { requester, payload })
//!     .then_state(|state| assert_eq!(state.phase, SettlementPhase::FetchingGuarantee))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use rooms_core::environment::{Clock, IdGenerator};

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, IdGenerator, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until explicitly advanced, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use rooms_testing::mocks::FixedClock;
    /// use rooms_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            // A poisoned lock still holds a valid timestamp.
            match self.time.lock() {
                Ok(time) => *time,
                Err(poisoned) => *poisoned.into_inner(),
            }
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifier source.
    ///
    /// Yields `00000000-0000-0000-0000-000000000001`, `…0002`, and so on.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start the sequence at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }

        /// Number of identifiers handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.next.load(Ordering::SeqCst)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn generate(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = test_clock();
        let before = clock.now();
        clock.advance(Duration::hours(3));
        assert_eq!(clock.now() - before, Duration::hours(3));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(
            ids.generate().to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(
            ids.generate().to_string(),
            "00000000-0000-0000-0000-000000000002"
        );
        assert_eq!(ids.issued(), 2);
    }
}
