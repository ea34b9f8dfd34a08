//! Deadline utilities for engine calls.

use std::time::{Duration, Instant};

pub(crate) fn deadline_exceeded(deadline: Option<Instant>) -> bool {
    match deadline {
        Some(deadline) => Instant::now() >= deadline,
        None => false,
    }
}

pub(crate) fn overall_timeout_duration(timeout_secs: u64) -> Option<Duration> {
    if timeout_secs == 0 {
        None
    } else {
        Some(Duration::from_secs(timeout_secs))
    }
}

pub(crate) fn deadline_from_timeout_secs(timeout_secs: u64) -> Option<Instant> {
    overall_timeout_duration(timeout_secs).and_then(|t| Instant::now().checked_add(t))
}

/// Whole seconds left before `deadline`, rounded up; `Some(0)` once passed.
pub(crate) fn remaining_timeout_secs(deadline: Option<Instant>) -> Option<u64> {
    let deadline = deadline?;
    let now = Instant::now();
    if now >= deadline {
        return Some(0);
    }
    let remaining = deadline.saturating_duration_since(now);
    let secs = remaining.as_secs();
    let rounded_up = if remaining.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    };
    Some(rounded_up.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_exceeded_none_returns_false() {
        assert!(!deadline_exceeded(None));
    }

    #[test]
    fn deadline_exceeded_future_returns_false() {
        let future = Instant::now() + Duration::from_secs(60);
        assert!(!deadline_exceeded(Some(future)));
    }

    #[test]
    fn deadline_exceeded_now_returns_true() {
        assert!(deadline_exceeded(Some(Instant::now())));
    }

    #[test]
    fn zero_timeout_means_no_deadline() {
        assert!(overall_timeout_duration(0).is_none());
        assert!(deadline_from_timeout_secs(0).is_none());
    }

    #[test]
    fn deadline_from_timeout_secs_nonzero_returns_future_instant() {
        let deadline = deadline_from_timeout_secs(10).expect("deadline should be set");
        assert!(deadline > Instant::now());
    }

    #[test]
    fn remaining_timeout_secs_none_returns_none() {
        assert!(remaining_timeout_secs(None).is_none());
    }

    #[test]
    fn remaining_timeout_secs_past_deadline_returns_zero() {
        assert_eq!(remaining_timeout_secs(Some(Instant::now())), Some(0));
    }

    #[test]
    fn remaining_timeout_secs_minimum_is_one() {
        let close_future = Instant::now() + Duration::from_millis(200);
        let remaining = remaining_timeout_secs(Some(close_future)).expect("deadline is set");
        assert!(remaining >= 1);
    }

    #[test]
    fn remaining_timeout_secs_future_deadline_rounds_up() {
        let future = Instant::now() + Duration::from_secs(60);
        let secs = remaining_timeout_secs(Some(future)).expect("deadline is set");
        assert!((59..=60).contains(&secs));
    }
}
