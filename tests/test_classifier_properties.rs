//! Property tests for the latency classifier

use check_amqp::status::{classify, Verdict};
use proptest::prelude::*;

/// Severity rank for verdicts produced from a positive elapsed value.
/// UNKNOWN is not on the severity scale; it cannot occur for those inputs.
fn severity(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Ok => 0,
        Verdict::Warning => 1,
        Verdict::Critical => 2,
        Verdict::Unknown => u8::MAX,
    }
}

proptest! {
    #[test]
    fn classify_is_total_and_deterministic(
        elapsed in proptest::option::of(-1.0e9f64..1.0e9),
        warning in 0u64..200_000,
        span in 0u64..200_000,
    ) {
        let critical = warning + span;
        let first = classify(elapsed, warning, critical);
        let second = classify(elapsed, warning, critical);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn severity_is_nondecreasing_in_elapsed(
        lo in 0.001f64..1.0e7,
        delta in 0.0f64..1.0e7,
        warning in 1u64..100_000,
        span in 0u64..100_000,
    ) {
        let critical = warning + span;
        let hi = lo + delta;

        let slow = classify(Some(hi), warning, critical);
        let fast = classify(Some(lo), warning, critical);
        prop_assert!(
            severity(slow) >= severity(fast),
            "elapsed {} -> {:?}, elapsed {} -> {:?}",
            lo, fast, hi, slow
        );
    }

    #[test]
    fn positive_elapsed_lands_in_exactly_its_band(
        elapsed in 0.001f64..1.0e7,
        warning in 1u64..100_000,
        span in 1u64..100_000,
    ) {
        let critical = warning + span;
        let expected = if elapsed >= critical as f64 {
            Verdict::Critical
        } else if elapsed >= warning as f64 {
            Verdict::Warning
        } else {
            Verdict::Ok
        };
        prop_assert_eq!(classify(Some(elapsed), warning, critical), expected);
    }

    #[test]
    fn nonpositive_elapsed_is_always_unknown(
        elapsed in -1.0e7f64..=0.0,
        warning in 0u64..100_000,
        span in 0u64..100_000,
    ) {
        let critical = warning + span;
        prop_assert_eq!(classify(Some(elapsed), warning, critical), Verdict::Unknown);
    }

    #[test]
    fn unmeasured_is_always_unknown(
        warning in 0u64..200_000,
        span in 0u64..200_000,
    ) {
        let critical = warning + span;
        prop_assert_eq!(classify(None, warning, critical), Verdict::Unknown);
    }
}
