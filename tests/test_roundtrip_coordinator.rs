//! End-to-end coordinator tests driven by mock publisher/listener
//!
//! No broker involved: the scripted mocks exercise every outcome path and
//! the listener-termination guarantees.

use std::time::{Duration, Instant};

use check_amqp::classify;
use check_amqp::probe::{ProbeOutcome, RoundTripCoordinator};
use check_amqp::status::Verdict;
use check_amqp::testing::{sample_probe_config, ListenerScript, MockListener, MockPublisher};

#[tokio::test]
async fn test_fast_reply_classifies_ok() {
    let config = sample_probe_config(5000, 20000);
    let listener = MockListener::new(ListenerScript::ReplyAfter(Duration::from_millis(100)));
    let publisher = MockPublisher::new();
    let published = publisher.published.clone();

    let coordinator = RoundTripCoordinator::new(publisher, listener);
    let outcome = coordinator.run(&config).await;

    let ProbeOutcome::Replied { elapsed_ms } = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert!(elapsed_ms >= 100.0, "elapsed was {elapsed_ms}");
    assert!(elapsed_ms < 5000.0, "elapsed was {elapsed_ms}");

    let verdict = classify(outcome.classifier_input_ms(), 5000, 20000);
    assert_eq!(verdict, Verdict::Ok);
    assert_eq!(verdict.exit_code(), 0);

    // Exactly one probe message went out, addressed per the config.
    let published = published.lock().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].reply_to, config.reply_to);
}

#[tokio::test]
async fn test_silent_listener_classifies_critical_within_bound() {
    // Short critical bound keeps the test fast; semantics are identical.
    let config = sample_probe_config(100, 300);
    let listener = MockListener::new(ListenerScript::Silent);
    let cancelled = listener.cancelled.clone();
    let finished = listener.finished.clone();

    let coordinator = RoundTripCoordinator::new(MockPublisher::new(), listener);
    let started = Instant::now();
    let outcome = coordinator.run(&config).await;
    let took = started.elapsed();

    let ProbeOutcome::NoReply { waited_ms } = outcome else {
        panic!("expected no reply, got {outcome:?}");
    };
    assert!(waited_ms >= 300.0, "waited {waited_ms}ms");
    // The coordinator must not wait meaningfully past the critical bound
    // (plus the listener shutdown grace).
    assert!(took < Duration::from_millis(1500), "run took {took:?}");

    let verdict = classify(outcome.classifier_input_ms(), 100, 300);
    assert_eq!(verdict, Verdict::Critical);
    assert_eq!(verdict.exit_code(), 2);

    // The listener was cancelled and wound down, not left running.
    assert!(cancelled.load(std::sync::atomic::Ordering::SeqCst));
    assert!(finished.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_publish_failure_short_circuits_to_unknown() {
    let config = sample_probe_config(5000, 20000);
    let listener = MockListener::new(ListenerScript::Silent);
    let cancelled = listener.cancelled.clone();

    let coordinator = RoundTripCoordinator::new(MockPublisher::with_failure(), listener);
    let started = Instant::now();
    let outcome = coordinator.run(&config).await;
    let took = started.elapsed();

    assert_eq!(outcome, ProbeOutcome::PublishFailed);
    assert!(!outcome.publish_succeeded());
    assert_eq!(outcome.measured_ms(), None);

    // No reply wait: the run must return long before the critical bound.
    assert!(took < Duration::from_millis(1000), "run took {took:?}");

    let verdict = classify(outcome.classifier_input_ms(), 5000, 20000);
    assert_eq!(verdict, Verdict::Unknown);
    assert_eq!(verdict.exit_code(), 3);

    // The listener was terminated, not left blocking in the background.
    assert!(cancelled.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_listener_crash_is_treated_as_no_reply() {
    let config = sample_probe_config(100, 5000);
    let listener = MockListener::new(ListenerScript::ExitWithoutSignal);

    let coordinator = RoundTripCoordinator::new(MockPublisher::new(), listener);
    let started = Instant::now();
    let outcome = coordinator.run(&config).await;
    let took = started.elapsed();

    // The crash is detected well before the 5s bound, but the verdict is
    // the same as a timeout: nothing was received.
    assert!(matches!(outcome, ProbeOutcome::NoReply { .. }));
    assert!(took < Duration::from_millis(1000), "run took {took:?}");

    let verdict = classify(outcome.classifier_input_ms(), 100, 5000);
    assert_eq!(verdict, Verdict::Critical);
}

#[tokio::test]
async fn test_stale_signal_never_reports_false_success() {
    // The listener sleeps through cancellation and signals after the
    // coordinator has already given up; the run must stand by its NoReply.
    let config = sample_probe_config(50, 100);
    let listener = MockListener::new(ListenerScript::ReplyIgnoringCancel(Duration::from_millis(
        400,
    )));

    let coordinator = RoundTripCoordinator::new(MockPublisher::new(), listener);
    let outcome = coordinator.run(&config).await;

    assert!(
        matches!(outcome, ProbeOutcome::NoReply { .. }),
        "stale signal produced {outcome:?}"
    );
    assert_eq!(
        classify(outcome.classifier_input_ms(), 50, 100),
        Verdict::Critical
    );

    // A fresh run with a fresh listener instance is unaffected.
    let listener = MockListener::new(ListenerScript::ReplyAfter(Duration::from_millis(20)));
    let coordinator = RoundTripCoordinator::new(MockPublisher::new(), listener);
    let outcome = coordinator.run(&sample_probe_config(5000, 20000)).await;
    assert!(matches!(outcome, ProbeOutcome::Replied { .. }));
}

#[tokio::test]
async fn test_reply_elapsed_is_rounded_to_two_decimals() {
    let config = sample_probe_config(5000, 20000);
    let listener = MockListener::new(ListenerScript::ReplyAfter(Duration::from_millis(30)));
    let coordinator = RoundTripCoordinator::new(MockPublisher::new(), listener);

    let outcome = coordinator.run(&config).await;
    let ProbeOutcome::Replied { elapsed_ms } = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    let centis = elapsed_ms * 100.0;
    assert!((centis - centis.round()).abs() < 1e-9, "elapsed {elapsed_ms}");
}
