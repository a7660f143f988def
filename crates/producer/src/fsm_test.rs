//! State machine tests - pure transitions, no sockets, no clocks

use std::time::Duration;

use crate::fsm::{ConnectionFsm, ConnectionState, RetryDecision, RetryPolicy};

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        reconnect_interval: Duration::from_millis(50),
        max_attempts,
    }
}

#[test]
fn test_happy_path() {
    let mut fsm = ConnectionFsm::new(policy(3));
    assert_eq!(fsm.state(), ConnectionState::Disconnected);

    fsm.connect_started();
    assert_eq!(fsm.state(), ConnectionState::Connecting);

    fsm.connect_succeeded();
    assert_eq!(fsm.state(), ConnectionState::Connected);
    assert_eq!(fsm.attempts(), 0);
}

#[test]
fn test_failure_schedules_retry() {
    let mut fsm = ConnectionFsm::new(policy(3));
    fsm.connect_started();

    let decision = fsm.connect_failed();
    assert_eq!(
        decision,
        RetryDecision::RetryAfter(Duration::from_millis(50))
    );
    assert_eq!(fsm.state(), ConnectionState::ReconnectScheduled);
    assert_eq!(fsm.attempts(), 1);
}

#[test]
fn test_exhaustion_gives_up() {
    let mut fsm = ConnectionFsm::new(policy(3));

    fsm.connect_started();
    assert!(matches!(fsm.connect_failed(), RetryDecision::RetryAfter(_)));
    fsm.connect_started();
    assert!(matches!(fsm.connect_failed(), RetryDecision::RetryAfter(_)));
    fsm.connect_started();
    assert_eq!(fsm.connect_failed(), RetryDecision::GiveUp);
    assert_eq!(fsm.state(), ConnectionState::Stopped);
    assert_eq!(fsm.attempts(), 3);
}

#[test]
fn test_success_resets_attempts() {
    let mut fsm = ConnectionFsm::new(policy(2));

    fsm.connect_started();
    assert!(matches!(fsm.connect_failed(), RetryDecision::RetryAfter(_)));

    fsm.connect_started();
    fsm.connect_succeeded();
    assert_eq!(fsm.attempts(), 0);

    // A fresh failure streak starts over instead of inheriting the old one
    assert!(matches!(
        fsm.connection_lost(),
        RetryDecision::RetryAfter(_)
    ));
    assert_eq!(fsm.attempts(), 1);
}

#[test]
fn test_zero_max_attempts_retries_forever() {
    let mut fsm = ConnectionFsm::new(policy(0));

    for _ in 0..100 {
        fsm.connect_started();
        assert!(matches!(fsm.connect_failed(), RetryDecision::RetryAfter(_)));
    }
    assert_eq!(fsm.attempts(), 100);
    assert_ne!(fsm.state(), ConnectionState::Stopped);
}

#[test]
fn test_connection_lost_counts_toward_exhaustion() {
    let mut fsm = ConnectionFsm::new(policy(1));
    fsm.connect_started();
    fsm.connect_succeeded();

    assert_eq!(fsm.connection_lost(), RetryDecision::GiveUp);
    assert_eq!(fsm.state(), ConnectionState::Stopped);
}

#[test]
fn test_status_handle_tracks_transitions() {
    let mut fsm = ConnectionFsm::new(policy(3));
    let status = fsm.status();

    assert_eq!(status.state(), ConnectionState::Disconnected);
    fsm.connect_started();
    assert_eq!(status.state(), ConnectionState::Connecting);
    fsm.connect_succeeded();
    assert_eq!(status.state(), ConnectionState::Connected);
    fsm.stop();
    assert_eq!(status.state(), ConnectionState::Stopped);
}
