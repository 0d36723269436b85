//! Foundation crate tests
//!
//! Tests cover:
//! - App state machine transitions
//! - Error recovery strategies

use aegis_foundation::error::{AppError, DeviceError, RecoveryStrategy};
use aegis_foundation::state::{AppState, StateManager};
use std::time::Duration;

#[test]
fn state_manager_follows_emergency_lifecycle() {
    let mgr = StateManager::new();
    assert_eq!(mgr.current(), AppState::Initializing);

    mgr.transition(AppState::Monitoring).unwrap();
    mgr.transition(AppState::Alerting).unwrap();
    mgr.transition(AppState::Monitoring).unwrap();
    mgr.transition(AppState::Stopping).unwrap();
    mgr.transition(AppState::Stopped).unwrap();
    assert_eq!(mgr.current(), AppState::Stopped);
}

#[test]
fn state_manager_rejects_invalid_transition() {
    let mgr = StateManager::new();
    // Cannot jump straight from Initializing to Alerting
    let err = mgr.transition(AppState::Alerting).unwrap_err();
    assert!(matches!(err, AppError::Fatal(_)));
    assert_eq!(mgr.current(), AppState::Initializing);
}

#[test]
fn state_manager_notifies_subscribers() {
    let mgr = StateManager::new();
    let rx = mgr.subscribe();
    mgr.transition(AppState::Monitoring).unwrap();
    assert_eq!(rx.recv().unwrap(), AppState::Monitoring);
}

#[test]
fn subscription_failure_is_retryable() {
    let err = AppError::Device(DeviceError::SubscriptionFailed {
        reason: "sensor service not running".into(),
    });
    match err.recovery_strategy() {
        RecoveryStrategy::Retry { max_attempts, delay } => {
            assert_eq!(max_attempts, 3);
            assert_eq!(delay, Duration::from_secs(2));
        }
        other => panic!("expected Retry, got {:?}", other),
    }
}

#[test]
fn actuator_failure_degrades_instead_of_aborting() {
    let err = AppError::Device(DeviceError::ActuatorUnavailable {
        name: "haptics".into(),
    });
    assert!(matches!(err.recovery_strategy(), RecoveryStrategy::Degrade));
}

#[test]
fn fatal_errors_stay_fatal() {
    let err = AppError::Fatal("unrecoverable".into());
    assert!(matches!(err.recovery_strategy(), RecoveryStrategy::Fatal));
}
