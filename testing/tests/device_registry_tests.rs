//! Device registry behaviour against in-memory storage.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use invitation_core::{AdmissionOutcome, GuestNumber, InvitationError};
use invitation_testing::{TestHarness, test_epoch};

fn link() -> GuestNumber {
    GuestNumber::from_sequence(1001)
}

#[tokio::test]
async fn test_first_device_creates_registration() {
    let harness = TestHarness::new();

    let admission = harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();

    assert!(admission.authorized());
    assert_eq!(admission.outcome, AdmissionOutcome::NewRegistration);
    assert_eq!(admission.device_count, 1);

    let stored = harness.device_repo.get(&link()).unwrap();
    assert_eq!(stored.total_devices(), 1);
    assert_eq!(stored.devices()[0].fingerprint, "fp-phone");
    assert_eq!(stored.devices()[0].user_agent, "Safari");
}

#[tokio::test]
async fn test_known_device_is_idempotent() {
    let harness = TestHarness::new();
    harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();
    harness.tick(3600);

    for _ in 0..3 {
        let admission = harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();
        assert!(admission.authorized());
        assert_eq!(admission.outcome, AdmissionOutcome::KnownDevice);
        assert_eq!(admission.device_count, 1);
    }

    let stored = harness.device_repo.get(&link()).unwrap();
    assert_eq!(stored.total_devices(), 1);
    assert_eq!(stored.devices()[0].registered_at, test_epoch());
    assert_eq!(
        stored.devices()[0].last_seen,
        test_epoch() + chrono::Duration::seconds(3600)
    );
}

#[tokio::test]
async fn test_third_device_is_denied_with_count_two() {
    let harness = TestHarness::new();
    harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();
    let second = harness.devices.register(&link(), "fp-laptop", "Firefox").await.unwrap();
    assert_eq!(second.outcome, AdmissionOutcome::DeviceAdded);

    let third = harness.devices.register(&link(), "fp-tablet", "Chrome").await.unwrap();

    assert!(!third.authorized());
    assert_eq!(third.device_count, 2);
    assert!(matches!(
        third.ensure_authorized(),
        Err(InvitationError::CapacityExceeded { device_count: 2, .. })
    ));
    assert!(!harness.device_repo.get(&link()).unwrap().contains("fp-tablet"));
}

#[tokio::test]
async fn test_registered_devices_still_admitted_at_cap() {
    let harness = TestHarness::new();
    harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();
    harness.devices.register(&link(), "fp-laptop", "Firefox").await.unwrap();
    harness.devices.register(&link(), "fp-tablet", "Chrome").await.unwrap();

    let phone = harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();

    assert!(phone.authorized());
    assert_eq!(phone.device_count, 2);
}

#[tokio::test]
async fn test_count_is_per_link() {
    let harness = TestHarness::new();
    let other = GuestNumber::from_sequence(1002);
    harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();
    harness.devices.register(&link(), "fp-laptop", "Firefox").await.unwrap();
    harness.devices.register(&other, "fp-phone", "Safari").await.unwrap();

    assert_eq!(harness.devices.count(&link()).await.unwrap(), 2);
    assert_eq!(harness.devices.count(&other).await.unwrap(), 1);
    assert_eq!(
        harness.devices.count(&GuestNumber::from_sequence(1003)).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_count_has_no_side_effects() {
    let harness = TestHarness::new();

    assert_eq!(harness.devices.count(&link()).await.unwrap(), 0);
    assert!(harness.device_repo.is_empty());
}

#[tokio::test]
async fn test_blank_fingerprint_rejected() {
    let harness = TestHarness::new();

    let err = harness.devices.register(&link(), "  ", "Safari").await.unwrap_err();

    assert!(matches!(err, InvitationError::Validation(_)));
    assert!(harness.device_repo.is_empty());
}

#[tokio::test]
async fn test_write_failure_surfaces_storage_error() {
    let harness = TestHarness::new();
    harness.device_repo.fail_writes(true);

    let err = harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap_err();

    assert!(matches!(err, InvitationError::Storage(_)));
    assert_eq!(harness.devices.count(&link()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_read_failure_blocks_registration() {
    let harness = TestHarness::new();
    harness.device_repo.fail_reads(true);

    let err = harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap_err();

    assert!(matches!(err, InvitationError::Storage(_)));
    assert!(harness.device_repo.is_empty());
}

#[tokio::test]
async fn test_read_failure_surfaces_from_count() {
    let harness = TestHarness::new();
    harness.devices.register(&link(), "fp-phone", "Safari").await.unwrap();
    harness.device_repo.fail_reads(true);

    let err = harness.devices.count(&link()).await.unwrap_err();

    assert!(matches!(err, InvitationError::Storage(_)));
    assert_eq!(harness.device_repo.get(&link()).unwrap().total_devices(), 1);
}
