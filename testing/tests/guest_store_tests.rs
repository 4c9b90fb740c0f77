//! Guest store behaviour against in-memory storage.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use invitation_core::rsvp::is_consistent;
use invitation_core::{Guest, GuestId, GuestNumber, GuestStats, InvitationError, NewGuest, RsvpStatus, RsvpSubmission};
use invitation_testing::{TestHarness, test_epoch};

fn number(n: &str) -> GuestNumber {
    GuestNumber::parse(n).unwrap()
}

#[tokio::test]
async fn test_first_guest_gets_1001_and_is_pending() {
    let harness = TestHarness::new();

    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();

    assert_eq!(guest.guest_number.as_str(), "1001");
    assert_eq!(guest.status(), RsvpStatus::Pending);
    assert!(guest.attendance().is_none());
    assert_eq!(guest.group, "General");
    assert_eq!(guest.created_at, test_epoch());
    assert_eq!(harness.guest_repo.len(), 1);
}

#[tokio::test]
async fn test_sequential_creates_are_strictly_increasing() {
    let harness = TestHarness::new();

    let mut previous = 1000;
    for i in 0..12 {
        let guest = harness.guests.create(NewGuest::named(format!("Guest {i}"))).await.unwrap();
        let value = guest.guest_number.sequence().unwrap();
        assert_eq!(value, previous + 1);
        previous = value;
        harness.tick(1);
    }
}

#[tokio::test]
async fn test_numbering_uses_integer_maximum() {
    let harness = TestHarness::new();
    for n in [999, 1010, 1009] {
        harness.guest_repo.seed(Guest::new(
            GuestId::new(),
            GuestNumber::from_sequence(n),
            NewGuest::named(format!("Seeded {n}")),
            test_epoch(),
        ));
    }

    let guest = harness.guests.create(NewGuest::named("Next")).await.unwrap();

    assert_eq!(guest.guest_number.as_str(), "1011");
}

#[tokio::test]
async fn test_create_requires_name() {
    let harness = TestHarness::new();

    let err = harness.guests.create(NewGuest::named("   ")).await.unwrap_err();

    assert!(matches!(err, InvitationError::Validation(_)));
    assert!(harness.guest_repo.is_empty());
}

#[tokio::test]
async fn test_create_falls_back_to_clock_number_when_max_unreadable() {
    let harness = TestHarness::new();
    harness.guest_repo.fail_max_lookup(true);

    let guest = harness.guests.create(NewGuest::named("Omar")).await.unwrap();

    // test_epoch is an exact second: low-order millisecond digits are 600000.
    assert_eq!(guest.guest_number.as_str(), "600000");
    assert_eq!(guest.status(), RsvpStatus::Pending);
}

#[tokio::test]
async fn test_create_surfaces_storage_error_on_write_failure() {
    let harness = TestHarness::new();
    harness.guest_repo.fail_writes(true);

    let err = harness.guests.create(NewGuest::named("Omar")).await.unwrap_err();

    assert!(matches!(err, InvitationError::Storage(_)));
}

#[tokio::test]
async fn test_create_many_assigns_consecutive_numbers() {
    let harness = TestHarness::new();

    let created = harness
        .guests
        .create_many(vec![
            NewGuest::named("Aisha").in_group("Family"),
            NewGuest::named("Omar"),
            NewGuest::named("Lina").in_group("Friends"),
        ])
        .await
        .unwrap();

    let numbers: Vec<&str> = created.iter().map(|g| g.guest_number.as_str()).collect();
    assert_eq!(numbers, ["1001", "1002", "1003"]);
    assert_eq!(created[0].group, "Family");
    assert_eq!(created[1].group, "General");
}

#[tokio::test]
async fn test_create_many_validates_before_writing() {
    let harness = TestHarness::new();

    let err = harness
        .guests
        .create_many(vec![NewGuest::named("Aisha"), NewGuest::named("")])
        .await
        .unwrap_err();

    assert_eq!(err, InvitationError::Validation("guests[1]: name is required".to_string()));
    assert!(harness.guest_repo.is_empty());

    let err = harness.guests.create_many(Vec::new()).await.unwrap_err();
    assert!(matches!(err, InvitationError::Validation(_)));
}

#[tokio::test]
async fn test_rsvp_scenario() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();
    assert_eq!(guest.guest_number.as_str(), "1001");

    harness
        .guests
        .update_rsvp(&number("1001"), RsvpSubmission::attending(4, "❤️"))
        .await
        .unwrap();

    let found = harness.guests.find_by_number(&number("1001")).await.unwrap().unwrap();
    assert_eq!(found.status(), RsvpStatus::Confirmed);
    let attendance = found.attendance().unwrap();
    assert_eq!(attendance.guests_count, Some(4));
    assert_eq!(attendance.message, "❤️");
}

#[tokio::test]
async fn test_rsvp_on_unknown_number_is_not_found() {
    let harness = TestHarness::new();

    let err = harness
        .guests
        .update_rsvp(&number("9999"), RsvpSubmission::attending(2, ""))
        .await
        .unwrap_err();

    assert_eq!(err, InvitationError::not_found("9999"));
}

#[tokio::test]
async fn test_resubmission_replaces_attendance() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();

    harness
        .guests
        .update_rsvp(&guest.guest_number, RsvpSubmission::attending(3, "yes"))
        .await
        .unwrap();
    harness.tick(60);
    let updated = harness
        .guests
        .update_rsvp(
            &guest.guest_number,
            RsvpSubmission {
                attending: false,
                guests_count: 3,
                message: "sorry".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status(), RsvpStatus::Declined);
    let attendance = updated.attendance().unwrap();
    assert_eq!(attendance.guests_count, Some(0));
    assert_eq!(attendance.message, "sorry");
    assert_eq!(attendance.submitted_at, test_epoch() + chrono::Duration::seconds(60));

    let stored = harness.guests.find_by_number(&guest.guest_number).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_rsvp_is_idempotent() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();
    let submission = RsvpSubmission::attending(2, "see you there");

    let once = harness
        .guests
        .update_rsvp(&guest.guest_number, submission.clone())
        .await
        .unwrap();
    let twice = harness.guests.update_rsvp(&guest.guest_number, submission).await.unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_failed_rsvp_write_leaves_guest_unchanged() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();
    let before = harness.guest_repo.snapshot();
    harness.guest_repo.fail_writes(true);

    let err = harness
        .guests
        .update_rsvp(&guest.guest_number, RsvpSubmission::attending(2, ""))
        .await
        .unwrap_err();
    assert!(matches!(err, InvitationError::Storage(_)));
    assert_eq!(harness.guest_repo.snapshot(), before);

    harness.guest_repo.fail_writes(false);
    let stored = harness.guests.find_by_number(&guest.guest_number).await.unwrap().unwrap();
    assert_eq!(stored.status(), RsvpStatus::Pending);
    assert!(stored.attendance().is_none());
}

#[tokio::test]
async fn test_find_all_is_most_recent_first() {
    let harness = TestHarness::new();
    for name in ["first", "second", "third"] {
        harness.guests.create(NewGuest::named(name)).await.unwrap();
        harness.tick(5);
    }

    let names: Vec<String> = harness
        .guests
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();

    assert_eq!(names, ["third", "second", "first"]);
}

#[tokio::test]
async fn test_duplicate_numbers_resolve_to_earliest() {
    let harness = TestHarness::new();
    harness.guest_repo.fail_max_lookup(true);
    let first = harness.guests.create(NewGuest::named("first")).await.unwrap();
    harness.guests.create(NewGuest::named("second")).await.unwrap();

    // Same clock, same fallback number.
    assert_eq!(harness.guest_repo.len(), 2);
    let found = harness.guests.find_by_number(&first.guest_number).await.unwrap().unwrap();
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn test_find_by_number_absent_is_none() {
    let harness = TestHarness::new();

    assert!(harness.guests.find_by_number(&number("1001")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_cascades_to_device_registration() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();
    harness
        .devices
        .register(&guest.guest_number, "fp-phone", "Safari")
        .await
        .unwrap();
    assert_eq!(harness.device_repo.len(), 1);

    let deleted = harness.guests.delete_by_number(&guest.guest_number).await.unwrap();

    assert_eq!(deleted.map(|g| g.id), Some(guest.id));
    assert!(harness.guest_repo.is_empty());
    assert!(harness.device_repo.is_empty());
}

#[tokio::test]
async fn test_delete_without_device_registration_succeeds() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();

    let deleted = harness.guests.delete_by_number(&guest.guest_number).await.unwrap();

    assert!(deleted.is_some());
    assert!(harness.guest_repo.is_empty());
}

#[tokio::test]
async fn test_delete_survives_device_cleanup_failure() {
    let harness = TestHarness::new();
    let guest = harness.guests.create(NewGuest::named("Aisha")).await.unwrap();
    harness
        .devices
        .register(&guest.guest_number, "fp-phone", "Safari")
        .await
        .unwrap();
    harness.device_repo.fail_deletes(true);

    let deleted = harness.guests.delete_by_number(&guest.guest_number).await.unwrap();

    assert!(deleted.is_some());
    assert!(harness.guest_repo.is_empty());
    assert_eq!(harness.device_repo.len(), 1);
}

#[tokio::test]
async fn test_delete_unknown_number_is_none() {
    let harness = TestHarness::new();

    assert!(harness.guests.delete_by_number(&number("4242")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stats_follow_store_state() {
    let harness = TestHarness::new();
    let created = harness
        .guests
        .create_many((1..=5).map(|i| NewGuest::named(format!("Guest {i}"))).collect())
        .await
        .unwrap();

    let submissions = [
        RsvpSubmission::attending(3, ""),
        RsvpSubmission::attending(1, ""),
        RsvpSubmission::declining(""),
    ];
    for (guest, submission) in created.iter().zip(submissions) {
        harness.guests.update_rsvp(&guest.guest_number, submission).await.unwrap();
    }

    let stats = harness.guests.stats().await.unwrap();
    assert_eq!(
        stats,
        GuestStats {
            total: 5,
            confirmed: 2,
            declined: 1,
            pending: 2,
            total_guests: 4,
        }
    );

    for guest in harness.guests.find_all().await.unwrap() {
        assert!(is_consistent(guest.status(), guest.attendance()));
    }
}

#[tokio::test]
async fn test_stats_surface_read_failure() {
    let harness = TestHarness::new();
    harness.guest_repo.fail_reads(true);

    assert!(matches!(harness.guests.stats().await, Err(InvitationError::Storage(_))));
}
