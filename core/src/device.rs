//! Per-link device registrations.
//!
//! Each guest number has at most [`MAX_DEVICES_PER_GUEST`] registered device
//! fingerprints. This deters casual link sharing. It is not access control:
//! fingerprints are supplied by the client, unverified, and trivially forged.
//!
//! # Admission
//!
//! | Registration | Fingerprint | Members | Result                       |
//! |--------------|-------------|---------|------------------------------|
//! | none         | –           | –       | create, authorized           |
//! | exists       | known       | any     | refresh `lastSeen`, authorized |
//! | exists       | unknown     | `< 2`   | add device, authorized       |
//! | exists       | unknown     | `== 2`  | denied, nothing written      |

use crate::constants::MAX_DEVICES_PER_GUEST;
use crate::error::{InvitationError, Result};
use crate::guest::GuestNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A device that has opened an invitation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDevice {
    /// Client-supplied fingerprint (unique within a registration).
    pub fingerprint: String,
    /// User agent seen at registration.
    pub user_agent: String,
    /// First time this device opened the link.
    pub registered_at: DateTime<Utc>,
    /// Most recent time this device opened the link.
    pub last_seen: DateTime<Utc>,
}

/// Devices registered against one guest number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    /// Owning guest number.
    pub guest_number: GuestNumber,
    devices: Vec<RegisteredDevice>,
    total_devices: u32,
    /// When the first device registered.
    pub created_at: DateTime<Utc>,
    /// Last admission that changed this registration.
    pub updated_at: DateTime<Utc>,
}

impl DeviceRegistration {
    /// A registration whose only member is the given device.
    #[must_use]
    pub fn first(
        guest_number: GuestNumber,
        fingerprint: &str,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self::restore(
            guest_number,
            vec![RegisteredDevice {
                fingerprint: fingerprint.to_string(),
                user_agent: user_agent.to_string(),
                registered_at: now,
                last_seen: now,
            }],
            now,
            now,
        )
    }

    /// Rebuild a registration from stored parts.
    ///
    /// Devices repeating an earlier fingerprint are dropped and the count is
    /// recomputed, so `total_devices == devices.len()` always holds.
    #[must_use]
    pub fn restore(
        guest_number: GuestNumber,
        devices: Vec<RegisteredDevice>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut unique: Vec<RegisteredDevice> = Vec::with_capacity(devices.len());
        for device in devices {
            if !unique.iter().any(|d| d.fingerprint == device.fingerprint) {
                unique.push(device);
            }
        }

        let total_devices = u32::try_from(unique.len()).unwrap_or(u32::MAX);
        Self {
            guest_number,
            devices: unique,
            total_devices,
            created_at,
            updated_at,
        }
    }

    /// Registered devices, in registration order.
    #[must_use]
    pub fn devices(&self) -> &[RegisteredDevice] {
        &self.devices
    }

    /// Number of registered devices.
    #[must_use]
    pub const fn total_devices(&self) -> u32 {
        self.total_devices
    }

    /// Whether a fingerprint is already registered.
    #[must_use]
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.devices.iter().any(|d| d.fingerprint == fingerprint)
    }

    /// Apply an access attempt to an existing registration.
    ///
    /// Mutates only when the outcome is authorized.
    pub fn admit(&mut self, fingerprint: &str, user_agent: &str, now: DateTime<Utc>) -> AdmissionOutcome {
        if let Some(device) = self.devices.iter_mut().find(|d| d.fingerprint == fingerprint) {
            device.last_seen = now;
            self.updated_at = now;
            return AdmissionOutcome::KnownDevice;
        }

        if self.devices.len() >= MAX_DEVICES_PER_GUEST {
            return AdmissionOutcome::Denied;
        }

        self.devices.push(RegisteredDevice {
            fingerprint: fingerprint.to_string(),
            user_agent: user_agent.to_string(),
            registered_at: now,
            last_seen: now,
        });
        self.total_devices += 1;
        self.updated_at = now;
        AdmissionOutcome::DeviceAdded
    }
}

/// How an access attempt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionOutcome {
    /// First device for this guest number; registration created.
    NewRegistration,
    /// Fingerprint already registered; `lastSeen` refreshed.
    KnownDevice,
    /// New fingerprint added below the cap.
    DeviceAdded,
    /// New fingerprint refused, cap reached.
    Denied,
}

impl AdmissionOutcome {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewRegistration => "new_registration",
            Self::KnownDevice => "known_device",
            Self::DeviceAdded => "device_added",
            Self::Denied => "denied",
        }
    }

    /// Whether the device may proceed.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        !matches!(self, Self::Denied)
    }

    /// Whether this attempt registered a device that was not known before.
    #[must_use]
    pub const fn is_new_device(&self) -> bool {
        matches!(self, Self::NewRegistration | Self::DeviceAdded)
    }
}

/// Result of [`crate::DeviceRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAdmission {
    /// Guest number the attempt was made against.
    pub guest_number: GuestNumber,
    /// What happened.
    pub outcome: AdmissionOutcome,
    /// Registered devices after the attempt.
    pub device_count: u32,
}

impl DeviceAdmission {
    /// Whether the device may proceed.
    #[must_use]
    pub const fn authorized(&self) -> bool {
        self.outcome.is_authorized()
    }

    /// Turn a denial into [`InvitationError::CapacityExceeded`].
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::CapacityExceeded`] when the attempt was
    /// denied.
    pub fn ensure_authorized(self) -> Result<Self> {
        if self.authorized() {
            Ok(self)
        } else {
            Err(InvitationError::CapacityExceeded {
                guest_number: self.guest_number.to_string(),
                device_count: self.device_count,
            })
        }
    }
}

/// Resolve an access attempt against the current registration (if any).
///
/// Returns the registration to persist (`None` when nothing changed) and the
/// admission to report.
#[must_use]
pub fn admit(
    existing: Option<DeviceRegistration>,
    guest_number: &GuestNumber,
    fingerprint: &str,
    user_agent: &str,
    now: DateTime<Utc>,
) -> (Option<DeviceRegistration>, DeviceAdmission) {
    let Some(mut registration) = existing else {
        let registration = DeviceRegistration::first(guest_number.clone(), fingerprint, user_agent, now);
        let admission = DeviceAdmission {
            guest_number: guest_number.clone(),
            outcome: AdmissionOutcome::NewRegistration,
            device_count: registration.total_devices(),
        };
        return (Some(registration), admission);
    };

    let outcome = registration.admit(fingerprint, user_agent, now);
    let admission = DeviceAdmission {
        guest_number: guest_number.clone(),
        outcome,
        device_count: registration.total_devices(),
    };

    if outcome.is_authorized() {
        (Some(registration), admission)
    } else {
        (None, admission)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600 + secs, 0).unwrap_or_default()
    }

    fn number() -> GuestNumber {
        GuestNumber::from_sequence(1001)
    }

    #[test]
    fn test_first_access_creates_registration() {
        let (saved, admission) = admit(None, &number(), "fp-a", "Safari", at(0));
        let saved = saved.unwrap();

        assert_eq!(admission.outcome, AdmissionOutcome::NewRegistration);
        assert_eq!(admission.device_count, 1);
        assert_eq!(saved.total_devices(), 1);
        assert_eq!(saved.devices()[0].user_agent, "Safari");
    }

    #[test]
    fn test_known_device_refreshes_last_seen() {
        let (saved, _) = admit(None, &number(), "fp-a", "Safari", at(0));
        let (saved, admission) = admit(saved, &number(), "fp-a", "Safari", at(60));
        let saved = saved.unwrap();

        assert_eq!(admission.outcome, AdmissionOutcome::KnownDevice);
        assert_eq!(admission.device_count, 1);
        assert_eq!(saved.devices()[0].last_seen, at(60));
        assert_eq!(saved.devices()[0].registered_at, at(0));
    }

    #[test]
    fn test_third_device_is_denied() {
        let (saved, _) = admit(None, &number(), "fp-a", "Safari", at(0));
        let (saved, second) = admit(saved, &number(), "fp-b", "Chrome", at(1));
        assert_eq!(second.outcome, AdmissionOutcome::DeviceAdded);
        assert_eq!(second.device_count, 2);

        let (unchanged, third) = admit(saved.clone(), &number(), "fp-c", "Firefox", at(2));
        assert!(unchanged.is_none());
        assert!(!third.authorized());
        assert_eq!(third.device_count, 2);
        assert_eq!(saved.unwrap().total_devices(), 2);
    }

    #[test]
    fn test_ensure_authorized() {
        let denied = DeviceAdmission {
            guest_number: number(),
            outcome: AdmissionOutcome::Denied,
            device_count: 2,
        };
        assert_eq!(
            denied.ensure_authorized(),
            Err(InvitationError::CapacityExceeded {
                guest_number: "1001".to_string(),
                device_count: 2,
            })
        );
    }

    #[test]
    fn test_restore_dedupes_fingerprints() {
        let device = RegisteredDevice {
            fingerprint: "fp-a".to_string(),
            user_agent: "Safari".to_string(),
            registered_at: at(0),
            last_seen: at(0),
        };
        let registration =
            DeviceRegistration::restore(number(), vec![device.clone(), device], at(0), at(0));
        assert_eq!(registration.total_devices(), 1);
        assert_eq!(registration.devices().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_count_never_exceeds_cap(fingerprints in prop::collection::vec(0u8..6, 1..20)) {
            let mut current = None;
            let mut distinct: Vec<u8> = Vec::new();

            for (i, fp) in fingerprints.iter().enumerate() {
                let fingerprint = format!("fp-{fp}");
                let (saved, admission) = admit(current.clone(), &number(), &fingerprint, "ua", at(i64::try_from(i).unwrap_or(0)));
                let known = distinct.contains(fp);

                if known {
                    prop_assert!(admission.authorized());
                } else if distinct.len() < MAX_DEVICES_PER_GUEST {
                    prop_assert!(admission.authorized());
                    distinct.push(*fp);
                } else {
                    prop_assert!(!admission.authorized());
                }

                if let Some(saved) = saved {
                    current = Some(saved);
                }
                let count = current.as_ref().map_or(0, DeviceRegistration::total_devices);
                prop_assert_eq!(count as usize, distinct.len().min(MAX_DEVICES_PER_GUEST));
                prop_assert_eq!(admission.device_count, count);
            }
        }
    }
}
