//! Event-wide settings singleton.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event configuration shown on the landing page and the admin console.
///
/// Field contents are free-form; only presence is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Names displayed on the invitation.
    pub couple_names: String,
    /// Event date as displayed.
    pub wedding_date: String,
    /// Venue name/address.
    pub venue: String,
    /// Theme identifier used by the presentation layer.
    pub theme: String,
    /// Last day to RSVP, as displayed.
    pub rsvp_deadline: String,
    /// Last write.
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Defaults written on first read.
    #[must_use]
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            couple_names: "The Couple".to_string(),
            wedding_date: String::new(),
            venue: String::new(),
            theme: "classic".to_string(),
            rsvp_deadline: String::new(),
            updated_at: now,
        }
    }

    /// Merge a patch: present fields replace, absent fields are kept.
    pub fn apply(&mut self, patch: SettingsPatch, now: DateTime<Utc>) {
        if let Some(couple_names) = patch.couple_names {
            self.couple_names = couple_names;
        }
        if let Some(wedding_date) = patch.wedding_date {
            self.wedding_date = wedding_date;
        }
        if let Some(venue) = patch.venue {
            self.venue = venue;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(rsvp_deadline) = patch.rsvp_deadline {
            self.rsvp_deadline = rsvp_deadline;
        }
        self.updated_at = now;
    }
}

/// Partial settings update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    /// New couple names.
    #[serde(default)]
    pub couple_names: Option<String>,
    /// New event date.
    #[serde(default)]
    pub wedding_date: Option<String>,
    /// New venue.
    #[serde(default)]
    pub venue: Option<String>,
    /// New theme.
    #[serde(default)]
    pub theme: Option<String>,
    /// New RSVP deadline.
    #[serde(default)]
    pub rsvp_deadline: Option<String>,
}
