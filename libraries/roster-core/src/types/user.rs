/// User domain type
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier, immutable after creation
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Occupation
    pub occupation: String,

    /// Set once when the record is inserted
    pub created_at: DateTime<Utc>,

    /// Set on creation and refreshed by every successful update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record from a creation payload
    ///
    /// Assigns a new random ID and stamps both timestamps with `now`.
    pub fn from_new(new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::generate(),
            name: new_user.name,
            occupation: new_user.occupation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply changes, moving `updated_at` strictly forward
    ///
    /// If the clock has not advanced past the previous `updated_at` (coarse
    /// clocks, skew), the new stamp is one microsecond after it.
    pub fn apply(&mut self, changes: UserChanges, now: DateTime<Utc>) {
        self.name = changes.name;
        self.occupation = changes.occupation;
        let floor = self.updated_at + chrono::Duration::microseconds(1);
        self.updated_at = now.max(floor);
    }
}

/// Payload for creating a user
///
/// Any `id` or timestamp fields a caller sends are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Occupation
    pub occupation: String,
}

impl NewUser {
    /// Create a new payload
    pub fn new(name: impl Into<String>, occupation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occupation: occupation.into(),
        }
    }
}

/// Payload for updating a user's mutable fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    /// New display name
    pub name: String,
    /// New occupation
    pub occupation: String,
}

impl UserChanges {
    /// Create a new payload
    pub fn new(name: impl Into<String>, occupation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occupation: occupation.into(),
        }
    }
}
