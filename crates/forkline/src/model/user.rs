use serde::{Deserialize, Serialize};

entity_id!(
    /// Type-safe identifier for Users.
    UserId,
    "user"
);

/// What a user is allowed to be on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Diner,
    RestaurantOwner,
    Rider,
    Admin,
}

/// A registered account.
///
/// `push_token` is the device address used by the notification gateway; `None` means the
/// user cannot be notified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub push_token: Option<String>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub role: Role,
    pub push_token: Option<String>,
}

/// Payload for updating an existing user.
///
/// `push_token: Some(None)` clears the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub push_token: Option<Option<String>>,
}

/// Selection criteria for user queries.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Restrict to these ids.
    pub ids: Option<Vec<UserId>>,
    /// Only users with a registered push token.
    pub with_push_token: bool,
}

impl UserFilter {
    pub fn reachable(ids: Vec<UserId>) -> Self {
        Self {
            ids: Some(ids),
            with_push_token: true,
        }
    }
}
