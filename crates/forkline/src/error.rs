//! Platform-level errors.
//!
//! Every caller-facing operation returns [`PlatformError`]; [`PlatformError::code`] gives
//! the stable tag a routing layer maps to its own presentation. Notification failures
//! only surface as [`NotifyError`] / [`RejectReason`](crate::notify::RejectReason) when the
//! gateway is called directly.

use crate::menu_actor::MenuItemError;
use crate::order_actor::OrderError;
use crate::restaurant_actor::RestaurantError;
use crate::user_actor::UserError;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Stable failure tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    NotAuthorized,
    InvalidTransition,
    InvalidToken,
    NoToken,
    ProviderUnavailable,
    ValidationFailed,
    StoreUnavailable,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::NotAuthorized => "NOT_AUTHORIZED",
            ErrorCode::InvalidTransition => "INVALID_TRANSITION",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::NoToken => "NO_TOKEN",
            ErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by guarded platform operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlatformError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The backing actor is gone or did not answer.
    #[error("Store unavailable: {0}")]
    Store(String),
}

impl PlatformError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlatformError::NotFound { .. } => ErrorCode::NotFound,
            PlatformError::NotAuthorized(_) => ErrorCode::NotAuthorized,
            PlatformError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            PlatformError::Validation(_) => ErrorCode::ValidationFailed,
            PlatformError::Store(_) => ErrorCode::StoreUnavailable,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl Display) -> Self {
        PlatformError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<UserError> for PlatformError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(id) => PlatformError::NotFound { kind: "user", id },
            UserError::ValidationError(msg) => PlatformError::Validation(msg),
            UserError::ActorCommunicationError(msg) => PlatformError::Store(msg),
        }
    }
}

impl From<RestaurantError> for PlatformError {
    fn from(e: RestaurantError) -> Self {
        match e {
            RestaurantError::NotFound(id) => PlatformError::NotFound {
                kind: "restaurant",
                id,
            },
            RestaurantError::ValidationError(msg) => PlatformError::Validation(msg),
            RestaurantError::ActorCommunicationError(msg) => PlatformError::Store(msg),
        }
    }
}

impl From<MenuItemError> for PlatformError {
    fn from(e: MenuItemError) -> Self {
        match e {
            MenuItemError::NotFound(id) => PlatformError::NotFound {
                kind: "menu item",
                id,
            },
            MenuItemError::ValidationError(msg) => PlatformError::Validation(msg),
            MenuItemError::ActorCommunicationError(msg) => PlatformError::Store(msg),
        }
    }
}

impl From<OrderError> for PlatformError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => PlatformError::NotFound { kind: "order", id },
            OrderError::InvalidRestaurant(msg) | OrderError::ValidationError(msg) => {
                PlatformError::Validation(msg)
            }
            OrderError::StaleStatus { expected, actual } => PlatformError::InvalidTransition {
                from: actual.to_string(),
                to: format!("{expected} (changed concurrently)"),
            },
            OrderError::InvalidTransition { from, to } => PlatformError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            OrderError::InvalidPaymentTransition { from, to } => {
                PlatformError::InvalidTransition {
                    from: format!("payment {from}"),
                    to: format!("payment {to}"),
                }
            }
            OrderError::ActorCommunicationError(msg) => PlatformError::Store(msg),
        }
    }
}

/// Errors from the notification side that are not per-message outcomes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    /// The recipient directory (user store) could not be read.
    #[error("Recipient directory unavailable: {0}")]
    Directory(String),

    #[error("Notification outbox is full")]
    OutboxFull,

    #[error("Notification outbox is closed")]
    OutboxClosed,
}

impl NotifyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            NotifyError::Directory(_) => ErrorCode::StoreUnavailable,
            NotifyError::OutboxFull | NotifyError::OutboxClosed => ErrorCode::ProviderUnavailable,
        }
    }
}

impl From<UserError> for NotifyError {
    fn from(e: UserError) -> Self {
        NotifyError::Directory(e.to_string())
    }
}
