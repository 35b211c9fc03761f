//! Error types for the Menu actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuItemError {
    #[error("Menu item not found: {0}")]
    NotFound(String),

    #[error("Menu item validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for MenuItemError {
    fn from(msg: String) -> Self {
        MenuItemError::ActorCommunicationError(msg)
    }
}
