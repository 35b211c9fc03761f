//! Error types for the Order actor.

use crate::model::{OrderStatus, PaymentStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The restaurant does not exist or is not taking orders.
    #[error("Invalid restaurant: {0}")]
    InvalidRestaurant(String),

    /// Compare-and-set lost: the order moved since the caller read it.
    #[error("Order status is {actual}, expected {expected}")]
    StaleStatus {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// The status change is not in the adjacency table.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Payment status may only move forward from pending.
    #[error("Invalid payment transition from {from} to {to}")]
    InvalidPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
