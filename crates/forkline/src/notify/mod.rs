//! # Notification Gateway
//!
//! Push delivery for order events: message types, the provider seam, the batching
//! gateway, and the outbox that decouples lifecycle writes from delivery.

pub mod gateway;
pub mod message;
pub mod mock;
pub mod outbox;
pub mod provider;

pub use gateway::{BulkReport, NotificationGateway};
pub use message::*;
pub use outbox::{Notice, Outbox, OutboxWorker};
pub use provider::{is_expo_push_token, LoggingProvider, ProviderError, PushProvider};
