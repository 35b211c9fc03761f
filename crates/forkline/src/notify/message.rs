//! Notification value objects. Nothing here is persisted.

use crate::error::ErrorCode;
use crate::model::{Order, OrderId, RestaurantId};
use serde::Serialize;

/// Payload type tag read by the mobile client to route a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// Status update for the diner.
    Order,
    /// New order for the restaurant owner.
    RestaurantOrder,
    /// Delivery update for the assigned rider.
    Delivery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: PayloadKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
}

impl NotificationPayload {
    pub fn for_order(kind: PayloadKind, order: &Order) -> Self {
        Self {
            kind,
            order_id: Some(order.id),
            restaurant_id: Some(order.restaurant_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    #[default]
    High,
}

/// Title, body and payload shared by every recipient of one send.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationTemplate {
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
    pub priority: Priority,
}

impl NotificationTemplate {
    /// Sent to the restaurant owner when an order is placed.
    pub fn restaurant_order(order: &Order) -> Self {
        Self {
            title: "New Order! 🎉".into(),
            body: format!("Order #{} received", order.id.0),
            payload: NotificationPayload::for_order(PayloadKind::RestaurantOrder, order),
            priority: Priority::High,
        }
    }

    /// Sent to the diner on every status change.
    pub fn order_update(order: &Order) -> Self {
        Self {
            title: "Order Update".into(),
            body: format!("Your order is now {}", order.status),
            payload: NotificationPayload::for_order(PayloadKind::Order, order),
            priority: Priority::High,
        }
    }

    /// Sent to the assigned rider when rider notifications are enabled.
    pub fn delivery(order: &Order) -> Self {
        Self {
            title: "Delivery Update".into(),
            body: format!("Order #{} is {}", order.id.0, order.status),
            payload: NotificationPayload::for_order(PayloadKind::Delivery, order),
            priority: Priority::High,
        }
    }
}

/// One push message, addressed to a device token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "data")]
    pub payload: NotificationPayload,
    pub priority: Priority,
    pub sound: &'static str,
    pub badge: u32,
}

impl NotificationMessage {
    pub fn new(to: impl Into<String>, template: NotificationTemplate) -> Self {
        Self {
            to: to.into(),
            title: template.title,
            body: template.body,
            payload: template.payload,
            priority: template.priority,
            sound: "default",
            badge: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The token does not have the provider's format. Never transmitted.
    InvalidToken,
    /// The recipient has no token registered.
    NoToken,
    /// The provider refused this message (e.g. device no longer registered).
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Rejected(RejectReason),
    /// The batch carrying this message failed or timed out; retry later.
    Deferred,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    /// Failure tag, `None` when delivered.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            DeliveryOutcome::Delivered => None,
            DeliveryOutcome::Rejected(RejectReason::InvalidToken) => Some(ErrorCode::InvalidToken),
            DeliveryOutcome::Rejected(RejectReason::NoToken) => Some(ErrorCode::NoToken),
            DeliveryOutcome::Rejected(RejectReason::Provider(_)) | DeliveryOutcome::Deferred => {
                Some(ErrorCode::ProviderUnavailable)
            }
        }
    }
}
