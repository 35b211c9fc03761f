//! Order records, their status machines and query types.
//!
//! An order is a financial record. It is never deleted, its line-item prices are
//! snapshots taken at checkout, and it changes only through [`OrderAction`]s.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{MenuItemId, RestaurantId, UserId};

entity_id!(
    /// Type-safe identifier for Orders.
    OrderId,
    "order"
);

/// Fulfillment status.
///
/// ```text
/// created -> pending -> confirmed -> preparing -> out_for_delivery -> delivered
///                 \            \            \
///                  +------------+------------+--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether `next` is one step away in the adjacency table.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Created, Pending)
                | (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, OutForDelivery)
                | (OutForDelivery, Delivered)
                | (Pending | Confirmed | Preparing, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status. Moves forward only: `pending -> completed | failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn can_settle_to(self, next: PaymentStatus) -> bool {
        self == PaymentStatus::Pending && next != PaymentStatus::Pending
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Wallet,
    CashOnDelivery,
}

/// One ordered dish, with the price captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
}

impl LineItem {
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub restaurant_id: RestaurantId,
    pub diner_id: UserId,
    pub rider_id: Option<UserId>,
    pub items: Vec<LineItem>,
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub tax: u64,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for persisting a checked-out order. Prices are already snapshotted.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub restaurant_id: RestaurantId,
    pub diner_id: UserId,
    pub items: Vec<LineItem>,
    pub delivery_fee: u64,
    pub tax: u64,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
}

/// Order-specific actions. Orders have no free-form update.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Compare-and-set status change: applies only while the stored status is still
    /// `expected`. Re-requesting the status the order already has is a no-op.
    Transition {
        expected: OrderStatus,
        next: OrderStatus,
        at: DateTime<Utc>,
    },
    AssignRider {
        rider_id: UserId,
        at: DateTime<Utc>,
    },
    SettlePayment {
        status: PaymentStatus,
        at: DateTime<Utc>,
    },
}

/// Results from OrderActions - variants match 1:1 with OrderAction.
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    Transition { order: Order, changed: bool },
    AssignRider(Order),
    SettlePayment { order: Order, changed: bool },
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Selection criteria for order queries.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub restaurant_id: Option<RestaurantId>,
    pub diner_id: Option<UserId>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created_in: Option<TimeWindow>,
}

impl OrderFilter {
    pub fn restaurant(restaurant_id: RestaurantId) -> Self {
        Self {
            restaurant_id: Some(restaurant_id),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn created_in(mut self, window: TimeWindow) -> Self {
        self.created_in = Some(window);
        self
    }
}

/// Sort keys for order queries.
#[derive(Debug, Clone, Copy)]
pub enum OrderSort {
    NewestFirst,
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL: [OrderStatus; 7] = [
        Created,
        Pending,
        Confirmed,
        Preparing,
        OutForDelivery,
        Delivered,
        Cancelled,
    ];

    #[test]
    fn adjacency_table() {
        let allowed: Vec<(OrderStatus, OrderStatus)> = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(
            allowed,
            vec![
                (Created, Pending),
                (Pending, Confirmed),
                (Pending, Cancelled),
                (Confirmed, Preparing),
                (Confirmed, Cancelled),
                (Preparing, OutForDelivery),
                (Preparing, Cancelled),
                (OutForDelivery, Delivered),
            ]
        );
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for to in ALL {
            assert!(!Delivered.can_transition_to(to));
            assert!(!Cancelled.can_transition_to(to));
        }
        assert!(Delivered.is_terminal() && Cancelled.is_terminal());
        assert!(!OutForDelivery.is_terminal());
    }

    #[test]
    fn payment_moves_forward_only() {
        assert!(PaymentStatus::Pending.can_settle_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_settle_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Pending.can_settle_to(PaymentStatus::Pending));
        assert!(!PaymentStatus::Completed.can_settle_to(PaymentStatus::Pending));
        assert!(!PaymentStatus::Completed.can_settle_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Failed.can_settle_to(PaymentStatus::Completed));
    }

    #[test]
    fn window_is_half_open() {
        let start = DateTime::from_timestamp(1_000, 0).unwrap();
        let end = DateTime::from_timestamp(2_000, 0).unwrap();
        let window = TimeWindow { start, end };
        assert!(window.contains(start));
        assert!(!window.contains(end));
        assert!(window.contains(DateTime::from_timestamp(1_999, 0).unwrap()));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
        assert_eq!(OutForDelivery.to_string(), "out_for_delivery");
    }
}
