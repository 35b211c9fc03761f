//! # Order Aggregator
//!
//! Dashboard figures for one restaurant, over the day that contains `as_of`.
//!
//! "Today" is the half-open window `[local midnight, as_of)`, where local midnight is
//! taken in a fixed UTC offset from configuration. The caller always supplies `as_of`.
//!
//! ## Consistency
//!
//! The four figures come from four requests issued together, three to the order actor
//! and one to the menu actor. Each request sees one point between
//! two writes, but the requests are not one transaction: a write landing between them
//! can make the figures disagree by that one write. That is acceptable for a dashboard
//! and is not hidden behind a transactional API.

use crate::clients::{MenuClient, OrderClient};
use crate::error::PlatformError;
use crate::model::{MenuItemFilter, OrderFilter, OrderStatus, PaymentStatus, RestaurantId, TimeWindow};
use chrono::{DateTime, FixedOffset, NaiveTime, Offset, TimeDelta, Utc};
use forkline_actor::ActorClient;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    /// Orders created in the window, any status.
    pub orders_today: usize,
    /// `total_amount` of orders created in the window whose payment completed.
    pub revenue_today: u64,
    /// Lifetime pending backlog, not limited to the window.
    pub pending_orders: usize,
    /// Menu size, available or not.
    pub total_menu_items: usize,
}

#[derive(Clone)]
pub struct OrderAggregator {
    orders: OrderClient,
    menu: MenuClient,
    offset: FixedOffset,
}

impl OrderAggregator {
    pub fn new(orders: OrderClient, menu: MenuClient, utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self {
            orders,
            menu,
            offset,
        }
    }

    /// `[local midnight, as_of)` for the day containing `as_of`.
    pub fn day_window(&self, as_of: DateTime<Utc>) -> TimeWindow {
        let local_midnight = as_of
            .with_timezone(&self.offset)
            .date_naive()
            .and_time(NaiveTime::MIN);
        let start = (local_midnight
            - TimeDelta::seconds(i64::from(self.offset.local_minus_utc())))
        .and_utc();
        TimeWindow { start, end: as_of }
    }

    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn compute_dashboard(
        &self,
        restaurant_id: RestaurantId,
        as_of: DateTime<Utc>,
    ) -> Result<DashboardStats, PlatformError> {
        let window = self.day_window(as_of);
        debug!(start = %window.start, end = %window.end, "Dashboard window");

        let today = OrderFilter::restaurant(restaurant_id).created_in(window);
        let paid_today = today.clone().payment_status(PaymentStatus::Completed);
        let pending = OrderFilter::restaurant(restaurant_id).status(OrderStatus::Pending);

        let (orders_today, revenue_today, pending_orders, total_menu_items) = tokio::join!(
            self.orders.count(today),
            self.orders.total_amount(paid_today),
            self.orders.count(pending),
            self.menu.count(MenuItemFilter::restaurant(restaurant_id)),
        );

        let stats = DashboardStats {
            orders_today: orders_today?,
            revenue_today: revenue_today?,
            pending_orders: pending_orders?,
            total_menu_items: total_menu_items?,
        };
        debug!(?stats, "Dashboard computed");
        Ok(stats)
    }
}
