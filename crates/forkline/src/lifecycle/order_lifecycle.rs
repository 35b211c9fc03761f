//! # Order Lifecycle Orchestrator
//!
//! Every order write goes through here: load, ask the guard, write through the order
//! actor, then queue the counterpart's notification. Notification problems are logged
//! and never change the result of the write.

use crate::clients::{MenuClient, OrderClient, RestaurantClient, UserClient};
use crate::clock::Clock;
use crate::config::{PlatformConfig, PricingConfig};
use crate::error::PlatformError;
use crate::guard::{GuardedAction, OwnershipGuard, Resource};
use crate::model::{
    LineItem, MenuItemId, Order, OrderCreate, OrderFilter, OrderId, OrderSort, OrderStatus,
    PaymentMethod, PaymentStatus, Restaurant, RestaurantId, Role, UserId,
};
use crate::notify::{NotificationTemplate, Outbox};
use crate::order_actor::OrderError;
use forkline_actor::{ActorClient, Query};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One requested dish. The price is looked up, never supplied by the diner.
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

/// A diner's checkout.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub restaurant_id: RestaurantId,
    pub lines: Vec<OrderLine>,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
}

#[derive(Clone)]
pub struct OrderLifecycle {
    users: UserClient,
    restaurants: RestaurantClient,
    menu: MenuClient,
    orders: OrderClient,
    guard: OwnershipGuard,
    outbox: Outbox,
    clock: Arc<dyn Clock>,
    pricing: PricingConfig,
    transition_attempts: usize,
    notify_rider: bool,
}

impl OrderLifecycle {
    pub fn new(
        users: UserClient,
        restaurants: RestaurantClient,
        menu: MenuClient,
        orders: OrderClient,
        outbox: Outbox,
        clock: Arc<dyn Clock>,
        config: &PlatformConfig,
    ) -> Self {
        Self {
            users,
            restaurants,
            menu,
            orders,
            guard: OwnershipGuard,
            outbox,
            clock,
            pricing: config.pricing.clone(),
            transition_attempts: config.transition_attempts.max(1),
            notify_rider: config.notification.notify_rider,
        }
    }

    /// Validates the checkout, snapshots prices, persists the order as `pending` and
    /// queues a `restaurant_order` notification for the owner.
    #[instrument(skip(self, request), fields(%diner, restaurant_id = %request.restaurant_id))]
    pub async fn place_order(
        &self,
        diner: UserId,
        request: PlaceOrder,
    ) -> Result<Order, PlatformError> {
        self.users
            .get(diner)
            .await?
            .ok_or_else(|| PlatformError::not_found("user", diner))?;
        let restaurant = self
            .restaurants
            .get(request.restaurant_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("restaurant", request.restaurant_id))?;
        if !restaurant.is_active {
            return Err(PlatformError::Validation(format!(
                "{} is not accepting orders",
                restaurant.id
            )));
        }
        if request.lines.is_empty() {
            return Err(PlatformError::Validation("order has no line items".into()));
        }

        let mut items = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            if line.quantity == 0 {
                return Err(PlatformError::Validation(format!(
                    "quantity of {} must be positive",
                    line.menu_item_id
                )));
            }
            let item = self
                .menu
                .get(line.menu_item_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("menu item", line.menu_item_id))?;
            if item.restaurant_id != restaurant.id {
                return Err(PlatformError::Validation(format!(
                    "{} is not on the menu of {}",
                    item.id, restaurant.id
                )));
            }
            if !item.is_available {
                return Err(PlatformError::Validation(format!(
                    "{} is not available",
                    item.id
                )));
            }
            items.push(LineItem {
                menu_item_id: item.id,
                name: item.name,
                quantity: line.quantity,
                unit_price: item.price,
            });
        }

        let subtotal = items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()));
        let params = OrderCreate {
            restaurant_id: restaurant.id,
            diner_id: diner,
            items,
            delivery_fee: self.pricing.delivery_fee,
            tax: self.pricing.tax_on(subtotal),
            payment_method: request.payment_method,
            delivery_address: request.delivery_address,
            created_at: self.clock.now(),
        };

        let id = self.orders.create_order(params).await?;
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| PlatformError::Store(format!("{id} missing right after create")))?;
        info!(order_id = %order.id, total = order.total_amount, "Order placed");

        self.notify(
            restaurant.owner_id,
            NotificationTemplate::restaurant_order(&order),
        );
        Ok(order)
    }

    /// Moves an order to `next`.
    ///
    /// Checks run in order: the caller must be the restaurant owner or the assigned rider,
    /// requesting the current status is a successful no-op, `next` must be one step away
    /// in the adjacency table, and only then is the owner/rider split for `next` applied.
    /// The write is a compare-and-set against the status just read; if another caller got
    /// there first, the order is re-read and the request re-evaluated from scratch.
    #[instrument(skip(self), fields(%caller, %order_id, %next))]
    pub async fn transition(
        &self,
        caller: UserId,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, PlatformError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let (order, restaurant) = self
                .load_authorized(caller, order_id, GuardedAction::MutateOrder)
                .await?;

            if order.status == next {
                debug!("Already in target status");
                return Ok(order);
            }
            if !order.status.can_transition_to(next) {
                return Err(PlatformError::InvalidTransition {
                    from: order.status.to_string(),
                    to: next.to_string(),
                });
            }
            self.guard.enforce(
                caller,
                Some(Resource::Order {
                    order: &order,
                    restaurant: &restaurant,
                }),
                GuardedAction::Transition(next),
                order_id,
            )?;

            match self
                .orders
                .transition(order_id, order.status, next, self.clock.now())
                .await
            {
                Ok((order, changed)) => {
                    if changed {
                        info!("Order status changed");
                        self.notify_status_change(&order);
                    }
                    return Ok(order);
                }
                Err(OrderError::StaleStatus { expected, actual })
                    if attempt < self.transition_attempts =>
                {
                    debug!(attempt, %expected, %actual, "Lost a race, re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Assigns or swaps the rider. Owner only; the rider must be a user with the rider
    /// role, and the order must not be out for delivery yet.
    #[instrument(skip(self), fields(%caller, %order_id, %rider_id))]
    pub async fn assign_rider(
        &self,
        caller: UserId,
        order_id: OrderId,
        rider_id: UserId,
    ) -> Result<Order, PlatformError> {
        self.load_authorized(caller, order_id, GuardedAction::AssignRider)
            .await?;

        let rider = self
            .users
            .get(rider_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("user", rider_id))?;
        if rider.role != Role::Rider {
            return Err(PlatformError::Validation(format!(
                "{rider_id} is not a rider"
            )));
        }

        let order = self
            .orders
            .assign_rider(order_id, rider_id, self.clock.now())
            .await?;
        info!("Rider assigned");
        if self.notify_rider {
            self.notify(rider_id, NotificationTemplate::delivery(&order));
        }
        Ok(order)
    }

    /// Reads one order. Diner, restaurant owner or assigned rider only.
    #[instrument(skip(self), fields(%caller, %order_id))]
    pub async fn get_order(&self, caller: UserId, order_id: OrderId) -> Result<Order, PlatformError> {
        let (order, _) = self
            .load_authorized(caller, order_id, GuardedAction::ReadOrder)
            .await?;
        Ok(order)
    }

    /// A restaurant's orders, newest first, optionally narrowed to one status.
    #[instrument(skip(self), fields(%caller, %restaurant_id))]
    pub async fn restaurant_orders(
        &self,
        caller: UserId,
        restaurant_id: RestaurantId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, PlatformError> {
        let restaurant = self.restaurants.get(restaurant_id).await?;
        self.guard.enforce(
            caller,
            restaurant.as_ref().map(Resource::Restaurant),
            GuardedAction::ViewOrders,
            restaurant_id,
        )?;

        let filter = OrderFilter {
            status,
            ..OrderFilter::restaurant(restaurant_id)
        };
        let orders = self
            .orders
            .find(Query::new(filter).sorted(OrderSort::NewestFirst))
            .await?;
        Ok(orders)
    }

    /// Records the payment collaborator's verdict. Forward-only; repeating it is a no-op.
    #[instrument(skip(self), fields(%order_id, %status))]
    pub async fn settle_payment(
        &self,
        order_id: OrderId,
        status: PaymentStatus,
    ) -> Result<Order, PlatformError> {
        let (order, changed) = self
            .orders
            .settle_payment(order_id, status, self.clock.now())
            .await?;
        if changed {
            info!("Payment settled");
        }
        Ok(order)
    }

    /// Loads an order with its restaurant and checks `action` against both.
    async fn load_authorized(
        &self,
        caller: UserId,
        order_id: OrderId,
        action: GuardedAction,
    ) -> Result<(Order, Restaurant), PlatformError> {
        let loaded = match self.orders.get(order_id).await? {
            Some(order) => {
                let restaurant = self
                    .restaurants
                    .get(order.restaurant_id)
                    .await?
                    .ok_or_else(|| PlatformError::not_found("restaurant", order.restaurant_id))?;
                Some((order, restaurant))
            }
            None => None,
        };

        let resource = loaded
            .as_ref()
            .map(|(order, restaurant)| Resource::Order { order, restaurant });
        self.guard.enforce(caller, resource, action, order_id)?;

        loaded.ok_or_else(|| PlatformError::not_found("order", order_id))
    }

    fn notify_status_change(&self, order: &Order) {
        self.notify(order.diner_id, NotificationTemplate::order_update(order));
        if self.notify_rider {
            if let Some(rider_id) = order.rider_id {
                self.notify(rider_id, NotificationTemplate::delivery(order));
            }
        }
    }

    fn notify(&self, recipient: UserId, template: NotificationTemplate) {
        let kind = template.payload.kind;
        if let Err(e) = self.outbox.enqueue(recipient, template) {
            warn!(%recipient, ?kind, code = %e.code(), error = %e, "Notification not queued");
        }
    }
}
