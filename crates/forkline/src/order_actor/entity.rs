//! [`ActorEntity`] implementation for [`Order`].

use super::OrderError;
use crate::clients::RestaurantClient;
use crate::model::{
    Order, OrderAction, OrderActionResult, OrderCreate, OrderFilter, OrderId, OrderSort,
    OrderStatus, PaymentStatus,
};
use async_trait::async_trait;
use forkline_actor::{ActorClient, ActorEntity};
use std::cmp::Ordering;
use tracing::{debug, info};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = RestaurantClient;
    type Error = OrderError;
    type Filter = OrderFilter;
    type Sort = OrderSort;

    /// Builds the record in state `created` and totals the snapshotted line items.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError(
                "order has no line items".into(),
            ));
        }
        if let Some(item) = params.items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "quantity of {} must be positive",
                item.menu_item_id
            )));
        }
        if params.delivery_address.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "delivery address is required".into(),
            ));
        }

        let subtotal = params
            .items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()));
        let total_amount = subtotal
            .saturating_add(params.delivery_fee)
            .saturating_add(params.tax);

        Ok(Self {
            id,
            restaurant_id: params.restaurant_id,
            diner_id: params.diner_id,
            rider_id: None,
            items: params.items,
            subtotal,
            delivery_fee: params.delivery_fee,
            tax: params.tax,
            total_amount,
            status: OrderStatus::Created,
            payment_status: PaymentStatus::Pending,
            payment_method: params.payment_method,
            delivery_address: params.delivery_address,
            created_at: params.created_at,
            updated_at: params.created_at,
        })
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.restaurant_id.map_or(true, |id| id == self.restaurant_id)
            && filter.diner_id.map_or(true, |id| id == self.diner_id)
            && filter.status.map_or(true, |status| status == self.status)
            && filter
                .payment_status
                .map_or(true, |status| status == self.payment_status)
            && filter
                .created_in
                .map_or(true, |window| window.contains(self.created_at))
    }

    fn compare(&self, other: &Self, sort: &OrderSort) -> Ordering {
        match sort {
            OrderSort::NewestFirst => other.created_at.cmp(&self.created_at),
        }
    }

    /// Revenue contribution.
    fn measure(&self) -> u64 {
        self.total_amount
    }

    async fn on_create(&mut self, restaurants: &RestaurantClient) -> Result<(), OrderError> {
        debug!(restaurant_id = %self.restaurant_id, "Validating restaurant");
        let restaurant = restaurants
            .get(self.restaurant_id)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
            .ok_or_else(|| OrderError::InvalidRestaurant(self.restaurant_id.to_string()))?;

        if !restaurant.is_active {
            return Err(OrderError::InvalidRestaurant(format!(
                "{} is not accepting orders",
                restaurant.id
            )));
        }

        self.status = OrderStatus::Pending;
        info!(order_id = %self.id, total = self.total_amount, "Order accepted");
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &RestaurantClient) -> Result<(), OrderError> {
        Err(OrderError::ValidationError(
            "orders change only through status, rider and payment actions".into(),
        ))
    }

    async fn on_delete(&self, _ctx: &RestaurantClient) -> Result<(), OrderError> {
        Err(OrderError::ValidationError(
            "orders are financial records and cannot be deleted".into(),
        ))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &RestaurantClient,
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Transition { expected, next, at } => {
                if self.status == next {
                    return Ok(OrderActionResult::Transition {
                        order: self.clone(),
                        changed: false,
                    });
                }
                if self.status != expected {
                    return Err(OrderError::StaleStatus {
                        expected,
                        actual: self.status,
                    });
                }
                if !self.status.can_transition_to(next) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to: next,
                    });
                }
                self.status = next;
                self.updated_at = at;
                Ok(OrderActionResult::Transition {
                    order: self.clone(),
                    changed: true,
                })
            }
            OrderAction::AssignRider { rider_id, at } => {
                // The rider on the road keeps the order until it is delivered.
                if self.status.is_terminal() || self.status == OrderStatus::OutForDelivery {
                    return Err(OrderError::ValidationError(format!(
                        "cannot assign a rider to a {} order",
                        self.status
                    )));
                }
                self.rider_id = Some(rider_id);
                self.updated_at = at;
                Ok(OrderActionResult::AssignRider(self.clone()))
            }
            OrderAction::SettlePayment { status, at } => {
                if self.payment_status == status {
                    return Ok(OrderActionResult::SettlePayment {
                        order: self.clone(),
                        changed: false,
                    });
                }
                if !self.payment_status.can_settle_to(status) {
                    return Err(OrderError::InvalidPaymentTransition {
                        from: self.payment_status,
                        to: status,
                    });
                }
                self.payment_status = status;
                self.updated_at = at;
                Ok(OrderActionResult::SettlePayment {
                    order: self.clone(),
                    changed: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, MenuItemId, PaymentMethod, RestaurantId, UserId};
    use chrono::{DateTime, Utc};
    use forkline_actor::mock::create_mock_client;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn params() -> OrderCreate {
        OrderCreate {
            restaurant_id: RestaurantId(1),
            diner_id: UserId(2),
            items: vec![
                LineItem {
                    menu_item_id: MenuItemId(1),
                    name: "Noodles".into(),
                    quantity: 2,
                    unit_price: 300,
                },
                LineItem {
                    menu_item_id: MenuItemId(2),
                    name: "Tea".into(),
                    quantity: 1,
                    unit_price: 400,
                },
            ],
            delivery_fee: 100,
            tax: 100,
            payment_method: PaymentMethod::Card,
            delivery_address: "1 Main St".into(),
            created_at: at(1_000),
        }
    }

    fn pending_order() -> Order {
        let mut order = Order::from_create_params(OrderId(1), params()).unwrap();
        order.status = OrderStatus::Pending;
        order
    }

    fn restaurants() -> RestaurantClient {
        RestaurantClient::new(create_mock_client(1).0)
    }

    #[test]
    fn totals_are_computed_from_snapshots() {
        let order = Order::from_create_params(OrderId(1), params()).unwrap();
        assert_eq!(order.subtotal, 1000);
        assert_eq!(order.total_amount, 1200);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn empty_or_zero_quantity_orders_are_rejected() {
        let mut empty = params();
        empty.items.clear();
        assert!(matches!(
            Order::from_create_params(OrderId(1), empty),
            Err(OrderError::ValidationError(_))
        ));

        let mut zero = params();
        zero.items[0].quantity = 0;
        assert!(matches!(
            Order::from_create_params(OrderId(1), zero),
            Err(OrderError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn transition_is_compare_and_set() {
        let ctx = restaurants();
        let mut order = pending_order();

        let stale = order
            .handle_action(
                OrderAction::Transition {
                    expected: OrderStatus::Confirmed,
                    next: OrderStatus::Preparing,
                    at: at(2_000),
                },
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(
            stale,
            OrderError::StaleStatus {
                expected: OrderStatus::Confirmed,
                actual: OrderStatus::Pending
            }
        );

        let result = order
            .handle_action(
                OrderAction::Transition {
                    expected: OrderStatus::Pending,
                    next: OrderStatus::Confirmed,
                    at: at(2_000),
                },
                &ctx,
            )
            .await
            .unwrap();
        assert!(matches!(
            result,
            OrderActionResult::Transition { changed: true, .. }
        ));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.updated_at, at(2_000));
    }

    #[tokio::test]
    async fn repeating_a_transition_is_a_no_op() {
        let ctx = restaurants();
        let mut order = pending_order();
        let result = order
            .handle_action(
                OrderAction::Transition {
                    expected: OrderStatus::Created,
                    next: OrderStatus::Pending,
                    at: at(5_000),
                },
                &ctx,
            )
            .await
            .unwrap();
        assert!(matches!(
            result,
            OrderActionResult::Transition { changed: false, .. }
        ));
        assert_eq!(order.updated_at, at(1_000));
    }

    #[tokio::test]
    async fn skipping_a_step_is_invalid() {
        let ctx = restaurants();
        let mut order = pending_order();
        let err = order
            .handle_action(
                OrderAction::Transition {
                    expected: OrderStatus::Pending,
                    next: OrderStatus::Delivered,
                    at: at(2_000),
                },
                &ctx,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn payment_settles_once() {
        let ctx = restaurants();
        let mut order = pending_order();
        let settle = |status| OrderAction::SettlePayment {
            status,
            at: at(3_000),
        };

        order
            .handle_action(settle(PaymentStatus::Completed), &ctx)
            .await
            .unwrap();
        let again = order
            .handle_action(settle(PaymentStatus::Completed), &ctx)
            .await
            .unwrap();
        assert!(matches!(
            again,
            OrderActionResult::SettlePayment { changed: false, .. }
        ));

        let err = order
            .handle_action(settle(PaymentStatus::Pending), &ctx)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidPaymentTransition {
                from: PaymentStatus::Completed,
                to: PaymentStatus::Pending
            }
        );
    }

    #[tokio::test]
    async fn rider_is_fixed_once_out_for_delivery() {
        let ctx = restaurants();
        let mut order = pending_order();
        let assign = |rider| OrderAction::AssignRider {
            rider_id: UserId(rider),
            at: at(2_000),
        };

        order.handle_action(assign(5), &ctx).await.unwrap();
        order.handle_action(assign(6), &ctx).await.unwrap();
        assert_eq!(order.rider_id, Some(UserId(6)));

        order.status = OrderStatus::OutForDelivery;
        let err = order.handle_action(assign(7), &ctx).await.unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));
        assert_eq!(order.rider_id, Some(UserId(6)));

        order.status = OrderStatus::Delivered;
        assert!(order.handle_action(assign(7), &ctx).await.is_err());
    }

    #[tokio::test]
    async fn orders_cannot_be_deleted() {
        let order = pending_order();
        assert!(order.on_delete(&restaurants()).await.is_err());
    }
}
