//! # Order Client
//!
//! High-level API for the `Order` actor. Each action method unwraps the matching
//! [`OrderActionResult`] variant so callers get plain values back.
use crate::model::{
    Order, OrderAction, OrderActionResult, OrderCreate, OrderFilter, OrderId, OrderStatus,
    PaymentStatus, UserId,
};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forkline_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

impl OrderClient {
    /// Persists a checked-out order. The actor validates the restaurant in `on_create`.
    #[instrument(skip(self, params), fields(restaurant_id = %params.restaurant_id, diner_id = %params.diner_id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Compare-and-set status change. Returns the stored order and whether it changed.
    #[instrument(skip(self, at))]
    pub async fn transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<(Order, bool), OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::Transition { expected, next, at })
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::Transition { order, changed } => Ok((order, changed)),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, at))]
    pub async fn assign_rider(
        &self,
        id: OrderId,
        rider_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::AssignRider { rider_id, at })
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::AssignRider(order) => Ok(order),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, at))]
    pub async fn settle_payment(
        &self,
        id: OrderId,
        status: PaymentStatus,
        at: DateTime<Utc>,
    ) -> Result<(Order, bool), OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::SettlePayment { status, at })
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::SettlePayment { order, changed } => Ok((order, changed)),
            other => Err(unexpected(other)),
        }
    }

    /// Sum of `total_amount` over the orders selected by `filter`.
    #[instrument(skip(self))]
    pub async fn total_amount(&self, filter: OrderFilter) -> Result<u64, OrderError> {
        debug!("Sending request");
        self.inner.sum(filter).await.map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkline_actor::mock::{create_mock_client, expect_action};

    #[tokio::test]
    async fn stale_transition_is_recovered_as_typed_error() {
        let (client, mut receiver) = create_mock_client::<Order>(4);
        let orders = OrderClient::new(client);
        let at = DateTime::from_timestamp(0, 0).unwrap();

        let task = tokio::spawn(async move {
            orders
                .transition(OrderId(1), OrderStatus::Pending, OrderStatus::Confirmed, at)
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, OrderId(1));
        assert!(matches!(
            action,
            OrderAction::Transition {
                expected: OrderStatus::Pending,
                next: OrderStatus::Confirmed,
                ..
            }
        ));
        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                OrderError::StaleStatus {
                    expected: OrderStatus::Pending,
                    actual: OrderStatus::Cancelled,
                },
            ))))
            .unwrap();

        assert_eq!(
            task.await.unwrap().unwrap_err(),
            OrderError::StaleStatus {
                expected: OrderStatus::Pending,
                actual: OrderStatus::Cancelled,
            }
        );
    }

    #[tokio::test]
    async fn closed_actor_is_a_communication_error() {
        let (client, receiver) = create_mock_client::<Order>(1);
        drop(receiver);
        let orders = OrderClient::new(client);
        let err = orders
            .total_amount(OrderFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunicationError(_)));
    }
}
