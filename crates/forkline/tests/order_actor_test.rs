use chrono::{DateTime, Duration, Utc};
use forkline::clients::RestaurantClient;
use forkline::model::{
    LineItem, MenuItemId, OrderCreate, OrderFilter, OrderSort, OrderStatus, PaymentMethod,
    PaymentStatus, Restaurant, RestaurantId, TimeWindow, UserId,
};
use forkline::order_actor::OrderError;
use forkline_actor::mock::MockClient;
use forkline_actor::{ActorClient, FrameworkError, Query};

fn opened_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_741_953_600, 0).unwrap()
}

fn restaurant(is_active: bool) -> Restaurant {
    Restaurant {
        id: RestaurantId(1),
        owner_id: UserId(10),
        name: "Casa Verde".into(),
        description: String::new(),
        cuisine: "Italian".into(),
        is_active,
        rating: 0.0,
        review_count: 0,
    }
}

fn checkout(minutes_after_open: i64) -> OrderCreate {
    OrderCreate {
        restaurant_id: RestaurantId(1),
        diner_id: UserId(20),
        items: vec![
            LineItem {
                menu_item_id: MenuItemId(1),
                name: "Margherita".into(),
                quantity: 2,
                unit_price: 300,
            },
            LineItem {
                menu_item_id: MenuItemId(2),
                name: "Tiramisu".into(),
                quantity: 1,
                unit_price: 400,
            },
        ],
        delivery_fee: 50,
        tax: 100,
        payment_method: PaymentMethod::Card,
        delivery_address: "1 Harbour Road".into(),
        created_at: opened_at() + Duration::minutes(minutes_after_open),
    }
}

/// Real order actor, mocked restaurant lookups: exercises `on_create` in isolation.
#[tokio::test]
async fn order_is_accepted_when_restaurant_is_active() {
    let mut restaurants = MockClient::<Restaurant>::new();
    restaurants.expect_get().return_ok(Some(restaurant(true)));

    let (order_actor, orders) = forkline::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(RestaurantClient::new(restaurants.client())));

    let id = orders.create_order(checkout(0)).await.unwrap();
    let order = orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.subtotal, 1000);
    assert_eq!(order.total_amount, 1150);
    assert_eq!(order.rider_id, None);

    restaurants.verify();
    drop(orders);
    handle.await.unwrap();
}

#[tokio::test]
async fn order_is_refused_for_inactive_or_missing_restaurant() {
    let mut restaurants = MockClient::<Restaurant>::new();
    restaurants.expect_get().return_ok(Some(restaurant(false)));
    restaurants.expect_get().return_ok(None);
    restaurants
        .expect_get()
        .return_err(FrameworkError::ActorDropped);

    let (order_actor, orders) = forkline::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(RestaurantClient::new(restaurants.client())));

    let inactive = orders.create_order(checkout(0)).await.unwrap_err();
    assert!(matches!(inactive, OrderError::InvalidRestaurant(_)));
    let missing = orders.create_order(checkout(0)).await.unwrap_err();
    assert!(matches!(missing, OrderError::InvalidRestaurant(_)));
    let unreachable = orders.create_order(checkout(0)).await.unwrap_err();
    assert!(matches!(unreachable, OrderError::ActorCommunicationError(_)));

    assert_eq!(orders.count(OrderFilter::default()).await.unwrap(), 0);

    restaurants.verify();
    drop(orders);
    handle.await.unwrap();
}

#[tokio::test]
async fn invalid_checkout_never_reaches_the_restaurant() {
    let restaurants = MockClient::<Restaurant>::new();
    let (order_actor, orders) = forkline::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(RestaurantClient::new(restaurants.client())));

    let mut empty = checkout(0);
    empty.items.clear();
    assert!(matches!(
        orders.create_order(empty).await.unwrap_err(),
        OrderError::ValidationError(_)
    ));

    let mut zero = checkout(0);
    zero.items[0].quantity = 0;
    assert!(matches!(
        orders.create_order(zero).await.unwrap_err(),
        OrderError::ValidationError(_)
    ));

    restaurants.verify();
    drop(orders);
    handle.await.unwrap();
}

#[tokio::test]
async fn status_follows_the_adjacency_table() {
    let mut restaurants = MockClient::<Restaurant>::new();
    restaurants.expect_get().return_ok(Some(restaurant(true)));
    let (order_actor, orders) = forkline::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(RestaurantClient::new(restaurants.client())));

    let id = orders.create_order(checkout(0)).await.unwrap();
    let at = opened_at() + Duration::minutes(1);

    let (order, changed) = orders
        .transition(id, OrderStatus::Pending, OrderStatus::Confirmed, at)
        .await
        .unwrap();
    assert!(changed);
    assert_eq!(order.updated_at, at);

    let (_, changed) = orders
        .transition(id, OrderStatus::Pending, OrderStatus::Confirmed, at)
        .await
        .unwrap();
    assert!(!changed);

    let err = orders
        .transition(id, OrderStatus::Confirmed, OrderStatus::Delivered, at)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Confirmed,
            to: OrderStatus::Delivered,
        }
    );

    let err = orders
        .transition(id, OrderStatus::Preparing, OrderStatus::OutForDelivery, at)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::StaleStatus {
            expected: OrderStatus::Preparing,
            actual: OrderStatus::Confirmed,
        }
    );

    let stored = orders.get(id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Confirmed);

    drop(orders);
    handle.await.unwrap();
}

#[tokio::test]
async fn orders_cannot_be_deleted() {
    let mut restaurants = MockClient::<Restaurant>::new();
    restaurants.expect_get().return_ok(Some(restaurant(true)));
    let (order_actor, orders) = forkline::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(RestaurantClient::new(restaurants.client())));

    let id = orders.create_order(checkout(0)).await.unwrap();
    assert!(matches!(
        orders.delete(id).await.unwrap_err(),
        OrderError::ValidationError(_)
    ));
    assert!(orders.get(id).await.unwrap().is_some());

    drop(orders);
    handle.await.unwrap();
}

#[tokio::test]
async fn payment_settles_once_and_feeds_revenue() {
    let mut restaurants = MockClient::<Restaurant>::new();
    for _ in 0..3 {
        restaurants.expect_get().return_ok(Some(restaurant(true)));
    }
    let (order_actor, orders) = forkline::order_actor::new(8);
    let handle = tokio::spawn(order_actor.run(RestaurantClient::new(restaurants.client())));

    let early = orders.create_order(checkout(0)).await.unwrap();
    let late = orders.create_order(checkout(90)).await.unwrap();
    let unpaid = orders.create_order(checkout(30)).await.unwrap();
    let at = opened_at() + Duration::hours(2);

    for id in [early, late] {
        let (_, changed) = orders
            .settle_payment(id, PaymentStatus::Completed, at)
            .await
            .unwrap();
        assert!(changed);
    }
    let (_, changed) = orders
        .settle_payment(early, PaymentStatus::Completed, at)
        .await
        .unwrap();
    assert!(!changed);
    let err = orders
        .settle_payment(early, PaymentStatus::Failed, at)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidPaymentTransition { .. }));

    let paid = OrderFilter::restaurant(RestaurantId(1)).payment_status(PaymentStatus::Completed);
    assert_eq!(orders.total_amount(paid.clone()).await.unwrap(), 2 * 1150);

    let first_hour = TimeWindow {
        start: opened_at(),
        end: opened_at() + Duration::hours(1),
    };
    assert_eq!(
        orders
            .total_amount(paid.created_in(first_hour))
            .await
            .unwrap(),
        1150
    );

    let newest_first: Vec<_> = orders
        .find(Query::new(OrderFilter::restaurant(RestaurantId(1))).sorted(OrderSort::NewestFirst))
        .await
        .unwrap()
        .into_iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(newest_first, vec![late, unpaid, early]);

    restaurants.verify();
    drop(orders);
    handle.await.unwrap();
}
