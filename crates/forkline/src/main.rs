//! Walks one order through the platform end to end, logging as it goes.
//!
//! ```bash
//! RUST_LOG=info cargo run -p forkline     # compact logs
//! RUST_LOG=debug cargo run -p forkline    # rendered push payloads
//! ```

use forkline::clock::{Clock, SystemClock};
use forkline::lifecycle::{NewMenuItem, NewRestaurant, OrderLine, PlaceOrder};
use forkline::model::{OrderStatus, PaymentMethod, PaymentStatus, Role, UserCreate};
use forkline::notify::LoggingProvider;
use forkline::{Platform, PlatformConfig};
use forkline_actor::tracing::setup_tracing;
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = PlatformConfig::from_env();
    let clock = Arc::new(SystemClock);
    let platform = Platform::new(&config, Arc::new(LoggingProvider), clock.clone());

    let account = |name: &str, role, token: Option<&str>| UserCreate {
        name: name.to_string(),
        role,
        push_token: token.map(str::to_string),
    };
    let owner = platform
        .users
        .create_user(account(
            "Mei",
            Role::RestaurantOwner,
            Some("ExponentPushToken[owner-device]"),
        ))
        .await
        .map_err(|e| e.to_string())?;
    let diner = platform
        .users
        .create_user(account(
            "Sam",
            Role::Diner,
            Some("ExponentPushToken[diner-device]"),
        ))
        .await
        .map_err(|e| e.to_string())?;
    let rider = platform
        .users
        .create_user(account("Ravi", Role::Rider, None))
        .await
        .map_err(|e| e.to_string())?;

    let restaurant = async {
        let restaurant = platform
            .catalog
            .create_restaurant(
                owner,
                NewRestaurant {
                    name: "Lotus Garden".into(),
                    description: "Noodles and curries".into(),
                    cuisine: "Thai".into(),
                },
            )
            .await?;
        for (name, category, price) in [
            ("Pad Thai", "Mains", 450),
            ("Green Curry", "Mains", 500),
            ("Spring Rolls", "Starters", 150),
        ] {
            platform
                .catalog
                .add_menu_item(
                    owner,
                    restaurant.id,
                    NewMenuItem {
                        name: name.into(),
                        category: category.into(),
                        price,
                        is_available: true,
                    },
                )
                .await?;
        }
        Ok::<_, forkline::PlatformError>(restaurant)
    }
    .instrument(tracing::info_span!("catalog_setup"))
    .await
    .map_err(|e| e.to_string())?;

    let menu = platform
        .catalog
        .restaurant_menu(restaurant.id, None)
        .await
        .map_err(|e| e.to_string())?;
    let lines = menu
        .iter()
        .take(2)
        .map(|item| OrderLine {
            menu_item_id: item.id,
            quantity: 1,
        })
        .collect();

    let order = async {
        let order = platform
            .lifecycle
            .place_order(
                diner,
                PlaceOrder {
                    restaurant_id: restaurant.id,
                    lines,
                    payment_method: PaymentMethod::Card,
                    delivery_address: "12 Canal Street".into(),
                },
            )
            .await?;
        platform
            .lifecycle
            .settle_payment(order.id, PaymentStatus::Completed)
            .await?;
        for next in [OrderStatus::Confirmed, OrderStatus::Preparing] {
            platform.lifecycle.transition(owner, order.id, next).await?;
        }
        platform
            .lifecycle
            .assign_rider(owner, order.id, rider)
            .await?;
        for next in [OrderStatus::OutForDelivery, OrderStatus::Delivered] {
            platform.lifecycle.transition(rider, order.id, next).await?;
        }
        platform.lifecycle.get_order(diner, order.id).await
    }
    .instrument(tracing::info_span!("order_processing"))
    .await
    .map_err(|e| e.to_string())?;
    info!(order_id = %order.id, status = %order.status, total = order.total_amount, "Order finished");

    let dashboard = platform
        .catalog
        .restaurant_dashboard(owner, restaurant.id, clock.now())
        .await
        .map_err(|e| e.to_string())?;
    let rendered = serde_json::to_string_pretty(&dashboard).map_err(|e| e.to_string())?;
    println!("{rendered}");

    platform.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
