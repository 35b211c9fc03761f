use crate::aggregator::OrderAggregator;
use crate::clients::{MenuClient, OrderClient, RestaurantClient, UserClient};
use crate::clock::Clock;
use crate::config::PlatformConfig;
use crate::lifecycle::{CatalogService, OrderLifecycle};
use crate::notify::{NotificationGateway, Outbox, PushProvider};
use crate::{menu_actor, order_actor, restaurant_actor, user_actor};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running platform: four resource actors, the outbox worker and the services
/// built on them.
///
/// ```ignore
/// let platform = Platform::new(&PlatformConfig::from_env(), Arc::new(LoggingProvider), Arc::new(SystemClock));
/// let order = platform.lifecycle.place_order(diner, checkout).await?;
/// platform.shutdown().await?;
/// ```
pub struct Platform {
    pub users: UserClient,
    pub restaurants: RestaurantClient,
    pub menu: MenuClient,
    pub orders: OrderClient,
    pub gateway: NotificationGateway,
    pub aggregator: OrderAggregator,
    pub catalog: CatalogService,
    pub lifecycle: OrderLifecycle,
    outbox_handle: JoinHandle<()>,
    actor_handles: Vec<JoinHandle<()>>,
}

impl Platform {
    /// Spawns every actor and the outbox worker. Must be called inside a Tokio runtime.
    pub fn new(
        config: &PlatformConfig,
        provider: Arc<dyn PushProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(?config, "Starting platform");

        // 1. Create actors (no dependencies yet)
        let (user_actor, users) = user_actor::new(config.actor_buffer);
        let (restaurant_actor, restaurants) = restaurant_actor::new(config.actor_buffer);
        let (menu_actor, menu) = menu_actor::new(config.actor_buffer);
        let (order_actor, orders) = order_actor::new(config.actor_buffer);

        // 2. Start actors with injected context
        let actor_handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(restaurant_actor.run(())),
            tokio::spawn(menu_actor.run(())),
            tokio::spawn(order_actor.run(restaurants.clone())),
        ];

        // 3. Services
        let gateway = NotificationGateway::new(provider, users.clone(), &config.notification);
        let (outbox, worker) = Outbox::new(config.notification.outbox_capacity);
        let outbox_handle = tokio::spawn(worker.run(gateway.clone()));

        let aggregator = OrderAggregator::new(
            orders.clone(),
            menu.clone(),
            config.dashboard_utc_offset_minutes,
        );
        let catalog = CatalogService::new(
            users.clone(),
            restaurants.clone(),
            menu.clone(),
            aggregator.clone(),
        );
        let lifecycle = OrderLifecycle::new(
            users.clone(),
            restaurants.clone(),
            menu.clone(),
            orders.clone(),
            outbox,
            clock,
            config,
        );

        Self {
            users,
            restaurants,
            menu,
            orders,
            gateway,
            aggregator,
            catalog,
            lifecycle,
            outbox_handle,
            actor_handles,
        }
    }

    /// Drops every handle, lets the outbox drain, then waits for the actors.
    ///
    /// Queued notifications are still delivered before the user actor stops, since the
    /// outbox worker holds its own user client until the queue is empty.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down platform...");
        let Platform {
            users,
            restaurants,
            menu,
            orders,
            gateway,
            aggregator,
            catalog,
            lifecycle,
            outbox_handle,
            actor_handles,
        } = self;

        // Closing every sender ends each loop once its queue is drained.
        drop(lifecycle);
        drop(catalog);
        drop(aggregator);
        drop(gateway);
        drop(orders);
        drop(menu);
        drop(restaurants);
        drop(users);

        if let Err(e) = outbox_handle.await {
            error!("Outbox task failed: {:?}", e);
            return Err(format!("Outbox task failed: {:?}", e));
        }
        for handle in actor_handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Platform shutdown complete.");
        Ok(())
    }
}
