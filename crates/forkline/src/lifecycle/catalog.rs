//! # Catalog Service
//!
//! Restaurants and menus. Reads are public; every write, the dashboard and order
//! listing go through the [`OwnershipGuard`] first.

use crate::aggregator::{DashboardStats, OrderAggregator};
use crate::clients::{MenuClient, RestaurantClient, UserClient};
use crate::error::PlatformError;
use crate::guard::{GuardedAction, OwnershipGuard, Resource};
use crate::model::{
    MenuItem, MenuItemCreate, MenuItemFilter, MenuItemId, MenuItemUpdate, MenuSort, Restaurant,
    RestaurantCreate, RestaurantFilter, RestaurantId, RestaurantSort, RestaurantUpdate, Role,
    UserId,
};
use chrono::{DateTime, Utc};
use forkline_actor::{ActorClient, Query};
use serde::Serialize;
use tracing::{info, instrument};

/// Most results a text search returns.
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub description: String,
    pub cuisine: String,
}

#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub price: u64,
    pub is_available: bool,
}

/// Owner dashboard: aggregator figures plus review standing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantDashboard {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub rating: f32,
    pub total_reviews: u32,
}

#[derive(Clone)]
pub struct CatalogService {
    users: UserClient,
    restaurants: RestaurantClient,
    menu: MenuClient,
    aggregator: OrderAggregator,
    guard: OwnershipGuard,
}

impl CatalogService {
    pub fn new(
        users: UserClient,
        restaurants: RestaurantClient,
        menu: MenuClient,
        aggregator: OrderAggregator,
    ) -> Self {
        Self {
            users,
            restaurants,
            menu,
            aggregator,
            guard: OwnershipGuard,
        }
    }

    /// Registers a restaurant owned by the caller, who must be a restaurant owner.
    #[instrument(skip(self, new), fields(%caller, name = %new.name))]
    pub async fn create_restaurant(
        &self,
        caller: UserId,
        new: NewRestaurant,
    ) -> Result<Restaurant, PlatformError> {
        let user = self
            .users
            .get(caller)
            .await?
            .ok_or_else(|| PlatformError::not_found("user", caller))?;
        if user.role != Role::RestaurantOwner {
            return Err(PlatformError::NotAuthorized(format!(
                "{caller} is not a restaurant owner"
            )));
        }

        let id = self
            .restaurants
            .create_restaurant(RestaurantCreate {
                owner_id: caller,
                name: new.name,
                description: new.description,
                cuisine: new.cuisine,
            })
            .await?;
        info!(restaurant_id = %id, "Restaurant created");
        self.restaurant(id).await
    }

    #[instrument(skip(self), fields(%caller, %restaurant_id))]
    pub async fn update_restaurant(
        &self,
        caller: UserId,
        restaurant_id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, PlatformError> {
        self.owned_restaurant(caller, restaurant_id, GuardedAction::UpdateRestaurant)
            .await?;
        Ok(self
            .restaurants
            .update_restaurant(restaurant_id, update)
            .await?)
    }

    /// Deactivates the restaurant and marks every one of its menu items unavailable.
    /// The record itself stays so existing orders keep a valid reference.
    #[instrument(skip(self), fields(%caller, %restaurant_id))]
    pub async fn delete_restaurant(
        &self,
        caller: UserId,
        restaurant_id: RestaurantId,
    ) -> Result<(), PlatformError> {
        self.owned_restaurant(caller, restaurant_id, GuardedAction::DeleteRestaurant)
            .await?;

        let deactivate = RestaurantUpdate {
            is_active: Some(false),
            ..RestaurantUpdate::default()
        };
        self.restaurants
            .update_restaurant(restaurant_id, deactivate)
            .await?;

        let available = MenuItemFilter {
            available_only: true,
            ..MenuItemFilter::restaurant(restaurant_id)
        };
        let items = self.menu.find(Query::new(available)).await?;
        let withdrawn = items.len();
        for item in items {
            let update = MenuItemUpdate {
                is_available: Some(false),
                ..MenuItemUpdate::default()
            };
            self.menu.update_menu_item(item.id, update).await?;
        }
        info!(withdrawn, "Restaurant deactivated");
        Ok(())
    }

    #[instrument(skip(self, new), fields(%caller, %restaurant_id, name = %new.name))]
    pub async fn add_menu_item(
        &self,
        caller: UserId,
        restaurant_id: RestaurantId,
        new: NewMenuItem,
    ) -> Result<MenuItem, PlatformError> {
        self.owned_restaurant(caller, restaurant_id, GuardedAction::AddMenuItem)
            .await?;
        let id = self
            .menu
            .create_menu_item(MenuItemCreate {
                restaurant_id,
                name: new.name,
                category: new.category,
                price: new.price,
                is_available: new.is_available,
            })
            .await?;
        self.menu
            .get(id)
            .await?
            .ok_or_else(|| PlatformError::Store(format!("{id} missing right after create")))
    }

    #[instrument(skip(self), fields(%caller, %item_id))]
    pub async fn update_menu_item(
        &self,
        caller: UserId,
        item_id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, PlatformError> {
        self.owned_menu_item(caller, item_id, GuardedAction::UpdateMenuItem)
            .await?;
        Ok(self.menu.update_menu_item(item_id, update).await?)
    }

    /// Removes the item outright. Orders keep their own snapshot of name and price.
    #[instrument(skip(self), fields(%caller, %item_id))]
    pub async fn delete_menu_item(
        &self,
        caller: UserId,
        item_id: MenuItemId,
    ) -> Result<(), PlatformError> {
        self.owned_menu_item(caller, item_id, GuardedAction::DeleteMenuItem)
            .await?;
        Ok(self.menu.delete(item_id).await?)
    }

    /// Active restaurants, best rated first.
    #[instrument(skip(self))]
    pub async fn list_restaurants(
        &self,
        cuisine: Option<String>,
        min_rating: Option<f32>,
    ) -> Result<Vec<Restaurant>, PlatformError> {
        let filter = RestaurantFilter {
            active_only: true,
            cuisine,
            min_rating,
            ..RestaurantFilter::default()
        };
        Ok(self
            .restaurants
            .find(Query::new(filter).sorted(RestaurantSort::RatingDesc))
            .await?)
    }

    /// Case-insensitive match on name, cuisine or description; active only.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, PlatformError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlatformError::Validation("search query is required".into()));
        }
        let filter = RestaurantFilter {
            active_only: true,
            text: Some(query.to_string()),
            ..RestaurantFilter::default()
        };
        Ok(self
            .restaurants
            .find(Query::new(filter).limit(SEARCH_LIMIT))
            .await?)
    }

    /// Available dishes, by category then name.
    #[instrument(skip(self))]
    pub async fn restaurant_menu(
        &self,
        restaurant_id: RestaurantId,
        category: Option<String>,
    ) -> Result<Vec<MenuItem>, PlatformError> {
        self.restaurant(restaurant_id).await?;
        let filter = MenuItemFilter {
            available_only: true,
            category,
            ..MenuItemFilter::restaurant(restaurant_id)
        };
        Ok(self
            .menu
            .find(Query::new(filter).sorted(MenuSort::CategoryThenName))
            .await?)
    }

    #[instrument(skip(self), fields(%caller, %restaurant_id))]
    pub async fn restaurant_dashboard(
        &self,
        caller: UserId,
        restaurant_id: RestaurantId,
        as_of: DateTime<Utc>,
    ) -> Result<RestaurantDashboard, PlatformError> {
        let restaurant = self
            .owned_restaurant(caller, restaurant_id, GuardedAction::ViewDashboard)
            .await?;
        let stats = self
            .aggregator
            .compute_dashboard(restaurant_id, as_of)
            .await?;
        Ok(RestaurantDashboard {
            stats,
            rating: restaurant.rating,
            total_reviews: restaurant.review_count,
        })
    }

    async fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, PlatformError> {
        self.restaurants
            .get(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("restaurant", id))
    }

    async fn owned_restaurant(
        &self,
        caller: UserId,
        restaurant_id: RestaurantId,
        action: GuardedAction,
    ) -> Result<Restaurant, PlatformError> {
        let restaurant = self.restaurants.get(restaurant_id).await?;
        self.guard.enforce(
            caller,
            restaurant.as_ref().map(Resource::Restaurant),
            action,
            restaurant_id,
        )?;
        restaurant.ok_or_else(|| PlatformError::not_found("restaurant", restaurant_id))
    }

    async fn owned_menu_item(
        &self,
        caller: UserId,
        item_id: MenuItemId,
        action: GuardedAction,
    ) -> Result<MenuItem, PlatformError> {
        let loaded = match self.menu.get(item_id).await? {
            Some(item) => {
                let restaurant = self.restaurant(item.restaurant_id).await?;
                Some((item, restaurant))
            }
            None => None,
        };
        let resource = loaded
            .as_ref()
            .map(|(item, restaurant)| Resource::MenuItem { item, restaurant });
        self.guard.enforce(caller, resource, action, item_id)?;
        loaded
            .map(|(item, _)| item)
            .ok_or_else(|| PlatformError::not_found("menu item", item_id))
    }
}
