//! [`ActorEntity`] implementation for [`MenuItem`].

use super::MenuItemError;
use crate::model::{MenuItem, MenuItemCreate, MenuItemFilter, MenuItemId, MenuItemUpdate, MenuSort};
use async_trait::async_trait;
use forkline_actor::ActorEntity;
use std::cmp::Ordering;

fn validate_name(name: &str) -> Result<(), MenuItemError> {
    if name.trim().is_empty() {
        return Err(MenuItemError::ValidationError("name is required".into()));
    }
    Ok(())
}

fn validate_price(price: u64) -> Result<(), MenuItemError> {
    if price == 0 {
        return Err(MenuItemError::ValidationError(
            "price must be positive".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = MenuItemUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = MenuItemError;
    type Filter = MenuItemFilter;
    type Sort = MenuSort;

    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, MenuItemError> {
        validate_name(&params.name)?;
        validate_price(params.price)?;
        Ok(Self {
            id,
            restaurant_id: params.restaurant_id,
            name: params.name,
            category: params.category,
            price: params.price,
            is_available: params.is_available,
        })
    }

    fn matches(&self, filter: &MenuItemFilter) -> bool {
        filter
            .restaurant_id
            .map_or(true, |restaurant_id| restaurant_id == self.restaurant_id)
            && (!filter.available_only || self.is_available)
            && filter
                .category
                .as_deref()
                .map_or(true, |category| self.category.eq_ignore_ascii_case(category))
    }

    fn compare(&self, other: &Self, sort: &MenuSort) -> Ordering {
        match sort {
            MenuSort::CategoryThenName => self
                .category
                .cmp(&other.category)
                .then_with(|| self.name.cmp(&other.name)),
        }
    }

    async fn on_update(&mut self, update: MenuItemUpdate, _ctx: &()) -> Result<(), MenuItemError> {
        if let Some(name) = update.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(is_available) = update.is_available {
            self.is_available = is_available;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), MenuItemError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RestaurantId;

    fn item(name: &str, category: &str, available: bool) -> MenuItem {
        MenuItem {
            id: MenuItemId(1),
            restaurant_id: RestaurantId(1),
            name: name.into(),
            category: category.into(),
            price: 250,
            is_available: available,
        }
    }

    #[test]
    fn restaurant_filter_ignores_availability() {
        let filter = MenuItemFilter::restaurant(RestaurantId(1));
        assert!(item("Soup", "Starters", false).matches(&filter));
        assert!(!item("Soup", "Starters", true).matches(&MenuItemFilter::restaurant(RestaurantId(2))));

        let available = MenuItemFilter {
            available_only: true,
            category: Some("starters".into()),
            ..filter
        };
        assert!(item("Soup", "Starters", true).matches(&available));
        assert!(!item("Soup", "Starters", false).matches(&available));
        assert!(!item("Cake", "Desserts", true).matches(&available));
    }

    #[test]
    fn sorts_by_category_then_name() {
        let a = item("Zucchini", "Mains", true);
        let b = item("Apple pie", "Mains", true);
        let c = item("Wings", "Starters", true);
        assert_eq!(a.compare(&b, &MenuSort::CategoryThenName), Ordering::Greater);
        assert_eq!(a.compare(&c, &MenuSort::CategoryThenName), Ordering::Less);
    }

    #[tokio::test]
    async fn zero_price_update_leaves_item_invalid() {
        let mut soup = item("Soup", "Starters", true);
        let update = MenuItemUpdate {
            price: Some(0),
            ..MenuItemUpdate::default()
        };
        assert!(matches!(
            soup.on_update(update, &()).await,
            Err(MenuItemError::ValidationError(_))
        ));
    }
}
