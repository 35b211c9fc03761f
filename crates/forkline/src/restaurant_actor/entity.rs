//! [`ActorEntity`] implementation for [`Restaurant`].

use super::RestaurantError;
use crate::model::{
    Restaurant, RestaurantAction, RestaurantCreate, RestaurantFilter, RestaurantId,
    RestaurantSort, RestaurantUpdate,
};
use async_trait::async_trait;
use forkline_actor::ActorEntity;
use std::cmp::Ordering;

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl ActorEntity for Restaurant {
    type Id = RestaurantId;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;
    type Action = RestaurantAction;
    type ActionResult = Restaurant;
    type Context = ();
    type Error = RestaurantError;
    type Filter = RestaurantFilter;
    type Sort = RestaurantSort;

    fn from_create_params(
        id: RestaurantId,
        params: RestaurantCreate,
    ) -> Result<Self, RestaurantError> {
        if params.name.trim().is_empty() {
            return Err(RestaurantError::ValidationError("name is required".into()));
        }
        Ok(Self {
            id,
            owner_id: params.owner_id,
            name: params.name,
            description: params.description,
            cuisine: params.cuisine,
            is_active: true,
            rating: 0.0,
            review_count: 0,
        })
    }

    fn matches(&self, filter: &RestaurantFilter) -> bool {
        if filter.active_only && !self.is_active {
            return false;
        }
        if filter.owner_id.is_some_and(|owner| owner != self.owner_id) {
            return false;
        }
        if let Some(cuisine) = &filter.cuisine {
            if !self.cuisine.eq_ignore_ascii_case(cuisine) {
                return false;
            }
        }
        if filter.min_rating.is_some_and(|min| self.rating < min) {
            return false;
        }
        match &filter.text {
            Some(text) => {
                let needle = text.to_lowercase();
                contains_ignore_case(&self.name, &needle)
                    || contains_ignore_case(&self.cuisine, &needle)
                    || contains_ignore_case(&self.description, &needle)
            }
            None => true,
        }
    }

    fn compare(&self, other: &Self, sort: &RestaurantSort) -> Ordering {
        match sort {
            RestaurantSort::RatingDesc => other.rating.total_cmp(&self.rating),
        }
    }

    async fn on_update(
        &mut self,
        update: RestaurantUpdate,
        _ctx: &(),
    ) -> Result<(), RestaurantError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(RestaurantError::ValidationError("name is required".into()));
            }
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(cuisine) = update.cuisine {
            self.cuisine = cuisine;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RestaurantAction,
        _ctx: &(),
    ) -> Result<Restaurant, RestaurantError> {
        match action {
            RestaurantAction::RecordReview { stars } => {
                if !(1..=5).contains(&stars) {
                    return Err(RestaurantError::ValidationError(format!(
                        "stars must be between 1 and 5, got {stars}"
                    )));
                }
                let total = self.rating * self.review_count as f32 + f32::from(stars);
                self.review_count += 1;
                self.rating = total / self.review_count as f32;
                Ok(self.clone())
            }
        }
    }
}
