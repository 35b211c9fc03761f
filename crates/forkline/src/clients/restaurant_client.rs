//! # Restaurant Client
//!
//! High-level API for the `Restaurant` actor.
use crate::model::{
    Restaurant, RestaurantAction, RestaurantCreate, RestaurantId, RestaurantUpdate,
};
use crate::restaurant_actor::RestaurantError;
use async_trait::async_trait;
use forkline_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Restaurant actor.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl RestaurantClient {
    pub fn new(inner: ResourceClient<Restaurant>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Restaurant> for RestaurantClient {
    type Error = RestaurantError;

    fn inner(&self) -> &ResourceClient<Restaurant> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => RestaurantError::NotFound(id),
            other => other
                .into_entity_error::<RestaurantError>()
                .unwrap_or_else(|e| RestaurantError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl RestaurantClient {
    #[instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        params: RestaurantCreate,
    ) -> Result<RestaurantId, RestaurantError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Folds one review into the restaurant's rating.
    #[instrument(skip(self))]
    pub async fn record_review(
        &self,
        id: RestaurantId,
        stars: u8,
    ) -> Result<Restaurant, RestaurantError> {
        debug!("Recording review");
        self.inner
            .perform_action(id, RestaurantAction::RecordReview { stars })
            .await
            .map_err(Self::map_error)
    }
}
