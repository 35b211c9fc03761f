//! # ActorClient Trait
//!
//! Common interface for collection-specific clients: default `get`, `delete`, `find` and
//! `count` built on top of the generic `ResourceClient`, with errors mapped into the
//! collection's own error type.
use crate::{ActorEntity, FrameworkError, Query, ResourceClient};
use async_trait::async_trait;

/// Trait for collection-specific clients to inherit the standard reads.
///
/// ```rust,ignore
/// #[async_trait]
/// impl ActorClient<User> for UserClient {
///     type Error = UserError;
///     fn inner(&self) -> &ResourceClient<User> { &self.inner }
///     fn map_error(e: FrameworkError) -> UserError {
///         UserError::ActorCommunicationError(e.to_string())
///     }
/// }
///
/// let user = user_client.get(UserId(1)).await?;
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The collection-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map engine errors to the collection's error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete a record by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Filtered, optionally sorted read.
    #[tracing::instrument(skip(self, query), fields(filter = ?query.filter))]
    async fn find(&self, query: Query<T>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find(query).await.map_err(Self::map_error)
    }

    /// Number of records selected by `filter`.
    #[tracing::instrument(skip(self))]
    async fn count(&self, filter: T::Filter) -> Result<usize, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().count(filter).await.map_err(Self::map_error)
    }
}
