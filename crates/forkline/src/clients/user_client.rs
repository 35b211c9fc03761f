//! # User Client
//!
//! High-level API for the `User` actor. Besides account CRUD it serves as the
//! notification gateway's recipient directory.
use crate::model::{User, UserCreate, UserFilter, UserId, UserUpdate};
use crate::user_actor::UserError;
use forkline_actor::{ActorClient, FrameworkError, Query, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            other => other
                .into_entity_error::<UserError>()
                .unwrap_or_else(|e| UserError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl UserClient {
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Sets or clears the device address notifications are sent to.
    #[instrument(skip(self, token))]
    pub async fn register_push_token(
        &self,
        id: UserId,
        token: Option<String>,
    ) -> Result<User, UserError> {
        debug!(has_token = token.is_some(), "Registering push token");
        let update = UserUpdate {
            push_token: Some(token),
            ..UserUpdate::default()
        };
        self.update_user(id, update).await
    }

    /// Users among `ids` that have a push token, in id order.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn reachable_users(&self, ids: Vec<UserId>) -> Result<Vec<User>, UserError> {
        self.find(Query::new(UserFilter::reachable(ids))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use forkline_actor::mock::MockClient;

    #[tokio::test]
    async fn entity_errors_keep_their_type() {
        let mut mock = MockClient::<User>::new();
        mock.expect_update().return_err(FrameworkError::EntityError(Box::new(
            UserError::ValidationError("name is required".into()),
        )));
        mock.expect_update()
            .return_err(FrameworkError::NotFound("user_9".into()));

        let client = UserClient::new(mock.client());
        let err = client
            .update_user(UserId(1), UserUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err, UserError::ValidationError("name is required".into()));

        let err = client
            .register_push_token(UserId(9), None)
            .await
            .unwrap_err();
        assert_eq!(err, UserError::NotFound("user_9".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn reachable_users_passes_through_find() {
        let mut mock = MockClient::<User>::new();
        mock.expect_find().return_ok(vec![User {
            id: UserId(1),
            name: "Ana".into(),
            role: Role::Diner,
            push_token: Some("ExponentPushToken[abc]".into()),
        }]);

        let client = UserClient::new(mock.client());
        let users = client
            .reachable_users(vec![UserId(1), UserId(2)])
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        mock.verify();
    }
}
