//! [`ActorEntity`] implementation for [`User`].

use super::UserError;
use crate::model::{User, UserCreate, UserFilter, UserId, UserUpdate};
use async_trait::async_trait;
use forkline_actor::ActorEntity;

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = UserError;
    type Filter = UserFilter;
    type Sort = ();

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, UserError> {
        if params.name.trim().is_empty() {
            return Err(UserError::ValidationError("name is required".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            role: params.role,
            push_token: params.push_token,
        })
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        if let Some(ids) = &filter.ids {
            if !ids.contains(&self.id) {
                return false;
            }
        }
        !filter.with_push_token || self.push_token.is_some()
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), UserError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(UserError::ValidationError("name is required".into()));
            }
            self.name = name;
        }
        if let Some(token) = update.push_token {
            self.push_token = token;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), UserError> {
        Ok(())
    }
}
