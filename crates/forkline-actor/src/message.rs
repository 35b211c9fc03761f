//! # Generic Messages
//!
//! Request types exchanged between `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A filtered, optionally sorted and truncated read over one collection.
#[derive(Debug)]
pub struct Query<T: ActorEntity> {
    pub filter: T::Filter,
    pub sort: Option<T::Sort>,
    pub limit: Option<usize>,
}

impl<T: ActorEntity> Query<T> {
    pub fn new(filter: T::Filter) -> Self {
        Self {
            filter,
            sort: None,
            limit: None,
        }
    }

    pub fn sorted(mut self, sort: T::Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Internal message type sent to the actor.
///
/// The CRUD + `Action` variants manage single records. `Find`, `Count` and `Sum` are the
/// collection reads: each one is evaluated in a single pass of the actor loop, so it
/// observes the collection as of one point between two writes.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Find {
        query: Query<T>,
        respond_to: Response<Vec<T>>,
    },
    Count {
        filter: T::Filter,
        respond_to: Response<usize>,
    },
    Sum {
        filter: T::Filter,
        respond_to: Response<u64>,
    },
}
