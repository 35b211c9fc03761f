//! # Mock Clients & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from a
//! queue of scripted expectations instead of a running actor. Use it to test services
//! that sit *around* clients (the order aggregator, the lifecycle orchestrator) without
//! seeding real collections.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | scripted replies | real records |
//! | **Error injection** | `return_err` | needs specific state |
//! | **Use case** | logic around a client | the collection itself, full system |
//!
//! Expectations are consumed in order. A request that does not match the next
//! expectation panics the mock task, which surfaces as `ActorDropped` in the caller.
//!
//! ```rust,ignore
//! let mut orders = MockClient::<Order>::new();
//! orders.expect_count().return_ok(3);
//! orders.expect_sum().return_ok(1500);
//!
//! let client = OrderClient::new(orders.client());
//! // exercise code that calls client.count(..) then client.sum(..)
//! orders.verify();
//! ```
//!
//! For tests that need to inspect the request payload itself, [`create_mock_client`]
//! returns the raw receiver and [`expect_get`] / [`expect_action`] pop typed requests.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// One scripted reply, keyed by request kind.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
    Find(Result<Vec<T>, FrameworkError>),
    Count(Result<usize, FrameworkError>),
    Sum(Result<u64, FrameworkError>),
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                match (request, next) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Find { respond_to, .. }, Some(Expectation::Find(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Count { respond_to, .. }, Some(Expectation::Count(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Sum { respond_to, .. }, Some(Expectation::Sum(r))) => {
                        let _ = respond_to.send(r);
                    }
                    _ => panic!("Unexpected request or expectation mismatch"),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::Get)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_update(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Update)
    }

    pub fn expect_action(&mut self) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Expectation::Action)
    }

    pub fn expect_find(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Find)
    }

    pub fn expect_count(&mut self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::Count)
    }

    pub fn expect_sum(&mut self) -> ExpectationBuilder<T, u64> {
        self.builder(Expectation::Sum)
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn builder<R>(
        &mut self,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }
}

/// Completes an expectation with the reply the mock should send.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Expectations<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.wrap)(response));
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Pops the next request if it is a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Pops the next request if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Query;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Device {
        id: u32,
        token: String,
    }

    #[derive(Debug)]
    struct DeviceCreate;

    #[derive(Debug)]
    enum DeviceAction {
        Revoke,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Device error")]
    struct DeviceError;

    #[async_trait]
    impl ActorEntity for Device {
        type Id = u32;
        type Create = DeviceCreate;
        type Update = ();
        type Action = DeviceAction;
        type ActionResult = bool;
        type Context = ();
        type Error = DeviceError;
        type Filter = ();
        type Sort = ();

        fn from_create_params(id: u32, _: DeviceCreate) -> Result<Self, DeviceError> {
            Ok(Self {
                id,
                token: String::new(),
            })
        }

        fn matches(&self, _: &()) -> bool {
            true
        }

        async fn on_update(&mut self, _: (), _: &()) -> Result<(), DeviceError> {
            Ok(())
        }

        async fn handle_action(&mut self, _: DeviceAction, _: &()) -> Result<bool, DeviceError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let mut mock = MockClient::<Device>::new();
        mock.expect_create().return_ok(1);
        mock.expect_find().return_ok(vec![Device {
            id: 1,
            token: "t".into(),
        }]);
        mock.expect_count().return_ok(1);
        mock.expect_sum().return_err(FrameworkError::ActorClosed);

        let client = mock.client();
        assert_eq!(client.create(DeviceCreate).await.unwrap(), 1);
        assert_eq!(client.find(Query::new(())).await.unwrap().len(), 1);
        assert_eq!(client.count(()).await.unwrap(), 1);
        assert!(matches!(
            client.sum(()).await,
            Err(FrameworkError::ActorClosed)
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn raw_receiver_exposes_the_action_payload() {
        let (client, mut receiver) = create_mock_client::<Device>(4);
        let task = tokio::spawn(async move { client.perform_action(7, DeviceAction::Revoke).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, 7);
        assert!(matches!(action, DeviceAction::Revoke));
        responder.send(Ok(false)).unwrap();

        assert!(!task.await.unwrap().unwrap());
    }
}
