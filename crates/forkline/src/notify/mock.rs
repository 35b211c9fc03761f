//! Test double for [`PushProvider`].
//!
//! ```rust,ignore
//! let provider = Arc::new(RecordingProvider::new().fail_batches_containing("ExpoPushToken[down]"));
//! let gateway = NotificationGateway::new(provider.clone(), users, &config);
//! gateway.dispatch(messages).await;
//! assert_eq!(provider.batch_sizes(), vec![100, 100, 50]);
//! ```

use super::message::{DeliveryOutcome, NotificationMessage, RejectReason};
use super::provider::{is_expo_push_token, ProviderError, PushProvider, EXPO_MAX_BATCH_SIZE};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Records every batch it accepts. Uses the Expo token rule.
pub struct RecordingProvider {
    max_batch_size: usize,
    batches: Mutex<Vec<Vec<NotificationMessage>>>,
    calls: AtomicUsize,
    changed: Notify,
    failing_token: Option<String>,
    stalled: Option<(String, Duration)>,
    unregistered: HashSet<String>,
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            max_batch_size: EXPO_MAX_BATCH_SIZE,
            batches: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            changed: Notify::new(),
            failing_token: None,
            stalled: None,
            unregistered: HashSet::new(),
        }
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Any batch carrying `token` fails as a whole.
    pub fn fail_batches_containing(mut self, token: impl Into<String>) -> Self {
        self.failing_token = Some(token.into());
        self
    }

    /// Any batch carrying `token` takes `delay` before answering.
    pub fn stall_batches_containing(mut self, token: impl Into<String>, delay: Duration) -> Self {
        self.stalled = Some((token.into(), delay));
        self
    }

    /// Messages to `token` are refused individually, as for an uninstalled app.
    pub fn unregister(mut self, token: impl Into<String>) -> Self {
        self.unregistered.insert(token.into());
        self
    }

    /// Accepted batches, in completion order.
    pub fn batches(&self) -> Vec<Vec<NotificationMessage>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    /// Number of `send_batch` calls, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` messages were accepted. Wrap in a timeout.
    pub async fn wait_for_messages(&self, count: usize) -> Vec<NotificationMessage> {
        loop {
            let changed = self.changed.notified();
            let messages = self.messages();
            if messages.len() >= count {
                return messages;
            }
            changed.await;
        }
    }
}

fn carries(messages: &[NotificationMessage], token: &str) -> bool {
    messages.iter().any(|m| m.to == token)
}

#[async_trait]
impl PushProvider for RecordingProvider {
    fn is_valid_token(&self, token: &str) -> bool {
        is_expo_push_token(token)
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    async fn send_batch(
        &self,
        messages: &[NotificationMessage],
    ) -> Result<Vec<DeliveryOutcome>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some((token, delay)) = &self.stalled {
            if carries(messages, token) {
                tokio::time::sleep(*delay).await;
            }
        }
        if let Some(token) = &self.failing_token {
            if carries(messages, token) {
                return Err(ProviderError("push service unavailable".into()));
            }
        }

        let outcomes = messages
            .iter()
            .map(|m| {
                if self.unregistered.contains(&m.to) {
                    DeliveryOutcome::Rejected(RejectReason::Provider("DeviceNotRegistered".into()))
                } else {
                    DeliveryOutcome::Delivered
                }
            })
            .collect();

        self.batches.lock().unwrap().push(messages.to_vec());
        self.changed.notify_waiters();
        Ok(outcomes)
    }
}
