//! # Notification Gateway
//!
//! `dispatch` runs four steps:
//!
//! 1. **Validate**: messages whose token fails the provider's rule are marked
//!    `Rejected(InvalidToken)` and dropped from transmission.
//! 2. **Partition**: the rest are chunked, in input order, into batches of at most
//!    `batch_size` messages.
//! 3. **Transmit**: batches run concurrently, at most `max_concurrent_batches` at a
//!    time, each bounded by `batch_timeout`. A batch that fails or times out marks all
//!    of its messages `Deferred`; other batches are unaffected.
//! 4. **Aggregate**: every outcome is written back at its message's input index, so the
//!    result has the input's length and order whatever order batches finish in.

use super::message::{DeliveryOutcome, NotificationMessage, NotificationTemplate, RejectReason};
use super::provider::PushProvider;
use crate::clients::UserClient;
use crate::config::NotificationConfig;
use crate::error::NotifyError;
use crate::model::UserId;
use forkline_actor::ActorClient;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

type Batch = Vec<(usize, NotificationMessage)>;

/// Result of a bulk send.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkReport {
    /// One entry per recipient that had a token, in request order.
    pub outcomes: Vec<(UserId, DeliveryOutcome)>,
    /// Recipients dropped before dispatch: unknown users or users without a token.
    pub skipped: Vec<UserId>,
}

impl BulkReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_delivered()).count()
    }
}

#[derive(Clone)]
pub struct NotificationGateway {
    provider: Arc<dyn PushProvider>,
    users: UserClient,
    batch_size: usize,
    max_concurrent_batches: usize,
    batch_timeout: Duration,
}

impl NotificationGateway {
    pub fn new(
        provider: Arc<dyn PushProvider>,
        users: UserClient,
        config: &NotificationConfig,
    ) -> Self {
        let batch_size = config
            .max_batch_size
            .min(provider.max_batch_size())
            .max(1);
        Self {
            provider,
            users,
            batch_size,
            max_concurrent_batches: config.max_concurrent_batches.max(1),
            batch_timeout: config.batch_timeout,
        }
    }

    /// Effective batch size: the smaller of the configured and the provider limit.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn dispatch(&self, messages: Vec<NotificationMessage>) -> Vec<DeliveryOutcome> {
        let mut outcomes: Vec<Option<DeliveryOutcome>> = vec![None; messages.len()];

        let mut valid = Vec::with_capacity(messages.len());
        for (index, message) in messages.into_iter().enumerate() {
            if self.provider.is_valid_token(&message.to) {
                valid.push((index, message));
            } else {
                warn!(index, "Rejecting malformed push token");
                outcomes[index] = Some(DeliveryOutcome::Rejected(RejectReason::InvalidToken));
            }
        }

        let batches = partition(valid, self.batch_size);
        debug!(batches = batches.len(), batch_size = self.batch_size, "Dispatching");

        let permits = Arc::new(Semaphore::new(self.max_concurrent_batches));
        let mut in_flight = JoinSet::new();
        for (batch_no, batch) in batches.into_iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let permits = Arc::clone(&permits);
            let timeout = self.batch_timeout;
            in_flight.spawn(async move {
                let _permit = permits.acquire_owned().await;
                send_one(provider.as_ref(), batch_no, batch, timeout).await
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(results) => {
                    for (index, outcome) in results {
                        outcomes[index] = Some(outcome);
                    }
                }
                // Messages of a panicked batch keep `None` and become Deferred below.
                Err(e) => warn!(error = %e, "Batch task failed"),
            }
        }

        outcomes
            .into_iter()
            .map(|o| o.unwrap_or(DeliveryOutcome::Deferred))
            .collect()
    }

    /// Sends one message to one user. A user without a token (or no such user) yields
    /// `Rejected(NoToken)` without contacting the provider.
    #[instrument(skip(self, template), fields(kind = ?template.payload.kind))]
    pub async fn send_to_user(
        &self,
        user_id: UserId,
        template: NotificationTemplate,
    ) -> Result<DeliveryOutcome, NotifyError> {
        let token = self.users.get(user_id).await?.and_then(|u| u.push_token);
        let Some(token) = token else {
            info!("Recipient has no push token");
            return Ok(DeliveryOutcome::Rejected(RejectReason::NoToken));
        };

        let outcome = self
            .dispatch(vec![NotificationMessage::new(token, template)])
            .await
            .into_iter()
            .next()
            .unwrap_or(DeliveryOutcome::Deferred);
        Ok(outcome)
    }

    /// Sends the same template to many users. Duplicate ids are sent once; ids without a
    /// token are reported in [`BulkReport::skipped`] and never validated.
    #[instrument(skip(self, user_ids, template), fields(recipients = user_ids.len()))]
    pub async fn send_to_users(
        &self,
        user_ids: Vec<UserId>,
        template: NotificationTemplate,
    ) -> Result<BulkReport, NotifyError> {
        let mut seen = HashSet::new();
        let requested: Vec<UserId> = user_ids.into_iter().filter(|id| seen.insert(*id)).collect();

        let tokens: HashMap<UserId, String> = self
            .users
            .reachable_users(requested.clone())
            .await?
            .into_iter()
            .filter_map(|user| user.push_token.map(|token| (user.id, token)))
            .collect();

        let mut report = BulkReport::default();
        let mut recipients = Vec::new();
        let mut messages = Vec::new();
        for id in requested {
            match tokens.get(&id) {
                Some(token) => {
                    recipients.push(id);
                    messages.push(NotificationMessage::new(token.clone(), template.clone()));
                }
                None => report.skipped.push(id),
            }
        }

        let outcomes = self.dispatch(messages).await;
        report.outcomes = recipients.into_iter().zip(outcomes).collect();
        info!(
            delivered = report.delivered(),
            attempted = report.outcomes.len(),
            skipped = report.skipped.len(),
            "Bulk send finished"
        );
        Ok(report)
    }
}

/// Chunks `(index, message)` pairs into batches of at most `size`, keeping order.
fn partition(messages: Batch, size: usize) -> Vec<Batch> {
    let mut batches = Vec::with_capacity(messages.len().div_ceil(size.max(1)));
    let mut current = Vec::with_capacity(size);
    for entry in messages {
        current.push(entry);
        if current.len() == size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

async fn send_one(
    provider: &dyn PushProvider,
    batch_no: usize,
    batch: Batch,
    timeout: Duration,
) -> Vec<(usize, DeliveryOutcome)> {
    let (indices, messages): (Vec<usize>, Vec<NotificationMessage>) = batch.into_iter().unzip();

    let outcomes = match tokio::time::timeout(timeout, provider.send_batch(&messages)).await {
        Ok(Ok(mut outcomes)) => {
            if outcomes.len() != messages.len() {
                warn!(
                    batch_no,
                    expected = messages.len(),
                    got = outcomes.len(),
                    "Provider returned a misaligned outcome list"
                );
                outcomes.resize(messages.len(), DeliveryOutcome::Deferred);
            }
            debug!(batch_no, size = messages.len(), "Batch sent");
            outcomes
        }
        Ok(Err(e)) => {
            warn!(batch_no, size = messages.len(), error = %e, "Batch failed, deferring");
            vec![DeliveryOutcome::Deferred; messages.len()]
        }
        Err(_) => {
            warn!(batch_no, size = messages.len(), ?timeout, "Batch timed out, deferring");
            vec![DeliveryOutcome::Deferred; messages.len()]
        }
    };

    indices.into_iter().zip(outcomes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationPayload, PayloadKind, Priority};

    fn numbered(n: usize) -> Batch {
        (0..n)
            .map(|i| {
                (
                    i,
                    NotificationMessage::new(
                        format!("ExpoPushToken[{i}]"),
                        NotificationTemplate {
                            title: String::new(),
                            body: String::new(),
                            payload: NotificationPayload {
                                kind: PayloadKind::Order,
                                order_id: None,
                                restaurant_id: None,
                            },
                            priority: Priority::Normal,
                        },
                    ),
                )
            })
            .collect()
    }

    #[test]
    fn partition_keeps_order_and_bounds() {
        let batches = partition(numbered(250), 100);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        let order: Vec<usize> = batches.iter().flatten().map(|(i, _)| *i).collect();
        assert_eq!(order, (0..250).collect::<Vec<_>>());
    }

    #[test]
    fn partition_edge_sizes() {
        assert!(partition(Vec::new(), 100).is_empty());
        assert_eq!(partition(numbered(100), 100).len(), 1);
        assert_eq!(partition(numbered(3), 1).len(), 3);
    }
}
