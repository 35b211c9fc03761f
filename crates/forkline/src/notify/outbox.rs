//! Fire-and-forget delivery for lifecycle notifications.
//!
//! Order placement and transitions enqueue a [`Notice`] after their write is
//! acknowledged and return immediately. An [`OutboxWorker`] drains the queue through the
//! gateway and logs what did not arrive. Enqueueing never waits: a full queue drops the
//! notice with a warning.

use super::gateway::NotificationGateway;
use super::message::{DeliveryOutcome, NotificationTemplate};
use crate::error::NotifyError;
use crate::model::UserId;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Notice {
    pub recipient: UserId,
    pub template: NotificationTemplate,
}

/// Sending half of the outbox. Cheap to clone.
#[derive(Clone)]
pub struct Outbox {
    sender: mpsc::Sender<Notice>,
}

/// Receiving half. Runs until every [`Outbox`] handle is dropped and the queue is empty.
pub struct OutboxWorker {
    receiver: mpsc::Receiver<Notice>,
}

impl Outbox {
    pub fn new(capacity: usize) -> (Self, OutboxWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, OutboxWorker { receiver })
    }

    pub fn enqueue(
        &self,
        recipient: UserId,
        template: NotificationTemplate,
    ) -> Result<(), NotifyError> {
        self.sender
            .try_send(Notice {
                recipient,
                template,
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => NotifyError::OutboxFull,
                TrySendError::Closed(_) => NotifyError::OutboxClosed,
            })
    }
}

impl OutboxWorker {
    pub async fn run(mut self, gateway: NotificationGateway) {
        info!("Outbox started");
        while let Some(notice) = self.receiver.recv().await {
            let recipient = notice.recipient;
            let kind = notice.template.payload.kind;
            match gateway.send_to_user(recipient, notice.template).await {
                Ok(DeliveryOutcome::Delivered) => debug!(%recipient, ?kind, "Notification delivered"),
                Ok(outcome) => warn!(
                    %recipient,
                    ?kind,
                    ?outcome,
                    code = ?outcome.code(),
                    "Notification not delivered"
                ),
                Err(e) => warn!(%recipient, ?kind, error = %e, "Notification dropped"),
            }
        }
        info!("Outbox stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::model::{OrderId, Role, UserCreate};
    use crate::notify::mock::RecordingProvider;
    use crate::notify::{NotificationPayload, PayloadKind, Priority};
    use crate::user_actor;
    use std::sync::Arc;
    use std::time::Duration;

    fn template(order: u32) -> NotificationTemplate {
        NotificationTemplate {
            title: "Order Update".into(),
            body: "Your order is now confirmed".into(),
            payload: NotificationPayload {
                kind: PayloadKind::Order,
                order_id: Some(OrderId(order)),
                restaurant_id: None,
            },
            priority: Priority::High,
        }
    }

    #[test]
    fn full_outbox_refuses_without_waiting() {
        let (outbox, _worker) = Outbox::new(1);
        outbox.enqueue(UserId(1), template(1)).unwrap();
        assert_eq!(
            outbox.enqueue(UserId(1), template(2)),
            Err(NotifyError::OutboxFull)
        );
    }

    #[test]
    fn closed_outbox_is_reported() {
        let (outbox, worker) = Outbox::new(4);
        drop(worker);
        assert_eq!(
            outbox.enqueue(UserId(1), template(1)),
            Err(NotifyError::OutboxClosed)
        );
    }

    #[tokio::test]
    async fn worker_drains_queue_then_stops() {
        let (user_actor, users) = user_actor::new(8);
        tokio::spawn(user_actor.run(()));
        let diner = users
            .create_user(UserCreate {
                name: "Ana".into(),
                role: Role::Diner,
                push_token: Some("ExponentPushToken[ana]".into()),
            })
            .await
            .unwrap();

        let provider = Arc::new(RecordingProvider::new());
        let gateway =
            NotificationGateway::new(provider.clone(), users, &NotificationConfig::default());
        let (outbox, worker) = Outbox::new(8);
        let handle = tokio::spawn(worker.run(gateway));

        outbox.enqueue(diner, template(1)).unwrap();
        outbox.enqueue(diner, template(2)).unwrap();
        drop(outbox);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker should stop once the outbox is dropped")
            .unwrap();
        let sent = provider.messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].payload.order_id, Some(OrderId(1)));
        assert_eq!(sent[1].payload.order_id, Some(OrderId(2)));
    }
}
