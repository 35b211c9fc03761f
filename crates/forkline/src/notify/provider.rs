//! The delivery provider seam.
//!
//! The gateway receives a provider as an `Arc<dyn PushProvider>`; there is no global
//! client. [`LoggingProvider`] is the in-process provider used by the demo binary, and
//! [`RecordingProvider`](super::mock::RecordingProvider) is the test double.

use super::message::{DeliveryOutcome, NotificationMessage};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Batch size the Expo push service accepts per request.
pub const EXPO_MAX_BATCH_SIZE: usize = 100;

/// A whole batch failed in transit. Every message in it becomes `Deferred`.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Provider error: {0}")]
pub struct ProviderError(pub String);

#[async_trait]
pub trait PushProvider: Send + Sync + 'static {
    /// Token-format rule. Tokens failing it are never transmitted.
    fn is_valid_token(&self, token: &str) -> bool;

    /// Largest batch one `send_batch` call accepts.
    fn max_batch_size(&self) -> usize;

    /// Sends one batch; on success returns one outcome per message, positionally.
    async fn send_batch(
        &self,
        messages: &[NotificationMessage],
    ) -> Result<Vec<DeliveryOutcome>, ProviderError>;
}

/// Expo push-token format: `ExponentPushToken[..]`, `ExpoPushToken[..]`, or a bare
/// 8-4-4-4-12 alphanumeric identifier.
pub fn is_expo_push_token(token: &str) -> bool {
    let bracketed = ["ExponentPushToken[", "ExpoPushToken["]
        .iter()
        .filter_map(|prefix| token.strip_prefix(prefix))
        .filter_map(|rest| rest.strip_suffix(']'))
        .any(|inner| !inner.is_empty());

    bracketed || is_bare_device_id(token)
}

fn is_bare_device_id(token: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Accepts Expo-format tokens and "delivers" by logging the rendered request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingProvider;

#[async_trait]
impl PushProvider for LoggingProvider {
    fn is_valid_token(&self, token: &str) -> bool {
        is_expo_push_token(token)
    }

    fn max_batch_size(&self) -> usize {
        EXPO_MAX_BATCH_SIZE
    }

    async fn send_batch(
        &self,
        messages: &[NotificationMessage],
    ) -> Result<Vec<DeliveryOutcome>, ProviderError> {
        match serde_json::to_string(messages) {
            Ok(body) => debug!(%body, "Push request"),
            Err(e) => warn!(error = %e, "Could not render push request"),
        }
        for message in messages {
            info!(title = %message.title, kind = ?message.payload.kind, "Push sent");
        }
        Ok(vec![DeliveryOutcome::Delivered; messages.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expo_token_formats() {
        assert!(is_expo_push_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_expo_push_token("ExpoPushToken[abc]"));
        assert!(is_expo_push_token("F5741A13-BCDA-434B-A316-5DC0E6FFA94F"));

        assert!(!is_expo_push_token("ExponentPushToken[]"));
        assert!(!is_expo_push_token("ExponentPushToken[abc"));
        assert!(!is_expo_push_token("PushToken[abc]"));
        assert!(!is_expo_push_token("F5741A13-BCDA-434B-A316"));
        assert!(!is_expo_push_token("F5741A13-BCDA-434B-A316-5DC0E6FFA94_"));
        assert!(!is_expo_push_token(""));
    }
}
