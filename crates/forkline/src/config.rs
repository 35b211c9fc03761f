//! Runtime configuration.
//!
//! Defaults are usable as-is; [`PlatformConfig::from_env`] overrides individual values
//! from `FORKLINE_*` variables. Absent or unparsable values keep the default.

use serde::Serialize;
use std::env;
use std::time::Duration;

/// Checkout pricing added on top of the line-item subtotal.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PricingConfig {
    /// Flat fee per order, in currency units.
    pub delivery_fee: u64,
    /// Tax on the subtotal in basis points (1000 = 10%), rounded half-up.
    pub tax_basis_points: u32,
}

impl PricingConfig {
    pub fn tax_on(&self, subtotal: u64) -> u64 {
        let scaled = u128::from(subtotal) * u128::from(self.tax_basis_points) + 5_000;
        u64::try_from(scaled / 10_000).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationConfig {
    /// Upper bound on messages per provider call. The gateway uses the smaller of this
    /// and the provider's own limit.
    pub max_batch_size: usize,
    pub max_concurrent_batches: usize,
    /// A batch still in flight after this long is reported `deferred`.
    pub batch_timeout: Duration,
    pub outbox_capacity: usize,
    /// Also notify the assigned rider about status changes.
    pub notify_rider: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 100,
            max_concurrent_batches: 4,
            batch_timeout: Duration::from_secs(10),
            outbox_capacity: 256,
            notify_rider: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformConfig {
    /// Request channel capacity of every resource actor.
    pub actor_buffer: usize,
    /// How many times a transition re-reads the order after losing a race.
    pub transition_attempts: usize,
    /// Fixed offset, in minutes east of UTC, that defines the dashboard's local midnight.
    pub dashboard_utc_offset_minutes: i32,
    pub pricing: PricingConfig,
    pub notification: NotificationConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            actor_buffer: 32,
            transition_attempts: 3,
            dashboard_utc_offset_minutes: 0,
            pricing: PricingConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl PlatformConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).map(|v| v.trim().to_string());

        let usize_var = |name: &str, default: usize| {
            parse(name)
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(default)
        };
        let u64_var = |name: &str, default: u64| {
            parse(name)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };
        let bool_var = |name: &str, default: bool| {
            parse(name)
                .and_then(|v| match v.as_str() {
                    "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
                    "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
                    _ => None,
                })
                .unwrap_or(default)
        };

        let notification = NotificationConfig {
            max_batch_size: usize_var(
                "FORKLINE_NOTIFY_MAX_BATCH_SIZE",
                defaults.notification.max_batch_size,
            )
            .max(1),
            max_concurrent_batches: usize_var(
                "FORKLINE_NOTIFY_MAX_CONCURRENT_BATCHES",
                defaults.notification.max_concurrent_batches,
            )
            .max(1),
            batch_timeout: Duration::from_millis(u64_var(
                "FORKLINE_NOTIFY_BATCH_TIMEOUT_MS",
                defaults.notification.batch_timeout.as_millis() as u64,
            )),
            outbox_capacity: usize_var(
                "FORKLINE_NOTIFY_OUTBOX_CAPACITY",
                defaults.notification.outbox_capacity,
            )
            .max(1),
            notify_rider: bool_var(
                "FORKLINE_NOTIFY_RIDER",
                defaults.notification.notify_rider,
            ),
        };

        Self {
            actor_buffer: usize_var("FORKLINE_ACTOR_BUFFER", defaults.actor_buffer).max(1),
            transition_attempts: usize_var(
                "FORKLINE_TRANSITION_ATTEMPTS",
                defaults.transition_attempts,
            )
            .max(1),
            dashboard_utc_offset_minutes: parse("FORKLINE_DASHBOARD_UTC_OFFSET_MINUTES")
                .and_then(|v| v.parse::<i32>().ok())
                .filter(|m| m.abs() < 24 * 60)
                .unwrap_or(defaults.dashboard_utc_offset_minutes),
            pricing: PricingConfig {
                delivery_fee: u64_var("FORKLINE_DELIVERY_FEE", defaults.pricing.delivery_fee),
                tax_basis_points: parse("FORKLINE_TAX_BASIS_POINTS")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(defaults.pricing.tax_basis_points),
            },
            notification,
        }
    }
}
