//! # Observability & Tracing
//!
//! Structured logging for the whole platform is done with the `tracing` crate. The
//! actors log every request with an `entity_type` field, services open spans with
//! `#[instrument]`, and recovered failures (a swallowed notification error, a deferred
//! push batch) are logged at `warn`.
//!
//! ```bash
//! RUST_LOG=info cargo run            # state changes only
//! RUST_LOG=debug cargo run           # full payloads and query filters
//! RUST_LOG=forkline::notify=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` an order placement reads roughly:
//!
//! ```text
//! INFO place_order: Created entity_type="Order" id=order_1 size=1
//! INFO place_order: Order placed order_id=order_1 total=1000
//! INFO Dispatch finished delivered=1 rejected=0 deferred=0
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: compact format, no module targets, filter taken from
/// `RUST_LOG` (falls back to `info`).
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type carries the context instead
        .compact()
        .init();
}
