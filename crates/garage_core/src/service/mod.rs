//! Car and engine use-case services.
//!
//! # Responsibility
//! - Expose repository operations as use-case entry points for outer layers.
//! - Emit one structured log event per operation.
//!
//! # Invariants
//! - Services never bypass repository validation or transactions.
//! - Services stay storage-agnostic: they depend on repository traits only.

pub mod car_service;
pub mod engine_service;

use crate::repo::{ErrorKind, RepoResult};
use log::{info, warn};
use std::time::Instant;

/// Logs the outcome of one service call and passes the result through.
///
/// Storage failures log at `warn`. Validation and not-found outcomes are
/// caller errors and log at `info` without the error text.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    started_at: Instant,
    target: &str,
    result: RepoResult<T>,
) -> RepoResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!(
            "event={event} module=service status=ok {target} duration_ms={duration_ms}"
        ),
        Err(err) => {
            let kind = format!("{:?}", err.kind()).to_ascii_lowercase();
            if err.kind() == ErrorKind::Storage {
                warn!(
                    "event={event} module=service status=error {target} duration_ms={duration_ms} error_kind={kind} error={err}"
                );
            } else {
                info!(
                    "event={event} module=service status=rejected {target} duration_ms={duration_ms} error_kind={kind}"
                );
            }
        }
    }
    result
}
