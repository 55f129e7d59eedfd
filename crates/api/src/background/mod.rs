//! Periodic jobs spawned from `main`.
//!
//! Each job is a `run` function that loops on a `tokio::time::interval`
//! until its [`CancellationToken`](tokio_util::sync::CancellationToken) fires.

pub mod media_reconciliation;
pub mod session_cleanup;
