//! Long-running background tasks.
//!
//! Each submodule exposes a `run` function meant for `tokio::spawn` that
//! stops when its [`CancellationToken`](tokio_util::sync::CancellationToken)
//! is cancelled.

pub mod reminder_scheduler;
pub mod session_cleanup;
