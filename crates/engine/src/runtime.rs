//! Async runtime bridge for blocking callers.
//!
//! Step execution is a synchronous contract while the HTTP client is async;
//! this module provides the single entry point for driving a future to
//! completion from the execute path, reusing the current Tokio runtime when
//! one is available.

use std::future::Future;

use anyhow::anyhow;
use tokio::{runtime::Handle, task};

/// Execute an async future from synchronous code.
///
/// Reuses the ambient runtime when called from inside Tokio, otherwise
/// builds a throwaway current-thread runtime.
pub(crate) fn block_on_future<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        task::block_in_place(|| handle.block_on(future))
    } else {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| anyhow!(error))?
            .block_on(future)
    }
}
