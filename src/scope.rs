//! View-lifetime cancellation.
//!
//! Each view owns a [`ViewScope`]. Work started through it (requests, the
//! post-submit redirect timer) is aborted when the scope is cancelled, which
//! the view does on disposal. Aborted work never delivers its result.

use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct ScopeState {
    cancelled: bool,
    handles: Vec<AbortHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    state: Arc<Mutex<ScopeState>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScopeState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `fut` until it completes or the scope is cancelled. `None` means
    /// the result was discarded.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let (handle, registration) = AbortHandle::new_pair();
        {
            let mut state = self.lock();
            if state.cancelled {
                return None;
            }
            state.handles.retain(|h| !h.is_aborted());
            state.handles.push(handle);
        }
        Abortable::new(fut, registration).await.ok()
    }

    /// Aborts everything in flight and refuses new work.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled = true;
        for handle in state.handles.drain(..) {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completed_work_delivers() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_in_flight_work() {
        let scope = ViewScope::new();
        let worker = {
            let scope = scope.clone();
            tokio::spawn(async move {
                scope
                    .run(async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        "redirect"
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        scope.cancel();
        assert_eq!(worker.await.unwrap(), None);
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_scope_refuses_new_work() {
        let scope = ViewScope::new();
        scope.cancel();
        assert_eq!(scope.run(async { 1 }).await, None);
    }
}
