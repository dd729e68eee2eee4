//! Base Orch trait.

use async_trait::async_trait;

/// Base trait for all orchestration agents.
///
/// Each Orch module implements this trait to participate in the daemon
/// event loop. The daemon hands events to the Orch and then calls
/// `do_task()` to process them.
///
/// # Lifecycle
///
/// 1. Construction: Orch is created with its configuration
/// 2. Registration: collaborators are bound through typed callbacks
/// 3. Event Loop: `do_task()` is called when events are pending
/// 4. Shutdown: Orch is dropped once the event source closes
///
/// # Thread Safety
///
/// Orch implementations must be `Send + Sync` so the daemon can own them
/// from a spawned task. Only one task ever drives a given Orch.
#[async_trait]
pub trait Orch: Send + Sync {
    /// Returns the name of this Orch (for logging and debugging).
    fn name(&self) -> &str;

    /// Processes pending tasks from all consumers.
    ///
    /// Implementations should drain pending entries in arrival order and
    /// run each one to completion before looking at the next.
    async fn do_task(&mut self);

    /// Returns true if this Orch has pending work.
    ///
    /// Used by the daemon to determine if `do_task()` should be called.
    fn has_pending_tasks(&self) -> bool {
        false
    }

    /// Dumps pending tasks for debugging.
    ///
    /// Returns a list of human-readable strings describing pending work.
    fn dump_pending_tasks(&self) -> Vec<String> {
        vec![]
    }
}
