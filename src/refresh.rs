use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn number(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The container now shows this many stages.
    Rendered(usize),
    /// A newer refresh was requested; this one left the view alone.
    Superseded,
}

/// Serialises list+render cycles so that the newest request renders last.
///
/// Refreshes run one at a time in request order. A refresh that is no longer
/// the newest when its turn comes skips the fetch, and one that is overtaken
/// while its fetch is in flight skips the render. At most one refresh is
/// therefore pending behind the running one in any useful sense.
#[derive(Debug, Default)]
pub struct RefreshQueue {
    requested: AtomicU64,
    turn: Mutex<()>,
}

impl RefreshQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> RefreshTicket {
        RefreshTicket(self.requested.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Waits until every earlier refresh has finished.
    pub async fn turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    pub fn is_latest(&self, ticket: RefreshTicket) -> bool {
        self.requested.load(Ordering::SeqCst) == ticket.0
    }

    pub fn requested(&self) -> u64 {
        self.requested.load(Ordering::SeqCst)
    }
}
