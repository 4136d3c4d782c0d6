//! Replace-only store of the current image list.
//!
//! The store is rebuilt from every successful list fetch; nothing edits a
//! stored record in place. Each fetch takes a [`FetchTicket`] before it is
//! dispatched, and a response is only installed when its ticket is newer than
//! the one that produced the current contents. An earlier-issued fetch that
//! completes late can therefore never overwrite a newer list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::model::ImageRecord;

/// Sequence token handed out to each list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Position of this fetch in issue order (starts at 1).
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Contents {
    /// Ticket that produced `records`; 0 before the first install.
    installed: u64,
    records: Arc<Vec<ImageRecord>>,
}

/// Client-held list of records.
#[derive(Debug, Default)]
pub struct GalleryStore {
    issued: AtomicU64,
    contents: RwLock<Contents>,
}

impl GalleryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a list fetch about to be dispatched.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a newer fetch has already been installed.
    pub fn is_stale(&self, ticket: FetchTicket) -> bool {
        ticket.0 <= self.contents.read().installed
    }

    /// Replace the contents with the result of the fetch behind `ticket`.
    ///
    /// Returns `false` and leaves the store untouched when the ticket is stale.
    pub fn install(&self, ticket: FetchTicket, records: Vec<ImageRecord>) -> bool {
        let mut contents = self.contents.write();
        if ticket.0 <= contents.installed {
            debug!(
                ticket = ticket.0,
                installed = contents.installed,
                "Discarding stale image list"
            );
            return false;
        }
        contents.installed = ticket.0;
        contents.records = Arc::new(records);
        true
    }

    /// Current list, shared with the store.
    pub fn snapshot(&self) -> Arc<Vec<ImageRecord>> {
        Arc::clone(&self.contents.read().records)
    }

    /// Look up a record by id.
    pub fn find(&self, id: &str) -> Option<ImageRecord> {
        self.contents
            .read()
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.contents.read().records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
