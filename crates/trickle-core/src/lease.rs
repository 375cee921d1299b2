//! Connection accounting
//!
//! Every opened connection holds a [`ConnectionLease`] taken from the
//! connector's [`ConnectionGauge`]. Dropping the lease marks the connection
//! released, so tests and callers can observe that abandoned streams do not
//! leak connections.

use crate::observe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared count of currently open connections
#[derive(Debug, Clone, Default)]
pub struct ConnectionGauge {
    open: Arc<AtomicUsize>,
}

impl ConnectionGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly opened connection
    pub fn acquire(&self) -> ConnectionLease {
        let open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        observe::record_connection_opened();
        tracing::trace!(open, "connection acquired");
        ConnectionLease {
            open: Arc::clone(&self.open),
        }
    }

    /// Number of connections not yet released
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

/// Proof of one open connection; released on drop
#[derive(Debug)]
pub struct ConnectionLease {
    open: Arc<AtomicUsize>,
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        let open = self.open.fetch_sub(1, Ordering::SeqCst) - 1;
        observe::record_connection_released();
        tracing::trace!(open, "connection released");
    }
}
