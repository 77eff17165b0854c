//! Per-record guard against overlapping operations.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::UserId;

/// Tracks which records have a create, update or delete outstanding.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    ids: Arc<Mutex<HashSet<UserId>>>,
}

impl InFlight {
    /// Claim `id`. Returns `None` if it is already claimed; the claim is
    /// released when the guard drops.
    pub fn begin(&self, id: &UserId) -> Option<InFlightGuard> {
        if !self.ids.lock().insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            ids: Arc::clone(&self.ids),
            id: id.clone(),
        })
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.ids.lock().contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<UserId>>>,
    id: UserId,
}

impl InFlightGuard {
    pub fn id(&self) -> &UserId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.id);
    }
}
