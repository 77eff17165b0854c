//! The in-memory user collection.
//!
//! # Design
//! `UserStore` is the only write handle and is owned by the dashboard.
//! Everything else reads through a cloneable `StoreView`. Locks are held for
//! the duration of a single mutation and never across an `.await`.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::warn;

use crate::types::{User, UserId};

/// Whether the remote resource knows about a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Created locally; the identifier is temporary.
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub user: User,
    pub state: SyncState,
}

impl Record {
    pub fn confirmed(user: User) -> Self {
        Self {
            user,
            state: SyncState::Confirmed,
        }
    }

    pub fn pending(user: User) -> Self {
        Self {
            user,
            state: SyncState::Pending,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.user.id
    }

    pub fn is_pending(&self) -> bool {
        self.state == SyncState::Pending
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user {0} is already in the list")]
    DuplicateId(UserId),

    #[error("user {0} is not in the list")]
    Missing(UserId),
}

type Records = Arc<RwLock<Vec<Record>>>;

/// Write handle over the collection.
#[derive(Debug, Default)]
pub struct UserStore {
    records: Records,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> StoreView {
        StoreView {
            records: Arc::clone(&self.records),
        }
    }

    /// Replace the whole collection with server records, in server order.
    pub fn replace_all(&self, users: Vec<User>) {
        let records: Vec<Record> = users.into_iter().map(Record::confirmed).collect();
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|r| r.id() == record.id()) {
                warn!(user_id = %record.id(), "Server returned a duplicate user id");
            }
        }
        *self.records.write() = records;
    }

    pub fn push_pending(&self, user: User) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.user.id == user.id) {
            return Err(StoreError::DuplicateId(user.id));
        }
        records.push(Record::pending(user));
        Ok(())
    }

    /// Swap the pending record `temp_id` for the server-confirmed `user`,
    /// keeping its position.
    pub fn confirm(&self, temp_id: &UserId, user: User) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records
            .iter()
            .any(|r| r.user.id == user.id && r.user.id != *temp_id)
        {
            return Err(StoreError::DuplicateId(user.id));
        }
        let slot = records
            .iter_mut()
            .find(|r| r.user.id == *temp_id)
            .ok_or_else(|| StoreError::Missing(temp_id.clone()))?;
        *slot = Record::confirmed(user);
        Ok(())
    }

    /// Replace the user with `id` in place, keeping its sync state.
    pub fn replace(&self, id: &UserId, user: User) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let slot = records
            .iter_mut()
            .find(|r| r.user.id == *id)
            .ok_or_else(|| StoreError::Missing(id.clone()))?;
        slot.user = user;
        Ok(())
    }

    pub fn remove(&self, id: &UserId) -> Option<Record> {
        let mut records = self.records.write();
        let pos = records.iter().position(|r| r.user.id == *id)?;
        Some(records.remove(pos))
    }
}

/// Read-only handle over the collection.
#[derive(Debug, Clone)]
pub struct StoreView {
    records: Records,
}

impl StoreView {
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.records.read().iter().map(|r| r.user.clone()).collect()
    }

    pub fn get(&self, id: &UserId) -> Option<Record> {
        self.records.read().iter().find(|r| r.user.id == *id).cloned()
    }

    /// Lookup by the textual form of an identifier, as found in a route.
    pub fn find_raw(&self, raw: &str) -> Option<Record> {
        self.records.read().iter().find(|r| r.user.id.matches(raw)).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
