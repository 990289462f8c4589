//! In-memory record collection
//!
//! Provides the storage every service is built on:
//! - Ordered records (insertion order is preserved)
//! - Sequential identity allocation (max existing id + 1)
//! - Shallow patching with the identity and owner pinned
//! - Atomic find-or-insert for lazily created records
//!
//! Every read returns owned clones; the only way to change stored state is
//! through the mutating methods, each of which runs inside one write-lock
//! critical section.

use crate::error::ServiceError;
use bizplan_model::{Identity, ModelError, Patch, Record};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Ordered in-memory collection of records
#[derive(Debug)]
pub struct Collection<R: Record> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Record> Collection<R> {
    /// Create collection holding `records`
    #[inline]
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the collection is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Copy of every record, in insertion order
    pub async fn all(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    /// Copy of the record with `id`
    pub async fn get(&self, id: R::Id) -> Option<R> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Copy of the first record matching `predicate`
    pub async fn find<P>(&self, predicate: P) -> Option<R>
    where
        P: Fn(&R) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .find(|r| predicate(r))
            .cloned()
    }

    /// Copies of all records matching `predicate`
    pub async fn filter<P>(&self, predicate: P) -> Vec<R>
    where
        P: Fn(&R) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Append a record built with the next free identity
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` when the id space is used up.
    pub async fn insert_with<B>(&self, build: B) -> Result<R, ServiceError>
    where
        B: FnOnce(R::Id, DateTime<Utc>) -> R,
    {
        let mut records = self.records.write().await;
        let id = next_id(&records)?;
        let mut record = build(id, Utc::now());
        // The builder cannot pick its own identity
        record.set_id(id);
        records.push(record.clone());
        Ok(record)
    }

    /// Merge `patch` into the record with `id`
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` when no record has `id`.
    pub async fn update<P>(&self, id: R::Id, patch: P) -> Result<R, ServiceError>
    where
        P: Patch<R>,
    {
        self.modify(id, |record| {
            patch.apply(record);
            Ok(())
        })
        .await
    }

    /// Edit the record with `id` in place
    ///
    /// The identity and pinned fields are restored and the record touched
    /// after `edit` returns.
    /// When `edit` fails the record is left untouched.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` when no record has `id`, or the
    /// edit's own error as `ServiceError::Validation`.
    pub async fn modify<E>(&self, id: R::Id, edit: E) -> Result<R, ServiceError>
    where
        E: FnOnce(&mut R) -> Result<(), ModelError>,
    {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| ServiceError::not_found(R::KIND, id))?;

        let mut edited = slot.clone();
        edit(&mut edited)?;
        edited.set_id(id);
        edited.pin(&*slot);
        edited.touch(Utc::now());
        *slot = edited.clone();
        Ok(edited)
    }

    /// Remove the record with `id`
    pub async fn remove(&self, id: R::Id) -> Option<R> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.id() == id)?;
        Some(records.remove(index))
    }

    /// Copy of the first record matching `predicate`, inserting one built by
    /// `build` when none matches
    ///
    /// Lookup and insert happen under one write lock, so concurrent callers
    /// never insert twice. Returns the record and whether it was created.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` when an insert is needed and the id
    /// space is used up.
    pub async fn find_or_insert_with<P, B>(
        &self,
        predicate: P,
        build: B,
    ) -> Result<(R, bool), ServiceError>
    where
        P: Fn(&R) -> bool,
        B: FnOnce(R::Id, DateTime<Utc>) -> R,
    {
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter().find(|r| predicate(r)) {
            return Ok((existing.clone(), false));
        }
        let id = next_id(&records)?;
        let mut record = build(id, Utc::now());
        record.set_id(id);
        records.push(record.clone());
        Ok((record, true))
    }
}

/// Next free identity: one past the largest in use, or 1 when empty
///
/// # Errors
/// Returns `ServiceError::Validation` when the largest id in use is
/// `u64::MAX`.
pub fn next_id<R: Record>(records: &[R]) -> Result<R::Id, ServiceError> {
    match records.iter().map(Record::id).max() {
        None => Ok(R::Id::from_raw(1)),
        Some(max) => max.next().ok_or_else(|| {
            ServiceError::Validation(format!("No {} ID left to assign", R::KIND.noun(false)))
        }),
    }
}
