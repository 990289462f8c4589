//! Generic CRUD service over one collection
//!
//! The five domain services wrap a `CrudService` and add their own
//! operations on top. Everything here follows the shared call contract of
//! [`ServiceContext`].

use crate::error::{Action, ServiceError};
use crate::latency::Endpoint;
use crate::services::{check_identity, log_failure, Deleted, ServiceContext};
use crate::store::Collection;
use bizplan_model::{ModelError, Patch, Record};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// CRUD operations over a shared collection
#[derive(Debug)]
pub struct CrudService<R: Record> {
    store: Arc<Collection<R>>,
    ctx: ServiceContext,
    name: &'static str,
}

impl<R: Record> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ctx: self.ctx,
            name: self.name,
        }
    }
}

impl<R: Record> CrudService<R> {
    /// Create service owning `records`
    #[must_use]
    pub fn new(name: &'static str, records: Vec<R>, ctx: ServiceContext) -> Self {
        Self {
            store: Arc::new(Collection::new(records)),
            ctx,
            name,
        }
    }

    /// Service name used in logs
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Shared context
    #[inline]
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Underlying collection
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<Collection<R>> {
        &self.store
    }

    /// Reject identities that can never exist
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` for id 0.
    pub fn check_id(&self, operation: &'static str, id: R::Id) -> Result<(), ServiceError> {
        check_identity(self.name, operation, R::KIND, id)
    }

    /// Reject a malformed patch before it reaches the collection
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` carrying the patch's own message.
    pub fn check_input(
        &self,
        operation: &'static str,
        check: Result<(), ModelError>,
    ) -> Result<(), ServiceError> {
        check.map_err(|err| {
            let err = ServiceError::from(err);
            log_failure(self.name, operation, &err);
            err
        })
    }

    /// Run a read or write against the collection under the call contract
    pub(crate) async fn run<T, F, Fut>(
        &self,
        operation: &'static str,
        action: Action,
        endpoint: Endpoint,
        op: F,
    ) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: Fn(Arc<Collection<R>>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<T, ServiceError>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let latency = self.ctx.latency;
        let op = Arc::new(op);
        self.ctx
            .call(self.name, operation, R::KIND, action, move || {
                let store = Arc::clone(&store);
                let op = Arc::clone(&op);
                async move {
                    latency.pause(endpoint).await;
                    (*op)(store).await
                }
            })
            .await
    }

    /// Every record, in insertion order
    ///
    /// # Errors
    /// Returns `ServiceError::EmptyCollection` when there are no records.
    pub async fn get_all(&self) -> Result<Vec<R>, ServiceError> {
        self.run("get_all", Action::LoadAll, Endpoint::LoadAll, |store| async move {
            let all = store.all().await;
            if all.is_empty() {
                return Err(ServiceError::EmptyCollection { kind: R::KIND });
            }
            Ok(all)
        })
        .await
    }

    /// Record with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn get_by_id(&self, id: R::Id) -> Result<R, ServiceError> {
        let operation = "get_by_id";
        self.check_id(operation, id)?;
        self.run(operation, Action::Load, Endpoint::Load, move |store| async move {
            store
                .get(id)
                .await
                .ok_or_else(|| ServiceError::not_found(R::KIND, id))
        })
        .await
    }

    /// Records matching `predicate`
    ///
    /// # Errors
    /// Only policy failures (timeout, task failure).
    pub async fn query<P>(&self, predicate: P) -> Result<Vec<R>, ServiceError>
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.run("query", Action::LoadAll, Endpoint::Query, move |store| {
            let predicate = Arc::clone(&predicate);
            async move { Ok(store.filter(|r| (*predicate)(r)).await) }
        })
        .await
    }

    /// Append a record built by `build` with the next free identity
    ///
    /// # Errors
    /// `Validation` when the id space is used up.
    pub async fn create_with<B>(&self, build: B) -> Result<R, ServiceError>
    where
        B: Fn(R::Id, DateTime<Utc>) -> R + Send + Sync + 'static,
    {
        let build = Arc::new(build);
        self.run("create", Action::Create, Endpoint::Create, move |store| {
            let build = Arc::clone(&build);
            async move { store.insert_with(|id, now| (*build)(id, now)).await }
        })
        .await
    }

    /// Append a record built by `build` unless one already matches
    /// `conflict`
    ///
    /// The check and the insert share one write lock.
    ///
    /// # Errors
    /// `Validation` carrying `duplicate` when a record matches, or when the
    /// id space is used up.
    pub async fn create_unique_with<P, B>(
        &self,
        conflict: P,
        duplicate: String,
        build: B,
    ) -> Result<R, ServiceError>
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
        B: Fn(R::Id, DateTime<Utc>) -> R + Send + Sync + 'static,
    {
        let conflict = Arc::new(conflict);
        let build = Arc::new(build);
        self.run("create", Action::Create, Endpoint::Create, move |store| {
            let conflict = Arc::clone(&conflict);
            let build = Arc::clone(&build);
            let duplicate = duplicate.clone();
            async move {
                let (record, created) = store
                    .find_or_insert_with(|r| (*conflict)(r), |id, now| (*build)(id, now))
                    .await?;
                if created {
                    Ok(record)
                } else {
                    Err(ServiceError::Validation(duplicate))
                }
            }
        })
        .await
    }

    /// Shallow-merge `patch` into the record with `id`
    ///
    /// # Errors
    /// `Validation` for id 0 or a patch that fails its own check;
    /// `NotFound` when absent.
    pub async fn update<P>(&self, id: R::Id, patch: P) -> Result<R, ServiceError>
    where
        P: Patch<R> + Clone + Sync,
    {
        let operation = "update";
        self.check_id(operation, id)?;
        self.check_input(operation, patch.validate())?;
        self.run(operation, Action::Update, Endpoint::Update, move |store| {
            let patch = patch.clone();
            async move { store.update(id, patch).await }
        })
        .await
    }

    /// Edit the record with `id` in place
    ///
    /// # Errors
    /// `Validation` for id 0 or a failing edit; `NotFound` when absent.
    pub async fn modify<E>(
        &self,
        operation: &'static str,
        id: R::Id,
        edit: E,
    ) -> Result<R, ServiceError>
    where
        E: Fn(&mut R) -> Result<(), ModelError> + Send + Sync + 'static,
    {
        self.check_id(operation, id)?;
        let edit = Arc::new(edit);
        self.run(operation, Action::Update, Endpoint::Update, move |store| {
            let edit = Arc::clone(&edit);
            async move { store.modify(id, |record| (*edit)(record)).await }
        })
        .await
    }

    /// Remove the record with `id`
    ///
    /// # Errors
    /// `Validation` for id 0, `NotFound` when absent.
    pub async fn delete(&self, id: R::Id) -> Result<Deleted<R>, ServiceError> {
        let operation = "delete";
        self.check_id(operation, id)?;
        self.run(operation, Action::Delete, Endpoint::Delete, move |store| async move {
            let deleted = store
                .remove(id)
                .await
                .ok_or_else(|| ServiceError::not_found(R::KIND, id))?;
            Ok(Deleted {
                message: format!("{} deleted successfully", R::KIND),
                deleted,
            })
        })
        .await
    }
}
