//! Per-entity state containers.
//!
//! # Design
//! An `EntityStore` owns the current page of records plus `loading` / `error`
//! flags and exposes the actions that mutate them. State lives behind a
//! `tokio::sync::RwLock`; the lock is taken briefly before and after the
//! network call and never held across it, so readers observe `loading` while
//! a request is in flight. Concurrent actions on one store are not queued:
//! whichever finishes last decides the final flags.
//!
//! `list` records failures in state and returns nothing. `create`,
//! `get_by_id`, `update` and `delete` record the failure and also return it,
//! so a caller can react immediately (e.g. stay on a form after a failed
//! create).

use tokio::sync::RwLock;
use tracing::{error, instrument};

use crate::error::ApiError;
use crate::service::Service;
use crate::transport::Transport;
use crate::types::{Customer, EntityId, ListQuery, Product, Resource};

pub type ProductStore<T> = EntityStore<Product, T>;
pub type CustomerStore<T> = EntityStore<Customer, T>;

/// Snapshot of one store's state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<R> {
    pub records: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub search_query: String,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            total_pages: 1,
            total: 0,
            search_query: String::new(),
        }
    }
}

impl<R> StoreState<R> {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug)]
pub struct EntityStore<R, T> {
    service: Service<R, T>,
    state: RwLock<StoreState<R>>,
}

impl<R: Resource, T: Transport> EntityStore<R, T> {
    pub fn new(service: Service<R, T>) -> Self {
        Self {
            service,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn service(&self) -> &Service<R, T> {
        &self.service
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> StoreState<R> {
        self.state.read().await.clone()
    }

    /// Read a projection of the state without cloning the records.
    pub async fn read<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&StoreState<R>) -> O,
    {
        f(&*self.state.read().await)
    }

    pub async fn is_loading(&self) -> bool {
        self.read(StoreState::is_loading).await
    }

    pub async fn has_error(&self) -> bool {
        self.read(StoreState::has_error).await
    }

    pub async fn is_empty(&self) -> bool {
        self.read(StoreState::is_empty).await
    }

    pub async fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone()).await
    }

    /// Load one page. Failures land in `error`; records are left untouched.
    #[instrument(skip(self), fields(entity = R::PLURAL))]
    pub async fn list(&self, query: ListQuery) {
        self.begin().await;
        let result = self.service.list(&query).await;

        let mut state = self.state.write().await;
        match result {
            Ok(page) => {
                state.records = page.data;
                state.current_page = page.page;
                state.total_pages = page.total_pages;
                state.total = page.total;
                state.search_query = query.search;
            }
            Err(err) => {
                error!(error = %err, "failed to list {}", R::PLURAL);
                state.error = Some(err.message_or(&format!("failed to load {}", R::PLURAL)));
            }
        }
        state.loading = false;
    }

    /// Create a record and insert it at the front of the current page.
    ///
    /// The page is not re-fetched, so its order may differ from what the
    /// server would return next time.
    #[instrument(skip(self, draft), fields(entity = R::SINGULAR))]
    pub async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        self.begin().await;
        let result = self.service.create(draft).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(record) => {
                state.records.insert(0, record.clone());
                state.total += 1;
                Ok(record)
            }
            Err(err) => {
                error!(error = %err, "failed to create {}", R::SINGULAR);
                state.error = Some(err.message_or(&format!("failed to create {}", R::SINGULAR)));
                Err(err)
            }
        }
    }

    /// Fetch one record. The current page is not modified.
    #[instrument(skip(self, id), fields(entity = R::SINGULAR, %id))]
    pub async fn get_by_id(&self, id: &EntityId) -> Result<R, ApiError> {
        self.begin().await;
        let result = self.service.get_by_id(id).await;
        self.settle(result, "fetch").await
    }

    /// Replace a record; the copy in the current page is swapped in place.
    #[instrument(skip(self, id, record), fields(entity = R::SINGULAR, %id))]
    pub async fn update(&self, id: &EntityId, record: &R) -> Result<R, ApiError> {
        self.begin().await;
        let result = self.service.update(id, record).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(updated) => {
                if let Some(slot) = state
                    .records
                    .iter_mut()
                    .find(|r| r.id().is_some_and(|rid| rid.matches(id)))
                {
                    *slot = updated.clone();
                }
                Ok(updated)
            }
            Err(err) => {
                error!(error = %err, "failed to update {}", R::SINGULAR);
                state.error = Some(err.message_or(&format!("failed to update {}", R::SINGULAR)));
                Err(err)
            }
        }
    }

    /// Delete a record, drop it from the current page and decrement `total`.
    #[instrument(skip(self, id), fields(entity = R::SINGULAR, %id))]
    pub async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.begin().await;
        let result = self.service.delete(id).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(()) => {
                state.records.retain(|r| !r.id().is_some_and(|rid| rid.matches(id)));
                state.total = state.total.saturating_sub(1);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to delete {}", R::SINGULAR);
                state.error = Some(err.message_or(&format!("failed to delete {}", R::SINGULAR)));
                Err(err)
            }
        }
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
    }

    async fn settle<O>(&self, result: Result<O, ApiError>, action: &str) -> Result<O, ApiError> {
        let mut state = self.state.write().await;
        state.loading = false;
        result.inspect_err(|err| {
            error!(error = %err, "failed to {action} {}", R::SINGULAR);
            state.error = Some(err.message_or(&format!("failed to {action} {}", R::SINGULAR)));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_settled_and_empty() {
        let state = StoreState::<Product>::default();
        assert!(!state.is_loading());
        assert!(!state.has_error());
        assert!(state.is_empty());
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.total, 0);
        assert!(state.search_query.is_empty());
    }

    #[test]
    fn error_flag_follows_message() {
        let state = StoreState::<Customer> {
            error: Some("HTTP 500: boom".to_string()),
            ..StoreState::default()
        };
        assert!(state.has_error());
    }
}
