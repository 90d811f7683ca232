//! Per-entity CRUD services.
//!
//! A service pairs the shared `ApiClient` with a `Transport`: it builds the
//! request, executes it and parses the normalized response. Transport errors
//! propagate unchanged.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Customer, EntityId, ListQuery, PaginatedResult, Product, Resource};

pub type ProductService<T> = Service<Product, T>;
pub type CustomerService<T> = Service<Customer, T>;

pub struct Service<R, T> {
    client: ApiClient,
    transport: Arc<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T> Clone for Service<R, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
            _resource: PhantomData,
        }
    }
}

impl<R, T> fmt::Debug for Service<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl<R: Resource, T: Transport> Service<R, T> {
    pub fn new(client: ApiClient, transport: Arc<T>) -> Self {
        Self {
            client,
            transport,
            _resource: PhantomData,
        }
    }

    #[instrument(skip(self), fields(entity = R::PLURAL))]
    pub async fn list(&self, query: &ListQuery) -> Result<PaginatedResult<R>, ApiError> {
        let request = self.client.build_list::<R>(query);
        let response = self.transport.execute(request).await?;
        let page = self.client.parse_list::<R>(response)?;
        debug!(records = page.data.len(), total = page.total, "listed");
        Ok(page)
    }

    #[instrument(skip(self, id), fields(entity = R::SINGULAR, %id))]
    pub async fn get_by_id(&self, id: &EntityId) -> Result<R, ApiError> {
        let request = self.client.build_get::<R>(id);
        let response = self.transport.execute(request).await?;
        self.client.parse_record(response)
    }

    #[instrument(skip(self, draft), fields(entity = R::SINGULAR))]
    pub async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let request = self.client.build_create::<R>(draft)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_record(response)
    }

    #[instrument(skip(self, id, record), fields(entity = R::SINGULAR, %id))]
    pub async fn update(&self, id: &EntityId, record: &R) -> Result<R, ApiError> {
        let request = self.client.build_update(id, record)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_record(response)
    }

    #[instrument(skip(self, id), fields(entity = R::SINGULAR, %id))]
    pub async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        let request = self.client.build_delete::<R>(id);
        let response = self.transport.execute(request).await?;
        self.client.parse_delete(response)
    }
}
