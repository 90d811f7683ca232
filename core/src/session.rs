//! Composition root for one admin session.
//!
//! Owns the products and customers stores. Both share one `ApiClient` and one
//! transport; each store exclusively owns its own state. Hosts create a
//! session at startup and hand out references to it.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::service::Service;
use crate::store::{CustomerStore, EntityStore, ProductStore};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug)]
pub struct AdminSession<T> {
    pub products: ProductStore<T>,
    pub customers: CustomerStore<T>,
}

impl<T: Transport> AdminSession<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        let client = ApiClient::new(&config.base_url);
        let transport = Arc::new(transport);
        Self {
            products: EntityStore::new(Service::new(client.clone(), Arc::clone(&transport))),
            customers: EntityStore::new(Service::new(client, transport)),
        }
    }
}

impl AdminSession<ReqwestTransport> {
    /// Session over HTTP using `reqwest`.
    pub fn connect(config: &ClientConfig) -> Self {
        Self::new(config, ReqwestTransport::new())
    }
}

impl Default for AdminSession<ReqwestTransport> {
    fn default() -> Self {
        Self::connect(&ClientConfig::default())
    }
}
