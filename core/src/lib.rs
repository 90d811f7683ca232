//! Client core for the store admin: products and customers over REST.
//!
//! # Overview
//! `ApiClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. A `Transport` performs the round-trip,
//! services combine the two per entity, and stores keep the current page,
//! loading flag and last error for the views.
//!
//! # Design
//! - `ApiClient` is stateless: it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the response normalization is testable alone.
//! - Products and customers differ only in path and response keys; both are
//!   captured by the `Resource` trait and the rest is generic.
//! - `AdminSession` owns both stores; there is no global state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod routes;
pub mod service;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routes::{resolve, Route, RouteMatch, View, ROUTES};
pub use service::{CustomerService, ProductService, Service};
pub use session::AdminSession;
pub use store::{CustomerStore, EntityStore, ProductStore, StoreState};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    ApiResponse, Customer, EntityId, ListQuery, NewCustomer, NewProduct, PaginatedResult, Product,
    Resource, Timestamps,
};
