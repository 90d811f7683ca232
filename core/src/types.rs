//! Domain DTOs for the store admin API.
//!
//! # Design
//! Field names are English in Rust and renamed to the API's Portuguese wire
//! names through serde. The backend is inconsistent about timestamps, so every
//! known spelling is accepted and preserved in `Timestamps`. Identifiers may be
//! numeric or textual depending on the collection.
//!
//! The `Resource` trait carries everything that differs between products and
//! customers at the HTTP boundary (endpoint path, accepted response keys), so
//! services and stores are written once and instantiated per entity.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Record identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Ids compare by their rendered form, so `1` and `"1"` name the same
    /// record.
    pub fn matches(&self, other: &EntityId) -> bool {
        match (self, other) {
            (EntityId::Number(a), EntityId::Number(b)) => a == b,
            (EntityId::Text(a), EntityId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

/// Creation/update timestamps under every spelling the backend has used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(rename = "data_criacao", default, skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Timestamps {
    /// First creation timestamp present, preferring `createdAt`.
    pub fn created_at(&self) -> Option<&str> {
        self.created_at
            .as_deref()
            .or(self.created.as_deref())
            .or(self.data_criacao.as_deref())
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

/// A product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "estoque", default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Request payload for creating a product: no identifier, no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "estoque", default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category: None,
            stock: None,
        }
    }
}

/// A customer as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Request payload for creating a customer: no identifier, no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
        }
    }
}

/// One page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Generic `{success, data, message, error}` envelope some endpoints use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Page/limit/search parameters for a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

impl ListQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Page and limit are raised to at least 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// An entity type exposed by the API.
pub trait Resource: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Payload sent on create.
    type Draft: Serialize + fmt::Debug + Send + Sync;

    /// Collection path under the base URL, without slashes.
    const PATH: &'static str;
    /// Plural label for log lines and fallback error messages.
    const PLURAL: &'static str;
    const SINGULAR: &'static str;
    /// Keys a list payload may nest its records under, in lookup order.
    const LIST_KEYS: &'static [&'static str];
    /// Keys a single-record payload may nest the record under, in lookup order.
    const RECORD_KEYS: &'static [&'static str];

    fn id(&self) -> Option<&EntityId>;
}

impl Resource for Product {
    type Draft = NewProduct;

    const PATH: &'static str = "produtos";
    const PLURAL: &'static str = "products";
    const SINGULAR: &'static str = "product";
    const LIST_KEYS: &'static [&'static str] = &["products", "produtos"];
    const RECORD_KEYS: &'static [&'static str] = &["product", "produto"];

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

impl Resource for Customer {
    type Draft = NewCustomer;

    const PATH: &'static str = "clientes";
    const PLURAL: &'static str = "customers";
    const SINGULAR: &'static str = "customer";
    const LIST_KEYS: &'static [&'static str] = &["clients", "clientes"];
    const RECORD_KEYS: &'static [&'static str] = &["client", "cliente"];

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}
