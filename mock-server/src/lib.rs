//! In-memory stand-in for the store API.
//!
//! Reproduces the real backend's response shapes, including their
//! inconsistencies: product lists under `products`, customer lists under
//! `clientes`, single products under `product`, single customers bare,
//! created customers under `cliente`, and updates wrapped in a
//! `{success, data: {...}}` envelope. Products get numeric ids, customers get
//! UUIDs.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub preco: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estoque: Option<i64>,
    pub data_criacao: String,
}

#[derive(Debug, Deserialize)]
pub struct ProdutoInput {
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: f64,
    pub categoria: Option<String>,
    pub estoque: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cliente {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ClienteInput {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub search: String,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

#[derive(Debug, Default)]
pub struct Catalog {
    products: BTreeMap<i64, Produto>,
    next_product_id: i64,
    customers: Vec<Cliente>,
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Catalog::default()));
    Router::new()
        .route("/api/produtos", get(list_products).post(create_product))
        .route(
            "/api/produtos/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/clientes", get(list_customers).post(create_customer))
        .route(
            "/api/clientes/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock store API listening");
    }
    axum::serve(listener, app()).await
}

/// Slice one page out of `items`. Page and limit below 1 are treated as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, limit: usize) -> (Vec<T>, Pagination) {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len();
    let pages = total.div_ceil(limit).max(1);
    let data = items
        .iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect();
    (data, Pagination { total, page, limit, pages })
}

fn matches_search(search: &str, fields: &[&str]) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "error": format!("{what} não encontrado")})),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "error": message})),
    )
        .into_response()
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// --- produtos ---

async fn list_products(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<serde_json::Value> {
    let catalog = db.read().await;
    let matching: Vec<Produto> = catalog
        .products
        .values()
        .filter(|p| matches_search(&params.search, &[p.nome.as_str()]))
        .cloned()
        .collect();
    let (products, pagination) = paginate(&matching, params.page, params.limit);
    Json(json!({
        "success": true,
        "data": {"products": products, "pagination": pagination}
    }))
}

async fn create_product(State(db): State<Db>, Json(input): Json<ProdutoInput>) -> Response {
    if input.nome.trim().is_empty() {
        return bad_request("nome é obrigatório");
    }
    let mut catalog = db.write().await;
    catalog.next_product_id += 1;
    let produto = Produto {
        id: catalog.next_product_id,
        nome: input.nome,
        descricao: input.descricao,
        preco: input.preco,
        categoria: input.categoria,
        estoque: input.estoque,
        data_criacao: now(),
    };
    catalog.products.insert(produto.id, produto.clone());
    (StatusCode::CREATED, Json(json!({"product": produto}))).into_response()
}

async fn get_product(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let catalog = db.read().await;
    match catalog.products.get(&id) {
        Some(produto) => Json(json!({"product": produto})).into_response(),
        None => not_found("produto"),
    }
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ProdutoInput>,
) -> Response {
    let mut catalog = db.write().await;
    let Some(produto) = catalog.products.get_mut(&id) else {
        return not_found("produto");
    };
    produto.nome = input.nome;
    produto.descricao = input.descricao;
    produto.preco = input.preco;
    produto.categoria = input.categoria;
    produto.estoque = input.estoque;
    Json(json!({"success": true, "data": {"produto": produto}})).into_response()
}

async fn delete_product(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut catalog = db.write().await;
    match catalog.products.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("produto"),
    }
}

// --- clientes ---

async fn list_customers(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<serde_json::Value> {
    let catalog = db.read().await;
    let matching: Vec<Cliente> = catalog
        .customers
        .iter()
        .filter(|c| matches_search(&params.search, &[c.nome.as_str(), c.email.as_str()]))
        .cloned()
        .collect();
    let (clientes, pagination) = paginate(&matching, params.page, params.limit);
    Json(json!({
        "success": true,
        "data": {"clientes": clientes, "pagination": pagination}
    }))
}

async fn create_customer(State(db): State<Db>, Json(input): Json<ClienteInput>) -> Response {
    if input.nome.trim().is_empty() || input.email.trim().is_empty() {
        return bad_request("nome e email são obrigatórios");
    }
    let timestamp = now();
    let cliente = Cliente {
        id: Uuid::new_v4(),
        nome: input.nome,
        email: input.email,
        telefone: input.telefone,
        endereco: input.endereco,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    db.write().await.customers.push(cliente.clone());
    (StatusCode::CREATED, Json(json!({"cliente": cliente}))).into_response()
}

async fn get_customer(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let catalog = db.read().await;
    match catalog.customers.iter().find(|c| c.id == id) {
        Some(cliente) => Json(cliente.clone()).into_response(),
        None => not_found("cliente"),
    }
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<ClienteInput>,
) -> Response {
    let mut catalog = db.write().await;
    let Some(cliente) = catalog.customers.iter_mut().find(|c| c.id == id) else {
        return not_found("cliente");
    };
    cliente.nome = input.nome;
    cliente.email = input.email;
    cliente.telefone = input.telefone;
    cliente.endereco = input.endereco;
    cliente.updated_at = now();
    Json(json!({"success": true, "data": {"cliente": cliente}})).into_response()
}

async fn delete_customer(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let mut catalog = db.write().await;
    let before = catalog.customers.len();
    catalog.customers.retain(|c| c.id != id);
    if catalog.customers.len() == before {
        return not_found("cliente");
    }
    StatusCode::NO_CONTENT.into_response()
}
