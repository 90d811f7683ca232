//! Full CRUD lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives both stores over real
//! HTTP through `ReqwestTransport`. The mock server reproduces the backend's
//! inconsistent envelopes, so these tests cover request building, transport
//! and normalization end-to-end.

use admin_core::{
    AdminSession, ApiError, ClientConfig, EntityId, ListQuery, NewCustomer, NewProduct,
};

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}/api")
}

#[tokio::test]
async fn product_lifecycle() {
    let base_url = spawn_server().await;
    let session = AdminSession::connect(&ClientConfig::new(base_url));
    let products = &session.products;

    // Step 1: list: should be empty with default pagination.
    products.list(ListQuery::default()).await;
    let state = products.snapshot().await;
    assert!(!state.has_error(), "unexpected error: {:?}", state.error);
    assert!(state.is_empty());
    assert_eq!(state.total, 0);
    assert_eq!(state.total_pages, 1);

    // Step 2: create: prepended locally.
    let mut draft = NewProduct::new("Caneca", 9.99);
    draft.stock = Some(3);
    let created = products.create(&draft).await.unwrap();
    let id = created.id.clone().expect("server assigns an id");
    assert!(matches!(id, EntityId::Number(_)));
    assert!(created.timestamps.created_at().is_some());
    let state = products.snapshot().await;
    assert_eq!(state.records[0], created);
    assert_eq!(state.total, 1);

    // Step 3: get by id.
    let fetched = products.get_by_id(&id).await.unwrap();
    assert_eq!(fetched.name, "Caneca");
    assert_eq!(fetched.stock, Some(3));

    // Step 4: update: response arrives wrapped in a data envelope.
    let mut edited = fetched.clone();
    edited.name = "Caneca grande".to_string();
    edited.price = 12.5;
    let updated = products.update(&id, &edited).await.unwrap();
    assert_eq!(updated.name, "Caneca grande");
    assert_eq!(products.read(|s| s.records[0].name.clone()).await, "Caneca grande");

    // Step 5: list again: server agrees.
    products.list(ListQuery::default()).await;
    let state = products.snapshot().await;
    assert_eq!(state.records.len(), 1);
    assert_eq!(state.records[0].price, 12.5);

    // Step 6: delete.
    products.delete(&id).await.unwrap();
    assert!(products.is_empty().await);
    assert_eq!(products.read(|s| s.total).await, 0);

    // Step 7: get after delete: NotFound recorded in state.
    let err = products.get_by_id(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert!(products.has_error().await);
    products.clear_error().await;
    assert!(!products.has_error().await);
}

#[tokio::test]
async fn customer_lifecycle() {
    let base_url = spawn_server().await;
    let session = AdminSession::connect(&ClientConfig::new(base_url));
    let customers = &session.customers;

    let mut draft = NewCustomer::new("Ana", "ana@example.com");
    draft.phone = Some("11 9999-0000".to_string());
    let created = customers.create(&draft).await.unwrap();
    let id = created.id.clone().expect("server assigns an id");
    assert!(matches!(id, EntityId::Text(_)));

    // Customer lists come back under the localized key.
    customers.list(ListQuery::default()).await;
    let state = customers.snapshot().await;
    assert_eq!(state.records.len(), 1);
    assert_eq!(state.records[0].email, "ana@example.com");

    // Single customers come back bare.
    let fetched = customers.get_by_id(&id).await.unwrap();
    assert_eq!(fetched.phone.as_deref(), Some("11 9999-0000"));

    let mut edited = fetched;
    edited.address = Some("Rua A, 10".to_string());
    let updated = customers.update(&id, &edited).await.unwrap();
    assert_eq!(updated.address.as_deref(), Some("Rua A, 10"));

    customers.delete(&id).await.unwrap();
    customers.list(ListQuery::default()).await;
    assert!(customers.is_empty().await);
}

#[tokio::test]
async fn pagination_and_search() {
    let base_url = spawn_server().await;
    let session = AdminSession::connect(&ClientConfig::new(base_url));
    let products = &session.products;

    for name in ["Caneca azul", "Prato", "Caneca verde", "Caneca rosa", "Copo"] {
        products.create(&NewProduct::new(name, 10.0)).await.unwrap();
    }

    products.list(ListQuery::new(2, 2)).await;
    let state = products.snapshot().await;
    assert_eq!(state.records.len(), 2);
    assert_eq!(state.current_page, 2);
    assert_eq!(state.total, 5);
    assert_eq!(state.total_pages, 3);

    products.list(ListQuery::new(1, 10).with_search("caneca")).await;
    let state = products.snapshot().await;
    assert_eq!(state.records.len(), 3);
    assert_eq!(state.search_query, "caneca");
    assert!(state.records.iter().all(|p| p.name.starts_with("Caneca")));
}

#[tokio::test]
async fn unreachable_server_is_reported_not_raised_by_list() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = AdminSession::connect(&ClientConfig::new(format!("http://{addr}/api")));

    session.customers.list(ListQuery::default()).await;
    let state = session.customers.snapshot().await;
    assert!(state.has_error());
    assert!(!state.is_loading());

    let err = session
        .customers
        .create(&NewCustomer::new("Ana", "ana@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
