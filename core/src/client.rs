//! Stateless HTTP request builder and response parser for the store API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Methods are generic over `Resource`, so one client serves both products
//! and customers; the entity decides the path and the accepted response keys.

use url::{form_urlencoded, Url};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize;
use crate::types::{EntityId, ListQuery, PaginatedResult, Resource};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the store API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `search` is only sent when non-empty.
    pub fn build_list<R: Resource>(&self, query: &ListQuery) -> HttpRequest {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string());
        if !query.search.is_empty() {
            params.append_pair("search", &query.search);
        }
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?{}", self.collection::<R>(), params.finish()),
            headers: accept_json(),
            body: None,
        }
    }

    pub fn build_get<R: Resource>(&self, id: &EntityId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.member::<R>(id),
            headers: accept_json(),
            body: None,
        }
    }

    pub fn build_create<R: Resource>(&self, draft: &R::Draft) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(draft).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection::<R>(),
            headers: send_json(),
            body: Some(body),
        })
    }

    /// The body is the full record minus its identifier.
    pub fn build_update<R: Resource>(&self, id: &EntityId, record: &R) -> Result<HttpRequest, ApiError> {
        let mut value =
            serde_json::to_value(record).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        if let Some(fields) = value.as_object_mut() {
            fields.remove("id");
        }
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.member::<R>(id),
            headers: send_json(),
            body: Some(value.to_string()),
        })
    }

    pub fn build_delete<R: Resource>(&self, id: &EntityId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.member::<R>(id),
            headers: accept_json(),
            body: None,
        }
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<PaginatedResult<R>, ApiError> {
        check_status(&response)?;
        let body = json_body(&response)?;
        check_envelope(response.status, &body)?;
        normalize::list_page(&body)
    }

    /// Parses the response of a get, create or update call.
    pub fn parse_record<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        let body = json_body(&response)?;
        check_envelope(response.status, &body)?;
        normalize::record(&body)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn collection<R: Resource>(&self) -> String {
        format!("{}/{}", self.base_url, R::PATH)
    }

    /// The id is pushed as a single percent-encoded path segment.
    fn member<R: Resource>(&self, id: &EntityId) -> String {
        let collection = self.collection::<R>();
        let id = id.to_string();
        match Url::parse(&collection) {
            Ok(mut url) if !url.cannot_be_a_base() => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.push(&id);
                }
                url.into()
            }
            _ => {
                let segment: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
                format!("{collection}/{}", segment.replace('+', "%20"))
            }
        }
    }
}

fn accept_json() -> Vec<(String, String)> {
    vec![("accept".to_string(), JSON.to_string())]
}

fn send_json() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), JSON.to_string()),
        ("content-type".to_string(), JSON.to_string()),
    ]
}

fn json_body(response: &HttpResponse) -> Result<serde_json::Value, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
///
/// A `{success: false, error}` body becomes `Rejected` with the server's
/// message; any other body is kept raw in `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let rejection = serde_json::from_str(&response.body)
        .ok()
        .and_then(|body| normalize::rejection(&body));
    Err(match rejection {
        Some(message) => ApiError::Rejected {
            status: response.status,
            message,
        },
        None => ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        },
    })
}

/// A 2xx body can still carry `success: false`.
fn check_envelope(status: u16, body: &serde_json::Value) -> Result<(), ApiError> {
    match normalize::rejection(body) {
        Some(message) => Err(ApiError::Rejected { status, message }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, NewCustomer, NewProduct, Product, Timestamps};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:3000/api")
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_produces_paged_query() {
        let req = client().build_list::<Product>(&ListQuery::new(2, 25));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/produtos?page=2&limit=25");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_includes_search_only_when_present() {
        let req = client().build_list::<Customer>(&ListQuery::default().with_search("ana maria"));
        assert_eq!(
            req.path,
            "http://localhost:3000/api/clientes?page=1&limit=10&search=ana+maria"
        );

        let req = client().build_list::<Customer>(&ListQuery::default());
        assert!(!req.path.contains("search"));
    }

    #[test]
    fn build_get_uses_bare_id() {
        let req = client().build_get::<Product>(&EntityId::from(7));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/produtos/7");
    }

    #[test]
    fn member_path_escapes_reserved_characters() {
        let req = client().build_get::<Customer>(&EntityId::from("a/b?x=1"));
        assert_eq!(req.path, "http://localhost:3000/api/clientes/a%2Fb%3Fx=1");

        let req = client().build_delete::<Customer>(&EntityId::from("ana maria#1"));
        assert_eq!(req.path, "http://localhost:3000/api/clientes/ana%20maria%231");
    }

    #[test]
    fn build_create_sends_json() {
        let draft = NewCustomer::new("Ana", "ana@example.com");
        let req = client().build_create::<Customer>(&draft).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/clientes");
        assert!(req
            .headers
            .contains(&("content-type".to_string(), "application/json".to_string())));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["nome"], "Ana");
        assert_eq!(body["email"], "ana@example.com");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_strips_identifier() {
        let product = Product {
            id: Some(EntityId::from(3)),
            name: "Caneca".to_string(),
            description: None,
            price: 12.5,
            category: Some("Casa".to_string()),
            stock: Some(4),
            timestamps: Timestamps::default(),
        };
        let req = client().build_update(&EntityId::from(3), &product).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/produtos/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["nome"], "Caneca");
        assert_eq!(body["estoque"], 4);
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build_delete::<Customer>(&EntityId::from("c-9"));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/api/clientes/c-9");
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:3000/api/");
        let req = client.build_create::<Product>(&NewProduct::new("A", 1.0)).unwrap();
        assert_eq!(req.path, "http://localhost:3000/api/produtos");
    }

    #[test]
    fn parse_record_accepts_201() {
        let product: Product = client()
            .parse_record(ok(201, r#"{"product":{"id":9,"nome":"B","preco":5}}"#))
            .unwrap();
        assert_eq!(product.id, Some(EntityId::from(9)));
    }

    #[test]
    fn parse_record_not_found() {
        let err = client().parse_record::<Customer>(ok(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_list_wrong_status() {
        let err = client()
            .parse_list::<Product>(ok(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn error_envelope_carries_server_message() {
        let err = client()
            .parse_record::<Customer>(ok(400, r#"{"success":false,"error":"nome é obrigatório"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "nome é obrigatório");
    }

    #[test]
    fn success_false_on_2xx_is_rejected() {
        let err = client()
            .parse_list::<Product>(ok(200, r#"{"success":false,"message":"banco indisponível"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 200, .. }));
        assert_eq!(err.to_string(), "banco indisponível");
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list::<Product>(ok(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_delete_accepts_any_success() {
        assert!(client().parse_delete(ok(204, "")).is_ok());
        assert!(client().parse_delete(ok(200, r#"{"success":true}"#)).is_ok());
        assert!(matches!(
            client().parse_delete(ok(404, "")).unwrap_err(),
            ApiError::NotFound
        ));
    }
}
