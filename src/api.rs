// REST API with Axum
// Thin HTTP shell over the Dispatcher; every route maps to one invocation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::dispatch::{DispatchError, Dispatcher};
use crate::entities::EntityKind;
use crate::error::RegistryError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            error: Some(message),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvokeRequest {
    #[serde(default)]
    pub args: Vec<String>,
}

/// HTTP status for each failure kind
pub fn status_for(err: &DispatchError) -> StatusCode {
    match err {
        DispatchError::UnknownFunction(_) => StatusCode::NOT_FOUND,
        DispatchError::BadArguments { .. } | DispatchError::Cusip(_) => StatusCode::BAD_REQUEST,
        DispatchError::Registry(e) => match e {
            RegistryError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            RegistryError::AlreadyExists { .. } => StatusCode::CONFLICT,
            RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
            RegistryError::DecodeFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RegistryError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RegistryError::Persistence { .. } => StatusCode::SERVICE_UNAVAILABLE,
        },
    }
}

fn error_response(err: DispatchError) -> Response {
    (status_for(&err), Json(ApiResponse::err(err.to_string()))).into_response()
}

/// Payload bytes as JSON: nothing -> null, JSON -> itself, anything else -> string
fn payload_value(payload: Vec<u8>) -> serde_json::Value {
    if payload.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&payload).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(&payload).into_owned())
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/invoke/:function - Run a registry function with string args
async fn invoke(
    State(state): State<AppState>,
    Path(function): Path<String>,
    Json(request): Json<InvokeRequest>,
) -> Response {
    match state.dispatcher.invoke(&function, &request.args) {
        Ok(payload) => {
            let status = if function.starts_with("get") {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(ApiResponse::ok(payload_value(payload)))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/entities/:kind/:id - Read one record
async fn get_entity(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let kind: EntityKind = match kind.parse() {
        Ok(kind) => kind,
        Err(reason) => {
            return (StatusCode::NOT_FOUND, Json(ApiResponse::err(reason))).into_response();
        }
    };

    match state.dispatcher.registry().read(kind, &id) {
        Ok(entity) => (StatusCode::OK, Json(ApiResponse::ok(entity))).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// Build the full router
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/invoke/:function", post(invoke))
        .route("/entities/:kind/:id", get(get_entity))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::registry::Registry;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let registry = Registry::with_default_namespaces(Arc::new(MemoryLedger::new()));
        build_router(AppState {
            dispatcher: Arc::new(Dispatcher::new(registry)),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn invoke_request(function: &str, args: &[&str]) -> Request<Body> {
        Request::post(format!("/api/invoke/{}", function))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "args": args }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app();
        let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_create_conflict_and_read() {
        let app = create_test_app();

        let (status, _) = send(&app, invoke_request("createVendor", &["V1", "Acme", "retail", "5"])).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            send(&app, invoke_request("createVendor", &["V1", "Acme", "retail", "5"])).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, body) = send(&app, invoke_request("getVendor", &["V1"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["vendorname"], "Acme");

        let (status, body) = send(
            &app,
            Request::get("/api/entities/vendor/V1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["vptquantity"], 5);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = create_test_app();

        let (status, _) = send(&app, invoke_request("getAccount", &["nobody"])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, invoke_request("createVendor", &["V1"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, invoke_request("transferPaper", &[])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Request::get("/api/entities/merchant/M1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_payload_value() {
        assert_eq!(payload_value(Vec::new()), serde_json::Value::Null);
        assert_eq!(payload_value(b"12345AAF".to_vec()), "12345AAF");
        assert_eq!(payload_value(br#"{"id":"V1"}"#.to_vec())["id"], "V1");
    }
}
