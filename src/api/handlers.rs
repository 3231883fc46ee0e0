//! API Handlers
//!
//! One handler per RPC method of the cache service, plus health.
//! Handlers validate input, translate it into engine calls and map engine
//! errors to RPC status codes.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::TimeDelta;

use crate::cache::{Cache, ContentType};
use crate::error::RpcError;
use crate::models::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, HealthResponse, ListEntriesRequest,
    ListEntriesResponse, SetRequest, SetResponse,
};

type RpcResult<T> = std::result::Result<Json<T>, RpcError>;

/// Application state shared across all handlers.
///
/// The cache is created once by the daemon and shared by reference count;
/// it does its own locking.
#[derive(Clone, Default)]
pub struct AppState {
    pub cache: Arc<Cache>,
}

impl AppState {
    /// Creates a new AppState owning the given cache.
    pub fn new(cache: Cache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

/// Converts a TTL in seconds to the engine's signed duration.
fn ttl_from_seconds(seconds: i64) -> std::result::Result<TimeDelta, RpcError> {
    TimeDelta::try_seconds(seconds)
        .ok_or_else(|| RpcError::invalid_argument(format!("ttl out of range: {seconds}s")))
}

/// Handler for `CacheService/Set`
pub async fn set_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> RpcResult<SetResponse> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(RpcError::invalid_argument(error_msg));
    }

    let ttl = ttl_from_seconds(req.ttl.unwrap_or(0))?;
    let content_type = ContentType::from_mime(req.content_type.as_deref().unwrap_or_default());

    state.cache.set(req.key, &req.value, content_type, ttl)?;

    Ok(Json(SetResponse::default()))
}

/// Handler for `CacheService/Get`
///
/// Bytes and metadata come from one lookup so they always describe the
/// same entry.
pub async fn get_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GetRequest>, JsonRejection>,
) -> RpcResult<GetResponse> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(RpcError::invalid_argument(error_msg));
    }

    let snapshot = match req.content_type.as_deref().filter(|ct| !ct.is_empty()) {
        Some(expected) => state
            .cache
            .get_entry_typed(&req.key, &ContentType::from_mime(expected))?,
        None => state.cache.get_entry(&req.key)?,
    };

    Ok(Json(GetResponse::from(snapshot)))
}

/// Handler for `CacheService/Delete`
pub async fn delete_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> RpcResult<DeleteResponse> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(RpcError::invalid_argument(error_msg));
    }

    let (_, deleted) = state.cache.delete(&req.key);

    Ok(Json(DeleteResponse { deleted }))
}

/// Handler for `CacheService/ListEntries`
pub async fn list_entries_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ListEntriesRequest>, JsonRejection>,
) -> RpcResult<ListEntriesResponse> {
    let Json(_) = payload?;

    let entries = state.cache.entries().into_iter().map(Into::into).collect();

    Ok(Json(ListEntriesResponse { entries }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::serving())
}

/// Handler for GET /
pub async fn root_handler() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Code;

    fn set_request(key: &str, value: &[u8], content_type: Option<&str>, ttl: Option<i64>) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: value.to_vec(),
            content_type: content_type.map(str::to_string),
            ttl,
        }
    }

    fn get_request(key: &str, content_type: Option<&str>) -> GetRequest {
        GetRequest {
            key: key.to_string(),
            content_type: content_type.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = AppState::default();

        let req = set_request("test_key", b"test_value", None, None);
        let result = set_handler(State(state.clone()), Ok(Json(req))).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), Ok(Json(get_request("test_key", None))))
            .await
            .unwrap();
        assert_eq!(response.value, b"test_value");
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(response.expires_at_ms, 0);
    }

    #[tokio::test]
    async fn test_set_with_ttl_reports_expiry() {
        let state = AppState::default();
        let before = chrono::Utc::now().timestamp_millis();

        let req = set_request("k", b"{}", Some("application/json"), Some(60));
        set_handler(State(state.clone()), Ok(Json(req))).await.unwrap();

        let response = get_handler(State(state), Ok(Json(get_request("k", None))))
            .await
            .unwrap();
        assert_eq!(response.content_type, "application/json");
        assert!(response.expires_at_ms >= before + 60_000);
    }

    #[tokio::test]
    async fn test_set_negative_ttl_never_expires() {
        let state = AppState::default();

        let req = set_request("k", b"v", None, Some(-5));
        set_handler(State(state.clone()), Ok(Json(req))).await.unwrap();

        assert!(state.cache.entries()[0].expires_at.is_none());
    }

    #[tokio::test]
    async fn test_set_ttl_out_of_range() {
        let state = AppState::default();

        let req = set_request("k", b"v", None, Some(i64::MAX));
        let err = set_handler(State(state.clone()), Ok(Json(req))).await.unwrap_err();

        assert_eq!(err.code, Code::InvalidArgument);
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = AppState::default();

        let err = get_handler(State(state), Ok(Json(get_request("nonexistent", None))))
            .await
            .unwrap_err();
        assert_eq!(err.code, Code::NotFound);
    }

    #[tokio::test]
    async fn test_get_typed_mismatch() {
        let state = AppState::default();
        state.cache.set_json("j", &[1, 2], TimeDelta::zero()).unwrap();

        let err = get_handler(State(state.clone()), Ok(Json(get_request("j", Some("text/plain")))))
            .await
            .unwrap_err();
        assert_eq!(err.code, Code::FailedPrecondition);

        let ok = get_handler(State(state), Ok(Json(get_request("j", Some("application/json")))))
            .await
            .unwrap();
        assert_eq!(ok.value, b"[1,2]");
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = AppState::default();
        state.cache.set_string("to_delete", "value", TimeDelta::zero()).unwrap();

        let req = DeleteRequest {
            key: "to_delete".to_string(),
        };
        let response = delete_handler(State(state.clone()), Ok(Json(req.clone())))
            .await
            .unwrap();
        assert!(response.deleted);

        let response = delete_handler(State(state.clone()), Ok(Json(req))).await.unwrap();
        assert!(!response.deleted);

        let err = get_handler(State(state), Ok(Json(get_request("to_delete", None))))
            .await
            .unwrap_err();
        assert_eq!(err.code, Code::NotFound);
    }

    #[tokio::test]
    async fn test_list_entries_handler() {
        let state = AppState::default();
        state.cache.set_string("a", "A", TimeDelta::seconds(30)).unwrap();
        state.cache.set("b", &[0; 4], ContentType::from_mime("image/png"), TimeDelta::zero()).unwrap();

        let response = list_entries_handler(State(state), Ok(Json(ListEntriesRequest {})))
            .await
            .unwrap();

        let mut entries = response.0.entries;
        entries.sort_by(|x, y| x.key.cmp(&y.key));
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].size, entries[0].content_type.as_str()), (1, "text/plain"));
        assert!(entries[0].expires_at_ms > 0);
        assert_eq!((entries[1].size, entries[1].content_type.as_str()), (4, "image/png"));
        assert_eq!(entries[1].expires_at_ms, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "SERVING");
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let state = AppState::default();

        let err = set_handler(State(state.clone()), Ok(Json(set_request("", b"v", None, None))))
            .await
            .unwrap_err();
        assert_eq!(err.code, Code::InvalidArgument);

        let err = get_handler(State(state.clone()), Ok(Json(get_request("", None))))
            .await
            .unwrap_err();
        assert_eq!(err.code, Code::InvalidArgument);

        let err = delete_handler(State(state.clone()), Ok(Json(DeleteRequest::default())))
            .await
            .unwrap_err();
        assert_eq!(err.code, Code::InvalidArgument);

        assert!(state.cache.is_empty());
    }
}
