//! Client Module
//!
//! Async client for the cache RPC service, used by the `stache` CLI.

pub mod cli;
pub mod render;

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::api::{DELETE_PROCEDURE, GET_PROCEDURE, LIST_ENTRIES_PROCEDURE, SET_PROCEDURE};
use crate::error::{Code, ErrorResponse};
use crate::models::{
    DeleteRequest, DeleteResponse, GetRequest, GetResponse, ListEntriesRequest,
    ListEntriesResponse, ListedEntry, SetRequest, SetResponse,
};

/// Default daemon base URL.
pub const DEFAULT_ADDR: &str = "http://localhost:8080";

/// Whole-request timeout applied by [`CacheClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// == Client Error ==
#[derive(Error, Debug)]
pub enum ClientError {
    /// The daemon answered with an RPC error body
    #[error("{code}: {message}")]
    Rpc { code: Code, message: String },

    /// The daemon answered with a non-RPC failure (e.g. a timeout page)
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, timeout or decoding failure
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// The RPC status code, if the daemon sent one.
    pub fn code(&self) -> Option<Code> {
        match self {
            ClientError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// == Cache Client ==
#[derive(Debug, Clone)]
pub struct CacheClient {
    http: reqwest::Client,
    base_url: String,
}

impl CacheClient {
    /// Creates a client for the daemon at `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one unary call and decodes either the response or the RPC error.
    async fn call<Req, Res>(&self, procedure: &str, request: &Req) -> Result<Res, ClientError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, procedure);
        debug!(%url, "calling");

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
            }),
            Err(_) => Err(ClientError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Stores `value` under `key`. `ttl_seconds <= 0` means no expiry.
    pub async fn set(
        &self,
        key: &str,
        value: &[u8],
        content_type: &str,
        ttl_seconds: i64,
    ) -> Result<(), ClientError> {
        let request = SetRequest {
            key: key.to_string(),
            value: value.to_vec(),
            content_type: Some(content_type.to_string()),
            ttl: Some(ttl_seconds),
        };
        let _: SetResponse = self.call(SET_PROCEDURE, &request).await?;
        Ok(())
    }

    /// Fetches `key`; with `content_type` set the read fails on a type mismatch.
    pub async fn get(&self, key: &str, content_type: Option<&str>) -> Result<GetResponse, ClientError> {
        let request = GetRequest {
            key: key.to_string(),
            content_type: content_type.map(str::to_string),
        };
        self.call(GET_PROCEDURE, &request).await
    }

    /// Deletes `key`, returning whether it existed.
    pub async fn delete(&self, key: &str) -> Result<bool, ClientError> {
        let request = DeleteRequest {
            key: key.to_string(),
        };
        let response: DeleteResponse = self.call(DELETE_PROCEDURE, &request).await?;
        Ok(response.deleted)
    }

    pub async fn list_entries(&self) -> Result<Vec<ListedEntry>, ClientError> {
        let response: ListEntriesResponse = self
            .call(LIST_ENTRIES_PROCEDURE, &ListEntriesRequest {})
            .await?;
        Ok(response.entries)
    }
}
