//! Organization store contracts and HTTP implementation.
//!
//! # Responsibility
//! - Provide the four remote operations (list, create, rename, remove)
//!   against a single resource collection keyed by unit id.
//! - Keep URL building and status-code handling inside the repository
//!   boundary.
//!
//! # Invariants
//! - A non-success response never yields a value; it maps to `RemoteError`.
//! - Success payloads are decoded strictly; undecodable bodies are errors.

use crate::model::organization::{OrgUnitId, OrganizationRecord, RemoveReceipt, RenameReceipt};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Result type used by remote repository operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors from remote organization store operations.
#[derive(Debug)]
pub enum RemoteError {
    /// Transport-level failure (connect, timeout, body read).
    Transport(reqwest::Error),
    /// Remote answered with a non-success status; `message` carries the
    /// response body for the caller to present.
    Status { status: u16, message: String },
    /// Remote answered success but the payload did not decode.
    InvalidResponse(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Status { status, message } => {
                write!(f, "remote request failed with status {status}: {message}")
            }
            Self::InvalidResponse(message) => write!(f, "invalid remote response: {message}"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status { .. } => None,
            Self::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Repository interface for the remote organization collection.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Reads the full flat record collection.
    async fn list_units(&self) -> RemoteResult<Vec<OrganizationRecord>>;
    /// Creates one unit under the given parent.
    async fn create_unit(&self, parent_id: OrgUnitId) -> RemoteResult<OrganizationRecord>;
    /// Updates one unit's name. The returned name is authoritative.
    async fn rename_unit(&self, id: OrgUnitId, name: &str) -> RemoteResult<RenameReceipt>;
    /// Removes one unit, returning the echoed id.
    async fn remove_unit(&self, id: OrgUnitId) -> RemoteResult<RemoveReceipt>;
}

#[async_trait]
impl<R: OrganizationRepository + ?Sized> OrganizationRepository for Arc<R> {
    async fn list_units(&self) -> RemoteResult<Vec<OrganizationRecord>> {
        (**self).list_units().await
    }

    async fn create_unit(&self, parent_id: OrgUnitId) -> RemoteResult<OrganizationRecord> {
        (**self).create_unit(parent_id).await
    }

    async fn rename_unit(&self, id: OrgUnitId, name: &str) -> RemoteResult<RenameReceipt> {
        (**self).rename_unit(id, name).await
    }

    async fn remove_unit(&self, id: OrgUnitId) -> RemoteResult<RemoveReceipt> {
        (**self).remove_unit(id).await
    }
}

/// HTTP-backed organization repository.
///
/// Wire bindings against the collection URL:
/// - list: `GET {base}`
/// - create: `POST {base}/{parent_id}`
/// - rename: `PUT {base}/{id}?name={name}`
/// - remove: `DELETE {base}/{id}`
pub struct HttpOrganizationRepository {
    client: Client,
    base_url: String,
}

impl HttpOrganizationRepository {
    /// Creates a repository against one collection URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a repository reusing a caller-provided client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unit_url(&self, id: OrgUnitId) -> String {
        format!("{}/{id}", self.base_url)
    }

    async fn decode<T>(response: reqwest::Response, operation: &str) -> RemoteResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(
                "event=remote_request module=repo status=error op={operation} http_status={}",
                status.as_u16()
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                RemoteError::InvalidResponse(err.to_string())
            } else {
                RemoteError::Transport(err)
            }
        })
    }
}

#[async_trait]
impl OrganizationRepository for HttpOrganizationRepository {
    async fn list_units(&self) -> RemoteResult<Vec<OrganizationRecord>> {
        debug!("event=remote_request module=repo op=list url={}", self.base_url);
        let response = self.client.get(self.base_url.as_str()).send().await?;
        Self::decode(response, "list").await
    }

    async fn create_unit(&self, parent_id: OrgUnitId) -> RemoteResult<OrganizationRecord> {
        debug!("event=remote_request module=repo op=create parent_id={parent_id}");
        let response = self.client.post(self.unit_url(parent_id)).send().await?;
        Self::decode(response, "create").await
    }

    async fn rename_unit(&self, id: OrgUnitId, name: &str) -> RemoteResult<RenameReceipt> {
        debug!("event=remote_request module=repo op=rename id={id}");
        let response = self
            .client
            .put(self.unit_url(id))
            .query(&[("name", name)])
            .send()
            .await?;
        Self::decode(response, "rename").await
    }

    async fn remove_unit(&self, id: OrgUnitId) -> RemoteResult<RemoveReceipt> {
        debug!("event=remote_request module=repo op=remove id={id}");
        let response = self.client.delete(self.unit_url(id)).send().await?;
        Self::decode(response, "remove").await
    }
}
