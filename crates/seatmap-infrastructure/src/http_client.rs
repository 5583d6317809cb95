//! REST client for the session backend.
//!
//! Implements the session, layout and table traits over HTTP/JSON:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | layout | `GET /mensa/{venue_id}/layout` |
//! | session | `GET /sessions/{id}` |
//! | add tables | `POST /sessions/{id}/tables` with a JSON id array |
//! | remove tables | `DELETE /sessions/{id}/tables` with a JSON id array |
//! | end session | `POST /sessions/{id}/end` |

use crate::dto::SessionDto;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use seatmap_core::config::ApiSettings;
use seatmap_core::error::{Result, SeatmapError};
use seatmap_core::layout::LayoutProvider;
use seatmap_core::session::{Session, SessionProvider, TableReconciliationApi};
use seatmap_core::table::TableId;
use std::time::Duration;
use uuid::Uuid;

/// HTTP implementation of the backend contracts.
#[derive(Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackendClient {
    /// Creates a client for the configured backend.
    pub fn new(settings: &ApiSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Backend path variables are UUIDs; reject anything else before sending.
    fn parse_id(entity_type: &'static str, id: &str) -> Result<Uuid> {
        Uuid::parse_str(id).map_err(|_| SeatmapError::not_found(entity_type, id))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        entity_type: &'static str,
        id: &str,
    ) -> Result<Response> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SeatmapError::transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SeatmapError::not_found(entity_type, id));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SeatmapError::transport(format!(
                "Backend error ({}): {}",
                status, error_text
            )));
        }
        Ok(response)
    }

    async fn read_session(response: Response) -> Result<Session> {
        let dto: SessionDto = response
            .json()
            .await
            .map_err(|e| session_decode_error(&e))?;
        dto.into_domain()
    }
}

fn session_decode_error(err: &dyn std::fmt::Display) -> SeatmapError {
    SeatmapError::Serialization {
        format: "JSON".to_string(),
        message: format!("Failed to parse session: {}", err),
    }
}

#[async_trait]
impl LayoutProvider for HttpBackendClient {
    async fn fetch_layout(&self, venue_id: &str) -> Result<String> {
        let id = Self::parse_id("Venue", venue_id)?;
        tracing::debug!("[HttpBackendClient] GET layout for venue {}", id);
        let request = self.client.get(self.url(&format!("/mensa/{}/layout", id)));
        let response = self.send(request, "Venue", venue_id).await?;
        response
            .text()
            .await
            .map_err(|e| SeatmapError::transport(format!("Failed to read layout: {}", e)))
    }
}

#[async_trait]
impl SessionProvider for HttpBackendClient {
    async fn fetch_session(&self, session_id: &str) -> Result<Session> {
        let id = Self::parse_id("Session", session_id)?;
        tracing::debug!("[HttpBackendClient] GET session {}", id);
        let request = self.client.get(self.url(&format!("/sessions/{}", id)));
        let response = self.send(request, "Session", session_id).await?;
        Self::read_session(response).await
    }
}

#[async_trait]
impl TableReconciliationApi for HttpBackendClient {
    async fn add_tables(&self, session_id: &str, tables: &[TableId]) -> Result<()> {
        let id = Self::parse_id("Session", session_id)?;
        tracing::debug!("[HttpBackendClient] POST {} tables to session {}", tables.len(), id);
        let request = self
            .client
            .post(self.url(&format!("/sessions/{}/tables", id)))
            .json(tables);
        self.send(request, "Session", session_id).await?;
        Ok(())
    }

    async fn remove_tables(&self, session_id: &str, tables: &[TableId]) -> Result<Session> {
        let id = Self::parse_id("Session", session_id)?;
        tracing::debug!(
            "[HttpBackendClient] DELETE {} tables from session {}",
            tables.len(),
            id
        );
        let request = self
            .client
            .delete(self.url(&format!("/sessions/{}/tables", id)))
            .json(tables);
        let response = self.send(request, "Session", session_id).await?;
        Self::read_session(response).await
    }

    async fn end_session(&self, session_id: &str) -> Result<Session> {
        let id = Self::parse_id("Session", session_id)?;
        tracing::debug!("[HttpBackendClient] POST end for session {}", id);
        let request = self.client.post(self.url(&format!("/sessions/{}/end", id)));
        let response = self.send(request, "Session", session_id).await?;
        Self::read_session(response).await
    }
}
