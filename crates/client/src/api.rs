//! REST client for the Formsmith API.
//!
//! Implements [`FormGateway`] over the `/api/v1/forms` endpoints using
//! [`reqwest`]. Responses are unwrapped from their `{ "data": ... }`
//! envelope.

use formsmith_core::field::{FieldInstance, FieldTemplate};
use formsmith_core::form::{FormPayload, FormRecord, FormSummary};
use formsmith_core::gateway::{FormGateway, GatewayError};
use formsmith_core::paging::MAX_LIMIT;
use formsmith_core::types::DbId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// HTTP gateway for a single Formsmith server.
#[derive(Debug, Clone)]
pub struct HttpFormGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

impl HttpFormGateway {
    /// * `base_url` - Server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Fetch the palette templates the server offers.
    pub async fn fetch_catalog(&self) -> Result<Vec<FieldTemplate>, GatewayError> {
        let response = self
            .client
            .get(self.url("/api/v1/catalog"))
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response, None).await
    }

    /// Delete a stored form.
    pub async fn delete_form(&self, id: DbId) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/v1/forms/{id}")))
            .send()
            .await
            .map_err(transport)?;

        Self::ensure_success(response, Some(id)).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    ///
    /// A 404 becomes [`GatewayError::NotFound`] when the request targeted a
    /// specific form; any other failure status becomes
    /// [`GatewayError::Transport`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
        form_id: Option<DbId>,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, form_id) {
            return Err(GatewayError::NotFound { id });
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::warn!(status = status.as_u16(), %body, "Form API request failed");
        Err(GatewayError::Transport(format!(
            "server responded {}: {body}",
            status.as_u16()
        )))
    }

    /// Check the status, then decode the `data` member of the body.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        form_id: Option<DbId>,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response, form_id).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

impl FormGateway for HttpFormGateway {
    /// Pages through `/api/v1/forms` until a short page comes back.
    async fn list_forms(&self) -> Result<Vec<FormSummary>, GatewayError> {
        let mut forms = Vec::new();
        loop {
            let offset = forms.len();
            let response = self
                .client
                .get(self.url(&format!(
                    "/api/v1/forms?limit={MAX_LIMIT}&offset={offset}"
                )))
                .send()
                .await
                .map_err(transport)?;

            let page: Vec<FormSummary> = Self::parse_response(response, None).await?;
            let last_page = (page.len() as i64) < MAX_LIMIT;
            forms.extend(page);
            if last_page {
                return Ok(forms);
            }
        }
    }

    async fn get_form(&self, id: DbId) -> Result<FormRecord, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/forms/{id}")))
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response, Some(id)).await
    }

    async fn create_form(
        &self,
        name: &str,
        fields: &[FieldInstance],
    ) -> Result<FormRecord, GatewayError> {
        let response = self
            .client
            .post(self.url("/api/v1/forms"))
            .json(&FormPayload { name, fields })
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response, None).await
    }

    async fn update_form(
        &self,
        id: DbId,
        name: &str,
        fields: &[FieldInstance],
    ) -> Result<FormRecord, GatewayError> {
        let response = self
            .client
            .put(self.url(&format!("/api/v1/forms/{id}")))
            .json(&FormPayload { name, fields })
            .send()
            .await
            .map_err(transport)?;

        Self::parse_response(response, Some(id)).await
    }
}
