//! Request execution
//!
//! HTTP plumbing shared by every [`ResourceApi`] operation.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use serde_json::json;
use url::Url;

use crate::PanelClient;
use crate::api::ListQuery;
use crate::api::ListResponse;
use crate::api::ResourceApi;
use crate::error::ApiError;
use crate::error::Error;

impl PanelClient {
    /// Joins `segments` onto the base URL. Each segment may itself contain
    /// `/` (e.g. `formularios/preguntas`); parts are percent-encoded.
    pub(crate) fn build_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?;
            path.pop_if_empty();
            for part in segments
                .iter()
                .flat_map(|segment| segment.split('/'))
                .filter(|part| !part.is_empty())
            {
                path.push(part);
            }
        }
        Ok(url)
    }

    /// Sends a request with the bearer token and returns the JSON body.
    ///
    /// An empty success body yields `Value::Null`. Non-success statuses
    /// become [`ApiError::Http`] carrying the backend's `message`.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let token = self
            .inner
            .token_provider
            .get_token(self.base_url())
            .await?;

        log::debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            log::warn!("{} {} failed with {}", method, url, status);
            return Err(Error::Api(ApiError::http(
                status.as_u16(),
                error_message(status, &text),
            )));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => Err(Error::Api(ApiError::parse_with_body(e.to_string(), text))),
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

/// Pulls `message` (or `error`) out of a JSON error body, falling back to
/// the raw body and then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

#[async_trait]
impl ResourceApi for PanelClient {
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<ListResponse<Value>, Error> {
        let mut url = self.build_url(&[resource])?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());

        let body = self.request(Method::GET, url, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value, Error> {
        let url = self.build_url(&[resource, id])?;
        match self.request(Method::GET, url, None).await {
            Err(e) if e.status_code() == Some(404) => Err(Error::Api(ApiError::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            })),
            other => other,
        }
    }

    async fn create(&self, resource: &str, body: Value) -> Result<Value, Error> {
        let url = self.build_url(&[resource])?;
        self.request(Method::POST, url, Some(&body)).await
    }

    async fn update(&self, resource: &str, id: &str, changes: Value) -> Result<Value, Error> {
        let url = self.build_url(&[resource, id])?;
        self.request(Method::PUT, url, Some(&changes)).await
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<(), Error> {
        let url = self.build_url(&[resource, id])?;
        self.request(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn copy(&self, resource: &str, id: &str, new_name: &str) -> Result<Value, Error> {
        let url = self.build_url(&[resource, id, "copy"])?;
        let body = json!({ "newName": new_name });
        self.request(Method::POST, url, Some(&body)).await
    }
}
