// File server HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, envelope unwrapping,
// and error categorization. Endpoint groups (files, albums, tags) are
// implemented as inherent methods in separate modules to keep this one
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{Body, ListParams, Listing};

// ── Error response shape from the server ─────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the photo file server.
///
/// Every method performs exactly one HTTP call and either returns the
/// parsed body or a categorized [`Error`]. Nothing is cached and nothing
/// is retried.
pub struct PhotoServerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PhotoServerClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL (e.g. `http://localhost:8888/api/files`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append to it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"albums/3"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(log_transport)?;
        let body: Body<T> = self.handle_response(resp).await?;
        Ok(body.into_inner())
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ListParams,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={:?}", params.as_pairs());

        let resp = self
            .http
            .get(url)
            .query(params.as_pairs())
            .send()
            .await
            .map_err(log_transport)?;
        let listing: Listing = self.handle_response(resp).await?;
        Ok(listing.into_items(path))
    }

    pub(crate) async fn get_bytes(
        &self,
        url: Url,
    ) -> Result<bytes::Bytes, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(log_transport)?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.bytes().await?)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(log_transport)?;
        let body: Body<T> = self.handle_response(resp).await?;
        Ok(body.into_inner())
    }

    /// POST without a request body (favorite endpoints).
    pub(crate) async fn post_empty(&self, path: &str) -> Result<serde_json::Value, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await.map_err(log_transport)?;
        self.handle_value(resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(log_transport)?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(log_transport)?;
        let body: Body<T> = self.handle_response(resp).await?;
        Ok(body.into_inner())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<serde_json::Value, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await.map_err(log_transport)?;
        self.handle_value(resp).await
    }

    pub(crate) async fn delete_with_body<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .json(body)
            .send()
            .await
            .map_err(log_transport)?;
        self.handle_value(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Acknowledgement-style responses: any JSON (or an empty body) is fine.
    async fn handle_value(&self, resp: reqwest::Response) -> Result<serde_json::Value, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            if body.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let url = resp.url().clone();
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.clone()
                }
            });

        error!(status = status.as_u16(), %url, body = %raw, "file server returned an error");
        if status == reqwest::StatusCode::FORBIDDEN {
            warn!(%url, "access denied; check the server's CORS and credential settings");
        }

        Error::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// Log a transport failure (no response received) before handing it back.
fn log_transport(err: reqwest::Error) -> Error {
    if err.is_connect() {
        warn!(url = ?err.url().map(Url::as_str), "connection refused; is the file server running?");
    } else if err.is_timeout() {
        warn!(url = ?err.url().map(Url::as_str), "request timed out");
    } else {
        error!("network error: {err}");
    }
    Error::Transport(err)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client =
            PhotoServerClient::from_reqwest("http://localhost:8888/api/files", reqwest::Client::new())
                .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8888/api/files/");
        assert_eq!(
            client.url("/albums/3").unwrap().as_str(),
            "http://localhost:8888/api/files/albums/3"
        );
    }

    #[test]
    fn root_base_url() {
        let client =
            PhotoServerClient::from_reqwest("http://localhost:8888", reqwest::Client::new()).unwrap();
        assert_eq!(client.url("tags/all").unwrap().as_str(), "http://localhost:8888/tags/all");
    }
}
