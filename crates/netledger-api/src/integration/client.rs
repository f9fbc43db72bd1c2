// Hand-crafted async HTTP client for the UniFi Network Integration API (v10.1.84).
//
// Base path: /integration/v1/
// Auth: X-API-KEY header

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::types;
use crate::{ControllerPlatform, Error, TransportConfig};

/// Page size used when draining list endpoints.
const PAGE_LIMIT: i32 = 200;

// ── Error response shape from the Integration API ────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the UniFi Integration API.
///
/// Uses API-key authentication and communicates via JSON REST endpoints
/// under `/integration/v1/`. Cheap to clone; the underlying connection
/// pool is shared.
#[derive(Clone)]
pub struct IntegrationClient {
    http: reqwest::Client,
    base_url: Url,
}

impl IntegrationClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key, transport config, and controller platform.
    ///
    /// Injects `X-API-KEY` as a default header on every request.
    pub fn from_api_key(
        base_url: &str,
        api_key: &secrecy::SecretString,
        transport: &TransportConfig,
        platform: ControllerPlatform,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("X-API-KEY", key_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url, platform)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        platform: ControllerPlatform,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url, platform)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL with correct platform prefix + `/integration/`.
    ///
    /// UniFi OS: `https://host/proxy/network/integration/`
    /// Standalone: `https://host/integration/`
    fn normalize_base_url(raw: &str, platform: ControllerPlatform) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/integration") {
            url.set_path(&format!("{path}/"));
        } else {
            let prefix = platform.integration_prefix();
            url.set_path(&format!("{path}{prefix}/"));
        }

        Ok(url)
    }

    /// The normalized `…/integration/` base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1/sites"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_empty(resp).await
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

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Integration {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Integration {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Collect all pages into a single `Vec<T>`.
    pub async fn paginate_all<T, F, Fut>(&self, limit: i32, fetch: F) -> Result<Vec<T>, Error>
    where
        F: Fn(i64, i32) -> Fut,
        Fut: Future<Output = Result<types::Page<T>, Error>>,
    {
        let mut all = Vec::new();
        let mut offset: i64 = 0;

        loop {
            let page = fetch(offset, limit).await?;
            let received = page.data.len();
            all.extend(page.data);

            let limit_usize = usize::try_from(limit).unwrap_or(0);
            if received == 0
                || received < limit_usize
                || i64::try_from(all.len()).unwrap_or(i64::MAX) >= page.total_count
            {
                break;
            }

            offset += i64::try_from(received).unwrap_or(i64::MAX);
        }

        Ok(all)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Sites ────────────────────────────────────────────────────────

    pub async fn list_sites(
        &self,
        offset: i64,
        limit: i32,
    ) -> Result<types::Page<types::SiteResponse>, Error> {
        self.get_with_params(
            "v1/sites",
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Resolve a site reference (UUID or internal reference like `default`).
    pub async fn resolve_site(&self, site: &str) -> Result<Option<Uuid>, Error> {
        if let Ok(uuid) = Uuid::parse_str(site) {
            return Ok(Some(uuid));
        }

        let sites = self
            .paginate_all(PAGE_LIMIT, |off, lim| self.list_sites(off, lim))
            .await?;

        Ok(sites
            .into_iter()
            .find(|s| s.internal_reference == site || s.name == site)
            .map(|s| s.id))
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(
        &self,
        site_id: &Uuid,
        offset: i64,
        limit: i32,
    ) -> Result<types::Page<types::DeviceResponse>, Error> {
        self.get_with_params(
            &format!("v1/sites/{site_id}/devices"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Every adopted device on the site, all pages drained.
    pub async fn list_all_devices(&self, site_id: &Uuid) -> Result<Vec<types::DeviceResponse>, Error> {
        self.paginate_all(PAGE_LIMIT, |off, lim| self.list_devices(site_id, off, lim))
            .await
    }

    pub async fn get_device_statistics(
        &self,
        site_id: &Uuid,
        device_id: &Uuid,
    ) -> Result<types::DeviceStatisticsResponse, Error> {
        self.get(&format!(
            "v1/sites/{site_id}/devices/{device_id}/statistics/latest"
        ))
        .await
    }

    pub async fn device_action(
        &self,
        site_id: &Uuid,
        device_id: &Uuid,
        action: types::DeviceAction,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            action: types::DeviceAction,
        }

        self.post_no_response(
            &format!("v1/sites/{site_id}/devices/{device_id}/actions"),
            &Body { action },
        )
        .await
    }

    /// Restart an adopted device.
    pub async fn restart_device(&self, site_id: &Uuid, device_id: &Uuid) -> Result<(), Error> {
        self.device_action(site_id, device_id, types::DeviceAction::Restart)
            .await
    }

    // ── Clients ──────────────────────────────────────────────────────

    pub async fn list_clients(
        &self,
        site_id: &Uuid,
        offset: i64,
        limit: i32,
    ) -> Result<types::Page<types::ClientResponse>, Error> {
        self.get_with_params(
            &format!("v1/sites/{site_id}/clients"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Every connected client on the site, all pages drained.
    pub async fn list_all_clients(&self, site_id: &Uuid) -> Result<Vec<types::ClientResponse>, Error> {
        self.paginate_all(PAGE_LIMIT, |off, lim| self.list_clients(site_id, off, lim))
            .await
    }

    pub async fn get_client(
        &self,
        site_id: &Uuid,
        client_id: &Uuid,
    ) -> Result<types::ClientDetailsResponse, Error> {
        self.get(&format!("v1/sites/{site_id}/clients/{client_id}"))
            .await
    }

    // ── WiFi Broadcasts ──────────────────────────────────────────────

    pub async fn list_wifi_broadcasts(
        &self,
        site_id: &Uuid,
        offset: i64,
        limit: i32,
    ) -> Result<types::Page<types::WifiBroadcastResponse>, Error> {
        self.get_with_params(
            &format!("v1/sites/{site_id}/wifi/broadcasts"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Every WiFi broadcast on the site, all pages drained.
    pub async fn list_all_wifi_broadcasts(
        &self,
        site_id: &Uuid,
    ) -> Result<Vec<types::WifiBroadcastResponse>, Error> {
        self.paginate_all(PAGE_LIMIT, |off, lim| {
            self.list_wifi_broadcasts(site_id, off, lim)
        })
        .await
    }

    pub async fn get_wifi_broadcast(
        &self,
        site_id: &Uuid,
        broadcast_id: &Uuid,
    ) -> Result<types::WifiBroadcastDetailsResponse, Error> {
        self.get(&format!("v1/sites/{site_id}/wifi/broadcasts/{broadcast_id}"))
            .await
    }

    /// Toggle SSID advertisement for a broadcast.
    pub async fn set_wifi_broadcast_hide_name(
        &self,
        site_id: &Uuid,
        broadcast_id: &Uuid,
        hide_name: bool,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body {
            hide_name: bool,
        }

        self.put_no_response(
            &format!("v1/sites/{site_id}/wifi/broadcasts/{broadcast_id}"),
            &Body { hide_name },
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unifi_os_base_url_gets_proxy_prefix() {
        let client = IntegrationClient::from_reqwest(
            "https://192.168.1.1",
            reqwest::Client::new(),
            ControllerPlatform::UnifiOs,
        )
        .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://192.168.1.1/proxy/network/integration/"
        );
    }

    #[test]
    fn explicit_integration_path_is_kept() {
        let client = IntegrationClient::from_reqwest(
            "https://controller.local:8443/integration/",
            reqwest::Client::new(),
            ControllerPlatform::UnifiOs,
        )
        .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://controller.local:8443/integration/"
        );
    }
}
