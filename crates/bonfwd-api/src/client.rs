// Hand-crafted async HTTP client for the cloud dashboard REST API (v1).
//
// Base path: https://api.meraki.com/api/v1/
// Auth: `Authorization: Bearer <key>` header

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, LINK, LOCATION, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    BonjourForwarding, BonjourForwardingUpdate, ErrorResponse, Network, Organization, Ssid,
};
use crate::transport::TransportConfig;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// Page size requested from paginated list endpoints.
const PAGE_SIZE: u32 = 1000;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the dashboard API.
///
/// Uses bearer-token authentication and communicates via JSON REST
/// endpoints under `/api/v1/`. Every method maps to exactly one logical
/// dashboard operation; paginated lists are collected transparently.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `Authorization: Bearer <key>` as a sensitive default header.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| Error::Http(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins keep `/api/v1`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"organizations"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// Send a request, following redirects manually so the auth header survives.
    ///
    /// A 303 switches the follow-up to a bodiless GET; other redirects repeat
    /// the original method and body.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        mut method: Method,
        mut url: Url,
        mut body: Option<&B>,
    ) -> Result<reqwest::Response, Error> {
        for _ in 0..=MAX_REDIRECTS {
            debug!("{method} {url}");

            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }
            let resp = request.send().await?;

            if !resp.status().is_redirection() {
                return Ok(resp);
            }

            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let Some(location) = location else {
                return Ok(resp);
            };

            if resp.status() == StatusCode::SEE_OTHER && method != Method::HEAD {
                method = Method::GET;
                body = None;
            }

            let next = url.join(&location)?;
            debug!(from = %url, to = %next, %method, "following redirect");
            url = next;
        }

        Err(Error::TooManyRedirects {
            location: url.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        let resp = self.execute::<()>(Method::GET, url, None).await?;
        handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let resp = self.execute(Method::PUT, url, Some(body)).await?;
        handle_response(resp).await
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Collect every page of a list endpoint by following `Link: <…>; rel=next`.
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        let mut url = self.url(path)?;
        url.query_pairs_mut()
            .append_pair("perPage", &PAGE_SIZE.to_string());

        let mut all = Vec::new();
        loop {
            let resp = self.execute::<()>(Method::GET, url.clone(), None).await?;
            let next = next_link(resp.headers());
            let page: Vec<T> = handle_response(resp).await?;
            all.extend(page);

            match next {
                Some(link) => url = self.base_url.join(&link)?,
                None => break,
            }
        }

        Ok(all)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Organizations ────────────────────────────────────────────────

    /// `GET /organizations`
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        self.get("organizations").await
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// `GET /organizations/{org_id}/networks` (all pages)
    pub async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>, Error> {
        self.get_all_pages(&format!("organizations/{org_id}/networks"))
            .await
    }

    // ── Wireless ─────────────────────────────────────────────────────

    /// `GET /networks/{network_id}/wireless/ssids`
    pub async fn list_ssids(&self, network_id: &str) -> Result<Vec<Ssid>, Error> {
        self.get(&format!("networks/{network_id}/wireless/ssids"))
            .await
    }

    /// `GET /networks/{network_id}/wireless/ssids/{number}/bonjourForwarding`
    pub async fn get_bonjour_forwarding(
        &self,
        network_id: &str,
        number: u8,
    ) -> Result<BonjourForwarding, Error> {
        self.get(&bonjour_path(network_id, number)).await
    }

    /// `PUT /networks/{network_id}/wireless/ssids/{number}/bonjourForwarding`
    pub async fn update_bonjour_forwarding(
        &self,
        network_id: &str,
        number: u8,
        update: &BonjourForwardingUpdate,
    ) -> Result<BonjourForwarding, Error> {
        self.put(&bonjour_path(network_id, number), update).await
    }
}

fn bonjour_path(network_id: &str, number: u8) -> String {
    format!("networks/{network_id}/wireless/ssids/{number}/bonjourForwarding")
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
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
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::InvalidApiKey;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        return Error::RateLimited { retry_after_secs };
    }

    let raw = resp.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorResponse>(&raw) {
        Ok(envelope) if !envelope.errors.is_empty() => envelope.errors.join("; "),
        _ if raw.trim().is_empty() => status.to_string(),
        _ => raw,
    };

    Error::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extract the `rel=next` target from an RFC 5988 `Link` header.
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .map(str::trim)
            .any(|p| p == "rel=next" || p == "rel=\"next\"");
        is_next.then(|| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_owned()
        })
    })
}
