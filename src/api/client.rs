// api/client.rs
use crate::api::wire::Paginated;
use crate::api::ApiError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Holder for the remote API token. Constructed from whatever the session
/// layer has stored and handed to the client explicitly; nothing in the
/// client reads ambient state.
#[derive(Debug, Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the Authorization header: "Token <value>".
    pub fn header_value(&self) -> String {
        format!("Token {}", self.token)
    }
}

/// Cooperative cancellation for long-running lookups (suspect search).
/// Checked before dispatch and between pagination pages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

/// Blocking client for the remote incident API.
///
/// - every request carries "Authorization: Token ..."
/// - a 401 fires the on_unauthorized hook (if set) before the call
///   returns ApiError::Unauthorized
/// - list endpoints are paginated {count, next, previous, results}
pub struct ApiClient {
    http: Client,
    base: Url,
    credentials: Credentials,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Network(format!("bad API base url '{base_url}': {e}")))?;

        Ok(Self {
            http,
            base,
            credentials,
            on_unauthorized: None,
        })
    }

    /// Install the 401 hook. The router uses this to revoke the local
    /// session when the remote token has gone stale.
    pub fn on_unauthorized(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Network(format!("bad endpoint path '{path}': {e}")))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attach credentials, dispatch, and normalize the status code.
    pub(crate) fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req
            .header(AUTHORIZATION, self.credentials.header_value())
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        self.check_status(resp)
    }

    fn check_status(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();

        if status.as_u16() == 401 {
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(ApiError::Unauthorized);
        }

        if status.as_u16() == 404 {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ApiError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let resp = self.send(self.http.get(url))?;
        resp.json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Collect every page of a paginated list endpoint by following the
    /// "next" links. An optional token cancels between pages.
    pub(crate) fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        first: Url,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<T>, ApiError> {
        let mut out = Vec::new();
        let mut next = Some(first);

        while let Some(url) = next {
            if cancel.map(CancelToken::is_cancelled).unwrap_or(false) {
                return Err(ApiError::Cancelled);
            }

            let page: Paginated<T> = self.get_json(url)?;
            out.extend(page.results);

            next = match page.next {
                Some(raw) => Some(
                    Url::parse(&raw)
                        .map_err(|e| ApiError::Decode(format!("bad next link '{raw}': {e}")))?,
                ),
                None => None,
            };
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_render_token_header() {
        let creds = Credentials::new("abc123");
        assert_eq!(creds.header_value(), "Token abc123");
    }

    #[test]
    fn cancel_token_starts_clear_and_latches() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        token.cancel();
        assert!(token.is_cancelled());

        // clones observe the same flag
        let clone = token.clone();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn endpoint_joins_against_base() {
        let api = ApiClient::new("https://api.example.com", Credentials::new("t")).unwrap();
        let url = api.endpoint("/api/incidents/7/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/incidents/7/");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let res = ApiClient::new("not a url", Credentials::new("t"));
        assert!(matches!(res, Err(ApiError::Network(_))));
    }
}
