// HR backend HTTP client
//
// Wraps `reqwest::Client` with bearer auth, `/api/v1/` URL construction,
// `{ data }` envelope unwrapping, timeout bounding, and failure
// classification. Endpoint methods live in `crate::endpoints`, one file
// per domain, as inherent methods on `ApiClient`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{BuildError, Error};
use crate::session::SessionObserver;
use crate::transport::TransportConfig;
use crate::types::{ErrorBody, Page, PageRequest};

const API_PREFIX: [&str; 2] = ["api", "v1"];
const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Raw HTTP client for the HR backend.
///
/// Every call returns either the decoded payload or one of the five
/// [`Error`] kinds. Calls are bounded by the configured timeout; expiry
/// is reported as `NetworkUnavailable`. An `Unauthorized` response
/// notifies the registered [`SessionObserver`] and is returned as-is,
/// never retried here. Nothing is cached.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    token: ArcSwapOption<SecretString>,
    observer: ArcSwapOption<Observer>,
}

// `ArcSwapOption` needs a sized payload.
struct Observer(Arc<dyn SessionObserver>);

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://hr.example.com`);
    /// the `/api/v1/` prefix is appended per request.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, BuildError> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, transport.timeout)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, BuildError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BuildError::CannotBeABase {
                url: base_url.to_string(),
            });
        }
        Ok(Self {
            http,
            base_url,
            timeout,
            token: ArcSwapOption::empty(),
            observer: ArcSwapOption::empty(),
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── Credential & session hook ────────────────────────────────────

    /// Install (or replace) the bearer credential.
    pub fn set_token(&self, token: SecretString) {
        debug!("bearer token installed");
        self.token.store(Some(Arc::new(token)));
    }

    /// Drop the bearer credential. Subsequent calls go out unauthenticated.
    pub fn clear_token(&self) {
        self.token.store(None);
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    /// Register the observer notified when the backend rejects the session.
    pub fn set_session_observer(&self, observer: Arc<dyn SessionObserver>) {
        self.observer.store(Some(Arc::new(Observer(observer))));
    }

    fn notify_session_ended(&self, reason: &str) {
        match self.observer.load_full() {
            Some(observer) => observer.0.session_ended(reason),
            None => warn!(reason, "session ended with no observer registered"),
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/v1/{segments...}`, percent-encoding each segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_client` rejects cannot-be-a-base URLs, so this always applies.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resource = segments.join("/");
        self.execute(self.request(Method::GET, url), &resource).await
    }

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        page: PageRequest,
    ) -> Result<Page<T>, Error> {
        let url = self.url(segments);
        debug!("GET {url} page={} limit={}", page.page, page.limit);

        let resource = segments.join("/");
        let builder = self.request(Method::GET, url).query(&page.query());
        let items: Vec<T> = self.execute(builder, &resource).await?;
        trace!(count = items.len(), "page received");

        Ok(Page {
            items,
            page: page.page,
            limit: page.limit,
        })
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
        idempotency_key: Option<&str>,
    ) -> Result<T, Error> {
        self.write(Method::POST, segments, body, idempotency_key)
            .await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
        idempotency_key: Option<&str>,
    ) -> Result<T, Error> {
        self.write(Method::PATCH, segments, body, idempotency_key)
            .await
    }

    async fn write<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        idempotency_key: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("{method} {url}");

        let resource = segments.join("/");
        let mut builder = self.request(method, url).json(body);
        if let Some(key) = idempotency_key {
            builder = builder.header(IDEMPOTENCY_HEADER, key);
        }
        self.execute(builder, &resource).await
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token.load().as_deref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── Response handling ────────────────────────────────────────────

    /// Send, bound by the timeout, classify, and notify on `Unauthorized`.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, Error> {
        let result = self
            .bounded(async {
                let resp = builder.send().await?;
                handle_response(resp, resource).await
            })
            .await;

        if let Err(Error::Unauthorized { ref message }) = result {
            self.notify_session_ended(message);
        }
        result
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::NetworkUnavailable {
                message: format!("request timed out after {}ms", self.timeout.as_millis()),
            }),
        }
    }
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    resource: &str,
) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(parse_error(status.as_u16(), &body, resource));
    }

    decode_payload(status.as_u16(), &body)
}

// ── Pagination helper ────────────────────────────────────────────────

/// Collect every page into a single `Vec<T>`, stopping at the first short page.
pub async fn paginate_all<T, F, Fut>(limit: u32, fetch: F) -> Result<Vec<T>, Error>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, Error>>,
{
    let mut all = Vec::new();
    let mut request = PageRequest::first(limit.max(1));

    loop {
        let page = fetch(request).await?;
        let last = page.is_last();
        all.extend(page.items);
        if last {
            break;
        }
        request.page += 1;
    }

    Ok(all)
}

/// Decode a success body, unwrapping the `{ "data": ... }` envelope when present.
///
/// An empty body decodes as JSON `null`, so `()` and `Option<T>` payloads work
/// for endpoints that answer `204 No Content`.
fn decode_payload<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, Error> {
    let value: serde_json::Value = if body.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(body).map_err(|e| undecodable(status, &e, body))?
    };

    let payload = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| undecodable(status, &e, body))
}

fn undecodable(status: u16, err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Server {
        status,
        message: format!("undecodable response: {err} (body preview: {preview:?})"),
    }
}

fn parse_error(status: u16, raw: &str, resource: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorBody>(raw).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| {
            if raw.is_empty() {
                format!("HTTP {status}")
            } else {
                raw.chars().take(200).collect()
            }
        });

    let mut err = Error::from_status(status, message, resource);
    if let Error::Validation { ref mut fields, .. } = err {
        if let Some(errors) = parsed.and_then(|b| b.errors) {
            for (field, value) in errors {
                let messages = match value {
                    serde_json::Value::String(s) => vec![s],
                    serde_json::Value::Array(items) => items
                        .into_iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect(),
                    other => vec![other.to_string()],
                };
                fields.insert(field, messages);
            }
        }
    }
    err
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn url_appends_prefix_and_encodes_segments() {
        let c = client("https://hr.example.com");
        assert_eq!(
            c.url(&["employees", "emp 1"]).as_str(),
            "https://hr.example.com/api/v1/employees/emp%201"
        );
    }

    #[test]
    fn url_keeps_base_path() {
        let c = client("https://example.com/hr/");
        assert_eq!(
            c.url(&["tasks"]).as_str(),
            "https://example.com/hr/api/v1/tasks"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        let err = ApiClient::with_client(
            reqwest::Client::new(),
            "mailto:hr@example.com",
            Duration::from_secs(1),
        );
        assert!(matches!(err, Err(BuildError::CannotBeABase { .. })));
    }

    #[test]
    fn decode_unwraps_envelope_and_bare_values() {
        let wrapped: Vec<u32> = decode_payload(200, r#"{"data":[1,2],"message":"ok"}"#).unwrap();
        let bare: Vec<u32> = decode_payload(200, "[3]").unwrap();
        let (): () = decode_payload(204, "").unwrap();
        assert_eq!(wrapped, vec![1, 2]);
        assert_eq!(bare, vec![3]);
    }

    #[test]
    fn decode_failure_is_server_error() {
        let err = decode_payload::<Vec<u32>>(200, "<html>").unwrap_err();
        assert!(matches!(err, Error::Server { status: 200, .. }));
    }

    #[test]
    fn validation_fields_accept_strings_and_lists() {
        let err = parse_error(
            422,
            r#"{"message":"invalid","errors":{"endDate":"before start","reason":["too long","bad"]}}"#,
            "leave-requests",
        );
        let Error::Validation { message, fields } = err else {
            panic!("expected validation error");
        };
        assert_eq!(message, "invalid");
        assert_eq!(fields["endDate"], vec!["before start".to_string()]);
        assert_eq!(fields["reason"].len(), 2);
    }

    #[test]
    fn plain_text_error_body_becomes_message() {
        let err = parse_error(500, "upstream exploded", "news");
        assert_eq!(
            err,
            Error::Server {
                status: 500,
                message: "upstream exploded".into()
            }
        );
    }

    #[test]
    fn token_can_be_swapped_and_cleared() {
        let c = client("https://hr.example.com");
        assert!(!c.has_token());
        c.set_token(SecretString::from("abc".to_string()));
        assert!(c.has_token());
        c.clear_token();
        assert!(!c.has_token());
    }
}
