use anyhow::{Context, anyhow};
use gloo::net::http::Request;
use sga_shared::{ApiEnvelope, ApiRequest, Method, Transport};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Same-origin fetch transport; the session cookie rides along with the
/// browser's default credentials policy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchTransport {
    csrf_token: Option<String>,
}

impl FetchTransport {
    pub fn from_page() -> Self {
        Self {
            csrf_token: read_csrf_token(),
        }
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: &ApiRequest) -> anyhow::Result<ApiEnvelope> {
        let url = request.path_and_query();
        let pending = match request.method() {
            Method::Get => Request::get(&url)
                .header("Accept", "application/json")
                .build(),
            Method::Post => {
                let mut builder = Request::post(&url)
                    .header("Accept", "application/json")
                    .header("Content-Type", "application/json");
                if let Some(token) = self.csrf_token.as_deref() {
                    builder = builder.header(CSRF_HEADER, token);
                } else {
                    tracing::warn!("no csrf token on the page");
                }
                builder.body(request.body_json().unwrap_or_else(|| "{}".to_string()))
            }
        }
        .map_err(|err| anyhow!("failed building request for {url}: {err}"))?;

        let response = pending
            .send()
            .await
            .map_err(|err| anyhow!("fetch {url} failed: {err}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| anyhow!("reading {url} failed: {err}"))?;
        serde_json::from_str(&body)
            .with_context(|| format!("unexpected response from {url} (HTTP {status})"))
    }
}

pub fn read_csrf_token() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let selector = format!("[name={CSRF_FIELD}]");
    let input = document
        .query_selector(&selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlInputElement>()
        .ok()?;
    let value = input.value();
    if value.is_empty() { None } else { Some(value) }
}
