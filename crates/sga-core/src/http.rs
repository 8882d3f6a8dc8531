use anyhow::{
  Context,
  anyhow
};
use reqwest::header::{
  ACCEPT,
  CONTENT_TYPE,
  COOKIE,
  REFERER
};
use sga_shared::{
  ApiEnvelope,
  ApiRequest,
  Method,
  Transport
};
use tracing::{
  debug,
  instrument,
  warn
};

use crate::config::ServerSettings;

pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Talks to the Django server the way
/// the browser pages do: JSON bodies,
/// session and CSRF cookies, and the
/// CSRF header on every POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client:   reqwest::Client,
  settings: ServerSettings
}

impl HttpTransport {
  pub fn new(
    settings: ServerSettings
  ) -> anyhow::Result<Self> {
    let client =
      reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .context(
          "failed building HTTP client"
        )?;
    Ok(Self { client, settings })
  }

  pub fn base_url(&self) -> &str {
    &self.settings.base_url
  }

  fn cookie_header(&self) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(token) =
      self.settings.csrf_token.as_deref()
    {
      parts.push(format!("csrftoken={token}"));
    }
    if let Some(session) =
      self.settings.session_id.as_deref()
    {
      parts.push(format!(
        "sessionid={session}"
      ));
    }
    if parts.is_empty() {
      None
    } else {
      Some(parts.join("; "))
    }
  }
}

impl Transport for HttpTransport {
  #[instrument(
    skip_all,
    fields(
      request_id = %request.request_id,
      method = %request.method()
    )
  )]
  async fn send(
    &self,
    request: &ApiRequest
  ) -> anyhow::Result<ApiEnvelope> {
    let url = request.url(self.base_url());
    debug!(url = %url, "sending request");

    let mut builder = match request.method() {
      | Method::Get => self.client.get(&url),
      | Method::Post => {
        let mut post = self
          .client
          .post(&url)
          .header(
            CONTENT_TYPE,
            "application/json"
          )
          .header(
            REFERER,
            self.base_url()
          );
        if let Some(token) = self
          .settings
          .csrf_token
          .as_deref()
        {
          post = post.header(CSRF_HEADER, token);
        } else {
          warn!(
            "no csrf.token configured; \
             the server will likely \
             reject this POST"
          );
        }
        if let Some(body) =
          request.body_json()
        {
          post = post.body(body);
        }
        post
      }
    };
    builder =
      builder.header(ACCEPT, "application/json");
    if let Some(cookie) = self.cookie_header() {
      builder = builder.header(COOKIE, cookie);
    }

    let response = builder
      .send()
      .await
      .with_context(|| {
        format!("failed requesting {url}")
      })?;
    let status = response.status();
    let body = response
      .text()
      .await
      .with_context(|| {
        format!(
          "failed reading response body \
           from {url}"
        )
      })?;

    // Error statuses still carry the
    // JSON envelope.
    serde_json::from_str::<ApiEnvelope>(&body)
      .map_err(|err| {
        anyhow!(
          "unexpected response from {url} \
           (HTTP {status}): {err}"
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  fn settings() -> ServerSettings {
    ServerSettings {
      base_url:   "http://sga.local"
        .to_string(),
      csrf_token: Some("tok".to_string()),
      session_id: Some("sess".to_string()),
      timeout:    Duration::from_secs(1),
      confirm:    true,
      color:      false
    }
  }

  #[test]
  fn cookie_header_carries_csrf_and_session() {
    let transport =
      HttpTransport::new(settings())
        .expect("client");
    assert_eq!(
      transport.cookie_header().as_deref(),
      Some("csrftoken=tok; sessionid=sess")
    );
  }

  #[test]
  fn anonymous_transport_sends_no_cookie() {
    let transport =
      HttpTransport::new(ServerSettings {
        csrf_token: None,
        session_id: None,
        ..settings()
      })
      .expect("client");
    assert_eq!(transport.cookie_header(), None);
  }
}
