use std::fmt;

use serde_json::{
  Value,
  json
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post
}

impl fmt::Display for Method {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Method::Get => f.write_str("GET"),
      | Method::Post => f.write_str("POST")
    }
  }
}

/// Server routes the client talks to.
/// Record-scoped routes carry the pk
/// that is substituted into their
/// template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
  ProcessStatus(u64),
  ProcessTracking(u64),
  ProcessComment(u64),
  ProcessAssign(u64),
  ProcessCancel(u64),
  EditClient(u64),
  CreateClient,
  ClientSearch,
  ZipcodeLookup,
  ShippingQuote(u64),
  TrackingUpdate(u64)
}

impl Endpoint {
  pub fn template(&self) -> &'static str {
    match self {
      | Endpoint::ProcessStatus(_) => {
        "/processos/api/processo/{id}/status/"
      }
      | Endpoint::ProcessTracking(_) => {
        "/processos/api/processo/{id}/rastreio/"
      }
      | Endpoint::ProcessComment(_) => {
        "/processos/api/processo/{id}/comentario/"
      }
      | Endpoint::ProcessAssign(_) => {
        "/processos/api/processo/{id}/atribuir/"
      }
      | Endpoint::ProcessCancel(_) => {
        "/processos/api/processo/{id}/cancelar/"
      }
      | Endpoint::EditClient(_) => {
        "/processos/api/editar-cliente/{id}/"
      }
      | Endpoint::CreateClient => {
        "/processos/api/criar-cliente/"
      }
      | Endpoint::ClientSearch => {
        "/processos/api/buscar-clientes/"
      }
      | Endpoint::ZipcodeLookup => {
        "/correios/api/consulta-cep/"
      }
      | Endpoint::ShippingQuote(_) => {
        "/correios/api/cotacao/{id}/"
      }
      | Endpoint::TrackingUpdate(_) => {
        "/correios/api/tracking/update/{id}/"
      }
    }
  }

  pub fn record_id(&self) -> Option<u64> {
    match *self {
      | Endpoint::ProcessStatus(id)
      | Endpoint::ProcessTracking(id)
      | Endpoint::ProcessComment(id)
      | Endpoint::ProcessAssign(id)
      | Endpoint::ProcessCancel(id)
      | Endpoint::EditClient(id)
      | Endpoint::ShippingQuote(id)
      | Endpoint::TrackingUpdate(id) => {
        Some(id)
      }
      | Endpoint::CreateClient
      | Endpoint::ClientSearch
      | Endpoint::ZipcodeLookup => None
    }
  }

  pub fn method(&self) -> Method {
    match self {
      | Endpoint::ClientSearch
      | Endpoint::ZipcodeLookup => {
        Method::Get
      }
      | _ => Method::Post
    }
  }

  pub fn path(&self) -> String {
    let template = self.template();
    match self.record_id() {
      | Some(id) => template
        .replace("{id}", &id.to_string()),
      | None => template.to_string()
    }
  }
}

/// One fully-built request, ready for
/// a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub request_id: Uuid,
  pub endpoint:   Endpoint,
  pub query:      Vec<(String, String)>,
  pub body:       Option<Value>
}

impl ApiRequest {
  pub fn post(
    endpoint: Endpoint,
    body: Value
  ) -> Self {
    Self {
      request_id: Uuid::new_v4(),
      endpoint,
      query: Vec::new(),
      body: Some(body)
    }
  }

  /// POST with an empty JSON object;
  /// the pk in the path is the whole
  /// request.
  pub fn post_empty(
    endpoint: Endpoint
  ) -> Self {
    Self::post(endpoint, json!({}))
  }

  pub fn get<K, V, I>(
    endpoint: Endpoint,
    query: I
  ) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>
  {
    Self {
      request_id: Uuid::new_v4(),
      endpoint,
      query: query
        .into_iter()
        .map(|(k, v)| {
          (k.into(), v.into())
        })
        .collect(),
      body: None
    }
  }

  pub fn method(&self) -> Method {
    self.endpoint.method()
  }

  pub fn path(&self) -> String {
    self.endpoint.path()
  }

  pub fn path_and_query(&self) -> String {
    let mut out = self.path();
    for (idx, (key, value)) in
      self.query.iter().enumerate()
    {
      out.push(if idx == 0 {
        '?'
      } else {
        '&'
      });
      out.push_str(&urlencoding::encode(
        key
      ));
      out.push('=');
      out.push_str(&urlencoding::encode(
        value
      ));
    }
    out
  }

  pub fn url(&self, base: &str) -> String {
    format!(
      "{}{}",
      base.trim_end_matches('/'),
      self.path_and_query()
    )
  }

  pub fn body_json(&self) -> Option<String> {
    self.body.as_ref().map(Value::to_string)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn record_routes_substitute_the_pk() {
    assert_eq!(
      Endpoint::ProcessStatus(42).path(),
      "/processos/api/processo/42/status/"
    );
    assert_eq!(
      Endpoint::EditClient(9).path(),
      "/processos/api/editar-cliente/9/"
    );
    assert_eq!(
      Endpoint::TrackingUpdate(3).path(),
      "/correios/api/tracking/update/3/"
    );
    assert_eq!(
      Endpoint::ZipcodeLookup.method(),
      Method::Get
    );
    assert_eq!(
      Endpoint::ProcessCancel(1).method(),
      Method::Post
    );
    assert_eq!(
      Endpoint::CreateClient.path(),
      "/processos/api/criar-cliente/"
    );
    assert_eq!(
      Endpoint::CreateClient.method(),
      Method::Post
    );
  }

  #[test]
  fn query_values_are_percent_encoded() {
    let request = ApiRequest::get(
      Endpoint::ClientSearch,
      [("term", "São Paulo")]
    );
    assert_eq!(
      request.url("http://sga.local/"),
      "http://sga.local/processos/api/buscar-clientes/?term=S%C3%A3o%20Paulo"
    );
    assert_eq!(request.body_json(), None);
  }

  #[test]
  fn empty_post_sends_an_empty_object() {
    let request = ApiRequest::post_empty(
      Endpoint::ProcessAssign(5)
    );
    assert_eq!(
      request.body_json().as_deref(),
      Some("{}")
    );
  }
}
