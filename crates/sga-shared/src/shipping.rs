use anyhow::{
  Context,
  anyhow
};

use crate::dispatch::{
  Mutation,
  RecordPatch
};
use crate::endpoint::{
  ApiRequest,
  Endpoint
};
use crate::{
  ApiEnvelope,
  ShippingQuote
};

pub const TIMELINE_TAB: &str = "timeline";
pub const TRACKING_REFRESH_BUSY_LABEL: &str =
  "Verificando...";

pub fn quote_request(pk: u64) -> ApiRequest {
  ApiRequest::post_empty(
    Endpoint::ShippingQuote(pk)
  )
}

pub fn decode_quotes(
  envelope: &ApiEnvelope
) -> anyhow::Result<Vec<ShippingQuote>> {
  if !envelope.is_success() {
    return Err(anyhow!(
      envelope
        .message
        .clone()
        .unwrap_or_else(|| {
          "cotação indisponível".to_string()
        })
    ));
  }
  let data = envelope
    .data
    .clone()
    .ok_or_else(|| {
      anyhow!("cotação sem dados")
    })?;
  serde_json::from_value(data)
    .context("invalid quote list")
}

/// Asks the server to poll the carrier
/// for new tracking events.
pub fn tracking_refresh(pk: u64) -> Mutation {
  Mutation {
    request: ApiRequest::post_empty(
      Endpoint::TrackingUpdate(pk)
    ),
    effect:  RecordPatch::Timeline
  }
}

/// Location of the detail page with the
/// timeline tab selected.
pub fn timeline_location(path: &str) -> String {
  format!("{path}?tab={TIMELINE_TAB}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
  #[default]
  Overview,
  Timeline
}

impl DetailTab {
  /// Reads `tab=` from a query string
  /// such as `?tab=timeline&x=1`.
  pub fn from_query(query: &str) -> Self {
    let wanted = query
      .trim_start_matches('?')
      .split('&')
      .filter_map(|pair| pair.split_once('='))
      .find(|(key, _)| *key == "tab")
      .map(|(_, value)| value);
    match wanted {
      | Some(TIMELINE_TAB) => Self::Timeline,
      | _ => Self::Overview
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn quotes_decode_from_data() {
    let envelope = ApiEnvelope::success(Some(
      json!([{
        "servico": "SEDEX",
        "prazo": 2,
        "preco": 45.9,
        "entrega_prevista": "2026-10-21"
      }])
    ));
    let quotes =
      decode_quotes(&envelope).expect("quotes");
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].service, "SEDEX");
    assert_eq!(quotes[0].days, 2);
  }

  #[test]
  fn failed_quote_surfaces_the_server_message() {
    let err = decode_quotes(&ApiEnvelope::error(
      "CEP de destino inválido"
    ))
    .expect_err("error envelope");
    assert_eq!(
      err.to_string(),
      "CEP de destino inválido"
    );
  }

  #[test]
  fn timeline_tab_is_read_from_the_query() {
    assert_eq!(
      DetailTab::from_query("?tab=timeline"),
      DetailTab::Timeline
    );
    assert_eq!(
      DetailTab::from_query("?x=1&tab=anexos"),
      DetailTab::Overview
    );
    assert_eq!(
      timeline_location("/processos/7/"),
      "/processos/7/?tab=timeline"
    );
  }
}
