//! CEP (postal code) autocomplete.

use tracing::{
  debug,
  warn
};

use crate::ZipcodeAddress;
use crate::dispatch::Transport;
use crate::endpoint::{
  ApiRequest,
  Endpoint
};
use crate::{
  ApiEnvelope,
  ApiStatus
};

pub const ZIPCODE_LEN: usize = 8;

pub fn normalize_zipcode(raw: &str) -> String {
  raw
    .chars()
    .filter(char::is_ascii_digit)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZipcodeState {
  /// Nothing typed yet.
  #[default]
  Idle,
  /// Typed since the last lookup.
  Editing,
  Loading,
  Valid(ZipcodeAddress),
  Incomplete,
  NotFound,
  ConnectionError
}

impl ZipcodeState {
  pub fn input_class(&self) -> &'static str {
    match self {
      | Self::Valid(_) => "is-valid",
      | Self::Incomplete | Self::NotFound => {
        "is-invalid"
      }
      | _ => ""
    }
  }

  pub fn status_text(
    &self
  ) -> Option<&'static str> {
    match self {
      | Self::Idle | Self::Editing => None,
      | Self::Loading => {
        Some("Validando CEP...")
      }
      | Self::Valid(_) => Some("CEP Válido"),
      | Self::Incomplete => Some(
        "CEP incompleto (deve ter 8 \
         dígitos)."
      ),
      | Self::NotFound => {
        Some("CEP não encontrado.")
      }
      | Self::ConnectionError => {
        Some("Erro de conexão.")
      }
    }
  }

  pub fn submit_enabled(&self) -> bool {
    matches!(self, Self::Idle | Self::Valid(_))
  }

  pub fn is_invalid(&self) -> bool {
    self.input_class() == "is-invalid"
  }

  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Loading)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlurAction {
  Ignore,
  Reject(ZipcodeState),
  Lookup(ApiRequest)
}

/// Empty input is left to the form's
/// required check.
pub fn on_blur(raw: &str) -> BlurAction {
  let cep = normalize_zipcode(raw);
  if cep.is_empty() {
    return BlurAction::Ignore;
  }
  if cep.len() != ZIPCODE_LEN {
    debug!(len = cep.len(), "incomplete zipcode");
    return BlurAction::Reject(
      ZipcodeState::Incomplete
    );
  }
  BlurAction::Lookup(ApiRequest::get(
    Endpoint::ZipcodeLookup,
    [("cep", cep)]
  ))
}

pub fn on_response(
  envelope: &ApiEnvelope
) -> ZipcodeState {
  if envelope.status == ApiStatus::Success
    && let Some(address) =
      envelope.data_as::<ZipcodeAddress>()
  {
    return ZipcodeState::Valid(address);
  }
  ZipcodeState::NotFound
}

/// Runs the blur step end to end.
/// `None` means the blur was ignored.
pub async fn lookup_zipcode<T: Transport>(
  transport: &T,
  raw: &str
) -> Option<ZipcodeState> {
  let request = match on_blur(raw) {
    | BlurAction::Ignore => return None,
    | BlurAction::Reject(state) => {
      return Some(state);
    }
    | BlurAction::Lookup(request) => request
  };
  let state = match transport.send(&request).await
  {
    | Ok(envelope) => on_response(&envelope),
    | Err(err) => {
      warn!(error = %format!("{err:#}"), "zipcode lookup failed");
      ZipcodeState::ConnectionError
    }
  };
  Some(state)
}

/// Address inputs filled by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressFields {
  pub street:   String,
  pub district: String,
  pub city:     String,
  pub state:    String
}

impl AddressFields {
  pub fn apply(
    &mut self,
    lookup: &ZipcodeState
  ) {
    match lookup {
      | ZipcodeState::Valid(address) => {
        self.street = address.street.clone();
        self.district =
          address.district.clone();
        self.city = address.city.clone();
        self.state = address.state.clone();
      }
      | ZipcodeState::NotFound => {
        *self = Self::default();
      }
      | _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::dispatch::testing::ScriptedTransport;

  fn sao_paulo() -> ZipcodeAddress {
    ZipcodeAddress {
      street:   "Praça da Sé".to_string(),
      district: "Sé".to_string(),
      city:     "São Paulo".to_string(),
      state:    "SP".to_string(),
      cep:      "01001-000".to_string()
    }
  }

  #[tokio::test]
  async fn found_zipcode_fills_fields_and_marks_valid() {
    let transport =
      ScriptedTransport::replying(vec![Some(
        ApiEnvelope::success(Some(json!({
          "logradouro": "Praça da Sé",
          "bairro": "Sé",
          "cidade": "São Paulo",
          "estado": "SP",
          "cep": "01001-000"
        })))
      )]);

    let state =
      lookup_zipcode(&transport, "01001000")
        .await
        .expect("lookup ran");

    assert_eq!(
      transport.sent.borrow()[0]
        .path_and_query(),
      "/correios/api/consulta-cep/?cep=01001000"
    );
    assert_eq!(
      state,
      ZipcodeState::Valid(sao_paulo())
    );
    assert_eq!(state.input_class(), "is-valid");
    assert!(state.submit_enabled());

    let mut fields = AddressFields::default();
    fields.apply(&state);
    assert_eq!(fields.street, "Praça da Sé");
    assert_eq!(fields.district, "Sé");
    assert_eq!(fields.city, "São Paulo");
    assert_eq!(fields.state, "SP");
  }

  #[tokio::test]
  async fn unknown_zipcode_clears_fields_and_marks_invalid()
   {
    let transport =
      ScriptedTransport::replying(vec![Some(
        ApiEnvelope::error("CEP não encontrado.")
      )]);

    let state =
      lookup_zipcode(&transport, "99999-999")
        .await
        .expect("lookup ran");

    assert_eq!(state, ZipcodeState::NotFound);
    assert_eq!(state.input_class(), "is-invalid");
    assert!(!state.submit_enabled());

    let mut fields = AddressFields {
      street: "antiga".to_string(),
      ..AddressFields::default()
    };
    fields.apply(&state);
    assert_eq!(fields, AddressFields::default());
  }

  #[tokio::test]
  async fn short_or_empty_input_never_hits_the_network() {
    let transport =
      ScriptedTransport::default();

    assert_eq!(
      lookup_zipcode(&transport, "").await,
      None
    );
    assert_eq!(
      lookup_zipcode(&transport, "0100-10").await,
      Some(ZipcodeState::Incomplete)
    );
    assert!(transport.sent.borrow().is_empty());
  }

  #[tokio::test]
  async fn connection_failure_leaves_fields_alone() {
    let transport =
      ScriptedTransport::replying(vec![None]);
    let state =
      lookup_zipcode(&transport, "01001000")
        .await
        .expect("lookup ran");
    assert_eq!(
      state,
      ZipcodeState::ConnectionError
    );
    assert_eq!(state.input_class(), "");
    assert!(!state.submit_enabled());
  }
}
