pub mod binder;
pub mod chart;
pub mod client;
pub mod confirm;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod shipping;
pub mod zipcode;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{
  Deserialize,
  Serialize
};
use serde_json::Value;

pub use crate::binder::{
  ModalKind,
  ModalState,
  TriggerAttrs
};
pub use crate::confirm::ConfirmAction;
pub use crate::dispatch::{
  DispatchOutcome,
  Dispatcher,
  RecordPatch,
  Transport
};
pub use crate::endpoint::{
  ApiRequest,
  Endpoint,
  Method
};
pub use crate::error::ValidationError;

pub const TRACKING_CODE_MAX_LEN: usize =
  13;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
pub enum ProcessStatus {
  #[serde(rename = "nao_atribuido")]
  NotAssigned,
  #[serde(rename = "atribuido")]
  Assigned,
  #[serde(rename = "em_separacao")]
  InSeparation,
  #[serde(rename = "pendente")]
  Pending,
  #[serde(rename = "pronto_envio")]
  ReadyToShip,
  #[serde(rename = "em_rota")]
  InTransit,
  #[serde(rename = "nao_entregue")]
  NotDelivered,
  #[serde(rename = "entregue")]
  Delivered,
  #[serde(rename = "cancelado")]
  Cancelled
}

impl ProcessStatus {
  /// Values offered by the status
  /// selector. `Cancelled` is only
  /// reachable through the cancel
  /// action.
  pub const SELECTABLE: [ProcessStatus;
    8] = [
    ProcessStatus::NotAssigned,
    ProcessStatus::Assigned,
    ProcessStatus::InSeparation,
    ProcessStatus::Pending,
    ProcessStatus::ReadyToShip,
    ProcessStatus::InTransit,
    ProcessStatus::NotDelivered,
    ProcessStatus::Delivered
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::NotAssigned => {
        "nao_atribuido"
      }
      | Self::Assigned => "atribuido",
      | Self::InSeparation => {
        "em_separacao"
      }
      | Self::Pending => "pendente",
      | Self::ReadyToShip => {
        "pronto_envio"
      }
      | Self::InTransit => "em_rota",
      | Self::NotDelivered => {
        "nao_entregue"
      }
      | Self::Delivered => "entregue",
      | Self::Cancelled => "cancelado"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::NotAssigned => {
        "Não Atribuído"
      }
      | Self::Assigned => "Atribuído",
      | Self::InSeparation => {
        "Em Separação"
      }
      | Self::Pending => "Pendente",
      | Self::ReadyToShip => {
        "Pronto para Envio"
      }
      | Self::InTransit => {
        "Em Rota de Entrega"
      }
      | Self::NotDelivered => {
        "Não Entregue"
      }
      | Self::Delivered => "Entregue",
      | Self::Cancelled => "Cancelado"
    }
  }

  pub fn badge_class(
    self
  ) -> &'static str {
    match self {
      | Self::InSeparation => {
        "bg-primary-subtle text-primary"
      }
      | Self::Pending => {
        "bg-warning-subtle text-warning"
      }
      | Self::Delivered => {
        "bg-success-subtle text-success"
      }
      | Self::NotDelivered => {
        "bg-danger-subtle text-danger"
      }
      | Self::Cancelled => {
        "bg-dark text-white"
      }
      | _ => {
        "bg-secondary-subtle \
         text-secondary"
      }
    }
  }

  pub fn is_cancelled(self) -> bool {
    matches!(self, Self::Cancelled)
  }
}

impl fmt::Display for ProcessStatus {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ProcessStatus {
  type Err = ValidationError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    ProcessStatus::SELECTABLE
      .iter()
      .chain(std::iter::once(
        &ProcessStatus::Cancelled
      ))
      .copied()
      .find(|status| {
        status.as_str() == wanted
      })
      .ok_or_else(|| {
        ValidationError::UnknownStatus(
          wanted.to_string()
        )
      })
  }
}

/// One row of the "processos do
/// setor" table, as embedded in the
/// page by the server.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ProcessRow {
  pub pk:            u64,
  #[serde(default, rename = "codigo")]
  pub code:          String,
  #[serde(default, rename = "titulo")]
  pub title:         String,
  pub status:        ProcessStatus,
  #[serde(
    default,
    rename = "codigo_rastreio"
  )]
  pub tracking_code: Option<String>,
  #[serde(
    default,
    rename = "comentarios"
  )]
  pub comment_count: u32,
  #[serde(
    default,
    rename = "responsavel"
  )]
  pub assignee:      Option<String>
}

impl ProcessRow {
  pub fn is_cancelled(&self) -> bool {
    self.status.is_cancelled()
  }

  pub fn info_line(&self) -> String {
    format!(
      "{} - {}",
      self.code, self.title
    )
  }

  /// Attributes a row icon exposes to
  /// the modal binder.
  pub fn trigger_attrs(
    &self
  ) -> TriggerAttrs {
    TriggerAttrs {
      pk:            self
        .pk
        .to_string(),
      code:          self.code.clone(),
      title:         self.title.clone(),
      status:        self
        .status
        .as_str()
        .to_string(),
      tracking_code: self
        .tracking_code
        .clone()
        .unwrap_or_default()
    }
  }

  pub fn apply(
    &mut self,
    patch: &RecordPatch
  ) {
    match patch {
      | RecordPatch::Status(status) => {
        self.status = *status;
      }
      | RecordPatch::Tracking(code) => {
        self.tracking_code =
          Some(code.clone());
      }
      | RecordPatch::CommentAdded {
        ..
      } => {
        self.comment_count += 1;
      }
      | RecordPatch::Snapshot(
        snapshot
      ) => self.apply_snapshot(snapshot),
      | RecordPatch::Merged {
        effect,
        snapshot
      } => {
        self.apply(effect);
        self.apply_snapshot(snapshot);
      }
      | RecordPatch::Client(_)
      | RecordPatch::Timeline => {}
    }
  }

  fn apply_snapshot(
    &mut self,
    snapshot: &ProcessSnapshot
  ) {
    if let Some(status) = snapshot.status
    {
      self.status = status;
    }
    if let Some(code) =
      snapshot.tracking_code.as_ref()
    {
      self.tracking_code =
        Some(code.clone());
    }
    if let Some(assignee) =
      snapshot.assignee.as_ref()
    {
      self.assignee =
        Some(assignee.clone());
    }
  }
}

/// Record fields a mutating endpoint
/// may echo back in `data`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct ProcessSnapshot {
  #[serde(default)]
  pub status:        Option<ProcessStatus>,
  #[serde(
    default,
    rename = "codigo_rastreio"
  )]
  pub tracking_code: Option<String>,
  #[serde(
    default,
    rename = "responsavel"
  )]
  pub assignee:      Option<String>
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
  Success,
  Error,
  Info,
  /// Also used when the body has no
  /// `status`, as lookup endpoints do.
  #[default]
  #[serde(other)]
  Unknown
}


/// Response envelope shared by every
/// JSON endpoint.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ApiEnvelope {
  #[serde(default)]
  pub status:  ApiStatus,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub data:    Option<Value>,
  #[serde(flatten)]
  pub extra:   BTreeMap<String, Value>
}

impl ApiEnvelope {
  pub fn success(
    data: Option<Value>
  ) -> Self {
    Self {
      status: ApiStatus::Success,
      message: None,
      data,
      extra: BTreeMap::new()
    }
  }

  pub fn error(message: &str) -> Self {
    Self {
      status:  ApiStatus::Error,
      message: Some(message.to_string()),
      data:    None,
      extra:   BTreeMap::new()
    }
  }

  pub fn info(message: &str) -> Self {
    Self {
      status: ApiStatus::Info,
      ..Self::error(message)
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == ApiStatus::Success
  }

  /// Decodes `data`; `None` when the
  /// field is absent or has another
  /// shape.
  pub fn data_as<T: DeserializeOwned>(
    &self
  ) -> Option<T> {
    self.data.clone().and_then(
      |value| {
        serde_json::from_value(value)
          .ok()
      }
    )
  }

  /// Decodes a top-level field other
  /// than `status`/`message`/`data`.
  pub fn field_as<T: DeserializeOwned>(
    &self,
    key: &str
  ) -> Option<T> {
    self.extra.get(key).cloned().and_then(
      |value| {
        serde_json::from_value(value)
          .ok()
      }
    )
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct StatusPayload {
  pub status: ProcessStatus
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TrackingPayload {
  #[serde(rename = "codigo_rastreio")]
  pub tracking_code: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct CommentPayload {
  #[serde(rename = "texto")]
  pub text:           String,
  #[serde(rename = "encaminhar_gestao")]
  pub forward_to_mgmt: bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct ZipcodeAddress {
  #[serde(default, rename = "logradouro")]
  pub street:   String,
  #[serde(default, rename = "bairro")]
  pub district: String,
  #[serde(default, rename = "cidade")]
  pub city:     String,
  #[serde(default, rename = "estado")]
  pub state:    String,
  #[serde(default)]
  pub cep:      String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ShippingQuote {
  #[serde(rename = "servico")]
  pub service:           String,
  #[serde(rename = "prazo")]
  pub days:              u32,
  #[serde(rename = "preco")]
  pub price:             f64,
  #[serde(rename = "entrega_prevista")]
  pub expected_delivery: String
}

/// Normalizes and checks a tracking
/// code before it is sent.
pub fn validate_tracking_code(
  raw: &str
) -> Result<String, ValidationError> {
  let code = raw.trim().to_uppercase();
  if code.is_empty() {
    return Err(ValidationError::Empty(
      "codigo_rastreio"
    ));
  }
  let len = code.chars().count();
  if len > TRACKING_CODE_MAX_LEN {
    return Err(
      ValidationError::TrackingCodeTooLong {
        len
      }
    );
  }
  Ok(code)
}
