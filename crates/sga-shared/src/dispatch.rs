use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{
  AtomicBool,
  Ordering
};

use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::client::ClientForm;
use crate::endpoint::ApiRequest;
use crate::{
  ApiEnvelope,
  ApiStatus,
  ProcessSnapshot,
  ProcessStatus
};

pub const UNKNOWN_ERROR_MESSAGE: &str =
  "Erro desconhecido";
pub const CONNECTION_ERROR_MESSAGE: &str =
  "Erro de conexão com o servidor.";

/// Carries requests to the server and
/// decodes the JSON envelope. The web
/// frontend implements it over `fetch`,
/// the CLI over reqwest.
pub trait Transport {
  fn send(
    &self,
    request: &ApiRequest
  ) -> impl Future<Output = anyhow::Result<ApiEnvelope>>;
}

/// Local effect of a successful
/// mutation on the view-model.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPatch {
  Status(ProcessStatus),
  Tracking(String),
  CommentAdded { forwarded: bool },
  Snapshot(ProcessSnapshot),
  /// Local effect first, then the
  /// fields the server echoed.
  Merged {
    effect:   Box<RecordPatch>,
    snapshot: ProcessSnapshot
  },
  Client(ClientForm),
  Timeline
}

/// A request paired with the patch to
/// apply once the server accepts it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
  pub request: ApiRequest,
  pub effect:  RecordPatch
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
  Applied {
    record:  Option<u64>,
    patch:   RecordPatch,
    message: Option<String>
  },
  Info(String),
  Rejected(String),
  ConnectionFailed,
  Busy
}

impl DispatchOutcome {
  pub fn is_applied(&self) -> bool {
    matches!(self, Self::Applied { .. })
  }

  /// Text for the blocking alert, if
  /// the outcome needs one.
  pub fn alert_text(
    &self
  ) -> Option<String> {
    match self {
      | Self::Info(message)
      | Self::Rejected(message) => {
        Some(message.clone())
      }
      | Self::ConnectionFailed => Some(
        CONNECTION_ERROR_MESSAGE
          .to_string()
      ),
      | Self::Applied { .. }
      | Self::Busy => None
    }
  }
}

/// Issues mutations one at a time.
/// Clones share the in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
  in_flight: Arc<AtomicBool>
}

struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

impl Dispatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_busy(&self) -> bool {
    self.in_flight.load(Ordering::Acquire)
  }

  fn acquire(&self) -> Option<InFlight> {
    self
      .in_flight
      .compare_exchange(
        false,
        true,
        Ordering::AcqRel,
        Ordering::Acquire
      )
      .ok()
      .map(|_| {
        InFlight(self.in_flight.clone())
      })
  }

  #[tracing::instrument(
    skip_all,
    fields(
      request_id = %mutation.request.request_id,
      path = %mutation.request.path()
    )
  )]
  pub async fn dispatch<T: Transport>(
    &self,
    transport: &T,
    mutation: Mutation
  ) -> DispatchOutcome {
    let Some(_guard) = self.acquire() else {
      warn!(
        "request already in flight; \
         ignoring duplicate dispatch"
      );
      return DispatchOutcome::Busy;
    };

    let Mutation { request, effect } =
      mutation;
    info!(
      method = %request.method(),
      "dispatching mutation"
    );

    let envelope =
      match transport.send(&request).await {
        | Ok(envelope) => envelope,
        | Err(err) => {
          error!(error = %format!("{err:#}"), "request failed");
          return DispatchOutcome::ConnectionFailed;
        }
      };

    outcome_from_envelope(
      request.endpoint.record_id(),
      effect,
      envelope
    )
  }
}

pub(crate) fn outcome_from_envelope(
  record: Option<u64>,
  effect: RecordPatch,
  envelope: ApiEnvelope
) -> DispatchOutcome {
  match envelope.status {
    | ApiStatus::Success => {
      let patch =
        resolve_patch(effect, &envelope);
      debug!(?patch, "mutation applied");
      DispatchOutcome::Applied {
        record,
        patch,
        message: envelope.message
      }
    }
    | ApiStatus::Info => {
      let message =
        envelope.message.unwrap_or_default();
      info!(message = %message, "server reported no change");
      DispatchOutcome::Info(message)
    }
    | ApiStatus::Error
    | ApiStatus::Unknown => {
      let message =
        envelope.message.unwrap_or_else(
          || UNKNOWN_ERROR_MESSAGE.to_string()
        );
      warn!(status = ?envelope.status, message = %message, "server rejected mutation");
      DispatchOutcome::Rejected(message)
    }
  }
}

/// Fields the server echoes win over the
/// locally expected effect; fields it
/// leaves out keep that effect.
fn resolve_patch(
  effect: RecordPatch,
  envelope: &ApiEnvelope
) -> RecordPatch {
  match effect {
    | RecordPatch::Client(form) => envelope
      .field_as::<ClientForm>("cliente")
      .map(RecordPatch::Client)
      .unwrap_or(RecordPatch::Client(form)),
    | RecordPatch::Timeline => {
      RecordPatch::Timeline
    }
    | other => match envelope
      .data_as::<ProcessSnapshot>()
      .filter(|snapshot| {
        *snapshot != ProcessSnapshot::default()
      }) {
      | Some(snapshot) => {
        RecordPatch::Merged {
          effect: Box::new(other),
          snapshot
        }
      }
      | None => other
    }
  }
}
