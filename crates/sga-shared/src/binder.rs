//! View-model for the three row modals
//! (status, tracking code, comment).
//!
//! A `ModalState` is built from the
//! trigger's `data-processo-*`
//! attributes right before the modal
//! shows, edited in place, and consumed
//! by `save` when the user
//! saves. The target pk travels inside
//! the state, so a save can only ever
//! address the record its modal was
//! opened for.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::dispatch::{
  Mutation,
  RecordPatch
};
use crate::endpoint::{
  ApiRequest,
  Endpoint
};
use crate::error::ValidationError;
use crate::{
  CommentPayload,
  ProcessStatus,
  StatusPayload,
  TrackingPayload,
  validate_tracking_code
};

pub const ATTR_PK: &str =
  "data-processo-pk";
pub const ATTR_CODE: &str =
  "data-processo-id";
pub const ATTR_TITLE: &str =
  "data-processo-titulo";
pub const ATTR_STATUS: &str =
  "data-processo-status";
pub const ATTR_TRACKING: &str =
  "data-processo-rastreio";

pub const BOUND_ATTRIBUTES: [&str; 5] = [
  ATTR_PK,
  ATTR_CODE,
  ATTR_TITLE,
  ATTR_STATUS,
  ATTR_TRACKING
];

/// Attributes read from the control
/// that opened a modal. Absent
/// attributes are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerAttrs {
  pub pk:            String,
  pub code:          String,
  pub title:         String,
  pub status:        String,
  pub tracking_code: String
}

impl TriggerAttrs {
  pub fn from_attributes<I, K, V>(
    attrs: I
  ) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>
  {
    let mut map: BTreeMap<String, String> =
      attrs
        .into_iter()
        .map(|(k, v)| {
          (k.as_ref().to_string(), v.into())
        })
        .collect();
    let mut take = |key: &str| {
      map.remove(key).unwrap_or_default()
    };
    Self {
      pk:            take(ATTR_PK),
      code:          take(ATTR_CODE),
      title:         take(ATTR_TITLE),
      status:        take(ATTR_STATUS),
      tracking_code: take(ATTR_TRACKING)
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
  Status,
  Tracking,
  Comment
}

impl ModalKind {
  pub const ALL: [ModalKind; 3] = [
    ModalKind::Status,
    ModalKind::Tracking,
    ModalKind::Comment
  ];

  /// DOM id of the modal element.
  pub fn element_id(self) -> &'static str {
    match self {
      | ModalKind::Status => {
        "modalAlterarStatus"
      }
      | ModalKind::Tracking => {
        "modalCodigoRastreio"
      }
      | ModalKind::Comment => {
        "modalAddComentario"
      }
    }
  }

  pub fn heading(self) -> &'static str {
    match self {
      | ModalKind::Status => {
        "Alterar Status"
      }
      | ModalKind::Tracking => {
        "Código de Rastreio"
      }
      | ModalKind::Comment => {
        "Adicionar Comentário"
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
  pub kind:            ModalKind,
  pub target:          String,
  pub info:            String,
  pub status:          String,
  pub tracking_code:   String,
  pub comment:         String,
  pub forward_to_mgmt: bool,
  pub error:           Option<String>
}

impl ModalState {
  /// Populates the modal from its
  /// trigger. Transient fields start
  /// empty every time.
  pub fn bind(
    kind: ModalKind,
    attrs: &TriggerAttrs
  ) -> Self {
    debug!(
      ?kind,
      target = %attrs.pk,
      "binding modal to trigger"
    );
    Self {
      kind,
      target: attrs.pk.clone(),
      info: format!(
        "{} - {}",
        attrs.code, attrs.title
      ),
      status: attrs.status.clone(),
      tracking_code: attrs
        .tracking_code
        .clone(),
      comment: String::new(),
      forward_to_mgmt: false,
      error: None
    }
  }

  pub fn target_pk(
    &self
  ) -> Result<u64, ValidationError> {
    let raw = self.target.trim();
    if raw.is_empty() {
      return Err(
        ValidationError::MissingTarget
      );
    }
    raw.parse::<u64>().map_err(|_| {
      ValidationError::InvalidTarget(
        raw.to_string()
      )
    })
  }

  /// Builds the mutation for the current
  /// field values, together with the
  /// patch it implies for the row.
  pub fn save(
    &self
  ) -> Result<Mutation, ValidationError> {
    let pk = self.target_pk()?;
    let mutation = match self.kind {
      | ModalKind::Status => {
        if self.status.trim().is_empty() {
          return Err(
            ValidationError::Empty("status")
          );
        }
        let status: ProcessStatus =
          self.status.parse()?;
        Mutation {
          request: ApiRequest::post(
            Endpoint::ProcessStatus(pk),
            json!(StatusPayload { status })
          ),
          effect:  RecordPatch::Status(status)
        }
      }
      | ModalKind::Tracking => {
        let tracking_code =
          validate_tracking_code(
            &self.tracking_code
          )?;
        Mutation {
          request: ApiRequest::post(
            Endpoint::ProcessTracking(pk),
            json!(TrackingPayload {
              tracking_code: tracking_code
                .clone()
            })
          ),
          effect:  RecordPatch::Tracking(
            tracking_code
          )
        }
      }
      | ModalKind::Comment => {
        let text = self.comment.trim();
        if text.is_empty() {
          return Err(
            ValidationError::Empty("texto")
          );
        }
        Mutation {
          request: ApiRequest::post(
            Endpoint::ProcessComment(pk),
            json!(CommentPayload {
              text:            text
                .to_string(),
              forward_to_mgmt: self
                .forward_to_mgmt
            })
          ),
          effect:  RecordPatch::CommentAdded {
            forwarded: self.forward_to_mgmt
          }
        }
      }
    };
    Ok(mutation)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn attrs(
    pairs: &[(&str, &str)]
  ) -> TriggerAttrs {
    TriggerAttrs::from_attributes(
      pairs
        .iter()
        .map(|(k, v)| (*k, v.to_string()))
    )
  }

  #[test]
  fn binding_copies_every_attribute_for_all_modal_kinds()
   {
    let trigger = attrs(&[
      (ATTR_PK, "42"),
      (ATTR_CODE, "PRC-2025-0042"),
      (ATTR_TITLE, "Amostras de solo"),
      (ATTR_STATUS, "pendente"),
      (ATTR_TRACKING, "AB123456789BR")
    ]);
    for kind in ModalKind::ALL {
      let state =
        ModalState::bind(kind, &trigger);
      assert_eq!(state.target, "42");
      assert_eq!(
        state.info,
        "PRC-2025-0042 - Amostras de solo"
      );
      assert_eq!(state.status, "pendente");
      assert_eq!(
        state.tracking_code,
        "AB123456789BR"
      );
      assert_eq!(state.comment, "");
      assert!(!state.forward_to_mgmt);
    }
  }

  #[test]
  fn missing_attributes_bind_as_empty_strings() {
    let state = ModalState::bind(
      ModalKind::Tracking,
      &attrs(&[(ATTR_PK, "3")])
    );
    assert_eq!(state.tracking_code, "");
    assert_eq!(state.status, "");
    assert_eq!(state.info, " - ");
  }

  #[test]
  fn rebinding_resets_transient_comment_fields() {
    let trigger = attrs(&[(ATTR_PK, "8")]);
    let mut state = ModalState::bind(
      ModalKind::Comment,
      &trigger
    );
    state.comment = "rascunho".to_string();
    state.forward_to_mgmt = true;

    let state = ModalState::bind(
      ModalKind::Comment,
      &trigger
    );
    assert_eq!(state.comment, "");
    assert!(!state.forward_to_mgmt);
  }

  #[test]
  fn status_modal_posts_new_value_to_its_record() {
    let mut state = ModalState::bind(
      ModalKind::Status,
      &attrs(&[
        (ATTR_PK, "42"),
        (ATTR_STATUS, "pendente")
      ])
    );
    assert_eq!(state.status, "pendente");
    state.status = "pronto_envio".to_string();

    let mutation =
      state.save().expect("valid status save");
    let request = mutation.request;
    assert_eq!(
      request.path(),
      "/processos/api/processo/42/status/"
    );
    assert_eq!(
      request.body,
      Some(json!({"status": "pronto_envio"}))
    );
    assert_eq!(
      mutation.effect,
      RecordPatch::Status(
        ProcessStatus::ReadyToShip
      )
    );
  }

  #[test]
  fn status_modal_without_a_choice_names_the_field() {
    let state = ModalState::bind(
      ModalKind::Status,
      &attrs(&[(ATTR_PK, "42")])
    );
    assert_eq!(state.status, "");
    assert_eq!(
      state.save(),
      Err(ValidationError::Empty("status"))
    );
  }

  #[test]
  fn comment_modal_sends_text_and_forward_flag() {
    let mut state = ModalState::bind(
      ModalKind::Comment,
      &attrs(&[(ATTR_PK, "11")])
    );
    state.comment = "  aguardando NF  ".to_string();
    state.forward_to_mgmt = true;

    let mutation =
      state.save().expect("valid");
    assert_eq!(
      mutation.request.body,
      Some(json!({
        "texto": "aguardando NF",
        "encaminhar_gestao": true
      }))
    );
  }

  #[test]
  fn invalid_fields_never_build_a_request() {
    let no_target = ModalState::bind(
      ModalKind::Status,
      &attrs(&[(ATTR_STATUS, "pendente")])
    );
    assert_eq!(
      no_target.save(),
      Err(ValidationError::MissingTarget)
    );

    let empty_comment = ModalState::bind(
      ModalKind::Comment,
      &attrs(&[(ATTR_PK, "1")])
    );
    assert_eq!(
      empty_comment.save(),
      Err(ValidationError::Empty("texto"))
    );

    let bad_status = ModalState::bind(
      ModalKind::Status,
      &attrs(&[
        (ATTR_PK, "1"),
        (ATTR_STATUS, "sumido")
      ])
    );
    assert_eq!(
      bad_status.save(),
      Err(ValidationError::UnknownStatus(
        "sumido".to_string()
      ))
    );
  }
}
