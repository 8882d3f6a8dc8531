use tracing::info;

use crate::ProcessStatus;
use crate::dispatch::{
  DispatchOutcome,
  Dispatcher,
  Mutation,
  RecordPatch,
  Transport
};
use crate::endpoint::{
  ApiRequest,
  Endpoint
};

/// Blocking yes/no question shown
/// before an inline action runs.
pub trait Prompt {
  fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
  Assign,
  Cancel,
  Reactivate
}

impl ConfirmAction {
  /// The cancel endpoint toggles, so
  /// the action depends on the row's
  /// current state.
  pub fn cancel_toggle(
    currently_cancelled: bool
  ) -> Self {
    if currently_cancelled {
      Self::Reactivate
    } else {
      Self::Cancel
    }
  }

  pub fn prompt(self) -> &'static str {
    match self {
      | Self::Assign => {
        "Deseja assumir a responsabilidade \
         por este processo?"
      }
      | Self::Cancel => {
        "Tem certeza que deseja CANCELAR \
         este processo?\n\nNinguém poderá \
         mais alterá-lo ou adicionar \
         anexos."
      }
      | Self::Reactivate => {
        "Deseja REATIVAR este \
         processo?\n\nEle voltará para a \
         fila 'Não Atribuído' e ficará \
         disponível para separação."
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Assign => "Assumir",
      | Self::Cancel => "Cancelar",
      | Self::Reactivate => "Reativar"
    }
  }

  pub fn endpoint(
    self,
    pk: u64
  ) -> Endpoint {
    match self {
      | Self::Assign => {
        Endpoint::ProcessAssign(pk)
      }
      | Self::Cancel | Self::Reactivate => {
        Endpoint::ProcessCancel(pk)
      }
    }
  }

  pub fn effect(self) -> RecordPatch {
    RecordPatch::Status(match self {
      | Self::Assign => {
        ProcessStatus::Assigned
      }
      | Self::Cancel => {
        ProcessStatus::Cancelled
      }
      | Self::Reactivate => {
        ProcessStatus::NotAssigned
      }
    })
  }

  pub fn mutation(
    self,
    pk: u64
  ) -> Mutation {
    Mutation {
      request: ApiRequest::post_empty(
        self.endpoint(pk)
      ),
      effect:  self.effect()
    }
  }
}

/// Asks first; a declined prompt sends
/// nothing and yields `None`.
pub async fn run_confirmed<P, T>(
  prompt: &P,
  dispatcher: &Dispatcher,
  transport: &T,
  action: ConfirmAction,
  pk: u64
) -> Option<DispatchOutcome>
where
  P: Prompt,
  T: Transport
{
  if !prompt.confirm(action.prompt()) {
    info!(?action, pk, "inline action declined");
    return None;
  }
  Some(
    dispatcher
      .dispatch(
        transport,
        action.mutation(pk)
      )
      .await
  )
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use serde_json::json;

  use super::*;
  use crate::ApiEnvelope;
  use crate::dispatch::testing::ScriptedTransport;

  struct Answer {
    yes:   bool,
    asked: RefCell<Vec<String>>
  }

  impl Answer {
    fn new(yes: bool) -> Self {
      Self {
        yes,
        asked: RefCell::new(Vec::new())
      }
    }
  }

  impl Prompt for Answer {
    fn confirm(
      &self,
      message: &str
    ) -> bool {
      self
        .asked
        .borrow_mut()
        .push(message.to_string());
      self.yes
    }
  }

  #[tokio::test]
  async fn declining_cancel_issues_no_request() {
    let transport =
      ScriptedTransport::default();
    let prompt = Answer::new(false);

    let outcome = run_confirmed(
      &prompt,
      &Dispatcher::new(),
      &transport,
      ConfirmAction::Cancel,
      12
    )
    .await;

    assert_eq!(outcome, None);
    assert!(transport.sent.borrow().is_empty());
    assert_eq!(
      prompt.asked.borrow().as_slice(),
      [ConfirmAction::Cancel
        .prompt()
        .to_string()]
    );
  }

  #[tokio::test]
  async fn accepted_assign_posts_empty_body_to_record_path()
   {
    let transport =
      ScriptedTransport::replying(vec![Some(
        ApiEnvelope::success(None)
      )]);

    let outcome = run_confirmed(
      &Answer::new(true),
      &Dispatcher::new(),
      &transport,
      ConfirmAction::Assign,
      12
    )
    .await
    .expect("prompt accepted");

    assert_eq!(
      outcome,
      DispatchOutcome::Applied {
        record:  Some(12),
        patch:   RecordPatch::Status(
          ProcessStatus::Assigned
        ),
        message: None
      }
    );
    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(
      sent[0].path(),
      "/processos/api/processo/12/atribuir/"
    );
    assert_eq!(sent[0].body, Some(json!({})));
  }

  #[test]
  fn cancel_toggle_picks_reactivate_for_cancelled_rows() {
    assert_eq!(
      ConfirmAction::cancel_toggle(true),
      ConfirmAction::Reactivate
    );
    assert_eq!(
      ConfirmAction::Reactivate
        .endpoint(4)
        .path(),
      "/processos/api/processo/4/cancelar/"
    );
    assert_eq!(
      ConfirmAction::Reactivate.effect(),
      RecordPatch::Status(
        ProcessStatus::NotAssigned
      )
    );
  }
}
