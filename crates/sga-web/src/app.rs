pub mod page;
pub mod rows;

use gloo::console::log;
use sga_shared::confirm::{
  Prompt,
  run_confirmed
};
use sga_shared::{
  ConfirmAction,
  DispatchOutcome,
  Dispatcher,
  ModalKind,
  ModalState,
  ProcessRow,
  TriggerAttrs
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_reducer,
  use_state
};

use crate::api::FetchTransport;
use crate::app::rows::{
  RowsAction,
  RowsState
};
use crate::components::{
  ProcessModal,
  ProcessTable
};

/// `window.confirm`, the same blocking
/// dialog the server pages used.
pub struct BrowserPrompt;

impl Prompt for BrowserPrompt {
  fn confirm(&self, message: &str) -> bool {
    gloo::dialogs::confirm(message)
  }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
  pub rows: Vec<ProcessRow>
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
  let rows = {
    let initial = props.rows.clone();
    use_reducer(move || {
      RowsState::new(initial)
    })
  };
  let modal =
    use_state(|| None::<ModalState>);
  let busy = use_state(|| false);
  let dispatcher =
    use_state(Dispatcher::new);
  let transport =
    use_state(FetchTransport::from_page);

  let on_open = {
    let modal = modal.clone();
    Callback::from(
      move |(kind, attrs): (
        ModalKind,
        TriggerAttrs
      )| {
        ui_debug(
          "modal.open",
          &format!(
            "{} pk={}",
            kind.element_id(),
            attrs.pk
          )
        );
        modal.set(Some(ModalState::bind(
          kind, &attrs
        )));
      }
    )
  };

  let on_change = {
    let modal = modal.clone();
    Callback::from(
      move |next: ModalState| {
        modal.set(Some(next));
      }
    )
  };

  let on_close = {
    let modal = modal.clone();
    Callback::from(move |_| {
      modal.set(None);
    })
  };

  let on_save = {
    let modal = modal.clone();
    let busy = busy.clone();
    let rows = rows.clone();
    let dispatcher = (*dispatcher).clone();
    let transport = (*transport).clone();
    Callback::from(move |_| {
      let Some(state) = (*modal).clone()
      else {
        return;
      };
      let mutation = match state.save() {
        | Ok(mutation) => mutation,
        | Err(err) => {
          ui_debug(
            "modal.save.invalid",
            &err.to_string()
          );
          let mut next = state;
          next.error = Some(err.to_string());
          modal.set(Some(next));
          return;
        }
      };

      busy.set(true);
      let modal = modal.clone();
      let busy = busy.clone();
      let rows = rows.clone();
      let dispatcher = dispatcher.clone();
      let transport = transport.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = dispatcher
            .dispatch(&transport, mutation)
            .await;
          busy.set(false);
          if let Some(pk) =
            apply_outcome(&rows, &outcome)
          {
            ui_debug(
              "modal.save.ok",
              &format!("pk={pk}")
            );
            modal.set(None);
          }
        }
      );
    })
  };

  let on_inline = {
    let busy = busy.clone();
    let rows = rows.clone();
    let dispatcher = (*dispatcher).clone();
    let transport = (*transport).clone();
    Callback::from(
      move |(action, pk): (
        ConfirmAction,
        u64
      )| {
        let busy = busy.clone();
        let rows = rows.clone();
        let dispatcher = dispatcher.clone();
        let transport = transport.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            busy.set(true);
            let outcome = run_confirmed(
              &BrowserPrompt,
              &dispatcher,
              &transport,
              action,
              pk
            )
            .await;
            busy.set(false);
            match outcome {
              | Some(outcome) => {
                apply_outcome(&rows, &outcome);
              }
              | None => ui_debug(
                "inline.declined",
                action.label()
              )
            }
          }
        );
      }
    )
  };

  html! {
    <>
      <ProcessTable
        rows={rows.rows.clone()}
        busy={*busy}
        on_open={on_open}
        on_inline={on_inline}
      />
      if let Some(state) = (*modal).clone() {
        <ProcessModal
          state={state}
          busy={*busy}
          on_change={on_change}
          on_save={on_save}
          on_close={on_close}
        />
      }
    </>
  }
}

/// Patches the row on success and
/// alerts otherwise. Returns the pk of
/// the patched row.
fn apply_outcome(
  rows: &yew::UseReducerHandle<RowsState>,
  outcome: &DispatchOutcome
) -> Option<u64> {
  match outcome {
    | DispatchOutcome::Applied {
      record: Some(pk),
      patch,
      ..
    } => {
      rows.dispatch(RowsAction::Patch {
        pk:    *pk,
        patch: patch.clone()
      });
      Some(*pk)
    }
    | DispatchOutcome::Busy => {
      ui_debug(
        "dispatch.busy",
        "request already in flight"
      );
      None
    }
    | other => {
      if let Some(text) = other.alert_text()
      {
        gloo::dialogs::alert(&text);
      }
      None
    }
  }
}

pub(crate) fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
