use sga_shared::{
  ModalKind,
  ModalState,
  ProcessStatus,
  TRACKING_CODE_MAX_LEN
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  Properties,
  TargetCast,
  function_component,
  html
};

/// One modal for all three row actions.
/// The kind decides which inputs show;
/// the bound target travels in `state`.
#[derive(Properties, PartialEq)]
pub struct ProcessModalProps {
  pub state:     ModalState,
  pub busy:      bool,
  pub on_change: Callback<ModalState>,
  pub on_save:   Callback<()>,
  pub on_close:  Callback<()>
}

#[function_component(ProcessModal)]
pub fn process_modal(
  props: &ProcessModalProps
) -> Html {
  let state = &props.state;

  let edit = |apply: fn(&mut ModalState, String)| {
    let on_change = props.on_change.clone();
    let base = state.clone();
    move |value: String| {
      let mut next = base.clone();
      apply(&mut next, value);
      next.error = None;
      on_change.emit(next);
    }
  };

  let body = match state.kind {
    | ModalKind::Status => {
      let set = edit(|s, v| s.status = v);
      let has_choice = ProcessStatus::SELECTABLE
        .iter()
        .any(|status| state.status == status.as_str());
      let onchange = Callback::from(move |e: Event| {
        set(e.target_unchecked_into::<HtmlSelectElement>().value());
      });
      html! {
          <div class="mb-3">
              <label class="form-label" for="novoStatus">{ "Novo status" }</label>
              <select id="novoStatus" class="form-select" onchange={onchange}>
                  <option value="" disabled=true selected={!has_choice}>
                      { "Selecione um status" }
                  </option>
                  { for ProcessStatus::SELECTABLE.iter().map(|status| html! {
                      <option
                          value={status.as_str()}
                          selected={state.status == status.as_str()}
                      >
                          { status.label() }
                      </option>
                  }) }
              </select>
          </div>
      }
    }
    | ModalKind::Tracking => {
      let set = edit(|s, v| s.tracking_code = v);
      let oninput = Callback::from(move |e: InputEvent| {
        set(e.target_unchecked_into::<HtmlInputElement>().value());
      });
      html! {
          <div class="mb-3">
              <label class="form-label" for="codigoRastreio">{ "Código de rastreio" }</label>
              <input
                  id="codigoRastreio"
                  class="form-control text-uppercase font-monospace"
                  maxlength={TRACKING_CODE_MAX_LEN.to_string()}
                  value={state.tracking_code.clone()}
                  oninput={oninput}
              />
          </div>
      }
    }
    | ModalKind::Comment => {
      let set_text = edit(|s, v| s.comment = v);
      let oninput = Callback::from(move |e: InputEvent| {
        set_text(e.target_unchecked_into::<HtmlTextAreaElement>().value());
      });
      let on_change = props.on_change.clone();
      let base = state.clone();
      let on_forward = Callback::from(move |e: Event| {
        let mut next = base.clone();
        next.forward_to_mgmt = e.target_unchecked_into::<HtmlInputElement>().checked();
        on_change.emit(next);
      });
      html! {
          <>
              <div class="mb-3">
                  <label class="form-label" for="textoComentario">{ "Comentário" }</label>
                  <textarea
                      id="textoComentario"
                      class="form-control"
                      rows="3"
                      value={state.comment.clone()}
                      oninput={oninput}
                  />
              </div>
              <div class="form-check">
                  <input
                      id="encaminharGestao"
                      class="form-check-input"
                      type="checkbox"
                      checked={state.forward_to_mgmt}
                      onchange={on_forward}
                  />
                  <label class="form-check-label" for="encaminharGestao">
                      { "Encaminhar para a gestão" }
                  </label>
              </div>
          </>
      }
    }
  };

  let on_save = props.on_save.clone();
  let on_close = props.on_close.clone();
  let on_dismiss = props.on_close.clone();

  html! {
      <div class="modal fade show d-block" id={state.kind.element_id()} tabindex="-1">
          <div class="modal-dialog">
              <div class="modal-content">
                  <div class="modal-header">
                      <h5 class="modal-title">{ state.kind.heading() }</h5>
                      <button type="button" class="btn-close" onclick={move |_| on_dismiss.emit(())}></button>
                  </div>
                  <div class="modal-body">
                      <p class="text-muted small mb-3">{ &state.info }</p>
                      { body }
                      if let Some(error) = &state.error {
                          <div class="alert alert-danger mt-3 mb-0">{ error }</div>
                      }
                  </div>
                  <div class="modal-footer">
                      <button type="button" class="btn btn-secondary" onclick={move |_| on_close.emit(())}>
                          { "Fechar" }
                      </button>
                      <button
                          type="button"
                          class="btn btn-primary"
                          disabled={props.busy}
                          onclick={move |_| on_save.emit(())}
                      >
                          { if props.busy { "Salvando..." } else { "Salvar" } }
                      </button>
                  </div>
              </div>
          </div>
      </div>
  }
}
