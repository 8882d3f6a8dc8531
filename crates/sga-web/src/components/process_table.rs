use sga_shared::{
  ConfirmAction,
  ModalKind,
  ProcessRow,
  TriggerAttrs
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::ProcessRowView;

#[derive(Properties, PartialEq)]
pub struct ProcessTableProps {
  pub rows:      Vec<ProcessRow>,
  pub busy:      bool,
  pub on_open:
    Callback<(ModalKind, TriggerAttrs)>,
  pub on_inline: Callback<(ConfirmAction, u64)>
}

#[function_component(ProcessTable)]
pub fn process_table(
  props: &ProcessTableProps
) -> Html {
  if props.rows.is_empty() {
    return html! {
        <div class="text-center text-muted py-4">
            { "Nenhum processo encontrado." }
        </div>
    };
  }

  html! {
      <table class="table table-hover align-middle">
          <thead>
              <tr>
                  <th>{ "Processo" }</th>
                  <th>{ "Título" }</th>
                  <th>{ "Status" }</th>
                  <th>{ "Rastreio" }</th>
                  <th>{ "Responsável" }</th>
                  <th class="text-end">{ "Ações" }</th>
              </tr>
          </thead>
          <tbody>
              { for props.rows.iter().map(|row| html! {
                  <ProcessRowView
                      key={row.pk}
                      row={row.clone()}
                      busy={props.busy}
                      on_open={props.on_open.clone()}
                      on_inline={props.on_inline.clone()}
                  />
              }) }
          </tbody>
      </table>
  }
}
