use sga_shared::{
  ConfirmAction,
  ModalKind,
  ProcessRow,
  TriggerAttrs
};
use yew::{
  AttrValue,
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::StatusBadge;

#[derive(Properties, PartialEq)]
pub struct ProcessRowProps {
  pub row:       ProcessRow,
  pub busy:      bool,
  pub on_open:
    Callback<(ModalKind, TriggerAttrs)>,
  pub on_inline: Callback<(ConfirmAction, u64)>
}

#[function_component(ProcessRowView)]
pub fn process_row(
  props: &ProcessRowProps
) -> Html {
  let row = &props.row;
  let attrs = row.trigger_attrs();
  let cancelled = row.is_cancelled();

  let open = |kind: ModalKind, icon: &'static str, title: &'static str| {
    let on_open = props.on_open.clone();
    let pk = AttrValue::from(attrs.pk.clone());
    let code = AttrValue::from(attrs.code.clone());
    let title_attr = AttrValue::from(attrs.title.clone());
    let status = AttrValue::from(attrs.status.clone());
    let tracking = AttrValue::from(attrs.tracking_code.clone());
    let attrs = attrs.clone();
    html! {
        <button
            type="button"
            class="btn btn-sm btn-link"
            title={title}
            disabled={cancelled || props.busy}
            data-processo-pk={pk}
            data-processo-id={code}
            data-processo-titulo={title_attr}
            data-processo-status={status}
            data-processo-rastreio={tracking}
            onclick={move |_| on_open.emit((kind, attrs.clone()))}
        >
            <i class={classes!("bi", icon)}></i>
        </button>
    }
  };

  let inline = |action: ConfirmAction, class: &'static str| {
    let on_inline = props.on_inline.clone();
    let pk = row.pk;
    let disabled = props.busy
      || (cancelled
        && action == ConfirmAction::Assign);
    html! {
        <button
            type="button"
            class={classes!("btn", "btn-sm", class)}
            disabled={disabled}
            onclick={move |_| on_inline.emit((action, pk))}
        >
            { action.label() }
        </button>
    }
  };

  let row_class = if cancelled {
    "table-secondary text-decoration-line-through"
  } else {
    ""
  };

  html! {
      <tr class={row_class}>
          <td class="fw-semibold">{ &row.code }</td>
          <td>{ &row.title }</td>
          <td><StatusBadge status={row.status} /></td>
          <td class="font-monospace">{ row.tracking_code.clone().unwrap_or_else(|| "—".to_string()) }</td>
          <td>{ row.assignee.clone().unwrap_or_else(|| "—".to_string()) }</td>
          <td class="text-end text-nowrap">
              { open(ModalKind::Status, "bi-arrow-repeat", "Alterar status") }
              { open(ModalKind::Tracking, "bi-truck", "Código de rastreio") }
              { open(ModalKind::Comment, "bi-chat-left-text", "Adicionar comentário") }
              <span class="badge text-bg-light ms-1">{ row.comment_count.to_string() }</span>
              { inline(ConfirmAction::Assign, "btn-outline-primary ms-2") }
              { inline(ConfirmAction::cancel_toggle(cancelled), if cancelled { "btn-outline-success ms-1" } else { "btn-outline-danger ms-1" }) }
          </td>
      </tr>
  }
}
